//! agent-firewall - Bidirectional security firewall for LLM agents
//!
//! A hook binary for host pipelines: reads one JSON event from stdin,
//! writes one JSON response to stdout.
//!
//! # Usage
//!
//! ```bash
//! # Check a tool call
//! echo '{"event":"tool_call","tool_name":"exec","params":{"command":"rm -rf /"}}' | agent-firewall
//!
//! # Scrub a tool result
//! echo '{"event":"tool_result","message":{"stdout":"..."}}' | agent-firewall
//!
//! # With a config file
//! agent-firewall --config /etc/agent-firewall/config.toml
//! ```

use std::env;
use std::io::{self, BufRead, Write};

use agent_firewall::{
    config::FirewallConfig,
    firewall::Firewall,
    hook::{self, HookEvent, HookResponse},
};

/// Print version information
fn print_version() {
    println!("agent-firewall {}", env!("CARGO_PKG_VERSION"));
}

/// Print help message
fn print_help() {
    println!(
        r#"agent-firewall - Bidirectional security firewall for LLM agents

USAGE:
    agent-firewall [OPTIONS]

OPTIONS:
    -h, --help              Print this help message
    -v, --version           Print version information
    -c, --config PATH       Path to config file

ENVIRONMENT:
    FIREWALL_DISABLED=1     Pass every event through unchanged

EVENTS (one JSON object on stdin):
    {{"event":"tool_call","tool_name":"exec","params":{{...}}}}
    {{"event":"tool_result","message":{{...}}}}
    {{"event":"message","content":"..."}}
    {{"event":"agent_start"}}
"#
    );
}

/// Parse command line arguments
struct Args {
    help: bool,
    version: bool,
    config_path: Option<String>,
}

impl Args {
    fn parse() -> Self {
        let args: Vec<String> = env::args().collect();
        let mut result = Args {
            help: false,
            version: false,
            config_path: None,
        };

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "-h" | "--help" => result.help = true,
                "-v" | "--version" => result.version = true,
                "-c" | "--config" => {
                    if i + 1 < args.len() {
                        i += 1;
                        result.config_path = Some(args[i].clone());
                    }
                }
                arg if arg.starts_with("--config=") => {
                    let path = arg.trim_start_matches("--config=");
                    result.config_path = Some(path.to_string());
                }
                _ => {}
            }
            i += 1;
        }

        result
    }
}

fn main() {
    let args = Args::parse();

    if args.help {
        print_help();
        return;
    }

    if args.version {
        print_version();
        return;
    }

    let config = if let Some(ref path) = args.config_path {
        FirewallConfig::load_from(std::path::Path::new(path)).unwrap_or_else(|e| {
            eprintln!("Warning: Failed to load config from {}: {}", path, e);
            FirewallConfig::default()
        })
    } else {
        FirewallConfig::load()
    };

    let firewall = Firewall::new(config);

    // Read JSON from stdin
    let stdin = io::stdin();
    let mut input_json = String::new();

    for line in stdin.lock().lines() {
        match line {
            Ok(line) => input_json.push_str(&line),
            Err(_) => break,
        }
    }

    // Handle empty input
    if input_json.trim().is_empty() {
        println!("{}", HookResponse::allow().to_json());
        return;
    }

    let response = if env::var("FIREWALL_DISABLED").is_ok() {
        HookResponse::allow()
    } else {
        match HookEvent::from_json(&input_json) {
            Ok(event) => hook::dispatch(&firewall, &event),
            Err(e) => {
                // SECURITY: Fail closed on parse errors
                // A malformed tool-call event could be an evasion attempt
                eprintln!("Error: Failed to parse event (blocking): {}", e);
                HookResponse::block(format!("Failed to parse hook event: {}", e))
            }
        }
    };

    let json = response.to_json();
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    let _ = writeln!(handle, "{}", json);
    let _ = handle.flush();
}
