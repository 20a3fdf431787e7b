//! agent-firewall - Bidirectional security firewall for LLM agents
//!
//! Sits in-process with an agent and checks every tool call and every
//! message egress synchronously with the host pipeline: dangerous tool
//! calls are blocked before execution, and operator secrets (or generic
//! secret shapes) are scrubbed before anything reaches a transcript or an
//! outbound channel.
//!
//! # Features
//!
//! - **Gatekeeper**: pre-compiled allow/deny rules per tool or tool group,
//!   with parameter-level patterns and alias normalization
//! - **Vault**: `{{NAME}}` placeholder injection into tool parameters, and
//!   reverse scrubbing of values and their base64/hex encodings
//! - **Sanitizer**: generic secret-shape redaction (provider key prefixes,
//!   JWTs, PEM blocks, database URIs, ...)
//! - **Circuit breaker**: sliding-window counter that suspends tool
//!   activity under adversarial probing bursts
//!
//! # Example
//!
//! ```
//! use agent_firewall::{Firewall, FirewallConfig};
//! use serde_json::json;
//!
//! let firewall = Firewall::new(FirewallConfig::default());
//!
//! let outcome = firewall.before_tool_call("exec", &json!({"command": "rm -rf /"}));
//! assert!(outcome.is_blocked());
//!
//! let outcome = firewall.before_tool_call("exec", &json!({"command": "echo hello"}));
//! assert!(outcome.is_allowed());
//! ```

pub mod breaker;
pub mod config;
pub mod events;
pub mod firewall;
pub mod gatekeeper;
pub mod hook;
pub mod rules;
pub mod sanitize;
pub mod vault;
pub mod verdict;
pub mod walker;

// Re-exports for convenience
pub use breaker::{BreakerAction, BreakerConfig};
pub use config::{FirewallConfig, SanitizeConfig};
pub use firewall::{build_prompt_hint, Firewall, ToolCallOutcome};
pub use gatekeeper::Gatekeeper;
pub use hook::{HookEvent, HookResponse};
pub use sanitize::Sanitizer;
pub use vault::Vault;
pub use verdict::Verdict;
