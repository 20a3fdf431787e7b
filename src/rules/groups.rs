//! Tool group and alias tables
//!
//! Static tables used by the gatekeeper to resolve a rule set for an
//! incoming tool name. Group keys carry a `group:` prefix in rules
//! configuration; aliases canonicalize the many names hosts use for the
//! same tool.

/// Tool groups, in resolution order
pub const TOOL_GROUPS: &[(&str, &[&str])] = &[
    ("group:fs", &["read", "write", "edit", "apply_patch"]),
    ("group:runtime", &["exec", "process"]),
    ("group:web", &["web_search", "web_fetch"]),
    ("group:memory", &["memory_search", "memory_get"]),
    (
        "group:sessions",
        &[
            "sessions_list",
            "sessions_history",
            "sessions_send",
            "sessions_spawn",
            "subagents",
            "session_status",
        ],
    ),
    ("group:ui", &["browser", "canvas"]),
    ("group:automation", &["cron", "gateway"]),
    ("group:messaging", &["message"]),
];

/// Tool name aliases: incoming name -> canonical name
pub const TOOL_ALIASES: &[(&str, &str)] = &[
    ("bash", "exec"),
    ("shell", "exec"),
    ("run", "exec"),
    ("execute", "exec"),
    ("cmd", "exec"),
    ("command", "exec"),
    ("apply-patch", "apply_patch"),
];

/// Canonicalize an incoming tool name: trim, lowercase, resolve aliases
pub fn canonical_tool_name(name: &str) -> String {
    let normalized = name.trim().to_lowercase();
    for (alias, canonical) in TOOL_ALIASES {
        if *alias == normalized {
            return canonical.to_string();
        }
    }
    normalized
}

/// Group keys containing the given canonical tool name, in declared order
pub fn groups_containing(tool: &str) -> impl Iterator<Item = &'static str> + '_ {
    TOOL_GROUPS
        .iter()
        .filter(move |(_, members)| members.contains(&tool))
        .map(|(key, _)| *key)
}
