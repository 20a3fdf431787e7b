//! Rule model for the gatekeeper
//!
//! Call-level and parameter-level allow/deny pattern lists, keyed by tool
//! name or `group:` identifier, plus the merge discipline that combines
//! shipped defaults with user rules.

pub mod defaults;
pub mod groups;
pub mod redaction;

use indexmap::IndexMap;
use serde::Deserialize;

/// Allow/deny patterns for one named parameter of a tool
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ParamRule {
    /// Allow patterns; when non-empty, a value must match one
    pub allow: Vec<String>,

    /// Deny patterns; any match blocks the call
    pub deny: Vec<String>,
}

/// Rule set for one tool name or group key
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ToolRules {
    /// Call-level allow patterns, matched against the serialized params
    pub allow: Vec<String>,

    /// Call-level deny patterns, matched against the serialized params
    pub deny: Vec<String>,

    /// Parameter rules, keyed by the rule author's chosen casing
    pub params: IndexMap<String, ParamRule>,

    /// Message returned when any rule in this set causes a block
    #[serde(alias = "blockMessage")]
    pub block_message: Option<String>,
}

/// A complete rules configuration: defaults plus per-tool/group rule sets
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RulesSection {
    /// Rule set applied when no tool or group key matches
    pub defaults: Option<ToolRules>,

    /// Rule sets keyed by tool name or `group:` identifier
    pub tools: IndexMap<String, ToolRules>,
}

/// Merge a base rule set with user-supplied rules.
///
/// Deny is security-additive: base deny patterns always survive, user
/// patterns append. Allow is intentional capability-opening: a non-empty
/// user allow list replaces the base list. Parameter rules deep-merge under
/// the same discipline; a user block message replaces the base one.
pub fn merge_tool_rules(base: &ToolRules, user: &ToolRules) -> ToolRules {
    let mut deny = base.deny.clone();
    deny.extend(user.deny.iter().cloned());

    let allow = if user.allow.is_empty() {
        base.allow.clone()
    } else {
        user.allow.clone()
    };

    let mut params = base.params.clone();
    for (name, user_rule) in &user.params {
        match params.get(name) {
            Some(base_rule) => {
                let mut merged_deny = base_rule.deny.clone();
                merged_deny.extend(user_rule.deny.iter().cloned());
                let merged_allow = if user_rule.allow.is_empty() {
                    base_rule.allow.clone()
                } else {
                    user_rule.allow.clone()
                };
                params.insert(
                    name.clone(),
                    ParamRule {
                        allow: merged_allow,
                        deny: merged_deny,
                    },
                );
            }
            None => {
                params.insert(name.clone(), user_rule.clone());
            }
        }
    }

    ToolRules {
        allow,
        deny,
        params,
        block_message: user
            .block_message
            .clone()
            .or_else(|| base.block_message.clone()),
    }
}

/// Merge a base rules configuration with user-supplied rules.
///
/// Tool keys present in both merge per [`merge_tool_rules`]; keys present
/// in only one side carry over unchanged.
pub fn merge_rules(base: &RulesSection, user: &RulesSection) -> RulesSection {
    let defaults = match (&base.defaults, &user.defaults) {
        (Some(b), Some(u)) => Some(merge_tool_rules(b, u)),
        (Some(b), None) => Some(b.clone()),
        (None, u) => u.clone(),
    };

    let mut tools = IndexMap::new();
    for (key, base_set) in &base.tools {
        match user.tools.get(key) {
            Some(user_set) => tools.insert(key.clone(), merge_tool_rules(base_set, user_set)),
            None => tools.insert(key.clone(), base_set.clone()),
        };
    }
    for (key, user_set) in &user.tools {
        if !tools.contains_key(key) {
            tools.insert(key.clone(), user_set.clone());
        }
    }

    RulesSection { defaults, tools }
}
