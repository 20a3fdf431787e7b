//! Tool-call rule evaluation
//!
//! Compiles the rules configuration once at construction, resolves the
//! applicable rule set per incoming tool call (alias canonicalization, then
//! exact tool key, then group key, then defaults), and evaluates deny/allow
//! patterns at the call and parameter level. Also owns the circuit breaker.

use indexmap::IndexMap;
use regex::Regex;
use serde_json::Value;

use crate::breaker::{BreakerAction, BreakerConfig, CircuitBreaker};
use crate::rules::groups::{canonical_tool_name, groups_containing};
use crate::rules::{ParamRule, RulesSection, ToolRules};
use crate::verdict::Verdict;

/// Compiled allow/deny patterns for one parameter
struct CompiledParamRule {
    /// Rule author's key, used for lookup casing and block messages
    name: String,
    allow: Vec<Regex>,
    deny: Vec<Regex>,
}

/// Compiled rule set for one tool or group key
struct CompiledRuleSet {
    allow: Vec<Regex>,
    deny: Vec<Regex>,
    params: Vec<CompiledParamRule>,
    block_message: Option<String>,
}

impl CompiledRuleSet {
    fn is_empty(&self) -> bool {
        self.allow.is_empty()
            && self.deny.is_empty()
            && self.params.iter().all(|p| p.allow.is_empty() && p.deny.is_empty())
    }
}

/// Rule resolver and evaluator, immutable after construction except for the
/// breaker's timestamp log
pub struct Gatekeeper {
    defaults: Option<CompiledRuleSet>,
    tools: IndexMap<String, CompiledRuleSet>,
    breaker: Option<CircuitBreaker>,
}

impl Gatekeeper {
    /// Compile a rules configuration.
    ///
    /// Invalid patterns are dropped with a warning; rule sets whose only
    /// content was invalid patterns collapse to empty. Construction never
    /// fails.
    pub fn new(rules: &RulesSection, breaker: Option<BreakerConfig>) -> Self {
        let defaults = rules.defaults.as_ref().map(|set| compile_set("defaults", set));
        let tools = rules
            .tools
            .iter()
            .map(|(key, set)| (key.clone(), compile_set(key, set)))
            .collect();

        Self {
            defaults,
            tools,
            breaker: breaker.map(CircuitBreaker::new),
        }
    }

    /// Check a tool call against the applicable rule set.
    ///
    /// The breaker is consulted first: when tripped with the suspend
    /// action, the call is blocked without recording a new block.
    pub fn check(&self, tool_name: &str, params: &Value) -> Verdict {
        let tool = canonical_tool_name(tool_name);

        if let Some(breaker) = &self.breaker {
            if breaker.is_tripped() && breaker.action() == BreakerAction::Suspend {
                return Verdict::block("circuit-breaker", breaker.suspend_reason());
            }
        }

        let Some(set) = self.resolve(&tool) else {
            return Verdict::allow("no firewall rules apply");
        };

        let verdict = evaluate(set, &tool, params);

        if verdict.is_block() {
            if let Some(breaker) = &self.breaker {
                breaker.record_block();
            }
        }

        verdict
    }

    /// Resolve the rule set for a canonical tool name
    fn resolve(&self, tool: &str) -> Option<&CompiledRuleSet> {
        if let Some(set) = self.tools.get(tool) {
            return Some(set);
        }
        for group in groups_containing(tool) {
            if let Some(set) = self.tools.get(group) {
                return Some(set);
            }
        }
        self.defaults.as_ref()
    }

    /// Count of compiled tool/group rule sets
    pub fn rule_set_count(&self) -> usize {
        self.tools.len() + usize::from(self.defaults.is_some())
    }
}

fn compile_patterns(key: &str, patterns: &[String]) -> Vec<Regex> {
    let mut compiled = Vec::new();
    for pattern in patterns {
        match Regex::new(pattern) {
            Ok(re) => compiled.push(re),
            Err(e) => eprintln!("Warning: Invalid rule pattern for {}: {}", key, e),
        }
    }
    compiled
}

fn compile_param_rule(key: &str, name: &str, rule: &ParamRule) -> CompiledParamRule {
    CompiledParamRule {
        name: name.to_string(),
        allow: compile_patterns(key, &rule.allow),
        deny: compile_patterns(key, &rule.deny),
    }
}

fn compile_set(key: &str, set: &ToolRules) -> CompiledRuleSet {
    CompiledRuleSet {
        allow: compile_patterns(key, &set.allow),
        deny: compile_patterns(key, &set.deny),
        params: set
            .params
            .iter()
            .map(|(name, rule)| compile_param_rule(key, name, rule))
            .collect(),
        block_message: set.block_message.clone(),
    }
}

/// Stable serialization of the parameter map
fn params_string(params: &Value) -> String {
    serde_json::to_string(params).unwrap_or_default()
}

/// Convert `a_b` to `aB`
fn camel_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper_next = false;
    for c in name.chars() {
        if c == '_' {
            upper_next = true;
        } else if upper_next {
            out.extend(c.to_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// Convert `aB` to `a_b`
fn snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_uppercase() {
            out.push('_');
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Look up a parameter value under the author's key, then camelCase, then
/// snake_case; nulls count as absent
fn lookup_param<'a>(params: &'a Value, name: &str) -> Option<&'a Value> {
    let map = params.as_object()?;
    for key in [name.to_string(), camel_case(name), snake_case(name)] {
        if let Some(value) = map.get(&key) {
            if !value.is_null() {
                return Some(value);
            }
        }
    }
    None
}

fn evaluate(set: &CompiledRuleSet, tool: &str, params: &Value) -> Verdict {
    if set.is_empty() {
        return Verdict::allow("rule set is empty");
    }

    let serialized = params_string(params);

    for re in &set.deny {
        if re.is_match(&serialized) {
            return Verdict::block("deny", block_reason(set, tool, None));
        }
    }

    if !set.allow.is_empty() && !set.allow.iter().any(|re| re.is_match(&serialized)) {
        return Verdict::block("allow-gate", block_reason(set, tool, None));
    }

    for rule in &set.params {
        let Some(value) = lookup_param(params, &rule.name) else {
            continue;
        };
        let text = match value.as_str() {
            Some(s) => s.to_string(),
            None => params_string(value),
        };

        for re in &rule.deny {
            if re.is_match(&text) {
                return Verdict::block(
                    format!("param-deny:{}", rule.name),
                    block_reason(set, tool, Some(&rule.name)),
                );
            }
        }

        if !rule.allow.is_empty() && !rule.allow.iter().any(|re| re.is_match(&text)) {
            return Verdict::block(
                format!("param-allow-gate:{}", rule.name),
                block_reason(set, tool, Some(&rule.name)),
            );
        }
    }

    Verdict::allow("passed all checks")
}

/// Block reason: the rule set's message, or a default template naming the
/// tool and parameter. Never includes a parameter value.
fn block_reason(set: &CompiledRuleSet, tool: &str, param: Option<&str>) -> String {
    if let Some(message) = &set.block_message {
        return message.clone();
    }
    match param {
        Some(name) => format!("Tool call '{}' blocked: parameter '{}' violates firewall rules", tool, name),
        None => format!("Tool call '{}' blocked by firewall rules", tool),
    }
}
