//! Placeholder vault for secret substitution
//!
//! Maps `{{NAME}}` placeholders to secret values in both directions: forward
//! injection into outbound tool parameters, and reverse scrubbing of tool
//! results and outbound messages. Reverse matching also covers the standard
//! base64 and hex encodings of each value so an encoded secret cannot slip
//! past the scrub.

use std::collections::HashMap;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde_json::Value;

use crate::walker::walk_strings;

/// Placeholder grammar: `{{NAME}}` with an uppercase identifier
static PLACEHOLDER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{([A-Z_][A-Z0-9_]*)\}\}").expect("invalid placeholder regex"));

/// Valid placeholder names
static NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z_][A-Z0-9_]*$").expect("invalid name regex"));

/// Values shorter than this get no encoding matchers; short or trivial
/// values produce pathological base64/hex matches.
const ENCODING_MIN_LEN: usize = 8;

/// Bidirectional placeholder/secret mapping, compiled once per session.
pub struct Vault {
    /// Placeholder name -> secret value, in insertion order
    entries: IndexMap<String, String>,

    /// Alternation over all literal values, longest branch first
    literal: Option<Regex>,

    /// Literal value -> `{{NAME}}` replacement (first-inserted name wins)
    by_value: HashMap<String, String>,

    /// Encoding matchers, in construction order: `(matcher, "{{NAME}}")`
    encoded: Vec<(Regex, String)>,
}

impl Vault {
    /// Build a vault from a placeholder table.
    ///
    /// Entries with an invalid placeholder name or an empty value are
    /// skipped with a warning; construction never fails.
    pub fn new(table: &IndexMap<String, String>) -> Self {
        let mut entries = IndexMap::new();

        for (name, value) in table {
            if !NAME_RE.is_match(name) {
                eprintln!("Warning: Invalid vault placeholder name, skipping: {}", name);
                continue;
            }
            if value.is_empty() {
                eprintln!("Warning: Empty vault value, skipping: {}", name);
                continue;
            }
            entries.insert(name.clone(), value.clone());
        }

        let mut by_value = HashMap::new();
        for (name, value) in &entries {
            by_value
                .entry(value.clone())
                .or_insert_with(|| format!("{{{{{}}}}}", name));
        }

        // Longest-first alternation so a value that is a substring of
        // another cannot mask it.
        let mut values: Vec<&String> = by_value.keys().collect();
        values.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        let literal = if values.is_empty() {
            None
        } else {
            let alternation = values
                .iter()
                .map(|v| regex::escape(v))
                .collect::<Vec<_>>()
                .join("|");
            Regex::new(&alternation).ok()
        };

        let mut encoded = Vec::new();
        for (name, value) in &entries {
            if value.len() < ENCODING_MIN_LEN {
                continue;
            }
            let placeholder = format!("{{{{{}}}}}", name);
            let b64 = BASE64.encode(value.as_bytes());
            if let Ok(re) = Regex::new(&regex::escape(&b64)) {
                encoded.push((re, placeholder.clone()));
            }
            let hexed = hex::encode(value.as_bytes());
            if let Ok(re) = Regex::new(&format!("(?i){}", regex::escape(&hexed))) {
                encoded.push((re, placeholder));
            }
        }

        Self {
            entries,
            literal,
            by_value,
            encoded,
        }
    }

    /// Number of placeholders
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the vault has no placeholders
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Placeholder names in insertion order (never values)
    pub fn placeholder_names(&self) -> Vec<&str> {
        self.entries.keys().map(String::as_str).collect()
    }

    /// Replace every known `{{NAME}}` with its stored value.
    ///
    /// Unknown names pass through untouched. Matches are disjoint and
    /// injected output is never re-scanned.
    pub fn inject(&self, text: &str) -> String {
        if self.entries.is_empty() || !text.contains("{{") {
            return text.to_string();
        }
        PLACEHOLDER_RE
            .replace_all(text, |caps: &Captures| {
                match self.entries.get(&caps[1]) {
                    Some(value) => value.clone(),
                    None => caps[0].to_string(),
                }
            })
            .into_owned()
    }

    /// Replace every literal secret value, and every base64/hex encoding of
    /// one, with its `{{NAME}}` placeholder.
    pub fn scrub(&self, text: &str) -> String {
        let mut out = match &self.literal {
            Some(re) => re
                .replace_all(text, |caps: &Captures| {
                    self.by_value
                        .get(&caps[0])
                        .cloned()
                        .unwrap_or_else(|| caps[0].to_string())
                })
                .into_owned(),
            None => text.to_string(),
        };

        for (re, placeholder) in &self.encoded {
            if re.is_match(&out) {
                out = re.replace_all(&out, placeholder.as_str()).into_owned();
            }
        }

        out
    }

    /// Inject placeholders in every string leaf of a parameter object
    pub fn inject_params(&self, params: &Value) -> Value {
        walk_strings(params, &mut |s| self.inject(s))
    }

    /// Scrub secrets from every string leaf of a structured value
    pub fn scrub_object(&self, value: &Value) -> Value {
        walk_strings(value, &mut |s| self.scrub(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn vault(entries: &[(&str, &str)]) -> Vault {
        let table: IndexMap<String, String> = entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Vault::new(&table)
    }

    #[test]
    fn test_inject_known_placeholder() {
        let v = vault(&[("API_KEY", "sk-test-secret-value-12345")]);
        assert_eq!(
            v.inject("curl -H 'Authorization: {{API_KEY}}'"),
            "curl -H 'Authorization: sk-test-secret-value-12345'"
        );
    }

    #[test]
    fn test_inject_unknown_placeholder_untouched() {
        let v = vault(&[("API_KEY", "secret-value-1")]);
        assert_eq!(v.inject("use {{UNKNOWN_NAME}} here"), "use {{UNKNOWN_NAME}} here");
    }

    #[test]
    fn test_inject_ignores_non_matching_grammar() {
        let v = vault(&[("API_KEY", "secret-value-1")]);
        assert_eq!(v.inject("{{lower_case}} {API_KEY} {{ API_KEY }}"), "{{lower_case}} {API_KEY} {{ API_KEY }}");
    }

    #[test]
    fn test_inject_noop_without_braces() {
        let v = vault(&[("API_KEY", "secret-value-1")]);
        assert_eq!(v.inject("plain text"), "plain text");
    }

    #[test]
    fn test_scrub_literal() {
        let v = vault(&[("API_KEY", "sk-test-secret-value-12345")]);
        assert_eq!(
            v.scrub("key is sk-test-secret-value-12345 done"),
            "key is {{API_KEY}} done"
        );
    }

    #[test]
    fn test_scrub_single_value_exact() {
        let v = vault(&[("TOKEN", "abcdef123456")]);
        assert_eq!(v.scrub("abcdef123456"), "{{TOKEN}}");
    }

    #[test]
    fn test_scrub_longest_match_wins() {
        // SHORT is a substring of LONG; scrubbing the long value must not
        // be masked by the short one.
        let v = vault(&[("SHORT", "secret-ab"), ("LONG", "secret-abcdef")]);
        assert_eq!(v.scrub("x secret-abcdef y"), "x {{LONG}} y");
        assert_eq!(v.scrub("x secret-ab y"), "x {{SHORT}} y");
    }

    #[test]
    fn test_scrub_duplicate_value_first_name_wins() {
        let v = vault(&[("FIRST", "same-value-here"), ("SECOND", "same-value-here")]);
        assert_eq!(v.scrub("same-value-here"), "{{FIRST}}");
    }

    #[test]
    fn test_scrub_base64_encoding() {
        let v = vault(&[("API_KEY", "sk-test-secret-value-12345")]);
        let encoded = BASE64.encode("sk-test-secret-value-12345");
        assert_eq!(v.scrub(&format!("payload={}", encoded)), "payload={{API_KEY}}");
    }

    #[test]
    fn test_scrub_hex_encoding_case_insensitive() {
        let v = vault(&[("API_KEY", "sk-test-secret-value-12345")]);
        let lower = hex::encode("sk-test-secret-value-12345");
        let upper = lower.to_uppercase();
        assert_eq!(v.scrub(&lower), "{{API_KEY}}");
        assert_eq!(v.scrub(&upper), "{{API_KEY}}");
    }

    #[test]
    fn test_short_values_get_no_encoding_matchers() {
        let v = vault(&[("PIN", "1234")]);
        let encoded = BASE64.encode("1234");
        // Literal is still scrubbed, the encoding is not.
        assert_eq!(v.scrub("1234"), "{{PIN}}");
        assert_eq!(v.scrub(&encoded), encoded);
    }

    #[test]
    fn test_empty_vault_scrub_is_identity() {
        let v = vault(&[]);
        assert_eq!(v.scrub("nothing to see"), "nothing to see");
        assert!(v.is_empty());
    }

    #[test]
    fn test_scrub_idempotent() {
        let v = vault(&[("API_KEY", "sk-test-secret-value-12345")]);
        let once = v.scrub("a sk-test-secret-value-12345 b");
        assert_eq!(v.scrub(&once), once);
    }

    #[test]
    fn test_scrub_inject_roundtrip() {
        let v = vault(&[("API_KEY", "sk-test-secret-value-12345")]);
        let injected = v.inject("key: {{API_KEY}}");
        assert_eq!(v.scrub(&injected), "key: {{API_KEY}}");
    }

    #[test]
    fn test_invalid_names_and_empty_values_skipped() {
        let v = vault(&[("lower", "value-ok-here"), ("EMPTY", ""), ("GOOD", "value-ok-here2")]);
        assert_eq!(v.placeholder_names(), vec!["GOOD"]);
    }

    #[test]
    fn test_regex_metacharacters_in_value() {
        let v = vault(&[("WEIRD", "a+b(c)*d.e[f]")]);
        assert_eq!(v.scrub("got a+b(c)*d.e[f] here"), "got {{WEIRD}} here");
        assert_eq!(v.scrub("aab(c)d.e"), "aab(c)d.e");
    }

    #[test]
    fn test_placeholder_names_insertion_order() {
        let v = vault(&[("ZULU", "value-zulu-1"), ("ALPHA", "value-alpha-1")]);
        assert_eq!(v.placeholder_names(), vec!["ZULU", "ALPHA"]);
    }

    #[test]
    fn test_inject_params_deep() {
        let v = vault(&[("TOKEN", "tok-value-123")]);
        let params = json!({"cmd": "auth {{TOKEN}}", "args": ["{{TOKEN}}", 1]});
        let result = v.inject_params(&params);
        assert_eq!(
            result,
            json!({"cmd": "auth tok-value-123", "args": ["tok-value-123", 1]})
        );
    }

    #[test]
    fn test_scrub_object_deep() {
        let v = vault(&[("TOKEN", "tok-value-123")]);
        let message = json!({"output": "found tok-value-123", "code": 0});
        let result = v.scrub_object(&message);
        assert_eq!(result, json!({"output": "found {{TOKEN}}", "code": 0}));
    }
}
