//! Gatekeeper verdicts
//!
//! The result type returned by rule evaluation. Blocks are ordinary values,
//! never errors; nothing in the firewall aborts the host pipeline.

/// Result of checking a tool call against the compiled rules
#[derive(Debug, Clone)]
pub enum Verdict {
    /// Allow the call
    Allow { reason: String },

    /// Block the call
    Block { rule: String, reason: String },
}

impl Verdict {
    /// Create an allow verdict
    pub fn allow(reason: impl Into<String>) -> Self {
        Verdict::Allow {
            reason: reason.into(),
        }
    }

    /// Create a block verdict
    pub fn block(rule: impl Into<String>, reason: impl Into<String>) -> Self {
        Verdict::Block {
            rule: rule.into(),
            reason: reason.into(),
        }
    }

    /// Check if this is an allow verdict
    pub fn is_allow(&self) -> bool {
        matches!(self, Verdict::Allow { .. })
    }

    /// Check if this is a block verdict
    pub fn is_block(&self) -> bool {
        matches!(self, Verdict::Block { .. })
    }

    /// Get the rule ID if applicable
    pub fn rule(&self) -> Option<&str> {
        match self {
            Verdict::Allow { .. } => None,
            Verdict::Block { rule, .. } => Some(rule),
        }
    }

    /// Get the reason
    pub fn reason(&self) -> &str {
        match self {
            Verdict::Allow { reason } => reason,
            Verdict::Block { reason, .. } => reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allow_verdict() {
        let verdict = Verdict::allow("passed all checks");
        assert!(verdict.is_allow());
        assert!(!verdict.is_block());
        assert!(verdict.rule().is_none());
        assert_eq!(verdict.reason(), "passed all checks");
    }

    #[test]
    fn test_block_verdict() {
        let verdict = Verdict::block("deny", "tool call blocked");
        assert!(verdict.is_block());
        assert_eq!(verdict.rule(), Some("deny"));
        assert_eq!(verdict.reason(), "tool call blocked");
    }
}
