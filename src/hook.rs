//! Hook event parsing and response formatting
//!
//! JSON surface for driving the firewall from a host pipeline: one event in
//! on stdin, one response out on stdout.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::firewall::{Firewall, ToolCallOutcome};

/// A pipeline event handed to the firewall
#[derive(Debug, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum HookEvent {
    /// Outbound tool call, before execution
    ToolCall {
        tool_name: String,
        #[serde(default)]
        params: Value,
    },

    /// Inbound tool result, before transcript persist
    ToolResult { message: Value },

    /// Outbound channel message, before sending
    Message { content: Value },

    /// Agent session start
    AgentStart,
}

impl HookEvent {
    /// Parse an event from a JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Firewall response for one event
#[derive(Debug, Serialize)]
pub struct HookResponse {
    /// `"allow"`, `"block"`, or `"replace"`
    pub action: String,

    /// Block reason
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    /// Rewritten tool parameters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,

    /// Rewritten message or content
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<Value>,

    /// Agent-start banner
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt_hint: Option<String>,
}

impl HookResponse {
    /// Unchanged-signal response
    pub fn allow() -> Self {
        HookResponse {
            action: "allow".to_string(),
            reason: None,
            params: None,
            message: None,
            prompt_hint: None,
        }
    }

    /// Block response with a reason
    pub fn block(reason: impl Into<String>) -> Self {
        HookResponse {
            reason: Some(reason.into()),
            ..Self::allow()
        }
        .with_action("block")
    }

    /// Transform response carrying rewritten parameters
    pub fn with_params(params: Value) -> Self {
        HookResponse {
            params: Some(params),
            ..Self::allow()
        }
        .with_action("replace")
    }

    /// Transform response carrying a rewritten message
    pub fn with_message(message: Value) -> Self {
        HookResponse {
            message: Some(message),
            ..Self::allow()
        }
        .with_action("replace")
    }

    /// Response carrying the agent-start banner
    pub fn with_prompt_hint(hint: String) -> Self {
        HookResponse {
            prompt_hint: Some(hint),
            ..Self::allow()
        }
        .with_action("replace")
    }

    fn with_action(mut self, action: &str) -> Self {
        self.action = action.to_string();
        self
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| r#"{"action":"allow"}"#.to_string())
    }
}

/// Run one event through the firewall
pub fn dispatch(firewall: &Firewall, event: &HookEvent) -> HookResponse {
    match event {
        HookEvent::ToolCall { tool_name, params } => {
            match firewall.before_tool_call(tool_name, params) {
                ToolCallOutcome::Blocked { reason, .. } => HookResponse::block(reason),
                ToolCallOutcome::Allowed { params } => HookResponse::with_params(params),
            }
        }
        HookEvent::ToolResult { message } => match firewall.on_tool_result_persist(message) {
            Some(rewritten) => HookResponse::with_message(rewritten),
            None => HookResponse::allow(),
        },
        HookEvent::Message { content } => match firewall.on_message_sending(content) {
            Some(rewritten) => HookResponse::with_message(rewritten),
            None => HookResponse::allow(),
        },
        HookEvent::AgentStart => match firewall.agent_prompt_hint() {
            Some(hint) => HookResponse::with_prompt_hint(hint),
            None => HookResponse::allow(),
        },
    }
}
