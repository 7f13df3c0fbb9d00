//! Variant run state and request shaping.
//!
//! A [`RunController`] tracks one run at a time. Every run gets a
//! [`RunTicket`]; the backend registers the request under the ticket id so a
//! cancel can abort it, and results arriving for a ticket that is no longer in
//! flight are dropped.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use super::enhanced::{next_id, next_sequence};
use super::parameter::Parameter;

const DEBUG_DOCS_URL: &str = "https://docs.agenta.ai/docs/howto/how-to-debug";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunTicket(u64);

impl RunTicket {
    pub fn id(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Idle,
    Running,
}

/// How the last run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Succeeded,
    Failed,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum RunDisplay {
    #[default]
    Empty,
    Output(String),
    Error(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    Succeeded(String),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RunError {
    #[error("A run is already in progress")]
    AlreadyRunning,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct RunController {
    in_flight: Option<RunTicket>,
    display: RunDisplay,
    before_run: RunDisplay,
    last_status: Option<RunStatus>,
}

impl RunController {
    pub fn phase(&self) -> RunPhase {
        if self.in_flight.is_some() {
            RunPhase::Running
        } else {
            RunPhase::Idle
        }
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    /// True while `ticket` is the run in flight.
    pub fn is_in_flight(&self, ticket: RunTicket) -> bool {
        self.in_flight == Some(ticket)
    }

    pub fn display(&self) -> &RunDisplay {
        &self.display
    }

    pub fn last_status(&self) -> Option<RunStatus> {
        self.last_status
    }

    /// Enter `Running`, clearing the displayed output. A second start while a
    /// run is in flight is rejected; it never cancels the first one.
    pub fn start(&mut self) -> Result<RunTicket, RunError> {
        if self.in_flight.is_some() {
            return Err(RunError::AlreadyRunning);
        }
        let ticket = RunTicket(next_sequence());
        self.before_run = std::mem::take(&mut self.display);
        self.in_flight = Some(ticket);
        self.last_status = None;
        Ok(ticket)
    }

    /// Apply a finished run. Returns false, changing nothing, when `ticket`
    /// is not the run in flight (cancelled or superseded).
    pub fn settle(&mut self, ticket: RunTicket, outcome: RunOutcome) -> bool {
        if self.in_flight != Some(ticket) {
            return false;
        }
        self.in_flight = None;
        self.before_run = RunDisplay::Empty;
        let (display, status) = match outcome {
            RunOutcome::Succeeded(output) => (RunDisplay::Output(output), RunStatus::Succeeded),
            RunOutcome::Failed(error) => (RunDisplay::Error(error), RunStatus::Failed),
        };
        self.display = display;
        self.last_status = Some(status);
        true
    }

    /// Drop the run in flight and restore what was shown before it started.
    /// Returns the ticket so the caller can abort the request.
    pub fn cancel(&mut self) -> Option<RunTicket> {
        let ticket = self.in_flight.take()?;
        self.display = std::mem::take(&mut self.before_run);
        self.last_status = Some(RunStatus::Cancelled);
        Some(ticket)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

impl ChatRole {
    pub const ALL: [ChatRole; 3] = [ChatRole::System, ChatRole::User, ChatRole::Assistant];

    pub fn as_str(self) -> &'static str {
        match self {
            ChatRole::System => "system",
            ChatRole::User => "user",
            ChatRole::Assistant => "assistant",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.as_str() == s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    #[serde(skip, default = "chat_message_id")]
    pub id: String,
    pub role: ChatRole,
    pub content: String,
}

fn chat_message_id() -> String {
    next_id("msg")
}

impl ChatMessage {
    pub fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            id: chat_message_id(),
            role,
            content: content.into(),
        }
    }
}

/// JSON body for `POST {uri}/generate`.
///
/// Option values go first, then one entry per input parameter (typed value or
/// the parameter default). A non-empty chat history is sent under `inputs`.
pub fn build_request_body(
    inputs: &Map<String, Value>,
    input_params: &[Parameter],
    options: &Map<String, Value>,
    chat_history: &[ChatMessage],
) -> Value {
    let mut body = options.clone();
    for param in input_params {
        let value = inputs
            .get(&param.name)
            .cloned()
            .unwrap_or_else(|| param.default.clone());
        body.insert(param.name.clone(), value);
    }
    if !chat_history.is_empty() {
        let messages = chat_history
            .iter()
            .map(|m| serde_json::json!({ "role": m.role.as_str(), "content": m.content }))
            .collect();
        body.insert("inputs".to_string(), Value::Array(messages));
    }
    Value::Object(body)
}

/// Text shown for a run result.
pub fn format_run_result(result: &Value) -> String {
    match result {
        Value::String(s) => s.clone(),
        Value::Object(map) => match (map.get("message"), map.get("data")) {
            (Some(Value::String(message)), _) => message.clone(),
            (_, Some(Value::String(data))) => data.clone(),
            (_, Some(data)) => serde_json::to_string_pretty(data).unwrap_or_default(),
            _ => serde_json::to_string_pretty(result).unwrap_or_default(),
        },
        Value::Null => String::new(),
        other => serde_json::to_string_pretty(other).unwrap_or_default(),
    }
}

/// Error text used by the test view: the raw error plus how to recover.
pub fn serve_error_message(error: &str) -> String {
    format!(
        "The code has resulted in the following error: \n\n --------------------- \n{}\n---------------------\n\n\
         Please update your code, and re-serve it using cli and try again.\n\n\
         For more information please read {}",
        error, DEBUG_DOCS_URL
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::playground::parameter::ParameterType;
    use serde_json::json;

    fn input(name: &str, default: Value) -> Parameter {
        Parameter {
            name: name.to_string(),
            input: true,
            kind: ParameterType::String,
            default,
            options: vec![],
            choices: None,
            minimum: 0.0,
            maximum: 1.0,
            required: false,
        }
    }

    #[test]
    fn test_start_clears_output_and_sets_loading() {
        let mut run = RunController::default();
        let first = run.start().unwrap();
        assert!(run.settle(first, RunOutcome::Succeeded("hello".into())));
        assert_eq!(run.display(), &RunDisplay::Output("hello".into()));

        let _second = run.start().unwrap();
        assert_eq!(run.phase(), RunPhase::Running);
        assert!(run.is_loading());
        assert_eq!(run.display(), &RunDisplay::Empty);
    }

    #[test]
    fn test_second_start_rejected_without_cancelling() {
        let mut run = RunController::default();
        let ticket = run.start().unwrap();
        assert_eq!(run.start(), Err(RunError::AlreadyRunning));
        assert!(run.settle(ticket, RunOutcome::Succeeded("ok".into())));
        assert_eq!(run.last_status(), Some(RunStatus::Succeeded));
    }

    #[test]
    fn test_failure_captured_verbatim() {
        let mut run = RunController::default();
        let ticket = run.start().unwrap();
        run.settle(ticket, RunOutcome::Failed("API error (500): boom".into()));
        assert_eq!(run.phase(), RunPhase::Idle);
        assert!(!run.is_loading());
        assert_eq!(run.display(), &RunDisplay::Error("API error (500): boom".into()));
        assert_eq!(run.last_status(), Some(RunStatus::Failed));
    }

    #[test]
    fn test_cancel_before_response_restores_previous_display() {
        let mut run = RunController::default();
        let first = run.start().unwrap();
        run.settle(first, RunOutcome::Succeeded("previous answer".into()));

        let second = run.start().unwrap();
        assert!(run.is_in_flight(second));
        assert_eq!(run.cancel(), Some(second));
        assert!(!run.is_in_flight(second));
        assert_eq!(run.phase(), RunPhase::Idle);
        assert_eq!(run.display(), &RunDisplay::Output("previous answer".into()));
        assert_eq!(run.last_status(), Some(RunStatus::Cancelled));

        // the late response is dropped
        assert!(!run.settle(second, RunOutcome::Succeeded("late".into())));
        assert_eq!(run.display(), &RunDisplay::Output("previous answer".into()));
    }

    #[test]
    fn test_cancel_when_idle_is_noop() {
        let mut run = RunController::default();
        assert_eq!(run.cancel(), None);
        assert_eq!(run.last_status(), None);
    }

    #[test]
    fn test_tickets_are_unique() {
        let mut run = RunController::default();
        let a = run.start().unwrap();
        run.cancel();
        let b = run.start().unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_build_request_body() {
        let mut inputs = Map::new();
        inputs.insert("country".into(), json!("France"));
        let mut options = Map::new();
        options.insert("temperature".into(), json!(0.3));

        let body = build_request_body(
            &inputs,
            &[input("country", Value::Null), input("language", json!("en"))],
            &options,
            &[],
        );
        assert_eq!(
            body,
            json!({ "temperature": 0.3, "country": "France", "language": "en" })
        );
    }

    #[test]
    fn test_build_request_body_with_chat() {
        let history = vec![
            ChatMessage::new(ChatRole::System, "You are terse."),
            ChatMessage::new(ChatRole::User, "Hi"),
        ];
        let body = build_request_body(&Map::new(), &[input("inputs", Value::Null)], &Map::new(), &history);
        assert_eq!(
            body["inputs"],
            json!([
                { "role": "system", "content": "You are terse." },
                { "role": "user", "content": "Hi" }
            ])
        );
    }

    #[test]
    fn test_format_run_result() {
        assert_eq!(format_run_result(&json!("plain")), "plain");
        assert_eq!(
            format_run_result(&json!({ "message": "from message", "cost": 0.1 })),
            "from message"
        );
        assert_eq!(format_run_result(&json!({ "data": "from data" })), "from data");
        assert_eq!(format_run_result(&json!([1, 2])), "[\n  1,\n  2\n]");
        assert_eq!(format_run_result(&Value::Null), "");
    }

    #[test]
    fn test_serve_error_message_keeps_raw_error() {
        let text = serve_error_message("ConnectionRefused");
        assert!(text.contains("ConnectionRefused"));
        assert!(text.contains(DEBUG_DOCS_URL));
    }

    #[test]
    fn test_chat_role_parse() {
        assert_eq!(ChatRole::parse("assistant"), Some(ChatRole::Assistant));
        assert_eq!(ChatRole::parse("tool"), None);
    }
}
