use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::output::{CommandOutput, OutputHandler, QrInfo, RequestSummary};

const EPOCH_TIMESTAMP: &str = "1970-01-01T00:00:00Z";
const UNCLASSIFIED_CODE: u16 = 9000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentError {
    pub code: u16,
    pub name: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl AgentError {
    /// Used when a failed command carries no structured error in its payload.
    fn unclassified(output: &CommandOutput) -> Self {
        Self {
            code: UNCLASSIFIED_CODE,
            name: "UNCLASSIFIED_ERROR".to_string(),
            message: output.message.clone(),
            details: (!output.details.is_empty()).then(|| json!({ "messages": output.details })),
        }
    }
}

/// One JSON document per invocation on stdout.
#[derive(Debug, Serialize)]
struct AgentEnvelope<'a> {
    success: bool,
    payqr_version: &'static str,
    mode: &'static str,
    operation: &'a str,
    timestamp: &'a str,
    result: Option<&'a Value>,
    error: Option<AgentError>,
}

impl<'a> From<&'a CommandOutput> for AgentEnvelope<'a> {
    fn from(output: &'a CommandOutput) -> Self {
        let field = |name| payload_field(output, name);

        let error = match field("error").cloned().map(serde_json::from_value) {
            Some(Ok(error)) => Some(error),
            _ if !output.ok => Some(AgentError::unclassified(output)),
            _ => None,
        };

        Self {
            success: output.ok,
            payqr_version: env!("CARGO_PKG_VERSION"),
            mode: "agent",
            operation: &output.command,
            timestamp: field("timestamp")
                .and_then(Value::as_str)
                .unwrap_or(EPOCH_TIMESTAMP),
            result: field("result").filter(|value| !value.is_null()),
            error,
        }
    }
}

fn payload_field<'a>(output: &'a CommandOutput, name: &str) -> Option<&'a Value> {
    output.payload.as_ref()?.get(name)
}

/// Rebuilds every object with its keys in byte order.
fn canonicalize(value: Value) -> Value {
    match value {
        Value::Object(map) => map
            .into_iter()
            .map(|(key, value)| (key, canonicalize(value)))
            .collect::<BTreeMap<_, _>>()
            .into_iter()
            .collect(),
        Value::Array(items) => items.into_iter().map(canonicalize).collect(),
        scalar => scalar,
    }
}

pub(crate) fn render_agent_json(output: &CommandOutput) -> Result<String, serde_json::Error> {
    let value = serde_json::to_value(AgentEnvelope::from(output))?;
    serde_json::to_string_pretty(&canonicalize(value))
}

pub struct AgentOutputHandler;

impl AgentOutputHandler {
    pub fn new() -> Self {
        Self
    }
}

impl OutputHandler for AgentOutputHandler {
    fn start_operation(&mut self, _operation: &str) {}

    fn progress(&mut self, _message: &str) {}

    fn display_request_summary(&mut self, _summary: &RequestSummary) {}

    fn display_qr_info(&mut self, _info: &QrInfo) {}

    fn complete(&mut self, output: &CommandOutput) {
        let rendered = render_agent_json(output).unwrap_or_else(|err| {
            json!({
                "error": {
                    "code": UNCLASSIFIED_CODE,
                    "message": format!("failed to serialize response: {err}"),
                    "name": "UNCLASSIFIED_ERROR",
                },
                "mode": "agent",
                "operation": output.command,
                "payqr_version": env!("CARGO_PKG_VERSION"),
                "result": null,
                "success": false,
                "timestamp": EPOCH_TIMESTAMP,
            })
            .to_string()
        });
        println!("{rendered}");
    }
}
