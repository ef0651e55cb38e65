use serde::Serialize;

use payqr_core::PayQrError;

#[derive(Debug, Clone, Serialize)]
pub struct CommandOutput {
    pub ok: bool,
    pub command: String,
    pub message: String,
    pub details: Vec<String>,
    pub payload: Option<serde_json::Value>,
}

impl CommandOutput {
    pub fn success(
        command: &str,
        message: &str,
        details: Vec<String>,
        payload: Option<serde_json::Value>,
    ) -> Self {
        Self {
            ok: true,
            command: command.to_string(),
            message: message.to_string(),
            details,
            payload,
        }
    }

    pub fn from_core_error(err: &PayQrError, command: &str) -> Self {
        Self {
            ok: false,
            command: command.to_string(),
            message: err.to_string(),
            details: Vec::new(),
            payload: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestSummary {
    pub chain: String,
    pub recipient: String,
    pub payload_bytes: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrInfo {
    pub width: u32,
    pub height: u32,
    pub payload_bytes: usize,
    pub png_file: String,
}

pub trait OutputHandler {
    fn start_operation(&mut self, operation: &str);
    fn progress(&mut self, message: &str);
    fn display_request_summary(&mut self, summary: &RequestSummary);
    fn display_qr_info(&mut self, info: &QrInfo);
    fn complete(&mut self, output: &CommandOutput);
}
