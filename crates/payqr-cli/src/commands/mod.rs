pub mod generate;
pub mod uri;

use std::path::Path;

use payqr_core::validation::validate_request;
use payqr_core::{PayQrError, PaymentRequest, ValueEncoding};
use serde_json::json;
use tracing::debug;

use crate::output::RequestSummary;

/// Settings shared by every subcommand, taken from the global CLI flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandOptions {
    pub validate: bool,
    pub value_encoding: ValueEncoding,
}

impl Default for CommandOptions {
    fn default() -> Self {
        Self {
            validate: true,
            value_encoding: ValueEncoding::default(),
        }
    }
}

pub(crate) fn read_request(
    file: &Path,
    options: &CommandOptions,
) -> Result<PaymentRequest, PayQrError> {
    let bytes = std::fs::read(file)?;
    let request: PaymentRequest = serde_json::from_slice(&bytes)?;
    if options.validate {
        validate_request(&request)?;
    }

    debug!(chain = %request.chain(), file = %file.display(), "loaded payment request");
    Ok(request)
}

pub(crate) fn request_summary(request: &PaymentRequest, uri: &str) -> RequestSummary {
    RequestSummary {
        chain: request.chain().to_string(),
        recipient: request.recipient().to_string(),
        payload_bytes: uri.len(),
    }
}

pub(crate) fn uri_to_agent_result(request: &PaymentRequest, uri: &str) -> serde_json::Value {
    json!({
        "chain": request.chain().as_str(),
        "scheme": request.chain().scheme(),
        "to": request.recipient(),
        "uri": uri,
        "payloadBytes": uri.len(),
    })
}
