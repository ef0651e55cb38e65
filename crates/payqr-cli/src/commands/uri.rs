use std::path::Path;

use serde_json::json;

use crate::commands::{read_request, request_summary, uri_to_agent_result, CommandOptions};
use crate::output::{CommandOutput, OutputHandler};

pub fn run(
    file: &Path,
    options: &CommandOptions,
    output: &mut dyn OutputHandler,
) -> payqr_core::Result<CommandOutput> {
    output.progress(&format!("building uri from {}", file.display()));

    let request = read_request(file, options)?;
    let uri = request.to_uri_with(options.value_encoding);
    output.display_request_summary(&request_summary(&request, &uri));

    let payload = json!({
        "result": uri_to_agent_result(&request, &uri),
        "timestamp": chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
    });

    Ok(CommandOutput::success(
        "uri",
        "uri built",
        Vec::new(),
        Some(payload),
    ))
}
