use std::fs;
use std::path::{Path, PathBuf};

use chrono::{SecondsFormat, Utc};
use payqr_core::{PaymentQr, QrPngRenderer, RenderOptions};
use serde_json::json;
use sha2::{Digest, Sha256};
use tracing::info;

use crate::commands::{read_request, request_summary, uri_to_agent_result, CommandOptions};
use crate::output::{CommandOutput, OutputHandler, QrInfo};

pub const QR_FILENAME: &str = "qr.png";
pub const MANIFEST_FILENAME: &str = "qr-manifest.json";

pub async fn run(
    file: &Path,
    output_dir: Option<&Path>,
    render_options: RenderOptions,
    options: &CommandOptions,
    output: &mut dyn OutputHandler,
) -> payqr_core::Result<CommandOutput> {
    output.progress(&format!("generating QR for {}", file.display()));

    let request = read_request(file, options)?;
    let uri = request.to_uri_with(options.value_encoding);
    output.display_request_summary(&request_summary(&request, &uri));

    let qr = PaymentQr::new(QrPngRenderer::new(render_options))
        .with_value_encoding(options.value_encoding);
    let image = qr.generate(&request).await?;

    let output_root = resolve_output_dir(file, output_dir);
    fs::create_dir_all(&output_root)?;

    let png_path = output_root.join(QR_FILENAME);
    fs::write(&png_path, &image.png_bytes)?;
    let png_file = png_path.to_string_lossy().to_string();

    output.display_qr_info(&QrInfo {
        width: image.width,
        height: image.height,
        payload_bytes: uri.len(),
        png_file: png_file.clone(),
    });

    let created_at = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
    let manifest = json!({
        "chain": request.chain().as_str(),
        "uri": uri,
        "payloadBytes": uri.len(),
        "payloadHash": payload_hash(&uri),
        "createdAt": created_at,
        "pngFile": QR_FILENAME,
        "width": image.width,
        "height": image.height,
    });
    let manifest_path = output_root.join(MANIFEST_FILENAME);
    fs::write(&manifest_path, serde_json::to_string_pretty(&manifest)?)?;

    info!(
        chain = %request.chain(),
        png = %png_path.display(),
        "wrote payment qr artifacts"
    );

    let payload = json!({
        "result": uri_to_agent_result(&request, &uri),
        "timestamp": created_at,
        "artifacts": {
            "qrFile": png_file,
            "manifestFile": manifest_path.to_string_lossy().to_string(),
        },
    });

    Ok(CommandOutput::success(
        "generate",
        "generation completed",
        Vec::new(),
        Some(payload),
    ))
}

/// Lowercase hex SHA-256 of the URI text.
pub fn payload_hash(uri: &str) -> String {
    format!("{:x}", Sha256::digest(uri.as_bytes()))
}

fn resolve_output_dir(input_file: &Path, output_dir: Option<&Path>) -> PathBuf {
    if let Some(path) = output_dir {
        return path.to_path_buf();
    }

    input_file
        .parent()
        .map(|parent| parent.join("payqr-output"))
        .unwrap_or_else(|| PathBuf::from("payqr-output"))
}
