use std::time::Duration;

use colored::Colorize;
use comfy_table::{presets::ASCII_BORDERS_ONLY, ContentArrangement, Table};
use indicatif::{ProgressBar, ProgressStyle};

use crate::output::{CommandOutput, OutputHandler, QrInfo, RequestSummary};

const SPINNER_TICKS: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
const SPINNER_TICK_MS: u64 = 80;
const RECIPIENT_TRUNCATE_LEN: usize = 24;

pub struct OperatorOutput {
    quiet: bool,
    no_color: bool,
    spinner: Option<ProgressBar>,
}

impl OperatorOutput {
    pub fn new(quiet: bool, no_color: bool) -> Self {
        Self {
            quiet,
            no_color,
            spinner: None,
        }
    }

    fn success_text(&self, text: &str) -> String {
        if self.no_color {
            text.to_string()
        } else {
            text.green().to_string()
        }
    }

    fn error_text(&self, text: &str) -> String {
        if self.no_color {
            text.to_string()
        } else {
            text.red().to_string()
        }
    }

    fn highlight_text(&self, text: &str) -> String {
        if self.no_color {
            text.to_string()
        } else {
            text.cyan().bold().to_string()
        }
    }

    fn start_spinner(&mut self, operation: &str) {
        if self.quiet {
            return;
        }

        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
            spinner.set_style(style.tick_strings(&SPINNER_TICKS));
        }
        spinner.set_message(format!("{operation}..."));
        spinner.enable_steady_tick(Duration::from_millis(SPINNER_TICK_MS));
        self.spinner = Some(spinner);
    }

    fn stop_spinner(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }

    fn truncate(value: &str, max_len: usize) -> String {
        let mut chars = value.chars();
        let truncated: String = chars.by_ref().take(max_len).collect();
        if chars.next().is_some() {
            format!("{truncated}...")
        } else {
            truncated
        }
    }

    pub fn render_summary_table(summary: &RequestSummary) -> String {
        let mut table = Table::new();
        table
            .load_preset(ASCII_BORDERS_ONLY)
            .set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(vec!["Chain", "Recipient", "URI bytes"]);
        table.add_row(vec![
            summary.chain.clone(),
            Self::truncate(&summary.recipient, RECIPIENT_TRUNCATE_LEN),
            summary.payload_bytes.to_string(),
        ]);
        table.to_string()
    }

    fn suggestion_for_error(error: &str) -> &'static str {
        let lowered = error.to_ascii_lowercase();
        if lowered.contains("recipient") {
            "Suggestion: set a non-empty `to` address in the request file."
        } else if lowered.contains("json") {
            "Suggestion: check the request file is JSON with a \"chain\" of eth, btc or sol."
        } else if lowered.contains("too long") || lowered.contains("payload") {
            "Suggestion: shorten memo/args fields or lower the error-correction level."
        } else if lowered.contains("negative") {
            "Suggestion: amounts must be zero or positive."
        } else {
            "Suggestion: review the request fields and retry."
        }
    }

    pub fn format_error(message: &str) -> String {
        format!("{message}\n  {}", Self::suggestion_for_error(message))
    }
}

impl OutputHandler for OperatorOutput {
    fn start_operation(&mut self, operation: &str) {
        self.start_spinner(operation);
    }

    fn progress(&mut self, message: &str) {
        if self.quiet {
            return;
        }

        if let Some(spinner) = &self.spinner {
            spinner.set_message(message.to_string());
        } else {
            println!("{message}");
        }
    }

    fn display_request_summary(&mut self, summary: &RequestSummary) {
        if self.quiet {
            return;
        }

        self.stop_spinner();
        println!("{}", Self::render_summary_table(summary));
    }

    fn display_qr_info(&mut self, info: &QrInfo) {
        if self.quiet {
            return;
        }

        self.stop_spinner();
        println!(
            "QR written to {} ({}x{} px, {} bytes encoded)",
            info.png_file, info.width, info.height, info.payload_bytes
        );
    }

    fn complete(&mut self, output: &CommandOutput) {
        self.stop_spinner();

        if !output.ok {
            eprintln!("{}", self.error_text(&Self::format_error(&output.message)));
            for detail in &output.details {
                eprintln!("{detail}");
            }
            return;
        }

        if let Some(uri) = output
            .payload
            .as_ref()
            .and_then(|payload| payload.pointer("/result/uri"))
            .and_then(|uri| uri.as_str())
        {
            println!("{}", self.highlight_text(uri));
        }

        if self.quiet {
            return;
        }

        println!("{}", self.success_text(&output.message));
        for detail in &output.details {
            println!("{detail}");
        }
    }
}
