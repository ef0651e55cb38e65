mod agent;
mod commands;
mod mode;
mod operator;
mod output;

use std::path::PathBuf;

use chrono::{SecondsFormat, Utc};
use clap::{error::ErrorKind, Parser, Subcommand, ValueEnum};
use payqr_core::eth::MAX_BASE_UNIT_DECIMALS;
use payqr_core::render::MIN_QR_DIMENSION;
use payqr_core::{PayQrError, RenderOptions, ValueEncoding};
use serde_json::json;
use tracing_subscriber::EnvFilter;

use commands::CommandOptions;
use mode::Mode;
use output::{CommandOutput, OutputHandler};

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
enum OutputFormat {
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "payqr", version, about = "Payment-request URI and QR code generator")]
struct Cli {
    #[arg(long = "output", value_enum, global = true)]
    output_format: Option<OutputFormat>,

    #[arg(long, global = true)]
    quiet: bool,

    #[arg(long = "no-color", global = true)]
    no_color: bool,

    /// Skip request checks and build whatever the file describes.
    #[arg(long = "no-validate", global = true)]
    no_validate: bool,

    /// Write ETH `value` as integer base units with this many decimals (18 for wei).
    #[arg(
        long = "eth-decimals",
        global = true,
        value_parser = clap::value_parser!(u32).range(0..=i64::from(MAX_BASE_UNIT_DECIMALS))
    )]
    eth_decimals: Option<u32>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Subcommand)]
enum Commands {
    /// Print the payment URI for a JSON request file.
    Uri { file: PathBuf },
    /// Render the payment URI as a PNG QR code.
    Generate {
        file: PathBuf,
        #[arg(long)]
        output_dir: Option<PathBuf>,
        #[arg(long, default_value_t = MIN_QR_DIMENSION)]
        size: u32,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExitCode {
    Success = 0,
    ValidationError = 1,
    ConfigError = 2,
    IoError = 3,
    InternalError = 4,
}

impl ExitCode {
    const fn as_i32(self) -> i32 {
        self as i32
    }
}

#[derive(Debug)]
enum CliError {
    Core(PayQrError),
    Usage { code: u16, message: String },
}

impl From<PayQrError> for CliError {
    fn from(value: PayQrError) -> Self {
        Self::Core(value)
    }
}

impl Cli {
    fn command_options(&self) -> CommandOptions {
        CommandOptions {
            validate: !self.no_validate,
            value_encoding: match self.eth_decimals {
                Some(decimals) => ValueEncoding::BaseUnits { decimals },
                None => ValueEncoding::Exponentiated,
            },
        }
    }
}

fn init_tracing(quiet: bool) {
    let default_level = if quiet { "error" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn build_output_handler(mode: Mode, quiet: bool, no_color: bool) -> Box<dyn OutputHandler> {
    match mode {
        Mode::Operator => Box::new(operator::OperatorOutput::new(quiet, no_color)),
        Mode::Agent => Box::new(agent::AgentOutputHandler::new()),
    }
}

fn command_label(command: &Commands) -> &'static str {
    match command {
        Commands::Uri { .. } => "uri",
        Commands::Generate { .. } => "generate",
    }
}

fn detect_mode_from_raw_args(args: &[String]) -> Mode {
    let mut output_json = false;

    let mut index = 1;
    while index < args.len() {
        let arg = &args[index];
        if arg == "--output" {
            if args
                .get(index + 1)
                .is_some_and(|value| value.eq_ignore_ascii_case("json"))
            {
                output_json = true;
            }
            index += 2;
            continue;
        }
        if arg.eq_ignore_ascii_case("--output=json") {
            output_json = true;
        }
        index += 1;
    }

    mode::detect_mode(output_json)
}

fn infer_operation_from_raw_args(args: &[String]) -> &'static str {
    for arg in args.iter().skip(1) {
        match arg.as_str() {
            "uri" => return "uri",
            "generate" => return "generate",
            _ => {}
        }
    }
    "uri"
}

fn clap_error_to_cli_error(err: &clap::Error) -> CliError {
    let code = match err.kind() {
        ErrorKind::ArgumentConflict
        | ErrorKind::UnknownArgument
        | ErrorKind::InvalidValue
        | ErrorKind::ValueValidation
        | ErrorKind::TooManyValues => 2002,
        _ => 2001,
    };
    CliError::Usage {
        code,
        message: err.to_string().trim().to_string(),
    }
}

async fn dispatch(
    cli: &Cli,
    output: &mut dyn OutputHandler,
) -> std::result::Result<CommandOutput, CliError> {
    let options = cli.command_options();
    match &cli.command {
        Commands::Uri { file } => commands::uri::run(file, &options, output).map_err(CliError::from),
        Commands::Generate {
            file,
            output_dir,
            size,
        } => {
            let render_options = RenderOptions {
                min_dimension: *size,
                ..RenderOptions::default()
            };
            commands::generate::run(file, output_dir.as_deref(), render_options, &options, output)
                .await
                .map_err(CliError::from)
        }
    }
}

fn exit_code_for_error(err: &CliError) -> ExitCode {
    match err {
        CliError::Core(PayQrError::Validation { .. }) => ExitCode::ValidationError,
        CliError::Core(PayQrError::Json(_)) | CliError::Usage { .. } => ExitCode::ConfigError,
        CliError::Core(PayQrError::Io(_)) => ExitCode::IoError,
        CliError::Core(PayQrError::Render { .. }) => ExitCode::InternalError,
    }
}

fn cli_error_to_agent_error(err: &CliError) -> agent::AgentError {
    match err {
        CliError::Core(core) => {
            let (code, name) = match core {
                PayQrError::Validation { code, .. } => (code.code(), code.name()),
                PayQrError::Render { code, .. } => (code.code(), code.name()),
                PayQrError::Io(_) => (3001, "IO_ERROR"),
                PayQrError::Json(_) => (2005, "INVALID_JSON_INPUT"),
            };
            agent::AgentError {
                code,
                name: name.to_string(),
                message: core.to_string(),
                details: Some(json!({ "raw": core.to_string() })),
            }
        }
        CliError::Usage { code, message } => agent::AgentError {
            code: *code,
            name: if *code == 2002 {
                "INVALID_FLAG_COMBINATION".to_string()
            } else {
                "MISSING_REQUIRED_ARGUMENT".to_string()
            },
            message: message.clone(),
            details: None,
        },
    }
}

fn output_from_error(err: &CliError, command: &str) -> CommandOutput {
    let agent_error = cli_error_to_agent_error(err);
    let mut output = match err {
        CliError::Core(core) => CommandOutput::from_core_error(core, command),
        CliError::Usage { message, .. } => CommandOutput {
            ok: false,
            command: command.to_string(),
            message: message.clone(),
            details: Vec::new(),
            payload: None,
        },
    };
    output.payload = Some(json!({
        "error": agent_error,
        "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
    }));
    output
}

async fn run(cli: Cli) -> ExitCode {
    let output_json = matches!(cli.output_format, Some(OutputFormat::Json));
    let mode = mode::detect_mode(output_json);
    let mut output = build_output_handler(mode, cli.quiet, cli.no_color);
    let command = command_label(&cli.command);

    output.start_operation(command);
    match dispatch(&cli, output.as_mut()).await {
        Ok(result) => {
            output.complete(&result);
            ExitCode::Success
        }
        Err(err) => {
            tracing::warn!(error = ?err, "{command} failed");
            output.complete(&output_from_error(&err, command));
            exit_code_for_error(&err)
        }
    }
}

#[tokio::main]
async fn main() {
    let raw_args: Vec<String> = std::env::args().collect();
    let detected_mode = detect_mode_from_raw_args(&raw_args);
    let cli = match Cli::try_parse_from(&raw_args) {
        Ok(parsed) => parsed,
        Err(err) => {
            if matches!(
                err.kind(),
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion
            ) {
                let _ = err.print();
                std::process::exit(0);
            }

            if detected_mode == Mode::Agent {
                let cli_error = clap_error_to_cli_error(&err);
                let operation = infer_operation_from_raw_args(&raw_args);
                let mut output = agent::AgentOutputHandler::new();
                output.complete(&output_from_error(&cli_error, operation));
                std::process::exit(exit_code_for_error(&cli_error).as_i32());
            }

            let _ = err.print();
            std::process::exit(ExitCode::ConfigError.as_i32());
        }
    };

    init_tracing(cli.quiet);
    let code = run(cli).await;
    std::process::exit(code.as_i32());
}
