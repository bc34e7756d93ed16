//! Motion CLI - Command-line interface for Synheart Motion
//!
//! Commands:
//! - process: Run frame records through the full pipeline and emit motion payloads
//! - validate: Check record schemas and body plausibility without motion analysis
//! - profile: Print the configuration of a named profile
//! - doctor: Diagnose configuration and environment

use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use synheart_motion::config::{ConfigProfile, PipelineConfig};
use synheart_motion::encoder::{MotionEncoder, MotionPayload, PAYLOAD_SCHEMA_VERSION};
use synheart_motion::pipeline::PoseProcessor;
use synheart_motion::schema::{FrameRecord, FrameRecordAdapter, SCHEMA_VERSION};
use synheart_motion::validation::HumanPlausibilityValidator;
use synheart_motion::{MotionError, MOTION_VERSION, PRODUCER_NAME};

/// Motion - On-device engine for validated body-motion signals
#[derive(Parser)]
#[command(name = "motion")]
#[command(author = "Synheart AI Inc")]
#[command(version = MOTION_VERSION)]
#[command(about = "Turn body-landmark streams into validated motion signals", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process frame records into motion payloads
    Process {
        /// Input file path (use - for stdin)
        #[arg(short, long, default_value = "-")]
        input: PathBuf,

        /// Output file path (use - for stdout)
        #[arg(short, long, default_value = "-")]
        output: PathBuf,

        /// Input format
        #[arg(long, default_value = "ndjson")]
        input_format: InputFormat,

        /// Output format
        #[arg(long, default_value = "ndjson")]
        output_format: OutputFormat,

        /// Named configuration profile (default, strict, lenient, raw)
        #[arg(long, default_value = "default")]
        profile: ConfigProfile,

        /// JSON pipeline configuration; overrides --profile
        #[arg(long)]
        config: Option<PathBuf>,

        /// Write the session metrics to this file after processing
        #[arg(long)]
        summary: Option<PathBuf>,
    },

    /// Validate record schemas and body plausibility
    Validate {
        /// Input file path (use - for stdin)
        #[arg(short, long, default_value = "-")]
        input: PathBuf,

        /// Input format
        #[arg(long, default_value = "ndjson")]
        input_format: InputFormat,

        /// Named configuration profile
        #[arg(long, default_value = "default")]
        profile: ConfigProfile,

        /// Output validation report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the configuration of a named profile
    Profile {
        /// Profile name (default, strict, lenient, raw)
        name: ConfigProfile,
    },

    /// Diagnose configuration and environment
    Doctor {
        /// Check a JSON pipeline configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, ValueEnum)]
enum InputFormat {
    /// Newline-delimited JSON (one record per line)
    Ndjson,
    /// JSON array of records
    Json,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Newline-delimited JSON (one payload per line)
    Ndjson,
    /// JSON array of payloads
    Json,
    /// Pretty-printed JSON
    JsonPretty,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!(
                "{}",
                serde_json::to_string(&CliError::from(e))
                    .unwrap_or_else(|_| "Unknown error".to_string())
            );
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), MotionCliError> {
    match cli.command {
        Commands::Process {
            input,
            output,
            input_format,
            output_format,
            profile,
            config,
            summary,
        } => cmd_process(
            &input,
            &output,
            input_format,
            output_format,
            profile,
            config.as_deref(),
            summary.as_deref(),
        ),

        Commands::Validate {
            input,
            input_format,
            profile,
            json,
        } => cmd_validate(&input, input_format, profile, json),

        Commands::Profile { name } => cmd_profile(name),

        Commands::Doctor { config, json } => cmd_doctor(config.as_deref(), json),
    }
}

fn cmd_process(
    input: &Path,
    output: &Path,
    input_format: InputFormat,
    output_format: OutputFormat,
    profile: ConfigProfile,
    config: Option<&Path>,
    summary: Option<&Path>,
) -> Result<(), MotionCliError> {
    let records = read_records(input, &input_format)?;
    if records.is_empty() {
        return Err(MotionCliError::NoRecords);
    }

    let config = match config {
        Some(path) => PipelineConfig::from_json(&fs::read_to_string(path)?)?,
        None => profile.config(),
    };

    let mut processor = PoseProcessor::new(config)?;
    let encoder = MotionEncoder::new();
    let mut payloads: Vec<MotionPayload> = Vec::with_capacity(records.len());
    let mut halted = None;

    for record in &records {
        match processor.process_record(record) {
            Ok(outcome) => payloads.push(encoder.encode(processor.session_id(), &outcome)),
            Err(e @ MotionError::SessionFatal { .. }) => {
                halted = Some(e);
                break;
            }
            // Already counted and logged by the processor
            Err(_) => continue,
        }
    }

    let output_data = format_output(&payloads, &output_format)?;
    if output.to_string_lossy() == "-" {
        let mut stdout = io::stdout();
        write!(stdout, "{}", output_data)?;
        stdout.flush()?;
    } else {
        fs::write(output, output_data)?;
    }

    if let Some(summary_path) = summary {
        let metrics = serde_json::to_string_pretty(&processor.metrics())?;
        fs::write(summary_path, metrics)?;
    }

    match halted {
        Some(e) => Err(e.into()),
        None => Ok(()),
    }
}

fn cmd_validate(
    input: &Path,
    input_format: InputFormat,
    profile: ConfigProfile,
    json: bool,
) -> Result<(), MotionCliError> {
    let records = read_records(input, &input_format)?;
    let schema_errors = FrameRecordAdapter::validate_records(&records);

    let mut validator = HumanPlausibilityValidator::new(profile.config().validator);
    let mut last_capture = None;
    let mut rejections = Vec::new();
    let mut detected = 0;
    let mut plausible = 0;

    for record in &records {
        if !record.has_detection() || record.validate().is_err() {
            continue;
        }
        let frame = FrameRecordAdapter::to_frame(record, last_capture)?.to_normalized();
        last_capture = Some(record.capture_time_micros);
        detected += 1;

        let result = validator.validate(&frame);
        if result.is_valid {
            plausible += 1;
        } else if let Some(reason) = result.primary_rejection() {
            rejections.push(RejectionDetail {
                frame_index: record.frame_index,
                check: reason.check.as_str().to_string(),
                message: reason.message.clone(),
                score: result.weighted_score,
            });
        }
    }

    let report = ValidationReport {
        profile: profile.to_string(),
        total_records: records.len(),
        schema_errors: schema_errors
            .iter()
            .map(|r| SchemaErrorDetail {
                index: r.index,
                frame_index: r.frame_index,
                error: r.result.as_ref().map(|e| e.to_string()).unwrap_or_default(),
            })
            .collect(),
        detected_frames: detected,
        plausible_frames: plausible,
        rejected_frames: rejections.len(),
        rejections,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Validation Report ({} profile)", report.profile);
        println!("=================");
        println!("Total records:    {}", report.total_records);
        println!("Schema errors:    {}", report.schema_errors.len());
        println!("Detected frames:  {}", report.detected_frames);
        println!("Plausible frames: {}", report.plausible_frames);
        println!("Rejected frames:  {}", report.rejected_frames);

        if !report.schema_errors.is_empty() {
            println!("\nSchema errors:");
            for err in &report.schema_errors {
                println!(
                    "  - Frame {} (index {}): {}",
                    err.frame_index, err.index, err.error
                );
            }
        }

        if !report.rejections.is_empty() {
            println!("\nRejections:");
            for rejection in &report.rejections {
                println!(
                    "  - Frame {} [{} / score {:.2}]: {}",
                    rejection.frame_index, rejection.check, rejection.score, rejection.message
                );
            }
        }
    }

    if report.schema_errors.is_empty() {
        Ok(())
    } else {
        Err(MotionCliError::ValidationFailed(report.schema_errors.len()))
    }
}

fn cmd_profile(name: ConfigProfile) -> Result<(), MotionCliError> {
    println!("{}", name.config().to_json()?);
    Ok(())
}

fn cmd_doctor(config: Option<&Path>, json: bool) -> Result<(), MotionCliError> {
    let mut checks: Vec<DoctorCheck> = vec![
        DoctorCheck {
            name: "motion_version".to_string(),
            status: CheckStatus::Ok,
            message: format!("Motion version {}", MOTION_VERSION),
        },
        DoctorCheck {
            name: "schema_version".to_string(),
            status: CheckStatus::Ok,
            message: format!(
                "Input schema: {}, output schema: {}",
                SCHEMA_VERSION, PAYLOAD_SCHEMA_VERSION
            ),
        },
    ];

    for profile in ConfigProfile::ALL {
        let check = match profile.config().validate() {
            Ok(()) => DoctorCheck {
                name: format!("profile_{}", profile),
                status: CheckStatus::Ok,
                message: "Profile configuration valid".to_string(),
            },
            Err(e) => DoctorCheck {
                name: format!("profile_{}", profile),
                status: CheckStatus::Error,
                message: e.to_string(),
            },
        };
        checks.push(check);
    }

    if let Some(config_path) = config {
        let check = if !config_path.exists() {
            DoctorCheck {
                name: "config".to_string(),
                status: CheckStatus::Warning,
                message: "Configuration file does not exist".to_string(),
            }
        } else {
            match fs::read_to_string(config_path) {
                Ok(content) => match PipelineConfig::from_json(&content) {
                    Ok(config) => DoctorCheck {
                        name: "config".to_string(),
                        status: CheckStatus::Ok,
                        message: format!(
                            "Configuration valid (threshold {:.2}, buffer {} frames)",
                            config.validator.validation_threshold, config.buffer.capacity
                        ),
                    },
                    Err(e) => DoctorCheck {
                        name: "config".to_string(),
                        status: CheckStatus::Error,
                        message: e.to_string(),
                    },
                },
                Err(e) => DoctorCheck {
                    name: "config".to_string(),
                    status: CheckStatus::Error,
                    message: format!("Cannot read configuration file: {}", e),
                },
            }
        };
        checks.push(check);
    }

    let stdin_check = if atty::is(atty::Stream::Stdin) {
        DoctorCheck {
            name: "stdin".to_string(),
            status: CheckStatus::Ok,
            message: "stdin is a TTY (interactive mode)".to_string(),
        }
    } else {
        DoctorCheck {
            name: "stdin".to_string(),
            status: CheckStatus::Ok,
            message: "stdin is a pipe (streaming mode ready)".to_string(),
        }
    };
    checks.push(stdin_check);

    let report = DoctorReport {
        producer: PRODUCER_NAME.to_string(),
        version: MOTION_VERSION.to_string(),
        checks,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Motion Doctor Report");
        println!("====================");
        println!("Producer: {}", report.producer);
        println!("Version:  {}", report.version);
        println!("\nChecks:");

        for check in &report.checks {
            let status_icon = match check.status {
                CheckStatus::Ok => "[OK]",
                CheckStatus::Warning => "[WARN]",
                CheckStatus::Error => "[ERR]",
            };
            println!("  {} {}: {}", status_icon, check.name, check.message);
        }
    }

    let has_errors = report
        .checks
        .iter()
        .any(|c| matches!(c.status, CheckStatus::Error));
    if has_errors {
        Err(MotionCliError::DoctorFailed)
    } else {
        Ok(())
    }
}

// Helper functions

fn read_records(input: &Path, format: &InputFormat) -> Result<Vec<FrameRecord>, MotionCliError> {
    let input_data = if input.to_string_lossy() == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        fs::read_to_string(input)?
    };

    let records = match format {
        InputFormat::Ndjson => FrameRecordAdapter::parse_ndjson(&input_data)?,
        InputFormat::Json => FrameRecordAdapter::parse_array(&input_data)?,
    };
    Ok(records)
}

fn format_output(
    payloads: &[MotionPayload],
    format: &OutputFormat,
) -> Result<String, MotionCliError> {
    match format {
        OutputFormat::Ndjson => {
            let mut out = String::new();
            for payload in payloads {
                out.push_str(&serde_json::to_string(payload)?);
                out.push('\n');
            }
            Ok(out)
        }
        OutputFormat::Json => Ok(serde_json::to_string(payloads)?),
        OutputFormat::JsonPretty => Ok(serde_json::to_string_pretty(payloads)?),
    }
}

// Error types

#[derive(Debug)]
enum MotionCliError {
    Io(io::Error),
    Motion(MotionError),
    Json(serde_json::Error),
    NoRecords,
    ValidationFailed(usize),
    DoctorFailed,
}

impl From<io::Error> for MotionCliError {
    fn from(e: io::Error) -> Self {
        MotionCliError::Io(e)
    }
}

impl From<MotionError> for MotionCliError {
    fn from(e: MotionError) -> Self {
        MotionCliError::Motion(e)
    }
}

impl From<serde_json::Error> for MotionCliError {
    fn from(e: serde_json::Error) -> Self {
        MotionCliError::Json(e)
    }
}

#[derive(serde::Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<MotionCliError> for CliError {
    fn from(e: MotionCliError) -> Self {
        match e {
            MotionCliError::Io(e) => CliError {
                code: "IO_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check file paths and permissions".to_string()),
            },
            MotionCliError::Motion(e @ MotionError::SessionFatal { .. }) => CliError {
                code: "SESSION_FATAL".to_string(),
                message: e.to_string(),
                hint: Some("Inspect the input with 'motion validate'".to_string()),
            },
            MotionCliError::Motion(e @ MotionError::InvalidConfig(_)) => CliError {
                code: "CONFIG_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Run 'motion doctor --config <file>' for details".to_string()),
            },
            MotionCliError::Motion(e) => CliError {
                code: "PARSE_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Ensure input matches the pose.frame_record.v1 schema".to_string()),
            },
            MotionCliError::Json(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check JSON syntax".to_string()),
            },
            MotionCliError::NoRecords => CliError {
                code: "NO_RECORDS".to_string(),
                message: "No frame records found in input".to_string(),
                hint: Some("Ensure input file is not empty".to_string()),
            },
            MotionCliError::ValidationFailed(count) => CliError {
                code: "VALIDATION_FAILED".to_string(),
                message: format!("{} records failed schema validation", count),
                hint: Some("Fix schema errors and retry".to_string()),
            },
            MotionCliError::DoctorFailed => CliError {
                code: "DOCTOR_FAILED".to_string(),
                message: "One or more health checks failed".to_string(),
                hint: Some("Review the doctor report for details".to_string()),
            },
        }
    }
}

// Report types

#[derive(serde::Serialize)]
struct ValidationReport {
    profile: String,
    total_records: usize,
    schema_errors: Vec<SchemaErrorDetail>,
    detected_frames: usize,
    plausible_frames: usize,
    rejected_frames: usize,
    rejections: Vec<RejectionDetail>,
}

#[derive(serde::Serialize)]
struct SchemaErrorDetail {
    index: usize,
    frame_index: u64,
    error: String,
}

#[derive(serde::Serialize)]
struct RejectionDetail {
    frame_index: u64,
    check: String,
    message: String,
    score: f64,
}

#[derive(serde::Serialize)]
struct DoctorReport {
    producer: String,
    version: String,
    checks: Vec<DoctorCheck>,
}

#[derive(serde::Serialize)]
struct DoctorCheck {
    name: String,
    status: CheckStatus,
    message: String,
}

#[derive(serde::Serialize)]
enum CheckStatus {
    Ok,
    Warning,
    Error,
}
