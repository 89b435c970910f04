//! Waydeck CLI — trip date, upload and airport utilities
//!
//! Commands: date, range, duration, active, status, relative,
//! validate, size, airport

mod config;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset};
use clap::{Parser, ValueEnum};
use serde_json::json;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use waydeck_core::{
    format_date, format_date_time, format_relative_time, format_short_date, format_time,
    summarize_trip, trip_status, Clock, DateInput, DateRange, FixedClock, SystemClock, TripDates,
};
use waydeck_places::AirportTable;
use waydeck_upload::{check_file, format_file_size, FileDescriptor, ValidationOutcome};

use crate::config::{check_max_size_mb, Config};

#[derive(Parser)]
#[command(name = "waydeck")]
#[command(version)]
#[command(about = "Trip date, upload and airport utilities")]
struct Cli {
    /// TOML file with upload policy overrides
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Pretend the current instant is this RFC 3339 timestamp
    #[arg(long, global = true, value_parser = parse_now)]
    now: Option<DateTime<FixedOffset>>,

    /// Emit JSON instead of plain text
    #[arg(long, global = true)]
    json: bool,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args)]
struct RangeArgs {
    /// Start date (ISO-8601)
    #[arg(long)]
    start: Option<String>,
    /// End date (ISO-8601)
    #[arg(long)]
    end: Option<String>,
}

impl RangeArgs {
    fn range(&self) -> DateRange<'_> {
        DateRange::from_iso(self.start.as_deref(), self.end.as_deref())
    }

    fn trip(&self, archived: bool) -> TripDates {
        TripDates {
            start_date: self.start.clone(),
            end_date: self.end.clone(),
            archived,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum DateStyle {
    /// 1 Dec 2025
    Date,
    /// 1 Dec
    Short,
    /// 14:30
    Time,
    /// 1 Dec 2025 at 14:30
    Datetime,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Format a date or timestamp
    Date {
        input: String,
        #[arg(long, value_enum, default_value = "date")]
        style: DateStyle,
    },
    /// Describe a trip's date range
    Range(RangeArgs),
    /// Count the days a trip spans, inclusive
    Duration(RangeArgs),
    /// Whether a trip is underway now
    Active(RangeArgs),
    /// Trip lifecycle status
    Status {
        #[command(flatten)]
        range: RangeArgs,
        #[arg(long)]
        archived: bool,
    },
    /// How long ago (or how far ahead) a timestamp is
    Relative { input: String },
    /// Check a file against the upload policy
    #[command(alias = "check")]
    Validate {
        path: PathBuf,
        /// Declared MIME type; guessed from the extension when omitted
        #[arg(long)]
        mime: Option<String>,
        /// Use the avatar policy instead of the document policy
        #[arg(long)]
        avatar: bool,
        /// Override the size limit, in MB
        #[arg(long)]
        max_size_mb: Option<f64>,
    },
    /// Format a byte count
    Size { bytes: u64 },
    /// Look up an airport's IATA code by name
    Airport { name: String },
}

fn parse_now(value: &str) -> std::result::Result<DateTime<FixedOffset>, String> {
    DateTime::parse_from_rfc3339(value).map_err(|e| format!("expected an RFC 3339 timestamp: {e}"))
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(2)
        }
    }
}

fn run(cli: &Cli) -> Result<ExitCode> {
    let clock: Box<dyn Clock> = match cli.now {
        Some(now) => Box::new(FixedClock::new(now)),
        None => Box::new(SystemClock),
    };
    let clock = &*clock;

    match &cli.command {
        Commands::Date { input, style } => {
            let input = Some(DateInput::Iso(input.as_str()));
            let text = match style {
                DateStyle::Date => format_date(input),
                DateStyle::Short => format_short_date(input),
                DateStyle::Time => format_time(input),
                DateStyle::Datetime => format_date_time(input),
            }?;
            emit(cli.json, &text, json!({ "formatted": text }));
        }
        Commands::Range(args) => {
            let text = args.range().display()?;
            emit(cli.json, &text, json!({ "range": text }));
        }
        Commands::Duration(args) => {
            let days = args.range().duration_days()?;
            let text = days.map_or_else(|| "n/a".to_string(), |d| d.to_string());
            emit(cli.json, &text, json!({ "duration_days": days }));
        }
        Commands::Active(args) => {
            let active = args.range().is_active(clock)?;
            emit(cli.json, &active.to_string(), json!({ "active": active }));
        }
        Commands::Status { range, archived } => {
            let trip = range.trip(*archived);
            if cli.json {
                println!("{}", serde_json::to_string(&summarize_trip(&trip, clock)?)?);
            } else {
                println!("{}", trip_status(&trip, clock)?);
            }
        }
        Commands::Relative { input } => {
            let text = format_relative_time(DateInput::Iso(input.as_str()), clock)?;
            emit(cli.json, &text, json!({ "relative": text }));
        }
        Commands::Validate {
            path,
            mime,
            avatar,
            max_size_mb,
        } => return validate(cli, path, mime.as_deref(), *avatar, *max_size_mb),
        Commands::Size { bytes } => {
            let text = format_file_size(*bytes);
            emit(cli.json, &text, json!({ "bytes": bytes, "formatted": text }));
        }
        Commands::Airport { name } => {
            let table = AirportTable::builtin();
            let code = table.match_code(name);
            emit(
                cli.json,
                code.unwrap_or("no match"),
                json!({ "name": name, "code": code }),
            );
            if code.is_none() {
                return Ok(ExitCode::FAILURE);
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn validate(
    cli: &Cli,
    path: &Path,
    mime: Option<&str>,
    avatar: bool,
    max_size_mb: Option<f64>,
) -> Result<ExitCode> {
    let config = match &cli.config {
        Some(config_path) => {
            debug!(path = %config_path.display(), "loading config");
            Config::load(config_path)
                .with_context(|| format!("loading config {}", config_path.display()))?
        }
        None => Config::default(),
    };

    let mut policy = if avatar {
        config.avatar_policy()
    } else {
        config.document_policy()
    };
    if let Some(max) = max_size_mb {
        check_max_size_mb("--max-size-mb", max)?;
        policy = policy.with_max_size_mb(max);
    }

    let mut file = FileDescriptor::from_path(path)
        .with_context(|| format!("reading {}", path.display()))?;
    if let Some(mime) = mime {
        file.mime_type = mime.to_string();
    }
    debug!(mime_type = %file.mime_type, size_bytes = file.size_bytes, "validating upload");

    let outcome = ValidationOutcome::from(check_file(&file, &policy));
    let text = outcome.error.clone().unwrap_or_else(|| "ok".to_string());
    emit(
        cli.json,
        &text,
        json!({
            "valid": outcome.valid,
            "error": outcome.error,
            "mime_type": file.mime_type,
            "size_bytes": file.size_bytes,
            "size": format_file_size(file.size_bytes),
        }),
    );

    Ok(if outcome.valid {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn emit(as_json: bool, text: &str, value: serde_json::Value) {
    if as_json {
        println!("{value}");
    } else {
        println!("{text}");
    }
}
