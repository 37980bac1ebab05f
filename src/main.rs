//! `tripplan` command-line front end.
//!
//! Reads an activities file and prints the annotated itinerary as JSON.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use serde::Serialize;

use tripplan_lib::config::{load_config, load_config_from, parse_timezone};
use tripplan_lib::error::PlannerError;
use tripplan_lib::itinerary::{build_report, day_itinerary};
use tripplan_lib::parser::{load_activities, parse_day};

#[derive(Debug, Parser)]
#[command(name = "tripplan", version, about = "Annotate a trip itinerary with activity overlaps")]
struct Cli {
    /// JSON file with an array of activities, or `{ "activities": [...] }`
    input: PathBuf,

    /// Config file (defaults to ~/.tripplan/config.json)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Only print this day (YYYY-MM-DD)
    #[arg(long)]
    day: Option<String>,

    /// IANA timezone, overrides the configured one
    #[arg(long)]
    tz: Option<String>,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(out) => {
            println!("{}", out);
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::debug!("tripplan failed: {:?}", e);
            eprintln!("error: {}", e);
            eprintln!("{}", e.recovery_suggestion());
            ExitCode::from(exit_status(&e))
        }
    }
}

/// 2 when the input or invocation is at fault, 1 for environment failures.
fn exit_status(err: &PlannerError) -> u8 {
    if err.is_user_error() {
        2
    } else {
        1
    }
}

fn run(cli: Cli) -> Result<String, PlannerError> {
    let config = match cli.config.as_deref() {
        Some(path) => load_config_from(path)?,
        None => load_config()?,
    };
    let tz = match cli.tz.as_deref() {
        Some(name) => parse_timezone(name)?,
        None => config.tz()?,
    };

    let activities = load_activities(&cli.input, &tz)?;

    match cli.day.as_deref() {
        Some(day) => {
            let day = parse_day(day)?;
            render_json(&day_itinerary(&activities, day, &tz), config.pretty_json)
        }
        None => render_json(&build_report(&activities, &tz), config.pretty_json),
    }
}

fn render_json<T: Serialize>(value: &T, pretty: bool) -> Result<String, PlannerError> {
    let out = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(out)
}
