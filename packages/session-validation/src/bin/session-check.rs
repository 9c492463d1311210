//! Session parameter check
//!
//! Validates a sample session parameter set against a mode and mission and
//! prints the resulting errors or the full report.
//!
//! # Usage
//!
//! ```bash
//! # Uplink session on an out-of-range port
//! cargo run --bin session-check -- --mode uplink --enable-uplink --set port=70000
//!
//! # Integrated session with mission tables from YAML, JSON output
//! cargo run --bin session-check -- --mode integrated --enable-sse \
//!     --config session.yaml --set host=localhost --json 32..35
//! ```

use clap::Parser;
use serde::Serialize;
use session_validation::flags::{AllowUnknown, Autorun, EnableSse, EnableUplink, Gui, IsDirectory};
use session_validation::functors::LongListValidator;
use session_validation::{
    Assignment, ChoiceEnum, Constraints, DefaultFunctor, EnumChoices, EnumValue, Level1, Level3,
    Mode, ModeSet, MustExist, ParameterAttributes, ParameterResult, ParameterTable, RawInputs,
    RawValue, ValidationConfig, ValidationPipeline, ValidationState, ValueType,
};
use std::fmt;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "session-check")]
#[command(about = "Validate session parameters for a mode and mission", long_about = None)]
struct Cli {
    /// Mission name
    #[arg(long)]
    mission: Option<String>,

    /// Requested mode, e.g. uplink, fsw-downlink, integrated
    #[arg(long, default_value = "integrated")]
    mode: String,

    /// Enable uplink
    #[arg(long)]
    enable_uplink: bool,

    /// Enable SSE downlink
    #[arg(long)]
    enable_sse: bool,

    /// Engine configuration (YAML schema v1)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the full report as JSON
    #[arg(long)]
    json: bool,

    /// Option value as name=value (repeatable)
    #[arg(long = "set", value_name = "NAME=VALUE")]
    values: Vec<String>,

    /// Presence-only option (repeatable)
    #[arg(long = "flag", value_name = "NAME")]
    flags: Vec<String>,

    /// Trailing parameter values
    trailing: Vec<String>,
}

// ═══════════════════════════════════════════════════════════════════════════
// Sample session parameters
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
enum SessionParam {
    Host,
    Port,
    OutputDir,
    Venue,
    Realtime,
    Testbed,
    Vcids,
}

impl fmt::Display for SessionParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionParam::Host => "HOST",
            SessionParam::Port => "PORT",
            SessionParam::OutputDir => "OUTPUT_DIR",
            SessionParam::Venue => "VENUE",
            SessionParam::Realtime => "REALTIME",
            SessionParam::Testbed => "TESTBED",
            SessionParam::Vcids => "VCIDS",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy)]
enum Venue {
    Testset,
    Atlo,
    Ops,
    Unknown,
}

impl ChoiceEnum for Venue {
    const TYPE_NAME: &'static str = "VenueType";

    fn variants() -> &'static [Self] {
        &[Venue::Testset, Venue::Atlo, Venue::Ops, Venue::Unknown]
    }

    fn name(&self) -> &'static str {
        match self {
            Venue::Testset => "TESTSET",
            Venue::Atlo => "ATLO",
            Venue::Ops => "OPS",
            Venue::Unknown => "UNKNOWN",
        }
    }

    fn is_unknown(&self) -> bool {
        matches!(self, Venue::Unknown)
    }
}

/// Configuration object the Assignment stage fills
#[derive(Debug, Default, Serialize)]
struct SessionConfig {
    host: Option<String>,
    port: Option<i64>,
    output_dir: Option<PathBuf>,
    venue: Option<String>,
    realtime: bool,
    testbed: Option<String>,
    vcids: Vec<i64>,
}

fn session_table() -> ParameterResult<ParameterTable<SessionParam, SessionConfig>> {
    let uplink = ModeSet::uplink_capable();

    ParameterTable::new()
        .with(
            ParameterAttributes::option(SessionParam::Host, "host", ValueType::String)
                .level1(Level1::string())
                .constraints(Constraints::builder().long_range(1, 255).build()?)
                .valid_in(uplink)
                .required_in(ModeSet::of(&[Mode::Uplink]))
                .assignment(Assignment::typed("--host", |s: &mut SessionConfig, v: String| {
                    s.host = Some(v)
                }))
                .build()?,
        )?
        .with(
            ParameterAttributes::option(SessionParam::Port, "port", ValueType::Long)
                .level1(Level1::long())
                .constraints(Constraints::long_range(1, 65535)?)
                .valid_in(uplink)
                .required_in(ModeSet::of(&[Mode::Uplink]))
                .default_value(DefaultFunctor::constant(12345_i64, ModeSet::integrated()))
                .level3(Level3::Requires(SessionParam::Host))
                .assignment(Assignment::typed("--port", |s: &mut SessionConfig, v: i64| {
                    s.port = Some(v)
                }))
                .build()?,
        )?
        .with(
            ParameterAttributes::option(SessionParam::OutputDir, "outputDir", ValueType::File)
                .level1(Level1::file())
                .constraints(
                    Constraints::builder()
                        .must_exist(MustExist::MustExist)
                        .is_directory(IsDirectory::Directory)
                        .build()?,
                )
                .assignment(Assignment::typed(
                    "--outputDir",
                    |s: &mut SessionConfig, v: PathBuf| s.output_dir = Some(v),
                ))
                .build()?,
        )?
        .with(
            ParameterAttributes::option(SessionParam::Venue, "venueType", ValueType::Enum)
                .level1(EnumChoices::of::<Venue>(AllowUnknown::Disallow))
                .assignment(Assignment::typed(
                    "--venueType",
                    |s: &mut SessionConfig, v: EnumValue| s.venue = Some(v.name),
                ))
                .build()?,
        )?
        .with(
            ParameterAttributes::flag(SessionParam::Realtime, "realtime")
                .level3(Level3::Excludes(SessionParam::OutputDir))
                .assignment(Assignment::typed(
                    "--realtime",
                    |s: &mut SessionConfig, v: bool| s.realtime = v,
                ))
                .build()?,
        )?
        .with(
            ParameterAttributes::ghost(SessionParam::Testbed, ValueType::String)
                .default_value(DefaultFunctor::custom(|state| {
                    Ok(Some(format!("{}-TB1", state.mission().to_uppercase()).into()))
                }))
                .assignment(Assignment::typed(
                    "TESTBED",
                    |s: &mut SessionConfig, v: String| s.testbed = Some(v),
                ))
                .build()?,
        )?
        .with(
            ParameterAttributes::trailing(SessionParam::Vcids, ValueType::LongList)
                .level1(Level1::LongList(LongListValidator::default()))
                .constraints(Constraints::long_range(0, 63)?)
                .valid_in(ModeSet::downlink())
                .assignment(Assignment::typed(
                    "VCIDS",
                    |s: &mut SessionConfig, v: Vec<i64>| s.vcids = v,
                ))
                .build()?,
        )
}

// ═══════════════════════════════════════════════════════════════════════════
// Driver
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Serialize)]
struct Output<'a> {
    report: &'a session_validation::ValidationReport<SessionParam>,
    session: &'a SessionConfig,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::from(2)
        }
    }
}

fn run(cli: Cli) -> Result<bool, Box<dyn std::error::Error>> {
    let config = match &cli.config {
        Some(path) => ValidationConfig::from_yaml(path)?,
        None => ValidationConfig::default(),
    };

    let mission = cli
        .mission
        .clone()
        .or_else(|| config.mission.clone())
        .unwrap_or_else(|| "msl".to_string());

    let state = ValidationState::new(
        mission,
        EnableUplink::from_bool(cli.enable_uplink),
        EnableSse::from_bool(cli.enable_sse),
        cli.mode.parse::<Mode>()?,
        Gui::NoGui,
        Autorun::NoAutorun,
    )?;

    let mut pipeline = ValidationPipeline::new(session_table()?).with_config(&config)?;
    let inputs = collect_inputs(&cli, pipeline.table())?;

    let mut session = SessionConfig::default();
    let report = pipeline.run(&state, &inputs, &mut session)?;

    if cli.json {
        let output = Output {
            report: &report,
            session: &session,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if report.success() {
        println!("Session valid in mode {}", report.mode());
    } else {
        for message in report.errors().iter() {
            println!("{}", message);
        }
    }

    Ok(report.success())
}

fn collect_inputs(
    cli: &Cli,
    table: &ParameterTable<SessionParam, SessionConfig>,
) -> Result<RawInputs<SessionParam>, Box<dyn std::error::Error>> {
    let mut inputs = RawInputs::new();

    for assignment in &cli.values {
        let (name, value) = assignment
            .split_once('=')
            .ok_or_else(|| format!("expected NAME=VALUE, got '{}'", assignment))?;
        let attrs = table
            .find_option(name)
            .filter(|a| a.needs_argument())
            .ok_or_else(|| format!("unknown option '{}'", name))?;
        inputs.insert(attrs.index(), RawValue::Text(value.to_string()));
    }

    for name in &cli.flags {
        let attrs = table
            .find_option(name)
            .filter(|a| a.is_flag())
            .ok_or_else(|| format!("unknown flag '{}'", name))?;
        inputs.insert(attrs.index(), RawValue::Flag(true));
    }

    let mut positional = table.trailing();
    for value in &cli.trailing {
        let attrs = positional
            .next()
            .ok_or_else(|| format!("unexpected trailing value '{}'", value))?;
        inputs.insert(attrs.index(), RawValue::Text(value.clone()));
    }

    Ok(inputs)
}
