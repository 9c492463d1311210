//! End-to-end tests for the validation pipeline
//!
//! Declares a realistic session parameter table and drives it through
//! `ValidationPipeline::run` the way a command-line front end would.

use pretty_assertions::assert_eq;
use session_validation::flags::{AllowUnknown, Autorun, EnableSse, EnableUplink, Gui};
use session_validation::functors::LongListValidator;
use session_validation::{
    Assignment, AssignmentPolicy, ChoiceEnum, Constraints, CrossContext, DefaultFunctor,
    EnumChoices, EnumValue, EnumeratedParse, EnumeratedRegistry, EnumeratedType, Level1, Level3,
    Mode, ModeSet, MustExist, ParamValue, ParameterAttributes, ParameterError, ParameterTable,
    RawInputs, Special, StageId, ValidationConfig, ValidationPipeline, ValidationState, ValueType,
};
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
enum Param {
    Port,
    Host,
    Venue,
    Station,
    OutputDir,
    Database,
    Testbed,
    Vcids,
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, Clone, Copy)]
enum Venue {
    Testset,
    SelectedDl,
    Ops,
    Unknown,
}

impl ChoiceEnum for Venue {
    const TYPE_NAME: &'static str = "Venue";

    fn variants() -> &'static [Self] {
        &[Venue::Testset, Venue::SelectedDl, Venue::Ops, Venue::Unknown]
    }

    fn name(&self) -> &'static str {
        match self {
            Venue::Testset => "TESTSET",
            Venue::SelectedDl => "SELECTED_DL",
            Venue::Ops => "OPS",
            Venue::Unknown => "UNKNOWN",
        }
    }

    fn is_unknown(&self) -> bool {
        matches!(self, Venue::Unknown)
    }
}

#[derive(Debug, Default)]
struct Session {
    port: Option<i64>,
    host: Option<String>,
    venue: Option<String>,
    station: Option<i64>,
    output_dir: Option<PathBuf>,
    database: Option<String>,
    testbed: Option<String>,
    vcids: Vec<i64>,
}

fn state(mode: Mode, up: bool, sse: bool) -> ValidationState {
    ValidationState::new(
        "msl",
        EnableUplink::from_bool(up),
        EnableSse::from_bool(sse),
        mode,
        Gui::NoGui,
        Autorun::NoAutorun,
    )
    .unwrap()
}

fn stations() -> EnumeratedRegistry {
    let mut registry = EnumeratedRegistry::new();
    registry
        .register(EnumeratedType::new(
            "Station",
            vec!["DSS_14".to_string(), "DSS_43".to_string(), "DSS_63".to_string()],
            |raw| match raw {
                "DSS_14" => Ok(ParamValue::Long(14)),
                "DSS_43" => Ok(ParamValue::Long(43)),
                "DSS_63" => Ok(ParamValue::Long(63)),
                "DSS_00" => Err(EnumeratedParse::Failed("station table corrupt".to_string())),
                _ => Err(EnumeratedParse::NotRecognized),
            },
        ))
        .unwrap();
    registry
}

fn table() -> ParameterTable<Param, Session> {
    ParameterTable::new()
        .with(
            ParameterAttributes::option(Param::Port, "port", ValueType::Long)
                .level1(Level1::long())
                .constraints(Constraints::long_range(1, 65535).unwrap())
                .valid_in(ModeSet::uplink_capable())
                .required_in(ModeSet::of(&[Mode::Uplink]))
                .default_value(DefaultFunctor::constant(12345_i64, ModeSet::integrated()))
                .level3(Level3::Requires(Param::Host))
                .assignment(Assignment::typed("--port", |s: &mut Session, v: i64| s.port = Some(v)))
                .build()
                .unwrap(),
        )
        .unwrap()
        .with(
            ParameterAttributes::option(Param::Host, "host", ValueType::String)
                .level1(Level1::string())
                .valid_in(ModeSet::uplink_capable())
                .special(Special::constant("localhost"))
                .assignment(Assignment::typed("--host", |s: &mut Session, v: String| {
                    s.host = Some(v)
                }))
                .build()
                .unwrap(),
        )
        .unwrap()
        .with(
            ParameterAttributes::option(Param::Venue, "venueType", ValueType::Enum)
                .level1(EnumChoices::of::<Venue>(AllowUnknown::Disallow))
                .assignment(Assignment::typed("--venueType", |s: &mut Session, v: EnumValue| {
                    s.venue = Some(v.name)
                }))
                .build()
                .unwrap(),
        )
        .unwrap()
        .with(
            ParameterAttributes::option(Param::Station, "station", ValueType::Long)
                .level1(stations().level1("Station").unwrap())
                .assignment(Assignment::typed("--station", |s: &mut Session, v: i64| {
                    s.station = Some(v)
                }))
                .build()
                .unwrap(),
        )
        .unwrap()
        .with(
            ParameterAttributes::option(Param::OutputDir, "outputDir", ValueType::File)
                .level1(Level1::file())
                .constraints(
                    Constraints::builder()
                        .must_exist(MustExist::MustNotExist)
                        .build()
                        .unwrap(),
                )
                .assignment(Assignment::typed("--outputDir", |s: &mut Session, v: PathBuf| {
                    s.output_dir = Some(v)
                }))
                .build()
                .unwrap(),
        )
        .unwrap()
        .with(
            ParameterAttributes::option(Param::Database, "database", ValueType::String)
                .level1(Level1::string())
                .level3(Level3::custom(|ctx: &CrossContext<'_, Param, Session>| {
                    let realtime_only = ctx.state.mode().is_uplink();
                    Ok(if realtime_only && ctx.is_supplied(Param::Database)? {
                        vec![format!("cannot be used in mode {}", ctx.state.mode())]
                    } else {
                        Vec::new()
                    })
                }))
                .assignment(Assignment::typed("--database", |s: &mut Session, v: String| {
                    s.database = Some(v)
                }))
                .build()
                .unwrap(),
        )
        .unwrap()
        .with(
            ParameterAttributes::ghost(Param::Testbed, ValueType::String)
                .default_value(DefaultFunctor::custom(|st| {
                    Ok(Some(ParamValue::from(format!("{}-TB", st.mission()))))
                }))
                .assignment(Assignment::typed("Testbed", |s: &mut Session, v: String| {
                    s.testbed = Some(v)
                }))
                .build()
                .unwrap(),
        )
        .unwrap()
        .with(
            ParameterAttributes::trailing(Param::Vcids, ValueType::LongList)
                .display_name("VCIDS")
                .level1(Level1::LongList(LongListValidator::default()))
                .constraints(Constraints::long_range(0, 63).unwrap())
                .assignment(Assignment::typed("VCIDS", |s: &mut Session, v: Vec<i64>| s.vcids = v))
                .build()
                .unwrap(),
        )
        .unwrap()
}

fn run(
    mode: Mode,
    up: bool,
    sse: bool,
    inputs: RawInputs<Param>,
) -> (session_validation::ValidationReport<Param>, Session) {
    let mut pipeline = ValidationPipeline::new(table());
    let mut session = Session::default();
    let report = pipeline.run(&state(mode, up, sse), &inputs, &mut session).unwrap();
    (report, session)
}

// ═══════════════════════════════════════════════════════════════════════════
// Level 1
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_port_out_of_range_in_uplink() {
    let inputs = RawInputs::new().text(Param::Port, "70000").text(Param::Host, "gds1");
    let (report, session) = run(Mode::Uplink, true, false, inputs);

    assert!(!report.success());
    assert_eq!(
        report.errors().as_slice(),
        ["Option --port 70000 does not lie in range [1,65535]".to_string()]
    );
    assert_eq!(session.port, None);
}

#[test]
fn test_errors_accumulate_across_parameters() {
    let inputs = RawInputs::new()
        .text(Param::Port, "12x")
        .text(Param::Host, "gds1")
        .text(Param::Venue, "mars")
        .text(Param::Vcids, "1,99");
    let (report, _) = run(Mode::Uplink, true, false, inputs);

    assert_eq!(
        report.errors().iter().collect::<Vec<_>>(),
        vec![
            "Option --port '12x' is not parseable as a long",
            "Option --venueType 'mars' is not a valid choice; allowed values: OPS, SELECTED_DL, TESTSET",
            "Option VCIDS 99 does not lie in range [0,63]",
        ]
    );
    assert_eq!(report.blocked(), &[Param::Port, Param::Venue, Param::Vcids]);
}

#[test]
fn test_multi_word_enum_value() {
    let inputs = RawInputs::new().text(Param::Venue, "Selected DL");
    let (report, session) = run(Mode::FswDownlink, false, false, inputs);

    assert!(report.success(), "{}", report.errors());
    assert_eq!(session.venue.as_deref(), Some("SELECTED_DL"));
}

#[test]
fn test_unknown_venue_rejected_when_disallowed() {
    let inputs = RawInputs::new().text(Param::Venue, "unknown");
    let (report, _) = run(Mode::FswDownlink, false, false, inputs);

    assert_eq!(
        report.errors().as_slice(),
        ["Option --venueType 'unknown' is not a valid choice; allowed values: OPS, SELECTED_DL, TESTSET"
            .to_string()]
    );
}

#[test]
fn test_registered_enumerated_type() {
    let (report, session) = run(
        Mode::FswDownlink,
        false,
        false,
        RawInputs::new().text(Param::Station, "dss 43"),
    );
    assert!(report.success(), "{}", report.errors());
    assert_eq!(session.station, Some(43));

    let (report, _) = run(
        Mode::FswDownlink,
        false,
        false,
        RawInputs::new().text(Param::Station, "dss_99"),
    );
    assert_eq!(
        report.errors().as_slice(),
        ["Option --station 'dss_99' is not a valid choice; allowed values: DSS_14, DSS_43, DSS_63"
            .to_string()]
    );
}

#[test]
fn test_enumerated_parse_failure_is_internal() {
    let mut pipeline = ValidationPipeline::new(table());
    let mut session = Session::default();
    let err = pipeline
        .run(
            &state(Mode::FswDownlink, false, false),
            &RawInputs::new().text(Param::Station, "DSS_00"),
            &mut session,
        )
        .unwrap_err();
    assert!(matches!(err, ParameterError::Internal(_)));
}

#[test]
fn test_must_not_exist_output_dir() {
    let dir = tempfile::tempdir().unwrap();
    let existing = dir.path().to_str().unwrap().to_string();
    let canonical = std::fs::canonicalize(dir.path()).unwrap();

    let (report, _) = run(
        Mode::FswDownlink,
        false,
        false,
        RawInputs::new().text(Param::OutputDir, existing),
    );
    assert_eq!(report.errors().len(), 1);
    let message = report.errors().iter().next().unwrap();
    assert!(message.starts_with("Option --outputDir "));
    assert!(message.contains(&canonical.display().to_string()));
    assert!(message.ends_with("already exists"));

    let fresh = dir.path().join("session-out");
    let (report, session) = run(
        Mode::FswDownlink,
        false,
        false,
        RawInputs::new().text(Param::OutputDir, fresh.to_str().unwrap()),
    );
    assert!(report.success(), "{}", report.errors());
    assert!(session.output_dir.unwrap().ends_with("session-out"));
}

// ═══════════════════════════════════════════════════════════════════════════
// Modes, Default and Special
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_integrated_defaults_port() {
    let (report, session) = run(Mode::Integrated, true, false, RawInputs::new());

    assert_eq!(report.mode(), Mode::IntegratedFswUp);
    assert!(report.success(), "{}", report.errors());
    assert_eq!(session.port, Some(12345));
    // Defaulted --port does not trigger "requires --host"; Special fills it
    assert_eq!(session.host.as_deref(), Some("localhost"));
    assert_eq!(session.testbed.as_deref(), Some("msl-TB"));
}

#[test]
fn test_uplink_only_option_in_downlink_mode() {
    let inputs = RawInputs::new().text(Param::Host, "gds1");
    let (report, session) = run(Mode::FswDownlink, false, false, inputs);

    assert_eq!(
        report.errors().as_slice(),
        ["Option --host is not allowed in mode FSW_DOWNLINK".to_string()]
    );
    assert!(report.is_blocked(Param::Host));
    assert_eq!(session.host, None);
}

#[test]
fn test_special_supplies_inapplicable_parameter() {
    let (report, session) = run(Mode::Monitor, false, false, RawInputs::new());

    assert!(report.success(), "{}", report.errors());
    assert_eq!(report.stages_for(Param::Host), vec![StageId::Special, StageId::Assignment]);
    assert_eq!(session.host.as_deref(), Some("localhost"));
    assert_eq!(session.port, None);
}

#[test]
fn test_missing_required_port() {
    let (report, _) = run(Mode::Uplink, true, false, RawInputs::new().text(Param::Host, "gds1"));
    assert_eq!(
        report.errors().as_slice(),
        ["Option --port is required in mode UPLINK".to_string()]
    );
}

#[test]
fn test_inconsistent_mode_fails_before_validation() {
    let err = ValidationState::new(
        "msl",
        EnableUplink::Disabled,
        EnableSse::Disabled,
        Mode::Uplink,
        Gui::NoGui,
        Autorun::NoAutorun,
    )
    .unwrap_err();
    assert_eq!(err.to_string(), "Mode cannot be UPLINK because uplink is not enabled");
}

// ═══════════════════════════════════════════════════════════════════════════
// Level 3 and ordering
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_port_requires_host_in_integrated_mode() {
    // --host is not supplied, so the explicit --port trips the Requires check
    let (report, session) = run(
        Mode::IntegratedFswUp,
        true,
        false,
        RawInputs::new().text(Param::Port, "5000"),
    );

    assert_eq!(
        report.errors().as_slice(),
        ["Option --port requires option --host".to_string()]
    );
    assert!(!report.assigned());
    assert_eq!(session.port, None);
}

#[test]
fn test_custom_level3() {
    let inputs = RawInputs::new()
        .text(Param::Port, "5000")
        .text(Param::Host, "gds1")
        .text(Param::Database, "sessions");
    let (report, _) = run(Mode::Uplink, true, false, inputs);

    assert_eq!(
        report.errors().as_slice(),
        ["Option --database cannot be used in mode UPLINK".to_string()]
    );
}

#[test]
fn test_stage_passes_never_interleave() {
    let inputs = RawInputs::new()
        .text(Param::Port, "5000")
        .text(Param::Host, "gds1")
        .text(Param::Vcids, "1..3");
    let (report, session) = run(Mode::IntegratedFswUp, true, false, inputs);

    assert!(report.success(), "{}", report.errors());
    assert_eq!(session.vcids, vec![1, 2, 3]);

    let rank = |stage: StageId| match stage {
        StageId::Level1 | StageId::Level2 | StageId::Default => 0,
        StageId::Level3 => 1,
        StageId::Special => 2,
        StageId::Assignment => 3,
    };
    let ranks: Vec<u8> = report.trace().iter().map(|r| rank(r.stage)).collect();
    let mut sorted = ranks.clone();
    sorted.sort();
    assert_eq!(ranks, sorted);

    assert_eq!(
        report.stages_for(Param::Port),
        vec![StageId::Level1, StageId::Level3, StageId::Assignment]
    );
}

#[test]
fn test_best_effort_assignment() {
    let mut pipeline =
        ValidationPipeline::new(table()).assignment_policy(AssignmentPolicy::BestEffort);
    let mut session = Session::default();
    let report = pipeline
        .run(
            &state(Mode::FswDownlink, false, false),
            &RawInputs::new()
                .text(Param::Venue, "ops")
                .text(Param::Vcids, "70"),
            &mut session,
        )
        .unwrap();

    assert!(!report.success());
    assert!(report.assigned());
    assert_eq!(session.venue.as_deref(), Some("OPS"));
    assert!(session.vcids.is_empty());
}

// ═══════════════════════════════════════════════════════════════════════════
// Configuration
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_config_attaches_mission_values() {
    let config = ValidationConfig::from_yaml_str(
        r#"
version: 1
preview_limit: 1
allowed_values:
  msl:
    host: [gds1, gds2]
"#,
    )
    .unwrap();
    let mut pipeline = ValidationPipeline::new(table()).with_config(&config).unwrap();
    let mut session = Session::default();

    let report = pipeline
        .run(
            &state(Mode::Uplink, true, false),
            &RawInputs::new().text(Param::Port, "5000").text(Param::Host, "gds9"),
            &mut session,
        )
        .unwrap();

    assert_eq!(
        report.errors().as_slice(),
        ["Option --host value 'gds9' is not valid for mission msl; allowed values: first 1 of 2: 'gds1'"
            .to_string()]
    );
}

#[test]
fn test_config_enum_values_ignore_case() {
    let config = ValidationConfig::from_yaml_str(
        r#"
version: 1
allowed_values:
  msl:
    venueType: [ops, selected dl]
"#,
    )
    .unwrap();
    let mut pipeline = ValidationPipeline::new(table()).with_config(&config).unwrap();
    let mut session = Session::default();

    let report = pipeline
        .run(
            &state(Mode::Monitor, false, false),
            &RawInputs::new().text(Param::Venue, "Selected DL"),
            &mut session,
        )
        .unwrap();
    assert!(report.success(), "{}", report.errors());
    assert_eq!(session.venue.as_deref(), Some("SELECTED_DL"));

    let report = pipeline
        .run(
            &state(Mode::Monitor, false, false),
            &RawInputs::new().text(Param::Venue, "testset"),
            &mut session,
        )
        .unwrap();
    assert_eq!(
        report.errors().as_slice(),
        ["Option --venueType value 'TESTSET' is not valid for mission msl; allowed values: 'ops', 'selected dl'"
            .to_string()]
    );
}

#[test]
fn test_config_naming_unknown_parameter() {
    let config = ValidationConfig::from_yaml_str(
        "version: 1\nallowed_values:\n  msl:\n    nosuch: [1]\n",
    )
    .unwrap();
    let err = ValidationPipeline::new(table()).with_config(&config).unwrap_err();
    assert!(matches!(err, ParameterError::Internal(_)));
}

// ═══════════════════════════════════════════════════════════════════════════
// Declarations
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_flag_with_non_boolean_type_is_illegal() {
    let result = ParameterAttributes::<Param, Session>::flag(Param::Host, "host")
        .value_type(ValueType::String)
        .build();
    assert!(matches!(result, Err(ParameterError::Declaration { .. })));
}

#[test]
fn test_flag_with_level1_is_illegal() {
    let result = ParameterAttributes::<Param, Session>::flag(Param::Host, "host")
        .level1(Level1::string())
        .build();
    assert!(matches!(result, Err(ParameterError::Declaration { .. })));
}

#[test]
fn test_ghost_without_default_is_illegal() {
    let result = ParameterAttributes::<Param, Session>::ghost(Param::Testbed, ValueType::String)
        .build();
    let err = result.unwrap_err();
    assert!(err.to_string().starts_with("Illegal declaration for parameter Testbed"));
}
