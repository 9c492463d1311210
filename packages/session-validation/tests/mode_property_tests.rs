//! Property-based tests for mode resolution and Level 1 conversions
//!
//! Invariants that hold for ALL inputs:
//! - INTEGRATED always resolves, through the 4-way table
//! - A non-integrated mode fails iff it demands a disabled capability
//! - Accepted longs/doubles survive Display + re-parse unchanged
//! - List-of-longs output is sorted and duplicate-free when asked

use proptest::prelude::*;
use quickcheck::TestResult;
use quickcheck_macros::quickcheck;
use session_validation::flags::{AllowRanges, Deduplicate, EnableSse, EnableUplink, Sort};
use session_validation::functors::{DoubleValidator, LongListValidator, LongValidator};
use session_validation::{resolve_mode, Constraints, Mode, ParamValue, Verdict};
use std::collections::BTreeSet;

// ============================================================================
// QuickCheck Tests
// ============================================================================

#[quickcheck]
fn qc_integrated_always_resolves(up: bool, sse: bool) -> bool {
    let expected = match (up, sse) {
        (false, false) => Mode::IntegratedFswOnly,
        (false, true) => Mode::IntegratedFswSse,
        (true, false) => Mode::IntegratedFswUp,
        (true, true) => Mode::IntegratedFswSseUp,
    };
    matches!(
        resolve_mode(Mode::Integrated, EnableUplink::from_bool(up), EnableSse::from_bool(sse)),
        Ok(m) if m == expected
    )
}

#[quickcheck]
fn qc_plain_modes_fail_iff_capability_missing(mode_idx: u8, up: bool, sse: bool) -> TestResult {
    let mode = Mode::ALL[mode_idx as usize % Mode::ALL.len()];
    if mode.is_integrated() {
        return TestResult::discard();
    }

    let demands_missing = (mode.is_uplink() && !up) || (mode.is_sse_downlink() && !sse);
    let result = resolve_mode(mode, EnableUplink::from_bool(up), EnableSse::from_bool(sse));

    TestResult::from_bool(match result {
        Ok(resolved) => !demands_missing && resolved == mode,
        Err(_) => demands_missing,
    })
}

#[quickcheck]
fn qc_explicit_integrated_is_fixed_point(mode_idx: u8, up: bool, sse: bool) -> TestResult {
    let mode = Mode::ALL[mode_idx as usize % Mode::ALL.len()];
    if !mode.is_integrated() || mode == Mode::Integrated {
        return TestResult::discard();
    }

    let resolved_from_flags =
        resolve_mode(Mode::Integrated, EnableUplink::from_bool(up), EnableSse::from_bool(sse));
    let explicit = resolve_mode(mode, EnableUplink::from_bool(up), EnableSse::from_bool(sse));

    // The explicit variant succeeds exactly when the flags would pick it
    TestResult::from_bool(explicit.is_ok() == matches!(resolved_from_flags, Ok(m) if m == mode))
}

#[quickcheck]
fn qc_long_roundtrip(value: i64) -> bool {
    match LongValidator.validate(&value.to_string(), &Constraints::NONE) {
        Verdict::Accept(ParamValue::Long(v)) => {
            v == value && v.to_string().parse::<i64>() == Ok(value)
        }
        _ => false,
    }
}

// ============================================================================
// Proptest Tests
// ============================================================================

proptest! {
    #[test]
    fn prop_long_bounds(value in -100_000i64..=100_000) {
        let c = Constraints::long_range(1, 65535).unwrap();
        let verdict = LongValidator.validate(&value.to_string(), &c);

        // Invariant: accepted iff within bounds, and out-of-range echoes the bounds
        if (1..=65535).contains(&value) {
            prop_assert_eq!(verdict, Verdict::Accept(ParamValue::Long(value)));
        } else {
            prop_assert_eq!(
                verdict,
                Verdict::Reject(format!("{} does not lie in range [1,65535]", value))
            );
        }
    }

    #[test]
    fn prop_double_roundtrip(value in prop::num::f64::NORMAL | prop::num::f64::ZERO) {
        let verdict = DoubleValidator.validate(&value.to_string(), &Constraints::NONE);
        match verdict {
            Verdict::Accept(ParamValue::Double(v)) => {
                prop_assert_eq!(v, value);
                prop_assert_eq!(v.to_string().parse::<f64>().unwrap(), value);
            }
            other => prop_assert!(false, "rejected {}: {:?}", value, other),
        }
    }

    #[test]
    fn prop_long_list_sorted_and_unique(values in prop::collection::vec(-50i64..50, 1..40)) {
        let raw = values.iter().map(|v| v.to_string()).collect::<Vec<_>>().join(",");
        let validator = LongListValidator::new(AllowRanges::Allow, Deduplicate::Deduplicate, Sort::Sort);

        let expected: Vec<i64> = values.iter().copied().collect::<BTreeSet<_>>().into_iter().collect();
        prop_assert_eq!(
            validator.validate(&raw, &Constraints::NONE),
            Verdict::Accept(ParamValue::LongList(expected))
        );
    }

    #[test]
    fn prop_long_list_keeps_everything_without_dedup(
        values in prop::collection::vec(-50i64..50, 1..40),
    ) {
        let raw = values.iter().map(|v| v.to_string()).collect::<Vec<_>>().join(",");
        let unsorted = LongListValidator::new(AllowRanges::Allow, Deduplicate::KeepDuplicates, Sort::NoSort);
        let sorted = LongListValidator::new(AllowRanges::Allow, Deduplicate::KeepDuplicates, Sort::Sort);

        let mut expected_sorted = values.clone();
        expected_sorted.sort();

        prop_assert_eq!(
            unsorted.validate(&raw, &Constraints::NONE),
            Verdict::Accept(ParamValue::LongList(values))
        );
        prop_assert_eq!(
            sorted.validate(&raw, &Constraints::NONE),
            Verdict::Accept(ParamValue::LongList(expected_sorted))
        );
    }

    #[test]
    fn prop_range_expands_inclusively(start in -1000i64..1000, len in 0i64..200) {
        let stop = start + len;
        let validator = LongListValidator::default();
        prop_assert_eq!(
            validator.validate(&format!("{}..{}", start, stop), &Constraints::NONE),
            Verdict::Accept(ParamValue::LongList((start..=stop).collect()))
        );
    }
}
