//! End-to-end conflict analysis over Python sources

mod common;

use common::*;
use parloop_analysis::shared::models::{floor_div, floor_mod};
use parloop_analysis::{
    analyze_file, analyze_source, AliasPolicy, AnalysisConfig, AnalysisError, ConflictVerdict,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn analyze(source: &str) -> parloop_analysis::ConflictResult {
    analyze_source(source, &AnalysisConfig::default())
        .unwrap_or_else(|e| panic!("analysis failed: {e}\n{source}"))
}

/// ` + k` or ` - k`
fn signed(offset: i64) -> String {
    if offset < 0 {
        format!(" - {}", -offset)
    } else {
        format!(" + {offset}")
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Fixture files
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_fixture_verdicts() {
    let cases = [
        ("trivial_write_write.py", (true, false)),
        ("independent.py", (false, false)),
        ("prefix_sum.py", (false, true)),
        ("stencil.py", (false, true)),
        ("nested.py", (false, false)),
        ("empty_range.py", (false, false)),
        ("strided.py", (false, false)),
    ];
    for (name, expected) in cases {
        let result = analyze_file(fixture_path(name), &AnalysisConfig::default())
            .unwrap_or_else(|e| panic!("{name}: {e}"));
        assert_verdicts(&result, expected);
        assert_witnesses_distinct(&result, "i");
    }
}

#[test]
fn test_fixture_unsupported_statement() {
    let source = fixture_source("unsupported_if.py");
    let err = analyze_source(&source, &AnalysisConfig::default()).unwrap_err();
    let span = err.span().expect("unsupported construct carries a span");
    assert_eq!(span.start_line, 2);
    assert_extraction_error(Err(err), "unsupported");
}

#[test]
fn test_distinct_arrays_ignores_cross_array_reads() {
    let config = AnalysisConfig::default().with_alias_policy(AliasPolicy::DistinctArrays);
    let result = analyze_file(fixture_path("stencil.py"), &config).unwrap();
    assert_verdicts(&result, (false, false));
}

// ═══════════════════════════════════════════════════════════════════════════
// Verdict properties
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_constant_index_conflicts_whenever_two_iterations_exist() {
    assert_verdicts(&analyze(&fixture_single_write(0, 2, "0")), (true, false));
    assert_verdicts(&analyze(&fixture_single_write(0, 1, "0")), (false, false));
    assert_verdicts(&analyze(&fixture_single_write(5, 0, "0")), (false, false));
}

#[test]
fn test_identity_index_never_conflicts() {
    for upper in [1, 2, 17, 1_000_000] {
        assert_verdicts(&analyze(&fixture_single_write(0, upper, "i")), (false, false));
    }
}

#[test]
fn test_strided_index_never_conflicts() {
    for upper in [10_000, 1_000_000] {
        let source = fixture_loop(0, upper, &["a[2 * i] = a[2 * i + 1]"]);
        assert_verdicts(&analyze(&source), (false, false));
        assert_verdicts(&analyze(&fixture_single_write(0, upper, "i * 3")), (false, false));
    }
    let source = fixture_loop(0, 1_000_000, &["a[4 * i + 2] = a[6 * i + 1]"]);
    assert_verdicts(&analyze(&source), (false, false));
}

#[test]
fn test_write_witness_reports_distinct_iterations() {
    let result = analyze(&fixture_single_write(3, 9, "i // 2"));
    let witness = result.write_write.witness().expect("i // 2 collides");
    let i0 = witness.assignment["i_0"];
    let i1 = witness.assignment["i_1"];
    assert_ne!(i0, i1);
    assert_eq!(floor_div(i0, 2), floor_div(i1, 2));
    assert!((3..9).contains(&i0) && (3..9).contains(&i1));
}

#[test]
fn test_any_statement_pair_can_conflict() {
    let source = fixture_loop(0, 10, &["a[i] = 1", "b[i] = 2", "c[3] = a[i]"]);
    assert_verdicts(&analyze(&source), (true, true));
}

#[test]
fn test_read_after_own_write_is_not_a_conflict() {
    let source = fixture_loop(0, 10, &["a[i] = 1", "b[i] = a[i]"]);
    assert_verdicts(&analyze(&source), (false, false));
}

#[test]
fn test_augmented_assignment_reads_target() {
    let source = fixture_loop(0, 10, &["a[i % 3] += 1"]);
    assert_verdicts(&analyze(&source), (true, true));
}

#[test]
fn test_constants_fold_into_bounds_and_indices() {
    let source = "\
n = 10
stride = n // 5
for i in range(n):
    a[stride * i] = a[stride * i + 1]
";
    assert_verdicts(&analyze(source), (false, false));
}

#[test]
fn test_negative_operands_use_floored_semantics() {
    // floor(-1 / 2) == -1 == floor(-2 / 2), truncation would give 0 and -1.
    let source = fixture_single_write(-2, 0, "i // 2");
    assert_verdicts(&analyze(&source), (true, false));

    // (-3) % 3 == 0 and (-1) % 3 == 2: the only colliding pair is (-3, 0).
    let source = fixture_single_write(-3, 1, "i % 3");
    let result = analyze(&source);
    let witness = result.write_write.witness().expect("i % 3 collides");
    let mut pair = [witness.assignment["i_0"], witness.assignment["i_1"]];
    pair.sort();
    assert_eq!(pair, [-3, 0]);
}

#[test]
fn test_division_by_zero_access_is_unreachable() {
    let source = fixture_loop(0, 10, &["a[i // (i - i)] = 0"]);
    assert_verdicts(&analyze(&source), (false, false));
}

#[test]
fn test_budget_exhaustion_is_indeterminate() {
    let config = AnalysisConfig::default().with_max_assignments(10);
    let source = fixture_single_write(0, 1_000_000, "i * i % 1000003");
    let result = analyze_source(&source, &config).unwrap();
    assert!(result.is_indeterminate());
    assert!(matches!(result.write_write, ConflictVerdict::Indeterminate(_)));
    let err = result.is_parallelizable().unwrap_err();
    assert!(matches!(err, AnalysisError::IndeterminateConflict { .. }));
}

// ═══════════════════════════════════════════════════════════════════════════
// Extraction errors
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_extraction_errors() {
    let config = AnalysisConfig::default();
    let cases = [
        ("a[0] = 1\n", "malformed"),
        ("for i in items:\n    a[i] = 0\n", "malformed"),
        ("for i in range(0, 10, 2):\n    a[i] = 0\n", "malformed"),
        ("for i in range(4):\n    x = i\n", "unsupported"),
        ("for i in range(4):\n    a[k] = i\n", "unbound"),
        ("for i in range(m):\n    a[i] = 0\n", "unbound"),
        ("for i in range(4)\n    a[i] = 0\n", "parse"),
    ];
    for (source, kind) in cases {
        assert_extraction_error(analyze_source(source, &config), kind);
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Properties
// ═══════════════════════════════════════════════════════════════════════════

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_analysis_is_deterministic(offset in -4i64..4, scale in 1i64..4, upper in 0i64..40) {
        let index = format!("{scale} * i{}", signed(offset));
        let source = fixture_loop(0, upper, &[&format!("a[{index}] = a[i]")]);
        let first = analyze(&source);
        let second = analyze(&source);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_offset_read_matches_brute_force(offset in -6i64..6, lower in -5i64..5, len in 0i64..12) {
        let upper = lower + len;
        let source = fixture_loop(lower, upper, &[&format!("a[i] = a[i{}]", signed(offset))]);
        let expected = (lower..upper)
            .any(|r| (lower..upper).any(|w| r != w && r + offset == w));
        assert_verdicts(&analyze(&source), (false, expected));
    }

    #[test]
    fn prop_floored_division_matches_definition(a in -1000i64..1000, b in -50i64..50) {
        prop_assume!(b != 0);
        let q = floor_div(a, b).unwrap();
        let r = floor_mod(a, b).unwrap();
        prop_assert_eq!(q * b + r, a);
        prop_assert!(r == 0 || (r < 0) == (b < 0));
        prop_assert!(r.abs() < b.abs());
    }
}
