//! Domain-specific assertions

use parloop_analysis::{AnalysisError, ConflictResult, Result};

/// Assert both verdicts are decided and equal `(write_write, read_write)`
pub fn assert_verdicts(result: &ConflictResult, expected: (bool, bool)) {
    match result.as_bools() {
        Ok(actual) => assert_eq!(
            actual, expected,
            "expected (write-write, read-write) = {expected:?}, got {actual:?}: {result:?}"
        ),
        Err(e) => panic!("expected decided verdicts {expected:?}, got {e}"),
    }
}

/// Assert every reported witness agrees with floored integer semantics,
/// i.e. the iteration values are distinct
pub fn assert_witnesses_distinct(result: &ConflictResult, variable: &str) {
    for verdict in [&result.write_write, &result.read_write] {
        if let Some(witness) = verdict.witness() {
            let v0 = witness.assignment.get(&format!("{variable}_0"));
            let v1 = witness.assignment.get(&format!("{variable}_1"));
            assert!(v0.is_some() && v1.is_some(), "witness lacks {variable}: {witness}");
            assert_ne!(v0, v1, "witness iterations coincide: {witness}");
        }
    }
}

/// Assert an extraction error of the expected kind
pub fn assert_extraction_error(result: Result<ConflictResult>, kind: &str) {
    match result {
        Err(e) => {
            assert!(e.is_extraction_error(), "expected extraction error, got {e}");
            let matches = match kind {
                "malformed" => matches!(e, AnalysisError::MalformedLoop { .. }),
                "unsupported" => matches!(e, AnalysisError::UnsupportedConstruct { .. }),
                "unbound" => matches!(e, AnalysisError::UnboundVariable { .. }),
                "parse" => matches!(e, AnalysisError::Parse { .. }),
                other => panic!("unknown error kind {other}"),
            };
            assert!(matches, "expected {kind} error, got {e:?}");
        }
        Ok(result) => panic!("expected {kind} error, got {result:?}"),
    }
}
