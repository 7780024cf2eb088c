//! Test fixture generators and on-disk fixtures

use std::path::PathBuf;

/// Path of a file under `tests/fixtures`
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Contents of a file under `tests/fixtures`
pub fn fixture_source(name: &str) -> String {
    std::fs::read_to_string(fixture_path(name))
        .unwrap_or_else(|e| panic!("missing fixture {name}: {e}"))
}

/// Single loop over `range(lower, upper)` with the given body lines
pub fn fixture_loop(lower: i64, upper: i64, body: &[&str]) -> String {
    let body: String = body.iter().map(|line| format!("    {line}\n")).collect();
    format!("for i in range({lower}, {upper}):\n{body}")
}

/// `a[<index>] = 0` inside `range(lower, upper)`
pub fn fixture_single_write(lower: i64, upper: i64, index: &str) -> String {
    fixture_loop(lower, upper, &[&format!("a[{index}] = 0")])
}
