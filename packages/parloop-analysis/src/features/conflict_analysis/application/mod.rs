//! Use cases

pub mod analyze_file;

pub use analyze_file::{analyze_file, analyze_source};
