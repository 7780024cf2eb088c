//! Syntax-to-model lowering

pub mod extractor;

pub use extractor::AccessExtractor;
