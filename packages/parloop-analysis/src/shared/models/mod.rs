//! Shared models

pub mod integer;
pub mod span;

pub use integer::{floor_div, floor_mod};
pub use span::Span;
