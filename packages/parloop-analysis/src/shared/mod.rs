//! Shared models used across feature slices

pub mod models;
