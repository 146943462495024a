//! Shared display helpers

pub mod number_format;

pub use number_format::{capitalize, format_inr};
