//! Utility functions and helpers

pub mod formats;

pub use formats::{raw_from_sprs, to_sprs};
