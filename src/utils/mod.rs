//! Shared helper utilities.

pub mod validation;
