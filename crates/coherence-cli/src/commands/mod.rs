//! CLI command implementations.

pub mod analyze;
pub mod clear;
pub mod common;
pub mod compare;
pub mod convert;
pub mod formats;
pub mod results;
pub mod show;
pub mod stats;
