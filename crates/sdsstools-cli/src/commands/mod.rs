//! CLI command implementations.

pub mod config;
pub mod sjd;
pub mod version;
