//! Configuration module
//!
//! Settings loaded from the TOML config file; everything has a default so a
//! missing or partial file is fine.

pub mod config;

pub use config::Config;
