//! Storage infrastructure: configuration file persistence.
//!
//! The `config` sub-module reads and writes `launcher_config.json`, the small
//! JSON document that remembers the PotPlayer and helper paths between runs.
//! A missing or broken file is never fatal; the launcher simply asks for the
//! paths again.

pub mod config;
