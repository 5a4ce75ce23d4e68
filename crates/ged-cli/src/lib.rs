//! CLI library components for the `ged5to7` converter.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod summary;
