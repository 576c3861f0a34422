//! Command-line driver for model-output intake.

pub mod cli;
pub mod commands;
pub mod config;
pub mod logging;
pub mod session;
pub mod summary;
pub mod types;
