//! # permitlens-cli
//!
//! Command implementations behind the `permitlens` binary:
//! - spec printing, file rendering, page generation and graph validation
//! - the live dashboard server
//! - configuration management (`config path|get|set|init|export`)

#![warn(clippy::all)]

pub mod cli;
pub mod commands;
pub mod config_handlers;
pub mod serve;

pub use cli::{Args, Command, ConfigAction};
