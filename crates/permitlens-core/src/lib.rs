//! permitlens core: shared types, errors, configuration, and the year filter.
//!
//! This crate provides the foundational pieces used by every permitlens
//! crate. It has no internal permitlens dependencies.
//!
//! # Modules
//!
//! - [`error`]: Error types and Result alias
//! - [`config`]: Dashboard configuration sections
//! - [`filter`]: Year filter predicate
//! - [`traits`]: `ConfigManager`

#![doc = include_str!("../README.md")]

pub mod config;
pub mod error;
pub mod filter;
pub mod traits;

// Re-export key types at crate root for convenience
pub use config::{DashboardConfig, SelectionPolicy, VEGA_LITE_SCHEMA};
pub use error::{Error, Result};
pub use filter::{YearSelection, year_filter_expr};
pub use traits::ConfigManager;
