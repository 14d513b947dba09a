//! permitlens spec: the dashboard's Vega-Lite specification.
//!
//! # Modules
//!
//! - [`types`]: Typed Vega-Lite model
//! - [`builder`]: Spec Builder
//! - [`graph`]: Selection dependency graph
//! - [`selection`]: Named selections

#![doc = include_str!("../README.md")]

pub mod builder;
pub mod graph;
pub mod selection;
pub mod types;

pub use builder::{SpecBuilder, build_spec};
pub use graph::{SelectionEdge, SelectionGraph};
pub use selection::Selection;
pub use types::{Panel, ViewNode, ViewSpec};
