//! permitlens render: mounting, embedding, and the interactive session.
//!
//! # Modules
//!
//! - [`mount`]: Mount points and `MountScope`
//! - [`embed`]: Renderer producing `vegaEmbed` calls
//! - [`session`]: Render orchestration and the year change listener
//! - [`page`]: HTML page generation

#![doc = include_str!("../README.md")]

pub mod embed;
pub mod mount;
pub mod page;
pub mod session;

pub use embed::{EmbedOptions, Renderer, VegaEmbedRenderer, Visualization};
pub use mount::{FileMount, MemoryMount, MountPoint, MountScope};
pub use page::{PageMode, build_live_page, build_page, build_static_page};
pub use session::{DashboardSession, RenderReport, YearSelector};
