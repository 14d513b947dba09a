//! Error types for permitlens.

use std::path::{Path, PathBuf};

/// Errors that can occur while building, validating, or rendering a dashboard.
///
/// All error variants are marked with `#[non_exhaustive]` to allow
/// adding new error types without breaking changes.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// What configuration is problematic
        message: String,
    },

    /// Input validation error
    #[error(
        "Validation error: {}{message}",
        field.as_deref().map(|f| format!("{f} ")).unwrap_or_default()
    )]
    Validation {
        /// Field or aspect that failed validation
        field: Option<String>,
        /// What went wrong
        message: String,
    },

    /// A panel references a selection parameter that no panel declares.
    #[error("Selection '{name}' is referenced by panel '{panel}' but never declared")]
    UndeclaredSelection {
        /// Parameter name
        name: String,
        /// Panel holding the dangling reference
        panel: String,
    },

    /// A selection parameter is declared by more than one panel.
    #[error("Selection '{name}' is declared by more than one panel: {}", panels.join(", "))]
    DuplicateSelection {
        /// Parameter name
        name: String,
        /// Every panel declaring it
        panels: Vec<String>,
    },

    /// Filter references between panels form a cycle.
    #[error("Selection filters form a cycle through: {}", panels.join(" -> "))]
    SelectionCycle {
        /// Panels on the cycle
        panels: Vec<String>,
    },

    /// Mount point could not be cleared or attached to
    #[error("Mount '{mount}' failed: {message}")]
    Mount {
        /// Mount identifier
        mount: String,
        /// What went wrong
        message: String,
    },

    /// A named item could not be found
    #[error("{kind} not found: {id}")]
    NotFound {
        /// Kind of item (e.g. "panel", "selection")
        kind: String,
        /// Identifier that was looked up
        id: String,
    },

    /// I/O error without path context
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// I/O error on a specific path
    #[error("I/O error on {path}: {source}")]
    IoPath {
        /// Path being accessed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Convenience `Result` type alias for permitlens operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Creates a new configuration error.
    pub fn config<S: Into<String>>(message: S) -> Self {
        Error::Config {
            message: message.into(),
        }
    }

    /// Creates a new validation error.
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Error::Validation {
            field: None,
            message: message.into(),
        }
    }

    /// Creates a new validation error with a field name.
    pub fn validation_field<F, M>(field: F, message: M) -> Self
    where
        F: Into<String>,
        M: Into<String>,
    {
        Error::Validation {
            field: Some(field.into()),
            message: message.into(),
        }
    }

    /// Creates a new mount error.
    pub fn mount<I, M>(mount: I, message: M) -> Self
    where
        I: Into<String>,
        M: Into<String>,
    {
        Error::Mount {
            mount: mount.into(),
            message: message.into(),
        }
    }

    /// Creates a not-found error.
    pub fn not_found(kind: impl Into<String>, id: impl Into<String>) -> Self {
        Error::NotFound {
            kind: kind.into(),
            id: id.into(),
        }
    }

    /// Wraps an I/O error with the path that produced it.
    pub fn io_with_path(source: std::io::Error, path: impl AsRef<Path>) -> Self {
        Error::IoPath {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Returns whether this error comes from the selection dependency graph.
    pub fn is_selection_error(&self) -> bool {
        matches!(
            self,
            Error::UndeclaredSelection { .. }
                | Error::DuplicateSelection { .. }
                | Error::SelectionCycle { .. }
        )
    }
}
