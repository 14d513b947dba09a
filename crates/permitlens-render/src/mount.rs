//! Mount points.
//!
//! A mount point is the render target that holds the dashboard. Like a DOM
//! element, it does not replace its content on attach; it appends. The
//! engine would register every selection parameter again for a second
//! visualization in the same element, so each render must tear the old one
//! down first. [`MountScope`] makes that ordering structural: the only way to
//! attach is through a scope, and acquiring a scope clears the mount.

use crate::embed::Visualization;
use permitlens_core::{Error, Result};
use std::path::{Path, PathBuf};

/// A render target.
pub trait MountPoint {
    /// Element id the mount stands for.
    fn id(&self) -> &str;

    /// Remove everything currently mounted.
    fn clear(&mut self) -> Result<()>;

    /// Append a visualization.
    fn attach(&mut self, visualization: Visualization) -> Result<()>;

    /// Number of visualizations currently mounted.
    fn child_count(&self) -> usize;
}

/// Exclusive access to a freshly cleared mount point.
///
/// Consumed by [`MountScope::attach`], so a scope attaches at most once.
#[derive(Debug)]
pub struct MountScope<'m, M: MountPoint + ?Sized> {
    mount: &'m mut M,
}

impl<'m, M: MountPoint + ?Sized> MountScope<'m, M> {
    /// Clear `mount` and take exclusive access to it.
    pub fn acquire(mount: &'m mut M) -> Result<Self> {
        let before = mount.child_count();
        mount.clear()?;
        if mount.child_count() != 0 {
            return Err(Error::mount(mount.id(), "still has children after clear"));
        }
        tracing::debug!(mount = mount.id(), removed = before, "mount cleared");
        Ok(Self { mount })
    }

    /// Attach the visualization and release the mount.
    pub fn attach(self, visualization: Visualization) -> Result<()> {
        if visualization.mount_id != self.mount.id() {
            return Err(Error::mount(
                self.mount.id(),
                format!(
                    "visualization targets '{}' instead",
                    visualization.mount_id
                ),
            ));
        }
        self.mount.attach(visualization)
    }
}

// ============================================================================
// MemoryMount
// ============================================================================

/// In-memory mount point with DOM append semantics.
#[derive(Clone, Debug, Default)]
pub struct MemoryMount {
    id: String,
    children: Vec<Visualization>,
}

impl MemoryMount {
    /// Empty mount for element `id`.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            children: Vec::new(),
        }
    }

    /// Mounted visualizations, oldest first.
    pub fn children(&self) -> &[Visualization] {
        &self.children
    }

    /// Most recently attached visualization.
    pub fn current(&self) -> Option<&Visualization> {
        self.children.last()
    }
}

impl MountPoint for MemoryMount {
    fn id(&self) -> &str {
        &self.id
    }

    fn clear(&mut self) -> Result<()> {
        self.children.clear();
        Ok(())
    }

    fn attach(&mut self, visualization: Visualization) -> Result<()> {
        self.children.push(visualization);
        Ok(())
    }

    fn child_count(&self) -> usize {
        self.children.len()
    }
}

// ============================================================================
// FileMount
// ============================================================================

/// Mount point backed by a spec file on disk.
///
/// Attaching writes the spec JSON; clearing deletes the file. A file can
/// only hold one visualization, so attaching onto an existing file fails
/// instead of overwriting it silently.
#[derive(Clone, Debug)]
pub struct FileMount {
    id: String,
    path: PathBuf,
}

impl FileMount {
    /// Mount for element `id` written to `path`.
    pub fn new(id: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            id: id.into(),
            path: path.into(),
        }
    }

    /// Target file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl MountPoint for FileMount {
    fn id(&self) -> &str {
        &self.id
    }

    fn clear(&mut self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::io_with_path(e, &self.path)),
        }
    }

    fn attach(&mut self, visualization: Visualization) -> Result<()> {
        if self.path.exists() {
            return Err(Error::mount(
                &self.id,
                format!("{} already holds a visualization", self.path.display()),
            ));
        }
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| Error::io_with_path(e, parent))?;
        }
        std::fs::write(&self.path, &visualization.spec_json)
            .map_err(|e| Error::io_with_path(e, &self.path))
    }

    fn child_count(&self) -> usize {
        usize::from(self.path.is_file())
    }
}
