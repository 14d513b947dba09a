//! Common test utilities for permitlens-render integration tests.

use permitlens_core::{DashboardConfig, SelectionPolicy};
use permitlens_render::{DashboardSession, FileMount, MemoryMount};
use std::path::PathBuf;
use tempfile::TempDir;

/// Test harness owning a config and a scratch directory.
pub struct TestHarness {
    /// Configuration sessions are created from.
    pub config: DashboardConfig,
    /// Scratch directory for file mounts.
    pub dir: TempDir,
}

impl TestHarness {
    /// Harness with the default configuration.
    pub fn new() -> Self {
        Self {
            config: DashboardConfig::default(),
            dir: TempDir::new().expect("create temp dir"),
        }
    }

    /// Harness with the given selection policy.
    pub fn with_policy(policy: SelectionPolicy) -> Self {
        let mut harness = Self::new();
        harness.config.selection.policy = policy;
        harness
    }

    /// Session rendering into memory.
    pub fn memory_session(&self) -> DashboardSession<MemoryMount> {
        DashboardSession::new(
            self.config.clone(),
            MemoryMount::new(&self.config.ui.mount_id),
        )
        .expect("valid config")
    }

    /// Path inside the scratch directory.
    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Session rendering into `name` inside the scratch directory.
    pub fn file_session(&self, name: &str) -> DashboardSession<FileMount> {
        DashboardSession::new(
            self.config.clone(),
            FileMount::new(&self.config.ui.mount_id, self.path(name)),
        )
        .expect("valid config")
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
