//! The infrastructure tree as seen by the wrapper: an absolute root plus its
//! loaded configuration.

use std::path::PathBuf;

use tfctl_common::RootId;
use tfctl_common::state_layout::{LIVE_DIR, MODULES_DIR};

use crate::domain::config::TfctlConfig;

/// An opened repository. `root` is absolute, so every directory derived from
/// it is independent of the caller's working directory.
#[derive(Debug, Clone)]
pub struct Repository {
    pub root: PathBuf,
    pub config: TfctlConfig,
}

impl Repository {
    #[must_use]
    pub fn new(root: PathBuf, config: TfctlConfig) -> Self {
        Self { root, config }
    }

    /// `<root>/live/<environment>/<layer>`.
    #[must_use]
    pub fn root_dir(&self, root: RootId) -> PathBuf {
        self.live_dir()
            .join(root.environment.as_str())
            .join(root.layer.as_str())
    }

    #[must_use]
    pub fn live_dir(&self) -> PathBuf {
        self.root.join(LIVE_DIR)
    }

    #[must_use]
    pub fn modules_dir(&self) -> PathBuf {
        self.root.join(MODULES_DIR)
    }

    /// Path relative to the repository root, for display.
    #[must_use]
    pub fn display_path(&self, path: &std::path::Path) -> String {
        path.strip_prefix(&self.root)
            .unwrap_or(path)
            .display()
            .to_string()
    }
}
