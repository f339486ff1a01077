//! Filesystem infrastructure: implements `RepoFs` over the real disk.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tfctl_common::state_layout::{PLAN_FILE, TF_DATA_DIR};

use crate::application::ports::RepoFs;

/// Production filesystem implementation of `RepoFs`.
pub struct LocalFs;

impl RepoFs for LocalFs {
    fn dir_exists(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn file_exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn subdirs(&self, path: &Path) -> Result<Vec<PathBuf>> {
        if !path.is_dir() {
            return Ok(Vec::new());
        }
        let mut dirs = Vec::new();
        for entry in
            std::fs::read_dir(path).with_context(|| format!("cannot read {}", path.display()))?
        {
            let entry = entry.with_context(|| format!("cannot read {}", path.display()))?;
            let file_type = entry.file_type()?;
            let name = entry.file_name();
            if file_type.is_dir() && !name.to_string_lossy().starts_with('.') {
                dirs.push(entry.path());
            }
        }
        dirs.sort();
        Ok(dirs)
    }

    fn remove_terraform_artifacts(&self, path: &Path) -> Result<Vec<PathBuf>> {
        let mut removed = Vec::new();
        remove_artifacts_in(path, &mut removed)?;
        removed.sort();
        Ok(removed)
    }
}

/// Depth-first walk. `.terraform/` directories are removed whole and not
/// descended into; symlinks are never followed.
fn remove_artifacts_in(dir: &Path, removed: &mut Vec<PathBuf>) -> Result<()> {
    for entry in std::fs::read_dir(dir).with_context(|| format!("cannot read {}", dir.display()))? {
        let entry = entry.with_context(|| format!("cannot read {}", dir.display()))?;
        let path = entry.path();
        let file_type = entry.file_type()?;
        let name = entry.file_name();

        if file_type.is_dir() {
            if name == TF_DATA_DIR {
                std::fs::remove_dir_all(&path)
                    .with_context(|| format!("cannot remove {}", path.display()))?;
                removed.push(path);
            } else {
                remove_artifacts_in(&path, removed)?;
            }
        } else if file_type.is_file() && name == PLAN_FILE {
            std::fs::remove_file(&path)
                .with_context(|| format!("cannot remove {}", path.display()))?;
            removed.push(path);
        }
    }
    Ok(())
}
