// ABOUTME: Artifact fetcher contract and the local-directory implementation.
// ABOUTME: Produces the working directory shared read-only by all Actions.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("artifact source is not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("could not materialize artifact: {0}")]
    Io(#[from] std::io::Error),
}

/// The artifact, materialized on local disk for the length of one
/// deployment. The backing directory is released when this is dropped,
/// which is how ActionCreator teardown pairs with setup.
pub struct WorkingDir {
    dir: TempDir,
}

impl WorkingDir {
    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}

impl std::fmt::Debug for WorkingDir {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkingDir").field("path", &self.path()).finish()
    }
}

/// Retrieves a deployable artifact into a [`WorkingDir`].
///
/// Remote sources (URLs, uploaded archives) are resolved by upstream
/// layers into a local path before reaching this contract.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, source: &Path) -> Result<WorkingDir, FetchError>;
}

/// Fetcher for sources already present on the local filesystem.
///
/// Copies the source tree so Actions never observe mutation of the
/// caller's directory mid-deployment.
#[derive(Debug, Default, Clone)]
pub struct LocalFetcher;

#[async_trait]
impl Fetcher for LocalFetcher {
    async fn fetch(&self, source: &Path) -> Result<WorkingDir, FetchError> {
        if !source.is_dir() {
            return Err(FetchError::NotADirectory(source.to_path_buf()));
        }

        let source = source.to_path_buf();
        let dir = tokio::task::spawn_blocking(move || -> Result<TempDir, FetchError> {
            let dir = TempDir::with_prefix("convoy-artifact-")?;
            copy_tree(&source, dir.path())?;
            Ok(dir)
        })
        .await
        .map_err(|e| FetchError::Io(std::io::Error::other(e)))??;

        Ok(WorkingDir { dir })
    }
}

fn copy_tree(from: &Path, to: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(from)? {
        let entry = entry?;
        let target = to.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            std::fs::create_dir(&target)?;
            copy_tree(&entry.path(), &target)?;
        } else {
            std::fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}
