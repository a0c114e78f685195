use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::{info, warn};

use crate::app::ports::SourceFetcher;
use crate::error::{InstallError, Result};
use crate::resolver::strip_forced_getter;

/// Clones repositories with `git clone <url> <destination>`.
pub struct GitFetcher {
    bin: PathBuf,
}

impl GitFetcher {
    pub fn new(bin: impl Into<PathBuf>) -> Self {
        Self { bin: bin.into() }
    }
}

#[async_trait]
impl SourceFetcher for GitFetcher {
    async fn clone_repository(&self, url: &str, destination: &Path) -> Result<()> {
        let url = strip_forced_getter(url);
        info!("Cloning {} into {}...", url, destination.display());

        let fetch_error = |message: String| InstallError::Fetch {
            module_source: url.to_string(),
            destination: destination.to_path_buf(),
            message,
        };

        let out = Command::new(&self.bin)
            .arg("clone")
            .arg(url)
            .arg(destination)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| fetch_error(format!("failed to execute {}: {}", self.bin.display(), e)))?;

        if !out.status.success() {
            let code = out
                .status
                .code()
                .map(|c| c.to_string())
                .unwrap_or_else(|| "signal".to_string());
            let stderr = String::from_utf8_lossy(&out.stderr);
            warn!("Failed to clone {}. Exit code: {}", url, code);
            return Err(fetch_error(format!("exit code {}: {}", code, stderr.trim())));
        }
        Ok(())
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn successful_exit_is_a_clone() {
        let dir = tempdir().unwrap();
        GitFetcher::new("true")
            .clone_repository("git::https://example.com/net.git", &dir.path().join("net"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn non_zero_exit_is_a_fetch_error() {
        let dir = tempdir().unwrap();
        let err = GitFetcher::new("false")
            .clone_repository("git::https://example.com/net.git", &dir.path().join("net"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            InstallError::Fetch { ref module_source, ref message, .. }
                if module_source == "https://example.com/net.git" && message.starts_with("exit code 1")
        ));
    }
}
