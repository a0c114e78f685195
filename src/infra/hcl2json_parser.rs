use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::process::Command;

use crate::app::ports::ConfigurationParser;
use crate::error::{InstallError, Result};

/// Shells out to `hcl2json <file>` and parses its standard output.
pub struct Hcl2JsonParser {
    bin: PathBuf,
}

impl Hcl2JsonParser {
    pub fn new(bin: impl Into<PathBuf>) -> Self {
        Self { bin: bin.into() }
    }
}

#[async_trait]
impl ConfigurationParser for Hcl2JsonParser {
    async fn parse(&self, file: &Path) -> Result<serde_json::Value> {
        let conversion_error = |message: String| InstallError::Conversion {
            file: file.to_path_buf(),
            message,
        };

        let out = Command::new(&self.bin)
            .arg(file)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| conversion_error(format!("failed to execute {}: {}", self.bin.display(), e)))?;

        let stderr = String::from_utf8_lossy(&out.stderr);
        if !out.status.success() {
            return Err(conversion_error(format!(
                "{} exited with {}: {}",
                self.bin.display(),
                out.status,
                stderr.trim()
            )));
        }
        if !stderr.trim().is_empty() {
            return Err(conversion_error(stderr.trim().to_string()));
        }

        serde_json::from_slice(&out.stdout)
            .map_err(|e| conversion_error(format!("invalid JSON output: {}", e)))
    }
}
