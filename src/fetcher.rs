use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::app::ports::SourceFetcher;
use crate::error::{InstallError, Result};
use crate::types::{ResolvedModule, SourceType};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Cloned,
    /// Local sources are used where they are
    AlreadyLocal,
    /// Registry sources are not downloaded
    Skipped,
}

/// Dispatches materialization by source classification.
pub struct Fetcher {
    source_fetcher: Arc<dyn SourceFetcher>,
}

impl Fetcher {
    pub fn new(source_fetcher: Arc<dyn SourceFetcher>) -> Self {
        Self { source_fetcher }
    }

    /// Fetch `module` into `destination`.
    ///
    /// `Fetch` errors are recoverable for the caller; `UnknownSource` is not.
    pub async fn fetch(&self, module: &ResolvedModule, destination: &Path) -> Result<FetchOutcome> {
        match module.source_type {
            SourceType::GitRepository => {
                self.source_fetcher
                    .clone_repository(&module.repo_source, destination)
                    .await?;
                Ok(FetchOutcome::Cloned)
            }
            SourceType::LocalPath => {
                debug!("{} is a local module, nothing to fetch", module.key());
                Ok(FetchOutcome::AlreadyLocal)
            }
            SourceType::TerraformRegistry => {
                warn!(
                    "Registry module {} ({}) is not supported yet, skipping",
                    module.key(),
                    module.module_info.source
                );
                Ok(FetchOutcome::Skipped)
            }
            SourceType::Unknown => Err(InstallError::UnknownSource {
                module_source: module.module_info.source.clone(),
                dir: PathBuf::from(destination),
            }),
        }
    }
}
