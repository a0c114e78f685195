use async_trait::async_trait;
use std::path::Path;

use crate::error::Result;

/// Converts one configuration file into its structured (JSON object tree) form.
#[async_trait]
pub trait ConfigurationParser: Send + Sync {
    async fn parse(&self, file: &Path) -> Result<serde_json::Value>;
}

/// Materializes a repository into a destination directory.
#[async_trait]
pub trait SourceFetcher: Send + Sync {
    async fn clone_repository(&self, url: &str, destination: &Path) -> Result<()>;
}
