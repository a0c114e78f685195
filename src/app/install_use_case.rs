use std::collections::HashSet;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

use crate::app::ports::{ConfigurationParser, SourceFetcher};
use crate::cache::{absolute_path, reset_cache};
use crate::config::InstallConfig;
use crate::error::{InstallError, Result};
use crate::fetcher::{FetchOutcome, Fetcher};
use crate::manifest::write_manifest;
use crate::resolver::PathResolver;
use crate::scanner::DeclarationScanner;
use crate::types::{ResolvedModule, SourceType};

type WalkFuture<'a> = Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>>;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct InstallStats {
    pub cloned: usize,
    pub fetch_failures: usize,
    pub already_present: usize,
    pub skipped_registry: usize,
    pub duplicates: usize,
}

/// State threaded through one walk: the ordered module list plus cycle bookkeeping.
#[derive(Debug, Default)]
pub struct InstallContext {
    modules: Vec<ResolvedModule>,
    stack: Vec<PathBuf>,
    visited: HashSet<(SourceType, PathBuf)>,
    // Destinations already fetched or attempted during this run
    attempted: HashSet<(SourceType, PathBuf)>,
    pub stats: InstallStats,
}

impl InstallContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Context whose first entry is the root module at `root_dir`.
    pub fn with_root(root_dir: &Path) -> Self {
        let mut ctx = Self::new();
        ctx.modules
            .push(ResolvedModule::root(root_dir.to_string_lossy()));
        ctx
    }

    pub fn modules(&self) -> &[ResolvedModule] {
        &self.modules
    }

    pub fn into_modules(self) -> Vec<ResolvedModule> {
        self.modules
    }
}

#[derive(Debug)]
pub struct InstallSummary {
    pub modules: Vec<ResolvedModule>,
    pub manifest_path: PathBuf,
    pub stats: InstallStats,
}

/// Resolves the module tree below a root directory and records it in the manifest.
pub struct InstallUseCase {
    scanner: DeclarationScanner,
    resolver: PathResolver,
    fetcher: Fetcher,
    cache_dir: PathBuf,
    manifest_path: PathBuf,
    max_depth: Option<usize>,
}

impl InstallUseCase {
    pub fn new(
        parser: Arc<dyn ConfigurationParser>,
        source_fetcher: Arc<dyn SourceFetcher>,
        config: &InstallConfig,
    ) -> Self {
        Self {
            scanner: DeclarationScanner::new(parser, config.config_extension.clone()),
            resolver: PathResolver::new(config.cache_dir.clone()),
            fetcher: Fetcher::new(source_fetcher),
            cache_dir: PathBuf::from(&config.cache_dir),
            manifest_path: config.manifest_path(),
            max_depth: config.max_depth,
        }
    }

    /// Reset the cache, walk from `root_dir`, then write the manifest.
    ///
    /// A fatal error leaves no manifest behind.
    #[instrument(skip(self), fields(root = %root_dir.display()))]
    pub async fn run(&self, root_dir: &Path) -> Result<InstallSummary> {
        reset_cache(&self.cache_dir);

        let mut ctx = InstallContext::with_root(root_dir);
        if let Err(e) = self.walk(root_dir.to_path_buf(), &mut ctx, String::new()).await {
            error!("Module installation aborted: {}", e);
            return Err(e);
        }

        write_manifest(&self.manifest_path, ctx.modules())?;
        info!(
            "All modules downloaded and written to {} ({} modules, {} cloned, {} failed)",
            self.manifest_path.display(),
            ctx.modules().len(),
            ctx.stats.cloned,
            ctx.stats.fetch_failures
        );

        let stats = ctx.stats.clone();
        Ok(InstallSummary {
            modules: ctx.into_modules(),
            manifest_path: self.manifest_path.clone(),
            stats,
        })
    }

    /// Depth-first, pre-order walk of the modules declared under `directory`.
    ///
    /// `prefix` is empty at the root, otherwise the parent key followed by `.`.
    pub fn walk<'a>(
        &'a self,
        directory: PathBuf,
        ctx: &'a mut InstallContext,
        prefix: String,
    ) -> WalkFuture<'a> {
        Box::pin(async move {
            let depth = ctx.stack.len();
            if let Some(max_depth) = self.max_depth {
                if depth > max_depth {
                    return Err(InstallError::DepthExceeded {
                        key: prefix.trim_end_matches('.').to_string(),
                        max_depth,
                    });
                }
            }

            let normalized = absolute_path(&directory);
            ctx.visited.insert((SourceType::LocalPath, normalized.clone()));
            ctx.stack.push(normalized);

            for declaration in self.scanner.scan(&directory).await {
                let source_type = declaration.source_type;
                match source_type {
                    SourceType::TerraformRegistry => {
                        warn!(
                            "Skipping registry module {} ({}): registry sources are not supported",
                            declaration.reference.key, declaration.reference.source
                        );
                        ctx.stats.skipped_registry += 1;
                        continue;
                    }
                    SourceType::Unknown => {
                        return Err(InstallError::UnknownSource {
                            module_source: declaration.reference.source,
                            dir: directory,
                        });
                    }
                    SourceType::GitRepository | SourceType::LocalPath => {}
                }

                let resolved = self
                    .resolver
                    .resolve(&declaration.reference, source_type, &prefix);

                // An empty destination means nothing to download, so it never counts as present.
                let destination = PathBuf::from(&resolved.download_to_dir);
                if !resolved.download_to_dir.is_empty() && destination.exists() {
                    debug!(
                        "{} already present at {}",
                        resolved.key(),
                        destination.display()
                    );
                    ctx.stats.already_present += 1;
                    continue;
                }

                // Local modules have no download slot; their derived dir is the destination.
                let slot = if resolved.download_to_dir.is_empty() {
                    &resolved.module_info.dir
                } else {
                    &resolved.download_to_dir
                };
                if !ctx
                    .attempted
                    .insert((source_type, absolute_path(Path::new(slot))))
                {
                    debug!(
                        "{} already attempted at {}, skipping duplicate declaration",
                        resolved.key(),
                        slot
                    );
                    ctx.stats.duplicates += 1;
                    continue;
                }

                match self.fetcher.fetch(&resolved, &destination).await {
                    Ok(FetchOutcome::Cloned) => ctx.stats.cloned += 1,
                    Ok(_) => {}
                    Err(e @ InstallError::Fetch { .. }) => {
                        error!("{}", e);
                        metrics::counter!("tfmod_fetch_failures_total").increment(1);
                        ctx.stats.fetch_failures += 1;
                    }
                    Err(e) => return Err(e),
                }

                metrics::counter!(
                    "tfmod_modules_resolved_total",
                    "source_type" => source_type.as_str()
                )
                .increment(1);
                ctx.modules.push(resolved.clone());

                let child_dir = PathBuf::from(&resolved.module_info.dir);
                let child_normalized = absolute_path(&child_dir);
                if ctx.stack.contains(&child_normalized) {
                    return Err(InstallError::CycleDetected {
                        key: resolved.module_info.key,
                        dir: child_dir,
                    });
                }
                if !ctx.visited.insert((source_type, child_normalized)) {
                    debug!(
                        "{} already walked, not descending again",
                        child_dir.display()
                    );
                    continue;
                }

                self.walk(child_dir, ctx, resolved.child_prefix()).await?;
            }

            ctx.stack.pop();
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::collections::HashMap;
    use std::fs;
    use std::sync::Mutex;
    use tempfile::tempdir;

    /// Returns a canned document per file path.
    struct MapParser {
        docs: HashMap<PathBuf, Value>,
    }

    #[async_trait]
    impl ConfigurationParser for MapParser {
        async fn parse(&self, file: &Path) -> Result<Value> {
            Ok(self.docs.get(file).cloned().unwrap_or_else(|| json!({})))
        }
    }

    #[derive(Default)]
    struct CountingFetcher {
        calls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl SourceFetcher for CountingFetcher {
        async fn clone_repository(&self, url: &str, destination: &Path) -> Result<()> {
            self.calls.lock().unwrap().push(url.to_string());
            fs::create_dir_all(destination)?;
            Ok(())
        }
    }

    fn config_for(cache: &Path) -> InstallConfig {
        InstallConfig {
            cache_dir: cache.to_string_lossy().into_owned(),
            ..InstallConfig::default()
        }
    }

    #[tokio::test]
    async fn root_is_first_and_children_follow_in_pre_order() {
        let root = tempdir().unwrap();
        let cache = tempdir().unwrap();
        let main_tf = root.path().join("main.tf");
        fs::write(&main_tf, "").unwrap();

        let parser = Arc::new(MapParser {
            docs: HashMap::from([(
                main_tf,
                json!({ "module": { "net": [{ "source": "https://example.com/net.git" }] } }),
            )]),
        });
        let fetcher = Arc::new(CountingFetcher::default());
        let use_case = InstallUseCase::new(parser, fetcher.clone(), &config_for(cache.path()));

        let summary = use_case.run(root.path()).await.unwrap();

        let keys: Vec<&str> = summary.modules.iter().map(|m| m.key()).collect();
        assert_eq!(keys, vec!["", "net"]);
        assert_eq!(summary.modules[0].module_info.dir, root.path().to_string_lossy());
        assert_eq!(summary.stats.cloned, 1);
        assert!(summary.manifest_path.exists());
    }

    #[tokio::test]
    async fn unknown_source_aborts_without_manifest() {
        let root = tempdir().unwrap();
        let cache = tempdir().unwrap();
        let main_tf = root.path().join("main.tf");
        fs::write(&main_tf, "").unwrap();

        let parser = Arc::new(MapParser {
            docs: HashMap::from([(
                main_tf,
                json!({ "module": { "odd": [{ "source": "unknown-scheme://thing" }] } }),
            )]),
        });
        let config = config_for(cache.path());
        let use_case = InstallUseCase::new(parser, Arc::new(CountingFetcher::default()), &config);

        let err = use_case.run(root.path()).await.unwrap_err();
        assert!(matches!(err, InstallError::UnknownSource { ref module_source, .. } if module_source == "unknown-scheme://thing"));
        assert!(!config.manifest_path().exists());
    }
}
