use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, instrument, warn};
use walkdir::{DirEntry, WalkDir};

use crate::app::ports::ConfigurationParser;
use crate::classifier::classify;
use crate::types::{ModuleDeclaration, ModuleReference};

/// Finds `module` declarations in every configuration file under a directory.
pub struct DeclarationScanner {
    parser: Arc<dyn ConfigurationParser>,
    extension: String,
}

impl DeclarationScanner {
    pub fn new(parser: Arc<dyn ConfigurationParser>, extension: impl Into<String>) -> Self {
        Self {
            parser,
            extension: extension.into(),
        }
    }

    /// Scan `directory` and classify every declared source relative to it.
    ///
    /// A missing directory yields nothing. Files the parser rejects are skipped.
    #[instrument(skip(self), fields(dir = %directory.display()))]
    pub async fn scan(&self, directory: &Path) -> Vec<ModuleDeclaration> {
        let mut declarations = Vec::new();

        for file in self.config_files(directory) {
            let doc = match self.parser.parse(&file).await {
                Ok(doc) => doc,
                Err(e) => {
                    warn!("Skipping {}: {}", file.display(), e);
                    metrics::counter!("tfmod_conversion_failures_total").increment(1);
                    continue;
                }
            };

            for reference in extract_references(&doc) {
                let source_type = classify(&reference.source, directory);
                debug!(
                    "Found module {} = {} ({}) in {}",
                    reference.key,
                    reference.source,
                    source_type,
                    file.display()
                );
                declarations.push(ModuleDeclaration {
                    reference,
                    source_type,
                });
            }
        }

        declarations
    }

    /// Configuration files under `directory`, recursively, in file-name order.
    /// Hidden directories such as `.git` and `.terraform` are not entered.
    pub fn config_files(&self, directory: &Path) -> Vec<PathBuf> {
        if !directory.is_dir() {
            debug!("{} does not exist, nothing to scan", directory.display());
            return Vec::new();
        }

        WalkDir::new(directory)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry))
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!("Failed to read entry under {}: {}", directory.display(), e);
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file())
            .filter(|entry| {
                entry
                    .path()
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| ext == self.extension)
            })
            .map(DirEntry::into_path)
            .collect()
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|name| name.starts_with('.'))
}

/// Pull `(key, source)` pairs out of a converted configuration document.
///
/// Each entry under `module` is either a list of instances or a single
/// instance object; instances without a string `source` are ignored.
pub fn extract_references(doc: &Value) -> Vec<ModuleReference> {
    let Some(modules) = doc.get("module").and_then(Value::as_object) else {
        return Vec::new();
    };

    let mut references = Vec::new();
    for (key, value) in modules {
        let instances: Vec<&Value> = match value {
            Value::Array(items) => items.iter().collect(),
            Value::Object(_) => vec![value],
            _ => continue,
        };

        for instance in instances {
            if let Some(source) = instance.get("source").and_then(Value::as_str) {
                references.push(ModuleReference {
                    key: key.clone(),
                    source: source.to_string(),
                });
            }
        }
    }
    references
}
