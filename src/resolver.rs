use crate::constants::{GIT_FORCED_GETTER, SUBDIR_SEPARATOR};
use crate::types::{ModuleInfo, ModuleReference, ResolvedModule, SourceType};

/// Remove a leading `git::` forced-getter marker, if any.
pub fn strip_forced_getter(source: &str) -> &str {
    source.strip_prefix(GIT_FORCED_GETTER).unwrap_or(source)
}

/// Split a repository source into its URL and optional sub-path.
///
/// The `//` of a `scheme://` separator is never treated as the sub-path marker.
pub fn split_subdir(source: &str) -> (String, Option<String>) {
    let source = strip_forced_getter(source);
    let search_from = source.find("://").map(|idx| idx + 3).unwrap_or(0);

    match source[search_from..].find(SUBDIR_SEPARATOR) {
        Some(rel) => {
            let idx = search_from + rel;
            let repo = source[..idx].to_string();
            let subdir = &source[idx + SUBDIR_SEPARATOR.len()..];
            if subdir.is_empty() {
                (repo, None)
            } else {
                (repo, Some(subdir.to_string()))
            }
        }
        None => (source.to_string(), None),
    }
}

/// Derives fetch destinations and scan directories under the module cache root.
#[derive(Debug, Clone)]
pub struct PathResolver {
    cache_dir: String,
}

impl PathResolver {
    pub fn new(cache_dir: impl Into<String>) -> Self {
        let cache_dir: String = cache_dir.into();
        Self {
            cache_dir: cache_dir.trim_end_matches('/').to_string(),
        }
    }

    pub fn cache_dir(&self) -> &str {
        &self.cache_dir
    }

    /// `prefix` is empty at the root scope, otherwise the parent key followed by `.`.
    pub fn resolve(
        &self,
        reference: &ModuleReference,
        source_type: SourceType,
        prefix: &str,
    ) -> ResolvedModule {
        let key = format!("{}{}", prefix, reference.key);
        let slot = format!("{}/{}", self.cache_dir, key);

        match source_type {
            SourceType::GitRepository => {
                let (repo_source, subdir) = split_subdir(&reference.source);
                let dir = match subdir {
                    Some(sub) => format!("{}/{}", slot, sub),
                    None => slot.clone(),
                };
                ResolvedModule {
                    download_to_dir: slot,
                    repo_source,
                    repo_revision: String::new(),
                    source_type,
                    module_info: ModuleInfo {
                        key,
                        source: reference.source.clone(),
                        dir,
                    },
                }
            }
            // Nothing is downloaded; the declared source is appended to the slot as-is.
            SourceType::LocalPath => ResolvedModule {
                download_to_dir: String::new(),
                repo_source: String::new(),
                repo_revision: String::new(),
                source_type,
                module_info: ModuleInfo {
                    key,
                    source: reference.source.clone(),
                    dir: format!("{}{}", slot, reference.source),
                },
            },
            SourceType::TerraformRegistry | SourceType::Unknown => ResolvedModule {
                source_type,
                module_info: ModuleInfo {
                    key,
                    source: reference.source.clone(),
                    dir: String::new(),
                },
                ..ResolvedModule::default()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference(key: &str, source: &str) -> ModuleReference {
        ModuleReference {
            key: key.to_string(),
            source: source.to_string(),
        }
    }

    #[test]
    fn splits_subdir_after_scheme() {
        assert_eq!(
            split_subdir("git::https://example.com/net.git//modules/vpc"),
            ("https://example.com/net.git".to_string(), Some("modules/vpc".to_string()))
        );
        assert_eq!(
            split_subdir("https://example.com/net.git"),
            ("https://example.com/net.git".to_string(), None)
        );
        assert_eq!(
            split_subdir("git@github.com:org/repo.git//sub"),
            ("git@github.com:org/repo.git".to_string(), Some("sub".to_string()))
        );
        assert_eq!(
            split_subdir("github.com/org/repo//"),
            ("github.com/org/repo".to_string(), None)
        );
    }

    #[test]
    fn git_module_with_subdir() {
        let resolver = PathResolver::new(".terraform/modules");
        let resolved = resolver.resolve(
            &reference("net", "git::https://example.com/net.git//modules/vpc"),
            SourceType::GitRepository,
            "",
        );

        assert_eq!(resolved.repo_source, "https://example.com/net.git");
        assert_eq!(resolved.download_to_dir, ".terraform/modules/net");
        assert_eq!(resolved.module_info.dir, ".terraform/modules/net/modules/vpc");
        assert_eq!(resolved.module_info.key, "net");
        assert_eq!(
            resolved.module_info.source,
            "git::https://example.com/net.git//modules/vpc"
        );
        assert!(resolved.repo_revision.is_empty());
    }

    #[test]
    fn nested_git_module_uses_prefix() {
        let resolver = PathResolver::new(".terraform/modules/");
        let resolved = resolver.resolve(
            &reference("subnet", "https://example.com/subnet.git"),
            SourceType::GitRepository,
            "net.",
        );

        assert_eq!(resolved.download_to_dir, ".terraform/modules/net.subnet");
        assert_eq!(resolved.module_info.dir, ".terraform/modules/net.subnet");
        assert_eq!(resolved.module_info.key, "net.subnet");
    }

    #[test]
    fn local_module_appends_raw_source() {
        let resolver = PathResolver::new(".terraform/modules");
        let resolved = resolver.resolve(
            &reference("local", "./modules/local-mod"),
            SourceType::LocalPath,
            "net.",
        );

        assert!(resolved.download_to_dir.is_empty());
        assert!(resolved.repo_source.is_empty());
        assert_eq!(resolved.module_info.key, "net.local");
        assert_eq!(
            resolved.module_info.dir,
            ".terraform/modules/net.local./modules/local-mod"
        );
    }
}
