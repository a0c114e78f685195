use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

use crate::types::SourceType;

static GIT_SOURCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(git::|https://|git@|ssh://|git://|github\.com|bitbucket\.org)")
        .expect("git source pattern is valid")
});

// <namespace>/<name>/<provider>
static REGISTRY_SOURCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[\w-]+/[\w-]+/[\w-]+$").expect("registry source pattern is valid")
});

/// Classify a declared module source.
///
/// Repository prefixes win over local existence, which wins over the registry
/// triplet. `working_dir` is the directory local sources are relative to.
pub fn classify(source: &str, working_dir: &Path) -> SourceType {
    if is_git_repository(source) {
        return SourceType::GitRepository;
    }
    if is_local_path(source, working_dir) {
        return SourceType::LocalPath;
    }
    if is_terraform_registry(source) {
        return SourceType::TerraformRegistry;
    }
    SourceType::Unknown
}

pub fn is_git_repository(source: &str) -> bool {
    GIT_SOURCE.is_match(source)
}

pub fn is_local_path(source: &str, working_dir: &Path) -> bool {
    if source.is_empty() {
        return false;
    }
    working_dir.join(source).exists()
}

pub fn is_terraform_registry(source: &str) -> bool {
    REGISTRY_SOURCE.is_match(source)
}
