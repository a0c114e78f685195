use serde::{Deserialize, Serialize};
use std::fmt;

/// Origin of a declared module source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SourceType {
    #[default]
    LocalPath,
    GitRepository,
    TerraformRegistry,
    Unknown,
}

impl SourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceType::LocalPath => "LocalPath",
            SourceType::GitRepository => "GitRepository",
            SourceType::TerraformRegistry => "TerraformRegistry",
            SourceType::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A `module "<key>" { source = "<source>" }` declaration found while scanning one directory.
/// The key is local to its parent scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleReference {
    pub key: String,
    pub source: String,
}

/// A reference together with its classification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleDeclaration {
    pub reference: ModuleReference,
    pub source_type: SourceType,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ModuleInfo {
    /// Dot-separated path through the module tree
    pub key: String,
    /// Source string as declared
    pub source: String,
    /// Directory scanned for this module's own children
    pub dir: String,
}

/// One manifest entry
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ResolvedModule {
    pub download_to_dir: String,
    pub repo_source: String,
    pub repo_revision: String,
    pub source_type: SourceType,
    pub module_info: ModuleInfo,
}

impl ResolvedModule {
    /// The first manifest entry: empty key and source, rooted at the invocation directory.
    pub fn root(dir: impl Into<String>) -> Self {
        Self {
            module_info: ModuleInfo {
                key: String::new(),
                source: String::new(),
                dir: dir.into(),
            },
            ..Self::default()
        }
    }

    pub fn key(&self) -> &str {
        &self.module_info.key
    }

    /// Prefix handed to this module's children
    pub fn child_prefix(&self) -> String {
        format!("{}.", self.module_info.key)
    }
}
