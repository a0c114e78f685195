use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::types::ResolvedModule;

/// On-disk shape of `modules.json`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Manifest {
    pub modules: Vec<ResolvedModule>,
}

/// Write `modules` as an indented document, replacing any existing file.
pub fn write_manifest(path: &Path, modules: &[ResolvedModule]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let manifest = Manifest {
        modules: modules.to_vec(),
    };
    let json_content = serde_json::to_string_pretty(&manifest)?;
    fs::write(path, json_content)?;
    Ok(())
}

pub fn read_manifest(path: &Path) -> Result<Manifest> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ModuleInfo, SourceType};
    use serde_json::{json, Value};
    use tempfile::tempdir;

    fn git_module() -> ResolvedModule {
        ResolvedModule {
            download_to_dir: ".terraform/modules/net".to_string(),
            repo_source: "https://example.com/net.git".to_string(),
            repo_revision: String::new(),
            source_type: SourceType::GitRepository,
            module_info: ModuleInfo {
                key: "net".to_string(),
                source: "git::https://example.com/net.git//modules/vpc".to_string(),
                dir: ".terraform/modules/net/modules/vpc".to_string(),
            },
        }
    }

    #[test]
    fn uses_pascal_case_fields_and_named_source_types() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/modules.json");
        write_manifest(&path, &[ResolvedModule::root("."), git_module()]).unwrap();

        let raw: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(
            raw,
            json!({
                "Modules": [
                    {
                        "DownloadToDir": "",
                        "RepoSource": "",
                        "RepoRevision": "",
                        "SourceType": "LocalPath",
                        "ModuleInfo": { "Key": "", "Source": "", "Dir": "." }
                    },
                    {
                        "DownloadToDir": ".terraform/modules/net",
                        "RepoSource": "https://example.com/net.git",
                        "RepoRevision": "",
                        "SourceType": "GitRepository",
                        "ModuleInfo": {
                            "Key": "net",
                            "Source": "git::https://example.com/net.git//modules/vpc",
                            "Dir": ".terraform/modules/net/modules/vpc"
                        }
                    }
                ]
            })
        );
    }

    #[test]
    fn overwrites_existing_manifest() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("modules.json");
        fs::write(&path, "stale content that is not json").unwrap();

        write_manifest(&path, &[ResolvedModule::root("infra")]).unwrap();

        let manifest = read_manifest(&path).unwrap();
        assert_eq!(manifest.modules, vec![ResolvedModule::root("infra")]);
        assert!(fs::read_to_string(&path).unwrap().contains("\n  \"Modules\""));
    }
}
