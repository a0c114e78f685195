use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::{
    CONFIG_FILE, DEFAULT_CACHE_DIR, DEFAULT_CONFIG_EXTENSION, DEFAULT_GIT_BIN,
    DEFAULT_HCL2JSON_BIN, DEFAULT_MANIFEST_FILE,
};
use crate::error::{InstallError, Result};

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct InstallConfig {
    /// Module cache root; repository modules land in `<cache_dir>/<key>`
    pub cache_dir: String,
    /// Manifest file name inside `cache_dir`
    pub manifest_file: String,
    pub hcl2json_bin: String,
    pub git_bin: String,
    pub config_extension: String,
    /// JSON file logs are written here when set
    pub log_dir: Option<PathBuf>,
    pub max_depth: Option<usize>,
}

impl Default for InstallConfig {
    fn default() -> Self {
        Self {
            cache_dir: DEFAULT_CACHE_DIR.to_string(),
            manifest_file: DEFAULT_MANIFEST_FILE.to_string(),
            hcl2json_bin: DEFAULT_HCL2JSON_BIN.to_string(),
            git_bin: DEFAULT_GIT_BIN.to_string(),
            config_extension: DEFAULT_CONFIG_EXTENSION.to_string(),
            log_dir: None,
            max_depth: None,
        }
    }
}

impl InstallConfig {
    /// Defaults, then `tfmod.toml` if present, then `TFMOD_*` environment variables.
    pub fn load() -> Result<Self> {
        let mut config = Self::from_file(Path::new(CONFIG_FILE))?;
        config.apply_overrides(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let config_content = fs::read_to_string(path).map_err(|e| {
            InstallError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Ok(toml::from_str(&config_content)?)
    }

    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(v) = lookup("TFMOD_CACHE_DIR") {
            self.cache_dir = v;
        }
        if let Some(v) = lookup("TFMOD_MANIFEST_FILE") {
            self.manifest_file = v;
        }
        if let Some(v) = lookup("TFMOD_HCL2JSON") {
            self.hcl2json_bin = v;
        }
        if let Some(v) = lookup("TFMOD_GIT") {
            self.git_bin = v;
        }
        if let Some(v) = lookup("TFMOD_LOG_DIR") {
            self.log_dir = Some(PathBuf::from(v));
        }
        if let Some(v) = lookup("TFMOD_MAX_DEPTH") {
            let depth = v.trim().parse::<usize>().map_err(|e| {
                InstallError::Config(format!("TFMOD_MAX_DEPTH must be a number, got '{}': {}", v, e))
            })?;
            self.max_depth = Some(depth);
        }
        Ok(())
    }

    pub fn manifest_path(&self) -> PathBuf {
        Path::new(&self.cache_dir).join(&self.manifest_file)
    }
}
