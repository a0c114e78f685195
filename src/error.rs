use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum InstallError {
    #[error("Unknown module source: {module_source} (declared in {})", dir.display())]
    UnknownSource { module_source: String, dir: PathBuf },

    #[error("Module cycle detected: {key} re-enters {}", dir.display())]
    CycleDetected { key: String, dir: PathBuf },

    #[error("Module tree exceeds maximum depth {max_depth} at {key}")]
    DepthExceeded { key: String, max_depth: usize },

    #[error("Failed to convert {}: {message}", file.display())]
    Conversion { file: PathBuf, message: String },

    #[error("Failed to fetch {module_source} into {}: {message}", destination.display())]
    Fetch {
        module_source: String,
        destination: PathBuf,
        message: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, InstallError>;
