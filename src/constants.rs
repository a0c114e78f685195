/// Defaults shared by the configuration layer and the CLI

// Module cache root, relative to the invocation directory
pub const DEFAULT_CACHE_DIR: &str = ".terraform/modules";
pub const DEFAULT_MANIFEST_FILE: &str = "modules.json";

// External collaborators
pub const DEFAULT_HCL2JSON_BIN: &str = "hcl2json";
pub const DEFAULT_GIT_BIN: &str = "git";

/// Extension of configuration files picked up by the scanner
pub const DEFAULT_CONFIG_EXTENSION: &str = "tf";

/// Optional config file looked up in the current directory
pub const CONFIG_FILE: &str = "tfmod.toml";

/// Forced-getter marker that may precede a repository URL
pub const GIT_FORCED_GETTER: &str = "git::";

/// Separator between a repository URL and a sub-path inside it
pub const SUBDIR_SEPARATOR: &str = "//";
