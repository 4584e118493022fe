//! Configuration loading and root folder resolution
//!
//! Bootstrap configuration comes from a per-module TOML file. A missing or
//! unreadable file never stops startup: the module logs a warning and runs
//! on compiled defaults.
//!
//! Root folder priority (highest first):
//! 1. Command-line argument
//! 2. `RUBIN_ROOT_FOLDER` environment variable
//! 3. `root_folder` in the module's TOML file
//! 4. OS-dependent compiled default

use crate::{Error, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Environment variable overriding the root folder
pub const ROOT_FOLDER_ENV: &str = "RUBIN_ROOT_FOLDER";

/// Environment variable pointing at an explicit config file
pub const CONFIG_FILE_ENV: &str = "RUBIN_CONFIG";

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Platform defaults used when nothing else is configured
#[derive(Debug, Clone)]
pub struct CompiledDefaults {
    pub root_folder: PathBuf,
    pub log_level: String,
}

impl CompiledDefaults {
    pub fn for_current_platform() -> Self {
        Self {
            root_folder: default_root_folder(),
            log_level: default_log_level(),
        }
    }
}

/// OS-dependent default root folder
fn default_root_folder() -> PathBuf {
    if cfg!(target_os = "linux") {
        // ~/.local/share/rubin
        dirs::data_local_dir()
            .map(|d| d.join("rubin"))
            .unwrap_or_else(|| PathBuf::from("/var/lib/rubin"))
    } else if cfg!(target_os = "macos") {
        // ~/Library/Application Support/rubin
        dirs::data_dir()
            .map(|d| d.join("rubin"))
            .unwrap_or_else(|| PathBuf::from("/Library/Application Support/rubin"))
    } else if cfg!(target_os = "windows") {
        // %LOCALAPPDATA%\rubin
        dirs::data_local_dir()
            .map(|d| d.join("rubin"))
            .unwrap_or_else(|| PathBuf::from("C:\\ProgramData\\rubin"))
    } else {
        PathBuf::from("./rubin_data")
    }
}

/// Default config file location for a module: `<config_dir>/rubin/<module>.toml`
pub fn default_config_path(module_name: &str) -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("rubin").join(format!("{}.toml", module_name)))
}

/// Locate the config file for a module
///
/// An explicit path wins, then `RUBIN_CONFIG`, then the default location.
/// Returns `None` when no candidate exists on disk.
pub fn locate_config_file(explicit: Option<&Path>, module_name: &str) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    if let Ok(path) = std::env::var(CONFIG_FILE_ENV) {
        return Some(PathBuf::from(path));
    }
    default_config_path(module_name).filter(|path| path.exists())
}

/// Parse a TOML config file into `T`
pub fn load_toml<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))
}

/// Load a config file, degrading to `T::default()` when it is missing or invalid
pub fn load_toml_or_default<T: DeserializeOwned + Default>(path: Option<&Path>) -> T {
    let Some(path) = path else {
        debug!("No config file found, using compiled defaults");
        return T::default();
    };

    match load_toml(path) {
        Ok(config) => {
            debug!(path = %path.display(), "Loaded config file");
            config
        }
        Err(e) => {
            warn!("{} - using compiled defaults", e);
            T::default()
        }
    }
}

/// Resolves the root folder following the documented priority order
pub struct RootFolderResolver {
    module_name: String,
    cli_arg: Option<PathBuf>,
    toml_value: Option<PathBuf>,
}

impl RootFolderResolver {
    pub fn new(module_name: &str) -> Self {
        Self {
            module_name: module_name.to_string(),
            cli_arg: None,
            toml_value: None,
        }
    }

    /// Root folder given on the command line
    pub fn with_cli_arg(mut self, path: Option<PathBuf>) -> Self {
        self.cli_arg = path;
        self
    }

    /// Root folder read from the module's TOML file
    pub fn with_toml_value(mut self, path: Option<PathBuf>) -> Self {
        self.toml_value = path;
        self
    }

    pub fn module_name(&self) -> &str {
        &self.module_name
    }

    pub fn resolve(&self) -> PathBuf {
        if let Some(path) = &self.cli_arg {
            return path.clone();
        }

        if let Ok(path) = std::env::var(ROOT_FOLDER_ENV) {
            if !path.trim().is_empty() {
                return PathBuf::from(path);
            }
        }

        if let Some(path) = &self.toml_value {
            return path.clone();
        }

        CompiledDefaults::for_current_platform().root_folder
    }
}

/// Creates the root folder layout on first start
pub struct RootFolderInitializer {
    root: PathBuf,
}

impl RootFolderInitializer {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding user-defined style profiles
    pub fn styles_path(&self) -> PathBuf {
        self.root.join("styles")
    }

    /// Create the root and styles directories (idempotent)
    pub fn ensure_directory_exists(&self) -> Result<()> {
        std::fs::create_dir_all(self.styles_path())?;
        Ok(())
    }
}
