//! Process-wide configuration, loaded once at startup.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

pub const DEFAULT_CONFIG_FILE: &str = "codereport.json";

/// Named options with built-in defaults; any subset may appear in the
/// external JSON file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Root directory for report artifacts; each request gets its own
    /// subdirectory underneath it.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Maximum accepted upload size in bytes.
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: u64,

    /// Program used to compile the LaTeX report.
    #[serde(default = "default_compiler")]
    pub compiler: String,

    /// Wall-clock bound on one compiler invocation.
    #[serde(default = "default_compile_timeout_secs")]
    pub compile_timeout_secs: u64,

    /// Optional HTTP endpoint for the qualitative review model; absent means
    /// the model pass is skipped.
    #[serde(default)]
    pub model_endpoint: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            max_upload_bytes: default_max_upload_bytes(),
            compiler: default_compiler(),
            compile_timeout_secs: default_compile_timeout_secs(),
            model_endpoint: None,
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("reports")
}

fn default_max_upload_bytes() -> u64 {
    1024 * 1024
}

fn default_compiler() -> String {
    "latexmk".to_string()
}

fn default_compile_timeout_secs() -> u64 {
    60
}

impl Config {
    /// Load configuration from `path`, falling back to defaults when the
    /// file is absent or unreadable. A malformed file is an error worth
    /// logging but never fatal.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => {
                    log::info!("Loaded configuration from {}", path.display());
                    config
                }
                Err(e) => {
                    log::error!("Error loading config {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(_) => {
                log::warn!("Config file {} not found, using defaults", path.display());
                Self::default()
            }
        }
    }
}

static CONFIG: OnceLock<Config> = OnceLock::new();

/// Process-wide configuration, initialized on first access from the default
/// config file. Read-only thereafter.
pub fn get_config() -> &'static Config {
    CONFIG.get_or_init(|| Config::load(Path::new(DEFAULT_CONFIG_FILE)))
}
