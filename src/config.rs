use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{CommentsmithError, Result};

/// Config files probed in the working directory when no path is given
const CONFIG_CANDIDATES: &[&str] = &[
    "Commentsmith.toml",
    "commentsmith.toml",
    ".commentsmith.toml",
];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Source code parsing configuration
    pub parsing: ParsingConfig,

    /// Comment generation service
    pub backend: BackendConfig,

    /// Log output settings
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParsingConfig {
    /// Maximum input size to parse (in bytes)
    pub max_file_size: usize,

    /// Sniff the language from the text when the extension is unknown
    pub content_detection_fallback: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Whether `comment` may call the service at all
    pub enabled: bool,

    /// Service root; requests go to `{base_url}/prompt`
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default level when `RUST_LOG` is not set (error, warn, info, debug, trace)
    pub level: String,
}

impl Default for ParsingConfig {
    fn default() -> Self {
        Self {
            max_file_size: 1024 * 1024, // 1MB
            content_detection_fallback: true,
        }
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: "http://localhost:8888".to_string(),
            timeout_secs: 30,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| CommentsmithError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| CommentsmithError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load configuration with fallback to default
    pub fn load_or_default<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        match path {
            Some(p) => {
                if p.as_ref().exists() {
                    Self::load(p)
                } else {
                    Ok(Self::default())
                }
            }
            None => Self::load_from_dir(Path::new(".")),
        }
    }

    /// First candidate config file found in `dir`, or the defaults
    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        for candidate in CONFIG_CANDIDATES {
            let path = dir.join(candidate);
            if path.exists() {
                return Self::load(path);
            }
        }

        Ok(Self::default())
    }

    fn validate(&self) -> Result<()> {
        if self.parsing.max_file_size == 0 {
            return Err(CommentsmithError::Config(
                "parsing.max_file_size must be greater than zero".to_string(),
            ));
        }
        if self.backend.timeout_secs == 0 {
            return Err(CommentsmithError::Config(
                "backend.timeout_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
