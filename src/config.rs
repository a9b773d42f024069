use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;

pub const CONFIG_FILE_NAME: &str = "navtree.toml";

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct NavConfig {
    /// Binding holding the table of contents.
    pub tree_binding: String,
    /// Binding holding the anchor index.
    pub index_binding: String,
    /// Deepest array nesting the parser accepts, and the deepest entry
    /// nesting allowed once deferred children are inlined.
    pub max_depth: usize,
    /// Upper bound on entries copied in while inlining deferred children.
    pub max_entries: usize,
    /// Inline children stored in separate `<name>.js` scripts.
    pub resolve_deferred: bool,
    /// Where deferred scripts live; the main script's directory when unset.
    pub deferred_dir: Option<PathBuf>,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            tree_binding: "NAVTREE".into(),
            index_binding: "NAVTREEINDEX".into(),
            max_depth: 64,
            max_entries: 1_000_000,
            resolve_deferred: false,
            deferred_dir: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {error}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        error: std::io::Error,
    },
    #[error("invalid config {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },
    #[error("invalid config {}: max_depth must be at least 1", path.display())]
    ZeroDepth { path: PathBuf },
}

impl NavConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|error| ConfigError::Io {
            path: path.to_path_buf(),
            error,
        })?;
        let mut config = Self::from_toml(path, &content)?;
        if let Some(dir) = &config.deferred_dir {
            if dir.is_relative() {
                let root = path.parent().unwrap_or_else(|| Path::new("."));
                config.deferred_dir = Some(root.join(dir));
            }
        }
        Ok(config)
    }

    pub fn from_toml(path: &Path, content: &str) -> Result<Self, ConfigError> {
        let config: NavConfig = toml::from_str(content).map_err(|error| ConfigError::Parse {
            path: path.to_path_buf(),
            message: error.to_string(),
        })?;
        if config.max_depth == 0 {
            return Err(ConfigError::ZeroDepth {
                path: path.to_path_buf(),
            });
        }
        Ok(config)
    }

    /// Uses `navtree.toml` next to `script` when present, defaults otherwise.
    pub fn discover(script: &Path) -> Result<Self, ConfigError> {
        let dir = script.parent().unwrap_or_else(|| Path::new("."));
        let candidate = dir.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            log::debug!("using config {}", candidate.display());
            Self::load(&candidate)
        } else {
            Ok(Self::default())
        }
    }

    /// Directory deferred child scripts are read from.
    pub fn deferred_root(&self, script: &Path) -> PathBuf {
        match &self.deferred_dir {
            Some(dir) => dir.clone(),
            None => match script.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
                _ => PathBuf::from("."),
            },
        }
    }
}
