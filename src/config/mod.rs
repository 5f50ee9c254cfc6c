//! Blog configuration loading.
//!
//! Configuration lives in `blog.toml` next to the blog's data. All
//! paths inside the file are resolved relative to the file itself, so
//! the CLI works from any subdirectory of the blog.
//!
//! # Module Structure
//!
//! - [`section`]: the `[store]`, `[templates]` and `[serve]` sections
//! - [`error`]: config error types

mod error;
mod section;

pub use error::ConfigError;
pub use section::{ServeConfig, StoreConfig, TemplatesConfig};

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Template file names inside the templates directory.
pub const POST_TEMPLATE: &str = "post.html";
pub const ARCHIVE_TEMPLATE: &str = "archive.html";
pub const CHALLENGE_TEMPLATE: &str = "email_challenge.html";
pub const SUCCESS_TEMPLATE: &str = "email_success.html";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BlogConfig {
    pub store: StoreConfig,
    pub templates: TemplatesConfig,
    pub serve: ServeConfig,

    /// Directory of the loaded config file; all relative paths resolve
    /// against it.
    #[serde(skip)]
    root: PathBuf,
}

impl BlogConfig {
    /// Load configuration from the given path.
    ///
    /// A relative path that doesn't exist in the current directory is
    /// searched for in ancestor directories, so commands can run from
    /// anywhere inside the blog.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let path = resolve_config_path(path).ok_or_else(|| ConfigError::NotFound {
            path: path.to_path_buf(),
        })?;

        let content = fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        let mut config: Self =
            toml::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.clone(),
                source,
            })?;

        config.root = path.parent().map(Path::to_path_buf).unwrap_or_default();
        Ok(config)
    }

    pub fn store_path(&self) -> PathBuf {
        self.root.join(&self.store.path)
    }

    pub fn template_path(&self, name: &str) -> PathBuf {
        self.root.join(&self.templates.dir).join(name)
    }

    pub fn wordlist_path(&self) -> PathBuf {
        self.root.join(&self.templates.wordlist)
    }
}

/// Find the config file, walking up from the current directory when
/// the path is relative and missing locally.
fn resolve_config_path(path: &Path) -> Option<PathBuf> {
    if path.exists() {
        return Some(path.to_path_buf());
    }
    if path.is_absolute() {
        return None;
    }

    let cwd = std::env::current_dir().ok()?;
    cwd.ancestors()
        .map(|dir| dir.join(path))
        .find(|candidate| candidate.exists())
}
