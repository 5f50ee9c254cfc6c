//! Configuration sections for `blog.toml`.
//!
//! Every field has a default, so an empty config file is a valid one.
//!
//! # Example
//!
//! ```toml
//! [store]
//! path = "blog.db"            # SQLite database, relative to the config file
//!
//! [templates]
//! dir = "templates"           # Directory holding the page templates
//! wordlist = "wordlist"       # Challenge words, one per line
//!
//! [serve]
//! interface = "127.0.0.1"     # Network interface (127.0.0.1 = localhost only)
//! port = 8015                 # HTTP port number
//! ```

use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;

/// `[store]` section: where posts and challenges live.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// SQLite database path, relative to the config file.
    pub path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("blog.db"),
        }
    }
}

/// `[templates]` section: page templates and the challenge wordlist.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplatesConfig {
    /// Directory holding the page templates.
    pub dir: PathBuf,

    /// Word file for contact challenges, one word per line.
    pub wordlist: PathBuf,
}

impl Default for TemplatesConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("templates"),
            wordlist: PathBuf::from("wordlist"),
        }
    }
}

/// `[serve]` section: HTTP server settings.
///
/// Use `interface = "0.0.0.0"` to make the server accessible from LAN.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServeConfig {
    /// Network interface to bind.
    /// - `127.0.0.1` (default): localhost only
    /// - `0.0.0.0`: all interfaces (LAN accessible)
    pub interface: IpAddr,

    /// HTTP port number.
    pub port: u16,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            interface: IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)),
            port: 8015,
        }
    }
}
