//! Load per-application YAML configuration files into typed structs.
//!
//! This crate provides:
//! - Raw reads of config files from an explicit path
//! - Resolution of `$HOME/.config/<app>.yaml` through a pluggable home lookup
//! - In-place YAML deserialization into any serde type
//!
//! ```no_run
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, Default, Serialize, Deserialize)]
//! #[serde(default)]
//! struct Settings {
//!     #[serde(rename = "listenAddr")]
//!     listen_addr: String,
//! }
//!
//! let mut settings = Settings::default();
//! appcfg::load_app_config("myapp", &mut settings)?;
//! # Ok::<(), appcfg::ConfigError>(())
//! ```

pub mod config;
pub mod error;
mod overlay;
pub mod paths;

pub use config::{
    ConfigLoader, load_app_config, load_config, parse_config, read_app_config_file, read_config,
    read_config_file,
};
pub use error::{ConfigError, ErrorKind, Result};
pub use paths::{FixedHome, HomeDirResolver, SystemHome, app_config_file};
