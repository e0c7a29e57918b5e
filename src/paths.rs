//! Home directory lookup and per-application config path resolution.

use std::io;
use std::path::{Path, PathBuf};

/// Subdirectory of the home directory holding application config files.
pub const CONFIG_DIR: &str = ".config";

/// Extension of application config files.
pub const CONFIG_EXTENSION: &str = "yaml";

/// Source of the current user's home directory.
pub trait HomeDirResolver {
    /// Returns the home directory, or the reason it is unavailable.
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined.
    fn home_dir(&self) -> io::Result<PathBuf>;
}

/// Resolves the home directory of the user running the process.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemHome;

impl HomeDirResolver for SystemHome {
    fn home_dir(&self) -> io::Result<PathBuf> {
        dirs::home_dir().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                "unable to determine home directory for the current user",
            )
        })
    }
}

/// Always resolves to the same, preconfigured directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedHome(PathBuf);

impl FixedHome {
    /// Pin the home directory to `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    /// The pinned directory.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.0
    }
}

impl HomeDirResolver for FixedHome {
    fn home_dir(&self) -> io::Result<PathBuf> {
        Ok(self.0.clone())
    }
}

impl<R: HomeDirResolver + ?Sized> HomeDirResolver for &R {
    fn home_dir(&self) -> io::Result<PathBuf> {
        (**self).home_dir()
    }
}

/// Join `home` with `.config/<app>.yaml`.
#[must_use]
pub fn app_config_file(home: &Path, app: &str) -> PathBuf {
    home.join(CONFIG_DIR)
        .join(format!("{app}.{CONFIG_EXTENSION}"))
}
