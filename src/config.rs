//! Reading YAML config files and deserializing them into caller types.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_yaml::Value;

use crate::error::{ConfigError, Result};
use crate::overlay::Overlay;
use crate::paths::{HomeDirResolver, SystemHome, app_config_file};

/// Read the whole content of `config_file`.
///
/// # Errors
///
/// Returns [`ConfigError::Read`] if the file cannot be read.
pub fn read_config_file(config_file: impl AsRef<Path>) -> Result<Vec<u8>> {
    let path = config_file.as_ref();
    let data = fs::read(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    log::debug!("read {} bytes from {}", data.len(), path.display());
    Ok(data)
}

/// Parse `buffer` as YAML into a fresh value of `T`.
///
/// Fields missing from the document get whatever `T`'s `Deserialize`
/// implementation gives them (usually `#[serde(default)]`).
///
/// # Errors
///
/// Returns [`ConfigError::Parse`] if the buffer is not valid YAML or does not
/// match the shape of `T`.
pub fn parse_config<T: DeserializeOwned>(buffer: &[u8]) -> Result<T> {
    Ok(serde_yaml::from_slice(buffer)?)
}

/// Parse `buffer` as YAML into `out`, in place.
///
/// Keys present in the document overwrite the matching fields of `out`;
/// structs and maps are updated key by key, so fields and entries the
/// document does not mention keep their current value. Sequences and scalars
/// are replaced. An explicit `null` clears `Option`s, sequences and maps and
/// leaves scalars and structs as they are. An empty document changes nothing.
///
/// The current value is read through `T`'s `Serialize` impl, so only state
/// visible to serde is carried over: fields marked `#[serde(skip)]` come back
/// with their deserialization default, and custom `deserialize_with` fields
/// need a `serialize_with` producing a form they accept.
///
/// `out` is only assigned once the whole document has been accepted, so it is
/// untouched on error.
///
/// # Errors
///
/// Returns [`ConfigError::Parse`] if the buffer is not valid YAML or does not
/// match the shape of `T`, and [`ConfigError::Destination`] if the document
/// fits `T` but the current value of `out` cannot be carried over.
pub fn read_config<T>(buffer: &[u8], out: &mut T) -> Result<()>
where
    T: Serialize + DeserializeOwned,
{
    let document: Value = serde_yaml::from_slice(buffer)?;
    if document.is_null() {
        return Ok(());
    }

    let current =
        serde_yaml::to_value(&*out).map_err(|source| ConfigError::Destination { source })?;
    match T::deserialize(Overlay::new(document, current)) {
        Ok(merged) => {
            *out = merged;
            Ok(())
        }
        Err(merge_error) => Err(classify_failure::<T>(buffer, merge_error)),
    }
}

/// Blame the document when it does not fit `T` on its own, keeping the
/// parser's line and column; blame the destination otherwise.
fn classify_failure<T: DeserializeOwned>(
    buffer: &[u8],
    merge_error: serde_yaml::Error,
) -> ConfigError {
    match serde_yaml::from_slice::<T>(buffer) {
        Err(source) => ConfigError::Parse { source },
        Ok(_) => ConfigError::Destination {
            source: merge_error,
        },
    }
}

/// Load the YAML file at `config_file` into `out`.
///
/// # Errors
///
/// Returns [`ConfigError::Read`] if the file cannot be read and
/// [`ConfigError::Parse`] if its content does not fit `T`.
pub fn load_config<T>(config_file: impl AsRef<Path>, out: &mut T) -> Result<()>
where
    T: Serialize + DeserializeOwned,
{
    let data = read_config_file(config_file)?;
    read_config(&data, out)
}

/// Read `$HOME/.config/<app>.yaml` for the current user.
///
/// # Errors
///
/// See [`ConfigLoader::read_app_config_file`].
pub fn read_app_config_file(app: &str) -> Result<Vec<u8>> {
    ConfigLoader::new().read_app_config_file(app)
}

/// Load `$HOME/.config/<app>.yaml` for the current user into `out`.
///
/// # Errors
///
/// See [`ConfigLoader::load_app_config`].
pub fn load_app_config<T>(app: &str, out: &mut T) -> Result<()>
where
    T: Serialize + DeserializeOwned,
{
    ConfigLoader::new().load_app_config(app, out)
}

/// Locates and loads per-application config files.
///
/// The home directory comes from `H`, so tests and embedders can point the
/// loader somewhere other than the real user's home.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConfigLoader<H = SystemHome> {
    home: H,
}

impl ConfigLoader {
    /// A loader resolving the home directory of the current user.
    #[must_use]
    pub const fn new() -> Self {
        Self { home: SystemHome }
    }
}

impl<H: HomeDirResolver> ConfigLoader<H> {
    /// A loader using `home` to find the home directory.
    #[must_use]
    pub const fn with_home(home: H) -> Self {
        Self { home }
    }

    /// The home directory resolver in use.
    #[must_use]
    pub const fn home(&self) -> &H {
        &self.home
    }

    /// Path of the config file for `app`: `<home>/.config/<app>.yaml`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UserLookup`] if the home directory is unknown.
    pub fn app_config_path(&self, app: &str) -> Result<PathBuf> {
        let home = self
            .home
            .home_dir()
            .map_err(|source| ConfigError::UserLookup {
                app: app.to_string(),
                source,
            })?;
        let path = app_config_file(&home, app);
        log::debug!("config file for {app}: {}", path.display());
        Ok(path)
    }

    /// Read the config file for `app`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UserLookup`] if the home directory is unknown
    /// and [`ConfigError::Read`] if the file cannot be read.
    pub fn read_app_config_file(&self, app: &str) -> Result<Vec<u8>> {
        let path = self.app_config_path(app)?;
        read_config_file(path)
    }

    /// Load the config file for `app` into `out`.
    ///
    /// # Errors
    ///
    /// Any error of [`Self::read_app_config_file`], or
    /// [`ConfigError::Parse`] if the content does not fit `T`.
    pub fn load_app_config<T>(&self, app: &str, out: &mut T) -> Result<()>
    where
        T: Serialize + DeserializeOwned,
    {
        let data = self.read_app_config_file(app)?;
        read_config(&data, out)
    }
}
