//! Registration configuration.
//!
//! A `config.json` next to the executable holds the registration password and
//! the purchase URL. The codecs never read it themselves; callers load it and
//! pass the values in.

use crate::error::{LicenseError, LicenseResult};
use crate::payload::field_ci;
use serde_json::Value;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Configuration file name.
pub const CONFIG_FILE: &str = "config.json";

/// Sub-directory searched when the file is not directly in the base directory.
pub const CONFIG_SUBDIR: &str = "RegistrationEasy";

/// Directory name under the per-user configuration directory.
pub const USER_CONFIG_DIR: &str = "regeasy";

/// Password and purchase URL.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct RegistrationConfig {
    /// Password the registration codes are sealed under.
    pub password: String,
    /// Where users can buy a registration code.
    pub uri: String,
}

impl fmt::Debug for RegistrationConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistrationConfig")
            .field("password", &"[REDACTED]")
            .field("uri", &self.uri)
            .finish()
    }
}

impl RegistrationConfig {
    /// Parses configuration JSON. Keys match case-insensitively and missing
    /// keys default to empty.
    ///
    /// # Errors
    ///
    /// Returns [`LicenseError::Config`] if the text is not a JSON object or a
    /// known key is not a string.
    pub fn from_json(text: &str) -> LicenseResult<Self> {
        let value: Value = serde_json::from_str(text)
            .map_err(|e| LicenseError::Config(format!("invalid JSON: {e}")))?;
        let Value::Object(map) = value else {
            return Err(LicenseError::Config("configuration must be a JSON object".to_string()));
        };

        let string_field = |name: &str| -> LicenseResult<String> {
            match field_ci(&map, name) {
                None | Some(Value::Null) => Ok(String::new()),
                Some(Value::String(s)) => Ok(s.clone()),
                Some(_) => Err(LicenseError::Config(format!("{name} must be a string"))),
            }
        };

        Ok(Self {
            password: string_field("password")?,
            uri: string_field("uri")?,
        })
    }

    /// Loads `<base_dir>/config.json`, then `<base_dir>/RegistrationEasy/config.json`.
    ///
    /// Returns the default configuration if neither exists.
    ///
    /// # Errors
    ///
    /// Returns [`LicenseError::Config`] if an existing file cannot be read or
    /// parsed.
    pub fn load_from(base_dir: impl AsRef<Path>) -> LicenseResult<Self> {
        match Self::locate(base_dir.as_ref()) {
            Some(path) => Self::load_file(&path),
            None => {
                debug!("no configuration file under {}", base_dir.as_ref().display());
                Ok(Self::default())
            }
        }
    }

    /// Searches the executable's directory, then the per-user configuration
    /// directory.
    ///
    /// # Errors
    ///
    /// Returns [`LicenseError::Config`] if a found file cannot be read or parsed.
    pub fn discover() -> LicenseResult<Self> {
        let exe_dir = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf));
        let user_dir = dirs::config_dir().map(|dir| dir.join(USER_CONFIG_DIR));

        for dir in exe_dir.into_iter().chain(user_dir) {
            if let Some(path) = Self::locate(&dir) {
                return Self::load_file(&path);
            }
        }
        debug!("no configuration file found, using defaults");
        Ok(Self::default())
    }

    /// Returns the purchase URL if one is configured.
    #[must_use]
    pub fn purchase_uri(&self) -> Option<&str> {
        let uri = self.uri.trim();
        (!uri.is_empty()).then_some(uri)
    }

    fn locate(base_dir: &Path) -> Option<PathBuf> {
        [
            base_dir.join(CONFIG_FILE),
            base_dir.join(CONFIG_SUBDIR).join(CONFIG_FILE),
        ]
        .into_iter()
        .find(|path| path.is_file())
    }

    fn load_file(path: &Path) -> LicenseResult<Self> {
        debug!("loading configuration from {}", path.display());
        let text = fs::read_to_string(path)
            .map_err(|e| LicenseError::Config(format!("failed to read {}: {e}", path.display())))?;
        // Files written by Windows editors often start with a BOM.
        Self::from_json(text.trim_start_matches('\u{feff}'))
    }
}
