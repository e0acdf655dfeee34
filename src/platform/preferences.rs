//! Display preferences persisted as JSON.
//!
//! Two independent flags, `showPercentage` and `showIcon`. At least one of
//! them is always effectively enabled.

use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

/// What the status indicator shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DisplayPreferences {
    /// Show the volume as a percentage
    pub show_percentage: bool,

    /// Show the volume tier icon
    pub show_icon: bool,
}

impl Default for DisplayPreferences {
    fn default() -> Self {
        Self {
            show_percentage: false,
            show_icon: true,
        }
    }
}

impl DisplayPreferences {
    /// These preferences with the icon forced back on if both flags are off.
    pub fn effective(self) -> Self {
        if !self.show_percentage && !self.show_icon {
            Self {
                show_icon: true,
                ..self
            }
        } else {
            self
        }
    }

    /// Flip "show percentage". Turning it off while the icon is hidden shows the icon.
    pub fn toggle_percentage(&mut self) {
        self.show_percentage = !self.show_percentage;
        if !self.show_percentage && !self.show_icon {
            self.show_icon = true;
        }
    }

    /// Flip "show icon". Turning it off while the percentage is hidden shows the percentage.
    pub fn toggle_icon(&mut self) {
        self.show_icon = !self.show_icon;
        if !self.show_icon && !self.show_percentage {
            self.show_percentage = true;
        }
    }
}

/// Source of the current display preferences, read once per emission.
pub trait PreferenceSource {
    fn current(&self) -> DisplayPreferences;
}

impl PreferenceSource for DisplayPreferences {
    fn current(&self) -> DisplayPreferences {
        self.effective()
    }
}

/// Preferences service error types.
#[derive(Debug, Error)]
pub enum PreferencesError {
    #[error("No user configuration directory available")]
    NoConfigDir,

    #[error("Failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid preferences in {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// File-backed preferences store.
#[derive(Debug, Clone)]
pub struct PreferencesStore {
    path: PathBuf,
}

impl PreferencesStore {
    const APP_DIR: &'static str = "menubar-volume";
    const FILE_NAME: &'static str = "preferences.json";

    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store in the user's configuration directory.
    pub fn default_location() -> Result<Self, PreferencesError> {
        let dir = dirs::config_dir().ok_or(PreferencesError::NoConfigDir)?;
        Ok(Self::new(dir.join(Self::APP_DIR).join(Self::FILE_NAME)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load preferences. A missing file yields the defaults.
    pub fn load(&self) -> Result<DisplayPreferences, PreferencesError> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Ok(DisplayPreferences::default());
            }
            Err(source) => {
                return Err(PreferencesError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        serde_json::from_str(&text).map_err(|source| PreferencesError::Parse {
            path: self.path.clone(),
            source,
        })
    }

    /// Save preferences, creating the parent directory if needed.
    pub fn save(&self, preferences: &DisplayPreferences) -> Result<(), PreferencesError> {
        let io_err = |source: io::Error| PreferencesError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }

        let json = serde_json::to_string_pretty(preferences).map_err(|source| {
            PreferencesError::Parse {
                path: self.path.clone(),
                source,
            }
        })?;
        std::fs::write(&self.path, json).map_err(io_err)
    }

    /// Load, apply `change`, and save. Returns the saved preferences.
    pub fn update<F>(&self, change: F) -> Result<DisplayPreferences, PreferencesError>
    where
        F: FnOnce(&mut DisplayPreferences),
    {
        let mut preferences = self.load()?.effective();
        change(&mut preferences);
        self.save(&preferences)?;
        Ok(preferences)
    }
}

impl PreferenceSource for PreferencesStore {
    fn current(&self) -> DisplayPreferences {
        self.load()
            .unwrap_or_else(|e| {
                warn!(error = %e, "Failed to load preferences, using defaults");
                DisplayPreferences::default()
            })
            .effective()
    }
}
