//! Platform-facing collaborators of the monitor.
//!
//! This module contains the display preference store read by the
//! presentation sink.

pub mod preferences;

pub use preferences::{DisplayPreferences, PreferenceSource, PreferencesError, PreferencesStore};
