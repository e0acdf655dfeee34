//! Presentation of the normalized volume state.
//!
//! Maps a [`NormalizedVolumeState`] and the display preferences to what the
//! status indicator shows: an icon tier, a percentage, or both.

use crate::audio::NormalizedVolumeState;
use crate::platform::DisplayPreferences;

/// Receives every emitted state, in order.
pub trait PresentationSink {
    fn update(&mut self, state: NormalizedVolumeState);
}

/// Icon tier for a volume state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VolumeTier {
    Muted,
    Silent,
    Low,
    Medium,
    High,
}

impl VolumeTier {
    pub fn from_state(state: NormalizedVolumeState) -> Self {
        if state.is_muted() {
            VolumeTier::Muted
        } else if state.level() <= 0.0 {
            VolumeTier::Silent
        } else if state.level() < 1.0 / 3.0 {
            VolumeTier::Low
        } else if state.level() < 2.0 / 3.0 {
            VolumeTier::Medium
        } else {
            VolumeTier::High
        }
    }

    /// SF Symbols name, for a native menu bar host.
    pub fn symbol_name(&self) -> &'static str {
        match self {
            VolumeTier::Muted => "speaker.slash.fill",
            VolumeTier::Silent => "speaker.fill",
            VolumeTier::Low => "speaker.wave.1.fill",
            VolumeTier::Medium => "speaker.wave.2.fill",
            VolumeTier::High => "speaker.wave.3.fill",
        }
    }

    /// Text glyph, for the status line.
    pub fn glyph(&self) -> &'static str {
        match self {
            VolumeTier::Muted => "🔇",
            VolumeTier::Silent | VolumeTier::Low => "🔈",
            VolumeTier::Medium => "🔉",
            VolumeTier::High => "🔊",
        }
    }
}

/// What the indicator should display for one emission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Presentation {
    /// Icon tier, if icons are enabled
    pub tier: Option<VolumeTier>,

    /// Percentage text such as `42%`, if percentages are enabled
    pub percentage: Option<String>,
}

impl Presentation {
    pub fn render(state: NormalizedVolumeState, preferences: DisplayPreferences) -> Self {
        let preferences = preferences.effective();
        Self {
            tier: preferences
                .show_icon
                .then(|| VolumeTier::from_state(state)),
            percentage: preferences
                .show_percentage
                .then(|| format!("{}%", state.volume_percent())),
        }
    }

    /// Single-line text form: glyph and/or percentage separated by a space.
    pub fn to_line(&self) -> String {
        let parts: Vec<&str> = self
            .tier
            .map(|tier| tier.glyph())
            .into_iter()
            .chain(self.percentage.as_deref())
            .collect();
        parts.join(" ")
    }
}
