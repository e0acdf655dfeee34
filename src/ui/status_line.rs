//! Line-oriented presentation sink.
//!
//! Writes one line per emitted state, which status bar hosts that stream a
//! command's standard output can display directly.

use super::presentation::{Presentation, PresentationSink};
use crate::audio::NormalizedVolumeState;
use crate::platform::PreferenceSource;
use std::io::Write;
use tracing::{trace, warn};

/// Writes each state as a line of text.
pub struct StatusLineSink<W: Write, P: PreferenceSource> {
    writer: W,
    preferences: P,
}

impl<W: Write, P: PreferenceSource> StatusLineSink<W, P> {
    pub fn new(writer: W, preferences: P) -> Self {
        Self {
            writer,
            preferences,
        }
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }

    fn write_line(&mut self, line: &str) -> std::io::Result<()> {
        writeln!(self.writer, "{}", line)?;
        self.writer.flush()
    }
}

impl<W: Write, P: PreferenceSource> PresentationSink for StatusLineSink<W, P> {
    fn update(&mut self, state: NormalizedVolumeState) {
        let presentation = Presentation::render(state, self.preferences.current());
        let line = presentation.to_line();
        trace!(%line, "Status line");

        if let Err(e) = self.write_line(&line) {
            warn!(error = %e, "Failed to write status line");
        }
    }
}
