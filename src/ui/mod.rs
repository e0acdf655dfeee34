//! UI module for presenting the volume state.
//!
//! This module provides the presentation sink seam, icon tiers and the
//! status-line sink used by the binary.

pub mod presentation;
pub mod status_line;

pub use presentation::{Presentation, PresentationSink, VolumeTier};
pub use status_line::StatusLineSink;
