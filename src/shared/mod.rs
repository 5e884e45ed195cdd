//! Geteilte Typen für layer-übergreifende Verträge.
//!
//! Enthält Paletten und Optionen, die zwischen `app`, `core` und
//! `render` geteilt werden, um direkte Abhängigkeiten zu vermeiden.

pub mod colors;
pub mod options;

pub use options::EngineOptions;
pub use options::{TRACK_MIN_POINT_SPACING, TRACK_SNAP_RADIUS};
