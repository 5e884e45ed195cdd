//! Application-Layer: Controller, State, Events und History.

pub mod controller;
pub mod events;
pub mod history;
pub mod recording;
/// Application State
///
/// Dieses Modul verwaltet den Zustand der Anwendung (Flächen, Szene, Werkzeug).
pub mod state;

pub use controller::AppController;
pub use events::AppIntent;
pub use history::{EditHistory, Snapshot};
pub use recording::{RecordedStroke, StrokeMeta, StrokeRecording};
pub use state::{AppState, StrokeState, ToolKind};
