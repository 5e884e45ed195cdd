//! Zauberkreide Engine Library.
//! Simulation, Compositing und Malwerkzeuge als Library exportiert für
//! Tests und Wiederverwendung.

pub mod app;
pub mod core;
pub mod paint;
pub mod render;
pub mod shared;

pub use app::{AppController, AppIntent, AppState, StrokeRecording, ToolKind};
pub use core::{
    advance, DecorationKind, Entity, EntityKind, FrameInput, Scene, Track, TrackCommit, TrackId,
    TrackMap, Train, TrainCar,
};
pub use shared::options::EngineOptions;
