//! Core-Domänentypen: Szene, Partikel, Schienen, Züge, Spatial-Index.

pub mod emit;
pub mod entity;
pub mod geometry;
/// Core-Datenmodell der animierten Szene
///
/// Dieses Modul definiert die Haupt-Datenstrukturen:
/// - Scene: Container für Partikel, Schienen, Züge und Dekorationen
/// - WigglyLine: Linie mit Ankerpunkten und laufender Auslenkung
/// - TrackDecoration: Station, Tunnel, Baum oder Gebäude an einer Schiene
pub mod scene;
pub mod sim;
pub mod spatial;
pub mod track;
pub mod train;

pub use emit::{
    emit_balloons, emit_bugs, emit_confetti, emit_firework, emit_glitter, emit_honk,
    emit_lightning, emit_streamers, emit_train_smoke, emit_worms,
};
pub use entity::{BugGlyph, Entity, EntityKind, SmokeShape, PERMANENT_LIFE};
pub use geometry::{PathSample, PARALLEL_EPSILON};
pub use scene::{DecorationKind, Flower, GrassBlade, Scene, TrackDecoration, WigglyLine, WigglyPoint};
pub use sim::{advance, FrameInput};
pub use spatial::{EndpointIndex, EndpointMatch};
pub use track::{
    FractionRemap, PointAcceptance, Track, TrackCommit, TrackCrossing, TrackId, TrackJunction,
    TrackMap,
};
pub use train::{CarKind, CargoKind, PassengerKind, Train, TrainCar};
