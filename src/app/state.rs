//! Application State — zentrale Datenhaltung.

use super::history::{EditHistory, Snapshot};
use super::recording::StrokeRecording;
use crate::core::{DecorationKind, Scene};
use crate::shared::colors;
use crate::shared::options::EngineOptions;
use glam::Vec2;
use image::{Rgba, RgbaImage};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Aktives Mal-Werkzeug
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ToolKind {
    /// Einfacher runder Pinsel
    #[default]
    Brush,
    /// Radierer, stanzt die Basisfläche frei
    Eraser,
    /// Farbeimer (4er-Nachbarschaft)
    Fill,
    /// Sprühdose mit gestreuten Punkten
    Spray,
    /// Leuchtstift mit Schein und weißem Kern
    Neon,
    /// Dauerhafter Glitzer
    Glitter,
    /// Feuerwerksraketen
    Fireworks,
    /// Aufsteigende Luftballons
    Bubbles,
    /// Konfettiregen
    Confetti,
    /// Kriechende Würmer
    Worms,
    /// Zuckende Blitze
    Lightning,
    /// Krabbelnde Käfer
    Bugs,
    /// Geworfene Luftschlangen
    Streamers,
    /// Wackelstift, fertige Linien zappeln weiter
    WobblyCrayon,
    /// Verschmiert bestehende Farbe
    Smudge,
    /// Gleicht Farben der Umgebung an
    Blend,
    /// Schienen legen, Züge fahren automatisch
    TrainTrack,
    /// Blätterspur in Zeichenrichtung
    LeafTrail,
    /// Blumenkette stempeln
    FlowerChain,
    /// Grasbüschel stempeln
    GrassStamper,
    /// Klötzchen-Stift auf festem Gitter
    BlockyBuilder,
    /// Spiegelmalerei mit acht Sektoren
    MirrorPainting,
}

/// Zustand des laufenden Strichs (zwischen Pointer-Down und Pointer-Up).
#[derive(Debug, Clone)]
pub struct StrokeState {
    /// Ob gerade ein Strich läuft
    pub is_drawing: bool,
    /// Letzter verarbeiteter Zeigerpunkt
    pub last_point: Option<Vec2>,
    /// Zuletzt gefüllte Gitterzelle des Klötzchen-Stifts
    pub last_block: Option<Vec2>,
    /// Kantenlänge der Gitterzellen, beim Strichbeginn fixiert
    pub block_size: f32,
    /// Frame des letzten Blatt-Stempels der Blätterspur
    pub last_leaf_frame: Option<u64>,
    /// Zuletzt gesetzte Schwelle beim Schienenbau
    pub last_tie: Option<Vec2>,
}

impl Default for StrokeState {
    fn default() -> Self {
        Self::new()
    }
}

impl StrokeState {
    /// Erstellt den Ruhezustand (kein Strich aktiv).
    pub fn new() -> Self {
        Self {
            is_drawing: false,
            last_point: None,
            last_block: None,
            block_size: 0.0,
            last_leaf_frame: None,
            last_tie: None,
        }
    }

    /// Setzt alle Strichdaten zurück (Pointer-Up oder Werkzeugwechsel).
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

/// Hauptzustand der Anwendung
pub struct AppState {
    /// Persistente Basisfläche (Arc für O(1)-Undo-Snapshots)
    pub base: Arc<RgbaImage>,
    /// Flüchtiges Overlay, wird jeden Frame komplett neu aufgebaut
    pub overlay: RgbaImage,
    /// Simulationsszene: Partikel, Strecken, Züge, Pflanzen
    pub scene: Scene,
    /// Aktives Werkzeug
    pub tool: ToolKind,
    /// Aktive Malfarbe
    pub color: Rgba<u8>,
    /// Regenbogenmodus: Farbton rotiert pro Farbabruf
    pub rainbow: bool,
    /// Aktueller Farbton des Regenbogenmodus in Grad
    pub rainbow_hue: f32,
    /// Pinselgröße in Pixeln
    pub brush_size: f32,
    /// Laufender Strich
    pub stroke: StrokeState,
    /// Schnapp-Kandidat für die Anzeige (nur beim Schienen-Werkzeug gesetzt)
    pub snap_candidate: Option<Vec2>,
    /// Vorgemerkte Dekoration, die der nächste Klick platziert
    pub pending_decoration: Option<DecorationKind>,
    /// Undo/Redo-History (Snapshot-basiert)
    pub history: EditHistory,
    /// Strichaufzeichnung für Replay und JSON-Export
    pub recording: StrokeRecording,
    /// Laufzeit-Optionen
    pub options: EngineOptions,
}

impl AppState {
    /// Erstellt einen frischen App-State mit weißer Basisfläche.
    pub fn new(options: EngineOptions) -> Self {
        let (width, height) = (options.surface_width, options.surface_height);
        Self {
            base: Arc::new(RgbaImage::from_pixel(width, height, colors::WHITE)),
            overlay: RgbaImage::new(width, height),
            scene: Scene::new(),
            tool: ToolKind::Brush,
            color: colors::BLACK,
            rainbow: false,
            rainbow_hue: 0.0,
            brush_size: options.brush_size,
            stroke: StrokeState::new(),
            snap_candidate: None,
            pending_decoration: None,
            history: EditHistory::new_with_capacity(options.history_depth),
            recording: StrokeRecording::new(),
            options,
        }
    }

    /// Mittelpunkt der Zeichenfläche (Achse der Spiegelmalerei).
    pub fn surface_center(&self) -> Vec2 {
        Vec2::new(
            self.options.surface_width as f32 / 2.0,
            self.options.surface_height as f32 / 2.0,
        )
    }

    /// Gibt zurück, ob ein Undo-Schritt verfügbar ist.
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Gibt zurück, ob ein Redo-Schritt verfügbar ist.
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Erstellt einen Undo-Snapshot des aktuellen Zustands.
    /// Reduziert Boilerplate vor mutierenden Operationen.
    pub fn record_undo_snapshot(&mut self) {
        let snap = Snapshot::from_state(self);
        self.history.record_snapshot(snap);
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(EngineOptions::default())
    }
}
