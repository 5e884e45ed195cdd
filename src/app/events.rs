//! AppIntent-Events: Eingaben aus UI/System ohne direkte Mutationslogik.

use super::state::ToolKind;
use crate::core::DecorationKind;
use glam::Vec2;
use image::Rgba;
use std::path::PathBuf;

/// Eingabe-Ereignisse der Anwendung. Der Controller übersetzt jedes
/// Intent in genau eine Zustandsänderung.
#[derive(Debug, Clone)]
pub enum AppIntent {
    /// Zeiger aufgesetzt (Position in Flächen-Pixeln)
    PointerPressed { position: Vec2 },
    /// Zeiger bewegt (auch ohne gedrückte Taste, für die Schnapp-Anzeige)
    PointerMoved { position: Vec2 },
    /// Zeiger losgelassen
    PointerReleased,
    /// Mal-Werkzeug wechseln
    SetToolRequested { tool: ToolKind },
    /// Malfarbe setzen (beendet den Regenbogenmodus)
    SetColorRequested { color: Rgba<u8> },
    /// Regenbogenmodus ein- oder ausschalten
    SetRainbowRequested { enabled: bool },
    /// Pinselgröße setzen (wird auf den gültigen Bereich geklemmt)
    SetBrushSizeRequested { size: f32 },
    /// Dekoration vormerken, die der nächste Klick platziert (None = Modus verlassen)
    SelectDecorationRequested { kind: Option<DecorationKind> },
    /// Undo: Letzte Aktion rückgängig machen
    UndoRequested,
    /// Redo: Rückgängig gemachte Aktion wiederherstellen
    RedoRequested,
    /// Zeichenfläche leeren (Basis weiß, Szene vollständig zurückgesetzt)
    ClearCanvasRequested,
    /// Präsentiertes Bild als PNG speichern
    ExportPngRequested { path: PathBuf },
    /// Strichaufzeichnung starten (verwirft eine vorherige Aufnahme)
    StartRecordingRequested,
    /// Strichaufzeichnung beenden
    StopRecordingRequested,
    /// Aufgezeichnete Striche auf frischer Basis abspielen
    ReplayRequested,
    /// Aufzeichnung als JSON-Datei speichern
    SaveRecordingRequested { path: PathBuf },
    /// Aufzeichnung aus JSON-Datei laden
    LoadRecordingRequested { path: PathBuf },
}
