//! Zentrale Konfiguration für die Zauberkreide-Engine.
//!
//! `EngineOptions` enthält alle zur Laufzeit änderbaren Werte.
//! Die `const`-Werte bleiben als Fallback/Default erhalten.

use serde::{Deserialize, Serialize};

// ── Zeichenfläche ───────────────────────────────────────────────────

/// Breite der persistenten Zeichenfläche in Pixeln.
pub const SURFACE_WIDTH: u32 = 1280;
/// Höhe der persistenten Zeichenfläche in Pixeln.
pub const SURFACE_HEIGHT: u32 = 720;
/// Pinselgröße beim Start.
pub const BRUSH_SIZE_DEFAULT: f32 = 10.0;
/// Minimale Pinselgröße.
pub const BRUSH_SIZE_MIN: f32 = 1.0;
/// Maximale Pinselgröße.
pub const BRUSH_SIZE_MAX: f32 = 50.0;

// ── Schienenbau ─────────────────────────────────────────────────────

/// Snap-Radius (Pixel): erster Punkt einer neuen Schiene rastet auf ein
/// bestehendes Schienenende innerhalb dieses Radius ein.
pub const TRACK_SNAP_RADIUS: f32 = 30.0;
/// Mindestabstand zwischen zwei aufgenommenen Schienenpunkten.
pub const TRACK_MIN_POINT_SPACING: f32 = 8.0;
/// Maximale Richtungsänderung pro Punkt, darüber gilt die Kurve als scharf.
pub const TRACK_SHARP_TURN_MAX_ANGLE: f32 = std::f32::consts::FRAC_PI_4;
/// Scharfe Kurven werden nur unterhalb dieses Punktabstands verworfen.
pub const TRACK_SHARP_TURN_DISTANCE: f32 = 15.0;
/// Schnittpunkte näher als dies an einem Segmentende zählen nicht als Kreuzung.
pub const JUNCTION_ENDPOINT_CLEARANCE: f32 = 5.0;
/// Kreuzungen innerhalb dieses Radius werden zusammengefasst.
pub const JUNCTION_DEDUP_RADIUS: f32 = 10.0;
/// Dekorationen brauchen einen Schienenpunkt innerhalb dieses Abstands.
pub const DECORATION_MAX_TRACK_DISTANCE: f32 = 100.0;

// ── Züge ────────────────────────────────────────────────────────────

/// Grundgeschwindigkeit in Pixel pro Frame, vor zufälliger Streuung.
pub const TRAIN_BASE_SPEED: f32 = 1.0;
/// Untergrenze der Zuggröße unabhängig von der Pinselgröße.
pub const TRAIN_MIN_SIZE: f32 = 16.0;
/// Unter diesem Abstand hupen sich zwei Züge derselben Schiene an.
pub const TRAIN_HONK_DISTANCE: f32 = 60.0;
/// Unter diesem Abstand bremst der schnellere Zug ab.
pub const TRAIN_BRAKE_DISTANCE: f32 = 40.0;
/// Frames zwischen zwei Hupsignalen desselben Zugs (2 s bei 60 fps).
pub const TRAIN_HONK_COOLDOWN_FRAMES: u32 = 120;
/// Haltedauer an einer Station in Frames.
pub const STATION_STOP_FRAMES: u32 = 60;
/// Auslöseradius einer Station.
pub const STATION_TRIGGER_RADIUS: f32 = 50.0;
/// Auslöseradius eines Tunnels.
pub const TUNNEL_TRIGGER_RADIUS: f32 = 30.0;
/// Wagenabstand als Vielfaches der Zuggröße.
pub const CAR_LENGTH_FACTOR: f32 = 2.2;

// ── Partikel ────────────────────────────────────────────────────────

/// Harte Obergrenze über alle Partikel, älteste fliegen zuerst raus.
pub const MAX_ENTITIES: usize = 4096;
/// Eigene Obergrenze für permanenten Glitzer, der nie von selbst verfällt.
pub const MAX_GLITTER: usize = 2000;
/// Obergrenze gleichzeitig lebender Käfer.
pub const MAX_BUGS: usize = 10;
/// Mindestabstand zwischen zwei Glitzerpunkten.
pub const GLITTER_MIN_SPACING: f32 = 8.0;
/// Platzierungsversuche pro Glitzerpunkt, danach wird er verworfen.
pub const GLITTER_PLACEMENT_ATTEMPTS: u32 = 10;

// ── Natur-Werkzeuge ─────────────────────────────────────────────────

/// Lebensdauer gestempelter Blumen in Frames (10 s bei 60 fps).
pub const FLOWER_LIFETIME_FRAMES: u32 = 600;
/// Lebensdauer gestempelter Grashalme in Frames.
pub const GRASS_LIFETIME_FRAMES: u32 = 600;
/// Frames zwischen zwei Blumenstempeln beim Ziehen (150 ms bei 60 fps).
pub const FLOWER_INTERVAL_FRAMES: u64 = 9;
/// Frames zwischen zwei Grasstempeln (120 ms bei 60 fps).
pub const GRASS_INTERVAL_FRAMES: u64 = 7;
/// Frames zwischen zwei Blattstempeln (100 ms bei 60 fps).
pub const LEAF_INTERVAL_FRAMES: u64 = 6;

// ── Verlauf ─────────────────────────────────────────────────────────

/// Maximale Tiefe des Undo-Stapels.
pub const HISTORY_MAX_DEPTH: usize = 50;

// ── Laufzeit-Optionen (serialisierbar) ──────────────────────────────

/// Alle zur Laufzeit änderbaren Engine-Optionen.
/// Wird als `zauberkreide_options.toml` neben der Binary gespeichert.
///
/// Die geometrischen Filter des Schienenbaus (Punktabstand, Kurvenlimit)
/// bleiben bewusst Konstanten, damit aufgezeichnete Bilder überall gleich
/// nachgebaut werden.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineOptions {
    // ── Zeichenfläche ───────────────────────────────────────────
    /// Breite der Zeichenfläche in Pixeln
    pub surface_width: u32,
    /// Höhe der Zeichenfläche in Pixeln
    pub surface_height: u32,
    /// Pinselgröße beim Start
    pub brush_size: f32,

    // ── Schienen und Züge ───────────────────────────────────────
    /// Snap-Radius (Pixel) für Schienenenden
    pub track_snap_radius: f32,
    /// Zug-Grundgeschwindigkeit in Pixel pro Frame
    pub train_base_speed: f32,
    /// Kreuzungsmarker auf der Überlagerung anzeigen
    #[serde(default = "default_show_junction_markers")]
    pub show_junction_markers: bool,

    // ── Partikel ────────────────────────────────────────────────
    /// Maximale Anzahl gleichzeitiger Partikel
    pub max_entities: usize,
    /// Maximale Anzahl permanenter Glitzerpunkte
    pub max_glitter: usize,

    // ── Natur-Werkzeuge ─────────────────────────────────────────
    /// Lebensdauer gestempelter Blumen in Frames
    #[serde(default = "default_flower_lifetime_frames")]
    pub flower_lifetime_frames: u32,
    /// Lebensdauer gestempelter Grashalme in Frames
    #[serde(default = "default_grass_lifetime_frames")]
    pub grass_lifetime_frames: u32,

    // ── Verlauf ─────────────────────────────────────────────────
    /// Tiefe des Undo-Stapels
    pub history_depth: usize,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            surface_width: SURFACE_WIDTH,
            surface_height: SURFACE_HEIGHT,
            brush_size: BRUSH_SIZE_DEFAULT,

            track_snap_radius: TRACK_SNAP_RADIUS,
            train_base_speed: TRAIN_BASE_SPEED,
            show_junction_markers: default_show_junction_markers(),

            max_entities: MAX_ENTITIES,
            max_glitter: MAX_GLITTER,

            flower_lifetime_frames: default_flower_lifetime_frames(),
            grass_lifetime_frames: default_grass_lifetime_frames(),

            history_depth: HISTORY_MAX_DEPTH,
        }
    }
}

/// Serde-Default für `show_junction_markers` (Abwärtskompatibilität bestehender TOML-Dateien).
fn default_show_junction_markers() -> bool {
    true
}

/// Serde-Default für `flower_lifetime_frames` (Abwärtskompatibilität).
fn default_flower_lifetime_frames() -> u32 {
    FLOWER_LIFETIME_FRAMES
}

/// Serde-Default für `grass_lifetime_frames` (Abwärtskompatibilität).
fn default_grass_lifetime_frames() -> u32 {
    GRASS_LIFETIME_FRAMES
}

impl EngineOptions {
    /// Lädt Optionen aus einer TOML-Datei. Bei Fehler: Standardwerte.
    pub fn load_from_file(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(opts) => {
                    log::info!("Optionen geladen aus: {}", path.display());
                    opts
                }
                Err(e) => {
                    log::warn!("Optionen-Datei fehlerhaft, verwende Standardwerte: {}", e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Keine Optionen-Datei gefunden, verwende Standardwerte");
                Self::default()
            }
        }
    }

    /// Speichert Optionen als TOML-Datei.
    pub fn save_to_file(&self, path: &std::path::Path) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        log::info!("Optionen gespeichert nach: {}", path.display());
        Ok(())
    }

    /// Ermittelt den Pfad zur Optionen-Datei neben der Binary.
    pub fn config_path() -> std::path::PathBuf {
        std::env::current_exe()
            .unwrap_or_else(|_| std::path::PathBuf::from("zauberkreide_studio"))
            .parent()
            .unwrap_or_else(|| std::path::Path::new("."))
            .join("zauberkreide_options.toml")
    }

    /// Klemmt eine Pinselgröße in die erlaubte Spanne.
    pub fn clamp_brush_size(size: f32) -> f32 {
        size.clamp(BRUSH_SIZE_MIN, BRUSH_SIZE_MAX)
    }
}
