//! Strichaufzeichnung: Striche mitschneiden, als JSON sichern und abspielen.
//!
//! Aufgezeichnet werden Werkzeug, Farbe und Größe beim Ansetzen plus alle
//! Zeigerpunkte. Das Abspielen baut die Basisfläche von Weiß aus neu auf
//! und schickt jeden Strich durch dieselben Malroutinen wie beim Live-Malen.

use super::state::ToolKind;
use crate::core::geometry;
use crate::paint::{self, ColorSource};
use crate::shared::colors;
use anyhow::Context;
use glam::Vec2;
use image::RgbaImage;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Kopf eines Strichs: Werkzeug und Einstellungen beim Ansetzen.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrokeMeta {
    /// Werkzeug des Strichs
    pub tool: ToolKind,
    /// Farbe als Hex-String; im Regenbogenmodus der Ton beim Ansetzen
    pub color: String,
    /// Pinselgröße in Pixeln
    pub size: f32,
}

/// Ein vollständiger Strich: Kopf plus Zeigerpunkte in Eingabereihenfolge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordedStroke {
    pub meta: StrokeMeta,
    pub points: Vec<Vec2>,
}

/// Mitschnitt einer Malsitzung.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StrokeRecording {
    strokes: Vec<RecordedStroke>,
    /// Offener Strich zwischen Pointer-Down und Pointer-Up
    #[serde(skip)]
    current: Option<RecordedStroke>,
    #[serde(skip)]
    recording: bool,
}

impl StrokeRecording {
    /// Erstellt einen leeren, inaktiven Mitschnitt.
    pub fn new() -> Self {
        Self::default()
    }

    /// Startet die Aufzeichnung und verwirft frühere Striche.
    pub fn start(&mut self) {
        self.strokes.clear();
        self.current = None;
        self.recording = true;
    }

    /// Beendet die Aufzeichnung; ein offener Strich wird verworfen.
    pub fn stop(&mut self) {
        self.current = None;
        self.recording = false;
    }

    pub fn is_recording(&self) -> bool {
        self.recording
    }

    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }

    pub fn stroke_count(&self) -> usize {
        self.strokes.len()
    }

    /// Öffnet einen neuen Strich mit dem Startpunkt (nur während der Aufnahme).
    pub fn start_stroke(&mut self, meta: StrokeMeta, start: Vec2) {
        if self.recording {
            self.current = Some(RecordedStroke {
                meta,
                points: vec![start],
            });
        }
    }

    /// Hängt einen Zeigerpunkt an den offenen Strich an.
    pub fn add_point(&mut self, point: Vec2) {
        if let Some(stroke) = self.current.as_mut() {
            stroke.points.push(point);
        }
    }

    /// Schließt den offenen Strich ab und übernimmt ihn in den Mitschnitt.
    pub fn end_stroke(&mut self) {
        if let Some(stroke) = self.current.take() {
            self.strokes.push(stroke);
        }
    }

    /// Serialisiert den Mitschnitt als JSON.
    pub fn to_json(&self) -> anyhow::Result<String> {
        serde_json::to_string_pretty(self).context("Aufzeichnung serialisieren")
    }

    /// Liest einen Mitschnitt aus JSON.
    pub fn from_json(text: &str) -> anyhow::Result<Self> {
        serde_json::from_str(text).context("Aufzeichnung parsen")
    }

    /// Spielt alle Striche auf einer weiß gefüllten Basisfläche ab.
    ///
    /// Werkzeuge, die live nur das Overlay füttern (Partikel, Schienen,
    /// Pflanzen), hinterlassen keine Basispixel; für sie zeichnet das
    /// Abspielen ersatzweise den aufgezeichneten Weg als einfache Linie.
    pub fn replay_onto(&self, base: &mut RgbaImage, rng: &mut impl Rng) {
        for pixel in base.pixels_mut() {
            *pixel = colors::WHITE;
        }
        let (width, height) = base.dimensions();
        let center = Vec2::new(width as f32 / 2.0, height as f32 / 2.0);

        for stroke in &self.strokes {
            replay_stroke(base, stroke, center, rng);
        }
    }
}

fn replay_stroke(
    base: &mut RgbaImage,
    stroke: &RecordedStroke,
    center: Vec2,
    rng: &mut impl Rng,
) {
    let Some(&start) = stroke.points.first() else {
        return;
    };
    let size = stroke.meta.size;
    let color = colors::parse_hex(&stroke.meta.color).unwrap_or(colors::BLACK);
    let mut source = ColorSource::fixed(color);

    match stroke.meta.tool {
        ToolKind::Brush => {
            for pair in stroke.points.windows(2) {
                paint::stroke::brush_segment(base, pair[0], pair[1], size, &mut source);
            }
        }
        ToolKind::Eraser => {
            for pair in stroke.points.windows(2) {
                paint::stroke::eraser(base, pair[0], pair[1], size);
            }
        }
        ToolKind::Fill => paint::fill::flood_fill(base, start, color),
        ToolKind::Spray => {
            for &point in &stroke.points {
                paint::stroke::spray(base, point, size, &mut source, rng);
            }
        }
        ToolKind::Neon => {
            for pair in stroke.points.windows(2) {
                paint::stroke::neon_segment(base, pair[0], pair[1], size, &mut source, false);
            }
        }
        ToolKind::Smudge => {
            for &point in &stroke.points[1..] {
                paint::smudge::smudge(base, point, size, rng);
            }
        }
        ToolKind::Blend => {
            for &point in &stroke.points[1..] {
                paint::smudge::blend(base, point, size);
            }
        }
        ToolKind::LeafTrail => {
            for pair in stroke.points.windows(2) {
                let heading = geometry::direction_of(pair[0], pair[1]);
                paint::stroke::leaf_stamp(base, pair[1], heading, size, &mut source);
            }
        }
        ToolKind::BlockyBuilder => {
            let block_size = (size * 0.8).max(4.0);
            let mut last_block = None;
            for &point in &stroke.points {
                paint::stroke::blocky_builder(base, point, block_size, &mut last_block, &mut source);
            }
        }
        ToolKind::MirrorPainting => {
            for pair in stroke.points.windows(2) {
                paint::stroke::mirror_segment(base, pair[0], pair[1], size, center, &mut source);
            }
        }
        _ => {
            for pair in stroke.points.windows(2) {
                paint::stroke::brush_segment(base, pair[0], pair[1], size, &mut source);
            }
        }
    }
}
