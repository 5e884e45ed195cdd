//! Datenmodell der animierten Partikel.
//!
//! Jedes Partikel trägt Position, Geschwindigkeit und Restlebensdauer,
//! der kindspezifische Zustand steckt im `EntityKind`. Die Schrittlogik
//! in [`crate::core::sim`] matcht erschöpfend über alle Arten.

use glam::Vec2;
use image::Rgba;

/// Lebensdauer-Markierung für Partikel, die nie von selbst verfallen.
pub const PERMANENT_LIFE: i32 = -1;

/// Ein animiertes Partikel auf der Überlagerungsfläche.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub position: Vec2,
    /// Verschiebung in Pixel pro Frame.
    pub velocity: Vec2,
    /// Verbleibende Frames, [`PERMANENT_LIFE`] für permanente Partikel.
    pub life: i32,
    pub kind: EntityKind,
}

impl Entity {
    /// Partikel mit `life == 0` verfallen, permanente bleiben.
    pub fn is_expired(&self) -> bool {
        !(self.life > 0 || self.life == PERMANENT_LIFE)
    }

    pub fn is_glitter(&self) -> bool {
        matches!(self.kind, EntityKind::Glitter { .. })
    }

    pub fn is_bug(&self) -> bool {
        matches!(self.kind, EntityKind::Bug { .. })
    }
}

/// Kindspezifischer Zustand der Partikelarten.
#[derive(Debug, Clone, PartialEq)]
pub enum EntityKind {
    /// Aufsteigende Rakete, die am Zielpunkt in Funken zerplatzt.
    FireworkRocket {
        color: Rgba<u8>,
        size: f32,
        start_y: f32,
        target_y: f32,
        /// Zählt Frames, jeder zweite lässt einen Schweifpunkt zurück.
        trail_timer: u32,
    },
    /// Explosionsfunke einer Rakete.
    FireworkSpark { color: Rgba<u8>, size: f32 },
    /// Abgasspur hinter einer aufsteigenden Rakete.
    RocketTrail { color: Rgba<u8>, size: f32 },
    /// Permanenter Glitzerpunkt mit Blinkzyklus.
    Glitter {
        color: Rgba<u8>,
        size: f32,
        blink_timer: u32,
    },
    /// Aufsteigender Ballon mit pendelnder Schnur.
    Balloon {
        color: Rgba<u8>,
        size: f32,
        base_alpha: f32,
        wobble: f32,
        wind_phase: f32,
        string_length: f32,
    },
    /// Rotierendes Konfettiplättchen.
    Confetti {
        color: Rgba<u8>,
        size: f32,
        rotation: f32,
        spin: f32,
    },
    /// Kriechender Wurm mit nachgezogener Spur.
    Worm {
        color: Rgba<u8>,
        /// Letzte Positionen, vorne die älteste.
        trail: Vec<Vec2>,
        max_trail: usize,
        direction: f32,
        turn_rate: f32,
        wiggle: f32,
        wiggle_speed: f32,
    },
    /// Blitz, dessen Zackenzug jeden Frame neu gewürfelt wird.
    Lightning {
        color: Rgba<u8>,
        start: Vec2,
        target: Vec2,
        width: f32,
        intensity: f32,
        max_life: i32,
        /// Aktueller Zackenzug inklusive Start und Ziel.
        segments: Vec<Vec2>,
        /// Seitenast des aktuellen Frames, falls gewürfelt.
        branch: Option<Vec<Vec2>>,
    },
    /// Herumkrabbelnder Käfer mit Richtungswechsel-Timer.
    Bug {
        glyph: BugGlyph,
        size: f32,
        direction: f32,
        wiggle: f32,
        wiggle_speed: f32,
        /// Frames bis zum nächsten Richtungswechsel.
        change_timer: i32,
    },
    /// Fallende Luftschlange mit Korkenzieher-Drall.
    Streamer {
        color: Rgba<u8>,
        width: f32,
        length: f32,
        wave: f32,
        curl: f32,
        twist: f32,
    },
    /// Rauchwölkchen aus dem Schornstein einer Lok.
    TrainSmoke {
        color: Rgba<u8>,
        shape: SmokeShape,
        size: f32,
        base_alpha: f32,
        growth: f32,
        rotation: f32,
        spin: f32,
    },
    /// Aufsteigender "HONK!"-Schriftzug über einer Lok.
    HonkText,
}

/// Käferart, bestimmt Körperform und Farbe beim Zeichnen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BugGlyph {
    Ladybug,
    Ant,
    Beetle,
    Cricket,
    Spider,
}

impl BugGlyph {
    pub const ALL: [BugGlyph; 5] = [
        BugGlyph::Ladybug,
        BugGlyph::Ant,
        BugGlyph::Beetle,
        BugGlyph::Cricket,
        BugGlyph::Spider,
    ];
}

/// Form eines Rauchwölkchens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmokeShape {
    Puff,
    Heart,
    Star,
    Circle,
}

impl SmokeShape {
    pub const ALL: [SmokeShape; 4] = [
        SmokeShape::Puff,
        SmokeShape::Heart,
        SmokeShape::Star,
        SmokeShape::Circle,
    ];
}
