//! Farbpaletten und Farb-Helfer für Pinsel, Partikel und Züge.
//!
//! Alle Paletten sind als RGBA-Konstanten hinterlegt, damit Spawner und
//! Renderer ohne String-Parsing auskommen. Hex-Parsing gibt es nur an den
//! Rändern (Optionen, Aufzeichnungen).

use image::Rgba;
use rand::Rng;

// ── Feuerwerk ────────────────────────────────────────────────────────────────

pub const FIREWORK_COLORS: [Rgba<u8>; 9] = [
    Rgba([255, 68, 68, 255]),
    Rgba([68, 255, 68, 255]),
    Rgba([68, 68, 255, 255]),
    Rgba([255, 255, 68, 255]),
    Rgba([255, 68, 255, 255]),
    Rgba([68, 255, 255, 255]),
    Rgba([255, 165, 0, 255]),
    Rgba([255, 105, 180, 255]),
    Rgba([255, 255, 255, 255]),
];

// ── Konfetti (Materialfarben) ────────────────────────────────────────────────

pub const CONFETTI_COLORS: [Rgba<u8>; 16] = [
    Rgba([255, 23, 68, 255]),
    Rgba([233, 30, 99, 255]),
    Rgba([156, 39, 176, 255]),
    Rgba([103, 58, 183, 255]),
    Rgba([63, 81, 181, 255]),
    Rgba([33, 150, 243, 255]),
    Rgba([3, 169, 244, 255]),
    Rgba([0, 188, 212, 255]),
    Rgba([0, 150, 136, 255]),
    Rgba([76, 175, 80, 255]),
    Rgba([139, 195, 74, 255]),
    Rgba([205, 220, 57, 255]),
    Rgba([255, 235, 59, 255]),
    Rgba([255, 193, 7, 255]),
    Rgba([255, 152, 0, 255]),
    Rgba([255, 87, 34, 255]),
];

// ── Würmer ───────────────────────────────────────────────────────────────────

pub const WORM_COLORS: [Rgba<u8>; 12] = [
    Rgba([255, 107, 107, 255]),
    Rgba([78, 205, 196, 255]),
    Rgba([69, 183, 209, 255]),
    Rgba([249, 202, 36, 255]),
    Rgba([240, 147, 43, 255]),
    Rgba([235, 77, 75, 255]),
    Rgba([108, 92, 231, 255]),
    Rgba([162, 155, 254, 255]),
    Rgba([253, 121, 168, 255]),
    Rgba([253, 203, 110, 255]),
    Rgba([0, 184, 148, 255]),
    Rgba([225, 112, 85, 255]),
];

// ── Luftschlangen ────────────────────────────────────────────────────────────

pub const STREAMER_COLORS: [Rgba<u8>; 7] = [
    Rgba([255, 107, 107, 255]),
    Rgba([78, 205, 196, 255]),
    Rgba([69, 183, 209, 255]),
    Rgba([249, 202, 36, 255]),
    Rgba([240, 147, 43, 255]),
    Rgba([235, 77, 75, 255]),
    Rgba([108, 92, 231, 255]),
];

// ── Lokrauch ─────────────────────────────────────────────────────────────────

pub const SMOKE_COLORS: [Rgba<u8>; 6] = [
    Rgba([255, 255, 255, 255]),
    Rgba([255, 182, 193, 255]),
    Rgba([255, 215, 0, 255]),
    Rgba([135, 206, 235, 255]),
    Rgba([152, 251, 152, 255]),
    Rgba([221, 160, 221, 255]),
];

// ── Züge ─────────────────────────────────────────────────────────────────────

pub const TRAIN_COLORS: [Rgba<u8>; 10] = [
    Rgba([30, 144, 255, 255]),
    Rgba([255, 69, 0, 255]),
    Rgba([50, 205, 50, 255]),
    Rgba([255, 215, 0, 255]),
    Rgba([255, 105, 180, 255]),
    Rgba([147, 112, 219, 255]),
    Rgba([255, 140, 0, 255]),
    Rgba([0, 206, 209, 255]),
    Rgba([220, 20, 60, 255]),
    Rgba([32, 178, 170, 255]),
];

// ── Blumen ───────────────────────────────────────────────────────────────────

pub const FLOWER_PETAL_COLORS: [Rgba<u8>; 5] = [
    Rgba([255, 105, 180, 255]),
    Rgba([255, 182, 193, 255]),
    Rgba([255, 160, 180, 255]),
    Rgba([255, 20, 147, 255]),
    Rgba([255, 143, 163, 255]),
];

// ── Einzelfarben ─────────────────────────────────────────────────────────────

pub const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
pub const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);
pub const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);
pub const GRASS_GREEN: Rgba<u8> = Rgba([34, 139, 34, 255]);
pub const GOLD: Rgba<u8> = Rgba([255, 215, 0, 255]);
pub const BALLOON_STRING: Rgba<u8> = Rgba([51, 51, 51, 255]);
pub const SNAP_GREEN: Rgba<u8> = Rgba([0, 255, 0, 255]);
pub const FLAG_GREEN: Rgba<u8> = Rgba([0, 255, 0, 255]);
pub const FLAG_RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
pub const FLAG_POLE_BROWN: Rgba<u8> = Rgba([139, 69, 19, 255]);
pub const RAIL_SILVER: Rgba<u8> = Rgba([192, 192, 192, 255]);
pub const JUNCTION_ORANGE: Rgba<u8> = Rgba([255, 102, 0, 255]);

/// Wählt zufällig eine Farbe aus einer Palette.
pub fn pick(palette: &[Rgba<u8>], rng: &mut impl Rng) -> Rgba<u8> {
    palette[rng.random_range(0..palette.len())]
}

/// Parst `#rrggbb` oder `#rrggbbaa` in eine RGBA-Farbe.
pub fn parse_hex(hex: &str) -> Option<Rgba<u8>> {
    let digits = hex.strip_prefix('#')?;
    let byte = |i: usize| u8::from_str_radix(digits.get(i..i + 2)?, 16).ok();
    match digits.len() {
        6 => Some(Rgba([byte(0)?, byte(2)?, byte(4)?, 255])),
        8 => Some(Rgba([byte(0)?, byte(2)?, byte(4)?, byte(6)?])),
        _ => None,
    }
}

/// Formatiert eine Farbe als `#rrggbb` (Alpha wird verworfen).
pub fn format_hex(color: Rgba<u8>) -> String {
    format!("#{:02x}{:02x}{:02x}", color[0], color[1], color[2])
}

/// Dunkelt jeden Kanal um `amount` (0..1) ab.
pub fn darken(color: Rgba<u8>, amount: f32) -> Rgba<u8> {
    let f = (1.0 - amount).clamp(0.0, 1.0);
    Rgba([
        (color[0] as f32 * f) as u8,
        (color[1] as f32 * f) as u8,
        (color[2] as f32 * f) as u8,
        color[3],
    ])
}

/// Hellt jeden Kanal um `amount` (0..1) Richtung Weiß auf.
pub fn lighten(color: Rgba<u8>, amount: f32) -> Rgba<u8> {
    let f = amount.clamp(0.0, 1.0);
    Rgba([
        (color[0] as f32 + (255.0 - color[0] as f32) * f) as u8,
        (color[1] as f32 + (255.0 - color[1] as f32) * f) as u8,
        (color[2] as f32 + (255.0 - color[2] as f32) * f) as u8,
        color[3],
    ])
}

/// Skaliert den Alpha-Kanal mit `alpha` (0..1).
pub fn with_alpha(color: Rgba<u8>, alpha: f32) -> Rgba<u8> {
    let a = (color[3] as f32 * alpha.clamp(0.0, 1.0)) as u8;
    Rgba([color[0], color[1], color[2], a])
}

/// HSL nach RGBA, Sättigung und Helligkeit in 0..1.
///
/// Wird vom Regenbogen-Modus genutzt, der den Farbton pro Abtastpunkt
/// weiterdreht.
pub fn hsl_to_rgba(hue_deg: f32, saturation: f32, lightness: f32) -> Rgba<u8> {
    let h = hue_deg.rem_euclid(360.0) / 60.0;
    let c = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
    let x = c * (1.0 - (h.rem_euclid(2.0) - 1.0).abs());
    let (r, g, b) = match h as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = lightness - c / 2.0;
    Rgba([
        ((r + m) * 255.0).round() as u8,
        ((g + m) * 255.0).round() as u8,
        ((b + m) * 255.0).round() as u8,
        255,
    ])
}
