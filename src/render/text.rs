//! Minimaler 5x7-Bitmapfont für Beschriftungen auf der Pixelfläche.
//!
//! Reicht für Schilder und Rufe wie "HONK!". Kleinbuchstaben werden auf
//! Großbuchstaben abgebildet, unbekannte Zeichen bleiben leer.

use glam::Vec2;
use image::{Rgba, RgbaImage};

use crate::render::raster;

/// Zeichenzelle: 5 Spalten plus 1 Spalte Abstand.
const GLYPH_ADVANCE: i32 = 6;
/// Zeilenhöhe des Fonts in Pixeln bei Skalierung 1.
pub const GLYPH_HEIGHT: i32 = 7;

fn glyph_5x7(c: char) -> [u8; 7] {
    match c {
        'A' => [0b01110, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'B' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10001, 0b10001, 0b11110],
        'C' => [0b01110, 0b10001, 0b10000, 0b10000, 0b10000, 0b10001, 0b01110],
        'D' => [0b11110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b11110],
        'E' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b11111],
        'F' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b10000],
        'G' => [0b01110, 0b10001, 0b10000, 0b10111, 0b10001, 0b10001, 0b01110],
        'H' => [0b10001, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'I' => [0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b11111],
        'J' => [0b11111, 0b00010, 0b00010, 0b00010, 0b10010, 0b10010, 0b01100],
        'K' => [0b10001, 0b10010, 0b10100, 0b11000, 0b10100, 0b10010, 0b10001],
        'L' => [0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b11111],
        'M' => [0b10001, 0b11011, 0b10101, 0b10101, 0b10001, 0b10001, 0b10001],
        'N' => [0b10001, 0b11001, 0b10101, 0b10011, 0b10001, 0b10001, 0b10001],
        'O' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'P' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10000, 0b10000, 0b10000],
        'Q' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10101, 0b10010, 0b01101],
        'R' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10100, 0b10010, 0b10001],
        'S' => [0b01111, 0b10000, 0b10000, 0b01110, 0b00001, 0b00001, 0b11110],
        'T' => [0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100],
        'U' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'V' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01010, 0b00100],
        'W' => [0b10001, 0b10001, 0b10001, 0b10101, 0b10101, 0b10101, 0b01010],
        'X' => [0b10001, 0b10001, 0b01010, 0b00100, 0b01010, 0b10001, 0b10001],
        'Y' => [0b10001, 0b10001, 0b01010, 0b00100, 0b00100, 0b00100, 0b00100],
        'Z' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b11111],

        '0' => [0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110],
        '1' => [0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        '2' => [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b01000, 0b11111],
        '3' => [0b11110, 0b00001, 0b00001, 0b01110, 0b00001, 0b00001, 0b11110],
        '4' => [0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010],
        '5' => [0b11111, 0b10000, 0b10000, 0b11110, 0b00001, 0b00001, 0b11110],
        '6' => [0b01110, 0b10000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110],
        '7' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000],
        '8' => [0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110],
        '9' => [0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00001, 0b01110],

        '!' => [0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00000, 0b00100],
        '?' => [0b01110, 0b10001, 0b00001, 0b00110, 0b00100, 0b00000, 0b00100],
        '.' => [0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b00100, 0b00100],
        '-' => [0b00000, 0b00000, 0b00000, 0b11111, 0b00000, 0b00000, 0b00000],
        _ => [0, 0, 0, 0, 0, 0, 0],
    }
}

/// Pixelbreite eines Schriftzugs bei gegebener Skalierung.
pub fn text_width(text: &str, scale: i32) -> f32 {
    let chars = text.chars().count() as i32;
    if chars == 0 {
        return 0.0;
    }
    ((chars * GLYPH_ADVANCE - 1) * scale.max(1)) as f32
}

/// Zeichnet einen Schriftzug ab der linken oberen Ecke `origin`.
pub fn draw_text(
    surface: &mut RgbaImage,
    origin: Vec2,
    text: &str,
    scale: i32,
    color: Rgba<u8>,
    alpha: f32,
) {
    let scale = scale.max(1);
    let mut x = origin.x.round() as i32;
    let y = origin.y.round() as i32;

    for ch in text.chars() {
        let glyph = glyph_5x7(ch.to_ascii_uppercase());
        for (row, bits) in glyph.iter().enumerate() {
            for col in 0..5 {
                if (bits >> (4 - col)) & 1 == 0 {
                    continue;
                }
                for sy in 0..scale {
                    for sx in 0..scale {
                        raster::blend_pixel(
                            surface,
                            x + col * scale + sx,
                            y + row as i32 * scale + sy,
                            color,
                            alpha,
                        );
                    }
                }
            }
        }
        x += GLYPH_ADVANCE * scale;
    }
}

/// Zeichnet einen Schriftzug mittig um `center`.
pub fn draw_text_centered(
    surface: &mut RgbaImage,
    center: Vec2,
    text: &str,
    scale: i32,
    color: Rgba<u8>,
    alpha: f32,
) {
    let origin = center
        - Vec2::new(
            text_width(text, scale) * 0.5,
            (GLYPH_HEIGHT * scale.max(1)) as f32 * 0.5,
        );
    draw_text(surface, origin, text, scale, color, alpha);
}

/// Schriftzug mit Kontur: erst achtfach versetzt die Konturfarbe,
/// dann die Füllung obenauf.
pub fn draw_text_outlined(
    surface: &mut RgbaImage,
    center: Vec2,
    text: &str,
    scale: i32,
    fill: Rgba<u8>,
    outline: Rgba<u8>,
    alpha: f32,
) {
    for dy in -1..=1 {
        for dx in -1..=1 {
            if dx == 0 && dy == 0 {
                continue;
            }
            draw_text_centered(
                surface,
                center + Vec2::new(dx as f32, dy as f32),
                text,
                scale,
                outline,
                alpha,
            );
        }
    }
    draw_text_centered(surface, center, text, scale, fill, alpha);
}
