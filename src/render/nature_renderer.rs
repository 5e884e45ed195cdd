//! Wackellinien, Blumen und Gras auf dem Overlay.
//!
//! Alles hier lebt nur auf dem Overlay und wird jedes Frame neu
//! gezeichnet; das Schwanken kommt aus dem globalen Frame-Zähler plus
//! einem Phasenversatz je Pflanze.

use glam::Vec2;
use image::{Rgba, RgbaImage};

use crate::core::scene::{Flower, GrassBlade, WigglyLine};
use crate::render::raster;
use crate::shared::colors;

const FLOWER_CENTER_YELLOW: Rgba<u8> = Rgba([255, 255, 0, 255]);

/// Zeichnet eine Wackellinie über ihre ausgelenkten Punkte.
///
/// Regenbogenlinien tragen je Punkt eine eigene Farbe, sonst gilt die
/// Linienfarbe für den ganzen Zug.
pub(crate) fn draw_wiggly_line(overlay: &mut RgbaImage, line: &WigglyLine) {
    if line.points.len() < 2 {
        return;
    }
    for pair in line.points.windows(2) {
        let farbe = pair[1].color.unwrap_or(line.color);
        raster::draw_line(
            overlay,
            pair[0].displayed,
            pair[1].displayed,
            line.brush_size,
            farbe,
            1.0,
        );
    }
}

/// Blume mit gebogenem Stiel, fünf Blütenblättern und gelber Mitte.
pub(crate) fn draw_flower(overlay: &mut RgbaImage, flower: &Flower, frame: u64) {
    let sway = ((frame as f32) * 0.05 + flower.phase).sin() * 3.0;
    let size = flower.size;
    let base = flower.position;
    let head = base + Vec2::new(sway, 0.0);

    // Der Stiel steht fest im Boden und biegt sich zur Blüte hin.
    let fuss = base + Vec2::new(0.0, size * 1.2);
    let mitte = base + Vec2::new(sway * 0.5, size * 0.7);
    let spitze = base + Vec2::new(sway, size * 0.2);
    raster::draw_quadratic(overlay, fuss, mitte, spitze, 3.0, colors::GRASS_GREEN, 0.8);

    let blaetter = [
        Vec2::new(0.0, -size * 0.6),
        Vec2::new(-size * 0.4, -size * 0.3),
        Vec2::new(size * 0.4, -size * 0.3),
        Vec2::new(-size * 0.3, 0.0),
        Vec2::new(size * 0.3, 0.0),
    ];
    for offset in blaetter {
        raster::draw_ellipse(
            overlay,
            head + offset,
            Vec2::new(size * 0.25, size * 0.4),
            0.0,
            flower.petal_color,
            0.8,
        );
    }
    raster::draw_filled_circle(overlay, head, size * 0.2, FLOWER_CENTER_YELLOW, 0.9);
}

/// Grashalm, der mit der Spitze im Wind wedelt.
pub(crate) fn draw_grass_blade(overlay: &mut RgbaImage, blade: &GrassBlade, frame: u64) {
    let wiggle = ((frame as f32) * 0.08 + blade.phase).sin() * 2.0;
    let base = blade.position;
    let mitte = base + Vec2::new(wiggle * 0.3, -blade.height * 0.5);
    let spitze = base + Vec2::new(wiggle, -blade.height);
    raster::draw_quadratic(overlay, base, mitte, spitze, blade.width, colors::GRASS_GREEN, 0.8)
}
