//! Strichwerkzeuge, die sofort auf die persistente Basis malen.
//!
//! Jede Funktion verarbeitet genau ein Zeigerereignis (Segment von
//! `from` nach `to` oder Stempel an einem Punkt). Zustand über den
//! Strich hinweg (Regenbogen-Farbton, letzter Blockraster-Punkt) hält
//! der Aufrufer.

use glam::Vec2;
use image::{Rgba, RgbaImage};
use rand::Rng;

use crate::core::geometry::local_to_world;
use crate::paint::ColorSource;
use crate::render::raster;
use crate::shared::colors;

/// Anzahl der Kaleidoskop-Sektoren der Spiegelmalerei.
pub const MIRROR_SECTIONS: u32 = 8;
/// Punkte pro Sprüher-Ereignis.
const SPRAY_DOTS: u32 = 15;

/// Runder Pinsel: ein Segment in der aktuellen Farbe.
pub fn brush_segment(surface: &mut RgbaImage, from: Vec2, to: Vec2, brush_size: f32, color: &mut ColorSource) {
    raster::draw_line(surface, from, to, brush_size, color.next(), 1.0);
}

/// Neonstrich: breiter Schein, voller Farbkörper, weißer Kern.
///
/// Im Regenbogenmodus fällt der Kern schmaler aus, damit die
/// wechselnden Farben sichtbar bleiben.
pub fn neon_segment(
    surface: &mut RgbaImage,
    from: Vec2,
    to: Vec2,
    brush_size: f32,
    color: &mut ColorSource,
    rainbow: bool,
) {
    let farbe = color.next();
    raster::draw_line(surface, from, to, brush_size * 1.6, farbe, 0.35);
    raster::draw_line(surface, from, to, brush_size, farbe, 1.0);

    let core = if rainbow { 0.25 } else { 0.4 };
    raster::draw_line(surface, from, to, brush_size * core, colors::WHITE, 1.0);
}

/// Sprüher: 15 zufällige Punkte im doppelten Pinselradius.
pub fn spray(
    surface: &mut RgbaImage,
    center: Vec2,
    brush_size: f32,
    color: &mut ColorSource,
    rng: &mut impl Rng,
) {
    for _ in 0..SPRAY_DOTS {
        let angle = rng.random_range(0.0..std::f32::consts::TAU);
        let distance = rng.random_range(0.0..1.0) * brush_size * 2.0;
        let dot = center + Vec2::from_angle(angle) * distance;
        let alpha = rng.random_range(0.0..1.0) * 0.8 + 0.2;
        let radius = rng.random_range(0.0..1.0) * 2.0 + 0.5;
        raster::draw_filled_circle(surface, dot, radius, color.next(), alpha);
    }
}

/// Radierer: Kreis am Punkt plus breite Bahn vom letzten Punkt.
pub fn eraser(surface: &mut RgbaImage, from: Vec2, to: Vec2, brush_size: f32) {
    let radius = brush_size * 2.0;
    raster::erase_circle(surface, to, radius);
    raster::erase_line(surface, from, to, radius * 2.0);
}

/// Blockbaukasten: rastet auf das Raster und füllt Lücken zwischen
/// zwei Ereignissen mit Zwischenblöcken auf.
///
/// `last_block` gehört dem Aufrufer und wird am Strichende auf `None`
/// gesetzt, sonst springt der nächste Strich eine Blocklinie quer
/// über das Bild.
pub fn blocky_builder(
    surface: &mut RgbaImage,
    point: Vec2,
    block_size: f32,
    last_block: &mut Option<Vec2>,
    color: &mut ColorSource,
) {
    let grid = Vec2::new(
        (point.x / block_size).floor() * block_size,
        (point.y / block_size).floor() * block_size,
    );

    draw_single_block(surface, grid, block_size, color);

    if let Some(last) = *last_block {
        if last != grid {
            draw_block_line(surface, last, grid, block_size, color);
        }
    }
    *last_block = Some(grid);
}

fn draw_single_block(surface: &mut RgbaImage, min: Vec2, block_size: f32, color: &mut ColorSource) {
    let size = Vec2::splat(block_size);
    raster::draw_rect(surface, min, size, color.next(), 1.0);
    raster::draw_rect_outline(surface, min, size, 1.0, colors::darken(color.next(), 0.3), 1.0);

    // Lichtkante oben und links.
    let glanz = colors::lighten(color.next(), 0.3);
    raster::draw_rect(surface, min, Vec2::new(block_size, 2.0), glanz, 1.0);
    raster::draw_rect(surface, min, Vec2::new(2.0, block_size), glanz, 1.0);
}

fn draw_block_line(surface: &mut RgbaImage, from: Vec2, to: Vec2, block_size: f32, color: &mut ColorSource) {
    let steps = ((to.x - from.x).abs() / block_size).max((to.y - from.y).abs() / block_size);
    if steps <= 1.0 {
        return;
    }
    for i in 1..(steps.ceil() as i32) {
        let t = i as f32 / steps;
        let zwischen = from + (to - from) * t;
        let grid = Vec2::new(
            (zwischen.x / block_size).floor() * block_size,
            (zwischen.y / block_size).floor() * block_size,
        );
        draw_single_block(surface, grid, block_size, color);
    }
}

/// Spiegelmalerei: dasselbe Segment in acht Kaleidoskop-Sektoren um
/// die Bildmitte, gerade Sektoren gedreht, ungerade gespiegelt.
pub fn mirror_segment(
    surface: &mut RgbaImage,
    from: Vec2,
    to: Vec2,
    brush_size: f32,
    center: Vec2,
    color: &mut ColorSource,
) {
    for section in 0..MIRROR_SECTIONS {
        let farbe = color.next();
        let a = mirror_point(from, center, section);
        let b = mirror_point(to, center, section);
        raster::draw_line(surface, a, b, brush_size, farbe, 1.0);
    }
}

fn mirror_point(point: Vec2, center: Vec2, section: u32) -> Vec2 {
    let rel = point - center;
    let distance = rel.length();
    let angle = rel.y.atan2(rel.x);
    let section_angle = std::f32::consts::TAU / MIRROR_SECTIONS as f32 * section as f32;

    let new_angle = if section % 2 == 0 {
        angle + section_angle
    } else {
        -angle + section_angle
    };
    center + Vec2::from_angle(new_angle) * distance
}

/// Blattstempel: Ellipse in Zugrichtung mit Mittelrippe.
pub fn leaf_stamp(
    surface: &mut RgbaImage,
    position: Vec2,
    heading: f32,
    brush_size: f32,
    color: &mut ColorSource,
) {
    let leaf_size = brush_size * 0.8;
    raster::draw_ellipse(
        surface,
        position,
        Vec2::new(leaf_size, leaf_size * 0.6),
        heading,
        color.next(),
        0.7,
    );

    let rippe_von = local_to_world(position, heading, Vec2::new(-leaf_size * 0.8, 0.0));
    let rippe_bis = local_to_world(position, heading, Vec2::new(leaf_size * 0.8, 0.0));
    raster::draw_line(surface, rippe_von, rippe_bis, 1.0, color.next(), 0.9);
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn flaeche() -> RgbaImage {
        RgbaImage::new(200, 200)
    }

    fn rot() -> ColorSource {
        ColorSource::fixed(Rgba([255, 0, 0, 255]))
    }

    #[test]
    fn pinsel_verbindet_zwei_punkte() {
        let mut surface = flaeche();
        let mut farbe = rot();
        brush_segment(&mut surface, Vec2::new(50.0, 100.0), Vec2::new(150.0, 100.0), 6.0, &mut farbe);

        assert_eq!(*surface.get_pixel(100, 100), Rgba([255, 0, 0, 255]));
        assert_eq!(surface.get_pixel(100, 120)[3], 0);
    }

    #[test]
    fn neonstrich_hat_weissen_kern_und_farbigen_schein() {
        let mut surface = flaeche();
        let mut farbe = rot();
        neon_segment(
            &mut surface,
            Vec2::new(50.0, 100.0),
            Vec2::new(150.0, 100.0),
            10.0,
            &mut farbe,
            false,
        );

        assert_eq!(*surface.get_pixel(100, 100), colors::WHITE, "Kern fehlt");
        let koerper = surface.get_pixel(100, 96);
        assert_eq!(koerper[0], 255);
        assert_eq!(koerper[1], 0, "{koerper:?}");
        let schein = surface.get_pixel(100, 93);
        assert!(schein[3] > 0 && schein[3] < 255, "{schein:?}");
    }

    #[test]
    fn spruehpunkte_bleiben_im_doppelten_radius() {
        let mut surface = flaeche();
        let mut farbe = rot();
        let mut rng = StdRng::seed_from_u64(7);
        let center = Vec2::new(100.0, 100.0);
        spray(&mut surface, center, 10.0, &mut farbe, &mut rng);

        let mut getroffen = 0;
        for (x, y, pixel) in surface.enumerate_pixels() {
            if pixel[3] > 0 {
                getroffen += 1;
                let d = Vec2::new(x as f32, y as f32).distance(center);
                assert!(d <= 10.0 * 2.0 + 3.0, "Punkt bei ({x},{y}) liegt zu weit draußen");
            }
        }
        assert!(getroffen > 0, "kein einziger Punkt gelandet");
    }

    #[test]
    fn radierer_reisst_eine_bahn_frei() {
        let mut surface = flaeche();
        raster::fill(&mut surface, colors::WHITE);
        eraser(&mut surface, Vec2::new(60.0, 100.0), Vec2::new(140.0, 100.0), 5.0);

        assert_eq!(surface.get_pixel(100, 100)[3], 0, "Bahn nicht frei");
        assert_eq!(surface.get_pixel(140, 100)[3], 0, "Endkreis nicht frei");
        assert_eq!(*surface.get_pixel(100, 30), colors::WHITE);
    }

    #[test]
    fn bloecke_rasten_auf_dem_gitter() {
        let mut surface = flaeche();
        let mut farbe = rot();
        let mut last_block = None;
        blocky_builder(&mut surface, Vec2::new(37.0, 22.0), 8.0, &mut last_block, &mut farbe);

        assert_eq!(last_block, Some(Vec2::new(32.0, 16.0)));
        assert_eq!(*surface.get_pixel(36, 20), Rgba([255, 0, 0, 255]));
        assert_eq!(
            *surface.get_pixel(36, 16),
            colors::lighten(Rgba([255, 0, 0, 255]), 0.3),
            "Lichtkante oben fehlt"
        );
        assert_eq!(surface.get_pixel(45, 20)[3], 0, "Nachbarzelle muss leer bleiben");
    }

    #[test]
    fn blocklinie_fuellt_die_luecke() {
        let mut surface = flaeche();
        let mut farbe = rot();
        let mut last_block = None;
        blocky_builder(&mut surface, Vec2::new(5.0, 5.0), 8.0, &mut last_block, &mut farbe);
        blocky_builder(&mut surface, Vec2::new(29.0, 5.0), 8.0, &mut last_block, &mut farbe);

        // Zwischenblöcke bei x=8 und x=16 schließen die Reihe.
        assert!(surface.get_pixel(12, 4)[3] > 0);
        assert!(surface.get_pixel(20, 4)[3] > 0);
        assert_eq!(last_block, Some(Vec2::new(24.0, 0.0)));
    }

    #[test]
    fn spiegelmalerei_trifft_gegenueberliegende_sektoren() {
        let mut surface = flaeche();
        let mut farbe = rot();
        mirror_segment(
            &mut surface,
            Vec2::new(148.0, 100.0),
            Vec2::new(152.0, 100.0),
            5.0,
            Vec2::new(100.0, 100.0),
            &mut farbe,
        );

        assert!(surface.get_pixel(150, 100)[3] > 0, "Ursprungssektor fehlt");
        assert!(surface.get_pixel(50, 100)[3] > 0, "gegenüber fehlt");
        assert!(surface.get_pixel(100, 150)[3] > 0, "Viertelsektor fehlt");
        assert!(surface.get_pixel(135, 135)[3] > 0, "gespiegelter Sektor fehlt");
    }

    #[test]
    fn blatt_liegt_in_zugrichtung() {
        let mut quer = flaeche();
        let mut farbe = rot();
        leaf_stamp(&mut quer, Vec2::new(100.0, 100.0), 0.0, 10.0, &mut farbe);
        assert!(quer.get_pixel(106, 100)[3] > 0);
        assert_eq!(quer.get_pixel(100, 106)[3], 0);

        let mut laengs = flaeche();
        leaf_stamp(&mut laengs, Vec2::new(100.0, 100.0), std::f32::consts::FRAC_PI_2, 10.0, &mut farbe);
        assert!(laengs.get_pixel(100, 106)[3] > 0);
        assert_eq!(laengs.get_pixel(106, 100)[3], 0);
    }
}
