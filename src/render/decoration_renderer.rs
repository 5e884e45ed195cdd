//! Stempelt Streckendekorationen dauerhaft in die Malfläche.
//!
//! Dekorationen werden einmal beim Platzieren gezeichnet und leben
//! danach wie jeder Pinselstrich in der Malfläche weiter; ihre Wirkung
//! auf Züge (Halt, Tunnelfahrt) kommt aus [`crate::core::sim`].

use glam::Vec2;
use image::{Rgba, RgbaImage};

use crate::core::scene::{DecorationKind, TrackDecoration};
use crate::render::{raster, text};
use crate::shared::colors;

const WOOD_BROWN: Rgba<u8> = Rgba([139, 69, 19, 255]);
const DOOR_BROWN: Rgba<u8> = Rgba([101, 67, 33, 255]);
const ROOF_RED: Rgba<u8> = Rgba([220, 20, 60, 255]);
const WINDOW_BLUE: Rgba<u8> = Rgba([135, 206, 235, 255]);
const TUNNEL_SLATE: Rgba<u8> = Rgba([47, 79, 79, 255]);
const BRICK_GRAY: Rgba<u8> = Rgba([105, 105, 105, 255]);
const BUILDING_GRAY: Rgba<u8> = Rgba([169, 169, 169, 255]);

pub(crate) fn draw_decoration(base: &mut RgbaImage, decoration: &TrackDecoration) {
    let p = decoration.position;
    match decoration.kind {
        DecorationKind::Station => draw_station(base, p),
        DecorationKind::Tunnel => draw_tunnel(base, p),
        DecorationKind::Tree => draw_tree(base, p),
        DecorationKind::Building => draw_building(base, p),
    }
}

fn draw_station(base: &mut RgbaImage, p: Vec2) {
    raster::draw_rect(base, p + Vec2::new(-30.0, -40.0), Vec2::new(60.0, 40.0), WOOD_BROWN, 1.0);
    raster::draw_triangle(
        base,
        p + Vec2::new(-35.0, -40.0),
        p + Vec2::new(0.0, -60.0),
        p + Vec2::new(35.0, -40.0),
        ROOF_RED,
        1.0,
    );
    raster::draw_rect(base, p + Vec2::new(-10.0, -30.0), Vec2::new(20.0, 30.0), DOOR_BROWN, 1.0);
    for x in [-25.0, 15.0] {
        raster::draw_rect(base, p + Vec2::new(x, -35.0), Vec2::splat(10.0), WINDOW_BLUE, 1.0);
    }

    // Goldenes Schild mit Aufschrift.
    raster::draw_rect(base, p + Vec2::new(-20.0, -15.0), Vec2::new(40.0, 8.0), colors::GOLD, 1.0);
    text::draw_text_centered(base, p + Vec2::new(0.0, -11.0), "STATION", 1, colors::BLACK, 1.0);
}

fn draw_tunnel(base: &mut RgbaImage, p: Vec2) {
    // Portal aus Sockel und Bogen, innen das schwarze Loch.
    raster::draw_rect(base, p + Vec2::new(-40.0, -35.0), Vec2::new(80.0, 35.0), TUNNEL_SLATE, 1.0);
    raster::draw_half_disc(base, p, 40.0, TUNNEL_SLATE, 1.0);
    raster::draw_rect(base, p + Vec2::new(-35.0, -30.0), Vec2::new(70.0, 30.0), colors::BLACK, 1.0);
    raster::draw_half_disc(base, p, 35.0, colors::BLACK, 1.0);

    // Angedeutete Mauerfugen.
    for i in -2..=2 {
        let x = i as f32 * 15.0;
        raster::draw_line(
            base,
            p + Vec2::new(x, -30.0),
            p + Vec2::new(x, 0.0),
            1.0,
            BRICK_GRAY,
            1.0,
        );
    }
}

fn draw_tree(base: &mut RgbaImage, p: Vec2) {
    raster::draw_rect(base, p + Vec2::new(-5.0, -20.0), Vec2::new(10.0, 25.0), WOOD_BROWN, 1.0);
    raster::draw_filled_circle(base, p + Vec2::new(0.0, -25.0), 15.0, colors::GRASS_GREEN, 1.0);
    raster::draw_filled_circle(base, p + Vec2::new(-8.0, -20.0), 12.0, colors::GRASS_GREEN, 1.0);
    raster::draw_filled_circle(base, p + Vec2::new(8.0, -20.0), 12.0, colors::GRASS_GREEN, 1.0);
}

fn draw_building(base: &mut RgbaImage, p: Vec2) {
    raster::draw_rect(base, p + Vec2::new(-25.0, -50.0), Vec2::new(50.0, 50.0), BUILDING_GRAY, 1.0);
    for row in 0..3 {
        for col in 0..3 {
            let min = p + Vec2::new(-18.0 + col as f32 * 12.0, -42.0 + row as f32 * 12.0);
            raster::draw_rect(base, min, Vec2::splat(8.0), colors::GOLD, 1.0);
        }
    }
    raster::draw_rect(base, p + Vec2::new(-8.0, -20.0), Vec2::new(16.0, 20.0), DOOR_BROWN, 1.0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::track::TrackId;

    fn deko(kind: DecorationKind) -> TrackDecoration {
        TrackDecoration {
            kind,
            position: Vec2::new(100.0, 100.0),
            track_id: TrackId(1),
            size: 30.0,
        }
    }

    #[test]
    fn station_hat_dach_schild_und_schriftzug() {
        let mut base = RgbaImage::new(200, 200);
        draw_decoration(&mut base, &deko(DecorationKind::Station));

        assert_eq!(*base.get_pixel(72, 63), WOOD_BROWN, "Wand");
        assert_eq!(*base.get_pixel(100, 55), ROOF_RED, "Dach");
        assert_eq!(*base.get_pixel(100, 85), colors::GOLD, "Schild");

        let mut schrift = 0;
        for y in 86..=92 {
            for x in 80..=120 {
                if *base.get_pixel(x, y) == colors::BLACK {
                    schrift += 1;
                }
            }
        }
        assert!(schrift > 30, "Aufschrift fehlt, nur {schrift} schwarze Pixel");
    }

    #[test]
    fn tunnel_ist_innen_schwarz_mit_bogen() {
        let mut base = RgbaImage::new(200, 200);
        draw_decoration(&mut base, &deko(DecorationKind::Tunnel));

        assert_eq!(*base.get_pixel(95, 85), colors::BLACK, "Tunnelloch");
        assert_eq!(*base.get_pixel(100, 62), TUNNEL_SLATE, "Bogen");
        assert_eq!(*base.get_pixel(85, 85), BRICK_GRAY, "Mauerfuge");
        assert_eq!(base.get_pixel(100, 57)[3], 0, "über dem Bogen bleibt es frei");
    }

    #[test]
    fn baum_hat_stamm_und_krone() {
        let mut base = RgbaImage::new(200, 200);
        draw_decoration(&mut base, &deko(DecorationKind::Tree));

        assert_eq!(*base.get_pixel(100, 103), WOOD_BROWN, "Stamm");
        assert_eq!(*base.get_pixel(100, 70), colors::GRASS_GREEN, "Krone");
        assert_eq!(base.get_pixel(100, 40)[3], 0);
    }

    #[test]
    fn hochhaus_hat_fensterraster_und_tuer() {
        let mut base = RgbaImage::new(200, 200);
        draw_decoration(&mut base, &deko(DecorationKind::Building));

        assert_eq!(*base.get_pixel(98, 74), colors::GOLD, "Fenster");
        assert_eq!(*base.get_pixel(92, 74), BUILDING_GRAY, "Wand zwischen Fenstern");
        assert_eq!(*base.get_pixel(100, 95), DOOR_BROWN, "Tür");
    }
}
