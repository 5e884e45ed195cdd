//! Wischwerkzeuge: Verschmieren und Angleichen im Pinselumfeld.
//!
//! Beide arbeiten auf dem quadratischen Ausschnitt von
//! `center ± brush_size` und fassen nur Pixel mit Deckkraft an.

use glam::Vec2;
use image::RgbaImage;
use rand::Rng;

/// Verschmieren: senkt die Deckkraft zufälliger Pixel im Umfeld ab,
/// nie unter 50.
pub fn smudge(surface: &mut RgbaImage, center: Vec2, brush_size: f32, rng: &mut impl Rng) {
    let radius = brush_size.round() as i32;
    let cx = center.x.round() as i32;
    let cy = center.y.round() as i32;

    for y in (cy - radius)..(cy + radius) {
        for x in (cx - radius)..(cx + radius) {
            if x < 0 || y < 0 || x >= surface.width() as i32 || y >= surface.height() as i32 {
                continue;
            }
            if rng.random_range(0.0..1.0) <= 0.7 {
                continue;
            }
            let pixel = surface.get_pixel_mut(x as u32, y as u32);
            let alpha = pixel[3];
            if alpha > 0 {
                pixel[3] = (alpha as f32 * 0.9).max(50.0) as u8;
            }
        }
    }
}

/// Angleichen: zieht jedes deckende Pixel abstandsgewichtet zur
/// Durchschnittsfarbe des Umfelds.
pub fn blend(surface: &mut RgbaImage, center: Vec2, brush_size: f32) {
    let radius = brush_size.round() as i32;
    let cx = center.x.round() as i32;
    let cy = center.y.round() as i32;

    let mut summe = [0u64; 3];
    let mut anzahl = 0u64;
    for y in (cy - radius)..(cy + radius) {
        for x in (cx - radius)..(cx + radius) {
            if x < 0 || y < 0 || x >= surface.width() as i32 || y >= surface.height() as i32 {
                continue;
            }
            let pixel = surface.get_pixel(x as u32, y as u32);
            if pixel[3] > 0 {
                summe[0] += pixel[0] as u64;
                summe[1] += pixel[1] as u64;
                summe[2] += pixel[2] as u64;
                anzahl += 1;
            }
        }
    }
    if anzahl == 0 {
        return;
    }
    let avg = [
        summe[0] as f32 / anzahl as f32,
        summe[1] as f32 / anzahl as f32,
        summe[2] as f32 / anzahl as f32,
    ];

    for y in (cy - radius)..(cy + radius) {
        for x in (cx - radius)..(cx + radius) {
            if x < 0 || y < 0 || x >= surface.width() as i32 || y >= surface.height() as i32 {
                continue;
            }
            let abstand = Vec2::new(x as f32, y as f32).distance(Vec2::new(cx as f32, cy as f32));
            let faktor = (1.0 - abstand / radius as f32).max(0.0) * 0.4;
            let pixel = surface.get_pixel_mut(x as u32, y as u32);
            if pixel[3] == 0 {
                continue;
            }
            for kanal in 0..3 {
                pixel[kanal] =
                    (pixel[kanal] as f32 * (1.0 - faktor) + avg[kanal] * faktor) as u8;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::raster;
    use crate::shared::colors;
    use image::Rgba;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn verschmieren_senkt_die_deckkraft_nie_unter_50() {
        let mut surface = RgbaImage::new(60, 60);
        raster::fill(&mut surface, colors::BLACK);
        let mut rng = StdRng::seed_from_u64(3);

        for _ in 0..40 {
            smudge(&mut surface, Vec2::new(30.0, 30.0), 10.0, &mut rng);
        }

        let mut abgesenkt = 0;
        for y in 20..40 {
            for x in 20..40 {
                let a = surface.get_pixel(x, y)[3];
                assert!(a >= 50, "Deckkraft {a} bei ({x},{y}) unter dem Boden");
                if a < 255 {
                    abgesenkt += 1;
                }
            }
        }
        assert!(abgesenkt > 100, "nur {abgesenkt} Pixel verschmiert");
    }

    #[test]
    fn verschmieren_unveraenderte_pixel_bleiben_voll() {
        let mut surface = RgbaImage::new(60, 60);
        raster::fill(&mut surface, colors::BLACK);
        let mut rng = StdRng::seed_from_u64(3);

        smudge(&mut surface, Vec2::new(30.0, 30.0), 5.0, &mut rng);

        assert_eq!(surface.get_pixel(50, 50)[3], 255, "außerhalb des Umfelds");
    }

    #[test]
    fn angleichen_zieht_zur_durchschnittsfarbe() {
        let mut surface = RgbaImage::new(64, 64);
        let rot = Rgba([255, 0, 0, 255]);
        let blau = Rgba([0, 0, 255, 255]);
        raster::draw_rect(&mut surface, Vec2::new(0.0, 0.0), Vec2::new(32.0, 64.0), rot, 1.0);
        raster::draw_rect(&mut surface, Vec2::new(32.0, 0.0), Vec2::new(32.0, 64.0), blau, 1.0);

        blend(&mut surface, Vec2::new(32.0, 32.0), 8.0);

        let innen = surface.get_pixel(31, 32);
        assert!(innen[0] < 255, "Rot muss nachgeben: {innen:?}");
        assert!(innen[2] > 0, "Blau muss einsickern: {innen:?}");
        assert_eq!(*surface.get_pixel(5, 32), rot, "außerhalb unverändert");
    }

    #[test]
    fn angleichen_auf_leerem_grund_tut_nichts() {
        let mut surface = RgbaImage::new(32, 32);
        blend(&mut surface, Vec2::new(16.0, 16.0), 8.0);
        assert!(surface.pixels().all(|p| p[3] == 0));
    }
}
