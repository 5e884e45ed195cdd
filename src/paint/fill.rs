//! Farbeimer: vierfach verbundene Flutfüllung über den RGBA-Puffer.

use glam::Vec2;
use image::{Rgba, RgbaImage};

/// Füllt die zusammenhängende Fläche unter `point` mit `fill_color`.
///
/// Verglichen wird das exakte RGBA-Tupel, geschrieben immer mit voller
/// Deckkraft. Trifft der Klick die Füllfarbe selbst oder liegt er
/// außerhalb der Fläche, passiert nichts.
pub fn flood_fill(surface: &mut RgbaImage, point: Vec2, fill_color: Rgba<u8>) {
    let width = surface.width() as i32;
    let height = surface.height() as i32;
    let start_x = point.x.floor() as i32;
    let start_y = point.y.floor() as i32;
    if start_x < 0 || start_y < 0 || start_x >= width || start_y >= height {
        return;
    }

    let fill = Rgba([fill_color[0], fill_color[1], fill_color[2], 255]);
    let target = *surface.get_pixel(start_x as u32, start_y as u32);
    if target == fill {
        return;
    }

    let mut stack = vec![(start_x, start_y)];
    surface.put_pixel(start_x as u32, start_y as u32, fill);

    while let Some((x, y)) = stack.pop() {
        let nachbarn = [(x + 1, y), (x - 1, y), (x, y + 1), (x, y - 1)];
        for (nx, ny) in nachbarn {
            if nx < 0 || ny < 0 || nx >= width || ny >= height {
                continue;
            }
            if *surface.get_pixel(nx as u32, ny as u32) == target {
                surface.put_pixel(nx as u32, ny as u32, fill);
                stack.push((nx, ny));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::raster;
    use crate::shared::colors;

    #[test]
    fn fuellung_stoppt_an_der_wand() {
        let mut surface = RgbaImage::new(50, 50);
        raster::fill(&mut surface, colors::WHITE);
        // Geschlossener schwarzer Rahmen um die Innenfläche 11..40.
        raster::draw_rect(&mut surface, Vec2::new(10.0, 10.0), Vec2::new(31.0, 1.0), colors::BLACK, 1.0);
        raster::draw_rect(&mut surface, Vec2::new(10.0, 40.0), Vec2::new(31.0, 1.0), colors::BLACK, 1.0);
        raster::draw_rect(&mut surface, Vec2::new(10.0, 10.0), Vec2::new(1.0, 31.0), colors::BLACK, 1.0);
        raster::draw_rect(&mut surface, Vec2::new(40.0, 10.0), Vec2::new(1.0, 31.0), colors::BLACK, 1.0);

        let rot = Rgba([255, 0, 0, 255]);
        flood_fill(&mut surface, Vec2::new(25.0, 25.0), rot);

        assert_eq!(*surface.get_pixel(25, 25), rot);
        assert_eq!(*surface.get_pixel(11, 39), rot, "Ecke der Innenfläche");
        assert_eq!(*surface.get_pixel(25, 10), colors::BLACK, "Wand bleibt stehen");
        assert_eq!(*surface.get_pixel(5, 5), colors::WHITE, "außen bleibt weiß");
    }

    #[test]
    fn fuellen_der_eigenen_farbe_aendert_nichts() {
        let mut surface = RgbaImage::new(20, 20);
        raster::fill(&mut surface, colors::WHITE);
        surface.put_pixel(5, 5, Rgba([255, 0, 0, 255]));

        flood_fill(&mut surface, Vec2::new(5.0, 5.0), Rgba([255, 0, 0, 255]));

        assert_eq!(*surface.get_pixel(6, 5), colors::WHITE, "Nachbar darf nicht kippen");
    }

    #[test]
    fn transparenter_grund_laeuft_bis_zum_rand() {
        let mut surface = RgbaImage::new(10, 10);
        let blau = Rgba([0, 0, 255, 255]);
        flood_fill(&mut surface, Vec2::new(4.0, 4.0), blau);

        assert!(surface.pixels().all(|p| *p == blau));
    }

    #[test]
    fn klick_neben_der_flaeche_ist_leerlauf() {
        let mut surface = RgbaImage::new(10, 10);
        flood_fill(&mut surface, Vec2::new(-3.0, 4.0), Rgba([0, 255, 0, 255]));
        flood_fill(&mut surface, Vec2::new(4.0, 99.0), Rgba([0, 255, 0, 255]));

        assert!(surface.pixels().all(|p| p[3] == 0));
    }
}
