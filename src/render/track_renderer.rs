//! Schienen auf der Malfläche, Fähnchen und Marker auf dem Overlay.
//!
//! Schienenstränge und Schwellen werden beim Malen dauerhaft in die
//! Malfläche gestempelt und wandern beim Einschnappen nicht mit; die
//! Schnapp-Anzeige, Weichenmarker und Fähnchen pulsieren dagegen jedes
//! Frame neu auf dem Overlay.

use glam::Vec2;
use image::{Rgba, RgbaImage};

use crate::core::geometry;
use crate::core::scene::Scene;
use crate::core::track::TrackJunction;
use crate::render::raster;
use crate::shared::colors;

const TIE_BROWN: Rgba<u8> = Rgba([139, 69, 19, 255]);
const TIE_EDGE: Rgba<u8> = Rgba([101, 67, 33, 255]);
const JUNCTION_HIGHLIGHT: Rgba<u8> = Rgba([255, 165, 0, 255]);

/// Stempelt ein Schienenstück von `from` nach `to` in die Malfläche.
///
/// `last_tie` trägt die Position der zuletzt gesetzten Schwelle über
/// Segmentgrenzen hinweg; der Aufrufer setzt sie beim Strichbeginn auf
/// den Startpunkt. So bleibt die Teilung auch bei winzigen
/// Mausschritten gleichmäßig.
pub(crate) fn draw_track_segment(
    base: &mut RgbaImage,
    from: Vec2,
    to: Vec2,
    brush_size: f32,
    last_tie: &mut Option<Vec2>,
) {
    let angle = geometry::direction_of(from, to);
    let perp = Vec2::from_angle(angle + std::f32::consts::FRAC_PI_2) * (brush_size * 0.6);

    raster::draw_line(base, from + perp, to + perp, 4.0, colors::RAIL_SILVER, 1.0);
    raster::draw_line(base, from - perp, to - perp, 4.0, colors::RAIL_SILVER, 1.0);

    let segment_length = from.distance(to);
    let spacing = brush_size * 1.2;
    let num_ties = (segment_length / spacing).floor() as i32;
    for i in 0..=num_ties {
        // Segmente unterhalb der Teilung tragen nur ihren Endpunkt als
        // Kandidaten, die Strecke sammelt sich dann über `last_tie` an.
        let tie = if num_ties == 0 {
            to
        } else {
            from.lerp(to, i as f32 / num_ties as f32)
        };
        let reference = last_tie.unwrap_or(from);
        if tie.distance(reference) >= spacing * 0.8 {
            draw_railroad_tie(base, tie, angle, brush_size);
            *last_tie = Some(tie);
        }
    }
}

fn draw_railroad_tie(base: &mut RgbaImage, center: Vec2, angle: f32, brush_size: f32) {
    let size = Vec2::new(brush_size * 2.0, brush_size * 0.3);
    let quer = angle + std::f32::consts::FRAC_PI_2;
    raster::draw_rotated_rect(base, center, size, quer, TIE_BROWN, 1.0);
    raster::draw_rotated_rect_outline(base, center, size, quer, 1.0, TIE_EDGE, 1.0);
}

/// Pulsierender grüner Ring um einen Endpunkt in Schnapp-Reichweite.
pub(crate) fn draw_snap_indicator(overlay: &mut RgbaImage, point: Vec2, frame: u64) {
    let pulse = 15.0 + (frame as f32 * 0.08).sin() * 5.0;
    raster::draw_ring(overlay, point, pulse, 3.0, colors::SNAP_GREEN, 0.8);
    raster::draw_filled_circle(overlay, point, 4.0, colors::SNAP_GREEN, 0.6);
}

/// Orangene Weichenmarker mit Glühen, Weißrand und hellem Kern.
pub(crate) fn draw_junction_markers(
    overlay: &mut RgbaImage,
    junctions: &[TrackJunction],
    frame: u64,
) {
    let pulse = 8.0 + (frame as f32 * 0.05).sin() * 2.0;
    for junction in junctions {
        let p = junction.position;
        raster::draw_filled_circle(overlay, p, pulse + 4.0, colors::JUNCTION_ORANGE, 0.3);
        raster::draw_filled_circle(overlay, p, pulse, colors::JUNCTION_ORANGE, 1.0);
        raster::draw_ring(overlay, p, pulse, 2.0, colors::WHITE, 1.0);
        raster::draw_filled_circle(overlay, p, pulse * 0.5, JUNCTION_HIGHLIGHT, 1.0);
    }
}

/// Fähnchen am Schienenende: grün hängt Wagen an, rot koppelt ab.
///
/// Das rote Fähnchen erscheint erst, wenn der Zug mindestens einen
/// Wagen zieht.
pub(crate) fn draw_track_flags(overlay: &mut RgbaImage, scene: &Scene) {
    for track in scene.tracks.tracks() {
        if track.point_count() < 2 {
            continue;
        }
        let Some(train) = scene.trains.iter().find(|t| t.track_id == track.id) else {
            continue;
        };
        let Some(endpoint) = track.end() else {
            continue;
        };

        draw_flag(overlay, endpoint + Vec2::new(25.0, -25.0), colors::FLAG_GREEN, 12.0);
        if !train.cars.is_empty() {
            draw_flag(overlay, endpoint + Vec2::new(50.0, -25.0), colors::FLAG_RED, 12.0);
        }
    }
}

fn draw_flag(overlay: &mut RgbaImage, base: Vec2, color: Rgba<u8>, size: f32) {
    let top = base + Vec2::new(0.0, -size * 1.5);
    raster::draw_line(overlay, base, top, 2.0, colors::FLAG_POLE_BROWN, 1.0);

    let tip = base + Vec2::new(size * 1.2, -size * 1.1);
    let lower = base + Vec2::new(0.0, -size * 0.7);
    raster::draw_triangle(overlay, top, tip, lower, color, 1.0);

    let edge = colors::darken(color, 0.3);
    raster::draw_line(overlay, top, tip, 1.0, edge, 1.0);
    raster::draw_line(overlay, tip, lower, 1.0, edge, 1.0);
    raster::draw_line(overlay, lower, top, 1.0, edge, 1.0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::track::TrackId;
    use crate::core::train::Train;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn schienen_stempeln_straenge_und_schwellen() {
        let mut base = RgbaImage::new(300, 200);
        let mut last_tie = None;
        draw_track_segment(
            &mut base,
            Vec2::new(50.0, 100.0),
            Vec2::new(150.0, 100.0),
            10.0,
            &mut last_tie,
        );

        // Stränge liegen 6 Pixel neben der Mittellinie, Schwellen alle
        // 12,5 Pixel quer darüber.
        assert_eq!(*base.get_pixel(106, 94), colors::RAIL_SILVER);
        assert_eq!(*base.get_pixel(106, 106), colors::RAIL_SILVER);
        assert_eq!(*base.get_pixel(100, 100), TIE_BROWN);
        assert_eq!(base.get_pixel(106, 100)[3], 0, "zwischen den Schwellen bleibt es frei");
        assert!(last_tie.is_some(), "Schwellenläufer muss weiterwandern");
    }

    #[test]
    fn schwellenteilung_laeuft_ueber_segmentgrenzen() {
        let mut base = RgbaImage::new(300, 200);
        // Beim Strichbeginn sitzt der Läufer auf dem Startpunkt.
        let mut last_tie = Some(Vec2::new(50.0, 100.0));
        // Viele winzige Mausschritte dürfen keine Schwellenhaufen ergeben.
        for i in 0..50 {
            let x = 50.0 + i as f32 * 2.0;
            draw_track_segment(
                &mut base,
                Vec2::new(x, 100.0),
                Vec2::new(x + 2.0, 100.0),
                10.0,
                &mut last_tie,
            );
        }

        let mut schwellen = 0;
        for x in 50..150 {
            if *base.get_pixel(x, 100) == TIE_BROWN && *base.get_pixel(x - 1, 100) != TIE_BROWN {
                schwellen += 1;
            }
        }
        assert!(
            (5..=12).contains(&schwellen),
            "erwartete gleichmäßige Teilung, zählte {schwellen} Schwellen"
        );
    }

    #[test]
    fn schnappanzeige_pulsiert_im_takt() {
        let mut frueh = RgbaImage::new(200, 200);
        draw_snap_indicator(&mut frueh, Vec2::new(100.0, 100.0), 0);
        // Ring bei Radius 15, Punkt in der Mitte mit 60 Prozent Deckkraft.
        assert!(frueh.get_pixel(115, 100)[3] > 0);
        assert_eq!(frueh.get_pixel(100, 100)[3], 153);

        // Bei fast voller Sinusauslenkung wandert der Ring nach außen.
        let mut spaet = RgbaImage::new(200, 200);
        draw_snap_indicator(&mut spaet, Vec2::new(100.0, 100.0), 20);
        assert_eq!(spaet.get_pixel(115, 100)[3], 0);
        assert!(spaet.get_pixel(120, 100)[3] > 0);
    }

    #[test]
    fn weichenmarker_hat_kern_rand_und_gluehen() {
        let junctions = vec![TrackJunction {
            position: Vec2::new(100.0, 100.0),
            tracks: (TrackId(1), TrackId(2)),
        }];

        let mut overlay = RgbaImage::new(200, 200);
        draw_junction_markers(&mut overlay, &junctions, 0);

        assert_eq!(*overlay.get_pixel(100, 100), JUNCTION_HIGHLIGHT);
        assert_eq!(*overlay.get_pixel(108, 100), colors::WHITE);
        let gluehen = overlay.get_pixel(100, 111)[3];
        assert!(
            (60..90).contains(&gluehen),
            "Glühen sollte schwach decken, Alpha war {gluehen}"
        );
    }

    #[test]
    fn fahnen_stehen_nur_mit_zug_und_wagen() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut scene = Scene::new();
        let points = vec![
            Vec2::new(100.0, 100.0),
            Vec2::new(200.0, 100.0),
            Vec2::new(300.0, 100.0),
        ];
        let id = scene.tracks.insert(points).expect("Schiene erwartet");

        // Ohne Zug keine Fähnchen.
        let mut leer = RgbaImage::new(400, 200);
        draw_track_flags(&mut leer, &scene);
        assert_eq!(leer.get_pixel(327, 61)[3], 0);

        scene.trains.push(Train::for_track(id, 10.0, 0.5, &mut rng));
        let mut gruen = RgbaImage::new(400, 200);
        draw_track_flags(&mut gruen, &scene);
        assert_eq!(*gruen.get_pixel(327, 61), colors::FLAG_GREEN);
        assert_eq!(gruen.get_pixel(352, 61)[3], 0, "rotes Fähnchen braucht Wagen");

        let farbe = scene.trains[0].color;
        scene.trains[0]
            .cars
            .push(crate::core::train::TrainCar::random(farbe, &mut rng));
        let mut rot = RgbaImage::new(400, 200);
        draw_track_flags(&mut rot, &scene);
        assert_eq!(*rot.get_pixel(352, 61), colors::FLAG_RED);
    }
}
