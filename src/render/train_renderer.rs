//! Zeichnet Loks und Wagen auf das Overlay.
//!
//! Alle Maße skalieren mit `train.size`, die Lok zeigt mit der Nase in
//! Fahrtrichtung. Im Tunnel wird nur die Lok auf 30 Prozent Deckkraft
//! abgesenkt, die Wagen bleiben voll sichtbar.

use glam::Vec2;
use image::{Rgba, RgbaImage};

use crate::core::geometry::local_to_world;
use crate::core::track::Track;
use crate::core::train::{CarKind, CargoKind, PassengerKind, Train, TrainCar};
use crate::render::raster;
use crate::shared::colors;

// Festfarben der Zugteile und Mitfahrer.
const WINDOW_BLUE: Rgba<u8> = Rgba([135, 206, 235, 255]);
const WHEEL_HUB: Rgba<u8> = Rgba([51, 51, 51, 255]);
const TANKER_SILVER: Rgba<u8> = Rgba([192, 192, 192, 255]);
const TANKER_OUTLINE: Rgba<u8> = Rgba([128, 128, 128, 255]);
const TANKER_BAND: Rgba<u8> = Rgba([96, 96, 96, 255]);
const CABOOSE_RED: Rgba<u8> = Rgba([220, 20, 60, 255]);
const CABOOSE_TRIM: Rgba<u8> = Rgba([139, 0, 0, 255]);
const FACE_SKIN: Rgba<u8> = Rgba([255, 228, 196, 255]);
const ORANGE: Rgba<u8> = Rgba([255, 165, 0, 255]);
const DOG_BROWN: Rgba<u8> = Rgba([139, 69, 19, 255]);
const BEAR_BROWN: Rgba<u8> = Rgba([101, 67, 33, 255]);
const RABBIT_PLUM: Rgba<u8> = Rgba([221, 160, 221, 255]);
const PRESENT_PINK: Rgba<u8> = Rgba([255, 105, 180, 255]);
const APPLE_RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
const PUMPKIN_ORANGE: Rgba<u8> = Rgba([255, 140, 0, 255]);
const PUMPKIN_RIB: Rgba<u8> = Rgba([255, 99, 71, 255]);
const HEART_PINK: Rgba<u8> = Rgba([255, 20, 147, 255]);

/// Zeichnet die Lok an `position` mit Blickrichtung `heading`.
pub(crate) fn draw_train(overlay: &mut RgbaImage, position: Vec2, heading: f32, train: &Train) {
    let s = train.size;
    let alpha = if train.in_tunnel { 0.3 } else { 1.0 };

    // Rumpf mit dunklerer Kontur.
    let rumpf_min = Vec2::new(-s * 0.8, -s * 0.3);
    let rumpf_size = Vec2::new(s * 1.6, s * 0.6);
    draw_local_rect(overlay, position, heading, rumpf_min, rumpf_size, train.color, alpha);
    draw_local_rect_outline(
        overlay,
        position,
        heading,
        rumpf_min,
        rumpf_size,
        2.0,
        colors::darken(train.color, 0.3),
        alpha,
    );

    // Führerhaus vorn, Schornstein obendrauf.
    draw_local_rect(
        overlay,
        position,
        heading,
        Vec2::new(s * 0.5, -s * 0.45),
        Vec2::new(s * 0.3, s * 0.3),
        colors::darken(train.color, 0.4),
        alpha,
    );
    draw_local_rect(
        overlay,
        position,
        heading,
        Vec2::new(s * 0.55, -s * 0.75),
        Vec2::new(s * 0.2, s * 0.35),
        colors::BLACK,
        alpha,
    );

    // Räder mit Nabe.
    for seite in [-1.0, 1.0] {
        let nabe = local_to_world(position, heading, Vec2::new(seite * s * 0.4, s * 0.2));
        raster::draw_filled_circle(overlay, nabe, s * 0.2, colors::BLACK, alpha);
        raster::draw_filled_circle(overlay, nabe, s * 0.12, WHEEL_HUB, alpha);
    }

    // Goldene Front und Kabinenfenster.
    draw_local_rect(
        overlay,
        position,
        heading,
        Vec2::new(s * 0.75, -s * 0.2),
        Vec2::new(s * 0.1, s * 0.4),
        colors::GOLD,
        alpha,
    );
    draw_local_rect(
        overlay,
        position,
        heading,
        Vec2::new(s * 0.52, -s * 0.4),
        Vec2::new(s * 0.26, s * 0.15),
        WINDOW_BLUE,
        alpha,
    );
}

/// Zeichnet alle angehängten Wagen entlang der Schiene hinter der Lok.
pub(crate) fn draw_train_cars(overlay: &mut RgbaImage, track: &Track, train: &Train, frame: u64) {
    if train.cars.is_empty() {
        return;
    }
    let length = track.length();
    for (index, car) in train.cars.iter().enumerate() {
        let Some(fraction) = train.car_fraction(index, length) else {
            continue;
        };
        let Some(sample) = track.sample(fraction) else {
            continue;
        };
        draw_car(overlay, sample.position, sample.heading, car, train.size, frame);
    }
}

fn draw_car(
    overlay: &mut RgbaImage,
    position: Vec2,
    heading: f32,
    car: &TrainCar,
    s: f32,
    frame: u64,
) {
    match &car.kind {
        CarKind::Passenger { seats } => {
            let min = Vec2::new(-s * 0.7, -s * 0.3);
            let size = Vec2::new(s * 1.4, s * 0.6);
            draw_local_rect(overlay, position, heading, min, size, car.color, 1.0);
            draw_local_rect_outline(
                overlay,
                position,
                heading,
                min,
                size,
                2.0,
                colors::darken(car.color, 0.3),
                1.0,
            );

            for (i, seat) in seats.iter().enumerate() {
                let window_x = -s * 0.5 + i as f32 * s * 0.4;
                draw_local_rect(
                    overlay,
                    position,
                    heading,
                    Vec2::new(window_x, -s * 0.25),
                    Vec2::new(s * 0.25, s * 0.2),
                    WINDOW_BLUE,
                    1.0,
                );
                if let Some(kind) = seat {
                    let sitz = Vec2::new(window_x + s * 0.125, -s * 0.15);
                    draw_passenger(overlay, position, heading, sitz, s * 0.1, *kind);
                }
            }
        }
        CarKind::Cargo { items } => {
            let min = Vec2::new(-s * 0.7, -s * 0.35);
            let size = Vec2::new(s * 1.4, s * 0.7);
            draw_local_rect(
                overlay,
                position,
                heading,
                min,
                size,
                colors::darken(car.color, 0.2),
                1.0,
            );
            draw_local_rect_outline(
                overlay,
                position,
                heading,
                min,
                size,
                2.0,
                colors::darken(car.color, 0.5),
                1.0,
            );

            if items.is_empty() {
                // Leerer Wagen bekommt eine Mittelstrebe.
                let oben = local_to_world(position, heading, Vec2::new(0.0, -s * 0.35));
                let unten = local_to_world(position, heading, Vec2::new(0.0, s * 0.35));
                raster::draw_line(overlay, oben, unten, 1.0, colors::darken(car.color, 0.4), 1.0);
            } else {
                for (i, item) in items.iter().enumerate() {
                    let huepfer = ((frame as f32) * 0.08 + i as f32).sin() * 2.0;
                    let platz = Vec2::new(
                        -s * 0.4 + (i % 3) as f32 * s * 0.3,
                        -s * 0.15 + (i / 3) as f32 * s * 0.25 + huepfer,
                    );
                    draw_cargo_item(overlay, position, heading, platz, s * 0.15, *item);
                }
            }
        }
        CarKind::Tanker => {
            // Kessel mit angedeuteter Kontur: erst die größere Randellipse,
            // dann der silberne Kessel obenauf.
            let radien = Vec2::new(s * 0.7, s * 0.35);
            raster::draw_ellipse(overlay, position, radien + Vec2::ONE, heading, TANKER_OUTLINE, 1.0);
            raster::draw_ellipse(overlay, position, radien, heading, TANKER_SILVER, 1.0);
            for i in -1..=1 {
                let oben = local_to_world(position, heading, Vec2::new(i as f32 * s * 0.3, -s * 0.35));
                let unten = local_to_world(position, heading, Vec2::new(i as f32 * s * 0.3, s * 0.35));
                raster::draw_line(overlay, oben, unten, 1.0, TANKER_BAND, 1.0);
            }
        }
        CarKind::Caboose => {
            let min = Vec2::new(-s * 0.6, -s * 0.3);
            let size = Vec2::new(s * 1.2, s * 0.6);
            draw_local_rect(overlay, position, heading, min, size, CABOOSE_RED, 1.0);
            draw_local_rect_outline(overlay, position, heading, min, size, 2.0, CABOOSE_TRIM, 1.0);

            // Ausguck mit goldenem Fenster.
            draw_local_rect(
                overlay,
                position,
                heading,
                Vec2::new(-s * 0.25, -s * 0.6),
                Vec2::new(s * 0.5, s * 0.3),
                CABOOSE_TRIM,
                1.0,
            );
            draw_local_rect(
                overlay,
                position,
                heading,
                Vec2::new(-s * 0.15, -s * 0.55),
                Vec2::new(s * 0.3, s * 0.15),
                colors::GOLD,
                1.0,
            );
        }
    }

    // Räder unter jedem Wagen.
    for seite in [-1.0, 1.0] {
        let nabe = local_to_world(position, heading, Vec2::new(seite * s * 0.4, s * 0.3));
        raster::draw_filled_circle(overlay, nabe, s * 0.15, colors::BLACK, 1.0);
    }
}

/// Gesicht im Wagenfenster, `p` ist der Kopfradius.
fn draw_passenger(
    overlay: &mut RgbaImage,
    position: Vec2,
    heading: f32,
    seat: Vec2,
    p: f32,
    kind: PassengerKind,
) {
    let world = |local: Vec2| local_to_world(position, heading, seat + local);
    match kind {
        PassengerKind::Person => {
            raster::draw_filled_circle(overlay, world(Vec2::ZERO), p, FACE_SKIN, 1.0);
            for seite in [-1.0, 1.0] {
                let auge = world(Vec2::new(seite * p * 0.3, -p * 0.2));
                raster::draw_filled_circle(overlay, auge, p * 0.2, colors::BLACK, 1.0);
            }
            let links = world(Vec2::new(-p * 0.5, p * 0.3));
            let rechts = world(Vec2::new(p * 0.5, p * 0.3));
            raster::draw_line(overlay, links, rechts, 1.0, colors::BLACK, 1.0);
        }
        PassengerKind::Cat => {
            raster::draw_filled_circle(overlay, world(Vec2::ZERO), p, ORANGE, 1.0);
            for seite in [-1.0, 1.0] {
                raster::draw_triangle(
                    overlay,
                    world(Vec2::new(seite * p * 0.7, -p * 0.5)),
                    world(Vec2::new(seite * p * 0.4, -p)),
                    world(Vec2::new(seite * p * 0.2, -p * 0.5)),
                    ORANGE,
                    1.0,
                );
            }
            draw_eye_pair(overlay, &world, p, 0.15);
        }
        PassengerKind::Dog => {
            raster::draw_filled_circle(overlay, world(Vec2::ZERO), p, DOG_BROWN, 1.0);
            for seite in [-1.0, 1.0] {
                raster::draw_ellipse(
                    overlay,
                    world(Vec2::new(seite * p * 0.8, 0.0)),
                    Vec2::new(p * 0.4, p * 0.6),
                    heading - seite * 0.3 * std::f32::consts::PI,
                    DOG_BROWN,
                    1.0,
                );
            }
            draw_eye_pair(overlay, &world, p, 0.2);
        }
        PassengerKind::Bear => {
            raster::draw_filled_circle(overlay, world(Vec2::ZERO), p, BEAR_BROWN, 1.0);
            for seite in [-1.0, 1.0] {
                let ohr = world(Vec2::new(seite * p * 0.6, -p * 0.6));
                raster::draw_filled_circle(overlay, ohr, p * 0.4, BEAR_BROWN, 1.0);
            }
            draw_eye_pair(overlay, &world, p, 0.2);
        }
        PassengerKind::Rabbit => {
            raster::draw_filled_circle(overlay, world(Vec2::ZERO), p, RABBIT_PLUM, 1.0);
            for seite in [-1.0, 1.0] {
                raster::draw_ellipse(
                    overlay,
                    world(Vec2::new(seite * p * 0.4, -p * 0.8)),
                    Vec2::new(p * 0.25, p * 0.7),
                    heading + seite * 0.2 * std::f32::consts::PI,
                    RABBIT_PLUM,
                    1.0,
                );
            }
            draw_eye_pair(overlay, &world, p, 0.15);
        }
    }
}

fn draw_eye_pair(overlay: &mut RgbaImage, world: &impl Fn(Vec2) -> Vec2, p: f32, radius: f32) {
    for seite in [-1.0, 1.0] {
        let auge = world(Vec2::new(seite * p * 0.3, 0.0));
        raster::draw_filled_circle(overlay, auge, p * radius, colors::BLACK, 1.0);
    }
}

/// Frachtstück auf der Ladefläche, `c` ist die Kantenlänge.
fn draw_cargo_item(
    overlay: &mut RgbaImage,
    position: Vec2,
    heading: f32,
    slot: Vec2,
    c: f32,
    kind: CargoKind,
) {
    let world = |local: Vec2| local_to_world(position, heading, slot + local);
    match kind {
        CargoKind::Present => {
            let center = world(Vec2::ZERO);
            raster::draw_rotated_rect(overlay, center, Vec2::splat(c), heading, PRESENT_PINK, 1.0);
            raster::draw_line(
                overlay,
                world(Vec2::new(0.0, -c * 0.5)),
                world(Vec2::new(0.0, c * 0.5)),
                2.0,
                colors::GOLD,
                1.0,
            );
            raster::draw_line(
                overlay,
                world(Vec2::new(-c * 0.5, 0.0)),
                world(Vec2::new(c * 0.5, 0.0)),
                2.0,
                colors::GOLD,
                1.0,
            );
            let schleife = world(Vec2::new(0.0, -c * 0.5));
            raster::draw_filled_circle(overlay, schleife, c * 0.2, colors::GOLD, 1.0);
        }
        CargoKind::Apple => {
            raster::draw_filled_circle(overlay, world(Vec2::ZERO), c * 0.5, APPLE_RED, 1.0);
            raster::draw_ellipse(
                overlay,
                world(Vec2::new(c * 0.2, -c * 0.4)),
                Vec2::new(c * 0.2, c * 0.3),
                heading + std::f32::consts::FRAC_PI_2,
                colors::GRASS_GREEN,
                1.0,
            );
        }
        CargoKind::Banana => {
            // Krumme Frucht als dicker Bogenzug, Schale zuerst und damit
            // als Rand sichtbar.
            let mut bogen = [Vec2::ZERO; 7];
            for (i, punkt) in bogen.iter_mut().enumerate() {
                let winkel = std::f32::consts::PI * (1.0 + i as f32 / 6.0);
                *punkt = world(Vec2::from_angle(winkel) * c * 0.4 + Vec2::new(0.0, c * 0.1));
            }
            raster::draw_polyline(overlay, &bogen, c * 0.5, ORANGE, 1.0);
            raster::draw_polyline(overlay, &bogen, c * 0.35, colors::GOLD, 1.0);
        }
        CargoKind::Pumpkin => {
            raster::draw_filled_circle(overlay, world(Vec2::ZERO), c * 0.5, PUMPKIN_ORANGE, 1.0);
            for i in -1..=1 {
                let oben = world(Vec2::new(i as f32 * c * 0.2, -c * 0.5));
                let unten = world(Vec2::new(i as f32 * c * 0.2, c * 0.5));
                raster::draw_line(overlay, oben, unten, 1.0, PUMPKIN_RIB, 1.0);
            }
            let stiel = world(Vec2::new(0.0, -c * 0.5));
            raster::draw_rotated_rect(
                overlay,
                stiel,
                Vec2::new(c * 0.2, c * 0.2),
                heading,
                colors::GRASS_GREEN,
                1.0,
            );
        }
        CargoKind::Star => {
            // Fünf Zacken als Dreiecksfächer über Außen- und Innenradius.
            let center = world(Vec2::ZERO);
            let mut rand = [Vec2::ZERO; 10];
            for (i, ecke) in rand.iter_mut().enumerate() {
                let winkel = heading - std::f32::consts::FRAC_PI_2
                    + i as f32 * std::f32::consts::PI / 5.0;
                let radius = if i % 2 == 0 { c * 0.5 } else { c * 0.25 };
                *ecke = center + Vec2::from_angle(winkel) * radius;
            }
            for i in 0..10 {
                raster::draw_triangle(overlay, center, rand[i], rand[(i + 1) % 10], colors::GOLD, 1.0);
            }
        }
        CargoKind::Heart => {
            for seite in [-1.0, 1.0] {
                let lappen = world(Vec2::new(seite * c * 0.2, -c * 0.15));
                raster::draw_filled_circle(overlay, lappen, c * 0.25, HEART_PINK, 1.0);
            }
            raster::draw_triangle(
                overlay,
                world(Vec2::new(-c * 0.45, -c * 0.05)),
                world(Vec2::new(c * 0.45, -c * 0.05)),
                world(Vec2::new(0.0, c * 0.45)),
                HEART_PINK,
                1.0,
            );
        }
    }
}

/// Achsenparalleles Rechteck in Wagenkoordinaten, gedreht um `heading`.
fn draw_local_rect(
    overlay: &mut RgbaImage,
    position: Vec2,
    heading: f32,
    min: Vec2,
    size: Vec2,
    color: Rgba<u8>,
    alpha: f32,
) {
    let center = local_to_world(position, heading, min + size * 0.5);
    raster::draw_rotated_rect(overlay, center, size, heading, color, alpha);
}

fn draw_local_rect_outline(
    overlay: &mut RgbaImage,
    position: Vec2,
    heading: f32,
    min: Vec2,
    size: Vec2,
    width: f32,
    color: Rgba<u8>,
    alpha: f32,
) {
    let center = local_to_world(position, heading, min + size * 0.5);
    raster::draw_rotated_rect_outline(overlay, center, size, heading, width, color, alpha);
}
