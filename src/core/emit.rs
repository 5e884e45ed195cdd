//! Spawner der Partikel-Werkzeuge.
//!
//! Jede Funktion übersetzt einen Pinselkontakt in neue Partikel. Die
//! Streuungen hängen an der Pinselgröße, damit große Pinsel sichtbar
//! mehr Wirkung haben.

use glam::Vec2;
use image::Rgba;
use rand::Rng;

use crate::core::entity::{BugGlyph, Entity, EntityKind, SmokeShape, PERMANENT_LIFE};
use crate::shared::colors;
use crate::shared::options::{GLITTER_MIN_SPACING, GLITTER_PLACEMENT_ATTEMPTS, MAX_BUGS};

/// Startet eine einzelne Feuerwerksrakete am Kontaktpunkt.
///
/// Die Rakete steigt 100 bis 180 Pixel, bevor sie zerplatzt.
pub fn emit_firework(entities: &mut Vec<Entity>, origin: Vec2, rng: &mut impl Rng) {
    let launch_height = 100.0 + rng.random_range(0.0..80.0);
    entities.push(Entity {
        position: origin,
        velocity: Vec2::new(rng.random_range(-1.0..1.0), 0.0),
        life: 60,
        kind: EntityKind::FireworkRocket {
            color: colors::pick(&colors::FIREWORK_COLORS, rng),
            size: 3.0,
            start_y: origin.y,
            target_y: origin.y - launch_height,
            trail_timer: 0,
        },
    });
}

/// Streut bis zu sechs permanente Glitzerpunkte um den Kontaktpunkt.
///
/// Punkte näher als [`GLITTER_MIN_SPACING`] an bestehendem Glitzer werden
/// neu gewürfelt, nach [`GLITTER_PLACEMENT_ATTEMPTS`] Versuchen verworfen.
pub fn emit_glitter(
    entities: &mut Vec<Entity>,
    origin: Vec2,
    color: Rgba<u8>,
    brush_size: f32,
    rng: &mut impl Rng,
) {
    for _ in 0..6 {
        let mut placed = None;
        for _ in 0..GLITTER_PLACEMENT_ATTEMPTS {
            let angle = rng.random_range(0.0..std::f32::consts::TAU);
            let dist = rng.random_range(0.0..1.0) * brush_size;
            let candidate = origin + Vec2::from_angle(angle) * dist;

            let frei = entities
                .iter()
                .filter(|e| e.is_glitter())
                .all(|e| e.position.distance(candidate) >= GLITTER_MIN_SPACING);
            if frei {
                placed = Some(candidate);
                break;
            }
        }

        let Some(position) = placed else { continue };
        entities.push(Entity {
            position,
            velocity: Vec2::ZERO,
            life: PERMANENT_LIFE,
            kind: EntityKind::Glitter {
                color,
                size: rng.random_range(0.0..1.0) * 1.5 + 0.5,
                blink_timer: rng.random_range(0..30),
            },
        });
    }
}

/// Lässt Ballons aufsteigen, Anzahl wächst mit der Pinselgröße.
pub fn emit_balloons(
    entities: &mut Vec<Entity>,
    origin: Vec2,
    color: Rgba<u8>,
    brush_size: f32,
    rng: &mut impl Rng,
) {
    let count = ((brush_size / 25.0) as usize).max(1);
    for _ in 0..count {
        let offset = Vec2::new(
            rng.random_range(-1.0..1.0) * brush_size,
            rng.random_range(-1.0..1.0) * brush_size,
        );
        entities.push(Entity {
            position: origin + offset,
            velocity: Vec2::new(
                rng.random_range(-0.5..0.5),
                -(rng.random_range(0.0..2.0) + 0.5),
            ),
            life: rng.random_range(240..300),
            kind: EntityKind::Balloon {
                color,
                size: rng.random_range(0.0..1.0) * (brush_size / 2.0) + 5.0,
                base_alpha: 0.8 + rng.random_range(0.0..0.2),
                wobble: rng.random_range(0.0..std::f32::consts::TAU),
                wind_phase: rng.random_range(0.0..std::f32::consts::TAU),
                string_length: (15.0 + rng.random_range(0.0..10.0)) * (brush_size / 10.0),
            },
        });
    }
}

/// Wirft fünfzehn Konfettiplättchen in alle Richtungen.
pub fn emit_confetti(entities: &mut Vec<Entity>, origin: Vec2, brush_size: f32, rng: &mut impl Rng) {
    let size = brush_size.max(15.0);
    for _ in 0..15 {
        entities.push(Entity {
            position: origin,
            velocity: Vec2::new(rng.random_range(-5.0..5.0), rng.random_range(-5.0..5.0)),
            life: 100,
            kind: EntityKind::Confetti {
                color: colors::pick(&colors::CONFETTI_COLORS, rng),
                size,
                rotation: rng.random_range(0.0..std::f32::consts::TAU),
                spin: rng.random_range(-0.2..0.2),
            },
        });
    }
}

/// Setzt vier Würmer aus, die vom Kontaktpunkt wegkriechen.
pub fn emit_worms(entities: &mut Vec<Entity>, origin: Vec2, rng: &mut impl Rng) {
    for _ in 0..4 {
        let direction = rng.random_range(0.0..std::f32::consts::TAU);
        let speed = rng.random_range(0.0..2.0) + 1.0;
        entities.push(Entity {
            position: origin,
            velocity: Vec2::from_angle(direction) * speed,
            life: rng.random_range(120..180),
            kind: EntityKind::Worm {
                color: colors::pick(&colors::WORM_COLORS, rng),
                trail: Vec::new(),
                max_trail: 18,
                direction,
                turn_rate: 0.05 + rng.random_range(0.0..0.1),
                wiggle: rng.random_range(0.0..std::f32::consts::TAU),
                wiggle_speed: 0.2 + rng.random_range(0.0..0.3),
            },
        });
    }
}

/// Entlädt Blitze zu zufälligen Zielpunkten im Umkreis.
pub fn emit_lightning(
    entities: &mut Vec<Entity>,
    origin: Vec2,
    color: Rgba<u8>,
    brush_size: f32,
    rng: &mut impl Rng,
) {
    let count = ((brush_size / 15.0) as usize).max(1);
    for _ in 0..count {
        let target = origin
            + Vec2::new(
                rng.random_range(-200.0..200.0),
                rng.random_range(-200.0..200.0),
            );
        entities.push(Entity {
            position: origin,
            velocity: Vec2::ZERO,
            life: rng.random_range(20..35),
            kind: EntityKind::Lightning {
                color,
                start: origin,
                target,
                width: (brush_size / 8.0).max(2.0),
                intensity: 0.5 + rng.random_range(0.0..0.5),
                max_life: 35,
                segments: Vec::new(),
                branch: None,
            },
        });
    }
}

/// Setzt drei bis sechs Käfer aus, gedeckelt durch [`MAX_BUGS`].
pub fn emit_bugs(entities: &mut Vec<Entity>, origin: Vec2, rng: &mut impl Rng) {
    let lebend = entities.iter().filter(|e| e.is_bug()).count();
    let frei = MAX_BUGS.saturating_sub(lebend);
    if frei == 0 {
        return;
    }

    let count = (3 + rng.random_range(0..4)).min(frei);
    for _ in 0..count {
        let glyph = BugGlyph::ALL[rng.random_range(0..BugGlyph::ALL.len())];
        let direction = rng.random_range(0.0..std::f32::consts::TAU);
        let speed = 2.0 + rng.random_range(0.0..3.0);
        entities.push(Entity {
            position: origin
                + Vec2::new(rng.random_range(-20.0..20.0), rng.random_range(-20.0..20.0)),
            velocity: Vec2::from_angle(direction) * speed,
            life: rng.random_range(150..250),
            kind: EntityKind::Bug {
                glyph,
                size: 12.0 + rng.random_range(0.0..8.0),
                direction,
                wiggle: rng.random_range(0.0..std::f32::consts::TAU),
                wiggle_speed: 0.2 + rng.random_range(0.0..0.3),
                change_timer: rng.random_range(30..70),
            },
        });
    }
}

/// Wirft Luftschlangen, die sich beim Fallen eindrehen.
pub fn emit_streamers(
    entities: &mut Vec<Entity>,
    origin: Vec2,
    brush_size: f32,
    rng: &mut impl Rng,
) {
    let count = ((brush_size / 6.0) as usize).max(2);
    for _ in 0..count {
        entities.push(Entity {
            position: origin + Vec2::new(rng.random_range(-0.5..0.5) * brush_size, 0.0),
            velocity: Vec2::new(
                rng.random_range(-3.0..3.0),
                -(rng.random_range(0.0..4.0) + 2.0),
            ),
            life: rng.random_range(120..180),
            kind: EntityKind::Streamer {
                color: colors::pick(&colors::STREAMER_COLORS, rng),
                width: (rng.random_range(0.0..6.0) + 10.0) * (brush_size / 10.0),
                length: (rng.random_range(0.0..80.0) + 60.0) * (brush_size / 8.0),
                wave: rng.random_range(0.0..std::f32::consts::TAU),
                curl: 0.1 + rng.random_range(0.0..0.3),
                twist: rng.random_range(0.0..std::f32::consts::TAU),
            },
        });
    }
}

/// Ein Rauchwölkchen am Schornstein, driftet gegen die Fahrtrichtung.
pub fn emit_train_smoke(
    entities: &mut Vec<Entity>,
    chimney: Vec2,
    train_heading: f32,
    train_size: f32,
    rng: &mut impl Rng,
) {
    let backwards = (train_heading + std::f32::consts::PI).cos();
    entities.push(Entity {
        position: chimney,
        velocity: Vec2::new(
            rng.random_range(-0.75..0.75) + backwards,
            -(rng.random_range(0.0..2.0) + 1.5),
        ),
        life: rng.random_range(45..70),
        kind: EntityKind::TrainSmoke {
            color: colors::pick(&colors::SMOKE_COLORS, rng),
            shape: SmokeShape::ALL[rng.random_range(0..SmokeShape::ALL.len())],
            size: train_size * 0.15 + rng.random_range(0.0..1.0) * train_size * 0.1,
            base_alpha: 0.7 + rng.random_range(0.0..0.3),
            growth: 1.015,
            rotation: rng.random_range(0.0..std::f32::consts::TAU),
            spin: rng.random_range(-0.05..0.05),
        },
    });
}

/// "HONK!"-Schriftzug, der über der Lok aufsteigt.
pub fn emit_honk(entities: &mut Vec<Entity>, position: Vec2) {
    entities.push(Entity {
        position: position + Vec2::new(0.0, -40.0),
        velocity: Vec2::new(0.0, -1.0),
        life: 45,
        kind: EntityKind::HonkText,
    });
}
