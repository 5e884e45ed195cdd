//! Zeichnet Partikel auf das Overlay.
//!
//! Jede Sorte hat ihr festes Ausblendgesetz über die Restlebenszeit;
//! die Simulation kennt keine Deckkraft, nur diesen Renderer.

use glam::Vec2;
use image::{Rgba, RgbaImage};

use crate::core::entity::{BugGlyph, Entity, EntityKind, SmokeShape};
use crate::core::geometry::local_to_world;
use crate::render::{raster, text};
use crate::shared::colors;

// ── Käferfarben ─────────────────────────────────────────────────────────────

const LADYBUG_RED: Rgba<u8> = Rgba([220, 20, 60, 255]);
const ANT_BLACK: Rgba<u8> = Rgba([45, 45, 45, 255]);
const BEETLE_BROWN: Rgba<u8> = Rgba([101, 67, 33, 255]);
const CRICKET_GREEN: Rgba<u8> = Rgba([60, 140, 60, 255]);
const SPIDER_BLACK: Rgba<u8> = Rgba([25, 25, 25, 255]);

/// Zeichnet ein Partikel; `brush_size` bestimmt nur die Schnurstärke
/// der Ballons.
pub(crate) fn draw_entity(overlay: &mut RgbaImage, entity: &Entity, brush_size: f32) {
    let pos = entity.position;
    match &entity.kind {
        EntityKind::FireworkRocket { color, size, .. } => {
            raster::draw_filled_circle(overlay, pos, *size, *color, 0.9);
            raster::draw_filled_circle(overlay, pos, *size * 0.4, colors::WHITE, 0.9);
        }
        EntityKind::FireworkSpark { color, size } => {
            let alpha = entity.life as f32 / 80.0;
            raster::draw_filled_circle(overlay, pos, *size, *color, alpha);
        }
        EntityKind::RocketTrail { color, size } => {
            let alpha = entity.life as f32 / 20.0;
            raster::draw_filled_circle(overlay, pos, *size, *color, alpha * 0.9);
        }
        EntityKind::Glitter {
            color, blink_timer, ..
        } => {
            // An fuer 5 von 20 Frames, sonst unsichtbar.
            if blink_timer % 20 < 5 {
                raster::draw_filled_circle(overlay, pos, 2.0, *color, 1.0);
                raster::draw_ring(overlay, pos, 2.0, 1.0, colors::WHITE, 1.0);
            }
        }
        EntityKind::Balloon {
            color,
            size,
            base_alpha,
            wind_phase,
            string_length,
            ..
        } => {
            let alpha = (entity.life as f32 / 80.0).min(1.0) * base_alpha;
            if alpha <= 0.01 {
                return;
            }

            // Wellige Schnur, unten staerker ausgelenkt als oben.
            let string_width = (brush_size / 20.0).max(1.0);
            let segments = ((string_length / 3.0) as usize).max(5);
            let mut prev = pos + Vec2::new(0.0, *size);
            for i in 1..=segments {
                let t = i as f32 / segments as f32;
                let wave_strength = t * 6.0;
                let next = Vec2::new(
                    pos.x + (wind_phase + i as f32 * 0.5).sin() * wave_strength,
                    pos.y + size + string_length * t,
                );
                raster::draw_line(
                    overlay,
                    prev,
                    next,
                    string_width,
                    colors::BALLOON_STRING,
                    alpha * 0.8,
                );
                prev = next;
            }

            raster::draw_filled_circle(overlay, pos, *size, *color, alpha * 0.9);
            raster::draw_ring(overlay, pos, *size, 2.0, *color, alpha);
            raster::draw_filled_circle(
                overlay,
                pos - Vec2::splat(*size * 0.4),
                *size * 0.25,
                colors::WHITE,
                alpha * 0.7,
            );
        }
        EntityKind::Confetti {
            color,
            size,
            rotation,
            ..
        } => {
            let alpha = entity.life as f32 / 100.0;
            raster::draw_rotated_rect(
                overlay,
                pos,
                Vec2::new(size * 0.5, size * 0.25),
                *rotation,
                *color,
                alpha,
            );
        }
        EntityKind::Worm { color, trail, .. } => {
            if trail.len() < 2 {
                return;
            }
            let fade = entity.life as f32 / 150.0;
            for i in 1..trail.len() {
                let progress = i as f32 / trail.len() as f32;
                // Mitte dick, Enden duenn.
                let thickness = (progress * std::f32::consts::PI).sin() * 6.0 + 2.0;
                raster::draw_line(
                    overlay,
                    trail[i - 1],
                    trail[i],
                    thickness,
                    *color,
                    progress * fade,
                );
            }

            let head = trail[trail.len() - 1];
            raster::draw_filled_circle(overlay, head, 4.0, *color, fade);
            raster::draw_filled_circle(
                overlay,
                head + Vec2::new(-1.5, -1.0),
                0.8,
                colors::BLACK,
                fade,
            );
            raster::draw_filled_circle(
                overlay,
                head + Vec2::new(1.5, -1.0),
                0.8,
                colors::BLACK,
                fade,
            );
        }
        EntityKind::Lightning {
            color,
            width,
            intensity,
            max_life,
            segments,
            branch,
            ..
        } => {
            if segments.len() < 2 {
                return;
            }
            let alpha = (entity.life as f32 / *max_life as f32) * intensity;
            raster::draw_polyline(overlay, segments, *width, *color, alpha);
            raster::draw_polyline(
                overlay,
                segments,
                (width * 0.4).max(1.0),
                colors::WHITE,
                alpha * 0.8,
            );
            if let Some(punkte) = branch {
                raster::draw_polyline(overlay, punkte, width * 0.6, *color, alpha * 0.6);
            }
        }
        EntityKind::Bug {
            glyph,
            size,
            direction,
            wiggle,
            ..
        } => {
            let alpha = (entity.life as f32 / 50.0).min(1.0);
            let rotation = direction + wiggle.sin() * 0.2;
            draw_bug(overlay, pos, rotation, *glyph, *size, alpha);
        }
        EntityKind::Streamer {
            color,
            width,
            length,
            wave,
            twist,
            ..
        } => {
            let alpha = entity.life as f32 / 150.0;
            let mut punkte = [Vec2::ZERO; 9];
            for (i, punkt) in punkte.iter_mut().enumerate() {
                let progress = i as f32 / 8.0;
                let curl_radius = progress * 15.0;
                let curl_angle = twist + progress * 3.0 * std::f32::consts::PI;
                // Das Band dreht sich ein, die Welle liegt obenauf.
                let curl_x = curl_angle.cos() * curl_radius;
                let curl_depth = curl_angle.sin() * curl_radius * 0.5;
                let wave_x = (wave + progress * 2.0).sin() * (8.0 - progress * 2.0);
                *punkt = Vec2::new(
                    pos.x + curl_x + wave_x,
                    pos.y + length * progress + curl_depth,
                );
            }
            raster::draw_polyline(overlay, &punkte, *width, *color, alpha);
            raster::draw_polyline(
                overlay,
                &punkte,
                width * 1.2,
                Rgba([0, 0, 0, 32]),
                alpha * 0.3,
            );
        }
        EntityKind::TrainSmoke {
            color,
            shape,
            size,
            base_alpha,
            rotation,
            ..
        } => {
            let alpha = (entity.life as f32 / 60.0) * base_alpha;
            if alpha <= 0.01 {
                return;
            }
            draw_smoke_shape(overlay, pos, *rotation, *shape, *size, *color, alpha);
        }
        EntityKind::HonkText => {
            let alpha = entity.life as f32 / 45.0;
            if alpha <= 0.01 {
                return;
            }
            text::draw_text_outlined(
                overlay,
                pos,
                "HONK!",
                2,
                colors::GOLD,
                colors::BLACK,
                alpha,
            );
        }
    }
}

// ── Käfer ───────────────────────────────────────────────────────────────────

fn draw_bug(
    overlay: &mut RgbaImage,
    position: Vec2,
    rotation: f32,
    glyph: BugGlyph,
    size: f32,
    alpha: f32,
) {
    let s = size;
    let world = |local: Vec2| local_to_world(position, rotation, local);

    match glyph {
        BugGlyph::Ladybug => {
            draw_bug_legs(overlay, position, rotation, s, 3, colors::BLACK, alpha);
            raster::draw_ellipse(
                overlay,
                position,
                Vec2::new(s * 0.5, s * 0.35),
                rotation,
                LADYBUG_RED,
                alpha,
            );
            raster::draw_filled_circle(overlay, world(Vec2::new(s * 0.45, 0.0)), s * 0.16, colors::BLACK, alpha);
            for punkt in [
                Vec2::new(-0.2, -0.15),
                Vec2::new(0.05, -0.18),
                Vec2::new(-0.25, 0.12),
                Vec2::new(0.1, 0.15),
            ] {
                raster::draw_filled_circle(overlay, world(punkt * s), s * 0.07, colors::BLACK, alpha);
            }
        }
        BugGlyph::Ant => {
            draw_bug_legs(overlay, position, rotation, s, 3, ANT_BLACK, alpha);
            for x in [-0.3, 0.0, 0.32] {
                raster::draw_filled_circle(overlay, world(Vec2::new(x * s, 0.0)), s * 0.16, ANT_BLACK, alpha);
            }
        }
        BugGlyph::Beetle => {
            draw_bug_legs(overlay, position, rotation, s, 3, colors::BLACK, alpha);
            raster::draw_ellipse(
                overlay,
                position,
                Vec2::new(s * 0.45, 0.3 * s),
                rotation,
                BEETLE_BROWN,
                alpha,
            );
            // Fluegelnaht.
            raster::draw_line(
                overlay,
                world(Vec2::new(-s * 0.4, 0.0)),
                world(Vec2::new(s * 0.3, 0.0)),
                1.0,
                colors::BLACK,
                alpha * 0.7,
            );
            raster::draw_filled_circle(overlay, world(Vec2::new(s * 0.42, 0.0)), s * 0.14, colors::BLACK, alpha);
        }
        BugGlyph::Cricket => {
            raster::draw_ellipse(
                overlay,
                position,
                Vec2::new(s * 0.5, s * 0.22),
                rotation,
                CRICKET_GREEN,
                alpha,
            );
            // Kraeftige Sprungbeine hinten.
            for side in [-1.0_f32, 1.0] {
                raster::draw_line(
                    overlay,
                    world(Vec2::new(-s * 0.2, side * s * 0.15)),
                    world(Vec2::new(-s * 0.5, side * s * 0.5)),
                    2.0,
                    CRICKET_GREEN,
                    alpha,
                );
            }
            for side in [-1.0_f32, 1.0] {
                raster::draw_line(
                    overlay,
                    world(Vec2::new(s * 0.4, side * s * 0.08)),
                    world(Vec2::new(s * 0.65, side * s * 0.3)),
                    1.0,
                    CRICKET_GREEN,
                    alpha,
                );
            }
        }
        BugGlyph::Spider => {
            // Vier Beinpaare, gewinkelt.
            for i in 0..4 {
                let x = (-0.25 + i as f32 * 0.17) * s;
                for side in [-1.0_f32, 1.0] {
                    let knie = world(Vec2::new(x, side * s * 0.4));
                    raster::draw_line(
                        overlay,
                        world(Vec2::new(x * 0.4, side * s * 0.15)),
                        knie,
                        1.0,
                        SPIDER_BLACK,
                        alpha,
                    );
                    raster::draw_line(
                        overlay,
                        knie,
                        world(Vec2::new(x + s * 0.1, side * s * 0.6)),
                        1.0,
                        SPIDER_BLACK,
                        alpha,
                    );
                }
            }
            raster::draw_filled_circle(overlay, position, s * 0.28, SPIDER_BLACK, alpha);
            raster::draw_filled_circle(overlay, world(Vec2::new(s * 0.3, 0.0)), s * 0.16, SPIDER_BLACK, alpha);
        }
    }
}

fn draw_bug_legs(
    overlay: &mut RgbaImage,
    position: Vec2,
    rotation: f32,
    size: f32,
    pairs: usize,
    color: Rgba<u8>,
    alpha: f32,
) {
    let world = |local: Vec2| local_to_world(position, rotation, local);
    for i in 0..pairs {
        let x = (-0.25 + i as f32 * 0.25) * size;
        for side in [-1.0_f32, 1.0] {
            raster::draw_line(
                overlay,
                world(Vec2::new(x, side * size * 0.2)),
                world(Vec2::new(x + size * 0.12, side * size * 0.5)),
                1.0,
                color,
                alpha,
            );
        }
    }
}

// ── Rauchformen ─────────────────────────────────────────────────────────────

fn draw_smoke_shape(
    overlay: &mut RgbaImage,
    position: Vec2,
    rotation: f32,
    shape: SmokeShape,
    size: f32,
    color: Rgba<u8>,
    alpha: f32,
) {
    let world = |local: Vec2| local_to_world(position, rotation, local);
    match shape {
        SmokeShape::Puff => {
            raster::draw_filled_circle(overlay, position, size, color, alpha);
            raster::draw_filled_circle(
                overlay,
                world(Vec2::new(-size * 0.3, -size * 0.3)),
                size * 0.6,
                colors::WHITE,
                alpha * 0.5,
            );
        }
        SmokeShape::Heart => {
            raster::draw_filled_circle(overlay, world(Vec2::new(-size * 0.25, -size * 0.2)), size * 0.3, color, alpha);
            raster::draw_filled_circle(overlay, world(Vec2::new(size * 0.25, -size * 0.2)), size * 0.3, color, alpha);
            raster::draw_triangle(
                overlay,
                world(Vec2::new(-size * 0.5, -size * 0.05)),
                world(Vec2::new(size * 0.5, -size * 0.05)),
                world(Vec2::new(0.0, size * 0.5)),
                color,
                alpha,
            );
        }
        SmokeShape::Star => {
            // Fuenf Zacken als Dreiecksfaecher ueber Aussen- und Innenradius.
            let mut rand = [Vec2::ZERO; 10];
            for (i, ecke) in rand.iter_mut().enumerate() {
                let angle = rotation - std::f32::consts::FRAC_PI_2
                    + i as f32 * std::f32::consts::PI / 5.0;
                let radius = if i % 2 == 0 { size } else { size * 0.5 };
                *ecke = position + Vec2::from_angle(angle) * radius;
            }
            for i in 0..10 {
                raster::draw_triangle(overlay, position, rand[i], rand[(i + 1) % 10], color, alpha);
            }
        }
        SmokeShape::Circle => {
            raster::draw_filled_circle(overlay, position, size, color, alpha);
            raster::draw_ring(overlay, position, size, 2.0, colors::WHITE, alpha);
        }
    }
}
