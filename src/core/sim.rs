//! Der Simulationsschritt: ein Frame Zustandsfortschreibung, kein Zeichnen.
//!
//! [`advance`] ist die einzige Stelle, an der sich die Szene zwischen
//! zwei Frames verändert. Eingaben kommen gebündelt als [`FrameInput`],
//! Zufall explizit als `Rng`; damit bleibt der Schritt reproduzierbar
//! und ohne Renderer testbar.

use glam::Vec2;
use rand::Rng;

use crate::core::emit;
use crate::core::entity::{Entity, EntityKind, PERMANENT_LIFE};
use crate::core::scene::{DecorationKind, Scene};
use crate::shared::colors;
use crate::shared::options::{
    EngineOptions, STATION_STOP_FRAMES, STATION_TRIGGER_RADIUS, TRAIN_BRAKE_DISTANCE,
    TRAIN_HONK_COOLDOWN_FRAMES, TRAIN_HONK_DISTANCE, TUNNEL_TRIGGER_RADIUS,
};

/// Auslenkungs-Zeitschritt der Wackellinien pro Frame (0.005/ms bei 60 fps).
pub const WIGGLE_TIME_STEP: f32 = 0.08;
/// Wahrscheinlichkeit pro Frame und Zug für ein neues Rauchwölkchen.
const SMOKE_SPAWN_CHANCE: f64 = 0.3;

/// Unveränderliche Rahmendaten eines Simulationsschritts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInput {
    /// Größe der Zeichenfläche in Pixeln, begrenzt die Käfer.
    pub surface_size: Vec2,
    /// Obergrenze über alle Partikel.
    pub max_entities: usize,
    /// Obergrenze für permanenten Glitzer.
    pub max_glitter: usize,
    /// Lebensdauer gestempelter Blumen in Frames.
    pub flower_lifetime_frames: u32,
    /// Lebensdauer gestempelter Grashalme in Frames.
    pub grass_lifetime_frames: u32,
}

impl FrameInput {
    pub fn from_options(options: &EngineOptions) -> Self {
        Self {
            surface_size: Vec2::new(options.surface_width as f32, options.surface_height as f32),
            max_entities: options.max_entities,
            max_glitter: options.max_glitter,
            flower_lifetime_frames: options.flower_lifetime_frames,
            grass_lifetime_frames: options.grass_lifetime_frames,
        }
    }
}

/// Schreibt die Szene um genau einen Frame fort.
pub fn advance(scene: &mut Scene, input: &FrameInput, rng: &mut impl Rng) {
    scene.frame += 1;
    advance_trains(scene, rng);
    advance_entities(scene, input, rng);
    enforce_caps(scene, input);
    advance_wiggly(scene);
    advance_nature(scene, input);
}

// ── Züge ────────────────────────────────────────────────────────────────────

fn advance_trains(scene: &mut Scene, rng: &mut impl Rng) {
    let n = scene.trains.len();
    if n == 0 {
        return;
    }

    // Positionen und Längen vor dem Frame einfrieren, damit die
    // Begegnungsregeln nicht von der Iterationsreihenfolge abhängen.
    let samples: Vec<Option<(Vec2, f32)>> = scene
        .trains
        .iter()
        .map(|t| {
            scene
                .tracks
                .get(t.track_id)
                .and_then(|track| track.sample(t.fraction))
                .map(|s| (s.position, s.heading))
        })
        .collect();
    let lengths: Vec<f32> = scene
        .trains
        .iter()
        .map(|t| scene.tracks.get(t.track_id).map_or(0.0, |track| track.length()))
        .collect();
    let speeds: Vec<f32> = scene.trains.iter().map(|t| t.speed).collect();

    // Stationen und Tunnel.
    for (i, train) in scene.trains.iter_mut().enumerate() {
        let Some((pos, _)) = samples[i] else { continue };

        let mut near_station = false;
        let mut in_tunnel = false;
        for deco in &scene.decorations {
            let dist = deco.position.distance(pos);
            match deco.kind {
                DecorationKind::Station if dist < STATION_TRIGGER_RADIUS => near_station = true,
                DecorationKind::Tunnel if dist < TUNNEL_TRIGGER_RADIUS => in_tunnel = true,
                _ => {}
            }
        }
        train.in_tunnel = in_tunnel;

        if near_station {
            if !train.at_station {
                train.at_station = true;
                train.station_timer = STATION_STOP_FRAMES;
                train.original_speed = train.speed;
                train.speed = 0.0;
                log::debug!("Zug auf Schiene {} hält an der Station", train.track_id);
            }
        } else {
            // Radius verlassen: beim nächsten Besuch wird wieder gehalten.
            train.at_station = false;
        }

        if train.station_timer > 0 {
            train.station_timer -= 1;
            if train.station_timer == 0 {
                train.speed = train.original_speed;
            }
        }
    }

    // Begegnungen auf derselben Schiene: hupen, bremsen, erholen.
    let mut will_honk = vec![false; n];
    for i in 0..n {
        let Some((pos_i, _)) = samples[i] else { continue };
        for j in 0..n {
            if i == j || scene.trains[i].track_id != scene.trains[j].track_id {
                continue;
            }
            let Some((pos_j, _)) = samples[j] else { continue };

            let dist = pos_i.distance(pos_j);
            if dist < TRAIN_HONK_DISTANCE {
                will_honk[i] = true;
                if dist < TRAIN_BRAKE_DISTANCE && speeds[i] > speeds[j] * 0.8 {
                    scene.trains[i].speed *= 0.98;
                }
            } else {
                let original = scene.trains[i].original_speed;
                let beschleunigt = scene.trains[i].speed * 1.01;
                scene.trains[i].speed = beschleunigt.min(original);
            }
        }
    }

    for i in 0..n {
        let train = &mut scene.trains[i];
        if train.honk_cooldown > 0 {
            train.honk_cooldown -= 1;
        }
        if will_honk[i] && train.honk_cooldown == 0 {
            if let Some((pos, _)) = samples[i] {
                train.honk_cooldown = TRAIN_HONK_COOLDOWN_FRAMES;
                emit::emit_honk(&mut scene.entities, pos);
            }
        }
    }

    // Bewegung in Pixeln pro Frame, unabhängig von der Schienenlänge.
    for (i, train) in scene.trains.iter_mut().enumerate() {
        if lengths[i] <= f32::EPSILON {
            continue;
        }
        train.fraction += train.speed / lengths[i];
        if train.fraction > 1.0 {
            train.fraction = 0.0;
        }
    }

    // Rauch aus dem Schornstein, auch im Stand.
    for i in 0..n {
        if !rng.random_bool(SMOKE_SPAWN_CHANCE) {
            continue;
        }
        let train = &scene.trains[i];
        let Some(sample) = scene
            .tracks
            .get(train.track_id)
            .and_then(|track| track.sample(train.fraction))
        else {
            continue;
        };
        let chimney = crate::core::geometry::local_to_world(
            sample.position,
            sample.heading,
            Vec2::new(train.size * 0.65, -train.size * 0.75),
        );
        emit::emit_train_smoke(&mut scene.entities, chimney, sample.heading, train.size, rng);
    }
}

// ── Partikel ────────────────────────────────────────────────────────────────

fn advance_entities(scene: &mut Scene, input: &FrameInput, rng: &mut impl Rng) {
    let entities = std::mem::take(&mut scene.entities);
    let mut next = Vec::with_capacity(entities.len() + 16);
    let mut spawned = Vec::new();

    for mut entity in entities {
        if entity.life != PERMANENT_LIFE {
            entity.life -= 1;
        }
        if step_entity(&mut entity, &mut spawned, input, rng) && !entity.is_expired() {
            next.push(entity);
        }
    }

    next.append(&mut spawned);
    scene.entities = next;
}

/// Schreibt ein einzelnes Partikel fort; `false` entfernt es sofort.
fn step_entity(
    entity: &mut Entity,
    spawned: &mut Vec<Entity>,
    input: &FrameInput,
    rng: &mut impl Rng,
) -> bool {
    match &mut entity.kind {
        EntityKind::FireworkRocket {
            color,
            start_y,
            target_y,
            trail_timer,
            ..
        } => {
            let progress = 1.0 - entity.life as f32 / 60.0;
            let eased = 1.0 - (1.0 - progress).powf(2.2);
            entity.position.y = *start_y + (*target_y - *start_y) * eased;
            entity.position.x += entity.velocity.x * (1.0 - progress * 0.5);

            *trail_timer += 1;
            if entity.life > 5 && *trail_timer % 2 == 0 {
                spawned.push(Entity {
                    position: entity.position
                        + Vec2::new(rng.random_range(-2.0..2.0), rng.random_range(0.0..8.0)),
                    velocity: Vec2::new(
                        rng.random_range(-0.5..0.5),
                        rng.random_range(0.0..2.0) + 1.0,
                    ),
                    life: 20,
                    kind: EntityKind::RocketTrail {
                        color: *color,
                        size: 1.0 + rng.random_range(0.0..1.0),
                    },
                });
            }

            if entity.life <= 0 || entity.position.y <= *target_y {
                explode_rocket(spawned, entity.position, *color, rng);
                return false;
            }
            true
        }
        EntityKind::FireworkSpark { .. } => {
            entity.velocity *= 0.995;
            entity.velocity.y += 0.08;
            entity.position += entity.velocity;
            true
        }
        EntityKind::RocketTrail { .. } => {
            entity.velocity.y += 0.15;
            entity.velocity.x *= 0.97;
            entity.position += entity.velocity;
            true
        }
        EntityKind::Glitter { blink_timer, .. } => {
            *blink_timer += 1;
            true
        }
        EntityKind::Balloon {
            wobble, wind_phase, ..
        } => {
            *wobble += 0.05;
            *wind_phase += 0.08;
            entity.position.x += entity.velocity.x + wobble.sin() * 0.3;
            entity.position.y += entity.velocity.y;
            entity.velocity.y -= 0.01;
            true
        }
        EntityKind::Confetti { rotation, spin, .. } => {
            entity.velocity.y += 0.15;
            *rotation += *spin;
            entity.position += entity.velocity;
            true
        }
        EntityKind::Worm {
            trail,
            max_trail,
            direction,
            turn_rate,
            wiggle,
            wiggle_speed,
            ..
        } => {
            *wiggle += *wiggle_speed;
            *direction += rng.random_range(-0.5..0.5) * *turn_rate;
            entity.velocity = Vec2::from_angle(*direction) * 1.5;

            let seitwaerts = Vec2::from_angle(*direction + std::f32::consts::FRAC_PI_2)
                * (wiggle.sin() * 2.0);
            entity.position += entity.velocity + seitwaerts;

            trail.push(entity.position);
            if trail.len() > *max_trail {
                trail.remove(0);
            }
            true
        }
        EntityKind::Lightning {
            start,
            target,
            max_life,
            segments,
            branch,
            ..
        } => {
            // Zackenzug jeden Frame neu würfeln, das lässt den Blitz flackern.
            segments.clear();
            for i in 0..=8 {
                let t = i as f32 / 8.0;
                let jagged = (t * std::f32::consts::PI).sin() * 30.0;
                let jitter = Vec2::new(
                    rng.random_range(-0.5..0.5) * jagged,
                    rng.random_range(-0.5..0.5) * jagged,
                );
                segments.push(start.lerp(*target, t) + jitter);
            }
            segments[8] = *target;

            *branch = None;
            if rng.random_bool(0.3) && entity.life > *max_life / 2 {
                let anfang = rng.random_range(1..segments.len() - 2);
                let schritte = rng.random_range(3..7);
                let mut letzte = segments[anfang];
                let mut punkte = vec![letzte];
                for _ in 0..schritte {
                    letzte += Vec2::new(
                        rng.random_range(-12.5..12.5),
                        rng.random_range(-12.5..12.5),
                    );
                    punkte.push(letzte);
                }
                *branch = Some(punkte);
            }
            true
        }
        EntityKind::Bug {
            direction,
            wiggle,
            wiggle_speed,
            change_timer,
            ..
        } => {
            *change_timer -= 1;
            if *change_timer <= 0 {
                *direction += rng.random_range(-0.5..0.5) * std::f32::consts::PI;
                let speed = 2.0 + rng.random_range(0.0..3.0);
                entity.velocity = Vec2::from_angle(*direction) * speed;
                *change_timer = rng.random_range(30..70);
            }

            *wiggle += *wiggle_speed;
            entity.position.x += entity.velocity.x + wiggle.sin() * 0.5;
            entity.position.y += entity.velocity.y + wiggle.cos() * 0.5;

            // Am Flächenrand abprallen.
            if entity.position.x < 0.0 || entity.position.x > input.surface_size.x {
                entity.velocity.x = -entity.velocity.x;
                *direction = entity.velocity.y.atan2(entity.velocity.x);
            }
            if entity.position.y < 0.0 || entity.position.y > input.surface_size.y {
                entity.velocity.y = -entity.velocity.y;
                *direction = entity.velocity.y.atan2(entity.velocity.x);
            }
            true
        }
        EntityKind::Streamer {
            wave, curl, twist, ..
        } => {
            entity.velocity.y += 0.08;
            *wave += 0.12;
            *twist += *curl;
            entity.position += entity.velocity;
            true
        }
        EntityKind::TrainSmoke {
            size,
            growth,
            rotation,
            spin,
            ..
        } => {
            entity.velocity.y *= 0.98;
            entity.velocity.x *= 0.99;
            *size *= *growth;
            *rotation += *spin;
            entity.position += entity.velocity;
            true
        }
        EntityKind::HonkText => {
            entity.position += entity.velocity;
            true
        }
    }
}

/// Zerlegt eine Rakete in farbige Funken plus acht weiße Kernfunken.
fn explode_rocket(
    spawned: &mut Vec<Entity>,
    position: Vec2,
    color: image::Rgba<u8>,
    rng: &mut impl Rng,
) {
    let count = 20 + rng.random_range(0..15);
    for i in 0..count {
        let angle = (i as f32 / count as f32) * std::f32::consts::TAU
            + rng.random_range(-0.3..0.3);
        let speed = 3.0 + rng.random_range(0.0..4.0);
        spawned.push(Entity {
            position,
            velocity: Vec2::from_angle(angle) * speed,
            life: rng.random_range(50..80),
            kind: EntityKind::FireworkSpark {
                color,
                size: 2.0 + rng.random_range(0.0..2.0),
            },
        });
    }

    for _ in 0..8 {
        spawned.push(Entity {
            position,
            velocity: Vec2::new(rng.random_range(-1.5..1.5), rng.random_range(-1.5..1.5)),
            life: 30,
            kind: EntityKind::FireworkSpark {
                color: colors::WHITE,
                size: 3.0,
            },
        });
    }
}

// ── Deckel, Wackellinien, Naturstempel ──────────────────────────────────────

fn enforce_caps(scene: &mut Scene, input: &FrameInput) {
    let glitter_count = scene.entities.iter().filter(|e| e.is_glitter()).count();
    if glitter_count > input.max_glitter {
        let mut streichen = glitter_count - input.max_glitter;
        scene.entities.retain(|e| {
            if streichen > 0 && e.is_glitter() {
                streichen -= 1;
                false
            } else {
                true
            }
        });
    }

    if scene.entities.len() > input.max_entities {
        let excess = scene.entities.len() - input.max_entities;
        scene.entities.drain(0..excess);
        log::debug!("Partikeldeckel erreicht, {excess} älteste entfernt");
    }
}

fn advance_wiggly(scene: &mut Scene) {
    let lines = scene
        .wiggly_lines
        .iter_mut()
        .chain(scene.current_wiggly.iter_mut());
    for line in lines {
        line.age_frames += 1;
        let scale = (line.brush_size * 0.1).max(3.0);
        let t = line.age_frames as f32 * WIGGLE_TIME_STEP;
        for (i, point) in line.points.iter_mut().enumerate() {
            let phase = i as f32;
            point.displayed = point.anchor
                + Vec2::new(
                    (t + phase * 0.5).sin() * scale,
                    (t + phase * 0.3).cos() * scale,
                );
        }
    }
}

fn advance_nature(scene: &mut Scene, input: &FrameInput) {
    for flower in &mut scene.flowers {
        flower.age_frames += 1;
    }
    scene
        .flowers
        .retain(|f| f.age_frames <= input.flower_lifetime_frames);

    for blade in &mut scene.grass {
        blade.age_frames += 1;
    }
    scene
        .grass
        .retain(|g| g.age_frames <= input.grass_lifetime_frames);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::emit;
    use crate::core::track::TrackId;
    use crate::core::train::Train;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn test_input() -> FrameInput {
        FrameInput {
            surface_size: Vec2::new(1280.0, 720.0),
            max_entities: 4096,
            max_glitter: 2000,
            flower_lifetime_frames: 600,
            grass_lifetime_frames: 600,
        }
    }

    fn gerade(from: Vec2, to: Vec2, n: usize) -> Vec<Vec2> {
        (0..n)
            .map(|i| from.lerp(to, i as f32 / (n - 1) as f32))
            .collect()
    }

    #[test]
    fn konfetti_verfaellt_glitzer_bleibt() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut scene = Scene::new();
        let input = test_input();

        emit::emit_confetti(&mut scene.entities, Vec2::new(100.0, 100.0), 10.0, &mut rng);
        emit::emit_glitter(
            &mut scene.entities,
            Vec2::new(300.0, 300.0),
            colors::WHITE,
            20.0,
            &mut rng,
        );
        let glitter = scene.entities.iter().filter(|e| e.is_glitter()).count();
        assert!(glitter > 0);

        for _ in 0..150 {
            advance(&mut scene, &input, &mut rng);
        }
        assert!(scene.entities.iter().all(|e| e.is_glitter()));
        assert_eq!(
            scene.entities.iter().filter(|e| e.is_glitter()).count(),
            glitter
        );
    }

    #[test]
    fn rakete_explodiert_in_funken_mit_weissem_kern() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut scene = Scene::new();
        let input = test_input();
        emit::emit_firework(&mut scene.entities, Vec2::new(400.0, 500.0), &mut rng);

        let mut explodiert = false;
        for _ in 0..70 {
            advance(&mut scene, &input, &mut rng);
            let rakete_lebt = scene
                .entities
                .iter()
                .any(|e| matches!(e.kind, EntityKind::FireworkRocket { .. }));
            if !rakete_lebt {
                explodiert = true;
                break;
            }
        }
        assert!(explodiert, "Rakete muss innerhalb von 70 Frames zerplatzen");

        let funken = scene
            .entities
            .iter()
            .filter(|e| matches!(e.kind, EntityKind::FireworkSpark { .. }))
            .count();
        assert!(
            (28..=43).contains(&funken),
            "Funkenzahl {funken} außerhalb der Spanne"
        );

        let weisse_kerne = scene
            .entities
            .iter()
            .filter(|e| {
                matches!(
                    e.kind,
                    EntityKind::FireworkSpark { color, size } if color == colors::WHITE && size == 3.0
                )
            })
            .count();
        assert_eq!(weisse_kerne, 8);
    }

    #[test]
    fn rakete_steigt_mit_ease_out() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut scene = Scene::new();
        let input = test_input();
        emit::emit_firework(&mut scene.entities, Vec2::new(400.0, 500.0), &mut rng);

        let (start_y, target_y) = match scene.entities[0].kind {
            EntityKind::FireworkRocket {
                start_y, target_y, ..
            } => (start_y, target_y),
            ref andere => panic!("Rakete erwartet, war {andere:?}"),
        };

        // Ease-out: nach der halben Lebenszeit ist deutlich mehr als die
        // halbe Strecke geschafft.
        let mut letzte_y = start_y;
        for _ in 0..30 {
            advance(&mut scene, &input, &mut rng);
            if let Some(e) = scene
                .entities
                .iter()
                .find(|e| matches!(e.kind, EntityKind::FireworkRocket { .. }))
            {
                assert!(e.position.y <= letzte_y + 1e-3, "Rakete darf nicht sinken");
                letzte_y = e.position.y;
            }
        }
        let geschafft = (start_y - letzte_y) / (start_y - target_y);
        assert!(geschafft > 0.7, "Ease-out zu flach: {geschafft}");
    }

    #[test]
    fn zuege_fahren_in_pixeln_pro_frame() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut scene = Scene::new();
        let input = test_input();

        let kurz = scene
            .tracks
            .insert(gerade(Vec2::ZERO, Vec2::new(200.0, 0.0), 21))
            .expect("Schiene erwartet");
        let lang = scene
            .tracks
            .insert(gerade(Vec2::new(0.0, 300.0), Vec2::new(800.0, 300.0), 81))
            .expect("Schiene erwartet");

        let mut a = Train::for_track(kurz, 10.0, 1.0, &mut rng);
        a.speed = 1.0;
        a.original_speed = 1.0;
        let mut b = Train::for_track(lang, 10.0, 1.0, &mut rng);
        b.speed = 1.0;
        b.original_speed = 1.0;
        scene.trains.push(a);
        scene.trains.push(b);

        for _ in 0..50 {
            advance(&mut scene, &input, &mut rng);
        }

        // Gleiche Pixelstrecke trotz verschieden langer Schienen.
        let strecke_a = scene.trains[0].fraction * 200.0;
        let strecke_b = scene.trains[1].fraction * 800.0;
        assert!((strecke_a - 50.0).abs() < 1e-3, "Strecke A {strecke_a}");
        assert!((strecke_b - 50.0).abs() < 1e-3, "Strecke B {strecke_b}");
    }

    #[test]
    fn zug_wickelt_von_eins_auf_null() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut scene = Scene::new();
        let input = test_input();

        let id = scene
            .tracks
            .insert(gerade(Vec2::ZERO, Vec2::new(100.0, 0.0), 11))
            .expect("Schiene erwartet");
        let mut zug = Train::for_track(id, 10.0, 1.0, &mut rng);
        zug.fraction = 0.995;
        zug.speed = 2.0;
        zug.original_speed = 2.0;
        scene.trains.push(zug);

        advance(&mut scene, &input, &mut rng);
        assert_eq!(scene.trains[0].fraction, 0.0);
    }

    #[test]
    fn nahe_zuege_hupen_und_bremsen() {
        let mut rng = StdRng::seed_from_u64(6);
        let mut scene = Scene::new();
        let input = test_input();

        let id = scene
            .tracks
            .insert(gerade(Vec2::ZERO, Vec2::new(400.0, 0.0), 41))
            .expect("Schiene erwartet");
        let mut schnell = Train::for_track(id, 10.0, 1.0, &mut rng);
        schnell.fraction = 0.0;
        schnell.speed = 1.2;
        schnell.original_speed = 1.2;
        let mut langsam = Train::for_track(id, 10.0, 1.0, &mut rng);
        langsam.fraction = 0.05; // 20 Pixel voraus
        langsam.speed = 0.8;
        langsam.original_speed = 0.8;
        scene.trains.push(schnell);
        scene.trains.push(langsam);

        advance(&mut scene, &input, &mut rng);

        let honks = scene
            .entities
            .iter()
            .filter(|e| matches!(e.kind, EntityKind::HonkText))
            .count();
        assert!(honks >= 1, "mindestens ein Hupsignal erwartet");
        assert!(scene.trains[0].speed < 1.2, "schneller Zug muss bremsen");
        assert!(scene.trains[0].honk_cooldown > 0);

        // Abklingzeit verhindert sofortiges Nachhupen.
        let vorher = honks;
        advance(&mut scene, &input, &mut rng);
        let nachher = scene
            .entities
            .iter()
            .filter(|e| matches!(e.kind, EntityKind::HonkText))
            .count();
        assert!(nachher <= vorher, "kein neues Hupsignal im Folgeframe");
    }

    #[test]
    fn station_haelt_zug_genau_einmal_pro_besuch() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut scene = Scene::new();
        let input = test_input();

        let id = scene
            .tracks
            .insert(gerade(Vec2::ZERO, Vec2::new(400.0, 0.0), 41))
            .expect("Schiene erwartet");
        scene.place_decoration(DecorationKind::Station, Vec2::new(200.0, 10.0));

        let mut zug = Train::for_track(id, 10.0, 1.0, &mut rng);
        zug.fraction = 0.45; // 180 px, knapp vor der Station
        zug.speed = 1.0;
        zug.original_speed = 1.0;
        scene.trains.push(zug);

        advance(&mut scene, &input, &mut rng);
        assert_eq!(scene.trains[0].speed, 0.0, "Zug muss halten");
        assert!(scene.trains[0].at_station);

        for _ in 0..STATION_STOP_FRAMES {
            advance(&mut scene, &input, &mut rng);
        }
        assert!(scene.trains[0].speed > 0.0, "Zug muss wieder anfahren");

        // Im Radius bleibt der Halt einmalig.
        for _ in 0..5 {
            advance(&mut scene, &input, &mut rng);
        }
        assert!(scene.trains[0].speed > 0.0);
    }

    #[test]
    fn glitzerdeckel_streicht_aelteste() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut scene = Scene::new();
        let mut input = test_input();
        input.max_glitter = 5;

        for i in 0..12 {
            scene.entities.push(Entity {
                position: Vec2::new(i as f32 * 20.0, 0.0),
                velocity: Vec2::ZERO,
                life: PERMANENT_LIFE,
                kind: EntityKind::Glitter {
                    color: colors::WHITE,
                    size: 1.0,
                    blink_timer: 0,
                },
            });
        }

        advance(&mut scene, &input, &mut rng);
        assert_eq!(scene.entities.len(), 5);
        // Die ältesten (kleinsten x) sind weg.
        assert!(scene.entities.iter().all(|e| e.position.x >= 140.0));
    }

    #[test]
    fn partikeldeckel_greift() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut scene = Scene::new();
        let mut input = test_input();
        input.max_entities = 50;

        for _ in 0..10 {
            emit::emit_confetti(&mut scene.entities, Vec2::new(100.0, 100.0), 10.0, &mut rng);
        }
        advance(&mut scene, &input, &mut rng);
        assert!(scene.entities.len() <= 50);
    }

    #[test]
    fn blitz_wuerfelt_zacken_jeden_frame() {
        let mut rng = StdRng::seed_from_u64(10);
        let mut scene = Scene::new();
        let input = test_input();
        emit::emit_lightning(
            &mut scene.entities,
            Vec2::new(300.0, 300.0),
            colors::WHITE,
            16.0,
            &mut rng,
        );
        scene.entities.truncate(1);

        advance(&mut scene, &input, &mut rng);
        let erste = match &scene.entities[0].kind {
            EntityKind::Lightning { segments, start, target, .. } => {
                assert_eq!(segments.len(), 9);
                assert_eq!(segments[0], *start);
                assert_eq!(segments[8], *target);
                segments.clone()
            }
            andere => panic!("Blitz erwartet, war {andere:?}"),
        };

        advance(&mut scene, &input, &mut rng);
        match &scene.entities[0].kind {
            EntityKind::Lightning { segments, .. } => {
                assert_ne!(*segments, erste, "Zacken müssen neu gewürfelt werden");
            }
            andere => panic!("Blitz erwartet, war {andere:?}"),
        }
    }

    #[test]
    fn kaefer_prallt_am_rand_ab() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut scene = Scene::new();
        let input = test_input();

        scene.entities.push(Entity {
            position: Vec2::new(1.0, 300.0),
            velocity: Vec2::new(-3.0, 0.0),
            life: 200,
            kind: EntityKind::Bug {
                glyph: crate::core::entity::BugGlyph::Ladybug,
                size: 14.0,
                direction: std::f32::consts::PI,
                wiggle: 0.0,
                wiggle_speed: 0.0,
                change_timer: 1000,
            },
        });

        advance(&mut scene, &input, &mut rng);
        assert!(
            scene.entities[0].velocity.x > 0.0,
            "Käfer muss nach rechts abprallen"
        );
    }

    #[test]
    fn wackellinie_schwingt_um_die_anker() {
        let mut rng = StdRng::seed_from_u64(12);
        let mut scene = Scene::new();
        let input = test_input();

        scene.begin_wiggly(Vec2::new(10.0, 10.0), colors::BLACK, 20.0);
        scene.extend_wiggly(Vec2::new(30.0, 10.0), None);
        scene.extend_wiggly(Vec2::new(50.0, 10.0), None);
        scene.finish_wiggly();

        advance(&mut scene, &input, &mut rng);

        let line = &scene.wiggly_lines[0];
        let scale = (20.0_f32 * 0.1).max(3.0);
        let mut bewegt = false;
        for p in &line.points {
            let d = p.displayed - p.anchor;
            assert!(d.x.abs() <= scale + 1e-3 && d.y.abs() <= scale + 1e-3);
            if d.length() > 0.01 {
                bewegt = true;
            }
        }
        assert!(bewegt, "Auslenkung erwartet");
    }

    #[test]
    fn blumen_und_gras_verbluehen() {
        let mut rng = StdRng::seed_from_u64(13);
        let mut scene = Scene::new();
        let mut input = test_input();
        input.flower_lifetime_frames = 10;
        input.grass_lifetime_frames = 10;

        scene.add_flower(Vec2::new(50.0, 50.0), 20.0, &mut rng);
        scene.add_grass(Vec2::new(80.0, 80.0), 10.0, &mut rng);
        assert!(!scene.flowers.is_empty());
        assert!(!scene.grass.is_empty());

        for _ in 0..11 {
            advance(&mut scene, &input, &mut rng);
        }
        assert!(scene.flowers.is_empty());
        assert!(scene.grass.is_empty());
    }
}
