//! Szenen-Aggregat: alles, was pro Frame animiert und komponiert wird.
//!
//! Die Szene bündelt Partikel, Wackellinien, Naturstempel, Schienen,
//! Züge und Dekorationen. Sie kennt keine Eingabegeräte und keinen
//! Renderer; beides läuft über [`crate::app`] bzw. [`crate::render`].

use glam::Vec2;
use image::Rgba;
use rand::Rng;

use crate::core::entity::Entity;
use crate::core::track::{PointAcceptance, TrackCommit, TrackCrossing, TrackId, TrackMap};
use crate::core::train::{Train, TrainCar};
use crate::shared::options::{
    DECORATION_MAX_TRACK_DISTANCE, FLOWER_INTERVAL_FRAMES, GRASS_INTERVAL_FRAMES,
};

/// Ein Punkt einer Wackellinie: Anker plus aktuell ausgelenkte Position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WigglyPoint {
    /// Ursprünglich gezeichnete Position.
    pub anchor: Vec2,
    /// Ausgelenkte Position des aktuellen Frames.
    pub displayed: Vec2,
    /// Eigene Farbe im Regenbogen-Modus, sonst `None`.
    pub color: Option<Rgba<u8>>,
}

/// Eine abgeschlossene oder gerade entstehende Wackellinie.
#[derive(Debug, Clone, PartialEq)]
pub struct WigglyLine {
    pub points: Vec<WigglyPoint>,
    pub color: Rgba<u8>,
    pub brush_size: f32,
    /// Frames seit dem ersten Punkt, treibt die Auslenkung.
    pub age_frames: u64,
}

impl WigglyLine {
    pub fn new(color: Rgba<u8>, brush_size: f32) -> Self {
        Self {
            points: Vec::new(),
            color,
            brush_size,
            age_frames: 0,
        }
    }

    pub fn push(&mut self, anchor: Vec2, color: Option<Rgba<u8>>) {
        self.points.push(WigglyPoint {
            anchor,
            displayed: anchor,
            color,
        });
    }
}

/// Eine gestempelte Blume mit begrenzter Lebensdauer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Flower {
    pub position: Vec2,
    pub size: f32,
    pub petal_color: Rgba<u8>,
    /// Phasenversatz, damit nicht alle Blumen synchron schwanken.
    pub phase: f32,
    pub age_frames: u32,
}

/// Ein einzelner Grashalm.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrassBlade {
    pub position: Vec2,
    pub height: f32,
    pub width: f32,
    pub phase: f32,
    pub age_frames: u32,
}

/// Dekorationsarten entlang der Schienen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecorationKind {
    Station,
    Tunnel,
    Tree,
    Building,
}

/// Eine platzierte Dekoration, an die nächstgelegene Schiene gebunden.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackDecoration {
    pub kind: DecorationKind,
    pub position: Vec2,
    pub track_id: TrackId,
    pub size: f32,
}

/// Gesamtzustand der animierten Ebene.
#[derive(Debug, Clone)]
pub struct Scene {
    pub entities: Vec<Entity>,
    pub wiggly_lines: Vec<WigglyLine>,
    /// Gerade entstehende Wackellinie, wackelt schon beim Zeichnen mit.
    pub current_wiggly: Option<WigglyLine>,
    pub flowers: Vec<Flower>,
    pub grass: Vec<GrassBlade>,
    pub tracks: TrackMap,
    /// Punktfolge der gerade entstehenden Schiene.
    pub current_track: Vec<Vec2>,
    /// Beim Zeichnen erkannte Kreuzungen, registriert sobald die
    /// Schiene eine ID bekommt.
    pending_crossings: Vec<TrackCrossing>,
    pub trains: Vec<Train>,
    pub decorations: Vec<TrackDecoration>,
    /// Globaler Frame-Zähler, treibt Pulsieren und Schwanken.
    pub frame: u64,
    last_flower_frame: Option<u64>,
    last_grass_frame: Option<u64>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    pub fn new() -> Self {
        Self {
            entities: Vec::new(),
            wiggly_lines: Vec::new(),
            current_wiggly: None,
            flowers: Vec::new(),
            grass: Vec::new(),
            tracks: TrackMap::new(),
            current_track: Vec::new(),
            pending_crossings: Vec::new(),
            trains: Vec::new(),
            decorations: Vec::new(),
            frame: 0,
            last_flower_frame: None,
            last_grass_frame: None,
        }
    }

    /// Leert die Szene in einem Schlag, der Frame-Zähler läuft weiter.
    pub fn clear(&mut self) {
        let frame = self.frame;
        *self = Scene::new();
        self.frame = frame;
    }

    // ── Schienenbau ─────────────────────────────────────────────────

    /// Beginnt eine neue Schiene, der erste Punkt rastet auf nahe
    /// Endpunkte ein.
    pub fn begin_track(&mut self, point: Vec2, snap_radius: f32) {
        let start = self.tracks.snap_start_point(point, snap_radius);
        self.current_track = vec![start];
        self.pending_crossings.clear();
    }

    /// Versucht, die laufende Schiene um einen Punkt zu verlängern.
    ///
    /// Bei Annahme wird das neue Segment auf Kreuzungen mit bestehenden
    /// Schienen geprüft und vorgemerkt.
    pub fn try_extend_track(&mut self, point: Vec2) -> PointAcceptance {
        let accept = crate::core::track::filter_track_point(&self.current_track, point);
        if accept != PointAcceptance::Accepted {
            return accept;
        }

        if let Some(&prev) = self.current_track.last() {
            if let Some(crossing) = self.tracks.find_crossing(prev, point) {
                self.pending_crossings.push(crossing);
            }
        }
        self.current_track.push(point);
        accept
    }

    /// Schließt die laufende Schiene ab.
    ///
    /// Neue Schienen bekommen sofort einen Zug; beim Verschmelzen werden
    /// gebundene Züge über die Bogenlänge auf die neue Geometrie gehoben.
    pub fn finish_track(
        &mut self,
        snap_radius: f32,
        base_speed: f32,
        brush_size: f32,
        rng: &mut impl Rng,
    ) -> TrackCommit {
        let candidate = std::mem::take(&mut self.current_track);
        let commit = self.tracks.commit(candidate, snap_radius);

        match commit {
            TrackCommit::Created(id) => {
                self.trains
                    .push(Train::for_track(id, brush_size, base_speed, rng));
                self.register_pending_crossings(id);
                log::info!("Neue Schiene {id} mit Zug aufgegleist");
            }
            TrackCommit::Merged { id, remap } => {
                for train in self.trains.iter_mut().filter(|t| t.track_id == id) {
                    train.fraction = remap.apply(train.fraction);
                }
                self.register_pending_crossings(id);
                log::info!("Schiene in {id} verschmolzen");
            }
            TrackCommit::Discarded => {
                self.pending_crossings.clear();
            }
        }
        commit
    }

    fn register_pending_crossings(&mut self, new_id: TrackId) {
        for crossing in std::mem::take(&mut self.pending_crossings) {
            self.tracks
                .register_junction(crossing.position, crossing.other, new_id);
        }
    }

    // ── Dekorationen und Flaggen ────────────────────────────────────

    /// Platziert eine Dekoration, wenn eine Schiene nah genug liegt.
    pub fn place_decoration(&mut self, kind: DecorationKind, position: Vec2) -> bool {
        let Some((track_id, dist)) = self.tracks.distance_to_nearest_track_point(position) else {
            return false;
        };
        if dist > DECORATION_MAX_TRACK_DISTANCE {
            return false;
        }
        self.decorations.push(TrackDecoration {
            kind,
            position,
            track_id,
            size: 30.0,
        });
        true
    }

    /// Prüft einen Klick gegen die Flaggen aller Schienenenden.
    ///
    /// Grün hängt einen zufälligen Wagen an, Rot koppelt den letzten ab.
    /// Gibt `true` zurück, wenn der Klick verbraucht wurde.
    pub fn handle_flag_click(&mut self, point: Vec2, rng: &mut impl Rng) -> bool {
        let mut treffer: Option<(TrackId, bool)> = None;

        for train in &self.trains {
            let Some(track) = self.tracks.get(train.track_id) else {
                continue;
            };
            let Some(endpoint) = track.end() else { continue };

            let green = endpoint + Vec2::new(32.0, -40.0);
            if point.distance(green) < 20.0 {
                treffer = Some((train.track_id, true));
                break;
            }
            if !train.cars.is_empty() {
                let red = endpoint + Vec2::new(57.0, -40.0);
                if point.distance(red) < 20.0 {
                    treffer = Some((train.track_id, false));
                    break;
                }
            }
        }

        let Some((track_id, anhaengen)) = treffer else {
            return false;
        };
        if let Some(train) = self.trains.iter_mut().find(|t| t.track_id == track_id) {
            if anhaengen {
                train.cars.push(TrainCar::random(train.color, rng));
            } else {
                train.cars.pop();
            }
        }
        true
    }

    // ── Naturstempel ────────────────────────────────────────────────

    /// Stempelt eine Blume, gedrosselt auf [`FLOWER_INTERVAL_FRAMES`].
    pub fn add_flower(&mut self, position: Vec2, brush_size: f32, rng: &mut impl Rng) -> bool {
        if !self.throttle_ready(self.last_flower_frame, FLOWER_INTERVAL_FRAMES) {
            return false;
        }
        self.last_flower_frame = Some(self.frame);

        self.flowers.push(Flower {
            position,
            size: (brush_size * 0.6).max(12.0),
            petal_color: crate::shared::colors::pick(
                &crate::shared::colors::FLOWER_PETAL_COLORS,
                rng,
            ),
            phase: rng.random_range(0.0..std::f32::consts::TAU),
            age_frames: 0,
        });
        true
    }

    /// Stempelt drei bis sechs Grashalme, gedrosselt auf
    /// [`GRASS_INTERVAL_FRAMES`].
    pub fn add_grass(&mut self, position: Vec2, brush_size: f32, rng: &mut impl Rng) -> bool {
        if !self.throttle_ready(self.last_grass_frame, GRASS_INTERVAL_FRAMES) {
            return false;
        }
        self.last_grass_frame = Some(self.frame);

        let height = brush_size * 1.5;
        let blades = rng.random_range(3..=6);
        for _ in 0..blades {
            self.grass.push(GrassBlade {
                position: position + Vec2::new(rng.random_range(-0.5..0.5) * brush_size, 0.0),
                height: height * (0.7 + rng.random_range(0.0..0.6)),
                width: 2.0 + rng.random_range(0.0..2.0),
                phase: rng.random_range(0.0..std::f32::consts::TAU),
                age_frames: 0,
            });
        }
        true
    }

    fn throttle_ready(&self, last: Option<u64>, interval: u64) -> bool {
        match last {
            Some(frame) => self.frame.saturating_sub(frame) >= interval,
            None => true,
        }
    }

    // ── Wackellinien ────────────────────────────────────────────────

    pub fn begin_wiggly(&mut self, start: Vec2, color: Rgba<u8>, brush_size: f32) {
        let mut line = WigglyLine::new(color, brush_size);
        line.push(start, None);
        self.current_wiggly = Some(line);
    }

    pub fn extend_wiggly(&mut self, point: Vec2, point_color: Option<Rgba<u8>>) {
        if let Some(line) = &mut self.current_wiggly {
            line.push(point, point_color);
        }
    }

    /// Übernimmt die laufende Wackellinie in den Dauerbestand.
    pub fn finish_wiggly(&mut self) {
        if let Some(line) = self.current_wiggly.take() {
            if line.points.len() >= 2 {
                self.wiggly_lines.push(line);
            }
        }
    }
}
