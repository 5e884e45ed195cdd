//! Schienen-Arena: stabile IDs, Punktfilter, Verschmelzen und Kreuzungen.
//!
//! Schienen leben in einer ID-indizierten Arena. Verschmelzungen behalten
//! die ID der bestehenden Schiene, damit gebundene Züge nicht umgehängt
//! werden müssen; ihre Fraktion wird über [`FractionRemap`] übertragen.

use std::fmt;

use glam::Vec2;
use indexmap::IndexMap;

use crate::core::geometry::{self, PathSample};
use crate::core::spatial::{EndpointIndex, EndpointMatch};
use crate::shared::options::{
    JUNCTION_DEDUP_RADIUS, JUNCTION_ENDPOINT_CLEARANCE, TRACK_MIN_POINT_SPACING,
    TRACK_SHARP_TURN_DISTANCE, TRACK_SHARP_TURN_MAX_ANGLE,
};

/// Stabile ID einer Schiene, bleibt über Verschmelzungen erhalten.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TrackId(pub u64);

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Eine gezeichnete Schiene als Polylinie.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    pub id: TrackId,
    pub points: Vec<Vec2>,
}

impl Track {
    pub fn new(id: TrackId, points: Vec<Vec2>) -> Self {
        Self { id, points }
    }

    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    /// Bogenlänge der Schiene in Pixeln.
    pub fn length(&self) -> f32 {
        geometry::polyline_length(&self.points)
    }

    pub fn start(&self) -> Option<Vec2> {
        self.points.first().copied()
    }

    pub fn end(&self) -> Option<Vec2> {
        self.points.last().copied()
    }

    /// Position und Richtung bei `fraction` ∈ [0, 1] entlang der Schiene.
    pub fn sample(&self, fraction: f32) -> Option<PathSample> {
        geometry::sample_at_fraction(&self.points, fraction)
    }
}

/// Prüfergebnis für einen Kandidatenpunkt während des Zeichnens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointAcceptance {
    Accepted,
    /// Näher als [`TRACK_MIN_POINT_SPACING`] am letzten Punkt.
    TooClose,
    /// Richtungsänderung über dem Limit bei zu kurzem Abstand.
    SharpTurn,
}

/// Entscheidet, ob ein Kandidatenpunkt an die laufende Schiene angehängt wird.
///
/// Zu dichte Punkte und scharfe Knicke unterhalb von
/// [`TRACK_SHARP_TURN_DISTANCE`] werden verworfen, weitläufige Kurven
/// bleiben erlaubt.
pub fn filter_track_point(points: &[Vec2], candidate: Vec2) -> PointAcceptance {
    let Some(&last) = points.last() else {
        return PointAcceptance::Accepted;
    };

    let dist = last.distance(candidate);
    if dist < TRACK_MIN_POINT_SPACING {
        return PointAcceptance::TooClose;
    }

    if points.len() >= 2 {
        let prev_heading = geometry::direction_of(points[points.len() - 2], last);
        let next_heading = geometry::direction_of(last, candidate);
        let turn = geometry::turn_angle(prev_heading, next_heading);
        if turn > TRACK_SHARP_TURN_MAX_ANGLE && dist < TRACK_SHARP_TURN_DISTANCE {
            return PointAcceptance::SharpTurn;
        }
    }

    PointAcceptance::Accepted
}

/// Überträgt eine Fraktion von der alten auf die verschmolzene Schiene.
///
/// Die Pixelposition des Zugs bleibt dabei stabil: erst wird die Fraktion
/// in einen Bogenlängen-Offset übersetzt, dann in die neue Geometrie
/// eingehängt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FractionRemap {
    /// Bogenlänge der Schiene vor dem Verschmelzen.
    pub old_length: f32,
    /// Bogenlänge der verschmolzenen Schiene.
    pub new_length: f32,
    /// Bogenlänge, die in der neuen Schiene vor dem alten Anteil liegt.
    pub prefix_length: f32,
    /// Alte Punktfolge liegt in der neuen Schiene rückwärts.
    pub reversed: bool,
}

impl FractionRemap {
    pub fn apply(&self, fraction: f32) -> f32 {
        if self.new_length <= f32::EPSILON {
            return 0.0;
        }
        let mut offset = fraction.clamp(0.0, 1.0) * self.old_length;
        if self.reversed {
            offset = self.old_length - offset;
        }
        ((self.prefix_length + offset) / self.new_length).clamp(0.0, 1.0)
    }
}

/// Ergebnis beim Abschließen einer gezeichneten Schiene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrackCommit {
    /// Unter zwei Punkten, nichts übernommen.
    Discarded,
    /// Neue eigenständige Schiene.
    Created(TrackId),
    /// In eine bestehende Schiene eingeflossen.
    Merged { id: TrackId, remap: FractionRemap },
}

/// Kreuzung zweier Schienen, beim Zeichnen erkannt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackJunction {
    pub position: Vec2,
    /// Die beiden beteiligten Schienen.
    pub tracks: (TrackId, TrackId),
}

/// Schnittpunkt eines Zeichensegments mit einer bestehenden Schiene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackCrossing {
    pub position: Vec2,
    pub other: TrackId,
}

/// Arena aller Schienen samt Kreuzungen und Endpunkt-Index.
#[derive(Debug, Clone)]
pub struct TrackMap {
    tracks: IndexMap<TrackId, Track>,
    junctions: Vec<TrackJunction>,
    endpoints: EndpointIndex,
    next_id: u64,
}

impl Default for TrackMap {
    fn default() -> Self {
        Self::new()
    }
}

impl TrackMap {
    pub fn new() -> Self {
        Self {
            tracks: IndexMap::new(),
            junctions: Vec::new(),
            endpoints: EndpointIndex::empty(),
            next_id: 1,
        }
    }

    pub fn track_count(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn get(&self, id: TrackId) -> Option<&Track> {
        self.tracks.get(&id)
    }

    pub fn tracks(&self) -> impl Iterator<Item = &Track> {
        self.tracks.values()
    }

    pub fn junctions(&self) -> &[TrackJunction] {
        &self.junctions
    }

    /// Rastet den Startpunkt einer neuen Schiene auf ein Endpunkt im Radius ein.
    pub fn snap_start_point(&self, point: Vec2, radius: f32) -> Vec2 {
        match self.endpoints.nearest_within(point, radius) {
            Some(m) => m.position,
            None => point,
        }
    }

    /// Nächster Schienen-Endpunkt innerhalb des Radius.
    pub fn find_nearby_endpoint(&self, point: Vec2, radius: f32) -> Option<EndpointMatch> {
        self.endpoints.nearest_within(point, radius)
    }

    /// Kürzeste Distanz von `point` zu irgendeinem Schienenpunkt.
    ///
    /// Linearer Scan über alle Punkte; wird nur beim Platzieren von
    /// Dekorationen gebraucht.
    pub fn distance_to_nearest_track_point(&self, point: Vec2) -> Option<(TrackId, f32)> {
        let mut best: Option<(TrackId, f32)> = None;
        for track in self.tracks.values() {
            for p in &track.points {
                let d = p.distance(point);
                if best.map_or(true, |(_, bd)| d < bd) {
                    best = Some((track.id, d));
                }
            }
        }
        best
    }

    /// Erster Schnittpunkt des Segments `a→b` mit einer bestehenden Schiene.
    ///
    /// Schnitte näher als [`JUNCTION_ENDPOINT_CLEARANCE`] an einem der vier
    /// Segmentenden zählen nicht: dort berühren sich Schienen regulär.
    pub fn find_crossing(&self, a: Vec2, b: Vec2) -> Option<TrackCrossing> {
        for track in self.tracks.values() {
            for w in track.points.windows(2) {
                let Some(hit) = geometry::segment_intersection(a, b, w[0], w[1]) else {
                    continue;
                };
                let clear = [a, b, w[0], w[1]]
                    .iter()
                    .all(|p| p.distance(hit) > JUNCTION_ENDPOINT_CLEARANCE);
                if clear {
                    return Some(TrackCrossing {
                        position: hit,
                        other: track.id,
                    });
                }
            }
        }
        None
    }

    /// Registriert eine Kreuzung, deduplikiert innerhalb von
    /// [`JUNCTION_DEDUP_RADIUS`].
    pub fn register_junction(&mut self, position: Vec2, a: TrackId, b: TrackId) -> bool {
        let doppelt = self
            .junctions
            .iter()
            .any(|j| j.position.distance(position) < JUNCTION_DEDUP_RADIUS);
        if doppelt {
            return false;
        }
        self.junctions.push(TrackJunction {
            position,
            tracks: (a, b),
        });
        true
    }

    /// Fügt eine fertige Punktfolge als eigenständige Schiene ein.
    pub fn insert(&mut self, points: Vec<Vec2>) -> Option<TrackId> {
        if points.len() < 2 {
            return None;
        }
        let id = TrackId(self.next_id);
        self.next_id += 1;
        self.tracks.insert(id, Track::new(id, points));
        self.rebuild_endpoints();
        Some(id)
    }

    /// Schließt eine gezeichnete Schiene ab und verschmilzt sie, wenn ein
    /// Ende auf ein bestehendes Schienenende eingerastet ist.
    ///
    /// Beim Verschmelzen bleibt die Punktsumme beider Folgen erhalten, der
    /// Nahtpunkt taucht doppelt auf und trägt keine Länge bei.
    pub fn commit(&mut self, candidate: Vec<Vec2>, snap_radius: f32) -> TrackCommit {
        if candidate.len() < 2 {
            return TrackCommit::Discarded;
        }

        let mut points = candidate;
        let start_snap = self.endpoints.nearest_within(points[0], snap_radius);
        let end_snap = self
            .endpoints
            .nearest_within(points[points.len() - 1], snap_radius);

        // Eingerastete Enden übernehmen die exakten Endpunkt-Koordinaten.
        if let Some(s) = &start_snap {
            points[0] = s.position;
        }
        if let Some(e) = &end_snap {
            let last = points.len() - 1;
            points[last] = e.position;
        }
        let candidate_length = geometry::polyline_length(&points);

        match (start_snap, end_snap) {
            // Greift auch beim Ringschluss, wenn beide Enden dieselbe
            // Schiene treffen: die Endkoordinate ist dann schon gesnappt.
            (Some(s), _) => {
                let (prefix, merged) = {
                    let existing = &self.tracks[&s.track_id].points;
                    if s.at_start {
                        points.reverse();
                        points.extend_from_slice(existing);
                        (candidate_length, points)
                    } else {
                        let mut merged = existing.clone();
                        merged.extend_from_slice(&points);
                        (0.0, merged)
                    }
                };
                self.replace_points(s.track_id, merged, prefix, false)
            }
            (None, Some(e)) => {
                let (reversed, merged) = {
                    let existing = &self.tracks[&e.track_id].points;
                    if e.at_start {
                        points.extend_from_slice(existing);
                        (false, points)
                    } else {
                        let mut umgedreht = existing.clone();
                        umgedreht.reverse();
                        points.extend_from_slice(&umgedreht);
                        (true, points)
                    }
                };
                self.replace_points(e.track_id, merged, candidate_length, reversed)
            }
            (None, None) => match self.insert(points) {
                Some(id) => TrackCommit::Created(id),
                None => TrackCommit::Discarded,
            },
        }
    }

    fn replace_points(
        &mut self,
        id: TrackId,
        merged: Vec<Vec2>,
        prefix_length: f32,
        reversed: bool,
    ) -> TrackCommit {
        let old_length = self.tracks[&id].length();
        let new_length = geometry::polyline_length(&merged);
        self.tracks[&id].points = merged;
        self.rebuild_endpoints();

        TrackCommit::Merged {
            id,
            remap: FractionRemap {
                old_length,
                new_length,
                prefix_length,
                reversed,
            },
        }
    }

    fn rebuild_endpoints(&mut self) {
        self.endpoints = EndpointIndex::from_tracks(&self.tracks);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Gerade Punktfolge von `from` nach `to` mit `n` Punkten.
    fn gerade(from: Vec2, to: Vec2, n: usize) -> Vec<Vec2> {
        (0..n)
            .map(|i| from.lerp(to, i as f32 / (n - 1) as f32))
            .collect()
    }

    #[test]
    fn punktfilter_haelt_mindestabstand() {
        let punkte = vec![Vec2::new(0.0, 0.0)];
        assert_eq!(
            filter_track_point(&punkte, Vec2::new(5.0, 0.0)),
            PointAcceptance::TooClose
        );
        assert_eq!(
            filter_track_point(&punkte, Vec2::new(9.0, 0.0)),
            PointAcceptance::Accepted
        );
        assert_eq!(
            filter_track_point(&[], Vec2::new(1.0, 1.0)),
            PointAcceptance::Accepted
        );
    }

    #[test]
    fn scharfe_kurve_nur_bei_kurzem_abstand_verworfen() {
        let punkte = vec![Vec2::new(0.0, 0.0), Vec2::new(20.0, 0.0)];
        // 90°-Knick bei 10 Pixeln Abstand: verworfen.
        assert_eq!(
            filter_track_point(&punkte, Vec2::new(20.0, 10.0)),
            PointAcceptance::SharpTurn
        );
        // Gleicher Knick bei 20 Pixeln: erlaubt, weite Kurven sind ok.
        assert_eq!(
            filter_track_point(&punkte, Vec2::new(20.0, 20.0)),
            PointAcceptance::Accepted
        );
        // Leichte Kurve bei kurzem Abstand bleibt erlaubt.
        assert_eq!(
            filter_track_point(&punkte, Vec2::new(29.0, 3.0)),
            PointAcceptance::Accepted
        );
    }

    #[test]
    fn commit_ohne_snap_erzeugt_neue_schiene() {
        let mut map = TrackMap::new();
        let commit = map.commit(gerade(Vec2::ZERO, Vec2::new(100.0, 0.0), 11), 30.0);

        assert_eq!(commit, TrackCommit::Created(TrackId(1)));
        assert_eq!(map.track_count(), 1);
        assert_relative_eq!(map.get(TrackId(1)).expect("Schiene erwartet").length(), 100.0);
    }

    #[test]
    fn zu_kurze_schiene_wird_verworfen() {
        let mut map = TrackMap::new();
        assert_eq!(map.commit(vec![Vec2::ZERO], 30.0), TrackCommit::Discarded);
        assert!(map.is_empty());
    }

    #[test]
    fn verschmelzen_erhaelt_punktsumme_und_laenge() {
        let mut map = TrackMap::new();
        let erste = gerade(Vec2::ZERO, Vec2::new(100.0, 0.0), 11);
        map.commit(erste, 30.0);

        // Zweite Schiene beginnt knapp neben dem Ende der ersten.
        let zweite = gerade(Vec2::new(102.0, 3.0), Vec2::new(200.0, 0.0), 11);
        let commit = map.commit(zweite, 30.0);

        let TrackCommit::Merged { id, remap } = commit else {
            panic!("Verschmelzen erwartet, war {commit:?}");
        };
        assert_eq!(id, TrackId(1));
        assert_eq!(map.track_count(), 1);

        let schiene = map.get(id).expect("Schiene erwartet");
        assert_eq!(schiene.point_count(), 22);
        assert_relative_eq!(schiene.length(), 198.0, epsilon = 1.0);
        assert_relative_eq!(remap.new_length, schiene.length());
    }

    #[test]
    fn remap_haelt_pixelposition_stabil() {
        // Alte Schiene (100 px) wandert ans Ende einer 150-px-Naht.
        let remap = FractionRemap {
            old_length: 100.0,
            new_length: 150.0,
            prefix_length: 50.0,
            reversed: false,
        };
        assert_relative_eq!(remap.apply(0.0), 50.0 / 150.0);
        assert_relative_eq!(remap.apply(0.5), 100.0 / 150.0);
        assert_relative_eq!(remap.apply(1.0), 1.0);

        let rueckwaerts = FractionRemap {
            reversed: true,
            ..remap
        };
        assert_relative_eq!(rueckwaerts.apply(0.0), 1.0);
        assert_relative_eq!(rueckwaerts.apply(1.0), 50.0 / 150.0);
    }

    #[test]
    fn start_snap_uebernimmt_endpunktkoordinate() {
        let mut map = TrackMap::new();
        map.commit(gerade(Vec2::ZERO, Vec2::new(100.0, 0.0), 11), 30.0);

        let start = map.snap_start_point(Vec2::new(95.0, 8.0), 30.0);
        assert_relative_eq!(start.x, 100.0);
        assert_relative_eq!(start.y, 0.0);

        // Außerhalb des Radius bleibt der Punkt unverändert.
        let frei = map.snap_start_point(Vec2::new(400.0, 200.0), 30.0);
        assert_relative_eq!(frei.x, 400.0);
    }

    #[test]
    fn kreuzung_meidet_segmentenden() {
        let mut map = TrackMap::new();
        map.commit(gerade(Vec2::new(0.0, 50.0), Vec2::new(100.0, 50.0), 11), 30.0);

        // Mitten durch die Schiene: Kreuzung.
        let treffer = map.find_crossing(Vec2::new(55.0, 0.0), Vec2::new(55.0, 100.0));
        let kreuzung = treffer.expect("Kreuzung erwartet");
        assert_relative_eq!(kreuzung.position.y, 50.0);

        // Schnitt direkt am Segmentende zählt nicht.
        assert!(map
            .find_crossing(Vec2::new(0.0, 46.0), Vec2::new(8.0, 52.0))
            .is_none());
    }

    #[test]
    fn kreuzungen_werden_dedupliziert() {
        let mut map = TrackMap::new();
        let a = map.insert(gerade(Vec2::ZERO, Vec2::new(100.0, 0.0), 11)).unwrap();
        let b = map
            .insert(gerade(Vec2::new(50.0, -50.0), Vec2::new(50.0, 50.0), 11))
            .unwrap();

        assert!(map.register_junction(Vec2::new(50.0, 0.0), a, b));
        assert!(!map.register_junction(Vec2::new(53.0, 4.0), a, b));
        assert!(map.register_junction(Vec2::new(80.0, 0.0), a, b));
        assert_eq!(map.junctions().len(), 2);
    }

    #[test]
    fn ring_schliessen_verschmilzt_in_dieselbe_schiene() {
        let mut map = TrackMap::new();
        map.commit(gerade(Vec2::ZERO, Vec2::new(100.0, 0.0), 11), 30.0);

        // Bogen vom Ende zurück zum Anfang derselben Schiene.
        let mut bogen = gerade(Vec2::new(100.0, 5.0), Vec2::new(50.0, 60.0), 6);
        bogen.extend(gerade(Vec2::new(40.0, 60.0), Vec2::new(0.0, 5.0), 6));
        let commit = map.commit(bogen, 30.0);

        assert!(matches!(commit, TrackCommit::Merged { id: TrackId(1), .. }));
        assert_eq!(map.track_count(), 1);
    }
}
