//! Spatial-Index (KD-Tree) für schnelle Endpunkt-Abfragen beim Schienenbau.

use glam::Vec2;
use indexmap::IndexMap;
use kiddo::{KdTree, SquaredEuclidean};

use crate::core::track::{Track, TrackId};

/// Ergebnis einer Distanzabfrage gegen den Endpunkt-Index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EndpointMatch {
    /// Schiene, zu der der Endpunkt gehört
    pub track_id: TrackId,
    /// `true` für den Anfang der Schiene, `false` für das Ende
    pub at_start: bool,
    /// Weltposition des Endpunkts
    pub position: Vec2,
    /// Euklidische Distanz zum Suchpunkt
    pub distance: f32,
}

/// Read-only Spatial-Index über den Endpunkten aller Schienen.
///
/// Wird nach jeder Arena-Änderung neu gebaut; beim Zeichnen fragt jeder
/// Mausframe dagegen an, daher lohnt der KD-Tree gegenüber einem Scan.
#[derive(Debug, Clone)]
pub struct EndpointIndex {
    tree: KdTree<f64, 2>,
    /// Parallel zum Baum: (Schiene, Anfang?) je Eintrag.
    refs: Vec<(TrackId, bool)>,
    positions: Vec<Vec2>,
}

impl EndpointIndex {
    /// Erstellt einen leeren Index.
    pub fn empty() -> Self {
        Self {
            tree: (&Vec::<[f64; 2]>::new()).into(),
            refs: Vec::new(),
            positions: Vec::new(),
        }
    }

    /// Baut einen neuen Index aus den Endpunkten der übergebenen Schienen.
    pub fn from_tracks(tracks: &IndexMap<TrackId, Track>) -> Self {
        let mut refs = Vec::with_capacity(tracks.len() * 2);
        let mut positions = Vec::with_capacity(tracks.len() * 2);

        for (id, track) in tracks {
            let (Some(start), Some(end)) = (track.start(), track.end()) else {
                continue;
            };
            refs.push((*id, true));
            positions.push(start);
            refs.push((*id, false));
            positions.push(end);
        }

        let entries: Vec<[f64; 2]> = positions
            .iter()
            .map(|p| [p.x as f64, p.y as f64])
            .collect();
        let tree: KdTree<f64, 2> = (&entries).into();

        Self {
            tree,
            refs,
            positions,
        }
    }

    /// Gibt die Anzahl indexierter Endpunkte zurück.
    pub fn len(&self) -> usize {
        self.refs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.refs.is_empty()
    }

    /// Findet den nächsten Endpunkt zur gegebenen Position.
    pub fn nearest(&self, query: Vec2) -> Option<EndpointMatch> {
        if self.is_empty() {
            return None;
        }

        let result = self
            .tree
            .nearest_one::<SquaredEuclidean>(&[query.x as f64, query.y as f64]);
        self.match_for(result.item as usize, (result.distance as f32).sqrt())
    }

    /// Findet den nächsten Endpunkt innerhalb des Radius, sonst `None`.
    pub fn nearest_within(&self, query: Vec2, radius: f32) -> Option<EndpointMatch> {
        self.nearest(query).filter(|m| m.distance <= radius)
    }

    /// Findet alle Endpunkte innerhalb eines Radius, nach Distanz sortiert.
    pub fn within_radius(&self, query: Vec2, radius: f32) -> Vec<EndpointMatch> {
        if self.is_empty() || radius.is_sign_negative() {
            return Vec::new();
        }

        let mut results = self
            .tree
            .within::<SquaredEuclidean>(&[query.x as f64, query.y as f64], (radius * radius) as f64)
            .into_iter()
            .filter_map(|entry| {
                self.match_for(entry.item as usize, (entry.distance as f32).sqrt())
            })
            .collect::<Vec<_>>();

        results.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        results
    }

    fn match_for(&self, index: usize, distance: f32) -> Option<EndpointMatch> {
        let (track_id, at_start) = *self.refs.get(index)?;
        let position = *self.positions.get(index)?;
        Some(EndpointMatch {
            track_id,
            at_start,
            position,
            distance,
        })
    }
}
