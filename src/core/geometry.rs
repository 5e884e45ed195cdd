//! Reine Geometrie-Funktionen für Polylinien und Segmente.
//!
//! Layer-neutral: wird von Schienenbau, Simulation und Renderer
//! importiert, ohne Zirkel-Abhängigkeiten zu erzeugen.

use glam::Vec2;

/// Segmente mit |Determinante| unterhalb dieser Schwelle gelten als parallel.
pub const PARALLEL_EPSILON: f32 = 1e-3;

/// Position plus Blickrichtung an einem Punkt entlang einer Polylinie.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathSample {
    pub position: Vec2,
    /// Richtung in Radiant, 0 zeigt nach rechts, positive Werte nach unten.
    pub heading: f32,
}

/// Approximierte Länge einer Polylinie.
pub fn polyline_length(points: &[Vec2]) -> f32 {
    points.windows(2).map(|w| w[0].distance(w[1])).sum()
}

/// Punkt und Richtung bei `fraction` ∈ [0, 1] entlang der Polylinie.
///
/// Das tragende Segment ist `floor(fraction · (n − 1))`, innerhalb wird
/// linear interpoliert. `fraction` wird geklemmt, `1.0` liefert exakt den
/// letzten Punkt. Unter zwei Punkten gibt es keine Richtung: `None`.
pub fn sample_at_fraction(points: &[Vec2], fraction: f32) -> Option<PathSample> {
    if points.len() < 2 {
        return None;
    }
    let span = (points.len() - 1) as f32;
    let scaled = fraction.clamp(0.0, 1.0) * span;
    let seg = (scaled.floor() as usize).min(points.len() - 2);
    let t = scaled - seg as f32;

    let a = points[seg];
    let b = points[seg + 1];
    Some(PathSample {
        position: a.lerp(b, t),
        heading: direction_of(a, b),
    })
}

/// Richtung von `from` nach `to` in Radiant.
pub fn direction_of(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    d.y.atan2(d.x)
}

/// Schnittpunkt der Segmente `a1→a2` und `b1→b2`.
///
/// `None` bei nahezu parallelen Segmenten oder wenn der Schnitt außerhalb
/// eines der beiden Segmente liegt.
pub fn segment_intersection(a1: Vec2, a2: Vec2, b1: Vec2, b2: Vec2) -> Option<Vec2> {
    let denom = (a1.x - a2.x) * (b1.y - b2.y) - (a1.y - a2.y) * (b1.x - b2.x);
    if denom.abs() < PARALLEL_EPSILON {
        return None;
    }

    let t = ((a1.x - b1.x) * (b1.y - b2.y) - (a1.y - b1.y) * (b1.x - b2.x)) / denom;
    let u = -((a1.x - a2.x) * (a1.y - b1.y) - (a1.y - a2.y) * (a1.x - b1.x)) / denom;

    if (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u) {
        Some(a1 + t * (a2 - a1))
    } else {
        None
    }
}

/// Betrag der Richtungsänderung zwischen zwei Winkeln, normalisiert auf [0, π].
pub fn turn_angle(prev_heading: f32, next_heading: f32) -> f32 {
    let mut diff = (next_heading - prev_heading).abs();
    while diff > std::f32::consts::PI {
        diff = std::f32::consts::TAU - diff;
    }
    diff
}

/// Punkt auf einer quadratischen Bézier-Kurve (t ∈ [0, 1]).
///
/// Stiele von Blumen und Grashalmen biegen sich über den Kontrollpunkt.
pub fn quadratic_point(p0: Vec2, p1: Vec2, p2: Vec2, t: f32) -> Vec2 {
    let inv = 1.0 - t;
    inv * inv * p0 + 2.0 * inv * t * p1 + t * t * p2
}

/// Übersetzt einen lokalen Offset in Weltkoordinaten um `origin`, gedreht um `angle`.
pub fn local_to_world(origin: Vec2, angle: f32, local: Vec2) -> Vec2 {
    origin + Vec2::from_angle(angle).rotate(local)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn laenge_einer_polylinie() {
        let punkte = [
            Vec2::new(0.0, 0.0),
            Vec2::new(100.0, 0.0),
            Vec2::new(100.0, 100.0),
        ];
        assert_relative_eq!(polyline_length(&punkte), 200.0);
        assert_eq!(polyline_length(&punkte[..1]), 0.0);
        assert_eq!(polyline_length(&[]), 0.0);
    }

    #[test]
    fn sample_an_den_raendern() {
        let punkte = [Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0), Vec2::new(10.0, 10.0)];
        let start = sample_at_fraction(&punkte, 0.0).expect("Sample erwartet");
        assert_relative_eq!(start.position.x, 0.0);
        assert_relative_eq!(start.heading, 0.0);

        let ende = sample_at_fraction(&punkte, 1.0).expect("Sample erwartet");
        assert_relative_eq!(ende.position.x, 10.0);
        assert_relative_eq!(ende.position.y, 10.0);
        assert_relative_eq!(ende.heading, std::f32::consts::FRAC_PI_2);
    }

    #[test]
    fn sample_in_der_mitte() {
        let punkte = [Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0), Vec2::new(10.0, 10.0)];
        let mitte = sample_at_fraction(&punkte, 0.5).expect("Sample erwartet");
        assert_relative_eq!(mitte.position.x, 10.0);
        assert_relative_eq!(mitte.position.y, 0.0);
    }

    #[test]
    fn sample_braucht_zwei_punkte() {
        assert!(sample_at_fraction(&[Vec2::ZERO], 0.5).is_none());
        assert!(sample_at_fraction(&[], 0.0).is_none());
    }

    #[test]
    fn kreuzende_segmente_schneiden_sich() {
        let schnitt = segment_intersection(
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 10.0),
            Vec2::new(0.0, 10.0),
            Vec2::new(10.0, 0.0),
        )
        .expect("Schnittpunkt erwartet");
        assert_relative_eq!(schnitt.x, 5.0);
        assert_relative_eq!(schnitt.y, 5.0);
    }

    #[test]
    fn parallele_segmente_schneiden_nicht() {
        assert!(segment_intersection(
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(0.0, 5.0),
            Vec2::new(10.0, 5.0),
        )
        .is_none());
        // Kollinear zählt ebenfalls als parallel.
        assert!(segment_intersection(
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(5.0, 0.0),
            Vec2::new(15.0, 0.0),
        )
        .is_none());
    }

    #[test]
    fn schnitt_ausserhalb_der_segmente() {
        assert!(segment_intersection(
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(20.0, -5.0),
            Vec2::new(20.0, 5.0),
        )
        .is_none());
    }

    #[test]
    fn turn_angle_wickelt_um() {
        let fast_voll = turn_angle(-3.1, 3.1);
        assert!(fast_voll < 0.1, "Winkel über ±π muss klein bleiben: {fast_voll}");
        assert_relative_eq!(turn_angle(0.0, std::f32::consts::FRAC_PI_2), std::f32::consts::FRAC_PI_2);
    }

    #[test]
    fn quadratische_kurve_mittelpunkt() {
        let p = quadratic_point(Vec2::ZERO, Vec2::new(5.0, 10.0), Vec2::new(10.0, 0.0), 0.5);
        assert_relative_eq!(p.x, 5.0);
        assert_relative_eq!(p.y, 5.0);
    }

    #[test]
    fn lokale_offsets_rotieren_mit() {
        let welt = local_to_world(
            Vec2::new(100.0, 100.0),
            std::f32::consts::FRAC_PI_2,
            Vec2::new(10.0, 0.0),
        );
        assert_relative_eq!(welt.x, 100.0, epsilon = 1e-4);
        assert_relative_eq!(welt.y, 110.0, epsilon = 1e-4);
    }
}
