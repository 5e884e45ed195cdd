//! Züge, Wagen und ihre Fracht.
//!
//! Ein Zug hängt über die [`TrackId`] an genau einer Schiene und merkt
//! sich seine Position als Bruchteil der Bogenlänge. Die Bewegungs- und
//! Begegnungsregeln stehen in [`crate::core::sim`].

use image::Rgba;
use rand::Rng;

use crate::core::track::TrackId;
use crate::shared::colors;
use crate::shared::options::{CAR_LENGTH_FACTOR, TRAIN_MIN_SIZE};

/// Eine Lok samt angehängter Wagen auf einer Schiene.
#[derive(Debug, Clone, PartialEq)]
pub struct Train {
    pub track_id: TrackId,
    /// Position entlang der Schiene als Bruchteil der Bogenlänge, wickelt
    /// bei 1.0 auf 0.0 um.
    pub fraction: f32,
    /// Aktuelle Geschwindigkeit in Pixel pro Frame.
    pub speed: f32,
    /// Geschwindigkeit vor Brems- und Haltemanövern.
    pub original_speed: f32,
    pub size: f32,
    pub color: Rgba<u8>,
    pub cars: Vec<TrainCar>,
    /// Frames bis zum nächsten erlaubten Hupsignal.
    pub honk_cooldown: u32,
    /// Restliche Haltezeit an einer Station, 0 = freie Fahrt.
    pub station_timer: u32,
    /// Bleibt gesetzt, solange der Zug im Stationsradius steht, damit er
    /// pro Besuch nur einmal hält.
    pub at_station: bool,
    pub in_tunnel: bool,
}

impl Train {
    /// Stellt einen Zug mit zufälliger Farbe und Geschwindigkeitsstreuung
    /// (80 bis 120 Prozent) auf die Schiene.
    pub fn for_track(
        track_id: TrackId,
        brush_size: f32,
        base_speed: f32,
        rng: &mut impl Rng,
    ) -> Self {
        let speed = base_speed * (0.8 + rng.random_range(0.0..0.4));
        Self {
            track_id,
            fraction: 0.0,
            speed,
            original_speed: speed,
            size: (brush_size * 2.0).max(TRAIN_MIN_SIZE),
            color: colors::pick(&colors::TRAIN_COLORS, rng),
            cars: Vec::new(),
            honk_cooldown: 0,
            station_timer: 0,
            at_station: false,
            in_tunnel: false,
        }
    }

    /// Länge eines Wagens inklusive Kupplungsabstand in Pixeln.
    pub fn car_length(&self) -> f32 {
        self.size * CAR_LENGTH_FACTOR
    }

    /// Fraktion des `index`-ten Wagens hinter der Lok.
    ///
    /// Wickelt einmal um, damit Wagen hinter dem Schienenanfang am anderen
    /// Ende weiterfahren. `None` bei entarteter Schienenlänge.
    pub fn car_fraction(&self, index: usize, track_length: f32) -> Option<f32> {
        if track_length <= f32::EPSILON {
            return None;
        }
        let offset = (index + 1) as f32 * self.car_length() / track_length;
        let mut fraction = self.fraction - offset;
        if fraction < 0.0 {
            fraction += 1.0;
        }
        Some(fraction.clamp(0.0, 1.0))
    }
}

/// Ein Wagen hinter der Lok.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainCar {
    pub kind: CarKind,
    /// Grundfarbe, von der Lok geerbt.
    pub color: Rgba<u8>,
}

/// Wagenarten mit jeweils eigener Ladung.
#[derive(Debug, Clone, PartialEq)]
pub enum CarKind {
    /// Personenwagen mit drei Fenstern, teils besetzt.
    Passenger { seats: [Option<PassengerKind>; 3] },
    /// Güterwagen mit gestapelter Fracht.
    Cargo { items: Vec<CargoKind> },
    /// Silberner Kesselwagen.
    Tanker,
    /// Roter Schlusswagen mit Ausguck.
    Caboose,
}

/// Fahrgäste, die aus den Fenstern schauen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassengerKind {
    Person,
    Cat,
    Dog,
    Bear,
    Rabbit,
}

impl PassengerKind {
    pub const ALL: [PassengerKind; 5] = [
        PassengerKind::Person,
        PassengerKind::Cat,
        PassengerKind::Dog,
        PassengerKind::Bear,
        PassengerKind::Rabbit,
    ];
}

/// Frachtstücke auf einem Güterwagen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CargoKind {
    Present,
    Apple,
    Banana,
    Pumpkin,
    Star,
    Heart,
}

impl CargoKind {
    pub const ALL: [CargoKind; 6] = [
        CargoKind::Present,
        CargoKind::Apple,
        CargoKind::Banana,
        CargoKind::Pumpkin,
        CargoKind::Star,
        CargoKind::Heart,
    ];
}

impl TrainCar {
    /// Würfelt einen Wagen samt Ladung.
    ///
    /// Personenwagen sind zu 80 Prozent pro Fenster besetzt, Güterwagen
    /// starten zu 60 Prozent mit zwei bis fünf Frachtstücken.
    pub fn random(train_color: Rgba<u8>, rng: &mut impl Rng) -> Self {
        let kind = match rng.random_range(0..4) {
            0 => {
                let mut seats = [None; 3];
                for seat in &mut seats {
                    if rng.random_bool(0.8) {
                        *seat =
                            Some(PassengerKind::ALL[rng.random_range(0..PassengerKind::ALL.len())]);
                    }
                }
                CarKind::Passenger { seats }
            }
            1 => {
                let mut items = Vec::new();
                if rng.random_bool(0.6) {
                    let anzahl = rng.random_range(2..=5);
                    for _ in 0..anzahl {
                        items.push(CargoKind::ALL[rng.random_range(0..CargoKind::ALL.len())]);
                    }
                }
                CarKind::Cargo { items }
            }
            2 => CarKind::Tanker,
            _ => CarKind::Caboose,
        };

        Self {
            kind,
            color: train_color,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn zug_startet_mit_gestreuter_geschwindigkeit() {
        let mut rng = StdRng::seed_from_u64(21);
        for _ in 0..50 {
            let zug = Train::for_track(TrackId(1), 10.0, 1.0, &mut rng);
            assert!((0.8..1.2).contains(&zug.speed), "Streuung {}", zug.speed);
            assert_eq!(zug.speed, zug.original_speed);
            assert_eq!(zug.fraction, 0.0);
        }
    }

    #[test]
    fn zuggroesse_hat_untergrenze() {
        let mut rng = StdRng::seed_from_u64(2);
        let klein = Train::for_track(TrackId(1), 3.0, 1.0, &mut rng);
        assert_eq!(klein.size, TRAIN_MIN_SIZE);

        let gross = Train::for_track(TrackId(1), 20.0, 1.0, &mut rng);
        assert_eq!(gross.size, 40.0);
    }

    #[test]
    fn wagenfraktion_wickelt_um() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut zug = Train::for_track(TrackId(1), 10.0, 1.0, &mut rng);
        zug.fraction = 0.01;

        // Wagen passt nicht mehr vor den Anfang und taucht hinten auf.
        let wagen = zug.car_fraction(0, 400.0).expect("Fraktion erwartet");
        assert!(wagen > 0.8, "Umbruch erwartet, war {wagen}");

        assert!(zug.car_fraction(0, 0.0).is_none());
    }

    #[test]
    fn gewuerfelte_wagen_sind_plausibel() {
        let mut rng = StdRng::seed_from_u64(8);
        for _ in 0..100 {
            let wagen = TrainCar::random(colors::TRAIN_COLORS[0], &mut rng);
            if let CarKind::Cargo { items } = &wagen.kind {
                assert!(items.is_empty() || (2..=5).contains(&items.len()));
            }
        }
    }
}
