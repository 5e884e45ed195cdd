//! Malwerkzeuge für die persistente Basis.
//!
//! `stroke` enthält die Strichwerkzeuge, `fill` den Farbeimer,
//! `smudge` die Wischwerkzeuge. Alle zeichnen sofort beim
//! Zeigerereignis, nicht im Frame-Takt.

pub mod fill;
pub mod smudge;
pub mod stroke;

use image::Rgba;

use crate::shared::colors;

/// Grad, um die sich der Regenbogen-Farbton pro Abruf weiterdreht.
const RAINBOW_HUE_STEP: f32 = 8.0;

/// Liefert die Strichfarbe für ein Werkzeug.
///
/// Im Regenbogenmodus dreht jeder Abruf den Farbton weiter; Werkzeuge,
/// die mehrfach pro Ereignis abrufen (Sprüher je Punkt, Spiegelmalerei
/// je Sektor), bekommen dadurch ihren typischen Farbfächer. Der
/// Aufrufer liest den Farbton am Ende zurück, damit der Verlauf über
/// Striche hinweg weiterläuft.
#[derive(Debug, Clone)]
pub struct ColorSource {
    color: Rgba<u8>,
    rainbow: bool,
    hue: f32,
}

impl ColorSource {
    pub fn fixed(color: Rgba<u8>) -> Self {
        Self {
            color,
            rainbow: false,
            hue: 0.0,
        }
    }

    pub fn rainbow(start_hue: f32) -> Self {
        Self {
            color: colors::WHITE,
            rainbow: true,
            hue: start_hue,
        }
    }

    /// Nächste Strichfarbe.
    pub fn next(&mut self) -> Rgba<u8> {
        if !self.rainbow {
            return self.color;
        }
        self.hue += RAINBOW_HUE_STEP;
        if self.hue > 360.0 {
            self.hue = 0.0;
        }
        colors::hsl_to_rgba(self.hue, 1.0, 0.5)
    }

    /// Aktueller Farbtonstand für den nächsten Strich.
    pub fn hue(&self) -> f32 {
        self.hue
    }
}
