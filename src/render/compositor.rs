//! Baut das Overlay jedes Frame komplett neu aus dem Modellzustand auf.
//!
//! Die Überlagerung ist reiner Abdruck der Szene, es wird nie etwas
//! zurückgelesen. Reihenfolge von unten nach oben: Schnappanzeige,
//! Wackellinien, Blumen, Gras, Züge samt Wagen, Partikel,
//! Weichenmarker, Endpunktfahnen.

use glam::Vec2;
use image::RgbaImage;

use crate::core::scene::Scene;
use crate::render::{entity_renderer, nature_renderer, raster, track_renderer, train_renderer};

/// Zeichnet die Szene frisch auf das geleerte Overlay.
///
/// `snap_point` ist der aktuell angepeilte Einrastpunkt des
/// Schienenwerkzeugs, `brush_size` die momentane Pinselgröße (Ballons
/// skalieren ihre Schnur damit).
pub fn render_overlay(
    overlay: &mut RgbaImage,
    scene: &Scene,
    snap_point: Option<Vec2>,
    brush_size: f32,
    show_junction_markers: bool,
) {
    raster::clear(overlay);

    if let Some(point) = snap_point {
        track_renderer::draw_snap_indicator(overlay, point, scene.frame);
    }

    for line in &scene.wiggly_lines {
        nature_renderer::draw_wiggly_line(overlay, line);
    }
    if let Some(line) = &scene.current_wiggly {
        nature_renderer::draw_wiggly_line(overlay, line);
    }
    for flower in &scene.flowers {
        nature_renderer::draw_flower(overlay, flower, scene.frame);
    }
    for blade in &scene.grass {
        nature_renderer::draw_grass_blade(overlay, blade, scene.frame);
    }

    // Züge unter den Partikeln, damit Rauch und Funken darüberziehen.
    for train in &scene.trains {
        let Some(track) = scene.tracks.get(train.track_id) else {
            continue;
        };
        let Some(sample) = track.sample(train.fraction) else {
            continue;
        };
        train_renderer::draw_train(overlay, sample.position, sample.heading, train);
        if !train.cars.is_empty() {
            train_renderer::draw_train_cars(overlay, track, train, scene.frame);
        }
    }

    for entity in &scene.entities {
        entity_renderer::draw_entity(overlay, entity, brush_size);
    }

    if show_junction_markers {
        track_renderer::draw_junction_markers(overlay, scene.tracks.junctions(), scene.frame);
    }
    track_renderer::draw_track_flags(overlay, scene);
}

/// Basis plus Overlay als fertiges Bild.
pub fn present(base: &RgbaImage, overlay: &RgbaImage) -> RgbaImage {
    let mut out = base.clone();
    raster::composite_over(&mut out, overlay);
    out
}
