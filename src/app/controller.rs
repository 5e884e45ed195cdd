//! Application Controller für zentrale Event-Verarbeitung.

use super::recording::{StrokeMeta, StrokeRecording};
use super::{AppIntent, AppState, Snapshot, ToolKind};
use crate::core::{emit, geometry, PointAcceptance};
use crate::paint::{self, ColorSource};
use crate::render;
use crate::shared::colors;
use crate::shared::options::{EngineOptions, LEAF_INTERVAL_FRAMES};
use anyhow::Context;
use glam::Vec2;
use image::Rgba;
use rand::Rng;
use std::path::Path;
use std::sync::Arc;

/// Orchestriert UI-Events als direkte Zustandsänderungen auf dem AppState.
#[derive(Default)]
pub struct AppController;

impl AppController {
    /// Erstellt einen neuen Controller.
    pub fn new() -> Self {
        Self
    }

    /// Verarbeitet einen Intent.
    pub fn handle_intent(
        &mut self,
        state: &mut AppState,
        intent: AppIntent,
        rng: &mut impl Rng,
    ) -> anyhow::Result<()> {
        match intent {
            // === Zeiger ===
            AppIntent::PointerPressed { position } => pointer_pressed(state, position, rng),
            AppIntent::PointerMoved { position } => pointer_moved(state, position, rng),
            AppIntent::PointerReleased => pointer_released(state, rng),

            // === Einstellungen ===
            AppIntent::SetToolRequested { tool } => set_tool(state, tool),
            AppIntent::SetColorRequested { color } => {
                state.color = color;
                state.rainbow = false;
            }
            AppIntent::SetRainbowRequested { enabled } => {
                state.rainbow = enabled;
                if enabled {
                    // Der Farbverlauf beginnt bei jedem Einschalten wieder bei Rot.
                    state.rainbow_hue = 0.0;
                }
            }
            AppIntent::SetBrushSizeRequested { size } => {
                state.brush_size = EngineOptions::clamp_brush_size(size);
            }
            AppIntent::SelectDecorationRequested { kind } => state.pending_decoration = kind,

            // === History & Fläche ===
            AppIntent::UndoRequested => undo(state),
            AppIntent::RedoRequested => redo(state),
            AppIntent::ClearCanvasRequested => clear_canvas(state),
            AppIntent::ExportPngRequested { path } => export_png(state, &path)?,

            // === Aufzeichnung ===
            AppIntent::StartRecordingRequested => state.recording.start(),
            AppIntent::StopRecordingRequested => state.recording.stop(),
            AppIntent::ReplayRequested => replay_recording(state, rng),
            AppIntent::SaveRecordingRequested { path } => save_recording(state, &path)?,
            AppIntent::LoadRecordingRequested { path } => load_recording(state, &path)?,
        }

        Ok(())
    }
}

// ── Zeiger-Lebenszyklus ─────────────────────────────────────────────────────

/// Pointer-Down: Flaggen zuerst, dann Dekorationen, dann der Strichbeginn.
fn pointer_pressed(state: &mut AppState, position: Vec2, rng: &mut impl Rng) {
    if state.scene.handle_flag_click(position, rng) {
        return;
    }

    if let Some(kind) = state.pending_decoration.take() {
        if state.scene.place_decoration(kind, position) {
            state.record_undo_snapshot();
            if let Some(decoration) = state.scene.decorations.last().copied() {
                render::draw_decoration(Arc::make_mut(&mut state.base), &decoration);
            }
        }
        return;
    }

    state.recording.start_stroke(
        StrokeMeta {
            tool: state.tool,
            color: colors::format_hex(peek_color(state)),
            size: state.brush_size,
        },
        position,
    );

    state.record_undo_snapshot();
    state.stroke.is_drawing = true;
    state.stroke.last_point = Some(position);

    let brush = state.brush_size;
    let mut source = color_source(state);
    match state.tool {
        ToolKind::Fill => {
            let farbe = source.next();
            paint::fill::flood_fill(Arc::make_mut(&mut state.base), position, farbe);
        }
        ToolKind::Spray => {
            paint::stroke::spray(Arc::make_mut(&mut state.base), position, brush, &mut source, rng);
        }
        ToolKind::Eraser => {
            paint::stroke::eraser(Arc::make_mut(&mut state.base), position, position, brush);
        }
        ToolKind::Fireworks => emit::emit_firework(&mut state.scene.entities, position, rng),
        ToolKind::TrainTrack => {
            state
                .scene
                .begin_track(position, state.options.track_snap_radius);
            state.stroke.last_tie = state.scene.current_track.last().copied();
        }
        ToolKind::BlockyBuilder => {
            state.stroke.block_size = (brush * 0.8).max(4.0);
            state.stroke.last_block = None;
            let block_size = state.stroke.block_size;
            paint::stroke::blocky_builder(
                Arc::make_mut(&mut state.base),
                position,
                block_size,
                &mut state.stroke.last_block,
                &mut source,
            );
        }
        // Alle übrigen Werkzeuge malen erst ab der ersten Bewegung.
        _ => {}
    }
    state.rainbow_hue = source.hue();
}

/// Pointer-Move: erst zeichnen, dann die Schnapp-Anzeige nachführen.
fn pointer_moved(state: &mut AppState, position: Vec2, rng: &mut impl Rng) {
    if state.stroke.is_drawing {
        draw_move(state, position, rng);
        state.recording.add_point(position);
        state.stroke.last_point = Some(position);
    }
    update_snap_candidate(state, position);
}

fn pointer_released(state: &mut AppState, rng: &mut impl Rng) {
    if !state.stroke.is_drawing {
        return;
    }

    match state.tool {
        ToolKind::WobblyCrayon => state.scene.finish_wiggly(),
        ToolKind::TrainTrack => {
            state.scene.finish_track(
                state.options.track_snap_radius,
                state.options.train_base_speed,
                state.brush_size,
                rng,
            );
        }
        _ => {}
    }

    state.recording.end_stroke();
    state.stroke.reset();
}

/// Ein Bewegungsschritt des aktiven Werkzeugs.
fn draw_move(state: &mut AppState, position: Vec2, rng: &mut impl Rng) {
    let Some(last) = state.stroke.last_point else {
        return;
    };
    let brush = state.brush_size;
    let mut source = color_source(state);

    match state.tool {
        ToolKind::Brush => {
            paint::stroke::brush_segment(
                Arc::make_mut(&mut state.base),
                last,
                position,
                brush,
                &mut source,
            );
        }
        ToolKind::Eraser => {
            paint::stroke::eraser(Arc::make_mut(&mut state.base), last, position, brush);
        }
        // Füllen wirkt nur beim Aufsetzen.
        ToolKind::Fill => {}
        ToolKind::Spray => {
            paint::stroke::spray(Arc::make_mut(&mut state.base), position, brush, &mut source, rng);
        }
        ToolKind::Neon => {
            let rainbow = state.rainbow;
            paint::stroke::neon_segment(
                Arc::make_mut(&mut state.base),
                last,
                position,
                brush,
                &mut source,
                rainbow,
            );
        }
        ToolKind::Glitter => {
            let farbe = source.next();
            emit::emit_glitter(&mut state.scene.entities, position, farbe, brush, rng);
        }
        ToolKind::Fireworks => emit::emit_firework(&mut state.scene.entities, position, rng),
        ToolKind::Bubbles => {
            let farbe = source.next();
            emit::emit_balloons(&mut state.scene.entities, position, farbe, brush, rng);
        }
        ToolKind::Confetti => emit::emit_confetti(&mut state.scene.entities, position, brush, rng),
        ToolKind::Worms => emit::emit_worms(&mut state.scene.entities, position, rng),
        ToolKind::Lightning => {
            let farbe = source.next();
            emit::emit_lightning(&mut state.scene.entities, position, farbe, brush, rng);
        }
        ToolKind::Bugs => emit::emit_bugs(&mut state.scene.entities, position, rng),
        ToolKind::Streamers => {
            emit::emit_streamers(&mut state.scene.entities, position, brush, rng);
        }
        ToolKind::WobblyCrayon => {
            if state.scene.current_wiggly.is_none() {
                let farbe = source.next();
                state.scene.begin_wiggly(position, farbe, brush);
            } else {
                let point_color = if state.rainbow { Some(source.next()) } else { None };
                state.scene.extend_wiggly(position, point_color);
            }
        }
        ToolKind::Smudge => {
            paint::smudge::smudge(Arc::make_mut(&mut state.base), position, brush, rng);
        }
        ToolKind::Blend => {
            paint::smudge::blend(Arc::make_mut(&mut state.base), position, brush);
        }
        ToolKind::TrainTrack => {
            let prev = state.scene.current_track.last().copied();
            if state.scene.try_extend_track(position) == PointAcceptance::Accepted {
                if let Some(from) = prev {
                    render::draw_track_segment(
                        Arc::make_mut(&mut state.base),
                        from,
                        position,
                        brush,
                        &mut state.stroke.last_tie,
                    );
                }
            }
        }
        ToolKind::LeafTrail => {
            let frame = state.scene.frame;
            let due = state
                .stroke
                .last_leaf_frame
                .map_or(true, |f| frame.saturating_sub(f) >= LEAF_INTERVAL_FRAMES);
            if due {
                state.stroke.last_leaf_frame = Some(frame);
                let heading = geometry::direction_of(last, position);
                paint::stroke::leaf_stamp(
                    Arc::make_mut(&mut state.base),
                    position,
                    heading,
                    brush,
                    &mut source,
                );
            }
        }
        ToolKind::FlowerChain => {
            state.scene.add_flower(position, brush, rng);
        }
        ToolKind::GrassStamper => {
            state.scene.add_grass(position, brush, rng);
        }
        ToolKind::BlockyBuilder => {
            let block_size = state.stroke.block_size;
            paint::stroke::blocky_builder(
                Arc::make_mut(&mut state.base),
                position,
                block_size,
                &mut state.stroke.last_block,
                &mut source,
            );
        }
        ToolKind::MirrorPainting => {
            let center = state.surface_center();
            paint::stroke::mirror_segment(
                Arc::make_mut(&mut state.base),
                last,
                position,
                brush,
                center,
                &mut source,
            );
        }
    }
    state.rainbow_hue = source.hue();
}

/// Hält den Schnapp-Kandidaten für die Overlay-Anzeige aktuell.
fn update_snap_candidate(state: &mut AppState, position: Vec2) {
    state.snap_candidate = if state.tool == ToolKind::TrainTrack {
        state
            .scene
            .tracks
            .find_nearby_endpoint(position, state.options.track_snap_radius)
            .map(|m| m.position)
    } else {
        None
    };
}

// ── Einstellungen und Verwaltung ────────────────────────────────────────────

fn set_tool(state: &mut AppState, tool: ToolKind) {
    if state.tool != tool {
        state.stroke.reset();
    }
    state.tool = tool;
    if tool != ToolKind::TrainTrack {
        state.pending_decoration = None;
        state.snap_candidate = None;
    }
}

fn undo(state: &mut AppState) {
    let current = Snapshot::from_state(state);
    if let Some(snap) = state.history.pop_undo_with_current(current) {
        snap.apply_to(state);
    }
}

fn redo(state: &mut AppState) {
    let current = Snapshot::from_state(state);
    if let Some(snap) = state.history.pop_redo_with_current(current) {
        snap.apply_to(state);
    }
}

/// Leert Basis und Szene in einem Schlag.
fn clear_canvas(state: &mut AppState) {
    state.record_undo_snapshot();
    for pixel in Arc::make_mut(&mut state.base).pixels_mut() {
        *pixel = colors::WHITE;
    }
    state.scene.clear();
    state.stroke.reset();
    state.snap_candidate = None;
    log::info!("Zeichenfläche geleert");
}

fn export_png(state: &AppState, path: &Path) -> anyhow::Result<()> {
    let frame = render::present(&state.base, &state.overlay);
    frame
        .save(path)
        .with_context(|| format!("PNG nach {} schreiben", path.display()))?;
    log::info!("Bild unter {} gespeichert", path.display());
    Ok(())
}

// ── Aufzeichnung ────────────────────────────────────────────────────────────

fn replay_recording(state: &mut AppState, rng: &mut impl Rng) {
    if state.recording.is_empty() {
        return;
    }
    state.record_undo_snapshot();
    state
        .recording
        .replay_onto(Arc::make_mut(&mut state.base), rng);
}

fn save_recording(state: &AppState, path: &Path) -> anyhow::Result<()> {
    let json = state.recording.to_json()?;
    std::fs::write(path, json)
        .with_context(|| format!("Aufzeichnung nach {} schreiben", path.display()))?;
    log::info!("Aufzeichnung unter {} gespeichert", path.display());
    Ok(())
}

fn load_recording(state: &mut AppState, path: &Path) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Aufzeichnung aus {} lesen", path.display()))?;
    state.recording = StrokeRecording::from_json(&text)?;
    log::info!(
        "{} Striche aus {} geladen",
        state.recording.stroke_count(),
        path.display()
    );
    Ok(())
}

// ── Farbauflösung ───────────────────────────────────────────────────────────

/// Aktive Farbe ohne Weiterdrehen des Regenbogens.
fn peek_color(state: &AppState) -> Rgba<u8> {
    if state.rainbow {
        colors::hsl_to_rgba(state.rainbow_hue, 1.0, 0.5)
    } else {
        state.color
    }
}

/// Farbquelle für einen Zeichenschritt; der Farbton wird danach
/// in den State zurückgeschrieben.
fn color_source(state: &AppState) -> ColorSource {
    if state.rainbow {
        ColorSource::rainbow(state.rainbow_hue)
    } else {
        ColorSource::fixed(state.color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn test_state() -> AppState {
        AppState::new(EngineOptions {
            surface_width: 320,
            surface_height: 240,
            ..EngineOptions::default()
        })
    }

    fn send(controller: &mut AppController, state: &mut AppState, rng: &mut StdRng, intent: AppIntent) {
        controller
            .handle_intent(state, intent, rng)
            .expect("Intent verarbeitet");
    }

    fn draw_track(controller: &mut AppController, state: &mut AppState, rng: &mut StdRng) {
        send(controller, state, rng, AppIntent::SetToolRequested { tool: ToolKind::TrainTrack });
        send(controller, state, rng, AppIntent::PointerPressed { position: Vec2::new(60.0, 100.0) });
        for i in 1..=7 {
            let x = 60.0 + i as f32 * 20.0;
            send(controller, state, rng, AppIntent::PointerMoved { position: Vec2::new(x, 100.0) });
        }
        send(controller, state, rng, AppIntent::PointerReleased);
    }

    #[test]
    fn pinselstrich_landet_auf_der_basis() {
        let mut controller = AppController::new();
        let mut state = test_state();
        let mut rng = StdRng::seed_from_u64(1);

        send(&mut controller, &mut state, &mut rng, AppIntent::SetColorRequested { color: Rgba([255, 0, 0, 255]) });
        send(&mut controller, &mut state, &mut rng, AppIntent::PointerPressed { position: Vec2::new(50.0, 50.0) });
        send(&mut controller, &mut state, &mut rng, AppIntent::PointerMoved { position: Vec2::new(90.0, 50.0) });
        send(&mut controller, &mut state, &mut rng, AppIntent::PointerReleased);

        assert_eq!(*state.base.get_pixel(70, 50), Rgba([255, 0, 0, 255]));
        assert!(state.can_undo());
        assert!(!state.stroke.is_drawing);
    }

    #[test]
    fn undo_und_redo_tauschen_die_basis() {
        let mut controller = AppController::new();
        let mut state = test_state();
        let mut rng = StdRng::seed_from_u64(1);

        send(&mut controller, &mut state, &mut rng, AppIntent::SetColorRequested { color: Rgba([0, 0, 255, 255]) });
        send(&mut controller, &mut state, &mut rng, AppIntent::PointerPressed { position: Vec2::new(20.0, 20.0) });
        send(&mut controller, &mut state, &mut rng, AppIntent::PointerMoved { position: Vec2::new(60.0, 20.0) });
        send(&mut controller, &mut state, &mut rng, AppIntent::PointerReleased);

        send(&mut controller, &mut state, &mut rng, AppIntent::UndoRequested);
        assert_eq!(*state.base.get_pixel(40, 20), colors::WHITE);
        assert!(state.can_redo());

        send(&mut controller, &mut state, &mut rng, AppIntent::RedoRequested);
        assert_eq!(*state.base.get_pixel(40, 20), Rgba([0, 0, 255, 255]));
    }

    #[test]
    fn radierer_stanzt_schon_beim_aufsetzen() {
        let mut controller = AppController::new();
        let mut state = test_state();
        let mut rng = StdRng::seed_from_u64(1);

        send(&mut controller, &mut state, &mut rng, AppIntent::SetToolRequested { tool: ToolKind::Eraser });
        send(&mut controller, &mut state, &mut rng, AppIntent::PointerPressed { position: Vec2::new(100.0, 100.0) });

        assert_eq!(state.base.get_pixel(100, 100)[3], 0);
    }

    #[test]
    fn schienenstrich_erzeugt_zug_und_gleisbett() {
        let mut controller = AppController::new();
        let mut state = test_state();
        let mut rng = StdRng::seed_from_u64(7);

        draw_track(&mut controller, &mut state, &mut rng);

        assert_eq!(state.scene.tracks.tracks().count(), 1);
        assert_eq!(state.scene.trains.len(), 1);
        assert!(state.base.pixels().any(|p| *p == colors::RAIL_SILVER));
    }

    #[test]
    fn schnappanzeige_folgt_nur_dem_schienenwerkzeug() {
        let mut controller = AppController::new();
        let mut state = test_state();
        let mut rng = StdRng::seed_from_u64(7);

        draw_track(&mut controller, &mut state, &mut rng);

        send(&mut controller, &mut state, &mut rng, AppIntent::PointerMoved { position: Vec2::new(210.0, 105.0) });
        assert!(state.snap_candidate.is_some());

        send(&mut controller, &mut state, &mut rng, AppIntent::SetToolRequested { tool: ToolKind::Brush });
        send(&mut controller, &mut state, &mut rng, AppIntent::PointerMoved { position: Vec2::new(210.0, 105.0) });
        assert!(state.snap_candidate.is_none());
    }

    #[test]
    fn flaggenklick_haengt_wagen_an_statt_zu_malen() {
        let mut controller = AppController::new();
        let mut state = test_state();
        let mut rng = StdRng::seed_from_u64(7);

        draw_track(&mut controller, &mut state, &mut rng);

        // Grüne Flagge des Endpunkts (200,100): Mittelpunkt (232,60).
        send(&mut controller, &mut state, &mut rng, AppIntent::PointerPressed { position: Vec2::new(232.0, 60.0) });

        assert_eq!(state.scene.trains[0].cars.len(), 1);
        assert!(!state.stroke.is_drawing);
    }

    #[test]
    fn feuerwerk_fuellt_nur_die_szene() {
        let mut controller = AppController::new();
        let mut state = test_state();
        let mut rng = StdRng::seed_from_u64(3);

        send(&mut controller, &mut state, &mut rng, AppIntent::SetToolRequested { tool: ToolKind::Fireworks });
        send(&mut controller, &mut state, &mut rng, AppIntent::PointerPressed { position: Vec2::new(160.0, 200.0) });
        send(&mut controller, &mut state, &mut rng, AppIntent::PointerReleased);

        assert!(!state.scene.entities.is_empty());
        assert!(state.base.pixels().all(|p| *p == colors::WHITE));
    }

    #[test]
    fn leeren_setzt_basis_und_szene_zurueck() {
        let mut controller = AppController::new();
        let mut state = test_state();
        let mut rng = StdRng::seed_from_u64(5);

        send(&mut controller, &mut state, &mut rng, AppIntent::PointerPressed { position: Vec2::new(10.0, 10.0) });
        send(&mut controller, &mut state, &mut rng, AppIntent::PointerMoved { position: Vec2::new(40.0, 10.0) });
        send(&mut controller, &mut state, &mut rng, AppIntent::PointerReleased);
        send(&mut controller, &mut state, &mut rng, AppIntent::SetToolRequested { tool: ToolKind::Confetti });
        send(&mut controller, &mut state, &mut rng, AppIntent::PointerPressed { position: Vec2::new(100.0, 100.0) });
        send(&mut controller, &mut state, &mut rng, AppIntent::PointerMoved { position: Vec2::new(110.0, 100.0) });
        send(&mut controller, &mut state, &mut rng, AppIntent::PointerReleased);

        send(&mut controller, &mut state, &mut rng, AppIntent::ClearCanvasRequested);

        assert!(state.base.pixels().all(|p| *p == colors::WHITE));
        assert!(state.scene.entities.is_empty());
        assert!(state.can_undo());
    }

    #[test]
    fn regenbogen_dreht_ueber_die_bewegung_weiter() {
        let mut controller = AppController::new();
        let mut state = test_state();
        let mut rng = StdRng::seed_from_u64(1);

        send(&mut controller, &mut state, &mut rng, AppIntent::SetRainbowRequested { enabled: true });
        send(&mut controller, &mut state, &mut rng, AppIntent::PointerPressed { position: Vec2::new(10.0, 10.0) });
        send(&mut controller, &mut state, &mut rng, AppIntent::PointerMoved { position: Vec2::new(20.0, 10.0) });
        send(&mut controller, &mut state, &mut rng, AppIntent::PointerMoved { position: Vec2::new(30.0, 10.0) });

        assert_eq!(state.rainbow_hue, 16.0);

        send(&mut controller, &mut state, &mut rng, AppIntent::SetColorRequested { color: colors::BLACK });
        assert!(!state.rainbow);
    }

    #[test]
    fn aufzeichnung_spielt_pinselstriche_identisch_ab() {
        let mut controller = AppController::new();
        let mut state = test_state();
        let mut rng = StdRng::seed_from_u64(1);

        send(&mut controller, &mut state, &mut rng, AppIntent::SetColorRequested { color: Rgba([0, 128, 0, 255]) });
        send(&mut controller, &mut state, &mut rng, AppIntent::StartRecordingRequested);
        send(&mut controller, &mut state, &mut rng, AppIntent::PointerPressed { position: Vec2::new(30.0, 30.0) });
        send(&mut controller, &mut state, &mut rng, AppIntent::PointerMoved { position: Vec2::new(80.0, 30.0) });
        send(&mut controller, &mut state, &mut rng, AppIntent::PointerMoved { position: Vec2::new(80.0, 70.0) });
        send(&mut controller, &mut state, &mut rng, AppIntent::PointerReleased);
        send(&mut controller, &mut state, &mut rng, AppIntent::StopRecordingRequested);

        let live = state.base.as_ref().clone();
        send(&mut controller, &mut state, &mut rng, AppIntent::ReplayRequested);

        assert_eq!(*state.base.as_ref(), live);
    }
}
