//! Zauberkreide Studio.
//!
//! Desktop-Shell für die Zauberkreide-Engine: Zeichenfläche, Werkzeugleiste
//! und die Frame-Schleife (Eingabe → Simulation → Compositing) auf Basis
//! von egui/eframe.

use eframe::egui;
use glam::Vec2;
use image::Rgba;
use zauberkreide::shared::colors;
use zauberkreide::shared::options::{BRUSH_SIZE_MAX, BRUSH_SIZE_MIN};
use zauberkreide::{
    advance, render, AppController, AppIntent, AppState, DecorationKind, EngineOptions,
    FrameInput, ToolKind,
};

fn main() -> Result<(), eframe::Error> {
    AppRunner::run()
}

struct AppRunner;

impl AppRunner {
    fn run() -> Result<(), eframe::Error> {
        // Logger initialisieren
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();

        log::info!("Zauberkreide Studio v{} startet...", env!("CARGO_PKG_VERSION"));

        let options = eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default()
                .with_inner_size([1500.0, 790.0])
                .with_title("Zauberkreide Studio"),
            ..Default::default()
        };

        eframe::run_native(
            "Zauberkreide Studio",
            options,
            Box::new(|_cc| Ok(Box::new(StudioApp::new()))),
        )
    }
}

/// Reihenfolge und Beschriftung der Werkzeugleiste.
const TOOL_LABELS: [(ToolKind, &str); 22] = [
    (ToolKind::Brush, "Pinsel"),
    (ToolKind::Eraser, "Radierer"),
    (ToolKind::Fill, "Füllen"),
    (ToolKind::Spray, "Sprühdose"),
    (ToolKind::Neon, "Neonstift"),
    (ToolKind::WobblyCrayon, "Wackelkreide"),
    (ToolKind::Smudge, "Verwischen"),
    (ToolKind::Blend, "Vermalen"),
    (ToolKind::MirrorPainting, "Spiegelmalerei"),
    (ToolKind::BlockyBuilder, "Bauklötze"),
    (ToolKind::Glitter, "Glitzer"),
    (ToolKind::Fireworks, "Feuerwerk"),
    (ToolKind::Bubbles, "Luftballons"),
    (ToolKind::Confetti, "Konfetti"),
    (ToolKind::Streamers, "Luftschlangen"),
    (ToolKind::Lightning, "Blitze"),
    (ToolKind::Worms, "Würmer"),
    (ToolKind::Bugs, "Käfer"),
    (ToolKind::TrainTrack, "Eisenbahn"),
    (ToolKind::LeafTrail, "Blätterspur"),
    (ToolKind::FlowerChain, "Blumenkette"),
    (ToolKind::GrassStamper, "Grasstempel"),
];

/// Auswahl im Streckendeko-Menü des Eisenbahn-Werkzeugs.
const DECORATION_LABELS: [(DecorationKind, &str); 4] = [
    (DecorationKind::Station, "Bahnhof"),
    (DecorationKind::Tunnel, "Tunnel"),
    (DecorationKind::Tree, "Baum"),
    (DecorationKind::Building, "Haus"),
];

/// Farbfelder der Seitenleiste.
const COLOR_SWATCHES: [Rgba<u8>; 12] = [
    Rgba([0, 0, 0, 255]),
    Rgba([229, 57, 53, 255]),
    Rgba([251, 140, 0, 255]),
    Rgba([253, 216, 53, 255]),
    Rgba([67, 160, 71, 255]),
    Rgba([41, 182, 246, 255]),
    Rgba([30, 136, 229, 255]),
    Rgba([142, 36, 170, 255]),
    Rgba([236, 64, 122, 255]),
    Rgba([121, 85, 72, 255]),
    Rgba([158, 158, 158, 255]),
    Rgba([255, 255, 255, 255]),
];

fn tool_label(tool: ToolKind) -> &'static str {
    TOOL_LABELS
        .iter()
        .find(|(kind, _)| *kind == tool)
        .map(|(_, label)| *label)
        .unwrap_or("?")
}

/// Haupt-Anwendungsstruktur
struct StudioApp {
    state: AppState,
    controller: AppController,
    rng: rand::rngs::ThreadRng,
    canvas_texture: Option<egui::TextureHandle>,
    last_pointer: Option<egui::Pos2>,
}

impl StudioApp {
    fn new() -> Self {
        // Optionen aus TOML laden (oder Standardwerte)
        let config_path = EngineOptions::config_path();
        let options = EngineOptions::load_from_file(&config_path);

        Self {
            state: AppState::new(options),
            controller: AppController::new(),
            rng: rand::rng(),
            canvas_texture: None,
            last_pointer: None,
        }
    }
}

impl eframe::App for StudioApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let events = self.collect_ui_events(ctx);

        self.process_events(events);

        self.advance_and_compose(ctx);

        // Partikel, Züge und die Schnapp-Anzeige animieren in jedem Frame,
        // die Schleife läuft deshalb frei durch.
        ctx.request_repaint();
    }
}

impl StudioApp {
    fn collect_ui_events(&mut self, ctx: &egui::Context) -> Vec<AppIntent> {
        let mut events = Vec::new();

        self.render_status_bar(ctx);
        events.extend(self.render_tool_panel(ctx));

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                events.extend(collect_keyboard_intents(ui));

                egui::ScrollArea::both().show(ui, |ui| {
                    let surface_size = egui::vec2(
                        self.state.options.surface_width as f32,
                        self.state.options.surface_height as f32,
                    );
                    let (rect, response) =
                        ui.allocate_exact_size(surface_size, egui::Sense::drag());

                    if let Some(texture) = &self.canvas_texture {
                        ui.painter().image(
                            texture.id(),
                            rect,
                            egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                            egui::Color32::WHITE,
                        );
                    }

                    events.extend(self.collect_pointer_events(&rect, &response));
                });
            });

        events
    }

    /// Zeiger-Ereignisse der Zeichenfläche in Flächenkoordinaten übersetzen.
    fn collect_pointer_events(
        &mut self,
        rect: &egui::Rect,
        response: &egui::Response,
    ) -> Vec<AppIntent> {
        let mut events = Vec::new();

        let to_surface = |pos: egui::Pos2| Vec2::new(pos.x - rect.min.x, pos.y - rect.min.y);

        if response.drag_started() {
            if let Some(pos) = response.interact_pointer_pos() {
                events.push(AppIntent::PointerPressed {
                    position: to_surface(pos),
                });
                self.last_pointer = Some(pos);
            }
        } else if response.dragged() {
            if let Some(pos) = response.interact_pointer_pos() {
                // Halten auf der Stelle erzeugt keine Move-Ereignisse.
                if self.last_pointer != Some(pos) {
                    events.push(AppIntent::PointerMoved {
                        position: to_surface(pos),
                    });
                    self.last_pointer = Some(pos);
                }
            }
        } else if let Some(pos) = response.hover_pos() {
            // Bewegung ohne gedrückte Taste treibt nur die Schnapp-Anzeige.
            if self.last_pointer != Some(pos) {
                events.push(AppIntent::PointerMoved {
                    position: to_surface(pos),
                });
                self.last_pointer = Some(pos);
            }
        }

        if response.drag_stopped() {
            events.push(AppIntent::PointerReleased);
        }

        events
    }

    fn render_tool_panel(&mut self, ctx: &egui::Context) -> Vec<AppIntent> {
        let mut events = Vec::new();

        egui::SidePanel::left("werkzeuge")
            .resizable(false)
            .default_width(200.0)
            .show(ctx, |ui| {
                ui.add_space(4.0);
                ui.heading("Zauberkreide");
                ui.separator();

                egui::ScrollArea::vertical().show(ui, |ui| {
                    self.tool_buttons(ui, &mut events);
                    ui.separator();
                    self.color_controls(ui, &mut events);
                    ui.separator();
                    self.brush_controls(ui, &mut events);
                    ui.separator();
                    self.history_controls(ui, &mut events);
                    ui.separator();
                    self.recording_controls(ui, &mut events);
                });
            });

        events
    }

    fn tool_buttons(&self, ui: &mut egui::Ui, events: &mut Vec<AppIntent>) {
        ui.label("Werkzeuge");
        for (tool, label) in TOOL_LABELS {
            let selected = self.state.tool == tool;
            if ui.selectable_label(selected, label).clicked() && !selected {
                events.push(AppIntent::SetToolRequested { tool });
            }
        }

        if self.state.tool == ToolKind::TrainTrack {
            ui.add_space(4.0);
            ui.label("Streckendeko");

            let none_selected = self.state.pending_decoration.is_none();
            if ui.selectable_label(none_selected, "Schiene zeichnen").clicked() && !none_selected {
                events.push(AppIntent::SelectDecorationRequested { kind: None });
            }
            for (kind, label) in DECORATION_LABELS {
                let selected = self.state.pending_decoration == Some(kind);
                if ui.selectable_label(selected, label).clicked() {
                    let kind = if selected { None } else { Some(kind) };
                    events.push(AppIntent::SelectDecorationRequested { kind });
                }
            }
        }
    }

    fn color_controls(&self, ui: &mut egui::Ui, events: &mut Vec<AppIntent>) {
        ui.label("Farben");

        ui.horizontal_wrapped(|ui| {
            ui.spacing_mut().item_spacing = egui::vec2(4.0, 4.0);
            for color in COLOR_SWATCHES {
                let fill = egui::Color32::from_rgb(color[0], color[1], color[2]);
                let selected = !self.state.rainbow && self.state.color == color;
                let stroke = if selected {
                    egui::Stroke::new(2.0, egui::Color32::WHITE)
                } else {
                    egui::Stroke::new(1.0, egui::Color32::DARK_GRAY)
                };
                let button = egui::Button::new("")
                    .fill(fill)
                    .stroke(stroke)
                    .min_size(egui::vec2(22.0, 22.0));
                if ui.add(button).clicked() {
                    events.push(AppIntent::SetColorRequested { color });
                }
            }
        });

        ui.horizontal(|ui| {
            let mut picked =
                egui::Color32::from_rgb(self.state.color[0], self.state.color[1], self.state.color[2]);
            if ui.color_edit_button_srgba(&mut picked).changed() {
                events.push(AppIntent::SetColorRequested {
                    color: Rgba([picked.r(), picked.g(), picked.b(), 255]),
                });
            }

            let mut rainbow = self.state.rainbow;
            if ui.checkbox(&mut rainbow, "Regenbogen").changed() {
                events.push(AppIntent::SetRainbowRequested { enabled: rainbow });
            }
        });
    }

    fn brush_controls(&self, ui: &mut egui::Ui, events: &mut Vec<AppIntent>) {
        let mut size = self.state.brush_size;
        let slider = egui::Slider::new(&mut size, BRUSH_SIZE_MIN..=BRUSH_SIZE_MAX)
            .text("Pinselgröße");
        if ui.add(slider).changed() {
            events.push(AppIntent::SetBrushSizeRequested { size });
        }
    }

    fn history_controls(&self, ui: &mut egui::Ui, events: &mut Vec<AppIntent>) {
        ui.horizontal(|ui| {
            if ui
                .add_enabled(self.state.can_undo(), egui::Button::new("Rückgängig"))
                .clicked()
            {
                events.push(AppIntent::UndoRequested);
            }
            if ui
                .add_enabled(self.state.can_redo(), egui::Button::new("Wiederholen"))
                .clicked()
            {
                events.push(AppIntent::RedoRequested);
            }
        });

        ui.horizontal(|ui| {
            if ui.button("Alles löschen").clicked() {
                events.push(AppIntent::ClearCanvasRequested);
            }
            if ui.button("Bild speichern…").clicked() {
                if let Some(path) = rfd::FileDialog::new()
                    .add_filter("PNG-Bild", &["png"])
                    .set_file_name("zauberkreide.png")
                    .save_file()
                {
                    events.push(AppIntent::ExportPngRequested { path });
                }
            }
        });
    }

    fn recording_controls(&self, ui: &mut egui::Ui, events: &mut Vec<AppIntent>) {
        ui.label("Aufzeichnung");

        let is_recording = self.state.recording.is_recording();
        let has_strokes = !self.state.recording.is_empty();

        ui.horizontal(|ui| {
            if is_recording {
                if ui.button("⏹ Stopp").clicked() {
                    events.push(AppIntent::StopRecordingRequested);
                }
            } else if ui.button("⏺ Aufnahme").clicked() {
                events.push(AppIntent::StartRecordingRequested);
            }

            if ui
                .add_enabled(has_strokes && !is_recording, egui::Button::new("▶ Abspielen"))
                .clicked()
            {
                events.push(AppIntent::ReplayRequested);
            }
        });

        ui.horizontal(|ui| {
            if ui
                .add_enabled(has_strokes && !is_recording, egui::Button::new("Speichern…"))
                .clicked()
            {
                if let Some(path) = rfd::FileDialog::new()
                    .add_filter("Aufzeichnung", &["json"])
                    .set_file_name("aufzeichnung.json")
                    .save_file()
                {
                    events.push(AppIntent::SaveRecordingRequested { path });
                }
            }
            if ui.button("Laden…").clicked() {
                if let Some(path) = rfd::FileDialog::new()
                    .add_filter("Aufzeichnung", &["json"])
                    .pick_file()
                {
                    events.push(AppIntent::LoadRecordingRequested { path });
                }
            }
        });

        if has_strokes {
            ui.label(format!("{} Striche", self.state.recording.stroke_count()));
        }
    }

    fn render_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(format!("Werkzeug: {}", tool_label(self.state.tool)));
                ui.separator();
                ui.label(format!(
                    "Partikel: {}  |  Strecken: {}  |  Züge: {}",
                    self.state.scene.entities.len(),
                    self.state.scene.tracks.track_count(),
                    self.state.scene.trains.len(),
                ));
                if self.state.recording.is_recording() {
                    ui.separator();
                    ui.colored_label(egui::Color32::RED, "⏺ Aufnahme läuft");
                }
            });
        });
    }

    fn process_events(&mut self, events: Vec<AppIntent>) {
        for event in events {
            if let Err(e) = self
                .controller
                .handle_intent(&mut self.state, event, &mut self.rng)
            {
                log::error!("Event handling failed: {:#}", e);
            }
        }
    }

    /// Simulationsschritt, Overlay-Neuaufbau und Textur-Upload für das
    /// nächste Frame.
    fn advance_and_compose(&mut self, ctx: &egui::Context) {
        let input = FrameInput::from_options(&self.state.options);
        advance(&mut self.state.scene, &input, &mut self.rng);

        render::render_overlay(
            &mut self.state.overlay,
            &self.state.scene,
            self.state.snap_candidate,
            self.state.brush_size,
            self.state.options.show_junction_markers,
        );
        let frame = render::present(&self.state.base, &self.state.overlay);

        let size = [frame.width() as usize, frame.height() as usize];
        let image = egui::ColorImage::from_rgba_unmultiplied(size, frame.as_raw());
        match &mut self.canvas_texture {
            Some(texture) => texture.set(image, egui::TextureOptions::NEAREST),
            None => {
                self.canvas_texture =
                    Some(ctx.load_texture("zeichenflaeche", image, egui::TextureOptions::NEAREST));
            }
        }
    }
}

/// Verarbeitet Keyboard-Shortcuts und gibt AppIntents zurück.
fn collect_keyboard_intents(ui: &egui::Ui) -> Vec<AppIntent> {
    let mut events = Vec::new();

    // Undo / Redo (Cmd/Ctrl + Z / Y, Shift+Cmd+Z)
    let (modifiers, key_z_pressed, key_y_pressed) = ui.input(|i| {
        (
            i.modifiers,
            i.key_pressed(egui::Key::Z),
            i.key_pressed(egui::Key::Y),
        )
    });

    if modifiers.command && key_z_pressed && !modifiers.shift {
        events.push(AppIntent::UndoRequested);
    }

    if modifiers.command && (key_y_pressed || (modifiers.shift && key_z_pressed)) {
        events.push(AppIntent::RedoRequested);
    }

    events
}
