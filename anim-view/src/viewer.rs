//! Interactive host for the animated widgets built with eframe/egui.
//!
//! This module defines [`Viewer`], which mounts every widget from a
//! [`Config`], feeds them pointer, resize and visibility input, drives
//! their ticks from the egui clock and paints their draw lists.

use anim_core::{
    config::{Config, ConfigError, MAX_ACTIVATIONS, MAX_OBJECTS, MAX_PARTICLES},
    cursor_field::{self, CursorField},
    floating_field::{self, FloatingField},
    morph_text::{self, MorphingText, Phase},
    neural_canvas::{self, NeuralCanvas},
    projector::{DrawCommand, DrawList},
    types::{Rgba, Viewport},
    widget::Widget,
};
use eframe::App;
use glam::Vec2;
use tracing::{info, warn};

/// Simulated time advanced by one press of "Step". Long enough to pass the
/// network frame limiter.
const STEP_DT: f64 = 1.0 / 30.0;

const BACKGROUND: egui::Color32 = egui::Color32::from_rgb(10, 10, 24);

/// Every widget of one mount, drawn back to front in field order.
struct Widgets {
    network: NeuralCanvas,
    floating: FloatingField,
    cursor: CursorField,
    text: MorphingText,
}

impl Widgets {
    /// Mounts all widgets from `cfg`, each with its own salted RNG.
    fn mount(cfg: &Config, viewport: Viewport, now: f64) -> Result<Self, ConfigError> {
        Ok(Self {
            network: NeuralCanvas::mount(
                cfg.network.clone(),
                viewport,
                cfg.rng_for(neural_canvas::SALT),
            ),
            floating: FloatingField::mount(
                cfg.drift.clone(),
                viewport,
                now,
                cfg.rng_for(floating_field::SALT),
            )?,
            cursor: CursorField::mount(
                cfg.cursor.clone(),
                viewport,
                cfg.rng_for(cursor_field::SALT),
            ),
            text: MorphingText::mount(
                cfg.text.clone(),
                viewport,
                now,
                cfg.rng_for(morph_text::SALT),
            ),
        })
    }

    fn all(&self) -> [&dyn Widget; 4] {
        [&self.network, &self.floating, &self.cursor, &self.text]
    }

    fn all_mut(&mut self) -> [&mut dyn Widget; 4] {
        [
            &mut self.network,
            &mut self.floating,
            &mut self.cursor,
            &mut self.text,
        ]
    }
}

/// Main application state for the viewer.
///
/// ### Fields
/// - `cfg` - Configuration the current widgets were mounted from.
/// - `draft` - Side-panel edits, applied by the next remount.
/// - `widgets` - Mounted widget instances.
/// - `viewport` - Size of the central panel at the last frame.
/// - `running` - Whether simulated time advances with the egui clock.
/// - `clock` - Simulated time in seconds handed to the widgets.
/// - `last_frame_time` - egui time of the previous running frame.
/// - `config_error` - Why the last remount was rejected, if it was.
pub struct Viewer {
    cfg: Config,
    draft: Config,
    widgets: Widgets,
    viewport: Viewport,

    running: bool,
    clock: f64,
    last_frame_time: Option<f64>,

    config_error: Option<String>,
}

impl Viewer {
    /// Mounts every widget from a validated `cfg` on a default viewport.
    ///
    /// The real viewport is applied on the first frame.
    pub fn new(cfg: Config) -> Result<Self, ConfigError> {
        let viewport = Viewport::default();
        let widgets = Widgets::mount(&cfg, viewport, 0.0)?;
        Ok(Self {
            draft: cfg.clone(),
            cfg,
            widgets,
            viewport,
            running: true,
            clock: 0.0,
            last_frame_time: None,
            config_error: None,
        })
    }

    /// Rebuilds every widget from the draft config, keeping each widget's
    /// visibility. A draft that fails validation leaves the current widgets
    /// untouched.
    fn remount(&mut self) {
        if let Err(err) = self.draft.validate() {
            warn!(%err, "draft configuration rejected");
            self.config_error = Some(err.to_string());
            return;
        }
        let mut widgets = match Widgets::mount(&self.draft, self.viewport, self.clock) {
            Ok(w) => w,
            Err(err) => {
                warn!(%err, "remount failed");
                self.config_error = Some(err.to_string());
                return;
            }
        };

        let visible = self.widgets.all().map(|w| w.is_visible());
        for (w, v) in widgets.all_mut().into_iter().zip(visible) {
            w.set_visible(v);
        }
        for w in self.widgets.all_mut() {
            w.unmount();
        }

        self.widgets = widgets;
        self.cfg = self.draft.clone();
        self.config_error = None;
        info!(seed = ?self.cfg.seed, "remounted widgets");
    }

    /// Advances simulated time by `dt` and ticks every widget once.
    fn advance(&mut self, dt: f64) {
        self.clock += dt;
        let now = self.clock;
        for w in self.widgets.all_mut() {
            w.tick(now);
        }
    }

    fn resize(&mut self, viewport: Viewport) {
        if viewport == self.viewport {
            return;
        }
        self.viewport = viewport;
        let now = self.clock;
        for w in self.widgets.all_mut() {
            w.resize(viewport, now);
        }
    }

    fn pointer_moved(&mut self, pos: Vec2) {
        let now = self.clock;
        for w in self.widgets.all_mut() {
            w.pointer_moved(pos, now);
        }
    }

    /// Converts a widget-space position to screen-space.
    ///
    /// Widget space has its origin at the top-left of `rect`, y down.
    fn to_screen(p: Vec2, rect: egui::Rect) -> egui::Pos2 {
        egui::pos2(rect.min.x + p.x, rect.min.y + p.y)
    }

    /// Inverse of [`Viewer::to_screen`].
    fn to_widget(p: egui::Pos2, rect: egui::Rect) -> Vec2 {
        Vec2::new(p.x - rect.min.x, p.y - rect.min.y)
    }

    fn color(c: Rgba) -> egui::Color32 {
        let a = (c.a.clamp(0.0, 1.0) * 255.0).round() as u8;
        egui::Color32::from_rgba_unmultiplied(c.r, c.g, c.b, a)
    }

    /// Issues the painter calls for one draw list.
    fn paint(painter: &egui::Painter, rect: egui::Rect, list: &DrawList) {
        for cmd in &list.commands {
            match cmd {
                DrawCommand::Clear { color } => {
                    painter.rect_filled(rect, egui::CornerRadius::ZERO, Self::color(*color));
                }
                DrawCommand::Circle {
                    center,
                    radius,
                    fill,
                } => {
                    painter.circle_filled(
                        Self::to_screen(*center, rect),
                        *radius,
                        Self::color(*fill),
                    );
                }
                DrawCommand::Ring {
                    center,
                    radius,
                    width,
                    color,
                } => {
                    painter.circle_stroke(
                        Self::to_screen(*center, rect),
                        *radius,
                        egui::Stroke::new(*width, Self::color(*color)),
                    );
                }
                DrawCommand::Line {
                    from,
                    to,
                    width,
                    color,
                } => {
                    painter.line_segment(
                        [Self::to_screen(*from, rect), Self::to_screen(*to, rect)],
                        egui::Stroke::new(*width, Self::color(*color)),
                    );
                }
                DrawCommand::Polygon { points, fill } => {
                    let pts = points.iter().map(|&p| Self::to_screen(p, rect)).collect();
                    painter.add(egui::Shape::convex_polygon(
                        pts,
                        Self::color(*fill),
                        egui::Stroke::NONE,
                    ));
                }
                DrawCommand::Text {
                    pos,
                    text,
                    size,
                    color,
                } => {
                    painter.text(
                        Self::to_screen(*pos, rect),
                        egui::Align2::CENTER_CENTER,
                        text,
                        egui::FontId::proportional(*size),
                        Self::color(*color),
                    );
                }
            }
        }
    }

    /// Helper to draw a labeled `usize` [`egui::DragValue`].
    fn labeled_drag_usize(
        ui: &mut egui::Ui,
        label: &str,
        value: &mut usize,
        range: std::ops::RangeInclusive<usize>,
        speed: f64,
    ) {
        ui.horizontal(|ui| {
            ui.label(label);
            ui.add(egui::DragValue::new(value).range(range).speed(speed));
        });
    }

    /// Helper to draw a labeled `f32` [`egui::DragValue`].
    fn labeled_drag_f32(
        ui: &mut egui::Ui,
        label: &str,
        value: &mut f32,
        range: std::ops::RangeInclusive<f32>,
        speed: f64,
    ) {
        ui.horizontal(|ui| {
            ui.label(label);
            ui.add(egui::DragValue::new(value).range(range).speed(speed));
        });
    }

    /// Builds the top panel UI (run controls, stepping, visibility).
    fn ui_top_panel(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui
                    .button(if self.running { "⏸ Pause" } else { "▶ Run" })
                    .clicked()
                {
                    self.running = !self.running;
                    self.last_frame_time = None;
                }

                if ui.button("Step").clicked() {
                    self.advance(STEP_DT);
                }

                if ui.button("Remount").clicked() {
                    self.remount();
                }

                ui.separator();
                for w in self.widgets.all_mut() {
                    let mut visible = w.is_visible();
                    if ui.checkbox(&mut visible, w.name()).changed() {
                        w.set_visible(visible);
                    }
                }
            });
        });
    }

    /// Builds the bottom status bar (clock, particle and network counters).
    fn ui_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(format!("t = {:.2} s", self.clock));
                ui.separator();
                ui.label(format!(
                    "particles = {}",
                    self.widgets.cursor.particles().len()
                ));
                ui.label(format!(
                    "activations = {}",
                    self.widgets.network.activations().len()
                ));
                ui.label(format!(
                    "active edges = {}",
                    self.widgets.network.network().active_edges().count()
                ));
                let phase = match self.widgets.text.phase() {
                    Phase::Typing { .. } => "typing",
                    Phase::Idle { .. } => "idle",
                    Phase::Scramble { .. } => "scramble",
                    Phase::Glitch { .. } => "glitch",
                };
                ui.label(format!("text = {phase}"));
                if let Some(err) = &self.config_error {
                    ui.separator();
                    ui.colored_label(egui::Color32::LIGHT_RED, err);
                }
            });
        });
    }

    /// Builds the right-hand panel editing the draft configuration.
    fn ui_config_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::right("config_panel")
            .resizable(true)
            .default_width(240.0)
            .show(ctx, |ui| {
                ui.heading("Config");
                ui.label("Applied on remount.");

                ui.separator();
                let mut fixed = self.draft.seed.is_some();
                if ui.checkbox(&mut fixed, "fixed seed").changed() {
                    self.draft.seed = fixed.then_some(self.draft.seed.unwrap_or(0));
                }
                if let Some(seed) = self.draft.seed.as_mut() {
                    ui.add(egui::DragValue::new(seed).prefix("seed = "));
                }

                let c = &mut self.draft.cursor;
                ui.separator();
                ui.label("Cursor");
                Self::labeled_drag_usize(
                    ui,
                    "particle_count:",
                    &mut c.particle_count,
                    1..=MAX_PARTICLES,
                    1.0,
                );
                Self::labeled_drag_f32(
                    ui,
                    "attraction_radius:",
                    &mut c.attraction_radius,
                    1.0..=2000.0,
                    1.0,
                );
                Self::labeled_drag_f32(
                    ui,
                    "attraction_strength:",
                    &mut c.attraction_strength,
                    0.0..=5.0,
                    0.01,
                );
                Self::labeled_drag_f32(ui, "friction:", &mut c.friction, 0.5..=0.999, 0.001);
                Self::labeled_drag_f32(ui, "jitter:", &mut c.jitter, 0.0..=5.0, 0.01);
                Self::labeled_drag_f32(ui, "max_speed:", &mut c.max_speed, 0.1..=50.0, 0.1);
                Self::labeled_drag_f32(
                    ui,
                    "particle_link:",
                    &mut c.particle_link_distance,
                    1.0..=500.0,
                    1.0,
                );
                Self::labeled_drag_f32(
                    ui,
                    "cursor_link:",
                    &mut c.cursor_link_distance,
                    1.0..=500.0,
                    1.0,
                );

                let d = &mut self.draft.drift;
                ui.separator();
                ui.label("Floating objects");
                Self::labeled_drag_usize(
                    ui,
                    "object_count:",
                    &mut d.object_count,
                    1..=MAX_OBJECTS,
                    1.0,
                );
                Self::labeled_drag_f32(
                    ui,
                    "skip_probability:",
                    &mut d.skip_probability,
                    0.0..=1.0,
                    0.01,
                );
                Self::labeled_drag_f32(ui, "smoothing:", &mut d.smoothing, 0.0..=0.1, 0.001);

                let n = &mut self.draft.network;
                ui.separator();
                ui.label("Network");
                Self::labeled_drag_usize(
                    ui,
                    "activation_capacity:",
                    &mut n.activation_capacity,
                    1..=MAX_ACTIVATIONS,
                    1.0,
                );
                Self::labeled_drag_f32(
                    ui,
                    "batch_probability:",
                    &mut n.batch_probability,
                    0.0..=1.0,
                    0.01,
                );
                Self::labeled_drag_f32(
                    ui,
                    "spawn_probability:",
                    &mut n.spawn_probability,
                    0.0..=1.0,
                    0.001,
                );

                ui.separator();
                ui.label("Text");
                Self::labeled_drag_f32(
                    ui,
                    "glitch_intensity:",
                    &mut self.draft.text.glitch_intensity,
                    0.0..=1.0,
                    0.01,
                );
                ui.text_edit_singleline(&mut self.draft.text.text);

                ui.separator();
                if ui.button("Reset cfg to default").clicked() {
                    self.draft = Config::default();
                }
            });
    }

    /// Builds the central panel the widgets are drawn into.
    fn ui_central_panel(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default()
            .frame(egui::Frame::new())
            .show(ctx, |ui| {
                let response = ui.allocate_response(ui.available_size(), egui::Sense::hover());
                let rect = response.rect;
                let painter = ui.painter_at(rect);

                self.resize(Viewport::new(rect.width(), rect.height()));
                if let Some(p) = response.hover_pos() {
                    self.pointer_moved(Self::to_widget(p, rect));
                }

                if self.running {
                    let now = ctx.input(|i| i.time);
                    let dt = self.last_frame_time.map_or(0.0, |last| now - last);
                    self.last_frame_time = Some(now);
                    self.advance(dt);
                    ctx.request_repaint();
                }

                painter.rect_filled(rect, egui::CornerRadius::ZERO, BACKGROUND);
                for w in self.widgets.all() {
                    Self::paint(&painter, rect, &w.project());
                }
            });
    }
}

impl App for Viewer {
    /// eframe callback that builds all UI panels for each frame.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ui_top_panel(ctx);
        self.ui_status_bar(ctx);
        self.ui_config_panel(ctx);
        self.ui_central_panel(ctx);
    }
}
