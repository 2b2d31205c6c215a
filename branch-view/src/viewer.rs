//! Interactive branch viewer built with eframe/egui.
//!
//! This module defines [`Viewer`], which owns the code text, the generator
//! configuration and the latest [`Generation`], and implements
//! [`eframe::App`] to edit codes and rules and to replay the traversal
//! segment by segment.

use branch_core::{
    BranchRule, CodeSeq, Config, Generation, Generator, Policy, Tree,
    types::{Code, NodeId},
};
use eframe::App;
use glam::{Vec2, Vec3};
use rand::rng;
use tracing::{debug, warn};

/// Plane the 3-D segments are projected onto for drawing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Plane {
    /// Horizontal axis `y`, vertical axis `z`. The default rules live here.
    #[default]
    YZ,
    XZ,
    XY,
}

impl Plane {
    const ALL: [Plane; 3] = [Plane::YZ, Plane::XZ, Plane::XY];

    fn label(self) -> &'static str {
        match self {
            Plane::YZ => "y / z",
            Plane::XZ => "x / z",
            Plane::XY => "x / y",
        }
    }

    fn project(self, p: Vec3) -> Vec2 {
        match self {
            Plane::YZ => Vec2::new(p.y, p.z),
            Plane::XZ => Vec2::new(p.x, p.z),
            Plane::XY => Vec2::new(p.x, p.y),
        }
    }
}

/// Main application state for the interactive viewer.
///
/// The typical per-frame update is:
/// 1. Handle UI interactions; any edit to the codes or the config calls
///    [`Viewer::regenerate`].
/// 2. If `running` is `true` and enough time has passed, call
///    [`Viewer::step_once`] to reveal the next segment.
/// 3. Render the revealed segments and the hovered node.
///
/// ### Fields
/// - `cfg` - Generator configuration (step length, policy, rule table).
/// - `codes_text` - Raw panel text the codes are parsed from.
/// - `parse_error` - Message of the last failed parse, if any. The previous
///   generation stays on screen while it is set.
/// - `generation` - Result of the last successful run.
///
/// - `rng` - Random number generator used by "Randomize".
/// - `random_len` - Length of randomized code sequences.
/// - `new_rule_code` - Code offered by the "Add rule" button.
///
/// - `revealed` - Number of segments drawn, in traversal order.
/// - `running` - Whether segments are being revealed automatically.
/// - `zoom`, `pan`, `plane` - Camera.
///
/// - `step_interval` - Target time between automatic steps (seconds).
/// - `last_step_time` - Time stamp of the last step (egui time).
/// - `last_step_dt` - Actual time delta between the last two steps.
pub struct Viewer {
    cfg: Config,
    codes_text: String,
    parse_error: Option<String>,
    generation: Generation,

    rng: rand::rngs::ThreadRng,
    random_len: usize,
    new_rule_code: Code,

    revealed: usize,
    running: bool,
    zoom: f32,
    pan: egui::Vec2,
    plane: Plane,

    step_interval: f64,
    last_step_time: f64,
    last_step_dt: f64,
}

const DEFAULT_CODES: &str = "1, 2, 1, 2, 1, 1, 2, 0, 2, 1";

impl Viewer {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Creates a viewer showing [`DEFAULT_CODES`] fully revealed.
    pub fn with_config(cfg: Config) -> Self {
        let generation = Generator::from_config(&cfg).run(Vec3::ZERO, CodeSeq::default(), cfg.policy);
        let mut viewer = Self {
            cfg,
            codes_text: DEFAULT_CODES.to_string(),
            parse_error: None,
            generation,
            rng: rng(),
            random_len: 24,
            new_rule_code: 3,
            revealed: 0,
            running: false,
            zoom: 30.0,
            pan: egui::vec2(0.0, 120.0),
            plane: Plane::default(),
            step_interval: 0.2,
            last_step_time: 0.0,
            last_step_dt: 0.0,
        };
        viewer.regenerate();
        viewer
    }

    fn total_segments(&self) -> usize {
        self.generation.tree.segment_count()
    }

    /// Parses `codes_text` and reruns the generator.
    ///
    /// On success every segment is revealed and `parse_error` cleared. On
    /// failure the previous generation is kept and the error is stored for
    /// display.
    fn regenerate(&mut self) {
        match CodeSeq::parse(&self.codes_text) {
            Ok(codes) => {
                self.generation =
                    Generator::from_config(&self.cfg).run(Vec3::ZERO, codes, self.cfg.policy);
                self.revealed = self.total_segments();
                self.parse_error = None;
                debug!(
                    segments = self.revealed,
                    policy = %self.cfg.policy,
                    "regenerated"
                );
            }
            Err(e) => {
                warn!(error = %e, "rejected code text");
                self.parse_error = Some(e.to_string());
            }
        }
    }

    /// Hides all segments so the traversal can be replayed step by step.
    fn reset(&mut self) {
        self.revealed = 0;
        self.running = false;
    }

    /// Empties the code text, leaving a bare root.
    fn clear(&mut self) {
        self.codes_text.clear();
        self.running = false;
        self.regenerate();
    }

    fn randomize(&mut self) {
        let max_code = self.cfg.rules.max_code().max(2);
        let codes = CodeSeq::random(self.random_len, max_code, &mut self.rng);
        self.codes_text = codes.to_string();
        self.regenerate();
    }

    /// Rewrites the codes so the current structure regrows under the other
    /// policy, then switches to it.
    fn switch_policy_keeping_shape(&mut self) {
        let other = match self.cfg.policy {
            Policy::DepthFirst => Policy::BreadthFirst,
            Policy::BreadthFirst => Policy::DepthFirst,
        };
        self.codes_text = CodeSeq::new(self.generation.tree.to_codes(other)).to_string();
        self.cfg.policy = other;
        self.regenerate();
    }

    /// Reveals one more segment, stopping the auto-run at the end.
    fn step_once(&mut self) {
        if self.revealed < self.total_segments() {
            self.revealed += 1;
        } else {
            self.running = false;
        }
    }

    /// Converts a world-space position to screen-space.
    ///
    /// World coordinates are scaled by `zoom`, offset by `pan`, and then
    /// centered inside the given `rect`. The y-axis is flipped so that
    /// positive y goes up in world space.
    fn world_to_screen(&self, p: Vec2, rect: egui::Rect) -> egui::Pos2 {
        let center = rect.center();
        egui::pos2(
            center.x + p.x * self.zoom + self.pan.x,
            center.y - p.y * self.zoom + self.pan.y,
        )
    }

    /// Converts a screen-space position back to world-space.
    ///
    /// This is the inverse of [`Viewer::world_to_screen`] (up to floating
    /// point rounding).
    fn screen_to_world(&self, p: egui::Pos2, rect: egui::Rect) -> Vec2 {
        let center = rect.center();
        let x = (p.x - center.x - self.pan.x) / self.zoom;
        let y = (center.y - p.y + self.pan.y) / self.zoom;
        Vec2::new(x, y)
    }

    fn node_to_screen(&self, id: NodeId, rect: egui::Rect) -> egui::Pos2 {
        let pos = self.generation.tree.nodes[id].pos;
        self.world_to_screen(self.plane.project(pos), rect)
    }

    /// Nearest node to the hovered world point, if it is within a few pixels.
    fn hovered_node(&self, hover_world: Vec2) -> Option<NodeId> {
        let (id, d2) = self
            .generation
            .tree
            .find_nearest_by(|p| self.plane.project(p).distance_squared(hover_world))?;
        let pick = 6.0 / self.zoom;
        (d2 <= pick * pick).then_some(id)
    }

    /// Helper to draw a labeled `f32` [`egui::DragValue`].
    fn labeled_drag_f32(
        ui: &mut egui::Ui,
        label: &str,
        value: &mut f32,
        range: std::ops::RangeInclusive<f32>,
        speed: f64,
    ) -> bool {
        ui.horizontal(|ui| {
            ui.label(label);
            ui.add(egui::DragValue::new(value).range(range).speed(speed))
                .changed()
        })
        .inner
    }

    /// Builds the top panel UI (replay controls, policy, zoom).
    fn ui_top_panel(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui
                    .button(if self.running { "⏸ Pause" } else { "▶ Replay" })
                    .clicked()
                {
                    if !self.running && self.revealed >= self.total_segments() {
                        self.revealed = 0;
                    }
                    self.running = !self.running;
                }

                ui.add(
                    egui::DragValue::new(&mut self.step_interval)
                        .prefix("dt target = ")
                        .range(0.01..=2.0)
                        .speed(0.01),
                );

                if ui.button("Step").clicked() {
                    let now = ctx.input(|i| i.time);
                    if self.last_step_time > 0.0 {
                        self.last_step_dt = now - self.last_step_time;
                    }
                    self.step_once();
                    self.last_step_time = now;
                }

                if ui.button("Reset").clicked() {
                    self.reset();
                }

                if ui.button("Clear").clicked() {
                    self.clear();
                }

                ui.separator();
                let before = self.cfg.policy;
                egui::ComboBox::from_id_salt("policy")
                    .selected_text(self.cfg.policy.label())
                    .show_ui(ui, |ui| {
                        for policy in Policy::ALL {
                            ui.selectable_value(&mut self.cfg.policy, policy, policy.label());
                        }
                    });
                if self.cfg.policy != before {
                    self.regenerate();
                }

                if ui.button("Keep shape, switch policy").clicked() {
                    self.switch_policy_keeping_shape();
                }

                ui.separator();
                ui.add(egui::Slider::new(&mut self.zoom, 1.0..=200.0).text("Zoom"));
            });
        });
    }

    /// Builds the bottom status bar (timing and generation counters).
    fn ui_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(format!("dt target = {:.3} s", self.step_interval));
                ui.label(format!("dt last = {:.3} s", self.last_step_dt));
                ui.separator();
                ui.label(format!(
                    "segments = {}/{}",
                    self.revealed,
                    self.total_segments()
                ));
                ui.label(format!("depth = {}", self.generation.tree.depth()));
                ui.label(format!(
                    "codes consumed = {} (idle {})",
                    self.generation.consumed, self.generation.idle
                ));
            });
        });
    }

    /// Builds the left panel holding the code text.
    fn ui_codes_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::left("codes_panel")
            .resizable(true)
            .default_width(200.0)
            .show(ctx, |ui| {
                ui.heading("Codes");
                let edited = ui
                    .add(
                        egui::TextEdit::multiline(&mut self.codes_text)
                            .desired_rows(8)
                            .code_editor(),
                    )
                    .changed();
                if edited {
                    self.regenerate();
                }

                if let Some(msg) = &self.parse_error {
                    ui.colored_label(egui::Color32::LIGHT_RED, msg);
                }

                ui.separator();
                ui.horizontal(|ui| {
                    ui.label("length:");
                    ui.add(egui::DragValue::new(&mut self.random_len).range(1..=500));
                });
                if ui.button("Randomize").clicked() {
                    self.randomize();
                }
            });
    }

    /// Builds the right-hand configuration panel (step, projection, rules).
    fn ui_config_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::right("config_panel")
            .resizable(true)
            .default_width(240.0)
            .show(ctx, |ui| {
                ui.heading("Config");
                let mut changed = false;

                ui.separator();
                changed |= Self::labeled_drag_f32(
                    ui,
                    "step_len:",
                    &mut self.cfg.step_len,
                    0.05..=10.0,
                    0.05,
                );

                ui.horizontal(|ui| {
                    ui.label("plane:");
                    for plane in Plane::ALL {
                        ui.selectable_value(&mut self.plane, plane, plane.label());
                    }
                });

                ui.separator();
                ui.label("Rules (code → child offsets)");
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let codes: Vec<Code> = self.cfg.rules.codes().collect();
                    for code in codes {
                        let mut drop_rule = false;
                        let edited = self
                            .cfg
                            .rules
                            .get(code)
                            .and_then(|rule| Self::ui_rule(ui, code, rule, &mut drop_rule));
                        if let Some(rule) = edited {
                            match self.cfg.rules.insert(code, rule) {
                                Ok(_) => changed = true,
                                Err(e) => warn!(error = %e, "rule edit rejected"),
                            }
                        }
                        if drop_rule {
                            self.cfg.rules.remove(code);
                            changed = true;
                        }
                    }

                    ui.horizontal(|ui| {
                        ui.add(egui::DragValue::new(&mut self.new_rule_code).range(1..=99));
                        if ui.button("Add rule").clicked() {
                            match self
                                .cfg
                                .rules
                                .insert(self.new_rule_code, BranchRule::new(vec![Vec3::Z]))
                            {
                                Ok(_) => changed = true,
                                Err(e) => warn!(error = %e, "rule not added"),
                            }
                        }
                    });
                });

                ui.separator();
                if ui.button("Reset cfg to default").clicked() {
                    self.cfg = Config::default();
                    changed = true;
                }

                if changed {
                    self.regenerate();
                }
            });
    }

    /// Editor for one rule. Returns the edited rule if anything changed.
    fn ui_rule(
        ui: &mut egui::Ui,
        code: Code,
        rule: &BranchRule,
        drop_rule: &mut bool,
    ) -> Option<BranchRule> {
        let mut offsets = rule.offsets().to_vec();
        let mut changed = false;
        let mut remove_offset = None;

        ui.horizontal(|ui| {
            ui.strong(format!("code {code}"));
            if ui.small_button("remove rule").clicked() {
                *drop_rule = true;
            }
        });

        for (i, offset) in offsets.iter_mut().enumerate() {
            ui.horizontal(|ui| {
                for (axis, v) in ["x", "y", "z"].into_iter().zip([
                    &mut offset.x,
                    &mut offset.y,
                    &mut offset.z,
                ]) {
                    changed |= ui
                        .add(egui::DragValue::new(v).prefix(axis).speed(0.05))
                        .changed();
                }
                if ui.small_button("✕").clicked() {
                    remove_offset = Some(i);
                }
            });
        }

        if let Some(i) = remove_offset {
            offsets.remove(i);
            changed = true;
        }
        if ui.small_button("+ offset").clicked() {
            offsets.push(Vec3::Z);
            changed = true;
        }
        ui.add_space(4.0);
        changed.then(|| BranchRule::new(offsets))
    }

    /// Builds the central panel where the branches are drawn.
    fn ui_central_panel(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let response = ui.allocate_response(ui.available_size(), egui::Sense::click_and_drag());
            let rect = response.rect;
            let painter = ui.painter_at(rect);

            // Pan with drag.
            if response.dragged() {
                self.pan += response.drag_delta();
            }

            let hover_world = response.hover_pos().map(|p| self.screen_to_world(p, rect));

            // Zoom around the mouse cursor.
            let scroll = ui.ctx().input(|i| i.raw_scroll_delta.y);
            if scroll != 0.0 {
                let pointer_screen = response.hover_pos().unwrap_or(rect.center());
                let world_before = self.screen_to_world(pointer_screen, rect);

                let factor = (1.0 + scroll * 0.001).clamp(0.5, 2.0);
                self.zoom = (self.zoom * factor).clamp(1.0, 200.0);

                let screen_after = self.world_to_screen(world_before, rect);
                self.pan += pointer_screen - screen_after;
            }

            // Segments are nodes 1..; node i + 1 ends segment i.
            let tree: &Tree = &self.generation.tree;
            for id in 1..=self.revealed.min(tree.segment_count()) {
                let Some(parent) = tree.nodes[id].parent else {
                    continue;
                };
                let a = self.node_to_screen(parent, rect);
                let b = self.node_to_screen(id, rect);
                let color = if id == self.revealed {
                    egui::Color32::RED
                } else {
                    egui::Color32::LIGHT_GREEN
                };
                painter.line_segment([a, b], egui::Stroke::new(2.0, color));
            }

            // Root, then pending and terminated tips.
            painter.circle_filled(
                self.node_to_screen(Tree::ROOT, rect),
                4.0,
                egui::Color32::LIGHT_BLUE,
            );
            if self.revealed >= tree.segment_count() {
                for leaf in tree.leaves() {
                    let color = if tree.nodes[leaf].code.is_some() {
                        egui::Color32::GRAY
                    } else {
                        egui::Color32::YELLOW
                    };
                    painter.circle_filled(self.node_to_screen(leaf, rect), 2.5, color);
                }
            }

            if let Some(world) = hover_world
                && let Some(id) = self.hovered_node(world)
            {
                let node = &tree.nodes[id];
                let code = node.code.map_or("-".to_string(), |c| c.to_string());
                painter.text(
                    self.node_to_screen(id, rect) + egui::vec2(8.0, -8.0),
                    egui::Align2::LEFT_BOTTOM,
                    format!(
                        "#{id} gen {} code {code}\n({:.2}, {:.2}, {:.2})",
                        node.generation, node.pos.x, node.pos.y, node.pos.z
                    ),
                    egui::FontId::monospace(12.0),
                    egui::Color32::WHITE,
                );
            }

            // Auto-reveal if requested.
            if self.running {
                let now = ctx.input(|i| i.time);
                let elapsed = now - self.last_step_time;
                if elapsed >= self.step_interval {
                    if self.last_step_time > 0.0 {
                        self.last_step_dt = elapsed;
                    }
                    self.step_once();
                    self.last_step_time = now;
                }

                ctx.request_repaint();
            }
        });
    }
}

impl App for Viewer {
    /// eframe callback that builds all UI panels for each frame.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ui_top_panel(ctx);
        self.ui_status_bar(ctx);
        self.ui_codes_panel(ctx);
        self.ui_config_panel(ctx);
        self.ui_central_panel(ctx);
    }
}
