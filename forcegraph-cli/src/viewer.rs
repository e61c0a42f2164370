//! Live viewer for `.graph` scenes
//!
//! Plays the simulation one or more steps per repaint and reloads the scene
//! whenever the watched file is modified.

use eframe::egui;
use forcegraph_core::{
    build_simulation_from_source, format_parse_error, Frame, LinkMeta, SceneError, Simulation,
};
use glam::DVec2;
use log::{info, warn};
use notify::{Event, RecommendedWatcher, Watcher};
use std::path::PathBuf;
use std::sync::mpsc;

/// Viewer state: the running simulation plus file watching
pub struct ViewerApp {
    source_path: PathBuf,
    source_text: String,
    sim: Option<Simulation>,
    last_load_error: Option<String>,
    playing: bool,
    steps_per_frame: usize,
    #[allow(dead_code)] // Kept alive to maintain file watching
    file_watcher: Option<RecommendedWatcher>,
    file_receiver: mpsc::Receiver<notify::Result<Event>>,
}

impl ViewerApp {
    pub fn new(source_path: PathBuf, _cc: &eframe::CreationContext<'_>) -> Self {
        // Watcher events carry absolute paths
        let source_path = source_path.canonicalize().unwrap_or(source_path);
        let source_text = std::fs::read_to_string(&source_path)
            .unwrap_or_else(|e| format!("# error reading file: {}", e));

        let (tx, rx) = mpsc::channel();
        let mut watcher = notify::recommended_watcher(move |res| {
            let _ = tx.send(res);
        })
        .ok();

        if let Some(ref mut w) = watcher {
            if let Err(e) = w.watch(&source_path, notify::RecursiveMode::NonRecursive) {
                warn!("not watching {}: {}", source_path.display(), e);
            }
        }

        let mut app = Self {
            source_path,
            source_text,
            sim: None,
            last_load_error: None,
            playing: true,
            steps_per_frame: 1,
            file_watcher: watcher,
            file_receiver: rx,
        };
        app.reload();
        app
    }

    fn reload(&mut self) {
        match build_simulation_from_source(&self.source_text) {
            Ok((_, sim)) => {
                info!("loaded {}", self.source_path.display());
                self.sim = Some(sim);
                self.last_load_error = None;
            }
            Err(SceneError::Parse(e)) => {
                self.last_load_error = Some(format_parse_error(&e, &self.source_text));
                self.sim = None;
            }
            Err(e) => {
                self.last_load_error = Some(e.to_string());
                self.sim = None;
            }
        }
    }

    fn check_file_changes(&mut self) {
        let mut needs_reload = false;
        while let Ok(event) = self.file_receiver.try_recv() {
            match event {
                Ok(Event {
                    kind: notify::EventKind::Modify(_),
                    paths,
                    ..
                }) if paths.iter().any(|p| p.ends_with(&self.source_path)) => {
                    needs_reload = true;
                }
                Ok(_) => {}
                Err(e) => warn!("file watcher error: {}", e),
            }
        }

        if needs_reload {
            match std::fs::read_to_string(&self.source_path) {
                Ok(text) => {
                    self.source_text = text;
                    self.reload();
                }
                Err(e) => warn!("could not re-read {}: {}", self.source_path.display(), e),
            }
        }
    }

    fn controls(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let label = if self.playing { "Pause" } else { "Play" };
            if ui.button(label).clicked() {
                self.playing = !self.playing;
            }
            if ui.button("Step").clicked() {
                if let Some(sim) = self.sim.as_mut() {
                    sim.step();
                }
            }
            if ui.button("Reset").clicked() {
                self.reload();
            }
            ui.add(egui::Slider::new(&mut self.steps_per_frame, 1..=50).text("steps/frame"));
            if let Some(sim) = &self.sim {
                ui.separator();
                ui.label(format!("step {}", sim.steps()));
                ui.label(format!("{} nodes", sim.nodes().len()));
            }
        });
    }
}

/// Maps world coordinates into the canvas, y pointing up
struct View {
    origin: egui::Pos2,
    center: DVec2,
    scale: f64,
}

impl View {
    fn fit(rect: egui::Rect, sim: &Simulation) -> Self {
        let mut min = DVec2::splat(f64::INFINITY);
        let mut max = DVec2::splat(f64::NEG_INFINITY);
        for node in sim.nodes() {
            min = min.min(node.pos);
            max = max.max(node.pos);
        }
        if let Some(circle) = sim.config().circle {
            min = min.min(circle.center - DVec2::splat(circle.radius));
            max = max.max(circle.center + DVec2::splat(circle.radius));
        }
        if !min.is_finite() || !max.is_finite() {
            min = DVec2::ZERO;
            max = DVec2::ONE;
        }

        let extent = (max - min).max_element().max(1e-6);
        let side = rect.width().min(rect.height()) as f64;
        Self {
            origin: rect.center(),
            center: (min + max) * 0.5,
            scale: side / extent * 0.85,
        }
    }

    fn to_screen(&self, p: DVec2) -> egui::Pos2 {
        let d = (p - self.center) * self.scale;
        self.origin + egui::vec2(d.x as f32, -d.y as f32)
    }
}

/// `#rrggbb`
fn hex_color(value: &str) -> Option<egui::Color32> {
    let hex = value.strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some(egui::Color32::from_rgb(channel(0)?, channel(2)?, channel(4)?))
}

/// Matplotlib-style colour names or `#rrggbb` values used in scene files
fn link_color(meta: &LinkMeta) -> egui::Color32 {
    match meta.get("color").map(String::as_str) {
        Some(value) if value.starts_with('#') => {
            hex_color(value).unwrap_or(egui::Color32::GRAY)
        }
        Some("green" | "g") => egui::Color32::from_rgb(60, 170, 60),
        Some("red" | "r") => egui::Color32::from_rgb(210, 60, 60),
        Some("blue" | "b") => egui::Color32::from_rgb(70, 110, 220),
        Some("black" | "k") => egui::Color32::BLACK,
        Some("white" | "w") => egui::Color32::WHITE,
        _ => egui::Color32::GRAY,
    }
}

fn draw_frame(painter: &egui::Painter, view: &View, frame: Frame<'_>, sim: &Simulation) {
    if let Some(circle) = sim.config().circle {
        let stroke = egui::Stroke::new(1.0, egui::Color32::DARK_GRAY);
        let center = view.to_screen(circle.center);
        let radius = (circle.radius * view.scale) as f32;
        let outline: Vec<egui::Pos2> = (0..=96)
            .map(|i| center + radius * egui::Vec2::angled(i as f32 / 96.0 * std::f32::consts::TAU))
            .collect();
        painter.extend(egui::Shape::dashed_line(&outline, stroke, 6.0, 4.0));
    }

    for link in frame.links {
        let ends = [view.to_screen(link.endpoints[0]), view.to_screen(link.endpoints[1])];
        let stroke = egui::Stroke::new(1.5, link_color(&link.meta));
        match link.meta.get("linestyle").map(String::as_str) {
            Some("--" | "-." | ":") => {
                painter.extend(egui::Shape::dashed_line(&ends, stroke, 6.0, 4.0));
            }
            _ => {
                painter.line_segment(ends, stroke);
            }
        }
    }

    for node in sim.nodes() {
        let p = view.to_screen(node.pos);
        if node.is_static {
            painter.rect_filled(
                egui::Rect::from_center_size(p, egui::vec2(9.0, 9.0)),
                0.0,
                egui::Color32::DARK_GRAY,
            );
        } else {
            painter.circle_filled(p, 5.0, egui::Color32::LIGHT_BLUE);
            painter.circle_stroke(p, 5.0, egui::Stroke::new(1.0, egui::Color32::BLUE));
        }
        painter.text(
            p + egui::vec2(0.0, 8.0),
            egui::Align2::CENTER_TOP,
            node.label(),
            egui::FontId::proportional(11.0),
            egui::Color32::WHITE,
        );
    }
}

impl eframe::App for ViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.check_file_changes();

        egui::TopBottomPanel::top("controls").show(ctx, |ui| self.controls(ui));

        if let Some(ref error) = self.last_load_error {
            egui::TopBottomPanel::bottom("errors").show(ctx, |ui| {
                ui.label(egui::RichText::new(error).color(egui::Color32::RED));
            });
        }

        if self.playing {
            if let Some(sim) = self.sim.as_mut() {
                for _ in 0..self.steps_per_frame {
                    sim.step();
                }
            }
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            if let Some(sim) = &self.sim {
                let rect = ui.max_rect();
                let view = View::fit(rect, sim);
                draw_frame(ui.painter(), &view, sim.frame(), sim);
            }
        });

        if self.playing {
            ctx.request_repaint();
        }
    }
}
