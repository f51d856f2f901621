//! App module - contains the main application state and logic

mod output;
mod scheduler;
mod sidebar;
mod toast;

use crate::catalog::Catalog;
use crate::generator::StylecloudGenerator;
use crate::params::ParameterInput;
use crate::render::{RenderPipeline, RenderResult};
use crate::settings::Settings;
use crate::theme;
use eframe::egui;
use scheduler::RenderScheduler;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::info;

// ============================================================================
// APP STATE
// ============================================================================

pub struct App {
    pub(crate) catalog: Arc<Catalog>,
    pub(crate) input: ParameterInput,
    pub(crate) scheduler: RenderScheduler,
    pub(crate) runtime: tokio::runtime::Runtime,
    pub(crate) logo_texture: Option<egui::TextureHandle>,
    // Texture of the displayed render and the result it was built from
    pub(crate) result_texture: Option<(Arc<RenderResult>, egui::TextureHandle)>,
    // Generator settings (edited in the sidebar)
    pub(crate) python_command: String,
    pub(crate) render_timeout_secs: u64,
    // Export
    pub(crate) export_dir: PathBuf,
    pub(crate) last_export: Option<PathBuf>,
    // Toast notification
    pub(crate) toast_message: Option<String>,
    pub(crate) toast_start: Option<Instant>,
    pub(crate) central_panel_rect: Option<egui::Rect>,
    // Window
    pub(crate) window_pos: Option<egui::Pos2>,
    pub(crate) window_size: Option<egui::Vec2>,
    pub(crate) needs_center: bool,
    pub(crate) settings: Settings,
    pub(crate) data_dir: PathBuf,
}

// ============================================================================
// APP INITIALIZATION & HELPERS
// ============================================================================

impl App {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        catalog: Catalog,
        settings: Settings,
        data_dir: PathBuf,
        runtime: tokio::runtime::Runtime,
    ) -> Self {
        cc.egui_ctx.set_theme(egui::Theme::Dark);

        // Phosphor icons as a fallback in the default proportional family
        let mut fonts = egui::FontDefinitions::default();
        egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
        cc.egui_ctx.set_fonts(fonts);

        theme::apply_visuals(&cc.egui_ctx);

        let catalog = Arc::new(catalog);
        let input = ParameterInput::defaults(&catalog);
        let pipeline = Self::build_pipeline(&settings.python_command, settings.render_timeout());
        let scheduler = RenderScheduler::new(catalog.clone(), pipeline);

        Self {
            catalog,
            input,
            scheduler,
            runtime,
            logo_texture: None,
            result_texture: None,
            python_command: settings.python_command.clone(),
            render_timeout_secs: settings.render_timeout_secs,
            export_dir: settings.export_dir_or_default(),
            last_export: None,
            toast_message: None,
            toast_start: None,
            central_panel_rect: None,
            window_pos: None,
            window_size: None,
            needs_center: false,
            settings,
            data_dir,
        }
    }

    fn build_pipeline(python_command: &str, timeout: Duration) -> Arc<RenderPipeline> {
        let generator = StylecloudGenerator::new(python_command, timeout);
        Arc::new(RenderPipeline::new(Arc::new(generator)))
    }

    /// Rebuild the generator after its command or timeout was edited
    pub fn apply_generator_settings(&mut self) {
        let command = self.python_command.trim().to_string();
        if command.is_empty() {
            self.python_command = self.settings.python_command.clone();
            return;
        }
        self.python_command = command;
        info!(
            python = %self.python_command,
            timeout_secs = self.render_timeout_secs,
            "Generator settings changed"
        );
        self.save_settings();
        self.scheduler.set_pipeline(Self::build_pipeline(
            &self.python_command,
            self.settings.render_timeout(),
        ));
    }

    /// Form changes feed the scheduler; due renders get started
    pub fn sync_render(&mut self, ctx: &egui::Context) {
        let now = Instant::now();
        self.scheduler.observe(&self.input, now);
        if let Some(wait) = self.scheduler.poll(self.runtime.handle(), ctx, now) {
            ctx.request_repaint_after(wait);
        }
    }

    pub fn save_settings(&mut self) {
        self.settings = Settings {
            window_x: self.window_pos.map(|p| p.x),
            window_y: self.window_pos.map(|p| p.y),
            window_w: self.window_size.map(|s| s.x),
            window_h: self.window_size.map(|s| s.y),
            python_command: self.python_command.clone(),
            render_timeout_secs: self.render_timeout_secs,
            export_dir: Some(self.export_dir.to_string_lossy().to_string()),
            catalog_path: self.settings.catalog_path.clone(),
        };
        self.settings.save(&self.data_dir);
    }
}
