use std::sync::Arc;
use std::time::{Duration, Instant};

use brick_review_adapters::{ApiRoutes, HttpReviewBackend, ImageCrateDecoder};
use brick_review_application::{PointCloudView, ReviewService};
use eframe::egui;
use log::info;

use crate::app::controller::ReviewController;
use crate::infra::config::{AppConfig, LabelMode};
use crate::ui::detail_panel::{self, DetailAction};
use crate::ui::filter_panel::{self, FilterAction};
use crate::ui::point_cloud_viewer::{self, ViewerCamera};
use crate::ui::textures::TextureCache;

const BUSY_REPAINT: Duration = Duration::from_millis(250);

pub struct ReviewApp {
    controller: ReviewController,
    textures: TextureCache,
    label_mode: LabelMode,
    camera: ViewerCamera,
}

impl ReviewApp {
    fn new(ctx: &egui::Context, service: ReviewService, config: &AppConfig) -> Self {
        let repaint = ctx.clone();
        let mut controller =
            ReviewController::new(service, config, move || repaint.request_repaint());
        controller.start();
        Self {
            controller,
            textures: TextureCache::default(),
            label_mode: config.label_mode,
            camera: ViewerCamera::default(),
        }
    }

    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        let (save, save_and_next) = ctx.input_mut(|input| {
            (
                input.consume_key(egui::Modifiers::COMMAND, egui::Key::S),
                input.consume_key(egui::Modifiers::COMMAND, egui::Key::Enter),
            )
        });
        if save_and_next {
            self.controller.save(true);
        } else if save {
            self.controller.save(false);
        }
    }

    fn apply_detail_action(&mut self, action: DetailAction) {
        match action {
            DetailAction::EditLabel(field, value) => self.controller.edit_label(field, value),
            DetailAction::SetFlags(verdict) => self.controller.set_flags(verdict),
            DetailAction::Save { advance } => self.controller.save(advance),
            DetailAction::Quick(verdict) => self.controller.quick_verdict(verdict),
            DetailAction::OpenViewer => {
                self.camera = ViewerCamera::default();
                self.controller.open_point_cloud_viewer();
            }
        }
    }

    fn schedule_repaint(&self, ctx: &egui::Context, now: Instant) {
        if let Some(deadline) = self.controller.detail().notice_deadline() {
            ctx.request_repaint_after(deadline.saturating_duration_since(now));
        }
        if self.controller.in_flight() > 0 {
            ctx.request_repaint_after(BUSY_REPAINT);
        }
    }
}

impl eframe::App for ReviewApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();
        self.controller.poll(now);
        self.handle_shortcuts(ctx);

        let mut filter_action = None;
        egui::SidePanel::left("capture_list")
            .resizable(true)
            .default_width(280.0)
            .show(ctx, |ui| {
                filter_action = filter_panel::show(ui, self.controller.session());
            });
        match filter_action {
            Some(FilterAction::SelectDate(date)) => self.controller.select_date(date),
            Some(FilterAction::SelectCapture(capture_id)) => {
                self.controller.select_capture(capture_id)
            }
            None => {}
        }

        let mut detail_actions = Vec::new();
        egui::CentralPanel::default().show(ctx, |ui| {
            let session = self.controller.session();
            if session.selected_date.is_none() {
                ui.centered_and_justified(|ui| ui.heading("Select a date to start"));
            } else if session.selected_capture.is_none() {
                ui.centered_and_justified(|ui| ui.heading("Select a capture to review"));
            } else {
                detail_actions = detail_panel::show(
                    ui,
                    &self.controller,
                    &mut self.textures,
                    &mut self.label_mode,
                );
            }
        });
        for action in detail_actions {
            self.apply_detail_action(action);
        }

        let view = self.controller.detail().point_cloud_view();
        if !matches!(view, PointCloudView::Closed)
            && !point_cloud_viewer::show(ctx, view, &mut self.camera)
        {
            self.controller.close_point_cloud_viewer();
        }

        self.schedule_repaint(ctx, now);
    }
}

pub fn launch_window(config: &AppConfig) -> Result<(), String> {
    let routes = ApiRoutes::new(&config.api_base_url, &config.color_mapping_path);
    let service = ReviewService::new(
        Arc::new(HttpReviewBackend::new(routes)),
        Arc::new(ImageCrateDecoder),
    );
    info!("starting review window against {}", config.api_base_url);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1280.0, 820.0]),
        ..Default::default()
    };
    let config = config.clone();
    eframe::run_native(
        "brick-review",
        options,
        Box::new(move |cc| Ok(Box::new(ReviewApp::new(&cc.egui_ctx, service, &config)))),
    )
    .map_err(|error| format!("failed to start UI: {error}"))
}
