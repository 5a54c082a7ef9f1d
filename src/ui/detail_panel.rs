use brick_review_adapters::present_point_cloud_info;
use brick_review_application::{DetailPhase, DetailState, PointCloudStatus, SaveStatus};
use brick_review_domain::{LabelField, Labels, QuickVerdict};
use eframe::egui;

use crate::app::controller::ReviewController;
use crate::app::state::{ImageSlot, ImageStatus};
use crate::infra::config::LabelMode;
use crate::ui::info_panel;
use crate::ui::textures::TextureCache;

const IMAGE_HEIGHT: f32 = 240.0;
const PLACEHOLDER_WIDTH: f32 = 320.0;

#[derive(Debug, Clone, PartialEq)]
pub enum DetailAction {
    EditLabel(LabelField, String),
    SetFlags(QuickVerdict),
    Save { advance: bool },
    Quick(QuickVerdict),
    OpenViewer,
}

pub fn show(
    ui: &mut egui::Ui,
    controller: &ReviewController,
    textures: &mut TextureCache,
    label_mode: &mut LabelMode,
) -> Vec<DetailAction> {
    let mut actions = Vec::new();
    let detail = controller.detail();
    textures.sync(controller.images().owner());

    if let Some(key) = detail.key() {
        ui.heading(format!("Capture {}", key.capture_id()));
        ui.weak(key.date());
    }

    match detail.phase() {
        DetailPhase::Idle => {}
        DetailPhase::Loading => {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("Loading capture...");
            });
        }
        DetailPhase::Failed(message) => {
            ui.colored_label(ui.visuals().error_fg_color, message);
        }
        DetailPhase::Ready => {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    camera_images(ui, controller, textures);
                    ui.separator();
                    point_cloud_section(ui, controller, textures, &mut actions);
                    ui.separator();
                    info_panel::show(ui, detail.brick_info());
                    ui.separator();
                    labels_section(
                        ui,
                        detail,
                        controller.has_next_capture(),
                        label_mode,
                        &mut actions,
                    );
                });
        }
    }
    actions
}

fn camera_images(ui: &mut egui::Ui, controller: &ReviewController, textures: &mut TextureCache) {
    ui.label(egui::RichText::new("Images").strong());
    let cameras: Vec<_> = controller.images().cameras().collect();
    if cameras.is_empty() {
        ui.weak("No images for this capture");
        return;
    }
    ui.horizontal_wrapped(|ui| {
        for (camera, status) in cameras {
            ui.vertical(|ui| {
                ui.label(camera);
                image_or_placeholder(
                    ui,
                    textures,
                    &ImageSlot::Camera(camera.to_string()),
                    status,
                );
            });
        }
    });
}

fn image_or_placeholder(
    ui: &mut egui::Ui,
    textures: &mut TextureCache,
    slot: &ImageSlot,
    status: &ImageStatus,
) {
    match status {
        ImageStatus::Ready(image) => {
            let texture = textures.get_or_upload(ui.ctx(), slot, image);
            ui.add(egui::Image::from_texture(&texture).max_height(IMAGE_HEIGHT));
        }
        ImageStatus::Loading => placeholder(ui, None),
        ImageStatus::Missing => placeholder(ui, Some("Image not available")),
    }
}

fn placeholder(ui: &mut egui::Ui, text: Option<&str>) {
    egui::Frame::group(ui.style()).show(ui, |ui| {
        ui.set_min_size(egui::vec2(PLACEHOLDER_WIDTH, IMAGE_HEIGHT));
        ui.centered_and_justified(|ui| match text {
            Some(text) => {
                ui.weak(text);
            }
            None => {
                ui.spinner();
            }
        });
    });
}

fn point_cloud_section(
    ui: &mut egui::Ui,
    controller: &ReviewController,
    textures: &mut TextureCache,
    actions: &mut Vec<DetailAction>,
) {
    ui.label(egui::RichText::new("Point cloud").strong());
    match controller.detail().point_cloud() {
        PointCloudStatus::Absent => {
            ui.weak("No point cloud for this capture");
            return;
        }
        PointCloudStatus::Loading => {
            ui.label("Loading point cloud info...");
        }
        PointCloudStatus::Available(info) => {
            ui.label("Point cloud available");
            for line in present_point_cloud_info(info) {
                ui.label(line);
            }
        }
        PointCloudStatus::InfoUnavailable => {
            ui.label("Point cloud available");
            ui.weak("Point cloud info unavailable");
        }
    }

    if let Some(status) = controller.images().get(&ImageSlot::Snapshot) {
        image_or_placeholder(ui, textures, &ImageSlot::Snapshot, status);
    }
    if ui.button("Open 3D viewer").clicked() {
        actions.push(DetailAction::OpenViewer);
    }
}

fn labels_section(
    ui: &mut egui::Ui,
    detail: &DetailState,
    has_next: bool,
    label_mode: &mut LabelMode,
    actions: &mut Vec<DetailAction>,
) {
    ui.horizontal(|ui| {
        ui.label(egui::RichText::new("Labels").strong());
        ui.radio_value(label_mode, LabelMode::Text, "Text");
        ui.radio_value(label_mode, LabelMode::Quick, "Quick validation");
    });

    let can_save = detail.can_save();
    match label_mode {
        LabelMode::Text => text_editor(ui, detail.draft(), can_save, has_next, actions),
        LabelMode::Quick => {
            ui.horizontal_wrapped(|ui| {
                for verdict in QuickVerdict::ALL {
                    if ui
                        .add_enabled(can_save, egui::Button::new(verdict.caption()))
                        .clicked()
                    {
                        actions.push(DetailAction::Quick(verdict));
                    }
                }
            });
        }
    }

    match detail.save_status() {
        SaveStatus::Idle => {}
        SaveStatus::Saving { .. } => {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("Saving...");
            });
        }
        SaveStatus::Saved { message, .. } => {
            ui.colored_label(egui::Color32::from_rgb(70, 160, 90), message);
        }
        SaveStatus::Failed(message) => {
            ui.colored_label(ui.visuals().error_fg_color, message);
        }
    }
}

fn text_editor(
    ui: &mut egui::Ui,
    draft: &Labels,
    can_save: bool,
    has_next: bool,
    actions: &mut Vec<DetailAction>,
) {
    egui::Grid::new("label_fields")
        .num_columns(2)
        .show(ui, |ui| {
            for field in LabelField::ALL {
                ui.label(field.title());
                let mut value = draft.field(field).to_string();
                if ui.text_edit_singleline(&mut value).changed() {
                    actions.push(DetailAction::EditLabel(field, value));
                }
                ui.end_row();
            }
        });

    let mut color_correct = draft.correct_color;
    let mut shape_correct = draft.correct_shape;
    ui.horizontal(|ui| {
        let color = ui.checkbox(&mut color_correct, "Color correct").changed();
        let shape = ui.checkbox(&mut shape_correct, "Shape correct").changed();
        if color || shape {
            actions.push(DetailAction::SetFlags(QuickVerdict::new(
                color_correct,
                shape_correct,
            )));
        }
    });

    ui.horizontal(|ui| {
        if ui
            .add_enabled(can_save, egui::Button::new("Save labels"))
            .on_hover_text("Ctrl+S")
            .clicked()
        {
            actions.push(DetailAction::Save { advance: false });
        }
        if ui
            .add_enabled(can_save && has_next, egui::Button::new("Save & next"))
            .on_hover_text("Ctrl+Enter")
            .clicked()
        {
            actions.push(DetailAction::Save { advance: true });
        }
    });
}
