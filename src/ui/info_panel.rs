use brick_review_adapters::brick_info_rows;
use brick_review_application::BrickInfoStatus;
use eframe::egui;

use crate::ui::textures::rgb_color;

const SWATCH_SIZE: f32 = 14.0;

pub fn show(ui: &mut egui::Ui, status: &BrickInfoStatus) {
    ui.label(egui::RichText::new("Brick info").strong());
    match status {
        BrickInfoStatus::Loading => {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("Loading brick info...");
            });
        }
        BrickInfoStatus::Unavailable(message) => {
            ui.weak(message);
        }
        BrickInfoStatus::Ready(info) => {
            egui::Grid::new("brick_info_grid")
                .num_columns(2)
                .striped(true)
                .show(ui, |ui| {
                    for (index, (title, value)) in brick_info_rows(info).into_iter().enumerate() {
                        ui.label(title);
                        ui.horizontal(|ui| {
                            // Row 0 is the recoded color prediction.
                            if index == 0 {
                                if let Some(rgb) = info.color_rgb {
                                    let (rect, _) = ui.allocate_exact_size(
                                        egui::vec2(SWATCH_SIZE, SWATCH_SIZE),
                                        egui::Sense::hover(),
                                    );
                                    ui.painter().rect_filled(rect, 2.0, rgb_color(rgb.to_rgb8()));
                                }
                            }
                            ui.label(value);
                        });
                        ui.end_row();
                    }
                });
        }
    }
}
