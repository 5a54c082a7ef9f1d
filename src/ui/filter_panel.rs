use brick_review_application::SessionState;
use eframe::egui;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterAction {
    SelectDate(String),
    SelectCapture(String),
}

pub fn show(ui: &mut egui::Ui, session: &SessionState) -> Option<FilterAction> {
    let mut action = None;

    ui.heading("Brick review");
    ui.separator();

    ui.horizontal(|ui| {
        egui::ComboBox::from_label("Date")
            .selected_text(session.selected_date.as_deref().unwrap_or("Select a date"))
            .show_ui(ui, |ui| {
                for date in &session.dates {
                    let selected = session.selected_date.as_deref() == Some(date.as_str());
                    if ui.selectable_label(selected, date).clicked() {
                        action = Some(FilterAction::SelectDate(date.clone()));
                    }
                }
            });
        if session.is_loading() {
            ui.spinner();
        }
    });

    if let Some(error) = &session.error {
        ui.colored_label(ui.visuals().error_fg_color, error);
    }

    if session.selected_date.is_none() {
        return action;
    }

    ui.separator();
    ui.label(egui::RichText::new(format!("Captures ({})", session.captures.len())).strong());

    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui| {
            for capture in &session.captures {
                let selected =
                    session.selected_capture.as_deref() == Some(capture.capture_id.as_str());
                ui.horizontal(|ui| {
                    if ui.selectable_label(selected, &capture.capture_id).clicked() {
                        action = Some(FilterAction::SelectCapture(capture.capture_id.clone()));
                    }
                    ui.weak(format!("{} img", capture.image_count));
                    if capture.has_point_cloud {
                        ui.weak("PC");
                    }
                    if capture.has_labels {
                        ui.colored_label(egui::Color32::from_rgb(70, 160, 90), "Labeled");
                    }
                });
            }
        });

    action
}
