use std::sync::Arc;

use brick_review_application::PointCloudView;
use brick_review_domain::{Bounds3, PointCloud};
use eframe::egui;

use crate::ui::textures::rgb_color;

const MAX_DRAWN_POINTS: usize = 40_000;
const POINT_RADIUS: f32 = 1.5;
const DRAG_SENSITIVITY: f32 = 0.01;
const PITCH_LIMIT: f32 = 1.5;

/// Orbit angles in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewerCamera {
    pub yaw: f32,
    pub pitch: f32,
}

impl Default for ViewerCamera {
    fn default() -> Self {
        Self {
            yaw: 0.6,
            pitch: 0.4,
        }
    }
}

impl ViewerCamera {
    pub fn orbit(&mut self, delta: egui::Vec2) {
        self.yaw += delta.x * DRAG_SENSITIVITY;
        self.pitch = (self.pitch + delta.y * DRAG_SENSITIVITY).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    /// Orthographic projection into [-1, 1] screen space; the third
    /// component is depth (larger is closer).
    pub fn project(&self, point: [f32; 3], bounds: &Bounds3) -> [f32; 3] {
        let center = bounds.center();
        let half = (bounds.extent() * 0.5).max(f32::EPSILON);
        let [x, y, z] = [0, 1, 2].map(|axis| (point[axis] - center[axis]) / half);

        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let rx = x * cos_yaw + y * sin_yaw;
        let ry = -x * sin_yaw + y * cos_yaw;

        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        let screen_y = z * cos_pitch - ry * sin_pitch;
        let depth = z * sin_pitch + ry * cos_pitch;
        [rx, screen_y, depth]
    }
}

/// Blue at the lowest point, red at the highest.
pub fn height_color(z: f32, bounds: &Bounds3) -> [u8; 3] {
    let span = bounds.max[2] - bounds.min[2];
    let t = if span > f32::EPSILON {
        ((z - bounds.min[2]) / span).clamp(0.0, 1.0)
    } else {
        0.5
    };
    let channel = |value: f32| (value * 255.0).round() as u8;
    [channel(t), channel(1.0 - (2.0 * t - 1.0).abs()), channel(1.0 - t)]
}

pub fn sample_step(len: usize) -> usize {
    len.div_ceil(MAX_DRAWN_POINTS).max(1)
}

/// Returns false when the reviewer closed the window.
pub fn show(ctx: &egui::Context, view: &PointCloudView, camera: &mut ViewerCamera) -> bool {
    let mut open = true;
    egui::Window::new("Point cloud")
        .open(&mut open)
        .default_size([560.0, 480.0])
        .show(ctx, |ui| match view {
            PointCloudView::Closed => {}
            PointCloudView::Loading => {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label("Loading point cloud...");
                });
            }
            PointCloudView::Failed(message) => {
                ui.colored_label(ui.visuals().error_fg_color, message);
            }
            PointCloudView::Ready(cloud) => draw_cloud(ui, cloud, camera),
        });
    open
}

fn draw_cloud(ui: &mut egui::Ui, cloud: &Arc<PointCloud>, camera: &mut ViewerCamera) {
    let Some(bounds) = cloud.bounds() else {
        ui.label("Point cloud is empty");
        return;
    };
    ui.label(format!("{} points, drag to rotate", cloud.len()));

    let size = ui.available_size().max(egui::vec2(200.0, 200.0));
    let (response, painter) = ui.allocate_painter(size, egui::Sense::drag());
    if response.dragged() {
        camera.orbit(response.drag_delta());
    }
    let rect = response.rect;
    painter.rect_filled(rect, 0.0, egui::Color32::from_gray(18));

    let scale = rect.width().min(rect.height()) * 0.45;
    let mut projected: Vec<([f32; 3], [u8; 3])> = cloud
        .points
        .iter()
        .step_by(sample_step(cloud.len()))
        .filter(|point| point.iter().all(|value| value.is_finite()))
        .map(|point| (camera.project(*point, &bounds), height_color(point[2], &bounds)))
        .collect();
    projected.sort_by(|a, b| a.0[2].total_cmp(&b.0[2]));

    for ([x, y, _], color) in projected {
        let position = rect.center() + egui::vec2(x * scale, -y * scale);
        painter.circle_filled(position, POINT_RADIUS, rgb_color(color));
    }
}
