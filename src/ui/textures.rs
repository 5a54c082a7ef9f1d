use std::collections::BTreeMap;

use brick_review_application::DetailTicket;
use brick_review_domain::DecodedImage;
use eframe::egui;

use crate::app::state::ImageSlot;

/// GPU textures for the images of the capture on screen.
#[derive(Default)]
pub struct TextureCache {
    owner: Option<DetailTicket>,
    textures: BTreeMap<ImageSlot, egui::TextureHandle>,
}

impl TextureCache {
    /// Drops every texture once the images belong to another load.
    pub fn sync(&mut self, owner: Option<&DetailTicket>) {
        if self.owner.as_ref() != owner {
            self.owner = owner.cloned();
            self.textures.clear();
        }
    }

    pub fn get_or_upload(
        &mut self,
        ctx: &egui::Context,
        slot: &ImageSlot,
        image: &DecodedImage,
    ) -> egui::TextureHandle {
        self.textures
            .entry(slot.clone())
            .or_insert_with(|| {
                let pixels = egui::ColorImage::from_rgba_unmultiplied(image.size(), &image.rgba);
                ctx.load_texture(texture_name(slot), pixels, egui::TextureOptions::LINEAR)
            })
            .clone()
    }
}

fn texture_name(slot: &ImageSlot) -> String {
    match slot {
        ImageSlot::Camera(id) => format!("camera-{id}"),
        ImageSlot::Snapshot => "point-cloud-snapshot".to_string(),
    }
}

pub fn rgb_color([r, g, b]: [u8; 3]) -> egui::Color32 {
    egui::Color32::from_rgb(r, g, b)
}
