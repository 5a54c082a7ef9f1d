use std::collections::BTreeMap;
use std::sync::Arc;

use brick_review_application::DetailTicket;
use brick_review_domain::DecodedImage;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ImageSlot {
    Camera(String),
    Snapshot,
}

#[derive(Debug, Clone)]
pub enum ImageStatus {
    Loading,
    Ready(Arc<DecodedImage>),
    /// Fetch or decode failed; shown as a placeholder.
    Missing,
}

/// Decoded images for the capture on screen. Results carrying another
/// ticket are ignored.
#[derive(Debug, Default)]
pub struct ImageStore {
    owner: Option<DetailTicket>,
    entries: BTreeMap<ImageSlot, ImageStatus>,
}

impl ImageStore {
    pub fn reset(&mut self, owner: Option<DetailTicket>) {
        self.owner = owner;
        self.entries.clear();
    }

    pub fn owner(&self) -> Option<&DetailTicket> {
        self.owner.as_ref()
    }

    pub fn mark_loading(&mut self, ticket: &DetailTicket, slot: ImageSlot) -> bool {
        if self.owner.as_ref() != Some(ticket) {
            return false;
        }
        self.entries.insert(slot, ImageStatus::Loading);
        true
    }

    pub fn complete(
        &mut self,
        ticket: &DetailTicket,
        slot: ImageSlot,
        image: Option<DecodedImage>,
    ) -> bool {
        if self.owner.as_ref() != Some(ticket) || !self.entries.contains_key(&slot) {
            return false;
        }
        let status = match image {
            Some(image) if image.is_consistent() => ImageStatus::Ready(Arc::new(image)),
            _ => ImageStatus::Missing,
        };
        self.entries.insert(slot, status);
        true
    }

    pub fn get(&self, slot: &ImageSlot) -> Option<&ImageStatus> {
        self.entries.get(slot)
    }

    pub fn cameras(&self) -> impl Iterator<Item = (&str, &ImageStatus)> {
        self.entries.iter().filter_map(|(slot, status)| match slot {
            ImageSlot::Camera(id) => Some((id.as_str(), status)),
            ImageSlot::Snapshot => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use brick_review_domain::CaptureKey;

    use super::*;

    fn ticket(id: &str, generation: u64) -> DetailTicket {
        DetailTicket {
            key: CaptureKey::new("2024-05-01", id).expect("key"),
            generation,
        }
    }

    fn pixel() -> DecodedImage {
        DecodedImage {
            width: 1,
            height: 1,
            rgba: vec![0, 0, 0, 255],
        }
    }

    #[test]
    fn results_for_other_tickets_are_ignored() {
        let mut store = ImageStore::default();
        store.reset(Some(ticket("a", 1)));
        assert!(store.mark_loading(&ticket("a", 1), ImageSlot::Camera("cam0".to_string())));

        let slot = ImageSlot::Camera("cam0".to_string());
        assert!(!store.complete(&ticket("a", 0), slot.clone(), Some(pixel())));
        assert!(matches!(store.get(&slot), Some(ImageStatus::Loading)));

        assert!(store.complete(&ticket("a", 1), slot.clone(), Some(pixel())));
        assert!(matches!(store.get(&slot), Some(ImageStatus::Ready(_))));
    }

    #[test]
    fn failed_or_malformed_images_become_missing() {
        let owner = ticket("a", 3);
        let mut store = ImageStore::default();
        store.reset(Some(owner.clone()));
        store.mark_loading(&owner, ImageSlot::Snapshot);
        store.mark_loading(&owner, ImageSlot::Camera("cam1".to_string()));

        store.complete(&owner, ImageSlot::Snapshot, None);
        let broken = DecodedImage {
            width: 2,
            height: 2,
            rgba: vec![0; 3],
        };
        store.complete(&owner, ImageSlot::Camera("cam1".to_string()), Some(broken));

        assert!(matches!(store.get(&ImageSlot::Snapshot), Some(ImageStatus::Missing)));
        let cameras: Vec<_> = store.cameras().collect();
        assert_eq!(cameras.len(), 1);
        assert!(matches!(cameras[0], ("cam1", ImageStatus::Missing)));
    }

    #[test]
    fn reset_drops_entries() {
        let owner = ticket("a", 1);
        let mut store = ImageStore::default();
        store.reset(Some(owner.clone()));
        store.mark_loading(&owner, ImageSlot::Snapshot);
        store.reset(None);
        assert!(store.get(&ImageSlot::Snapshot).is_none());
        assert!(!store.mark_loading(&owner, ImageSlot::Snapshot));
    }
}
