use std::time::{Duration, Instant};

use brick_review_adapters::RequestDispatcher;
use brick_review_application::{
    DetailOutcome, DetailState, DetailTicket, LoadImageCommand, ReviewService, SaveLabelsCommand,
    SessionAction, SessionEffect, SessionResponse, SessionState, Transition,
};
use brick_review_domain::{LabelField, QuickVerdict};
use log::{debug, warn};

use crate::app::events::AppEvent;
use crate::app::state::{ImageSlot, ImageStore};
use crate::infra::config::AppConfig;

/// Owns all client state. Only the UI thread touches it; workers report
/// back through the dispatcher.
pub struct ReviewController {
    service: ReviewService,
    dispatcher: RequestDispatcher<AppEvent>,
    session: SessionState,
    detail: DetailState,
    images: ImageStore,
    auto_advance: bool,
}

impl ReviewController {
    pub fn new(
        service: ReviewService,
        config: &AppConfig,
        wake: impl Fn() + Send + Sync + 'static,
    ) -> Self {
        Self {
            service,
            dispatcher: RequestDispatcher::new(wake),
            session: SessionState::default(),
            detail: DetailState::new(Duration::from_millis(config.save_notice_ms)),
            images: ImageStore::default(),
            auto_advance: config.auto_advance,
        }
    }

    pub fn start(&mut self) {
        self.reduce(SessionAction::Start);
    }

    pub fn select_date(&mut self, date: String) {
        self.reduce(SessionAction::SelectDate(date));
    }

    pub fn select_capture(&mut self, capture_id: String) {
        self.reduce(SessionAction::SelectCapture(capture_id));
    }

    pub fn has_next_capture(&self) -> bool {
        self.session.next_capture().is_some()
    }

    pub fn edit_label(&mut self, field: LabelField, value: String) {
        *self.detail.draft_field_mut(field) = value;
        self.detail.note_edit();
    }

    pub fn set_flags(&mut self, verdict: QuickVerdict) {
        self.detail.set_flags(verdict);
    }

    pub fn save(&mut self, advance: bool) {
        let outcomes = self.detail.save(advance);
        self.run_outcomes(outcomes);
    }

    /// Saves the verdict, advancing afterwards when configured to.
    pub fn quick_verdict(&mut self, verdict: QuickVerdict) {
        let outcomes = self.detail.quick_verdict(verdict, self.auto_advance);
        self.run_outcomes(outcomes);
    }

    pub fn open_point_cloud_viewer(&mut self) {
        let outcomes = self.detail.open_point_cloud_viewer();
        self.run_outcomes(outcomes);
    }

    pub fn close_point_cloud_viewer(&mut self) {
        self.detail.close_point_cloud_viewer();
    }

    /// Applies every finished job, then expires the save notice.
    pub fn poll(&mut self, now: Instant) {
        for event in self.dispatcher.drain() {
            self.handle(event);
        }
        self.detail.tick(now);
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn detail(&self) -> &DetailState {
        &self.detail
    }

    pub fn images(&self) -> &ImageStore {
        &self.images
    }

    pub fn in_flight(&self) -> usize {
        self.dispatcher.in_flight()
    }

    fn handle(&mut self, event: AppEvent) {
        match event {
            AppEvent::Session(SessionResponse::Dates(result)) => {
                self.reduce(SessionAction::DatesLoaded(result));
            }
            AppEvent::Session(SessionResponse::Captures { request, result }) => {
                self.reduce(SessionAction::CapturesLoaded { request, result });
            }
            AppEvent::Detail(ticket, response) => {
                let outcomes = self.detail.apply(&ticket, response);
                self.run_outcomes(outcomes);
            }
            AppEvent::Image {
                ticket,
                slot,
                result,
            } => {
                let image = match result {
                    Ok(image) => Some(image),
                    Err(error) => {
                        warn!("image {slot:?} for {} unavailable: {error}", ticket.key);
                        None
                    }
                };
                if !self.images.complete(&ticket, slot, image) {
                    debug!("dropping stale image for {}", ticket.key);
                }
            }
            AppEvent::Saved { request, result } => {
                let outcomes = self.detail.apply_save(&request, result, Instant::now());
                self.run_outcomes(outcomes);
            }
        }
    }

    fn reduce(&mut self, action: SessionAction) {
        let previous = self.session.selected_key();
        let Transition { state, effects } = self.session.reduce(action);
        self.session = state;
        for effect in effects {
            self.spawn_session_effect(effect);
        }

        let current = self.session.selected_key();
        if current == previous {
            return;
        }
        match current {
            Some(key) => {
                let outcomes = self.detail.begin(key);
                self.images.reset(None);
                self.run_outcomes(outcomes);
            }
            None => {
                self.detail.reset();
                self.images.reset(None);
            }
        }
    }

    fn spawn_session_effect(&self, effect: SessionEffect) {
        let service = self.service.clone();
        let name = match &effect {
            SessionEffect::LoadDates => "dates",
            SessionEffect::LoadCaptures(_) => "captures",
        };
        self.dispatcher.spawn(name, move || {
            AppEvent::Session(service.run_session_effect(&effect))
        });
    }

    fn run_outcomes(&mut self, outcomes: Vec<DetailOutcome>) {
        for outcome in outcomes {
            match outcome {
                DetailOutcome::Fetch(ticket, request) => {
                    let service = self.service.clone();
                    self.dispatcher.spawn("detail", move || {
                        let response = service.run_detail_request(&ticket, request);
                        AppEvent::Detail(ticket, response)
                    });
                }
                DetailOutcome::LoadCameraImages(ticket, cameras) => {
                    self.adopt_images(&ticket);
                    for camera in cameras {
                        let url = self.service.image_url(&ticket.key, &camera);
                        self.load_image(ticket.clone(), ImageSlot::Camera(camera), url);
                    }
                }
                DetailOutcome::LoadSnapshot(ticket) => {
                    self.adopt_images(&ticket);
                    let url = self.service.point_cloud_snapshot_url(&ticket.key);
                    self.load_image(ticket, ImageSlot::Snapshot, url);
                }
                DetailOutcome::Save(request) => {
                    let service = self.service.clone();
                    self.dispatcher.spawn("save", move || {
                        let result = service.save_labels(SaveLabelsCommand {
                            key: request.ticket.key.clone(),
                            labels: request.labels.clone(),
                        });
                        AppEvent::Saved { request, result }
                    });
                }
                DetailOutcome::LabelsUpdated => self.reduce(SessionAction::RefreshCaptures),
                DetailOutcome::Advance => self.reduce(SessionAction::AdvanceToNext),
            }
        }
    }

    fn adopt_images(&mut self, ticket: &DetailTicket) {
        if self.images.owner() != Some(ticket) {
            self.images.reset(Some(ticket.clone()));
        }
    }

    fn load_image(&mut self, ticket: DetailTicket, slot: ImageSlot, url: String) {
        if !self.images.mark_loading(&ticket, slot.clone()) {
            return;
        }
        let service = self.service.clone();
        self.dispatcher.spawn("image", move || {
            let result = service.load_image(LoadImageCommand { url });
            AppEvent::Image {
                ticket,
                slot,
                result,
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::{Arc, Mutex};
    use std::thread;

    use brick_review_application::{
        ApiError, BrickInfoStatus, DetailPhase, ImageDecoder, PointCloudStatus, ReviewBackend,
        SaveStatus,
    };
    use brick_review_domain::{
        CaptureDetail, CaptureKey, CaptureSummary, ColorMapping, DecodedImage, Labels, Manifest,
        PointCloud, PointCloudInfo,
    };

    use super::*;
    use crate::app::state::ImageStatus;

    const DATE: &str = "2024-05-01";

    #[derive(Default)]
    struct FakeBackend {
        captures: Vec<CaptureSummary>,
        fail_detail: bool,
        fail_point_cloud_info: bool,
        saved: Mutex<Vec<(String, Labels)>>,
    }

    fn summary(id: &str) -> CaptureSummary {
        CaptureSummary {
            capture_id: id.to_string(),
            date: DATE.to_string(),
            has_labels: false,
            labeled_at: None,
            image_count: 2,
            has_point_cloud: true,
        }
    }

    impl ReviewBackend for FakeBackend {
        fn list_dates(&self) -> Result<Vec<String>, ApiError> {
            Ok(vec![DATE.to_string(), "2024-04-30".to_string()])
        }

        fn list_captures(&self, date: &str) -> Result<Vec<CaptureSummary>, ApiError> {
            if date == DATE {
                Ok(self.captures.clone())
            } else {
                Ok(Vec::new())
            }
        }

        fn capture_detail(&self, key: &CaptureKey) -> Result<CaptureDetail, ApiError> {
            if self.fail_detail {
                return Err(ApiError::status(500, Some("boom".to_string())));
            }
            let mut images = BTreeMap::new();
            images.insert("cam0".to_string(), "cam0.jpg".to_string());
            images.insert("cam1".to_string(), "missing.jpg".to_string());
            Ok(CaptureDetail {
                capture_id: key.capture_id().to_string(),
                date: key.date().to_string(),
                manifest: Some(Manifest {
                    capture_id: key.capture_id().to_string(),
                    created_at: "2024-05-01T10:00:00".to_string(),
                    labeled_at: None,
                    labels: Some(Labels {
                        validity: "valid".to_string(),
                        ..Labels::default()
                    }),
                    metadata: BTreeMap::new(),
                }),
                images,
                point_cloud_exists: true,
                point_cloud_path: Some("cloud.ply".to_string()),
            })
        }

        fn update_labels(&self, key: &CaptureKey, labels: &Labels) -> Result<(), ApiError> {
            self.saved
                .lock()
                .expect("saved lock")
                .push((key.capture_id().to_string(), labels.clone()));
            Ok(())
        }

        fn brick_info_text(&self, _key: &CaptureKey) -> Result<String, ApiError> {
            Ok("Brick Id: 12\nColor Prediction: 3\n".to_string())
        }

        fn color_mapping(&self) -> Result<ColorMapping, ApiError> {
            serde_json::from_str(r#"{"3": {"name": "Red", "rgb": [1, 0, 0]}}"#)
                .map_err(|error| ApiError::decode(error.to_string()))
        }

        fn point_cloud_info(&self, _key: &CaptureKey) -> Result<PointCloudInfo, ApiError> {
            if self.fail_point_cloud_info {
                return Err(ApiError::transport("connection reset"));
            }
            Ok(PointCloudInfo {
                exists: true,
                num_points: Some(1200),
                file_size: Some(1_048_576),
            })
        }

        fn point_cloud(&self, _key: &CaptureKey) -> Result<PointCloud, ApiError> {
            Ok(PointCloud {
                points: vec![[0.0, 0.0, 0.0], [1.0, 1.0, 1.0]],
            })
        }

        fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, ApiError> {
            if url.contains("cam1") {
                Err(ApiError::status(404, None))
            } else {
                Ok(vec![0; 4])
            }
        }

        fn image_url(&self, key: &CaptureKey, camera_id: &str) -> String {
            format!("mem://{key}/image/{camera_id}")
        }

        fn point_cloud_snapshot_url(&self, key: &CaptureKey) -> String {
            format!("mem://{key}/snapshot")
        }
    }

    struct OnePixelDecoder;

    impl ImageDecoder for OnePixelDecoder {
        fn decode(&self, _bytes: &[u8]) -> Result<DecodedImage, ApiError> {
            Ok(DecodedImage {
                width: 1,
                height: 1,
                rgba: vec![255, 0, 0, 255],
            })
        }
    }

    fn controller(backend: FakeBackend) -> (ReviewController, Arc<FakeBackend>) {
        let backend = Arc::new(backend);
        let service = ReviewService::new(backend.clone(), Arc::new(OnePixelDecoder));
        let config = AppConfig {
            save_notice_ms: 60_000,
            ..AppConfig::default()
        };
        (ReviewController::new(service, &config, || {}), backend)
    }

    fn settle(controller: &mut ReviewController) {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            controller.poll(Instant::now());
            if controller.in_flight() == 0 {
                controller.poll(Instant::now());
                if controller.in_flight() == 0 {
                    return;
                }
            }
            assert!(Instant::now() < deadline, "timed out waiting for workers");
            thread::sleep(Duration::from_millis(5));
        }
    }

    fn backend_with(ids: &[&str]) -> FakeBackend {
        FakeBackend {
            captures: ids.iter().map(|id| summary(id)).collect(),
            ..FakeBackend::default()
        }
    }

    #[test]
    fn start_selects_first_date_and_loads_its_captures() {
        let (mut controller, _) = controller(backend_with(&["a", "b"]));
        controller.start();
        settle(&mut controller);

        let session = controller.session();
        assert_eq!(session.selected_date.as_deref(), Some(DATE));
        assert_eq!(session.captures.len(), 2);
        assert!(session.selected_capture.is_none());
        assert_eq!(controller.detail().phase(), &DetailPhase::Idle);
    }

    #[test]
    fn selecting_a_capture_loads_detail_images_and_brick_info() {
        let (mut controller, _) = controller(backend_with(&["a", "b"]));
        controller.start();
        settle(&mut controller);
        controller.select_capture("a".to_string());
        settle(&mut controller);

        let detail = controller.detail();
        assert_eq!(detail.phase(), &DetailPhase::Ready);
        assert_eq!(detail.draft().validity, "valid");
        match detail.brick_info() {
            BrickInfoStatus::Ready(info) => assert_eq!(info.color_prediction, "Red"),
            other => panic!("unexpected brick info {other:?}"),
        }
        assert!(matches!(detail.point_cloud(), PointCloudStatus::Available(_)));

        let images = controller.images();
        assert!(matches!(
            images.get(&ImageSlot::Camera("cam0".to_string())),
            Some(ImageStatus::Ready(_))
        ));
        assert!(matches!(
            images.get(&ImageSlot::Camera("cam1".to_string())),
            Some(ImageStatus::Missing)
        ));
        assert!(matches!(images.get(&ImageSlot::Snapshot), Some(ImageStatus::Ready(_))));
    }

    #[test]
    fn failing_detail_shows_error_without_images() {
        let (mut controller, _) = controller(FakeBackend {
            fail_detail: true,
            ..backend_with(&["a"])
        });
        controller.start();
        settle(&mut controller);
        controller.select_capture("a".to_string());
        settle(&mut controller);

        match controller.detail().phase() {
            DetailPhase::Failed(message) => assert!(message.contains("HTTP error 500")),
            other => panic!("unexpected phase {other:?}"),
        }
        assert!(controller.images().cameras().next().is_none());
    }

    #[test]
    fn point_cloud_info_failure_only_degrades_that_section() {
        let (mut controller, _) = controller(FakeBackend {
            fail_point_cloud_info: true,
            ..backend_with(&["a"])
        });
        controller.start();
        settle(&mut controller);
        controller.select_capture("a".to_string());
        settle(&mut controller);

        assert_eq!(controller.detail().phase(), &DetailPhase::Ready);
        assert_eq!(controller.detail().point_cloud(), &PointCloudStatus::InfoUnavailable);
        assert_eq!(controller.images().cameras().count(), 2);
    }

    #[test]
    fn save_and_advance_sends_full_labels_and_moves_on() {
        let (mut controller, backend) = controller(backend_with(&["a", "b"]));
        controller.start();
        settle(&mut controller);
        controller.select_capture("a".to_string());
        settle(&mut controller);

        controller.edit_label(LabelField::Color, "blue".to_string());
        controller.save(true);
        settle(&mut controller);

        let saved = backend.saved.lock().expect("saved lock").clone();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].0, "a");
        assert_eq!(saved[0].1.validity, "valid");
        assert_eq!(saved[0].1.color, "blue");
        assert_eq!(controller.session().selected_capture.as_deref(), Some("b"));
        assert_eq!(controller.detail().key().map(|key| key.capture_id()), Some("b"));
    }

    #[test]
    fn save_and_advance_on_last_capture_keeps_selection() {
        let (mut controller, backend) = controller(backend_with(&["a"]));
        controller.start();
        settle(&mut controller);
        controller.select_capture("a".to_string());
        settle(&mut controller);
        assert!(!controller.has_next_capture());

        controller.save(true);
        settle(&mut controller);

        assert_eq!(backend.saved.lock().expect("saved lock").len(), 1);
        assert_eq!(controller.session().selected_capture.as_deref(), Some("a"));
        assert!(matches!(controller.detail().save_status(), SaveStatus::Saved { .. }));
    }

    #[test]
    fn save_notice_expires_after_its_lifetime() {
        let (mut controller, _) = controller(backend_with(&["a"]));
        controller.start();
        settle(&mut controller);
        controller.select_capture("a".to_string());
        settle(&mut controller);
        controller.save(false);
        settle(&mut controller);

        let deadline = controller.detail().notice_deadline().expect("notice deadline");
        controller.poll(deadline + Duration::from_millis(1));
        assert_eq!(controller.detail().save_status(), &SaveStatus::Idle);
    }

    #[test]
    fn changing_date_clears_capture_and_detail() {
        let (mut controller, _) = controller(backend_with(&["a"]));
        controller.start();
        settle(&mut controller);
        controller.select_capture("a".to_string());
        settle(&mut controller);

        controller.select_date("2024-04-30".to_string());
        assert!(controller.session().selected_capture.is_none());
        assert_eq!(controller.detail().phase(), &DetailPhase::Idle);
        settle(&mut controller);
        assert!(controller.session().captures.is_empty());
    }

    #[test]
    fn quick_verdict_sets_flags_and_saves() {
        let (mut controller, backend) = controller(backend_with(&["a", "b"]));
        controller.start();
        settle(&mut controller);
        controller.select_capture("a".to_string());
        settle(&mut controller);

        controller.quick_verdict(QuickVerdict::new(true, false));
        settle(&mut controller);

        let saved = backend.saved.lock().expect("saved lock").clone();
        assert_eq!(saved.len(), 1);
        assert!(saved[0].1.correct_color);
        assert!(!saved[0].1.correct_shape);
        assert_eq!(controller.session().selected_capture.as_deref(), Some("b"));
    }
}
