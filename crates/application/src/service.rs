use std::sync::Arc;

use brick_review_domain::{
    BrickInfo, CaptureDetail, CaptureKey, CaptureSummary, ColorMapping, DecodedImage,
};
use log::{debug, warn};

use crate::{
    ApiError, CaptureRequest, DetailRequest, DetailResponse, DetailTicket, ImageDecoder,
    ListCapturesCommand, ListDatesCommand, LoadImageCommand, ReviewBackend, SaveLabelsCommand,
    SessionEffect, ShowCaptureCommand,
};

/// Executes use cases against the backend. Cheap to clone into workers.
#[derive(Clone)]
pub struct ReviewService {
    backend: Arc<dyn ReviewBackend>,
    decoder: Arc<dyn ImageDecoder>,
}

/// Result of a session effect, ready to feed back into the reducer.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionResponse {
    Dates(Result<Vec<String>, ApiError>),
    Captures {
        request: CaptureRequest,
        result: Result<Vec<CaptureSummary>, ApiError>,
    },
}

impl ReviewService {
    pub fn new(backend: Arc<dyn ReviewBackend>, decoder: Arc<dyn ImageDecoder>) -> Self {
        Self { backend, decoder }
    }

    pub fn list_dates(&self, _command: ListDatesCommand) -> Result<Vec<String>, ApiError> {
        self.backend.list_dates()
    }

    pub fn list_captures(
        &self,
        command: ListCapturesCommand,
    ) -> Result<Vec<CaptureSummary>, ApiError> {
        self.backend.list_captures(&command.date)
    }

    pub fn show_capture(&self, command: ShowCaptureCommand) -> Result<CaptureDetail, ApiError> {
        self.backend.capture_detail(&command.key)
    }

    pub fn save_labels(&self, command: SaveLabelsCommand) -> Result<(), ApiError> {
        debug!("saving labels for {}", command.key);
        self.backend.update_labels(&command.key, &command.labels)
    }

    /// Fetches the raw text and the mapping, then parses. A mapping failure
    /// leaves every prediction as the unknown-color marker.
    pub fn brick_info(&self, key: &CaptureKey) -> Result<BrickInfo, ApiError> {
        let text = self.backend.brick_info_text(key)?;
        let mapping = self.backend.color_mapping().unwrap_or_else(|error| {
            warn!("color mapping unavailable: {error}");
            ColorMapping::default()
        });
        Ok(BrickInfo::parse(&text, &mapping))
    }

    pub fn load_image(&self, command: LoadImageCommand) -> Result<DecodedImage, ApiError> {
        let bytes = self.backend.fetch_bytes(&command.url)?;
        self.decoder.decode(&bytes)
    }

    pub fn run_session_effect(&self, effect: &SessionEffect) -> SessionResponse {
        match effect {
            SessionEffect::LoadDates => SessionResponse::Dates(self.list_dates(ListDatesCommand)),
            SessionEffect::LoadCaptures(request) => SessionResponse::Captures {
                request: request.clone(),
                result: self.list_captures(ListCapturesCommand {
                    date: request.date.clone(),
                }),
            },
        }
    }

    pub fn run_detail_request(
        &self,
        ticket: &DetailTicket,
        request: DetailRequest,
    ) -> DetailResponse {
        let key = &ticket.key;
        match request {
            DetailRequest::Detail => DetailResponse::Detail(self.show_capture(ShowCaptureCommand {
                key: key.clone(),
            })),
            DetailRequest::BrickInfoText => {
                DetailResponse::BrickInfoText(self.backend.brick_info_text(key))
            }
            DetailRequest::ColorMapping => {
                DetailResponse::ColorMapping(self.backend.color_mapping())
            }
            DetailRequest::PointCloudInfo => {
                DetailResponse::PointCloudInfo(self.backend.point_cloud_info(key))
            }
            DetailRequest::PointCloud => DetailResponse::PointCloud(self.backend.point_cloud(key)),
        }
    }

    pub fn image_url(&self, key: &CaptureKey, camera_id: &str) -> String {
        self.backend.image_url(key, camera_id)
    }

    pub fn point_cloud_snapshot_url(&self, key: &CaptureKey) -> String {
        self.backend.point_cloud_snapshot_url(key)
    }
}
