//! Per-capture detail panel state machine.
//!
//! `begin` moves the panel to `Loading` and hands out a ticket that every
//! request carries. Responses whose ticket does not match the current
//! (key, generation) pair are dropped, so a slow response for an earlier
//! selection can never overwrite the one on screen.

use std::sync::Arc;
use std::time::{Duration, Instant};

use brick_review_domain::{
    BrickInfo, CaptureDetail, CaptureKey, ColorMapping, LabelField, Labels, PointCloud,
    PointCloudInfo, QuickVerdict,
};
use log::{debug, warn};

use crate::ApiError;

pub const SAVE_SUCCESS_MESSAGE: &str = "Labels saved successfully!";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DetailTicket {
    pub key: CaptureKey,
    pub generation: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailRequest {
    Detail,
    BrickInfoText,
    ColorMapping,
    PointCloudInfo,
    PointCloud,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DetailResponse {
    Detail(Result<CaptureDetail, ApiError>),
    BrickInfoText(Result<String, ApiError>),
    ColorMapping(Result<ColorMapping, ApiError>),
    PointCloudInfo(Result<PointCloudInfo, ApiError>),
    PointCloud(Result<PointCloud, ApiError>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SaveRequest {
    pub ticket: DetailTicket,
    pub labels: Labels,
    pub advance: bool,
}

/// Work the owner of the state has to carry out.
#[derive(Debug, Clone, PartialEq)]
pub enum DetailOutcome {
    Fetch(DetailTicket, DetailRequest),
    LoadCameraImages(DetailTicket, Vec<String>),
    LoadSnapshot(DetailTicket),
    Save(SaveRequest),
    LabelsUpdated,
    Advance,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DetailPhase {
    Idle,
    Loading,
    Ready,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum BrickInfoStatus {
    Loading,
    Ready(BrickInfo),
    Unavailable(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum PointCloudStatus {
    Absent,
    Loading,
    Available(PointCloudInfo),
    /// The capture has a point cloud but its info could not be fetched.
    InfoUnavailable,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PointCloudView {
    Closed,
    Loading,
    Ready(Arc<PointCloud>),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SaveStatus {
    Idle,
    Saving { advance: bool },
    Saved { message: String, expires_at: Instant },
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct DetailState {
    generation: u64,
    key: Option<CaptureKey>,
    phase: DetailPhase,
    detail: Option<CaptureDetail>,
    brick_text: Option<Result<String, ApiError>>,
    color_mapping: Option<ColorMapping>,
    brick_info: BrickInfoStatus,
    point_cloud: PointCloudStatus,
    point_cloud_view: PointCloudView,
    draft: Labels,
    save: SaveStatus,
    notice_lifetime: Duration,
}

impl DetailState {
    pub fn new(notice_lifetime: Duration) -> Self {
        Self {
            generation: 0,
            key: None,
            phase: DetailPhase::Idle,
            detail: None,
            brick_text: None,
            color_mapping: None,
            brick_info: BrickInfoStatus::Loading,
            point_cloud: PointCloudStatus::Absent,
            point_cloud_view: PointCloudView::Closed,
            draft: Labels::default(),
            save: SaveStatus::Idle,
            notice_lifetime,
        }
    }

    /// Starts loading `key`, discarding every trace of the previous capture.
    pub fn begin(&mut self, key: CaptureKey) -> Vec<DetailOutcome> {
        self.clear();
        self.key = Some(key.clone());
        self.phase = DetailPhase::Loading;
        let ticket = DetailTicket {
            key,
            generation: self.generation,
        };
        [
            DetailRequest::Detail,
            DetailRequest::BrickInfoText,
            DetailRequest::ColorMapping,
        ]
        .into_iter()
        .map(|request| DetailOutcome::Fetch(ticket.clone(), request))
        .collect()
    }

    /// Back to `Idle`; in-flight responses become stale.
    pub fn reset(&mut self) {
        self.clear();
    }

    fn clear(&mut self) {
        self.generation += 1;
        self.key = None;
        self.phase = DetailPhase::Idle;
        self.detail = None;
        self.brick_text = None;
        self.color_mapping = None;
        self.brick_info = BrickInfoStatus::Loading;
        self.point_cloud = PointCloudStatus::Absent;
        self.point_cloud_view = PointCloudView::Closed;
        self.draft = Labels::default();
        self.save = SaveStatus::Idle;
    }

    pub fn is_current(&self, ticket: &DetailTicket) -> bool {
        ticket.generation == self.generation && self.key.as_ref() == Some(&ticket.key)
    }

    fn ticket(&self) -> Option<DetailTicket> {
        self.key.clone().map(|key| DetailTicket {
            key,
            generation: self.generation,
        })
    }

    pub fn apply(&mut self, ticket: &DetailTicket, response: DetailResponse) -> Vec<DetailOutcome> {
        if !self.is_current(ticket) {
            debug!(
                "dropping stale detail response for {} (generation {})",
                ticket.key, ticket.generation
            );
            return Vec::new();
        }

        match response {
            DetailResponse::Detail(Ok(detail)) => self.on_detail(ticket, detail),
            DetailResponse::Detail(Err(error)) => {
                warn!("capture detail for {} failed: {error}", ticket.key);
                self.phase = DetailPhase::Failed(format!("Failed to load capture detail: {error}"));
                Vec::new()
            }
            DetailResponse::BrickInfoText(result) => {
                self.brick_text = Some(result);
                self.resolve_brick_info();
                Vec::new()
            }
            DetailResponse::ColorMapping(result) => {
                let mapping = result.unwrap_or_else(|error| {
                    warn!("color mapping unavailable, predictions stay unresolved: {error}");
                    ColorMapping::default()
                });
                self.color_mapping = Some(mapping);
                self.resolve_brick_info();
                Vec::new()
            }
            DetailResponse::PointCloudInfo(Ok(info)) => {
                self.point_cloud = PointCloudStatus::Available(info);
                Vec::new()
            }
            DetailResponse::PointCloudInfo(Err(error)) => {
                warn!("point cloud info for {} failed: {error}", ticket.key);
                self.point_cloud = PointCloudStatus::InfoUnavailable;
                Vec::new()
            }
            DetailResponse::PointCloud(_) if self.point_cloud_view != PointCloudView::Loading => {
                debug!("dropping point cloud for {}, viewer was closed", ticket.key);
                Vec::new()
            }
            DetailResponse::PointCloud(Ok(cloud)) => {
                self.point_cloud_view = PointCloudView::Ready(Arc::new(cloud));
                Vec::new()
            }
            DetailResponse::PointCloud(Err(error)) => {
                self.point_cloud_view =
                    PointCloudView::Failed(format!("Failed to load point cloud: {error}"));
                Vec::new()
            }
        }
    }

    fn on_detail(&mut self, ticket: &DetailTicket, detail: CaptureDetail) -> Vec<DetailOutcome> {
        self.draft = detail.saved_labels().cloned().unwrap_or_default();
        self.phase = DetailPhase::Ready;

        let mut outcomes = vec![DetailOutcome::LoadCameraImages(
            ticket.clone(),
            detail.camera_ids().map(str::to_string).collect(),
        )];
        if detail.point_cloud_exists {
            self.point_cloud = PointCloudStatus::Loading;
            outcomes.push(DetailOutcome::Fetch(
                ticket.clone(),
                DetailRequest::PointCloudInfo,
            ));
            outcomes.push(DetailOutcome::LoadSnapshot(ticket.clone()));
        } else {
            self.point_cloud = PointCloudStatus::Absent;
        }
        self.detail = Some(detail);
        outcomes
    }

    fn resolve_brick_info(&mut self) {
        let (Some(text), Some(mapping)) = (&self.brick_text, &self.color_mapping) else {
            return;
        };
        self.brick_info = match text {
            Ok(text) => BrickInfoStatus::Ready(BrickInfo::parse(text, mapping)),
            Err(error) => BrickInfoStatus::Unavailable(format!("Brick info unavailable: {error}")),
        };
    }

    pub fn open_point_cloud_viewer(&mut self) -> Vec<DetailOutcome> {
        let has_cloud = self
            .detail
            .as_ref()
            .is_some_and(|detail| detail.point_cloud_exists);
        if !has_cloud
            || matches!(
                self.point_cloud_view,
                PointCloudView::Loading | PointCloudView::Ready(_)
            )
        {
            return Vec::new();
        }
        let Some(ticket) = self.ticket() else {
            return Vec::new();
        };
        self.point_cloud_view = PointCloudView::Loading;
        vec![DetailOutcome::Fetch(ticket, DetailRequest::PointCloud)]
    }

    pub fn close_point_cloud_viewer(&mut self) {
        self.point_cloud_view = PointCloudView::Closed;
    }

    pub fn draft(&self) -> &Labels {
        &self.draft
    }

    pub fn draft_field_mut(&mut self, field: LabelField) -> &mut String {
        self.draft.field_mut(field)
    }

    /// Checkbox edits in the text editor; nothing is saved.
    pub fn set_flags(&mut self, verdict: QuickVerdict) {
        if self.draft.correct_color == verdict.color_correct
            && self.draft.correct_shape == verdict.shape_correct
        {
            return;
        }
        self.draft.apply_verdict(verdict);
        self.note_edit();
    }

    /// Call after any keystroke in the label editor.
    pub fn note_edit(&mut self) {
        if matches!(self.save, SaveStatus::Saved { .. }) {
            self.save = SaveStatus::Idle;
        }
    }

    pub fn can_save(&self) -> bool {
        self.phase == DetailPhase::Ready && !matches!(self.save, SaveStatus::Saving { .. })
    }

    /// Sends the whole draft. `advance` asks the shell to move on afterwards.
    pub fn save(&mut self, advance: bool) -> Vec<DetailOutcome> {
        if !self.can_save() {
            return Vec::new();
        }
        let Some(ticket) = self.ticket() else {
            return Vec::new();
        };
        self.save = SaveStatus::Saving { advance };
        vec![DetailOutcome::Save(SaveRequest {
            ticket,
            labels: self.draft.clone(),
            advance,
        })]
    }

    pub fn quick_verdict(&mut self, verdict: QuickVerdict, advance: bool) -> Vec<DetailOutcome> {
        if !self.can_save() {
            return Vec::new();
        }
        self.draft.apply_verdict(verdict);
        self.save(advance)
    }

    pub fn apply_save(
        &mut self,
        request: &SaveRequest,
        result: Result<(), ApiError>,
        now: Instant,
    ) -> Vec<DetailOutcome> {
        if !self.is_current(&request.ticket) {
            return match result {
                Ok(()) => vec![DetailOutcome::LabelsUpdated],
                Err(error) => {
                    warn!("save for {} failed after leaving it: {error}", request.ticket.key);
                    Vec::new()
                }
            };
        }

        match result {
            Ok(()) => {
                self.save = SaveStatus::Saved {
                    message: SAVE_SUCCESS_MESSAGE.to_string(),
                    expires_at: now + self.notice_lifetime,
                };
                let mut outcomes = vec![DetailOutcome::LabelsUpdated];
                if request.advance {
                    outcomes.push(DetailOutcome::Advance);
                }
                outcomes
            }
            Err(error) => {
                warn!("saving labels for {} failed: {error}", request.ticket.key);
                self.save = SaveStatus::Failed(format!("Failed to save labels: {error}"));
                Vec::new()
            }
        }
    }

    /// Expires the save confirmation once its deadline has passed.
    pub fn tick(&mut self, now: Instant) {
        if let SaveStatus::Saved { expires_at, .. } = &self.save {
            if now >= *expires_at {
                self.save = SaveStatus::Idle;
            }
        }
    }

    pub fn notice_deadline(&self) -> Option<Instant> {
        match &self.save {
            SaveStatus::Saved { expires_at, .. } => Some(*expires_at),
            _ => None,
        }
    }

    pub fn key(&self) -> Option<&CaptureKey> {
        self.key.as_ref()
    }

    pub fn phase(&self) -> &DetailPhase {
        &self.phase
    }

    pub fn detail(&self) -> Option<&CaptureDetail> {
        self.detail.as_ref()
    }

    pub fn brick_info(&self) -> &BrickInfoStatus {
        &self.brick_info
    }

    pub fn point_cloud(&self) -> &PointCloudStatus {
        &self.point_cloud
    }

    pub fn point_cloud_view(&self) -> &PointCloudView {
        &self.point_cloud_view
    }

    pub fn save_status(&self) -> &SaveStatus {
        &self.save
    }
}
