use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::{DomainError, Labels};

/// Identifies one capture inside one dated batch.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CaptureKey {
    date: String,
    capture_id: String,
}

impl CaptureKey {
    pub fn new(
        date: impl Into<String>,
        capture_id: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let date = date.into();
        let capture_id = capture_id.into();
        if date.trim().is_empty() {
            return Err(DomainError::EmptyDate);
        }
        if capture_id.trim().is_empty() {
            return Err(DomainError::EmptyCaptureId);
        }
        Ok(Self { date, capture_id })
    }

    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn capture_id(&self) -> &str {
        &self.capture_id
    }
}

impl Display for CaptureKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.date, self.capture_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureSummary {
    pub capture_id: String,
    pub date: String,
    pub has_labels: bool,
    #[serde(default)]
    pub labeled_at: Option<String>,
    pub image_count: u32,
    pub has_point_cloud: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    pub capture_id: String,
    pub created_at: String,
    #[serde(default)]
    pub labeled_at: Option<String>,
    #[serde(default)]
    pub labels: Option<Labels>,
    #[serde(default)]
    pub metadata: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptureDetail {
    pub capture_id: String,
    pub date: String,
    #[serde(default)]
    pub manifest: Option<Manifest>,
    /// Camera id to the server-relative image reference.
    #[serde(default)]
    pub images: BTreeMap<String, String>,
    pub point_cloud_exists: bool,
    #[serde(default)]
    pub point_cloud_path: Option<String>,
}

impl CaptureDetail {
    pub fn saved_labels(&self) -> Option<&Labels> {
        self.manifest.as_ref().and_then(|manifest| manifest.labels.as_ref())
    }

    pub fn camera_ids(&self) -> impl Iterator<Item = &str> {
        self.images.keys().map(String::as_str)
    }
}

/// Position of the capture that follows `selected` in server order.
pub fn next_capture<'a>(
    captures: &'a [CaptureSummary],
    selected: Option<&str>,
) -> Option<&'a CaptureSummary> {
    let selected = selected?;
    let index = captures
        .iter()
        .position(|capture| capture.capture_id == selected)?;
    captures.get(index + 1)
}
