use brick_review_domain::{
    CaptureDetail, CaptureKey, CaptureSummary, ColorMapping, DecodedImage, Labels, PointCloud,
    PointCloudInfo,
};

use crate::ApiError;

/// One operation per backend resource. URL builders never touch the network.
pub trait ReviewBackend: Send + Sync {
    fn list_dates(&self) -> Result<Vec<String>, ApiError>;

    fn list_captures(&self, date: &str) -> Result<Vec<CaptureSummary>, ApiError>;

    fn capture_detail(&self, key: &CaptureKey) -> Result<CaptureDetail, ApiError>;

    /// Full replace of the stored labels.
    fn update_labels(&self, key: &CaptureKey, labels: &Labels) -> Result<(), ApiError>;

    fn brick_info_text(&self, key: &CaptureKey) -> Result<String, ApiError>;

    fn color_mapping(&self) -> Result<ColorMapping, ApiError>;

    fn point_cloud_info(&self, key: &CaptureKey) -> Result<PointCloudInfo, ApiError>;

    fn point_cloud(&self, key: &CaptureKey) -> Result<PointCloud, ApiError>;

    fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, ApiError>;

    fn image_url(&self, key: &CaptureKey, camera_id: &str) -> String;

    fn point_cloud_snapshot_url(&self, key: &CaptureKey) -> String;
}

pub trait ImageDecoder: Send + Sync {
    fn decode(&self, bytes: &[u8]) -> Result<DecodedImage, ApiError>;
}
