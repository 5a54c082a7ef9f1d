mod routes;

use std::io::Read;

use brick_review_application::{ApiError, ReviewBackend};
use brick_review_domain::{
    CaptureDetail, CaptureKey, CaptureSummary, ColorMapping, Labels, PointCloud, PointCloudInfo,
};
use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::Deserialize;

pub use routes::{ApiRoutes, DEFAULT_BASE_URL, DEFAULT_COLOR_MAPPING_PATH};

const MAX_BODY_BYTES: u64 = 64 * 1024 * 1024;

#[derive(Debug, Deserialize)]
struct BrickInfoBody {
    content: String,
}

/// Blocking JSON client for the review backend. Run it off the UI thread.
pub struct HttpReviewBackend {
    agent: ureq::Agent,
    routes: ApiRoutes,
}

impl HttpReviewBackend {
    pub fn new(routes: ApiRoutes) -> Self {
        Self {
            agent: ureq::AgentBuilder::new().build(),
            routes,
        }
    }

    fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ApiError> {
        debug!("GET {url}");
        let response = self
            .agent
            .get(url)
            .set("Accept", "application/json")
            .call()
            .map_err(|error| map_ureq_error("GET", url, error))?;
        response
            .into_json::<T>()
            .map_err(|error| ApiError::decode(error.to_string()))
    }
}

fn map_ureq_error(method: &str, url: &str, error: ureq::Error) -> ApiError {
    let mapped = match error {
        ureq::Error::Status(code, response) => {
            let detail = response
                .into_string()
                .ok()
                .and_then(|body| error_detail(&body));
            ApiError::status(code, detail)
        }
        ureq::Error::Transport(transport) => ApiError::transport(transport.to_string()),
    };
    warn!("{method} {url} failed: {mapped}");
    mapped
}

/// Pulls the `detail` string out of an error body, if there is one.
fn error_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value.get("detail")?.as_str().map(str::to_string)
}

impl ReviewBackend for HttpReviewBackend {
    fn list_dates(&self) -> Result<Vec<String>, ApiError> {
        self.get_json(&self.routes.dates())
    }

    fn list_captures(&self, date: &str) -> Result<Vec<CaptureSummary>, ApiError> {
        self.get_json(&self.routes.captures(date))
    }

    fn capture_detail(&self, key: &CaptureKey) -> Result<CaptureDetail, ApiError> {
        self.get_json(&self.routes.capture(key))
    }

    fn update_labels(&self, key: &CaptureKey, labels: &Labels) -> Result<(), ApiError> {
        let url = self.routes.labels(key);
        debug!("PUT {url}");
        self.agent
            .put(&url)
            .set("Accept", "application/json")
            .send_json(labels)
            .map_err(|error| map_ureq_error("PUT", &url, error))?;
        Ok(())
    }

    fn brick_info_text(&self, key: &CaptureKey) -> Result<String, ApiError> {
        let body: BrickInfoBody = self.get_json(&self.routes.brick_info(key))?;
        Ok(body.content)
    }

    fn color_mapping(&self) -> Result<ColorMapping, ApiError> {
        self.get_json(&self.routes.color_mapping())
    }

    fn point_cloud_info(&self, key: &CaptureKey) -> Result<PointCloudInfo, ApiError> {
        self.get_json(&self.routes.point_cloud_info(key))
    }

    fn point_cloud(&self, key: &CaptureKey) -> Result<PointCloud, ApiError> {
        self.get_json(&self.routes.point_cloud_points(key))
    }

    fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, ApiError> {
        debug!("GET {url}");
        let response = self
            .agent
            .get(url)
            .call()
            .map_err(|error| map_ureq_error("GET", url, error))?;
        read_limited(response.into_reader(), MAX_BODY_BYTES)
    }

    fn image_url(&self, key: &CaptureKey, camera_id: &str) -> String {
        self.routes.image(key, camera_id)
    }

    fn point_cloud_snapshot_url(&self, key: &CaptureKey) -> String {
        self.routes.point_cloud_snapshot(key)
    }
}

/// Reads a whole body, failing instead of truncating once it passes `limit`.
fn read_limited(reader: impl Read, limit: u64) -> Result<Vec<u8>, ApiError> {
    let mut bytes = Vec::new();
    reader
        .take(limit.saturating_add(1))
        .read_to_end(&mut bytes)
        .map_err(|error| ApiError::decode(error.to_string()))?;
    if bytes.len() as u64 > limit {
        return Err(ApiError::decode(format!("response body exceeds {limit} bytes")));
    }
    Ok(bytes)
}
