use brick_review_domain::CaptureKey;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000/api";
pub const DEFAULT_COLOR_MAPPING_PATH: &str = "/color_mapping";

/// Builds every backend URL from one base.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRoutes {
    base: String,
    color_mapping_path: String,
}

impl Default for ApiRoutes {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL, DEFAULT_COLOR_MAPPING_PATH)
    }
}

impl ApiRoutes {
    pub fn new(base_url: &str, color_mapping_path: &str) -> Self {
        let path = color_mapping_path.trim();
        let color_mapping_path = if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{path}")
        };
        Self {
            base: base_url.trim().trim_end_matches('/').to_string(),
            color_mapping_path,
        }
    }

    pub fn dates(&self) -> String {
        format!("{}/dates", self.base)
    }

    pub fn captures(&self, date: &str) -> String {
        format!("{}/dates/{}/captures", self.base, segment(date))
    }

    pub fn capture(&self, key: &CaptureKey) -> String {
        format!(
            "{}/{}",
            self.captures(key.date()),
            segment(key.capture_id())
        )
    }

    pub fn labels(&self, key: &CaptureKey) -> String {
        format!("{}/labels", self.capture(key))
    }

    pub fn image(&self, key: &CaptureKey, camera_id: &str) -> String {
        format!("{}/image/{}", self.capture(key), segment(camera_id))
    }

    pub fn brick_info(&self, key: &CaptureKey) -> String {
        format!("{}/brick_info", self.capture(key))
    }

    pub fn point_cloud_info(&self, key: &CaptureKey) -> String {
        format!("{}/point_cloud/info", self.capture(key))
    }

    pub fn point_cloud_snapshot(&self, key: &CaptureKey) -> String {
        format!("{}/point_cloud/snapshot", self.capture(key))
    }

    pub fn point_cloud_points(&self, key: &CaptureKey) -> String {
        format!("{}/point_cloud", self.capture(key))
    }

    pub fn color_mapping(&self) -> String {
        format!("{}{}", self.base, self.color_mapping_path)
    }
}

/// Percent-encodes everything outside the RFC 3986 unreserved set.
fn segment(value: &str) -> String {
    let mut encoded = String::with_capacity(value.len());
    for byte in value.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'.' | b'_' | b'~') {
            encoded.push(byte as char);
        } else {
            encoded.push_str(&format!("%{byte:02X}"));
        }
    }
    encoded
}
