pub mod decoder;
pub mod dispatch;
pub mod http;
pub mod presenters;

pub use decoder::ImageCrateDecoder;
pub use dispatch::RequestDispatcher;
pub use http::{ApiRoutes, HttpReviewBackend, DEFAULT_BASE_URL, DEFAULT_COLOR_MAPPING_PATH};
pub use presenters::{
    brick_info_rows, format_count, present_brick_info, present_capture_detail,
    present_capture_row, present_point_cloud_info,
};
