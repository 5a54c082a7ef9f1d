mod brick_info;
mod capture;
mod color;
mod error;
mod image;
mod labels;
mod point_cloud;

pub use brick_info::{normalize_key, BrickInfo, BrickRecord, FieldValue, COLOR_PREDICTION_KEY};
pub use capture::{next_capture, CaptureDetail, CaptureKey, CaptureSummary, Manifest};
pub use color::{ColorEntry, ColorMapping, ResolvedColor, Rgb, UNKNOWN_COLOR};
pub use error::DomainError;
pub use image::DecodedImage;
pub use labels::{LabelField, Labels, QuickVerdict};
pub use point_cloud::{Bounds3, PointCloud, PointCloudInfo};
