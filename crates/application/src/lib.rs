mod detail;
mod error;
mod ports;
mod service;
mod session;
mod use_cases;

pub use detail::{
    BrickInfoStatus, DetailOutcome, DetailPhase, DetailRequest, DetailResponse, DetailState,
    DetailTicket, PointCloudStatus, PointCloudView, SaveRequest, SaveStatus, SAVE_SUCCESS_MESSAGE,
};
pub use error::{ApiError, ApiErrorKind};
pub use ports::{ImageDecoder, ReviewBackend};
pub use service::{ReviewService, SessionResponse};
pub use session::{CaptureRequest, SessionAction, SessionEffect, SessionState, Transition};
pub use use_cases::{
    ListCapturesCommand, ListDatesCommand, LoadImageCommand, SaveLabelsCommand,
    ShowCaptureCommand,
};
