use brick_review_application::{
    ApiError, DetailResponse, DetailTicket, SaveRequest, SessionResponse,
};
use brick_review_domain::DecodedImage;

use crate::app::state::ImageSlot;

/// Worker results, delivered to the UI thread through the dispatcher.
#[derive(Debug)]
pub enum AppEvent {
    Session(SessionResponse),
    Detail(DetailTicket, DetailResponse),
    Image {
        ticket: DetailTicket,
        slot: ImageSlot,
        result: Result<DecodedImage, ApiError>,
    },
    Saved {
        request: SaveRequest,
        result: Result<(), ApiError>,
    },
}
