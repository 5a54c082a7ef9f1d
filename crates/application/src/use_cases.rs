use brick_review_domain::{CaptureKey, Labels};

#[derive(Debug, Clone, Default)]
pub struct ListDatesCommand;

#[derive(Debug, Clone)]
pub struct ListCapturesCommand {
    pub date: String,
}

#[derive(Debug, Clone)]
pub struct ShowCaptureCommand {
    pub key: CaptureKey,
}

#[derive(Debug, Clone)]
pub struct SaveLabelsCommand {
    pub key: CaptureKey,
    pub labels: Labels,
}

#[derive(Debug, Clone)]
pub struct LoadImageCommand {
    pub url: String,
}
