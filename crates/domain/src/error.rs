use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("date key must not be empty")]
    EmptyDate,
    #[error("capture id must not be empty")]
    EmptyCaptureId,
}
