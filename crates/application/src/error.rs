use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// No response was obtained.
    Transport,
    /// A response arrived with a non-success status.
    Status,
    /// The body could not be read or decoded.
    Decode,
}

/// Every backend failure, normalised into one shape the panels can render.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ApiError {
    pub kind: ApiErrorKind,
    pub status: Option<u16>,
    pub message: String,
}

impl ApiError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            kind: ApiErrorKind::Transport,
            status: None,
            message: format!("Network error: {}", message.into()),
        }
    }

    pub fn status(code: u16, detail: Option<String>) -> Self {
        let message = match detail {
            Some(detail) if !detail.trim().is_empty() => {
                format!("HTTP error {code}: {}", detail.trim())
            }
            _ => format!("HTTP error {code}"),
        };
        Self {
            kind: ApiErrorKind::Status,
            status: Some(code),
            message,
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self {
            kind: ApiErrorKind::Decode,
            status: None,
            message: format!("Invalid response: {}", message.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_keeps_code_and_detail() {
        let error = ApiError::status(404, Some("Capture x not found".to_string()));
        assert_eq!(error.kind, ApiErrorKind::Status);
        assert_eq!(error.status, Some(404));
        assert_eq!(error.to_string(), "HTTP error 404: Capture x not found");
        assert_eq!(ApiError::status(500, None).to_string(), "HTTP error 500");
    }

    #[test]
    fn transport_error_has_no_status() {
        let error = ApiError::transport("connection refused");
        assert_eq!(error.status, None);
        assert_eq!(error.to_string(), "Network error: connection refused");
    }
}
