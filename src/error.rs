//! Error types for the analysis client
//!
//! Local validation failures are kept apart from request failures so the
//! window can show a notice without treating a bad pick as a failed upload.

use thiserror::Error;

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, AnalyzerError>;

/// Largest archive the service accepts (1 GiB).
pub const MAX_UPLOAD_BYTES: u64 = 1 << 30;

/// Why a candidate file was refused before any request was made
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("only .zip archives are accepted")]
    BadExtension,

    #[error("file is larger than 1 GB ({size} bytes)")]
    TooLarge { size: u64 },
}

impl ValidationError {
    /// Stable machine-readable reason code
    pub fn reason(&self) -> &'static str {
        match self {
            ValidationError::BadExtension => "bad_extension",
            ValidationError::TooLarge { .. } => "too_large",
        }
    }
}

/// Everything that can go wrong between picking a file and holding a result
#[derive(Error, Debug)]
pub enum AnalyzerError {
    /// Candidate rejected locally
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The request failed before a status line arrived
    #[error("network error: {message}")]
    Network { message: String },

    /// The service answered outside 2xx
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// 2xx answer whose body is not the expected JSON
    #[error("bad json: {message}")]
    MalformedResponse { message: String },

    /// Local file could not be opened or inspected
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Base URL or other settings are unusable
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl AnalyzerError {
    pub fn network(message: impl Into<String>) -> Self {
        AnalyzerError::Network {
            message: message.into(),
        }
    }

    pub fn http(status: u16, body: impl Into<String>) -> Self {
        AnalyzerError::Http {
            status,
            body: body.into(),
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        AnalyzerError::MalformedResponse {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        AnalyzerError::Config {
            message: message.into(),
        }
    }

    /// HTTP status carried by the error, if the service answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            AnalyzerError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reason_codes() {
        assert_eq!(ValidationError::BadExtension.reason(), "bad_extension");
        assert_eq!(ValidationError::TooLarge { size: 5 }.reason(), "too_large");
    }

    #[test]
    fn test_error_display() {
        let err = AnalyzerError::http(500, "internal error");
        assert_eq!(err.to_string(), "HTTP 500: internal error");
        assert_eq!(err.status(), Some(500));

        let err = AnalyzerError::network("connection refused");
        assert_eq!(err.to_string(), "network error: connection refused");
        assert_eq!(err.status(), None);

        let err = AnalyzerError::from(ValidationError::BadExtension);
        assert_eq!(err.to_string(), "only .zip archives are accepted");
    }
}
