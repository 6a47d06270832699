//! Collaborator error types.

/// Failure of an external collaborator to produce data.
///
/// The timetable core never retries; these errors reach the caller as-is.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The requested resource does not exist upstream
    #[error("not found: {0}")]
    NotFound(String),

    /// Reading a local document failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A document could not be decoded
    #[error("JSON parse error: {message}")]
    Json { message: String },

    /// The collaborator could not serve the request
    #[error("source unavailable: {0}")]
    Unavailable(String),
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::Json {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = FetchError::NotFound("/service/1".into());
        assert_eq!(err.to_string(), "not found: /service/1");

        let err = FetchError::Unavailable("timeout".into());
        assert_eq!(err.to_string(), "source unavailable: timeout");

        let err: FetchError = serde_json::from_str::<u32>("\"x\"").unwrap_err().into();
        assert!(err.to_string().contains("JSON parse error"));
    }
}
