//! Error types for form registration and configuration.
//!
//! Validation failures are never errors: they are stored as data in the
//! form's error map. Only programmer mistakes (a field without a key, a
//! malformed pattern) and configuration I/O surface as [`FormError`].

/// Errors raised by the form registry and its configuration layer.
#[derive(Debug, thiserror::Error)]
pub enum FormError {
    /// A field was registered without a key, or with an empty one
    #[error("Field key is required")]
    MissingKey,

    /// A pattern rule could not be compiled
    #[error("Invalid pattern `{pattern}`: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// Malformed JSON configuration or field declarations
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration file access
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Result with FormError
pub type FormResult<T> = Result<T, FormError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_key_message() {
        let err = FormError::MissingKey;
        assert_eq!(err.to_string(), "Field key is required");
    }

    #[test]
    fn test_invalid_pattern_carries_source() {
        let source = regex::Regex::new("(").unwrap_err();
        let err = FormError::InvalidPattern {
            pattern: "(".to_string(),
            source,
        };
        assert!(err.to_string().starts_with("Invalid pattern `(`"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_from_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: FormError = json_err.into();
        assert!(matches!(err, FormError::Json(_)));
        assert!(err.to_string().contains("JSON error"));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: FormError = io_err.into();
        assert!(matches!(err, FormError::Io(_)));
    }
}
