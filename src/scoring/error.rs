/// Errors raised by a ranking pass or a bias update.
///
/// Every operation either returns a complete result or fails with one of
/// these; nothing is retried and no partial ranking is produced.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScoringError {
    #[error("invalid input for {field}: {message}")]
    InvalidInput { field: String, message: String },
}

impl ScoringError {
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        ScoringError::InvalidInput {
            field: field.into(),
            message: message.into(),
        }
    }
}
