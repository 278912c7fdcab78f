use thiserror::Error;

#[derive(Debug, Error)]
pub enum WonderPayError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Arithmetic overflow in {context}")]
    ArithmeticOverflow { context: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl WonderPayError {
    /// The offending field for validation failures.
    pub fn field(&self) -> Option<&str> {
        match self {
            WonderPayError::InvalidInput { field, .. } => Some(field),
            _ => None,
        }
    }

    /// True when the caller supplied bad data, as opposed to an internal failure.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            WonderPayError::InvalidInput { .. } | WonderPayError::SerializationError(_)
        )
    }
}

impl From<serde_json::Error> for WonderPayError {
    fn from(e: serde_json::Error) -> Self {
        WonderPayError::SerializationError(e.to_string())
    }
}
