use thiserror::Error;

/// A request field is missing or has an unacceptable value. The message names the field and is safe to show to users.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ValidationError(pub String);

impl ValidationError {
    pub fn required(field: &str) -> Self {
        Self(format!("{field} is required"))
    }

    pub fn invalid<S: Into<String>>(message: S) -> Self {
        Self(message.into())
    }
}
