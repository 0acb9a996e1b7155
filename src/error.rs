use thiserror::Error;

/// Errors surfaced to the user by a reformat request.
#[derive(Debug, Error)]
pub enum StyleError {
    /// Settings are missing or malformed; the formatter is never invoked.
    #[error("improperly configured: {message}")]
    Config {
        message: String,
        /// Extra human-readable hint shown alongside the message.
        extra: Option<String>,
    },

    /// The external formatter failed, timed out, or produced garbage.
    #[error("formatter failed: {0}")]
    Engine(String),

    /// Old/new text reconciliation could not produce a valid patch.
    #[error("merge failure: {0}")]
    Merge(String),
}

impl StyleError {
    pub fn config(message: impl Into<String>) -> Self {
        StyleError::Config {
            message: message.into(),
            extra: None,
        }
    }

    pub fn config_with_extra(message: impl Into<String>, extra: impl Into<String>) -> Self {
        StyleError::Config {
            message: message.into(),
            extra: Some(extra.into()),
        }
    }
}
