use thiserror::Error;

/// Errors that can occur while normalising input
#[derive(Error, Debug)]
pub enum NormaliseError {
    #[error("Unexpected input: value was absent")]
    AbsentInput,

    #[error("Unexpected input: {type_name}")]
    UnexpectedInput { type_name: &'static str },

    #[error("Input source failed: {message}")]
    Source { message: String },

    /// A failure raised by the injected content normaliser, carried through
    /// unchanged
    #[error("Content normalisation failed: {0}")]
    Content(Box<dyn std::error::Error + Send + Sync>),
}

impl NormaliseError {
    /// Wrap a content normaliser failure
    pub fn content<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Content(Box::new(err))
    }

    /// Report a failure of an upstream sequence source
    pub fn source(message: impl Into<String>) -> Self {
        Self::Source {
            message: message.into(),
        }
    }
}

/// Result type alias for normalisation operations
pub type Result<T> = std::result::Result<T, NormaliseError>;
