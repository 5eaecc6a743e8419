#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("empty response from {provider}")]
    EmptyResponse { provider: &'static str },

    #[error("provider unavailable: {0}")]
    Unavailable(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, LlmError>;
