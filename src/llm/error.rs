use thiserror::Error;

#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("authentication failed: {0}")]
    Auth(String),
    #[error("rate limit exceeded: {0}")]
    RateLimit(String),
    #[error("completion service error: {0}")]
    Backend(String),
    #[error("malformed completion response: {0}")]
    Decode(String),
    #[error("completion service returned no choices")]
    EmptyResponse,
}
