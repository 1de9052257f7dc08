use thiserror::Error;

/// Failures the chat session can surface to the user.
///
/// The first two block a submit before anything is dispatched. The rest
/// describe a dispatched request that came back wrong; all of them recover
/// the same way (fallback assistant message plus an error toast).
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("Please enter a message")]
    EmptyMessage,
    #[error("API key not configured (set OPENAI_API_KEY)")]
    MissingApiKey,
    /// Non-2xx response; carries the server's error message when the body
    /// had one, otherwise a generic status-code message.
    #[error("{0}")]
    Api(String),
    /// 2xx response whose body did not have the expected shape.
    #[error("Invalid API response format")]
    UnexpectedResponse,
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}
