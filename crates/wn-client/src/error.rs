//! Error types for the analysis client.

/// Failure of a single analysis round trip.
///
/// `Display` is the message shown to the user, so `Transport` and
/// `Rejected` print their payload without decoration.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClientError {
    /// The request never completed: connection refused, timeout, broken body.
    #[error("{0}")]
    Transport(String),

    /// The service answered and reported a failure.
    #[error("{0}")]
    Rejected(String),

    /// Non-success HTTP status without a service error message.
    #[error("Request failed with status code {status}")]
    Status { status: u16, message: String },

    #[error("Invalid response from analysis service: {0}")]
    Decode(String),

    #[error("Failed to set up HTTP client: {0}")]
    Setup(String),
}

impl ClientError {
    /// True for failures where the service never produced an answer.
    pub fn is_transport(&self) -> bool {
        matches!(self, ClientError::Transport(_) | ClientError::Setup(_))
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ClientError::Decode(err.to_string())
        } else {
            ClientError::Transport(err.to_string())
        }
    }
}

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;
