//! Prodcat error types

/// Failure of a catalog fetch, classified at the point it happened.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NetworkError {
    /// An attempt exceeded the per-attempt timeout.
    #[error("request timed out")]
    Timeout,

    /// The server answered with a non-2xx status.
    #[error("server error (HTTP {0})")]
    HttpStatus(u16),

    /// The body parsed (or failed to) but the expected payload shape is absent.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// Any other transport failure (DNS, connection refused, reset, ...).
    #[error("connection failed: {0}")]
    Unknown(String),
}

impl NetworkError {
    /// Whether a retry may succeed.
    ///
    /// A malformed body is a logical error: asking again returns the same
    /// thing, so it is never retried.
    pub fn is_transient(&self) -> bool {
        !matches!(self, NetworkError::MalformedResponse(_))
    }

    /// Short user-facing category for this failure.
    pub fn user_message(&self) -> &'static str {
        match self {
            NetworkError::Timeout => "request timed out",
            NetworkError::HttpStatus(_) => "server error",
            NetworkError::MalformedResponse(_) => "unexpected response from server",
            NetworkError::Unknown(_) => "connection failed",
        }
    }
}

/// Caller input rejected before any cache or network activity.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidQuery {
    #[error("query is empty")]
    Empty,

    #[error("query too short: {len} characters, at least {min} required")]
    TooShort { min: usize, len: usize },
}

/// Prodcat error types
#[derive(Debug, thiserror::Error)]
pub enum ProdcatError {
    #[error(transparent)]
    Network(#[from] NetworkError),

    #[error("invalid query: {0}")]
    InvalidQuery(#[from] InvalidQuery),

    #[error("configuration error: {0}")]
    Configuration(String),
}

impl ProdcatError {
    /// Whether this error came from the network layer.
    pub fn is_network(&self) -> bool {
        matches!(self, ProdcatError::Network(_))
    }

    /// Short user-facing message, distinct for validation and network failures.
    pub fn user_message(&self) -> String {
        match self {
            ProdcatError::Network(e) => e.user_message().to_string(),
            ProdcatError::InvalidQuery(InvalidQuery::Empty) => {
                "please enter a product number".into()
            }
            ProdcatError::InvalidQuery(InvalidQuery::TooShort { min, .. }) => {
                format!("product number must be at least {min} characters")
            }
            ProdcatError::Configuration(msg) => msg.clone(),
        }
    }
}

/// Result type alias for Prodcat operations
pub type Result<T> = std::result::Result<T, ProdcatError>;
