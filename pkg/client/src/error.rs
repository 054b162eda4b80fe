use pkg_types::Status;

/// Everything a client call can fail with.
///
/// Nothing here is retried or recovered locally: transport and server
/// failures reach the caller exactly as they happened.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Rejected before any request was sent.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The request could not be turned into a URL.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("server error: {0}")]
    Api(Status),

    #[error("failed to decode response body: {0}")]
    Decode(#[source] serde_json::Error),

    /// The watch body broke the event framing.
    #[error("watch stream error: {0}")]
    Watch(String),
}

impl Error {
    /// Server-provided detail, if the server produced this error.
    pub fn status(&self) -> Option<&Status> {
        match self {
            Error::Api(status) => Some(status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status().is_some_and(Status::is_not_found)
    }

    /// The object changed since the caller read it.
    pub fn is_conflict(&self) -> bool {
        self.status().is_some_and(Status::is_conflict)
    }

    pub fn is_already_exists(&self) -> bool {
        self.status().is_some_and(Status::is_already_exists)
    }

    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Error::InvalidArgument(_))
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
