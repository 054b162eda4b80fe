use serde::{Deserialize, Serialize};
use std::fmt;

/// Machine-readable cause of a failed API call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum StatusReason {
    BadRequest,
    Unauthorized,
    Forbidden,
    NotFound,
    AlreadyExists,
    Conflict,
    Invalid,
    InternalError,
    #[default]
    Unknown,
}

impl StatusReason {
    /// Best-effort reason for a bare HTTP status code.
    pub fn from_code(code: u16) -> Self {
        match code {
            400 => Self::BadRequest,
            401 => Self::Unauthorized,
            403 => Self::Forbidden,
            404 => Self::NotFound,
            409 => Self::Conflict,
            422 => Self::Invalid,
            500..=599 => Self::InternalError,
            _ => Self::Unknown,
        }
    }

    /// HTTP status code conventionally paired with this reason.
    pub fn code(self) -> u16 {
        match self {
            Self::BadRequest => 400,
            Self::Unauthorized => 401,
            Self::Forbidden => 403,
            Self::NotFound => 404,
            Self::AlreadyExists | Self::Conflict => 409,
            Self::Invalid => 422,
            Self::InternalError | Self::Unknown => 500,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::BadRequest => "BadRequest",
            Self::Unauthorized => "Unauthorized",
            Self::Forbidden => "Forbidden",
            Self::NotFound => "NotFound",
            Self::AlreadyExists => "AlreadyExists",
            Self::Conflict => "Conflict",
            Self::Invalid => "Invalid",
            Self::InternalError => "InternalError",
            Self::Unknown => "Unknown",
        }
    }
}

impl From<String> for StatusReason {
    fn from(s: String) -> Self {
        match s.as_str() {
            "BadRequest" => Self::BadRequest,
            "Unauthorized" => Self::Unauthorized,
            "Forbidden" => Self::Forbidden,
            "NotFound" => Self::NotFound,
            "AlreadyExists" => Self::AlreadyExists,
            "Conflict" => Self::Conflict,
            "Invalid" => Self::Invalid,
            "InternalError" => Self::InternalError,
            _ => Self::Unknown,
        }
    }
}

impl From<StatusReason> for String {
    fn from(r: StatusReason) -> Self {
        r.as_str().to_string()
    }
}

impl fmt::Display for StatusReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error payload returned by the API server for any non-success response,
/// and carried by `WatchEvent::Error` on a broken change feed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Status {
    #[serde(default)]
    pub code: u16,
    #[serde(default)]
    pub reason: StatusReason,
    #[serde(default)]
    pub message: String,
}

impl Status {
    pub fn new(reason: StatusReason, message: impl Into<String>) -> Self {
        Self {
            code: reason.code(),
            reason,
            message: message.into(),
        }
    }

    /// Interpret an error response body. Servers that answer with plain
    /// text still yield a usable status: the reason comes from the code
    /// and the text becomes the message.
    pub fn from_response(code: u16, body: &[u8]) -> Self {
        if let Ok(mut status) = serde_json::from_slice::<Status>(body) {
            if status.code == 0 {
                status.code = code;
            }
            if status.reason == StatusReason::Unknown {
                status.reason = StatusReason::from_code(code);
            }
            return status;
        }
        Self {
            code,
            reason: StatusReason::from_code(code),
            message: String::from_utf8_lossy(body).trim().to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.reason == StatusReason::NotFound
    }

    pub fn is_conflict(&self) -> bool {
        self.reason == StatusReason::Conflict
    }

    pub fn is_already_exists(&self) -> bool {
        self.reason == StatusReason::AlreadyExists
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.message.is_empty() {
            write!(f, "{} ({})", self.reason, self.code)
        } else {
            write!(f, "{} ({}): {}", self.reason, self.code, self.message)
        }
    }
}
