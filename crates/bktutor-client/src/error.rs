use thiserror::Error;

/// Failures of a single backend call.
#[derive(Debug, Error)]
pub enum ApiError {
    /// 401: the login session is missing or expired.
    #[error("Not signed in")]
    Unauthorized,

    /// Any other non-2xx response. `message` is the body's `error` field.
    #[error("Request failed with status {status}")]
    Status { status: u16, message: Option<String> },

    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid response body: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized)
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::Status { status: 404, .. })
    }

    /// Text for an inline message slot. Transport failures always read
    /// "Network error."; everything else uses the caller's wording.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ApiError::Transport(_) => "Network error.".to_string(),
            _ => fallback.to_string(),
        }
    }
}
