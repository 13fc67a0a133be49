use thiserror::Error;

/// Everything that can go wrong between the console and the agent backend.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    #[error("Request failed: {0}")]
    Network(String),

    #[error("Backend returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to parse response: {0}")]
    Decode(String),

    #[error("Failed to serialize body: {0}")]
    Encode(String),

    #[error("Attach at least one file to create a {0}")]
    FilesRequired(&'static str),

    #[error("Cannot update a {0} that has no id")]
    MissingId(&'static str),
}

impl ApiError {
    /// Status code for backend rejections, `None` for client-side failures.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
