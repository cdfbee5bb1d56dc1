use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum SortError {
    #[error("Missing API credential for provider '{provider}'")]
    MissingCredential { provider: String },

    #[error("Classification request failed with status {status}")]
    Transport { status: u16 },

    #[error("Failed to read '{path}': {message}")]
    Read { path: String, message: String },

    #[error("Failed to move '{path}': {message}")]
    Move { path: String, message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),

    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Serialize for SortError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        let response = ErrorResponse {
            error_type: self.error_type(),
            message: self.to_string(),
        };

        response.serialize(serializer)
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error_type: String,
    message: String,
}

impl SortError {
    /// Returns the error type for host/frontend handling
    pub fn error_type(&self) -> String {
        match self {
            Self::MissingCredential { .. } => "MISSING_CREDENTIAL",
            Self::Transport { .. } => "TRANSPORT_ERROR",
            Self::Read { .. } => "READ_ERROR",
            Self::Move { .. } => "MOVE_ERROR",
            Self::Config { .. } => "CONFIG_ERROR",
            Self::Io(_) => "IO_ERROR",
            Self::Reqwest(_) => "NETWORK_ERROR",
            Self::SerdeJson(_) => "PARSE_ERROR",
            Self::Other(_) => "UNKNOWN_ERROR",
        }
        .to_string()
    }

    /// True when the error aborts a whole run rather than a single document
    pub fn aborts_run(&self) -> bool {
        matches!(self, Self::MissingCredential { .. } | Self::Config { .. })
    }
}

pub type Result<T> = std::result::Result<T, SortError>;
