use serde::Deserialize;
use thiserror::Error;

// The self-hosted engines report "no route" inside an otherwise 2xx body;
// this probe only looks for that member.
#[derive(Deserialize, Debug)]
pub struct ErrorProbe {
    #[serde(default)]
    pub error: Option<serde_json::Value>,
}

#[derive(Error, Debug)]
pub enum RoutingError {
    #[error("invalid travel mode \"{0}\"")]
    InvalidMode(String),

    // Non-2xx answer, body kept for diagnosis
    #[error("HTTP {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("failed to parse response: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("isochrone needs max_time or max_distance")]
    MissingCutoff,
}

impl RoutingError {
    /// Transport and backend failures are worth another attempt; caller
    /// mistakes are not.
    pub fn is_retriable(&self) -> bool {
        matches!(
            self,
            Self::Status { .. } | Self::Transport(_) | Self::Parse(_)
        )
    }
}
