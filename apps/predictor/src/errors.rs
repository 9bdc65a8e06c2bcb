use std::time::Duration;

use thiserror::Error;

use crate::api_client::ApiError;

const TIMEOUT_MESSAGE: &str = "Connection timeout. The prediction service may be starting up \
    (cold start). Please wait and try again.";
const UNREACHABLE_MESSAGE: &str = "Unable to connect to the prediction service. \
    The service may be starting up or temporarily unavailable.";

/// Why the job-title probe failed. Both variants leave the client disconnected.
#[derive(Debug, Error)]
pub enum ConnectivityError {
    #[error("no response within {0:?}")]
    Timeout(Duration),

    #[error("service unreachable: {0}")]
    Unreachable(#[from] ApiError),
}

impl ConnectivityError {
    /// Text shown inline to the user. A timeout usually means the service is
    /// waking from a cold start, so it gets its own wording.
    pub fn user_message(&self) -> &'static str {
        match self {
            ConnectivityError::Timeout(_) => TIMEOUT_MESSAGE,
            ConnectivityError::Unreachable(_) => UNREACHABLE_MESSAGE,
        }
    }
}

/// Errors surfaced by a prediction submission.
/// `Display` is the inline text shown to the user.
#[derive(Debug, Error)]
pub enum PredictionError {
    #[error("The prediction service is not connected. Retry the connection first.")]
    NotConnected,

    #[error(transparent)]
    Input(#[from] InputError),

    /// Message supplied by the service in its `error` field.
    #[error("{0}")]
    Server(String),

    #[error("Prediction failed")]
    Failed,

    #[error("An error occurred while predicting salary")]
    Transport(#[source] ApiError),
}

impl From<ApiError> for PredictionError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Status {
                message: Some(message),
                ..
            } => PredictionError::Server(message),
            ApiError::Status { message: None, .. } => PredictionError::Failed,
            other => PredictionError::Transport(other),
        }
    }
}

/// Failure of the best-effort market-average lookup. Logged, never shown.
#[derive(Debug, Error)]
#[error("could not fetch average salary for '{job_title}': {source}")]
pub struct ComparisonFetchError {
    pub job_title: String,
    #[source]
    pub source: ApiError,
}

/// Form input rejected before anything is sent over the network.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum InputError {
    #[error("{0} is required")]
    Missing(&'static str),

    #[error("{field} must be a number, got '{value}'")]
    NotANumber { field: &'static str, value: String },

    #[error("{field} must be between {min} and {max}")]
    OutOfRange {
        field: &'static str,
        min: f64,
        max: f64,
    },

    #[error("{field} must be a multiple of {step}")]
    Step { field: &'static str, step: f64 },

    #[error("Unknown education level '{0}' (expected Bachelor's, Master's or PhD)")]
    UnknownEducation(String),

    #[error("Unknown gender '{0}' (expected Male or Female)")]
    UnknownGender(String),
}
