use thiserror::Error;

use crate::filtering::FlattenError;
use crate::words::WordSourceError;

/// Failures raised by a venue provider call.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ProviderError {
    #[error("venue provider request failed: {0}")]
    Transport(String),
    #[error("venue provider returned HTTP {status}")]
    Status { status: u16 },
    #[error("venue provider response could not be decoded: {0}")]
    Decode(String),
}

impl ProviderError {
    /// Network and HTTP status failures. These downgrade to a fallback reply;
    /// every status code is treated the same way.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Status { .. })
    }
}

/// Errors that escape the menu pipeline. Transport failures and empty results
/// are reply outcomes and never show up here.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum PipelineError {
    #[error("malformed {stage} response: {message}")]
    MalformedResponse { stage: &'static str, message: String },
    #[error(transparent)]
    WordSource(#[from] WordSourceError),
}

impl From<FlattenError> for PipelineError {
    fn from(error: FlattenError) -> Self {
        Self::MalformedResponse { stage: "menu", message: error.to_string() }
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ApplicationError {
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum InterfaceError {
    #[error("bad request: {message}")]
    BadRequest { message: String, correlation_id: String },
    #[error("service unavailable: {message}")]
    ServiceUnavailable { message: String, correlation_id: String },
}

impl InterfaceError {
    /// Text safe to send back over SMS.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::BadRequest { .. } => {
                "Text a restaurant name, optionally followed by \" @ city, state\"."
            }
            Self::ServiceUnavailable { .. } => {
                "Something went wrong while checking that menu. Please try again later."
            }
        }
    }

    pub fn correlation_id(&self) -> &str {
        match self {
            Self::BadRequest { correlation_id, .. }
            | Self::ServiceUnavailable { correlation_id, .. } => correlation_id,
        }
    }
}

impl ApplicationError {
    pub fn into_interface(self, correlation_id: impl Into<String>) -> InterfaceError {
        let correlation_id = correlation_id.into();
        let mut mapped = InterfaceError::from(self);
        match &mut mapped {
            InterfaceError::BadRequest { correlation_id: id, .. }
            | InterfaceError::ServiceUnavailable { correlation_id: id, .. } => *id = correlation_id,
        }
        mapped
    }
}

impl From<ApplicationError> for InterfaceError {
    fn from(value: ApplicationError) -> Self {
        let correlation_id = "unassigned".to_owned();
        match value {
            ApplicationError::InvalidRequest(message) => Self::BadRequest { message, correlation_id },
            ApplicationError::Pipeline(error) => {
                Self::ServiceUnavailable { message: error.to_string(), correlation_id }
            }
        }
    }
}
