use super::*;
use crate::config::ConfigError;
use crate::qc_db::QcDBError;
use std::error::Error;
use std::fmt;

#[derive(Debug)]
pub enum ServiceError {
    NotFound { what: String },
    InvalidBody { source: serde_json::Error },
    UpdateFailed { source: QcDBError },
    ConfigError { source: ConfigError },
    DBError { source: QcDBError },
    SerializationError { source: serde_json::Error },
}
pub type Result<T> = std::result::Result<T, ServiceError>;

impl ServiceError {
    pub fn status(&self) -> Status {
        match self {
            Self::NotFound { .. } => Status::NotFound,
            Self::InvalidBody { .. } => Status::BadRequest,
            Self::UpdateFailed {
                source: QcDBError::NotFound,
            } => Status::NotFound,
            Self::UpdateFailed { .. } => Status::BadRequest,
            Self::DBError {
                source: QcDBError::NotFound,
            } => Status::NotFound,
            Self::ConfigError { .. } | Self::DBError { .. } | Self::SerializationError { .. } => {
                Status::InternalError
            }
        }
    }
}

// Error Boilerplate (Error display, conversion and source)
impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { what } => write!(f, "Could not find {}", what),
            Self::InvalidBody { source } => write!(f, "Invalid request body ({})", source),
            Self::UpdateFailed { source } => write!(f, "Could not update entity ({})", source),
            Self::ConfigError { source } => write!(f, "{}", source),
            Self::DBError { source } => write!(f, "{}", source),
            Self::SerializationError { source } => {
                write!(f, "Could not serialize response ({})", source)
            }
        }
    }
}
impl From<ConfigError> for ServiceError {
    fn from(error: ConfigError) -> Self {
        match error {
            ConfigError::UnknownDatabase { name } => Self::NotFound {
                what: format!("database {}", name),
            },
            error => Self::ConfigError { source: error },
        }
    }
}
impl From<QcDBError> for ServiceError {
    fn from(error: QcDBError) -> Self {
        Self::DBError { source: error }
    }
}
impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidBody { ref source } => Some(source),
            Self::UpdateFailed { ref source } => Some(source),
            Self::ConfigError { ref source } => Some(source),
            Self::DBError { ref source } => Some(source),
            Self::SerializationError { ref source } => Some(source),
            Self::NotFound { .. } => None,
        }
    }
}
