use super::*;
use crate::bids::DiscoveryError;
use crate::config::ConfigError;
use crate::matcher::MatchError;
use crate::qc_db::QcDBError;
use crate::qc_spec::{SpecError, TemplateError};
use std::error::Error;
use std::fmt;
use std::io;

#[derive(Debug)]
pub enum IndexError {
    ConfigError { source: ConfigError },
    DiscoveryError { source: DiscoveryError },
    SpecError { source: SpecError },
    MatchError { source: MatchError },
    TemplateError { source: TemplateError },
    DBError { source: QcDBError },
    AlreadyInitialized { path: PathBuf },
    NonUnicodePath { path: PathBuf },
    IOError { source: io::Error },
}
pub type Result<T> = std::result::Result<T, IndexError>;

impl IndexError {
    /// Errors caused by invalid settings, specifications or entity configurations
    /// rather than by the indexed data.
    pub fn is_configuration_error(&self) -> bool {
        match self {
            Self::ConfigError { .. } | Self::SpecError { .. } => true,
            Self::DiscoveryError {
                source: DiscoveryError::InvalidEntityPattern { .. },
            }
            | Self::DiscoveryError {
                source: DiscoveryError::ConfigParseError { .. },
            } => true,
            _ => false,
        }
    }
}

// Error Boilerplate (Error display, conversion and source)
impl fmt::Display for IndexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigError { source } => write!(f, "{}", source),
            Self::DiscoveryError { source } => write!(f, "{}", source),
            Self::SpecError { source } => write!(f, "{}", source),
            Self::MatchError { source } => write!(f, "{}", source),
            Self::TemplateError { source } => write!(f, "{}", source),
            Self::DBError { source } => write!(f, "{}", source),
            Self::AlreadyInitialized { path } => write!(
                f,
                "Database {} already exists, reset it to build a fresh index",
                path.display()
            ),
            Self::NonUnicodePath { path } => {
                write!(f, "Database path {} is not valid unicode", path.display())
            }
            Self::IOError { source } => write!(f, "Error preparing database file ({})", source),
        }
    }
}
impl From<ConfigError> for IndexError {
    fn from(error: ConfigError) -> Self {
        Self::ConfigError { source: error }
    }
}
impl From<DiscoveryError> for IndexError {
    fn from(error: DiscoveryError) -> Self {
        Self::DiscoveryError { source: error }
    }
}
impl From<SpecError> for IndexError {
    fn from(error: SpecError) -> Self {
        Self::SpecError { source: error }
    }
}
impl From<MatchError> for IndexError {
    fn from(error: MatchError) -> Self {
        Self::MatchError { source: error }
    }
}
impl From<TemplateError> for IndexError {
    fn from(error: TemplateError) -> Self {
        Self::TemplateError { source: error }
    }
}
impl From<QcDBError> for IndexError {
    fn from(error: QcDBError) -> Self {
        Self::DBError { source: error }
    }
}
impl From<io::Error> for IndexError {
    fn from(error: io::Error) -> Self {
        Self::IOError { source: error }
    }
}
impl Error for IndexError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::ConfigError { ref source } => Some(source),
            Self::DiscoveryError { ref source } => Some(source),
            Self::SpecError { ref source } => Some(source),
            Self::MatchError { ref source } => Some(source),
            Self::TemplateError { ref source } => Some(source),
            Self::DBError { ref source } => Some(source),
            Self::IOError { ref source } => Some(source),
            Self::AlreadyInitialized { .. } => None,
            Self::NonUnicodePath { .. } => None,
        }
    }
}
