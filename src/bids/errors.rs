use super::*;
use std::error::Error;
use std::fmt;

#[derive(Debug)]
pub enum DiscoveryError {
    InvalidEntityPattern {
        name: String,
        source: regex::Error,
    },
    NonUnicodePath {
        path: PathBuf,
    },
    GlobPatternError {
        source: glob::PatternError,
    },
    ConfigParseError {
        source: serde_json::Error,
    },
    // IOError is simply our 'catch all' error type for 'non-special' issues
    IOError {
        source: io::Error,
    },
}
pub type Result<T> = std::result::Result<T, DiscoveryError>;

// Error Boilerplate (Error display, conversion and source)
impl fmt::Display for DiscoveryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Error during image file discovery ({:?})", self)
    }
}
impl From<io::Error> for DiscoveryError {
    fn from(error: io::Error) -> Self {
        Self::IOError { source: error }
    }
}
impl From<glob::PatternError> for DiscoveryError {
    fn from(error: glob::PatternError) -> Self {
        Self::GlobPatternError { source: error }
    }
}
impl From<glob::GlobError> for DiscoveryError {
    fn from(error: glob::GlobError) -> Self {
        Self::IOError {
            source: error.into_error(),
        }
    }
}
impl From<serde_json::Error> for DiscoveryError {
    fn from(error: serde_json::Error) -> Self {
        Self::ConfigParseError { source: error }
    }
}
impl Error for DiscoveryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidEntityPattern { ref source, .. } => Some(source),
            Self::GlobPatternError { ref source } => Some(source),
            Self::ConfigParseError { ref source } => Some(source),
            Self::IOError { ref source } => Some(source),
            Self::NonUnicodePath { .. } => None,
        }
    }
}
