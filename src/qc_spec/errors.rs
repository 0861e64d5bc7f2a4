use super::*;
use std::error::Error;
use std::fmt;

#[derive(Debug)]
pub enum SpecError {
    IOError {
        source: io::Error,
    },
    // Covers schema shape violations (missing/unknown keys, wrong types) and template syntax.
    ParseError {
        source: serde_json::Error,
    },
    InvalidShape {
        location: String,
        message: &'static str,
    },
    UnknownEntity {
        location: String,
        name: String,
    },
    UncoveredPlaceholder {
        location: String,
        template: String,
        key: String,
    },
}
pub type Result<T> = std::result::Result<T, SpecError>;

// Error Boilerplate (Error display, conversion and source)
impl fmt::Display for SpecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IOError { source } => write!(f, "Could not read QC specification ({})", source),
            Self::ParseError { source } => write!(f, "Invalid QC specification ({})", source),
            Self::InvalidShape { location, message } => {
                write!(f, "Invalid QC specification at {}: {}", location, message)
            }
            Self::UnknownEntity { location, name } => {
                write!(f, "Unknown entity '{}' used at {}", name, location)
            }
            Self::UncoveredPlaceholder {
                location,
                template,
                key,
            } => write!(
                f,
                "Template '{}' at {} uses '{}', which is not a declared entity",
                template, location, key
            ),
        }
    }
}
impl From<io::Error> for SpecError {
    fn from(error: io::Error) -> Self {
        Self::IOError { source: error }
    }
}
impl From<serde_json::Error> for SpecError {
    fn from(error: serde_json::Error) -> Self {
        Self::ParseError { source: error }
    }
}
impl Error for SpecError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::IOError { ref source } => Some(source),
            Self::ParseError { ref source } => Some(source),
            Self::InvalidShape { .. } => None,
            Self::UnknownEntity { .. } => None,
            Self::UncoveredPlaceholder { .. } => None,
        }
    }
}
