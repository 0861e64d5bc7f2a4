use super::*;
use std::error::Error;

#[derive(Debug)]
pub enum ConfigError {
    EnvVarNotSet {
        name: &'static str,
    },
    MissingSetting {
        database: String,
        setting: &'static str,
    },
    InvalidDatabaseName {
        name: String,
    },
    UnknownDatabase {
        name: String,
    },
    ParseError {
        source: serde_json::Error,
    },
    IOError {
        source: io::Error,
    },
}
pub type Result<T> = std::result::Result<T, ConfigError>;

// Error Boilerplate (Error display, conversion and source)
impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EnvVarNotSet { name } => {
                write!(f, "No configuration given and {} is not set", name)
            }
            Self::MissingSetting { database, setting } => {
                write!(f, "Database {} is missing the '{}' setting", database, setting)
            }
            Self::InvalidDatabaseName { name } => write!(
                f,
                "Database name {} is not of the form <study>_<pipeline>",
                name
            ),
            Self::UnknownDatabase { name } => write!(f, "Database {} is not configured", name),
            _ => write!(f, "Error reading configuration ({:?})", self),
        }
    }
}
impl From<io::Error> for ConfigError {
    fn from(error: io::Error) -> Self {
        Self::IOError { source: error }
    }
}
impl From<serde_json::Error> for ConfigError {
    fn from(error: serde_json::Error) -> Self {
        Self::ParseError { source: error }
    }
}
impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::ParseError { ref source } => Some(source),
            Self::IOError { ref source } => Some(source),
            Self::EnvVarNotSet { .. } => None,
            Self::MissingSetting { .. } => None,
            Self::InvalidDatabaseName { .. } => None,
            Self::UnknownDatabase { .. } => None,
        }
    }
}
