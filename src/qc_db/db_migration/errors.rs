use super::*;
use std::error::Error;
use std::fmt;

#[derive(Debug)]
pub enum MigrationError {
    VersionAccess { source: diesel::result::Error },
    UnsupportedVersion { version: DBVersion },
    Statement { source: diesel::result::Error },
}
pub type Result<T> = std::result::Result<T, MigrationError>;

// Error Boilerplate (Error display, conversion and source)
impl fmt::Display for MigrationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::VersionAccess { source } => {
                write!(f, "Could not read or write the QC database version: {}", source)
            }
            Self::UnsupportedVersion { version } => write!(
                f,
                "QC database version {} is not supported, this build expects version {}",
                version, REQUIRED_DB_VERSION
            ),
            Self::Statement { source } => {
                write!(f, "Schema upgrade of the QC database failed: {}", source)
            }
        }
    }
}
impl From<diesel::result::Error> for MigrationError {
    fn from(error: diesel::result::Error) -> Self {
        Self::Statement { source: error }
    }
}
impl Error for MigrationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::VersionAccess { ref source } => Some(source),
            Self::UnsupportedVersion { .. } => None,
            Self::Statement { ref source } => Some(source),
        }
    }
}
