use super::*;
use std::error::Error;
use std::fmt;

#[derive(Debug)]
pub enum QcDBError {
    DBMigrationError {
        source: db_migration::MigrationError,
    },
    DBConnectionError {
        source: diesel::result::ConnectionError,
    },
    GenericSQLError {
        source: diesel::result::Error,
    },
    NotFound,
    DuplicateImagePath {
        path: String,
    },
    ViolatesDBConsistency {
        message: &'static str,
    },
}
pub type Result<T> = std::result::Result<T, QcDBError>;

// Error Boilerplate (Error display, conversion and source)
impl fmt::Display for QcDBError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateImagePath { path } => {
                write!(f, "Image {} is already part of the QC database", path)
            }
            _ => write!(f, "Error During QC Database Interaction({:?})", self),
        }
    }
}
impl From<db_migration::MigrationError> for QcDBError {
    fn from(error: db_migration::MigrationError) -> Self {
        Self::DBMigrationError { source: error }
    }
}
impl From<diesel::result::Error> for QcDBError {
    fn from(error: diesel::result::Error) -> Self {
        match error {
            diesel::result::Error::NotFound => Self::NotFound,
            error => Self::GenericSQLError { source: error },
        }
    }
}
impl From<diesel::result::ConnectionError> for QcDBError {
    fn from(error: diesel::result::ConnectionError) -> Self {
        Self::DBConnectionError { source: error }
    }
}
impl Error for QcDBError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::DBMigrationError { ref source } => Some(source),
            Self::DBConnectionError { ref source } => Some(source),
            Self::GenericSQLError { ref source } => Some(source),
            Self::DuplicateImagePath { .. } => None,
            Self::ViolatesDBConsistency { .. } => None,
            Self::NotFound => None,
        }
    }
}
