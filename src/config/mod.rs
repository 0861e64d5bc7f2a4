//! Configuration of the logical QC databases served by one installation.
//!
//! The configuration is a JSON document located through '--config' or the
//! QC_INDEX_CONF environment variable:
//!
//! {
//!   "database_dir": "/var/lib/qc_index",
//!   "databases": {
//!     "study01_fmriprep": {"qc_spec": "spec.json", "base_dir": "/data/derivatives"}
//!   }
//! }
//!
//! Relative paths are resolved against the directory holding the configuration file.
use serde::Deserialize;
use std::collections::BTreeMap;
use std::env;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::warn;

mod errors;
pub use self::errors::*;

pub const CONFIG_ENV_VAR: &str = "QC_INDEX_CONF";

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    database_dir: Option<PathBuf>,
    #[serde(default)]
    databases: BTreeMap<String, DatabaseSettings>,
}

/// Settings of one logical database. 'qc_spec' and 'base_dir' are required,
/// but only checked when the database is actually used.
/// Unknown keys are logged and ignored, so one odd block does not affect the others.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    qc_spec: Option<PathBuf>,
    base_dir: Option<PathBuf>,
    bids_config: Option<PathBuf>,
    #[serde(flatten)]
    ignored: BTreeMap<String, serde_json::Value>,
}

/// Identifies one isolated QC database: '<study>_<pipeline>'.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LogicalDb {
    pub study: String,
    pub pipeline: String,
}

impl LogicalDb {
    pub fn new<S: Into<String>, P: Into<String>>(study: S, pipeline: P) -> Self {
        Self {
            study: study.into(),
            pipeline: pipeline.into(),
        }
    }

    /// Splits a database name at its first underscore, the pipeline may contain further ones.
    pub fn parse(db_name: &str) -> Result<LogicalDb> {
        let mut parts = db_name.splitn(2, '_');
        match (parts.next(), parts.next()) {
            (Some(study), Some(pipeline)) if !study.is_empty() && !pipeline.is_empty() => {
                Ok(LogicalDb::new(study, pipeline))
            }
            _ => Err(ConfigError::InvalidDatabaseName {
                name: db_name.to_string(),
            }),
        }
    }

    pub fn name(&self) -> String {
        format!("{}_{}", self.study, self.pipeline)
    }
}

impl fmt::Display for LogicalDb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.study, self.pipeline)
    }
}

impl Config {
    /// Loads the configuration from the given file or, if none is given,
    /// from the file named by the QC_INDEX_CONF environment variable.
    pub fn locate(explicit_path: Option<&Path>) -> Result<Config> {
        match explicit_path {
            Some(path) => Self::load(path),
            None => match env::var_os(CONFIG_ENV_VAR) {
                Some(path) => Self::load(path),
                None => Err(ConfigError::EnvVarNotSet {
                    name: CONFIG_ENV_VAR,
                }),
            },
        }
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Config> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        // A bare file name has an empty parent.
        let config_dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let config_dir = fs::canonicalize(config_dir)?;

        Self::from_json(&content, config_dir)
    }

    /// Parses a configuration, resolving relative paths against config_dir.
    pub fn from_json<P: AsRef<Path>>(content: &str, config_dir: P) -> Result<Config> {
        let config_dir = config_dir.as_ref();
        let mut config: Config = serde_json::from_str(content)?;

        config.database_dir = Some(match config.database_dir.take() {
            Some(dir) => config_dir.join(dir),
            None => config_dir.to_path_buf(),
        });
        for (db_name, settings) in config.databases.iter_mut() {
            for key in settings.ignored.keys() {
                warn!("Ignoring unknown setting '{}' of database {}", key, db_name);
            }
            resolve_relative(config_dir, &mut settings.qc_spec);
            resolve_relative(config_dir, &mut settings.base_dir);
            resolve_relative(config_dir, &mut settings.bids_config);
        }

        Ok(config)
    }

    pub fn database_dir(&self) -> &Path {
        self.database_dir
            .as_ref()
            .map_or_else(|| Path::new("."), PathBuf::as_path)
    }

    /// All configured database names in sorted order.
    pub fn database_names(&self) -> Vec<&str> {
        self.databases.keys().map(String::as_str).collect()
    }

    pub fn database(&self, db_name: &str) -> Result<&DatabaseSettings> {
        self.databases
            .get(db_name)
            .ok_or_else(|| ConfigError::UnknownDatabase {
                name: db_name.to_string(),
            })
    }

    /// Looks up the settings of a logical database by study and pipeline.
    pub fn logical_database(&self, db: &LogicalDb) -> Result<&DatabaseSettings> {
        self.database(&db.name())
    }

    /// The SQLite file holding the given logical database.
    pub fn database_path(&self, db: &LogicalDb) -> PathBuf {
        self.database_dir().join(format!("{}.sqlite3", db.name()))
    }
}

impl DatabaseSettings {
    pub fn qc_spec(&self, db_name: &str) -> Result<&Path> {
        required(&self.qc_spec, db_name, "qc_spec")
    }

    pub fn base_dir(&self, db_name: &str) -> Result<&Path> {
        required(&self.base_dir, db_name, "base_dir")
    }

    /// Custom entity configuration, the built-in BIDS entities are used if absent.
    pub fn bids_config(&self) -> Option<&Path> {
        self.bids_config.as_ref().map(PathBuf::as_path)
    }
}

fn resolve_relative(config_dir: &Path, path: &mut Option<PathBuf>) {
    if let Some(value) = path.take() {
        *path = Some(config_dir.join(value));
    }
}

fn required<'a>(
    value: &'a Option<PathBuf>,
    db_name: &str,
    setting: &'static str,
) -> Result<&'a Path> {
    value
        .as_ref()
        .map(PathBuf::as_path)
        .ok_or_else(|| ConfigError::MissingSetting {
            database: db_name.to_string(),
            setting,
        })
}

#[cfg(test)]
mod tests;
