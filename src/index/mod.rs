//! Builds the QC index of a logical database: discovers image files, matches them
//! against the QC specification and persists rows, columns, components, ratings,
//! entities and images.
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

use crate::bids::{self, EntityConfig, FileRecord};
use crate::config::{Config, LogicalDb};
use crate::matcher;
use crate::qc_db::{qc_entity, QcDB};
use crate::qc_spec::{EntityVocabulary, QcSpec};

mod errors;
pub use self::errors::*;

/// Counts of everything written during one indexing run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IndexReport {
    pub components: usize,
    pub ratings: usize,
    /// Rows and columns actually created, names shared with earlier components are not counted.
    pub rows: usize,
    pub columns: usize,
    pub entities: usize,
    pub images: usize,
}

// A QC entity with all names resolved, ready to be written.
#[derive(Debug, Clone, PartialEq)]
struct ResolvedEntity {
    name: String,
    row_name: String,
    column_name: String,
    images: Vec<String>,
}

#[derive(Debug)]
struct ResolvedComponent<'a> {
    ratings: &'a [String],
    entities: Vec<ResolvedEntity>,
}

/// Writes the index for all components of the specification into the database.
///
/// All components are matched and all names resolved before the first write, so ambiguous
/// matches or missing bindings leave the database untouched. Failures while writing
/// (e.g. a duplicate image path) stop the run, records written so far are kept.
pub fn build_index(qc_db: &QcDB, spec: &QcSpec, files: &[FileRecord]) -> Result<IndexReport> {
    let components = resolve_components(spec, files)?;

    let mut report = IndexReport::default();
    for component in &components {
        add_records(qc_db, component, &mut report)?;
    }

    Ok(report)
}

fn resolve_components<'a>(
    spec: &'a QcSpec,
    files: &[FileRecord],
) -> Result<Vec<ResolvedComponent<'a>>> {
    let mut result = Vec::with_capacity(spec.components.len());
    for (index, component) in spec.components.iter().enumerate() {
        let qc_entities = matcher::build_qc_entities(files, component)?;
        debug!(
            "Component {} yields {} entities from {} files",
            index,
            qc_entities.len(),
            files.len()
        );

        let mut entities = Vec::with_capacity(qc_entities.len());
        for qc_entity in &qc_entities {
            entities.push(ResolvedEntity {
                name: qc_entity.name()?,
                row_name: qc_entity.row_name(&spec.row_description)?,
                column_name: qc_entity.column_name()?,
                images: qc_entity
                    .images
                    .iter()
                    .map(|path| image_path_string(path))
                    .collect::<Result<_>>()?,
            });
        }

        result.push(ResolvedComponent {
            ratings: &component.ratings,
            entities,
        });
    }

    Ok(result)
}

// Image paths are stored as text and must survive the round trip unchanged.
fn image_path_string(path: &Path) -> Result<String> {
    path.to_str()
        .map(str::to_string)
        .ok_or_else(|| IndexError::NonUnicodePath {
            path: path.to_path_buf(),
        })
}

fn add_records(qc_db: &QcDB, component: &ResolvedComponent, report: &mut IndexReport) -> Result<()> {
    let db_component = qc_db.create_component()?;
    report.components += 1;

    for rating_name in component.ratings {
        qc_db.create_rating(&db_component, rating_name)?;
        report.ratings += 1;
    }

    let row_names: BTreeSet<&str> = component
        .entities
        .iter()
        .map(|entity| entity.row_name.as_str())
        .collect();
    for row_name in row_names {
        if qc_db.create_table_row(row_name)? {
            report.rows += 1;
        }
    }

    let column_names: BTreeSet<&str> = component
        .entities
        .iter()
        .map(|entity| entity.column_name.as_str())
        .collect();
    for column_name in column_names {
        if qc_db.create_table_column(column_name)? {
            report.columns += 1;
        }
    }

    for entity in &component.entities {
        let db_entity = qc_db.create_entity(&qc_entity::InsertFull {
            name: &entity.name,
            component_id: db_component.id,
            row_name: &entity.row_name,
            column_name: &entity.column_name,
        })?;
        report.entities += 1;

        report.images += qc_db.create_images(&db_entity, &entity.images)?.len();
    }

    info!(
        "Added component {} with {} entities and {} ratings",
        db_component.id,
        component.entities.len(),
        component.ratings.len()
    );
    Ok(())
}

/// Runs a full indexing pass for one configured database.
///
/// The database file must not exist yet, unless reset is set (the old file is removed).
pub fn initialize_database(config: &Config, db_name: &str, reset: bool) -> Result<IndexReport> {
    let db = LogicalDb::parse(db_name)?;
    let settings = config.database(db_name)?;
    let qc_spec_path = settings.qc_spec(db_name)?;
    let base_dir = settings.base_dir(db_name)?;

    let entity_config = match settings.bids_config() {
        Some(path) => EntityConfig::load(path)?,
        None => EntityConfig::default(),
    };
    let vocabulary = EntityVocabulary::from_config(&entity_config);
    let spec = QcSpec::load(qc_spec_path, &vocabulary)?;

    let files = bids::discover(base_dir, &spec.image_extensions, &entity_config)?;
    info!(
        "Found {} image files for {} in {}",
        files.len(),
        db,
        base_dir.display()
    );

    let db_path = config.database_path(&db);
    prepare_database_file(&db_path, reset)?;
    let path_string = db_path.to_str().ok_or_else(|| IndexError::NonUnicodePath {
        path: db_path.clone(),
    })?;
    let qc_db = QcDB::open(path_string)?;

    let report = build_index(&qc_db, &spec, &files)?;
    info!("Initialized database {}: {:?}", db, report);
    Ok(report)
}

/// Initializes the given databases one after another.
/// A failing database is logged and does not stop the remaining ones.
pub fn initialize_databases(
    config: &Config,
    db_names: &[&str],
    reset: bool,
) -> Vec<(String, Result<IndexReport>)> {
    db_names
        .iter()
        .map(|db_name| {
            info!("Initializing database {}", db_name);
            let result = initialize_database(config, db_name, reset);
            if let Err(ref e) = result {
                if e.is_configuration_error() {
                    error!("Invalid configuration for {}, aborting: {}", db_name, e);
                } else {
                    error!("Failed to initialize {}: {}", db_name, e);
                }
            }
            (db_name.to_string(), result)
        })
        .collect()
}

fn prepare_database_file(db_path: &Path, reset: bool) -> Result<()> {
    if db_path.exists() {
        if !reset {
            return Err(IndexError::AlreadyInitialized {
                path: db_path.to_path_buf(),
            });
        }

        debug!("Removing existing database {}", db_path.display());
        fs::remove_file(db_path)?;
        for suffix in &["-wal", "-shm"] {
            let mut side_file = db_path.as_os_str().to_owned();
            side_file.push(suffix);
            let side_file = PathBuf::from(side_file);
            if side_file.exists() {
                fs::remove_file(side_file)?;
            }
        }
    }

    if let Some(parent) = db_path.parent() {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}
