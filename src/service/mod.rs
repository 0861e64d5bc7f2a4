//! Host facing queries on the QC index of one logical database.
//!
//! Every call opens its own handle on the (study, pipeline) database and answers with a
//! structured Response carrying an HTTP-like status, so a host can mount the service
//! behind any transport. Errors never escape as panics or Err values.
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Map, Value};
use std::path::{Path, PathBuf};
use tracing::{debug, error, warn};

use crate::config::{Config, DatabaseSettings, LogicalDb};
use crate::qc_db::{EntityDetails, EntityUpdate, QcDB, QcStatus, Rating, Summary};
use crate::table::{self, TableFormat};

mod errors;
pub use self::errors::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok = 200,
    BadRequest = 400,
    NotFound = 404,
    InternalError = 500,
}

impl Status {
    pub fn code(self) -> u16 {
        self as u16
    }

    pub fn is_success(self) -> bool {
        self == Status::Ok
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Json(Value),
    /// A downloadable document, e.g. the exported QC table.
    Document {
        file_name: String,
        content_type: &'static str,
        content: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: Status,
    pub payload: Payload,
}

impl Response {
    fn json<T: Serialize>(value: &T) -> Response {
        match serde_json::to_value(value) {
            Ok(value) => Response {
                status: Status::Ok,
                payload: Payload::Json(value),
            },
            Err(source) => Self::error(&ServiceError::SerializationError { source }),
        }
    }

    fn error(error: &ServiceError) -> Response {
        let status = error.status();
        match status {
            Status::InternalError => error!("Failed to answer request: {}", error),
            _ => debug!("Rejected request: {}", error),
        }

        Response {
            status,
            payload: Payload::Json(json!({ "error": error.to_string() })),
        }
    }

    fn from_result<T: Serialize>(result: Result<T>) -> Response {
        match result {
            Ok(value) => Self::json(&value),
            Err(error) => Self::error(&error),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryJson {
    pub number_of_unrated: i64,
    pub number_of_rows: i64,
    pub number_of_columns: i64,
    pub number_of_entities: i64,
}

impl From<Summary> for SummaryJson {
    fn from(summary: Summary) -> Self {
        Self {
            number_of_unrated: summary.unrated,
            number_of_rows: summary.rows,
            number_of_columns: summary.columns,
            number_of_entities: summary.entities,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatingJson {
    pub id: i64,
    pub name: String,
}

impl<'a> From<&'a Rating> for RatingJson {
    fn from(rating: &'a Rating) -> Self {
        Self {
            id: rating.id,
            name: rating.name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityJson {
    pub id: i64,
    pub name: String,
    pub row_name: String,
    pub column_name: String,
    pub images: Vec<String>,
    pub comment: String,
    pub failed: Option<bool>,
    pub rating: Option<RatingJson>,
}

impl EntityJson {
    fn new(details: &EntityDetails, image_base: &Path) -> Self {
        Self {
            id: details.id(),
            name: details.entity.name.clone(),
            row_name: details.entity.row_name.clone(),
            column_name: details.entity.column_name.clone(),
            images: details
                .images
                .iter()
                .map(|image| relative_image_path(&image.path, image_base))
                .collect(),
            comment: details.entity.comment.clone(),
            failed: details.status().failed(),
            rating: details.rating.as_ref().map(RatingJson::from),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityViewJson {
    pub entity: EntityJson,
    pub ratings: Vec<RatingJson>,
}

/// Body of a rating update. Absent fields stay untouched, null clears a field.
/// Fields other than rating, comment and failed are ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RatingUpdate {
    #[serde(default, deserialize_with = "deserialize_some")]
    pub rating: Option<Option<i64>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub comment: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub failed: Option<Option<bool>>,
}

// Distinguishes 'null' (Some(None)) from an absent field (None).
fn deserialize_some<'de, T, D>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

impl RatingUpdate {
    /// Parses an update body, which must be a JSON object.
    pub fn parse(body: &str) -> Result<RatingUpdate> {
        // Going through a map rejects arrays, which would otherwise fill the fields by position.
        let fields: Map<String, Value> =
            serde_json::from_str(body).map_err(|source| ServiceError::InvalidBody { source })?;
        serde_json::from_value(Value::Object(fields))
            .map_err(|source| ServiceError::InvalidBody { source })
    }

    fn to_entity_update(&self) -> EntityUpdate {
        EntityUpdate {
            rating: self.rating,
            comment: self
                .comment
                .as_ref()
                .map(|comment| comment.clone().unwrap_or_default()),
            status: self.failed.map(QcStatus::from_failed),
        }
    }
}

pub struct Service {
    config: Config,
    image_root: Option<PathBuf>,
}

impl Service {
    /// Image paths are reported relative to the base directory of their database.
    pub fn new(config: Config) -> Self {
        Self {
            config,
            image_root: None,
        }
    }

    /// Image paths are reported relative to the given root for all databases.
    pub fn with_image_root<P: Into<PathBuf>>(config: Config, image_root: P) -> Self {
        Self {
            config,
            image_root: Some(image_root.into()),
        }
    }

    /// Opens the database of the given study and pipeline.
    /// Unconfigured and not yet initialized databases are not found.
    pub fn database(&self, study: &str, pipeline: &str) -> Result<(QcDB, &DatabaseSettings)> {
        let db = LogicalDb::new(study, pipeline);
        let settings = self.config.logical_database(&db)?;

        let db_path = self.config.database_path(&db);
        if !db_path.is_file() {
            return Err(ServiceError::NotFound {
                what: format!("database {}", db),
            });
        }
        let path_string = db_path.to_str().ok_or_else(|| ServiceError::NotFound {
            what: format!("database {}", db),
        })?;

        Ok((QcDB::open(path_string)?, settings))
    }

    pub fn summary(&self, study: &str, pipeline: &str) -> Response {
        Response::from_result(self.query_summary(study, pipeline))
    }

    pub fn spreadsheet(&self, study: &str, pipeline: &str) -> Response {
        Response::from_result(self.query_spreadsheet(study, pipeline))
    }

    pub fn entity(&self, study: &str, pipeline: &str, entity_id: i64) -> Response {
        Response::from_result(self.query_entity(study, pipeline, entity_id))
    }

    pub fn view(&self, study: &str, pipeline: &str, entity_id: i64) -> Response {
        Response::from_result(self.query_view(study, pipeline, entity_id))
    }

    /// Applies a JSON rating update and answers with the updated entity.
    /// Invalid updates keep the stored values and yield a 400 response.
    pub fn update_rating(&self, study: &str, pipeline: &str, entity_id: i64, body: &str) -> Response {
        Response::from_result(self.apply_update(study, pipeline, entity_id, body))
    }

    /// The QC table of the database as CSV document.
    pub fn export(&self, study: &str, pipeline: &str) -> Response {
        match self.render_export(study, pipeline) {
            Ok(content) => Response {
                status: Status::Ok,
                payload: Payload::Document {
                    file_name: format!("{}_{}_qc.csv", study, pipeline),
                    content_type: "text/csv",
                    content,
                },
            },
            Err(error) => Response::error(&error),
        }
    }

    fn query_summary(&self, study: &str, pipeline: &str) -> Result<SummaryJson> {
        let (qc_db, _) = self.database(study, pipeline)?;
        Ok(qc_db.summary()?.into())
    }

    fn query_spreadsheet(&self, study: &str, pipeline: &str) -> Result<Vec<EntityJson>> {
        let (qc_db, settings) = self.database(study, pipeline)?;
        let image_base = self.image_base(settings, study, pipeline)?;

        Ok(qc_db
            .get_all_entity_details()?
            .iter()
            .map(|details| EntityJson::new(details, image_base))
            .collect())
    }

    fn query_entity(&self, study: &str, pipeline: &str, entity_id: i64) -> Result<EntityJson> {
        let (qc_db, settings) = self.database(study, pipeline)?;
        let image_base = self.image_base(settings, study, pipeline)?;

        let details = load_entity(&qc_db, entity_id)?;
        Ok(EntityJson::new(&details, image_base))
    }

    fn query_view(&self, study: &str, pipeline: &str, entity_id: i64) -> Result<EntityViewJson> {
        let (qc_db, settings) = self.database(study, pipeline)?;
        let image_base = self.image_base(settings, study, pipeline)?;

        let details = load_entity(&qc_db, entity_id)?;
        let ratings = qc_db.get_ratings(details.entity.component_id)?;
        Ok(EntityViewJson {
            entity: EntityJson::new(&details, image_base),
            ratings: ratings.iter().map(RatingJson::from).collect(),
        })
    }

    fn apply_update(
        &self,
        study: &str,
        pipeline: &str,
        entity_id: i64,
        body: &str,
    ) -> Result<EntityJson> {
        let (qc_db, settings) = self.database(study, pipeline)?;
        let image_base = self.image_base(settings, study, pipeline)?;

        // Unknown entities are reported before looking at the body.
        load_entity(&qc_db, entity_id)?;
        let update = RatingUpdate::parse(body)?.to_entity_update();
        if update.is_empty() {
            debug!("Empty rating update for entity {}", entity_id);
        }

        match qc_db.update_entity(entity_id, &update) {
            Ok(details) => Ok(EntityJson::new(&details, image_base)),
            Err(source) => {
                warn!("Rejected rating update for entity {}: {}", entity_id, source);
                Err(ServiceError::UpdateFailed { source })
            }
        }
    }

    fn render_export(&self, study: &str, pipeline: &str) -> Result<String> {
        let (qc_db, _) = self.database(study, pipeline)?;

        let columns = qc_db.get_table_columns()?;
        let rows = qc_db.get_table_rows()?;
        Ok(table::render(&columns, &rows, &TableFormat::default()))
    }

    fn image_base<'a>(
        &'a self,
        settings: &'a DatabaseSettings,
        study: &str,
        pipeline: &str,
    ) -> Result<&'a Path> {
        match self.image_root {
            Some(ref root) => Ok(root.as_path()),
            None => Ok(settings.base_dir(&LogicalDb::new(study, pipeline).name())?),
        }
    }
}

fn load_entity(qc_db: &QcDB, entity_id: i64) -> Result<EntityDetails> {
    qc_db
        .get_entity_details(entity_id)
        .map_err(|error| match error {
            crate::qc_db::QcDBError::NotFound => ServiceError::NotFound {
                what: format!("entity {}", entity_id),
            },
            error => error.into(),
        })
}

/// Strips the base directory from an image path, other paths are reported unchanged.
fn relative_image_path(image_path: &str, image_base: &Path) -> String {
    match Path::new(image_path).strip_prefix(image_base) {
        Ok(relative) => relative.to_string_lossy().into_owned(),
        Err(_) => image_path.to_string(),
    }
}
