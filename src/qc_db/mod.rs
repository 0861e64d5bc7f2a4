mod db_migration;
// Database schema - must be kept up to date manually
mod entity;
pub use self::entity::*;
mod entity_details;
pub use self::entity_details::*;
mod errors;
pub use self::errors::*;
mod schema;

use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::sql_query;
use diesel::sqlite::SqliteConnection;
use std::collections::HashMap;
use tracing::{debug, warn};

no_arg_sql_function!(
    last_insert_rowid,
    diesel::sql_types::BigInt,
    "Represents the SQL last_insert_row() function"
);

/// Handle on the store of one logical QC database (one study/pipeline pair).
/// Every read and write goes through an explicitly opened handle.
pub struct QcDB {
    conn: SqliteConnection,
}

impl QcDB {
    /// Opens the QC db file located at the given path and performs data migrations to
    /// the current application version if required.
    pub fn open(path: &str) -> Result<QcDB> {
        let result = QcDB {
            conn: SqliteConnection::establish(path)?,
        };

        result.default_db_settings()?;
        result.upgrade_db()?;

        Ok(result)
    }

    /// Creates a new, empty component.
    pub fn create_component(&self) -> Result<Component> {
        use self::schema::components::dsl::*;

        Ok(self.conn.transaction::<_, QcDBError, _>(|| {
            diesel::insert_into(components)
                .default_values()
                .execute(&self.conn)?;

            let new_id = self.last_insert_id()?;
            Ok(components.find(new_id).first::<Component>(&self.conn)?)
        })?)
    }

    /// Adds a rating to the vocabulary of the given component.
    pub fn create_rating(&self, for_component: &Component, rating_name: &str) -> Result<Rating> {
        use self::schema::ratings::dsl::*;

        Ok(self.conn.transaction::<_, QcDBError, _>(|| {
            diesel::insert_into(ratings)
                .values(rating::InsertFull {
                    name: rating_name,
                    component_id: for_component.id,
                })
                .execute(&self.conn)?;

            let new_id = self.last_insert_id()?;
            Ok(ratings.find(new_id).first::<Rating>(&self.conn)?)
        })?)
    }

    /// Inserts a row of the QC table if no row with the same name exists.
    /// Returns whether a new row was created.
    pub fn create_table_row(&self, row_name: &str) -> Result<bool> {
        use self::schema::table_rows::dsl::*;

        let inserted = diesel::insert_into(table_rows)
            .values(table_row::InsertFull { name: row_name })
            .execute(&self.conn);

        match inserted {
            Ok(_) => Ok(true),
            Err(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
                debug!("Row {} already exists", row_name);
                Ok(false)
            }
            Err(error) => Err(error.into()),
        }
    }

    /// Inserts a column of the QC table if no column with the same name exists.
    /// Returns whether a new column was created.
    pub fn create_table_column(&self, column_name: &str) -> Result<bool> {
        use self::schema::table_columns::dsl::*;

        let inserted = diesel::insert_into(table_columns)
            .values(table_column::InsertFull { name: column_name })
            .execute(&self.conn);

        match inserted {
            Ok(_) => Ok(true),
            Err(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
                warn!("Column {} is shared by multiple components", column_name);
                Ok(false)
            }
            Err(error) => Err(error.into()),
        }
    }

    /// Creates an unrated entity with an empty comment.
    /// Its row and column must exist already.
    pub fn create_entity(&self, new_entity: &qc_entity::InsertFull) -> Result<Entity> {
        use self::schema::entities::dsl::*;

        Ok(self.conn.transaction::<_, QcDBError, _>(|| {
            diesel::insert_into(entities)
                .values(new_entity)
                .execute(&self.conn)?;

            let new_id = self.last_insert_id()?;
            Ok(entities.find(new_id).first::<Entity>(&self.conn)?)
        })?)
    }

    /// Attaches the given image paths (in order) to an entity.
    /// Fails with DuplicateImagePath without adding any image if one of the paths is
    /// already used in this database.
    pub fn create_images(&self, for_entity: &Entity, image_paths: &[String]) -> Result<Vec<Image>> {
        use self::schema::images::dsl::*;
        use diesel::dsl::*;

        self.conn.transaction(|| {
            let mut result = Vec::with_capacity(image_paths.len());
            for image_path in image_paths {
                let already_used = select(exists(images.filter(path.eq(image_path.as_str()))))
                    .get_result(&self.conn)?;
                if already_used {
                    return Err(QcDBError::DuplicateImagePath {
                        path: image_path.clone(),
                    });
                }

                let inserted = diesel::insert_into(images)
                    .values(image::InsertFull {
                        path: image_path,
                        entity_id: for_entity.id,
                    })
                    .execute(&self.conn);
                match inserted {
                    Ok(_) => (),
                    Err(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
                        return Err(QcDBError::DuplicateImagePath {
                            path: image_path.clone(),
                        })
                    }
                    Err(error) => return Err(error.into()),
                }

                let new_id = self.last_insert_id()?;
                result.push(images.find(new_id).first::<Image>(&self.conn)?);
            }

            Ok(result)
        })
    }

    /// Counts rows, columns, entities and not yet rated entities.
    pub fn summary(&self) -> Result<Summary> {
        use self::schema::{entities, table_columns, table_rows};

        Ok(Summary {
            unrated: entities::table
                .filter(entities::status.eq(QcStatus::Unrated))
                .count()
                .get_result(&self.conn)?,
            rows: table_rows::table.count().get_result(&self.conn)?,
            columns: table_columns::table.count().get_result(&self.conn)?,
            entities: entities::table.count().get_result(&self.conn)?,
        })
    }

    pub fn get_entity(&self, entity_id: i64) -> Result<Entity> {
        use self::schema::entities::dsl::*;

        Ok(entities.find(entity_id).first::<Entity>(&self.conn)?)
    }

    /// Loads a single entity with its images (in insertion order) and rating.
    pub fn get_entity_details(&self, entity_id: i64) -> Result<EntityDetails> {
        use self::schema::{images, ratings};

        let entity = self.get_entity(entity_id)?;
        let entity_images = images::table
            .filter(images::entity_id.eq(entity.id))
            .order(images::id.asc())
            .load::<Image>(&self.conn)?;
        let rating = match entity.rating_id {
            Some(rating_id) => Some(ratings::table.find(rating_id).first::<Rating>(&self.conn)?),
            None => None,
        };

        Ok(EntityDetails {
            entity,
            images: entity_images,
            rating,
        })
    }

    /// Loads all entities of the database (ordered by id) with their images and ratings.
    pub fn get_all_entity_details(&self) -> Result<Vec<EntityDetails>> {
        use self::schema::entities;

        let all_entities = entities::table
            .order(entities::id.asc())
            .load::<Entity>(&self.conn)?;
        self.attach_details(all_entities)
    }

    /// The rating vocabulary of a component in insertion order.
    pub fn get_ratings(&self, for_component_id: i64) -> Result<Vec<Rating>> {
        use self::schema::ratings::dsl::*;

        Ok(ratings
            .filter(component_id.eq(for_component_id))
            .order(id.asc())
            .load::<Rating>(&self.conn)?)
    }

    /// All column names of the QC table, sorted by name.
    pub fn get_table_columns(&self) -> Result<Vec<String>> {
        use self::schema::table_columns::dsl::*;

        Ok(table_columns
            .order(name.asc())
            .load::<TableColumn>(&self.conn)?
            .into_iter()
            .map(|column| column.name)
            .collect())
    }

    /// All rows of the QC table (sorted by name) with the entities placed in them.
    /// Entities of a row are ordered by their column name and id.
    pub fn get_table_rows(&self) -> Result<Vec<RowEntities>> {
        use self::schema::{entities, table_rows};

        let rows = table_rows::table
            .order(table_rows::name.asc())
            .load::<TableRow>(&self.conn)?;
        let all_entities = entities::table
            .order((entities::column_name.asc(), entities::id.asc()))
            .load::<Entity>(&self.conn)?;

        let mut by_row: HashMap<String, Vec<EntityDetails>> = HashMap::new();
        for details in self.attach_details(all_entities)? {
            by_row
                .entry(details.entity.row_name.clone())
                .or_insert_with(Vec::new)
                .push(details);
        }

        Ok(rows
            .into_iter()
            .map(|row| RowEntities {
                entities: by_row.remove(&row.name).unwrap_or_default(),
                name: row.name,
            })
            .collect())
    }

    /// Applies a partial update to the ratable fields of an entity.
    /// A new rating must belong to the entity's component.
    pub fn update_entity(&self, entity_id: i64, update: &EntityUpdate) -> Result<EntityDetails> {
        use self::schema::entities::dsl::*;
        use self::schema::ratings;

        self.conn.transaction(|| {
            let entity = self.get_entity(entity_id)?;

            if let Some(new_rating) = update.rating {
                if let Some(new_rating) = new_rating {
                    let rating = ratings::table
                        .find(new_rating)
                        .first::<Rating>(&self.conn)
                        .optional()?;
                    match rating {
                        Some(ref rating) if rating.component_id == entity.component_id => (),
                        _ => {
                            return Err(QcDBError::ViolatesDBConsistency {
                                message: "Rating must belong to the component of the entity!",
                            })
                        }
                    }
                }
                diesel::update(entities.find(entity.id))
                    .set(rating_id.eq(new_rating))
                    .execute(&self.conn)?;
            }
            if let Some(ref new_comment) = update.comment {
                diesel::update(entities.find(entity.id))
                    .set(comment.eq(new_comment.as_str()))
                    .execute(&self.conn)?;
            }
            if let Some(new_status) = update.status {
                diesel::update(entities.find(entity.id))
                    .set(status.eq(new_status))
                    .execute(&self.conn)?;
            }

            self.get_entity_details(entity.id)
        })
    }

    fn attach_details(&self, all_entities: Vec<Entity>) -> Result<Vec<EntityDetails>> {
        use self::schema::{images, ratings};

        let mut images_by_entity: HashMap<i64, Vec<Image>> = HashMap::new();
        for image in images::table
            .order(images::id.asc())
            .load::<Image>(&self.conn)?
        {
            images_by_entity
                .entry(image.entity_id)
                .or_insert_with(Vec::new)
                .push(image);
        }
        let ratings_by_id: HashMap<i64, Rating> = ratings::table
            .load::<Rating>(&self.conn)?
            .into_iter()
            .map(|rating| (rating.id, rating))
            .collect();

        Ok(all_entities
            .into_iter()
            .map(|entity| EntityDetails {
                images: images_by_entity.remove(&entity.id).unwrap_or_default(),
                rating: entity
                    .rating_id
                    .and_then(|rating_id| ratings_by_id.get(&rating_id).cloned()),
                entity,
            })
            .collect())
    }

    fn last_insert_id(&self) -> Result<i64> {
        Ok(diesel::select(last_insert_rowid).get_result::<i64>(&self.conn)?)
    }

    fn upgrade_db(&self) -> db_migration::Result<()> {
        self.conn
            .transaction(|| db_migration::upgrade_db(&self.conn))?;

        Ok(())
    }

    fn default_db_settings(&self) -> Result<()> {
        sql_query("PRAGMA journal_mode = WAL").execute(&self.conn)?;
        sql_query("PRAGMA foreign_keys = 1").execute(&self.conn)?;

        Ok(())
    }
}
