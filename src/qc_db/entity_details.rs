use super::{Entity, Image, QcStatus, Rating};

/// An entity loaded together with its images and (optional) rating.
/// This is the shape all read queries hand out to callers.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityDetails {
    pub entity: Entity,
    pub images: Vec<Image>,
    pub rating: Option<Rating>,
}

impl EntityDetails {
    pub fn id(&self) -> i64 {
        self.entity.id
    }

    pub fn status(&self) -> QcStatus {
        self.entity.status
    }

    pub fn rating_name(&self) -> &str {
        self.rating.as_ref().map_or("", |rating| rating.name.as_str())
    }

    /// The (rating, pass/fail, comment) triplet shown for this entity in exported tables.
    pub fn table_entry(&self) -> (&str, &str, &str) {
        (
            self.rating_name(),
            self.entity.status.label(),
            &self.entity.comment,
        )
    }
}

/// A row of the QC table with all entities placed in it, ordered by column name.
#[derive(Debug, Clone, PartialEq)]
pub struct RowEntities {
    pub name: String,
    pub entities: Vec<EntityDetails>,
}

/// Counts describing the rating progress of one QC database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Summary {
    pub unrated: i64,
    pub rows: i64,
    pub columns: i64,
    pub entities: i64,
}

/// Partial update of the ratable fields of an entity.
/// Fields set to None are left untouched, 'rating: Some(None)' removes the rating.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EntityUpdate {
    pub rating: Option<Option<i64>>,
    pub comment: Option<String>,
    pub status: Option<QcStatus>,
}

impl EntityUpdate {
    pub fn is_empty(&self) -> bool {
        self.rating.is_none() && self.comment.is_none() && self.status.is_none()
    }
}
