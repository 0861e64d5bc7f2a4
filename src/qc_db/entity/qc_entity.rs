use super::schema::entities;
use super::QcStatus;

/// A single entity to perform quality control on, placed at one row/column of the QC table.
#[derive(Debug, Queryable, Clone, PartialEq)]
pub struct Entity {
    pub id: i64,
    pub name: String,
    pub component_id: i64,

    pub row_name: String,
    pub column_name: String,

    pub comment: String,
    pub status: QcStatus,
    pub rating_id: Option<i64>,
}

// Comment, status and rating are left at their defaults ('', unrated, none).
#[derive(Insertable)]
#[table_name = "entities"]
pub struct InsertFull<'a> {
    pub name: &'a str,
    pub component_id: i64,

    pub row_name: &'a str,
    pub column_name: &'a str,
}
