use super::schema::images;

#[derive(Debug, Queryable, Clone, PartialEq)]
pub struct Image {
    pub id: i64,
    pub path: String,
    pub entity_id: i64,
}

#[derive(Insertable)]
#[table_name = "images"]
pub struct InsertFull<'a> {
    pub path: &'a str,
    pub entity_id: i64,
}
