use super::schema::ratings;

#[derive(Debug, Queryable, Clone, PartialEq)]
pub struct Rating {
    pub id: i64,
    pub name: String,
    pub component_id: i64,
}

#[derive(Insertable)]
#[table_name = "ratings"]
pub struct InsertFull<'a> {
    pub name: &'a str,
    pub component_id: i64,
}
