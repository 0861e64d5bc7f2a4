use super::schema::table_rows;

#[derive(Debug, Queryable, Clone, PartialEq)]
pub struct TableRow {
    pub name: String,
}

#[derive(Insertable)]
#[table_name = "table_rows"]
pub struct InsertFull<'a> {
    pub name: &'a str,
}
