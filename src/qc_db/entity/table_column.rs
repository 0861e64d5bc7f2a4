use super::schema::table_columns;

#[derive(Debug, Queryable, Clone, PartialEq)]
pub struct TableColumn {
    pub name: String,
}

#[derive(Insertable)]
#[table_name = "table_columns"]
pub struct InsertFull<'a> {
    pub name: &'a str,
}
