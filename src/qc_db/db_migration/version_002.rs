use super::*;

pub fn migrate(conn: &SqliteConnection) -> Result<()> {
    create_index_entity_row(conn)?;
    create_index_entity_status(conn)?;
    create_index_image_entity(conn)?;

    Ok(())
}

// Table exports walk all entities of a row ordered by their column.
fn create_index_entity_row(conn: &SqliteConnection) -> Result<()> {
    sql_query("CREATE INDEX entity_row_idx ON entities(row_name, column_name)").execute(conn)?;
    Ok(())
}

// The summary counts unrated entities on every request.
fn create_index_entity_status(conn: &SqliteConnection) -> Result<()> {
    sql_query("CREATE INDEX entity_status_idx ON entities(status)").execute(conn)?;
    Ok(())
}

fn create_index_image_entity(conn: &SqliteConnection) -> Result<()> {
    sql_query("CREATE INDEX image_entity_idx ON images(entity_id)").execute(conn)?;
    Ok(())
}
