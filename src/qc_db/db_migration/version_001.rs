use super::*;

pub fn migrate(conn: &SqliteConnection) -> Result<()> {
    create_table_components(conn)?;
    create_table_ratings(conn)?;
    create_table_table_columns(conn)?;
    create_table_table_rows(conn)?;
    create_table_entities(conn)?;
    create_table_images(conn)?;

    Ok(())
}

// A component is one batch of entities produced from one component of the QC specification.
// It only exists to scope ratings and entities.
fn create_table_components(conn: &SqliteConnection) -> Result<()> {
    sql_query(
        "CREATE TABLE components(
                id              INTEGER PRIMARY KEY NOT NULL
             )",
    )
    .execute(conn)?;

    Ok(())
}

// The rating vocabulary of a component. Two components may both offer e.g. a 'Pass'
// rating, these are still two distinct ratings.
fn create_table_ratings(conn: &SqliteConnection) -> Result<()> {
    sql_query(
        "CREATE TABLE ratings(
                id              INTEGER PRIMARY KEY NOT NULL,
                name            TEXT NOT NULL,
                component_id    INTEGER NOT NULL,

                FOREIGN KEY(component_id)   REFERENCES components(id)
             )",
    )
    .execute(conn)?;

    Ok(())
}

// Columns and rows of the QC table are identified by their resolved template name.
fn create_table_table_columns(conn: &SqliteConnection) -> Result<()> {
    sql_query(
        "CREATE TABLE table_columns(
                name            TEXT PRIMARY KEY NOT NULL
             )",
    )
    .execute(conn)?;

    Ok(())
}

fn create_table_table_rows(conn: &SqliteConnection) -> Result<()> {
    sql_query(
        "CREATE TABLE table_rows(
                name            TEXT PRIMARY KEY NOT NULL
             )",
    )
    .execute(conn)?;

    Ok(())
}

// A single entity to QC. Status encodes the pass/fail decision
// (0 = not rated yet, 1 = pass, 2 = fail).
fn create_table_entities(conn: &SqliteConnection) -> Result<()> {
    sql_query(
        "CREATE TABLE entities(
                id              INTEGER PRIMARY KEY NOT NULL,
                name            TEXT NOT NULL,
                component_id    INTEGER NOT NULL,

                row_name        TEXT NOT NULL,
                column_name     TEXT NOT NULL,

                comment         TEXT NOT NULL DEFAULT '',
                status          INTEGER NOT NULL DEFAULT 0,
                rating_id       INTEGER,

                FOREIGN KEY(component_id)   REFERENCES components(id),
                FOREIGN KEY(row_name)       REFERENCES table_rows(name),
                FOREIGN KEY(column_name)    REFERENCES table_columns(name),
                FOREIGN KEY(rating_id)      REFERENCES ratings(id)
             )",
    )
    .execute(conn)?;

    Ok(())
}

// Images used to assess the quality of an entity.
// A path may only be used once per QC database.
fn create_table_images(conn: &SqliteConnection) -> Result<()> {
    sql_query(
        "CREATE TABLE images(
                id              INTEGER PRIMARY KEY NOT NULL,
                path            TEXT NOT NULL UNIQUE,
                entity_id       INTEGER NOT NULL,

                FOREIGN KEY(entity_id)      REFERENCES entities(id)
             )",
    )
    .execute(conn)?;

    Ok(())
}
