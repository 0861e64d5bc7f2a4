use super::*;
use diesel::sql_types::Text;
use std::error::Error;

#[derive(QueryableByName)]
struct SchemaName {
    #[sql_type = "Text"]
    name: String,
}

fn open_connection() -> SqliteConnection {
    SqliteConnection::establish(":memory:").unwrap()
}

fn query_schema_names(conn: &SqliteConnection) -> Vec<String> {
    sql_query("SELECT name FROM sqlite_master")
        .load::<SchemaName>(conn)
        .unwrap()
        .into_iter()
        .map(|row| row.name)
        .collect()
}

#[test]
fn read_and_write_db_version() {
    let conn = open_connection();

    assert_eq!(read_db_version(&conn).unwrap(), 0);
    write_db_version(&conn, 42).unwrap();
    assert_eq!(read_db_version(&conn).unwrap(), 42);
}

#[test]
fn properly_upgrade_to_version_1() {
    let conn = open_connection();

    migrate_up_from(&conn, 0).unwrap();

    let names = query_schema_names(&conn);
    for table in &[
        "components",
        "ratings",
        "table_columns",
        "table_rows",
        "entities",
        "images",
    ] {
        assert!(names.contains(&table.to_string()), "Missing table {}", table);
    }
    assert_eq!(read_db_version(&conn).unwrap(), 1);
}

#[test]
fn properly_upgrade_to_required_version() {
    let conn = open_connection();

    assert_eq!(upgrade_db(&conn).unwrap(), REQUIRED_DB_VERSION);
    assert_eq!(read_db_version(&conn).unwrap(), REQUIRED_DB_VERSION);
    assert!(query_schema_names(&conn).contains(&"entity_row_idx".to_string()));

    // Upgrading an up to date database is a no-op.
    assert_eq!(upgrade_db(&conn).unwrap(), REQUIRED_DB_VERSION);
}

#[test]
fn refuse_newer_db_versions() {
    let conn = open_connection();

    write_db_version(&conn, REQUIRED_DB_VERSION + 1).unwrap();
    match upgrade_db(&conn) {
        Err(error @ MigrationError::UnsupportedVersion { .. }) => {
            assert_eq!(
                error.to_string(),
                format!(
                    "QC database version {} is not supported, this build expects version {}",
                    REQUIRED_DB_VERSION + 1,
                    REQUIRED_DB_VERSION
                )
            );
            assert!(error.source().is_none());
        }
        _ => panic!("Must not open databases of newer application versions!"),
    }
}
