/// Module performing database migrations to newer application/database format versions.
/// Used on an existing DB connection to upgrade it to the most recent version.
///
/// upgrade_db(&connection); // upgrades to latest DB version
mod errors;
pub use self::errors::*;
mod version_001;
mod version_002;

use diesel::prelude::*;
use diesel::sql_query;
use diesel::sql_types::Integer;
use diesel::sqlite::SqliteConnection;

pub type DBVersion = u32;
pub const REQUIRED_DB_VERSION: DBVersion = 2;

#[derive(QueryableByName)]
struct UserVersion {
    #[sql_type = "Integer"]
    user_version: i32,
}

/// Upgrades the given database connection to the REQUIRED_DB_VERSION of the
/// current application build.
///
/// MUST be run before any other action on the database to make sure it's compatible.
pub fn upgrade_db(conn: &SqliteConnection) -> Result<DBVersion> {
    loop {
        let current_version = read_db_version(conn)?;
        if current_version < REQUIRED_DB_VERSION {
            migrate_up_from(conn, current_version)?;
        } else if current_version > REQUIRED_DB_VERSION {
            return Err(MigrationError::UnsupportedVersion {
                version: current_version,
            });
        } else {
            return Ok(current_version);
        }
    }
}

/// Migrates the given database connection from the DBVersion version to (version + 1).
///
/// Does not wrap the operation in a transaction,
/// the caller is supposed to if a rollback might be required.
fn migrate_up_from(conn: &SqliteConnection, version: DBVersion) -> Result<()> {
    match version {
        0 => version_001::migrate(conn)?,
        1 => version_002::migrate(conn)?,
        _ => return Err(MigrationError::UnsupportedVersion { version }),
    };

    write_db_version(conn, version + 1)?;
    Ok(())
}

fn read_db_version(conn: &SqliteConnection) -> Result<DBVersion> {
    let version = sql_query("PRAGMA user_version")
        .get_result::<UserVersion>(conn)
        .map_err(|source| MigrationError::VersionAccess { source })?;

    Ok(version.user_version as DBVersion)
}

fn write_db_version(conn: &SqliteConnection, version: DBVersion) -> Result<()> {
    sql_query(format!("PRAGMA user_version = {}", version))
        .execute(conn)
        .map_err(|source| MigrationError::VersionAccess { source })?;

    Ok(())
}

#[cfg(test)]
mod tests;
