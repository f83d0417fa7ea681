use crate::db::migrate::run_pending_migrations;
use crate::errors::AppResult;
use rusqlite::Connection;

/// Initialize the database.
/// All schema creation goes through the migration engine.
pub fn init_db(conn: &Connection) -> AppResult<()> {
    conn.pragma_update(None, "synchronous", "FULL")?;
    run_pending_migrations(conn)?;
    Ok(())
}
