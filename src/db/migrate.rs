use crate::errors::{AppError, AppResult};
use rusqlite::{Connection, OptionalExtension};
use tracing::info;

/// Ensure that the `log` table exists; applied migrations are recorded there.
fn ensure_log_table(conn: &Connection) -> AppResult<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

struct Migration {
    version: &'static str,
    description: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: "20250110_0001_create_settings",
        description: "Created settings table",
        sql: r#"
        CREATE TABLE IF NOT EXISTS settings (
            id               INTEGER PRIMARY KEY CHECK (id = 1),
            user_id          INTEGER NOT NULL,
            work_started     TEXT,
            current_state    TEXT NOT NULL DEFAULT 'idle',
            need_work_log_to TEXT
        );
        "#,
    },
    Migration {
        version: "20250110_0002_create_log_navigation",
        description: "Created log_navigation table",
        sql: r#"
        CREATE TABLE IF NOT EXISTS log_navigation (
            date    TEXT PRIMARY KEY,      -- YYYY-MM-DD
            bucket  TEXT NOT NULL UNIQUE
        );
        "#,
    },
    Migration {
        version: "20250110_0003_create_log_records",
        description: "Created log_records table",
        sql: r#"
        CREATE TABLE IF NOT EXISTS log_records (
            id          TEXT PRIMARY KEY,
            bucket      TEXT NOT NULL,
            seq         INTEGER NOT NULL,
            start_time  TEXT NOT NULL,     -- RFC 3339
            end_time    TEXT NOT NULL,     -- RFC 3339
            message     TEXT NOT NULL DEFAULT ''
        );

        CREATE INDEX IF NOT EXISTS idx_log_records_bucket_seq ON log_records(bucket, seq);
        "#,
    },
];

fn is_applied(conn: &Connection, version: &str) -> AppResult<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

/// Public entry point: run all pending migrations, returning how many ran.
pub fn run_pending_migrations(conn: &Connection) -> AppResult<usize> {
    ensure_log_table(conn)?;

    let mut applied = 0;
    for m in MIGRATIONS {
        if is_applied(conn, m.version)? {
            continue;
        }

        let tx = conn.unchecked_transaction()?;
        tx.execute_batch(m.sql)
            .map_err(|e| AppError::Migration(format!("{}: {}", m.version, e)))?;
        tx.execute(
            "INSERT INTO log (date, operation, target, message)
             VALUES (datetime('now'), 'migration_applied', ?1, ?2)",
            [m.version, m.description],
        )?;
        tx.commit()?;

        info!(version = m.version, "migration applied");
        applied += 1;
    }

    Ok(applied)
}
