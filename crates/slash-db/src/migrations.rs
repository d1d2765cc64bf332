use rusqlite::Connection;
use tracing::info;

use crate::Result;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL);")?;

    let version: i64 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |r| r.get(0),
    )?;

    if version < 1 {
        info!("Running migration v1 (initial schema)");
        conn.execute_batch(
            "
            CREATE TABLE user (
                id              INTEGER PRIMARY KEY AUTOINCREMENT,
                created_ts      BIGINT NOT NULL DEFAULT (strftime('%s', 'now')),
                updated_ts      BIGINT NOT NULL DEFAULT (strftime('%s', 'now')),
                row_status      TEXT NOT NULL CHECK (row_status IN ('NORMAL', 'ARCHIVED')) DEFAULT 'NORMAL',
                email           TEXT NOT NULL UNIQUE,
                nickname        TEXT NOT NULL,
                password_hash   TEXT NOT NULL,
                role            TEXT NOT NULL CHECK (role IN ('ADMIN', 'USER')) DEFAULT 'USER'
            );

            CREATE TABLE shortcut (
                id              INTEGER PRIMARY KEY AUTOINCREMENT,
                creator_id      INTEGER NOT NULL,
                created_ts      BIGINT NOT NULL DEFAULT (strftime('%s', 'now')),
                updated_ts      BIGINT NOT NULL DEFAULT (strftime('%s', 'now')),
                row_status      TEXT NOT NULL CHECK (row_status IN ('NORMAL', 'ARCHIVED')) DEFAULT 'NORMAL',
                name            TEXT NOT NULL UNIQUE,
                link            TEXT NOT NULL,
                title           TEXT NOT NULL DEFAULT '',
                description     TEXT NOT NULL DEFAULT '',
                visibility      TEXT NOT NULL CHECK (visibility IN ('PRIVATE', 'WORKSPACE', 'PUBLIC')) DEFAULT 'PRIVATE',
                tag             TEXT NOT NULL DEFAULT '',
                og_metadata     TEXT NOT NULL DEFAULT '{}'
            );

            CREATE INDEX idx_shortcut_creator
                ON shortcut(creator_id, visibility);

            CREATE TABLE activity (
                id              INTEGER PRIMARY KEY AUTOINCREMENT,
                creator_id      INTEGER NOT NULL,
                created_ts      BIGINT NOT NULL DEFAULT (strftime('%s', 'now')),
                type            TEXT NOT NULL DEFAULT '',
                level           TEXT NOT NULL CHECK (level IN ('INFO', 'WARN', 'ERROR')) DEFAULT 'INFO',
                payload         TEXT NOT NULL DEFAULT '{}'
            );

            INSERT INTO schema_version (version) VALUES (1);
            ",
        )?;
    }

    info!("Database migrations complete");
    Ok(())
}
