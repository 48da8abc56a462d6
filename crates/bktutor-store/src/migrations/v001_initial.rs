//! v001 -- Initial schema creation.

use rusqlite::Connection;

/// SQL executed when upgrading from version 0 to version 1.
const UP_SQL: &str = r#"
-- ----------------------------------------------------------------
-- Recent downloads (bounded log, newest = highest seq)
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS downloads (
    seq  INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    size TEXT NOT NULL DEFAULT '',
    url  TEXT NOT NULL DEFAULT '',
    date TEXT NOT NULL                       -- YYYY-MM-DD
);
"#;

/// Apply the initial migration.
pub fn up(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(UP_SQL)
}
