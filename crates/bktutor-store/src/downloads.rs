//! Bounded "recent downloads" log.
//!
//! Rows are keyed by an autoincrement sequence, so insertion order is the
//! only ordering. After every insert the table is trimmed back to its
//! capacity by dropping the oldest sequences.

use rusqlite::params;

use bktutor_shared::constants::DOWNLOAD_LOG_CAPACITY;

use crate::database::Database;
use crate::error::Result;
use crate::models::DownloadEntry;

impl Database {
    /// Append `entry` as the newest download, keeping at most
    /// [`DOWNLOAD_LOG_CAPACITY`] entries.
    pub fn record_download(&self, entry: &DownloadEntry) -> Result<()> {
        self.record_download_capped(entry, DOWNLOAD_LOG_CAPACITY)
    }

    pub fn record_download_capped(&self, entry: &DownloadEntry, capacity: usize) -> Result<()> {
        let tx = self.conn().unchecked_transaction()?;
        tx.execute(
            "INSERT INTO downloads (name, size, url, date) VALUES (?1, ?2, ?3, ?4)",
            params![entry.name, entry.size, entry.url, entry.date],
        )?;
        let evicted = tx.execute(
            "DELETE FROM downloads
             WHERE seq NOT IN (SELECT seq FROM downloads ORDER BY seq DESC LIMIT ?1)",
            params![capacity as i64],
        )?;
        tx.commit()?;

        if evicted > 0 {
            tracing::debug!(evicted, "trimmed download log");
        }
        Ok(())
    }

    /// Newest-first view of the log.
    pub fn recent_downloads(&self, limit: usize) -> Result<Vec<DownloadEntry>> {
        let mut stmt = self.conn().prepare(
            "SELECT name, size, url, date
             FROM downloads
             ORDER BY seq DESC
             LIMIT ?1",
        )?;

        let rows = stmt.query_map(params![limit as i64], |row| {
            Ok(DownloadEntry {
                name: row.get(0)?,
                size: row.get(1)?,
                url: row.get(2)?,
                date: row.get(3)?,
            })
        })?;

        let mut entries = Vec::new();
        for row in rows {
            entries.push(row?);
        }
        Ok(entries)
    }

    pub fn download_count(&self) -> Result<usize> {
        let n: i64 = self
            .conn()
            .query_row("SELECT COUNT(*) FROM downloads", [], |row| row.get(0))?;
        Ok(n as usize)
    }

    pub fn clear_downloads(&self) -> Result<()> {
        self.conn().execute("DELETE FROM downloads", [])?;
        Ok(())
    }
}
