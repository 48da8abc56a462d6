//! Best-effort wrapper around the local download log.
//!
//! The log is a convenience: when the database cannot be opened or a
//! query fails, the failure is logged and the tracker behaves as empty.

use chrono::NaiveDate;
use tracing::{debug, warn};

use bktutor_shared::constants::{DOWNLOAD_LOG_CAPACITY, DOWNLOAD_PANEL_LIMIT};
use bktutor_shared::types::Resource;
use bktutor_store::{Database, DownloadEntry};

use crate::config::ClientConfig;

pub const EMPTY_DOWNLOADS_TEXT: &str =
    "No downloads yet. Download a resource from an attended session.";

pub struct DownloadTracker {
    db: Option<Database>,
}

impl DownloadTracker {
    /// Open the log in the configured data directory, or the platform
    /// default when none is set.
    pub fn open(config: &ClientConfig) -> Self {
        let opened = match &config.data_dir {
            Some(dir) => Database::open_in_dir(dir),
            None => Database::open_default(),
        };
        match opened {
            Ok(db) => {
                debug!(path = ?db.path(), "download log opened");
                Self { db: Some(db) }
            }
            Err(e) => {
                warn!(error = %e, "download log unavailable");
                Self::disabled()
            }
        }
    }

    pub fn in_memory() -> Self {
        match Database::open_in_memory() {
            Ok(db) => Self { db: Some(db) },
            Err(e) => {
                warn!(error = %e, "in-memory download log unavailable");
                Self::disabled()
            }
        }
    }

    pub fn disabled() -> Self {
        Self { db: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.db.is_some()
    }

    /// Log a download of `resource` made on `day`. Placeholder resources
    /// without a link are ignored.
    pub fn record(&self, resource: &Resource, day: NaiveDate) {
        let Some(db) = &self.db else { return };
        if !resource.is_downloadable() {
            return;
        }
        let entry = DownloadEntry::from_resource(resource, day);
        if let Err(e) = db.record_download(&entry) {
            warn!(name = %entry.name, error = %e, "failed to record download");
        }
    }

    pub fn recent(&self, limit: usize) -> Vec<DownloadEntry> {
        let Some(db) = &self.db else {
            return Vec::new();
        };
        db.recent_downloads(limit).unwrap_or_else(|e| {
            warn!(error = %e, "failed to read download log");
            Vec::new()
        })
    }

    /// The short list on the profile page.
    pub fn panel(&self) -> Vec<DownloadEntry> {
        self.recent(DOWNLOAD_PANEL_LIMIT)
    }

    pub fn all(&self) -> Vec<DownloadEntry> {
        self.recent(DOWNLOAD_LOG_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resource(name: &str, url: &str) -> Resource {
        Resource {
            name: name.to_string(),
            size: "1.2 MB".to_string(),
            url: url.to_string(),
            ..Default::default()
        }
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    #[test]
    fn test_panel_shows_newest_four() {
        let tracker = DownloadTracker::in_memory();
        for i in 0..6 {
            tracker.record(&resource(&format!("r{i}"), "/library/r"), day());
        }
        let panel = tracker.panel();
        assert_eq!(panel.len(), 4);
        assert_eq!(panel[0].name, "r5");
        assert_eq!(panel[0].date, "2026-10-19");
        assert_eq!(tracker.all().len(), 6);
    }

    #[test]
    fn test_placeholders_not_logged() {
        let tracker = DownloadTracker::in_memory();
        tracker.record(&resource("Slides", "#"), day());
        tracker.record(&resource("Notes", ""), day());
        assert!(tracker.all().is_empty());
    }

    #[test]
    fn test_disabled_tracker_is_empty() {
        let tracker = DownloadTracker::disabled();
        tracker.record(&resource("Slides", "/x"), day());
        assert!(!tracker.is_enabled());
        assert!(tracker.panel().is_empty());
    }

    #[test]
    fn test_open_in_configured_dir() {
        let dir = tempfile::tempdir().unwrap();
        let config = ClientConfig {
            data_dir: Some(dir.path().join("data")),
            ..ClientConfig::default()
        };
        {
            let tracker = DownloadTracker::open(&config);
            tracker.record(&resource("Syllabus", "/library/syllabus"), day());
        }
        let reopened = DownloadTracker::open(&config);
        assert_eq!(reopened.panel()[0].label(), "Syllabus (1.2 MB)");
    }
}
