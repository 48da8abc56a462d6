//! Rows persisted in the local database.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use bktutor_shared::types::Resource;

/// One entry of the "recent downloads" log.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DownloadEntry {
    /// Resource name, `Resource` when the library item has none.
    pub name: String,
    /// Human-readable size label as served (`2.3 MB`), possibly empty.
    pub size: String,
    /// Download url, possibly empty.
    pub url: String,
    /// Day of the download, `YYYY-MM-DD`.
    pub date: String,
}

impl DownloadEntry {
    pub fn from_resource(resource: &Resource, day: NaiveDate) -> Self {
        Self {
            name: resource.display_name().to_string(),
            size: resource.size.clone(),
            url: resource.url.clone(),
            date: day.format("%Y-%m-%d").to_string(),
        }
    }

    /// `Slides (PDF) (2.3 MB)` or just the name when the size is unknown.
    pub fn label(&self) -> String {
        if self.size.is_empty() {
            self.name.clone()
        } else {
            format!("{} ({})", self.name, self.size)
        }
    }
}
