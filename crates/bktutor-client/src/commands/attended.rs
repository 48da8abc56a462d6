//! Detail page of a completed session with its library material.

use chrono::NaiveDate;
use tracing::{debug, warn};

use bktutor_shared::constants::DEFAULT_ATTENDED_PROGRESS;
use bktutor_shared::format::format_date;
use bktutor_shared::types::{AttendedSession, Resource};

use crate::api::ApiClient;
use crate::commands::downloads::DownloadTracker;
use crate::error::ApiError;
use crate::events::Step;

pub const NOT_FOUND_TITLE: &str = "Session not found";
pub const EMPTY_SECTION_TEXT: &str = "No items.";

/// One titled group of resources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibrarySection {
    pub title: &'static str,
    pub items: Vec<Resource>,
}

pub struct AttendedPage {
    api: ApiClient,
    id: String,
    attended: Option<AttendedSession>,
    not_found: bool,
    downloads: DownloadTracker,
}

impl AttendedPage {
    pub fn new(api: ApiClient, id: impl Into<String>, downloads: DownloadTracker) -> Self {
        Self {
            api,
            id: id.into(),
            attended: None,
            not_found: false,
            downloads,
        }
    }

    pub fn attended(&self) -> Option<&AttendedSession> {
        self.attended.as_ref()
    }

    pub fn downloads(&self) -> &DownloadTracker {
        &self.downloads
    }

    /// Load the session, then swap in the library service's material when
    /// the session links to one. A failed library call keeps the embedded
    /// material.
    pub async fn load(&mut self) -> Step {
        let mut attended = match self.api.attended_detail(&self.id).await {
            Ok(attended) => attended,
            Err(ApiError::Unauthorized) => return Step::to_login(),
            Err(e) => {
                warn!(id = %self.id, error = %e, "attended session unavailable");
                self.not_found = true;
                return Step::Stay;
            }
        };

        if let Some(session_id) = attended.session_id.clone() {
            match self.api.library_resources(&session_id).await {
                Ok(library) => attended.library = Some(library),
                Err(e) => debug!(session = %session_id, error = %e, "library lookup failed"),
            }
        }

        self.not_found = false;
        self.attended = Some(attended);
        Step::Stay
    }

    pub fn title(&self) -> String {
        match (&self.attended, self.not_found) {
            (_, true) => NOT_FOUND_TITLE.to_string(),
            (Some(a), false) => format!("{} - {}", a.code, a.title),
            (None, false) => String::new(),
        }
    }

    pub fn tutor_label(&self) -> String {
        match self.attended.as_ref().and_then(|a| a.tutor.as_deref()) {
            Some(tutor) if !tutor.is_empty() => format!("Tutor: {tutor}"),
            _ => String::new(),
        }
    }

    pub fn description(&self) -> &str {
        match self.attended.as_ref().and_then(|a| a.description.as_deref()) {
            Some(d) if !d.is_empty() => d,
            _ => "No description.",
        }
    }

    pub fn completed_label(&self) -> String {
        format_date(self.attended.as_ref().and_then(|a| a.completed_at.as_deref()))
    }

    pub fn progress(&self) -> f64 {
        self.attended
            .as_ref()
            .and_then(|a| a.progress)
            .filter(|p| p.is_finite())
            .unwrap_or(DEFAULT_ATTENDED_PROGRESS)
    }

    /// `100%`
    pub fn progress_label(&self) -> String {
        format!("{}%", self.progress())
    }

    /// Mode, day and time badges, each only when known.
    pub fn tags(&self) -> Vec<String> {
        let Some(a) = &self.attended else {
            return Vec::new();
        };
        let mut tags: Vec<String> = [a.mode.as_deref(), a.day_of_week.as_deref()]
            .into_iter()
            .flatten()
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect();
        if let (Some(start), Some(end)) = (a.start.as_deref(), a.end.as_deref()) {
            if !start.is_empty() && !end.is_empty() {
                tags.push(format!("{start}-{end}"));
            }
        }
        tags
    }

    /// The four library groups. Resources fall back to the ones embedded in
    /// the session only when the library does not carry a resources list.
    pub fn sections(&self) -> Vec<LibrarySection> {
        let Some(a) = &self.attended else {
            return Vec::new();
        };
        let library = a.library.clone().unwrap_or_default();
        let resources = library.resources.unwrap_or_else(|| a.resources.clone());
        vec![
            LibrarySection {
                title: "Syllabus",
                items: library.syllabus,
            },
            LibrarySection {
                title: "Videos",
                items: library.videos,
            },
            LibrarySection {
                title: "Tests",
                items: library.tests,
            },
            LibrarySection {
                title: "Resources",
                items: resources,
            },
        ]
    }

    /// Log the download and return the link to fetch, or `None` for
    /// placeholder entries.
    pub fn download(&self, resource: &Resource, today: NaiveDate) -> Option<String> {
        if !resource.is_downloadable() {
            return None;
        }
        self.downloads.record(resource, today);
        Some(self.api.endpoint(&resource.url))
    }
}
