//! Student profile page: identity card, booked and attended lists,
//! history, progress, stats and the edit form.

use chrono::NaiveDateTime;
use tracing::{info, warn};

use bktutor_shared::constants::{HISTORY_PREVIEW_LIMIT, RECENT_TAB_LIMIT};
use bktutor_shared::format::{
    format_date_compact, format_date_short, format_email, format_phone, initials,
    progress_from_history, progress_percent, trim_bio,
};
use bktutor_shared::protocol::{Fields, ProfileUpdate, StudentProfileResponse};
use bktutor_shared::types::{AttendedSession, Booking, HistoryEntry, Stats};

use crate::api::ApiClient;
use crate::commands::downloads::DownloadTracker;
use crate::error::ApiError;
use crate::events::{Navigation, Notice, Step};
use crate::merge::text_field;

pub const EMPTY_HISTORY_TEXT: &str = "Nothing recorded.";
pub const EMPTY_PROGRESS_TEXT: &str = "No active courses yet.";
pub const EMPTY_BOOKED_TEXT: &str = "No booked sessions yet";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Tab {
    /// The first ten entries.
    #[default]
    Recent,
    All,
}

impl Tab {
    fn visible<T>(self, items: &[T]) -> &[T] {
        match self {
            Tab::Recent => &items[..items.len().min(RECENT_TAB_LIMIT)],
            Tab::All => items,
        }
    }
}

/// `"{n} total"`
pub fn total_label(len: usize) -> String {
    format!("{len} total")
}

/// A line of the history previews.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRow {
    pub date: String,
    pub text: String,
}

impl HistoryRow {
    fn from_entry(entry: &HistoryEntry) -> Self {
        Self {
            date: format_date_short(entry.date.as_deref()),
            text: format!(
                "{} - {} - {}",
                entry.course_code,
                entry.course_title,
                entry.mode.as_deref().unwrap_or("")
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressRow {
    pub code: String,
    pub percent: u8,
}

/// Booked-card fields: title, added date, scheduled date and detail link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookedCard {
    pub title: String,
    pub added: String,
    pub scheduled: String,
    pub link: Option<Navigation>,
}

impl BookedCard {
    pub fn from_booking(b: &Booking) -> Self {
        Self {
            title: format!("{} - {}", b.code, b.title),
            added: format_date_compact(b.added()),
            scheduled: format_date_compact(b.scheduled()),
            link: b.detail_id().map(Navigation::SessionDetail),
        }
    }
}

/// A new avatar picked in the edit form.
#[derive(Debug, Clone)]
pub struct AvatarUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

pub struct ProfilePage {
    api: ApiClient,
    profile: Option<StudentProfileResponse>,
    attended: Vec<AttendedSession>,
    booked_tab: Tab,
    attended_tab: Tab,
    notice: Option<Notice>,
    downloads: DownloadTracker,
}

impl ProfilePage {
    pub fn new(api: ApiClient, downloads: DownloadTracker) -> Self {
        Self {
            api,
            profile: None,
            attended: Vec::new(),
            booked_tab: Tab::default(),
            attended_tab: Tab::default(),
            notice: None,
            downloads,
        }
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn downloads(&self) -> &DownloadTracker {
        &self.downloads
    }

    pub async fn load(&mut self) -> Step {
        if let step @ Step::Navigate(_) = self.load_profile().await {
            return step;
        }
        self.load_attended().await
    }

    /// A transport failure here is treated like an expired session.
    pub async fn load_profile(&mut self) -> Step {
        match self.api.students_profile().await {
            Ok(profile) => {
                self.profile = Some(profile);
                Step::Stay
            }
            Err(ApiError::Unauthorized) => Step::to_login(),
            Err(ApiError::Transport(e)) => {
                warn!(error = %e, "profile unreachable");
                Step::to_login()
            }
            Err(e) => {
                warn!(error = %e, "profile failed to load");
                self.notice = Some(Notice::error("Unable to load profile."));
                Step::Stay
            }
        }
    }

    pub async fn load_attended(&mut self) -> Step {
        match self.api.attended_sessions().await {
            Ok(attended) => {
                self.attended = attended;
                Step::Stay
            }
            Err(ApiError::Unauthorized) => Step::to_login(),
            Err(e) => {
                warn!(error = %e, "attended sessions failed to load");
                Step::Stay
            }
        }
    }

    fn me(&self) -> Fields {
        self.profile
            .as_ref()
            .map(StudentProfileResponse::me_fields)
            .unwrap_or_default()
    }

    fn me_text(&self, key: &str) -> Option<String> {
        text_field(&self.me(), key).filter(|v| !v.is_empty())
    }

    pub fn avatar_initials(&self) -> String {
        let display = self
            .me_text("fullName")
            .or_else(|| self.me_text("email"))
            .unwrap_or_else(|| "ST".to_string());
        initials(&display)
    }

    pub fn avatar_url(&self) -> Option<String> {
        self.me_text("avatarUrl")
    }

    pub fn name(&self) -> String {
        self.me_text("fullName")
            .unwrap_or_else(|| "Student".to_string())
    }

    pub fn email(&self) -> String {
        format_email(self.me_text("email").as_deref())
    }

    pub fn student_id(&self) -> String {
        self.me_text("studentId").unwrap_or_else(|| "-".to_string())
    }

    pub fn major(&self) -> String {
        self.me_text("major").unwrap_or_else(|| "-".to_string())
    }

    pub fn phone(&self) -> String {
        format_phone(self.me_text("phone").as_deref())
    }

    pub fn bio(&self) -> String {
        trim_bio(self.me_text("bio").as_deref())
    }

    /// Current values for the edit form.
    pub fn edit_form(&self) -> ProfileUpdate {
        ProfileUpdate {
            full_name: self.me_text("fullName").unwrap_or_default(),
            phone: self
                .me_text("phone")
                .map(|p| format_phone(Some(&p)))
                .unwrap_or_default(),
            major: self.me_text("major").unwrap_or_default(),
            bio: self.me_text("bio").unwrap_or_default(),
        }
    }

    pub fn set_booked_tab(&mut self, tab: Tab) {
        self.booked_tab = tab;
    }

    pub fn set_attended_tab(&mut self, tab: Tab) {
        self.attended_tab = tab;
    }

    fn bookings(&self) -> &[Booking] {
        self.profile
            .as_ref()
            .map(StudentProfileResponse::booking_list)
            .unwrap_or_default()
    }

    pub fn booked_cards(&self) -> Vec<BookedCard> {
        self.booked_tab
            .visible(self.bookings())
            .iter()
            .map(BookedCard::from_booking)
            .collect()
    }

    pub fn booked_count_label(&self) -> String {
        total_label(self.bookings().len())
    }

    pub fn attended_visible(&self) -> &[AttendedSession] {
        self.attended_tab.visible(&self.attended)
    }

    pub fn attended_count_label(&self) -> String {
        total_label(self.attended.len())
    }

    /// Attendance preview, built from the attended sessions so both lists
    /// agree.
    pub fn attendance_history(&self) -> Vec<HistoryRow> {
        self.attended
            .iter()
            .take(HISTORY_PREVIEW_LIMIT)
            .map(|s| {
                HistoryRow::from_entry(&HistoryEntry {
                    date: s.completed_at.clone(),
                    course_code: s.code.clone(),
                    course_title: s.title.clone(),
                    mode: s.mode.clone(),
                    ..Default::default()
                })
            })
            .collect()
    }

    pub fn booking_history(&self) -> Vec<HistoryRow> {
        let Some(history) = self.profile.as_ref().and_then(|p| p.history.as_ref()) else {
            return Vec::new();
        };
        history
            .bookings
            .iter()
            .take(HISTORY_PREVIEW_LIMIT)
            .map(HistoryRow::from_entry)
            .collect()
    }

    /// Course progress, synthesized from attendance history when the
    /// backend reports none.
    pub fn progress_rows(&self, now: NaiveDateTime) -> Vec<ProgressRow> {
        let Some(profile) = &self.profile else {
            return Vec::new();
        };
        let items = match profile.progress.as_deref() {
            Some(items) if !items.is_empty() => items.to_vec(),
            _ => profile
                .history
                .as_ref()
                .map(|h| progress_from_history(&h.attendance))
                .unwrap_or_default(),
        };
        items
            .iter()
            .map(|item| ProgressRow {
                code: item.code.clone(),
                percent: progress_percent(item, now),
            })
            .collect()
    }

    pub fn stats(&self) -> Stats {
        self.profile
            .as_ref()
            .and_then(|p| p.stats.clone())
            .unwrap_or_default()
    }

    /// Save the edit form, upload the avatar when one was picked, then
    /// reload the profile.
    pub async fn update(&mut self, form: ProfileUpdate, avatar: Option<AvatarUpload>) -> Step {
        if self.profile.is_none() {
            return Step::Stay;
        }
        self.notice = Some(Notice::info("Saving..."));

        let form = form.trimmed();
        let saved = match self.api.update_profile(&form).await {
            Ok(()) => match avatar {
                Some(avatar) => self.api.upload_avatar(avatar.bytes, &avatar.file_name).await,
                None => Ok(()),
            },
            Err(e) => Err(e),
        };

        match saved {
            Ok(()) => {}
            Err(ApiError::Unauthorized) => return Step::to_login(),
            Err(e) => {
                warn!(error = %e, "profile update failed");
                self.notice = Some(Notice::error("Failed to update profile."));
                return Step::Stay;
            }
        }

        if let step @ Step::Navigate(_) = self.load_profile().await {
            return step;
        }
        info!("profile updated");
        self.notice = Some(Notice::info("Profile updated."));
        Step::Stay
    }
}
