use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::SharedError;

/// Identifiers arrive either as strings (`"sess-12"`) or bare numbers
/// depending on the backend service; both are kept as text.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(i64),
}

impl From<RawId> for String {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Text(s) => s,
            RawId::Number(n) => n.to_string(),
        }
    }
}

fn de_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    RawId::deserialize(deserializer).map(String::from)
}

fn de_opt_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(Option::<RawId>::deserialize(deserializer)?.map(String::from))
}

macro_rules! text_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Serialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                de_id(deserializer).map(Self)
            }
        }

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }
    };
}

text_id!(
    /// Identifier of a scheduled tutoring session.
    SessionId
);

text_id!(
    /// Identifier of a messaging conversation.
    ConversationId
);

// ---------------------------------------------------------------------------
// Filter vocabulary
// ---------------------------------------------------------------------------

/// Delivery mode of a session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Mode {
    Online,
    OnCampus,
    /// Any label the backend sends that this client does not know.
    Other(String),
}

impl Mode {
    pub fn label(&self) -> &str {
        match self {
            Mode::Online => "Online",
            Mode::OnCampus => "On campus",
            Mode::Other(s) => s,
        }
    }
}

impl From<String> for Mode {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Online" => Mode::Online,
            "On campus" => Mode::OnCampus,
            _ => Mode::Other(s),
        }
    }
}

impl From<Mode> for String {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Other(s) => s,
            known => known.label().to_string(),
        }
    }
}

impl Default for Mode {
    fn default() -> Self {
        Mode::Other(String::new())
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Day-of-week chip of the browse filter. Sundays are never scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Day {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
}

impl Day {
    pub const ALL: [Day; 6] = [Day::Mon, Day::Tue, Day::Wed, Day::Thu, Day::Fri, Day::Sat];

    pub fn label(self) -> &'static str {
        match self {
            Day::Mon => "MON",
            Day::Tue => "TUE",
            Day::Wed => "WED",
            Day::Thu => "THU",
            Day::Fri => "FRI",
            Day::Sat => "SAT",
        }
    }
}

impl FromStr for Day {
    type Err = SharedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Day::ALL
            .into_iter()
            .find(|d| d.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| SharedError::UnknownDay(s.to_string()))
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Sessions
// ---------------------------------------------------------------------------

/// A scheduled tutoring offering as served by `/sessions/browse`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: SessionId,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub tutor: Option<String>,
    #[serde(default)]
    pub mode: Mode,
    #[serde(default)]
    pub day_of_week: String,
    #[serde(default)]
    pub start: String,
    #[serde(default)]
    pub end: String,
    #[serde(default)]
    pub scheduled_at: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
}

impl Session {
    pub fn tutor_or_tbd(&self) -> &str {
        match self.tutor.as_deref() {
            Some(t) if !t.is_empty() => t,
            _ => "TBD",
        }
    }

    pub fn time_range(&self) -> String {
        format!("{}-{}", self.start, self.end)
    }

    /// `CO2003 - Data Structures (MON 07:00-09:00, Online)`
    pub fn summary(&self) -> String {
        format!(
            "{} - {} ({} {}, {})",
            self.code,
            self.title,
            self.day_of_week,
            self.time_range(),
            self.mode
        )
    }

    /// Summary plus tutor, used for reschedule options.
    pub fn option_label(&self) -> String {
        format!(
            "{} - {} ({} {}, {}, Tutor: {})",
            self.code,
            self.title,
            self.day_of_week,
            self.time_range(),
            self.mode,
            self.tutor_or_tbd()
        )
    }
}

/// A booked session entry from the student profile.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Booking {
    #[serde(deserialize_with = "de_opt_id")]
    pub id: Option<String>,
    pub session_id: Option<SessionId>,
    pub code: String,
    pub title: String,
    pub added_at: Option<String>,
    pub date: Option<String>,
    pub scheduled_at: Option<String>,
    pub start_date: Option<String>,
}

impl Booking {
    /// Identifier used to open the session detail view.
    pub fn detail_id(&self) -> Option<SessionId> {
        self.session_id
            .clone()
            .or_else(|| self.id.clone().map(SessionId))
    }

    pub fn added(&self) -> Option<&str> {
        self.added_at.as_deref().or(self.date.as_deref())
    }

    pub fn scheduled(&self) -> Option<&str> {
        self.scheduled_at.as_deref().or(self.start_date.as_deref())
    }
}

// ---------------------------------------------------------------------------
// Attended sessions & library
// ---------------------------------------------------------------------------

/// A downloadable library item.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Resource {
    #[serde(deserialize_with = "de_opt_id")]
    pub id: Option<String>,
    pub name: String,
    pub title: Option<String>,
    pub size: String,
    pub url: String,
}

impl Resource {
    pub fn display_name(&self) -> &str {
        if !self.name.is_empty() {
            return &self.name;
        }
        match self.title.as_deref() {
            Some(t) if !t.is_empty() => t,
            _ => "Resource",
        }
    }

    /// Placeholder entries carry an empty url or `#`.
    pub fn is_downloadable(&self) -> bool {
        !self.url.is_empty() && self.url != "#"
    }
}

/// Library material grouped the way the attended-session view shows it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LibraryBundle {
    pub syllabus: Vec<Resource>,
    pub videos: Vec<Resource>,
    pub tests: Vec<Resource>,
    /// `None` when the library did not send the list at all.
    pub resources: Option<Vec<Resource>>,
}

/// A session the student has completed.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct AttendedSession {
    #[serde(deserialize_with = "de_opt_id")]
    pub id: Option<String>,
    pub session_id: Option<SessionId>,
    pub code: String,
    pub title: String,
    pub tutor: Option<String>,
    pub mode: Option<String>,
    pub day_of_week: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub description: Option<String>,
    pub completed_at: Option<String>,
    pub progress: Option<f64>,
    pub resources: Vec<Resource>,
    pub library: Option<LibraryBundle>,
}

impl AttendedSession {
    /// `09:00-11:00`, `09:00` or empty, depending on which bounds exist.
    pub fn time_label(&self) -> String {
        let start = self.start.as_deref().unwrap_or("");
        match self.end.as_deref() {
            Some(end) if !end.is_empty() => format!("{start}-{end}"),
            _ => start.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Profile page pieces
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct HistoryEntry {
    #[serde(deserialize_with = "de_opt_id")]
    pub id: Option<String>,
    pub session_id: Option<SessionId>,
    pub date: Option<String>,
    pub course_code: String,
    pub course_title: String,
    pub mode: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct History {
    pub bookings: Vec<HistoryEntry>,
    pub attendance: Vec<HistoryEntry>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ProgressItem {
    #[serde(deserialize_with = "de_opt_id")]
    pub id: Option<String>,
    pub session_id: Option<SessionId>,
    pub code: String,
    pub title: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub percent: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Stats {
    pub hours_studied: f64,
    pub sessions_attended: u32,
}

// ---------------------------------------------------------------------------
// Messaging
// ---------------------------------------------------------------------------

/// A conversation entry in the messaging sidebar.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Thread {
    pub id: ConversationId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub last: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Sender {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    #[serde(default)]
    pub display_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    #[serde(default, deserialize_with = "de_opt_id")]
    pub id: Option<String>,
    pub sender: Sender,
    #[serde(default)]
    pub content: String,
}
