//! Request and response bodies exchanged with the REST gateway.
//!
//! Response types are lenient: every collection defaults to empty and the
//! alternative field names different backend services use are all accepted.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::types::{
    AttendedSession, Booking, History, LibraryBundle, Message, ProgressItem, Resource, Session,
    SessionId, Stats, Thread,
};

/// A free-form `me` object; fields differ between backend services.
pub type Fields = Map<String, Value>;

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Body of a failed request that carries a human-readable reason.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ErrorBody {
    pub error: Option<String>,
}

// ---------------------------------------------------------------------------
// Browse & registration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BrowseResponse {
    pub sessions: Option<Vec<Session>>,
    pub courses: Option<Vec<Session>>,
}

impl BrowseResponse {
    pub fn into_sessions(self) -> Vec<Session> {
        self.sessions.or(self.courses).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub session_ids: Vec<SessionId>,
}

// ---------------------------------------------------------------------------
// Booked session management
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SessionDetailResponse {
    Wrapped { session: Session },
    Bare(Session),
}

impl SessionDetailResponse {
    pub fn into_session(self) -> Session {
        match self {
            SessionDetailResponse::Wrapped { session } => session,
            SessionDetailResponse::Bare(session) => session,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CancelRequest {
    pub reason: String,
    pub notes: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RescheduleRequest {
    pub reason: String,
    pub notes: String,
    /// Empty keeps the current session.
    pub new_session_id: String,
}

/// Reply to cancel / reschedule.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MutationResponse {
    pub ok: bool,
    pub booking: Option<Value>,
}

impl MutationResponse {
    /// The updated booking, when the backend echoes one in session shape.
    pub fn booking_session(&self) -> Option<Session> {
        self.booking
            .clone()
            .and_then(|v| serde_json::from_value(v).ok())
    }
}

// ---------------------------------------------------------------------------
// Attended sessions & library
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AttendedListResponse {
    pub attended: Vec<AttendedSession>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AttendedDetailResponse {
    Attended { attended: AttendedSession },
    Session { session: AttendedSession },
    Bare(AttendedSession),
}

impl AttendedDetailResponse {
    pub fn into_attended(self) -> AttendedSession {
        match self {
            AttendedDetailResponse::Attended { attended } => attended,
            AttendedDetailResponse::Session { session } => session,
            AttendedDetailResponse::Bare(s) => s,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LibraryResponse {
    pub syllabus: Vec<Resource>,
    pub videos: Vec<Resource>,
    pub tests: Vec<Resource>,
    pub resources: Vec<Resource>,
}

impl From<LibraryResponse> for LibraryBundle {
    fn from(r: LibraryResponse) -> Self {
        LibraryBundle {
            syllabus: r.syllabus,
            videos: r.videos,
            tests: r.tests,
            resources: Some(r.resources),
        }
    }
}

// ---------------------------------------------------------------------------
// Profiles
// ---------------------------------------------------------------------------

/// `/students/profile`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StudentProfileResponse {
    pub student: Option<Fields>,
    pub me: Option<Fields>,
    pub booked_sessions: Option<Vec<Booking>>,
    pub bookings: Option<Vec<Booking>>,
    pub history: Option<History>,
    pub progress: Option<Vec<ProgressItem>>,
    pub stats: Option<Stats>,
}

impl StudentProfileResponse {
    pub fn me_fields(&self) -> Fields {
        self.student.clone().or_else(|| self.me.clone()).unwrap_or_default()
    }

    /// Booked list as the profile page shows it.
    pub fn booking_list(&self) -> &[Booking] {
        self.bookings
            .as_deref()
            .or(self.booked_sessions.as_deref())
            .unwrap_or_default()
    }

    /// Bookings as the browse page reads them for the registered set.
    pub fn registered_bookings(&self) -> &[Booking] {
        self.booked_sessions
            .as_deref()
            .or(self.bookings.as_deref())
            .unwrap_or_default()
    }
}

/// `/users/student/profile`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UserProfileResponse {
    pub me: Option<Fields>,
    pub student: Option<Fields>,
}

impl UserProfileResponse {
    pub fn me_fields(&self) -> Fields {
        self.me.clone().or_else(|| self.student.clone()).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub full_name: String,
    pub phone: String,
    pub major: String,
    pub bio: String,
}

impl ProfileUpdate {
    pub fn trimmed(self) -> Self {
        Self {
            full_name: self.full_name.trim().to_string(),
            phone: self.phone.trim().to_string(),
            major: self.major.trim().to_string(),
            bio: self.bio.trim().to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Messaging
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SidebarResponse {
    pub me: Option<Fields>,
    pub groups: Vec<Thread>,
    pub directs: Vec<Thread>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MessagesResponse {
    pub messages: Vec<Message>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SendMessageResponse {
    pub message: Option<Message>,
}
