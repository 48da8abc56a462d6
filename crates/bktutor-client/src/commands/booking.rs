//! Detail page of a booked session: cancel or reschedule it.

use tracing::{info, warn};

use bktutor_shared::constants::{MAX_RESCHEDULE_OPTIONS, RESCHEDULE_FALLBACK_POOL};
use bktutor_shared::format::format_date_compact;
use bktutor_shared::protocol::{CancelRequest, RescheduleRequest};
use bktutor_shared::types::{Session, SessionId};

use crate::api::ApiClient;
use crate::error::ApiError;
use crate::events::{Notice, Step};

pub const KEEP_CURRENT_LABEL: &str = "Keep current session";

/// Sessions offered as reschedule targets: other slots of the same course,
/// or any other sessions when the course has none.
pub fn replacement_candidates(all: &[Session], code: Option<&str>, exclude: &SessionId) -> Vec<Session> {
    let others = all.iter().filter(|s| &s.id != exclude);
    let same_course: Vec<Session> = others
        .clone()
        .filter(|s| code.is_some_and(|c| s.code == c))
        .cloned()
        .collect();

    let pool = if same_course.is_empty() {
        others.take(RESCHEDULE_FALLBACK_POOL).cloned().collect()
    } else {
        same_course
    };
    pool.into_iter().take(MAX_RESCHEDULE_OPTIONS).collect()
}

/// `12/03/25`, or `TBD` without a usable date.
pub fn scheduled_label(session: &Session) -> String {
    match format_date_compact(session.scheduled_at.as_deref()) {
        label if label == "-" => "TBD".to_string(),
        label => label,
    }
}

pub fn tutor_label(session: &Session) -> String {
    format!("Tutor: {}", session.tutor_or_tbd())
}

/// One entry of the reschedule picker. `id` is `None` for "keep current".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RescheduleOption {
    pub id: Option<SessionId>,
    pub label: String,
}

pub struct SessionPage {
    api: ApiClient,
    session_id: SessionId,
    session: Option<Session>,
    candidates: Vec<Session>,
    cancel_notice: Option<Notice>,
    reschedule_notice: Option<Notice>,
}

impl SessionPage {
    pub fn new(api: ApiClient, session_id: SessionId) -> Self {
        Self {
            api,
            session_id,
            session: None,
            candidates: Vec::new(),
            cancel_notice: None,
            reschedule_notice: None,
        }
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn candidates(&self) -> &[Session] {
        &self.candidates
    }

    pub fn cancel_notice(&self) -> Option<&Notice> {
        self.cancel_notice.as_ref()
    }

    pub fn reschedule_notice(&self) -> Option<&Notice> {
        self.reschedule_notice.as_ref()
    }

    /// `CO2003 - Data Structures`
    pub fn title(&self) -> Option<String> {
        self.session
            .as_ref()
            .map(|s| format!("{} - {}", s.code, s.title))
    }

    pub fn reschedule_options(&self) -> Vec<RescheduleOption> {
        let keep = RescheduleOption {
            id: None,
            label: KEEP_CURRENT_LABEL.to_string(),
        };
        std::iter::once(keep)
            .chain(self.candidates.iter().map(|s| RescheduleOption {
                id: Some(s.id.clone()),
                label: s.option_label(),
            }))
            .collect()
    }

    pub async fn load(&mut self) -> Step {
        match self.api.session_detail(&self.session_id).await {
            Ok(session) => self.session = Some(session),
            Err(ApiError::Unauthorized) => return Step::to_login(),
            Err(e) => warn!(session = %self.session_id, error = %e, "failed to load session"),
        }
        self.load_candidates().await;
        Step::Stay
    }

    /// Refresh the picker. Failures leave it with only "keep current".
    async fn load_candidates(&mut self) {
        match self.api.browse_all().await {
            Ok(all) => {
                let code = self.session.as_ref().map(|s| s.code.as_str());
                self.candidates = replacement_candidates(&all, code, &self.session_id);
            }
            Err(e) => {
                warn!(error = %e, "failed to load reschedule options");
                self.candidates.clear();
            }
        }
    }

    pub async fn cancel(&mut self, reason: &str, notes: &str) -> Step {
        let body = CancelRequest {
            reason: reason.to_string(),
            notes: notes.to_string(),
        };
        let notice = match self.api.cancel_session(&self.session_id, &body).await {
            Ok(reply) if reply.ok => {
                info!(session = %self.session_id, "booking cancelled");
                Notice::info("Cancelled.")
            }
            Err(ApiError::Unauthorized) => return Step::to_login(),
            Ok(_) => Notice::error("Failed to cancel."),
            Err(e) => {
                warn!(error = %e, "cancel request failed");
                Notice::error("Failed to cancel.")
            }
        };
        self.cancel_notice = Some(notice);
        Step::Stay
    }

    /// Reschedule the booking, optionally onto `target`. On success with a
    /// target the page switches to the new session.
    pub async fn reschedule(&mut self, reason: &str, notes: &str, target: Option<SessionId>) -> Step {
        let body = RescheduleRequest {
            reason: reason.to_string(),
            notes: notes.to_string(),
            new_session_id: target.as_ref().map(|t| t.to_string()).unwrap_or_default(),
        };
        let reply = match self.api.reschedule_session(&self.session_id, &body).await {
            Ok(reply) if reply.ok => reply,
            Err(ApiError::Unauthorized) => return Step::to_login(),
            other => {
                if let Err(e) = other {
                    warn!(error = %e, "reschedule request failed");
                }
                self.reschedule_notice = Some(Notice::error("Failed to reschedule."));
                return Step::Stay;
            }
        };

        let Some(target) = target else {
            self.reschedule_notice = Some(Notice::info("Reschedule submitted."));
            return Step::Stay;
        };

        info!(from = %self.session_id, to = %target, "booking rescheduled");
        self.reschedule_notice = Some(Notice::info("Rescheduled to a new session."));
        self.session_id = target;

        match self.api.session_detail(&self.session_id).await {
            Ok(session) => self.session = Some(session),
            Err(ApiError::Unauthorized) => return Step::to_login(),
            Err(e) => {
                warn!(error = %e, "failed to load rescheduled session");
                if let Some(echoed) = reply.booking_session() {
                    self.session = Some(echoed);
                }
            }
        }
        self.load_candidates().await;
        Step::Stay
    }
}
