//! The fetched session list with its pager and load status.

use bktutor_shared::types::{Session, SessionId};

use crate::error::ApiError;
use crate::pagination::{count_label, Pager};
use crate::sequence::{RequestSequencer, Ticket};

/// What happened to a browse response handed to [`Catalog::apply`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Applied,
    /// A newer fetch was issued; the response was dropped.
    Stale,
    /// Error message set, previous list kept.
    Failed,
    Unauthorized,
}

#[derive(Debug)]
pub struct Catalog {
    sessions: Vec<Session>,
    pager: Pager,
    loading: bool,
    error: Option<String>,
    sequencer: RequestSequencer,
}

impl Catalog {
    pub fn new(page_size: usize) -> Self {
        Self {
            sessions: Vec::new(),
            pager: Pager::new(page_size),
            loading: false,
            error: None,
            sequencer: RequestSequencer::new(),
        }
    }

    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    pub fn page_sessions(&self) -> &[Session] {
        self.pager.slice(&self.sessions)
    }

    pub fn pager(&self) -> &Pager {
        &self.pager
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn page_info(&self) -> String {
        self.pager.page_info(self.sessions.len())
    }

    pub fn count_label(&self) -> String {
        count_label(self.sessions.len())
    }

    pub fn next_page(&mut self) -> bool {
        self.pager.next(self.sessions.len())
    }

    pub fn prev_page(&mut self) -> bool {
        self.pager.prev()
    }

    /// Mark a fetch as started and number it. Any earlier error is cleared.
    pub fn begin(&mut self) -> Ticket {
        self.loading = true;
        self.error = None;
        self.sequencer.issue()
    }

    pub fn apply(&mut self, ticket: Ticket, result: Result<Vec<Session>, ApiError>) -> FetchOutcome {
        if !self.sequencer.is_latest(ticket) {
            tracing::debug!(?ticket, "dropping stale browse response");
            return FetchOutcome::Stale;
        }
        self.loading = false;

        match result {
            Ok(sessions) => {
                self.sessions = sessions;
                self.error = None;
                self.pager.reset();
                self.pager.clamp(self.sessions.len());
                FetchOutcome::Applied
            }
            Err(ApiError::Unauthorized) => FetchOutcome::Unauthorized,
            Err(e) => {
                tracing::warn!(error = %e, "session browse failed");
                self.error = Some(e.user_message("Unable to load sessions."));
                FetchOutcome::Failed
            }
        }
    }

    pub fn find(&self, id: &SessionId) -> Option<&Session> {
        self.sessions.iter().find(|s| &s.id == id)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use bktutor_shared::types::Mode;

    use super::*;

    pub(crate) fn session(id: &str, code: &str) -> Session {
        Session {
            id: SessionId::from(id),
            code: code.to_string(),
            title: format!("{code} title"),
            tutor: None,
            mode: Mode::Online,
            day_of_week: "MON".to_string(),
            start: "07:00".to_string(),
            end: "09:00".to_string(),
            scheduled_at: None,
            status: None,
            rating: None,
        }
    }

    fn sessions(n: usize) -> Vec<Session> {
        (0..n).map(|i| session(&format!("sess-{i}"), "CO2003")).collect()
    }

    #[test]
    fn test_apply_resets_page() {
        let mut catalog = Catalog::new(4);
        let t = catalog.begin();
        assert_eq!(catalog.apply(t, Ok(sessions(9))), FetchOutcome::Applied);
        catalog.next_page();
        catalog.next_page();
        assert_eq!(catalog.page_info(), "Page 3 / 3");

        let t = catalog.begin();
        catalog.apply(t, Ok(sessions(2)));
        assert_eq!(catalog.page_info(), "Page 1 / 1");
        assert_eq!(catalog.count_label(), "2 session(s)");
        assert!(!catalog.is_loading());
    }

    #[test]
    fn test_stale_response_discarded() {
        let mut catalog = Catalog::new(4);
        let slow = catalog.begin();
        let fast = catalog.begin();
        assert_eq!(catalog.apply(fast, Ok(sessions(1))), FetchOutcome::Applied);
        assert_eq!(catalog.apply(slow, Ok(sessions(7))), FetchOutcome::Stale);
        assert_eq!(catalog.sessions().len(), 1);
    }

    #[test]
    fn test_failure_keeps_previous_list() {
        let mut catalog = Catalog::new(4);
        let t = catalog.begin();
        catalog.apply(t, Ok(sessions(3)));

        let t = catalog.begin();
        let outcome = catalog.apply(
            t,
            Err(ApiError::Status {
                status: 500,
                message: None,
            }),
        );
        assert_eq!(outcome, FetchOutcome::Failed);
        assert_eq!(catalog.error(), Some("Unable to load sessions."));
        assert_eq!(catalog.sessions().len(), 3);

        let t = catalog.begin();
        assert_eq!(catalog.error(), None);
        assert_eq!(catalog.apply(t, Err(ApiError::Unauthorized)), FetchOutcome::Unauthorized);
    }
}
