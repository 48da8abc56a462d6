//! Browse filters, paging and the registration cart of the home page.

use tracing::{info, warn};

use bktutor_shared::types::{Day, Session, SessionId};

use crate::api::ApiClient;
use crate::cart::CartToggle;
use crate::catalog::FetchOutcome;
use crate::commands::home::StudentHome;
use crate::error::ApiError;
use crate::events::{Notice, Step};
use crate::filter::FilterCriteria;
use crate::sequence::Ticket;

/// A numbered browse request detached from the controller, so several can
/// be in flight while the controller keeps handling input.
pub struct PendingFetch {
    ticket: Ticket,
    api: ApiClient,
    query: Vec<(&'static str, String)>,
}

impl PendingFetch {
    pub fn ticket(&self) -> Ticket {
        self.ticket
    }

    pub async fn run(self) -> (Ticket, Result<Vec<Session>, ApiError>) {
        let result = self.api.browse(&self.query).await;
        (self.ticket, result)
    }
}

impl StudentHome {
    /// Filter setters restart the debounce timer on the current tokio
    /// runtime, or on the one given to [`StudentHome::with_runtime`].
    pub fn set_query(&mut self, query: &str) {
        self.filters.mutate(|c| c.set_query(query));
    }

    pub fn toggle_online(&mut self) {
        self.filters.mutate(FilterCriteria::toggle_online);
    }

    pub fn toggle_on_campus(&mut self) {
        self.filters.mutate(FilterCriteria::toggle_on_campus);
    }

    pub fn set_from_hour(&mut self, hour: u8) {
        self.filters.mutate(|c| c.set_from_hour(hour));
    }

    pub fn set_to_hour(&mut self, hour: u8) {
        self.filters.mutate(|c| c.set_to_hour(hour));
    }

    pub fn toggle_day(&mut self, day: Day) {
        self.filters.mutate(|c| c.toggle_day(day));
    }

    pub fn reset_filters(&mut self) {
        self.filters.mutate(FilterCriteria::reset);
    }

    /// Wait until a filter change survives the quiet period, then fetch.
    pub async fn run_pending_fetch(&mut self) -> Step {
        match self.filters.next_request().await {
            Some(criteria) => self.fetch(&criteria).await,
            None => Step::Stay,
        }
    }

    pub fn begin_fetch(&mut self, criteria: &FilterCriteria) -> PendingFetch {
        PendingFetch {
            ticket: self.state.catalog.begin(),
            api: self.api.clone(),
            query: criteria.query_pairs(),
        }
    }

    pub fn finish_fetch(&mut self, ticket: Ticket, result: Result<Vec<Session>, ApiError>) -> Step {
        match self.state.catalog.apply(ticket, result) {
            FetchOutcome::Unauthorized => self.discard(),
            FetchOutcome::Applied | FetchOutcome::Stale | FetchOutcome::Failed => Step::Stay,
        }
    }

    pub async fn fetch(&mut self, criteria: &FilterCriteria) -> Step {
        let (ticket, result) = self.begin_fetch(criteria).run().await;
        self.finish_fetch(ticket, result)
    }

    pub fn next_page(&mut self) -> bool {
        self.state.catalog.next_page()
    }

    pub fn prev_page(&mut self) -> bool {
        self.state.catalog.prev_page()
    }

    pub fn toggle_cart(&mut self, id: &SessionId) -> CartToggle {
        self.state.notice = None;
        self.state.registration.toggle(id)
    }

    pub fn cart_lines(&self) -> Vec<String> {
        self.state
            .registration
            .cart_lines(self.state.catalog.sessions())
    }

    /// Submit the whole cart in one request. Only a 2xx reply counts as
    /// success; the cart is kept otherwise.
    pub async fn confirm_registration(&mut self) -> Step {
        let ids = match self.state.registration.batch() {
            Ok(ids) => ids,
            Err(reason) => {
                self.state.notice = Some(Notice::error(reason));
                return Step::Stay;
            }
        };

        match self.api.register(&ids).await {
            Ok(()) => {
                info!(count = ids.len(), "sessions registered");
                self.state.registration.commit();
                self.state.notice = Some(Notice::info("Sessions registered."));
                Step::Stay
            }
            Err(ApiError::Unauthorized) => self.discard(),
            Err(e) => {
                warn!(error = %e, "registration failed");
                self.state.notice = Some(Notice::error("Registration failed."));
                Step::Stay
            }
        }
    }
}
