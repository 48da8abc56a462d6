use std::time::Duration;

use bktutor_shared::protocol::{StudentProfileResponse, UserProfileResponse};
use tokio::runtime::Handle;
use tracing::{debug, info, warn};

use crate::api::ApiClient;
use crate::commands::auth;
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::events::Step;
use crate::filter::{FilterCriteria, FilterEngine};
use crate::merge::{MergePolicy, ProfileSnapshot, SidebarIdentity};
use crate::state::HomeState;

/// Controller of the student home page: browse, cart and messaging panel.
pub struct StudentHome {
    pub(crate) api: ApiClient,
    pub(crate) state: HomeState,
    pub(crate) filters: FilterEngine,
    page_size: usize,
    debounce: Duration,
    runtime: Option<Handle>,
    merge_policy: MergePolicy,
}

impl StudentHome {
    pub fn new(api: ApiClient, config: &ClientConfig) -> Self {
        Self {
            api,
            state: HomeState::new(config.page_size),
            filters: FilterEngine::new(config.debounce),
            page_size: config.page_size,
            debounce: config.debounce,
            runtime: None,
            merge_policy: MergePolicy::default(),
        }
    }

    /// Run filter debounce timers on `runtime`. The synchronous filter
    /// setters may then be called from threads outside it.
    pub fn with_runtime(mut self, runtime: Handle) -> Self {
        self.filters = FilterEngine::with_runtime(self.debounce, runtime.clone());
        self.runtime = Some(runtime);
        self
    }

    pub fn with_merge_policy(mut self, policy: MergePolicy) -> Self {
        self.merge_policy = policy;
        self
    }

    pub fn state(&self) -> &HomeState {
        &self.state
    }

    pub fn criteria(&self) -> &FilterCriteria {
        self.filters.criteria()
    }

    pub fn identity(&self) -> SidebarIdentity {
        self.state.identity()
    }

    /// First load of the page: profile, messaging sidebar, then an
    /// immediate (not debounced) fetch with the default filters.
    pub async fn init(&mut self) -> Step {
        info!("loading student home");
        if let step @ Step::Navigate(_) = self.load_profile().await {
            return step;
        }
        if let step @ Step::Navigate(_) = self.refresh_sidebar().await {
            return step;
        }
        let criteria = self.filters.criteria().clone();
        self.fetch(&criteria).await
    }

    /// Fetch both profile services concurrently and merge them. The
    /// registered set is refreshed from the bookings they report.
    pub async fn load_profile(&mut self) -> Step {
        let (students, users) = tokio::join!(
            self.api.students_profile(),
            self.api.users_student_profile()
        );

        if students.as_ref().err().is_some_and(ApiError::is_unauthorized)
            || users.as_ref().err().is_some_and(ApiError::is_unauthorized)
        {
            return self.discard();
        }

        let students: Option<StudentProfileResponse> = present(students, "/students/profile");
        let users: Option<UserProfileResponse> = present(users, "/users/student/profile");

        let snapshot = ProfileSnapshot::merge(students, users, self.merge_policy);
        self.state
            .registration
            .set_registered(snapshot.registered_ids());
        debug!(
            registered = self.state.registration.registered_count(),
            "profile merged"
        );
        self.state.profile = Some(snapshot);
        Step::Stay
    }

    pub async fn refresh_sidebar(&mut self) -> Step {
        match self.api.sidebar().await {
            Ok(sidebar) => {
                self.state.panel.set_sidebar(sidebar);
                Step::Stay
            }
            Err(ApiError::Unauthorized) => self.discard(),
            Err(e) => {
                warn!(error = %e, "failed to load messaging sidebar");
                Step::Stay
            }
        }
    }

    pub async fn logout(&mut self) -> Step {
        let step = auth::logout(&self.api).await;
        self.reset_state();
        step
    }

    /// Drop all page state and head to the login page.
    pub(crate) fn discard(&mut self) -> Step {
        info!("session expired, leaving student home");
        self.reset_state();
        Step::to_login()
    }

    /// Criteria and any snapshot already queued for fetching go together.
    fn reset_state(&mut self) {
        self.filters.cancel();
        self.filters = match &self.runtime {
            Some(runtime) => FilterEngine::with_runtime(self.debounce, runtime.clone()),
            None => FilterEngine::new(self.debounce),
        };
        self.state = HomeState::new(self.page_size);
    }
}

/// A failed profile call is treated as an empty body.
fn present<T>(result: Result<T, ApiError>, endpoint: &str) -> Option<T> {
    match result {
        Ok(body) => Some(body),
        Err(e) => {
            warn!(endpoint, error = %e, "profile source unavailable");
            None
        }
    }
}
