//! Browse filter criteria and the debounced re-fetch trigger.
//!
//! Every mutation goes through [`FilterEngine::mutate`], which restarts a
//! single-slot quiet-period timer. Only when the timer expires is the
//! criteria snapshot handed to the fetch loop via [`FilterEngine::next_request`].

use std::collections::BTreeSet;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::warn;

use bktutor_shared::constants::{MAX_HOUR, MIN_HOUR};
use bktutor_shared::format::hour_range_label;
use bktutor_shared::types::Day;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterCriteria {
    query: String,
    online: bool,
    on_campus: bool,
    from_hour: u8,
    to_hour: u8,
    days: BTreeSet<Day>,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            query: String::new(),
            online: true,
            on_campus: true,
            from_hour: MIN_HOUR,
            to_hour: MAX_HOUR,
            days: BTreeSet::new(),
        }
    }
}

impl FilterCriteria {
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn online(&self) -> bool {
        self.online
    }

    pub fn on_campus(&self) -> bool {
        self.on_campus
    }

    pub fn hours(&self) -> (u8, u8) {
        (self.from_hour, self.to_hour)
    }

    pub fn days(&self) -> impl Iterator<Item = Day> + '_ {
        self.days.iter().copied()
    }

    pub fn is_day_selected(&self, day: Day) -> bool {
        self.days.contains(&day)
    }

    /// Course codes are matched upper-case.
    pub fn set_query(&mut self, query: &str) {
        self.query = query.to_uppercase();
    }

    pub fn toggle_online(&mut self) {
        self.online = !self.online;
    }

    pub fn toggle_on_campus(&mut self) {
        self.on_campus = !self.on_campus;
    }

    /// Move the lower bound; the upper bound follows when crossed.
    pub fn set_from_hour(&mut self, hour: u8) {
        self.from_hour = hour.clamp(MIN_HOUR, MAX_HOUR);
        if self.to_hour < self.from_hour {
            self.to_hour = self.from_hour;
        }
    }

    /// Move the upper bound; the lower bound follows when crossed.
    pub fn set_to_hour(&mut self, hour: u8) {
        self.to_hour = hour.clamp(MIN_HOUR, MAX_HOUR);
        if self.from_hour > self.to_hour {
            self.from_hour = self.to_hour;
        }
    }

    pub fn toggle_day(&mut self, day: Day) {
        if !self.days.remove(&day) {
            self.days.insert(day);
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn range_label(&self) -> String {
        hour_range_label(self.from_hour, self.to_hour)
    }

    /// Query string of `/sessions/browse`. Mode flags are only sent when
    /// switched off; the backend includes both modes by default.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        let code = self.query.trim();
        if !code.is_empty() {
            pairs.push(("code", code.to_string()));
        }
        pairs.push(("fromHour", self.from_hour.to_string()));
        pairs.push(("toHour", self.to_hour.to_string()));
        if !self.online {
            pairs.push(("online", "false".to_string()));
        }
        if !self.on_campus {
            pairs.push(("onCampus", "false".to_string()));
        }
        if !self.days.is_empty() {
            let days: Vec<&str> = self.days.iter().map(|d| d.label()).collect();
            pairs.push(("days", days.join(",")));
        }
        pairs
    }
}

/// Trailing-edge debouncer: each [`schedule`](Self::schedule) aborts the
/// previous timer, and only a value that survives the quiet period is sent.
pub struct Debouncer<T> {
    delay: Duration,
    runtime: Option<Handle>,
    pending: Option<JoinHandle<()>>,
    tx: mpsc::UnboundedSender<T>,
}

impl<T: Send + 'static> Debouncer<T> {
    /// Timers run on the runtime current at construction, if any, else on
    /// the one current at [`schedule`](Self::schedule) time.
    pub fn new(delay: Duration) -> (Self, mpsc::UnboundedReceiver<T>) {
        Self::build(delay, Handle::try_current().ok())
    }

    /// Run timers on `runtime`, so `schedule` works from any thread.
    pub fn with_runtime(delay: Duration, runtime: Handle) -> (Self, mpsc::UnboundedReceiver<T>) {
        Self::build(delay, Some(runtime))
    }

    fn build(delay: Duration, runtime: Option<Handle>) -> (Self, mpsc::UnboundedReceiver<T>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let debouncer = Self {
            delay,
            runtime,
            pending: None,
            tx,
        };
        (debouncer, rx)
    }

    /// Restart the quiet period with `value`. Without any reachable tokio
    /// runtime the value is delivered at once.
    pub fn schedule(&mut self, value: T) {
        self.cancel();
        let Some(runtime) = self.runtime.clone().or_else(|| Handle::try_current().ok()) else {
            warn!("no tokio runtime available, delivering without debounce");
            let _ = self.tx.send(value);
            return;
        };
        let tx = self.tx.clone();
        let delay = self.delay;
        self.pending = Some(runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(value);
        }));
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

/// Filter state plus the debounced stream of criteria to fetch with.
pub struct FilterEngine {
    criteria: FilterCriteria,
    debouncer: Debouncer<FilterCriteria>,
    requests: mpsc::UnboundedReceiver<FilterCriteria>,
}

impl FilterEngine {
    pub fn new(delay: Duration) -> Self {
        Self::from_debouncer(Debouncer::new(delay))
    }

    /// Engine whose timers live on `runtime`; its mutators may then be
    /// called from threads outside that runtime.
    pub fn with_runtime(delay: Duration, runtime: Handle) -> Self {
        Self::from_debouncer(Debouncer::with_runtime(delay, runtime))
    }

    fn from_debouncer(
        (debouncer, requests): (Debouncer<FilterCriteria>, mpsc::UnboundedReceiver<FilterCriteria>),
    ) -> Self {
        Self {
            criteria: FilterCriteria::default(),
            debouncer,
            requests,
        }
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    /// Apply `change` and restart the quiet-period timer.
    pub fn mutate(&mut self, change: impl FnOnce(&mut FilterCriteria)) {
        change(&mut self.criteria);
        self.refresh();
    }

    /// Schedule a fetch with the current criteria without changing them.
    pub fn refresh(&mut self) {
        self.debouncer.schedule(self.criteria.clone());
    }

    pub fn cancel(&mut self) {
        self.debouncer.cancel();
    }

    pub fn is_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// Wait for the next criteria snapshot whose quiet period elapsed.
    pub async fn next_request(&mut self) -> Option<FilterCriteria> {
        self.requests.recv().await
    }

    pub fn try_next_request(&mut self) -> Option<FilterCriteria> {
        self.requests.try_recv().ok()
    }
}
