//! Registration cart and the set of already-booked sessions.

use std::collections::HashSet;

use bktutor_shared::types::{Session, SessionId};

pub const EMPTY_CART_TEXT: &str = "No courses selected yet. Add sessions above to build your plan.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartToggle {
    Added,
    Removed,
    /// The session is already registered.
    Blocked,
}

/// Cart contents are unique, keep insertion order and never overlap the
/// registered set.
#[derive(Debug, Default)]
pub struct Registration {
    cart: Vec<SessionId>,
    registered: HashSet<SessionId>,
}

impl Registration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cart(&self) -> &[SessionId] {
        &self.cart
    }

    pub fn is_selected(&self, id: &SessionId) -> bool {
        self.cart.contains(id)
    }

    pub fn is_registered(&self, id: &SessionId) -> bool {
        self.registered.contains(id)
    }

    pub fn registered_count(&self) -> usize {
        self.registered.len()
    }

    pub fn toggle(&mut self, id: &SessionId) -> CartToggle {
        if let Some(pos) = self.cart.iter().position(|c| c == id) {
            self.cart.remove(pos);
            return CartToggle::Removed;
        }
        if self.registered.contains(id) {
            return CartToggle::Blocked;
        }
        self.cart.push(id.clone());
        CartToggle::Added
    }

    /// Replace the registered set from the backend's bookings. Anything now
    /// registered leaves the cart.
    pub fn set_registered(&mut self, ids: impl IntoIterator<Item = SessionId>) {
        self.registered = ids.into_iter().collect();
        let registered = &self.registered;
        self.cart.retain(|id| !registered.contains(id));
    }

    /// Ids to submit, refused when the cart is empty.
    pub fn batch(&self) -> Result<Vec<SessionId>, &'static str> {
        if self.cart.is_empty() {
            Err("No sessions selected.")
        } else {
            Ok(self.cart.clone())
        }
    }

    /// Move every cart id into the registered set after a successful submit.
    pub fn commit(&mut self) {
        self.registered.extend(self.cart.drain(..));
    }

    /// One line per cart entry, resolved against the fetched sessions.
    pub fn cart_lines(&self, sessions: &[Session]) -> Vec<String> {
        self.cart
            .iter()
            .map(|id| match sessions.iter().find(|s| &s.id == id) {
                Some(s) => s.summary(),
                None => id.to_string(),
            })
            .collect()
    }
}
