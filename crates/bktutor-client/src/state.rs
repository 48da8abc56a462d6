//! State of the student home page.
//!
//! The [`HomeState`] struct is owned by exactly one
//! [`StudentHome`](crate::commands::home::StudentHome) controller. Renderers
//! read it after every controller call; nothing else mutates it.

use bktutor_shared::protocol::Fields;

use crate::catalog::Catalog;
use crate::cart::Registration;
use crate::conversation::ConversationPanel;
use crate::events::Notice;
use crate::merge::{ProfileSnapshot, SidebarIdentity};

#[derive(Debug)]
pub struct HomeState {
    /// Fetched sessions, current page and load error.
    pub catalog: Catalog,

    /// Cart plus the ids the backend reports as already booked.
    pub registration: Registration,

    /// Merged view of both profile services.
    /// `None` until the first profile load.
    pub profile: Option<ProfileSnapshot>,

    pub panel: ConversationPanel,

    /// Message next to the registration button.
    pub notice: Option<Notice>,
}

impl HomeState {
    pub fn new(page_size: usize) -> Self {
        Self {
            catalog: Catalog::new(page_size),
            registration: Registration::new(),
            profile: None,
            panel: ConversationPanel::new(),
            notice: None,
        }
    }

    /// Avatar block of the sidebar.
    pub fn identity(&self) -> SidebarIdentity {
        let empty = Fields::new();
        let profile_me = self.profile.as_ref().map(|p| &p.me).unwrap_or(&empty);
        SidebarIdentity::resolve(profile_me, self.panel.sidebar().me.as_ref())
    }
}
