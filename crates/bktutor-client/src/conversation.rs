//! Messaging side panel: thread lists, the open conversation and its draft.

use bktutor_shared::protocol::SidebarResponse;
use bktutor_shared::types::{ConversationId, Message, Thread};

use crate::error::ApiError;
use crate::merge::text_field;
use crate::sequence::{RequestSequencer, Ticket};

pub const PLACEHOLDER: &str = "Pick a group or private chat to start messaging.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelPhase {
    /// No thread selected; the placeholder is shown.
    Idle,
    Loading,
    Active,
}

#[derive(Debug)]
pub struct ConversationPanel {
    sidebar: SidebarResponse,
    phase: PanelPhase,
    active: Option<Thread>,
    messages: Vec<Message>,
    draft: String,
    groups_open: bool,
    directs_open: bool,
    sequencer: RequestSequencer,
}

impl Default for ConversationPanel {
    fn default() -> Self {
        Self {
            sidebar: SidebarResponse::default(),
            phase: PanelPhase::Idle,
            active: None,
            messages: Vec::new(),
            draft: String::new(),
            groups_open: true,
            directs_open: true,
            sequencer: RequestSequencer::new(),
        }
    }
}

impl ConversationPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_sidebar(&mut self, sidebar: SidebarResponse) {
        self.sidebar = sidebar;
    }

    pub fn sidebar(&self) -> &SidebarResponse {
        &self.sidebar
    }

    pub fn groups(&self) -> &[Thread] {
        &self.sidebar.groups
    }

    pub fn directs(&self) -> &[Thread] {
        &self.sidebar.directs
    }

    pub fn group_count(&self) -> usize {
        self.sidebar.groups.len()
    }

    pub fn direct_count(&self) -> usize {
        self.sidebar.directs.len()
    }

    pub fn groups_open(&self) -> bool {
        self.groups_open
    }

    pub fn directs_open(&self) -> bool {
        self.directs_open
    }

    pub fn toggle_groups(&mut self) {
        self.groups_open = !self.groups_open;
    }

    pub fn toggle_directs(&mut self) {
        self.directs_open = !self.directs_open;
    }

    pub fn phase(&self) -> PanelPhase {
        self.phase
    }

    pub fn active(&self) -> Option<&Thread> {
        self.active.as_ref()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Header title, or the placeholder when nothing is open.
    pub fn header(&self) -> &str {
        match &self.active {
            Some(thread) => &thread.title,
            None => PLACEHOLDER,
        }
    }

    pub fn find_thread(&self, id: &ConversationId) -> Option<&Thread> {
        self.sidebar
            .groups
            .iter()
            .chain(self.sidebar.directs.iter())
            .find(|t| &t.id == id)
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn set_draft(&mut self, text: &str) {
        self.draft = text.to_string();
    }

    /// Open `thread`: the header switches at once, messages clear, and the
    /// returned ticket must accompany the history response.
    pub fn select(&mut self, thread: Thread) -> Ticket {
        self.active = Some(thread);
        self.messages.clear();
        self.phase = PanelPhase::Loading;
        self.sequencer.issue()
    }

    /// Returns whether the history was shown. Failures leave the panel
    /// empty without a message.
    pub fn apply_history(&mut self, ticket: Ticket, result: Result<Vec<Message>, ApiError>) -> bool {
        if !self.sequencer.is_latest(ticket) {
            tracing::debug!(?ticket, "dropping history for a thread no longer open");
            return false;
        }
        self.phase = PanelPhase::Active;
        match result {
            Ok(messages) => {
                self.messages = messages;
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to load conversation history");
                self.messages.clear();
                false
            }
        }
    }

    /// The trimmed draft and its target thread, if there is anything to send.
    pub fn prepare_send(&self) -> Option<(ConversationId, String)> {
        let thread = self.active.as_ref()?;
        let content = self.draft.trim();
        if content.is_empty() {
            return None;
        }
        Some((thread.id.clone(), content.to_string()))
    }

    /// Append the backend's echo of a sent message. The draft is cleared
    /// only when the message is shown in the thread it was sent to.
    pub fn confirm_sent(&mut self, conversation: &ConversationId, message: Option<Message>) -> bool {
        let still_open = self.active.as_ref().is_some_and(|t| &t.id == conversation);
        match message {
            Some(message) if still_open => {
                self.messages.push(message);
                self.draft.clear();
                true
            }
            _ => false,
        }
    }

    /// Whether `message` was written by the signed-in user.
    pub fn is_self(&self, message: &Message) -> bool {
        self.sidebar
            .me
            .as_ref()
            .and_then(|me| text_field(me, "id"))
            .is_some_and(|id| id == message.sender.id)
    }
}
