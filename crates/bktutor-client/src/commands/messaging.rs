//! Messaging panel operations of the home page.

use tracing::{debug, warn};

use bktutor_shared::types::ConversationId;

use crate::commands::home::StudentHome;
use crate::error::ApiError;
use crate::events::Step;

impl StudentHome {
    /// Open a thread from the sidebar and load its history. History
    /// failures leave the panel empty without a message.
    pub async fn open_conversation(&mut self, id: &ConversationId) -> Step {
        let Some(thread) = self.state.panel.find_thread(id).cloned() else {
            warn!(conversation = %id, "thread not in sidebar");
            return Step::Stay;
        };
        let ticket = self.state.panel.select(thread);
        let result = self.api.conversation_messages(id).await;
        if self.state.panel.apply_history(ticket, result) {
            debug!(
                conversation = %id,
                messages = self.state.panel.messages().len(),
                "conversation opened"
            );
        }
        Step::Stay
    }

    pub fn set_draft(&mut self, text: &str) {
        self.state.panel.set_draft(text);
    }

    pub fn toggle_groups(&mut self) {
        self.state.panel.toggle_groups();
    }

    pub fn toggle_directs(&mut self) {
        self.state.panel.toggle_directs();
    }

    /// Send the draft to the open thread. The message is appended, and the
    /// draft cleared, only once the backend echoes it back.
    pub async fn send_message(&mut self) -> Step {
        let Some((conversation, content)) = self.state.panel.prepare_send() else {
            return Step::Stay;
        };
        match self.api.send_message(&conversation, &content).await {
            Ok(echo) => {
                if !self.state.panel.confirm_sent(&conversation, echo) {
                    debug!(conversation = %conversation, "send not confirmed");
                }
                Step::Stay
            }
            Err(ApiError::Unauthorized) => self.discard(),
            Err(e) => {
                warn!(conversation = %conversation, error = %e, "failed to send message");
                Step::Stay
            }
        }
    }
}
