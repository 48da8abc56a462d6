//! Monotonic request numbering.
//!
//! Every fetch whose result replaces shared state takes a [`Ticket`] first.
//! When the response arrives it is applied only if no newer ticket has been
//! issued in the meantime, so a slow early response cannot overwrite a
//! fast later one.

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

#[derive(Debug, Default)]
pub struct RequestSequencer {
    latest: u64,
}

impl RequestSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&mut self) -> Ticket {
        self.latest += 1;
        Ticket(self.latest)
    }

    pub fn is_latest(&self, ticket: Ticket) -> bool {
        ticket.0 == self.latest
    }
}
