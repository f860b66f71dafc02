//! Sequencing for asynchronous bank lookups.
//!
//! Every IBAN edit issues a new ticket. A lookup result is only applied when
//! its ticket is still the latest one, so a slow response for an earlier
//! IBAN can never overwrite the bank line of the current one.

use serde::{Deserialize, Serialize};

/// Identifies one lookup request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LookupTicket(u64);

#[derive(Debug, Default)]
pub struct LookupSequence {
    latest: u64,
}

impl LookupSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new request, invalidating all earlier tickets.
    pub fn issue(&mut self) -> LookupTicket {
        self.latest += 1;
        LookupTicket(self.latest)
    }

    /// Invalidate outstanding tickets without starting a request, e.g. when
    /// the IBAN was cleared.
    pub fn cancel(&mut self) {
        self.latest += 1;
    }

    pub fn is_current(&self, ticket: LookupTicket) -> bool {
        ticket.0 == self.latest
    }
}
