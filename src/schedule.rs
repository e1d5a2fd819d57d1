//! Trailing-edge debounce with a re-entrancy guard
//!
//! Every trigger hands out a ticket; after the window elapses the driver
//! presents the ticket to [`Debouncer::begin`], which only admits the newest
//! one. While a run is in flight further triggers are folded into a single
//! rerun reported by [`Debouncer::finish`].

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

#[derive(Debug)]
pub struct Debouncer {
    window_ms: u32,
    generation: u64,
    busy: bool,
    rerun: bool,
}

impl Debouncer {
    pub fn new(window_ms: u32) -> Self {
        Debouncer {
            window_ms,
            generation: 0,
            busy: false,
            rerun: false,
        }
    }

    pub fn window_ms(&self) -> u32 {
        self.window_ms
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn trigger(&mut self) -> Ticket {
        self.generation += 1;
        if self.busy {
            self.rerun = true;
        }
        Ticket(self.generation)
    }

    /// Admit `ticket` if no newer trigger arrived and nothing is running
    pub fn begin(&mut self, ticket: Ticket) -> bool {
        if ticket.0 != self.generation {
            return false;
        }
        if self.busy {
            self.rerun = true;
            return false;
        }
        self.busy = true;
        true
    }

    /// End the current run. True when triggers were coalesced meanwhile and
    /// the caller should trigger once more.
    pub fn finish(&mut self) -> bool {
        self.busy = false;
        std::mem::take(&mut self.rerun)
    }
}
