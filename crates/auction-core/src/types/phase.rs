//! Auction phase tracking
//!
//! Phase is never stored. It is derived on every call from the current time,
//! the stored cycle window and the bootstrap flag.

#[cfg(feature = "client")]
use serde::{Deserialize, Serialize};

use crate::constants::{STATUS_ACTIVE, STATUS_ENDED, STATUS_REPORTED_OFFSET, STATUS_UNSTARTED};
use crate::types::cycle::Cycle;

/// Lifecycle phase of the current cycle
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "client", derive(Serialize, Deserialize))]
pub enum AuctionPhase {
    /// No cycle yet, or the bootstrap window has not opened
    #[default]
    DormantUnstarted,

    /// Inside the current cycle's window
    Active,

    /// Between windows: the last one closed or the next one has not opened
    DormantEnded,
}

impl AuctionPhase {
    /// Check if phase allows trading
    pub fn allows_trading(&self) -> bool {
        matches!(self, AuctionPhase::Active)
    }

    pub fn is_dormant(&self) -> bool {
        !self.allows_trading()
    }

    pub fn has_started(&self) -> bool {
        !matches!(self, AuctionPhase::DormantUnstarted)
    }
}

/// Derived phase plus the bootstrap flag it was observed with
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "client", derive(Serialize, Deserialize))]
pub struct PhaseStatus {
    pub phase: AuctionPhase,
    pub bootstrap: bool,
}

impl PhaseStatus {
    /// Derive the phase for `now`. Pure function of its inputs.
    pub fn derive(now: i64, cycle: Option<&Cycle>, bootstrap: bool) -> Self {
        let phase = match cycle {
            None => AuctionPhase::DormantUnstarted,
            // Only the wait for the very first window counts as unstarted
            Some(cycle) if now < cycle.start_time && cycle.is_bootstrap() => AuctionPhase::DormantUnstarted,
            Some(cycle) if now < cycle.start_time => AuctionPhase::DormantEnded,
            Some(cycle) if now < cycle.end_time => AuctionPhase::Active,
            Some(_) => AuctionPhase::DormantEnded,
        };

        Self { phase, bootstrap }
    }

    pub fn is_active(&self) -> bool {
        self.phase.allows_trading()
    }

    /// Status code combining {has started, is active, bootstrap}.
    ///
    /// Bootstrap: 0 unstarted, 2 active, 3 ended.
    /// Reported:  6 active, 7 between windows. 4 is never produced since the
    /// bootstrap flag clears only after the first window closed.
    pub fn code(&self) -> u8 {
        let base = if self.bootstrap { 0 } else { STATUS_REPORTED_OFFSET };
        let offset = match self.phase {
            AuctionPhase::DormantUnstarted => STATUS_UNSTARTED,
            AuctionPhase::Active => STATUS_ACTIVE,
            AuctionPhase::DormantEnded => STATUS_ENDED,
        };
        base + offset
    }
}
