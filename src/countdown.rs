use std::fmt;

use serde::Serialize;

use crate::{MS_PER_DAY, MS_PER_HOUR, MS_PER_MINUTE};

/// Lifecycle of a proposal as seen from the board. Transitions are observed
/// from contract reads and the clock, never driven from here.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum ProposalPhase {
    /// Not executed, fundraising window still open.
    Active,
    /// Not executed, window elapsed.
    ExpiredUnexecuted,
    /// Funds withdrawn. Terminal state.
    Executed,
}

impl ProposalPhase {
    pub fn derive(executed: bool, deadline_ms: u64, now_ms: u64) -> Self {
        if executed {
            ProposalPhase::Executed
        } else if now_ms < deadline_ms {
            ProposalPhase::Active
        } else {
            ProposalPhase::ExpiredUnexecuted
        }
    }
}

/// Time left until a deadline, floored at zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Countdown {
    pub days: u64,
    pub hours: u64,
    pub minutes: u64,
}

impl Countdown {
    pub fn until(deadline_ms: u64, now_ms: u64) -> Self {
        let remaining = deadline_ms.saturating_sub(now_ms);
        Countdown {
            days: remaining / MS_PER_DAY,
            hours: (remaining % MS_PER_DAY) / MS_PER_HOUR,
            minutes: (remaining % MS_PER_HOUR) / MS_PER_MINUTE,
        }
    }

    /// Countdown for a proposal created at `creation_time_ms` with a
    /// fundraising window of `window_ms`.
    pub fn for_proposal(creation_time_ms: u64, window_ms: u64, now_ms: u64) -> Self {
        Self::until(deadline_ms(creation_time_ms, window_ms), now_ms)
    }

    pub fn is_expired(&self) -> bool {
        *self == Countdown::default()
    }
}

impl fmt::Display for Countdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}d {}h {}m", self.days, self.hours, self.minutes)
    }
}

pub fn deadline_ms(creation_time_ms: u64, window_ms: u64) -> u64 {
    creation_time_ms.saturating_add(window_ms)
}
