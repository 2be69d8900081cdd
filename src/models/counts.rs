use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign};

// ---------------------------------------------------------------------------
// DeckCounts — Due counts supplied by the scheduler for one deck
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckCounts {
    pub new: u32,
    pub lrn: u32,
    pub rev: u32,
}

impl DeckCounts {
    pub const fn new(new: u32, lrn: u32, rev: u32) -> Self {
        Self { new, lrn, rev }
    }

    /// Sum of the three counters, saturating at `u32::MAX`.
    pub fn total(&self) -> u32 {
        self.new.saturating_add(self.lrn).saturating_add(self.rev)
    }
}

impl Add for DeckCounts {
    type Output = DeckCounts;

    fn add(self, rhs: DeckCounts) -> DeckCounts {
        DeckCounts {
            new: self.new.saturating_add(rhs.new),
            lrn: self.lrn.saturating_add(rhs.lrn),
            rev: self.rev.saturating_add(rhs.rev),
        }
    }
}

impl AddAssign for DeckCounts {
    fn add_assign(&mut self, rhs: DeckCounts) {
        *self = *self + rhs;
    }
}
