//! Rolled-up due counts for the deck list header.
//!
//! Only top-level visible decks contribute; their counts already include
//! their subdecks, so adding nested decks would count cards twice.

use serde::{Deserialize, Serialize};

use crate::collection::EtaScheduler;
use crate::models::{DeckCounts, DeckTreeNode};

/// Result of the last aggregation pass.
///
/// `NotComputed` and `Computed(DeckCounts::default())` are distinct: the
/// first means no pass has run, the second that nothing is due.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "state", content = "counts")]
pub enum DueTotals {
    #[default]
    NotComputed,
    Computed(DeckCounts),
}

impl DueTotals {
    pub fn counts(&self) -> Option<DeckCounts> {
        match self {
            DueTotals::NotComputed => None,
            DueTotals::Computed(counts) => Some(*counts),
        }
    }

    pub fn is_computed(&self) -> bool {
        matches!(self, DueTotals::Computed(_))
    }
}

/// Accumulates due counts across the top-level decks of a visibility pass.
#[derive(Debug, Clone, Default)]
pub struct CountAggregator {
    totals: DueTotals,
}

impl CountAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new pass. Totals become `Computed` at zero.
    pub fn begin(&mut self) {
        self.totals = DueTotals::Computed(DeckCounts::default());
    }

    /// Forget any previous pass.
    pub fn reset(&mut self) {
        self.totals = DueTotals::NotComputed;
    }

    /// Add a visible node's counts if it is top-level and displays counts.
    ///
    /// Has no effect before [`begin`](Self::begin).
    pub fn add(&mut self, node: &DeckTreeNode) {
        if node.depth() != 0 {
            return;
        }
        if let (DueTotals::Computed(total), Some(counts)) = (&mut self.totals, node.counts()) {
            *total += *counts;
        }
    }

    pub fn totals(&self) -> DueTotals {
        self.totals
    }

    /// new + lrn + rev, or `None` if no pass has run.
    pub fn total_due(&self) -> Option<u32> {
        self.totals.counts().map(|c| c.total())
    }

    /// Scheduler estimate for the accumulated counts, or `None` if no pass
    /// has run.
    pub fn eta<S: EtaScheduler + ?Sized>(&self, scheduler: &S) -> Option<u32> {
        self.totals.counts().map(|c| scheduler.eta(c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DeckForest, DeckSpec};

    fn forest() -> DeckForest {
        DeckForest::new(vec![
            DeckSpec::new(2, "A")
                .with_counts(1, 2, 3)
                .with_child(DeckSpec::new(3, "A::B").with_counts(10, 10, 10)),
            DeckSpec::new(4, "C"),
            DeckSpec::new(5, "D").with_counts(0, 0, 4),
        ])
        .unwrap()
    }

    #[test]
    fn not_computed_before_begin() {
        let mut agg = CountAggregator::new();
        let forest = forest();
        agg.add(&forest.roots()[0]);
        assert_eq!(agg.totals(), DueTotals::NotComputed);
        assert_eq!(agg.total_due(), None);
        assert_eq!(agg.eta(&|c: DeckCounts| c.total()), None);
    }

    #[test]
    fn computed_zero_differs_from_not_computed() {
        let mut agg = CountAggregator::new();
        agg.begin();
        assert_eq!(agg.totals(), DueTotals::Computed(DeckCounts::default()));
        assert_eq!(agg.total_due(), Some(0));
    }

    #[test]
    fn sums_top_level_nodes_with_counts_only() {
        let mut agg = CountAggregator::new();
        agg.begin();
        for node in forest().iter() {
            agg.add(node);
        }
        assert_eq!(agg.totals().counts(), Some(DeckCounts::new(1, 2, 7)));
        assert_eq!(agg.total_due(), Some(10));
    }

    #[test]
    fn eta_delegates_accumulated_counts() {
        let mut agg = CountAggregator::new();
        agg.begin();
        for node in forest().roots() {
            agg.add(node);
        }
        let minutes = agg.eta(&|c: DeckCounts| c.new * 100 + c.lrn * 10 + c.rev);
        assert_eq!(minutes, Some(127));
    }

    #[test]
    fn reset_returns_to_not_computed() {
        let mut agg = CountAggregator::new();
        agg.begin();
        agg.reset();
        assert!(!agg.totals().is_computed());
    }
}
