//! Shared fixtures for the deck-tree integration tests.
//!
//! Provides small hand-built forests matching the situations the deck list
//! has to handle, plus a seeded random forest generator for property tests.

#![allow(dead_code)]

use deck_tree::{CaseLocale, DeckForest, DeckSpec, DeckTree, DeckTreeNode, InMemoryCollection};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;

/// Deck tree with a fixed locale, so tests do not depend on the environment.
pub fn tree() -> DeckTree {
    DeckTree::builder().locale(CaseLocale::Root).build()
}

pub fn ids(rows: &[Arc<DeckTreeNode>]) -> Vec<i64> {
    rows.iter().map(|n| n.id()).collect()
}

/// Default (id 1, empty) next to `B` (id 2) with subdeck `B::C` (id 3).
pub fn empty_default_forest() -> DeckForest {
    DeckForest::new(vec![
        DeckSpec::new(1, "Default"),
        DeckSpec::new(2, "B").with_child(DeckSpec::new(3, "B::C")),
    ])
    .unwrap()
}

/// A small realistic collection:
///
/// ```text
/// Default                (1)
/// Chanson                (10)  5/1/20
///   Chanson::Math HW     (4)   2/0/8
///     Chanson::Math HW::Theory (5) 1/0/3
///   Chanson::Poetry      (6)   0/1/4
/// Languages              (20)  7/2/30
///   Languages::French    (21)  3/1/10
///   Languages::German    (22)  4/1/20
/// Review (filtered)      (30)  no counts
/// ```
pub fn sample_forest() -> DeckForest {
    DeckForest::new(vec![
        DeckSpec::new(1, "Default"),
        DeckSpec::new(10, "Chanson")
            .with_counts(5, 1, 20)
            .with_child(
                DeckSpec::new(4, "Chanson::Math HW")
                    .with_counts(2, 0, 8)
                    .with_child(DeckSpec::new(5, "Chanson::Math HW::Theory").with_counts(1, 0, 3)),
            )
            .with_child(DeckSpec::new(6, "Chanson::Poetry").with_counts(0, 1, 4)),
        DeckSpec::new(20, "Languages")
            .with_counts(7, 2, 30)
            .with_child(DeckSpec::new(21, "Languages::French").with_counts(3, 1, 10))
            .with_child(DeckSpec::new(22, "Languages::German").with_counts(4, 1, 20)),
        DeckSpec::new(30, "Review").dynamic(),
    ])
    .unwrap()
}

pub fn sample_collection() -> InMemoryCollection {
    InMemoryCollection::from_forest(&sample_forest())
}

// ---------------------------------------------------------------------------
// Random forests
// ---------------------------------------------------------------------------

/// Random forest with unique ids starting at 1, so the first root is always
/// the default deck. Returns the forest and a collection consistent with its
/// shape, with roughly a third of decks collapsed.
pub fn random_forest(seed: u64) -> (DeckForest, InMemoryCollection) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut next_id = 1;
    let roots = rng.gen_range(1..5);
    let specs: Vec<DeckSpec> = (0..roots)
        .map(|_| random_spec(&mut rng, &mut next_id, "", 0))
        .collect();
    let forest = DeckForest::new(specs).unwrap();

    let mut collection = InMemoryCollection::from_forest(&forest);
    for node in forest.iter() {
        if rng.gen_bool(0.35) {
            collection = collection.with_collapsed(node.id(), true);
        }
    }
    let default_has_cards = rng.gen_bool(0.5);
    collection = collection.with_cards(1, default_has_cards);
    (forest, collection)
}

const WORDS: [&str; 8] = ["Math", "French", "Verbs", "Theory", "Kanji", "Art", "Ärzte", "Istanbul"];

fn random_spec(rng: &mut StdRng, next_id: &mut i64, prefix: &str, depth: usize) -> DeckSpec {
    let id = *next_id;
    *next_id += 1;
    let word = WORDS[rng.gen_range(0..WORDS.len())];
    let name = if prefix.is_empty() {
        format!("{word}{id}")
    } else {
        format!("{prefix}::{word}{id}")
    };
    let mut spec = DeckSpec::new(id, name.clone());
    if rng.gen_bool(0.8) {
        spec = spec.with_counts(rng.gen_range(0..20), rng.gen_range(0..5), rng.gen_range(0..50));
    }
    let children = if depth < 3 { rng.gen_range(0..4) } else { 0 };
    for _ in 0..children {
        spec = spec.with_child(random_spec(rng, next_id, &name, depth + 1));
    }
    spec
}
