//! Reconciles a registry fetch with the stored dataset.
//!
//! Registry data owns `title`, `date` and `url`. Everything else on an action
//! (status, challenges, curated extras) belongs to the stored record and is
//! carried across. Stored actions the registry no longer returns are kept.

use crate::types::Action;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergeOutcome {
    /// Merged actions, newest publication date first.
    pub actions: Vec<Action>,
    /// Keys of fresh actions that were not in the stored dataset.
    pub added: Vec<String>,
    /// Stored actions kept although the fetch did not return them.
    pub retained: usize,
    /// Whether `actions` differs from the stored list in content or order.
    pub changed: bool,
}

pub fn merge_actions(fresh: Vec<Action>, existing: Vec<Action>) -> MergeOutcome {
    let stored_order: Vec<String> = existing.iter().map(Action::key).collect();
    let mut lookup: HashMap<String, &Action> = HashMap::with_capacity(existing.len());
    for (key, action) in stored_order.iter().zip(&existing) {
        // Duplicate stored ids: the first one is the record that survives.
        lookup.entry(key.clone()).or_insert(action);
    }
    let mut changed = false;

    let mut merged = Vec::with_capacity(fresh.len() + existing.len());
    let mut seen: HashSet<String> = HashSet::new();
    let mut added = Vec::new();

    for mut action in fresh {
        let key = action.key();
        if !seen.insert(key.clone()) {
            tracing::debug!(id = %key, "duplicate id in fetch, keeping first");
            continue;
        }
        match lookup.get(&key) {
            Some(stored) => {
                action.carry_curated(stored);
                changed |= action != **stored;
            }
            None => {
                changed = true;
                added.push(key);
            }
        }
        merged.push(action);
    }

    let mut retained = 0;
    for action in existing {
        if seen.insert(action.key()) {
            retained += 1;
            merged.push(action);
        }
    }

    sort_newest_first(&mut merged);
    changed |= !merged.iter().map(Action::key).eq(stored_order);

    MergeOutcome {
        actions: merged,
        added,
        retained,
        changed,
    }
}

/// Stable sort by publication date, descending. Ties keep insertion order.
pub fn sort_newest_first(actions: &mut [Action]) {
    actions.sort_by(|a, b| b.date.cmp(&a.date));
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
