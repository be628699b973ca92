//! # Pending-Edit Ledger
//!
//! Tracks proposed edits against the last server-confirmed values.
//!
//! Three maps are kept per id:
//!
//! - `baseline`: what the server last confirmed.
//! - `pending`: proposed values that differ from `baseline`. An entry exists iff the
//!   proposed value differs, so typing a value back to the baseline removes it.
//! - `displayed`: what a view renders, i.e. `baseline` overlaid with `pending`.
//!
//! Every operation keeps `displayed == baseline ⊕ pending`, which is why discarding
//! resets `displayed` in the same step.

use crate::resource::Change;
use std::collections::BTreeMap;

/// In-memory ledger of pending edits.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingLedger<K: Ord, V> {
    baseline: BTreeMap<K, V>,
    pending: BTreeMap<K, V>,
    displayed: BTreeMap<K, V>,
}

impl<K: Ord, V> Default for PendingLedger<K, V> {
    fn default() -> Self {
        Self {
            baseline: BTreeMap::new(),
            pending: BTreeMap::new(),
            displayed: BTreeMap::new(),
        }
    }
}

impl<K, V> PendingLedger<K, V>
where
    K: Ord + Clone,
    V: PartialEq + Clone,
{
    /// Creates a clean ledger seeded with server values.
    pub fn new(baseline: impl IntoIterator<Item = (K, V)>) -> Self {
        let baseline: BTreeMap<K, V> = baseline.into_iter().collect();
        Self {
            displayed: baseline.clone(),
            baseline,
            pending: BTreeMap::new(),
        }
    }

    /// Records a proposed value. Returns `true` if `id` is pending afterwards.
    pub fn set_value(&mut self, id: K, value: V) -> bool {
        self.displayed.insert(id.clone(), value.clone());
        if self.baseline.get(&id) == Some(&value) {
            self.pending.remove(&id);
            false
        } else {
            self.pending.insert(id, value);
            true
        }
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Drops every pending edit and resets `displayed` to `baseline`.
    pub fn discard_all(&mut self) -> usize {
        let dropped = self.pending.len();
        self.pending.clear();
        self.displayed = self.baseline.clone();
        dropped
    }

    /// Serializes pending edits in ledger order.
    pub fn pending_batch(&self) -> Vec<Change<K, V>> {
        self.pending
            .iter()
            .map(|(id, value)| Change::new(id.clone(), value.clone()))
            .collect()
    }

    /// Folds server-confirmed changes into the baseline.
    ///
    /// `displayed` is left alone: whatever the user typed while the batch was in flight
    /// (including a value equal to the old baseline) stays on screen, and is pending iff it
    /// differs from the newly confirmed value.
    pub fn confirm<'a, I>(&mut self, confirmed: I)
    where
        I: IntoIterator<Item = &'a Change<K, V>>,
        K: 'a,
        V: 'a,
    {
        for change in confirmed {
            self.baseline
                .insert(change.id.clone(), change.value.clone());
            match self.displayed.get(&change.id) {
                Some(shown) if *shown != change.value => {
                    let shown = shown.clone();
                    self.pending.insert(change.id.clone(), shown);
                }
                _ => {
                    self.pending.remove(&change.id);
                    self.displayed
                        .insert(change.id.clone(), change.value.clone());
                }
            }
        }
    }

    /// Accepts a fresh server baseline.
    ///
    /// With nothing pending, `displayed` becomes the new baseline. Otherwise pending edits
    /// survive (unless the server now agrees with them) so a background refresh never
    /// clobbers an unsaved edit.
    pub fn reseed(&mut self, fresh: impl IntoIterator<Item = (K, V)>) {
        self.baseline = fresh.into_iter().collect();
        if self.pending.is_empty() {
            self.displayed = self.baseline.clone();
            return;
        }

        let baseline = &self.baseline;
        self.pending
            .retain(|id, value| baseline.get(id) != Some(&*value));
        self.displayed = self.baseline.clone();
        for (id, value) in &self.pending {
            self.displayed.insert(id.clone(), value.clone());
        }
    }

    pub fn baseline(&self) -> &BTreeMap<K, V> {
        &self.baseline
    }

    pub fn pending(&self) -> &BTreeMap<K, V> {
        &self.pending
    }

    pub fn displayed(&self) -> &BTreeMap<K, V> {
        &self.displayed
    }

    pub fn displayed_value(&self, id: &K) -> Option<&V> {
        self.displayed.get(id)
    }

    pub fn is_pending(&self, id: &K) -> bool {
        self.pending.contains_key(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ledger() -> PendingLedger<u32, u32> {
        PendingLedger::new([(3, 1), (5, 9), (7, 4)])
    }

    /// `pending` holds exactly the ids whose displayed value differs from the baseline.
    fn assert_diff_consistent(ledger: &PendingLedger<u32, u32>) {
        for (id, shown) in ledger.displayed() {
            let differs = ledger.baseline().get(id) != Some(shown);
            assert_eq!(ledger.is_pending(id), differs, "id {id}");
        }
        for id in ledger.pending().keys() {
            assert!(ledger.displayed().contains_key(id));
        }
    }

    #[test]
    fn test_set_value_tracks_diff() {
        let mut ledger = ledger();
        assert!(ledger.set_value(3, 5));
        assert!(!ledger.set_value(5, 9));
        assert!(ledger.set_value(7, 0));
        assert!(ledger.set_value(7, 2));

        assert_eq!(ledger.pending().len(), 2);
        assert_eq!(ledger.displayed_value(&7), Some(&2));
        assert_diff_consistent(&ledger);
    }

    #[test]
    fn test_revert_removes_entry() {
        let mut ledger = ledger();
        ledger.set_value(5, 12);
        assert!(ledger.has_pending());

        ledger.set_value(5, 9);
        assert!(!ledger.has_pending());
        assert!(!ledger.pending().contains_key(&5));
        assert_eq!(ledger.displayed_value(&5), Some(&9));
    }

    #[test]
    fn test_unknown_id_is_pending() {
        let mut ledger = ledger();
        assert!(ledger.set_value(42, 0));
        assert_diff_consistent(&ledger);
    }

    #[test]
    fn test_discard_resets_displayed() {
        let mut ledger = ledger();
        ledger.set_value(3, 8);
        ledger.set_value(42, 1);

        assert_eq!(ledger.discard_all(), 2);
        assert!(!ledger.has_pending());
        assert_eq!(ledger.displayed(), ledger.baseline());
    }

    #[test]
    fn test_pending_batch_uses_ledger_order() {
        let mut ledger = ledger();
        ledger.set_value(7, 2);
        ledger.set_value(3, 5);

        let batch = ledger.pending_batch();
        assert_eq!(batch, vec![Change::new(3, 5), Change::new(7, 2)]);
    }

    #[test]
    fn test_confirm_clears_committed_entries() {
        let mut ledger = ledger();
        ledger.set_value(3, 5);
        ledger.set_value(7, 2);
        let batch = ledger.pending_batch();

        ledger.confirm(&batch);

        assert!(!ledger.has_pending());
        assert_eq!(ledger.displayed(), ledger.baseline());
        assert_eq!(ledger.baseline().get(&3), Some(&5));
        assert_eq!(ledger.baseline().get(&5), Some(&9));
    }

    #[test]
    fn test_confirm_keeps_edits_made_in_flight() {
        let mut ledger = ledger();
        ledger.set_value(3, 5);
        let batch = ledger.pending_batch();

        // typed again while the batch was outstanding
        ledger.set_value(3, 6);
        ledger.confirm(&batch);

        assert_eq!(ledger.baseline().get(&3), Some(&5));
        assert_eq!(ledger.pending().get(&3), Some(&6));
        assert_eq!(ledger.displayed_value(&3), Some(&6));
        assert_diff_consistent(&ledger);
    }

    #[test]
    fn test_confirm_keeps_in_flight_revert_to_old_baseline() {
        let mut ledger = ledger();
        ledger.set_value(5, 12);
        let batch = ledger.pending_batch();

        // typed back to the old server value while the batch was outstanding
        assert!(!ledger.set_value(5, 9));
        ledger.confirm(&batch);

        assert_eq!(ledger.baseline().get(&5), Some(&12));
        assert_eq!(ledger.pending().get(&5), Some(&9));
        assert_eq!(ledger.displayed_value(&5), Some(&9));
        assert_diff_consistent(&ledger);
    }

    #[test]
    fn test_reseed_without_pending_replaces_everything() {
        let mut ledger = ledger();
        ledger.reseed([(3, 2), (9, 9)]);

        assert_eq!(ledger.displayed(), ledger.baseline());
        assert!(!ledger.displayed().contains_key(&5));
    }

    #[test]
    fn test_reseed_does_not_clobber_pending() {
        let mut ledger = PendingLedger::new([(5, 3)]);
        ledger.set_value(5, 12);

        ledger.reseed([(5, 9)]);

        assert_eq!(ledger.displayed_value(&5), Some(&12));
        assert_eq!(ledger.pending().get(&5), Some(&12));
        assert_eq!(ledger.baseline().get(&5), Some(&9));
    }

    #[test]
    fn test_reseed_drops_pending_the_server_agrees_with() {
        let mut ledger = ledger();
        ledger.set_value(3, 5);
        ledger.set_value(7, 2);

        ledger.reseed([(3, 5), (5, 9), (7, 4)]);

        assert!(!ledger.is_pending(&3));
        assert!(ledger.is_pending(&7));
        assert_diff_consistent(&ledger);
    }
}
