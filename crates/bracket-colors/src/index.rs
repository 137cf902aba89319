//! Bracket nesting index.
//!
//! A [`BracketIndex`] maps the position of every opening bracket of one kind to the distance to
//! its matched closing bracket and to its nesting depth ("order"). Entries are kept in a
//! `BTreeMap` so iteration is always in ascending position order, which is what the order pass
//! relies on.

use std::collections::{BTreeMap, BTreeSet};

/// Integer encoding of an undefined length or order, for hosts that exchange plain integers.
pub const UNDEFINED: isize = -1;

/// One tracked opening bracket.
///
/// `None` in either field is the undefined state: an opener without a discovered match has no
/// length, and an entry without a length has no order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BracketEntry {
    /// Distance from the opening to the matched closing bracket.
    pub length: Option<usize>,
    /// Nesting depth among brackets of the same kind (outermost = 0).
    ///
    /// Stale between [`BracketIndex::update`] and the next [`BracketIndex::recompute_order`].
    pub order: Option<usize>,
}

impl BracketEntry {
    /// Create an entry with a fresh (not yet computed) order.
    pub fn new(length: Option<usize>) -> Self {
        Self {
            length,
            order: None,
        }
    }

    /// Position of the closing bracket, for an entry keyed at `start`.
    pub fn end(&self, start: usize) -> Option<usize> {
        self.length.map(|length| start + length)
    }

    /// `length` with `None` encoded as [`UNDEFINED`].
    pub fn raw_length(&self) -> isize {
        encode(self.length)
    }

    /// `order` with `None` encoded as [`UNDEFINED`].
    pub fn raw_order(&self) -> isize {
        encode(self.order)
    }
}

fn encode(value: Option<usize>) -> isize {
    value
        .and_then(|v| isize::try_from(v).ok())
        .unwrap_or(UNDEFINED)
}

/// Opening-bracket positions of one bracket kind, with match length and nesting order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BracketIndex {
    entries: BTreeMap<usize, BracketEntry>,
}

impl BracketIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry, or overwrite the length of the entry at `start`.
    ///
    /// The order is left untouched; it is refreshed by [`BracketIndex::recompute_order`].
    pub fn update(&mut self, start: usize, length: Option<usize>) {
        self.entries
            .entry(start)
            .and_modify(|entry| entry.length = length)
            .or_insert_with(|| BracketEntry::new(length));
    }

    /// Recompute the nesting order of every entry.
    ///
    /// Single ascending pass with a stack of closing positions: before pushing an entry, every
    /// stacked interval that already closed before it starts is popped, so the stack depth is
    /// the number of open enclosing brackets. Entries with an undefined length get an undefined
    /// order and never touch the stack.
    ///
    /// Overlapping but non-nesting intervals are not detected; they produce a deterministic order
    /// without further validation.
    ///
    /// Returns the positions of matched entries whose order changed. An entry that lost its
    /// match is not reported; whoever cleared its length queues its repaint.
    pub fn recompute_order(&mut self) -> BTreeSet<usize> {
        let mut open_ends: Vec<usize> = Vec::new();
        let mut changed = BTreeSet::new();

        for (&start, entry) in &mut self.entries {
            let Some(length) = entry.length else {
                entry.order = None;
                continue;
            };

            while open_ends.last().is_some_and(|&end| end < start) {
                open_ends.pop();
            }
            open_ends.push(start + length);

            let new_order = Some(open_ends.len() - 1);
            if new_order != entry.order {
                changed.insert(start);
                entry.order = new_order;
            }
        }

        changed
    }

    /// Look up the entry at `start`.
    pub fn get(&self, start: usize) -> Option<&BracketEntry> {
        self.entries.get(&start)
    }

    /// Returns `true` if there is an entry at `start`.
    pub fn contains(&self, start: usize) -> bool {
        self.entries.contains_key(&start)
    }

    /// Remove the entry at `start`, returning it. No-op if absent.
    pub fn remove(&mut self, start: usize) -> Option<BracketEntry> {
        self.entries.remove(&start)
    }

    /// Re-key an entry, keeping its value. No-op if `from` is absent.
    pub(crate) fn rekey(&mut self, from: usize, to: usize) {
        if let Some(entry) = self.entries.remove(&from) {
            self.entries.insert(to, entry);
        }
    }

    /// All entries, ascending by position.
    pub fn entries(&self) -> impl Iterator<Item = (usize, &BracketEntry)> + '_ {
        self.entries.iter().map(|(&start, entry)| (start, entry))
    }

    /// All entry positions, ascending.
    pub fn keys(&self) -> impl Iterator<Item = usize> + '_ {
        self.entries.keys().copied()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the index has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn orders(index: &BracketIndex) -> Vec<(usize, Option<usize>)> {
        index.entries().map(|(start, e)| (start, e.order)).collect()
    }

    #[test]
    fn test_nested_orders() {
        // (()())
        let mut index = BracketIndex::new();
        index.update(0, Some(5));
        index.update(1, Some(1));
        index.update(3, Some(1));

        let changed = index.recompute_order();
        assert_eq!(changed, BTreeSet::from([0, 1, 3]));
        assert_eq!(
            orders(&index),
            vec![(0, Some(0)), (1, Some(1)), (3, Some(1))]
        );
    }

    #[test]
    fn test_siblings_share_order() {
        let mut index = BracketIndex::new();
        index.update(0, Some(1));
        index.update(5, Some(1));
        index.recompute_order();
        assert_eq!(orders(&index), vec![(0, Some(0)), (5, Some(0))]);
    }

    #[test]
    fn test_deep_nesting_then_return_to_top() {
        // ((( )))( )
        let mut index = BracketIndex::new();
        index.update(0, Some(6));
        index.update(1, Some(4));
        index.update(2, Some(2));
        index.update(7, Some(2));
        index.recompute_order();
        assert_eq!(
            orders(&index),
            vec![(0, Some(0)), (1, Some(1)), (2, Some(2)), (7, Some(0))]
        );
    }

    #[test]
    fn test_undefined_length_never_touches_stack() {
        // ( ( ) with the outer opener unmatched
        let mut index = BracketIndex::new();
        index.update(0, None);
        index.update(2, Some(2));
        index.update(6, None);
        index.update(8, Some(1));
        let changed = index.recompute_order();

        assert_eq!(changed, BTreeSet::from([2, 8]));
        assert_eq!(
            orders(&index),
            vec![(0, None), (2, Some(0)), (6, None), (8, Some(0))]
        );
        assert_eq!(index.get(0).unwrap().raw_order(), UNDEFINED);
        assert_eq!(index.get(0).unwrap().raw_length(), UNDEFINED);
    }

    #[test]
    fn test_recompute_is_idempotent() {
        let mut index = BracketIndex::new();
        index.update(0, Some(5));
        index.update(1, Some(1));
        assert!(!index.recompute_order().is_empty());
        assert!(index.recompute_order().is_empty());
    }

    #[test]
    fn test_length_change_reorders() {
        let mut index = BracketIndex::new();
        index.update(0, Some(1));
        index.update(3, Some(1));
        index.recompute_order();

        // The first bracket now encloses the second.
        index.update(0, Some(6));
        let changed = index.recompute_order();
        assert_eq!(changed, BTreeSet::from([3]));
        assert_eq!(index.get(3).unwrap().order, Some(1));

        // And now it's unmatched: only the bracket it used to enclose is reported.
        index.update(0, None);
        let changed = index.recompute_order();
        assert_eq!(changed, BTreeSet::from([3]));
        assert_eq!(index.get(0).unwrap().order, None);
        assert_eq!(index.get(3).unwrap().order, Some(0));
    }

    #[test]
    fn test_losing_a_match_is_not_an_order_change() {
        let mut index = BracketIndex::new();
        index.update(0, Some(1));
        index.recompute_order();

        index.update(0, None);
        assert!(index.recompute_order().is_empty());
        assert_eq!(index.get(0).unwrap().raw_order(), UNDEFINED);
    }

    #[test]
    fn test_update_keeps_order_until_recompute() {
        let mut index = BracketIndex::new();
        index.update(4, Some(2));
        index.recompute_order();
        index.update(4, None);
        assert_eq!(index.get(4).unwrap().order, Some(0));
        assert_eq!(index.get(4).unwrap().length, None);
    }

    #[test]
    fn test_overlapping_brackets_do_not_panic() {
        // [0, 4] and [2, 6] overlap without nesting. Only the top of the stack is checked, so
        // the closed [0, 4] stays buried under [2, 6].
        let mut index = BracketIndex::new();
        index.update(0, Some(4));
        index.update(2, Some(4));
        index.update(5, Some(3));
        index.recompute_order();
        assert_eq!(
            orders(&index),
            vec![(0, Some(0)), (2, Some(1)), (5, Some(2))]
        );
    }

    #[test]
    fn test_remove_and_rekey() {
        let mut index = BracketIndex::new();
        index.update(2, Some(3));
        index.rekey(2, 12);
        assert!(!index.contains(2));
        assert_eq!(index.get(12).unwrap().length, Some(3));

        assert!(index.remove(12).is_some());
        assert!(index.remove(12).is_none());
        assert!(index.is_empty());
    }
}
