//! Keeping a [`BracketIndex`] consistent while the document is edited.
//!
//! Entries are keyed by absolute position, so every insertion or deletion in front of an entry
//! moves its key. Entries whose span an edit touches keep their key but are queued for a rescan,
//! because their match may have changed. Nothing here reads the document beyond the characters
//! the caller hands in; the rescans themselves are done by the driver.

use crate::index::BracketIndex;
use crate::kind::BracketKind;
use crate::queues::WorkQueues;

/// Applies document edits to the index of one bracket kind.
#[derive(Debug)]
pub struct EditSync<'a> {
    kind: BracketKind,
    index: &'a mut BracketIndex,
    queues: &'a mut WorkQueues,
}

impl<'a> EditSync<'a> {
    /// Borrow `index` (tracking `kind`) and the document's queues for one edit.
    pub fn new(kind: BracketKind, index: &'a mut BracketIndex, queues: &'a mut WorkQueues) -> Self {
        Self {
            kind,
            index,
            queues,
        }
    }

    /// `length` characters were inserted at `position`.
    ///
    /// `char_at` reads the post-edit document; it is only asked about the inserted characters.
    /// Returns `true` if the index or the recompute queue changed.
    pub fn on_insert<F>(&mut self, position: usize, length: usize, mut char_at: F) -> bool
    where
        F: FnMut(usize) -> Option<char>,
    {
        if length == 0 {
            return false;
        }

        let mut to_shift = Vec::new();
        let mut to_rescan = Vec::new();
        for (start, entry) in self.index.entries() {
            if start >= position {
                to_shift.push(start);
            } else if entry.end(start).is_none_or(|end| end >= position) {
                to_rescan.push(start);
            }
        }

        let mut new_brackets = Vec::new();
        for p in position..position + length {
            if char_at(p).is_some_and(|ch| self.kind.matches(ch)) {
                self.queues.queue_recompute(p);
                new_brackets.push(p);
            }
        }

        tracing::trace!(
            kind = ?self.kind,
            position,
            length,
            shifted = to_shift.len(),
            rescan = to_rescan.len(),
            new_brackets = new_brackets.len(),
            "insert"
        );

        if to_shift.is_empty() && to_rescan.is_empty() {
            return !new_brackets.is_empty();
        }

        for start in to_rescan {
            self.queues.queue_recompute(start);
        }

        // Highest key first, so a moved entry never lands on a key that has not moved yet.
        for start in to_shift.into_iter().rev() {
            self.index.rekey(start, start + length);
            if !new_brackets.contains(&start) {
                self.queues.remove_from_queues(start);
            }
        }

        true
    }

    /// `length` characters were deleted at `position`.
    ///
    /// Returns `true` if the index or the queues changed.
    pub fn on_delete(&mut self, position: usize, length: usize) -> bool {
        if length == 0 {
            return false;
        }
        let deleted_end = position + length;

        let mut to_remove = Vec::new();
        let mut to_rescan = Vec::new();
        let mut orphaned = Vec::new();
        for (start, entry) in self.index.entries() {
            let end = entry.end(start);
            if (position..deleted_end).contains(&start) {
                to_remove.push(start);
                // The closer survived its opener; it may pair with something else now.
                if let Some(end) = end
                    && end >= deleted_end
                {
                    orphaned.push(end - length);
                }
            } else if start >= position || end.is_none_or(|end| end >= position) {
                to_rescan.push(start);
            }
        }

        tracing::trace!(
            kind = ?self.kind,
            position,
            length,
            removed = to_remove.len(),
            rescan = to_rescan.len(),
            orphaned = orphaned.len(),
            "delete"
        );

        if to_remove.is_empty() && to_rescan.is_empty() {
            return false;
        }

        for start in to_remove {
            self.index.remove(start);
            self.queues.remove_from_queues(start);
        }

        // Lowest key first: every shifted key lands below the keys still waiting to move.
        for start in to_rescan {
            if start >= position {
                let moved = start - length;
                self.index.rekey(start, moved);
                self.queues.remove_from_queues(start);
                self.queues.queue_recompute(moved);
            } else {
                self.queues.queue_recompute(start);
            }
        }

        for closer in orphaned {
            self.queues.queue_recompute(closer);
        }

        true
    }

    /// Highlighting classification changed for `length` characters at `position`.
    ///
    /// Every bracket character of this kind in the range is queued for a rescan, so that
    /// brackets that moved into (or out of) a comment or string are dropped (or picked up).
    /// Returns `true` if anything was queued.
    pub fn on_restyle<F>(&mut self, position: usize, length: usize, mut char_at: F) -> bool
    where
        F: FnMut(usize) -> Option<char>,
    {
        let mut queued = false;
        for p in position..position + length {
            if char_at(p).is_some_and(|ch| self.kind.matches(ch)) {
                self.queues.queue_recompute(p);
                queued = true;
            }
        }
        queued
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeSet;

    fn no_chars(_: usize) -> Option<char> {
        None
    }

    fn lengths(index: &BracketIndex) -> Vec<(usize, Option<usize>)> {
        index.entries().map(|(start, e)| (start, e.length)).collect()
    }

    fn chars_of(text: &str) -> impl FnMut(usize) -> Option<char> + '_ {
        move |p| text.chars().nth(p)
    }

    #[test]
    fn test_insert_before_entry_shifts_it() {
        let mut index = BracketIndex::new();
        let mut queues = WorkQueues::new();
        index.update(2, Some(3));

        let changed = EditSync::new(BracketKind::Paren, &mut index, &mut queues).on_insert(
            0,
            10,
            no_chars,
        );

        assert!(changed);
        assert_eq!(lengths(&index), vec![(12, Some(3))]);
        assert!(queues.recompute.is_empty());
    }

    #[test]
    fn test_insert_inside_span_forces_rescan() {
        let mut index = BracketIndex::new();
        let mut queues = WorkQueues::new();
        index.update(0, Some(10));

        let changed = EditSync::new(BracketKind::Paren, &mut index, &mut queues).on_insert(
            5,
            1,
            no_chars,
        );

        assert!(changed);
        assert_eq!(lengths(&index), vec![(0, Some(10))]);
        assert_eq!(queues.recompute, BTreeSet::from([0]));
    }

    #[test]
    fn test_insert_after_span_is_ignored() {
        let mut index = BracketIndex::new();
        let mut queues = WorkQueues::new();
        index.update(0, Some(3));

        let changed = EditSync::new(BracketKind::Paren, &mut index, &mut queues).on_insert(
            4,
            2,
            no_chars,
        );

        assert!(!changed);
        assert_eq!(lengths(&index), vec![(0, Some(3))]);
        assert!(queues.is_empty());
    }

    #[test]
    fn test_insert_rescans_unmatched_openers() {
        let mut index = BracketIndex::new();
        let mut queues = WorkQueues::new();
        index.update(0, None);

        EditSync::new(BracketKind::Paren, &mut index, &mut queues).on_insert(40, 1, no_chars);

        assert_eq!(queues.recompute, BTreeSet::from([0]));
    }

    #[test]
    fn test_insert_queues_new_brackets_of_own_kind_only() {
        let mut index = BracketIndex::new();
        let mut queues = WorkQueues::new();
        let text = "a(b[c)";

        let changed = EditSync::new(BracketKind::Paren, &mut index, &mut queues).on_insert(
            0,
            6,
            chars_of(text),
        );

        assert!(changed);
        assert!(index.is_empty());
        assert_eq!(queues.recompute, BTreeSet::from([1, 5]));
    }

    #[test]
    fn test_insert_drops_stale_keys_from_queues() {
        let mut index = BracketIndex::new();
        let mut queues = WorkQueues::new();
        index.update(4, Some(1));
        queues.queue_redraw(4);
        queues.queue_recompute(4);

        EditSync::new(BracketKind::Paren, &mut index, &mut queues).on_insert(4, 2, no_chars);

        assert_eq!(lengths(&index), vec![(6, Some(1))]);
        assert!(queues.is_empty());
    }

    #[test]
    fn test_insert_keeps_new_bracket_at_old_key() {
        // "()" becomes "(()": the new opener sits where the old one was.
        let mut index = BracketIndex::new();
        let mut queues = WorkQueues::new();
        index.update(0, Some(1));

        EditSync::new(BracketKind::Paren, &mut index, &mut queues).on_insert(
            0,
            1,
            chars_of("(()"),
        );

        assert_eq!(lengths(&index), vec![(1, Some(1))]);
        assert_eq!(queues.recompute, BTreeSet::from([0]));
    }

    #[test]
    fn test_insert_shifts_adjacent_keys_without_collision() {
        let mut index = BracketIndex::new();
        let mut queues = WorkQueues::new();
        index.update(3, Some(1));
        index.update(4, Some(3));
        index.update(5, Some(1));

        EditSync::new(BracketKind::Brace, &mut index, &mut queues).on_insert(3, 1, no_chars);

        assert_eq!(
            lengths(&index),
            vec![(4, Some(1)), (5, Some(3)), (6, Some(1))]
        );
    }

    #[test]
    fn test_delete_removes_opener_and_purges_queues() {
        let mut index = BracketIndex::new();
        let mut queues = WorkQueues::new();
        index.update(5, Some(3));
        queues.queue_recompute(5);
        queues.queue_redraw(5);

        let changed = EditSync::new(BracketKind::Paren, &mut index, &mut queues).on_delete(5, 1);

        assert!(changed);
        assert!(index.is_empty());
        assert!(!queues.recompute.contains(&5));
        assert!(!queues.redraw.contains(&5));
        // The surviving closer (was 8) is now at 7.
        assert_eq!(queues.recompute, BTreeSet::from([7]));
    }

    #[test]
    fn test_delete_before_entry_shifts_and_queues_new_key() {
        let mut index = BracketIndex::new();
        let mut queues = WorkQueues::new();
        index.update(20, Some(2));

        let changed = EditSync::new(BracketKind::Paren, &mut index, &mut queues).on_delete(0, 5);

        assert!(changed);
        assert_eq!(lengths(&index), vec![(15, Some(2))]);
        assert_eq!(queues.recompute, BTreeSet::from([15]));
    }

    #[test]
    fn test_delete_exactly_at_end_rescans_in_place() {
        let mut index = BracketIndex::new();
        let mut queues = WorkQueues::new();
        index.update(0, Some(4));

        let changed = EditSync::new(BracketKind::Paren, &mut index, &mut queues).on_delete(4, 1);

        assert!(changed);
        assert_eq!(lengths(&index), vec![(0, Some(4))]);
        assert_eq!(queues.recompute, BTreeSet::from([0]));
    }

    #[test]
    fn test_delete_spanning_exactly_one_entry() {
        let mut index = BracketIndex::new();
        let mut queues = WorkQueues::new();
        index.update(2, Some(2));

        let changed = EditSync::new(BracketKind::Paren, &mut index, &mut queues).on_delete(2, 3);

        assert!(changed);
        assert!(index.is_empty());
        assert!(queues.is_empty());
    }

    #[test]
    fn test_delete_after_span_is_ignored() {
        let mut index = BracketIndex::new();
        let mut queues = WorkQueues::new();
        index.update(0, Some(2));

        let changed = EditSync::new(BracketKind::Paren, &mut index, &mut queues).on_delete(3, 4);

        assert!(!changed);
        assert!(queues.is_empty());
    }

    #[test]
    fn test_delete_rescans_unmatched_openers() {
        let mut index = BracketIndex::new();
        let mut queues = WorkQueues::new();
        index.update(1, None);

        let changed = EditSync::new(BracketKind::Paren, &mut index, &mut queues).on_delete(9, 1);

        assert!(changed);
        assert_eq!(queues.recompute, BTreeSet::from([1]));
    }

    #[test]
    fn test_delete_mixed_removes_shifts_and_rescans() {
        // {a{b}c}{d}  ->  delete "{b}" at 2..5  ->  {ac}{d}
        let mut index = BracketIndex::new();
        let mut queues = WorkQueues::new();
        index.update(0, Some(6));
        index.update(2, Some(2));
        index.update(7, Some(2));

        EditSync::new(BracketKind::Brace, &mut index, &mut queues).on_delete(2, 3);

        assert_eq!(lengths(&index), vec![(0, Some(6)), (4, Some(2))]);
        assert_eq!(queues.recompute, BTreeSet::from([0, 4]));
    }

    #[test]
    fn test_restyle_queues_brackets_in_range() {
        let mut index = BracketIndex::new();
        let mut queues = WorkQueues::new();
        let text = "/* { } */ {";

        let mut sync = EditSync::new(BracketKind::Brace, &mut index, &mut queues);
        assert!(sync.on_restyle(0, 9, chars_of(text)));
        assert!(!sync.on_restyle(0, 2, chars_of(text)));

        assert_eq!(queues.recompute, BTreeSet::from([3, 5]));
    }
}
