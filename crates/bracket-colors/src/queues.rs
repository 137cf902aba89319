//! Pending work for one document: positions to rescan and positions to repaint.

use std::collections::BTreeSet;

/// The recompute and redraw queues of one document.
///
/// Both queues hold plain positions shared by every bracket kind of the document. Positions are
/// processed in ascending order. Pending positions always refer to the current document text,
/// so an edit that arrives before they are processed moves them along with the characters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkQueues {
    /// Positions whose bracket/match status must be re-derived from the document.
    pub recompute: BTreeSet<usize>,
    /// Positions whose painted color must be refreshed.
    pub redraw: BTreeSet<usize>,
    /// Positions queued for recompute since [`WorkQueues::begin_edit`].
    ///
    /// `None` outside an edit. While an edit is dispatched to several kinds, a stale key purged
    /// by one kind must not drop a position another kind just queued.
    pinned: Option<BTreeSet<usize>>,
}

impl WorkQueues {
    /// Create empty queues.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `position` for a rescan.
    pub fn queue_recompute(&mut self, position: usize) {
        self.recompute.insert(position);
        if let Some(pinned) = &mut self.pinned {
            pinned.insert(position);
        }
    }

    /// Queue `position` for a repaint.
    pub fn queue_redraw(&mut self, position: usize) {
        self.redraw.insert(position);
    }

    /// Drop a stale position from both queues.
    ///
    /// Positions queued for recompute during the current edit are kept.
    pub fn remove_from_queues(&mut self, position: usize) {
        if self
            .pinned
            .as_ref()
            .is_some_and(|pinned| pinned.contains(&position))
        {
            return;
        }
        self.recompute.remove(&position);
        self.redraw.remove(&position);
    }

    /// Move pending positions past `length` characters inserted at `position`.
    pub fn shift_for_insert(&mut self, position: usize, length: usize) {
        for queue in [&mut self.recompute, &mut self.redraw] {
            let moved = queue.split_off(&position);
            queue.extend(moved.into_iter().map(|p| p + length));
        }
    }

    /// Drop pending positions inside `length` characters deleted at `position` and move the
    /// ones after them back.
    pub fn shift_for_delete(&mut self, position: usize, length: usize) {
        let deleted_end = position + length;
        for queue in [&mut self.recompute, &mut self.redraw] {
            let tail = queue.split_off(&position);
            queue.extend(
                tail.into_iter()
                    .filter(|&p| p >= deleted_end)
                    .map(|p| p - length),
            );
        }
    }

    /// Take every pending position out, leaving both queues empty.
    pub fn take_pending(&mut self) -> Self {
        Self {
            recompute: std::mem::take(&mut self.recompute),
            redraw: std::mem::take(&mut self.redraw),
            pinned: None,
        }
    }

    /// Queue everything pending in `other`.
    pub fn merge(&mut self, other: Self) {
        self.recompute.extend(other.recompute);
        self.redraw.extend(other.redraw);
    }

    /// Start dispatching one document edit.
    pub fn begin_edit(&mut self) {
        self.pinned = Some(BTreeSet::new());
    }

    /// Finish dispatching the current document edit.
    pub fn end_edit(&mut self) {
        self.pinned = None;
    }

    /// Returns `true` if there is nothing to rescan or repaint.
    pub fn is_empty(&self) -> bool {
        self.recompute.is_empty() && self.redraw.is_empty()
    }

    /// Clear both queues.
    pub fn clear(&mut self) {
        self.recompute.clear();
        self.redraw.clear();
        self.pinned = None;
    }
}
