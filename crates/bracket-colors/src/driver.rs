//! Per-document driver.
//!
//! [`DocumentBrackets`] owns everything bracket coloring needs to know about one open document:
//! one [`BracketIndex`] per kind, the recompute/redraw queues, and which kinds are enabled. The
//! host feeds it edits as they happen and calls [`DocumentBrackets::tick`] on its own schedule
//! (idle callback, timer, test loop). A tick does a bounded amount of rescanning, so a large
//! document is processed over several ticks without blocking the host.
//!
//! # Example
//!
//! ```rust
//! use bracket_colors::{BracketKind, DocumentBrackets, HostDocument, Palette};
//!
//! struct Text(Vec<char>);
//!
//! impl HostDocument for Text {
//!     fn char_at(&self, position: usize) -> Option<char> {
//!         self.0.get(position).copied()
//!     }
//!     fn document_length(&self) -> usize {
//!         self.0.len()
//!     }
//!     fn is_code_region(&self, _position: usize) -> bool {
//!         true
//!     }
//!     fn brace_match(&self, position: usize) -> Option<usize> {
//!         // Good enough for this flat example.
//!         match *self.0.get(position)? {
//!             '(' => self.0[position..].iter().position(|&c| c == ')').map(|d| position + d),
//!             ')' => self.0[..position].iter().rposition(|&c| c == '('),
//!             _ => None,
//!         }
//!     }
//! }
//!
//! let text = Text("f(x) + g(y)".chars().collect());
//! let mut brackets = DocumentBrackets::default();
//! brackets.tick_until_idle(&text, 50);
//!
//! let highlights = brackets.take_highlights(&Palette::default());
//! assert_eq!(highlights.len(), 2);
//! assert!(highlights.iter().all(|h| h.kind == BracketKind::Paren && h.order == 0));
//! ```

use crate::delta::DocumentEdit;
use crate::edit_sync::EditSync;
use crate::highlight::BracketHighlight;
use crate::host::HostDocument;
use crate::index::{BracketEntry, BracketIndex};
use crate::kind::{BracketKind, BracketKindSet, KIND_COUNT};
use crate::palette::Palette;
use crate::queues::WorkQueues;
use std::collections::BTreeSet;

/// Positions rescanned per tick unless the host asks for a different budget.
pub const DEFAULT_ITERATION_LIMIT: usize = 50;

/// Suggested delay between recompute ticks, in milliseconds.
pub const DEFAULT_COMPUTE_INTERVAL_MS: u64 = 20;

/// Suggested delay between redraw passes, in milliseconds.
pub const DEFAULT_REDRAW_INTERVAL_MS: u64 = 100;

/// What one [`DocumentBrackets::tick`] did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    /// The whole document was scanned for brackets first.
    pub scanned_document: bool,
    /// Positions taken off the recompute queue.
    pub processed: usize,
    /// Positions still waiting for a later tick.
    pub remaining: usize,
    /// Opening-bracket positions whose entry was written.
    pub updated: BTreeSet<usize>,
    /// Bracket positions found inside comments/strings; their entries are gone and any paint at
    /// these positions should be removed.
    pub cleared: BTreeSet<usize>,
    /// Number of entries whose nesting order changed.
    pub order_changed: usize,
}

impl TickReport {
    fn merge(&mut self, other: Self) {
        self.scanned_document |= other.scanned_document;
        self.processed += other.processed;
        self.remaining = other.remaining;
        self.updated.extend(other.updated);
        self.cleared.extend(other.cleared);
        self.order_changed += other.order_changed;
    }
}

/// Bracket coloring state of one open document.
#[derive(Debug, Clone)]
pub struct DocumentBrackets {
    indices: [BracketIndex; KIND_COUNT],
    enabled: BracketKindSet,
    queues: WorkQueues,
    initialized: bool,
    needs_redraw: bool,
    orders_dirty: bool,
}

impl Default for DocumentBrackets {
    fn default() -> Self {
        Self::new(BracketKindSet::default())
    }
}

impl DocumentBrackets {
    /// Create the state for a freshly opened document tracking `enabled` kinds.
    pub fn new(enabled: BracketKindSet) -> Self {
        Self {
            indices: Default::default(),
            enabled,
            queues: WorkQueues::new(),
            initialized: false,
            needs_redraw: false,
            orders_dirty: false,
        }
    }

    /// The tracked kinds.
    pub fn enabled(&self) -> BracketKindSet {
        self.enabled
    }

    /// Start or stop tracking `kind`.
    ///
    /// Disabling drops the kind's entries. Enabling schedules a full document scan on the next
    /// tick.
    pub fn set_enabled(&mut self, kind: BracketKind, enabled: bool) {
        if self.enabled.contains(kind) == enabled {
            return;
        }
        self.enabled.set(kind, enabled);
        if enabled {
            self.initialized = false;
        } else {
            self.indices[kind.index()].clear();
        }
        self.needs_redraw = true;
    }

    /// The index of `kind`.
    pub fn index(&self, kind: BracketKind) -> &BracketIndex {
        &self.indices[kind.index()]
    }

    /// Entries of `kind`, ascending by position.
    pub fn entries(&self, kind: BracketKind) -> impl Iterator<Item = (usize, &BracketEntry)> + '_ {
        self.indices[kind.index()].entries()
    }

    /// The pending work.
    pub fn queues(&self) -> &WorkQueues {
        &self.queues
    }

    /// Returns `true` once the full document scan has been queued.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Returns `true` if there are highlights the host has not taken yet.
    pub fn needs_redraw(&self) -> bool {
        self.needs_redraw
    }

    /// Returns `true` if a tick has nothing to do.
    pub fn is_idle(&self) -> bool {
        self.initialized && self.queues.recompute.is_empty() && !self.orders_dirty
    }

    /// Forget everything; the next tick starts with a full scan.
    ///
    /// Used when the document is reloaded or the configuration changes.
    pub fn reset(&mut self) {
        for index in &mut self.indices {
            index.clear();
        }
        self.queues.clear();
        self.initialized = false;
        self.needs_redraw = false;
        self.orders_dirty = false;
    }

    /// Apply one host change notification to every enabled kind.
    ///
    /// `host` must already reflect the edit. Returns `true` if any index or queue changed.
    ///
    /// Positions still pending from earlier edits or an unfinished tick are moved once, before
    /// the per-kind bookkeeping runs, and rejoin the queues afterwards.
    pub fn apply_edit<H>(&mut self, edit: &DocumentEdit, host: &H) -> bool
    where
        H: HostDocument + ?Sized,
    {
        let char_at = |p: usize| host.char_at(p);
        let mut changed = false;

        let mut pending = self.queues.take_pending();
        match *edit {
            DocumentEdit::Insert { position, length } => pending.shift_for_insert(position, length),
            DocumentEdit::Delete { position, length } => pending.shift_for_delete(position, length),
            DocumentEdit::Restyle { .. } => {}
        }

        self.queues.begin_edit();
        for kind in self.enabled.iter() {
            let mut sync = EditSync::new(kind, &mut self.indices[kind.index()], &mut self.queues);
            changed |= match *edit {
                DocumentEdit::Insert { position, length } => {
                    sync.on_insert(position, length, char_at)
                }
                DocumentEdit::Delete { position, length } => sync.on_delete(position, length),
                DocumentEdit::Restyle { position, length } => {
                    sync.on_restyle(position, length, char_at)
                }
            };
        }
        self.queues.end_edit();
        self.queues.merge(pending);

        if changed {
            self.needs_redraw = true;
            self.orders_dirty = true;
        }
        changed
    }

    /// Queue every bracket character of an enabled kind for a rescan.
    ///
    /// Returns the number of queued positions.
    pub fn scan_all<H>(&mut self, host: &H) -> usize
    where
        H: HostDocument + ?Sized,
    {
        let mut queued = 0;
        for position in 0..host.document_length() {
            let Some(kind) = host.char_at(position).and_then(BracketKind::of) else {
                continue;
            };
            if self.enabled.contains(kind) {
                self.queues.queue_recompute(position);
                queued += 1;
            }
        }

        self.initialized = true;
        self.needs_redraw = true;
        tracing::debug!(
            queued,
            length = host.document_length(),
            "full document bracket scan"
        );
        queued
    }

    /// Rescan up to `budget` queued positions, then refresh nesting orders.
    ///
    /// The first tick of a document queues a full scan. Positions left over stay queued for the
    /// next tick.
    pub fn tick<H>(&mut self, host: &H, budget: usize) -> TickReport
    where
        H: HostDocument + ?Sized,
    {
        let mut report = TickReport::default();

        if !self.initialized {
            self.scan_all(host);
            report.scanned_document = true;
        }

        while report.processed < budget {
            let Some(position) = self.queues.recompute.pop_first() else {
                break;
            };
            self.rescan(host, position, &mut report);
            report.processed += 1;
        }

        if report.processed > 0 || self.orders_dirty {
            for kind in self.enabled.iter() {
                let changed = self.indices[kind.index()].recompute_order();
                report.order_changed += changed.len();
                for position in changed {
                    self.queues.queue_redraw(position);
                }
            }
            self.orders_dirty = false;
        }

        report.remaining = self.queues.recompute.len();
        if report.processed > 0 {
            tracing::debug!(
                processed = report.processed,
                remaining = report.remaining,
                updated = report.updated.len(),
                cleared = report.cleared.len(),
                order_changed = report.order_changed,
                "bracket tick"
            );
        }
        report
    }

    /// Tick until nothing is queued for recompute.
    ///
    /// Returns the combined report of every tick.
    pub fn tick_until_idle<H>(&mut self, host: &H, budget: usize) -> TickReport
    where
        H: HostDocument + ?Sized,
    {
        let budget = budget.max(1);
        let mut total = self.tick(host, budget);
        while !self.is_idle() {
            let report = self.tick(host, budget);
            total.merge(report);
        }
        total
    }

    /// Drain the redraw queue into paint instructions.
    ///
    /// Positions that are queued for a rescan again are skipped; they come back through the
    /// redraw queue once rescanned.
    pub fn take_highlights(&mut self, palette: &Palette) -> Vec<BracketHighlight> {
        let redraw = std::mem::take(&mut self.queues.redraw);
        let mut highlights = Vec::new();

        for position in redraw {
            if self.queues.recompute.contains(&position) {
                continue;
            }
            for kind in self.enabled.iter() {
                let highlight = self.indices[kind.index()]
                    .get(position)
                    .and_then(|entry| BracketHighlight::for_entry(kind, position, entry, palette));
                highlights.extend(highlight);
            }
        }

        self.needs_redraw = false;
        highlights
    }

    /// Paint instructions for every matched bracket of every enabled kind.
    ///
    /// For hosts that repaint from scratch instead of applying incremental updates.
    pub fn all_highlights(&self, palette: &Palette) -> Vec<BracketHighlight> {
        let mut highlights: Vec<BracketHighlight> = self
            .enabled
            .iter()
            .flat_map(|kind| {
                self.indices[kind.index()]
                    .entries()
                    .filter_map(move |(start, entry)| {
                        BracketHighlight::for_entry(kind, start, entry, palette)
                    })
            })
            .collect();
        highlights.sort_by_key(|h| (h.open, h.kind));
        highlights
    }

    fn rescan<H>(&mut self, host: &H, position: usize, report: &mut TickReport)
    where
        H: HostDocument + ?Sized,
    {
        let Some(ch) = host.char_at(position) else {
            return;
        };

        for kind in self.enabled.iter() {
            if !kind.matches(ch) {
                continue;
            }
            let index = &mut self.indices[kind.index()];

            if host.is_code_region(position) {
                if let Some(key) = match_bracket(index, host, kind, position, ch) {
                    tracing::trace!(?kind, position, key, "rescanned bracket");
                    self.queues.queue_redraw(key);
                    report.updated.insert(key);
                }
            } else {
                tracing::trace!(?kind, position, "bracket outside code");
                index.remove(position);
                if kind.is_close(ch) {
                    // An opener paired with this closer has lost its match.
                    let openers: Vec<usize> = index
                        .entries()
                        .filter(|(start, entry)| entry.end(*start) == Some(position))
                        .map(|(start, _)| start)
                        .collect();
                    for opener in openers {
                        self.queues.queue_recompute(opener);
                    }
                }
                report.cleared.insert(position);
            }
            self.needs_redraw = true;
        }
    }
}

/// Ask the host for the partner of the bracket at `position` and record the pair.
///
/// Entries are always keyed by the opener, even when the rescan started at the closer. Returns
/// the key that was written, or `None` for an unmatched closer (those are not tracked).
fn match_bracket<H>(
    index: &mut BracketIndex,
    host: &H,
    kind: BracketKind,
    position: usize,
    ch: char,
) -> Option<usize>
where
    H: HostDocument + ?Sized,
{
    match host.brace_match(position) {
        Some(matched) if matched > position => {
            index.update(position, Some(matched - position));
            Some(position)
        }
        Some(matched) => {
            index.update(matched, Some(position - matched));
            Some(matched)
        }
        None if kind.is_open(ch) => {
            index.update(position, None);
            Some(position)
        }
        None => None,
    }
}
