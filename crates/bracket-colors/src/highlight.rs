//! Paint instructions produced for the host.
//!
//! A [`BracketHighlight`] says "paint this bracket pair with this color". Highlights are derived
//! state: the host applies them as indicators/overlays on its own widget, and the core never
//! paints anything itself.

use crate::index::BracketEntry;
use crate::kind::BracketKind;
use crate::palette::{Color, NUM_COLORS, Palette};

/// Color slot for a bracket of `kind` at nesting `order`.
///
/// Depths rotate through [`NUM_COLORS`] slots, offset per kind so that different kinds at the
/// same depth get different colors.
pub fn color_slot(order: usize, kind: BracketKind) -> usize {
    (order + kind.index()) % NUM_COLORS
}

/// One matched bracket pair to paint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BracketHighlight {
    /// Bracket kind.
    pub kind: BracketKind,
    /// Position of the opening bracket.
    pub open: usize,
    /// Position of the closing bracket.
    pub close: usize,
    /// Nesting order of the pair.
    pub order: usize,
    /// Index into the palette.
    pub color_slot: usize,
    /// The resolved color.
    pub color: Color,
}

impl BracketHighlight {
    /// Build the highlight for the entry at `start`, if it has a match and a computed order.
    pub fn for_entry(
        kind: BracketKind,
        start: usize,
        entry: &BracketEntry,
        palette: &Palette,
    ) -> Option<Self> {
        let close = entry.end(start)?;
        let order = entry.order?;
        let color_slot = color_slot(order, kind);
        Some(Self {
            kind,
            open: start,
            close,
            order,
            color_slot,
            color: palette.color(color_slot),
        })
    }

    /// Both painted positions, opener first.
    pub fn positions(&self) -> [usize; 2] {
        [self.open, self.close]
    }
}
