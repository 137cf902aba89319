#![warn(missing_docs)]
//! Bracket Colors - headless nesting-depth coloring for brackets
//!
//! # Overview
//!
//! `bracket-colors` tracks every matched `()`, `[]`, `{}` and (optionally) `<>` pair of a
//! document and assigns each pair a nesting **order**, which selects one of a small rotating set
//! of colors. It does not own the document text and does not paint anything: a host editor
//! implements [`HostDocument`], forwards its change notifications as [`DocumentEdit`]s, and applies
//! the [`BracketHighlight`]s it gets back.
//!
//! # Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  BracketDocuments / Config                  │  ← Host-facing API
//! ├─────────────────────────────────────────────┤
//! │  DocumentBrackets (tick, highlights)        │  ← Incremental driver
//! ├─────────────────────────────────────────────┤
//! │  EditSync + WorkQueues                      │  ← Edit bookkeeping
//! ├─────────────────────────────────────────────┤
//! │  BracketIndex (per kind)                    │  ← Pair storage, order
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use bracket_colors::{BracketIndex, UNDEFINED};
//!
//! // "(a[b]{c(d)})" with parens at 0, 7, 9 and 11.
//! let mut parens = BracketIndex::new();
//! parens.update(0, Some(11));
//! parens.update(7, Some(2));
//! let changed = parens.recompute_order();
//!
//! assert_eq!(changed.len(), 2);
//! assert_eq!(parens.get(0).unwrap().order, Some(0));
//! assert_eq!(parens.get(7).unwrap().order, Some(1));
//!
//! // An unmatched opener never gets an order.
//! parens.update(3, None);
//! parens.recompute_order();
//! assert_eq!(parens.get(3).unwrap().raw_order(), UNDEFINED);
//! ```
//!
//! # Module Description
//!
//! - [`kind`] - Bracket kinds and kind sets
//! - [`index`] - Per-kind bracket index and nesting order
//! - [`queues`] - Recompute/redraw work queues
//! - [`delta`] - Host change notifications
//! - [`edit_sync`] - Keeping an index consistent across edits
//! - [`host`] - What the core needs from the host editor
//! - [`driver`] - Per-document incremental driver
//! - [`registry`] - All open documents
//! - [`highlight`] - Paint instructions
//! - [`palette`] - Colors and background tracking
//! - [`config`] - Persistent configuration

pub mod config;
pub mod delta;
pub mod driver;
pub mod edit_sync;
pub mod highlight;
pub mod host;
pub mod index;
pub mod kind;
pub mod palette;
pub mod queues;
pub mod registry;

pub use config::{BracketColorsConfig, ConfigError, config_path};
pub use delta::DocumentEdit;
pub use driver::{
    DEFAULT_COMPUTE_INTERVAL_MS, DEFAULT_ITERATION_LIMIT, DEFAULT_REDRAW_INTERVAL_MS,
    DocumentBrackets, TickReport,
};
pub use edit_sync::EditSync;
pub use highlight::{BracketHighlight, color_slot};
pub use host::HostDocument;
pub use index::{BracketEntry, BracketIndex, UNDEFINED};
pub use kind::{BracketKind, BracketKindSet, KIND_COUNT, is_bracket_char, is_open_bracket_char};
pub use palette::{Color, ColorParseError, NUM_COLORS, Palette, PaletteTracker};
pub use queues::WorkQueues;
pub use registry::{BracketDocuments, DocumentId};
