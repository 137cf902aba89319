//! Bracket kinds.
//!
//! Each kind is tracked by its own [`BracketIndex`](crate::BracketIndex); kinds never share
//! entries, and a closing `)` never matches an opening `[`.

use serde::{Deserialize, Serialize};

/// Number of bracket kinds.
pub const KIND_COUNT: usize = 4;

/// One of the four tracked bracket kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BracketKind {
    /// `(` and `)`.
    Paren,
    /// `[` and `]`.
    Square,
    /// `{` and `}`.
    Brace,
    /// `<` and `>`.
    Angle,
}

impl BracketKind {
    /// All kinds, in storage order.
    pub const ALL: [Self; KIND_COUNT] = [Self::Paren, Self::Square, Self::Brace, Self::Angle];

    /// Storage index (`0..KIND_COUNT`).
    ///
    /// Also used to rotate colors between kinds, so that a top-level `(` and a top-level `{` do
    /// not start on the same color.
    pub const fn index(self) -> usize {
        match self {
            Self::Paren => 0,
            Self::Square => 1,
            Self::Brace => 2,
            Self::Angle => 3,
        }
    }

    /// The opening character.
    pub const fn open_char(self) -> char {
        match self {
            Self::Paren => '(',
            Self::Square => '[',
            Self::Brace => '{',
            Self::Angle => '<',
        }
    }

    /// The closing character.
    pub const fn close_char(self) -> char {
        match self {
            Self::Paren => ')',
            Self::Square => ']',
            Self::Brace => '}',
            Self::Angle => '>',
        }
    }

    /// Returns `true` if `ch` is the opening or closing character of this kind.
    pub const fn matches(self, ch: char) -> bool {
        ch == self.open_char() || ch == self.close_char()
    }

    /// Returns `true` if `ch` is the opening character of this kind.
    pub const fn is_open(self, ch: char) -> bool {
        ch == self.open_char()
    }

    /// Returns `true` if `ch` is the closing character of this kind.
    pub const fn is_close(self, ch: char) -> bool {
        ch == self.close_char()
    }

    /// The kind a bracket character belongs to.
    pub fn of(ch: char) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.matches(ch))
    }
}

/// Returns `true` if `ch` is a bracket character of any kind.
pub fn is_bracket_char(ch: char) -> bool {
    BracketKind::of(ch).is_some()
}

/// Returns `true` if `ch` is an opening bracket of any kind.
pub fn is_open_bracket_char(ch: char) -> bool {
    BracketKind::ALL.into_iter().any(|kind| kind.is_open(ch))
}

/// A set of bracket kinds, stored as one flag per kind.
///
/// Serialized as `{ "paren": true, "square": true, "brace": true, "angle": false }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct BracketKindSet {
    /// Track `()`.
    pub paren: bool,
    /// Track `[]`.
    pub square: bool,
    /// Track `{}`.
    pub brace: bool,
    /// Track `<>`.
    pub angle: bool,
}

impl BracketKindSet {
    /// No kinds.
    pub const NONE: Self = Self {
        paren: false,
        square: false,
        brace: false,
        angle: false,
    };

    /// Every kind, including angle brackets.
    pub const ALL: Self = Self {
        paren: true,
        square: true,
        brace: true,
        angle: true,
    };

    /// Returns `true` if `kind` is in the set.
    pub const fn contains(&self, kind: BracketKind) -> bool {
        match kind {
            BracketKind::Paren => self.paren,
            BracketKind::Square => self.square,
            BracketKind::Brace => self.brace,
            BracketKind::Angle => self.angle,
        }
    }

    /// Add or remove `kind`.
    pub fn set(&mut self, kind: BracketKind, enabled: bool) {
        match kind {
            BracketKind::Paren => self.paren = enabled,
            BracketKind::Square => self.square = enabled,
            BracketKind::Brace => self.brace = enabled,
            BracketKind::Angle => self.angle = enabled,
        }
    }

    /// Builder-style variant of [`BracketKindSet::set`].
    pub fn with(mut self, kind: BracketKind, enabled: bool) -> Self {
        self.set(kind, enabled);
        self
    }

    /// Iterate the kinds in the set, in storage order.
    pub fn iter(self) -> impl Iterator<Item = BracketKind> {
        BracketKind::ALL
            .into_iter()
            .filter(move |kind| self.contains(*kind))
    }
}

impl Default for BracketKindSet {
    /// Paren, square and brace. Angle brackets are off.
    fn default() -> Self {
        Self::ALL.with(BracketKind::Angle, false)
    }
}
