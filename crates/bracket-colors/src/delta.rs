//! Document change notifications.
//!
//! Hosts describe what happened to the document with [`DocumentEdit`] values expressed in
//! **character offsets** (Unicode scalar values), in the order the changes were applied.

/// One change to the document, as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentEdit {
    /// `length` characters were inserted at `position`.
    Insert {
        /// Offset of the first inserted character.
        position: usize,
        /// Number of inserted characters.
        length: usize,
    },
    /// `length` characters were removed starting at `position`.
    Delete {
        /// Offset of the first removed character (pre-edit coordinates).
        position: usize,
        /// Number of removed characters.
        length: usize,
    },
    /// Highlighting classification (code vs. comment/string) changed for `length` characters at
    /// `position`, without any text change.
    Restyle {
        /// Offset of the first restyled character.
        position: usize,
        /// Number of restyled characters.
        length: usize,
    },
}

impl DocumentEdit {
    /// Insertion of `text` at `position`.
    pub fn insert(position: usize, text: &str) -> Self {
        Self::Insert {
            position,
            length: text.chars().count(),
        }
    }

    /// Deletion of `length` characters at `position`.
    pub fn delete(position: usize, length: usize) -> Self {
        Self::Delete { position, length }
    }

    /// Classification change over `length` characters at `position`.
    pub fn restyle(position: usize, length: usize) -> Self {
        Self::Restyle { position, length }
    }

    /// Start offset of the change.
    pub fn position(&self) -> usize {
        match *self {
            Self::Insert { position, .. }
            | Self::Delete { position, .. }
            | Self::Restyle { position, .. } => position,
        }
    }

    /// Number of characters covered by the change.
    pub fn len(&self) -> usize {
        match *self {
            Self::Insert { length, .. }
            | Self::Delete { length, .. }
            | Self::Restyle { length, .. } => length,
        }
    }

    /// Returns `true` if the change covers no characters.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
