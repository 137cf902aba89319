#![warn(missing_docs)]
//! `bracket-colors-rope` - a rope-backed host for `bracket-colors`.
//!
//! [`RopeDocument`] keeps its text in a [`ropey::Rope`] and implements
//! [`HostDocument`](bracket_colors::HostDocument): character access, code/comment/string
//! classification driven by a [`LanguageConfig`], and Scintilla-style brace matching. Its edit
//! methods return the [`DocumentEdit`] notifications a host would send, including the restyle
//! range when an edit opens or closes a comment or string somewhere else in the document.
//!
//! ```rust
//! use bracket_colors::{BracketKind, DocumentBrackets};
//! use bracket_colors_lang::LanguageConfig;
//! use bracket_colors_rope::RopeDocument;
//!
//! let mut doc = RopeDocument::new("f(x) // (", LanguageConfig::rust());
//! let mut brackets = DocumentBrackets::default();
//! brackets.tick_until_idle(&doc, 50);
//! assert_eq!(brackets.index(BracketKind::Paren).len(), 1);
//!
//! for edit in doc.insert(4, "[y]") {
//!     brackets.apply_edit(&edit, &doc);
//! }
//! brackets.tick_until_idle(&doc, 50);
//! assert_eq!(brackets.index(BracketKind::Square).len(), 1);
//! ```

mod classify;

use bracket_colors::{BracketKind, DocumentEdit, HostDocument};
use bracket_colors_lang::LanguageConfig;
use ropey::Rope;

pub use classify::classify_code;

/// A text document held in a rope, with per-character code classification.
#[derive(Debug, Clone)]
pub struct RopeDocument {
    rope: Rope,
    language: LanguageConfig,
    /// `code[p]` is `true` if the character at `p` is program text.
    code: Vec<bool>,
}

impl RopeDocument {
    /// Create a document from `text`.
    pub fn new(text: &str, language: LanguageConfig) -> Self {
        let rope = Rope::from_str(text);
        let code = classify_code(rope.chars(), &language);
        Self {
            rope,
            language,
            code,
        }
    }

    /// The whole text.
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// Number of characters.
    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    /// The underlying rope.
    pub fn rope(&self) -> &Rope {
        &self.rope
    }

    /// The language used for classification.
    pub fn language(&self) -> &LanguageConfig {
        &self.language
    }

    /// Switch language; returns a restyle for every character whose classification changed.
    pub fn set_language(&mut self, language: LanguageConfig) -> Vec<DocumentEdit> {
        self.language = language;
        let old = self.reclassify();
        changed_range(&self.code, |q| old.get(q).copied(), 0..0)
            .map(|(start, end)| DocumentEdit::restyle(start, end - start))
            .into_iter()
            .collect()
    }

    /// Insert `text` at `position` (clamped to the end of the document).
    ///
    /// Returns the insert notification, followed by a restyle covering characters outside the
    /// inserted text whose classification changed.
    pub fn insert(&mut self, position: usize, text: &str) -> Vec<DocumentEdit> {
        if text.is_empty() {
            return Vec::new();
        }
        let position = position.min(self.rope.len_chars());
        self.rope.insert(position, text);
        let inserted = text.chars().count();
        let old = self.reclassify();

        let mut edits = vec![DocumentEdit::Insert {
            position,
            length: inserted,
        }];
        let old_at = |q: usize| {
            if q < position {
                old.get(q).copied()
            } else {
                old.get(q - inserted).copied()
            }
        };
        if let Some((start, end)) = changed_range(&self.code, old_at, position..position + inserted)
        {
            tracing::trace!(start, end, "insert restyled text");
            edits.push(DocumentEdit::restyle(start, end - start));
        }
        edits
    }

    /// Delete `length` characters at `position`, clipped to the document.
    ///
    /// Returns the delete notification, followed by a restyle for any character whose
    /// classification changed. Deleting nothing returns no notifications.
    pub fn delete(&mut self, position: usize, length: usize) -> Vec<DocumentEdit> {
        let total = self.rope.len_chars();
        let position = position.min(total);
        let length = length.min(total - position);
        if length == 0 {
            return Vec::new();
        }
        self.rope.remove(position..position + length);
        let old = self.reclassify();

        let mut edits = vec![DocumentEdit::delete(position, length)];
        let old_at = |q: usize| {
            if q < position {
                old.get(q).copied()
            } else {
                old.get(q + length).copied()
            }
        };
        if let Some((start, end)) = changed_range(&self.code, old_at, position..position) {
            tracing::trace!(start, end, "delete restyled text");
            edits.push(DocumentEdit::restyle(start, end - start));
        }
        edits
    }

    /// Recompute the classification, returning the previous one.
    fn reclassify(&mut self) -> Vec<bool> {
        let code = classify_code(self.rope.chars(), &self.language);
        std::mem::replace(&mut self.code, code)
    }

    fn is_code(&self, position: usize) -> bool {
        self.code.get(position).copied().unwrap_or(false)
    }
}

/// Smallest `[start, end)` of post-edit positions, outside `skip`, whose classification differs
/// from `old_at` (the pre-edit classification mapped to post-edit positions).
fn changed_range<F>(
    code: &[bool],
    old_at: F,
    skip: std::ops::Range<usize>,
) -> Option<(usize, usize)>
where
    F: Fn(usize) -> Option<bool>,
{
    let mut range: Option<(usize, usize)> = None;
    for (q, &now) in code.iter().enumerate() {
        if skip.contains(&q) || old_at(q) == Some(now) {
            continue;
        }
        range = Some(match range {
            None => (q, q + 1),
            Some((start, _)) => (start, q + 1),
        });
    }
    range
}

impl HostDocument for RopeDocument {
    fn char_at(&self, position: usize) -> Option<char> {
        (position < self.rope.len_chars()).then(|| self.rope.char(position))
    }

    fn document_length(&self) -> usize {
        self.rope.len_chars()
    }

    fn is_code_region(&self, position: usize) -> bool {
        self.is_code(position)
    }

    fn brace_match(&self, position: usize) -> Option<usize> {
        let ch = self.char_at(position)?;
        let kind = BracketKind::of(ch)?;
        if !self.is_code(position) {
            return None;
        }

        let mut depth = 0usize;
        let mut visit = |p: usize, c: char| -> bool {
            if !kind.matches(c) || !self.is_code(p) {
                return false;
            }
            if c == ch {
                depth += 1;
                false
            } else {
                depth -= 1;
                depth == 0
            }
        };

        if kind.is_open(ch) {
            self.rope
                .chars_at(position)
                .enumerate()
                .map(|(offset, c)| (position + offset, c))
                .find(|&(p, c)| visit(p, c))
                .map(|(p, _)| p)
        } else {
            let mut chars = self.rope.chars_at(position + 1);
            let mut p = position + 1;
            while let Some(c) = chars.prev() {
                p -= 1;
                if visit(p, c) {
                    return Some(p);
                }
            }
            None
        }
    }
}
