//! The host editor, as seen by the driver.
//!
//! The core never owns document text. A host (an editor widget, a rope, a test fixture) exposes
//! four read-only primitives and the driver calls them while rescanning queued positions.

/// Read access to the host document.
///
/// All positions are character offsets.
pub trait HostDocument {
    /// The character at `position`, or `None` past the end of the document.
    fn char_at(&self, position: usize) -> Option<char>;

    /// Total number of characters.
    fn document_length(&self) -> usize;

    /// Returns `true` if `position` is program text, `false` inside comments and string literals.
    fn is_code_region(&self, position: usize) -> bool;

    /// Position of the bracket matching the one at `position`, if any.
    ///
    /// For an opener the match is ahead of `position`, for a closer it is behind.
    fn brace_match(&self, position: usize) -> Option<usize>;
}

impl<T: HostDocument + ?Sized> HostDocument for &T {
    fn char_at(&self, position: usize) -> Option<char> {
        (**self).char_at(position)
    }

    fn document_length(&self) -> usize {
        (**self).document_length()
    }

    fn is_code_region(&self, position: usize) -> bool {
        (**self).is_code_region(position)
    }

    fn brace_match(&self, position: usize) -> Option<usize> {
        (**self).brace_match(position)
    }
}
