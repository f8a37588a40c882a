//! Boundary between the completion engine and the editor hosting it

use super::item::CompletionItem;
use crate::error::BufferError;

/// Services the editor provides to a [`CompletionStateMachine`](super::CompletionStateMachine)
///
/// All offsets are UTF-8 byte offsets into [`document_text`](Self::document_text).
pub trait EditorHost {
    /// Full text of the document
    fn document_text(&self) -> &str;

    /// Caret position
    fn caret_offset(&self) -> usize;

    /// Selected range as `(start, end)`, `None` when nothing is selected
    fn selection(&self) -> Option<(usize, usize)>;

    /// Text of `length` bytes starting at `offset`
    fn text_range(&self, offset: usize, length: usize) -> Result<&str, BufferError> {
        let text = self.document_text();
        offset
            .checked_add(length)
            .and_then(|end| text.get(offset..end))
            .ok_or(BufferError::OutOfRange { offset, length })
    }

    /// Show (or replace) the suggestion list for a session starting at `start_offset`
    fn show_suggestions(&mut self, start_offset: usize, items: Vec<CompletionItem>);

    /// Dismiss the suggestion list
    fn end_suggestion_session(&mut self);
}
