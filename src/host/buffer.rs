//! In-memory editor buffer driving a completion machine
//!
//! [`BufferHost`] plays the part of an editor widget: it owns the text and the
//! caret, forwards every edit to a [`CompletionStateMachine`] and records what
//! the machine asked it to show.

use serde::Serialize;
use tracing::trace;

use crate::completion::{CompletionItem, CompletionStateMachine, EditorHost};
use crate::error::{AutoCompleteError, BufferError, Result};

/// Something the completion machine asked the host to do
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum HostEvent {
    /// A suggestion list was opened or replaced
    Shown {
        start_offset: usize,
        items: Vec<CompletionItem>,
    },
    /// The open suggestion list was dismissed
    Ended,
}

/// Text buffer with a caret, a selection and a suggestion popup
#[derive(Debug, Default)]
pub struct BufferHost {
    text: String,
    caret: usize,
    selection: Option<(usize, usize)>,
    popup: Option<(usize, Vec<CompletionItem>)>,
    events: Vec<HostEvent>,
}

impl BufferHost {
    /// Buffer holding `text` with the caret at the end
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            caret: text.len(),
            text,
            ..Default::default()
        }
    }

    /// Current document text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Caret offset
    pub fn caret(&self) -> usize {
        self.caret
    }

    /// Move the caret, dropping the selection
    pub fn move_caret(&mut self, offset: usize) -> Result<()> {
        self.check_offset(offset)?;
        self.caret = offset;
        self.selection = None;
        Ok(())
    }

    /// Select `start..end` and put the caret at `end`
    pub fn select(&mut self, start: usize, end: usize) -> Result<()> {
        self.check_offset(start)?;
        self.check_offset(end)?;
        self.selection = Some((start.min(end), start.max(end)));
        self.caret = end;
        Ok(())
    }

    /// Items of the open suggestion list
    pub fn suggestions(&self) -> Option<&[CompletionItem]> {
        self.popup.as_ref().map(|(_, items)| items.as_slice())
    }

    /// Start offset of the open suggestion list
    pub fn suggestion_start(&self) -> Option<usize> {
        self.popup.as_ref().map(|(start, _)| *start)
    }

    /// Everything the machine requested so far
    pub fn events(&self) -> &[HostEvent] {
        &self.events
    }

    /// Drain the recorded events
    pub fn take_events(&mut self) -> Vec<HostEvent> {
        std::mem::take(&mut self.events)
    }

    /// Type `text` one character at a time
    ///
    /// `\r\n` is entered as a single keystroke.
    pub fn type_text(&mut self, machine: &mut CompletionStateMachine, text: &str) {
        for keystroke in keystrokes(text) {
            self.insert(keystroke);
            machine.try_auto_complete(self, keystroke);
        }
    }

    /// Insert `text` in one edit and rescan the document
    pub fn paste(&mut self, machine: &mut CompletionStateMachine, text: &str) {
        self.insert(text);
        machine.try_auto_complete(self, text);
        machine.detect_state(self);
    }

    /// Delete the selection, or the character before the caret
    pub fn delete_backward(&mut self, machine: &mut CompletionStateMachine) {
        let range = match self.selection.take() {
            Some((start, end)) if start != end => start..end,
            _ => match self.text[..self.caret].chars().next_back() {
                Some(c) => self.caret - c.len_utf8()..self.caret,
                None => return,
            },
        };
        trace!("Deleting {:?}", range);
        self.caret = range.start;
        self.text.replace_range(range, "");
        machine.try_auto_complete(self, "");
    }

    /// Replace the session window with the `index`th suggestion
    pub fn accept_suggestion(
        &mut self,
        machine: &mut CompletionStateMachine,
        index: usize,
    ) -> Result<()> {
        let (start, item) = self
            .popup
            .as_ref()
            .and_then(|(start, items)| items.get(index).map(|item| (*start, item.clone())))
            .ok_or_else(|| {
                AutoCompleteError::Generic(format!("No suggestion at index {index}"))
            })?;

        let range = start.min(self.caret)..self.caret;
        self.check_offset(range.start)?;
        machine.on_suggestion_inserted(item.kind);
        self.end_suggestion_session();

        self.text.replace_range(range.clone(), &item.insertion_text);
        self.caret = range.start + item.insertion_text.len();
        self.selection = None;
        machine.try_auto_complete(self, &item.insertion_text);
        Ok(())
    }

    fn insert(&mut self, text: &str) {
        if let Some((start, end)) = self.selection.take() {
            self.text.replace_range(start..end, "");
            self.caret = start;
        }
        self.text.insert_str(self.caret, text);
        self.caret += text.len();
    }

    fn check_offset(&self, offset: usize) -> Result<()> {
        if offset > self.text.len() || !self.text.is_char_boundary(offset) {
            return Err(BufferError::OutOfRange { offset, length: 0 }.into());
        }
        Ok(())
    }
}

/// Split `text` into single keystrokes, keeping `\r\n` together
pub fn keystrokes(text: &str) -> Vec<&str> {
    let mut result = Vec::new();
    let mut chars = text.char_indices().peekable();
    while let Some((index, c)) = chars.next() {
        let end = match (c, chars.peek()) {
            ('\r', Some((_, '\n'))) => {
                chars.next();
                index + 2
            }
            _ => index + c.len_utf8(),
        };
        result.push(&text[index..end]);
    }
    result
}

impl EditorHost for BufferHost {
    fn document_text(&self) -> &str {
        &self.text
    }

    fn caret_offset(&self) -> usize {
        self.caret
    }

    fn selection(&self) -> Option<(usize, usize)> {
        self.selection
    }

    fn show_suggestions(&mut self, start_offset: usize, items: Vec<CompletionItem>) {
        self.events.push(HostEvent::Shown {
            start_offset,
            items: items.clone(),
        });
        self.popup = Some((start_offset, items));
    }

    fn end_suggestion_session(&mut self) {
        if self.popup.take().is_some() {
            self.events.push(HostEvent::Ended);
        }
    }
}
