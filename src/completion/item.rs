//! Suggestion entries handed to the editor

use serde::Serialize;

/// What a suggestion inserts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionKind {
    Keyword,
    QName,
    BlankNode,
    NewBlankNode,
    Variable,
    BaseDeclaration,
    PrefixDeclaration,
    NewPrefixDeclaration,
    Uri,
}

impl CompletionKind {
    /// Accepting this suggestion changes the namespace declarations of the document
    pub fn is_declaration(&self) -> bool {
        matches!(
            self,
            CompletionKind::BaseDeclaration
                | CompletionKind::PrefixDeclaration
                | CompletionKind::NewPrefixDeclaration
        )
    }
}

/// A single suggestion
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletionItem {
    /// Text shown in the suggestion list
    pub display_text: String,
    /// Text replacing the session window when accepted
    pub insertion_text: String,
    /// Optional tooltip
    pub description: Option<String>,
    /// Category of the suggestion
    pub kind: CompletionKind,
}

impl CompletionItem {
    /// Create an item that inserts what it displays
    pub fn new(kind: CompletionKind, text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            display_text: text.clone(),
            insertion_text: text,
            description: None,
            kind,
        }
    }

    /// Replace the inserted text
    pub fn with_insertion(mut self, insertion_text: impl Into<String>) -> Self {
        self.insertion_text = insertion_text.into();
        self
    }

    /// Attach a description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}
