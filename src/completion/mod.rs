//! Incremental autocompletion for RDF editors
//!
//! This module provides:
//! - The per-document [`CompletionStateMachine`] fed one insertion at a time
//! - [`SyntaxProfile`]s for N-Triples, Turtle, Notation3 and SPARQL
//! - The [`EditorHost`] boundary an editor implements
//! - A [`CompletionRegistry`] mapping syntax names to machines

pub mod blank_node;
pub mod engine;
pub mod host;
pub mod item;
pub mod registry;
pub mod scan;
pub mod syntax;
pub mod validation;

use serde::Serialize;

pub use engine::CompletionStateMachine;
pub use host::EditorHost;
pub use item::{CompletionItem, CompletionKind};
pub use registry::CompletionRegistry;
pub use syntax::{PrefixStyle, SyntaxProfile};

/// Lexical context the caret is currently in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionState {
    /// Between tokens
    #[default]
    None,
    /// Completion is switched off
    Disabled,
    /// An accepted suggestion is being written into the document
    Inserted,
    /// After `@`, before the directive name is complete
    Declaration,
    /// Inside `@base`
    Base,
    /// Inside `@prefix`
    Prefix,
    /// A word that may become a keyword or a qualified name
    KeywordOrQName,
    /// A qualified name
    QName,
    /// A blank node label
    BNode,
    /// Inside `<...>`
    Uri,
    /// Inside `"..."`
    Literal,
    /// Inside `"""..."""`
    LongLiteral,
    /// Inside `'...'`
    AlternateLiteral,
    /// Inside `'''...'''`
    AlternateLongLiteral,
    /// After `#` until the end of the line
    Comment,
    /// After a variable sigil
    Variable,
}

impl CompletionState {
    /// Check whether a session is open
    pub fn is_active(&self) -> bool {
        !matches!(
            self,
            CompletionState::None | CompletionState::Disabled | CompletionState::Inserted
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_state() {
        assert_eq!(CompletionState::default(), CompletionState::None);
        assert!(!CompletionState::None.is_active());
        assert!(!CompletionState::Inserted.is_active());
        assert!(CompletionState::LongLiteral.is_active());
    }

    #[test]
    fn test_state_serialization() {
        let json = serde_json::to_string(&CompletionState::KeywordOrQName).unwrap();
        assert_eq!(json, "\"keyword_or_q_name\"");
    }
}
