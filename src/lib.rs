//! Incremental autocompletion for RDF editors
//!
//! This library provides the completion engine behind Turtle, N-Triples,
//! Notation3 and SPARQL editors. The editor reports each insertion; the engine
//! tracks the lexical context around the caret and tells the editor when to show
//! or dismiss suggestion lists.
//!
//! # Modules
//!
//! - `cli`: Command-line interface and argument parsing
//! - `completion`: State machine, syntax profiles and suggestion items
//! - `config`: Configuration management
//! - `error`: Error types and handling
//! - `host`: In-memory editor host
//! - `namespace`: Offset-scoped prefix bindings
//! - `vocab`: Vocabulary terms and their retrieval
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use rdf_autocomplete::{BufferHost, CompletionRegistry, TermIndex};
//!
//! let registry = CompletionRegistry::new(Arc::new(TermIndex::offline()));
//! let mut machine = registry.create("Turtle").unwrap();
//! let mut host = BufferHost::new("@prefix ex: <http://example.org/> .\n");
//! machine.detect_state(&host);
//!
//! host.type_text(&mut machine, "ex:");
//! for item in host.suggestions().unwrap_or_default() {
//!     println!("{}", item.display_text);
//! }
//! ```

pub mod cli;
pub mod completion;
pub mod config;
pub mod error;
pub mod host;
pub mod namespace;
pub mod vocab;

// Re-export commonly used types
pub use completion::{
    CompletionItem, CompletionKind, CompletionRegistry, CompletionState, CompletionStateMachine,
    EditorHost, SyntaxProfile,
};
pub use config::Config;
pub use error::{AutoCompleteError, Result};
pub use host::BufferHost;
pub use namespace::OffsetScopedNamespaceMap;
pub use vocab::{NamespaceTerm, TermIndex};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get library version string
pub fn version() -> &'static str {
    VERSION
}
