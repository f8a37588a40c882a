//! Error handling for the completion engine.
//!
//! Most failures never leave the engine: a keystroke that cannot be classified
//! ends the suggestion session, and a vocabulary that cannot be retrieved simply
//! contributes no terms. The errors a caller does see are namespace scope errors
//! ([`NamespaceError`]) and the configuration/I/O errors of the command line tool.
//!
//! # Example
//!
//! ```rust
//! use rdf_autocomplete::error::{AutoCompleteError, NamespaceError, Result};
//!
//! fn resolve(known: bool) -> Result<&'static str> {
//!     if known {
//!         Ok("http://example.org/")
//!     } else {
//!         Err(NamespaceError::NotKnown("ex".to_string()).into())
//!     }
//! }
//!
//! assert!(matches!(resolve(false), Err(AutoCompleteError::Namespace(_))));
//! ```

pub mod kinds;

// Re-export commonly used types
pub use kinds::{
    AutoCompleteError, BufferError, ConfigError, NamespaceError, Result, VocabularyError,
};
