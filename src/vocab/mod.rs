//! Vocabulary terms for qualified name suggestions
//!
//! - **builtin**: well-known prefixes offered as ready-made declarations
//! - **term**: the [`NamespaceTerm`] type and extraction from RDF data
//! - **source**: network retrieval and bundled fallback copies
//! - **index**: the shared [`TermIndex`] cache

pub mod builtin;
mod index;
mod source;
mod term;

pub use builtin::{BUILTIN_VOCABULARIES, VocabularyDefinition};
pub use index::TermIndex;
pub use source::{
    BundledSources, BundledVocabularies, BundledVocabulary, DirectoryVocabularies,
    EmbeddedVocabularies, HttpVocabularyFetcher, VocabularyFetcher, parse_triples,
};
pub use term::{NamespaceTerm, extract_terms};
