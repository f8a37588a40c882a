//! Lookup of syntax profiles by name or file extension

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use super::engine::CompletionStateMachine;
use super::syntax::{PROFILES, SyntaxProfile};
use crate::vocab::{BUILTIN_VOCABULARIES, TermIndex, VocabularyDefinition};

/// File extensions of the built-in syntaxes
const EXTENSIONS: &[(&str, &str)] = &[
    ("nt", "NTriples"),
    ("ttl", "Turtle"),
    ("n3", "Notation3"),
    ("rq", "SparqlQuery11"),
    ("sparql", "SparqlQuery11"),
    ("ru", "SparqlUpdate11"),
];

/// Creates completion machines sharing one term index
pub struct CompletionRegistry {
    profiles: HashMap<String, &'static SyntaxProfile>,
    extensions: HashMap<String, String>,
    terms: Arc<TermIndex>,
    auto_load_terms: bool,
}

impl CompletionRegistry {
    /// Registry with every built-in syntax
    pub fn new(terms: Arc<TermIndex>) -> Self {
        let mut registry = Self {
            profiles: HashMap::new(),
            extensions: HashMap::new(),
            terms,
            auto_load_terms: true,
        };
        for profile in PROFILES {
            registry.register(*profile);
        }
        for (extension, name) in EXTENSIONS {
            registry.register_extension(extension, name);
        }
        registry
    }

    /// Canonical name of a built-in syntax, given its name in any case or its extension
    pub fn canonical_name(name: &str) -> Option<&'static str> {
        PROFILES
            .iter()
            .map(|profile| profile.name)
            .find(|known| known.eq_ignore_ascii_case(name))
            .or_else(|| {
                EXTENSIONS
                    .iter()
                    .find(|(extension, _)| extension.eq_ignore_ascii_case(name))
                    .map(|(_, known)| *known)
            })
    }

    /// Add or replace a profile under its own name
    pub fn register(&mut self, profile: &'static SyntaxProfile) {
        debug!("Registering syntax {}", profile.name);
        self.profiles.insert(profile.name.to_lowercase(), profile);
    }

    /// Map a file extension (without the dot) to a registered syntax
    pub fn register_extension(&mut self, extension: &str, name: &str) {
        self.extensions
            .insert(extension.to_lowercase(), name.to_lowercase());
    }

    /// Profile registered under `name` or an extension of it
    pub fn profile(&self, name: &str) -> Option<&'static SyntaxProfile> {
        let key = name.to_lowercase();
        self.profiles.get(&key).copied().or_else(|| {
            self.extensions
                .get(&key)
                .and_then(|name| self.profiles.get(name))
                .copied()
        })
    }

    /// Profile matching the extension of `path`
    pub fn for_path(&self, path: &Path) -> Option<&'static SyntaxProfile> {
        path.extension()
            .and_then(|extension| extension.to_str())
            .and_then(|extension| self.profile(extension))
    }

    /// New state machine for `name`
    pub fn create(&self, name: &str) -> Option<CompletionStateMachine> {
        let profile = self.profile(name)?;
        let mut machine = CompletionStateMachine::new(profile, Arc::clone(&self.terms));
        machine.set_auto_load_terms(self.auto_load_terms);
        Some(machine)
    }

    /// Enable or disable term loading for machines created from now on
    pub fn set_auto_load_terms(&mut self, enabled: bool) {
        self.auto_load_terms = enabled;
    }

    /// Registered syntax names, sorted
    pub fn syntaxes(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.profiles.values().map(|p| p.name).collect();
        names.sort_unstable();
        names
    }

    /// Extensions mapped to each syntax name
    pub fn extensions_of(&self, name: &str) -> Vec<&str> {
        let key = name.to_lowercase();
        let mut extensions: Vec<&str> = self
            .extensions
            .iter()
            .filter(|(_, target)| **target == key)
            .map(|(extension, _)| extension.as_str())
            .collect();
        extensions.sort_unstable();
        extensions
    }

    /// Shared term index
    pub fn terms(&self) -> &Arc<TermIndex> {
        &self.terms
    }

    /// Vocabularies offered as prefix declarations
    pub fn vocabularies() -> &'static [VocabularyDefinition] {
        BUILTIN_VOCABULARIES
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::CompletionState;
    use crate::completion::syntax::{PrefixStyle, TURTLE};

    fn registry() -> CompletionRegistry {
        CompletionRegistry::new(Arc::new(TermIndex::offline()))
    }

    static TRIG_LIKE: SyntaxProfile = SyntaxProfile {
        name: "TriGLike",
        directives: &["base", "prefix"],
        keywords: &[&["a", "GRAPH"]],
        case_insensitive_keywords: false,
        prefix_style: PrefixStyle::Directive,
        long_literals: true,
        alternate_quote: false,
        variable_sigils: &[],
    };

    #[test]
    fn test_canonical_name() {
        assert_eq!(CompletionRegistry::canonical_name("turtle"), Some("Turtle"));
        assert_eq!(CompletionRegistry::canonical_name("TTL"), Some("Turtle"));
        assert_eq!(
            CompletionRegistry::canonical_name("rq"),
            Some("SparqlQuery11")
        );
        assert_eq!(CompletionRegistry::canonical_name("rdfxml"), None);
    }

    #[test]
    fn test_lookup_by_name_and_path() {
        let registry = registry();
        assert_eq!(registry.profile("NTRIPLES").map(|p| p.name), Some("NTriples"));
        assert_eq!(
            registry.for_path(Path::new("/tmp/query.ru")).map(|p| p.name),
            Some("SparqlUpdate11")
        );
        assert!(registry.for_path(Path::new("README")).is_none());
        assert_eq!(registry.syntaxes().len(), PROFILES.len());
        assert_eq!(registry.extensions_of("SparqlQuery11"), vec!["rq", "sparql"]);
    }

    #[test]
    fn test_create_machine() {
        let registry = registry();
        let machine = registry.create("ttl").unwrap();
        assert!(std::ptr::eq(machine.profile(), &TURTLE));
        assert_eq!(machine.state(), CompletionState::None);
        assert!(registry.create("rdfxml").is_none());
    }

    #[test]
    fn test_custom_registration() {
        let mut registry = registry();
        registry.register(&TRIG_LIKE);
        registry.register_extension("trig", "TriGLike");

        let machine = registry.create("trig").unwrap();
        assert!(machine.profile().is_keyword("GRAPH"));
        assert!(registry.syntaxes().contains(&"TriGLike"));
    }

    #[test]
    fn test_vocabularies() {
        assert!(
            CompletionRegistry::vocabularies()
                .iter()
                .any(|v| v.prefix == "owl")
        );
    }
}
