//! Vocabulary terms and their extraction from RDF data

use std::collections::{HashMap, HashSet};
use std::hash::{Hash, Hasher};

use oxrdf::{Subject, Term, Triple};
use serde::Serialize;

const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
const RDFS_COMMENT: &str = "http://www.w3.org/2000/01/rdf-schema#comment";
const RDFS_LABEL: &str = "http://www.w3.org/2000/01/rdf-schema#label";

/// Types whose instances are offered as terms
const TERM_TYPES: &[&str] = &[
    "http://www.w3.org/2000/01/rdf-schema#Class",
    "http://www.w3.org/2000/01/rdf-schema#Datatype",
    "http://www.w3.org/1999/02/22-rdf-syntax-ns#Property",
    "http://www.w3.org/2002/07/owl#Class",
    "http://www.w3.org/2002/07/owl#ObjectProperty",
    "http://www.w3.org/2002/07/owl#DatatypeProperty",
    "http://www.w3.org/2002/07/owl#AnnotationProperty",
];

/// A class, property or datatype documented by a vocabulary
///
/// Equality ignores case on `namespace_uri + local_name` so that vocabularies
/// publishing the same term twice do not produce duplicate suggestions.
#[derive(Debug, Clone, Serialize)]
pub struct NamespaceTerm {
    /// Namespace the term belongs to
    pub namespace_uri: String,
    /// Part of the term URI after the namespace
    pub local_name: String,
    /// Optional human readable description
    pub label: Option<String>,
}

impl NamespaceTerm {
    /// Create a term
    pub fn new(namespace_uri: &str, local_name: &str, label: Option<String>) -> Self {
        Self {
            namespace_uri: namespace_uri.to_string(),
            local_name: local_name.to_string(),
            label,
        }
    }

    /// Full URI of the term
    pub fn uri(&self) -> String {
        format!("{}{}", self.namespace_uri, self.local_name)
    }

    fn key(&self) -> String {
        self.uri().to_lowercase()
    }
}

impl PartialEq for NamespaceTerm {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for NamespaceTerm {}

impl Hash for NamespaceTerm {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

/// Pull the terms of `namespace_uri` out of a parsed vocabulary
///
/// Subjects typed as a class, datatype or property whose URI lies inside the
/// namespace become terms. The label prefers `rdfs:comment`, then `rdfs:label`.
/// The result is deduplicated and sorted by local name.
pub fn extract_terms(namespace_uri: &str, triples: &[Triple]) -> Vec<NamespaceTerm> {
    let mut typed: Vec<&str> = Vec::new();
    let mut comments: HashMap<&str, &str> = HashMap::new();
    let mut labels: HashMap<&str, &str> = HashMap::new();

    for triple in triples {
        let Subject::NamedNode(subject) = &triple.subject else {
            continue;
        };
        let subject = subject.as_str();
        if !subject.starts_with(namespace_uri) || subject.len() == namespace_uri.len() {
            continue;
        }

        match (triple.predicate.as_str(), &triple.object) {
            (RDF_TYPE, Term::NamedNode(class)) if TERM_TYPES.contains(&class.as_str()) => {
                typed.push(subject);
            }
            (RDFS_COMMENT, Term::Literal(literal)) => {
                comments.entry(subject).or_insert(literal.value());
            }
            (RDFS_LABEL, Term::Literal(literal)) => {
                labels.entry(subject).or_insert(literal.value());
            }
            _ => {}
        }
    }

    let mut seen = HashSet::new();
    let mut terms: Vec<NamespaceTerm> = typed
        .into_iter()
        .filter_map(|uri| {
            let label = comments
                .get(uri)
                .or_else(|| labels.get(uri))
                .map(|text| normalize_label(text));
            let term = NamespaceTerm::new(namespace_uri, &uri[namespace_uri.len()..], label);
            seen.insert(term.clone()).then_some(term)
        })
        .collect();

    terms.sort_by(|a, b| a.local_name.cmp(&b.local_name));
    terms
}

/// Collapse the whitespace of multi-line comments
fn normalize_label(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxrdf::{Literal, NamedNode};

    const NS: &str = "http://example.org/voc#";

    fn named(uri: &str) -> NamedNode {
        NamedNode::new_unchecked(uri)
    }

    fn typed(local: &str, class: &str) -> Triple {
        Triple::new(named(&format!("{NS}{local}")), named(RDF_TYPE), named(class))
    }

    fn annotated(local: &str, predicate: &str, text: &str) -> Triple {
        Triple::new(
            named(&format!("{NS}{local}")),
            named(predicate),
            Literal::new_simple_literal(text),
        )
    }

    #[test]
    fn test_extracts_classes_and_properties() {
        let triples = vec![
            typed("Person", "http://www.w3.org/2000/01/rdf-schema#Class"),
            typed("name", "http://www.w3.org/1999/02/22-rdf-syntax-ns#Property"),
            typed("Other", "http://example.org/NotATermType"),
        ];
        let terms = extract_terms(NS, &triples);
        let names: Vec<&str> = terms.iter().map(|t| t.local_name.as_str()).collect();
        assert_eq!(names, vec!["Person", "name"]);
    }

    #[test]
    fn test_prefers_comment_over_label() {
        let triples = vec![
            typed("Person", "http://www.w3.org/2000/01/rdf-schema#Class"),
            annotated("Person", RDFS_LABEL, "Person"),
            annotated("Person", RDFS_COMMENT, "A human\n   being"),
            typed("age", "http://www.w3.org/1999/02/22-rdf-syntax-ns#Property"),
            annotated("age", RDFS_LABEL, "age"),
        ];
        let terms = extract_terms(NS, &triples);
        assert_eq!(terms[0].label.as_deref(), Some("A human being"));
        assert_eq!(terms[1].label.as_deref(), Some("age"));
    }

    #[test]
    fn test_ignores_subjects_outside_namespace() {
        let triples = vec![Triple::new(
            named("http://elsewhere.org/Thing"),
            named(RDF_TYPE),
            named("http://www.w3.org/2000/01/rdf-schema#Class"),
        )];
        assert!(extract_terms(NS, &triples).is_empty());
    }

    #[test]
    fn test_case_insensitive_deduplication() {
        let triples = vec![
            typed("Thing", "http://www.w3.org/2000/01/rdf-schema#Class"),
            typed("thing", "http://www.w3.org/2002/07/owl#Class"),
        ];
        assert_eq!(extract_terms(NS, &triples).len(), 1);
    }

    #[test]
    fn test_term_equality_ignores_case() {
        let a = NamespaceTerm::new(NS, "Thing", None);
        let b = NamespaceTerm::new("HTTP://EXAMPLE.ORG/voc#", "thing", Some("x".to_string()));
        assert_eq!(a, b);
    }
}
