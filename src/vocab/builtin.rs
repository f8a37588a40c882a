//! Well-known vocabularies offered as ready-made prefix declarations

use serde::Serialize;

/// A vocabulary the completion engine knows about without reading the document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VocabularyDefinition {
    /// Conventional prefix
    pub prefix: &'static str,
    /// Namespace URI
    pub namespace_uri: &'static str,
    /// Human readable title
    pub description: &'static str,
}

impl VocabularyDefinition {
    /// Turtle / Notation3 declaration line
    pub fn turtle_declaration(&self) -> String {
        format!("@prefix {}: <{}> .", self.prefix, self.namespace_uri)
    }

    /// SPARQL prologue line
    pub fn sparql_declaration(&self) -> String {
        format!("PREFIX {}: <{}>", self.prefix, self.namespace_uri)
    }
}

const fn vocabulary(
    prefix: &'static str,
    namespace_uri: &'static str,
    description: &'static str,
) -> VocabularyDefinition {
    VocabularyDefinition {
        prefix,
        namespace_uri,
        description,
    }
}

/// Built-in vocabularies, sorted by prefix
pub const BUILTIN_VOCABULARIES: &[VocabularyDefinition] = &[
    vocabulary(
        "dc",
        "http://purl.org/dc/elements/1.1/",
        "Dublin Core Metadata Element Set",
    ),
    vocabulary("dcat", "http://www.w3.org/ns/dcat#", "Data Catalog Vocabulary"),
    vocabulary("dcterms", "http://purl.org/dc/terms/", "DCMI Metadata Terms"),
    vocabulary("foaf", "http://xmlns.com/foaf/0.1/", "Friend of a Friend"),
    vocabulary(
        "geo",
        "http://www.w3.org/2003/01/geo/wgs84_pos#",
        "WGS84 Geo Positioning",
    ),
    vocabulary("owl", "http://www.w3.org/2002/07/owl#", "Web Ontology Language"),
    vocabulary("prov", "http://www.w3.org/ns/prov#", "Provenance Ontology"),
    vocabulary(
        "rdf",
        "http://www.w3.org/1999/02/22-rdf-syntax-ns#",
        "RDF Vocabulary",
    ),
    vocabulary("rdfs", "http://www.w3.org/2000/01/rdf-schema#", "RDF Schema"),
    vocabulary("sioc", "http://rdfs.org/sioc/ns#", "Semantically-Interlinked Online Communities"),
    vocabulary(
        "skos",
        "http://www.w3.org/2004/02/skos/core#",
        "Simple Knowledge Organization System",
    ),
    vocabulary("vann", "http://purl.org/vocab/vann/", "Vocabulary for Annotating Vocabulary Descriptions"),
    vocabulary("void", "http://rdfs.org/ns/void#", "Vocabulary of Interlinked Datasets"),
    vocabulary(
        "vs",
        "http://www.w3.org/2003/06/sw-vocab-status/ns#",
        "Term-centric Semantic Web Vocabulary Annotations",
    ),
    vocabulary("xsd", "http://www.w3.org/2001/XMLSchema#", "XML Schema Datatypes"),
];

/// Look up a built-in vocabulary by prefix
pub fn by_prefix(prefix: &str) -> Option<&'static VocabularyDefinition> {
    BUILTIN_VOCABULARIES.iter().find(|v| v.prefix == prefix)
}

/// Look up a built-in vocabulary by namespace URI
pub fn by_namespace(namespace_uri: &str) -> Option<&'static VocabularyDefinition> {
    BUILTIN_VOCABULARIES
        .iter()
        .find(|v| v.namespace_uri == namespace_uri)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtins_sorted_and_unique() {
        let prefixes: Vec<&str> = BUILTIN_VOCABULARIES.iter().map(|v| v.prefix).collect();
        let mut sorted = prefixes.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(prefixes, sorted);
    }

    #[test]
    fn test_lookup() {
        assert_eq!(
            by_prefix("rdfs").map(|v| v.namespace_uri),
            Some("http://www.w3.org/2000/01/rdf-schema#")
        );
        assert_eq!(
            by_namespace("http://xmlns.com/foaf/0.1/").map(|v| v.prefix),
            Some("foaf")
        );
        assert!(by_prefix("nope").is_none());
    }

    #[test]
    fn test_declarations() {
        let rdf = by_prefix("rdf").unwrap();
        assert_eq!(
            rdf.turtle_declaration(),
            "@prefix rdf: <http://www.w3.org/1999/02/22-rdf-syntax-ns#> ."
        );
        assert_eq!(
            rdf.sparql_declaration(),
            "PREFIX rdf: <http://www.w3.org/1999/02/22-rdf-syntax-ns#>"
        );
    }
}
