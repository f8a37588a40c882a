//! Whole-document scans run on structural changes
//!
//! These are regular expression passes, not a parser. They only need to find
//! declarations reliably enough to feed suggestion lists.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

use super::syntax::PrefixStyle;

/// A prefix declaration found in the document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixDeclaration {
    /// Declared prefix (empty for the default prefix)
    pub prefix: String,
    /// Namespace URI
    pub namespace_uri: String,
    /// Offset just past the declaration
    pub end_offset: usize,
}

const PREFIX_NAME: &str = r"(?:[\p{L}][\p{L}\p{N}_.\-]*)?";

static DIRECTIVE_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"@prefix\s+({PREFIX_NAME}):\s*<([^<>\s]*)>\s*\."))
        .expect("valid @prefix pattern")
});

static KEYWORD_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?m)(?:^|[^@\p{{L}}\p{{N}}_])(?i:prefix)\s+({PREFIX_NAME}):\s*<([^<>\s]*)>"
    ))
    .expect("valid PREFIX pattern")
});

static BLANK_NODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"_:([\p{L}\p{N}_](?:[\p{L}\p{N}_\-.]*[\p{L}\p{N}_\-])?)")
        .expect("valid blank node pattern")
});

static VARIABLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([?$])([\p{L}\p{N}_][\p{L}\p{N}_\x{00B7}]*)").expect("valid variable pattern")
});

/// Prefix declarations in document order
pub fn scan_prefixes(text: &str, style: PrefixStyle) -> Vec<PrefixDeclaration> {
    let patterns: Vec<&Regex> = match style {
        PrefixStyle::None => Vec::new(),
        PrefixStyle::Directive => vec![&*DIRECTIVE_PREFIX, &*KEYWORD_PREFIX],
        PrefixStyle::Keyword => vec![&*KEYWORD_PREFIX],
    };

    let mut declarations: Vec<PrefixDeclaration> = patterns
        .iter()
        .flat_map(|pattern| pattern.captures_iter(text))
        .filter_map(|captures| {
            let whole = captures.get(0)?;
            Some(PrefixDeclaration {
                prefix: captures.get(1)?.as_str().to_string(),
                namespace_uri: captures.get(2)?.as_str().to_string(),
                end_offset: whole.end(),
            })
        })
        .collect();

    declarations.sort_by_key(|d| d.end_offset);
    declarations
}

/// Blank node labels, including the `_:` marker
pub fn scan_blank_nodes(text: &str) -> BTreeSet<String> {
    BLANK_NODE
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Variable names (without sigil) introduced by one of `sigils`
pub fn scan_variables(text: &str, sigils: &[char]) -> BTreeSet<String> {
    if sigils.is_empty() {
        return BTreeSet::new();
    }
    VARIABLE
        .captures_iter(text)
        .filter(|captures| {
            captures
                .get(1)
                .and_then(|sigil| sigil.as_str().chars().next())
                .is_some_and(|sigil| sigils.contains(&sigil))
        })
        .filter_map(|captures| captures.get(2).map(|name| name.as_str().to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_directive_prefixes() {
        let text = "@prefix ex: <http://example.org/> .\n@prefix : <http://default/>.\nex:a ex:b ex:c .";
        let found = scan_prefixes(text, PrefixStyle::Directive);

        assert_eq!(found.len(), 2);
        assert_eq!(found[0].prefix, "ex");
        assert_eq!(found[0].namespace_uri, "http://example.org/");
        assert_eq!(found[0].end_offset, 35);
        assert_eq!(found[1].prefix, "");
    }

    #[test]
    fn test_turtle_accepts_sparql_style_prefix() {
        let text = "PREFIX foaf: <http://xmlns.com/foaf/0.1/>\n@prefix ex: <http://example.org/> .";
        let found = scan_prefixes(text, PrefixStyle::Directive);
        let prefixes: Vec<&str> = found.iter().map(|d| d.prefix.as_str()).collect();
        assert_eq!(prefixes, vec!["foaf", "ex"]);
    }

    #[test]
    fn test_sparql_prefix_is_case_insensitive() {
        let text = "prefix ex: <http://example.org/>\nSELECT * WHERE { ?s ?p ?o }";
        let found = scan_prefixes(text, PrefixStyle::Keyword);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].end_offset, 32);
    }

    #[test]
    fn test_no_prefixes_without_style() {
        assert!(scan_prefixes("@prefix ex: <http://example.org/> .", PrefixStyle::None).is_empty());
    }

    #[test]
    fn test_scan_blank_nodes() {
        let labels = scan_blank_nodes("_:b1 <p> _:autos3 .\n_:b1 <q> _:x.");
        let labels: Vec<&str> = labels.iter().map(String::as_str).collect();
        assert_eq!(labels, vec!["_:autos3", "_:b1", "_:x"]);
    }

    #[test]
    fn test_scan_variables() {
        let text = "SELECT ?name $age WHERE { ?person ?p ?name }";
        let sparql = scan_variables(text, &['?', '$']);
        assert_eq!(sparql.len(), 4);
        assert!(sparql.contains("age"));

        let n3 = scan_variables(text, &['?']);
        assert!(!n3.contains("age"));
        assert!(scan_variables(text, &[]).is_empty());
    }
}
