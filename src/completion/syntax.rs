//! Per-syntax behaviour of the completion engine
//!
//! Every supported syntax is served by the same state machine. What differs
//! between them (which tokens open a session, which keywords exist, how prefixes
//! are declared) is captured by a [`SyntaxProfile`].

/// How a syntax declares namespace prefixes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefixStyle {
    /// No prefixes at all (N-Triples)
    None,
    /// `@prefix p: <uri> .` directives, with `PREFIX p: <uri>` also recognised
    Directive,
    /// `PREFIX p: <uri>` keywords only
    Keyword,
}

/// Capabilities of one syntax
#[derive(Debug)]
pub struct SyntaxProfile {
    /// Registry key
    pub name: &'static str,
    /// Words that may follow `@` in a directive
    pub directives: &'static [&'static str],
    /// Keyword tables, all of which apply
    pub keywords: &'static [&'static [&'static str]],
    /// Keywords match regardless of case
    pub case_insensitive_keywords: bool,
    /// Prefix declaration style
    pub prefix_style: PrefixStyle,
    /// `"""` long literals exist
    pub long_literals: bool,
    /// `'` delimits literals as well
    pub alternate_quote: bool,
    /// Characters opening a variable
    pub variable_sigils: &'static [char],
}

impl SyntaxProfile {
    /// Qualified names can be written
    pub fn has_qnames(&self) -> bool {
        self.prefix_style != PrefixStyle::None
    }

    /// `@` starts a directive
    pub fn has_directives(&self) -> bool {
        !self.directives.is_empty()
    }

    /// The syntax has variables
    pub fn has_variables(&self) -> bool {
        !self.variable_sigils.is_empty()
    }

    /// Check whether `c` opens a variable
    pub fn is_variable_sigil(&self, c: char) -> bool {
        self.variable_sigils.contains(&c)
    }

    /// All keywords in table order
    pub fn keywords(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.keywords.iter().flat_map(|table| table.iter().copied())
    }

    /// Check whether `text` is the beginning of some keyword
    pub fn is_partial_keyword(&self, text: &str) -> bool {
        !text.is_empty()
            && self
                .keywords()
                .any(|keyword| self.keyword_starts_with(keyword, text))
    }

    /// Check whether `keyword` begins with `text`, honouring keyword case rules
    pub fn keyword_starts_with(&self, keyword: &str, text: &str) -> bool {
        keyword.len() >= text.len()
            && keyword.is_char_boundary(text.len())
            && self.keyword_eq(&keyword[..text.len()], text)
    }

    /// Check whether `text` is exactly a keyword
    pub fn is_keyword(&self, text: &str) -> bool {
        self.keywords().any(|keyword| self.keyword_eq(keyword, text))
    }

    fn keyword_eq(&self, a: &str, b: &str) -> bool {
        if self.case_insensitive_keywords {
            a.eq_ignore_ascii_case(b)
        } else {
            a == b
        }
    }
}

const TURTLE_DIRECTIVES: &[&str] = &["base", "prefix"];

const NOTATION3_DIRECTIVES: &[&str] = &["base", "forAll", "forSome", "keywords", "prefix"];

const TURTLE_KEYWORDS: &[&str] = &["a", "false", "true"];

const NOTATION3_KEYWORDS: &[&str] = &["a", "false", "has", "is", "of", "true"];

const SPARQL_10_KEYWORDS: &[&str] = &[
    "a", "ASC", "ASK", "BASE", "BY", "CONSTRUCT", "DESC", "DESCRIBE", "DISTINCT", "false",
    "FILTER", "FROM", "GRAPH", "LIMIT", "NAMED", "OFFSET", "OPTIONAL", "ORDER", "PREFIX",
    "REDUCED", "SELECT", "true", "UNION", "WHERE",
];

const SPARQL_10_FUNCTIONS: &[&str] = &[
    "BOUND", "DATATYPE", "isBLANK", "isIRI", "isLITERAL", "isURI", "LANG", "LANGMATCHES",
    "REGEX", "sameTerm", "STR",
];

const SPARQL_11_KEYWORDS: &[&str] = &[
    "AS", "BIND", "EXISTS", "GROUP", "HAVING", "IN", "MINUS", "NOT", "SEPARATOR", "SERVICE",
    "SILENT", "UNDEF", "VALUES",
];

const SPARQL_11_FUNCTIONS: &[&str] = &[
    "ABS", "AVG", "BNODE", "CEIL", "COALESCE", "CONCAT", "CONTAINS", "COUNT", "DAY",
    "ENCODE_FOR_URI", "FLOOR", "GROUP_CONCAT", "HOURS", "IF", "IRI", "isNUMERIC", "LCASE",
    "MAX", "MD5", "MIN", "MINUTES", "MONTH", "NOW", "RAND", "REPLACE", "ROUND", "SAMPLE",
    "SECONDS", "SHA1", "SHA256", "SHA384", "SHA512", "STRAFTER", "STRBEFORE", "STRDT",
    "STRENDS", "STRLANG", "STRLEN", "STRSTARTS", "STRUUID", "SUBSTR", "SUM", "TIMEZONE", "TZ",
    "UCASE", "URI", "UUID", "YEAR",
];

const SPARQL_UPDATE_KEYWORDS: &[&str] = &[
    "ADD", "ALL", "CLEAR", "COPY", "CREATE", "DATA", "DEFAULT", "DELETE", "DROP", "INSERT",
    "INTO", "LOAD", "MOVE", "TO", "USING", "WITH",
];

/// N-Triples: absolute URIs, blank nodes and short literals only
pub static NTRIPLES: SyntaxProfile = SyntaxProfile {
    name: "NTriples",
    directives: &[],
    keywords: &[],
    case_insensitive_keywords: false,
    prefix_style: PrefixStyle::None,
    long_literals: false,
    alternate_quote: false,
    variable_sigils: &[],
};

/// Turtle
pub static TURTLE: SyntaxProfile = SyntaxProfile {
    name: "Turtle",
    directives: TURTLE_DIRECTIVES,
    keywords: &[TURTLE_KEYWORDS],
    case_insensitive_keywords: false,
    prefix_style: PrefixStyle::Directive,
    long_literals: true,
    alternate_quote: false,
    variable_sigils: &[],
};

/// Notation3: Turtle plus extra directives, keywords and `?` quick variables
pub static NOTATION3: SyntaxProfile = SyntaxProfile {
    name: "Notation3",
    directives: NOTATION3_DIRECTIVES,
    keywords: &[NOTATION3_KEYWORDS],
    case_insensitive_keywords: false,
    prefix_style: PrefixStyle::Directive,
    long_literals: true,
    alternate_quote: false,
    variable_sigils: &['?'],
};

/// SPARQL 1.0 query
pub static SPARQL_QUERY_10: SyntaxProfile = SyntaxProfile {
    name: "SparqlQuery10",
    directives: &[],
    keywords: &[SPARQL_10_KEYWORDS, SPARQL_10_FUNCTIONS],
    case_insensitive_keywords: true,
    prefix_style: PrefixStyle::Keyword,
    long_literals: true,
    alternate_quote: true,
    variable_sigils: &['?', '$'],
};

/// SPARQL 1.1 query
pub static SPARQL_QUERY_11: SyntaxProfile = SyntaxProfile {
    name: "SparqlQuery11",
    directives: &[],
    keywords: &[
        SPARQL_10_KEYWORDS,
        SPARQL_10_FUNCTIONS,
        SPARQL_11_KEYWORDS,
        SPARQL_11_FUNCTIONS,
    ],
    case_insensitive_keywords: true,
    prefix_style: PrefixStyle::Keyword,
    long_literals: true,
    alternate_quote: true,
    variable_sigils: &['?', '$'],
};

/// SPARQL 1.1 update
pub static SPARQL_UPDATE_11: SyntaxProfile = SyntaxProfile {
    name: "SparqlUpdate11",
    directives: &[],
    keywords: &[
        SPARQL_10_KEYWORDS,
        SPARQL_10_FUNCTIONS,
        SPARQL_11_KEYWORDS,
        SPARQL_11_FUNCTIONS,
        SPARQL_UPDATE_KEYWORDS,
    ],
    case_insensitive_keywords: true,
    prefix_style: PrefixStyle::Keyword,
    long_literals: true,
    alternate_quote: true,
    variable_sigils: &['?', '$'],
};

/// Every built-in profile
pub static PROFILES: &[&SyntaxProfile] = &[
    &NTRIPLES,
    &TURTLE,
    &NOTATION3,
    &SPARQL_QUERY_10,
    &SPARQL_QUERY_11,
    &SPARQL_UPDATE_11,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_keyword_case_sensitivity() {
        assert!(TURTLE.is_partial_keyword("tr"));
        assert!(!TURTLE.is_partial_keyword("TR"));
        assert!(SPARQL_QUERY_11.is_partial_keyword("sel"));
        assert!(SPARQL_QUERY_11.is_partial_keyword("SeLeCt"));
        assert!(!SPARQL_QUERY_11.is_partial_keyword("selects"));
        assert!(!TURTLE.is_partial_keyword(""));
    }

    #[test]
    fn test_keyword_starts_with() {
        assert!(TURTLE.keyword_starts_with("true", "tr"));
        assert!(!TURTLE.keyword_starts_with("true", "Tr"));
        assert!(SPARQL_QUERY_11.keyword_starts_with("SELECT", "sel"));
        assert!(!SPARQL_QUERY_11.keyword_starts_with("ASK", "asked"));
        assert!(TURTLE.keyword_starts_with("a", ""));
    }

    #[test]
    fn test_versioned_keyword_tables() {
        assert!(SPARQL_QUERY_11.is_keyword("bind"));
        assert!(!SPARQL_QUERY_10.is_keyword("BIND"));
        assert!(SPARQL_UPDATE_11.is_keyword("INSERT"));
        assert!(!SPARQL_QUERY_11.is_keyword("INSERT"));
    }

    #[test]
    fn test_capabilities() {
        assert!(!NTRIPLES.has_qnames());
        assert!(!NTRIPLES.has_directives());
        assert!(TURTLE.has_directives());
        assert!(!SPARQL_QUERY_10.has_directives());
        assert!(NOTATION3.is_variable_sigil('?'));
        assert!(!NOTATION3.is_variable_sigil('$'));
        assert!(SPARQL_QUERY_10.is_variable_sigil('$'));
    }

    #[test]
    fn test_profile_names_are_unique() {
        let mut names: Vec<&str> = PROFILES.iter().map(|p| p.name).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), PROFILES.len());
    }
}
