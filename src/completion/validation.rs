//! Validity predicates for partially typed tokens
//!
//! Character classes follow the Turtle and SPARQL grammars (`PN_CHARS_BASE`,
//! `PN_CHARS_U`, `PN_CHARS`). The `is_valid_partial_*` functions accept any text
//! that can still grow into a valid token.

use std::sync::LazyLock;

use regex::Regex;

/// `PN_CHARS_BASE`
pub fn is_name_start_char(c: char) -> bool {
    matches!(c,
        'A'..='Z'
        | 'a'..='z'
        | '\u{00C0}'..='\u{00D6}'
        | '\u{00D8}'..='\u{00F6}'
        | '\u{00F8}'..='\u{02FF}'
        | '\u{0370}'..='\u{037D}'
        | '\u{037F}'..='\u{1FFF}'
        | '\u{200C}'..='\u{200D}'
        | '\u{2070}'..='\u{218F}'
        | '\u{2C00}'..='\u{2FEF}'
        | '\u{3001}'..='\u{D7FF}'
        | '\u{F900}'..='\u{FDCF}'
        | '\u{FDF0}'..='\u{FFFD}'
        | '\u{10000}'..='\u{EFFFF}')
}

/// `PN_CHARS_U`
pub fn is_name_start_or_underscore(c: char) -> bool {
    c == '_' || is_name_start_char(c)
}

/// `PN_CHARS`
pub fn is_name_char(c: char) -> bool {
    is_name_start_or_underscore(c)
        || c == '-'
        || c.is_ascii_digit()
        || c == '\u{00B7}'
        || ('\u{0300}'..='\u{036F}').contains(&c)
        || ('\u{203F}'..='\u{2040}').contains(&c)
}

/// Characters that may appear anywhere inside a qualified name being typed
pub fn is_qname_char(c: char) -> bool {
    is_name_char(c) || matches!(c, ':' | '.' | '%' | '\\')
}

/// Partial prefix name: a name start character followed by name characters or dots
fn is_partial_prefix_name(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        None => true,
        Some(first) if is_name_start_char(first) => chars.all(|c| is_name_char(c) || c == '.'),
        Some(_) => false,
    }
}

/// Partial local name, allowing `%XX` and `\` escapes to be in progress
fn is_partial_local_name(text: &str) -> bool {
    let mut chars = text.chars();
    let first_ok = match chars.next() {
        None => return true,
        Some(first) => {
            is_name_start_or_underscore(first)
                || first.is_ascii_digit()
                || matches!(first, ':' | '%' | '\\')
        }
    };
    first_ok && chars.all(|c| is_name_char(c) || matches!(c, '.' | ':' | '%' | '\\'))
}

/// Check whether `text` can still become a qualified name (`prefix:local`)
pub fn is_valid_partial_qname(text: &str) -> bool {
    if text.is_empty() {
        return false;
    }
    match text.split_once(':') {
        Some((prefix, local)) => is_partial_prefix_name(prefix) && is_partial_local_name(local),
        None => is_partial_prefix_name(text),
    }
}

/// Check whether `text` can still become a blank node label
///
/// The text must be non-empty and start with `_:` once it is two characters
/// long. The first character of the label is neither a digit, `-` nor `_`.
pub fn is_valid_partial_blank_node(text: &str) -> bool {
    let Some(rest) = text.strip_prefix('_') else {
        return false;
    };
    if rest.is_empty() {
        return true;
    }
    let Some(label) = rest.strip_prefix(':') else {
        return false;
    };
    let mut chars = label.chars();
    match chars.next() {
        None => true,
        Some(first) if first.is_ascii_digit() || first == '-' || first == '_' => false,
        Some(first) if is_name_start_char(first) => chars.all(|c| is_name_char(c) || c == '.'),
        Some(_) => false,
    }
}

/// Check whether `text` can still become a variable opened by `sigil`
///
/// The first character after the sigil is a digit or a name start character;
/// the following ones are name characters or `.`.
pub fn is_valid_partial_variable(text: &str, sigil: char) -> bool {
    let Some(name) = text.strip_prefix(sigil) else {
        return false;
    };
    let mut chars = name.chars();
    match chars.next() {
        None => true,
        Some(first) if is_name_start_or_underscore(first) || first.is_ascii_digit() => {
            chars.all(|c| is_name_char(c) || c == '.')
        }
        Some(_) => false,
    }
}

static PREFIX_DECLARATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^@prefix\s+(?:[\p{L}][\p{L}\p{N}_.\-]*)?:\s*<[^<>"{}|^`\\\s]*>\s*\.$"#)
        .expect("valid prefix declaration pattern")
});

static BASE_DECLARATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^@base\s+<[^<>"{}|^`\\\s]*>\s*\.$"#).expect("valid base declaration pattern")
});

/// Check whether `text` is a complete `@prefix p: <uri> .` directive
pub fn is_valid_prefix_declaration(text: &str) -> bool {
    PREFIX_DECLARATION.is_match(text)
}

/// Check whether `text` is a complete `@base <uri> .` directive
pub fn is_valid_base_declaration(text: &str) -> bool {
    BASE_DECLARATION.is_match(text)
}

/// Count the backslashes directly before `offset`
///
/// A character is escaped when this number is odd.
pub fn preceding_backslashes(text: &str, offset: usize) -> usize {
    text.as_bytes()
        .get(..offset)
        .map(|before| before.iter().rev().take_while(|b| **b == b'\\').count())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_qname() {
        assert!(is_valid_partial_qname("ex"));
        assert!(is_valid_partial_qname("ex:"));
        assert!(is_valid_partial_qname(":"));
        assert!(is_valid_partial_qname("ex:Per"));
        assert!(is_valid_partial_qname("ex:1st"));
        assert!(is_valid_partial_qname("ex:a.b"));
        assert!(is_valid_partial_qname("ex:caf%C3"));
        assert!(!is_valid_partial_qname(""));
        assert!(!is_valid_partial_qname("1ex:a"));
        assert!(!is_valid_partial_qname("ex:a b"));
        assert!(!is_valid_partial_qname("ex:<"));
    }

    #[test]
    fn test_partial_blank_node() {
        assert!(is_valid_partial_blank_node("_"));
        assert!(is_valid_partial_blank_node("_:"));
        assert!(is_valid_partial_blank_node("_:b"));
        assert!(is_valid_partial_blank_node("_:b1-x"));
        assert!(!is_valid_partial_blank_node(""));
        assert!(!is_valid_partial_blank_node("_x"));
        assert!(!is_valid_partial_blank_node("_:1"));
        assert!(!is_valid_partial_blank_node("_:-a"));
        assert!(!is_valid_partial_blank_node("_:_a"));
        assert!(!is_valid_partial_blank_node("_:a b"));
    }

    #[test]
    fn test_partial_variable() {
        assert!(is_valid_partial_variable("?", '?'));
        assert!(is_valid_partial_variable("?x", '?'));
        assert!(is_valid_partial_variable("?x1", '?'));
        assert!(is_valid_partial_variable("?1", '?'));
        assert!(is_valid_partial_variable("$name", '$'));
        assert!(!is_valid_partial_variable("?-x", '?'));
        assert!(!is_valid_partial_variable("$x", '?'));
        assert!(!is_valid_partial_variable("?x!", '?'));
    }

    #[test]
    fn test_full_declarations() {
        assert!(is_valid_prefix_declaration("@prefix ex: <http://example.org/> ."));
        assert!(is_valid_prefix_declaration("@prefix : <http://example.org/>."));
        assert!(!is_valid_prefix_declaration("@prefix ex: <http://example.org/"));
        assert!(!is_valid_prefix_declaration("@prefix ex <http://example.org/> ."));
        assert!(is_valid_base_declaration("@base <http://example.org/> ."));
        assert!(!is_valid_base_declaration("@base <http://example .org/> ."));
    }

    #[test]
    fn test_preceding_backslashes() {
        let text = r#"a\"b\\"c"#;
        assert_eq!(preceding_backslashes(text, 2), 1);
        assert_eq!(preceding_backslashes(text, 6), 2);
        assert_eq!(preceding_backslashes(text, 0), 0);
        assert_eq!(preceding_backslashes(text, 100), 0);
    }
}
