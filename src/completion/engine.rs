//! The incremental completion state machine
//!
//! The host reports every insertion. From that single character and the
//! document around the caret the machine decides whether a completion session
//! opens, continues or ends. Whole-document scans only happen in
//! [`CompletionStateMachine::detect_state`], which the host calls on structural
//! changes.

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::{debug, trace};

use super::CompletionState;
use super::blank_node::BlankNodeIdAllocator;
use super::host::EditorHost;
use super::item::{CompletionItem, CompletionKind};
use super::scan;
use super::syntax::{PrefixStyle, SyntaxProfile};
use super::validation::{
    is_name_start_char, is_qname_char, is_valid_base_declaration, is_valid_partial_blank_node,
    is_valid_partial_qname, is_valid_partial_variable, is_valid_prefix_declaration,
    preceding_backslashes,
};
use crate::error::{BufferError, Result};
use crate::namespace::OffsetScopedNamespaceMap;
use crate::vocab::{BUILTIN_VOCABULARIES, TermIndex};

/// Punctuation that does not end a blank node label
const BLANK_NODE_PUNCTUATION: &[char] = &['_', '-', ':'];

/// Punctuation that does not end a keyword or qualified name
const NAME_PUNCTUATION: &[char] = &['_', '-', ':', '.', '%', '\\'];

/// Punctuation that does not end a variable
const VARIABLE_PUNCTUATION: &[char] = &['_', '-'];

/// What the host reported as inserted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Insertion {
    /// A single character (newline sequences are folded into `'\n'`)
    Key(Key),
    /// Empty text: something was deleted
    Deletion,
    /// Several characters at once
    Paste,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Key {
    ch: char,
    /// Bytes the insertion occupies in the document
    len: usize,
}

impl Insertion {
    fn classify(text: &str) -> Self {
        match text {
            "" => Insertion::Deletion,
            "\n" | "\r\n" | "\r" => Insertion::Key(Key {
                ch: '\n',
                len: text.len(),
            }),
            _ => {
                let mut chars = text.chars();
                match (chars.next(), chars.next()) {
                    (Some(ch), None) => Insertion::Key(Key {
                        ch,
                        len: text.len(),
                    }),
                    _ => Insertion::Paste,
                }
            }
        }
    }
}

/// Whitespace, or ASCII punctuation not listed in `allowed`
fn is_terminator(c: char, allowed: &[char]) -> bool {
    c.is_whitespace() || (c.is_ascii_punctuation() && !allowed.contains(&c))
}

/// Completion state machine for one open document
pub struct CompletionStateMachine {
    /// Syntax specific behaviour
    profile: &'static SyntaxProfile,
    /// Shared vocabulary term cache
    terms: Arc<TermIndex>,
    state: CompletionState,
    last_completion: CompletionState,
    temporary_state: CompletionState,
    /// Offset where the current session's token starts
    start_offset: usize,
    /// Sigil that opened the current variable session
    variable_sigil: char,
    /// The pending accepted suggestion declares a namespace
    inserted_declaration: bool,
    /// Ask the term index to load namespaces as they are discovered
    auto_load_terms: bool,
    namespaces: OffsetScopedNamespaceMap,
    blank_nodes: BTreeSet<String>,
    blank_node_ids: BlankNodeIdAllocator,
    variables: BTreeSet<String>,
}

impl CompletionStateMachine {
    /// Create a machine for `profile` backed by the shared term index
    pub fn new(profile: &'static SyntaxProfile, terms: Arc<TermIndex>) -> Self {
        let mut namespaces = OffsetScopedNamespaceMap::new();
        namespaces.set_listener(|event| trace!("Namespace map: {:?}", event));

        Self {
            profile,
            terms,
            state: CompletionState::None,
            last_completion: CompletionState::None,
            temporary_state: CompletionState::None,
            start_offset: 0,
            variable_sigil: '?',
            inserted_declaration: false,
            auto_load_terms: true,
            namespaces,
            blank_nodes: BTreeSet::new(),
            blank_node_ids: BlankNodeIdAllocator::new(),
            variables: BTreeSet::new(),
        }
    }

    /// Enable or disable background term loading for discovered namespaces
    pub fn set_auto_load_terms(&mut self, enabled: bool) {
        self.auto_load_terms = enabled;
    }

    /// Syntax this machine completes
    pub fn profile(&self) -> &'static SyntaxProfile {
        self.profile
    }

    /// Current state
    pub fn state(&self) -> CompletionState {
        self.state
    }

    /// Most recently closed state
    pub fn last_completion(&self) -> CompletionState {
        self.last_completion
    }

    /// Speculative state awaiting promotion
    pub fn temporary_state(&self) -> CompletionState {
        self.temporary_state
    }

    /// Start of the current session window
    pub fn start_offset(&self) -> usize {
        self.start_offset
    }

    /// Check whether completion is enabled
    pub fn is_enabled(&self) -> bool {
        self.state != CompletionState::Disabled
    }

    /// Enable or disable completion
    ///
    /// Disabling drops any open session; enabling starts over from `None`.
    pub fn set_enabled(&mut self, enabled: bool) {
        match (enabled, self.state) {
            (false, _) => {
                self.state = CompletionState::Disabled;
                self.temporary_state = CompletionState::None;
            }
            (true, CompletionState::Disabled) => self.state = CompletionState::None,
            (true, _) => {}
        }
    }

    /// Namespace bindings found by the last [`detect_state`](Self::detect_state)
    pub fn namespaces(&self) -> &OffsetScopedNamespaceMap {
        &self.namespaces
    }

    /// Blank node labels known so far, with their `_:` marker
    pub fn blank_nodes(&self) -> &BTreeSet<String> {
        &self.blank_nodes
    }

    /// Variable names found by the last scan
    pub fn variables(&self) -> &BTreeSet<String> {
        &self.variables
    }

    /// Signed length of the session window; negative once the caret left the token
    pub fn session_length(&self, host: &dyn EditorHost) -> isize {
        host.caret_offset() as isize - self.start_offset as isize
    }

    /// Text from the session start to the caret
    pub fn current_text<'h>(&self, host: &'h dyn EditorHost) -> Result<&'h str> {
        let caret = host.caret_offset();
        if caret < self.start_offset {
            return Err(BufferError::CaretBeforeSession {
                start: self.start_offset,
                caret,
            }
            .into());
        }
        Ok(host.text_range(self.start_offset, caret - self.start_offset)?)
    }

    /// React to text the host just inserted
    ///
    /// `inserted` is normally a single character. An empty string reports a
    /// deletion, a newline sequence counts as one character, anything longer is
    /// treated as a paste and ends the session. Failures never reach the host:
    /// they end the session and reset the machine.
    pub fn try_auto_complete(&mut self, host: &mut dyn EditorHost, inserted: &str) {
        match self.state {
            CompletionState::Disabled => return,
            CompletionState::Inserted => {
                self.finish_insertion(host);
                return;
            }
            _ => {}
        }

        let selecting = host.selection().is_some_and(|(start, end)| start != end);
        let result = match Insertion::classify(inserted) {
            Insertion::Paste => {
                debug!("Multi-character insertion, ending {:?} session", self.state);
                self.abort(host);
                Ok(())
            }
            _ if selecting => {
                self.abort(host);
                Ok(())
            }
            Insertion::Deletion => self.revalidate(host),
            Insertion::Key(key) => self.dispatch(host, key),
        };

        if let Err(e) = result {
            debug!("Completion aborted: {}", e);
            self.abort(host);
        }
    }

    /// Tell the machine the host wrote an accepted suggestion into the document
    ///
    /// The next [`try_auto_complete`](Self::try_auto_complete) call, which
    /// reports that insertion, is consumed without classification.
    pub fn on_suggestion_inserted(&mut self, kind: CompletionKind) {
        if self.state == CompletionState::Disabled {
            return;
        }
        if self.state != CompletionState::None {
            self.last_completion = self.state;
        }
        self.state = CompletionState::Inserted;
        self.temporary_state = CompletionState::None;
        self.inserted_declaration = kind.is_declaration();
    }

    /// Rebuild namespace bindings, blank node labels and variables from the document
    ///
    /// The character level state is left untouched.
    pub fn detect_state(&mut self, host: &dyn EditorHost) {
        if self.state == CompletionState::Disabled {
            return;
        }

        let text = host.document_text();
        self.rescan_namespaces(text);
        self.rescan_blank_nodes(text);
        if self.profile.has_variables() {
            self.rescan_variables(text);
        }

        debug!(
            "Detected {} prefixes, {} blank nodes, {} variables",
            self.namespaces.len(),
            self.blank_nodes.len(),
            self.variables.len()
        );
    }

    fn finish_insertion(&mut self, host: &mut dyn EditorHost) {
        self.state = CompletionState::None;
        if std::mem::take(&mut self.inserted_declaration) {
            self.detect_state(host);
        }
    }

    fn dispatch(&mut self, host: &mut dyn EditorHost, key: Key) -> Result<()> {
        use CompletionState::*;

        if self.state == None {
            return self.open(host, key);
        }

        if self.session_length(host) < 0 {
            debug!("Caret left the {:?} session", self.state);
            self.abort(host);
            return self.open(host, key);
        }

        match self.state {
            Literal | AlternateLiteral => self.continue_literal(host, key),
            LongLiteral | AlternateLongLiteral => self.continue_long_literal(host),
            Uri => self.continue_uri(host, key),
            BNode => self.continue_blank_node(host, key),
            KeywordOrQName | QName => self.continue_name(host, key),
            Declaration => self.continue_declaration(host),
            Prefix => self.continue_prefix(host, key),
            Base => self.continue_base(host, key),
            Comment => {
                if key.ch == '\n' {
                    self.close(host);
                }
                Ok(())
            }
            Variable => self.continue_variable(host, key),
            None | Disabled | Inserted => Ok(()),
        }
    }

    /* ----------------------------- openers ----------------------------- */

    fn open(&mut self, host: &mut dyn EditorHost, key: Key) -> Result<()> {
        let caret = host.caret_offset();
        let start = caret.checked_sub(key.len).ok_or(BufferError::OutOfRange {
            offset: caret,
            length: key.len,
        })?;
        let profile = self.profile;

        match key.ch {
            '@' if profile.has_directives()
                && preceding_char(host, start).is_none_or(char::is_whitespace) =>
            {
                let items = self.declaration_items();
                self.begin(host, CompletionState::Declaration, start, items);
            }
            '"' => self.open_literal(host, CompletionState::Literal, start),
            '\'' if profile.alternate_quote => {
                self.open_literal(host, CompletionState::AlternateLiteral, start)
            }
            '<' => {
                let items = self.uri_items(caret);
                self.begin(host, CompletionState::Uri, start, items);
            }
            '#' => self.begin(host, CompletionState::Comment, start, Vec::new()),
            c if profile.is_variable_sigil(c) => {
                self.variable_sigil = c;
                let items = self.variable_items();
                self.begin(host, CompletionState::Variable, start, items);
            }
            '_' if !preceding_char(host, start).is_some_and(is_qname_char) => {
                let items = self.blank_node_items();
                self.begin(host, CompletionState::BNode, start, items);
            }
            ':' if profile.has_qnames() => self.open_name(host, caret, CompletionState::QName)?,
            c if is_name_start_char(c) => {
                self.open_name(host, caret, CompletionState::KeywordOrQName)?
            }
            _ => {}
        }
        Ok(())
    }

    fn open_literal(&mut self, host: &mut dyn EditorHost, state: CompletionState, start: usize) {
        if preceding_backslashes(host.document_text(), start) % 2 == 1 {
            trace!("Escaped quote at {}", start);
            return;
        }
        self.begin(host, state, start, Vec::new());
    }

    /// Open a name session, backtracking over the part of the token already typed
    fn open_name(
        &mut self,
        host: &mut dyn EditorHost,
        caret: usize,
        target: CompletionState,
    ) -> Result<()> {
        let text = host.document_text();
        let before = text.get(..caret).ok_or(BufferError::OutOfRange {
            offset: 0,
            length: caret,
        })?;

        let mut token_start = caret;
        for (index, c) in before.char_indices().rev() {
            if !is_qname_char(c) {
                break;
            }
            token_start = index;
        }
        let token = &before[token_start..];
        token_start += token
            .find(|c: char| c == '_' || c == ':' || is_name_start_char(c))
            .unwrap_or(token.len());

        let token = before[token_start..].to_string();
        let preceding = before[..token_start].chars().next_back();
        let profile = self.profile;

        match preceding {
            Some(sigil) if profile.is_variable_sigil(sigil) => {
                if is_valid_partial_variable(&format!("{sigil}{token}"), sigil) {
                    self.variable_sigil = sigil;
                    let items = self.variable_items();
                    self.begin(
                        host,
                        CompletionState::Variable,
                        token_start - sigil.len_utf8(),
                        items,
                    );
                }
                return Ok(());
            }
            // Language tag
            Some('@') => return Ok(()),
            _ => {}
        }

        if token.starts_with("_:") {
            if is_valid_partial_blank_node(&token) {
                let items = self.blank_node_items();
                self.begin(host, CompletionState::BNode, token_start, items);
            }
            return Ok(());
        }

        let qname = profile.has_qnames() && is_valid_partial_qname(&token);
        match target {
            CompletionState::QName if qname => {
                let items = self.qname_items(caret);
                self.begin(host, CompletionState::QName, token_start, items);
            }
            CompletionState::KeywordOrQName if qname || profile.is_partial_keyword(&token) => {
                let mut items = self.keyword_items(&token);
                items.extend(self.qname_items(caret));
                self.begin(host, CompletionState::KeywordOrQName, token_start, items);
            }
            _ => trace!("'{}' does not start a name", token),
        }
        Ok(())
    }

    /* -------------------------- continuations -------------------------- */

    fn continue_literal(&mut self, host: &mut dyn EditorHost, key: Key) -> Result<()> {
        let (quote, long_state) = match self.state {
            CompletionState::AlternateLiteral => ('\'', CompletionState::AlternateLongLiteral),
            _ => ('"', CompletionState::LongLiteral),
        };

        if self.temporary_state != CompletionState::None {
            self.temporary_state = CompletionState::None;
            if key.ch == quote {
                debug!("{:?} -> {:?}", self.state, long_state);
                self.state = long_state;
                return Ok(());
            }
            self.close(host);
            return self.open(host, key);
        }

        if key.ch == '\n' {
            self.abort(host);
            return Ok(());
        }

        if key.ch != quote {
            return Ok(());
        }

        let quote_offset = host.caret_offset().saturating_sub(key.len);
        if preceding_backslashes(host.document_text(), quote_offset) % 2 == 1 {
            return Ok(());
        }

        let empty = self.current_text(host)?.len() == 2 * quote.len_utf8();
        if empty && self.profile.long_literals {
            self.temporary_state = self.state;
        } else {
            self.close(host);
        }
        Ok(())
    }

    fn continue_long_literal(&mut self, host: &mut dyn EditorHost) -> Result<()> {
        let closing = match self.state {
            CompletionState::AlternateLongLiteral => "'''",
            _ => "\"\"\"",
        };

        let text = self.current_text(host)?;
        if text.len() < 6 || !text.ends_with(closing) {
            return Ok(());
        }

        let closing_start = self.start_offset + text.len() - closing.len();
        if preceding_backslashes(host.document_text(), closing_start) % 2 == 0 {
            self.close(host);
        }
        Ok(())
    }

    fn continue_uri(&mut self, host: &mut dyn EditorHost, key: Key) -> Result<()> {
        match key.ch {
            '>' => {
                let offset = host.caret_offset().saturating_sub(key.len);
                if preceding_backslashes(host.document_text(), offset) % 2 == 0 {
                    self.close(host);
                }
            }
            c if c.is_whitespace() => self.abort(host),
            _ => {}
        }
        Ok(())
    }

    fn continue_blank_node(&mut self, host: &mut dyn EditorHost, key: Key) -> Result<()> {
        let text = self.current_text(host)?;

        if is_terminator(key.ch, BLANK_NODE_PUNCTUATION) {
            let label = text
                .get(..text.len().saturating_sub(key.len))
                .unwrap_or_default()
                .to_string();
            self.record_blank_node(&label);
            self.close(host);
            if !key.ch.is_whitespace() {
                return self.open(host, key);
            }
            return Ok(());
        }

        if !is_valid_partial_blank_node(text) {
            self.abort(host);
            self.rescan_blank_nodes(host.document_text());
        }
        Ok(())
    }

    fn continue_name(&mut self, host: &mut dyn EditorHost, key: Key) -> Result<()> {
        if is_terminator(key.ch, NAME_PUNCTUATION) {
            self.close(host);
            if !key.ch.is_whitespace() {
                return self.open(host, key);
            }
            return Ok(());
        }

        let text = self.current_text(host)?;
        let qname = self.profile.has_qnames() && is_valid_partial_qname(text);

        if self.state == CompletionState::KeywordOrQName {
            if self.profile.is_partial_keyword(text) {
                return Ok(());
            }
            if qname {
                debug!("KeywordOrQName -> QName");
                self.state = CompletionState::QName;
                return Ok(());
            }
        } else if qname {
            return Ok(());
        }

        self.abort(host);
        Ok(())
    }

    fn continue_declaration(&mut self, host: &mut dyn EditorHost) -> Result<()> {
        let text = self.current_text(host)?;
        let word = text.strip_prefix('@').unwrap_or(text);
        let directives = self.profile.directives;

        if let Some(directive) = directives.iter().find(|d| **d == word) {
            match *directive {
                "prefix" => self.state = CompletionState::Prefix,
                "base" => self.state = CompletionState::Base,
                _ => self.close(host),
            }
            if self.state != CompletionState::None {
                debug!("Declaration -> {:?}", self.state);
            }
            return Ok(());
        }

        if !directives.iter().any(|d| d.starts_with(word)) {
            self.abort(host);
        }
        Ok(())
    }

    fn continue_prefix(&mut self, host: &mut dyn EditorHost, key: Key) -> Result<()> {
        match key.ch {
            '\n' => self.abort(host),
            '.' => {
                if is_valid_prefix_declaration(self.current_text(host)?) {
                    self.close(host);
                    self.detect_state(host);
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn continue_base(&mut self, host: &mut dyn EditorHost, key: Key) -> Result<()> {
        match key.ch {
            '\n' => self.close(host),
            '.' => {
                if is_valid_base_declaration(self.current_text(host)?) {
                    self.close(host);
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn continue_variable(&mut self, host: &mut dyn EditorHost, key: Key) -> Result<()> {
        let text = self.current_text(host)?;

        if is_terminator(key.ch, VARIABLE_PUNCTUATION) {
            let buffered = text.len().saturating_sub(key.len);
            if buffered > self.variable_sigil.len_utf8() {
                self.close(host);
                self.rescan_variables(host.document_text());
            } else {
                self.abort(host);
            }
            if !key.ch.is_whitespace() {
                return self.open(host, key);
            }
            return Ok(());
        }

        if !is_valid_partial_variable(text, self.variable_sigil) {
            self.abort(host);
        }
        Ok(())
    }

    /// Re-check the session after a deletion
    fn revalidate(&mut self, host: &mut dyn EditorHost) -> Result<()> {
        use CompletionState::*;

        if matches!(self.state, None | Disabled | Inserted) {
            return Ok(());
        }
        if self.session_length(host) <= 0 {
            self.abort(host);
            return Ok(());
        }

        let text = self.current_text(host)?;
        let profile = self.profile;
        let valid = match self.state {
            BNode => is_valid_partial_blank_node(text),
            QName => is_valid_partial_qname(text),
            KeywordOrQName => {
                profile.is_partial_keyword(text)
                    || (profile.has_qnames() && is_valid_partial_qname(text))
            }
            Variable => is_valid_partial_variable(text, self.variable_sigil),
            Declaration => text
                .strip_prefix('@')
                .is_some_and(|word| profile.directives.iter().any(|d| d.starts_with(word))),
            Prefix => text.starts_with("@prefix"),
            Base => text.starts_with("@base"),
            LongLiteral | AlternateLongLiteral => text.len() >= 3,
            Literal | AlternateLiteral => {
                if text.len() < 2 {
                    self.temporary_state = None;
                }
                true
            }
            _ => true,
        };

        if !valid {
            self.abort(host);
        }
        Ok(())
    }

    /* ---------------------------- sessions ----------------------------- */

    fn begin(
        &mut self,
        host: &mut dyn EditorHost,
        state: CompletionState,
        start: usize,
        items: Vec<CompletionItem>,
    ) {
        debug!("{:?} -> {:?} at {}", self.state, state, start);
        self.state = state;
        self.start_offset = start;
        self.temporary_state = CompletionState::None;
        if !items.is_empty() {
            host.show_suggestions(start, items);
        }
    }

    /// End the session normally, remembering what was completed
    fn close(&mut self, host: &mut dyn EditorHost) {
        debug!("Closing {:?} session", self.state);
        self.last_completion = self.state;
        self.state = CompletionState::None;
        self.temporary_state = CompletionState::None;
        host.end_suggestion_session();
    }

    /// Drop the session without recording a completion
    fn abort(&mut self, host: &mut dyn EditorHost) {
        if self.state != CompletionState::None {
            debug!("Aborting {:?} session", self.state);
        }
        self.state = CompletionState::None;
        self.temporary_state = CompletionState::None;
        host.end_suggestion_session();
    }

    /* --------------------------- suggestions --------------------------- */

    fn declaration_items(&self) -> Vec<CompletionItem> {
        let next_prefix = self.namespaces.next_unused_prefix();
        let mut items = vec![
            CompletionItem::new(CompletionKind::BaseDeclaration, "@base")
                .with_insertion("@base <> .")
                .with_description("Base URI declaration"),
            CompletionItem::new(
                CompletionKind::NewPrefixDeclaration,
                format!("@prefix {next_prefix}:"),
            )
            .with_insertion(format!("@prefix {next_prefix}: <> ."))
            .with_description("New namespace prefix"),
        ];

        items.extend(
            self.profile
                .directives
                .iter()
                .filter(|d| !matches!(**d, "prefix" | "base"))
                .map(|d| CompletionItem::new(CompletionKind::Keyword, format!("@{d}"))),
        );
        items.extend(BUILTIN_VOCABULARIES.iter().map(|vocabulary| {
            CompletionItem::new(
                CompletionKind::PrefixDeclaration,
                vocabulary.turtle_declaration(),
            )
            .with_description(vocabulary.description)
        }));
        items
    }

    /// Keywords beginning with the word being typed in `token`
    ///
    /// The word is the part after the last `:`. The list is fixed when the
    /// session opens; narrowing it on later keystrokes is left to the host.
    fn keyword_items(&self, token: &str) -> Vec<CompletionItem> {
        let word = token.rsplit_once(':').map_or(token, |(_, local)| local);
        let profile = self.profile;

        let mut items: Vec<CompletionItem> = profile
            .keywords()
            .filter(|keyword| profile.keyword_starts_with(keyword, word))
            .map(|keyword| CompletionItem::new(CompletionKind::Keyword, keyword))
            .collect();
        items.sort_by_key(|item| item.display_text.to_lowercase());

        if profile.prefix_style == PrefixStyle::Keyword
            && profile.keyword_starts_with("PREFIX", word)
        {
            items.extend(BUILTIN_VOCABULARIES.iter().map(|vocabulary| {
                CompletionItem::new(
                    CompletionKind::PrefixDeclaration,
                    vocabulary.sparql_declaration(),
                )
                .with_description(vocabulary.description)
            }));
        }
        items
    }

    /// `prefix:` and `prefix:local` for every prefix visible at `caret`
    fn qname_items(&mut self, caret: usize) -> Vec<CompletionItem> {
        if !self.profile.has_qnames() {
            return Vec::new();
        }

        self.namespaces.set_current_offset(caret);
        let bindings: Vec<(String, String)> = self
            .namespaces
            .visible_bindings()
            .into_iter()
            .map(|b| (b.prefix.clone(), b.namespace_uri.clone()))
            .collect();

        let mut items = Vec::new();
        for (prefix, namespace_uri) in bindings {
            if self.auto_load_terms {
                self.terms.request(&namespace_uri);
            }
            items.extend(self.terms.terms(&namespace_uri).into_iter().map(|term| {
                let description = term.label.clone().unwrap_or_else(|| term.uri());
                CompletionItem::new(
                    CompletionKind::QName,
                    format!("{prefix}:{}", term.local_name),
                )
                .with_description(description)
            }));
            items.push(
                CompletionItem::new(CompletionKind::QName, format!("{prefix}:"))
                    .with_description(namespace_uri),
            );
        }

        items.sort_by(|a, b| a.display_text.cmp(&b.display_text));
        items.dedup_by(|a, b| a.display_text == b.display_text);
        items
    }

    fn uri_items(&mut self, caret: usize) -> Vec<CompletionItem> {
        self.namespaces.set_current_offset(caret);
        let mut items: Vec<CompletionItem> = self
            .namespaces
            .visible_bindings()
            .into_iter()
            .map(|b| {
                CompletionItem::new(CompletionKind::Uri, format!("<{}>", b.namespace_uri))
                    .with_description(format!("{}:", b.prefix))
            })
            .collect();
        items.sort_by(|a, b| a.display_text.cmp(&b.display_text));
        items.dedup_by(|a, b| a.display_text == b.display_text);
        items
    }

    fn blank_node_items(&mut self) -> Vec<CompletionItem> {
        let fresh = format!("_:{}", self.blank_node_ids.next_id());
        std::iter::once(
            CompletionItem::new(CompletionKind::NewBlankNode, fresh)
                .with_description("New blank node"),
        )
        .chain(
            self.blank_nodes
                .iter()
                .map(|label| CompletionItem::new(CompletionKind::BlankNode, label.clone())),
        )
        .collect()
    }

    fn variable_items(&self) -> Vec<CompletionItem> {
        self.variables
            .iter()
            .map(|name| {
                CompletionItem::new(
                    CompletionKind::Variable,
                    format!("{}{}", self.variable_sigil, name),
                )
            })
            .collect()
    }

    /* ----------------------------- indexes ----------------------------- */

    fn record_blank_node(&mut self, label: &str) {
        if label.len() > 2 && is_valid_partial_blank_node(label) {
            self.blank_node_ids.check_id(label);
            self.blank_nodes.insert(label.to_string());
        }
    }

    fn rescan_namespaces(&mut self, text: &str) {
        self.namespaces.clear();
        for declaration in scan::scan_prefixes(text, self.profile.prefix_style) {
            self.namespaces.set_current_offset(declaration.end_offset);
            self.namespaces
                .add_namespace(&declaration.prefix, &declaration.namespace_uri);
            if self.auto_load_terms {
                self.terms.request(&declaration.namespace_uri);
            }
        }
    }

    fn rescan_blank_nodes(&mut self, text: &str) {
        self.blank_nodes = scan::scan_blank_nodes(text);
        for label in &self.blank_nodes {
            self.blank_node_ids.check_id(label);
        }
    }

    fn rescan_variables(&mut self, text: &str) {
        self.variables = scan::scan_variables(text, self.profile.variable_sigils);
    }
}

fn preceding_char(host: &dyn EditorHost, offset: usize) -> Option<char> {
    host.document_text()
        .get(..offset)
        .and_then(|before| before.chars().next_back())
}
