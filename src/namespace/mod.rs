//! Offset scoped namespace prefixes
//!
//! Turtle, Notation3 and SPARQL documents may redeclare a prefix partway through.
//! A completion must only offer the prefixes visible at the caret, and a URI must
//! be reduced with whichever prefix was in force at that point of the document.
//! [`OffsetScopedNamespaceMap`] therefore keeps every binding together with the
//! document offset at which it became visible, and answers every lookup relative
//! to a movable cursor.

use std::collections::HashMap;
use std::fmt;

use tracing::debug;

use crate::error::NamespaceError;

/// Prefix used for generated namespace prefixes (`ns0`, `ns1`, ...)
const SYNTHETIC_PREFIX: &str = "ns";

/// A single prefix declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceBinding {
    /// Prefix name without the trailing colon (may be empty for the default prefix)
    pub prefix: String,
    /// Namespace URI the prefix expands to
    pub namespace_uri: String,
    /// Offset from which the binding is visible
    pub declared_at: usize,
}

/// Change notification fired by [`OffsetScopedNamespaceMap`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NamespaceEvent {
    /// A new binding was recorded
    Added(NamespaceBinding),
    /// An existing binding at the same offset was replaced
    Modified(NamespaceBinding),
    /// All bindings of a prefix were removed
    Removed(String),
    /// The map was emptied
    Cleared,
}

type Listener = Box<dyn Fn(&NamespaceEvent) + Send + Sync>;

/// Namespace map whose bindings are scoped by document offset
///
/// A binding declared at offset `o` is visible to lookups whose cursor is
/// strictly greater than `o`. When a prefix has several bindings the visible one
/// is the binding with the greatest offset below the cursor.
#[derive(Default)]
pub struct OffsetScopedNamespaceMap {
    /// Bindings per prefix, ordered by ascending offset
    bindings: HashMap<String, Vec<NamespaceBinding>>,
    /// Cursor used to scope lookups
    current_offset: usize,
    /// Optional observer of binding changes
    listener: Option<Listener>,
}

impl OffsetScopedNamespaceMap {
    /// Create an empty map with its cursor at offset 0
    pub fn new() -> Self {
        Self::default()
    }

    /// Offset that scopes lookups and new bindings
    pub fn current_offset(&self) -> usize {
        self.current_offset
    }

    /// Move the cursor
    pub fn set_current_offset(&mut self, offset: usize) {
        self.current_offset = offset;
    }

    /// Install an observer that receives every change to the map
    pub fn set_listener<F>(&mut self, listener: F)
    where
        F: Fn(&NamespaceEvent) + Send + Sync + 'static,
    {
        self.listener = Some(Box::new(listener));
    }

    /// Record a binding for `prefix` at the current offset
    ///
    /// A binding of the same prefix at exactly this offset is replaced instead
    /// of duplicated.
    pub fn add_namespace(&mut self, prefix: &str, namespace_uri: &str) {
        let binding = NamespaceBinding {
            prefix: prefix.to_string(),
            namespace_uri: namespace_uri.to_string(),
            declared_at: self.current_offset,
        };

        let entries = self.bindings.entry(prefix.to_string()).or_default();
        let event = match entries.binary_search_by_key(&binding.declared_at, |b| b.declared_at) {
            Ok(index) => {
                entries[index] = binding.clone();
                NamespaceEvent::Modified(binding)
            }
            Err(index) => {
                entries.insert(index, binding.clone());
                NamespaceEvent::Added(binding)
            }
        };

        debug!("Namespace change: {:?}", event);
        self.notify(&event);
    }

    /// Remove every binding of `prefix`
    pub fn remove_namespace(&mut self, prefix: &str) {
        if self.bindings.remove(prefix).is_some() {
            self.notify(&NamespaceEvent::Removed(prefix.to_string()));
        }
    }

    /// Remove all bindings
    pub fn clear(&mut self) {
        self.bindings.clear();
        self.notify(&NamespaceEvent::Cleared);
    }

    /// Resolve a prefix to its namespace URI at the current offset
    pub fn namespace_uri(&self, prefix: &str) -> Result<&str, NamespaceError> {
        let entries = self
            .bindings
            .get(prefix)
            .filter(|entries| !entries.is_empty())
            .ok_or_else(|| NamespaceError::NotKnown(prefix.to_string()))?;

        self.visible(entries)
            .map(|binding| binding.namespace_uri.as_str())
            .ok_or_else(|| NamespaceError::NotInScope(prefix.to_string()))
    }

    /// Resolve a namespace URI to the prefix in force at the current offset
    ///
    /// When several prefixes are bound to the URI, the most recently declared
    /// one wins.
    pub fn prefix_of(&self, namespace_uri: &str) -> Result<&str, NamespaceError> {
        let mut known = false;
        let mut best: Option<&NamespaceBinding> = None;

        for entries in self.bindings.values() {
            if entries.iter().any(|b| b.namespace_uri == namespace_uri) {
                known = true;
            }
            if let Some(binding) = self.visible(entries) {
                if binding.namespace_uri == namespace_uri
                    && best.is_none_or(|b| binding.declared_at > b.declared_at)
                {
                    best = Some(binding);
                }
            }
        }

        match best {
            Some(binding) => Ok(binding.prefix.as_str()),
            None if known => Err(NamespaceError::NotInScope(namespace_uri.to_string())),
            None => Err(NamespaceError::NotKnown(namespace_uri.to_string())),
        }
    }

    /// Check whether `prefix` has a binding visible at the current offset
    pub fn has_namespace(&self, prefix: &str) -> bool {
        self.bindings
            .get(prefix)
            .is_some_and(|entries| self.visible(entries).is_some())
    }

    /// Check whether `prefix` was ever bound, regardless of the cursor
    pub fn is_known(&self, prefix: &str) -> bool {
        self.bindings.get(prefix).is_some_and(|e| !e.is_empty())
    }

    /// Visible bindings at the current offset, sorted by prefix
    pub fn visible_bindings(&self) -> Vec<&NamespaceBinding> {
        let mut visible: Vec<&NamespaceBinding> = self
            .bindings
            .values()
            .filter_map(|entries| self.visible(entries))
            .collect();
        visible.sort_by(|a, b| a.prefix.cmp(&b.prefix));
        visible
    }

    /// Prefixes visible at the current offset, sorted
    pub fn prefixes(&self) -> Vec<&str> {
        self.visible_bindings()
            .into_iter()
            .map(|b| b.prefix.as_str())
            .collect()
    }

    /// Every binding ever recorded, ordered by offset
    pub fn all_bindings(&self) -> Vec<&NamespaceBinding> {
        let mut all: Vec<&NamespaceBinding> = self.bindings.values().flatten().collect();
        all.sort_by(|a, b| {
            a.declared_at
                .cmp(&b.declared_at)
                .then_with(|| a.prefix.cmp(&b.prefix))
        });
        all
    }

    /// Rewrite `uri` as `prefix:localName` using the longest visible namespace
    ///
    /// Candidates are skipped when they would produce an empty local name, a
    /// local name still containing `/` or `#`, or one rejected by `validate`.
    pub fn reduce_to_qname(
        &self,
        uri: &str,
        validate: Option<&dyn Fn(&str) -> bool>,
    ) -> Option<String> {
        let mut candidates: Vec<&NamespaceBinding> = self
            .visible_bindings()
            .into_iter()
            .filter(|b| {
                !b.namespace_uri.is_empty() && uri.starts_with(b.namespace_uri.as_str())
            })
            .collect();
        candidates.sort_by(|a, b| b.namespace_uri.len().cmp(&a.namespace_uri.len()));

        candidates.into_iter().find_map(|binding| {
            let local = &uri[binding.namespace_uri.len()..];
            if local.is_empty() || local.contains('/') || local.contains('#') {
                return None;
            }
            let qname = format!("{}:{}", binding.prefix, local);
            match validate {
                Some(accept) if !accept(&qname) => None,
                _ => Some(qname),
            }
        })
    }

    /// Copy the bindings visible in `other` into this map at the current offset
    ///
    /// Prefixes already bound here to the same URI are skipped; prefixes bound to
    /// a different URI are imported under an `nsN` prefix unused by either map.
    pub fn import(&mut self, other: &OffsetScopedNamespaceMap) {
        let incoming: Vec<(String, String)> = other
            .visible_bindings()
            .into_iter()
            .map(|b| (b.prefix.clone(), b.namespace_uri.clone()))
            .collect();

        for (prefix, uri) in &incoming {
            match self.bound_at_cursor(prefix) {
                Some(existing) if existing == uri => continue,
                Some(_) => {
                    let renamed = (0usize..)
                        .map(|i| format!("{SYNTHETIC_PREFIX}{i}"))
                        .find(|candidate| {
                            !self.is_known(candidate)
                                && !incoming.iter().any(|(p, _)| p == candidate)
                        })
                        .unwrap_or_else(|| SYNTHETIC_PREFIX.to_string());
                    debug!("Importing <{}> as '{}' instead of '{}'", uri, renamed, prefix);
                    self.add_namespace(&renamed, uri);
                }
                None => self.add_namespace(prefix, uri),
            }
        }
    }

    /// URI of `prefix` declared at or before the current offset
    ///
    /// Unlike [`namespace_uri`](Self::namespace_uri) this includes a binding
    /// made exactly at the cursor.
    fn bound_at_cursor(&self, prefix: &str) -> Option<&str> {
        let entries = self.bindings.get(prefix)?;
        let upper = entries.partition_point(|b| b.declared_at <= self.current_offset);
        upper
            .checked_sub(1)
            .and_then(|index| entries.get(index))
            .map(|binding| binding.namespace_uri.as_str())
    }

    /// Next `nsN` prefix that has never been bound in this map
    pub fn next_unused_prefix(&self) -> String {
        (0usize..)
            .map(|i| format!("{SYNTHETIC_PREFIX}{i}"))
            .find(|candidate| !self.is_known(candidate))
            .unwrap_or_else(|| SYNTHETIC_PREFIX.to_string())
    }

    /// Number of distinct prefixes ever bound
    pub fn len(&self) -> usize {
        self.bindings.values().filter(|e| !e.is_empty()).count()
    }

    /// Check whether no prefix was ever bound
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Visible binding among the offset ordered `entries`
    fn visible<'a>(&self, entries: &'a [NamespaceBinding]) -> Option<&'a NamespaceBinding> {
        let upper = entries.partition_point(|b| b.declared_at < self.current_offset);
        upper.checked_sub(1).and_then(|index| entries.get(index))
    }

    fn notify(&self, event: &NamespaceEvent) {
        if let Some(listener) = &self.listener {
            listener(event);
        }
    }
}

impl fmt::Debug for OffsetScopedNamespaceMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OffsetScopedNamespaceMap")
            .field("bindings", &self.bindings)
            .field("current_offset", &self.current_offset)
            .field("listener", &self.listener.as_ref().map(|_| "<listener>"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn map_with(bindings: &[(&str, &str, usize)]) -> OffsetScopedNamespaceMap {
        let mut map = OffsetScopedNamespaceMap::new();
        for (prefix, uri, offset) in bindings {
            map.set_current_offset(*offset);
            map.add_namespace(prefix, uri);
        }
        map
    }

    #[test]
    fn test_offset_scoping() {
        let mut map = map_with(&[("p", "http://one/", 10), ("p", "http://two/", 50)]);

        map.set_current_offset(30);
        assert_eq!(map.namespace_uri("p"), Ok("http://one/"));

        map.set_current_offset(60);
        assert_eq!(map.namespace_uri("p"), Ok("http://two/"));

        map.set_current_offset(5);
        assert_eq!(
            map.namespace_uri("p"),
            Err(NamespaceError::NotInScope("p".to_string()))
        );
    }

    #[test]
    fn test_binding_not_visible_at_its_own_offset() {
        let mut map = map_with(&[("p", "http://one/", 10)]);
        map.set_current_offset(10);
        assert!(!map.has_namespace("p"));
        map.set_current_offset(11);
        assert!(map.has_namespace("p"));
    }

    #[test]
    fn test_unknown_prefix() {
        let map = map_with(&[("p", "http://one/", 10)]);
        assert_eq!(
            map.namespace_uri("q"),
            Err(NamespaceError::NotKnown("q".to_string()))
        );
        assert_eq!(
            map.prefix_of("http://nowhere/"),
            Err(NamespaceError::NotKnown("http://nowhere/".to_string()))
        );
    }

    #[test]
    fn test_same_offset_replaces_binding() {
        let mut map = map_with(&[("p", "http://one/", 10)]);
        map.set_current_offset(10);
        map.add_namespace("p", "http://replaced/");

        assert_eq!(map.all_bindings().len(), 1);
        map.set_current_offset(20);
        assert_eq!(map.namespace_uri("p"), Ok("http://replaced/"));
    }

    #[test]
    fn test_events_distinguish_added_and_modified() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);

        let mut map = OffsetScopedNamespaceMap::new();
        map.set_listener(move |event| sink.lock().unwrap().push(event.clone()));
        map.set_current_offset(3);
        map.add_namespace("ex", "http://example.org/");
        map.add_namespace("ex", "http://example.com/");

        let events = events.lock().unwrap();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], NamespaceEvent::Added(_)));
        assert!(matches!(events[1], NamespaceEvent::Modified(_)));
    }

    #[test]
    fn test_prefix_of_uses_visible_binding() {
        let mut map = map_with(&[("p", "http://one/", 10), ("p", "http://two/", 50)]);

        map.set_current_offset(30);
        assert_eq!(map.prefix_of("http://one/"), Ok("p"));

        // Shadowed by the redefinition
        map.set_current_offset(60);
        assert_eq!(
            map.prefix_of("http://one/"),
            Err(NamespaceError::NotInScope("http://one/".to_string()))
        );
        assert_eq!(map.prefix_of("http://two/"), Ok("p"));
    }

    #[test]
    fn test_import_keeps_renamed_binding() {
        let mut target = map_with(&[("ex", "http://example.org/", 0)]);
        target.set_current_offset(1);
        let mut source = map_with(&[
            ("ex", "http://different.org/", 0),
            ("ns0", "http://third.org/", 0),
        ]);
        source.set_current_offset(1);

        target.import(&source);
        target.set_current_offset(2);

        assert_eq!(target.namespace_uri("ex"), Ok("http://example.org/"));
        assert_eq!(target.namespace_uri("ns0"), Ok("http://third.org/"));
        assert_eq!(target.prefix_of("http://different.org/"), Ok("ns1"));
        assert_eq!(target.prefixes(), vec!["ex", "ns0", "ns1"]);
    }

    #[test]
    fn test_reduce_to_qname_round_trip() {
        let mut map = map_with(&[("ex", "http://example.org/", 0)]);
        map.set_current_offset(1);

        let qname = map.reduce_to_qname("http://example.org/Person", None);
        assert_eq!(qname.as_deref(), Some("ex:Person"));

        let (prefix, _) = "ex:Person".split_once(':').unwrap();
        assert_eq!(map.namespace_uri(prefix), Ok("http://example.org/"));
    }

    #[test]
    fn test_reduce_prefers_longest_namespace() {
        let mut map = map_with(&[
            ("ex", "http://example.org/", 0),
            ("voc", "http://example.org/vocab#", 0),
        ]);
        map.set_current_offset(1);

        assert_eq!(
            map.reduce_to_qname("http://example.org/vocab#term", None).as_deref(),
            Some("voc:term")
        );
    }

    #[test]
    fn test_reduce_rejects_unusable_local_names() {
        let mut map = map_with(&[("ex", "http://example.org/", 0)]);
        map.set_current_offset(1);

        assert_eq!(map.reduce_to_qname("http://example.org/", None), None);
        assert_eq!(map.reduce_to_qname("http://example.org/a/b", None), None);
        assert_eq!(map.reduce_to_qname("http://example.org/a#b", None), None);
        assert_eq!(map.reduce_to_qname("http://other.org/a", None), None);

        let reject_all = |_: &str| false;
        assert_eq!(
            map.reduce_to_qname("http://example.org/a", Some(&reject_all)),
            None
        );
    }

    #[test]
    fn test_import_renames_conflicts() {
        let mut target = map_with(&[("ex", "http://example.org/", 0)]);
        target.set_current_offset(1);

        let mut source = map_with(&[
            ("ex", "http://different.org/", 0),
            ("foaf", "http://xmlns.com/foaf/0.1/", 0),
        ]);
        source.set_current_offset(1);

        target.import(&source);
        target.set_current_offset(2);

        assert_eq!(target.namespace_uri("ex"), Ok("http://example.org/"));
        assert_eq!(target.namespace_uri("foaf"), Ok("http://xmlns.com/foaf/0.1/"));
        assert_eq!(target.namespace_uri("ns0"), Ok("http://different.org/"));
    }

    #[test]
    fn test_import_skips_identical_bindings() {
        let mut target = map_with(&[("ex", "http://example.org/", 0)]);
        target.set_current_offset(1);
        let mut source = map_with(&[("ex", "http://example.org/", 0)]);
        source.set_current_offset(1);

        target.import(&source);

        assert_eq!(target.all_bindings().len(), 1);
        assert!(!target.is_known("ns0"));
    }

    #[test]
    fn test_next_unused_prefix_skips_bound_names() {
        let map = map_with(&[("ns0", "http://a/", 0), ("ns1", "http://b/", 0)]);
        assert_eq!(map.next_unused_prefix(), "ns2");
    }

    #[test]
    fn test_prefixes_sorted_and_scoped() {
        let mut map = map_with(&[
            ("rdf", "http://www.w3.org/1999/02/22-rdf-syntax-ns#", 5),
            ("ex", "http://example.org/", 5),
            ("late", "http://late.org/", 100),
        ]);
        map.set_current_offset(50);
        assert_eq!(map.prefixes(), vec!["ex", "rdf"]);
    }

    #[test]
    fn test_remove_and_clear() {
        let mut map = map_with(&[("a", "http://a/", 0), ("b", "http://b/", 0)]);
        map.remove_namespace("a");
        assert!(!map.is_known("a"));
        assert_eq!(map.len(), 1);
        map.clear();
        assert!(map.is_empty());
    }
}
