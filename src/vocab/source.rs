//! Where vocabulary data comes from
//!
//! Terms are normally retrieved by dereferencing the namespace URI. When that
//! fails, a bundled copy keyed by the vocabulary's well-known prefix is used.

use std::borrow::Cow;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use oxrdf::Triple;
use oxrdfio::{RdfFormat, RdfParser};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use tracing::debug;

use crate::error::{Result, VocabularyError};

/// Media types requested when dereferencing a namespace
const ACCEPT_RDF: &str = "text/turtle, application/rdf+xml;q=0.9, application/n-triples;q=0.8, text/n3;q=0.7";

/// Retrieves a namespace and parses it into triples
#[async_trait]
pub trait VocabularyFetcher: Send + Sync {
    /// Fetch the vocabulary published at `namespace_uri`
    async fn fetch(&self, namespace_uri: &str) -> Result<Vec<Triple>>;
}

/// A serialised vocabulary shipped with the application
#[derive(Debug, Clone)]
pub struct BundledVocabulary {
    /// Serialisation format of `data`
    pub format: RdfFormat,
    /// Raw document
    pub data: Cow<'static, [u8]>,
}

/// Local fallback copies of well-known vocabularies
pub trait BundledVocabularies: Send + Sync {
    /// Copy of the vocabulary conventionally bound to `prefix`
    fn lookup(&self, prefix: &str) -> Option<BundledVocabulary>;
}

/// Parse a serialised vocabulary into triples
pub fn parse_triples(data: &[u8], format: RdfFormat, base_iri: &str) -> Result<Vec<Triple>> {
    let parse_error = |message: String| VocabularyError::Parse {
        uri: base_iri.to_string(),
        message,
    };

    let parser = RdfParser::from_format(format)
        .with_base_iri(base_iri)
        .map_err(|e| parse_error(e.to_string()))?;

    let mut triples = Vec::new();
    for quad in parser.for_slice(data) {
        let quad = quad.map_err(|e| parse_error(e.to_string()))?;
        triples.push(Triple::new(quad.subject, quad.predicate, quad.object));
    }
    Ok(triples)
}

/// Dereferences namespaces over HTTP with content negotiation
pub struct HttpVocabularyFetcher {
    client: reqwest::Client,
}

impl HttpVocabularyFetcher {
    /// Create a fetcher whose requests give up after `timeout`
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("rdf-autocomplete/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| VocabularyError::Fetch {
                uri: String::new(),
                message: e.to_string(),
            })?;
        Ok(Self { client })
    }

    /// Document URL for a namespace (the fragment is never sent)
    fn document_url(namespace_uri: &str) -> &str {
        namespace_uri.trim_end_matches('#')
    }

    /// Serialisation format from the response media type, else the URL extension
    fn detect_format(content_type: Option<&str>, url: &str) -> Option<RdfFormat> {
        content_type
            .and_then(|value| value.split(';').next())
            .map(str::trim)
            .and_then(RdfFormat::from_media_type)
            .or_else(|| {
                Path::new(url)
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .and_then(RdfFormat::from_extension)
            })
    }
}

#[async_trait]
impl VocabularyFetcher for HttpVocabularyFetcher {
    async fn fetch(&self, namespace_uri: &str) -> Result<Vec<Triple>> {
        let url = Self::document_url(namespace_uri);
        let fetch_error = |message: String| VocabularyError::Fetch {
            uri: namespace_uri.to_string(),
            message,
        };

        debug!("Fetching vocabulary <{}>", url);
        let response = self
            .client
            .get(url)
            .header(ACCEPT, ACCEPT_RDF)
            .send()
            .await
            .map_err(|e| fetch_error(e.to_string()))?;

        if !response.status().is_success() {
            return Err(VocabularyError::Status {
                uri: namespace_uri.to_string(),
                status: response.status().as_u16(),
            }
            .into());
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let format = Self::detect_format(content_type.as_deref(), url).ok_or_else(|| {
            VocabularyError::UnknownFormat(content_type.unwrap_or_else(|| url.to_string()))
        })?;

        let body = response
            .bytes()
            .await
            .map_err(|e| fetch_error(e.to_string()))?;
        parse_triples(&body, format, url)
    }
}

/// Vocabularies compiled into the binary
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedVocabularies;

impl EmbeddedVocabularies {
    const DATA: &'static [(&'static str, &'static [u8])] = &[
        ("owl", include_bytes!("bundled/owl.ttl")),
        ("rdf", include_bytes!("bundled/rdf.ttl")),
        ("rdfs", include_bytes!("bundled/rdfs.ttl")),
        ("xsd", include_bytes!("bundled/xsd.ttl")),
    ];

    /// Prefixes with an embedded copy
    pub fn prefixes() -> impl Iterator<Item = &'static str> {
        Self::DATA.iter().map(|(prefix, _)| *prefix)
    }
}

impl BundledVocabularies for EmbeddedVocabularies {
    fn lookup(&self, prefix: &str) -> Option<BundledVocabulary> {
        Self::DATA
            .iter()
            .find(|(name, _)| *name == prefix)
            .map(|(_, data)| BundledVocabulary {
                format: RdfFormat::Turtle,
                data: Cow::Borrowed(*data),
            })
    }
}

/// Vocabularies stored as `<prefix>.<ext>` files in a directory
#[derive(Debug, Clone)]
pub struct DirectoryVocabularies {
    directory: PathBuf,
}

impl DirectoryVocabularies {
    /// Extensions probed, in order
    const EXTENSIONS: &'static [&'static str] = &["ttl", "nt", "n3", "rdf", "owl"];

    /// Read bundled copies from `directory`
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }
}

impl BundledVocabularies for DirectoryVocabularies {
    fn lookup(&self, prefix: &str) -> Option<BundledVocabulary> {
        Self::EXTENSIONS.iter().find_map(|ext| {
            let path = self.directory.join(format!("{prefix}.{ext}"));
            let format = match *ext {
                "owl" => RdfFormat::RdfXml,
                other => RdfFormat::from_extension(other)?,
            };
            let data = std::fs::read(&path).ok()?;
            debug!("Using bundled vocabulary {}", path.display());
            Some(BundledVocabulary {
                format,
                data: Cow::Owned(data),
            })
        })
    }
}

/// Several bundle sources asked in order
#[derive(Clone, Default)]
pub struct BundledSources {
    sources: Vec<Arc<dyn BundledVocabularies>>,
}

impl BundledSources {
    /// Create an empty chain
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a source
    pub fn with(mut self, source: Arc<dyn BundledVocabularies>) -> Self {
        self.sources.push(source);
        self
    }
}

impl BundledVocabularies for BundledSources {
    fn lookup(&self, prefix: &str) -> Option<BundledVocabulary> {
        self.sources.iter().find_map(|source| source.lookup(prefix))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_turtle() {
        let data = b"@prefix ex: <http://example.org/> .\nex:a ex:b ex:c .";
        let triples = parse_triples(data, RdfFormat::Turtle, "http://example.org/").unwrap();
        assert_eq!(triples.len(), 1);
    }

    #[test]
    fn test_parse_error_is_reported() {
        let data = b"@prefix ex: <http://example.org/> .\nex:a ex:b";
        let err = parse_triples(data, RdfFormat::Turtle, "http://example.org/").unwrap_err();
        assert!(err.to_string().contains("http://example.org/"));
    }

    #[test]
    fn test_embedded_vocabularies_parse() {
        for prefix in EmbeddedVocabularies::prefixes() {
            let bundle = EmbeddedVocabularies.lookup(prefix).unwrap();
            let triples = parse_triples(&bundle.data, bundle.format, "http://localhost/").unwrap();
            assert!(!triples.is_empty(), "bundle {prefix} is empty");
        }
        assert!(EmbeddedVocabularies.lookup("foaf").is_none());
    }

    #[test]
    fn test_directory_vocabularies() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("ex.nt"),
            "<http://example.org/A> <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <http://www.w3.org/2000/01/rdf-schema#Class> .\n",
        )
        .unwrap();

        let source = DirectoryVocabularies::new(dir.path());
        let bundle = source.lookup("ex").unwrap();
        assert_eq!(bundle.format, RdfFormat::NTriples);
        assert!(source.lookup("missing").is_none());
    }

    #[test]
    fn test_bundled_sources_order() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("rdf.nt"), "").unwrap();

        let sources = BundledSources::new()
            .with(Arc::new(DirectoryVocabularies::new(dir.path())))
            .with(Arc::new(EmbeddedVocabularies));

        assert_eq!(sources.lookup("rdf").unwrap().format, RdfFormat::NTriples);
        assert_eq!(sources.lookup("rdfs").unwrap().format, RdfFormat::Turtle);
    }

    #[test]
    fn test_detect_format() {
        assert_eq!(
            HttpVocabularyFetcher::detect_format(Some("text/turtle; charset=utf-8"), "http://x/"),
            Some(RdfFormat::Turtle)
        );
        assert_eq!(
            HttpVocabularyFetcher::detect_format(None, "http://x/vocab.rdf"),
            Some(RdfFormat::RdfXml)
        );
        assert_eq!(HttpVocabularyFetcher::detect_format(Some("text/html"), "http://x/"), None);
    }
}
