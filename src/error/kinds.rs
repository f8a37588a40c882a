use std::{fmt, io};

/// Crate-wide `Result` type using [`AutoCompleteError`] as the error.
///
/// This alias is re-exported by the parent `error` module and is intended
/// to be used throughout the crate for fallible operations.
pub type Result<T> = std::result::Result<T, AutoCompleteError>;

/// Top-level error type for the completion engine and its tooling.
///
/// This type wraps more specific error kinds and provides a single
/// error type that can be used throughout the crate.
#[derive(Debug)]
pub enum AutoCompleteError {
    /// Namespace prefix or URI could not be resolved at the current offset.
    Namespace(NamespaceError),

    /// Vocabulary retrieval or parsing failed.
    Vocabulary(VocabularyError),

    /// The document buffer was read outside of its bounds.
    Buffer(BufferError),

    /// Configuration errors.
    Config(ConfigError),

    /// I/O errors.
    Io(io::Error),

    /// Generic error with a free-form message.
    Generic(String),
}

/// Scope errors raised by the offset scoped namespace map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NamespaceError {
    /// The prefix or URI is bound, but no binding precedes the current offset.
    NotInScope(String),

    /// The prefix or URI was never bound.
    NotKnown(String),
}

/// Vocabulary retrieval errors.
#[derive(Debug)]
pub enum VocabularyError {
    /// The HTTP request could not be sent or completed.
    Fetch { uri: String, message: String },

    /// The server answered with a non-success status.
    Status { uri: String, status: u16 },

    /// The retrieved or bundled data was not parseable RDF.
    Parse { uri: String, message: String },

    /// No serialisation format could be derived for the data.
    UnknownFormat(String),

    /// No bundled copy exists for the prefix.
    NotBundled(String),
}

/// Errors raised while reading the document through the editor host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BufferError {
    /// A range reached past the end of the document or split a character.
    OutOfRange { offset: usize, length: usize },

    /// The caret is before the start of the session.
    CaretBeforeSession { start: usize, caret: usize },
}

/// Configuration-specific errors.
#[derive(Debug)]
pub enum ConfigError {
    /// Config file not found.
    FileNotFound(String),

    /// Invalid config format.
    InvalidFormat(String),

    /// Invalid field value.
    InvalidValue { field: String, value: String },

    /// Generic configuration error.
    Generic(String),
}

/* ========================= Display & Error impls ========================= */

impl fmt::Display for AutoCompleteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AutoCompleteError::Namespace(e) => write!(f, "Namespace error: {e}"),
            AutoCompleteError::Vocabulary(e) => write!(f, "Vocabulary error: {e}"),
            AutoCompleteError::Buffer(e) => write!(f, "Buffer error: {e}"),
            AutoCompleteError::Config(e) => write!(f, "Configuration error: {e}"),
            AutoCompleteError::Io(e) => write!(f, "I/O error: {e}"),
            AutoCompleteError::Generic(msg) => write!(f, "{msg}"),
        }
    }
}

impl fmt::Display for NamespaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NamespaceError::NotInScope(name) => {
                write!(f, "'{name}' is not in scope at the current offset")
            }
            NamespaceError::NotKnown(name) => write!(f, "'{name}' is not a known namespace"),
        }
    }
}

impl fmt::Display for VocabularyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VocabularyError::Fetch { uri, message } => {
                write!(f, "Failed to retrieve <{uri}>: {message}")
            }
            VocabularyError::Status { uri, status } => {
                write!(f, "Retrieving <{uri}> returned HTTP {status}")
            }
            VocabularyError::Parse { uri, message } => {
                write!(f, "Failed to parse vocabulary <{uri}>: {message}")
            }
            VocabularyError::UnknownFormat(what) => {
                write!(f, "Unknown RDF serialisation: {what}")
            }
            VocabularyError::NotBundled(prefix) => {
                write!(f, "No bundled vocabulary for prefix '{prefix}'")
            }
        }
    }
}

impl fmt::Display for BufferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BufferError::OutOfRange { offset, length } => {
                write!(f, "Range {offset}+{length} is outside the document")
            }
            BufferError::CaretBeforeSession { start, caret } => {
                write!(f, "Caret {caret} is before session start {start}")
            }
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::FileNotFound(path) => write!(f, "Config file not found: {path}"),
            ConfigError::InvalidFormat(msg) => write!(f, "Invalid config format: {msg}"),
            ConfigError::InvalidValue { field, value } => {
                write!(f, "Invalid value '{value}' for field '{field}'")
            }
            ConfigError::Generic(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for AutoCompleteError {}
impl std::error::Error for NamespaceError {}
impl std::error::Error for VocabularyError {}
impl std::error::Error for BufferError {}
impl std::error::Error for ConfigError {}

/* ========================= Conversions to AutoCompleteError ========================= */

impl From<io::Error> for AutoCompleteError {
    fn from(err: io::Error) -> Self {
        AutoCompleteError::Io(err)
    }
}

impl From<NamespaceError> for AutoCompleteError {
    fn from(err: NamespaceError) -> Self {
        AutoCompleteError::Namespace(err)
    }
}

impl From<VocabularyError> for AutoCompleteError {
    fn from(err: VocabularyError) -> Self {
        AutoCompleteError::Vocabulary(err)
    }
}

impl From<BufferError> for AutoCompleteError {
    fn from(err: BufferError) -> Self {
        AutoCompleteError::Buffer(err)
    }
}

impl From<ConfigError> for AutoCompleteError {
    fn from(err: ConfigError) -> Self {
        AutoCompleteError::Config(err)
    }
}

impl From<toml::de::Error> for AutoCompleteError {
    fn from(err: toml::de::Error) -> Self {
        AutoCompleteError::Config(ConfigError::InvalidFormat(err.to_string()))
    }
}

impl From<toml::ser::Error> for AutoCompleteError {
    fn from(err: toml::ser::Error) -> Self {
        AutoCompleteError::Config(ConfigError::InvalidFormat(err.to_string()))
    }
}

impl From<serde_json::Error> for AutoCompleteError {
    fn from(err: serde_json::Error) -> Self {
        AutoCompleteError::Generic(format!("JSON error: {err}"))
    }
}

impl From<String> for AutoCompleteError {
    fn from(msg: String) -> Self {
        AutoCompleteError::Generic(msg)
    }
}

impl From<&str> for AutoCompleteError {
    fn from(msg: &str) -> Self {
        AutoCompleteError::Generic(msg.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_namespace_error_display() {
        let err = AutoCompleteError::from(NamespaceError::NotInScope("ex".to_string()));
        assert_eq!(
            err.to_string(),
            "Namespace error: 'ex' is not in scope at the current offset"
        );
    }

    #[test]
    fn test_buffer_error_display() {
        let err = BufferError::OutOfRange {
            offset: 10,
            length: 3,
        };
        assert_eq!(err.to_string(), "Range 10+3 is outside the document");
    }

    #[test]
    fn test_vocabulary_status_display() {
        let err = VocabularyError::Status {
            uri: "http://example.org/".to_string(),
            status: 404,
        };
        assert_eq!(
            err.to_string(),
            "Retrieving <http://example.org/> returned HTTP 404"
        );
    }
}
