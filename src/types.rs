use std::fmt;
use std::pin::Pin;

use futures::stream::{self, Stream};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::pull::{self, PullSource};

/// Boxed synchronous sequence of input values
pub type ValueIter = Box<dyn Iterator<Item = Result<InputValue>> + Send>;

/// Boxed asynchronous sequence of input values
pub type ValueStream = Pin<Box<dyn Stream<Item = Result<InputValue>> + Send>>;

/// One observed input value, as a closed union of the recognised shapes
///
/// Producers hand over whatever file-like thing they have; the normaliser
/// decides what each shape means. Sequence shapes are never consumed by
/// constructing or classifying a value, only by normalising it.
pub enum InputValue {
    /// The null/undefined equivalent a loosely-typed producer may hand over
    Absent,
    /// Native text
    Text(String),
    /// A byte buffer, fixed-size or growable
    Bytes(bytes::Bytes),
    /// An opaque binary object exposing a size and an optional content type
    Blob(Blob),
    /// A bare integer; only meaningful as an element of a byte sequence
    Integer(u8),
    /// A structured record that already carries a path or content field
    Record(FileInput),
    /// A browser-style pull stream, adapted to an async sequence on use
    PullStream(Box<dyn PullSource>),
    /// A synchronous sequence of further values
    Iter(ValueIter),
    /// An asynchronous sequence of further values
    Stream(StreamSource),
}

impl InputValue {
    /// Wrap a synchronous collection of values
    pub fn sequence<I>(items: I) -> Self
    where
        I: IntoIterator<Item = InputValue>,
        I::IntoIter: Send + 'static,
    {
        Self::Iter(Box::new(items.into_iter().map(Ok)))
    }

    /// Wrap a synchronous iterator whose elements may fail
    pub fn try_sequence<I>(items: I) -> Self
    where
        I: IntoIterator<Item = Result<InputValue>>,
        I::IntoIter: Send + 'static,
    {
        Self::Iter(Box::new(items.into_iter()))
    }

    /// Wrap an asynchronous stream of values
    pub fn stream<S>(stream: S) -> Self
    where
        S: Stream<Item = Result<InputValue>> + Send + 'static,
    {
        Self::Stream(StreamSource::new(stream))
    }

    /// Wrap a browser-style pull stream
    pub fn pull_stream<P>(source: P) -> Self
    where
        P: PullSource + 'static,
    {
        Self::PullStream(Box::new(source))
    }

    /// The observed runtime type name, used in diagnostics
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Absent => "null",
            Self::Text(_) => "string",
            Self::Bytes(_) => "bytes",
            Self::Blob(_) => "blob",
            Self::Integer(_) => "integer",
            Self::Record(_) => "object",
            Self::PullStream(_) => "readable stream",
            Self::Iter(_) => "iterator",
            Self::Stream(_) => "stream",
        }
    }

    /// The value's elements as a single asynchronous form, if it is one of
    /// the sequence shapes; returns the value back otherwise.
    ///
    /// Pull streams acquire their reader lazily, on the first poll of the
    /// returned stream. Plain iterators keep their immediate-readiness
    /// scheduling.
    pub fn into_sequence(self) -> std::result::Result<ValueStream, InputValue> {
        match self {
            Self::Iter(iter) => Ok(Box::pin(stream::iter(iter))),
            Self::Stream(source) => Ok(source.stream),
            Self::PullStream(source) => Ok(pull::reader_stream(source)),
            other => Err(other),
        }
    }
}

impl fmt::Debug for InputValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Absent => f.write_str("Absent"),
            Self::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Self::Bytes(bytes) => f.debug_tuple("Bytes").field(&bytes.len()).finish(),
            Self::Blob(blob) => f.debug_tuple("Blob").field(blob).finish(),
            Self::Integer(value) => f.debug_tuple("Integer").field(value).finish(),
            Self::Record(record) => f.debug_tuple("Record").field(record).finish(),
            Self::PullStream(_) => f.write_str("PullStream(..)"),
            Self::Iter(_) => f.write_str("Iter(..)"),
            Self::Stream(source) => f.debug_tuple("Stream").field(source).finish(),
        }
    }
}

impl From<&str> for InputValue {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for InputValue {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<bytes::Bytes> for InputValue {
    fn from(bytes: bytes::Bytes) -> Self {
        Self::Bytes(bytes)
    }
}

impl From<Vec<u8>> for InputValue {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Bytes(bytes::Bytes::from(bytes))
    }
}

impl From<u8> for InputValue {
    fn from(value: u8) -> Self {
        Self::Integer(value)
    }
}

impl From<Blob> for InputValue {
    fn from(blob: Blob) -> Self {
        Self::Blob(blob)
    }
}

impl From<FileInput> for InputValue {
    fn from(record: FileInput) -> Self {
        Self::Record(record)
    }
}

/// An asynchronous sequence source, together with the incidental `path`
/// some stream producers attach to their handles
pub struct StreamSource {
    /// Producer-attached path. Ignored for classification; honoured by the
    /// record builder when the stream stands in for a path-only record.
    pub path: Option<String>,
    pub(crate) stream: ValueStream,
}

impl StreamSource {
    pub fn new<S>(stream: S) -> Self
    where
        S: Stream<Item = Result<InputValue>> + Send + 'static,
    {
        Self {
            path: None,
            stream: Box::pin(stream),
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }
}

impl fmt::Debug for StreamSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamSource")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

/// An opaque binary object
///
/// The core reads its size and content type but never iterates it; the
/// content normaliser decides what to do with the data.
#[derive(Debug, Clone)]
pub struct Blob {
    data: bytes::Bytes,
    content_type: Option<String>,
}

impl Blob {
    pub fn new(data: impl Into<bytes::Bytes>) -> Self {
        Self {
            data: data.into(),
            content_type: None,
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Size of the underlying data in bytes
    pub fn size(&self) -> usize {
        self.data.len()
    }

    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// Consume the blob, returning the underlying bytes
    pub fn into_bytes(self) -> bytes::Bytes {
        self.data
    }
}

/// The input-side structured record: a value that already carries a `path`
/// or `content` field, plus optional mode and modification time
#[derive(Debug, Default)]
pub struct FileInput {
    pub path: Option<String>,
    pub mode: Option<Mode>,
    pub mtime: Option<Mtime>,
    pub content: Option<Box<InputValue>>,
}

impl FileInput {
    /// Whether the record carries either of the fields that make it
    /// file-object-like
    pub fn is_file_object(&self) -> bool {
        self.path.is_some() || self.content.is_some()
    }
}

/// File permissions, passed through verbatim; producers hand over either a
/// numeric or a textual representation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Mode {
    Numeric(u32),
    Text(String),
}

/// Modification time, passed through verbatim; the core never interprets it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mtime {
    pub secs: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nsecs: Option<u32>,
}

/// The normalised output unit
///
/// `content` is present exactly when the source carried actual data rather
/// than being a bare path-only entry; its type is whatever the injected
/// content normaliser produces.
#[derive(Debug, Clone, PartialEq)]
pub struct FileRecord<C> {
    pub path: String,
    pub mode: Option<Mode>,
    pub mtime: Option<Mtime>,
    pub content: Option<C>,
}
