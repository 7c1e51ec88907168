use std::pin::Pin;

use async_stream::try_stream;
use futures::{stream, Stream, StreamExt};

use crate::classify::{classify, Shape};
use crate::content::ContentNormaliser;
use crate::error::{NormaliseError, Result};
use crate::lookahead::Lookahead;
use crate::types::{FileInput, FileRecord, InputValue, StreamSource};

/// Lazy sequence of normalised file records
pub type FileRecordStream<C> = Pin<Box<dyn Stream<Item = Result<FileRecord<C>>> + Send>>;

/// Turn any recognised input shape into a lazy sequence of file records
///
/// Raw text, bytes and blobs become a single anonymous record. Sequences
/// become one record per element in source order, except sequences of
/// integers or byte chunks, which are one file's content. Pull streams are
/// adapted to async sequences first, and nested sequences become the
/// content of their element's record.
///
/// Nothing is pulled from the input before the returned stream is polled,
/// so unbounded sources stay unbounded; a consumer that stops polling stops
/// the whole chain. Content is handed to `normaliser` as-is, and its
/// failures propagate through the record stream unchanged.
pub fn normalise<N>(input: InputValue, normaliser: N) -> FileRecordStream<N::Output>
where
    N: ContentNormaliser + 'static,
{
    match input.into_sequence() {
        Err(InputValue::Absent) => {
            Box::pin(stream::once(async { Err(NormaliseError::AbsentInput) }))
        }

        // raw text, bytes and blobs become a single anonymous record
        Err(value @ (InputValue::Text(_) | InputValue::Bytes(_) | InputValue::Blob(_))) => {
            single_record(value, normaliser)
        }

        // every sequence shape, pull streams included, is unified into the
        // async form and dispatched on its first element
        Ok(items) => Box::pin(try_stream! {
            let mut items = Lookahead::new(items);
            if let Some(shape) = peek_shape(&mut items).await? {
                match shape {
                    // a sequence of integers or byte chunks is one file's
                    // content, not one file per element
                    Shape::Integer | Shape::Bytes => {
                        let content = InputValue::Stream(StreamSource::new(items));
                        yield to_file_record(content, &normaliser).await?;
                    }
                    // one record per element, in source order; nested
                    // sequences become that record's content
                    _ => {
                        while let Some(item) = items.next().await {
                            yield to_file_record(item?, &normaliser).await?;
                        }
                    }
                }
            }
            // peek found nothing: empty sources become empty outputs, never
            // a single record with empty content
        }),

        // checked after the sequence shapes: stream handles may carry an
        // incidental `path` that must not reclassify them as records
        Err(InputValue::Record(record)) if record.is_file_object() => {
            single_record(InputValue::Record(record), normaliser)
        }

        Err(other) => {
            let type_name = other.type_name();
            Box::pin(stream::once(async move {
                Err(NormaliseError::UnexpectedInput { type_name })
            }))
        }
    }
}

/// One record, produced lazily
fn single_record<N>(value: InputValue, normaliser: N) -> FileRecordStream<N::Output>
where
    N: ContentNormaliser + 'static,
{
    Box::pin(stream::once(async move {
        to_file_record(value, &normaliser).await
    }))
}

/// Classify the first element of a wrapped sequence without consuming it
async fn peek_shape(items: &mut Lookahead) -> Result<Option<Shape>> {
    match items.peek().await? {
        Some(first) => Ok(Some(classify(first)?)),
        None => Ok(None),
    }
}

/// Build one record from one non-sequence value
///
/// A record's own `content` field wins. A value with no `path` field at all
/// is raw content for an anonymous file. A `path` with no content is a
/// directory or placeholder entry and gets no content at all.
pub(crate) async fn to_file_record<N>(
    input: InputValue,
    normaliser: &N,
) -> Result<FileRecord<N::Output>>
where
    N: ContentNormaliser,
{
    match input {
        InputValue::Record(record) if record.is_file_object() => {
            let FileInput {
                path,
                mode,
                mtime,
                content,
            } = record;
            let content = match content {
                Some(content) => Some(normaliser.normalise(*content).await?),
                None => None,
            };
            Ok(FileRecord {
                path: path.unwrap_or_default(),
                mode,
                mtime,
                content,
            })
        }
        // a stream handle that arrived with a producer-attached path and no
        // content field behaves like a path-only record
        InputValue::Stream(source) if source.path.is_some() => Ok(FileRecord {
            path: source.path.unwrap_or_default(),
            mode: None,
            mtime: None,
            content: None,
        }),
        value => Ok(FileRecord {
            path: String::new(),
            mode: None,
            mtime: None,
            content: Some(normaliser.normalise(value).await?),
        }),
    }
}
