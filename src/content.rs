use std::pin::Pin;

use async_stream::try_stream;
use async_trait::async_trait;
use bytes::Bytes;
use futures::{stream, Stream, StreamExt};

use crate::error::{NormaliseError, Result};
use crate::types::InputValue;

/// Lazy sequence of raw byte chunks
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes>> + Send>>;

/// Capability contract for turning raw content into whatever the consuming
/// pipeline needs
///
/// The content arrives exactly as it appeared in the input: the value of a
/// record's `content` field, a whole raw value, or a lazy sequence of
/// further values. The normaliser's output is opaque to the core, and its
/// failures propagate through the record stream unchanged.
#[async_trait]
pub trait ContentNormaliser: Send + Sync {
    /// What the consuming pipeline receives as a record's content
    type Output: Send + 'static;

    async fn normalise(&self, content: InputValue) -> Result<Self::Output>;
}

/// Content normaliser that flattens every recognised content shape into a
/// lazy stream of byte chunks
///
/// Text becomes its UTF-8 bytes, buffers and blobs pass through as single
/// chunks, bare integers become single bytes, and sequences are walked
/// depth-first in source order. Nothing is pulled from a sequence before
/// the chunk stream itself is polled.
pub struct BytesNormaliser;

#[async_trait]
impl ContentNormaliser for BytesNormaliser {
    type Output = ByteStream;

    async fn normalise(&self, content: InputValue) -> Result<ByteStream> {
        match content {
            InputValue::Absent => Err(NormaliseError::AbsentInput),
            record @ InputValue::Record(_) => Err(NormaliseError::UnexpectedInput {
                type_name: record.type_name(),
            }),
            value => Ok(byte_chunks(value)),
        }
    }
}

/// Walk one content value depth-first, yielding its byte chunks lazily
fn byte_chunks(value: InputValue) -> ByteStream {
    match value.into_sequence() {
        Ok(mut items) => Box::pin(try_stream! {
            while let Some(item) = items.next().await {
                let mut chunks = byte_chunks(item?);
                while let Some(chunk) = chunks.next().await {
                    yield chunk?;
                }
            }
        }),
        Err(InputValue::Text(text)) => one_chunk(Ok(Bytes::from(text))),
        Err(InputValue::Bytes(bytes)) => one_chunk(Ok(bytes)),
        Err(InputValue::Blob(blob)) => one_chunk(Ok(blob.into_bytes())),
        Err(InputValue::Integer(byte)) => one_chunk(Ok(Bytes::copy_from_slice(&[byte]))),
        Err(InputValue::Absent) => one_chunk(Err(NormaliseError::AbsentInput)),
        Err(other) => one_chunk(Err(NormaliseError::UnexpectedInput {
            type_name: other.type_name(),
        })),
    }
}

fn one_chunk(chunk: Result<Bytes>) -> ByteStream {
    Box::pin(stream::once(async move { chunk }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Blob, FileInput};

    async fn drain(normalised: Result<ByteStream>) -> Vec<u8> {
        let mut chunks = normalised.unwrap();
        let mut all = Vec::new();
        while let Some(chunk) = chunks.next().await {
            all.extend_from_slice(&chunk.unwrap());
        }
        all
    }

    #[tokio::test]
    async fn text_becomes_utf8_bytes() {
        let chunks = BytesNormaliser.normalise(InputValue::from("héllo")).await;
        assert_eq!(drain(chunks).await, "héllo".as_bytes());
    }

    #[tokio::test]
    async fn buffers_and_blobs_pass_through() {
        let chunks = BytesNormaliser
            .normalise(InputValue::from(vec![1u8, 2, 3]))
            .await;
        assert_eq!(drain(chunks).await, vec![1, 2, 3]);

        let chunks = BytesNormaliser
            .normalise(InputValue::from(Blob::new(vec![4u8, 5])))
            .await;
        assert_eq!(drain(chunks).await, vec![4, 5]);
    }

    #[tokio::test]
    async fn integer_sequences_concatenate_into_bytes() {
        let input = InputValue::sequence([1u8, 2, 3].map(InputValue::from));
        let chunks = BytesNormaliser.normalise(input).await;
        assert_eq!(drain(chunks).await, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn nested_sequences_flatten_in_source_order() {
        let inner_a = InputValue::sequence(vec![InputValue::from(1u8), InputValue::from(2u8)]);
        let inner_b = InputValue::sequence(vec![InputValue::from(vec![3u8, 4])]);
        let input = InputValue::sequence(vec![inner_a, inner_b]);

        let chunks = BytesNormaliser.normalise(input).await;
        assert_eq!(drain(chunks).await, vec![1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn async_sequences_are_accepted() {
        let items: Vec<Result<InputValue>> = vec![
            Ok(InputValue::from("ab")),
            Ok(InputValue::from(vec![99u8])),
        ];
        let chunks = BytesNormaliser
            .normalise(InputValue::stream(stream::iter(items)))
            .await;
        assert_eq!(drain(chunks).await, vec![b'a', b'b', 99]);
    }

    #[tokio::test]
    async fn records_are_rejected_as_content() {
        let record = InputValue::from(FileInput {
            path: Some("a".to_string()),
            ..Default::default()
        });
        assert!(matches!(
            BytesNormaliser.normalise(record).await,
            Err(NormaliseError::UnexpectedInput {
                type_name: "object"
            })
        ));
    }

    #[tokio::test]
    async fn nested_record_fails_lazily_while_iterating() {
        let input = InputValue::sequence(vec![
            InputValue::from(vec![1u8]),
            InputValue::from(FileInput {
                path: Some("a".to_string()),
                ..Default::default()
            }),
        ]);

        let mut chunks = BytesNormaliser.normalise(input).await.unwrap();
        assert_eq!(chunks.next().await.unwrap().unwrap().as_ref(), &[1]);
        assert!(matches!(
            chunks.next().await,
            Some(Err(NormaliseError::UnexpectedInput { .. }))
        ));
    }
}
