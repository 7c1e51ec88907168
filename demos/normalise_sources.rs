/// Walkthrough of the input shapes the normaliser accepts
///
/// This example demonstrates:
/// - Raw text, bytes and blobs
/// - Structured records with metadata and directory markers
/// - Sequences, nested sequences and pull streams
/// - Plugging in a custom content normaliser

use bytes::Bytes;
use futures::{stream, StreamExt};
use input_normaliser::{
    normalise, Blob, BytesNormaliser, ContentNormaliser, FileInput, InputValue, Mode, Mtime,
    NormaliseError, PullReader, PullSource,
};

async fn show(label: &str, input: InputValue) {
    println!("{}", label);
    println!("{}", "-".repeat(label.len()));

    let mut records = normalise(input, BytesNormaliser);
    while let Some(record) = records.next().await {
        match record {
            Ok(record) => {
                let path = if record.path.is_empty() {
                    "<anonymous>".to_string()
                } else {
                    record.path.clone()
                };
                match record.content {
                    Some(mut content) => {
                        let mut bytes = Vec::new();
                        while let Some(chunk) = content.next().await {
                            match chunk {
                                Ok(chunk) => bytes.extend_from_slice(&chunk),
                                Err(err) => {
                                    println!("   {} -> content failed: {}", path, err);
                                    break;
                                }
                            }
                        }
                        println!("   {} -> {} bytes {:?}", path, bytes.len(), bytes);
                    }
                    None => println!("   {} -> directory marker", path),
                }
            }
            Err(err) => println!("   error: {}", err),
        }
    }
    println!();
}

// A pull stream backed by a plain vector, standing in for a browser stream
struct VecPullSource {
    chunks: Vec<Bytes>,
}

impl PullSource for VecPullSource {
    fn acquire_reader(&mut self) -> Box<dyn PullReader> {
        Box::new(VecPullReader {
            chunks: std::mem::take(&mut self.chunks).into_iter(),
        })
    }
}

struct VecPullReader {
    chunks: std::vec::IntoIter<Bytes>,
}

#[async_trait::async_trait]
impl PullReader for VecPullReader {
    async fn read(&mut self) -> input_normaliser::Result<Option<InputValue>> {
        Ok(self.chunks.next().map(InputValue::Bytes))
    }
}

// A custom content normaliser that counts bytes instead of keeping them
struct ByteCounter;

#[async_trait::async_trait]
impl ContentNormaliser for ByteCounter {
    type Output = usize;

    async fn normalise(&self, content: InputValue) -> input_normaliser::Result<usize> {
        match content {
            InputValue::Text(text) => Ok(text.len()),
            InputValue::Bytes(bytes) => Ok(bytes.len()),
            InputValue::Blob(blob) => Ok(blob.size()),
            other => Err(NormaliseError::UnexpectedInput {
                type_name: other.type_name(),
            }),
        }
    }
}

#[tokio::main]
async fn main() {
    println!("=== Input Normalisation Example ===\n");

    show("1. Raw text", InputValue::from("hello world")).await;

    show(
        "2. Raw bytes and blobs",
        InputValue::sequence(vec![
            InputValue::from("readme contents"),
            InputValue::from(Blob::new(Bytes::from_static(b"\x89PNG")).with_content_type("image/png")),
        ]),
    )
    .await;

    show(
        "3. Records with metadata and a directory marker",
        InputValue::sequence(vec![
            InputValue::from(FileInput {
                path: Some("bin/tool".to_string()),
                mode: Some(Mode::Numeric(0o755)),
                mtime: Some(Mtime {
                    secs: 1_600_000_000,
                    nsecs: None,
                }),
                content: Some(Box::new(InputValue::from(vec![0u8, 1, 2]))),
            }),
            InputValue::from(FileInput {
                path: Some("docs".to_string()),
                ..Default::default()
            }),
        ]),
    )
    .await;

    show(
        "4. A sequence of integers is one file's content",
        InputValue::sequence([104u8, 105].map(InputValue::from)),
    )
    .await;

    show(
        "5. Nested sequences become per-record content",
        InputValue::sequence(vec![
            InputValue::sequence([1u8, 2].map(InputValue::from)),
            InputValue::sequence([3u8, 4].map(InputValue::from)),
        ]),
    )
    .await;

    show(
        "6. Async streams work the same way",
        InputValue::stream(stream::iter(vec![
            Ok(InputValue::from(FileInput {
                path: Some("streamed.txt".to_string()),
                content: Some(Box::new(InputValue::from("from a stream"))),
                ..Default::default()
            })),
        ])),
    )
    .await;

    show(
        "7. Pull streams are adapted via their reader",
        InputValue::pull_stream(VecPullSource {
            chunks: vec![Bytes::from_static(b"pulled "), Bytes::from_static(b"chunks")],
        }),
    )
    .await;

    println!("8. Custom content normaliser");
    println!("----------------------------");
    let mut records = normalise(
        InputValue::from(FileInput {
            path: Some("sized.txt".to_string()),
            content: Some(Box::new(InputValue::from("twelve bytes"))),
            ..Default::default()
        }),
        ByteCounter,
    );
    while let Some(record) = records.next().await {
        let record = record.expect("normalisation failed");
        println!("   {} -> {:?} bytes", record.path, record.content);
    }

    println!("\n=== Example Complete ===");
}
