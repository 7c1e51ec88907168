use async_stream::stream;
use async_trait::async_trait;

use crate::error::Result;
use crate::types::{InputValue, ValueStream};

/// Reader half of a pull stream
///
/// Pulls one value at a time from the producer. Implementors decide what a
/// chunk is; byte buffers are the common case but any recognised value can
/// come through.
#[async_trait]
pub trait PullReader: Send {
    /// Pull the next value; `None` once the source is exhausted
    async fn read(&mut self) -> Result<Option<InputValue>>;

    /// Hand the lock back to the producer once iteration stops
    ///
    /// Called exactly once, whether iteration ran to completion or was
    /// abandoned early.
    fn release(&mut self) {}
}

/// A browser-style pull stream: an opaque source that hands out a reader on
/// demand and stays locked to that reader until it is released
pub trait PullSource: Send {
    fn acquire_reader(&mut self) -> Box<dyn PullReader>;
}

/// Adapt a pull stream into an asynchronous sequence
///
/// The reader is acquired lazily on the first poll and released when the
/// sequence completes or its consumer drops it early.
pub(crate) fn reader_stream(mut source: Box<dyn PullSource>) -> ValueStream {
    Box::pin(stream! {
        let mut reader = ReleaseOnDrop(source.acquire_reader());
        loop {
            match reader.0.read().await {
                Ok(Some(value)) => yield Ok(value),
                Ok(None) => break,
                Err(err) => {
                    yield Err(err);
                    break;
                }
            }
        }
    })
}

struct ReleaseOnDrop(Box<dyn PullReader>);

impl Drop for ReleaseOnDrop {
    fn drop(&mut self) {
        self.0.release();
    }
}
