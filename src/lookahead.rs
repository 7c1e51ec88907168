use std::pin::Pin;
use std::task::{Context, Poll};

use futures::{Stream, StreamExt};

use crate::error::Result;
use crate::types::{InputValue, ValueStream};

/// Wraps a value sequence so its first element can be inspected before the
/// sequence is handed on, without losing the element and without buffering
/// more than one of them
///
/// Synchronous sources are adapted into the async form before wrapping,
/// which preserves their immediate-readiness scheduling; the adapter itself
/// introduces no buffering beyond its single slot, so the underlying
/// source's timing is observed unchanged.
pub struct Lookahead {
    source: ValueStream,
    buffered: Option<InputValue>,
    done: bool,
}

impl Lookahead {
    pub fn new(source: ValueStream) -> Self {
        Self {
            source,
            buffered: None,
            done: false,
        }
    }

    /// Look at the next element without advancing the externally observable
    /// consumption position
    ///
    /// Pulls at most one element from the source and requeues it. An
    /// exhausted source reports `None`; a source failure is consumed and
    /// returned immediately rather than replayed on the next pull.
    pub async fn peek(&mut self) -> Result<Option<&InputValue>> {
        if self.buffered.is_none() && !self.done {
            match self.source.next().await {
                Some(Ok(value)) => self.push(value),
                Some(Err(err)) => return Err(err),
                None => self.done = true,
            }
        }
        Ok(self.buffered.as_ref())
    }

    /// Requeue one value as the next element to be produced
    ///
    /// The adapter holds at most one buffered element; `peek` relies on this
    /// slot to replay what it pulled.
    pub fn push(&mut self, value: InputValue) {
        self.buffered = Some(value);
    }
}

impl Stream for Lookahead {
    type Item = Result<InputValue>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        if let Some(value) = this.buffered.take() {
            return Poll::Ready(Some(Ok(value)));
        }
        if this.done {
            return Poll::Ready(None);
        }
        match this.source.poll_next_unpin(cx) {
            Poll::Ready(None) => {
                this.done = true;
                Poll::Ready(None)
            }
            other => other,
        }
    }
}
