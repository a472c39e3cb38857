//! Line decoding and fixed-size batching of streamed records.
//!
//! Nothing here knows about processes: [`line_stream`] turns any buffered
//! reader into lines, and [`Batched`] groups any fallible stream into
//! vectors of at most `size` elements.

use futures::stream::{self, BoxStream, Stream, StreamExt};
use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

/// Records forwarded to the host per batch.
pub const DEFAULT_BATCH_SIZE: usize = 1000;

/// Streams lines from `reader`, decoding invalid UTF-8 lossily.
///
/// Line terminators (`\n` or `\r\n`) are stripped. A trailing line without
/// a terminator is still yielded.
pub fn line_stream<'a, R>(reader: R) -> BoxStream<'a, io::Result<String>>
where
    R: AsyncBufRead + Unpin + Send + 'a,
{
    stream::unfold(reader, |mut reader| async move {
        let mut buf = Vec::new();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => None,
            Ok(_) => {
                if buf.last() == Some(&b'\n') {
                    buf.pop();
                    if buf.last() == Some(&b'\r') {
                        buf.pop();
                    }
                }
                let line = String::from_utf8_lossy(&buf).into_owned();
                Some((Ok(line), reader))
            }
            Err(e) => Some((Err(e), reader)),
        }
    })
    .boxed()
}

/// Groups a fallible stream into batches, preserving order.
///
/// A batch is emitted when it is full or when the input ends. A read error
/// ends the stream after the items read so far have been emitted.
pub struct Batched<S, T> {
    inner: S,
    buffer: Vec<T>,
    size: usize,
    done: bool,
}

impl<S, T> Batched<S, T> {
    pub fn new(inner: S, size: usize) -> Self {
        let size = size.max(1);
        Self {
            inner,
            buffer: Vec::with_capacity(size),
            size,
            done: false,
        }
    }

    fn flush(&mut self) -> Option<Vec<T>> {
        if self.buffer.is_empty() {
            None
        } else {
            Some(std::mem::take(&mut self.buffer))
        }
    }
}

// The buffer is never pinned, only the inner stream is polled.
impl<S: Unpin, T> Unpin for Batched<S, T> {}

impl<S, T> Stream for Batched<S, T>
where
    S: Stream<Item = io::Result<T>> + Unpin,
{
    type Item = Vec<T>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = &mut *self;
        if this.done {
            return Poll::Ready(None);
        }

        loop {
            match this.inner.poll_next_unpin(cx) {
                Poll::Ready(Some(Ok(item))) => {
                    this.buffer.push(item);
                    if this.buffer.len() >= this.size {
                        let full = std::mem::replace(
                            &mut this.buffer,
                            Vec::with_capacity(this.size),
                        );
                        return Poll::Ready(Some(full));
                    }
                }
                Poll::Ready(Some(Err(e))) => {
                    log::warn!("Stopped reading log output: {}", e);
                    this.done = true;
                    return Poll::Ready(this.flush());
                }
                Poll::Ready(None) => {
                    this.done = true;
                    return Poll::Ready(this.flush());
                }
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}

pub trait BatchExt<T>: Stream<Item = io::Result<T>> + Sized {
    fn batched(self, size: usize) -> Batched<Self, T> {
        Batched::new(self, size)
    }
}

impl<S, T> BatchExt<T> for S where S: Stream<Item = io::Result<T>> + Sized {}
