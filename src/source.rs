//! The git log source: runs `git log` and streams parsed items in batches.

use crate::batch::{line_stream, BatchExt, DEFAULT_BATCH_SIZE};
use crate::config::{QueryConfig, ResolvedQuery};
use crate::error::Result;
use crate::git::process::ExitWaiter;
use crate::git::{build_log_args, parse_log_line, GitProcess};
use crate::item::DisplayItem;
use crate::sink::MessageSink;
use futures::{Stream, StreamExt};
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::io::{AsyncRead, BufReader};
use tokio::process::ChildStderr;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio_stream::wrappers::ReceiverStream;

/// How a finished gather ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GatherOutcome {
    pub success: bool,
    pub code: Option<i32>,
    /// Error messages handed to the sink
    pub reported: usize,
    /// The consumer stopped before the output was exhausted
    pub cancelled: bool,
}

/// Batches of items from one `git log` run.
///
/// The stream ends once stdout is exhausted, whether or not git succeeded.
/// Dropping it stops reading, releases the stdout pipe and kills git.
pub struct LogStream {
    items: ReceiverStream<Vec<DisplayItem>>,
    pump: JoinHandle<()>,
    exit: JoinHandle<Result<GatherOutcome>>,
}

impl LogStream {
    /// Stops consuming (if not already drained) and waits for git to exit
    /// and for any error messages to be reported.
    pub async fn finish(self) -> Result<GatherOutcome> {
        drop(self.items);
        self.pump.await?;
        self.exit.await?
    }
}

impl Stream for LogStream {
    type Item = Vec<DisplayItem>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.items.poll_next_unpin(cx)
    }
}

/// Starts `git log` for `config` and returns the stream of item batches.
///
/// Fails only if the process cannot be started. A non-zero exit is
/// reported line by line through `sink`; items already read are kept.
pub async fn gather(config: QueryConfig, sink: Arc<dyn MessageSink>) -> Result<LogStream> {
    gather_with_batch_size(config, sink, DEFAULT_BATCH_SIZE).await
}

pub async fn gather_with_batch_size(
    config: QueryConfig,
    sink: Arc<dyn MessageSink>,
    batch_size: usize,
) -> Result<LogStream> {
    let query = Arc::new(config.resolve()?);
    let args = build_log_args(&query);
    let process = GitProcess::spawn(&query.git_program, &args, &query.cwd)?;
    let (stdout, stderr, exit) = process.into_parts();

    // Capacity 1: git output is only read as fast as the host takes batches.
    let (tx, rx) = mpsc::channel(1);
    let (cancel_tx, cancel_rx) = oneshot::channel();

    let pump = tokio::spawn(pump_items(
        stdout,
        Arc::clone(&query),
        batch_size,
        tx,
        cancel_tx,
    ));

    let exit = tokio::spawn(report_exit(exit, stderr, sink, cancel_rx));

    Ok(LogStream {
        items: ReceiverStream::new(rx),
        pump,
        exit,
    })
}

async fn pump_items<R>(
    stdout: R,
    query: Arc<ResolvedQuery>,
    batch_size: usize,
    tx: mpsc::Sender<Vec<DisplayItem>>,
    cancel: oneshot::Sender<()>,
) where
    R: AsyncRead + Unpin + Send + 'static,
{
    let mut batches = line_stream(BufReader::new(stdout)).batched(batch_size);
    let mut forwarded = 0usize;

    loop {
        let lines = tokio::select! {
            next = batches.next() => match next {
                Some(lines) => lines,
                None => break,
            },
            _ = tx.closed() => break,
        };

        let items: Vec<DisplayItem> = lines
            .iter()
            .map(|line| parse_log_line(&query.cwd, line, query.graph))
            .collect();
        let count = items.len();

        if tx.send(items).await.is_err() {
            break;
        }
        forwarded += count;
    }

    if tx.is_closed() && !is_exhausted(&mut batches).await {
        log::debug!("Item stream dropped after {} items, stopping", forwarded);
        let _ = cancel.send(());
        return;
    }

    log::debug!("Forwarded {} items from {}", forwarded, query.cwd.display());
}

/// True if the stream has already ended, without waiting for more input.
async fn is_exhausted<S>(stream: &mut S) -> bool
where
    S: Stream + Unpin,
{
    futures::future::poll_fn(|cx| match stream.poll_next_unpin(cx) {
        Poll::Ready(None) => Poll::Ready(true),
        _ => Poll::Ready(false),
    })
    .await
}

/// Waits for git to exit while draining stderr, then replays stderr to
/// `sink` if the exit status is a failure.
///
/// If the consumer cancels first, git is killed and stderr is dropped:
/// stopping early is not an error.
async fn report_exit(
    mut exit: ExitWaiter,
    stderr: ChildStderr,
    sink: Arc<dyn MessageSink>,
    cancel: oneshot::Receiver<()>,
) -> Result<GatherOutcome> {
    let finished = tokio::select! {
        done = futures::future::join(exit.wait(), read_lines(stderr)) => Some(done),
        _ = cancelled(cancel) => None,
    };

    let (status, errors) = match finished {
        Some(done) => done,
        None => {
            if let Err(e) = exit.kill().await {
                log::debug!("Failed to kill `{}`: {}", exit.command, e);
            }
            return Ok(GatherOutcome {
                success: false,
                code: None,
                reported: 0,
                cancelled: true,
            });
        }
    };
    let status = status?;

    let mut reported = 0;
    if !status.success() {
        for line in errors.iter().filter(|line| !line.is_empty()) {
            sink.error(line);
            reported += 1;
        }
    }

    Ok(GatherOutcome {
        success: status.success(),
        code: status.code(),
        reported,
        cancelled: false,
    })
}

/// Resolves once the pump reports cancellation. A dropped sender means
/// the pump ended normally, so this never resolves.
async fn cancelled(cancel: oneshot::Receiver<()>) {
    if cancel.await.is_err() {
        std::future::pending::<()>().await;
    }
}

/// Reads every line of `reader`; a read error ends the list early.
async fn read_lines<R>(reader: R) -> Vec<String>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    let mut lines = line_stream(BufReader::new(reader));
    let mut collected = Vec::new();
    while let Some(line) = lines.next().await {
        match line {
            Ok(line) => collected.push(line),
            Err(e) => {
                log::warn!("Failed to read git stderr: {}", e);
                break;
            }
        }
    }
    collected
}
