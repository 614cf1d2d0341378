//! Stream-to-file bridging for sector inputs.
//!
//! Downstream proving code consumes sector data through file descriptors
//! with random-access semantics. Sector inputs, however, often arrive as
//! plain byte streams (network bodies, decompressors). [`adapt`] bridges
//! the two: file-backed sources pass through untouched, and generic streams
//! are pumped through an OS pipe by a background copy task so the consumer
//! sees an ordinary readable descriptor immediately.

use crate::error::{StorageResult, StreamError};
use std::os::unix::io::{AsRawFd, RawFd};
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::fs::File;
use tokio::io::{AsyncRead, AsyncReadExt, ReadBuf};
use tokio::net::unix::pipe;
use tokio::sync::oneshot;
use tracing::warn;

/// A bounded byte source for one sector, tagged by its access capability.
///
/// The tag replaces a runtime "is this secretly a file?" check: callers
/// state up front whether the source already has file semantics, and
/// [`adapt`] picks the fast path from the variant alone.
pub enum SectorSource {
    /// Already file-backed: random access, real descriptor. No copy needed.
    File(File),
    /// A generic non-seekable stream; must be pumped through a pipe.
    Stream(Box<dyn AsyncRead + Send + Unpin>),
}

impl SectorSource {
    /// Wrap a generic stream source.
    pub fn stream(reader: impl AsyncRead + Send + Unpin + 'static) -> Self {
        Self::Stream(Box::new(reader))
    }
}

impl From<File> for SectorSource {
    fn from(file: File) -> Self {
        Self::File(file)
    }
}

/// Readable, descriptor-backed handle produced by [`adapt`].
///
/// Either the original file (fast path) or the read end of the session's
/// pipe. Both variants expose a real file descriptor via [`AsRawFd`].
#[derive(Debug)]
pub enum AdaptedFile {
    File(File),
    Pipe(pipe::Receiver),
}

impl AsyncRead for AdaptedFile {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<std::io::Result<()>> {
        match self.get_mut() {
            Self::File(file) => Pin::new(file).poll_read(cx, buf),
            Self::Pipe(receiver) => Pin::new(receiver).poll_read(cx, buf),
        }
    }
}

impl AsRawFd for AdaptedFile {
    fn as_raw_fd(&self) -> RawFd {
        match self {
            Self::File(file) => file.as_raw_fd(),
            Self::Pipe(receiver) => receiver.as_raw_fd(),
        }
    }
}

/// Join handle for one adaptation session's background copy.
///
/// `wait` consumes the completion, so "joined at most once" is a type-level
/// guarantee rather than a runtime convention. The copy task itself never
/// accepts mid-flight cancellation: once spawned it runs to completion or to
/// first error regardless of what the consumer does.
#[derive(Debug)]
pub struct Completion {
    // `None` on the fast path, where there is nothing to wait for.
    rx: Option<oneshot::Receiver<Result<(), StreamError>>>,
}

impl Completion {
    fn ready() -> Self {
        Self { rx: None }
    }

    /// Block until the copy task has finished and return its recorded
    /// outcome. Resolves immediately with `Ok(())` for file-backed sources.
    pub async fn wait(self) -> Result<(), StreamError> {
        match self.rx {
            None => Ok(()),
            Some(rx) => rx.await.unwrap_or(Err(StreamError::TaskLost)),
        }
    }
}

/// Bridge a bounded byte source of declared length `n` into a readable,
/// descriptor-backed handle.
///
/// File-backed sources are returned as-is with an immediately-ready
/// [`Completion`]. Generic streams get an OS pipe and exactly one background
/// task that copies exactly `n` bytes into the write end, then closes it
/// exactly once, on success or failure. The returned handle is readable
/// right away; pipe backpressure throttles the copy task when the consumer
/// lags, and the consumer blocks while the task has produced nothing yet.
///
/// Copy failures and short copies (bytes copied != `n`) are logged and
/// surfaced through the completion; the handle still yields whatever bytes
/// made it through before the failure.
///
/// Must be called from within a tokio runtime.
pub fn adapt(source: SectorSource, n: u64) -> StorageResult<(AdaptedFile, Completion)> {
    match source {
        SectorSource::File(file) => Ok((AdaptedFile::File(file), Completion::ready())),
        SectorSource::Stream(reader) => {
            let (tx, rx) = pipe::pipe()?;
            let (done_tx, done_rx) = oneshot::channel();
            tokio::spawn(async move {
                let result = copy_exact(reader, tx, n).await;
                if let Err(e) = &result {
                    warn!(error = %e, expected = n, "sector stream adaptation failed");
                }
                // The consumer may have dropped the completion; that loses
                // nothing but the notification.
                let _ = done_tx.send(result);
            });
            Ok((
                AdaptedFile::Pipe(rx),
                Completion { rx: Some(done_rx) },
            ))
        }
    }
}

/// Copy exactly `n` bytes from `reader` into the pipe's write end.
///
/// The write end is closed exactly once on every path, by dropping the
/// sender; closing an anonymous pipe has no observable failure mode, so
/// nothing is lost by not inspecting it. A source that ends early is
/// reported as [`StreamError::ShortCopy`], not treated as success.
async fn copy_exact(
    mut reader: Box<dyn AsyncRead + Send + Unpin>,
    mut writer: pipe::Sender,
    n: u64,
) -> Result<(), StreamError> {
    let copied = match tokio::io::copy(&mut (&mut reader).take(n), &mut writer).await {
        Ok(copied) => copied,
        Err(e) => return Err(StreamError::Copy(e)),
    };
    drop(writer);
    if copied != n {
        return Err(StreamError::ShortCopy {
            copied,
            expected: n,
        });
    }
    Ok(())
}
