//! Incremental socket reads.
//!
//! Every receive is bounded to [`READ_CHUNK`] bytes and reported as a
//! [`ConnectionOutcome`], so callers match on the result instead of
//! threading peer-close through error paths.

use std::io;
use std::time::Duration;

use bytes::{Bytes, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::time::timeout;

/// Upper bound for a single receive.
pub const READ_CHUNK: usize = 1024;

/// Result of one receive on a connection.
#[derive(Debug)]
pub enum ConnectionOutcome {
    /// Bytes arrived.
    Data(Bytes),
    /// The peer closed its side (zero-byte read).
    Closed,
    /// No bytes arrived within the idle timeout.
    Timeout,
    /// The socket failed.
    Error(io::Error),
}

/// Why a connection stopped producing messages.
#[derive(Debug, thiserror::Error)]
pub enum Disconnect {
    #[error("peer closed the connection")]
    Closed,
    #[error("connection idle for longer than the read timeout")]
    Timeout,
    #[error("socket error: {0}")]
    Io(#[from] io::Error),
}

/// Performs one bounded receive.
///
/// With `idle = None` the read blocks until the peer sends or closes.
pub async fn recv<S>(stream: &mut S, idle: Option<Duration>) -> ConnectionOutcome
where
    S: AsyncRead + Unpin,
{
    let mut chunk = BytesMut::with_capacity(READ_CHUNK);

    let read = match idle {
        Some(limit) => match timeout(limit, stream.read_buf(&mut chunk)).await {
            Ok(read) => read,
            Err(_) => return ConnectionOutcome::Timeout,
        },
        None => stream.read_buf(&mut chunk).await,
    };

    match read {
        Ok(0) => ConnectionOutcome::Closed,
        Ok(_) => ConnectionOutcome::Data(chunk.freeze()),
        Err(e) => ConnectionOutcome::Error(e),
    }
}

/// Receives into `buffer` until `frame` can cut a value out of it.
///
/// `frame` is tried against the bytes already buffered before any receive is
/// issued, so data that arrived with an earlier read is never waited for
/// again.
pub async fn read_until<S, T, F>(
    stream: &mut S,
    buffer: &mut BytesMut,
    idle: Option<Duration>,
    mut frame: F,
) -> Result<T, Disconnect>
where
    S: AsyncRead + Unpin,
    F: FnMut(&mut BytesMut) -> Option<T>,
{
    loop {
        if let Some(framed) = frame(buffer) {
            return Ok(framed);
        }

        match recv(stream, idle).await {
            ConnectionOutcome::Data(bytes) => {
                tracing::trace!(received = bytes.len(), buffered = buffer.len(), "recv");
                buffer.extend_from_slice(&bytes);
            }
            ConnectionOutcome::Closed => return Err(Disconnect::Closed),
            ConnectionOutcome::Timeout => return Err(Disconnect::Timeout),
            ConnectionOutcome::Error(e) => return Err(Disconnect::Io(e)),
        }
    }
}
