use std::time::Duration;

use bytes::{Bytes, BytesMut};
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;

use crate::config::Target;
use crate::http::framer::{self, MAX_HEADER_BYTES, RawMessage};
use crate::http::parser::{MessageHead, ParseError};
use crate::http::reader::{self, Disconnect};

/// Initial capacity of a connection buffer.
const BUFFER_CAPACITY: usize = 4096;

/// One transport plus the bytes read from it that no message has claimed yet.
///
/// The buffer lives exactly as long as the stream: a reconnect builds a new
/// session instead of clearing this one.
pub struct Session<S> {
    stream: S,
    buffer: BytesMut,
    idle_timeout: Option<Duration>,
}

/// Either side of a failed message read.
#[derive(Debug, thiserror::Error)]
pub enum ReadError {
    #[error(transparent)]
    Disconnect(#[from] Disconnect),
    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl Session<TcpStream> {
    /// Opens a fresh connection to `target` (no read timeout).
    pub async fn connect(target: &Target) -> std::io::Result<Self> {
        let stream = TcpStream::connect(target.addr()).await?;
        Ok(Self::new(stream, None))
    }
}

impl<S> Session<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, idle_timeout: Option<Duration>) -> Self {
        Self {
            stream,
            buffer: BytesMut::with_capacity(BUFFER_CAPACITY),
            idle_timeout,
        }
    }

    /// Bytes received but not yet framed into a message.
    pub fn buffered(&self) -> &[u8] {
        &self.buffer
    }

    /// Reads until a full header block is buffered and cuts it off.
    ///
    /// Gives up with [`ParseError::HeaderTooLarge`] once more than
    /// [`MAX_HEADER_BYTES`] arrive without a blank line.
    pub async fn read_header(&mut self) -> Result<Bytes, ReadError> {
        let framed = reader::read_until(
            &mut self.stream,
            &mut self.buffer,
            self.idle_timeout,
            |buf| framer::frame_header_within(buf, MAX_HEADER_BYTES),
        )
        .await?;
        Ok(framed?)
    }

    /// Reads until `content_length` body bytes are buffered and cuts them off.
    pub async fn read_body(&mut self, content_length: usize) -> Result<Bytes, Disconnect> {
        reader::read_until(
            &mut self.stream,
            &mut self.buffer,
            self.idle_timeout,
            |buf| framer::frame_body(buf, content_length),
        )
        .await
    }

    /// Frames one whole message; `content_length` reads the declared body
    /// length out of the header block.
    pub async fn read_raw<F>(&mut self, content_length: F) -> Result<RawMessage, ReadError>
    where
        F: FnOnce(&[u8]) -> Result<usize, ParseError>,
    {
        let header_block = self.read_header().await?;
        let len = content_length(&header_block)?;
        let body = self.read_body(len).await?;
        Ok(RawMessage { header_block, body })
    }

    /// Frames and decodes one whole message.
    ///
    /// The body is only awaited once the head has been decoded, so a head
    /// that fails to parse leaves its body bytes in the buffer.
    pub async fn read_message<H: MessageHead>(&mut self) -> Result<(H, Bytes), ReadError> {
        let raw = self
            .read_raw(|block| H::parse(block).map(|head| head.content_length()))
            .await?;
        let head = H::parse(&raw.header_block)?;
        Ok((head, raw.body))
    }

    pub async fn send(&mut self, bytes: &[u8]) -> std::io::Result<()> {
        self.stream.write_all(bytes).await?;
        self.stream.flush().await
    }

    pub fn stream_mut(&mut self) -> &mut S {
        &mut self.stream
    }

    pub async fn shutdown(mut self) -> std::io::Result<()> {
        self.stream.shutdown().await
    }
}
