//! Splits a connection buffer into header blocks and length-delimited bodies.
//!
//! Both functions consume exactly what they return from the front of the
//! buffer. Whatever follows stays buffered and becomes the start of the next
//! message on a kept-alive connection.

use bytes::{Buf, Bytes, BytesMut};

use crate::http::parser::ParseError;

/// Terminates a header block.
pub const HEADER_DELIMITER: &[u8] = b"\r\n\r\n";

/// Largest header block accepted, delimiter excluded.
pub const MAX_HEADER_BYTES: usize = 8 * 1024;

/// A header block together with its complete body.
///
/// Only built once `body.len()` equals the declared `Content-Length`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawMessage {
    pub header_block: Bytes,
    pub body: Bytes,
}

/// Position of the first header delimiter, if any.
pub fn find_header_end(buf: &[u8]) -> Option<usize> {
    buf.windows(HEADER_DELIMITER.len())
        .position(|w| w == HEADER_DELIMITER)
}

/// Cuts the header block off the front of `buffer`.
///
/// The delimiter itself is dropped. Returns `None` and leaves the buffer
/// untouched while no delimiter has arrived.
pub fn frame_header(buffer: &mut BytesMut) -> Option<Bytes> {
    let end = find_header_end(buffer)?;
    let header = buffer.split_to(end).freeze();
    buffer.advance(HEADER_DELIMITER.len());
    Some(header)
}

/// [`frame_header`] with a size cap.
///
/// Fails as soon as the buffer proves the block is longer than `max`,
/// whether or not its delimiter has arrived yet.
pub fn frame_header_within(
    buffer: &mut BytesMut,
    max: usize,
) -> Option<Result<Bytes, ParseError>> {
    match find_header_end(buffer) {
        Some(end) if end > max => Some(Err(ParseError::HeaderTooLarge)),
        Some(_) => frame_header(buffer).map(Ok),
        None if buffer.len() >= max + HEADER_DELIMITER.len() => {
            Some(Err(ParseError::HeaderTooLarge))
        }
        None => None,
    }
}

/// Cuts exactly `content_length` body bytes off the front of `buffer`.
pub fn frame_body(buffer: &mut BytesMut, content_length: usize) -> Option<Bytes> {
    if buffer.len() < content_length {
        return None;
    }
    Some(buffer.split_to(content_length).freeze())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_split_keeps_remainder() {
        let mut buf = BytesMut::from(&b"GET / HTTP/1.1\r\n\r\nrest"[..]);
        let header = frame_header(&mut buf).unwrap();

        assert_eq!(&header[..], b"GET / HTTP/1.1");
        assert_eq!(&buf[..], b"rest");
    }

    #[test]
    fn incomplete_header_leaves_buffer_alone() {
        let mut buf = BytesMut::from(&b"GET / HTTP/1.1\r\n"[..]);
        assert!(frame_header(&mut buf).is_none());
        assert_eq!(buf.len(), 16);
    }

    #[test]
    fn header_at_the_cap_is_accepted() {
        let mut buf = BytesMut::from(&b"abcd\r\n\r\n"[..]);
        assert_eq!(frame_header_within(&mut buf, 4), Some(Ok(Bytes::from_static(b"abcd"))));
        assert!(buf.is_empty());
    }

    #[test]
    fn oversized_header_is_rejected_with_or_without_delimiter() {
        let mut complete = BytesMut::from(&b"abcde\r\n\r\n"[..]);
        assert_eq!(
            frame_header_within(&mut complete, 4),
            Some(Err(ParseError::HeaderTooLarge))
        );

        // Could still finish at exactly 4 bytes.
        let mut partial = BytesMut::from(&b"abcd\r\n\r"[..]);
        assert_eq!(frame_header_within(&mut partial, 4), None);

        let mut runaway = BytesMut::from(&b"abcdefgh"[..]);
        assert_eq!(
            frame_header_within(&mut runaway, 4),
            Some(Err(ParseError::HeaderTooLarge))
        );
    }
}
