//! Framing over chunked arrival, driven by scripted mock sockets.

use std::time::Duration;

use keepalive::http::framer::{MAX_HEADER_BYTES, RawMessage};
use keepalive::http::parser::{ParseError, parse_request_head};
use keepalive::http::reader::{Disconnect, READ_CHUNK};
use keepalive::http::request::RequestHead;
use keepalive::http::response::ResponseHead;
use keepalive::http::session::{ReadError, Session};
use tokio_test::io::Builder;

const MESSAGE: &[u8] =
    b"GET /upload HTTP/1.1\r\nHost: localhost\r\nContent-Length: 11\r\n\r\nhello world";

fn chunked(bytes: &[u8], size: usize) -> Builder {
    let mut builder = Builder::new();
    for chunk in bytes.chunks(size) {
        builder.read(chunk);
    }
    builder
}

#[tokio::test]
async fn test_framing_is_independent_of_chunk_size() {
    for size in [1, 2, 3, 7, 16, 40, MESSAGE.len()] {
        let mut session = Session::new(chunked(MESSAGE, size).build(), None);

        let header = session.read_header().await.unwrap();
        let head = parse_request_head(&header).unwrap();
        let body = session.read_body(head.content_length).await.unwrap();

        assert_eq!(
            &header[..],
            b"GET /upload HTTP/1.1\r\nHost: localhost\r\nContent-Length: 11",
            "chunk size {size}"
        );
        assert_eq!(&body[..], b"hello world", "chunk size {size}");
        assert!(session.buffered().is_empty(), "chunk size {size}");
    }
}

#[tokio::test]
async fn test_remainder_carries_over_to_next_message() {
    let mut wire = MESSAGE.to_vec();
    let second = b"GET /next.html HTTP/1.1\r\nContent-Length: 0\r\n\r\n";
    wire.extend_from_slice(second);

    let mut session = Session::new(Builder::new().read(&wire).build(), None);

    let (head, body) = session.read_message::<RequestHead>().await.unwrap();
    assert_eq!(head.path, "/upload");
    assert_eq!(&body[..], b"hello world");
    assert_eq!(session.buffered(), &second[..]);

    // Served entirely from the buffer; the mock has nothing left to read.
    let (head, body) = session.read_message::<RequestHead>().await.unwrap();
    assert_eq!(head.path, "/next.html");
    assert!(body.is_empty());
    assert!(session.buffered().is_empty());
}

#[tokio::test]
async fn test_body_in_same_read_as_header_is_not_reread() {
    let mut session = Session::new(Builder::new().read(MESSAGE).build(), None);

    let (_, body): (RequestHead, _) = session.read_message().await.unwrap();
    assert_eq!(&body[..], b"hello world");
}

#[tokio::test]
async fn test_zero_content_length_issues_no_extra_receive() {
    // A further receive would see EOF and fail the read.
    let mut session = Session::new(
        Builder::new()
            .read(b"HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\n\r\n")
            .build(),
        None,
    );

    let (head, body) = session.read_message::<ResponseHead>().await.unwrap();
    assert_eq!(head.status, 404);
    assert!(body.is_empty());
}

#[tokio::test]
async fn test_large_body_spans_many_receives() {
    let payload = vec![0xABu8; READ_CHUNK * 3 + 17];
    let mut wire = format!("HTTP/1.1 200 OK\r\nContent-Length: {}\r\n\r\n", payload.len()).into_bytes();
    wire.extend_from_slice(&payload);

    let mut session = Session::new(chunked(&wire, READ_CHUNK).build(), None);

    let (head, body) = session.read_message::<ResponseHead>().await.unwrap();
    assert_eq!(head.content_length, payload.len());
    assert_eq!(&body[..], &payload[..]);
}

#[tokio::test]
async fn test_peer_close_before_header() {
    let mut session = Session::new(Builder::new().read(b"GET / HTTP/1.1\r\n").build(), None);

    let err = session.read_header().await.unwrap_err();
    assert!(matches!(err, ReadError::Disconnect(Disconnect::Closed)));
}

#[tokio::test]
async fn test_peer_close_mid_body() {
    let mut session = Session::new(
        Builder::new()
            .read(b"HTTP/1.1 200 OK\r\nContent-Length: 10\r\n\r\nabc")
            .build(),
        None,
    );

    let err = session.read_message::<ResponseHead>().await.unwrap_err();
    assert!(matches!(err, ReadError::Disconnect(Disconnect::Closed)));
}

#[tokio::test]
async fn test_socket_error_is_reported() {
    let mut session = Session::new(
        Builder::new()
            .read(b"GET / HT")
            .read_error(std::io::Error::new(
                std::io::ErrorKind::ConnectionReset,
                "reset",
            ))
            .build(),
        None,
    );

    let err = session.read_header().await.unwrap_err();
    assert!(matches!(
        err,
        ReadError::Disconnect(Disconnect::Io(e)) if e.kind() == std::io::ErrorKind::ConnectionReset
    ));
}

#[tokio::test]
async fn test_idle_timeout() {
    // The other half is held open but never written to.
    let (stream, _peer) = tokio::io::duplex(64);
    let mut session = Session::new(stream, Some(Duration::from_millis(50)));

    let err = session.read_header().await.unwrap_err();
    assert!(matches!(err, ReadError::Disconnect(Disconnect::Timeout)));
}

#[tokio::test]
async fn test_malformed_head_leaves_body_buffered() {
    let mut session = Session::new(
        Builder::new()
            .read(b"GET / HTTP/1.1\r\nContent-Length: x\r\n\r\nbody")
            .build(),
        None,
    );

    let err = session.read_message::<RequestHead>().await.unwrap_err();
    assert!(matches!(err, ReadError::Parse(_)));
    assert_eq!(session.buffered(), b"body");
}

#[tokio::test]
async fn test_raw_message_pairs_header_and_body() {
    let mut session = Session::new(chunked(MESSAGE, 5).build(), None);

    let raw = session
        .read_raw(|block| parse_request_head(block).map(|head| head.content_length))
        .await
        .unwrap();

    assert_eq!(
        raw,
        RawMessage {
            header_block: "GET /upload HTTP/1.1\r\nHost: localhost\r\nContent-Length: 11".into(),
            body: "hello world".into(),
        }
    );
}

#[tokio::test]
async fn test_header_without_blank_line_is_capped() {
    // Arrives a little at a time and never terminates.
    let line = b"X-Filler: aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa\r\n";
    let mut wire = b"GET / HTTP/1.1\r\n".to_vec();
    while wire.len() < MAX_HEADER_BYTES + 4 {
        wire.extend_from_slice(line);
    }
    wire.truncate(MAX_HEADER_BYTES + 4);
    let mut session = Session::new(chunked(&wire, 100).build(), None);

    let err = session.read_header().await.unwrap_err();
    assert!(matches!(err, ReadError::Parse(ParseError::HeaderTooLarge)));
}
