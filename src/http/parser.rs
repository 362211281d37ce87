use crate::http::request::{ConnectionDirective, Method, RequestHead};
use crate::http::response::ResponseHead;

/// Reasons a framed header block could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("header block is not valid UTF-8")]
    InvalidEncoding,
    #[error("no GET request line")]
    MissingRequestLine,
    #[error("malformed request line: {0:?}")]
    InvalidRequestLine(String),
    #[error("malformed status line: {0:?}")]
    InvalidStatusLine(String),
    #[error("malformed Content-Length: {0:?}")]
    InvalidContentLength(String),
    #[error("header block exceeds the size limit")]
    HeaderTooLarge,
    #[error("declared body of {0} bytes exceeds the size limit")]
    BodyTooLarge(usize),
}

const STATUS_PREFIX: &str = "HTTP/1.1";

/// A decoded header block that declares the length of the body after it.
pub trait MessageHead: Sized {
    fn parse(header_block: &[u8]) -> Result<Self, ParseError>;

    fn content_length(&self) -> usize;
}

impl MessageHead for RequestHead {
    fn parse(header_block: &[u8]) -> Result<Self, ParseError> {
        parse_request_head(header_block)
    }

    fn content_length(&self) -> usize {
        self.content_length
    }
}

impl MessageHead for ResponseHead {
    fn parse(header_block: &[u8]) -> Result<Self, ParseError> {
        parse_response_head(header_block)
    }

    fn content_length(&self) -> usize {
        self.content_length
    }
}

/// Decodes a request header block (delimiter already stripped).
///
/// Lines are matched by exact, case-sensitive prefix; anything unrecognized
/// is skipped.
pub fn parse_request_head(header_block: &[u8]) -> Result<RequestHead, ParseError> {
    let text = std::str::from_utf8(header_block).map_err(|_| ParseError::InvalidEncoding)?;

    let mut target = None;
    let mut connection = None;
    let mut content_length = 0;

    for line in text.split("\r\n") {
        if line.starts_with("GET") {
            target = Some(parse_request_line(line)?);
        } else if let Some(value) = line.strip_prefix("Connection:") {
            connection = Some(ConnectionDirective::parse(value.trim()));
        } else if let Some(value) = line.strip_prefix("Content-Length:") {
            content_length = parse_content_length(value)?;
        }
    }

    let (method, path) = target.ok_or(ParseError::MissingRequestLine)?;

    Ok(RequestHead {
        method,
        path,
        connection,
        content_length,
    })
}

/// Decodes a response header block (delimiter already stripped).
pub fn parse_response_head(header_block: &[u8]) -> Result<ResponseHead, ParseError> {
    let text = std::str::from_utf8(header_block).map_err(|_| ParseError::InvalidEncoding)?;

    let mut status = None;
    let mut connection = None;
    let mut content_length = 0;
    let mut location = None;

    for line in text.split("\r\n") {
        if line.starts_with(STATUS_PREFIX) {
            status = Some((line.to_string(), parse_status_code(line)?));
        } else if let Some(value) = line.strip_prefix("Connection:") {
            connection = Some(ConnectionDirective::parse(value.trim()));
        } else if let Some(value) = line.strip_prefix("Content-Length:") {
            content_length = parse_content_length(value)?;
        } else if let Some(value) = line.strip_prefix("Location:") {
            location = Some(value.trim().to_string());
        }
    }

    let (status_line, status) = status.ok_or_else(|| {
        ParseError::InvalidStatusLine(text.lines().next().unwrap_or_default().to_string())
    })?;

    Ok(ResponseHead {
        status_line,
        status,
        connection,
        content_length,
        location,
    })
}

fn parse_request_line(line: &str) -> Result<(Method, String), ParseError> {
    let invalid = || ParseError::InvalidRequestLine(line.to_string());

    let mut parts = line.split(' ');
    let method = parts.next().and_then(Method::from_str).ok_or_else(invalid)?;
    let path = parts.next().filter(|p| !p.is_empty()).ok_or_else(invalid)?;
    let _version = parts.next().ok_or_else(invalid)?;
    if parts.next().is_some() {
        return Err(invalid());
    }

    Ok((method, path.to_string()))
}

fn parse_status_code(line: &str) -> Result<u16, ParseError> {
    line.split(' ')
        .nth(1)
        .and_then(|code| code.parse().ok())
        .ok_or_else(|| ParseError::InvalidStatusLine(line.to_string()))
}

fn parse_content_length(value: &str) -> Result<usize, ParseError> {
    let value = value.trim();
    value
        .parse()
        .map_err(|_| ParseError::InvalidContentLength(value.to_string()))
}
