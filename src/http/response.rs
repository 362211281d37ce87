use bytes::Bytes;

use crate::http::request::ConnectionDirective;

/// HTTP status codes produced by the server.
///
/// - `Ok` (200): file found, body follows
/// - `MovedPermanently` (301): redirect, see `Location`
/// - `BadRequest` (400): header block could not be parsed
/// - `NotFound` (404): no such file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 200 OK
    Ok,
    /// 301 Moved Permanently
    MovedPermanently,
    /// 400 Bad Request
    BadRequest,
    /// 404 Not Found
    NotFound,
}

impl StatusCode {
    /// Returns the numeric HTTP status code.
    ///
    /// ```
    /// # use keepalive::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.as_u16(), 200);
    /// assert_eq!(StatusCode::MovedPermanently.as_u16(), 301);
    /// ```
    pub fn as_u16(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::MovedPermanently => 301,
            StatusCode::BadRequest => 400,
            StatusCode::NotFound => 404,
        }
    }

    /// Maps a numeric code back; codes this crate never produces are `None`.
    pub fn from_u16(code: u16) -> Option<Self> {
        match code {
            200 => Some(StatusCode::Ok),
            301 => Some(StatusCode::MovedPermanently),
            400 => Some(StatusCode::BadRequest),
            404 => Some(StatusCode::NotFound),
            _ => None,
        }
    }

    /// Returns the standard HTTP reason phrase for this status code.
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::MovedPermanently => "Moved Permanently",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::NotFound => "Not Found",
        }
    }
}

/// A complete HTTP response ready to be sent to a client.
///
/// Headers keep insertion order so the serialized head is deterministic.
#[derive(Debug)]
pub struct Response {
    pub status: StatusCode,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

/// Builder for constructing HTTP responses in a fluent style.
///
/// ```ignore
/// let response = ResponseBuilder::new(StatusCode::Ok)
///     .header("Content-Type", "text/html")
///     .body(b"<p>hi</p>".to_vec())
///     .build();
/// ```
pub struct ResponseBuilder {
    status: StatusCode,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
}

impl ResponseBuilder {
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    /// Adds or replaces a header.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        let value = value.into();
        match self.headers.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.headers.push((key, value)),
        }
        self
    }

    pub fn connection(self, directive: ConnectionDirective) -> Self {
        self.header("Connection", directive.as_str())
    }

    pub fn body(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }

    /// Builds the final Response.
    ///
    /// Adds `Content-Length` from the body size unless already present.
    pub fn build(self) -> Response {
        let len = self.body.len();
        let mut builder = self;
        if !builder.headers.iter().any(|(k, _)| k == "Content-Length") {
            builder.headers.push(("Content-Length".to_string(), len.to_string()));
        }

        Response {
            status: builder.status,
            headers: builder.headers,
            body: builder.body,
        }
    }
}

impl Response {
    /// 200 OK carrying `body` typed as `content_type`.
    pub fn ok(
        body: impl Into<Vec<u8>>,
        content_type: &str,
        connection: ConnectionDirective,
    ) -> Self {
        ResponseBuilder::new(StatusCode::Ok)
            .header("Content-Type", content_type)
            .connection(connection)
            .body(body.into())
            .build()
    }

    /// 301 pointing at `location`; never kept alive.
    pub fn moved_permanently(location: &str) -> Self {
        ResponseBuilder::new(StatusCode::MovedPermanently)
            .header("Location", location)
            .connection(ConnectionDirective::Close)
            .build()
    }

    /// 404 with an empty body; never kept alive.
    pub fn not_found() -> Self {
        ResponseBuilder::new(StatusCode::NotFound)
            .connection(ConnectionDirective::Close)
            .build()
    }

    /// 400 with an empty body; never kept alive.
    pub fn bad_request() -> Self {
        ResponseBuilder::new(StatusCode::BadRequest)
            .connection(ConnectionDirective::Close)
            .build()
    }

    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Whether the connection stays open after this response is sent.
    pub fn keep_alive(&self) -> bool {
        self.header("Connection") != Some("close")
    }
}

/// The decoded header block of a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseHead {
    /// The raw status line, e.g. `HTTP/1.1 200 OK`
    pub status_line: String,
    pub status: u16,
    pub connection: Option<ConnectionDirective>,
    /// Declared body length; 0 when absent
    pub content_length: usize,
    pub location: Option<String>,
}

/// A response head with its complete body, as received by the client.
#[derive(Debug, Clone)]
pub struct ReceivedResponse {
    pub head: ResponseHead,
    pub body: Bytes,
}
