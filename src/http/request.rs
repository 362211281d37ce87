use bytes::Bytes;

use crate::config::Target;

/// HTTP request methods understood by this crate.
///
/// Only `GET` is served; any other request line is ignored by the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    GET,
}

impl Method {
    /// Parses a method token (case-sensitive).
    ///
    /// ```
    /// # use keepalive::http::request::Method;
    /// assert_eq!(Method::from_str("GET"), Some(Method::GET));
    /// assert_eq!(Method::from_str("get"), None);
    /// ```
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "GET" => Some(Method::GET),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Method::GET => "GET",
        }
    }
}

/// Value of a `Connection` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionDirective {
    KeepAlive,
    Close,
    Other(String),
}

impl ConnectionDirective {
    /// Header values are matched exactly; `Keep-Alive` is `Other`.
    pub fn parse(value: &str) -> Self {
        match value {
            "keep-alive" => ConnectionDirective::KeepAlive,
            "close" => ConnectionDirective::Close,
            other => ConnectionDirective::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ConnectionDirective::KeepAlive => "keep-alive",
            ConnectionDirective::Close => "close",
            ConnectionDirective::Other(v) => v,
        }
    }
}

/// The decoded header block of a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestHead {
    /// The request method (always GET)
    pub method: Method,
    /// The request path (e.g., "/index.html")
    pub path: String,
    /// The `Connection` header, if sent
    pub connection: Option<ConnectionDirective>,
    /// Declared body length; 0 when absent
    pub content_length: usize,
}

impl RequestHead {
    /// A keep-alive GET with an empty body.
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            path: path.into(),
            connection: Some(ConnectionDirective::KeepAlive),
            content_length: 0,
        }
    }

    /// Whether the client asked for the connection to be closed.
    pub fn wants_close(&self) -> bool {
        self.connection == Some(ConnectionDirective::Close)
    }

    /// Serializes the head for `target`.
    pub fn encode(&self, target: &Target) -> Vec<u8> {
        let mut buf = format!(
            "{} {} HTTP/1.1\r\nHost: {}\r\n",
            self.method.as_str(),
            self.path,
            target
        );
        if let Some(connection) = &self.connection {
            buf.push_str("Connection: ");
            buf.push_str(connection.as_str());
            buf.push_str("\r\n");
        }
        buf.push_str(&format!("Content-Length: {}\r\n\r\n", self.content_length));
        buf.into_bytes()
    }
}

/// A request head with its complete body.
#[derive(Debug, Clone)]
pub struct Request {
    pub head: RequestHead,
    pub body: Bytes,
}
