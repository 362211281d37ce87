use tokio::io::{AsyncRead, AsyncWrite};
use tracing::{debug, info, warn};

use crate::http::parser::{ParseError, parse_request_head};
use crate::http::reader::Disconnect;
use crate::http::request::{Request, RequestHead};
use crate::http::response::Response;
use crate::http::session::{ReadError, Session};
use crate::http::writer::{ResponseWriter, serialize_head};
use crate::server::dispatch::Dispatcher;

/// Largest request body the server will buffer.
pub const MAX_REQUEST_BODY: usize = 64 * 1024;

/// Server side of one accepted connection.
pub struct Connection<'a, S> {
    session: Session<S>,
    dispatcher: &'a Dispatcher,
    peer: String,
    state: ConnectionState,
}

pub enum ConnectionState {
    AwaitingHeader,
    AwaitingBody(RequestHead),
    Dispatching(Result<Request, ParseError>),
    Closed,
}

impl<'a, S> Connection<'a, S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(session: Session<S>, dispatcher: &'a Dispatcher, peer: impl Into<String>) -> Self {
        Self {
            session,
            dispatcher,
            peer: peer.into(),
            state: ConnectionState::AwaitingHeader,
        }
    }

    /// Serves requests until the connection closes, then shuts the socket
    /// down.
    ///
    /// Requests are handled strictly one at a time; pipelined bytes wait in
    /// the session buffer until the current response has been written.
    pub async fn run(mut self) {
        loop {
            self.state = match std::mem::replace(&mut self.state, ConnectionState::Closed) {
                ConnectionState::AwaitingHeader => match self.session.read_header().await {
                    Ok(block) => {
                        info!(
                            peer = %self.peer,
                            "request header:\n{}",
                            String::from_utf8_lossy(&block)
                        );
                        match parse_request_head(&block) {
                            Ok(head) if head.content_length > MAX_REQUEST_BODY => {
                                ConnectionState::Dispatching(Err(ParseError::BodyTooLarge(
                                    head.content_length,
                                )))
                            }
                            Ok(head) => ConnectionState::AwaitingBody(head),
                            Err(e) => ConnectionState::Dispatching(Err(e)),
                        }
                    }
                    Err(ReadError::Parse(e)) => ConnectionState::Dispatching(Err(e)),
                    Err(ReadError::Disconnect(e)) => self.disconnected("header", e),
                },

                ConnectionState::AwaitingBody(head) => {
                    match self.session.read_body(head.content_length).await {
                        Ok(body) => {
                            if !body.is_empty() {
                                debug!(peer = %self.peer, len = body.len(), "request body");
                            }
                            ConnectionState::Dispatching(Ok(Request { head, body }))
                        }
                        Err(e) => self.disconnected("body", e),
                    }
                }

                ConnectionState::Dispatching(request) => {
                    let response = match &request {
                        Ok(req) => self.dispatcher.dispatch(req).await,
                        Err(e) => {
                            warn!(peer = %self.peer, error = %e, "rejecting malformed request");
                            Response::bad_request()
                        }
                    };
                    self.respond(&response).await
                }

                ConnectionState::Closed => break,
            };
        }

        if let Err(e) = self.session.shutdown().await {
            debug!(peer = %self.peer, error = %e, "shutdown failed");
        }
        info!(peer = %self.peer, "connection closed");
    }

    async fn respond(&mut self, response: &Response) -> ConnectionState {
        info!(
            peer = %self.peer,
            "response header:\n{}",
            String::from_utf8_lossy(&serialize_head(response)).trim_end()
        );

        let mut writer = ResponseWriter::new(response);
        if let Err(e) = writer.write_to_stream(self.session.stream_mut()).await {
            warn!(peer = %self.peer, error = %e, "failed to write response");
            return ConnectionState::Closed;
        }

        if response.keep_alive() {
            ConnectionState::AwaitingHeader
        } else {
            ConnectionState::Closed
        }
    }

    fn disconnected(&self, reading: &str, reason: Disconnect) -> ConnectionState {
        match reason {
            Disconnect::Io(e) => warn!(peer = %self.peer, reading, error = %e, "socket error"),
            other => info!(peer = %self.peer, reading, "{other}"),
        }
        ConnectionState::Closed
    }
}
