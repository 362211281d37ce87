//! Interactive fetch client
//!
//! Reads paths one per line and fetches each over a persistent connection.
//!
//! ```text
//!   Sending ──► ReceivingHeader ──► ReceivingBody ──► Acting
//!      ▲              │                   │             │
//!      │              └──── failure ──────┘             ├─ 200: save, next user path
//!      │                       │                        ├─ 404: next user path
//!      │                       ▼                        └─ 301: new connection,
//!      └─────────────── Reconnecting                            Location path
//!           (same path)
//! ```
//!
//! A failed exchange drops the socket together with its buffer and resends
//! the same path on a fresh connection. The server may already have acted on
//! the first copy; nothing here deduplicates.

pub mod redirect;
pub mod save;

use std::io;
use std::path::PathBuf;

use anyhow::bail;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::net::TcpStream;
use tokio::time::sleep;
use tracing::{debug, error, warn};

use crate::config::{ClientConfig, Target};
use crate::http::request::{ConnectionDirective, RequestHead};
use crate::http::response::{ReceivedResponse, ResponseHead, StatusCode};
use crate::http::session::{ReadError, Session};

/// How a user-supplied path was finally answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// 200; the body was written to `file`
    Saved { path: String, file: PathBuf },
    /// 404
    NotFound { path: String },
    /// Any status this client has no action for
    Unhandled { path: String, status: u16 },
}

/// One request/response round trip that did not complete.
#[derive(Debug, thiserror::Error)]
pub enum ExchangeError {
    #[error("connecting to {0} failed: {1}")]
    Connect(Target, io::Error),
    #[error("sending request failed: {0}")]
    Send(io::Error),
    #[error(transparent)]
    Read(#[from] ReadError),
}

pub struct Client {
    cfg: ClientConfig,
    /// Differs from `cfg.target` only while following a cross-origin redirect
    target: Target,
    session: Option<Session<TcpStream>>,
    /// Path in flight; kept across reconnects so it can be resent
    pending: Option<String>,
}

impl Client {
    /// A client that connects on its first request.
    pub fn new(cfg: ClientConfig) -> Self {
        Self {
            target: cfg.target.clone(),
            cfg,
            session: None,
            pending: None,
        }
    }

    /// A client with its connection already open.
    pub async fn connect(cfg: ClientConfig) -> anyhow::Result<Self> {
        let mut client = Self::new(cfg);
        let session = Session::connect(&client.target)
            .await
            .map_err(|e| ExchangeError::Connect(client.target.clone(), e))?;
        client.session = Some(session);
        Ok(client)
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    pub fn pending(&self) -> Option<&str> {
        self.pending.as_deref()
    }

    pub fn is_connected(&self) -> bool {
        self.session.is_some()
    }

    /// Reads paths from `input` until EOF, fetching each in turn.
    ///
    /// Blank lines are skipped. A path that cannot be fetched is logged and
    /// the next line is read.
    pub async fn run<R>(&mut self, input: R) -> anyhow::Result<()>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut lines = input.lines();
        while let Some(line) = lines.next_line().await? {
            let path = line.trim();
            if path.is_empty() {
                continue;
            }

            match self.fetch(path).await {
                Ok(outcome) => debug!(?outcome, "fetch finished"),
                Err(e) => error!("{e:#}"),
            }
        }
        Ok(())
    }

    /// Fetches `path`, following redirects and resending after failures,
    /// and prints each status line received.
    pub async fn fetch(&mut self, path: &str) -> anyhow::Result<Outcome> {
        if self.target != self.cfg.target {
            self.session = None;
            self.target = self.cfg.target.clone();
        }

        let mut current = path.to_string();
        let mut failures = 0;
        let mut redirects = 0;

        loop {
            self.pending = Some(current.clone());

            let response = match self.exchange(&current).await {
                Ok(response) => response,
                Err(e) => {
                    self.session = None;
                    failures += 1;
                    if failures >= self.cfg.max_attempts {
                        self.pending = None;
                        bail!("giving up on {current} after {failures} attempts: {e}");
                    }
                    warn!(path = %current, attempt = failures, error = %e, "exchange failed, reconnecting");
                    sleep(self.cfg.reconnect_delay).await;
                    continue;
                }
            };
            failures = 0;

            println!("{}", response.head.status_line);
            if response.head.connection == Some(ConnectionDirective::Close) {
                self.session = None;
            }

            match StatusCode::from_u16(response.head.status) {
                Some(StatusCode::Ok) => {
                    self.pending = None;
                    let file = save::save(&self.cfg.download_dir, &current, &response.body).await?;
                    debug!(path = %current, file = %file.display(), "saved");
                    return Ok(Outcome::Saved { path: current, file });
                }
                Some(StatusCode::MovedPermanently) => {
                    let Some(location) = response.head.location else {
                        self.pending = None;
                        bail!("301 for {current} without a Location header");
                    };
                    redirects += 1;
                    if redirects > self.cfg.max_redirects {
                        self.pending = None;
                        bail!("too many redirects fetching {path}");
                    }
                    let (target, next) = match redirect::resolve(&self.target, &location) {
                        Ok(resolved) => resolved,
                        Err(e) => {
                            self.pending = None;
                            return Err(e);
                        }
                    };
                    debug!(from = %current, to = %next, %target, "following redirect");
                    self.session = None;
                    self.target = target;
                    current = next;
                }
                Some(StatusCode::NotFound) => {
                    self.pending = None;
                    return Ok(Outcome::NotFound { path: current });
                }
                _ => {
                    self.pending = None;
                    return Ok(Outcome::Unhandled {
                        path: current,
                        status: response.head.status,
                    });
                }
            }
        }
    }

    /// Sends one GET and reads its response, connecting first if needed.
    async fn exchange(&mut self, path: &str) -> Result<ReceivedResponse, ExchangeError> {
        let session = match self.session.take() {
            Some(session) => session,
            None => Session::connect(&self.target)
                .await
                .map_err(|e| ExchangeError::Connect(self.target.clone(), e))?,
        };
        let session = self.session.insert(session);

        session
            .send(&RequestHead::get(path).encode(&self.target))
            .await
            .map_err(ExchangeError::Send)?;

        let (head, body) = session.read_message::<ResponseHead>().await?;
        Ok(ReceivedResponse { head, body })
    }
}
