//! Turns a complete request into a response.

use std::collections::HashMap;

use crate::config::ServerConfig;
use crate::http::request::{ConnectionDirective, Request};
use crate::http::response::Response;
use crate::server::files::{Lookup, StaticFiles};

/// Maps request paths to files or redirects.
///
/// Only a 200 may keep the connection open, and only when the client did not
/// ask for `Connection: close`.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    files: StaticFiles,
    redirects: HashMap<String, String>,
}

impl Dispatcher {
    pub fn new(files: StaticFiles, redirects: HashMap<String, String>) -> Self {
        Self { files, redirects }
    }

    pub fn from_config(cfg: &ServerConfig) -> Self {
        Self::new(StaticFiles::new(cfg.root.clone()), cfg.redirects.clone())
    }

    pub async fn dispatch(&self, request: &Request) -> Response {
        let head = &request.head;

        if let Some(location) = self.redirects.get(&head.path) {
            return Response::moved_permanently(location);
        }

        match self.files.lookup(&head.path).await {
            Lookup::Found {
                content,
                content_type,
            } => {
                let connection = if head.wants_close() {
                    ConnectionDirective::Close
                } else {
                    ConnectionDirective::KeepAlive
                };
                Response::ok(content, content_type, connection)
            }
            Lookup::NotFound => Response::not_found(),
        }
    }
}
