//! keepalive - persistent-connection HTTP/1.1 file server and client
//!
//! Both endpoints share the framing core in [`http`]: bytes from a socket
//! accumulate in a per-connection buffer, header blocks are cut at the first
//! blank line and bodies by `Content-Length`, and leftover bytes start the
//! next message.

pub mod client;
pub mod config;
pub mod http;
pub mod server;
