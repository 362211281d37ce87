//! HTTP/1.1 message exchange over persistent connections.
//!
//! # Architecture
//!
//! - **`reader`**: bounded receives, reported as `ConnectionOutcome`
//! - **`framer`**: cuts header blocks and `Content-Length` bodies out of a buffer
//! - **`parser`**: decodes request and response header blocks
//! - **`session`**: a stream plus the bytes buffered from it
//! - **`connection`**: the server-side request/response state machine
//! - **`request`** / **`response`**: message heads and builders
//! - **`writer`**: serializes and writes responses
//! - **`mime`**: Content-Type by file extension
//!
//! # Server Connection State Machine
//!
//! ```text
//!        ┌──────────────────┐
//!        │  AwaitingHeader  │ ← read until a blank line is buffered
//!        └──────┬───────────┘
//!               │ header block framed
//!               ▼
//!        ┌──────────────────┐
//!        │   AwaitingBody   │ ← read until Content-Length bytes are buffered
//!        └──────┬───────────┘
//!               │ body framed
//!               ▼
//!        ┌──────────────────┐
//!        │   Dispatching    │ ← look up the file, write the response
//!        └──────┬───────────┘
//!               ├─ keep-alive → AwaitingHeader (leftover bytes kept)
//!               └─ close → Closed
//! ```
//!
//! A peer close, idle timeout or socket error in either awaiting state goes
//! straight to `Closed`.

pub mod connection;
pub mod framer;
pub mod mime;
pub mod parser;
pub mod reader;
pub mod request;
pub mod response;
pub mod session;
pub mod writer;
