//! HTTP protocol implementation.
//!
//! A deliberately small HTTP/1.1 subset: one `GET` per connection, only the
//! request line is interpreted, and every response closes the connection.
//!
//! # Architecture
//!
//! - **`connection`**: The per-connection state machine
//! - **`parser`**: Extracts the request line from the bytes received
//! - **`request`**: Request line and method representation
//! - **`response`**: Status codes and responses with a builder
//! - **`writer`**: Serializes and writes responses to the client
//! - **`mime`**: Content type detection based on file extensions
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌─────────────┐
//!        │  Admission  │ ← Rate limiter check, then pre-read delay
//!        └──────┬──────┘
//!               │ admitted          rejected → Writing (429)
//!               ▼
//!        ┌─────────────┐
//!        │   Reading   │ ← Read and parse the request line
//!        └──────┬──────┘
//!               │ parsed            malformed → Writing (400)
//!               ▼                   nothing sent → Closed
//!        ┌──────────────────┐
//!        │   Processing     │ ← Method check, count, resolve, build response
//!        └──────┬───────────┘
//!               ▼
//!        ┌──────────────────┐
//!        │    Writing       │ ← Send response, half-close, drain
//!        └──────┬───────────┘
//!               ▼
//!            Closed
//! ```

pub mod connection;
pub mod mime;
pub mod parser;
pub mod request;
pub mod response;
pub mod writer;
