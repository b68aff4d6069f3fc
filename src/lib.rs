//! rikuesuto library interface
//!
//! Builds outbound HTTP requests from a request description carrying at most
//! one payload (JSON, URL-encoded form, multipart form, plain text or a raw
//! byte stream), then hands them to a blocking reqwest client.
//!
//! # Module Organization
//!
//! - [`request`] - Request description, body encoder and per-verb builders
//! - [`uploads`] - Multipart body assembly
//! - [`client`] - Sending requests and reading responses
//! - [`config`] - TOML request files
//! - [`errors`] - Error types (RikuesutoError, Result)
//!
//! # Example
//!
//! ```no_run
//! use rikuesuto::{client, request, RequestSpec};
//!
//! # fn main() -> rikuesuto::Result<()> {
//! let spec = RequestSpec::builder("https://example.com/api/messages")
//!     .header("Authorization", "token")
//!     .form([("content", "hello form")])
//!     .build()?;
//!
//! let http = client::default_client()?;
//! let (body, head) = client::do_read_string(&http, request::post(spec)?)?;
//! println!("{}: {}", head.status, body);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod errors;
pub mod http;
pub mod mime;
pub mod request;
pub mod uploads;

pub use errors::{ErrorKind, Result, RikuesutoError};
pub use crate::mime::ContentTypeKind;
pub use request::{encode, Body, EncodedBody, Payload, RequestSpec, RequestSpecBuilder};
pub use uploads::{MultipartSpec, Part};
