//! HTTP method constants and utilities

use reqwest::Method;

use crate::errors::RikuesutoError;

/// HTTP GET method
pub const GET: &str = "GET";

/// HTTP POST method
pub const POST: &str = "POST";

/// HTTP PUT method
pub const PUT: &str = "PUT";

/// HTTP PATCH method
pub const PATCH: &str = "PATCH";

/// HTTP DELETE method
pub const DELETE: &str = "DELETE";

/// HTTP HEAD method
pub const HEAD: &str = "HEAD";

/// HTTP OPTIONS method
pub const OPTIONS: &str = "OPTIONS";

/// HTTP TRACE method
pub const TRACE: &str = "TRACE";

/// HTTP CONNECT method
pub const CONNECT: &str = "CONNECT";

/// Parse a method string into a [`Method`]
///
/// Any valid HTTP token is accepted, so extension methods pass through.
/// The verb is used exactly as given (methods are case-sensitive).
pub fn parse(method: &str) -> Result<Method, RikuesutoError> {
    Method::from_bytes(method.as_bytes())
        .map_err(|_| RikuesutoError::InvalidMethod(method.to_string()))
}
