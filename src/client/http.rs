//! HTTP sending and response reading
//!
//! Thin pass-throughs to a caller-supplied [`reqwest::blocking::Client`].
//! No retries, timeouts or backoff are added here; configure those on the
//! client itself.

use bytes::Bytes;
use reqwest::blocking::{Client, Request, Response};
use reqwest::header::HeaderMap;
use reqwest::{StatusCode, Version};
use tracing::debug;
use url::Url;

use crate::errors::Result;

pub const USER_AGENT_STRING: &str = concat!("rikuesuto/", env!("CARGO_PKG_VERSION"));

/// Status line and headers of a response whose body was already read
#[derive(Debug, Clone)]
pub struct ResponseHead {
    pub status: StatusCode,
    pub version: Version,
    pub headers: HeaderMap,
    pub url: Url,
}

impl ResponseHead {
    fn of(response: &Response) -> Self {
        Self {
            status: response.status(),
            version: response.version(),
            headers: response.headers().clone(),
            url: response.url().clone(),
        }
    }
}

/// Client with this crate's user agent and reqwest defaults otherwise
pub fn default_client() -> Result<Client> {
    Ok(Client::builder().user_agent(USER_AGENT_STRING).build()?)
}

/// Send a request
pub fn send(client: &Client, request: Request) -> Result<Response> {
    let method = request.method().clone();
    let url = request.url().clone();
    let response = client.execute(request)?;
    debug!(method = %method, url = %url, status = %response.status(), "Received response");
    Ok(response)
}

/// Send a request, panicking on failure
pub fn must_send(client: &Client, request: Request) -> Response {
    send(client, request).unwrap_or_else(|e| panic!("request failed: {e}"))
}

/// Read the whole response body
pub fn read_body(response: Response) -> Result<Bytes> {
    let body = response.bytes()?;
    debug!(bytes = body.len(), "Read response body");
    Ok(body)
}

pub fn must_read_body(response: Response) -> Bytes {
    read_body(response).unwrap_or_else(|e| panic!("failed to read response body: {e}"))
}

/// Read the whole response body as text (invalid UTF-8 is replaced)
pub fn read_string(response: Response) -> Result<String> {
    let body = read_body(response)?;
    Ok(String::from_utf8_lossy(&body).into_owned())
}

pub fn must_read_string(response: Response) -> String {
    read_string(response).unwrap_or_else(|e| panic!("failed to read response body: {e}"))
}

/// Send a request and read the whole body
pub fn do_read_body(client: &Client, request: Request) -> Result<(Bytes, ResponseHead)> {
    let response = send(client, request)?;
    let head = ResponseHead::of(&response);
    let body = read_body(response)?;
    Ok((body, head))
}

pub fn must_do_read_body(client: &Client, request: Request) -> (Bytes, ResponseHead) {
    do_read_body(client, request).unwrap_or_else(|e| panic!("request failed: {e}"))
}

/// Send a request and read the whole body as text
pub fn do_read_string(client: &Client, request: Request) -> Result<(String, ResponseHead)> {
    let (body, head) = do_read_body(client, request)?;
    Ok((String::from_utf8_lossy(&body).into_owned(), head))
}

pub fn must_do_read_string(client: &Client, request: Request) -> (String, ResponseHead) {
    do_read_string(client, request).unwrap_or_else(|e| panic!("request failed: {e}"))
}
