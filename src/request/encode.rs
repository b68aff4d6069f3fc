//! Body encoding
//!
//! Turns the payload of a [`RequestSpec`](super::RequestSpec) into a
//! `Content-Type` value and a body. JSON, form, multipart and text payloads
//! are serialized into memory; binary payloads are passed through as the
//! caller's stream.

use std::fmt;
use std::io::{Cursor, Read};

use bytes::Bytes;
use tracing::debug;

use super::spec::{ByteStream, Payload, RequestSpec};
use crate::errors::Result;
use crate::mime::ContentTypeKind;

/// An encoded request body
pub enum Body {
    /// Fully serialized body
    Bytes(Bytes),
    /// Caller stream, read by the transport while sending
    Stream(ByteStream),
}

impl Body {
    /// Serialized contents, if the body is not a stream
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Body::Bytes(bytes) => Some(bytes.as_ref()),
            Body::Stream(_) => None,
        }
    }

    /// Consume the body as a reader regardless of variant
    pub fn into_reader(self) -> ByteStream {
        match self {
            Body::Bytes(bytes) => Box::new(Cursor::new(bytes)),
            Body::Stream(stream) => stream,
        }
    }
}

impl fmt::Debug for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Body::Bytes(bytes) => f.debug_tuple("Bytes").field(&bytes.len()).finish(),
            Body::Stream(_) => f.write_str("Stream(..)"),
        }
    }
}

impl From<Body> for reqwest::blocking::Body {
    fn from(body: Body) -> Self {
        match body {
            Body::Bytes(bytes) => reqwest::blocking::Body::from(bytes),
            Body::Stream(stream) => reqwest::blocking::Body::new(stream),
        }
    }
}

/// Content type plus body produced by [`encode`]
#[derive(Debug)]
pub struct EncodedBody {
    /// Empty when there is no payload
    pub content_type: String,
    pub body: Option<Body>,
}

impl EncodedBody {
    fn empty() -> Self {
        Self {
            content_type: String::new(),
            body: None,
        }
    }

    fn bytes(content_type: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            content_type: content_type.into(),
            body: Some(Body::Bytes(data.into())),
        }
    }

    pub fn has_body(&self) -> bool {
        self.body.is_some()
    }
}

/// Encode the payload of a request spec.
///
/// Multipart payloads read all of their streams here; any failure aborts
/// the encode and nothing partial is returned. URL and headers are ignored.
pub fn encode(spec: RequestSpec) -> Result<EncodedBody> {
    encode_payload(spec.payload)
}

pub(crate) fn encode_payload(payload: Option<Payload>) -> Result<EncodedBody> {
    let Some(payload) = payload else {
        debug!("No payload to encode");
        return Ok(EncodedBody::empty());
    };

    let kind = payload.kind();
    let encoded = match payload {
        Payload::Json(map) => {
            let data = serde_json::to_vec(&map)?;
            EncodedBody::bytes(kind.as_str(), data)
        }
        Payload::Form(fields) => {
            let data = serde_urlencoded::to_string(&fields)?;
            EncodedBody::bytes(kind.as_str(), data)
        }
        Payload::Multipart(spec) => {
            let multipart = spec.encode()?;
            EncodedBody::bytes(multipart.content_type, multipart.buffer)
        }
        Payload::Text(text) => EncodedBody::bytes(kind.as_str(), text),
        Payload::Binary(stream) => EncodedBody {
            content_type: ContentTypeKind::Binary.as_str().to_string(),
            body: Some(Body::Stream(stream)),
        },
    };

    debug!(
        kind = %kind,
        content_type = %encoded.content_type,
        bytes = encoded.body.as_ref().and_then(Body::as_bytes).map(<[u8]>::len),
        "Encoded request body"
    );

    Ok(encoded)
}

#[cfg(test)]
pub(crate) fn read_to_vec(body: Body) -> std::io::Result<Vec<u8>> {
    let mut data = Vec::new();
    body.into_reader().read_to_end(&mut data)?;
    Ok(data)
}
