//! MIME type utilities
//!
//! Content type kinds produced by the body encoder, plus helpers for
//! parsing `Content-Type` header values.

use mime::Mime;
use std::collections::HashMap;
use std::fmt;

/// The payload kinds a request body can be encoded as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentTypeKind {
    None,
    Json,
    Form,
    Multipart,
    Text,
    Binary,
}

impl ContentTypeKind {
    /// Canonical MIME string. `None` maps to the empty string.
    ///
    /// For `Multipart` this is the bare type; the encoder appends the
    /// boundary parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentTypeKind::None => "",
            ContentTypeKind::Json => "application/json",
            ContentTypeKind::Form => "application/x-www-form-urlencoded",
            ContentTypeKind::Multipart => "multipart/form-data",
            ContentTypeKind::Text => "text/plain",
            ContentTypeKind::Binary => "application/octet-stream",
        }
    }
}

impl fmt::Display for ContentTypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentTypeKind::None => f.write_str("none"),
            other => f.write_str(other.as_str()),
        }
    }
}

/// Parse Content-Type header into MIME type and parameters
///
/// # Examples
/// ```
/// use rikuesuto::mime::parse_content_type_header;
/// let (mime, params) = parse_content_type_header("application/json; charset=utf-8");
/// assert_eq!(mime, "application/json");
/// assert_eq!(params.get("charset"), Some(&"utf-8".to_string()));
/// ```
pub fn parse_content_type_header(header: &str) -> (String, HashMap<String, String>) {
    match header.parse::<Mime>() {
        Ok(m) => {
            let mime_type = format!("{}/{}", m.type_(), m.subtype());
            let params: HashMap<_, _> = m.params()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect();
            (mime_type, params)
        }
        Err(_) => (header.to_string(), HashMap::new()),
    }
}

/// Extract the boundary parameter from a `multipart/*` content type
pub fn multipart_boundary(content_type: &str) -> Option<String> {
    let (mime_type, mut params) = parse_content_type_header(content_type);
    if !mime_type.starts_with("multipart/") {
        return None;
    }
    params.remove("boundary")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_content_type() {
        let (mime, params) = parse_content_type_header("application/json; charset=utf-8");
        assert_eq!(mime, "application/json");
        assert_eq!(params.get("charset"), Some(&"utf-8".to_string()));
    }

    #[test]
    fn test_parse_content_type_simple() {
        let (mime, params) = parse_content_type_header("text/html");
        assert_eq!(mime, "text/html");
        assert!(params.is_empty());
    }

    #[test]
    fn test_kind_strings() {
        assert_eq!(ContentTypeKind::None.as_str(), "");
        assert_eq!(ContentTypeKind::Json.as_str(), "application/json");
        assert_eq!(ContentTypeKind::Form.as_str(), "application/x-www-form-urlencoded");
        assert_eq!(ContentTypeKind::Multipart.as_str(), "multipart/form-data");
        assert_eq!(ContentTypeKind::Text.as_str(), "text/plain");
        assert_eq!(ContentTypeKind::Binary.as_str(), "application/octet-stream");
    }

    #[test]
    fn test_multipart_boundary() {
        assert_eq!(
            multipart_boundary("multipart/form-data; boundary=END_OF_PART"),
            Some("END_OF_PART".to_string())
        );
        assert_eq!(multipart_boundary("application/json"), None);
    }
}
