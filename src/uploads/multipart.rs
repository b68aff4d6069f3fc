//! Multipart form data handling
//!
//! Builds `multipart/form-data` bodies into an in-memory buffer. Every input
//! stream is read to the end exactly once while the body is assembled, so a
//! [`MultipartSpec`] is consumed by [`MultipartSpec::encode`].

use std::fmt;
use std::io::{self, Cursor, Read, Write};

use indexmap::IndexMap;
use rand::Rng;
use tracing::{debug, trace};

use crate::errors::{Result, RikuesutoError};
use crate::request::{ByteStream, HeaderValues};

/// Maximum boundary length allowed by RFC 2046
const MAX_BOUNDARY_LEN: usize = 70;

/// Number of random bytes behind a generated boundary (hex encoded, so twice as many chars)
const RANDOM_BOUNDARY_BYTES: usize = 30;

/// Form field name used for every entry of [`MultipartSpec::files`]
pub const FILE_FIELD_NAME: &str = "file";

/// An arbitrary MIME part with caller-supplied headers
pub struct Part {
    pub headers: HeaderValues,
    pub body: ByteStream,
}

impl Part {
    pub fn new(headers: HeaderValues, body: impl Read + Send + 'static) -> Self {
        Self {
            headers,
            body: Box::new(body),
        }
    }

    /// Part whose only header is `Content-Type: <content_type>`
    pub fn with_content_type(content_type: &str, body: impl Read + Send + 'static) -> Self {
        let mut headers = IndexMap::new();
        headers.insert("Content-Type".to_string(), vec![content_type.to_string()]);
        Self::new(headers, body)
    }
}

impl fmt::Debug for Part {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Part")
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}

/// Description of a multipart/form-data body
///
/// Parts are written in a fixed order: every file, then every explicit part,
/// then every field, each group in insertion order.
#[derive(Default)]
pub struct MultipartSpec {
    /// Filename -> contents. Each becomes a part with form field name `"file"`.
    pub files: IndexMap<String, ByteStream>,
    /// Parts written verbatim with their own header sets
    pub parts: Vec<Part>,
    /// Field name -> contents
    pub fields: IndexMap<String, ByteStream>,
    /// Boundary to use instead of a generated one.
    /// The caller must make sure it does not occur inside any part.
    pub boundary: Option<String>,
}

/// A finalized multipart body
#[derive(Debug, Clone)]
pub struct EncodedMultipart {
    /// `multipart/form-data; boundary=...`
    pub content_type: String,
    pub buffer: Vec<u8>,
}

impl MultipartSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn file(mut self, filename: impl Into<String>, contents: impl Read + Send + 'static) -> Self {
        self.files.insert(filename.into(), Box::new(contents));
        self
    }

    pub fn part(mut self, part: Part) -> Self {
        self.parts.push(part);
        self
    }

    pub fn field(mut self, name: impl Into<String>, contents: impl Read + Send + 'static) -> Self {
        self.fields.insert(name.into(), Box::new(contents));
        self
    }

    /// Convenience for a field whose contents are already in memory
    pub fn text_field(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let value: String = value.into();
        self.field(name, Cursor::new(value.into_bytes()))
    }

    pub fn with_boundary(mut self, boundary: impl Into<String>) -> Self {
        self.boundary = Some(boundary.into());
        self
    }

    /// Assemble the body, reading every stream to the end.
    ///
    /// Any read failure aborts the whole body; nothing partial is returned.
    pub fn encode(self) -> Result<EncodedMultipart> {
        let mut writer = MultipartWriter::new(Vec::new());
        if let Some(boundary) = &self.boundary {
            writer.set_boundary(boundary)?;
        }

        let (file_count, part_count, field_count) =
            (self.files.len(), self.parts.len(), self.fields.len());

        for (filename, mut contents) in self.files {
            let dest = writer.create_form_file(FILE_FIELD_NAME, &filename)?;
            let copied = io::copy(&mut contents, dest)?;
            trace!(filename = %filename, bytes = copied, "Wrote file part");
        }

        for mut part in self.parts {
            let dest = writer.create_part(&part.headers)?;
            let copied = io::copy(&mut part.body, dest)?;
            trace!(bytes = copied, "Wrote custom part");
        }

        for (name, mut contents) in self.fields {
            let dest = writer.create_form_field(&name)?;
            let copied = io::copy(&mut contents, dest)?;
            trace!(field = %name, bytes = copied, "Wrote form field");
        }

        let content_type = writer.form_data_content_type();
        let buffer = writer.close()?;

        debug!(
            files = file_count,
            parts = part_count,
            fields = field_count,
            bytes = buffer.len(),
            content_type = %content_type,
            "Encoded multipart body"
        );

        Ok(EncodedMultipart { content_type, buffer })
    }
}

impl fmt::Debug for MultipartSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MultipartSpec")
            .field("files", &self.files.keys().collect::<Vec<_>>())
            .field("parts", &self.parts)
            .field("fields", &self.fields.keys().collect::<Vec<_>>())
            .field("boundary", &self.boundary)
            .finish()
    }
}

/// Streaming writer for multipart bodies
///
/// Each `create_*` call writes the delimiter and headers of a new part and
/// hands back the underlying writer for the part body. [`close`](Self::close)
/// writes the closing delimiter.
pub struct MultipartWriter<W: Write> {
    writer: W,
    boundary: String,
    wrote_part: bool,
}

impl<W: Write> MultipartWriter<W> {
    /// Create a writer with a random boundary
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            boundary: random_boundary(),
            wrote_part: false,
        }
    }

    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    /// Replace the generated boundary. Must happen before the first part.
    pub fn set_boundary(&mut self, boundary: &str) -> Result<()> {
        if self.wrote_part {
            return Err(RikuesutoError::Encoding(
                "boundary cannot change after a part was written".to_string(),
            ));
        }
        validate_boundary(boundary)?;
        self.boundary = boundary.to_string();
        Ok(())
    }

    /// `multipart/form-data` content type carrying this writer's boundary
    pub fn form_data_content_type(&self) -> String {
        let boundary = &self.boundary;
        if boundary.chars().any(|c| "()<>@,;:\\\"/[]?= ".contains(c)) {
            format!("multipart/form-data; boundary=\"{boundary}\"")
        } else {
            format!("multipart/form-data; boundary={boundary}")
        }
    }

    /// Start a part with the given headers, written in insertion order
    pub fn create_part(&mut self, headers: &HeaderValues) -> Result<&mut W> {
        let mut head = String::new();
        if self.wrote_part {
            head.push_str("\r\n");
        }
        head.push_str("--");
        head.push_str(&self.boundary);
        head.push_str("\r\n");
        for (name, values) in headers {
            for value in values {
                head.push_str(name);
                head.push_str(": ");
                head.push_str(value);
                head.push_str("\r\n");
            }
        }
        head.push_str("\r\n");

        self.writer.write_all(head.as_bytes())?;
        self.wrote_part = true;
        Ok(&mut self.writer)
    }

    /// Start a file part (`application/octet-stream`)
    pub fn create_form_file(&mut self, field_name: &str, filename: &str) -> Result<&mut W> {
        let mut headers = IndexMap::new();
        headers.insert(
            "Content-Disposition".to_string(),
            vec![format!(
                "form-data; name=\"{}\"; filename=\"{}\"",
                escape_quotes(field_name),
                escape_quotes(filename)
            )],
        );
        headers.insert(
            "Content-Type".to_string(),
            vec!["application/octet-stream".to_string()],
        );
        self.create_part(&headers)
    }

    /// Start a plain form field part
    pub fn create_form_field(&mut self, field_name: &str) -> Result<&mut W> {
        let mut headers = IndexMap::new();
        headers.insert(
            "Content-Disposition".to_string(),
            vec![format!("form-data; name=\"{}\"", escape_quotes(field_name))],
        );
        self.create_part(&headers)
    }

    /// Write the closing delimiter and return the underlying writer
    pub fn close(mut self) -> Result<W> {
        let tail = if self.wrote_part {
            format!("\r\n--{}--\r\n", self.boundary)
        } else {
            format!("--{}--\r\n", self.boundary)
        };
        self.writer.write_all(tail.as_bytes())?;
        self.writer.flush()?;
        Ok(self.writer)
    }
}

/// Check a boundary against the RFC 2046 grammar
pub fn validate_boundary(boundary: &str) -> Result<()> {
    let valid = !boundary.is_empty()
        && boundary.len() <= MAX_BOUNDARY_LEN
        && !boundary.ends_with(' ')
        && boundary.bytes().all(is_boundary_char);
    if valid {
        Ok(())
    } else {
        Err(RikuesutoError::InvalidBoundary(boundary.to_string()))
    }
}

fn is_boundary_char(b: u8) -> bool {
    b.is_ascii_alphanumeric()
        || matches!(
            b,
            b'\'' | b'(' | b')' | b'+' | b'_' | b',' | b'-' | b'.' | b'/' | b':' | b'=' | b'?' | b' '
        )
}

fn random_boundary() -> String {
    let mut bytes = [0u8; RANDOM_BOUNDARY_BYTES];
    rand::rng().fill(&mut bytes);
    hex::encode(bytes)
}

fn escape_quotes(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Reader that fails on first read
    struct BrokenReader;

    impl Read for BrokenReader {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::other("stream broke"))
        }
    }

    #[test]
    fn test_fixed_boundary_layout() {
        let encoded = MultipartSpec::new()
            .file("hello.txt", Cursor::new(b"hello file".to_vec()))
            .text_field("content", "hello multipart")
            .with_boundary("END_OF_PART")
            .encode()
            .unwrap();

        assert_eq!(encoded.content_type, "multipart/form-data; boundary=END_OF_PART");

        let expected = "--END_OF_PART\r\n\
            Content-Disposition: form-data; name=\"file\"; filename=\"hello.txt\"\r\n\
            Content-Type: application/octet-stream\r\n\
            \r\n\
            hello file\r\n\
            --END_OF_PART\r\n\
            Content-Disposition: form-data; name=\"content\"\r\n\
            \r\n\
            hello multipart\r\n\
            --END_OF_PART--\r\n";
        assert_eq!(String::from_utf8(encoded.buffer).unwrap(), expected);
    }

    #[test]
    fn test_custom_part_headers_verbatim() {
        let mut headers = IndexMap::new();
        headers.insert("Content-Type".to_string(), vec!["application/json".to_string()]);
        headers.insert("X-Trace".to_string(), vec!["a".to_string(), "b".to_string()]);

        let encoded = MultipartSpec::new()
            .part(Part::new(headers, Cursor::new(b"{}".to_vec())))
            .with_boundary("b")
            .encode()
            .unwrap();

        let body = String::from_utf8(encoded.buffer).unwrap();
        assert_eq!(
            body,
            "--b\r\nContent-Type: application/json\r\nX-Trace: a\r\nX-Trace: b\r\n\r\n{}\r\n--b--\r\n"
        );
        assert!(!body.contains("Content-Disposition"));
    }

    #[test]
    fn test_part_order_files_parts_fields() {
        let encoded = MultipartSpec::new()
            .text_field("z-field", "3")
            .part(Part::with_content_type("text/plain", Cursor::new(b"2".to_vec())))
            .file("a.bin", Cursor::new(b"1".to_vec()))
            .with_boundary("sep")
            .encode()
            .unwrap();

        let body = String::from_utf8(encoded.buffer).unwrap();
        let file_at = body.find("filename=\"a.bin\"").unwrap();
        let part_at = body.find("Content-Type: text/plain").unwrap();
        let field_at = body.find("name=\"z-field\"").unwrap();
        assert!(file_at < part_at && part_at < field_at);
    }

    #[test]
    fn test_empty_spec_writes_only_terminator() {
        let encoded = MultipartSpec::new().with_boundary("x").encode().unwrap();
        assert_eq!(encoded.buffer, b"--x--\r\n");
    }

    #[test]
    fn test_generated_boundary() {
        let encoded = MultipartSpec::new().text_field("a", "b").encode().unwrap();
        let boundary = crate::mime::multipart_boundary(&encoded.content_type).unwrap();
        assert_eq!(boundary.len(), RANDOM_BOUNDARY_BYTES * 2);
        assert!(boundary.chars().all(|c| c.is_ascii_hexdigit()));

        let body = String::from_utf8(encoded.buffer).unwrap();
        assert!(body.starts_with(&format!("--{boundary}\r\n")));
        assert!(body.ends_with(&format!("--{boundary}--\r\n")));
    }

    #[test]
    fn test_generated_boundaries_differ() {
        let a = MultipartWriter::new(Vec::new());
        let b = MultipartWriter::new(Vec::new());
        assert_ne!(a.boundary(), b.boundary());
    }

    #[test]
    fn test_boundary_is_quoted_when_needed() {
        let mut writer = MultipartWriter::new(Vec::new());
        writer.set_boundary("with space:colon").unwrap();
        assert_eq!(
            writer.form_data_content_type(),
            "multipart/form-data; boundary=\"with space:colon\""
        );
    }

    #[test]
    fn test_invalid_boundaries_rejected() {
        let too_long = "x".repeat(71);
        for bad in ["", "trailing ", "semi;colon", "quote\"", too_long.as_str()] {
            assert!(
                matches!(validate_boundary(bad), Err(RikuesutoError::InvalidBoundary(_))),
                "accepted {bad:?}"
            );
        }
        assert!(validate_boundary(&"x".repeat(70)).is_ok());
        assert!(validate_boundary("'()+_,-./:=? x").is_ok());
    }

    #[test]
    fn test_set_boundary_after_part_fails() {
        let mut writer = MultipartWriter::new(Vec::new());
        writer.create_form_field("a").unwrap();
        assert!(writer.set_boundary("late").is_err());
    }

    #[test]
    fn test_names_are_escaped() {
        let encoded = MultipartSpec::new()
            .file("say \"hi\"\\.txt", io::empty())
            .with_boundary("b")
            .encode()
            .unwrap();
        let body = String::from_utf8(encoded.buffer).unwrap();
        assert!(body.contains(r#"filename="say \"hi\"\\.txt""#));
    }

    #[test]
    fn test_read_failure_aborts() {
        let err = MultipartSpec::new()
            .text_field("ok", "fine")
            .field("broken", BrokenReader)
            .encode()
            .unwrap_err();
        assert!(matches!(err, RikuesutoError::Io(_)));
    }

    #[test]
    fn test_binary_contents_preserved() {
        let data: Vec<u8> = (0..=255).collect();
        let encoded = MultipartSpec::new()
            .file("all.bin", Cursor::new(data.clone()))
            .with_boundary("b")
            .encode()
            .unwrap();
        let needle = encoded
            .buffer
            .windows(data.len())
            .any(|w| w == data.as_slice());
        assert!(needle);
    }
}
