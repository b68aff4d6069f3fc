//! Upload handling (multipart/form-data assembly)

pub mod multipart;

pub use multipart::{EncodedMultipart, MultipartSpec, MultipartWriter, Part};
