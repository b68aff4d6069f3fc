//! Configuration: TOML request files

mod request_file;

pub use request_file::{HeaderEntry, MultipartFile, PartFile, RequestFile};
