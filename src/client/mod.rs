//! HTTP client functionality

pub mod http;

// Re-exports
pub use http::{
    default_client, do_read_body, do_read_string, must_do_read_body, must_do_read_string,
    must_read_body, must_read_string, must_send, read_body, read_string, send, ResponseHead,
    USER_AGENT_STRING,
};
