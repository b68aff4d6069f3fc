//! HTTP protocol types and constants
//!
//! Method names accepted by the request builders.

mod method;

pub use method::*;
