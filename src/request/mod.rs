//! Request building module
//!
//! Describes a request ([`RequestSpec`]), encodes its payload and builds the
//! transport request from it.

mod builder;
mod encode;
mod spec;

pub use builder::{
    build_request, connect, delete, get, head, must_build_request, must_connect, must_delete,
    must_get, must_head, must_options, must_patch, must_post, must_put, must_trace, options,
    patch, post, put, to_header_map, trace,
};
pub use encode::{encode, Body, EncodedBody};
#[cfg(test)]
pub(crate) use encode::read_to_vec;
pub use spec::{ByteStream, HeaderValues, Payload, RequestSpec, RequestSpecBuilder};
