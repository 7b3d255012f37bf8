//! Resolution of raw request configuration into an immutable, protocol-tagged
//! [`RequestSpec`].
mod headers;
mod spec;


pub use headers::{merge_header_line, parse_header_lines};
pub use spec::{
    DEFAULT_CONTENT_TYPE, DEFAULT_TIMEOUT, RawRequest, RequestSpec, resolve_target,
};
