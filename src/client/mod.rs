pub mod headers;
pub mod request;
pub mod round_tripper;

pub use headers::{HeaderEntry, HeaderSet};
pub use request::build_request;
pub use round_tripper::RoundTripper;
