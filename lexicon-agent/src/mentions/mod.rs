//! "In the wild" mention sources.

pub mod fixtures;
pub mod http;

pub use fixtures::StaticMentionSource;
pub use http::HttpMentionSource;
