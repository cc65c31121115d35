pub mod http;

pub use http::HttpProfileAdapter;
