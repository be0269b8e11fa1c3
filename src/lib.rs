//! Stubo Gateway Library
//!
//! A thin HTTP gateway in front of a Stubo stub/mock server: it re-exposes a
//! subset of the Stubo REST API v2 under a simplified, proxy-friendly
//! query-parameter URL scheme and relays responses byte-for-byte.

pub mod config;
pub mod http;
pub mod observability;
pub mod upstream;

pub use config::GatewayConfig;
pub use http::HttpServer;
pub use upstream::UpstreamClient;
