//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, routes, layers)
//!     → request.rs (add request ID)
//!     → handlers.rs (parse, validate, call upstream ops)
//!     → translate.rs (session refs, header hoisting, arg strings)
//!     → response relayed to client
//! ```

pub mod handlers;
pub mod request;
pub mod server;
pub mod translate;

pub use request::{RequestId, RequestIdLayer, X_REQUEST_ID};
pub use server::HttpServer;
