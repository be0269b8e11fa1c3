//! Upstream client subsystem.
//!
//! # Data Flow
//! ```text
//! handler builds operation call
//!     → client.rs (descriptor: path, verb, body, headers)
//!     → reqwest (base URI + path, Content-Type default, body)
//!     → raw bytes + untranslated status back to the handler
//! ```
//!
//! # Design Decisions
//! - Deliberately dumb: response bodies stay opaque except for the
//!   delay-policy sweep, the one operation that must parse a listing
//! - Status codes pass through untouched; translating them is handler
//!   business
//! - No retries, no timeouts beyond what the transport is configured with

pub mod client;
pub mod error;
pub mod types;

pub use client::{DeleteStubsParams, UpstreamClient};
pub use error::{UpstreamError, UpstreamResult};
pub use types::{DelayPolicy, DelayPolicyListing, DelaySweep, UpstreamRequest, UpstreamResponse};
