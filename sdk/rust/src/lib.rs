//! Minimal client SDK for the Stubo gateway.

pub mod client;

pub use client::GatewayClient;
