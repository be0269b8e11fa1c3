//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the Stubo gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Target Stubo instance the gateway forwards to.
    pub upstream: UpstreamConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:3000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
        }
    }
}

/// Target Stubo instance details (protocol, hostname, port).
///
/// Assembled into a single base URI at startup and injected into the
/// upstream client; never mutated afterwards.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Scheme used to reach Stubo ("http" or "https").
    pub protocol: String,

    /// Stubo hostname.
    pub host: String,

    /// Stubo port.
    pub port: u16,
}

impl UpstreamConfig {
    /// Assemble the base URI used for all outbound calls
    /// (e.g. "http://localhost:8001").
    pub fn base_uri(&self) -> String {
        format!("{}://{}:{}", self.protocol, self.host, self.port)
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            protocol: "http".to_string(),
            host: "localhost".to_string(),
            port: 8001,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_base_uri() {
        let config = UpstreamConfig::default();
        assert_eq!(config.base_uri(), "http://localhost:8001");
    }

    #[test]
    fn test_base_uri_assembly() {
        let config = UpstreamConfig {
            protocol: "https".to_string(),
            host: "stubo.internal".to_string(),
            port: 8443,
        };
        assert_eq!(config.base_uri(), "https://stubo.internal:8443");
    }

    #[test]
    fn test_minimal_config_parses() {
        let config: GatewayConfig = toml::from_str(
            r#"
            [upstream]
            host = "stubo.example.com"
            "#,
        )
        .unwrap();
        assert_eq!(config.upstream.host, "stubo.example.com");
        assert_eq!(config.upstream.port, 8001);
        assert_eq!(config.listener.bind_address, "0.0.0.0:3000");
    }
}
