//! Wire types shared by the upstream client and the handlers.

use std::collections::HashMap;

use axum::http::{Method, StatusCode};
use serde::{Deserialize, Serialize};

/// Descriptor for one outbound call to Stubo.
///
/// Built fresh per operation and immutable once handed to the transport
/// step.
#[derive(Debug, Clone)]
pub struct UpstreamRequest {
    /// Path relative to the configured base URI, query string included.
    pub path: String,
    /// HTTP verb.
    pub method: Method,
    /// Raw body, forwarded verbatim when present.
    pub body: Option<Vec<u8>>,
    /// Extra headers. `Content-Type: application/json` is applied unless
    /// overridden here.
    pub headers: HashMap<String, String>,
}

impl UpstreamRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            method,
            body: None,
            headers: HashMap::new(),
        }
    }

    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn with_headers(mut self, headers: HashMap<String, String>) -> Self {
        self.headers = headers;
        self
    }

    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }
}

/// Raw result of one upstream call. The status code is passed through, not
/// translated; interpreting non-2xx is the caller's business.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

/// One delay policy as listed by `/delay-policy/detail`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct DelayPolicy {
    /// Policy name, used for deletion.
    #[serde(default)]
    pub name: String,
    /// Resource reference path reported by Stubo.
    #[serde(rename = "delayPolicyRef", default)]
    pub reference: String,
}

/// Envelope returned by `/delay-policy/detail`.
#[derive(Debug, Clone, Deserialize)]
pub struct DelayPolicyListing {
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub data: Vec<DelayPolicy>,
}

/// One failed deletion inside a sweep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepFailure {
    pub name: String,
    pub reason: String,
}

/// Outcome of a delete-all-delay-policies sweep.
///
/// Callers that only look at the serialized envelope cannot tell a partial
/// sweep from a full one; this type keeps the distinction observable.
#[derive(Debug, Clone)]
pub struct DelaySweep {
    /// Stubo version carried through from the fetched listing.
    pub version: String,
    /// Names deleted, in listing order.
    pub deleted: Vec<String>,
    /// Names that failed, in listing order, with the failure reason.
    pub failed: Vec<SweepFailure>,
}

impl DelaySweep {
    /// Human-readable summary, e.g.
    /// `"Deleted 3 delay policies: my_delay my_delay2 my_delay1"`.
    pub fn message(&self) -> String {
        format!("Deleted {} delay policies: ", self.deleted.len()) + &self.deleted.join(" ")
    }

    /// Serialize the envelope sent back to the gateway caller.
    pub fn to_envelope(&self) -> ClientEnvelope {
        ClientEnvelope {
            version: self.version.clone(),
            data: EnvelopeMessage {
                message: self.message(),
            },
        }
    }
}

/// Response envelope synthesized by the gateway for aggregate operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientEnvelope {
    pub version: String,
    pub data: EnvelopeMessage,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvelopeMessage {
    pub message: String,
}
