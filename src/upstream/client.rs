//! HTTP client for the Stubo REST API v2.
//!
//! # Responsibilities
//! - Build one request descriptor per logical operation (path, verb, body,
//!   headers)
//! - Issue the call and return raw bytes plus the untranslated status
//! - Stay schema-agnostic: bodies are opaque except for the delay-policy
//!   sweep, which must parse the listing to fan out deletions

use std::collections::HashMap;

use axum::http::{Method, StatusCode};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};

use crate::upstream::error::{UpstreamError, UpstreamResult};
use crate::upstream::types::{
    DelayPolicyListing, DelaySweep, SweepFailure, UpstreamRequest, UpstreamResponse,
};

/// Prefix shared by every Stubo API v2 endpoint.
const API_PREFIX: &str = "/stubo/api/v2";

/// Parameters for deleting a scenario's stubs.
///
/// `force` and `target_host` travel as headers, not query arguments; that is
/// where API v2 expects them.
#[derive(Debug, Clone, Default)]
pub struct DeleteStubsParams {
    pub name: String,
    pub force: Option<String>,
    pub target_host: Option<String>,
}

/// Client for a single Stubo instance.
///
/// Cheap to clone; holds the shared reqwest client and the immutable base
/// URI assembled at startup.
#[derive(Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    base_uri: String,
}

impl UpstreamClient {
    pub fn new(http: reqwest::Client, base_uri: impl Into<String>) -> Self {
        Self {
            http,
            base_uri: base_uri.into(),
        }
    }

    pub fn base_uri(&self) -> &str {
        &self.base_uri
    }

    /// Get stubs for a scenario:
    /// GET /stubo/api/v2/scenarios/objects/{scenario}/stubs
    pub async fn list_scenario_stubs(&self, scenario: &str) -> UpstreamResult<UpstreamResponse> {
        self.execute(list_scenario_stubs_request(scenario)?).await
    }

    /// Delete stubs for a scenario:
    /// DELETE /stubo/api/v2/scenarios/objects/{name}/stubs
    pub async fn delete_scenario_stubs(
        &self,
        params: DeleteStubsParams,
    ) -> UpstreamResult<UpstreamResponse> {
        self.execute(delete_scenario_stubs_request(params)?).await
    }

    /// Insert a stub:
    /// PUT /stubo/api/v2/scenarios/objects/{scenario}/stubs?{args}
    ///
    /// Body and headers pass through verbatim; the `session` header must be
    /// present.
    pub async fn put_stub(
        &self,
        scenario: &str,
        args: &str,
        body: Vec<u8>,
        headers: HashMap<String, String>,
    ) -> UpstreamResult<UpstreamResponse> {
        self.execute(stub_request(Method::PUT, scenario, args, body, headers)?)
            .await
    }

    /// Look up the response recorded for a session:
    /// POST /stubo/api/v2/scenarios/objects/{scenario}/stubs?{args}
    ///
    /// Same endpoint as `put_stub` with the passthrough verb; args, headers
    /// and body are forwarded untouched.
    pub async fn get_stub_response(
        &self,
        scenario: &str,
        args: &str,
        body: Vec<u8>,
        headers: HashMap<String, String>,
    ) -> UpstreamResult<UpstreamResponse> {
        self.execute(stub_request(Method::POST, scenario, args, body, headers)?)
            .await
    }

    /// Get one delay policy:
    /// GET /stubo/api/v2/delay-policy/objects/{name}
    pub async fn get_delay_policy(&self, name: &str) -> UpstreamResult<UpstreamResponse> {
        self.execute(delay_policy_request(Method::GET, name)?).await
    }

    /// Get every delay policy with details:
    /// GET /stubo/api/v2/delay-policy/detail
    ///
    /// Returns the raw envelope later fed to [`Self::delete_all_delay_policies`].
    pub async fn get_all_delay_policies(&self) -> UpstreamResult<UpstreamResponse> {
        self.execute(UpstreamRequest::new(
            Method::GET,
            format!("{API_PREFIX}/delay-policy/detail"),
        ))
        .await
    }

    /// Create or update a delay policy:
    /// PUT /stubo/api/v2/delay-policy
    ///
    /// The JSON body is assembled by the caller from query parameters.
    pub async fn put_delay_policy(&self, body: Vec<u8>) -> UpstreamResult<UpstreamResponse> {
        self.execute(
            UpstreamRequest::new(Method::PUT, format!("{API_PREFIX}/delay-policy")).with_body(body),
        )
        .await
    }

    /// Delete one delay policy:
    /// DELETE /stubo/api/v2/delay-policy/objects/{name}
    pub async fn delete_delay_policy(&self, name: &str) -> UpstreamResult<UpstreamResponse> {
        self.execute(delay_policy_request(Method::DELETE, name)?)
            .await
    }

    /// Begin a record or playback session:
    /// POST /stubo/api/v2/scenarios/objects/{scenario}/action
    pub async fn begin_session(
        &self,
        session: &str,
        scenario: &str,
        mode: &str,
    ) -> UpstreamResult<UpstreamResponse> {
        let body = serde_json::to_vec(&serde_json::json!({
            "begin": null,
            "session": session,
            "mode": mode,
        }))?;
        self.execute(
            UpstreamRequest::new(Method::POST, scenario_action_path(scenario)).with_body(body),
        )
        .await
    }

    /// Ensure a scenario exists:
    /// PUT /stubo/api/v2/scenarios
    ///
    /// Stubo answers 422 for a duplicate; that is success for our purposes,
    /// so callers must not treat a non-2xx status here as failure.
    pub async fn create_scenario(&self, scenario: &str) -> UpstreamResult<UpstreamResponse> {
        let body = serde_json::to_vec(&serde_json::json!({ "scenario": scenario }))?;
        self.execute(
            UpstreamRequest::new(Method::PUT, format!("{API_PREFIX}/scenarios")).with_body(body),
        )
        .await
    }

    /// End all sessions of a scenario:
    /// POST /stubo/api/v2/scenarios/objects/{scenario}/action
    pub async fn end_sessions(&self, scenario: &str) -> UpstreamResult<UpstreamResponse> {
        let body = serde_json::to_vec(&serde_json::json!({ "end": "sessions" }))?;
        self.execute(
            UpstreamRequest::new(Method::POST, scenario_action_path(scenario)).with_body(body),
        )
        .await
    }

    /// List scenarios: GET /stubo/api/v2/scenarios
    pub async fn list_scenarios(&self) -> UpstreamResult<UpstreamResponse> {
        self.execute(UpstreamRequest::new(
            Method::GET,
            format!("{API_PREFIX}/scenarios"),
        ))
        .await
    }

    /// List scenarios with details: GET /stubo/api/v2/scenarios/detail
    pub async fn list_scenarios_detail(&self) -> UpstreamResult<UpstreamResponse> {
        self.execute(UpstreamRequest::new(
            Method::GET,
            format!("{API_PREFIX}/scenarios/detail"),
        ))
        .await
    }

    /// Delete every delay policy named in a previously fetched listing.
    ///
    /// API v2 has no bulk delete, so the listing is decoded and the policies
    /// are deleted one by one, sequentially, in listing order. A failed item
    /// is logged and recorded but never aborts the sweep; a listing that does
    /// not decode aborts before any deletion is issued.
    pub async fn delete_all_delay_policies(&self, listing: &[u8]) -> UpstreamResult<DelaySweep> {
        let listing: DelayPolicyListing = serde_json::from_slice(listing)?;

        tracing::info!(
            count = listing.data.len(),
            version = %listing.version,
            "Deleting delay policies one by one"
        );

        let mut sweep = DelaySweep {
            version: listing.version,
            deleted: Vec::new(),
            failed: Vec::new(),
        };

        for policy in listing.data {
            match self.delete_delay_policy(&policy.name).await {
                Ok(response) if response.status.is_success() => {
                    sweep.deleted.push(policy.name);
                }
                Ok(response) => {
                    tracing::warn!(
                        name = %policy.name,
                        status = %response.status,
                        "Failed to delete delay policy"
                    );
                    sweep.failed.push(SweepFailure {
                        name: policy.name,
                        reason: format!("Stubo returned status {}", response.status),
                    });
                }
                Err(e) => {
                    tracing::warn!(
                        name = %policy.name,
                        error = %e,
                        "Failed to delete delay policy"
                    );
                    sweep.failed.push(SweepFailure {
                        name: policy.name,
                        reason: e.to_string(),
                    });
                }
            }
        }

        tracing::info!(response = %sweep.message(), "Delay policies deleted");
        Ok(sweep)
    }

    /// Issue one call described by `request` and read the full response.
    ///
    /// The status code is returned as-is; only transport failures become
    /// errors.
    async fn execute(&self, request: UpstreamRequest) -> UpstreamResult<UpstreamResponse> {
        let url = format!("{}{}", self.base_uri, request.path);

        tracing::debug!(method = %request.method, url = %url, "Calling Stubo");

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        for (key, value) in &request.headers {
            let name = match HeaderName::from_bytes(key.as_bytes()) {
                Ok(name) => name,
                Err(_) => {
                    tracing::warn!(header = %key, "Skipping invalid header name");
                    continue;
                }
            };
            match HeaderValue::from_str(value) {
                Ok(value) => {
                    headers.insert(name, value);
                }
                Err(_) => {
                    tracing::warn!(header = %key, "Skipping invalid header value");
                }
            }
        }

        let mut builder = self
            .http
            .request(request.method, &url)
            .headers(headers);
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let body = response.bytes().await?.to_vec();

        Ok(UpstreamResponse {
            status: StatusCode::from_u16(status.as_u16())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            body,
        })
    }
}

fn scenario_action_path(scenario: &str) -> String {
    format!("{API_PREFIX}/scenarios/objects/{scenario}/action")
}

fn list_scenario_stubs_request(scenario: &str) -> UpstreamResult<UpstreamRequest> {
    if scenario.is_empty() {
        return Err(UpstreamError::validation("scenario name not supplied"));
    }
    Ok(UpstreamRequest::new(
        Method::GET,
        format!("{API_PREFIX}/scenarios/objects/{scenario}/stubs"),
    ))
}

fn delete_scenario_stubs_request(params: DeleteStubsParams) -> UpstreamResult<UpstreamRequest> {
    if params.name.is_empty() {
        return Err(UpstreamError::validation("scenario name not supplied"));
    }
    let mut request = UpstreamRequest::new(
        Method::DELETE,
        format!("{API_PREFIX}/scenarios/objects/{}/stubs", params.name),
    );
    if let Some(force) = params.force {
        request = request.with_header("force", force);
    }
    if let Some(target_host) = params.target_host {
        request = request.with_header("target_host", target_host);
    }
    Ok(request)
}

fn stub_request(
    method: Method,
    scenario: &str,
    args: &str,
    body: Vec<u8>,
    headers: HashMap<String, String>,
) -> UpstreamResult<UpstreamRequest> {
    if scenario.is_empty() || !headers.contains_key("session") {
        return Err(UpstreamError::validation("scenario or session not supplied"));
    }
    let mut path = format!("{API_PREFIX}/scenarios/objects/{scenario}/stubs");
    if !args.is_empty() {
        path.push('?');
        path.push_str(args);
    }
    Ok(UpstreamRequest::new(method, path)
        .with_body(body)
        .with_headers(headers))
}

fn delay_policy_request(method: Method, name: &str) -> UpstreamResult<UpstreamRequest> {
    if name.is_empty() {
        return Err(UpstreamError::validation("delay policy name not supplied"));
    }
    Ok(UpstreamRequest::new(
        method,
        format!("{API_PREFIX}/delay-policy/objects/{name}"),
    ))
}
