//! One handler per externally exposed gateway route.
//!
//! Every handler follows the same shape: parse inbound parameters, reject
//! with 400 before any upstream traffic when a required one is missing, then
//! either delegate 1:1 to an upstream operation and relay the result, or run
//! the delete-all-delay-policies fan-out. Upstream bodies are relayed
//! byte-for-byte with the upstream status mirrored; validation failures are
//! 400 plain text, transport and decode failures 500 with the error text.

use std::time::Instant;

use axum::body::Bytes;
use axum::extract::{RawQuery, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::http::server::AppState;
use crate::http::translate::{
    first_param, parse_query, parse_session_ref, query_to_json, session_from, split_query,
    HOISTED_QUERY_KEYS, NO_HOISTED_KEYS,
};
use crate::observability::metrics;
use crate::upstream::error::{UpstreamError, UpstreamResult};
use crate::upstream::types::UpstreamResponse;
use crate::upstream::DeleteStubsParams;

const CONTENT_TYPE_JSON: &str = "application/json";
const CONTENT_TYPE_HTML: &str = "text/html";

/// Gets stubs, e.g.: /gateway/get/stublist?scenario=first
pub async fn stublist_handler(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> Response {
    let started = Instant::now();
    let pairs = parse_query(query.as_deref());

    let Some(scenario) = first_param(&pairs, "scenario") else {
        tracing::warn!(url_query = ?query, "Scenario name was not provided");
        return reject(
            "get/stublist",
            started,
            "Scenario name not provided.",
        );
    };

    let outcome = state.upstream.list_scenario_stubs(scenario).await;
    relay("get/stublist", started, CONTENT_TYPE_JSON, outcome)
}

/// Deletes scenario stubs, e.g.: /gateway/delete/stubs?scenario=first
/// Optional arguments: host=your_host, force=true/false.
pub async fn delete_stubs_handler(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> Response {
    let started = Instant::now();
    let pairs = parse_query(query.as_deref());

    let Some(scenario) = first_param(&pairs, "scenario") else {
        tracing::warn!(url_query = ?query, "Scenario name was not provided");
        return reject("delete/stubs", started, "Scenario name not provided.");
    };

    let params = DeleteStubsParams {
        name: scenario.to_string(),
        force: first_param(&pairs, "force").map(str::to_string),
        target_host: first_param(&pairs, "host").map(str::to_string),
    };

    let outcome = state.upstream.delete_scenario_stubs(params).await;
    relay("delete/stubs", started, CONTENT_TYPE_JSON, outcome)
}

/// Takes a POST from the client, hoists allow-listed URL query arguments to
/// header values, forwards the rest as upstream query arguments, and relays
/// the Stubo response without touching the body.
pub async fn put_stub_handler(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
    body: Bytes,
) -> Response {
    let started = Instant::now();
    let pairs = parse_query(query.as_deref());

    let Some(raw_session) = first_param(&pairs, "session") else {
        tracing::warn!(url_query = ?query, "Session name was not provided");
        return reject("put/stub", started, "Bad request, missing session name.");
    };

    let Some(session_ref) = parse_session_ref(raw_session) else {
        let msg = "Bad request, missing session or scenario name. When under proxy, \
                   please use 'scenario:session' format in your URL query, such as \
                   '/gateway/put/stub?session=scenario:session_name'";
        tracing::warn!(url_query = ?query, session = %raw_session, "{}", msg);
        return reject("put/stub", started, msg);
    };

    // The session pair itself is consumed here, never forwarded.
    let forwarded: Vec<(String, String)> = pairs
        .iter()
        .filter(|(k, _)| k != "session")
        .cloned()
        .collect();
    let (mut headers, args) = split_query(&forwarded, HOISTED_QUERY_KEYS);
    headers.insert("session".to_string(), session_ref.session);

    let outcome = state
        .upstream
        .put_stub(&session_ref.scenario, &args, body.to_vec(), headers)
        .await;
    relay("put/stub", started, CONTENT_TYPE_JSON, outcome)
}

/// Looks up the stubbed response for a request body. The session reference
/// may come from the query string or the Stubo-Request-Session header.
pub async fn get_stub_response_handler(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
    inbound_headers: HeaderMap,
    body: Bytes,
) -> Response {
    let started = Instant::now();
    let pairs = parse_query(query.as_deref());

    let Some(raw_session) = session_from(&pairs, &inbound_headers) else {
        tracing::warn!(url_query = ?query, "Session name was not provided");
        return reject("get/response", started, "Bad request, missing session name.");
    };

    let Some(session_ref) = parse_session_ref(&raw_session) else {
        let msg = "Bad request, missing session or scenario name. When under proxy, \
                   please use 'scenario:session' format in your URL query, such as \
                   '/gateway/get/response?session=scenario:session_name'";
        tracing::warn!(url_query = ?query, session = %raw_session, "{}", msg);
        return reject("get/response", started, msg);
    };

    let forwarded: Vec<(String, String)> = pairs
        .iter()
        .filter(|(k, _)| k != "session")
        .cloned()
        .collect();
    let (mut headers, args) = split_query(&forwarded, NO_HOISTED_KEYS);
    headers.insert("session".to_string(), session_ref.session);

    tracing::info!(
        scenario = %session_ref.scenario,
        args = %args,
        "Stub response args and headers created"
    );

    let outcome = state
        .upstream
        .get_stub_response(&session_ref.scenario, &args, body.to_vec(), headers)
        .await;
    relay("get/response", started, CONTENT_TYPE_HTML, outcome)
}

/// Returns delay policy information; lists all policies when no name is
/// given, e.g.: /gateway/get/delay_policy?name=slow
pub async fn get_delay_policy_handler(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> Response {
    let started = Instant::now();
    let pairs = parse_query(query.as_deref());

    let outcome = match first_param(&pairs, "name") {
        Some(name) => state.upstream.get_delay_policy(name).await,
        None => state.upstream.get_all_delay_policies().await,
    };
    relay("get/delay_policy", started, CONTENT_TYPE_JSON, outcome)
}

/// Turns URL query arguments into the JSON body of a delay policy, e.g.:
/// /gateway/put/delay_policy?name=slow&delay_type=fixed&milliseconds=1000
pub async fn put_delay_policy_handler(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> Response {
    let started = Instant::now();
    let pairs = parse_query(query.as_deref());

    tracing::info!(url_query = ?query, "Got query to create new delay policy");

    let body = match serde_json::to_vec(&query_to_json(&pairs)) {
        Ok(body) => body,
        Err(e) => {
            return fail("put/delay_policy", started, UpstreamError::from(e));
        }
    };

    let outcome = state.upstream.put_delay_policy(body).await;
    relay("put/delay_policy", started, CONTENT_TYPE_JSON, outcome)
}

/// Deletes one delay policy when a name is given; with no name, fetches the
/// full listing and deletes every policy in it one by one.
pub async fn delete_delay_policy_handler(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> Response {
    let started = Instant::now();
    let pairs = parse_query(query.as_deref());

    if let Some(name) = first_param(&pairs, "name") {
        tracing::info!(name = %name, "Deleting specified delay policy");
        let outcome = state.upstream.delete_delay_policy(name).await;
        return relay("delete/delay_policy", started, CONTENT_TYPE_JSON, outcome);
    }

    tracing::info!("Deleting all delay policies in two steps");
    let listing = match state.upstream.get_all_delay_policies().await {
        Ok(listing) => listing,
        Err(e) => return fail("delete/delay_policy", started, e),
    };

    let sweep = match state.upstream.delete_all_delay_policies(&listing.body).await {
        Ok(sweep) => sweep,
        Err(e) => return fail("delete/delay_policy", started, e),
    };

    if !sweep.failed.is_empty() {
        tracing::warn!(
            failed = sweep.failed.len(),
            deleted = sweep.deleted.len(),
            "Some delay policies could not be deleted"
        );
    }

    let body = match serde_json::to_vec(&sweep.to_envelope()) {
        Ok(body) => body,
        Err(e) => return fail("delete/delay_policy", started, UpstreamError::from(e)),
    };
    metrics::record_request("delete/delay_policy", StatusCode::OK.as_u16(), started);
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, CONTENT_TYPE_JSON)],
        body,
    )
        .into_response()
}

/// Begins a record or playback session, e.g.:
/// /gateway/begin/session?scenario=first&session=first_1&mode=playback
pub async fn begin_session_handler(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> Response {
    let started = Instant::now();
    let pairs = parse_query(query.as_deref());

    let Some(scenario) = first_param(&pairs, "scenario") else {
        return reject("begin/session", started, "Bad request, missing scenario name.");
    };
    let Some(session) = first_param(&pairs, "session") else {
        return reject("begin/session", started, "Bad request, missing session name.");
    };
    let Some(mode) = first_param(&pairs, "mode") else {
        return reject("begin/session", started, "Bad request, missing session mode key.");
    };

    // Ensure the scenario exists first. Stubo answers 422 for a duplicate
    // and that is fine; only a transport failure stops the flow.
    match state.upstream.create_scenario(scenario).await {
        Ok(response) => {
            tracing::debug!(
                scenario = %scenario,
                status = %response.status,
                "Ensured scenario exists"
            );
        }
        Err(e) => return fail("begin/session", started, e),
    }

    let outcome = state.upstream.begin_session(session, scenario, mode).await;
    relay("begin/session", started, CONTENT_TYPE_JSON, outcome)
}

/// Ends all sessions of a scenario, e.g.: /gateway/end/sessions?scenario=first
pub async fn end_sessions_handler(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> Response {
    let started = Instant::now();
    let pairs = parse_query(query.as_deref());

    let Some(scenario) = first_param(&pairs, "scenario") else {
        tracing::warn!(url_query = ?query, "Scenario name was not provided");
        return reject("end/sessions", started, "Scenario name not provided.");
    };

    tracing::info!(scenario = %scenario, "Ending sessions");
    let outcome = state.upstream.end_sessions(scenario).await;
    relay("end/sessions", started, CONTENT_TYPE_JSON, outcome)
}

/// Lists all scenarios.
pub async fn get_scenarios_handler(State(state): State<AppState>) -> Response {
    let started = Instant::now();
    tracing::info!("Getting scenarios");
    let outcome = state.upstream.list_scenarios().await;
    relay("get/scenarios", started, CONTENT_TYPE_JSON, outcome)
}

/// Relay an upstream outcome to the caller: body byte-for-byte, status
/// mirrored, content type set per route.
fn relay(
    route: &'static str,
    started: Instant,
    content_type: &'static str,
    outcome: UpstreamResult<UpstreamResponse>,
) -> Response {
    match outcome {
        Ok(upstream) => {
            metrics::record_request(route, upstream.status.as_u16(), started);
            (
                upstream.status,
                [(header::CONTENT_TYPE, content_type)],
                upstream.body,
            )
                .into_response()
        }
        Err(e) => fail(route, started, e),
    }
}

/// Reject before any upstream call: 400 with a plain-text message naming
/// what is missing.
fn reject(route: &'static str, started: Instant, message: &'static str) -> Response {
    metrics::record_request(route, StatusCode::BAD_REQUEST.as_u16(), started);
    (StatusCode::BAD_REQUEST, message).into_response()
}

/// Map an upstream error to the caller-visible failure.
fn fail(route: &'static str, started: Instant, error: UpstreamError) -> Response {
    match error {
        UpstreamError::Validation(message) => {
            tracing::warn!(route = %route, error = %message, "Rejecting request");
            metrics::record_request(route, StatusCode::BAD_REQUEST.as_u16(), started);
            (StatusCode::BAD_REQUEST, message).into_response()
        }
        other => {
            tracing::error!(route = %route, error = %other, "Error during request to Stubo");
            metrics::record_request(route, StatusCode::INTERNAL_SERVER_ERROR.as_u16(), started);
            (StatusCode::INTERNAL_SERVER_ERROR, other.to_string()).into_response()
        }
    }
}
