//! Shared utilities for integration testing.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::IntoResponse;
use axum::Router;
use tokio::net::TcpListener;

use stubo_gateway::config::GatewayConfig;
use stubo_gateway::http::HttpServer;
use stubo_gateway::upstream::UpstreamClient;

/// One request observed by the mock Stubo server.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
}

type Responder = Arc<dyn Fn(&str, &str) -> (u16, String) + Send + Sync>;

#[derive(Clone)]
struct MockState {
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    responder: Responder,
}

/// Programmable mock Stubo instance that records every request it sees.
#[derive(Clone)]
pub struct MockStubo {
    pub addr: SocketAddr,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockStubo {
    /// Start a mock whose responses are computed from (method, path).
    pub async fn start(
        responder: impl Fn(&str, &str) -> (u16, String) + Send + Sync + 'static,
    ) -> Self {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = MockState {
            requests: requests.clone(),
            responder: Arc::new(responder),
        };

        let app = Router::new().fallback(record_handler).with_state(state);
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self { addr, requests }
    }

    /// Start a mock that answers every request with a fixed status and body.
    #[allow(dead_code)]
    pub async fn start_fixed(status: u16, body: &str) -> Self {
        let body = body.to_string();
        Self::start(move |_, _| (status, body.clone())).await
    }

    pub fn base_uri(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Everything the mock has seen so far, in arrival order.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Number of requests seen so far.
    pub fn hits(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

async fn record_handler(
    State(state): State<MockState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    let mut recorded_headers = HashMap::new();
    for (key, value) in headers.iter() {
        if let Ok(value) = value.to_str() {
            recorded_headers.insert(key.as_str().to_string(), value.to_string());
        }
    }

    let path = uri.path().to_string();
    state.requests.lock().unwrap().push(RecordedRequest {
        method: method.to_string(),
        path: path.clone(),
        query: uri.query().map(str::to_string),
        headers: recorded_headers,
        body: body.to_vec(),
    });

    let (status, body) = (state.responder)(method.as_str(), &path);
    (
        StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        body,
    )
}

/// Start a gateway on an ephemeral port, pointed at the given upstream.
/// The spawned server dies with the test runtime.
#[allow(dead_code)]
pub async fn start_gateway(upstream_base: &str) -> SocketAddr {
    let upstream = UpstreamClient::new(reqwest::Client::new(), upstream_base);
    let server = HttpServer::new(GatewayConfig::default(), upstream);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = server.run(listener).await;
    });

    addr
}

/// Gateway wired to a recording mock Stubo; returns both ends.
#[allow(dead_code)]
pub async fn gateway_with_mock(
    responder: impl Fn(&str, &str) -> (u16, String) + Send + Sync + 'static,
) -> (SocketAddr, MockStubo) {
    let mock = MockStubo::start(responder).await;
    let gateway = start_gateway(&mock.base_uri()).await;
    (gateway, mock)
}

/// The delay-policy listing fixture Stubo returns from
/// /stubo/api/v2/delay-policy/detail.
#[allow(dead_code)]
pub const DELAY_POLICY_LISTING: &str = r#"{
    "version": "0.6.6",
    "data": [
        {"delay_type": "fixed", "delayPolicyRef": "/stubo/api/v2/delay-policy/objects/my_delay", "name": "my_delay", "milliseconds": 50},
        {"delay_type": "fixed", "delayPolicyRef": "/stubo/api/v2/delay-policy/objects/my_delay2", "name": "my_delay2", "milliseconds": 50},
        {"delay_type": "fixed", "delayPolicyRef": "/stubo/api/v2/delay-policy/objects/my_delay1", "name": "my_delay1", "milliseconds": 50}
    ]
}"#;
