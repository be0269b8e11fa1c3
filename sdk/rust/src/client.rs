use reqwest::{Client, Response};

/// Client for the simplified gateway surface.
///
/// All methods return the raw reqwest response; the gateway relays Stubo
/// bodies byte-for-byte, so interpretation is left to the caller.
pub struct GatewayClient {
    client: Client,
    gateway_url: String,
}

impl GatewayClient {
    pub fn new(gateway_url: &str) -> Self {
        Self {
            client: Client::new(),
            gateway_url: gateway_url.to_string(),
        }
    }

    /// List the stubs of a scenario.
    pub async fn stub_list(&self, scenario: &str) -> Result<Response, reqwest::Error> {
        self.client
            .get(format!("{}/gateway/get/stublist", self.gateway_url))
            .query(&[("scenario", scenario)])
            .send()
            .await
    }

    /// List all scenarios.
    pub async fn scenarios(&self) -> Result<Response, reqwest::Error> {
        self.client
            .get(format!("{}/gateway/get/scenarios", self.gateway_url))
            .send()
            .await
    }

    /// Begin a record or playback session.
    pub async fn begin_session(
        &self,
        scenario: &str,
        session: &str,
        mode: &str,
    ) -> Result<Response, reqwest::Error> {
        self.client
            .get(format!("{}/gateway/begin/session", self.gateway_url))
            .query(&[("scenario", scenario), ("session", session), ("mode", mode)])
            .send()
            .await
    }

    /// End all sessions of a scenario.
    pub async fn end_sessions(&self, scenario: &str) -> Result<Response, reqwest::Error> {
        self.client
            .get(format!("{}/gateway/end/sessions", self.gateway_url))
            .query(&[("scenario", scenario)])
            .send()
            .await
    }

    /// Insert a stub under a `scenario:session` reference. The body passes
    /// through to Stubo untouched.
    pub async fn put_stub(
        &self,
        session_ref: &str,
        body: impl Into<reqwest::Body>,
    ) -> Result<Response, reqwest::Error> {
        self.client
            .post(format!("{}/gateway/put/stub", self.gateway_url))
            .query(&[("session", session_ref)])
            .body(body)
            .send()
            .await
    }

    /// Look up the stubbed response for a request body.
    pub async fn get_response(
        &self,
        session_ref: &str,
        body: impl Into<reqwest::Body>,
    ) -> Result<Response, reqwest::Error> {
        self.client
            .post(format!("{}/gateway/get/response", self.gateway_url))
            .query(&[("session", session_ref)])
            .body(body)
            .send()
            .await
    }

    /// Show one delay policy, or all policies when `name` is `None`.
    pub async fn delay_policy(&self, name: Option<&str>) -> Result<Response, reqwest::Error> {
        let mut req = self
            .client
            .get(format!("{}/gateway/get/delay_policy", self.gateway_url));
        if let Some(name) = name {
            req = req.query(&[("name", name)]);
        }
        req.send().await
    }

    /// Delete one delay policy, or every policy when `name` is `None`.
    pub async fn delete_delay_policy(
        &self,
        name: Option<&str>,
    ) -> Result<Response, reqwest::Error> {
        let mut req = self
            .client
            .get(format!("{}/gateway/delete/delay_policy", self.gateway_url));
        if let Some(name) = name {
            req = req.query(&[("name", name)]);
        }
        req.send().await
    }
}
