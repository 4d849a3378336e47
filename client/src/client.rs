//! Async host for `runlog-core`.
//!
//! `RunlogClient` pairs a `RunlogApi` with a `reqwest::Client`. Every
//! operation is build → `execute` → parse; `execute` is the only place
//! that touches the network.

use chrono::NaiveDate;
use runlog_core::{
    ApiError, Goal, GoalProgress, HttpMethod, HttpRequest, HttpResponse, NewGoal, RunlogApi,
    Session, StravaAck, StravaConnectionStatus,
};

use crate::config::Config;

/// Typed async client for the runlog API.
///
/// Cheap to clone; clones share the connection pool. Calls are independent
/// and may run concurrently. Nothing is cached, retried or deduplicated.
#[derive(Debug, Clone)]
pub struct RunlogClient {
    http: reqwest::Client,
    api: RunlogApi,
}

impl RunlogClient {
    pub fn new(base_url: &str) -> Self {
        Self::with_http_client(reqwest::Client::new(), base_url)
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.api_base_url)
    }

    /// Use a preconfigured `reqwest::Client` (timeouts, proxies, TLS).
    pub fn with_http_client(http: reqwest::Client, base_url: &str) -> Self {
        Self {
            http,
            api: RunlogApi::new(base_url),
        }
    }

    pub fn api(&self) -> &RunlogApi {
        &self.api
    }

    // -----------------------------------------------------------------------
    // Sessions
    // -----------------------------------------------------------------------

    pub async fn create_session(&self, session: &Session) -> Result<Session, ApiError> {
        let response = self.execute(self.api.build_create_session(session)?).await?;
        self.api.parse_create_session(response)
    }

    pub async fn list_sessions(
        &self,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<Session>, ApiError> {
        let response = self
            .execute(self.api.build_list_sessions(start_date, end_date))
            .await?;
        self.api.parse_list_sessions(response)
    }

    pub async fn get_session(&self, id: &str) -> Result<Session, ApiError> {
        let response = self.execute(self.api.build_get_session(id)).await?;
        self.api.parse_get_session(response)
    }

    pub async fn update_session(&self, id: &str, session: &Session) -> Result<Session, ApiError> {
        let response = self.execute(self.api.build_update_session(id, session)?).await?;
        self.api.parse_update_session(response)
    }

    // -----------------------------------------------------------------------
    // Goals
    // -----------------------------------------------------------------------

    pub async fn create_goal(&self, input: &NewGoal) -> Result<Goal, ApiError> {
        let response = self.execute(self.api.build_create_goal(input)?).await?;
        self.api.parse_create_goal(response)
    }

    pub async fn list_goals(&self) -> Result<Vec<GoalProgress>, ApiError> {
        let response = self.execute(self.api.build_list_goals()).await?;
        self.api.parse_list_goals(response)
    }

    pub async fn get_goal(&self, id: i64) -> Result<GoalProgress, ApiError> {
        let response = self.execute(self.api.build_get_goal(id)).await?;
        self.api.parse_get_goal(response)
    }

    pub async fn delete_goal(&self, id: i64) -> Result<(), ApiError> {
        let response = self.execute(self.api.build_delete_goal(id)).await?;
        self.api.parse_delete_goal(response)
    }

    // -----------------------------------------------------------------------
    // Strava
    // -----------------------------------------------------------------------

    pub async fn strava_status(&self) -> Result<StravaConnectionStatus, ApiError> {
        let response = self.execute(self.api.build_strava_status()).await?;
        self.api.parse_strava_status(response)
    }

    /// Hand an OAuth authorization code to the backend, which exchanges it
    /// for tokens.
    pub async fn strava_connect(&self, code: &str) -> Result<StravaAck, ApiError> {
        let response = self.execute(self.api.build_strava_connect(code)?).await?;
        self.api.parse_strava_connect(response)
    }

    pub async fn strava_disconnect(&self) -> Result<StravaAck, ApiError> {
        let response = self.execute(self.api.build_strava_disconnect()).await?;
        self.api.parse_strava_disconnect(response)
    }

    /// Perform the round-trip for a built request.
    ///
    /// Any status is returned as data; only a request that never completes
    /// fails here, with the operation's fallback message.
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let HttpRequest {
            operation,
            method,
            url,
            headers,
            body,
        } = request;
        tracing::debug!(%operation, %method, %url, "sending request");

        let mut builder = self.http.request(reqwest_method(method), &url);
        for (name, value) in &headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(|e| {
            tracing::warn!(%operation, %url, error = %e, "request did not complete");
            ApiError::fallback(operation)
        })?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect();
        let body = response.text().await.map_err(|e| {
            tracing::warn!(%operation, status, error = %e, "failed to read response body");
            ApiError::fallback(operation)
        })?;

        if response_failed(status) {
            tracing::warn!(%operation, status, "request failed");
        } else {
            tracing::debug!(%operation, status, "request succeeded");
        }

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

fn response_failed(status: u16) -> bool {
    !(200..300).contains(&status)
}

fn reqwest_method(method: HttpMethod) -> reqwest::Method {
    match method {
        HttpMethod::Get => reqwest::Method::GET,
        HttpMethod::Post => reqwest::Method::POST,
        HttpMethod::Put => reqwest::Method::PUT,
        HttpMethod::Delete => reqwest::Method::DELETE,
    }
}
