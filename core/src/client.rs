//! Stateless HTTP request builder and response parser for the runlog API.
//!
//! # Design
//! `RunlogApi` holds only a `base_url` and carries no mutable state between
//! calls. Each operation is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`.
//! All `parse_*` methods funnel through `check_status` and `decode`, so the
//! error-message contract lives in exactly one place.

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::operation::Operation;
use crate::types::{
    Goal, GoalProgress, NewGoal, Session, StravaAck, StravaConnect, StravaConnectionStatus,
    Validate,
};

/// Synchronous, stateless client for the runlog API.
///
/// Builds `HttpRequest` values and parses `HttpResponse` values without
/// touching the network. The caller is responsible for executing the HTTP
/// round-trip between `build_*` and `parse_*`.
#[derive(Debug, Clone)]
pub struct RunlogApi {
    base_url: String,
}

impl RunlogApi {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // -----------------------------------------------------------------------
    // Sessions
    // -----------------------------------------------------------------------

    pub fn build_create_session(&self, session: &Session) -> Result<HttpRequest, ApiError> {
        self.json_request(
            Operation::CreateSession,
            HttpMethod::Post,
            format!("{}/sessions", self.base_url),
            session,
        )
    }

    /// List sessions, optionally bounded by an inclusive date range. An
    /// absent bound is left out of the query string entirely.
    pub fn build_list_sessions(
        &self,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> HttpRequest {
        let params: Vec<String> = [("start_date", start_date), ("end_date", end_date)]
            .into_iter()
            .filter_map(|(key, value)| {
                value.map(|date| format!("{key}={}", urlencoding::encode(&date.to_string())))
            })
            .collect();

        let mut url = format!("{}/sessions", self.base_url);
        if !params.is_empty() {
            url.push('?');
            url.push_str(&params.join("&"));
        }
        self.request(Operation::ListSessions, HttpMethod::Get, url)
    }

    pub fn build_get_session(&self, id: &str) -> HttpRequest {
        self.request(Operation::GetSession, HttpMethod::Get, self.session_url(id))
    }

    pub fn build_update_session(&self, id: &str, session: &Session) -> Result<HttpRequest, ApiError> {
        self.json_request(Operation::UpdateSession, HttpMethod::Put, self.session_url(id), session)
    }

    pub fn parse_create_session(&self, response: HttpResponse) -> Result<Session, ApiError> {
        decode(Operation::CreateSession, response)
    }

    pub fn parse_list_sessions(&self, response: HttpResponse) -> Result<Vec<Session>, ApiError> {
        decode(Operation::ListSessions, response)
    }

    pub fn parse_get_session(&self, response: HttpResponse) -> Result<Session, ApiError> {
        decode(Operation::GetSession, response)
    }

    pub fn parse_update_session(&self, response: HttpResponse) -> Result<Session, ApiError> {
        decode(Operation::UpdateSession, response)
    }

    // -----------------------------------------------------------------------
    // Goals
    // -----------------------------------------------------------------------

    pub fn build_create_goal(&self, input: &NewGoal) -> Result<HttpRequest, ApiError> {
        self.json_request(
            Operation::CreateGoal,
            HttpMethod::Post,
            format!("{}/goals", self.base_url),
            input,
        )
    }

    pub fn build_list_goals(&self) -> HttpRequest {
        self.request(Operation::ListGoals, HttpMethod::Get, format!("{}/goals", self.base_url))
    }

    pub fn build_get_goal(&self, id: i64) -> HttpRequest {
        self.request(Operation::GetGoal, HttpMethod::Get, format!("{}/goals/{id}", self.base_url))
    }

    pub fn build_delete_goal(&self, id: i64) -> HttpRequest {
        self.request(
            Operation::DeleteGoal,
            HttpMethod::Delete,
            format!("{}/goals/{id}", self.base_url),
        )
    }

    pub fn parse_create_goal(&self, response: HttpResponse) -> Result<Goal, ApiError> {
        decode(Operation::CreateGoal, response)
    }

    pub fn parse_list_goals(&self, response: HttpResponse) -> Result<Vec<GoalProgress>, ApiError> {
        decode(Operation::ListGoals, response)
    }

    pub fn parse_get_goal(&self, response: HttpResponse) -> Result<GoalProgress, ApiError> {
        decode(Operation::GetGoal, response)
    }

    /// Delete carries no payload; the body is never read on success.
    pub fn parse_delete_goal(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(Operation::DeleteGoal, &response)
    }

    // -----------------------------------------------------------------------
    // Strava
    // -----------------------------------------------------------------------

    pub fn build_strava_status(&self) -> HttpRequest {
        self.request(
            Operation::StravaStatus,
            HttpMethod::Get,
            format!("{}/strava/status", self.base_url),
        )
    }

    pub fn build_strava_connect(&self, code: &str) -> Result<HttpRequest, ApiError> {
        let body = StravaConnect {
            code: code.to_string(),
        };
        self.json_request(
            Operation::StravaConnect,
            HttpMethod::Post,
            format!("{}/strava/connect", self.base_url),
            &body,
        )
    }

    pub fn build_strava_disconnect(&self) -> HttpRequest {
        self.request(
            Operation::StravaDisconnect,
            HttpMethod::Delete,
            format!("{}/strava/disconnect", self.base_url),
        )
    }

    pub fn parse_strava_status(
        &self,
        response: HttpResponse,
    ) -> Result<StravaConnectionStatus, ApiError> {
        decode(Operation::StravaStatus, response)
    }

    pub fn parse_strava_connect(&self, response: HttpResponse) -> Result<StravaAck, ApiError> {
        decode(Operation::StravaConnect, response)
    }

    /// An empty 2xx body counts as `{ "success": true }`.
    pub fn parse_strava_disconnect(&self, response: HttpResponse) -> Result<StravaAck, ApiError> {
        check_status(Operation::StravaDisconnect, &response)?;
        if response.body.trim().is_empty() {
            return Ok(StravaAck { success: true });
        }
        decode(Operation::StravaDisconnect, response)
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    fn session_url(&self, id: &str) -> String {
        format!("{}/sessions/{}", self.base_url, urlencoding::encode(id))
    }

    fn request(&self, operation: Operation, method: HttpMethod, url: String) -> HttpRequest {
        HttpRequest {
            operation,
            method,
            url,
            headers: Vec::new(),
            body: None,
        }
    }

    fn json_request<B: Serialize>(
        &self,
        operation: Operation,
        method: HttpMethod,
        url: String,
        body: &B,
    ) -> Result<HttpRequest, ApiError> {
        let body =
            serde_json::to_string(body).map_err(|e| ApiError::SerializationError(e.to_string()))?;
        Ok(HttpRequest {
            operation,
            method,
            url,
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Some(body),
        })
    }
}

/// Shape of the backend's error body. Anything else falls back.
#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

/// Map a non-2xx status to `RequestFailed` with the backend's message, or
/// the operation's fallback when the body has none.
fn check_status(operation: Operation, response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    Err(ApiError::RequestFailed {
        message: error_message(operation, &response.body),
    })
}

fn error_message(operation: Operation, body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|err| err.message)
        .filter(|message| !message.is_empty())
        .unwrap_or_else(|| operation.fallback_message().to_string())
}

/// Check the status, decode the body and run the structural checks.
fn decode<T>(operation: Operation, response: HttpResponse) -> Result<T, ApiError>
where
    T: DeserializeOwned + Validate,
{
    check_status(operation, &response)?;
    let value: T = serde_json::from_str(&response.body).map_err(|e| {
        tracing::debug!(%operation, error = %e, "response body did not decode");
        ApiError::DeserializationError(e.to_string())
    })?;
    value.validate().map_err(|e| {
        tracing::debug!(%operation, error = %e, "response body failed validation");
        ApiError::DeserializationError(e)
    })?;
    Ok(value)
}
