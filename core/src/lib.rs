//! Synchronous API client core for the runlog service.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values for the
//! sessions, goals and Strava-connection endpoints without touching the
//! network (host-does-IO pattern). The caller executes the HTTP round-trip.
//!
//! # Design
//! - `RunlogApi` is stateless; it holds only `base_url`.
//! - Each operation is split into `build_*` (produces request) and
//!   `parse_*` (consumes response), so the I/O boundary is explicit.
//! - Failed responses become `ApiError::RequestFailed` carrying the
//!   backend's `message` or the operation's fallback string.
//! - Decoded bodies pass `Validate` before they are returned.

pub mod client;
pub mod error;
pub mod http;
pub mod operation;
pub mod types;

pub use client::RunlogApi;
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use operation::Operation;
pub use types::{
    Goal, GoalProgress, GoalStatus, NewGoal, Session, SessionSource, StravaAck, StravaConnect,
    StravaConnectionStatus, Validate,
};
