//! Domain DTOs for the runlog API.
//!
//! # Design
//! These types mirror the backend's JSON schema. Optional fields are
//! skipped when `None` so create/update bodies never send explicit nulls,
//! letting the server assign ids and timestamps.
//!
//! `Validate` is the structural guard applied to every decoded 2xx body:
//! serde proves the shape, `Validate` rejects values no honest backend
//! would produce (negative distances, inverted date ranges, NaN
//! progress).

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Where a session came from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SessionSource {
    Manual,
    Strava,
}

/// A single logged run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Session {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub date: NaiveDate,
    /// Kilometers.
    pub distance: f64,
    /// Seconds.
    pub duration: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strava_activity_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<SessionSource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Session {
    /// A manually entered session with no server-assigned fields.
    pub fn new(date: NaiveDate, distance: f64, duration: u32) -> Self {
        Self {
            id: None,
            date,
            distance,
            duration,
            notes: None,
            strava_activity_id: None,
            source: None,
            created_at: None,
            updated_at: None,
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// A distance target over an inclusive date range.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Goal {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub target_distance: f64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Request payload for creating a goal. Omitted fields are defaulted by
/// the server.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NewGoal {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_distance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
}

/// How a goal is tracking against its prorated target.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum GoalStatus {
    #[serde(rename = "On Track")]
    OnTrack,
    Behind,
    Ahead,
    Completed,
}

/// A goal plus the progress figures computed by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GoalProgress {
    #[serde(flatten)]
    pub goal: Goal,
    pub current_distance: f64,
    pub progress_percentage: f64,
    pub status: GoalStatus,
    pub expected_distance: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sessions: Option<Vec<Session>>,
}

/// Whether the current user has linked a Strava account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StravaConnectionStatus {
    pub connected: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub athlete_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connected_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_sync_at: Option<DateTime<Utc>>,
}

/// Request payload carrying a Strava OAuth authorization code.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StravaConnect {
    pub code: String,
}

/// `{ "success": bool }` acknowledgement returned by the Strava endpoints.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct StravaAck {
    pub success: bool,
}

/// Structural checks run on decoded responses.
pub trait Validate {
    fn validate(&self) -> Result<(), String>;
}

fn non_negative(field: &str, value: f64) -> Result<(), String> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(format!("`{field}` must be a finite, non-negative number, got {value}"))
    }
}

impl Validate for Session {
    fn validate(&self) -> Result<(), String> {
        non_negative("distance", self.distance)
    }
}

impl Validate for Goal {
    fn validate(&self) -> Result<(), String> {
        non_negative("target_distance", self.target_distance)?;
        if self.start_date > self.end_date {
            return Err(format!(
                "goal starts after it ends ({} > {})",
                self.start_date, self.end_date
            ));
        }
        Ok(())
    }
}

impl Validate for GoalProgress {
    fn validate(&self) -> Result<(), String> {
        self.goal.validate()?;
        non_negative("current_distance", self.current_distance)?;
        non_negative("expected_distance", self.expected_distance)?;
        non_negative("progress_percentage", self.progress_percentage)?;
        if let Some(sessions) = &self.sessions {
            sessions.validate()?;
        }
        Ok(())
    }
}

impl Validate for StravaConnectionStatus {
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

impl Validate for StravaAck {
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

impl<T: Validate> Validate for Vec<T> {
    fn validate(&self) -> Result<(), String> {
        self.iter()
            .enumerate()
            .try_for_each(|(i, item)| item.validate().map_err(|e| format!("item {i}: {e}")))
    }
}
