//! In-memory implementation of the runlog backend API.
//!
//! Serves sessions, goals (with computed progress) and the Strava link
//! state from a single `RwLock`-guarded store. Errors use the backend's
//! `{"message": ...}` body.

pub mod error;
pub mod progress;

use std::{collections::BTreeMap, collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use error::{AppError, Result};

/// Athlete id reported for every successful Strava connection.
pub const MOCK_ATHLETE_ID: i64 = 4_242_424;

/// Length of a goal whose end date was omitted, counting the start day.
const DEFAULT_GOAL_DAYS: u64 = 30;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub date: NaiveDate,
    pub distance: f64,
    pub duration: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strava_activity_id: Option<i64>,
    pub source: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create/replace body. Server-owned fields sent by the client are ignored.
#[derive(Deserialize)]
pub struct SessionInput {
    pub date: NaiveDate,
    pub distance: f64,
    pub duration: u32,
    pub notes: Option<String>,
    pub strava_activity_id: Option<i64>,
    pub source: Option<String>,
}

#[derive(Deserialize)]
pub struct SessionFilter {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Goal {
    pub id: i64,
    pub target_distance: f64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Deserialize)]
pub struct NewGoal {
    pub target_distance: Option<f64>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GoalProgress {
    #[serde(flatten)]
    pub goal: Goal,
    pub current_distance: f64,
    pub progress_percentage: f64,
    pub status: String,
    pub expected_distance: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sessions: Option<Vec<Session>>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StravaStatus {
    pub connected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub athlete_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connected_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_sync_at: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
pub struct ConnectRequest {
    pub code: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Ack {
    pub success: bool,
}

#[derive(Clone, Debug)]
struct StravaLink {
    athlete_id: i64,
    connected_at: DateTime<Utc>,
}

#[derive(Default)]
pub struct Store {
    sessions: HashMap<String, Session>,
    goals: BTreeMap<i64, Goal>,
    last_goal_id: i64,
    strava: Option<StravaLink>,
}

pub type Db = Arc<RwLock<Store>>;

#[derive(Clone)]
pub struct AppState {
    db: Db,
    today: Option<NaiveDate>,
}

impl AppState {
    fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Utc::now().date_naive())
    }
}

/// Router over a fresh store, using the wall clock for goal progress.
pub fn app() -> Router {
    router(None)
}

/// Router whose goal progress is computed as of `today`.
pub fn app_at(today: NaiveDate) -> Router {
    router(Some(today))
}

fn router(today: Option<NaiveDate>) -> Router {
    let state = AppState {
        db: Arc::new(RwLock::new(Store::default())),
        today,
    };
    Router::new()
        .route("/sessions", get(list_sessions).post(create_session))
        .route("/sessions/{id}", get(get_session).put(update_session))
        .route("/goals", get(list_goals).post(create_goal))
        .route("/goals/{id}", get(get_goal).delete(delete_goal))
        .route("/strava/status", get(strava_status))
        .route("/strava/connect", post(strava_connect))
        .route("/strava/disconnect", delete(strava_disconnect))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> std::result::Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

// ---------------------------------------------------------------------------
// Sessions
// ---------------------------------------------------------------------------

fn check_session_input(input: &SessionInput) -> Result<()> {
    if !(input.distance.is_finite() && input.distance > 0.0) {
        return Err(AppError::BadRequest("distance must be positive".to_string()));
    }
    if input.duration == 0 {
        return Err(AppError::BadRequest("duration must be positive".to_string()));
    }
    if let Some(source) = input.source.as_deref() {
        if source != "manual" && source != "strava" {
            return Err(AppError::BadRequest(format!("unknown source: {source}")));
        }
    }
    Ok(())
}

async fn create_session(
    State(state): State<AppState>,
    Json(input): Json<SessionInput>,
) -> Result<(StatusCode, Json<Session>)> {
    check_session_input(&input)?;
    let now = Utc::now();
    let session = Session {
        id: Uuid::new_v4().to_string(),
        date: input.date,
        distance: input.distance,
        duration: input.duration,
        notes: input.notes,
        strava_activity_id: input.strava_activity_id,
        source: input.source.unwrap_or_else(|| "manual".to_string()),
        created_at: now,
        updated_at: now,
    };
    state
        .db
        .write()
        .await
        .sessions
        .insert(session.id.clone(), session.clone());
    tracing::debug!(id = %session.id, date = %session.date, "session created");
    Ok((StatusCode::CREATED, Json(session)))
}

/// Sessions dated within `[start, end]`, newest first.
fn sessions_between(
    store: &Store,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Vec<Session> {
    let mut sessions: Vec<Session> = store
        .sessions
        .values()
        .filter(|s| start.map_or(true, |start| s.date >= start))
        .filter(|s| end.map_or(true, |end| s.date <= end))
        .cloned()
        .collect();
    sessions.sort_by(|a, b| b.date.cmp(&a.date).then(b.created_at.cmp(&a.created_at)));
    sessions
}

async fn list_sessions(
    State(state): State<AppState>,
    Query(filter): Query<SessionFilter>,
) -> Json<Vec<Session>> {
    let store = state.db.read().await;
    Json(sessions_between(&store, filter.start_date, filter.end_date))
}

async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Session>> {
    let store = state.db.read().await;
    store
        .sessions
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or(AppError::NotFound("session not found"))
}

async fn update_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<SessionInput>,
) -> Result<Json<Session>> {
    check_session_input(&input)?;
    let mut store = state.db.write().await;
    let session = store
        .sessions
        .get_mut(&id)
        .ok_or(AppError::NotFound("session not found"))?;
    session.date = input.date;
    session.distance = input.distance;
    session.duration = input.duration;
    session.notes = input.notes;
    session.updated_at = Utc::now();
    Ok(Json(session.clone()))
}

// ---------------------------------------------------------------------------
// Goals
// ---------------------------------------------------------------------------

fn goal_progress(store: &Store, goal: &Goal, today: NaiveDate, with_sessions: bool) -> GoalProgress {
    let sessions = sessions_between(store, Some(goal.start_date), Some(goal.end_date));
    let current: f64 = sessions.iter().map(|s| s.distance).sum();
    let progress = progress::compute(
        goal.target_distance,
        goal.start_date,
        goal.end_date,
        current,
        today,
    );
    GoalProgress {
        goal: goal.clone(),
        current_distance: progress.current_distance,
        progress_percentage: progress.progress_percentage,
        status: progress.status.label().to_string(),
        expected_distance: progress.expected_distance,
        sessions: with_sessions.then_some(sessions),
    }
}

async fn create_goal(
    State(state): State<AppState>,
    Json(input): Json<NewGoal>,
) -> Result<(StatusCode, Json<Goal>)> {
    let target_distance = input
        .target_distance
        .ok_or_else(|| AppError::BadRequest("target_distance is required".to_string()))?;
    if !(target_distance.is_finite() && target_distance > 0.0) {
        return Err(AppError::BadRequest("target_distance must be positive".to_string()));
    }
    let start_date = input.start_date.unwrap_or_else(|| state.today());
    let end_date = match input.end_date {
        Some(end) => end,
        None => start_date
            .checked_add_days(Days::new(DEFAULT_GOAL_DAYS - 1))
            .ok_or_else(|| AppError::BadRequest("start_date out of range".to_string()))?,
    };
    if start_date > end_date {
        return Err(AppError::BadRequest(
            "start_date must not be after end_date".to_string(),
        ));
    }

    let mut store = state.db.write().await;
    store.last_goal_id += 1;
    let now = Utc::now();
    let goal = Goal {
        id: store.last_goal_id,
        target_distance,
        start_date,
        end_date,
        created_at: now,
        updated_at: now,
    };
    store.goals.insert(goal.id, goal.clone());
    tracing::debug!(id = goal.id, %start_date, %end_date, "goal created");
    Ok((StatusCode::CREATED, Json(goal)))
}

async fn list_goals(State(state): State<AppState>) -> Json<Vec<GoalProgress>> {
    let today = state.today();
    let store = state.db.read().await;
    Json(
        store
            .goals
            .values()
            .map(|goal| goal_progress(&store, goal, today, false))
            .collect(),
    )
}

async fn get_goal(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<GoalProgress>> {
    let today = state.today();
    let store = state.db.read().await;
    let goal = store.goals.get(&id).ok_or(AppError::NotFound("goal not found"))?;
    Ok(Json(goal_progress(&store, goal, today, true)))
}

async fn delete_goal(State(state): State<AppState>, Path(id): Path<i64>) -> Result<StatusCode> {
    let mut store = state.db.write().await;
    store
        .goals
        .remove(&id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or(AppError::NotFound("goal not found"))
}

// ---------------------------------------------------------------------------
// Strava
// ---------------------------------------------------------------------------

async fn strava_status(State(state): State<AppState>) -> Json<StravaStatus> {
    let store = state.db.read().await;
    let status = match &store.strava {
        Some(link) => StravaStatus {
            connected: true,
            athlete_id: Some(link.athlete_id),
            connected_at: Some(link.connected_at),
            last_sync_at: None,
        },
        None => StravaStatus {
            connected: false,
            athlete_id: None,
            connected_at: None,
            last_sync_at: None,
        },
    };
    Json(status)
}

async fn strava_connect(
    State(state): State<AppState>,
    Json(input): Json<ConnectRequest>,
) -> Result<Json<Ack>> {
    if input.code.trim().is_empty() {
        return Err(AppError::BadRequest(
            "authorization code is required".to_string(),
        ));
    }
    state.db.write().await.strava = Some(StravaLink {
        athlete_id: MOCK_ATHLETE_ID,
        connected_at: Utc::now(),
    });
    tracing::info!(athlete_id = MOCK_ATHLETE_ID, "strava connected");
    Ok(Json(Ack { success: true }))
}

async fn strava_disconnect(State(state): State<AppState>) -> Json<Ack> {
    let was_connected = state.db.write().await.strava.take().is_some();
    tracing::info!(was_connected, "strava disconnected");
    Json(Ack {
        success: was_connected,
    })
}
