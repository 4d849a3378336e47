//! Async HTTP client for the runlog API.
//!
//! # Overview
//! Executes the requests built by `runlog-core` over `reqwest` and hands the
//! responses back to it for parsing. Configuration is a single base URL read
//! from `RUNLOG_API_BASE_URL`.
//!
//! ```no_run
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! use runlog_client::{Config, RunlogClient};
//!
//! let client = RunlogClient::from_config(&Config::from_env()?);
//! for goal in client.list_goals().await? {
//!     println!("{:?}: {}%", goal.status, goal.progress_percentage);
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;

pub use client::RunlogClient;
pub use config::{Config, ConfigError};
pub use runlog_core::{
    ApiError, Goal, GoalProgress, GoalStatus, NewGoal, Operation, Session, SessionSource,
    StravaAck, StravaConnectionStatus,
};
