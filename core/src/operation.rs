//! The closed set of API operations and their fallback error messages.

use std::fmt;

/// One (resource, operation) pair of the backend API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    CreateSession,
    ListSessions,
    GetSession,
    UpdateSession,
    CreateGoal,
    ListGoals,
    GetGoal,
    DeleteGoal,
    StravaStatus,
    StravaConnect,
    StravaDisconnect,
}

impl Operation {
    /// Message reported when a failed response carries no usable
    /// `message` field, or when the request never reached the server.
    pub fn fallback_message(self) -> &'static str {
        match self {
            Operation::CreateSession => "Failed to create session",
            Operation::ListSessions => "Failed to fetch sessions",
            Operation::GetSession => "Failed to fetch session",
            Operation::UpdateSession => "Failed to update session",
            Operation::CreateGoal => "Failed to create goal",
            Operation::ListGoals => "Failed to fetch goals",
            Operation::GetGoal => "Failed to fetch goal",
            Operation::DeleteGoal => "Failed to delete goal",
            Operation::StravaStatus => "Failed to fetch Strava status",
            Operation::StravaConnect => "Failed to connect Strava",
            Operation::StravaDisconnect => "Failed to disconnect Strava",
        }
    }

    /// Stable snake-case name, used as a log field.
    pub fn name(self) -> &'static str {
        match self {
            Operation::CreateSession => "create_session",
            Operation::ListSessions => "list_sessions",
            Operation::GetSession => "get_session",
            Operation::UpdateSession => "update_session",
            Operation::CreateGoal => "create_goal",
            Operation::ListGoals => "list_goals",
            Operation::GetGoal => "get_goal",
            Operation::DeleteGoal => "delete_goal",
            Operation::StravaStatus => "strava_status",
            Operation::StravaConnect => "strava_connect",
            Operation::StravaDisconnect => "strava_disconnect",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
