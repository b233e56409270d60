//! Datastore model matching the frontend Datastore interface.

use serde::{Deserialize, Serialize};

use super::{Community, Quiz, SessionRequest, TeamMember};

/// The root datastore containing all application data.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Datastore {
    #[serde(default = "default_schema_version")]
    pub schema_version: i32,
    #[serde(default)]
    pub generated_at: String,
    #[serde(default)]
    pub revision_id: i64,
    #[serde(default)]
    pub communities: Vec<Community>,
    #[serde(default)]
    pub quizzes: Vec<Quiz>,
    #[serde(default)]
    pub sessions: Vec<SessionRequest>,
    #[serde(default)]
    pub team_members: Vec<TeamMember>,
}

fn default_schema_version() -> i32 {
    1
}

/// Revision information for change detection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevisionInfo {
    pub revision_id: i64,
    pub generated_at: String,
}
