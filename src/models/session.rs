//! Session request model matching the frontend SessionRequest interface.

use serde::{Deserialize, Serialize};

/// Kind of session; each kind books a fixed amount of calendar time.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SessionType {
    Individual,
    Couple,
    Group,
    Initial,
}

impl SessionType {
    /// Booked duration in minutes.
    pub fn duration_minutes(&self) -> u32 {
        match self {
            SessionType::Individual => 60,
            SessionType::Couple => 90,
            SessionType::Group => 120,
            SessionType::Initial => 45,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Pending,
    Confirmed,
    Rescheduled,
    Cancelled,
    Completed,
}

impl SessionStatus {
    /// Whether a session in this status holds a slot on the assignee's calendar.
    pub fn occupies_calendar(&self) -> bool {
        matches!(self, SessionStatus::Confirmed | SessionStatus::Rescheduled)
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(SessionStatus::Pending),
            "confirmed" => Some(SessionStatus::Confirmed),
            "rescheduled" => Some(SessionStatus::Rescheduled),
            "cancelled" => Some(SessionStatus::Cancelled),
            "completed" => Some(SessionStatus::Completed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RescheduledSlot {
    pub date: String,
    pub time: String,
}

/// A booking request for a counselling session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SessionRequest {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(rename = "type")]
    pub session_type: SessionType,
    pub date: String,
    pub time: String,
    pub status: SessionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rescheduled_to: Option<RescheduledSlot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default)]
    pub created_at: String,
    /// Internal version for optimistic concurrency control
    #[serde(default)]
    pub version: i64,
}

impl SessionRequest {
    /// The slot the session currently occupies: the rescheduled one when set.
    pub fn effective_slot(&self) -> (&str, &str) {
        match &self.rescheduled_to {
            Some(slot) => (slot.date.as_str(), slot.time.as_str()),
            None => (self.date.as_str(), self.time.as_str()),
        }
    }
}

/// Request body for submitting a new session request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionRequest {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(rename = "type")]
    pub session_type: SessionType,
    pub date: String,
    pub time: String,
    #[serde(default)]
    pub message: Option<String>,
}

/// Request body for assigning a session to a team member.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignSessionRequest {
    pub team_member_id: String,
    #[serde(default)]
    pub expected_version: Option<i64>,
}

/// Request body for moving a session to a new slot.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RescheduleSessionRequest {
    pub date: String,
    pub time: String,
    #[serde(default)]
    pub expected_version: Option<i64>,
}

/// Request body for a plain status transition.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSessionStatusRequest {
    pub status: SessionStatus,
    #[serde(default)]
    pub expected_version: Option<i64>,
}

/// Request body for a dry-run conflict check.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictCheckRequest {
    pub team_member_id: String,
    pub date: String,
    pub time: String,
    #[serde(default)]
    pub session_type: Option<SessionType>,
    #[serde(default)]
    pub duration_minutes: Option<u32>,
    #[serde(default)]
    pub exclude_session_id: Option<String>,
}
