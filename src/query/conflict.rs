//! Scheduling conflict detection for team members.

use chrono::{NaiveDate, NaiveTime, Timelike};
use serde::Serialize;

use crate::errors::AppError;
use crate::models::SessionRequest;

/// Longest slot accepted for a single session: one full day.
pub const MAX_DURATION_MINUTES: u32 = 24 * 60;

/// A half-open `[start, start + duration)` interval on one calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub date: NaiveDate,
    /// Minutes since midnight.
    pub start: u32,
    pub duration: u32,
}

impl Slot {
    pub fn parse(date: &str, time: &str, duration: u32) -> Result<Self, AppError> {
        if duration == 0 || duration > MAX_DURATION_MINUTES {
            return Err(AppError::InvalidArgument(format!(
                "durationMinutes must be between 1 and {}, got {}",
                MAX_DURATION_MINUTES, duration
            )));
        }
        let date = parse_date(date)?;
        let time = parse_time(time)?;
        Ok(Self {
            date,
            start: time.hour() * 60 + time.minute(),
            duration,
        })
    }

    pub fn overlaps(&self, other: &Slot) -> bool {
        self.date == other.date
            && intervals_overlap(self.start, self.duration, other.start, other.duration)
    }
}

/// Half-open interval intersection; touching endpoints do not overlap.
pub fn intervals_overlap(start1: u32, dur1: u32, start2: u32, dur2: u32) -> bool {
    start1 < start2.saturating_add(dur2) && start2 < start1.saturating_add(dur1)
}

pub fn parse_date(raw: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| AppError::InvalidArgument(format!("Invalid date (expected YYYY-MM-DD): {}", raw)))
}

/// Accepts `HH:MM` (24h) and `H:MM AM|PM` (12h).
pub fn parse_time(raw: &str) -> Result<NaiveTime, AppError> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%I:%M %p"))
        .map_err(|_| AppError::InvalidArgument(format!("Invalid time (expected HH:MM): {}", raw)))
}

/// Describes the existing session that blocks a candidate slot.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleConflict {
    pub session_id: String,
    pub team_member_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_member_name: Option<String>,
    pub client_name: String,
    pub date: String,
    pub time: String,
    pub duration_minutes: u32,
}

impl ScheduleConflict {
    pub fn describe(&self) -> String {
        format!(
            "{} already has a session with {} on {} at {} ({} min)",
            self.team_member_name
                .as_deref()
                .unwrap_or(self.team_member_id.as_str()),
            self.client_name,
            self.date,
            self.time,
            self.duration_minutes
        )
    }
}

/// First session assigned to `team_member_id` whose slot overlaps `candidate`.
///
/// Only confirmed and rescheduled sessions take part. `exclude_session_id`
/// skips the session being moved so it never blocks itself. Sessions whose own
/// slot cannot be parsed are skipped. Returns at most one conflict.
pub fn find_conflict(
    team_member_id: &str,
    candidate: &Slot,
    sessions: &[SessionRequest],
    exclude_session_id: Option<&str>,
) -> Option<ScheduleConflict> {
    sessions
        .iter()
        .filter(|s| s.status.occupies_calendar())
        .filter(|s| s.assigned_to_id.as_deref() == Some(team_member_id))
        .filter(|s| Some(s.id.as_str()) != exclude_session_id)
        .find_map(|session| {
            let (date, time) = session.effective_slot();
            let duration = session.session_type.duration_minutes();
            let existing = match Slot::parse(date, time, duration) {
                Ok(slot) => slot,
                Err(e) => {
                    tracing::warn!("Skipping session {} in conflict check: {}", session.id, e);
                    return None;
                }
            };

            existing.overlaps(candidate).then(|| ScheduleConflict {
                session_id: session.id.clone(),
                team_member_id: team_member_id.to_string(),
                team_member_name: session.assigned_to_name.clone(),
                client_name: session.name.clone(),
                date: date.to_string(),
                time: time.to_string(),
                duration_minutes: duration,
            })
        })
}

/// Parse the candidate slot and run [`find_conflict`].
pub fn check_conflict(
    team_member_id: &str,
    date: &str,
    time: &str,
    duration_minutes: u32,
    sessions: &[SessionRequest],
    exclude_session_id: Option<&str>,
) -> Result<Option<ScheduleConflict>, AppError> {
    let candidate = Slot::parse(date, time, duration_minutes)?;
    Ok(find_conflict(
        team_member_id,
        &candidate,
        sessions,
        exclude_session_id,
    ))
}
