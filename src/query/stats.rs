//! Dashboard aggregates.

use serde::Serialize;

use crate::models::{
    Community, CommunityStatus, Quiz, QuizStatus, SessionRequest, SessionStatus,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionStats {
    pub total_count: usize,
    pub active_count: usize,
    pub total_members: u64,
    /// Mean of the per-record ratings; 0 for an empty collection.
    pub average_rating: f64,
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

pub fn community_stats(communities: &[Community]) -> CollectionStats {
    CollectionStats {
        total_count: communities.len(),
        active_count: communities
            .iter()
            .filter(|c| c.status == CommunityStatus::Active)
            .count(),
        total_members: communities.iter().map(|c| u64::from(c.member_count)).sum(),
        average_rating: mean(communities.iter().map(|c| c.average_rating)),
    }
}

pub fn quiz_stats(quizzes: &[Quiz]) -> CollectionStats {
    CollectionStats {
        total_count: quizzes.len(),
        active_count: quizzes
            .iter()
            .filter(|q| q.status == QuizStatus::Active)
            .count(),
        total_members: quizzes.iter().map(|q| u64::from(q.participant_count)).sum(),
        average_rating: mean(quizzes.iter().map(|q| q.average_rating)),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStats {
    pub total: usize,
    pub pending: usize,
    pub confirmed: usize,
    pub rescheduled: usize,
    pub cancelled: usize,
    pub completed: usize,
    pub unassigned: usize,
}

pub fn session_stats(sessions: &[SessionRequest]) -> SessionStats {
    sessions
        .iter()
        .fold(SessionStats::default(), |mut stats, session| {
            stats.total += 1;
            match session.status {
                SessionStatus::Pending => stats.pending += 1,
                SessionStatus::Confirmed => stats.confirmed += 1,
                SessionStatus::Rescheduled => stats.rescheduled += 1,
                SessionStatus::Cancelled => stats.cancelled += 1,
                SessionStatus::Completed => stats.completed += 1,
            }
            if session.assigned_to_id.is_none() {
                stats.unassigned += 1;
            }
            stats
        })
}
