//! In-memory repository for query and CRUD operations.
//!
//! Reads clone a snapshot out of the lock; writes hold the write lock for the
//! whole validate, check, mutate sequence.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;

use crate::errors::AppError;
use crate::models::{
    slugify, AssignSessionRequest, Community, CommunityMember, CommunityReview, CommunityStatus,
    ConflictCheckRequest, CreateCommunityRequest, CreateReviewRequest, CreateSessionRequest,
    Datastore, JoinCommunityRequest, MemberRole, Quiz, QuizStatus, RescheduleSessionRequest,
    RescheduledSlot, RevisionInfo, SessionRequest, SessionStatus, TeamMember,
    UpdateCommunityRequest, UpdateSessionStatusRequest,
};
use crate::query::{
    self, timestamp_millis, CollectionStats, ListQuery, Page, ScheduleConflict, SessionStats,
    Slot,
};

/// Optional constraints for listing session requests.
#[derive(Debug, Clone, Default)]
pub struct SessionListFilter {
    pub status: Option<SessionStatus>,
    pub assigned_to_id: Option<String>,
    pub date: Option<String>,
}

/// Repository over an injectable in-memory datastore.
#[derive(Clone)]
pub struct Repository {
    data: Arc<RwLock<Datastore>>,
}

impl Repository {
    /// Wrap `datastore`, recomputing every denormalized community counter.
    pub fn new(mut datastore: Datastore) -> Self {
        for community in &mut datastore.communities {
            let stored = (
                community.member_count,
                community.review_count,
                community.average_rating,
            );
            community.refresh_derived();
            let derived = (
                community.member_count,
                community.review_count,
                community.average_rating,
            );
            if stored != derived && stored != (0, 0, 0.0) {
                tracing::warn!(
                    "Community {} had stale counters {:?}, recomputed to {:?}",
                    community.id,
                    stored,
                    derived
                );
            }
            warn_on_malformed_timestamps(community);
        }

        if datastore.generated_at.is_empty() {
            datastore.generated_at = Utc::now().to_rfc3339();
        }

        Self {
            data: Arc::new(RwLock::new(datastore)),
        }
    }

    /// Get the current revision ID.
    pub async fn get_revision_id(&self) -> i64 {
        self.data.read().await.revision_id
    }

    /// Get revision info.
    pub async fn get_revision_info(&self) -> RevisionInfo {
        let data = self.data.read().await;
        RevisionInfo {
            revision_id: data.revision_id,
            generated_at: data.generated_at.clone(),
        }
    }

    /// Get the full datastore.
    pub async fn get_datastore(&self) -> Datastore {
        self.data.read().await.clone()
    }

    // ==================== COMMUNITY OPERATIONS ====================

    pub async fn list_communities(&self) -> Vec<Community> {
        self.data.read().await.communities.clone()
    }

    /// Filter, sort and paginate communities.
    pub async fn query_communities(
        &self,
        query: &ListQuery<CommunityStatus>,
    ) -> Result<Page<Community>, AppError> {
        let data = self.data.read().await;
        query::run_query(&data.communities, query)
    }

    pub async fn community_stats(&self) -> CollectionStats {
        query::community_stats(&self.data.read().await.communities)
    }

    /// Get a community by ID or slug.
    pub async fn get_community(&self, id_or_slug: &str) -> Option<Community> {
        self.data
            .read()
            .await
            .communities
            .iter()
            .find(|c| c.id == id_or_slug || c.slug == id_or_slug)
            .cloned()
    }

    /// Create a new community with a unique slug derived from its name.
    pub async fn create_community(
        &self,
        request: &CreateCommunityRequest,
    ) -> Result<Community, AppError> {
        if request.max_members == Some(0) {
            return Err(AppError::Validation(
                "maxMembers must be a positive integer".to_string(),
            ));
        }

        let base_slug = slugify(&request.name);
        if base_slug.is_empty() {
            return Err(AppError::Validation(
                "Name must contain at least one letter or digit".to_string(),
            ));
        }

        let mut data = self.data.write().await;
        let slug = unique_slug(&base_slug, &data.communities);
        let now = Utc::now().to_rfc3339();

        let mut community = Community {
            id: uuid::Uuid::new_v4().to_string(),
            slug,
            name: request.name.trim().to_string(),
            description: request.description.clone(),
            detailed_description: request.detailed_description.clone().unwrap_or_default(),
            totem: request.totem.clone().unwrap_or_default(),
            category: request.category.clone(),
            tags: request.tags.clone(),
            status: request.status.unwrap_or(CommunityStatus::Draft),
            is_public: request.is_public,
            requires_approval: request.requires_approval,
            max_members: request.max_members,
            leader: request.leader.clone(),
            location: request.location.clone().unwrap_or_default(),
            guidelines: request.guidelines.clone(),
            rules: request.rules.clone(),
            reviews: Vec::new(),
            members: vec![CommunityMember {
                id: uuid::Uuid::new_v4().to_string(),
                name: request.leader.name.clone(),
                role: MemberRole::Leader,
                joined_at: now.clone(),
                avatar: request.leader.avatar.clone(),
            }],
            events: Vec::new(),
            posts: Vec::new(),
            member_count: 0,
            average_rating: 0.0,
            review_count: 0,
            created_at: now.clone(),
            updated_at: now.clone(),
            last_activity: now,
            version: 1,
        };
        community.refresh_derived();

        data.communities.push(community.clone());
        increment_revision(&mut data);

        tracing::info!("Created community {} ({})", community.id, community.slug);
        Ok(community)
    }

    /// Update a community with optimistic concurrency control.
    pub async fn update_community(
        &self,
        id: &str,
        request: &UpdateCommunityRequest,
    ) -> Result<Community, AppError> {
        let mut data = self.data.write().await;
        let community = data
            .communities
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Community {} not found", id)))?;

        check_version(request.expected_version, community.version)?;

        if let Some(max) = request.max_members {
            if max == 0 {
                return Err(AppError::Validation(
                    "maxMembers must be a positive integer".to_string(),
                ));
            }
            if (community.members.len() as u32) > max {
                return Err(AppError::Validation(format!(
                    "maxMembers {} is below the current member count {}",
                    max,
                    community.members.len()
                )));
            }
        }

        if let Some(name) = &request.name {
            if name.trim().is_empty() {
                return Err(AppError::Validation("Name cannot be empty".to_string()));
            }
            community.name = name.trim().to_string();
        }
        if let Some(description) = &request.description {
            community.description = description.clone();
        }
        if let Some(detailed) = &request.detailed_description {
            community.detailed_description = detailed.clone();
        }
        if let Some(totem) = &request.totem {
            community.totem = totem.clone();
        }
        if let Some(category) = &request.category {
            community.category = category.clone();
        }
        if let Some(tags) = &request.tags {
            community.tags = tags.clone();
        }
        if let Some(status) = request.status {
            community.status = status;
        }
        if let Some(is_public) = request.is_public {
            community.is_public = is_public;
        }
        if let Some(requires_approval) = request.requires_approval {
            community.requires_approval = requires_approval;
        }
        if request.max_members.is_some() {
            community.max_members = request.max_members;
        }
        if let Some(location) = &request.location {
            community.location = location.clone();
        }
        if let Some(guidelines) = &request.guidelines {
            community.guidelines = guidelines.clone();
        }
        if let Some(rules) = &request.rules {
            community.rules = rules.clone();
        }

        touch_community(community);
        let updated = community.clone();
        increment_revision(&mut data);

        tracing::info!("Updated community {} to version {}", id, updated.version);
        Ok(updated)
    }

    /// Delete a community.
    pub async fn delete_community(&self, id: &str) -> Result<(), AppError> {
        let mut data = self.data.write().await;
        let before = data.communities.len();
        data.communities.retain(|c| c.id != id);

        if data.communities.len() == before {
            return Err(AppError::NotFound(format!("Community {} not found", id)));
        }

        increment_revision(&mut data);
        tracing::info!("Deleted community {}", id);
        Ok(())
    }

    /// Append a review and recompute the rating counters.
    pub async fn add_review(
        &self,
        id: &str,
        request: &CreateReviewRequest,
    ) -> Result<Community, AppError> {
        if !(1..=5).contains(&request.rating) {
            return Err(AppError::Validation(format!(
                "Rating must be between 1 and 5, got {}",
                request.rating
            )));
        }

        let mut data = self.data.write().await;
        let community = find_community_mut(&mut data.communities, id)?;

        community.reviews.push(CommunityReview {
            id: uuid::Uuid::new_v4().to_string(),
            user_name: request.user_name.trim().to_string(),
            rating: request.rating,
            comment: request.comment.clone(),
            date: Utc::now().format("%Y-%m-%d").to_string(),
        });
        touch_community(community);
        let updated = community.clone();
        increment_revision(&mut data);

        Ok(updated)
    }

    /// Add a member, refusing when the community is archived or full.
    pub async fn join_community(
        &self,
        id: &str,
        request: &JoinCommunityRequest,
    ) -> Result<Community, AppError> {
        let mut data = self.data.write().await;
        let community = find_community_mut(&mut data.communities, id)?;

        if community.status == CommunityStatus::Archived {
            return Err(AppError::Validation(format!(
                "Community {} is archived",
                community.name
            )));
        }
        if community.is_full() {
            return Err(AppError::Validation(format!(
                "Community {} has reached its member limit",
                community.name
            )));
        }

        community.members.push(CommunityMember {
            id: uuid::Uuid::new_v4().to_string(),
            name: request.name.trim().to_string(),
            role: MemberRole::Member,
            joined_at: Utc::now().to_rfc3339(),
            avatar: request.avatar.clone(),
        });
        touch_community(community);
        let updated = community.clone();
        increment_revision(&mut data);

        tracing::info!(
            "Member joined community {} ({} members)",
            id,
            updated.member_count
        );
        Ok(updated)
    }

    // ==================== QUIZ OPERATIONS ====================

    pub async fn query_quizzes(&self, query: &ListQuery<QuizStatus>) -> Result<Page<Quiz>, AppError> {
        let data = self.data.read().await;
        query::run_query(&data.quizzes, query)
    }

    pub async fn quiz_stats(&self) -> CollectionStats {
        query::quiz_stats(&self.data.read().await.quizzes)
    }

    /// Get a quiz by ID or slug.
    pub async fn get_quiz(&self, id_or_slug: &str) -> Option<Quiz> {
        self.data
            .read()
            .await
            .quizzes
            .iter()
            .find(|q| q.id == id_or_slug || q.slug == id_or_slug)
            .cloned()
    }

    // ==================== SESSION OPERATIONS ====================

    pub async fn list_team_members(&self) -> Vec<TeamMember> {
        self.data.read().await.team_members.clone()
    }

    pub async fn list_sessions(&self, filter: &SessionListFilter) -> Vec<SessionRequest> {
        self.data
            .read()
            .await
            .sessions
            .iter()
            .filter(|s| filter.status.map_or(true, |status| s.status == status))
            .filter(|s| {
                filter
                    .assigned_to_id
                    .as_deref()
                    .map_or(true, |id| s.assigned_to_id.as_deref() == Some(id))
            })
            .filter(|s| {
                filter
                    .date
                    .as_deref()
                    .map_or(true, |date| s.effective_slot().0 == date)
            })
            .cloned()
            .collect()
    }

    pub async fn get_session(&self, id: &str) -> Option<SessionRequest> {
        self.data
            .read()
            .await
            .sessions
            .iter()
            .find(|s| s.id == id)
            .cloned()
    }

    pub async fn session_stats(&self) -> SessionStats {
        query::session_stats(&self.data.read().await.sessions)
    }

    /// Record a new pending session request.
    pub async fn create_session(
        &self,
        request: &CreateSessionRequest,
    ) -> Result<SessionRequest, AppError> {
        Slot::parse(
            &request.date,
            &request.time,
            request.session_type.duration_minutes(),
        )?;

        let session = SessionRequest {
            id: uuid::Uuid::new_v4().to_string(),
            name: request.name.trim().to_string(),
            email: request.email.trim().to_string(),
            phone: request.phone.clone(),
            session_type: request.session_type,
            date: request.date.trim().to_string(),
            time: request.time.trim().to_string(),
            status: SessionStatus::Pending,
            assigned_to_id: None,
            assigned_to_name: None,
            rescheduled_to: None,
            message: request.message.clone(),
            created_at: Utc::now().to_rfc3339(),
            version: 1,
        };

        let mut data = self.data.write().await;
        data.sessions.push(session.clone());
        increment_revision(&mut data);

        tracing::info!("Created session request {}", session.id);
        Ok(session)
    }

    /// Dry-run conflict check for a candidate slot.
    pub async fn check_conflict(
        &self,
        request: &ConflictCheckRequest,
    ) -> Result<Option<ScheduleConflict>, AppError> {
        let duration = match (request.duration_minutes, request.session_type) {
            (Some(minutes), _) => minutes,
            (None, Some(session_type)) => session_type.duration_minutes(),
            (None, None) => {
                return Err(AppError::InvalidArgument(
                    "Either sessionType or durationMinutes is required".to_string(),
                ))
            }
        };

        let data = self.data.read().await;
        find_team_member(&data.team_members, &request.team_member_id)?;

        query::check_conflict(
            &request.team_member_id,
            &request.date,
            &request.time,
            duration,
            &data.sessions,
            request.exclude_session_id.as_deref(),
        )
    }

    /// Assign a session to a team member and confirm it.
    pub async fn assign_session(
        &self,
        id: &str,
        request: &AssignSessionRequest,
    ) -> Result<SessionRequest, AppError> {
        let mut data = self.data.write().await;

        let member = find_team_member(&data.team_members, &request.team_member_id)?.clone();
        if !member.active {
            return Err(AppError::Validation(format!(
                "Team member {} is not active",
                member.name
            )));
        }

        let index = find_session_index(&data.sessions, id)?;
        let session = &data.sessions[index];
        check_version(request.expected_version, session.version)?;
        ensure_open(session)?;

        let (date, time) = session.effective_slot();
        let slot = Slot::parse(date, time, session.session_type.duration_minutes())?;
        reject_conflict(&member.id, &slot, &data.sessions, id)?;

        let session = &mut data.sessions[index];
        session.assigned_to_id = Some(member.id.clone());
        session.assigned_to_name = Some(member.name.clone());
        if session.status == SessionStatus::Pending {
            session.status = SessionStatus::Confirmed;
        }
        session.version += 1;
        let updated = session.clone();
        increment_revision(&mut data);

        tracing::info!("Assigned session {} to team member {}", id, member.id);
        Ok(updated)
    }

    /// Move a session to a new slot, checking the assignee's calendar.
    pub async fn reschedule_session(
        &self,
        id: &str,
        request: &RescheduleSessionRequest,
    ) -> Result<SessionRequest, AppError> {
        let mut data = self.data.write().await;

        let index = find_session_index(&data.sessions, id)?;
        let session = &data.sessions[index];
        check_version(request.expected_version, session.version)?;
        ensure_open(session)?;

        let slot = Slot::parse(
            &request.date,
            &request.time,
            session.session_type.duration_minutes(),
        )?;
        if let Some(member_id) = session.assigned_to_id.clone() {
            reject_conflict(&member_id, &slot, &data.sessions, id)?;
        }

        let session = &mut data.sessions[index];
        session.rescheduled_to = Some(RescheduledSlot {
            date: request.date.trim().to_string(),
            time: request.time.trim().to_string(),
        });
        session.status = SessionStatus::Rescheduled;
        session.version += 1;
        let updated = session.clone();
        increment_revision(&mut data);

        tracing::info!("Rescheduled session {}", id);
        Ok(updated)
    }

    /// Apply a plain status transition.
    ///
    /// Moving into `confirmed` requires an assignee and a free slot;
    /// `rescheduled` is only reachable through [`Repository::reschedule_session`].
    /// Cancelled and completed sessions are final.
    pub async fn update_session_status(
        &self,
        id: &str,
        request: &UpdateSessionStatusRequest,
    ) -> Result<SessionRequest, AppError> {
        let mut data = self.data.write().await;

        let index = find_session_index(&data.sessions, id)?;
        let session = &data.sessions[index];
        check_version(request.expected_version, session.version)?;
        ensure_open(session)?;

        match request.status {
            SessionStatus::Rescheduled => {
                return Err(AppError::Validation(
                    "Use the reschedule endpoint to move a session".to_string(),
                ));
            }
            SessionStatus::Confirmed if session.status != SessionStatus::Confirmed => {
                let member_id = session.assigned_to_id.clone().ok_or_else(|| {
                    AppError::Validation(
                        "Session must be assigned before it can be confirmed".to_string(),
                    )
                })?;
                let (date, time) = session.effective_slot();
                let slot = Slot::parse(date, time, session.session_type.duration_minutes())?;
                reject_conflict(&member_id, &slot, &data.sessions, id)?;
            }
            _ => {}
        }

        let session = &mut data.sessions[index];
        session.status = request.status;
        session.version += 1;
        let updated = session.clone();
        increment_revision(&mut data);

        tracing::info!("Session {} is now {:?}", id, updated.status);
        Ok(updated)
    }
}

// Helper functions

fn increment_revision(data: &mut Datastore) -> i64 {
    data.revision_id += 1;
    data.generated_at = Utc::now().to_rfc3339();
    data.revision_id
}

fn check_version(expected: Option<i64>, current: i64) -> Result<(), AppError> {
    match expected {
        Some(expected) if expected != current => Err(AppError::Conflict {
            message: format!(
                "Version mismatch: expected {}, current {}",
                expected, current
            ),
            current_version: current,
        }),
        _ => Ok(()),
    }
}

fn touch_community(community: &mut Community) {
    let now = Utc::now().to_rfc3339();
    community.refresh_derived();
    community.updated_at = now.clone();
    community.last_activity = now;
    community.version += 1;
}

fn unique_slug(base: &str, communities: &[Community]) -> String {
    let taken = |slug: &str| communities.iter().any(|c| c.slug == slug);
    if !taken(base) {
        return base.to_string();
    }
    (2..)
        .map(|n| format!("{}-{}", base, n))
        .find(|candidate| !taken(candidate))
        .unwrap_or_else(|| format!("{}-{}", base, uuid::Uuid::new_v4()))
}

fn find_community_mut<'a>(
    communities: &'a mut [Community],
    id: &str,
) -> Result<&'a mut Community, AppError> {
    communities
        .iter_mut()
        .find(|c| c.id == id)
        .ok_or_else(|| AppError::NotFound(format!("Community {} not found", id)))
}

fn find_team_member<'a>(members: &'a [TeamMember], id: &str) -> Result<&'a TeamMember, AppError> {
    members
        .iter()
        .find(|m| m.id == id)
        .ok_or_else(|| AppError::NotFound(format!("Team member {} not found", id)))
}

fn find_session_index(sessions: &[SessionRequest], id: &str) -> Result<usize, AppError> {
    sessions
        .iter()
        .position(|s| s.id == id)
        .ok_or_else(|| AppError::NotFound(format!("Session {} not found", id)))
}

fn ensure_open(session: &SessionRequest) -> Result<(), AppError> {
    match session.status {
        SessionStatus::Cancelled | SessionStatus::Completed => Err(AppError::Validation(format!(
            "Session {} is {:?} and can no longer be scheduled",
            session.id, session.status
        ))),
        _ => Ok(()),
    }
}

fn reject_conflict(
    member_id: &str,
    slot: &Slot,
    sessions: &[SessionRequest],
    session_id: &str,
) -> Result<(), AppError> {
    match query::find_conflict(member_id, slot, sessions, Some(session_id)) {
        Some(conflict) => {
            tracing::warn!(
                "Rejected schedule for session {}: conflicts with {}",
                session_id,
                conflict.session_id
            );
            Err(AppError::ScheduleConflict {
                message: conflict.describe(),
                session_id: conflict.session_id,
            })
        }
        None => Ok(()),
    }
}

fn warn_on_malformed_timestamps(community: &Community) {
    for (field, value) in [
        ("createdAt", &community.created_at),
        ("updatedAt", &community.updated_at),
        ("lastActivity", &community.last_activity),
    ] {
        if timestamp_millis(value) == 0 {
            tracing::warn!(
                "Community {} has an unparseable {} ({:?}); it sorts as the epoch",
                community.id,
                field,
                value
            );
        }
    }
}
