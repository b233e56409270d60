//! Community model matching the frontend Community interface.

use serde::{Deserialize, Serialize};

/// Visibility/lifecycle status of a community.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum CommunityStatus {
    Active,
    Draft,
    Archived,
    Private,
}

impl CommunityStatus {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(CommunityStatus::Active),
            "draft" => Some(CommunityStatus::Draft),
            "archived" => Some(CommunityStatus::Archived),
            "private" => Some(CommunityStatus::Private),
            _ => None,
        }
    }
}

/// The single leader owning a community.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CommunityLeader {
    pub name: String,
    pub role: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

/// External links; every field is independently optional.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct CommunityLocation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discord: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facebook: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CommunityReview {
    pub id: String,
    pub user_name: String,
    pub rating: u8,
    pub comment: String,
    pub date: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MemberRole {
    Leader,
    Moderator,
    Member,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CommunityMember {
    pub id: String,
    pub name: String,
    pub role: MemberRole,
    pub joined_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CommunityEvent {
    pub id: String,
    pub title: String,
    pub description: String,
    pub date: String,
    pub time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default)]
    pub attendees: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CommunityPost {
    pub id: String,
    pub author: String,
    pub title: String,
    pub content: String,
    pub created_at: String,
    #[serde(default)]
    pub likes: u32,
    #[serde(default)]
    pub comments: u32,
}

/// A community with its nested collections and denormalized counters.
///
/// `member_count`, `average_rating` and `review_count` are always recomputed
/// from `members` and `reviews` through [`Community::refresh_derived`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Community {
    pub id: String,
    pub slug: String,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub detailed_description: String,
    #[serde(default)]
    pub totem: String,
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub status: CommunityStatus,
    pub is_public: bool,
    pub requires_approval: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_members: Option<u32>,
    pub leader: CommunityLeader,
    #[serde(default)]
    pub location: CommunityLocation,
    #[serde(default)]
    pub guidelines: Vec<String>,
    #[serde(default)]
    pub rules: Vec<String>,
    #[serde(default)]
    pub reviews: Vec<CommunityReview>,
    #[serde(default)]
    pub members: Vec<CommunityMember>,
    #[serde(default)]
    pub events: Vec<CommunityEvent>,
    #[serde(default)]
    pub posts: Vec<CommunityPost>,
    #[serde(default)]
    pub member_count: u32,
    #[serde(default)]
    pub average_rating: f64,
    #[serde(default)]
    pub review_count: u32,
    pub created_at: String,
    pub updated_at: String,
    pub last_activity: String,
    /// Internal version for optimistic concurrency control
    #[serde(default)]
    pub version: i64,
}

impl Community {
    /// Recompute the denormalized counters from the nested collections.
    pub fn refresh_derived(&mut self) {
        self.member_count = self.members.len() as u32;
        self.review_count = self.reviews.len() as u32;
        self.average_rating = if self.reviews.is_empty() {
            0.0
        } else {
            let sum: u32 = self.reviews.iter().map(|r| u32::from(r.rating)).sum();
            f64::from(sum) / self.reviews.len() as f64
        };
    }

    pub fn is_full(&self) -> bool {
        self.max_members
            .is_some_and(|max| self.members.len() as u32 >= max)
    }
}

/// Derive a URL-safe slug from a display name.
///
/// Lowercases, keeps ASCII alphanumerics and collapses every other run of
/// characters into a single hyphen.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_hyphen = false;

    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(ch.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
    }

    slug
}

/// Request body for creating a new community.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommunityRequest {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub detailed_description: Option<String>,
    #[serde(default)]
    pub totem: Option<String>,
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub status: Option<CommunityStatus>,
    #[serde(default = "default_true")]
    pub is_public: bool,
    #[serde(default)]
    pub requires_approval: bool,
    #[serde(default)]
    pub max_members: Option<u32>,
    pub leader: CommunityLeader,
    #[serde(default)]
    pub location: Option<CommunityLocation>,
    #[serde(default)]
    pub guidelines: Vec<String>,
    #[serde(default)]
    pub rules: Vec<String>,
}

fn default_true() -> bool {
    true
}

/// Request body for updating an existing community.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCommunityRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub detailed_description: Option<String>,
    #[serde(default)]
    pub totem: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub status: Option<CommunityStatus>,
    #[serde(default)]
    pub is_public: Option<bool>,
    #[serde(default)]
    pub requires_approval: Option<bool>,
    #[serde(default)]
    pub max_members: Option<u32>,
    #[serde(default)]
    pub location: Option<CommunityLocation>,
    #[serde(default)]
    pub guidelines: Option<Vec<String>>,
    #[serde(default)]
    pub rules: Option<Vec<String>>,
    /// Expected version for optimistic concurrency control
    #[serde(default)]
    pub expected_version: Option<i64>,
}

/// Request body for posting a review.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReviewRequest {
    pub user_name: String,
    pub rating: u8,
    #[serde(default)]
    pub comment: String,
}

/// Request body for joining a community.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinCommunityRequest {
    pub name: String,
    #[serde(default)]
    pub avatar: Option<String>,
}
