//! Quiz model matching the frontend Quiz interface.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum QuizDifficulty {
    Beginner,
    Intermediate,
    Advanced,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum QuizStatus {
    Active,
    Draft,
    Archived,
}

impl QuizStatus {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(QuizStatus::Active),
            "draft" => Some(QuizStatus::Draft),
            "archived" => Some(QuizStatus::Archived),
            _ => None,
        }
    }
}

/// A self-assessment quiz listed in the quiz catalogue.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Quiz {
    pub id: String,
    pub slug: String,
    pub title: String,
    pub description: String,
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub difficulty: QuizDifficulty,
    pub status: QuizStatus,
    pub is_public: bool,
    #[serde(default)]
    pub question_count: u32,
    #[serde(default)]
    pub participant_count: u32,
    #[serde(default)]
    pub average_rating: f64,
    pub created_at: String,
    pub updated_at: String,
    pub last_activity: String,
}
