//! Predicate filters over in-memory collections.

use crate::models::{Community, CommunityStatus, Quiz, QuizStatus};

/// Fields a record exposes to the predicate filters.
pub trait Filterable {
    type Status: Copy + PartialEq;

    fn name(&self) -> &str;
    fn description(&self) -> &str;
    fn tags(&self) -> &[String];
    fn category(&self) -> &str;
    fn status(&self) -> Self::Status;
    fn is_public(&self) -> bool;
    /// `None` for records that have no approval gate.
    fn requires_approval(&self) -> Option<bool>;
}

impl Filterable for Community {
    type Status = CommunityStatus;

    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn tags(&self) -> &[String] {
        &self.tags
    }

    fn category(&self) -> &str {
        &self.category
    }

    fn status(&self) -> CommunityStatus {
        self.status
    }

    fn is_public(&self) -> bool {
        self.is_public
    }

    fn requires_approval(&self) -> Option<bool> {
        Some(self.requires_approval)
    }
}

impl Filterable for Quiz {
    type Status = QuizStatus;

    fn name(&self) -> &str {
        &self.title
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn tags(&self) -> &[String] {
        &self.tags
    }

    fn category(&self) -> &str {
        &self.category
    }

    fn status(&self) -> QuizStatus {
        self.status
    }

    fn is_public(&self) -> bool {
        self.is_public
    }

    fn requires_approval(&self) -> Option<bool> {
        None
    }
}

/// Filter parameters. Every `None` field imposes no constraint.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter<S> {
    pub search: Option<String>,
    pub category: Option<String>,
    pub status: Option<S>,
    pub is_public: Option<bool>,
    pub requires_approval: Option<bool>,
}

impl<S> Default for Filter<S> {
    fn default() -> Self {
        Self {
            search: None,
            category: None,
            status: None,
            is_public: None,
            requires_approval: None,
        }
    }
}

impl<S: Copy + PartialEq> Filter<S> {
    /// Whether `record` satisfies every supplied predicate.
    pub fn matches<T>(&self, record: &T) -> bool
    where
        T: Filterable<Status = S>,
    {
        if let Some(needle) = self.search_needle() {
            if !matches_search(record, &needle) {
                return false;
            }
        }

        if let Some(category) = &self.category {
            if record.category() != category {
                return false;
            }
        }

        if let Some(status) = self.status {
            if record.status() != status {
                return false;
            }
        }

        if let Some(is_public) = self.is_public {
            if record.is_public() != is_public {
                return false;
            }
        }

        if let Some(requires_approval) = self.requires_approval {
            if record.requires_approval().unwrap_or(false) != requires_approval {
                return false;
            }
        }

        true
    }

    /// Lowercased search term, or `None` when absent or blank.
    fn search_needle(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase)
    }
}

fn matches_search<T: Filterable>(record: &T, needle: &str) -> bool {
    record.name().to_lowercase().contains(needle)
        || record.description().to_lowercase().contains(needle)
        || record.tags().iter().any(|tag| tag.to_lowercase() == needle)
}

/// Return the records satisfying `filter`, preserving input order.
pub fn filter_records<T>(records: &[T], filter: &Filter<T::Status>) -> Vec<T>
where
    T: Filterable + Clone,
{
    records
        .iter()
        .filter(|record| filter.matches(*record))
        .cloned()
        .collect()
}
