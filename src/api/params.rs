//! Query-string adapter between UI controls and the query layer.
//!
//! UI dropdowns send sentinel labels such as "All Categories" or "All Status"
//! for their default state. They are translated to "no constraint" here and
//! never reach the core filters.

use serde::Deserialize;

use crate::config::Config;
use crate::errors::AppError;
use crate::query::{Filter, ListQuery, SortKey, SortOrder};

/// Labels treated as "no constraint", compared case-insensitively.
const WILDCARD_SENTINELS: &[&str] = &["all", "all categories", "all status", "all statuses"];

/// Raw list parameters. Everything arrives as text so that malformed values
/// produce an `INVALID_ARGUMENT` envelope instead of an extractor rejection.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub search: Option<String>,
    pub category: Option<String>,
    pub status: Option<String>,
    pub is_public: Option<String>,
    pub requires_approval: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
    pub page: Option<String>,
    pub page_size: Option<String>,
}

impl ListParams {
    /// Validate and convert into a [`ListQuery`], using `parse_status` for the
    /// record-specific status vocabulary.
    pub fn into_query<S>(
        self,
        config: &Config,
        parse_status: impl Fn(&str) -> Option<S>,
    ) -> Result<ListQuery<S>, AppError> {
        let status = match without_sentinel(self.status) {
            Some(raw) => Some(
                parse_status(&raw)
                    .ok_or_else(|| AppError::InvalidArgument(format!("Unknown status: {}", raw)))?,
            ),
            None => None,
        };

        let sort_by = match self.sort_by.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => raw.parse::<SortKey>()?,
            _ => SortKey::Name,
        };
        let sort_order = match self.sort_order.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => Some(raw.parse::<SortOrder>()?),
            _ => None,
        };

        let page = parse_positive("page", self.page.as_deref())?.unwrap_or(1);
        let page_size =
            parse_positive("pageSize", self.page_size.as_deref())?.unwrap_or(config.default_page_size);
        if page_size > config.max_page_size {
            return Err(AppError::InvalidArgument(format!(
                "pageSize {} exceeds the maximum of {}",
                page_size, config.max_page_size
            )));
        }

        Ok(ListQuery {
            filter: Filter {
                search: self.search,
                category: without_sentinel(self.category),
                status,
                is_public: parse_flag("isPublic", self.is_public)?,
                requires_approval: parse_flag("requiresApproval", self.requires_approval)?,
            },
            sort_by,
            sort_order,
            page,
            page_size,
        })
    }
}

/// `None` for absent, blank or sentinel values.
pub fn without_sentinel(value: Option<String>) -> Option<String> {
    value.filter(|raw| {
        let trimmed = raw.trim();
        !trimmed.is_empty()
            && !WILDCARD_SENTINELS
                .iter()
                .any(|sentinel| trimmed.eq_ignore_ascii_case(sentinel))
    })
}

fn parse_flag(name: &str, value: Option<String>) -> Result<Option<bool>, AppError> {
    match without_sentinel(value).as_deref().map(str::trim) {
        None => Ok(None),
        Some("true") => Ok(Some(true)),
        Some("false") => Ok(Some(false)),
        Some(other) => Err(AppError::InvalidArgument(format!(
            "{} must be true or false, got {}",
            name, other
        ))),
    }
}

fn parse_positive(name: &str, value: Option<&str>) -> Result<Option<usize>, AppError> {
    let Some(raw) = value.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };
    match raw.parse::<i64>() {
        Ok(n) if n > 0 => usize::try_from(n)
            .map(Some)
            .map_err(|_| AppError::InvalidArgument(format!("{} is too large: {}", name, raw))),
        _ => Err(AppError::InvalidArgument(format!(
            "{} must be a positive integer, got {}",
            name, raw
        ))),
    }
}
