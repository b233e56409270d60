//! Comparator sort with stable ordering in both directions.

use std::cmp::Ordering;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::errors::AppError;
use crate::models::{Community, Quiz};

/// Keys a list can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Name,
    MemberCount,
    Rating,
    CreatedAt,
    LastActivity,
}

impl FromStr for SortKey {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(SortKey::Name),
            "memberCount" => Ok(SortKey::MemberCount),
            "rating" => Ok(SortKey::Rating),
            "createdAt" => Ok(SortKey::CreatedAt),
            "lastActivity" => Ok(SortKey::LastActivity),
            other => Err(AppError::InvalidArgument(format!(
                "Unknown sortBy key: {}",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl FromStr for SortOrder {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(AppError::InvalidArgument(format!(
                "Unknown sortOrder: {}",
                other
            ))),
        }
    }
}

/// Fields a record exposes to the comparator sort.
pub trait Sortable {
    fn sort_name(&self) -> &str;
    fn sort_member_count(&self) -> u32;
    fn sort_rating(&self) -> f64;
    fn sort_created_at(&self) -> &str;
    fn sort_last_activity(&self) -> &str;
}

impl Sortable for Community {
    fn sort_name(&self) -> &str {
        &self.name
    }

    fn sort_member_count(&self) -> u32 {
        self.member_count
    }

    fn sort_rating(&self) -> f64 {
        self.average_rating
    }

    fn sort_created_at(&self) -> &str {
        &self.created_at
    }

    fn sort_last_activity(&self) -> &str {
        &self.last_activity
    }
}

impl Sortable for Quiz {
    fn sort_name(&self) -> &str {
        &self.title
    }

    fn sort_member_count(&self) -> u32 {
        self.participant_count
    }

    fn sort_rating(&self) -> f64 {
        self.average_rating
    }

    fn sort_created_at(&self) -> &str {
        &self.created_at
    }

    fn sort_last_activity(&self) -> &str {
        &self.last_activity
    }
}

/// Parse an ISO-8601 timestamp or bare date into epoch milliseconds.
///
/// Unparseable input maps to 0 so malformed rows sort as the epoch.
pub fn timestamp_millis(raw: &str) -> i64 {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.timestamp_millis();
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return naive.and_utc().timestamp_millis();
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return midnight.and_utc().timestamp_millis();
        }
    }
    0
}

fn compare_by<T: Sortable>(a: &T, b: &T, key: SortKey) -> Ordering {
    match key {
        SortKey::Name => a.sort_name().cmp(b.sort_name()),
        SortKey::MemberCount => a.sort_member_count().cmp(&b.sort_member_count()),
        SortKey::Rating => a.sort_rating().total_cmp(&b.sort_rating()),
        SortKey::CreatedAt => {
            timestamp_millis(a.sort_created_at()).cmp(&timestamp_millis(b.sort_created_at()))
        }
        SortKey::LastActivity => timestamp_millis(a.sort_last_activity())
            .cmp(&timestamp_millis(b.sort_last_activity())),
    }
}

/// Order `records` by `key`. With no `order` the input is returned unchanged.
///
/// Equal keys keep their input order in both directions.
pub fn sort_records<T: Sortable>(
    mut records: Vec<T>,
    key: SortKey,
    order: Option<SortOrder>,
) -> Vec<T> {
    match order {
        None => {}
        Some(SortOrder::Asc) => records.sort_by(|a, b| compare_by(a, b, key)),
        Some(SortOrder::Desc) => records.sort_by(|a, b| compare_by(b, a, key)),
    }
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::test_support::community;

    fn names(records: &[Community]) -> Vec<&str> {
        records.iter().map(|c| c.name.as_str()).collect()
    }

    #[test]
    fn test_member_count_desc_keeps_descending_input() {
        let records = vec![
            community("1", "Meditation Masters", 1250, 4.8),
            community("2", "Book Enthusiasts", 890, 4.5),
            community("3", "Weekend Hikers", 750, 4.2),
            community("4", "Sunrise Yoga", 620, 4.9),
        ];
        let sorted = sort_records(records.clone(), SortKey::MemberCount, Some(SortOrder::Desc));
        assert_eq!(sorted, records);
        let counts: Vec<u32> = sorted.iter().map(|c| c.member_count).collect();
        assert_eq!(counts, vec![1250, 890, 750, 620]);
    }

    #[test]
    fn test_name_uses_code_point_order() {
        let records = vec![
            community("1", "beta", 1, 0.0),
            community("2", "Alpha", 1, 0.0),
            community("3", "alpha", 1, 0.0),
        ];
        let sorted = sort_records(records, SortKey::Name, Some(SortOrder::Asc));
        assert_eq!(names(&sorted), vec!["Alpha", "alpha", "beta"]);
    }

    #[test]
    fn test_stable_for_equal_keys_in_both_directions() {
        let records = vec![
            community("a", "A", 10, 4.0),
            community("b", "B", 20, 4.0),
            community("c", "C", 10, 4.0),
            community("d", "D", 20, 4.0),
        ];
        let asc = sort_records(records.clone(), SortKey::MemberCount, Some(SortOrder::Asc));
        assert_eq!(names(&asc), vec!["A", "C", "B", "D"]);
        let desc = sort_records(records.clone(), SortKey::MemberCount, Some(SortOrder::Desc));
        assert_eq!(names(&desc), vec!["B", "D", "A", "C"]);
        let rating = sort_records(records, SortKey::Rating, Some(SortOrder::Desc));
        assert_eq!(names(&rating), vec!["A", "B", "C", "D"]);
    }

    #[test]
    fn test_asc_reversed_equals_desc_for_distinct_keys() {
        let records = vec![
            community("1", "Delta", 40, 3.1),
            community("2", "Alpha", 10, 4.7),
            community("3", "Charlie", 30, 2.2),
            community("4", "Bravo", 20, 4.0),
        ];
        for key in [SortKey::Name, SortKey::MemberCount, SortKey::Rating] {
            let mut asc = sort_records(records.clone(), key, Some(SortOrder::Asc));
            asc.reverse();
            let desc = sort_records(records.clone(), key, Some(SortOrder::Desc));
            assert_eq!(asc, desc, "key {:?}", key);
        }
    }

    #[test]
    fn test_no_order_is_identity() {
        let records = vec![
            community("1", "Zed", 1, 1.0),
            community("2", "Amy", 2, 2.0),
        ];
        let out = sort_records(records.clone(), SortKey::Name, None);
        assert_eq!(out, records);
    }

    #[test]
    fn test_dates_sort_by_instant_and_bad_dates_sort_as_epoch() {
        let mut late = community("1", "Late", 1, 0.0);
        late.created_at = "2024-05-01T10:00:00+02:00".to_string();
        let mut early = community("2", "Early", 1, 0.0);
        early.created_at = "2024-05-01T09:00:00Z".to_string();
        let mut broken = community("3", "Broken", 1, 0.0);
        broken.created_at = "not a date".to_string();
        let mut day = community("4", "Day", 1, 0.0);
        day.created_at = "2023-12-31".to_string();

        let sorted = sort_records(
            vec![late, early, broken, day],
            SortKey::CreatedAt,
            Some(SortOrder::Asc),
        );
        // 10:00+02:00 is 08:00Z, before 09:00Z
        assert_eq!(names(&sorted), vec!["Broken", "Day", "Late", "Early"]);
    }

    #[test]
    fn test_parse_keys() {
        assert_eq!("lastActivity".parse::<SortKey>().unwrap(), SortKey::LastActivity);
        assert_eq!("desc".parse::<SortOrder>().unwrap(), SortOrder::Desc);
        assert!(matches!(
            "popularity".parse::<SortKey>(),
            Err(AppError::InvalidArgument(_))
        ));
        assert!(matches!(
            "DESC".parse::<SortOrder>(),
            Err(AppError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_timestamp_millis() {
        assert_eq!(timestamp_millis("1970-01-01T00:00:01Z"), 1000);
        assert_eq!(timestamp_millis("1970-01-02"), 86_400_000);
        assert_eq!(timestamp_millis(""), 0);
    }
}
