use crate::models::PollutantRecord;
use crate::utils::constants::{ALL_LOCATIONS, ALL_TYPES};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// How the end of a time window is interpreted.
///
/// Views disagree on this and both behaviours are observable, so callers pick one explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndBound {
    /// Accept samples up to and including `end + 1 day`
    ExtendedByDay,
    /// Accept samples strictly before `end`
    Exclusive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub end_bound: EndBound,
}

impl TimeWindow {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime, end_bound: EndBound) -> Self {
        Self {
            start,
            end,
            end_bound,
        }
    }

    /// Window between two calendar dates, starting at midnight of each
    pub fn from_dates(start: NaiveDate, end: NaiveDate, end_bound: EndBound) -> Self {
        Self::new(
            start.and_time(chrono::NaiveTime::MIN),
            end.and_time(chrono::NaiveTime::MIN),
            end_bound,
        )
    }

    pub fn contains(&self, instant: NaiveDateTime) -> bool {
        if instant < self.start {
            return false;
        }
        match self.end_bound {
            // An end within a day of the calendar limit leaves the window open-ended
            EndBound::ExtendedByDay => self
                .end
                .checked_add_signed(Duration::days(1))
                .map_or(true, |limit| instant <= limit),
            EndBound::Exclusive => instant < self.end,
        }
    }
}

/// Value object selecting records for a query. Built fresh per query, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub location: String,
    pub pollutant: String,
    pub material_type: String,
    pub window: Option<TimeWindow>,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self::new()
    }
}

impl FilterCriteria {
    /// Matches everything: all locations, all pollutants, all types, no time window
    pub fn new() -> Self {
        Self {
            location: ALL_LOCATIONS.to_string(),
            pollutant: String::new(),
            material_type: ALL_TYPES.to_string(),
            window: None,
        }
    }

    pub fn with_location(self, location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            ..self
        }
    }

    pub fn with_pollutant(self, pollutant: impl Into<String>) -> Self {
        Self {
            pollutant: pollutant.into(),
            ..self
        }
    }

    pub fn with_material_type(self, material_type: impl Into<String>) -> Self {
        Self {
            material_type: material_type.into(),
            ..self
        }
    }

    pub fn with_window(self, window: TimeWindow) -> Self {
        Self {
            window: Some(window),
            ..self
        }
    }

    /// Copy of this filter targeting another pollutant
    pub fn for_pollutant(&self, pollutant: &str) -> Self {
        self.clone().with_pollutant(pollutant)
    }

    pub fn is_all_locations(&self) -> bool {
        self.location == ALL_LOCATIONS
    }

    pub fn is_all_types(&self) -> bool {
        self.material_type == ALL_TYPES
    }

    pub fn matches(&self, record: &PollutantRecord) -> bool {
        if !self.is_all_locations() && record.location != self.location {
            return false;
        }

        if !self.pollutant.is_empty() && record.pollutant != self.pollutant {
            return false;
        }

        if !self.is_all_types() && !record.matches_material_type(&self.material_type) {
            return false;
        }

        match self.window {
            // Unparseable timestamps never fall inside a window
            Some(window) => record
                .sampled_at()
                .is_some_and(|instant| window.contains(instant)),
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(time: &str, location: &str, material_type: &str) -> PollutantRecord {
        PollutantRecord::new(
            time.to_string(),
            "Lead".to_string(),
            location.to_string(),
            1.0,
            "ug/l".to_string(),
            material_type.to_string(),
            String::new(),
            true,
        )
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_default_filter_matches_everything() {
        let filter = FilterCriteria::new();
        assert!(filter.matches(&record("garbage", "SITE A", "SEA WATER")));
    }

    #[test]
    fn test_location_and_pollutant_are_exact() {
        let filter = FilterCriteria::new()
            .with_location("SITE A")
            .with_pollutant("Lead");

        assert!(filter.matches(&record("2024-01-01", "SITE A", "SEA WATER")));
        assert!(!filter.matches(&record("2024-01-01", "site a", "SEA WATER")));
        let other_case = filter.for_pollutant("lead");
        assert!(!other_case.matches(&record("2024-01-01", "SITE A", "SEA WATER")));
    }

    #[test]
    fn test_material_type_ignores_case() {
        let filter = FilterCriteria::new().with_material_type("Sea Water");
        assert!(filter.matches(&record("2024-01-01", "SITE A", "SEA WATER")));
        assert!(!filter.matches(&record("2024-01-01", "SITE A", "GROUNDWATER")));
    }

    #[test]
    fn test_extended_end_includes_following_day() {
        let window =
            TimeWindow::from_dates(date(2024, 1, 1), date(2024, 1, 10), EndBound::ExtendedByDay);
        let filter = FilterCriteria::new().with_window(window);

        assert!(filter.matches(&record("2024-01-01T00:00:00", "A", "X")));
        assert!(filter.matches(&record("2024-01-10T15:00:00", "A", "X")));
        assert!(filter.matches(&record("2024-01-11T00:00:00", "A", "X")));
        assert!(!filter.matches(&record("2024-01-11T00:00:01", "A", "X")));
        assert!(!filter.matches(&record("2023-12-31T23:59:59", "A", "X")));
    }

    #[test]
    fn test_exclusive_end_rejects_end_instant() {
        let window =
            TimeWindow::from_dates(date(2024, 1, 1), date(2024, 1, 10), EndBound::Exclusive);
        let filter = FilterCriteria::new().with_window(window);

        assert!(filter.matches(&record("2024-01-09T23:59:59", "A", "X")));
        assert!(!filter.matches(&record("2024-01-10T00:00:00", "A", "X")));
    }

    #[test]
    fn test_window_excludes_invalid_timestamps() {
        let window =
            TimeWindow::from_dates(date(2000, 1, 1), date(2100, 1, 1), EndBound::ExtendedByDay);
        let filter = FilterCriteria::new().with_window(window);
        assert!(!filter.matches(&record("not-a-time", "A", "X")));
    }

    #[test]
    fn test_extended_window_at_calendar_limits() {
        let window =
            TimeWindow::from_dates(NaiveDate::MIN, NaiveDate::MAX, EndBound::ExtendedByDay);
        let filter = FilterCriteria::new().with_window(window);

        assert!(filter.matches(&record("2024-01-01T00:00:00", "A", "X")));
        assert!(window.contains(NaiveDate::MAX.and_time(chrono::NaiveTime::MIN)));
        assert!(!filter.matches(&record("not-a-time", "A", "X")));
    }
}
