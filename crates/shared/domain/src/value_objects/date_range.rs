//! Date range value object.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// A start instant and an optional (exclusive) end instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    start: DateTime<Utc>,
    end: Option<DateTime<Utc>>,
}

impl DateRange {
    /// # Errors
    /// Returns a validation error when `end` is not after `start`.
    pub fn new(start: DateTime<Utc>, end: Option<DateTime<Utc>>) -> DomainResult<Self> {
        if let Some(end) = end {
            if end <= start {
                return Err(DomainError::validation("End date must be after start date")
                    .with_meta("field", "end_date"));
            }
        }
        Ok(Self { start, end })
    }

    /// Range with no end.
    pub fn open_ended(start: DateTime<Utc>) -> Self {
        Self { start, end: None }
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> Option<DateTime<Utc>> {
        self.end
    }

    /// `instant` ∈ [start, end), or ≥ start when open-ended.
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.start && self.end.map_or(true, |end| instant < end)
    }

    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        self.contains(now)
    }

    pub fn is_active(&self) -> bool {
        self.is_active_at(Utc::now())
    }

    /// Whole days covered, `None` when open-ended.
    pub fn duration_days(&self) -> Option<i64> {
        self.end.map(|end| (end - self.start).num_days())
    }

    pub fn overlaps(&self, other: &DateRange) -> bool {
        let starts_before_other_ends = other.end.map_or(true, |end| self.start < end);
        let other_starts_before_end = self.end.map_or(true, |end| other.start < end);
        starts_before_other_ends && other_starts_before_end
    }
}
