//! The inclusive date range a dashboard interaction is computed over.

use crate::types::error::SelectionError;
use crate::types::period::AnyDate;
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

/// An inclusive `start..=end` range of calendar days with `start <= end`.
///
/// The only way to build one is through the validating constructors, so every
/// `DateRange` that reaches the filter is known to be well-formed.
///
/// # Examples
///
/// ```
/// use bikeshare::{DateRange, SelectionError, Year};
/// use chrono::NaiveDate;
///
/// let jan_1 = NaiveDate::from_ymd_opt(2011, 1, 1).unwrap();
/// let single_day = DateRange::new(jan_1, jan_1)?;
/// assert_eq!(single_day.days(), 1);
///
/// let year = DateRange::from_any(Year(2011), Year(2011))?;
/// assert_eq!(year.days(), 365);
///
/// assert!(matches!(
///     DateRange::from_selection(Some(jan_1), None),
///     Err(SelectionError::MissingEnd)
/// ));
/// # Ok::<(), SelectionError>(())
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Creates a range, rejecting `start > end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, SelectionError> {
        if start > end {
            return Err(SelectionError::Inverted { start, end });
        }
        Ok(Self { start, end })
    }

    /// Creates a range from the raw output of a date selector, where either
    /// bound may not have been picked yet.
    pub fn from_selection(
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Self, SelectionError> {
        let start = start.ok_or(SelectionError::MissingStart)?;
        let end = end.ok_or(SelectionError::MissingEnd)?;
        Self::new(start, end)
    }

    /// Creates a range spanning from the first day of `start` to the last day of `end`.
    pub fn from_any(
        start: impl AnyDate + fmt::Debug + Clone,
        end: impl AnyDate + fmt::Debug + Clone,
    ) -> Result<Self, SelectionError> {
        let start_day = start
            .clone()
            .get_date_range()
            .ok_or_else(|| SelectionError::Unresolvable(format!("{:?}", start)))?
            .start;
        let end_day = end
            .clone()
            .get_date_range()
            .ok_or_else(|| SelectionError::Unresolvable(format!("{:?}", end)))?
            .end;
        Self::new(start_day, end_day)
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Whether `date` lies within the range, both ends included.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Number of calendar days covered, both ends included.
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// Smallest range covering both `self` and `other`.
    pub fn union(&self, other: &DateRange) -> DateRange {
        DateRange {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::period::{Month, Year};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn inverted_range_is_rejected() {
        let err = DateRange::new(date(2012, 1, 2), date(2012, 1, 1)).unwrap_err();
        assert_eq!(
            err,
            SelectionError::Inverted {
                start: date(2012, 1, 2),
                end: date(2012, 1, 1)
            }
        );
    }

    #[test]
    fn missing_bounds_are_rejected() {
        assert_eq!(
            DateRange::from_selection(None, Some(date(2011, 1, 1))),
            Err(SelectionError::MissingStart)
        );
        assert_eq!(
            DateRange::from_selection(Some(date(2011, 1, 1)), None),
            Err(SelectionError::MissingEnd)
        );
        assert_eq!(
            DateRange::from_selection(None, None),
            Err(SelectionError::MissingStart)
        );
    }

    #[test]
    fn contains_includes_both_ends() -> Result<(), SelectionError> {
        let range = DateRange::new(date(2011, 1, 1), date(2011, 1, 31))?;
        assert!(range.contains(date(2011, 1, 1)));
        assert!(range.contains(date(2011, 1, 31)));
        assert!(!range.contains(date(2010, 12, 31)));
        assert!(!range.contains(date(2011, 2, 1)));
        assert_eq!(range.days(), 31);
        Ok(())
    }

    #[test]
    fn from_any_expands_periods() -> Result<(), SelectionError> {
        let range = DateRange::from_any(Month(2011, 2), Year(2012))?;
        assert_eq!(range.start(), date(2011, 2, 1));
        assert_eq!(range.end(), date(2012, 12, 31));

        let strings = DateRange::from_any("2011-05-01", "2011-05-03")?;
        assert_eq!(strings.days(), 3);
        Ok(())
    }

    #[test]
    fn from_any_reports_unresolvable_input() {
        assert!(matches!(
            DateRange::from_any("yesterday", "2011-05-03"),
            Err(SelectionError::Unresolvable(_))
        ));
        assert!(matches!(
            DateRange::from_any(Year(2012), Year(2011)),
            Err(SelectionError::Inverted { .. })
        ));
    }

    #[test]
    fn union_covers_both() -> Result<(), SelectionError> {
        let a = DateRange::new(date(2011, 1, 1), date(2011, 6, 30))?;
        let b = DateRange::new(date(2011, 3, 1), date(2012, 1, 1))?;
        let joined = a.union(&b);
        assert_eq!(joined.start(), date(2011, 1, 1));
        assert_eq!(joined.end(), date(2012, 1, 1));
        Ok(())
    }
}
