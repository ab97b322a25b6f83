//! Projection of a plan's future workout dates.
//!
//! Occurrences start on the plan's start date and step forward by its
//! frequency. Projection stops at whichever comes first: the requested number
//! of dates, or the first date past the one year horizon.

use std::iter::FusedIterator;

use chrono::{Days, NaiveDate};

use super::FrequencyDays;

/// Occurrences are never projected more than this many days past the start
pub const HORIZON_DAYS: u64 = 365;

/// Count used when a caller asks for upcoming dates without saying how many
pub const DEFAULT_OCCURRENCE_COUNT: usize = 10;

/// Count used for the projection shown alongside every plan. Large enough that
/// the horizon is always what stops a daily plan
pub const PROJECTION_OCCURRENCE_COUNT: usize = 400;

/// Date format of occurrences on the wire
pub const OCCURRENCE_DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone)]
pub struct Occurrences {
    next: Option<NaiveDate>,
    horizon: NaiveDate,
    step: Days,
    remaining: usize,
}

impl Occurrences {
    pub fn new(start_date: NaiveDate, frequency: FrequencyDays, count: usize) -> Self {
        let horizon = start_date
            .checked_add_days(Days::new(HORIZON_DAYS))
            .unwrap_or(NaiveDate::MAX);

        Self {
            next: Some(start_date),
            horizon,
            step: Days::new(frequency.get().into()),
            remaining: count,
        }
    }

    /// Last date an occurrence may fall on
    pub fn horizon(&self) -> NaiveDate {
        self.horizon
    }
}

impl Iterator for Occurrences {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let current = self.next.filter(|d| *d <= self.horizon)?;
        self.remaining -= 1;
        self.next = current.checked_add_days(self.step);
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.remaining))
    }
}

impl FusedIterator for Occurrences {}

/// Every occurrence of a plan starting at `start_date`, capped at `count`
pub fn compute_occurrences(
    start_date: NaiveDate,
    frequency: FrequencyDays,
    count: usize,
) -> Vec<NaiveDate> {
    Occurrences::new(start_date, frequency, count).collect()
}

pub fn format_occurrences<I: IntoIterator<Item = NaiveDate>>(dates: I) -> Vec<String> {
    dates
        .into_iter()
        .map(|d| d.format(OCCURRENCE_DATE_FORMAT).to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn every(days: u32) -> FrequencyDays {
        FrequencyDays::new(days).unwrap()
    }

    #[test]
    fn weekly_plan_first_five() {
        let dates = compute_occurrences(date(2024, 1, 1), every(7), 5);
        assert_eq!(
            format_occurrences(dates),
            vec!["2024-01-01", "2024-01-08", "2024-01-15", "2024-01-22", "2024-01-29"]
        );
    }

    #[test]
    fn step_past_the_horizon_leaves_only_the_start() {
        let dates = compute_occurrences(date(2024, 1, 1), every(400), 10);
        assert_eq!(format_occurrences(dates), vec!["2024-01-01"]);
    }

    #[test]
    fn daily_projection_is_cut_by_the_horizon() {
        let start = date(2023, 3, 10);
        let dates = compute_occurrences(start, every(1), PROJECTION_OCCURRENCE_COUNT);

        // day 0 through day 365 inclusive
        assert_eq!(dates.len(), 366);
        assert_eq!(dates.last(), Some(&date(2024, 3, 9)));
    }

    #[test]
    fn horizon_is_inclusive() {
        let dates = compute_occurrences(date(2024, 1, 1), every(365), 10);
        assert_eq!(dates, vec![date(2024, 1, 1), date(2024, 12, 31)]);
    }

    #[test]
    fn zero_count_yields_nothing() {
        assert!(compute_occurrences(date(2024, 1, 1), every(3), 0).is_empty());
    }

    #[test]
    fn occurrences_follow_the_arithmetic_progression() {
        let start = date(2024, 2, 27);
        for days in [1, 2, 3, 7, 13, 30, 90, 180, 364, 365, 366, 1000] {
            for count in [0, 1, 2, 10, 400] {
                let dates = compute_occurrences(start, every(days), count);
                let horizon = start + Days::new(HORIZON_DAYS);

                assert!(dates.len() <= count);
                if count > 0 {
                    assert_eq!(dates.first(), Some(&start));
                }
                for (k, d) in dates.iter().enumerate() {
                    assert_eq!(*d, start + Days::new(k as u64 * u64::from(days)));
                    assert!(*d <= horizon);
                }
                assert!(dates.windows(2).all(|w| w[0] < w[1]));
            }
        }
    }

    #[test]
    fn iterator_stays_exhausted() {
        let mut occurrences = Occurrences::new(date(2024, 1, 1), every(200), 10);
        assert_eq!(occurrences.next(), Some(date(2024, 1, 1)));
        assert_eq!(occurrences.next(), Some(date(2024, 7, 19)));
        assert_eq!(occurrences.next(), None);
        assert_eq!(occurrences.next(), None);
    }

    #[test]
    fn end_of_calendar_doesnt_overflow() {
        let dates = compute_occurrences(NaiveDate::MAX, every(1), 10);
        assert_eq!(dates, vec![NaiveDate::MAX]);
    }
}
