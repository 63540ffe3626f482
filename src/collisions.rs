//! Which two-digit years can be written as month * day, and how long the
//! calendar goes between such dates.
//!
//! An occurrence of year `Y` is any date `M/D/20YY` with `M * D == Y`.

use std::collections::BTreeMap;
use std::fmt;

use itertools::Itertools;

use crate::calendar::{days_in_year, is_leap_year, DaysInMonth, MonthDay};
use crate::error::{Result, RiddlerError};

pub const YEARS: u32 = 99;

/// Index `i` holds the number of (month, day) pairs whose product is year `i + 1`.
pub fn compute_occurrences(table: &DaysInMonth) -> Vec<u32> {
    let mut years = vec![0; YEARS as usize];
    for date in table.iter() {
        let year = date.month * date.day;
        if year <= YEARS {
            years[(year - 1) as usize] += 1;
        }
    }
    years
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Summary {
    pub total: u32,
    pub max: u32,
    pub min: u32,
    pub max_years: Vec<u32>,
    pub min_years: Vec<u32>,
}

/// Totals the occurrence counts and picks out the busiest and emptiest years.
///
/// Fails unless at least one year has no occurrences at all, since the gap
/// analysis is only meaningful over zero-count years.
pub fn summarize(counts: &[u32]) -> Result<Summary> {
    let (min, max) = counts.iter().copied().minmax().into_option().unwrap_or((0, 0));
    let years_with = |target: u32| {
        counts
            .iter()
            .positions(|&c| c == target)
            .map(|i| i as u32 + 1)
            .collect::<Vec<_>>()
    };
    let summary = Summary {
        total: counts.iter().sum(),
        max,
        min,
        max_years: years_with(max),
        min_years: years_with(min),
    };
    if summary.min != 0 {
        return Err(RiddlerError::NoUnreachableYear { min: summary.min });
    }
    Ok(summary)
}

/// Formats years the way the puzzle answer reads: `2037, '41, '43`.
pub fn format_years(years: &[u32]) -> String {
    years
        .iter()
        .enumerate()
        .map(|(i, year)| {
            if i == 0 {
                format!("20{:02}", year)
            } else {
                format!("'{:02}", year)
            }
        })
        .join(", ")
}

/// The occurrences on either side of a run of empty years.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Boundary {
    pub start: MonthDay,
    pub start_year: u32,
    pub end: MonthDay,
    pub end_year: u32,
}

impl fmt::Display for Boundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/20{:02} – {}/20{:02}",
            self.start, self.start_year, self.end, self.end_year
        )
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LongestGap {
    pub days: u32,
    pub boundaries: Vec<Boundary>,
}

impl fmt::Display for LongestGap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "The longest stretch between attacks is {} days, which occurs {}.",
            self.days,
            self.boundaries.iter().join(" and ")
        )
    }
}

/// Splits `years` into maximal runs of consecutive integers.
pub fn consecutive_runs(years: &[u32]) -> Vec<Vec<u32>> {
    // consecutive years share the same (year - position) key
    let groups = years
        .iter()
        .copied()
        .sorted()
        .dedup()
        .enumerate()
        .group_by(|&(i, year)| year as i64 - i as i64);
    let runs = groups
        .into_iter()
        .map(|(_, run)| run.map(|(_, year)| year).collect())
        .collect();
    runs
}

fn occurrence_day(table: &DaysInMonth, year: u32, month: u32) -> Option<u32> {
    if year % month == 0 && table.is_valid(month, year / month) {
        Some(year / month)
    } else {
        None
    }
}

/// Days from the last occurrence before `run` to the first one after it.
/// `run` must be a non-empty run of years in `1..=99`.
pub fn measure_gap(run: &[u32], table: &DaysInMonth) -> Result<(u32, Boundary)> {
    let (first, last) = match (run.first(), run.last()) {
        (Some(&first), Some(&last)) => (first, last),
        _ => return Err(RiddlerError::EmptyRun),
    };
    if let Some(&year) = run.iter().find(|&&year| year == 0 || year > YEARS) {
        return Err(RiddlerError::YearOutOfRange { year });
    }

    // full years
    let mut days: u32 = run.iter().map(|&year| days_in_year(year)).sum();

    // walk back from december until the previous year has an occurrence
    let start_year = first - 1;
    let mut start_month = table.months();
    let start_day = loop {
        if start_month == 0 {
            return Err(RiddlerError::NoOccurrence { year: start_year });
        }
        if let Some(day) = occurrence_day(table, start_year, start_month) {
            break day;
        }
        days += table.days(start_month).unwrap_or(0);
        start_month -= 1;
    };
    days += table.days(start_month).unwrap_or(0) - start_day;
    if is_leap_year(start_year) && start_month <= 2 {
        days += 1;
    }

    // walk forward from january until the next year has an occurrence
    let end_year = last + 1;
    let mut end_month = 1;
    let end_day = loop {
        if end_month > table.months() {
            return Err(RiddlerError::NoOccurrence { year: end_year });
        }
        if let Some(day) = occurrence_day(table, end_year, end_month) {
            break day;
        }
        days += table.days(end_month).unwrap_or(0);
        end_month += 1;
    };
    days += end_day;
    if is_leap_year(end_year) && end_month > 2 {
        days += 1;
    }

    let boundary = Boundary {
        start: MonthDay::new(start_month, start_day),
        start_year,
        end: MonthDay::new(end_month, end_day),
        end_year,
    };
    Ok((days, boundary))
}

/// Among the longest runs of `min_years`, finds the one(s) spanning the most
/// calendar days. Returns `None` when there are no years to group.
pub fn find_longest_gap(min_years: &[u32], table: &DaysInMonth) -> Result<Option<LongestGap>> {
    let runs = consecutive_runs(min_years);
    let max_len = match runs.iter().map(Vec::len).max() {
        Some(len) => len,
        None => return Ok(None),
    };

    let mut boundaries: BTreeMap<u32, Vec<Boundary>> = BTreeMap::new();
    for run in runs.iter().filter(|run| run.len() == max_len) {
        let (days, boundary) = measure_gap(run, table)?;
        boundaries.entry(days).or_default().push(boundary);
    }

    Ok(boundaries
        .into_iter()
        .next_back()
        .map(|(days, boundaries)| LongestGap { days, boundaries }))
}
