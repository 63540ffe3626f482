use std::fmt;

use serde::{Deserialize, Serialize};

/// A calendar date without a year.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MonthDay {
    pub month: u32,
    pub day: u32,
}

impl MonthDay {
    pub const LEAP_DAY: MonthDay = MonthDay::new(2, 29);

    pub const fn new(month: u32, day: u32) -> Self {
        MonthDay { month, day }
    }

    pub fn is_leap_day(&self) -> bool {
        *self == Self::LEAP_DAY
    }
}

impl fmt::Display for MonthDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.month, self.day)
    }
}

impl From<(u32, u32)> for MonthDay {
    fn from((month, day): (u32, u32)) -> Self {
        MonthDay::new(month, day)
    }
}

/// Number of days in each month, indexed from January.
///
/// The standard table never contains February 29th, so 2/29 is never counted
/// as an occurrence. 2 * 29 = 58 and 2058 is not a leap year anyway.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DaysInMonth {
    days: Vec<u32>,
}

impl DaysInMonth {
    pub fn new(days: Vec<u32>) -> Self {
        DaysInMonth { days }
    }

    pub fn standard() -> Self {
        let days = (1..=12)
            .map(|month| match month {
                2 => 28,
                4 | 6 | 9 | 11 => 30,
                _ => 31,
            })
            .collect();
        DaysInMonth { days }
    }

    pub fn months(&self) -> u32 {
        self.days.len() as u32
    }

    /// Days in `month` (1-based), or `None` when the table has no such month.
    pub fn days(&self, month: u32) -> Option<u32> {
        month
            .checked_sub(1)
            .and_then(|i| self.days.get(i as usize))
            .copied()
    }

    pub fn is_valid(&self, month: u32, day: u32) -> bool {
        day >= 1 && self.days(month).map_or(false, |max| day <= max)
    }

    /// Every (month, day) pair in the table, in calendar order.
    pub fn iter(&self) -> impl Iterator<Item = MonthDay> + '_ {
        (1..=self.months()).flat_map(move |month| {
            (1..=self.days(month).unwrap_or(0)).map(move |day| MonthDay::new(month, day))
        })
    }
}

impl Default for DaysInMonth {
    fn default() -> Self {
        DaysInMonth::standard()
    }
}

/// Leap rule for two-digit years in 2000..=2099, where every fourth year is a leap year.
pub fn is_leap_year(year: u32) -> bool {
    year % 4 == 0
}

pub fn days_in_year(year: u32) -> u32 {
    if is_leap_year(year) {
        366
    } else {
        365
    }
}
