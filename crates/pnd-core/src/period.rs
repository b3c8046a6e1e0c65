//! Target month resolution and Sunday enumeration.
//!
//! "Today" is always passed in by the caller; nothing in here reads the clock.

use anyhow::{bail, Result};
use chrono::{Datelike, NaiveDate, Weekday};
use std::fmt;

/// How far back from the current month a run should look.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MonthOffset {
    /// The month containing "today". Future Sundays are trimmed.
    #[default]
    Current,
    /// The month before the current one.
    Previous,
    /// `n` months before the current one. `MonthsBack(0)` behaves like `Current`.
    MonthsBack(u32),
}

impl MonthOffset {
    /// Combines the two CLI flags. `--previous-month` wins over `-p N`.
    pub fn from_flags(previous_month: bool, months_back: u32) -> Self {
        if previous_month {
            MonthOffset::Previous
        } else if months_back > 0 {
            MonthOffset::MonthsBack(months_back)
        } else {
            MonthOffset::Current
        }
    }

    pub fn months(self) -> u32 {
        match self {
            MonthOffset::Current => 0,
            MonthOffset::Previous => 1,
            MonthOffset::MonthsBack(n) => n,
        }
    }

    /// True when the run targets the month containing "today".
    pub fn is_current(self) -> bool {
        self.months() == 0
    }
}

/// The (month, year) pair a run operates on. Month is always 1..=12.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetPeriod {
    year: i32,
    month: u32,
}

impl TargetPeriod {
    pub fn new(year: i32, month: u32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            bail!("month out of range: {}", month);
        }
        Ok(Self { year, month })
    }

    /// Subtracts `offset` months from the month of `today`, rolling the year
    /// back as many times as needed.
    pub fn resolve(today: NaiveDate, offset: MonthOffset) -> Self {
        let index = i64::from(today.year()) * 12 + i64::from(today.month0())
            - i64::from(offset.months());
        Self {
            year: index.div_euclid(12) as i32,
            month: index.rem_euclid(12) as u32 + 1,
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// Every Sunday of the month, ascending.
    pub fn sundays(&self) -> Vec<NaiveDate> {
        let Some(first) = NaiveDate::from_ymd_opt(self.year, self.month, 1) else {
            return Vec::new();
        };
        first
            .iter_days()
            .take_while(|d| d.month() == self.month)
            .filter(|d| d.weekday() == Weekday::Sun)
            .collect()
    }
}

impl fmt::Display for TargetPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Sundays eligible for a run. For the current month, Sundays after `today`
/// are dropped since those episodes cannot exist yet.
pub fn candidate_dates(today: NaiveDate, offset: MonthOffset) -> Vec<NaiveDate> {
    let period = TargetPeriod::resolve(today, offset);
    let sundays = period.sundays();
    if offset.is_current() {
        trim_until(sundays, today)
    } else {
        sundays
    }
}

/// Keeps dates whose day-of-month is not later than `today`'s.
pub fn trim_until(dates: Vec<NaiveDate>, today: NaiveDate) -> Vec<NaiveDate> {
    dates.into_iter().filter(|d| d.day() <= today.day()).collect()
}

/// 8-digit `YYYYMMDD` key used in archive URLs.
pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}
