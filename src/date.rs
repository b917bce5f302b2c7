//! Run-date arithmetic.
//!
//! A run targets one delivery date. That date names the image files, heads
//! the banner, and anchors the signup weeks, so it is computed once and
//! passed explicitly to every stage that needs it.

use std::fmt;

use chrono::{Datelike, Days, Local, NaiveDate, Weekday};

use crate::error::{Error, Result};

/// The delivery date a run produces a newsletter for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RunDate(NaiveDate);

impl RunDate {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// The next Sunday strictly after `today`.
    pub fn next_after(today: NaiveDate) -> Self {
        Self(next_weekday(today, Weekday::Sun, true))
    }

    /// The next Sunday strictly after the local current date.
    pub fn upcoming() -> Self {
        Self::next_after(Local::now().date_naive())
    }

    /// Parse a `YYYY-MM-DD` date.
    pub fn parse(s: &str) -> Result<Self> {
        NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map(Self)
            .map_err(|_| Error::InvalidDate(s.to_string()))
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    pub fn iso(&self) -> String {
        self.0.format("%Y-%m-%d").to_string()
    }

    /// Long banner form, e.g. `December 1, 2024`.
    pub fn banner(&self) -> String {
        self.0.format("%B %-d, %Y").to_string()
    }

    /// Prefix shared by every image file of this run.
    pub fn file_prefix(&self) -> String {
        format!("{}-news-", self.iso())
    }

    /// The two delivery weeks offered in the signup block.
    pub fn signup_weeks(&self) -> SignupWeeks {
        let base = next_weekday(self.0, Weekday::Sun, false);
        let current = Week {
            start: next_weekday(base, Weekday::Mon, true),
            end: next_weekday(base, Weekday::Sun, true),
        };
        let next = Week {
            start: next_weekday(current.start, Weekday::Mon, true),
            end: next_weekday(current.end, Weekday::Sun, true),
        };
        SignupWeeks { current, next }
    }
}

impl fmt::Display for RunDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.iso())
    }
}

/// A Monday-to-Sunday delivery week.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Week {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Week {
    /// `Dec 2-8`, or `Dec 30-Jan 5` when the week spans two months.
    pub fn range_label(&self) -> String {
        let start = self.start.format("%b %-d");
        if self.start.month() == self.end.month() {
            format!("{start}-{}", self.end.day())
        } else {
            format!("{start}-{}", self.end.format("%b %-d"))
        }
    }

    pub fn start_iso(&self) -> String {
        self.start.format("%Y-%m-%d").to_string()
    }
}

/// Current and following signup weeks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignupWeeks {
    pub current: Week,
    pub next: Week,
}

/// The first `weekday` on or after `date` (strictly after when `strictly_after`).
fn next_weekday(date: NaiveDate, weekday: Weekday, strictly_after: bool) -> NaiveDate {
    let today = date.weekday().num_days_from_sunday();
    let target = weekday.num_days_from_sunday();
    let mut diff = (target + 7 - today) % 7;
    if strictly_after && diff == 0 {
        diff = 7;
    }
    date.checked_add_days(Days::new(u64::from(diff)))
        .unwrap_or(date)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_next_after_skips_today_when_sunday() {
        // 2024-12-01 is a Sunday
        assert_eq!(RunDate::next_after(ymd(2024, 12, 1)).date(), ymd(2024, 12, 8));
        // Wednesday
        assert_eq!(RunDate::next_after(ymd(2024, 11, 27)).date(), ymd(2024, 12, 1));
        // Saturday
        assert_eq!(RunDate::next_after(ymd(2024, 11, 30)).date(), ymd(2024, 12, 1));
    }

    #[test]
    fn test_formats() {
        let run = RunDate::parse("2024-12-01").unwrap();
        assert_eq!(run.iso(), "2024-12-01");
        assert_eq!(run.banner(), "December 1, 2024");
        assert_eq!(run.file_prefix(), "2024-12-01-news-");
        assert_eq!(run.to_string(), "2024-12-01");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(RunDate::parse("12/01/2024"), Err(Error::InvalidDate(_))));
    }

    #[test]
    fn test_signup_weeks_from_sunday() {
        let weeks = RunDate::parse("2024-12-01").unwrap().signup_weeks();
        assert_eq!(weeks.current.start, ymd(2024, 12, 2));
        assert_eq!(weeks.current.end, ymd(2024, 12, 8));
        assert_eq!(weeks.next.start, ymd(2024, 12, 9));
        assert_eq!(weeks.next.end, ymd(2024, 12, 15));
        assert_eq!(weeks.current.range_label(), "Dec 2-8");
        assert_eq!(weeks.current.start_iso(), "2024-12-02");
    }

    #[test]
    fn test_signup_weeks_midweek_and_month_span() {
        // Thursday 2024-12-26 -> base Sunday 12-29
        let weeks = RunDate::parse("2024-12-26").unwrap().signup_weeks();
        assert_eq!(weeks.current.start, ymd(2024, 12, 30));
        assert_eq!(weeks.current.range_label(), "Dec 30-Jan 5");
        assert_eq!(weeks.next.range_label(), "Jan 6-12");
    }
}
