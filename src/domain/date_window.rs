//! Publication-date windows for marker scans

use crate::error::{BlockmarkError, Result};
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

/// Window applied when the operator gives no dates
pub const DEFAULT_WINDOW_DAYS: i64 = 30;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Raw scan arguments as given by the operator
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanRequest {
    pub date_after: Option<String>,
    pub date_before: Option<String>,
}

impl ScanRequest {
    pub fn new(date_after: Option<String>, date_before: Option<String>) -> Self {
        ScanRequest {
            date_after,
            date_before,
        }
    }

    /// Check that every supplied date parses, without building a window
    pub fn validate(&self) -> Result<()> {
        parse_flag("date-after", self.date_after.as_deref())?;
        parse_flag("date-before", self.date_before.as_deref())?;
        Ok(())
    }

    /// Validate the supplied dates and build the effective window.
    ///
    /// `now` anchors the default "last N days" window.
    pub fn resolve(&self, now: NaiveDateTime, default_days: i64) -> Result<DateWindow> {
        let after = parse_flag("date-after", self.date_after.as_deref())?;
        let before = parse_flag("date-before", self.date_before.as_deref())?;

        let window = match (after, before) {
            (Some(after), Some(before)) => DateWindow::Between { after, before },
            (Some(after), None) => DateWindow::After(after),
            (None, Some(before)) => DateWindow::Before(before),
            (None, None) => DateWindow::LastDays {
                days: default_days,
                since: now - Duration::days(default_days),
            },
        };
        Ok(window)
    }
}

fn parse_flag(flag: &str, value: Option<&str>) -> Result<Option<NaiveDate>> {
    let value = match value.map(str::trim) {
        None | Some("") => return Ok(None),
        Some(v) => v,
    };

    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map(Some)
        .map_err(|_| BlockmarkError::InvalidDate {
            flag: flag.to_string(),
            value: value.to_string(),
        })
}

/// Inclusive publication-date window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateWindow {
    /// Published at or after `since`, which lies `days` before the scan started
    LastDays { days: i64, since: NaiveDateTime },
    /// Published on or after the given day
    After(NaiveDate),
    /// Published on or before the given day
    Before(NaiveDate),
    /// Published between two days, both included
    Between { after: NaiveDate, before: NaiveDate },
}

fn start_of(day: NaiveDate) -> NaiveDateTime {
    day.and_time(NaiveTime::MIN)
}

fn end_of(day: NaiveDate) -> Option<NaiveDateTime> {
    day.and_hms_opt(23, 59, 59)
}

impl DateWindow {
    /// Earliest timestamp inside the window
    pub fn lower_bound(&self) -> Option<NaiveDateTime> {
        match self {
            DateWindow::LastDays { since, .. } => Some(*since),
            DateWindow::After(after) | DateWindow::Between { after, .. } => Some(start_of(*after)),
            DateWindow::Before(_) => None,
        }
    }

    /// Latest timestamp inside the window
    pub fn upper_bound(&self) -> Option<NaiveDateTime> {
        match self {
            DateWindow::LastDays { .. } | DateWindow::After(_) => None,
            DateWindow::Before(before) | DateWindow::Between { before, .. } => end_of(*before),
        }
    }

    pub fn contains(&self, published: NaiveDateTime) -> bool {
        self.lower_bound().map_or(true, |lo| published >= lo)
            && self.upper_bound().map_or(true, |hi| published <= hi)
    }

    /// Progress message announcing the scan
    pub fn describe(&self) -> String {
        match self {
            DateWindow::LastDays { days, .. } => {
                format!("Searching for posts published in the last {} days...", days)
            }
            DateWindow::Between { after, before } => format!(
                "Searching for posts published after {} and before {}...",
                after.format(DATE_FORMAT),
                before.format(DATE_FORMAT)
            ),
            DateWindow::After(after) => format!(
                "Searching for posts published after {}...",
                after.format(DATE_FORMAT)
            ),
            DateWindow::Before(before) => format!(
                "Searching for posts published before {}...",
                before.format(DATE_FORMAT)
            ),
        }
    }
}
