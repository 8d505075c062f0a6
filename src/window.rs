use crate::models::DailySnapshot;
use chrono::{Days, NaiveDate};
use thiserror::Error;

pub const DEFAULT_WINDOW_DAYS: u64 = 30;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum WindowError {
    #[error("Window start {start} is after its end {end}")]
    Inverted { start: NaiveDate, end: NaiveDate },
}

/// Inclusive range of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, WindowError> {
        if start > end {
            return Err(WindowError::Inverted { start, end });
        }
        Ok(Self { start, end })
    }

    /// The `days` most recent days, `today` included.
    pub fn last_days(today: NaiveDate, days: u64) -> Self {
        let start = today
            .checked_sub_days(Days::new(days.saturating_sub(1)))
            .unwrap_or(NaiveDate::MIN);
        Self { start, end: today }
    }

    /// Fills in whichever bound the caller left out from the default window.
    pub fn from_bounds(
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        today: NaiveDate,
    ) -> Result<Self, WindowError> {
        let default = Self::last_days(today, DEFAULT_WINDOW_DAYS);
        match (start, end) {
            (None, None) => Ok(default),
            (Some(start), None) => Self::new(start, default.end.max(start)),
            (None, Some(end)) => Self::new(
                end.checked_sub_days(Days::new(DEFAULT_WINDOW_DAYS - 1))
                    .unwrap_or(NaiveDate::MIN),
                end,
            ),
            (Some(start), Some(end)) => Self::new(start, end),
        }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Slices a date-ordered snapshot sequence down to the days inside `window`.
pub fn filter_window(snapshots: &[DailySnapshot], window: DateWindow) -> &[DailySnapshot] {
    let from = snapshots.partition_point(|snapshot| snapshot.date < window.start);
    let to = snapshots.partition_point(|snapshot| snapshot.date <= window.end);
    &snapshots[from..to.max(from)]
}
