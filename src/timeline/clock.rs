use chrono::{FixedOffset, NaiveDate, Utc};

/// Source of "today" for timeline decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Clock {
    /// Wall clock, read as a calendar day in the given reference offset.
    System(FixedOffset),
    /// Pinned day, for tests and what-if runs.
    Fixed(NaiveDate),
}

impl Clock {
    pub fn today(&self) -> NaiveDate {
        match self {
            Clock::System(offset) => Utc::now().with_timezone(offset).date_naive(),
            Clock::Fixed(day) => *day,
        }
    }
}
