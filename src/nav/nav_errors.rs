use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum NavError {
    /// No NAV could be resolved within the retry budget. Carries the
    /// date the caller originally asked for, not the last probed date.
    #[error("NAV not found for {date}")]
    NotFound { date: NaiveDate },

    #[error("NAV store error: {0}")]
    Store(String),

    #[error("Invalid NAV data: {0}")]
    InvalidData(String),
}
