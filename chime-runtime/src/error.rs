//! Error types surfaced by the store, the sinks and the scheduler.

use crate::entry::EntryId;
use std::fmt;
use thiserror::Error;

/// Input field named by [`ValidationError::MissingField`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Description,
    Time,
    Date,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Field::Description => "description",
            Field::Time => "time",
            Field::Date => "date",
        })
    }
}

/// Rejected input on `add`; the store is left unchanged
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please fill in all fields ({0} is empty)")]
    MissingField(Field),

    #[error("Invalid date or time format. Use HH:mm for time and yyyy-MM-dd for date (got '{date}' '{time}')")]
    InvalidDateTime { date: String, time: String },
}

/// Positional removal outside `[0, len)`; the store is left unchanged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("No task at position {index} (the list holds {len})")]
pub struct OutOfRangeError {
    pub index: usize,
    pub len: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    OutOfRange(#[from] OutOfRangeError),

    #[error("Task {0} does not exist")]
    UnknownEntry(EntryId),
}

/// Failure reported by a [`NotificationSink`](crate::NotificationSink)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SinkError {
    #[error("notification receiver has been dropped")]
    Closed,

    #[error("notification rejected: {0}")]
    Rejected(String),
}

/// Failure evaluating a single entry during a tick.
///
/// Never fatal: the tick moves on to the next entry and the entry stays unfired.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TickError {
    #[error("failed to deliver reminder for task {id}: {source}")]
    Delivery {
        id: EntryId,
        #[source]
        source: SinkError,
    },

    #[error("notification sink panicked while delivering task {id}")]
    SinkPanicked { id: EntryId },
}

impl TickError {
    pub fn entry(&self) -> EntryId {
        match self {
            TickError::Delivery { id, .. } | TickError::SinkPanicked { id } => *id,
        }
    }
}

#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("invalid value '{value}' for {key}")]
    InvalidSetting { key: &'static str, value: String },

    #[error("cron scheduler error: {0}")]
    Cron(#[from] tokio_cron_scheduler::JobSchedulerError),
}
