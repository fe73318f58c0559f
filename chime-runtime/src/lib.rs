//! Chime Runtime - task store and reminder scheduler
//!
//! [`TaskStore`] holds reminder entries; [`ReminderScheduler`] checks it on a
//! timer and hands every entry whose minute has arrived to a
//! [`NotificationSink`], exactly once.

mod clock;
mod config;
mod entry;
mod error;
mod scheduler;
mod sink;
mod store;
mod time_unit;

// Re-export public API
pub use clock::{Clock, ManualClock, SystemClock};
pub use crate::config::{load_toml_config, load_yaml_config, resolve_config_value, SchedulerSettings};
pub use entry::{DueInstant, EntryId, ReminderEntry, DATE_FORMAT, DATE_TIME_FORMAT, TIME_FORMAT};
pub use error::{
    Field, OutOfRangeError, SchedulerError, SinkError, StoreError, TickError, ValidationError,
};
pub use scheduler::{
    MatchPolicy, ReminderScheduler, ReminderSchedulerBuilder, SchedulerHandle, TickReport,
    Trigger, DEFAULT_CRON, DEFAULT_PERIOD,
};
pub use sink::{ChannelSink, NotificationSink, Reminder, TracingSink};
pub use store::TaskStore;
pub use time_unit::TimeUnit;
