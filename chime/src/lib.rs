//! # Chime - minute-granular reminders for Rust
//!
//! A small engine behind a to-do list with timed reminders: a [`TaskStore`]
//! of entries, and a [`ReminderScheduler`] that checks the store on a timer
//! and notifies once for every entry whose minute has arrived.
//!
//! ## Features
//!
//! - **Fixed format**: dates are `yyyy-MM-dd`, times are `HH:mm` (24-hour)
//! - **Exactly once**: each entry fires a single time, then is marked fired
//! - **Fixed rate or cron**: tick every `60s`, or on `0 * * * * *`
//! - **Config support**: placeholders like `${reminder.period:60s}`
//! - **Pluggable sinks**: closures, tokio channels, or `tracing` log lines
//! - **Stable ids**: delete by id, or by display position
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use chime::{ChannelSink, ReminderSchedulerBuilder, TaskStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = TaskStore::new();
//!     store.add("Pay rent", "09:00", "2024-01-01")?;
//!
//!     let (sink, mut reminders) = ChannelSink::new();
//!     let handle = ReminderSchedulerBuilder::new(store.clone())
//!         .sink(sink)
//!         .fixed_rate("60s")
//!         .build()?
//!         .start()
//!         .await?;
//!
//!     while let Some(reminder) = reminders.recv().await {
//!         println!("{}", reminder);
//!     }
//!
//!     handle.stop().await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Configuration
//!
//! Create `config/application.toml`:
//!
//! ```toml
//! [reminder]
//! trigger = "fixed_rate"   # or "cron"
//! period = "60s"
//! initial_delay = 0
//! match_policy = "exact"   # "catch_up" also fires overdue tasks
//! ```
//!
//! Environment variables with the `CHIME_` prefix override file values:
//!
//! ```bash
//! export CHIME_REMINDER__PERIOD=30s
//! ```
//!
//! ## Missed minutes
//!
//! Matching is exact by default: a task whose minute passes while the
//! scheduler is stopped or the machine is asleep is never fired. Use
//! [`MatchPolicy::CatchUp`] to fire such tasks on the next tick instead.

// Re-export core types
pub use chime_runtime::{
    load_toml_config, load_yaml_config, ChannelSink, Clock, DueInstant, EntryId, Field,
    ManualClock, MatchPolicy, NotificationSink, OutOfRangeError, Reminder, ReminderEntry,
    ReminderScheduler, ReminderSchedulerBuilder, SchedulerError, SchedulerHandle,
    SchedulerSettings, SinkError, StoreError, SystemClock, TaskStore, TickError, TickReport,
    TimeUnit, TracingSink, Trigger, ValidationError,
};

pub use chime_runtime;
