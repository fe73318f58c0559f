mod builder;
mod handle;
mod scheduler;
mod trigger;

pub use builder::ReminderSchedulerBuilder;
pub use handle::SchedulerHandle;
pub use scheduler::{ReminderScheduler, TickReport};
pub use trigger::{MatchPolicy, Trigger, DEFAULT_CRON, DEFAULT_PERIOD};
