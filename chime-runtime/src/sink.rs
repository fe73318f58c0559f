use crate::entry::{DueInstant, EntryId, ReminderEntry};
use crate::error::SinkError;
use serde::Serialize;
use std::fmt;
use tokio::sync::mpsc;
use tracing::info;

/// Notification emitted once for each entry whose due instant has arrived
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reminder {
    pub id: EntryId,
    pub description: String,
    pub due: DueInstant,
}

impl From<&ReminderEntry> for Reminder {
    fn from(entry: &ReminderEntry) -> Self {
        Self {
            id: entry.id,
            description: entry.description.clone(),
            due: entry.due,
        }
    }
}

impl fmt::Display for Reminder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "It's time for: {}", self.description)
    }
}

/// Receives reminders from the scheduler.
///
/// `notify` runs outside the task store lock, so a sink may read or edit the
/// [`TaskStore`](crate::TaskStore). Ticks are serialized and `stop` waits for
/// the one in flight, so a slow sink delays both; hand the reminder off (a
/// channel, a UI event queue) for real work. A sink must not call
/// [`ReminderScheduler::tick`](crate::ReminderScheduler::tick) itself.
///
/// Returning an error leaves the entry unfired; the scheduler logs the
/// failure and carries on with the remaining entries.
///
/// Any `Fn(&Reminder) -> Result<(), SinkError>` closure is a sink:
///
/// ```rust
/// use chime_runtime::{Reminder, SinkError, NotificationSink};
///
/// let sink = |reminder: &Reminder| -> Result<(), SinkError> {
///     println!("{}", reminder);
///     Ok(())
/// };
/// # fn assert_sink(_: &impl NotificationSink) {}
/// # assert_sink(&sink);
/// ```
pub trait NotificationSink: Send + Sync {
    fn notify(&self, reminder: &Reminder) -> Result<(), SinkError>;
}

impl<F> NotificationSink for F
where
    F: Fn(&Reminder) -> Result<(), SinkError> + Send + Sync,
{
    fn notify(&self, reminder: &Reminder) -> Result<(), SinkError> {
        self(reminder)
    }
}

/// Forwards reminders into an unbounded tokio channel
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<Reminder>,
}

impl ChannelSink {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Reminder>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl NotificationSink for ChannelSink {
    fn notify(&self, reminder: &Reminder) -> Result<(), SinkError> {
        self.tx
            .send(reminder.clone())
            .map_err(|_| SinkError::Closed)
    }
}

/// Writes each reminder as an `info` log line
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn notify(&self, reminder: &Reminder) -> Result<(), SinkError> {
        info!(id = %reminder.id, due = %reminder.due, "{}", reminder);
        Ok(())
    }
}
