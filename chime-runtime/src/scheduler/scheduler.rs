use super::handle::{Runner, SchedulerHandle};
use super::trigger::{MatchPolicy, Trigger};
use crate::clock::Clock;
use crate::entry::{DueInstant, EntryId, ReminderEntry};
use crate::error::{SchedulerError, TickError};
use crate::sink::{NotificationSink, Reminder};
use crate::store::TaskStore;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Outcome of one tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickReport {
    /// The minute the tick evaluated
    pub now: DueInstant,
    /// Entries delivered and marked fired, in store order
    pub fired: Vec<EntryId>,
    pub errors: Vec<TickError>,
}

impl TickReport {
    fn new(now: DueInstant) -> Self {
        Self {
            now,
            fired: Vec::new(),
            errors: Vec::new(),
        }
    }
}

/// State shared between the idle scheduler, its handle and the tick task
pub(crate) struct Engine {
    pub(crate) store: TaskStore,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) sink: Arc<dyn NotificationSink>,
    pub(crate) policy: MatchPolicy,
    running: AtomicBool,
    /// Held for a whole tick, from reading the running flag to marking
    /// entries fired. The store lock is never held while the sink runs.
    delivery: Mutex<()>,
}

impl Engine {
    pub(crate) fn new(
        store: TaskStore,
        clock: Arc<dyn Clock>,
        sink: Arc<dyn NotificationSink>,
        policy: MatchPolicy,
    ) -> Self {
        Self {
            store,
            clock,
            sink,
            policy,
            running: AtomicBool::new(false),
            delivery: Mutex::new(()),
        }
    }

    fn now(&self) -> DueInstant {
        DueInstant::at_minute(self.clock.now())
    }

    fn lock_delivery(&self) -> MutexGuard<'_, ()> {
        self.delivery.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn tick(&self) -> TickReport {
        let _delivery = self.lock_delivery();
        self.evaluate(self.now())
    }

    /// Tick from the timer. Returns `None` once the scheduler has been
    /// disarmed; the flag is read under the delivery lock.
    fn armed_tick(&self) -> Option<TickReport> {
        let _delivery = self.lock_delivery();
        self.running
            .load(Ordering::SeqCst)
            .then(|| self.evaluate(self.now()))
    }

    fn arm(&self) {
        self.running.store(true, Ordering::SeqCst);
    }

    /// Clear the running flag, then wait out any tick that is delivering.
    /// No reminder is delivered after this returns.
    pub(crate) fn disarm(&self) {
        self.running.store(false, Ordering::SeqCst);
        drop(self.lock_delivery());
    }

    fn evaluate(&self, now: DueInstant) -> TickReport {
        let mut report = TickReport::new(now);

        let due: Vec<Reminder> = self.store.scan(|entries| {
            entries
                .iter()
                .filter(|entry| !entry.fired && self.policy.matches(entry.due, now))
                .map(Reminder::from)
                .collect()
        });

        for reminder in &due {
            let delivered = panic::catch_unwind(AssertUnwindSafe(|| self.sink.notify(reminder)));

            let error = match delivered {
                Ok(Ok(())) => {
                    report.fired.push(reminder.id);
                    continue;
                }
                Ok(Err(source)) => TickError::Delivery {
                    id: reminder.id,
                    source,
                },
                Err(_) => TickError::SinkPanicked { id: reminder.id },
            };
            warn!(id = %reminder.id, %error, "Reminder delivery failed");
            report.errors.push(error);
        }

        if !report.fired.is_empty() {
            self.store.scan(|entries| mark_fired(entries, &report.fired));
        }

        debug!(
            now = %now,
            fired = report.fired.len(),
            errors = report.errors.len(),
            "Reminder tick"
        );
        report
    }
}

/// Entries removed while their reminder was being delivered are skipped
fn mark_fired(entries: &mut [ReminderEntry], fired: &[EntryId]) {
    for entry in entries.iter_mut().filter(|entry| fired.contains(&entry.id)) {
        entry.fired = true;
    }
}

/// Idle reminder scheduler.
///
/// [`start`](Self::start) arms the trigger and returns a [`SchedulerHandle`];
/// [`SchedulerHandle::stop`] disarms it and hands the idle scheduler back.
pub struct ReminderScheduler {
    pub(crate) engine: Arc<Engine>,
    pub(crate) trigger: Trigger,
}

impl ReminderScheduler {
    pub fn store(&self) -> &TaskStore {
        &self.engine.store
    }

    pub fn trigger(&self) -> &Trigger {
        &self.trigger
    }

    pub fn match_policy(&self) -> MatchPolicy {
        self.engine.policy
    }

    /// Evaluate the store once against the clock, without any timer.
    ///
    /// Each matching unfired entry is delivered to the sink and marked fired.
    pub fn tick(&self) -> TickReport {
        self.engine.tick()
    }

    /// Arm the trigger. The returned handle keeps it running until
    /// [`SchedulerHandle::stop`] is called or the handle is dropped.
    pub async fn start(self) -> Result<SchedulerHandle, SchedulerError> {
        self.engine.arm();

        let runner = match &self.trigger {
            Trigger::FixedRate {
                period,
                initial_delay,
            } => Runner::Interval(spawn_interval(self.engine.clone(), *period, *initial_delay)),
            Trigger::Cron(expr) => match start_cron(self.engine.clone(), expr).await {
                Ok((scheduler, job)) => Runner::Cron { scheduler, job },
                Err(e) => {
                    self.engine.disarm();
                    return Err(e);
                }
            },
        };

        info!(
            trigger = %self.trigger,
            tasks = self.engine.store.len(),
            "Reminder scheduler started"
        );

        Ok(SchedulerHandle::new(self, runner))
    }
}

fn spawn_interval(
    engine: Arc<Engine>,
    period: Duration,
    initial_delay: Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        if !initial_delay.is_zero() {
            tokio::time::sleep(initial_delay).await;
        }

        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        // The first tick completes immediately, so the store is checked as
        // soon as the initial delay has passed.
        loop {
            interval.tick().await;
            if engine.armed_tick().is_none() {
                break;
            }
        }
    })
}

async fn start_cron(engine: Arc<Engine>, expr: &str) -> Result<(JobScheduler, Uuid), SchedulerError> {
    let scheduler = JobScheduler::new().await?;

    let job = Job::new_async(expr, move |_uuid, _lock| {
        let engine = engine.clone();
        Box::pin(async move {
            engine.armed_tick();
        })
    })?;

    let job = scheduler.add(job).await?;
    scheduler.start().await?;
    Ok((scheduler, job))
}
