use super::scheduler::ReminderScheduler;
use super::trigger::Trigger;
use crate::error::SchedulerError;
use crate::store::TaskStore;
use tokio_cron_scheduler::JobScheduler;
use tracing::{info, warn};
use uuid::Uuid;

pub(crate) enum Runner {
    Interval(tokio::task::JoinHandle<()>),
    Cron { scheduler: JobScheduler, job: Uuid },
}

/// Remove the tick job, which owns the engine, then stop the cron backend
async fn shutdown_cron(mut scheduler: JobScheduler, job: Uuid) -> Result<(), SchedulerError> {
    scheduler.remove(&job).await?;
    scheduler.shutdown().await?;
    Ok(())
}

/// Handle for a running scheduler.
///
/// Dropping the handle disarms the scheduler and releases the trigger as
/// well, but only [`stop`](Self::stop) waits for the cron backend to shut
/// down and returns the idle scheduler for a later restart.
pub struct SchedulerHandle {
    scheduler: ReminderScheduler,
    runner: Option<Runner>,
}

impl SchedulerHandle {
    pub(crate) fn new(scheduler: ReminderScheduler, runner: Runner) -> Self {
        Self {
            scheduler,
            runner: Some(runner),
        }
    }

    pub fn store(&self) -> &TaskStore {
        self.scheduler.store()
    }

    pub fn trigger(&self) -> &Trigger {
        self.scheduler.trigger()
    }

    /// Stop ticking and return to the idle state.
    ///
    /// Once this returns no further reminder is delivered, even if a tick was
    /// in flight when it was called.
    pub async fn stop(mut self) -> Result<ReminderScheduler, SchedulerError> {
        self.scheduler.engine.disarm();

        match self.runner.take() {
            Some(Runner::Interval(handle)) => handle.abort(),
            Some(Runner::Cron { scheduler, job }) => shutdown_cron(scheduler, job).await?,
            None => {}
        }

        info!("Reminder scheduler stopped");
        Ok(ReminderScheduler {
            engine: self.scheduler.engine.clone(),
            trigger: self.scheduler.trigger.clone(),
        })
    }
}

impl Drop for SchedulerHandle {
    fn drop(&mut self) {
        let Some(runner) = self.runner.take() else {
            return;
        };

        self.scheduler.engine.disarm();
        match runner {
            Runner::Interval(handle) => handle.abort(),
            Runner::Cron { scheduler, job } => match tokio::runtime::Handle::try_current() {
                Ok(runtime) => {
                    runtime.spawn(async move {
                        if let Err(e) = shutdown_cron(scheduler, job).await {
                            warn!(error = %e, "Failed to shut down dropped cron scheduler");
                        }
                    });
                }
                Err(_) => warn!("Cron scheduler dropped outside a tokio runtime; its job was not removed"),
            },
        }
    }
}
