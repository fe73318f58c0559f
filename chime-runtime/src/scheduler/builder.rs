use super::scheduler::{Engine, ReminderScheduler};
use super::trigger::{MatchPolicy, Trigger, DEFAULT_CRON, DEFAULT_PERIOD};
use crate::clock::{Clock, SystemClock};
use crate::config::{load_toml_config, load_yaml_config, resolve_config_value, SchedulerSettings};
use crate::error::SchedulerError;
use crate::sink::{NotificationSink, TracingSink};
use crate::store::TaskStore;
use crate::time_unit::TimeUnit;
use config::Config;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// Builder for the reminder scheduler.
///
/// Schedule values are strings and may be config placeholders such as
/// `${reminder.period:60s}`; they are resolved in [`build`](Self::build).
/// A `[reminder]` table in the loaded config supplies defaults for anything
/// not set on the builder.
///
/// # Example
///
/// ```rust
/// use chime_runtime::{ReminderSchedulerBuilder, TaskStore};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let store = TaskStore::new();
/// let scheduler = ReminderSchedulerBuilder::new(store.clone())
///     .fixed_rate("${reminder.period:60s}")
///     .build()?;
///
/// store.add("Pay rent", "09:00", "2024-01-01")?;
/// let report = scheduler.tick();
/// # let _ = report;
/// # Ok(())
/// # }
/// ```
pub struct ReminderSchedulerBuilder {
    store: TaskStore,
    config: Arc<Config>,
    settings: SchedulerSettings,
    trigger: Option<Trigger>,
    match_policy: Option<MatchPolicy>,
    clock: Arc<dyn Clock>,
    sink: Arc<dyn NotificationSink>,
}

impl ReminderSchedulerBuilder {
    /// Create a builder with an empty config: 60s fixed rate, exact matching,
    /// system clock, reminders logged through `tracing`
    pub fn new(store: TaskStore) -> Self {
        Self {
            store,
            config: Arc::new(Config::default()),
            settings: SchedulerSettings::default(),
            trigger: None,
            match_policy: None,
            clock: Arc::new(SystemClock),
            sink: Arc::new(TracingSink),
        }
    }

    /// Create with a loaded config; its `[reminder]` table provides defaults
    pub fn with_config(store: TaskStore, config: Config) -> Result<Self, SchedulerError> {
        let settings = SchedulerSettings::from_config(&config)?;
        Ok(Self {
            config: Arc::new(config),
            settings,
            ..Self::new(store)
        })
    }

    /// Create with a TOML config file
    pub fn with_toml<P: AsRef<Path>>(store: TaskStore, path: P) -> Result<Self, SchedulerError> {
        let config = load_toml_config(path)?;
        Self::with_config(store, config)
    }

    /// Create with a YAML config file
    pub fn with_yaml<P: AsRef<Path>>(store: TaskStore, path: P) -> Result<Self, SchedulerError> {
        let config = load_yaml_config(path)?;
        Self::with_config(store, config)
    }

    /// Tick every `period`: shorthand ("60s", "1m") or a bare number in the
    /// configured time unit
    pub fn fixed_rate(mut self, period: &str) -> Self {
        self.settings.trigger = Some("fixed_rate".to_string());
        self.settings.period = Some(period.to_string());
        self
    }

    /// Tick on a six-field cron expression, e.g. `"0 * * * * *"`
    pub fn cron(mut self, expr: &str) -> Self {
        self.settings.trigger = Some("cron".to_string());
        self.settings.cron = Some(expr.to_string());
        self
    }

    /// Delay before the first fixed-rate tick
    pub fn initial_delay(mut self, delay: &str) -> Self {
        self.settings.initial_delay = Some(delay.to_string());
        self
    }

    /// Unit for bare numeric durations (default seconds)
    pub fn time_unit(mut self, unit: TimeUnit) -> Self {
        let name = match unit {
            TimeUnit::Milliseconds => "milliseconds",
            TimeUnit::Seconds => "seconds",
            TimeUnit::Minutes => "minutes",
            TimeUnit::Hours => "hours",
        };
        self.settings.time_unit = Some(name.to_string());
        self
    }

    /// Set the trigger directly, bypassing string settings
    pub fn trigger(mut self, trigger: Trigger) -> Self {
        self.trigger = Some(trigger);
        self
    }

    pub fn match_policy(mut self, policy: MatchPolicy) -> Self {
        self.match_policy = Some(policy);
        self
    }

    pub fn clock<C: Clock + 'static>(mut self, clock: C) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn sink<S: NotificationSink + 'static>(mut self, sink: S) -> Self {
        self.sink = Arc::new(sink);
        self
    }

    /// Resolve all settings and build an idle scheduler
    pub fn build(self) -> Result<ReminderScheduler, SchedulerError> {
        let trigger = match self.trigger.clone() {
            Some(trigger) => trigger,
            None => self.resolve_trigger()?,
        };

        let policy = match self.match_policy {
            Some(policy) => policy,
            None => {
                let raw = self.resolve(self.settings.match_policy.as_deref(), "exact")?;
                raw.parse().map_err(|_| SchedulerError::InvalidSetting {
                    key: "reminder.match_policy",
                    value: raw,
                })?
            }
        };
        if policy == MatchPolicy::CatchUp {
            warn!("Catch-up matching enabled: overdue tasks fire on the next tick");
        }

        info!(%trigger, ?policy, tasks = self.store.len(), "Building reminder scheduler");

        let engine = Engine::new(self.store, self.clock, self.sink, policy);
        Ok(ReminderScheduler {
            engine: Arc::new(engine),
            trigger,
        })
    }

    fn resolve(&self, raw: Option<&str>, default: &str) -> Result<String, SchedulerError> {
        Ok(resolve_config_value(raw.unwrap_or(default), &self.config)?)
    }

    fn resolve_trigger(&self) -> Result<Trigger, SchedulerError> {
        let kind = self.resolve(self.settings.trigger.as_deref(), "fixed_rate")?;

        match kind.trim() {
            "fixed_rate" => {
                let unit_str = self.resolve(self.settings.time_unit.as_deref(), "seconds")?;
                let unit: TimeUnit = unit_str.parse().map_err(|_| SchedulerError::InvalidSetting {
                    key: "reminder.time_unit",
                    value: unit_str.clone(),
                })?;

                let period_str = self.resolve(self.settings.period.as_deref(), DEFAULT_PERIOD)?;
                let period = unit
                    .parse_duration(&period_str)
                    .filter(|period| !period.is_zero())
                    .ok_or_else(|| SchedulerError::InvalidSetting {
                        key: "reminder.period",
                        value: period_str.clone(),
                    })?;

                let delay_str = self.resolve(self.settings.initial_delay.as_deref(), "0")?;
                let initial_delay =
                    unit.parse_duration(&delay_str)
                        .ok_or_else(|| SchedulerError::InvalidSetting {
                            key: "reminder.initial_delay",
                            value: delay_str.clone(),
                        })?;

                if self.settings.cron.is_some() {
                    warn!("reminder.cron is ignored for fixed_rate triggers");
                }

                Ok(Trigger::FixedRate {
                    period,
                    initial_delay,
                })
            }
            "cron" => {
                let expr = self.resolve(self.settings.cron.as_deref(), DEFAULT_CRON)?;

                if self.settings.period.is_some() || self.settings.initial_delay.is_some() {
                    warn!("reminder.period and reminder.initial_delay are ignored for cron triggers");
                }

                Ok(Trigger::Cron(expr))
            }
            _ => Err(SchedulerError::InvalidSetting {
                key: "reminder.trigger",
                value: kind,
            }),
        }
    }
}
