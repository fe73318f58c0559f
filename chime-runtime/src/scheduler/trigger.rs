use crate::entry::DueInstant;
use std::fmt;
use std::time::Duration;

pub const DEFAULT_PERIOD: &str = "60s";
pub const DEFAULT_CRON: &str = "0 * * * * *";

/// What drives the scheduler's ticks
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger {
    /// Tick every `period`, the first one after `initial_delay`
    FixedRate {
        period: Duration,
        initial_delay: Duration,
    },
    /// Tick on a six-field cron expression (seconds first), e.g. `0 * * * * *`
    Cron(String),
}

impl Default for Trigger {
    fn default() -> Self {
        Trigger::FixedRate {
            period: Duration::from_secs(60),
            initial_delay: Duration::ZERO,
        }
    }
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trigger::FixedRate {
                period,
                initial_delay,
            } => write!(f, "fixed_rate every {:?} (initial delay {:?})", period, initial_delay),
            Trigger::Cron(expr) => write!(f, "cron '{}'", expr),
        }
    }
}

/// How a tick decides that an entry is due.
///
/// `Exact` compares at minute granularity and never fires an entry whose
/// minute was missed (scheduler stopped, machine asleep, clock jump).
/// `CatchUp` also fires unfired entries whose instant already passed; it is
/// opt-in only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchPolicy {
    #[default]
    Exact,
    CatchUp,
}

impl MatchPolicy {
    pub fn matches(self, due: DueInstant, now: DueInstant) -> bool {
        match self {
            MatchPolicy::Exact => due == now,
            MatchPolicy::CatchUp => due <= now,
        }
    }
}

impl std::str::FromStr for MatchPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "exact" => Ok(MatchPolicy::Exact),
            "catch_up" => Ok(MatchPolicy::CatchUp),
            _ => Err(format!("Invalid match policy: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> DueInstant {
        s.parse().unwrap()
    }

    #[test]
    fn exact_needs_the_same_minute() {
        let due = at("2024-01-01 09:00");
        assert!(MatchPolicy::Exact.matches(due, at("2024-01-01 09:00")));
        assert!(!MatchPolicy::Exact.matches(due, at("2024-01-01 09:01")));
        assert!(!MatchPolicy::Exact.matches(due, at("2024-01-01 08:59")));
    }

    #[test]
    fn catch_up_includes_the_past() {
        let due = at("2024-01-01 09:00");
        assert!(MatchPolicy::CatchUp.matches(due, at("2024-01-01 09:00")));
        assert!(MatchPolicy::CatchUp.matches(due, at("2024-01-02 00:00")));
        assert!(!MatchPolicy::CatchUp.matches(due, at("2024-01-01 08:59")));
    }

    #[test]
    fn policy_names() {
        assert_eq!("exact".parse::<MatchPolicy>(), Ok(MatchPolicy::Exact));
        assert_eq!("catch_up".parse::<MatchPolicy>(), Ok(MatchPolicy::CatchUp));
        assert!("range".parse::<MatchPolicy>().is_err());
    }
}
