use std::time::Duration;

/// Unit applied to bare numeric durations such as `reminder.period = 60`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeUnit {
    Milliseconds,
    #[default]
    Seconds,
    Minutes,
    Hours,
}

impl std::str::FromStr for TimeUnit {
    type Err = String;

    /// Only full lowercase names are accepted: "milliseconds", "seconds",
    /// "minutes", "hours". Shorthand values like "5s" go through
    /// [`TimeUnit::parse_shorthand`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "milliseconds" => Ok(TimeUnit::Milliseconds),
            "seconds" => Ok(TimeUnit::Seconds),
            "minutes" => Ok(TimeUnit::Minutes),
            "hours" => Ok(TimeUnit::Hours),
            _ => Err(format!("Invalid time unit: {}", s)),
        }
    }
}

impl TimeUnit {
    pub fn to_duration(self, value: u64) -> Duration {
        match self {
            TimeUnit::Milliseconds => Duration::from_millis(value),
            TimeUnit::Seconds => Duration::from_secs(value),
            TimeUnit::Minutes => Duration::from_secs(value.saturating_mul(60)),
            TimeUnit::Hours => Duration::from_secs(value.saturating_mul(3_600)),
        }
    }

    /// Parse a shorthand duration like "60s", "1m", "2h", "500ms".
    ///
    /// Suffixes are lowercase only and must follow the number directly.
    pub fn parse_shorthand(s: &str) -> Option<Duration> {
        let s = s.trim();
        let split = s.find(|c: char| !c.is_ascii_digit())?;
        if split == 0 {
            return None;
        }

        let (digits, suffix) = s.split_at(split);
        let value = digits.parse::<u64>().ok()?;
        let unit = match suffix {
            "ms" => TimeUnit::Milliseconds,
            "s" => TimeUnit::Seconds,
            "m" => TimeUnit::Minutes,
            "h" => TimeUnit::Hours,
            _ => return None,
        };

        Some(unit.to_duration(value))
    }

    /// Parse a shorthand duration, or a bare number counted in this unit
    pub fn parse_duration(self, s: &str) -> Option<Duration> {
        Self::parse_shorthand(s).or_else(|| {
            s.trim()
                .parse::<u64>()
                .ok()
                .map(|value| self.to_duration(value))
        })
    }
}
