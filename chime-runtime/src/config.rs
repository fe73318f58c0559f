use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;
use std::path::Path;

/// Environment variables with this prefix override file values,
/// e.g. `CHIME_REMINDER__PERIOD=30s` overrides `reminder.period`.
const ENV_PREFIX: &str = "CHIME";

/// Load config from a specific TOML file
pub fn load_toml_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    load_config(path.as_ref(), FileFormat::Toml)
}

/// Load config from a specific YAML file
pub fn load_yaml_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    load_config(path.as_ref(), FileFormat::Yaml)
}

fn load_config(path: &Path, format: FileFormat) -> Result<Config, ConfigError> {
    Config::builder()
        .add_source(File::from(path).format(format))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__"),
        )
        .build()
}

/// Resolve a placeholder like `${reminder.period}` or `${reminder.period:60s}`.
///
/// Anything that is not wrapped in `${...}` is returned unchanged.
pub fn resolve_config_value(value: &str, config: &Config) -> Result<String, ConfigError> {
    let Some(inner) = value
        .strip_prefix("${")
        .and_then(|rest| rest.strip_suffix('}'))
    else {
        return Ok(value.to_string());
    };

    match inner.split_once(':') {
        Some((key, default)) => Ok(config
            .get_string(key)
            .unwrap_or_else(|_| default.to_string())),
        None => config.get_string(inner),
    }
}

/// Raw scheduler settings read from the `[reminder]` table.
///
/// Every field stays a string so it can itself be a `${...}` placeholder;
/// the builder interprets the values when the scheduler is built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SchedulerSettings {
    /// `fixed_rate` or `cron`
    pub trigger: Option<String>,
    pub period: Option<String>,
    pub time_unit: Option<String>,
    pub initial_delay: Option<String>,
    pub cron: Option<String>,
    /// `exact` or `catch_up`
    pub match_policy: Option<String>,
}

impl SchedulerSettings {
    pub const SECTION: &'static str = "reminder";

    /// Read the `reminder` table, falling back to defaults when it is absent
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        match config.get::<Self>(Self::SECTION) {
            Ok(settings) => Ok(settings),
            Err(ConfigError::NotFound(_)) => Ok(Self::default()),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn config_with(key: &str, value: &str) -> Config {
        Config::builder()
            .set_override(key, value)
            .and_then(|builder| builder.build())
            .expect("override config")
    }

    #[test]
    fn plain_values_pass_through() {
        let config = Config::default();
        assert_eq!(resolve_config_value("60s", &config).unwrap(), "60s");
    }

    #[test]
    fn placeholder_reads_config() {
        let config = config_with("reminder.period", "30s");
        assert_eq!(
            resolve_config_value("${reminder.period}", &config).unwrap(),
            "30s"
        );
    }

    #[test]
    fn placeholder_default_used_when_missing() {
        let config = Config::default();
        assert_eq!(
            resolve_config_value("${reminder.period:60s}", &config).unwrap(),
            "60s"
        );
        assert!(resolve_config_value("${reminder.period}", &config).is_err());
    }

    #[test]
    fn settings_load_from_toml_file() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .expect("temp file");
        writeln!(
            file,
            "[reminder]\ntrigger = \"fixed_rate\"\nperiod = 30\ntime_unit = \"seconds\"\nmatch_policy = \"catch_up\""
        )
        .unwrap();

        let config = load_toml_config(file.path()).unwrap();
        let settings = SchedulerSettings::from_config(&config).unwrap();

        assert_eq!(settings.trigger.as_deref(), Some("fixed_rate"));
        assert_eq!(settings.period.as_deref(), Some("30"));
        assert_eq!(settings.match_policy.as_deref(), Some("catch_up"));
        assert_eq!(settings.cron, None);
    }

    #[test]
    fn settings_default_without_section() {
        let settings = SchedulerSettings::from_config(&Config::default()).unwrap();
        assert_eq!(settings, SchedulerSettings::default());
    }
}
