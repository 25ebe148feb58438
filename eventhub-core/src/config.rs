//! Global eventhub configuration.

use std::path::{Path, PathBuf};

use chrono::Duration;
use chrono_tz::Tz;
use config::{Config, File};
use serde::Deserialize;

use crate::constants::{
    DEFAULT_EVENT_DURATION, DEFAULT_PRODUCT_ID, DEFAULT_TIMEZONE, DEFAULT_UID_DOMAIN,
};
use crate::error::{EventHubError, EventHubResult};
use crate::export::ExportOptions;

static DEFAULT_OUTPUT_DIR: &str = ".";

fn default_product_id() -> String {
    DEFAULT_PRODUCT_ID.to_string()
}

fn default_uid_domain() -> String {
    DEFAULT_UID_DOMAIN.to_string()
}

fn default_duration() -> String {
    DEFAULT_EVENT_DURATION.to_string()
}

fn default_timezone() -> String {
    DEFAULT_TIMEZONE.to_string()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_DIR)
}

/// Global configuration at ~/.config/eventhub/config.toml
#[derive(Debug, Deserialize, Clone)]
pub struct EventHubConfig {
    #[serde(default = "default_product_id")]
    pub product_id: String,

    #[serde(default = "default_uid_domain")]
    pub uid_domain: String,

    /// Length of events without an explicit end, e.g. "2h" or "90m"
    #[serde(default = "default_duration")]
    pub default_duration: String,

    /// IANA time zone, e.g. "Europe/Berlin"
    #[serde(default = "default_timezone")]
    pub timezone: String,

    /// Directory that exports are written to
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

impl Default for EventHubConfig {
    fn default() -> Self {
        EventHubConfig {
            product_id: default_product_id(),
            uid_domain: default_uid_domain(),
            default_duration: default_duration(),
            timezone: default_timezone(),
            output_dir: default_output_dir(),
        }
    }
}

impl EventHubConfig {
    pub fn config_path() -> EventHubResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| EventHubError::Config("Could not determine config directory".into()))?
            .join("eventhub");

        Ok(config_dir.join("config.toml"))
    }

    /// Load the global config, creating a commented-out default file first
    /// if none exists yet.
    pub fn load() -> EventHubResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    /// Load config from an explicit path. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> EventHubResult<Self> {
        let config: EventHubConfig = Config::builder()
            .add_source(File::from(path.to_path_buf()).required(false))
            .build()
            .map_err(|e| EventHubError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| EventHubError::Config(e.to_string()))?;

        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Output directory with `~` expanded.
    pub fn output_path(&self) -> PathBuf {
        let full_path_str = shellexpand::tilde(&self.output_dir.to_string_lossy()).into_owned();

        PathBuf::from(full_path_str)
    }

    /// Validate the string settings and turn them into export options.
    pub fn export_options(&self) -> EventHubResult<ExportOptions> {
        Ok(ExportOptions {
            product_id: self.product_id.clone(),
            uid_domain: self.uid_domain.clone(),
            default_duration: parse_duration(&self.default_duration)?,
            timezone: parse_timezone(&self.timezone)?,
        })
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> EventHubResult<()> {
        let contents = format!(
            "\
# eventhub configuration

# Product name in the PRODID line of exported .ics files:
# product_id = \"{}\"

# Domain appended to event ids to build UIDs:
# uid_domain = \"{}\"

# Length of events that have no end time:
# default_duration = \"{}\"

# Time zone for timestamps without an offset and for CSV dates:
# timezone = \"{}\"

# Where exports are written:
# output_dir = \"{}\"
",
            DEFAULT_PRODUCT_ID,
            DEFAULT_UID_DOMAIN,
            DEFAULT_EVENT_DURATION,
            DEFAULT_TIMEZONE,
            DEFAULT_OUTPUT_DIR
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                EventHubError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| EventHubError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}

/// Parse a humantime duration such as "2h", "90m" or "1h 30m".
pub fn parse_duration(input: &str) -> EventHubResult<Duration> {
    let std_dur = humantime::parse_duration(input)
        .map_err(|e| EventHubError::Config(format!("Invalid duration '{}': {}", input, e)))?;
    let duration = Duration::from_std(std_dur)
        .map_err(|_| EventHubError::Config(format!("Duration too large: '{}'", input)))?;

    if duration.is_zero() {
        return Err(EventHubError::Config(format!(
            "Duration must be positive: '{}'",
            input
        )));
    }

    Ok(duration)
}

/// Parse an IANA time zone name such as "America/New_York".
pub fn parse_timezone(input: &str) -> EventHubResult<Tz> {
    input
        .trim()
        .parse()
        .map_err(|_| EventHubError::Config(format!("Unknown time zone '{}'", input)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = EventHubConfig::load_from(&dir.path().join("config.toml")).unwrap();

        assert_eq!(config.product_id, "EventMasterHub");
        assert_eq!(config.uid_domain, "eventmasterhub.com");
        assert_eq!(config.output_dir, PathBuf::from("."));

        let options = config.export_options().unwrap();
        assert_eq!(options.default_duration, Duration::hours(2));
        assert_eq!(options.timezone, Tz::UTC);
    }

    #[test]
    fn test_default_config_file_is_all_comments() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/eventhub/config.toml");

        EventHubConfig::create_default_config(&path).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("# default_duration = \"2h\""));

        let config = EventHubConfig::load_from(&path).unwrap();
        assert_eq!(config.timezone, "UTC");
    }

    #[test]
    fn test_file_values_override_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "product_id = \"Acme\"\ndefault_duration = \"90m\"\ntimezone = \"Europe/Berlin\"\noutput_dir = \"~/exports\"\n",
        )
        .unwrap();

        let config = EventHubConfig::load_from(&path).unwrap();
        let options = config.export_options().unwrap();

        assert_eq!(options.product_id, "Acme");
        assert_eq!(options.uid_domain, "eventmasterhub.com");
        assert_eq!(options.default_duration, Duration::minutes(90));
        assert_eq!(options.timezone, chrono_tz::Europe::Berlin);
        assert!(config.output_path().ends_with("exports"));
    }

    #[test]
    fn test_invalid_settings_are_config_errors() {
        let config = EventHubConfig {
            default_duration: "two hours".to_string(),
            ..EventHubConfig::default()
        };
        assert!(matches!(config.export_options(), Err(EventHubError::Config(_))));

        let config = EventHubConfig {
            timezone: "Mars/Olympus_Mons".to_string(),
            ..EventHubConfig::default()
        };
        assert!(matches!(config.export_options(), Err(EventHubError::Config(_))));

        assert!(parse_duration("0s").is_err());
    }
}
