use chrono::{Duration, NaiveTime};
use chrono_tz::Tz;
use std::collections::HashMap;
use std::env;
use std::fs;

use crate::service::slot_service::SlotConfig;

pub const DEFAULT_TIMEZONE: &str = "Asia/Tehran";
pub const DEFAULT_EVENT_DURATION_MINUTES: i64 = 60;
pub const DEFAULT_PORT: u16 = 8080;

/// Flat key=value configuration loaded from an optional file, with the
/// process environment as fallback for every key.
#[derive(Debug, Default, Clone)]
pub struct AppConfig {
    values: HashMap<String, String>,
}

impl AppConfig {
    pub fn from_file(path: &str) -> Result<Self, String> {
        let content = fs::read_to_string(path).map_err(|e| e.to_string())?;
        let mut values = HashMap::new();
        for (idx, line) in content.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let trimmed = trimmed.strip_prefix("export ").unwrap_or(trimmed);
            let Some((key, value)) = trimmed.split_once('=') else {
                return Err(format!("Invalid config line {}: {}", idx + 1, line));
            };
            values.insert(key.trim().to_string(), strip_quotes(value.trim()).to_string());
        }
        Ok(Self { values })
    }

    /// File value first, then the environment.
    pub fn get(&self, key: &str) -> Option<String> {
        self.values
            .get(key)
            .cloned()
            .or_else(|| env::var(key).ok())
    }

    pub fn timezone(&self) -> Result<Tz, String> {
        let name = self
            .get("CALENDAR_TIMEZONE")
            .unwrap_or(DEFAULT_TIMEZONE.to_string());
        name.parse::<Tz>()
            .map_err(|_| format!("Unknown timezone: {}", name))
    }

    pub fn event_duration(&self) -> Result<Duration, String> {
        let minutes = match self.get("EVENT_DURATION_MINUTES") {
            Some(raw) => raw
                .parse::<i64>()
                .map_err(|_| format!("Invalid EVENT_DURATION_MINUTES: {}", raw))?,
            None => DEFAULT_EVENT_DURATION_MINUTES,
        };
        Ok(Duration::minutes(minutes))
    }

    pub fn slot_config(&self) -> Result<SlotConfig, String> {
        let defaults = SlotConfig::default();
        let work_start = match self.get("WORK_DAY_START") {
            Some(raw) => parse_work_time("WORK_DAY_START", &raw)?,
            None => defaults.work_start,
        };
        let work_end = match self.get("WORK_DAY_END") {
            Some(raw) => parse_work_time("WORK_DAY_END", &raw)?,
            None => defaults.work_end,
        };
        let granularity = match self.get("SLOT_GRANULARITY_MINUTES") {
            Some(raw) => Duration::minutes(
                raw.parse::<i64>()
                    .map_err(|_| format!("Invalid SLOT_GRANULARITY_MINUTES: {}", raw))?,
            ),
            None => defaults.granularity,
        };
        Ok(SlotConfig {
            work_start,
            work_end,
            granularity,
        })
    }

    pub fn port(&self) -> Result<u16, String> {
        match self.get("PORT") {
            Some(raw) => raw.parse::<u16>().map_err(|_| format!("Invalid PORT: {}", raw)),
            None => Ok(DEFAULT_PORT),
        }
    }
}

fn parse_work_time(key: &str, raw: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(raw, "%H:%M").map_err(|_| format!("Invalid {}: {}", key, raw))
}

fn strip_quotes(value: &str) -> &str {
    if value.len() >= 2
        && ((value.starts_with('"') && value.ends_with('"'))
            || (value.starts_with('\'') && value.ends_with('\'')))
    {
        &value[1..value.len() - 1]
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::Asia::Tehran;
    use std::io::Write;

    fn write_config(content: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("assistant_cfg_{}.env", uuid::Uuid::new_v4()));
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn parses_quoted_values_and_comments() {
        let path = write_config(
            "# assistant config\nexport OPENAI_API_KEY=\"sk-test\"\nCALENDAR_TIMEZONE='Asia/Tehran'\n",
        );
        let config = AppConfig::from_file(path.to_str().unwrap()).unwrap();
        assert_eq!(config.get("OPENAI_API_KEY"), Some("sk-test".to_string()));
        assert_eq!(config.timezone().unwrap(), Tehran);
    }

    #[test]
    fn rejects_lines_without_separator() {
        let path = write_config("OPENAI_API_KEY\n");
        assert!(AppConfig::from_file(path.to_str().unwrap()).is_err());
    }

    #[test]
    fn defaults_cover_missing_keys() {
        let config = AppConfig::default();
        assert_eq!(config.event_duration().unwrap(), Duration::minutes(60));
        assert_eq!(config.port().unwrap(), DEFAULT_PORT);
        let slots = config.slot_config().unwrap();
        assert_eq!(slots.work_start, NaiveTime::from_hms_opt(9, 0, 0).unwrap());
        assert_eq!(slots.work_end, NaiveTime::from_hms_opt(17, 0, 0).unwrap());
    }

    #[test]
    fn slot_config_reads_overrides() {
        let path = write_config(
            "WORK_DAY_START=08:00\nWORK_DAY_END=14:00\nSLOT_GRANULARITY_MINUTES=30\n",
        );
        let config = AppConfig::from_file(path.to_str().unwrap()).unwrap();
        let slots = config.slot_config().unwrap();
        assert_eq!(slots.work_start, NaiveTime::from_hms_opt(8, 0, 0).unwrap());
        assert_eq!(slots.work_end, NaiveTime::from_hms_opt(14, 0, 0).unwrap());
        assert_eq!(slots.granularity, Duration::minutes(30));
    }
}
