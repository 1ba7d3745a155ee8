use anyhow::Context;
use chrono::FixedOffset;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Deserialize, Serialize, Default, Debug, Clone)]
#[serde(default)]
pub struct Configuration {
    pub database: DatabaseConfig,
    pub server: ServerSection,
    pub calendar: CalendarConfig,
}

impl Configuration {
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let config = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read configuration at {}", path.display()))?;
        Self::parse(&config)
    }

    pub fn parse(raw: &str) -> anyhow::Result<Self> {
        let cfg: Self = toml::from_str(raw).context("invalid configuration file")?;
        Ok(cfg)
    }
}

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Directory holding `db.sqlite`.
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        DatabaseConfig {
            path: String::from("data"),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(default)]
pub struct ServerSection {
    pub host: String,
    pub port: u16,
    pub log_level: String,
}

impl Default for ServerSection {
    fn default() -> Self {
        ServerSection {
            host: String::from("0.0.0.0"),
            port: 8080,
            log_level: String::from("info"),
        }
    }
}

#[derive(Deserialize, Serialize, Default, Debug, Clone, Copy)]
#[serde(default)]
pub struct CalendarConfig {
    /// Offset (minutes east of UTC) of the clients posting calendar timestamps.
    pub utc_offset_minutes: i32,
}

impl CalendarConfig {
    pub fn client_offset(&self) -> anyhow::Result<FixedOffset> {
        FixedOffset::east_opt(self.utc_offset_minutes * 60).with_context(|| {
            format!(
                "calendar.utc_offset_minutes out of range: {}",
                self.utc_offset_minutes
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let cfg = Configuration::parse("[database]\npath = \"/tmp/fyyur\"\n").unwrap();
        assert_eq!(cfg.database.path, "/tmp/fyyur");
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.server.log_level, "info");
        assert_eq!(cfg.calendar.utc_offset_minutes, 0);
    }

    #[test]
    fn reads_every_section() {
        let raw = r#"
            [database]
            path = "db"

            [server]
            host = "127.0.0.1"
            port = 5000
            log_level = "debug"

            [calendar]
            utc_offset_minutes = 120
        "#;
        let cfg = Configuration::parse(raw).unwrap();
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.server.port, 5000);
        assert_eq!(
            cfg.calendar.client_offset().unwrap(),
            FixedOffset::east_opt(7200).unwrap()
        );
    }

    #[test]
    fn rejects_out_of_range_offset() {
        let cfg = CalendarConfig {
            utc_offset_minutes: 24 * 60,
        };
        assert!(cfg.client_offset().is_err());
    }
}
