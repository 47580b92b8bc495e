//! Handles settings for the application. Configuration is written in
//! `settings.toml` and every key can be overridden from the environment,
//! e.g. `PROJECTLEDGER__SERVER__PORT=8080`.
//!
//! See `settings.toml` for the configuration.
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct App {
    pub level: String,
}

#[derive(Debug, Deserialize)]
pub struct Server {
    pub bind: Option<String>,
    pub port: u16,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    #[default]
    Memory,
    Sqlite(String),
}

impl Database {
    pub fn url(&self) -> String {
        match self {
            Database::Memory => String::from("sqlite::memory:"),
            Database::Sqlite(path) => format!("sqlite:{path}?mode=rwc"),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub app: App,
    /// Without it the application migrates the database and exits.
    pub server: Option<Server>,
    #[serde(default)]
    pub database: Database,
}

impl Settings {
    pub fn new(path: &str) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .set_default("app.level", "info")?
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix("PROJECTLEDGER")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(toml: &str) -> Settings {
        Config::builder()
            .add_source(File::from_str(toml, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn sqlite_database_with_server() {
        let settings = parse(
            r#"
            [app]
            level = "debug"

            [server]
            bind = "0.0.0.0"
            port = 3000

            [database]
            sqlite = "ledger.db"
            "#,
        );

        assert_eq!(settings.app.level, "debug");
        let server = settings.server.unwrap();
        assert_eq!(server.port, 3000);
        assert_eq!(server.bind.as_deref(), Some("0.0.0.0"));
        assert_eq!(settings.database.url(), "sqlite:ledger.db?mode=rwc");
    }

    #[test]
    fn missing_sections_fall_back() {
        let settings = parse(
            r#"
            [app]
            level = "info"
            "#,
        );

        assert!(settings.server.is_none());
        assert_eq!(settings.database.url(), "sqlite::memory:");
    }
}
