use config::{Config, ConfigError, Environment, File};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer};
use serde_aux::field_attributes::{
    deserialize_number_from_string, deserialize_option_number_from_string,
};

#[derive(Debug, thiserror::Error)]
#[error("Failed to load settings: {0}")]
pub struct SettingsError(#[from] ConfigError);

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub database: DatabaseSettings,
    #[serde(default)]
    pub quiz: QuizSettings,
}

#[derive(Debug, Deserialize)]
pub struct ApplicationSettings {
    pub host: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
}

impl ApplicationSettings {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Deserialize)]
pub struct DatabaseSettings {
    #[serde(deserialize_with = "deserialize_secret")]
    pub url: SecretString,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub max_connections: u32,
}

impl DatabaseSettings {
    pub fn new(url: &str, max_connections: u32) -> Self {
        Self {
            url: SecretString::from(url.to_owned()),
            max_connections,
        }
    }

    /// Single-connection in-memory database, every pooled connection to
    /// `:memory:` would otherwise see its own empty schema.
    pub fn in_memory() -> Self {
        Self::new("sqlite::memory:", 1)
    }

    pub fn url(&self) -> &str {
        self.url.expose_secret()
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct QuizSettings {
    /// Fixed seed for the quiz selector, random questions become reproducible.
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    pub seed: Option<u64>,
}

fn deserialize_secret<'de, D>(deserializer: D) -> Result<SecretString, D::Error>
where
    D: Deserializer<'de>,
{
    String::deserialize(deserializer).map(SecretString::from)
}

impl Settings {
    /// Defaults, then `trivia.toml` if present, then `TRIVIA_*` variables
    /// (`TRIVIA_DATABASE__URL`, `TRIVIA_APPLICATION__PORT`, ...).
    pub fn load() -> Result<Self, SettingsError> {
        dotenv::dotenv().ok();
        let settings = Self::builder()?
            .add_source(File::with_name("trivia").required(false))
            .add_source(Environment::with_prefix("TRIVIA").separator("__"))
            .build()?;
        Ok(settings.try_deserialize()?)
    }

    fn builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Config::builder()
            .set_default("application.host", "0.0.0.0")?
            .set_default("application.port", 8080)?
            .set_default("database.url", "sqlite:trivia.db")?
            .set_default("database.max_connections", 5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_complete() {
        let settings: Settings = Settings::builder()
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(settings.application.address(), "0.0.0.0:8080");
        assert_eq!(settings.database.url(), "sqlite:trivia.db");
        assert_eq!(settings.database.max_connections, 5);
        assert_eq!(settings.quiz.seed, None);
    }

    #[test]
    fn string_values_override_numbers() {
        let settings: Settings = Settings::builder()
            .unwrap()
            .set_override("application.port", "3000")
            .unwrap()
            .set_override("quiz.seed", 42)
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(settings.application.port, 3000);
        assert_eq!(settings.quiz.seed, Some(42));
    }

    #[test]
    fn database_url_is_redacted_in_debug() {
        let database = DatabaseSettings::new("sqlite:/secret/path.db", 1);
        assert!(!format!("{database:?}").contains("/secret/path.db"));
    }
}
