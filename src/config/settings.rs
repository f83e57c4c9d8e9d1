use std::env;
use std::str::FromStr;

use config::{Config, ConfigError, File};
use dotenv::dotenv;
use secrecy::{ExposeSecret, SecretString};

use crate::config::jwt::JwtSettings;

/// Layered configuration: `configuration/base.yml`, then the per-environment
/// file, then `DATABASE__*` / `APP__*` variables, then the platform overrides
/// `DATABASE_URL` and `JWT_SECRET`.
#[derive(serde::Deserialize, Debug)]
pub struct Settings {
    pub database: DatabaseSettings,
    pub application: ApplicationSettings,
    pub jwt: TokenSettings,
}

#[derive(serde::Deserialize, Debug)]
pub struct ApplicationSettings {
    pub port: u16,
    pub host: String,
    pub log_level: String,
}

impl ApplicationSettings {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(serde::Deserialize, Debug)]
pub struct TokenSettings {
    pub secret: SecretString,
    #[serde(default = "TokenSettings::default_access_minutes")]
    pub access_token_minutes: i64,
    #[serde(default = "TokenSettings::default_refresh_days")]
    pub refresh_token_days: i64,
}

impl TokenSettings {
    fn default_access_minutes() -> i64 {
        15
    }

    fn default_refresh_days() -> i64 {
        7
    }
}

#[derive(serde::Deserialize, Debug)]
pub struct DatabaseSettings {
    pub user: String,
    pub password: SecretString,
    pub port: u16,
    pub host: String,
    pub db_name: String,
    #[serde(default)]
    pub db_url: Option<SecretString>,
}

impl DatabaseSettings {
    fn server_url(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}",
            self.user,
            self.password.expose_secret(),
            self.host,
            self.port
        )
    }

    /// Full URL of the league database; an explicit `db_url` wins
    pub fn connection_string(&self) -> SecretString {
        let url = match &self.db_url {
            Some(db_url) => db_url.expose_secret().to_string(),
            None => format!("{}/{}", self.server_url(), self.db_name),
        };
        SecretString::new(url.into_boxed_str())
    }

    /// Server URL without a database, used to create test databases
    pub fn connection_string_without_db(&self) -> SecretString {
        SecretString::new(self.server_url().into_boxed_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Local,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Production => "production",
        }
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            other => Err(format!(
                "{} is not a supported environment. Use either `local` or `production`.",
                other
            )),
        }
    }
}

pub fn get_config() -> Result<Settings, ConfigError> {
    dotenv().ok();

    let configuration_directory = env::current_dir()
        .map_err(|e| ConfigError::Message(format!("Failed to determine the current directory: {}", e)))?
        .join("configuration");

    let environment: Environment = env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| Environment::Local.as_str().into())
        .parse()
        .map_err(ConfigError::Message)?;

    let mut settings = Config::builder()
        .add_source(File::from(configuration_directory.join("base.yml")))
        .add_source(
            File::from(configuration_directory.join(format!("{}.yml", environment.as_str()))).required(false),
        )
        .add_source(
            config::Environment::default()
                .prefix("DATABASE")
                .prefix_separator("__")
                .separator("__")
                .keep_prefix(true),
        )
        .add_source(
            config::Environment::default()
                .prefix("APP")
                .prefix_separator("__")
                .separator("__"),
        )
        .build()?
        .try_deserialize::<Settings>()?;

    apply_platform_overrides(&mut settings);
    Ok(settings)
}

fn apply_platform_overrides(settings: &mut Settings) {
    if let Ok(db_url) = env::var("DATABASE_URL") {
        settings.database.db_url = Some(SecretString::new(db_url.into_boxed_str()));
    }
    if let Ok(jwt_secret) = env::var("JWT_SECRET") {
        settings.jwt.secret = SecretString::new(jwt_secret.into_boxed_str());
    }
}

pub fn get_jwt_settings(settings: &Settings) -> JwtSettings {
    JwtSettings::new(
        settings.jwt.secret.expose_secret().to_string(),
        settings.jwt.access_token_minutes,
        settings.jwt.refresh_token_days,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn database(db_url: Option<&str>) -> DatabaseSettings {
        DatabaseSettings {
            user: "postgres".into(),
            password: SecretString::new("pw".to_string().into_boxed_str()),
            port: 5432,
            host: "localhost".into(),
            db_name: "league".into(),
            db_url: db_url.map(|url| SecretString::new(url.to_string().into_boxed_str())),
        }
    }

    #[test]
    fn environment_names_are_case_insensitive() {
        assert_eq!("LOCAL".parse::<Environment>().unwrap(), Environment::Local);
        assert_eq!("production".parse::<Environment>().unwrap(), Environment::Production);
        assert!("staging".parse::<Environment>().is_err());
    }

    #[test]
    fn connection_string_prefers_explicit_url() {
        assert_eq!(
            database(None).connection_string().expose_secret(),
            "postgres://postgres:pw@localhost:5432/league"
        );
        assert_eq!(
            database(Some("postgres://elsewhere/db")).connection_string().expose_secret(),
            "postgres://elsewhere/db"
        );
        assert_eq!(
            database(None).connection_string_without_db().expose_secret(),
            "postgres://postgres:pw@localhost:5432"
        );
    }
}
