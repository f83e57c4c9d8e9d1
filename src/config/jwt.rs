use chrono::Duration;
use secrecy::SecretString;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct JwtSettings {
    pub secret: SecretString,
    pub access_token_minutes: i64,
    pub refresh_token_days: i64,
}

impl JwtSettings {
    pub fn new(secret: String, access_token_minutes: i64, refresh_token_days: i64) -> Self {
        Self {
            secret: SecretString::new(secret.into_boxed_str()),
            access_token_minutes,
            refresh_token_days,
        }
    }

    pub fn access_token_ttl(&self) -> Duration {
        Duration::minutes(self.access_token_minutes)
    }

    pub fn refresh_token_ttl(&self) -> Duration {
        Duration::days(self.refresh_token_days)
    }
}
