use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub app_id: String,
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();

        Self {
            app_id: env::var("APP_ID").unwrap_or_else(|_| "default-app-id".to_string()),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        }
    }
}
