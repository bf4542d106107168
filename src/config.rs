use crate::whatsapp::DEFAULT_NUMBER;
use std::{env, path::PathBuf};

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub data_dir: PathBuf,
    pub seed_path: PathBuf,
    pub whatsapp_number: String,
}

impl Config {
    pub fn from_env() -> Self {
        let port = env::var("PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(8080);

        Self {
            port,
            data_dir: env_path("APP_DATA_DIR", "data"),
            seed_path: env_path("APP_SEED_PATH", "static/analytics.json"),
            whatsapp_number: env::var("WHATSAPP_NUMBER")
                .ok()
                .filter(|value| !value.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_NUMBER.to_string()),
        }
    }
}

fn env_path(name: &str, default: &str) -> PathBuf {
    env::var(name)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(default))
}
