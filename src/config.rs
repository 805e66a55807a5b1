use anyhow::Context;
use tracing::info;

pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub allowed_origin: Option<String>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")
            .context("DATABASE_URL must be set to a production Postgres instance")?;

        let port = match std::env::var("PORT") {
            Ok(raw) => raw.parse().context("PORT must be a valid port number")?,
            Err(_) => {
                info!("PORT not set, using default 8080");
                8080
            }
        };

        let allowed_origin = std::env::var("ALLOWED_ORIGIN").ok();
        if allowed_origin.is_none() {
            info!("ALLOWED_ORIGIN not set, allowing any origin");
        }

        Ok(Self {
            database_url,
            port,
            allowed_origin,
        })
    }
}
