use std::env;

use anyhow::{Context, Result};

/// Runtime configuration. The whole surface is the store connection string
/// and the listen port; sessions are server-side rows, so there is no cookie
/// signing secret.
pub struct AppConfig {
    pub database_url: String,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let database_url = env::var("DATABASE_URL").context("DATABASE_URL env var is missing")?;

        let port = match env::var("PORT") {
            Ok(raw) => raw
                .parse()
                .with_context(|| format!("PORT is not a valid port number: {raw}"))?,
            Err(_) => 8080,
        };

        Ok(Self { database_url, port })
    }
}
