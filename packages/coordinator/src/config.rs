use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the hosted backend project.
    pub platform_url: String,
    /// Publishable (anon) API key for the hosted backend.
    pub platform_anon_key: String,
    /// How many days ahead pickup slots are offered.
    pub pickup_horizon_days: u32,
    /// Length of a bookable pickup slot, in minutes.
    pub slot_minutes: u32,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            platform_url: env::var("PLATFORM_URL").context("PLATFORM_URL must be set")?,
            platform_anon_key: env::var("PLATFORM_ANON_KEY")
                .context("PLATFORM_ANON_KEY must be set")?,
            pickup_horizon_days: env::var("PICKUP_HORIZON_DAYS")
                .unwrap_or_else(|_| "7".to_string())
                .parse()
                .context("PICKUP_HORIZON_DAYS must be a valid number")?,
            slot_minutes: env::var("SLOT_MINUTES")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .context("SLOT_MINUTES must be a valid number")?,
        })
    }
}
