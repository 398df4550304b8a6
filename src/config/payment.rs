//! Payment gateway credentials from environment variables.
//!
//! The secret key is loaded directly before use and never persisted in any
//! configuration file.

use crate::errors::{Error, Result};
use crate::gateway;

/// Settings for the payment gateway client.
#[derive(Clone, Debug)]
pub struct PaymentConfig {
    /// Gateway secret key (`TOSS_SECRET_KEY`)
    pub secret_key: String,
    /// API base URL, overridable for sandboxes (`TOSS_API_BASE_URL`)
    pub api_base_url: String,
}

impl PaymentConfig {
    /// Loads the gateway settings from the environment.
    ///
    /// A missing secret key is a configuration error; the base URL falls
    /// back to the production API.
    pub fn from_env() -> Result<Self> {
        let secret_key = std::env::var("TOSS_SECRET_KEY").map_err(|_| Error::Config {
            message: "TOSS_SECRET_KEY is not set".to_string(),
        })?;

        let api_base_url = std::env::var("TOSS_API_BASE_URL")
            .unwrap_or_else(|_| gateway::API_BASE_URL.to_string());

        Ok(Self {
            secret_key,
            api_base_url,
        })
    }
}
