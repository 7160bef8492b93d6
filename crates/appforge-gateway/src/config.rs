use anyhow::{bail, Context};
use std::net::SocketAddr;
use std::time::Duration;

/// Environment-level configuration, read once at bootstrap. The core never
/// sees these values directly; they are handed to the store and gateway as
/// opaque inputs.
#[derive(Clone, Debug)]
pub struct GatewayConfig {
    pub listen: SocketAddr,
    pub openai_api_key: String,
    pub openai_model: String,
    pub openai_base_url: Option<String>,
    pub openai_timeout: Duration,
}

impl GatewayConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let listen = std::env::var("APPFORGE_LISTEN")
            .unwrap_or_else(|_| "127.0.0.1:8080".into())
            .parse()
            .context("APPFORGE_LISTEN is not a valid socket address")?;

        let openai_api_key = match std::env::var("OPENAI_API_KEY") {
            Ok(key) if !key.is_empty() => key,
            _ => bail!("OPENAI_API_KEY must be set"),
        };

        let openai_model =
            std::env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4o-mini".into());
        let openai_base_url = std::env::var("OPENAI_BASE_URL").ok();

        let timeout_secs = match std::env::var("OPENAI_TIMEOUT_SECS") {
            Ok(raw) => raw
                .parse::<u64>()
                .context("OPENAI_TIMEOUT_SECS is not a number")?,
            Err(_) => 30,
        };

        Ok(Self {
            listen,
            openai_api_key,
            openai_model,
            openai_base_url,
            openai_timeout: Duration::from_secs(timeout_secs),
        })
    }
}
