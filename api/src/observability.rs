use anyhow::Result;
use dotenv::dotenv;
use prometheus::Registry;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::metrics;

pub struct Observability {
    pub registry: Registry,
}

impl Observability {
    /// Install the tracing subscriber and build the metrics registry
    pub fn init() -> Result<Self> {
        // Load environment variables
        dotenv().ok();

        let registry = Self::registry()?;

        let env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "api=debug,shared=info".into());
        let json = std::env::var("LOG_FORMAT")
            .map(|format| format.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        let subscriber = tracing_subscriber::registry().with(env_filter);
        if json {
            subscriber.with(tracing_subscriber::fmt::layer().json()).try_init()?;
        } else {
            subscriber.with(tracing_subscriber::fmt::layer()).try_init()?;
        }

        tracing::info!(json, "Observability stack initialized");
        Ok(Self { registry })
    }

    /// Metrics registry with every collector registered under the `wayfarer` prefix
    pub fn registry() -> Result<Registry> {
        let registry = Registry::new_custom(Some("wayfarer".into()), None)?;
        metrics::register_all(&registry)?;
        Ok(registry)
    }
}
