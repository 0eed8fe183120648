use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::config::AppConfig;
use crate::email::{LogMailer, Mailer, SmtpMailer};
use crate::ratelimit::RateLimiter;

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Arc<AppConfig>,
    pub mailer: Arc<dyn Mailer>,
    pub http: reqwest::Client,
    pub rate_limiter: Arc<RateLimiter>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let db = PgPoolOptions::new()
            .max_connections(10)
            .connect(&config.database_url)
            .await
            .context("connect to database")?;

        let mailer: Arc<dyn Mailer> = match &config.smtp {
            Some(smtp) => Arc::new(SmtpMailer::new(smtp)?),
            None => {
                tracing::warn!("SMTP not configured, verification codes will be logged");
                Arc::new(LogMailer)
            }
        };

        // Per-request timeouts for the proxy endpoints are set at call sites;
        // this is the outer cap.
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .context("build http client")?;

        let rate_limiter = Arc::new(RateLimiter::new(
            Duration::from_secs(config.rate_limit.window_seconds),
            config.rate_limit.max_requests,
        ));

        Ok(Self {
            db,
            config,
            mailer,
            http,
            rate_limiter,
        })
    }

    #[cfg(test)]
    pub fn fake() -> Self {
        let config = Arc::new(AppConfig::for_tests());
        // Lazy pool so unit tests never touch a real database.
        let db = PgPoolOptions::new()
            .connect_lazy(&config.database_url)
            .expect("lazy pool should construct");
        let rate_limiter = Arc::new(RateLimiter::new(
            Duration::from_secs(config.rate_limit.window_seconds),
            config.rate_limit.max_requests,
        ));
        Self {
            db,
            config,
            mailer: Arc::new(LogMailer),
            http: reqwest::Client::new(),
            rate_limiter,
        }
    }
}
