use std::sync::Arc;
use std::time::Duration;

use deadpool_postgres::Pool;

use crate::config::Config;
use crate::crypto::session::{SessionAuthenticator, SystemClock};
use crate::error::Result;
use crate::services::mailer::{Mailer, TracingMailer};

const SECONDS_PER_DAY: u64 = 24 * 60 * 60;

/// The application's state.
#[derive(Clone)]
pub struct AppState {
    /// The database connection pool.
    pub db: Pool,
    /// The application's configuration.
    pub config: Config,
    /// Issues and verifies admin session credentials.
    pub sessions: Arc<SessionAuthenticator>,
    /// The outbound mail transport.
    pub mailer: Arc<dyn Mailer>,
}

impl AppState {
    /// Creates a new `AppState` that logs outbound mail.
    ///
    /// The pool connects lazily, so this succeeds without a reachable database.
    pub fn new(config: &Config) -> Result<Self> {
        Self::with_mailer(config, Arc::new(TracingMailer))
    }

    /// Creates a new `AppState` around the given mail transport.
    pub fn with_mailer(config: &Config, mailer: Arc<dyn Mailer>) -> Result<Self> {
        let db = crate::db::create_pool(&config.database_url)?;
        tracing::info!("✅ PostgreSQL pool initialized with deadpool-postgres");

        let max_age =
            Duration::from_secs(config.session_max_age_days.max(1) as u64 * SECONDS_PER_DAY);
        let sessions = Arc::new(SessionAuthenticator::new(
            config.session_secret.clone(),
            config.environment,
            max_age,
            Arc::new(SystemClock),
        ));
        tracing::info!("✅ Session authenticator ready (lifetime {:?})", max_age);

        Ok(AppState {
            db,
            config: config.clone(),
            sessions,
            mailer,
        })
    }
}
