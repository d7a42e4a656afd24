//! Creates the initial admin account.
//!
//! Reads `ADMIN_EMAIL` (default `admin@surgicalcoders.com`) and
//! `ADMIN_PASSWORD`. Does nothing when the account already exists.

use medcode_site::{
    config::Config,
    crypto::password::hash_password,
    db,
    repositories::user as user_repo,
    validation::auth::{normalize_email, validate_password},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use zeroize::Zeroizing;

const DEFAULT_ADMIN_EMAIL: &str = "admin@surgicalcoders.com";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    let email = normalize_email(
        &std::env::var("ADMIN_EMAIL").unwrap_or_else(|_| DEFAULT_ADMIN_EMAIL.to_string()),
    );
    let password = Zeroizing::new(
        std::env::var("ADMIN_PASSWORD")
            .map_err(|_| anyhow::anyhow!("ADMIN_PASSWORD must be set"))?,
    );
    validate_password(&password)?;

    let pool = db::create_pool(&config.database_url)?;
    db::migrate(&pool).await?;

    if user_repo::find_by_email(&pool, &email).await?.is_some() {
        tracing::info!("ℹ️ Admin {} already exists, nothing to do", email);
        return Ok(());
    }

    let hash = hash_password(&password)?;
    let user = user_repo::create_user(&pool, &email, Some("Admin"), &hash).await?;
    tracing::info!("✅ Admin user created: {} ({})", user.email, user.id);

    Ok(())
}
