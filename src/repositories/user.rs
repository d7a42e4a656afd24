use deadpool_postgres::Pool;
use uuid::Uuid;
use crate::{
    db::conflict_on_unique,
    error::Result,
    models::user::User,
};

/// Creates a new admin user.
pub async fn create_user(
    pool: &Pool,
    email: &str,
    name: Option<&str>,
    password_hash: &str,
) -> Result<User> {
    let client = pool.get().await?;
    let row = client
        .query_one(
            r#"
            INSERT INTO users (email, name, password)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
            &[&email, &name, &password_hash],
        )
        .await
        .map_err(|e| conflict_on_unique(e, "A user with this email already exists"))?;
    User::try_from(&row)
}

/// Finds a user by their email address. Matching is case-insensitive.
pub async fn find_by_email(pool: &Pool, email: &str) -> Result<Option<User>> {
    let client = pool.get().await?;
    let row = client
        .query_opt(
            r#"
            SELECT *
            FROM users
            WHERE lower(email) = lower($1)
            "#,
            &[&email],
        )
        .await?;
    row.as_ref().map(User::try_from).transpose()
}

/// Finds a user by their ID.
pub async fn find_by_id(pool: &Pool, user_id: &Uuid) -> Result<Option<User>> {
    let client = pool.get().await?;
    let row = client
        .query_opt(
            r#"
            SELECT *
            FROM users
            WHERE id = $1
            "#,
            &[user_id],
        )
        .await?;
    row.as_ref().map(User::try_from).transpose()
}
