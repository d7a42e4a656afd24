use std::future::Future;

use deadpool_postgres::Pool;
use uuid::Uuid;

use crate::crypto::password::{verify_password, verify_unmatchable};
use crate::crypto::session::SessionAuthenticator;
use crate::error::{AppError, Result};
use crate::models::session::AdminUser;
use crate::repositories::user as user_repo;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Resolves the admin a session credential names.
pub trait UserLookup: Send + Sync {
    fn find_admin(&self, id: Uuid) -> impl Future<Output = Result<Option<AdminUser>>> + Send;
}

impl UserLookup for Pool {
    async fn find_admin(&self, id: Uuid) -> Result<Option<AdminUser>> {
        Ok(user_repo::find_by_id(self, &id).await?.map(AdminUser::from))
    }
}

/// Checks email and password, then mints a session credential.
///
/// An unknown email and a wrong password fail with the same error and
/// both pay for one Argon2 verification.
pub async fn login(
    pool: &Pool,
    sessions: &SessionAuthenticator,
    email: &str,
    password: &str,
) -> Result<(AdminUser, String)> {
    tracing::debug!("🔐 Login attempt for: {}", email);

    let Some(user) = user_repo::find_by_email(pool, email).await? else {
        verify_unmatchable(password);
        return Err(AppError::Authentication(INVALID_CREDENTIALS.to_string()));
    };

    if !verify_password(password, &user.password)? {
        return Err(AppError::Authentication(INVALID_CREDENTIALS.to_string()));
    }

    let token = sessions.issue(&user.id.to_string())?;
    tracing::info!("✅ Admin logged in: {}", user.id);

    Ok((AdminUser::from(user), token))
}

/// Turns an optional credential into the admin it belongs to.
///
/// Missing, forged or expired credentials and credentials whose user has
/// been deleted all yield `AppError::Unauthorized`.
pub async fn authorize<L: UserLookup>(
    sessions: &SessionAuthenticator,
    users: &L,
    token: Option<&str>,
) -> Result<AdminUser> {
    let subject = token
        .and_then(|t| sessions.verify(t))
        .ok_or(AppError::Unauthorized)?;

    let id = Uuid::parse_str(&subject).map_err(|_| {
        tracing::debug!("session rejected: subject is not a user id");
        AppError::Unauthorized
    })?;

    users.find_admin(id).await?.ok_or_else(|| {
        tracing::warn!("❌ Session names a user that no longer exists: {}", id);
        AppError::Unauthorized
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Environment;
    use crate::crypto::session::{DEFAULT_MAX_AGE, SystemClock};
    use std::collections::HashMap;
    use std::sync::Arc;
    use zeroize::Zeroizing;

    struct InMemoryUsers(HashMap<Uuid, AdminUser>);

    impl UserLookup for InMemoryUsers {
        async fn find_admin(&self, id: Uuid) -> Result<Option<AdminUser>> {
            Ok(self.0.get(&id).cloned())
        }
    }

    fn sessions() -> SessionAuthenticator {
        SessionAuthenticator::new(
            Some(Zeroizing::new(b"0123456789abcdef0123456789abcdef".to_vec())),
            Environment::Test,
            DEFAULT_MAX_AGE,
            Arc::new(SystemClock),
        )
    }

    fn admin() -> AdminUser {
        AdminUser {
            id: Uuid::new_v4(),
            email: "admin@surgicalcoders.com".to_string(),
            name: Some("Admin".to_string()),
        }
    }

    #[tokio::test]
    async fn valid_credential_yields_the_admin() {
        let sessions = sessions();
        let admin = admin();
        let users = InMemoryUsers(HashMap::from([(admin.id, admin.clone())]));
        let token = sessions.issue(&admin.id.to_string()).unwrap();

        let found = authorize(&sessions, &users, Some(&token)).await.unwrap();
        assert_eq!(found, admin);
    }

    #[tokio::test]
    async fn missing_or_forged_credentials_are_unauthorized() {
        let sessions = sessions();
        let users = InMemoryUsers(HashMap::new());

        assert!(matches!(
            authorize(&sessions, &users, None).await,
            Err(AppError::Unauthorized)
        ));
        assert!(matches!(
            authorize(&sessions, &users, Some("v1.forged")).await,
            Err(AppError::Unauthorized)
        ));
    }

    #[tokio::test]
    async fn non_uuid_subject_is_unauthorized() {
        let sessions = sessions();
        let users = InMemoryUsers(HashMap::new());
        let token = sessions.issue("not-a-uuid").unwrap();

        assert!(matches!(
            authorize(&sessions, &users, Some(&token)).await,
            Err(AppError::Unauthorized)
        ));
    }

    #[tokio::test]
    async fn deleted_user_is_unauthorized() {
        let sessions = sessions();
        let users = InMemoryUsers(HashMap::new());
        let token = sessions.issue(&Uuid::new_v4().to_string()).unwrap();

        assert!(matches!(
            authorize(&sessions, &users, Some(&token)).await,
            Err(AppError::Unauthorized)
        ));
    }
}
