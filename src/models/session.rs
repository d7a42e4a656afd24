use serde::Serialize;
use uuid::Uuid;

use crate::models::user::User;

/// The admin behind an authenticated request.
///
/// Re-read from the user store on every request; the session credential
/// carries only the identifier.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdminUser {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
}

impl From<User> for AdminUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
        }
    }
}
