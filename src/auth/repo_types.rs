use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub phone: Option<String>,
    pub profile_picture: Option<String>,
    pub email_verified: bool,
    pub created_at: OffsetDateTime,
}

/// Token row behind email verification links. Consuming a token deletes the
/// row, so a link can never verify twice.
#[derive(Debug, Clone, FromRow)]
pub struct EmailVerificationHash {
    pub hash: String,
    pub email: String,
    pub created_at: OffsetDateTime,
}
