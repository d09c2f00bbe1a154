use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct UsernameRow {
    pub username: String,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct EmailRow {
    pub email: String,
}

/// Personal data shown on the profile page.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ProfileRow {
    pub username: String,
    pub email: String,
    pub phone: Option<String>,
    #[serde(rename = "profilePicture")]
    pub profile_picture: Option<String>,
    #[serde(rename = "emailVerified")]
    pub email_verified: bool,
}

/// One (user, shared interest) pair from the like-minds query; grouped per
/// username by the services layer.
#[derive(Debug, Clone, FromRow)]
pub struct LikeMindRow {
    pub username: String,
    pub profile_picture: Option<String>,
    pub interest: String,
}

/// The current user's own identity data attached to the front-page response.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct IdentityRow {
    pub username: String,
    #[serde(rename = "profilePicture")]
    pub profile_picture: Option<String>,
}
