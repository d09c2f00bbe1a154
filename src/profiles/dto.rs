use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::profiles::repo_types::{IdentityRow, ProfileRow};

#[derive(Debug, Deserialize)]
pub struct UpdateUsernameRequest {
    pub username: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateEmailRequest {
    pub email: String,
}

/// Profile page payload: personal data plus the user's interest labels.
#[derive(Debug, Serialize)]
pub struct ProfileView {
    #[serde(rename = "profileData")]
    pub profile_data: ProfileRow,
    pub interests: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrontPageEntry {
    #[serde(rename = "profilePicture")]
    pub profile_picture: Option<String>,
    /// Interest labels shared with the current user.
    pub interests: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct FrontPage {
    #[serde(rename = "frontPage")]
    pub front_page: HashMap<String, FrontPageEntry>,
}

/// `{userData: ..., result: {frontPage: {...}}}`
#[derive(Debug, Serialize)]
pub struct FrontPageResponse {
    #[serde(rename = "userData")]
    pub user_data: IdentityRow,
    pub result: FrontPage,
}

#[derive(Debug, Deserialize)]
pub struct ValidateParams {
    pub column: String,
    pub value: String,
}

#[derive(Debug, Deserialize)]
pub struct UserDetailsParams {
    pub username: String,
}
