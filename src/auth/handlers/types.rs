/**
 * Authentication Handler Types
 *
 * Request and response types shared by the register, login, and profile
 * handlers.
 */

use serde::{Deserialize, Serialize};

use crate::users::db::User;

/// Registration request.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    /// User's email address (unique)
    pub email: String,
    /// Plain password; hashed with bcrypt before storage
    pub password: String,
}

/// Login request.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Returned by login: the bearer token plus the user it authenticates.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

/// Partial profile update; omitted fields are left unchanged.
#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileImageRequest {
    pub image_uri: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpoTokenRequest {
    pub expo_token: Option<String>,
}
