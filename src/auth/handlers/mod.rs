//! Authentication and profile HTTP handlers.
//!
//! - `register` - POST /api/users/register
//! - `login` - POST /api/users/login
//! - profile handlers - GET /api/users/{user_id} and the authed updates

pub mod login;
pub mod profile;
pub mod register;
pub mod types;

pub use login::login;
pub use profile::{
    get_me, get_user_profile, update_user_expo_token, update_user_profile,
    update_user_profile_image,
};
pub use register::register;
pub use types::{AuthResponse, LoginRequest, RegisterRequest};
