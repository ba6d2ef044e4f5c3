//! Authentication: JWT tokens and the register/login/profile handlers.

pub mod handlers;
pub mod tokens;
