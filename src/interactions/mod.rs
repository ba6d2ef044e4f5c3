//! The interaction service: like/save/review/follow/made-it toggles with
//! their counter maintenance and notification side effects.

pub mod handlers;
pub mod service;
