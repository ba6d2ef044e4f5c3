//! Read-only feed and aggregation views over recipes.

pub mod handlers;
pub mod service;
