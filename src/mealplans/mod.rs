//! One meal plan per user, upserted as a whole document.

pub mod db;
pub mod handlers;
