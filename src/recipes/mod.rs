//! Recipe records: content, ingredients, reviews, and CRUD.

pub mod db;
pub mod handlers;
