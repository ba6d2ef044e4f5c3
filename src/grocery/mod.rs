//! Per-user grocery lists with quantity-merging inserts.

pub mod db;
pub mod handlers;
