//! User records and the follow relationship.

pub mod db;
