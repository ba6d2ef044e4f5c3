/**
 * Tastebud - Recipe Sharing Backend
 *
 * A REST API for a recipe-sharing app: users register, browse and search
 * recipes, like/save/review them, follow other users, plan meals, and
 * maintain a grocery list.
 *
 * # Architecture
 *
 * - `server` - configuration, shared state, and app initialization
 * - `routes` - the axum router and route tables
 * - `middleware` - bearer-token authentication
 * - `auth` - JWT tokens plus register/login/profile handlers
 * - `users` - user records and the follow edge table
 * - `recipes` - recipe records, ingredients, reviews, CRUD
 * - `interactions` - like/save/review/follow/made-it toggles and their
 *   counter and notification side effects
 * - `feed` - read-only ranked and joined views (search, week, popular,
 *   suggestions, per-user collections)
 * - `notifications` - notification records and best-effort push dispatch
 * - `grocery`, `mealplans` - per-user grocery list and weekly meal plan
 * - `error` - the request error taxonomy and response mapping
 */

pub mod auth;
pub mod error;
pub mod feed;
pub mod grocery;
pub mod interactions;
pub mod mealplans;
pub mod middleware;
pub mod notifications;
pub mod recipes;
pub mod routes;
pub mod server;
pub mod users;
