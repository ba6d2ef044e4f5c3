/**
 * API Route Configuration
 *
 * Two route groups:
 *
 * - Public: registration, login, public profiles, recipe browsing and
 *   search. Recipe mutations share these paths; their handlers demand
 *   `AuthUser` directly.
 * - Protected: everything touching the caller's own data. The whole
 *   group sits behind the bearer-token middleware.
 */

use axum::routing::{delete, get, post, put};
use axum::{middleware, Router};

use crate::auth::handlers::{
    get_me, get_user_profile, login, register, update_user_expo_token, update_user_profile,
    update_user_profile_image,
};
use crate::feed::handlers::{
    get_category_recipes, get_liked_recipes, get_made_it_recipes, get_popular_recipes,
    get_recipes_of_the_week, get_saved_recipes, search_recipes, suggest_recipes,
};
use crate::grocery::handlers::{
    add_grocery_items, delete_grocery_item, get_grocery_list, update_grocery_item,
};
use crate::interactions::handlers::{
    follow_user, like_recipe, mark_made_it, review_recipe, save_recipe,
};
use crate::mealplans::handlers::{get_meal_plan, save_meal_plan};
use crate::middleware::auth::auth_middleware;
use crate::notifications::handlers::{delete_notification, get_notifications, mark_all_as_read};
use crate::recipes::handlers as recipes;
use crate::server::state::AppState;

/// Routes that do not require a bearer token. The recipe create/update/
/// delete handlers on these paths authenticate via the `AuthUser`
/// extractor.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/api/users/register", post(register))
        .route("/api/users/login", post(login))
        .route("/api/users/{user_id}", get(get_user_profile))
        .route(
            "/api/recipes",
            get(recipes::get_all).post(recipes::add_recipe),
        )
        .route("/api/recipes/search", get(search_recipes))
        .route("/api/recipes/week", get(get_recipes_of_the_week))
        .route("/api/recipes/popular", get(get_popular_recipes))
        .route(
            "/api/recipes/{id}",
            get(recipes::get_one)
                .put(recipes::update)
                .delete(recipes::delete_one),
        )
}

/// Routes that sit behind the authentication middleware.
pub fn protected_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/api/users/me", get(get_me))
        .route("/api/users/follow/{author_id}", post(follow_user))
        .route("/api/users/profile", put(update_user_profile))
        .route("/api/users/profile-image", post(update_user_profile_image))
        .route("/api/users/update-expo-token", put(update_user_expo_token))
        // Same parameter name as the public `/api/recipes/{id}` route;
        // the router requires consistent names at the same position.
        .route("/api/recipes/{id}/like", post(like_recipe))
        .route("/api/recipes/{id}/save", post(save_recipe))
        .route("/api/recipes/{id}/review", post(review_recipe))
        .route(
            "/api/recipes/made-it",
            post(mark_made_it).get(get_made_it_recipes),
        )
        .route("/api/recipes/saved", get(get_saved_recipes))
        .route("/api/recipes/liked", get(get_liked_recipes))
        .route("/api/recipes/suggest", post(suggest_recipes))
        .route("/api/category/{category}", get(get_category_recipes))
        .route("/api/notifications", get(get_notifications))
        .route("/api/notifications/markAllRead", put(mark_all_as_read))
        .route("/api/notifications/{id}", delete(delete_notification))
        .route("/api/grocery", get(get_grocery_list))
        .route(
            "/api/grocery/item",
            post(add_grocery_items).patch(update_grocery_item),
        )
        .route("/api/grocery/item/{item_id}", delete(delete_grocery_item))
        .route("/api/mealplan", get(get_meal_plan).post(save_meal_plan))
        .layer(middleware::from_fn_with_state(state, auth_middleware))
}
