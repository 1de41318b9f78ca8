use axum::{routing::delete, routing::get, routing::post, routing::put, Router};

use crate::http::handlers;
use crate::AppState;

pub fn health() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health))
}

pub fn auth() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(handlers::register))
        .route("/auth/login", post(handlers::login))
        .route("/auth/refresh", post(handlers::refresh_token))
        .route("/auth/logout", post(handlers::logout))
        .route("/auth/me", get(handlers::get_current_user))
}

pub fn users() -> Router<AppState> {
    Router::new()
        .route(
            "/user/profile",
            get(handlers::get_profile).put(handlers::update_profile),
        )
        .route("/user/password", put(handlers::change_password))
        .route("/user/favorites", get(handlers::list_favorites))
        .route(
            "/user/favorites/:recipe_id",
            post(handlers::add_favorite).delete(handlers::remove_favorite),
        )
}

pub fn recipes() -> Router<AppState> {
    Router::new()
        .route("/recipes", get(handlers::list_recipes))
        .route("/recipes/featured", get(handlers::featured_recipes))
        .route(
            "/recipes/category/:category",
            get(handlers::recipes_by_category),
        )
        .route("/recipes/search", post(handlers::search_recipes))
        .route("/recipes/upload", post(handlers::upload_recipe))
        .route("/recipes/:id", get(handlers::get_recipe))
}

pub fn subscriptions() -> Router<AppState> {
    Router::new()
        .route("/subscriptions/plans", get(handlers::list_plans))
        .route("/subscriptions/status", get(handlers::subscription_status))
        .route(
            "/subscriptions/features",
            get(handlers::subscription_features),
        )
        .route(
            "/subscriptions/upgrade",
            post(handlers::upgrade_subscription),
        )
        .route(
            "/subscriptions/downgrade",
            post(handlers::downgrade_subscription),
        )
        .route("/subscriptions/redeem", post(handlers::redeem_coupon))
}

pub fn notifications() -> Router<AppState> {
    Router::new()
        .route("/notifications", get(handlers::list_notifications))
        .route(
            "/notifications/unread-count",
            get(handlers::unread_notification_count),
        )
        .route(
            "/notifications/read-all",
            put(handlers::mark_all_notifications_read),
        )
        .route(
            "/notifications/:id/read",
            put(handlers::mark_notification_read),
        )
        .route("/notifications/:id", delete(handlers::delete_notification))
}
