use axum::Router;

use crate::state::AppState;

pub mod admin;
pub mod auth;
pub mod catalog;
pub mod doc;
pub mod health;
pub mod params;
pub mod recipes;
pub mod short_links;
pub mod users;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/users", users::router())
        .nest("/tags", catalog::tags_router())
        .nest("/ingredients", catalog::ingredients_router())
        .nest("/recipes", recipes::router())
        .nest("/admin", admin::router())
}
