use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};

use crate::{
    admin::AdminRegistry,
    dto::admin::AdminRows,
    error::AppResult,
    middleware::auth::AuthUser,
    response::ApiResponse,
    routes::params::AdminSearchQuery,
    services::admin_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/registry", get(registry))
        .route("/{entity}", get(search_entity))
}

#[utoipa::path(
    get,
    path = "/api/admin/registry",
    responses(
        (status = 200, description = "Per-entity list/search/filter configuration", body = ApiResponse<AdminRegistry>),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn registry(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<AdminRegistry>>> {
    Ok(Json(admin_service::registry(&state, &user).await?))
}

#[utoipa::path(
    get,
    path = "/api/admin/{entity}",
    params(
        ("entity" = String, Path, description = "Entity name from the registry"),
        ("q" = Option<String>, Query, description = "Search term over the entity's search fields"),
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("limit" = Option<i64>, Query, description = "Items per page, default 6"),
        ("tag_slugs" = Option<String>, Query, description = "List filter, e.g. on recipes; any field in the entity's list_filter is accepted")
    ),
    responses(
        (status = 200, description = "Matching rows", body = ApiResponse<AdminRows>),
        (status = 400, description = "Unknown filter or malformed paging"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Unknown entity")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn search_entity(
    State(state): State<AppState>,
    user: AuthUser,
    Path(entity): Path<String>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> AppResult<Json<ApiResponse<AdminRows>>> {
    let query = AdminSearchQuery::from_pairs(pairs)?;
    Ok(Json(
        admin_service::search(&state, &user, &entity, query).await?,
    ))
}
