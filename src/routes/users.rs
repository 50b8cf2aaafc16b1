use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post, put},
};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::{
    dto::{
        auth::SetPasswordRequest,
        users::{AvatarRequest, AvatarResponse, SubscriptionList, SubscriptionView, UserList},
    },
    error::AppResult,
    middleware::auth::{AuthUser, MaybeAuthUser},
    models::UserProfile,
    response::{Ack, ApiResponse},
    routes::params::{Pagination, SubscriptionQuery},
    services::{auth_service, user_service},
    state::AppState,
};

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct SubscribeQuery {
    pub recipes_limit: Option<u64>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users))
        .route("/me", get(me))
        .route("/me/avatar", put(set_avatar).delete(delete_avatar))
        .route("/set_password", post(set_password))
        .route("/subscriptions", get(list_subscriptions))
        .route("/{id}", get(get_user))
        .route("/{id}/subscribe", post(subscribe).delete(unsubscribe))
}

#[utoipa::path(
    get,
    path = "/api/users",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("limit" = Option<i64>, Query, description = "Items per page, default 6")
    ),
    responses(
        (status = 200, description = "List users", body = ApiResponse<UserList>)
    ),
    tag = "Users"
)]
pub async fn list_users(
    State(state): State<AppState>,
    requester: MaybeAuthUser,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<ApiResponse<UserList>>> {
    let resp = user_service::list_users(&state, requester.user_id(), pagination).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(("id" = i64, Path, description = "User ID")),
    responses(
        (status = 200, description = "User profile", body = ApiResponse<UserProfile>),
        (status = 404, description = "User not found")
    ),
    tag = "Users"
)]
pub async fn get_user(
    State(state): State<AppState>,
    requester: MaybeAuthUser,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<UserProfile>>> {
    let resp = user_service::get_user(&state, requester.user_id(), id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/users/me",
    responses(
        (status = 200, description = "Current user", body = ApiResponse<UserProfile>),
        (status = 401, description = "Not authenticated")
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn me(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<UserProfile>>> {
    Ok(Json(user_service::me(&state, &user).await?))
}

#[utoipa::path(
    put,
    path = "/api/users/me/avatar",
    request_body = AvatarRequest,
    responses(
        (status = 200, description = "Avatar stored", body = ApiResponse<AvatarResponse>),
        (status = 400, description = "Invalid image")
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn set_avatar(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<AvatarRequest>,
) -> AppResult<Json<ApiResponse<AvatarResponse>>> {
    Ok(Json(user_service::set_avatar(&state, &user, payload).await?))
}

#[utoipa::path(
    delete,
    path = "/api/users/me/avatar",
    responses(
        (status = 200, description = "Avatar removed", body = ApiResponse<Ack>),
        (status = 400, description = "Avatar is not set")
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn delete_avatar(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<Ack>>> {
    Ok(Json(user_service::delete_avatar(&state, &user).await?))
}

#[utoipa::path(
    post,
    path = "/api/users/set_password",
    request_body = SetPasswordRequest,
    responses(
        (status = 200, description = "Password changed", body = ApiResponse<Ack>),
        (status = 400, description = "Current password is incorrect")
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn set_password(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<SetPasswordRequest>,
) -> AppResult<Json<ApiResponse<Ack>>> {
    Ok(Json(auth_service::set_password(&state, &user, payload).await?))
}

#[utoipa::path(
    get,
    path = "/api/users/subscriptions",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("limit" = Option<i64>, Query, description = "Items per page, default 6"),
        ("recipes_limit" = Option<u64>, Query, description = "Recipes per author, default 3")
    ),
    responses(
        (status = 200, description = "Authors the user follows", body = ApiResponse<SubscriptionList>)
    ),
    security(("bearer_auth" = [])),
    tag = "Subscriptions"
)]
pub async fn list_subscriptions(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<SubscriptionQuery>,
) -> AppResult<Json<ApiResponse<SubscriptionList>>> {
    Ok(Json(
        user_service::list_subscriptions(&state, &user, query).await?,
    ))
}

#[utoipa::path(
    post,
    path = "/api/users/{id}/subscribe",
    params(
        ("id" = i64, Path, description = "Author ID"),
        ("recipes_limit" = Option<u64>, Query, description = "Recipes in the preview, default 3")
    ),
    responses(
        (status = 200, description = "Subscribed", body = ApiResponse<SubscriptionView>),
        (status = 400, description = "Self or duplicate subscription"),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Subscriptions"
)]
pub async fn subscribe(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
    Query(query): Query<SubscribeQuery>,
) -> AppResult<Json<ApiResponse<SubscriptionView>>> {
    Ok(Json(
        user_service::subscribe(&state, &user, id, query.recipes_limit).await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/api/users/{id}/subscribe",
    params(("id" = i64, Path, description = "Author ID")),
    responses(
        (status = 200, description = "Unsubscribed", body = ApiResponse<Ack>),
        (status = 400, description = "Not subscribed"),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Subscriptions"
)]
pub async fn unsubscribe(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<Ack>>> {
    Ok(Json(user_service::unsubscribe(&state, &user, id).await?))
}
