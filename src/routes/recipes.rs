use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
    routing::{get, post},
};

use crate::{
    dto::recipes::{RecipeList, RecipeRead, RecipeWriteRequest, ShoppingList, ShortLinkResponse},
    error::AppResult,
    middleware::auth::{AuthUser, MaybeAuthUser},
    models::RecipeShort,
    response::{Ack, ApiResponse, Meta},
    routes::params::{RecipeQuery, ShoppingListFormat, ShoppingListQuery},
    services::{cart_service, favorite_service, recipe_service},
    shopping,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_recipes).post(create_recipe))
        .route("/download_shopping_cart", get(download_shopping_cart))
        .route(
            "/{id}",
            get(get_recipe).patch(update_recipe).delete(delete_recipe),
        )
        .route("/{id}/get-link", get(get_link))
        .route("/{id}/favorite", post(add_favorite).delete(remove_favorite))
        .route(
            "/{id}/shopping_cart",
            post(add_to_cart).delete(remove_from_cart),
        )
}

#[utoipa::path(
    get,
    path = "/api/recipes",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("limit" = Option<i64>, Query, description = "Items per page, default 6"),
        ("tags" = Option<Vec<String>>, Query, description = "Tag slugs, repeatable; any match"),
        ("author" = Option<i64>, Query, description = "Author ID"),
        ("is_favorited" = Option<bool>, Query, description = "Only the requester's favourites"),
        ("is_in_shopping_cart" = Option<bool>, Query, description = "Only recipes in the requester's cart")
    ),
    responses(
        (status = 200, description = "List recipes", body = ApiResponse<RecipeList>),
        (status = 400, description = "Malformed filter")
    ),
    tag = "Recipes"
)]
pub async fn list_recipes(
    State(state): State<AppState>,
    requester: MaybeAuthUser,
    Query(pairs): Query<Vec<(String, String)>>,
) -> AppResult<Json<ApiResponse<RecipeList>>> {
    let query = RecipeQuery::from_pairs(pairs)?;
    let resp = recipe_service::list_recipes(&state, requester.user_id(), query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/recipes/{id}",
    params(("id" = i64, Path, description = "Recipe ID")),
    responses(
        (status = 200, description = "Recipe", body = ApiResponse<RecipeRead>),
        (status = 404, description = "Recipe not found")
    ),
    tag = "Recipes"
)]
pub async fn get_recipe(
    State(state): State<AppState>,
    requester: MaybeAuthUser,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<RecipeRead>>> {
    let resp = recipe_service::get_recipe(&state, requester.user_id(), id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/recipes",
    request_body = RecipeWriteRequest,
    responses(
        (status = 200, description = "Recipe created", body = ApiResponse<RecipeRead>),
        (status = 400, description = "Validation failed"),
        (status = 401, description = "Not authenticated")
    ),
    security(("bearer_auth" = [])),
    tag = "Recipes"
)]
pub async fn create_recipe(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<RecipeWriteRequest>,
) -> AppResult<Json<ApiResponse<RecipeRead>>> {
    let resp = recipe_service::create_recipe(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/recipes/{id}",
    params(("id" = i64, Path, description = "Recipe ID")),
    request_body = RecipeWriteRequest,
    responses(
        (status = 200, description = "Recipe updated", body = ApiResponse<RecipeRead>),
        (status = 400, description = "Validation failed"),
        (status = 403, description = "Not the author"),
        (status = 404, description = "Recipe not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Recipes"
)]
pub async fn update_recipe(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
    Json(payload): Json<RecipeWriteRequest>,
) -> AppResult<Json<ApiResponse<RecipeRead>>> {
    let resp = recipe_service::update_recipe(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/recipes/{id}",
    params(("id" = i64, Path, description = "Recipe ID")),
    responses(
        (status = 200, description = "Deleted", body = ApiResponse<Ack>),
        (status = 403, description = "Not the author"),
        (status = 404, description = "Recipe not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Recipes"
)]
pub async fn delete_recipe(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<Ack>>> {
    let resp = recipe_service::delete_recipe(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/recipes/{id}/get-link",
    params(("id" = i64, Path, description = "Recipe ID")),
    responses(
        (status = 200, description = "Short link", body = ApiResponse<ShortLinkResponse>),
        (status = 404, description = "Recipe not found")
    ),
    tag = "Recipes"
)]
pub async fn get_link(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<ShortLinkResponse>>> {
    Ok(Json(recipe_service::get_short_link(&state, id).await?))
}

#[utoipa::path(
    post,
    path = "/api/recipes/{id}/favorite",
    params(("id" = i64, Path, description = "Recipe ID")),
    responses(
        (status = 200, description = "Added to favourites", body = ApiResponse<RecipeShort>),
        (status = 400, description = "Already in favourites"),
        (status = 404, description = "Recipe not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Favorites"
)]
pub async fn add_favorite(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<RecipeShort>>> {
    Ok(Json(favorite_service::add_favorite(&state, &user, id).await?))
}

#[utoipa::path(
    delete,
    path = "/api/recipes/{id}/favorite",
    params(("id" = i64, Path, description = "Recipe ID")),
    responses(
        (status = 200, description = "Removed from favourites", body = ApiResponse<Ack>),
        (status = 400, description = "Not in favourites"),
        (status = 404, description = "Recipe not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Favorites"
)]
pub async fn remove_favorite(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<Ack>>> {
    Ok(Json(
        favorite_service::remove_favorite(&state, &user, id).await?,
    ))
}

#[utoipa::path(
    post,
    path = "/api/recipes/{id}/shopping_cart",
    params(("id" = i64, Path, description = "Recipe ID")),
    responses(
        (status = 200, description = "Added to shopping cart", body = ApiResponse<RecipeShort>),
        (status = 400, description = "Already in the cart"),
        (status = 404, description = "Recipe not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn add_to_cart(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<RecipeShort>>> {
    Ok(Json(cart_service::add_to_cart(&state, &user, id).await?))
}

#[utoipa::path(
    delete,
    path = "/api/recipes/{id}/shopping_cart",
    params(("id" = i64, Path, description = "Recipe ID")),
    responses(
        (status = 200, description = "Removed from shopping cart", body = ApiResponse<Ack>),
        (status = 400, description = "Not in the cart"),
        (status = 404, description = "Recipe not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn remove_from_cart(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<Ack>>> {
    Ok(Json(cart_service::remove_from_cart(&state, &user, id).await?))
}

#[utoipa::path(
    get,
    path = "/api/recipes/download_shopping_cart",
    params(("format" = Option<String>, Query, description = "`txt` (default) or `json`")),
    responses(
        (status = 200, description = "Summed ingredients of every recipe in the cart", body = ApiResponse<ShoppingList>)
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn download_shopping_cart(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<ShoppingListQuery>,
) -> AppResult<Response> {
    let items = cart_service::shopping_list(&state, &user).await?;
    let response = match query.format.unwrap_or_default() {
        ShoppingListFormat::Json => Json(ApiResponse::success(
            "Shopping list",
            ShoppingList { items },
            Some(Meta::empty()),
        ))
        .into_response(),
        ShoppingListFormat::Txt => (
            [
                (header::CONTENT_TYPE, "text/plain; charset=utf-8"),
                (
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=\"shopping_list.txt\"",
                ),
            ],
            shopping::render_text(&items),
        )
            .into_response(),
    };
    Ok(response)
}
