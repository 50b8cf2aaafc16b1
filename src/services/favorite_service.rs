use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set, ActiveValue::NotSet,
};

use crate::{
    audit,
    entity::favourites::{ActiveModel as FavouriteActive, Column as FavCol, Entity as Favourites},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::RecipeShort,
    response::{Ack, ApiResponse, Meta},
    services::recipe_service::find_recipe,
    state::AppState,
};

const ALREADY_ADDED: &str = "Recipe is already in favourites";

pub async fn add_favorite(
    state: &AppState,
    user: &AuthUser,
    recipe_id: i64,
) -> AppResult<ApiResponse<RecipeShort>> {
    let recipe = find_recipe(&state.orm, recipe_id).await?;

    let existing = Favourites::find()
        .filter(FavCol::UserId.eq(user.user_id))
        .filter(FavCol::RecipeId.eq(recipe.id))
        .one(&state.orm)
        .await?;
    if existing.is_some() {
        return Err(AppError::bad_request(ALREADY_ADDED));
    }

    FavouriteActive {
        id: NotSet,
        user_id: Set(user.user_id),
        recipe_id: Set(recipe.id),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await
    .map_err(|e| AppError::from_unique_violation(e, ALREADY_ADDED))?;

    audit::record(
        &state.pool,
        user.user_id,
        "favorite_add",
        "favourites",
        serde_json::json!({ "recipe_id": recipe.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Added to favourites",
        RecipeShort::from(recipe),
        Some(Meta::empty()),
    ))
}

pub async fn remove_favorite(
    state: &AppState,
    user: &AuthUser,
    recipe_id: i64,
) -> AppResult<ApiResponse<Ack>> {
    let recipe = find_recipe(&state.orm, recipe_id).await?;

    let result = Favourites::delete_many()
        .filter(FavCol::UserId.eq(user.user_id))
        .filter(FavCol::RecipeId.eq(recipe.id))
        .exec(&state.orm)
        .await?;
    if result.rows_affected == 0 {
        return Err(AppError::bad_request(
            "Recipe has already been removed from favourites",
        ));
    }

    audit::record(
        &state.pool,
        user.user_id,
        "favorite_remove",
        "favourites",
        serde_json::json!({ "recipe_id": recipe.id }),
    )
    .await;

    Ok(ApiResponse::done("Removed from favourites"))
}
