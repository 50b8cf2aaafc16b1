use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set, ActiveValue::NotSet,
};

use crate::{
    audit,
    db::DbPool,
    entity::shopping_carts::{ActiveModel as CartActive, Column as CartCol, Entity as ShoppingCarts},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::RecipeShort,
    response::{Ack, ApiResponse, Meta},
    services::recipe_service::find_recipe,
    shopping::{self, CartLine, ShoppingListItem},
    state::AppState,
};

const ALREADY_ADDED: &str = "Recipe is already in the shopping cart";

pub async fn add_to_cart(
    state: &AppState,
    user: &AuthUser,
    recipe_id: i64,
) -> AppResult<ApiResponse<RecipeShort>> {
    let recipe = find_recipe(&state.orm, recipe_id).await?;

    let exist = ShoppingCarts::find()
        .filter(CartCol::UserId.eq(user.user_id))
        .filter(CartCol::RecipeId.eq(recipe.id))
        .one(&state.orm)
        .await?;
    if exist.is_some() {
        return Err(AppError::bad_request(ALREADY_ADDED));
    }

    CartActive {
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
        "cart_add",
        "shopping_carts",
        serde_json::json!({ "recipe_id": recipe.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Added to shopping cart",
        RecipeShort::from(recipe),
        Some(Meta::empty()),
    ))
}

pub async fn remove_from_cart(
    state: &AppState,
    user: &AuthUser,
    recipe_id: i64,
) -> AppResult<ApiResponse<Ack>> {
    let recipe = find_recipe(&state.orm, recipe_id).await?;

    let result = ShoppingCarts::delete_many()
        .filter(CartCol::RecipeId.eq(recipe.id))
        .filter(CartCol::UserId.eq(user.user_id))
        .exec(&state.orm)
        .await?;
    if result.rows_affected == 0 {
        return Err(AppError::bad_request(
            "Recipe has already been removed from the shopping cart",
        ));
    }

    audit::record(
        &state.pool,
        user.user_id,
        "cart_remove",
        "shopping_carts",
        serde_json::json!({ "recipe_id": recipe.id }),
    )
    .await;

    Ok(ApiResponse::done("Removed from shopping cart"))
}

/// Ingredient rows of every recipe in the user's cart, one per recipe/ingredient pair.
pub async fn cart_lines(pool: &DbPool, user_id: i64) -> AppResult<Vec<CartLine>> {
    let rows = sqlx::query_as::<_, CartLine>(
        r#"
        SELECT i.name, i.measurement_unit, ri.amount
        FROM shopping_carts sc
        JOIN recipe_ingredients ri ON ri.recipe_id = sc.recipe_id
        JOIN ingredients i ON i.id = ri.ingredient_id
        WHERE sc.user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn shopping_list(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<Vec<ShoppingListItem>> {
    let lines = cart_lines(&state.pool, user.user_id).await?;
    let items = shopping::aggregate(lines);
    tracing::debug!(user_id = user.user_id, items = items.len(), "shopping list built");
    Ok(items)
}
