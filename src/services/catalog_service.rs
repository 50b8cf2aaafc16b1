use sea_orm::{EntityTrait, QueryFilter, QueryOrder};
use sea_orm::sea_query::Expr;
use sea_orm::sea_query::extension::postgres::PgExpr;

use crate::{
    db::like_contains,
    dto::catalog::{IngredientList, TagList},
    entity::{
        ingredients::{Column as IngredientCol, Entity as Ingredients},
        tags::{Column as TagCol, Entity as Tags},
    },
    error::{AppError, AppResult},
    models::{Ingredient, Tag},
    response::ApiResponse,
    routes::params::IngredientQuery,
    state::AppState,
};

pub async fn list_tags(state: &AppState) -> AppResult<ApiResponse<TagList>> {
    let items = Tags::find()
        .order_by_asc(TagCol::Name)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Tag::from)
        .collect();
    Ok(ApiResponse::success("Tags", TagList { items }, None))
}

pub async fn get_tag(state: &AppState, id: i64) -> AppResult<ApiResponse<Tag>> {
    let tag = Tags::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success("Tag", Tag::from(tag), None))
}

pub async fn list_ingredients(
    state: &AppState,
    query: IngredientQuery,
) -> AppResult<ApiResponse<IngredientList>> {
    let mut finder = Ingredients::find();
    if let Some(name) = query.name.as_ref().map(|s| s.trim()).filter(|s| !s.is_empty()) {
        finder = finder.filter(Expr::col(IngredientCol::Name).ilike(like_contains(name)));
    }

    let items = finder
        .order_by_asc(IngredientCol::Name)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Ingredient::from)
        .collect();
    Ok(ApiResponse::success("Ingredients", IngredientList { items }, None))
}

pub async fn get_ingredient(state: &AppState, id: i64) -> AppResult<ApiResponse<Ingredient>> {
    let ingredient = Ingredients::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success(
        "Ingredient",
        Ingredient::from(ingredient),
        None,
    ))
}
