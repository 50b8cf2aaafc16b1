use std::collections::{HashMap, HashSet};

use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, QueryTrait, Set, TransactionTrait,
    ActiveValue::NotSet,
};

use crate::{
    audit,
    dto::recipes::{
        RecipeAssociations, RecipeFlags, RecipeIngredientRead, RecipeList, RecipeRead,
        RecipeWriteRequest, ShortLinkResponse,
    },
    entity::{
        Favourites, Ingredients, RecipeIngredients, RecipeTags, Recipes, ShoppingCarts,
        Subscriptions, Tags, Users,
        favourites, ingredients,
        recipe_ingredients::{self, ActiveModel as RecipeIngredientActive},
        recipe_tags::{self, ActiveModel as RecipeTagActive},
        recipes::{self, ActiveModel as RecipeActive, Column as RecipeCol},
        shopping_carts, subscriptions, tags, users,
    },
    error::{AppError, AppResult},
    media,
    middleware::auth::AuthUser,
    models::{Tag, UserProfile},
    response::{Ack, ApiResponse, Meta},
    routes::params::RecipeQuery,
    short_link,
    state::AppState,
};

const RECIPE_IMAGE_DIR: &str = "recipes/images";

pub async fn find_recipe<C: ConnectionTrait>(db: &C, id: i64) -> AppResult<recipes::Model> {
    Recipes::find_by_id(id)
        .one(db)
        .await?
        .ok_or(AppError::NotFound)
}

/// Authors among `author_ids` that `requester` is subscribed to.
pub async fn subscribed_authors<C: ConnectionTrait>(
    db: &C,
    requester: Option<i64>,
    author_ids: &[i64],
) -> AppResult<HashSet<i64>> {
    let Some(requester) = requester else {
        return Ok(HashSet::new());
    };
    if author_ids.is_empty() {
        return Ok(HashSet::new());
    }
    let rows = Subscriptions::find()
        .filter(subscriptions::Column::UserId.eq(requester))
        .filter(subscriptions::Column::SubscribingId.is_in(author_ids.to_vec()))
        .all(db)
        .await?;
    Ok(rows.into_iter().map(|row| row.subscribing_id).collect())
}

/// Map stored recipes to their read representation relative to `requester`.
/// Loads authors, tags, ingredients and interaction flags in one batch each.
pub async fn load_views<C: ConnectionTrait>(
    db: &C,
    requester: Option<i64>,
    models: Vec<recipes::Model>,
) -> AppResult<Vec<RecipeRead>> {
    if models.is_empty() {
        return Ok(Vec::new());
    }
    let recipe_ids: Vec<i64> = models.iter().map(|m| m.id).collect();
    let mut author_ids: Vec<i64> = models.iter().map(|m| m.author_id).collect();
    author_ids.sort_unstable();
    author_ids.dedup();

    let authors: HashMap<i64, users::Model> = Users::find()
        .filter(users::Column::Id.is_in(author_ids.clone()))
        .all(db)
        .await?
        .into_iter()
        .map(|u| (u.id, u))
        .collect();
    let subscribed = subscribed_authors(db, requester, &author_ids).await?;

    let mut tags_by_recipe: HashMap<i64, Vec<Tag>> = HashMap::new();
    for (link, tag) in RecipeTags::find()
        .filter(recipe_tags::Column::RecipeId.is_in(recipe_ids.clone()))
        .find_also_related(Tags)
        .order_by_asc(tags::Column::Name)
        .all(db)
        .await?
    {
        if let Some(tag) = tag {
            tags_by_recipe
                .entry(link.recipe_id)
                .or_default()
                .push(Tag::from(tag));
        }
    }

    let mut ingredients_by_recipe: HashMap<i64, Vec<RecipeIngredientRead>> = HashMap::new();
    for (link, ingredient) in RecipeIngredients::find()
        .filter(recipe_ingredients::Column::RecipeId.is_in(recipe_ids.clone()))
        .find_also_related(Ingredients)
        .order_by_asc(recipe_ingredients::Column::Id)
        .all(db)
        .await?
    {
        if let Some(ingredient) = ingredient {
            ingredients_by_recipe
                .entry(link.recipe_id)
                .or_default()
                .push(RecipeIngredientRead {
                    id: ingredient.id,
                    name: ingredient.name,
                    measurement_unit: ingredient.measurement_unit,
                    amount: link.amount,
                });
        }
    }

    let (favourited, in_cart) = match requester {
        Some(user_id) => {
            let favourited: HashSet<i64> = Favourites::find()
                .filter(favourites::Column::UserId.eq(user_id))
                .filter(favourites::Column::RecipeId.is_in(recipe_ids.clone()))
                .all(db)
                .await?
                .into_iter()
                .map(|row| row.recipe_id)
                .collect();
            let in_cart: HashSet<i64> = ShoppingCarts::find()
                .filter(shopping_carts::Column::UserId.eq(user_id))
                .filter(shopping_carts::Column::RecipeId.is_in(recipe_ids.clone()))
                .all(db)
                .await?
                .into_iter()
                .map(|row| row.recipe_id)
                .collect();
            (favourited, in_cart)
        }
        None => (HashSet::new(), HashSet::new()),
    };

    let mut views = Vec::with_capacity(models.len());
    for model in models {
        let author = authors
            .get(&model.author_id)
            .cloned()
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("recipe author missing")))?;
        let author = UserProfile::from_entity(author, subscribed.contains(&model.author_id));
        let flags = RecipeFlags {
            is_favorited: favourited.contains(&model.id),
            is_in_shopping_cart: in_cart.contains(&model.id),
        };
        let tags = tags_by_recipe.remove(&model.id).unwrap_or_default();
        let ingredients = ingredients_by_recipe.remove(&model.id).unwrap_or_default();
        views.push(RecipeRead::assemble(model, author, tags, ingredients, flags));
    }
    Ok(views)
}

/// AND of the requested predicates. Interaction filters are ignored for
/// anonymous requesters.
pub fn filter_condition(query: &RecipeQuery, requester: Option<i64>) -> Condition {
    let mut condition = Condition::all();

    if !query.tags.is_empty() {
        let tagged = RecipeTags::find()
            .select_only()
            .column(recipe_tags::Column::RecipeId)
            .inner_join(Tags)
            .filter(tags::Column::Slug.is_in(query.tags.clone()))
            .into_query();
        condition = condition.add(RecipeCol::Id.in_subquery(tagged));
    }

    if let Some(author) = query.author {
        condition = condition.add(RecipeCol::AuthorId.eq(author));
    }

    if let Some(user_id) = requester {
        if query.is_favorited {
            let favourited = Favourites::find()
                .select_only()
                .column(favourites::Column::RecipeId)
                .filter(favourites::Column::UserId.eq(user_id))
                .into_query();
            condition = condition.add(RecipeCol::Id.in_subquery(favourited));
        }
        if query.is_in_shopping_cart {
            let in_cart = ShoppingCarts::find()
                .select_only()
                .column(shopping_carts::Column::RecipeId)
                .filter(shopping_carts::Column::UserId.eq(user_id))
                .into_query();
            condition = condition.add(RecipeCol::Id.in_subquery(in_cart));
        }
    }

    condition
}

pub async fn list_recipes(
    state: &AppState,
    requester: Option<i64>,
    query: RecipeQuery,
) -> AppResult<ApiResponse<RecipeList>> {
    let (page, limit, offset) = query.pagination.normalize();
    let finder = Recipes::find()
        .filter(filter_condition(&query, requester))
        .order_by_desc(RecipeCol::Id);

    let total = finder.clone().count(&state.orm).await? as i64;
    let models = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?;

    let items = load_views(&state.orm, requester, models).await?;
    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success("Recipes", RecipeList { items }, Some(meta)))
}

pub async fn get_recipe(
    state: &AppState,
    requester: Option<i64>,
    id: i64,
) -> AppResult<ApiResponse<RecipeRead>> {
    let model = find_recipe(&state.orm, id).await?;
    let view = single_view(&state.orm, requester, model).await?;
    Ok(ApiResponse::success("Recipe", view, None))
}

async fn single_view<C: ConnectionTrait>(
    db: &C,
    requester: Option<i64>,
    model: recipes::Model,
) -> AppResult<RecipeRead> {
    load_views(db, requester, vec![model])
        .await?
        .pop()
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("recipe view missing")))
}

/// Reject association sets that name tags or ingredients that do not exist.
async fn ensure_catalog_ids<C: ConnectionTrait>(
    db: &C,
    associations: &RecipeAssociations,
) -> AppResult<()> {
    let known_tags: HashSet<i64> = Tags::find()
        .filter(tags::Column::Id.is_in(associations.tags.clone()))
        .all(db)
        .await?
        .into_iter()
        .map(|t| t.id)
        .collect();
    if let Some(missing) = associations.tags.iter().find(|id| !known_tags.contains(id)) {
        return Err(AppError::bad_request(format!("unknown tag {missing}")));
    }

    let ingredient_ids: Vec<i64> = associations
        .ingredients
        .iter()
        .map(|i| i.ingredient_id)
        .collect();
    let known_ingredients: HashSet<i64> = Ingredients::find()
        .filter(ingredients::Column::Id.is_in(ingredient_ids.clone()))
        .all(db)
        .await?
        .into_iter()
        .map(|i| i.id)
        .collect();
    if let Some(missing) = ingredient_ids
        .iter()
        .find(|id| !known_ingredients.contains(id))
    {
        return Err(AppError::bad_request(format!("unknown ingredient {missing}")));
    }

    Ok(())
}

/// Destructive replace: drop every association of `recipe_id` and insert the
/// new sets. Callers run this inside their transaction.
pub async fn replace_associations<C: ConnectionTrait>(
    db: &C,
    recipe_id: i64,
    associations: &RecipeAssociations,
) -> AppResult<()> {
    ensure_catalog_ids(db, associations).await?;

    RecipeIngredients::delete_many()
        .filter(recipe_ingredients::Column::RecipeId.eq(recipe_id))
        .exec(db)
        .await?;
    RecipeTags::delete_many()
        .filter(recipe_tags::Column::RecipeId.eq(recipe_id))
        .exec(db)
        .await?;

    RecipeIngredients::insert_many(associations.ingredients.iter().map(|item| {
        RecipeIngredientActive {
            id: NotSet,
            recipe_id: Set(recipe_id),
            ingredient_id: Set(item.ingredient_id),
            amount: Set(item.amount),
        }
    }))
    .exec(db)
    .await?;

    RecipeTags::insert_many(associations.tags.iter().map(|tag_id| RecipeTagActive {
        id: NotSet,
        recipe_id: Set(recipe_id),
        tag_id: Set(*tag_id),
    }))
    .exec(db)
    .await?;

    Ok(())
}

pub async fn create_recipe(
    state: &AppState,
    user: &AuthUser,
    payload: RecipeWriteRequest,
) -> AppResult<ApiResponse<RecipeRead>> {
    let associations = payload.validate()?;
    let image_data = payload
        .image
        .as_deref()
        .filter(|data| !data.trim().is_empty())
        .ok_or_else(|| AppError::bad_request("image is required"))?;
    let image = media::save_image(&state.config.media_root, RECIPE_IMAGE_DIR, image_data).await?;

    let created = insert_recipe(state, user, payload, image.clone(), &associations).await;
    let recipe = match created {
        Ok(recipe) => recipe,
        Err(err) => {
            media::remove_image(&state.config.media_root, &image).await;
            return Err(err);
        }
    };

    audit::record(
        &state.pool,
        user.user_id,
        "recipe_create",
        "recipes",
        serde_json::json!({ "recipe_id": recipe.id }),
    )
    .await;

    let view = single_view(&state.orm, Some(user.user_id), recipe).await?;
    Ok(ApiResponse::success("Recipe created", view, Some(Meta::empty())))
}

async fn insert_recipe(
    state: &AppState,
    user: &AuthUser,
    payload: RecipeWriteRequest,
    image: String,
    associations: &RecipeAssociations,
) -> AppResult<recipes::Model> {
    let txn = state.orm.begin().await?;

    let recipe = RecipeActive {
        id: NotSet,
        name: Set(payload.name.trim().to_string()),
        image: Set(Some(image)),
        text: Set(payload.text),
        author_id: Set(user.user_id),
        cooking_time: Set(payload.cooking_time),
        short_link: Set(None),
        created_at: NotSet,
    }
    .insert(&txn)
    .await?;

    // The code depends on the id, so it can only be set after the first insert.
    let recipe_id = recipe.id;
    let mut active: RecipeActive = recipe.into();
    active.short_link = Set(Some(short_link::encode(recipe_id)));
    let recipe = active.update(&txn).await?;

    replace_associations(&txn, recipe.id, associations).await?;

    txn.commit().await?;
    Ok(recipe)
}

pub async fn update_recipe(
    state: &AppState,
    user: &AuthUser,
    id: i64,
    payload: RecipeWriteRequest,
) -> AppResult<ApiResponse<RecipeRead>> {
    let existing = find_recipe(&state.orm, id).await?;
    if existing.author_id != user.user_id {
        return Err(AppError::Forbidden);
    }
    let associations = payload.validate()?;

    let new_image = match payload.image.as_deref().filter(|d| !d.trim().is_empty()) {
        Some(data) => {
            Some(media::save_image(&state.config.media_root, RECIPE_IMAGE_DIR, data).await?)
        }
        None => None,
    };
    let old_image = existing.image.clone();

    let updated = apply_update(state, existing, payload, new_image.clone(), &associations).await;
    let recipe = match updated {
        Ok(recipe) => recipe,
        Err(err) => {
            if let Some(image) = &new_image {
                media::remove_image(&state.config.media_root, image).await;
            }
            return Err(err);
        }
    };

    if let (Some(_), Some(old)) = (&new_image, &old_image) {
        media::remove_image(&state.config.media_root, old).await;
    }

    audit::record(
        &state.pool,
        user.user_id,
        "recipe_update",
        "recipes",
        serde_json::json!({ "recipe_id": recipe.id }),
    )
    .await;

    let view = single_view(&state.orm, Some(user.user_id), recipe).await?;
    Ok(ApiResponse::success("Recipe updated", view, Some(Meta::empty())))
}

async fn apply_update(
    state: &AppState,
    existing: recipes::Model,
    payload: RecipeWriteRequest,
    new_image: Option<String>,
    associations: &RecipeAssociations,
) -> AppResult<recipes::Model> {
    let txn = state.orm.begin().await?;

    let mut active: RecipeActive = existing.into();
    active.name = Set(payload.name.trim().to_string());
    active.text = Set(payload.text);
    active.cooking_time = Set(payload.cooking_time);
    if let Some(image) = new_image {
        active.image = Set(Some(image));
    }
    let recipe = active.update(&txn).await?;

    replace_associations(&txn, recipe.id, associations).await?;

    txn.commit().await?;
    Ok(recipe)
}

pub async fn delete_recipe(
    state: &AppState,
    user: &AuthUser,
    id: i64,
) -> AppResult<ApiResponse<Ack>> {
    let existing = find_recipe(&state.orm, id).await?;
    if existing.author_id != user.user_id {
        return Err(AppError::Forbidden);
    }

    let result = Recipes::delete_by_id(id).exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }
    if let Some(image) = &existing.image {
        media::remove_image(&state.config.media_root, image).await;
    }

    audit::record(
        &state.pool,
        user.user_id,
        "recipe_delete",
        "recipes",
        serde_json::json!({ "recipe_id": id }),
    )
    .await;

    Ok(ApiResponse::done("Deleted"))
}

pub async fn get_short_link(
    state: &AppState,
    id: i64,
) -> AppResult<ApiResponse<ShortLinkResponse>> {
    let recipe = find_recipe(&state.orm, id).await?;
    let code = recipe
        .short_link
        .unwrap_or_else(|| short_link::encode(recipe.id));
    Ok(ApiResponse::success(
        "Short link",
        ShortLinkResponse {
            short_link: short_link::absolute_url(&state.config.public_base_url, &code),
        },
        None,
    ))
}

/// Recipe id behind a short code.
pub async fn resolve_short_link(state: &AppState, code: &str) -> AppResult<i64> {
    let recipe = Recipes::find()
        .filter(RecipeCol::ShortLink.eq(code))
        .one(&state.orm)
        .await?;
    match recipe {
        Some(recipe) => Ok(recipe.id),
        None => {
            let id = short_link::decode(code).ok_or(AppError::NotFound)?;
            Ok(find_recipe(&state.orm, id).await?.id)
        }
    }
}
