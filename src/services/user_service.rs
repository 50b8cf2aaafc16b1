use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, ActiveValue::NotSet,
};

use crate::{
    audit,
    constants::SUBSCRIPTION_RECIPES_PREVIEW,
    dto::users::{AvatarRequest, AvatarResponse, SubscriptionList, SubscriptionView, UserList},
    entity::{
        Recipes, Subscriptions, Users, recipes,
        subscriptions::{ActiveModel as SubscriptionActive, Column as SubCol},
        users::{self, ActiveModel as UserActive, Column as UserCol},
    },
    error::{AppError, AppResult},
    media,
    middleware::auth::AuthUser,
    models::{RecipeShort, UserProfile, media_url},
    response::{Ack, ApiResponse, Meta},
    routes::params::{Pagination, SubscriptionQuery},
    services::recipe_service::subscribed_authors,
    state::AppState,
    validation::ensure_not_self,
};

const AVATAR_DIR: &str = "users/avatar";

async fn find_user<C: ConnectionTrait>(db: &C, id: i64) -> AppResult<users::Model> {
    Users::find_by_id(id)
        .one(db)
        .await?
        .ok_or(AppError::NotFound)
}

pub async fn list_users(
    state: &AppState,
    requester: Option<i64>,
    pagination: Pagination,
) -> AppResult<ApiResponse<UserList>> {
    let (page, limit, offset) = pagination.normalize();
    let finder = Users::find().order_by_asc(UserCol::Id);
    let total = finder.clone().count(&state.orm).await? as i64;
    let models = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?;

    let ids: Vec<i64> = models.iter().map(|u| u.id).collect();
    let subscribed = subscribed_authors(&state.orm, requester, &ids).await?;
    let items = models
        .into_iter()
        .map(|u| {
            let is_subscribed = subscribed.contains(&u.id);
            UserProfile::from_entity(u, is_subscribed)
        })
        .collect();

    Ok(ApiResponse::success(
        "Users",
        UserList { items },
        Some(Meta::new(page, limit, total)),
    ))
}

pub async fn get_user(
    state: &AppState,
    requester: Option<i64>,
    id: i64,
) -> AppResult<ApiResponse<UserProfile>> {
    let user = find_user(&state.orm, id).await?;
    let subscribed = subscribed_authors(&state.orm, requester, &[user.id]).await?;
    let is_subscribed = subscribed.contains(&user.id);
    Ok(ApiResponse::success(
        "User",
        UserProfile::from_entity(user, is_subscribed),
        None,
    ))
}

pub async fn me(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<UserProfile>> {
    let model = find_user(&state.orm, user.user_id).await?;
    Ok(ApiResponse::success(
        "User",
        UserProfile::from_entity(model, false),
        None,
    ))
}

pub async fn set_avatar(
    state: &AppState,
    user: &AuthUser,
    payload: AvatarRequest,
) -> AppResult<ApiResponse<AvatarResponse>> {
    let existing = find_user(&state.orm, user.user_id).await?;
    let stored = media::save_image(&state.config.media_root, AVATAR_DIR, &payload.avatar).await?;
    let previous = existing.avatar.clone();

    let mut active: UserActive = existing.into();
    active.avatar = Set(Some(stored.clone()));
    if let Err(err) = active.update(&state.orm).await {
        media::remove_image(&state.config.media_root, &stored).await;
        return Err(err.into());
    }
    if let Some(previous) = previous {
        media::remove_image(&state.config.media_root, &previous).await;
    }

    audit::record(
        &state.pool,
        user.user_id,
        "avatar_set",
        "users",
        serde_json::json!({ "user_id": user.user_id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Avatar updated",
        AvatarResponse {
            avatar: media_url(&stored),
        },
        Some(Meta::empty()),
    ))
}

pub async fn delete_avatar(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<Ack>> {
    let existing = find_user(&state.orm, user.user_id).await?;
    let Some(previous) = existing.avatar.clone() else {
        return Err(AppError::bad_request("Avatar is not set"));
    };

    let mut active: UserActive = existing.into();
    active.avatar = Set(None);
    active.update(&state.orm).await?;
    media::remove_image(&state.config.media_root, &previous).await;

    Ok(ApiResponse::done("Avatar removed"))
}

/// Subscription cards for `authors`, each with at most `recipes_limit` newest recipes.
async fn subscription_views<C: ConnectionTrait>(
    db: &C,
    requester: i64,
    authors: Vec<users::Model>,
    recipes_limit: u64,
) -> AppResult<Vec<SubscriptionView>> {
    let ids: Vec<i64> = authors.iter().map(|u| u.id).collect();
    let subscribed = subscribed_authors(db, Some(requester), &ids).await?;

    let mut views = Vec::with_capacity(authors.len());
    for author in authors {
        let by_author = Recipes::find().filter(recipes::Column::AuthorId.eq(author.id));
        let recipes_count = by_author.clone().count(db).await? as i64;
        let recipes = by_author
            .order_by_desc(recipes::Column::Id)
            .limit(recipes_limit)
            .all(db)
            .await?
            .into_iter()
            .map(RecipeShort::from)
            .collect();
        let is_subscribed = subscribed.contains(&author.id);
        views.push(SubscriptionView {
            user: UserProfile::from_entity(author, is_subscribed),
            recipes,
            recipes_count,
        });
    }
    Ok(views)
}

pub async fn subscribe(
    state: &AppState,
    user: &AuthUser,
    target_id: i64,
    recipes_limit: Option<u64>,
) -> AppResult<ApiResponse<SubscriptionView>> {
    let target = find_user(&state.orm, target_id).await?;
    ensure_not_self(user.user_id, target.id)?;

    SubscriptionActive {
        id: NotSet,
        user_id: Set(user.user_id),
        subscribing_id: Set(target.id),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await
    .map_err(|e| AppError::from_unique_violation(e, "Already subscribed to this user"))?;

    audit::record(
        &state.pool,
        user.user_id,
        "subscribe",
        "subscriptions",
        serde_json::json!({ "subscribing_id": target.id }),
    )
    .await;

    let limit = recipes_limit.unwrap_or(SUBSCRIPTION_RECIPES_PREVIEW);
    let view = subscription_views(&state.orm, user.user_id, vec![target], limit)
        .await?
        .pop()
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("subscription view missing")))?;

    Ok(ApiResponse::success("Subscribed", view, Some(Meta::empty())))
}

pub async fn unsubscribe(
    state: &AppState,
    user: &AuthUser,
    target_id: i64,
) -> AppResult<ApiResponse<Ack>> {
    let target = find_user(&state.orm, target_id).await?;

    let result = Subscriptions::delete_many()
        .filter(SubCol::UserId.eq(user.user_id))
        .filter(SubCol::SubscribingId.eq(target.id))
        .exec(&state.orm)
        .await?;
    if result.rows_affected == 0 {
        return Err(AppError::bad_request("Not subscribed to this user"));
    }

    audit::record(
        &state.pool,
        user.user_id,
        "unsubscribe",
        "subscriptions",
        serde_json::json!({ "subscribing_id": target.id }),
    )
    .await;

    Ok(ApiResponse::done("Unsubscribed"))
}

pub async fn list_subscriptions(
    state: &AppState,
    user: &AuthUser,
    query: SubscriptionQuery,
) -> AppResult<ApiResponse<SubscriptionList>> {
    let (page, limit, offset) = query.pagination().normalize();

    let edges = Subscriptions::find()
        .filter(SubCol::UserId.eq(user.user_id))
        .order_by_desc(SubCol::Id);
    let total = edges.clone().count(&state.orm).await? as i64;
    let target_ids: Vec<i64> = edges
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(|edge| edge.subscribing_id)
        .collect();

    let mut authors = Users::find()
        .filter(UserCol::Id.is_in(target_ids.clone()))
        .all(&state.orm)
        .await?;
    authors.sort_by_key(|author| {
        target_ids
            .iter()
            .position(|id| *id == author.id)
            .unwrap_or(usize::MAX)
    });

    let recipes_limit = query.recipes_limit.unwrap_or(SUBSCRIPTION_RECIPES_PREVIEW);
    let items = subscription_views(&state.orm, user.user_id, authors, recipes_limit).await?;

    Ok(ApiResponse::success(
        "Subscriptions",
        SubscriptionList { items },
        Some(Meta::new(page, limit, total)),
    ))
}
