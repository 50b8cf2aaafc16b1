#![allow(dead_code)]

use recipe_book_api::{
    config::AppConfig,
    db::{create_orm_conn, run_migrations},
    entity::{
        ingredients::ActiveModel as IngredientActive, tags::ActiveModel as TagActive,
        users::ActiveModel as UserActive,
    },
    middleware::auth::AuthUser,
    state::AppState,
};
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, ConnectionTrait, Set, Statement};

/// 1x1 transparent PNG.
pub const PNG_DATA_URL: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";

pub fn database_url() -> Option<String> {
    std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .ok()
}

pub async fn setup_state(database_url: &str) -> anyhow::Result<AppState> {
    let orm = create_orm_conn(database_url).await?;
    run_migrations(&orm).await?;

    // Clean tables between runs
    let backend = orm.get_database_backend();
    orm.execute(Statement::from_string(
        backend,
        "TRUNCATE TABLE recipe_ingredients, recipe_tags, favourites, shopping_carts, subscriptions, recipes, ingredients, tags, audit_logs, users RESTART IDENTITY CASCADE",
    ))
    .await?;

    let media_root = std::env::temp_dir().join(format!("recipe-media-{}", uuid::Uuid::new_v4()));
    let config = AppConfig {
        database_url: database_url.to_string(),
        host: "127.0.0.1".into(),
        port: 0,
        jwt_secret: "test-secret".into(),
        token_ttl_hours: 1,
        media_root: media_root.to_string_lossy().to_string(),
        public_base_url: "http://food.test".into(),
    };
    Ok(AppState::new(orm, config))
}

pub async fn create_user(state: &AppState, username: &str, role: &str) -> anyhow::Result<AuthUser> {
    let user = UserActive {
        id: NotSet,
        email: Set(format!("{username}@example.com")),
        username: Set(username.to_string()),
        first_name: Set(username.to_string()),
        last_name: Set("Tester".into()),
        avatar: Set(None),
        password_hash: Set("dummy".into()),
        role: Set(role.into()),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    Ok(AuthUser {
        user_id: user.id,
        role: user.role,
    })
}

pub async fn create_tag(state: &AppState, name: &str, slug: &str) -> anyhow::Result<i64> {
    let tag = TagActive {
        id: NotSet,
        name: Set(name.into()),
        slug: Set(slug.into()),
    }
    .insert(&state.orm)
    .await?;
    Ok(tag.id)
}

pub async fn create_ingredient(state: &AppState, name: &str, unit: &str) -> anyhow::Result<i64> {
    let ingredient = IngredientActive {
        id: NotSet,
        name: Set(name.into()),
        measurement_unit: Set(unit.into()),
    }
    .insert(&state.orm)
    .await?;
    Ok(ingredient.id)
}
