mod common;

use common::{PNG_DATA_URL, create_ingredient, create_tag, create_user, database_url, setup_state};
use recipe_book_api::{
    dto::{
        auth::{LoginRequest, RegisterRequest, SetPasswordRequest},
        recipes::{IngredientAmountRequest, RecipeWriteRequest},
    },
    error::AppError,
    middleware::auth::{AuthUser, decode_token},
    routes::params::{AdminSearchQuery, IngredientQuery, RecipeQuery, SubscriptionQuery},
    services::{
        admin_service, auth_service, cart_service, catalog_service, favorite_service,
        recipe_service, user_service,
    },
    shopping,
};

fn recipe(name: &str, tag: i64, ingredients: Vec<(i64, i32)>) -> RecipeWriteRequest {
    RecipeWriteRequest {
        name: name.into(),
        text: "Steps.".into(),
        cooking_time: 30,
        image: Some(PNG_DATA_URL.into()),
        ingredients: ingredients
            .into_iter()
            .map(|(id, amount)| IngredientAmountRequest { id, amount })
            .collect(),
        tags: vec![tag],
    }
}

// Integration flow: register -> login, favourite and cart toggles, shopping list,
// subscriptions, and admin search over the same data.
#[tokio::test]
async fn favourites_cart_subscriptions_and_admin_flow() -> anyhow::Result<()> {
    // Allow skipping when no DB is configured in the environment.
    let Some(database_url) = database_url() else {
        eprintln!("Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration flow tests.");
        return Ok(());
    };
    let state = setup_state(&database_url).await?;

    // Register and log in
    let profile = auth_service::register_user(
        &state,
        RegisterRequest {
            email: "Reader@Example.com".into(),
            username: "reader".into(),
            first_name: "Rea".into(),
            last_name: "Der".into(),
            password: "longpassword".into(),
        },
    )
    .await?
    .data
    .expect("profile");
    assert_eq!(profile.email, "reader@example.com");

    let duplicate = auth_service::register_user(
        &state,
        RegisterRequest {
            email: "reader@example.com".into(),
            username: "reader2".into(),
            first_name: "Rea".into(),
            last_name: "Der".into(),
            password: "longpassword".into(),
        },
    )
    .await;
    assert!(matches!(duplicate, Err(AppError::BadRequest(_))));

    let token = auth_service::login_user(
        &state,
        LoginRequest {
            email: "reader@example.com".into(),
            password: "longpassword".into(),
        },
    )
    .await?
    .data
    .expect("token")
    .token;
    let reader: AuthUser = decode_token(&state.config.jwt_secret, &token)?;
    assert_eq!(reader.user_id, profile.id);

    let wrong = auth_service::set_password(
        &state,
        &reader,
        SetPasswordRequest {
            current_password: "nope".into(),
            new_password: "anotherpassword".into(),
        },
    )
    .await;
    assert!(matches!(wrong, Err(AppError::BadRequest(_))));
    auth_service::set_password(
        &state,
        &reader,
        SetPasswordRequest {
            current_password: "longpassword".into(),
            new_password: "anotherpassword".into(),
        },
    )
    .await?;

    // Catalog and recipes by another author
    let chef = create_user(&state, "chef", "user").await?;
    let admin = create_user(&state, "boss", "admin").await?;
    let lunch = create_tag(&state, "Lunch", "lunch").await?;
    let sugar = create_ingredient(&state, "sugar", "g").await?;
    let eggs = create_ingredient(&state, "eggs", "pcs").await?;
    create_ingredient(&state, "cocoa 70%", "g").await?;

    let percent = catalog_service::list_ingredients(
        &state,
        IngredientQuery {
            name: Some("%".into()),
        },
    )
    .await?
    .data
    .expect("ingredients")
    .items;
    assert_eq!(percent.len(), 1);
    assert!(percent.iter().all(|i| i.name.contains('%')));

    let underscore = catalog_service::list_ingredients(
        &state,
        IngredientQuery {
            name: Some("_".into()),
        },
    )
    .await?
    .data
    .expect("ingredients")
    .items;
    assert!(underscore.is_empty());

    let by_name = catalog_service::list_ingredients(
        &state,
        IngredientQuery {
            name: Some("EG".into()),
        },
    )
    .await?
    .data
    .expect("ingredients")
    .items;
    assert_eq!(by_name.len(), 1);
    assert_eq!(by_name[0].id, eggs);

    let cake = recipe_service::create_recipe(&state, &chef, recipe("Cake", lunch, vec![(sugar, 100), (eggs, 3)]))
        .await?
        .data
        .expect("cake");
    let cookies = recipe_service::create_recipe(&state, &chef, recipe("Cookies", lunch, vec![(sugar, 50)]))
        .await?
        .data
        .expect("cookies");

    // Favourites
    favorite_service::add_favorite(&state, &reader, cake.id).await?;
    let again = favorite_service::add_favorite(&state, &reader, cake.id).await;
    assert!(matches!(again, Err(AppError::BadRequest(_))));
    let missing = favorite_service::add_favorite(&state, &reader, 9_999).await;
    assert!(matches!(missing, Err(AppError::NotFound)));

    let favourites = recipe_service::list_recipes(
        &state,
        Some(reader.user_id),
        RecipeQuery::from_pairs(vec![("is_favorited".into(), "1".into())])?,
    )
    .await?
    .data
    .expect("favourites");
    assert_eq!(favourites.items.len(), 1);
    assert!(favourites.items[0].is_favorited);

    favorite_service::remove_favorite(&state, &reader, cake.id).await?;
    let gone = favorite_service::remove_favorite(&state, &reader, cake.id).await;
    assert!(matches!(gone, Err(AppError::BadRequest(_))));

    // Shopping cart and aggregated list
    let empty = cart_service::shopping_list(&state, &reader).await?;
    assert!(empty.is_empty());

    cart_service::add_to_cart(&state, &reader, cake.id).await?;
    cart_service::add_to_cart(&state, &reader, cookies.id).await?;
    let again = cart_service::add_to_cart(&state, &reader, cake.id).await;
    assert!(matches!(again, Err(AppError::BadRequest(_))));

    let view = recipe_service::get_recipe(&state, Some(reader.user_id), cake.id)
        .await?
        .data
        .expect("cake");
    assert!(view.is_in_shopping_cart);

    let items = cart_service::shopping_list(&state, &reader).await?;
    assert_eq!(items.len(), 2);
    assert_eq!((items[0].name.as_str(), items[0].total_amount), ("eggs", 3));
    assert_eq!((items[1].name.as_str(), items[1].total_amount), ("sugar", 150));
    assert!(shopping::render_text(&items).contains("2. sugar (g) - 150"));

    cart_service::remove_from_cart(&state, &reader, cookies.id).await?;
    let items = cart_service::shopping_list(&state, &reader).await?;
    assert_eq!(items[1].total_amount, 100);

    // Subscriptions
    let self_sub = user_service::subscribe(&state, &reader, reader.user_id, None).await;
    assert!(matches!(self_sub, Err(AppError::BadRequest(_))));

    let card = user_service::subscribe(&state, &reader, chef.user_id, Some(1))
        .await?
        .data
        .expect("card");
    assert!(card.user.is_subscribed);
    assert_eq!(card.recipes_count, 2);
    assert_eq!(card.recipes.len(), 1);

    let twice = user_service::subscribe(&state, &reader, chef.user_id, None).await;
    assert!(matches!(twice, Err(AppError::BadRequest(_))));

    let list = user_service::list_subscriptions(
        &state,
        &reader,
        SubscriptionQuery {
            page: None,
            per_page: None,
            recipes_limit: None,
        },
    )
    .await?
    .data
    .expect("subscriptions");
    assert_eq!(list.items.len(), 1);
    assert_eq!(list.items[0].recipes.len(), 2);

    let chef_profile = user_service::get_user(&state, Some(reader.user_id), chef.user_id)
        .await?
        .data
        .expect("chef");
    assert!(chef_profile.is_subscribed);

    user_service::unsubscribe(&state, &reader, chef.user_id).await?;
    let not_subscribed = user_service::unsubscribe(&state, &reader, chef.user_id).await;
    assert!(matches!(not_subscribed, Err(AppError::BadRequest(_))));

    // Admin back office
    let forbidden = admin_service::registry(&state, &reader).await;
    assert!(matches!(forbidden, Err(AppError::Forbidden)));

    let rows = admin_service::search(
        &state,
        &admin,
        "recipes",
        AdminSearchQuery {
            q: Some("chef".into()),
            ..AdminSearchQuery::default()
        },
    )
    .await?;
    assert_eq!(rows.meta.as_ref().and_then(|m| m.total), Some(2));
    let rows = rows.data.expect("rows").items;
    assert!(rows.iter().all(|row| row["author_username"] == "chef"));

    let lunch_rows = admin_service::search(
        &state,
        &admin,
        "recipes",
        AdminSearchQuery::from_pairs(vec![("tag_slugs".into(), "lunch".into())])?,
    )
    .await?;
    assert_eq!(lunch_rows.meta.as_ref().and_then(|m| m.total), Some(2));
    let dinner_rows = admin_service::search(
        &state,
        &admin,
        "recipes",
        AdminSearchQuery::from_pairs(vec![
            ("q".into(), "cake".into()),
            ("tag_slugs".into(), "dinner".into()),
        ])?,
    )
    .await?;
    assert_eq!(dinner_rows.meta.as_ref().and_then(|m| m.total), Some(0));
    let bad_filter = admin_service::search(
        &state,
        &admin,
        "recipes",
        AdminSearchQuery::from_pairs(vec![("password_hash".into(), "x".into())])?,
    )
    .await;
    assert!(matches!(bad_filter, Err(AppError::BadRequest(_))));

    // Wildcards in search terms match literally
    let wildcard = admin_service::search(
        &state,
        &admin,
        "recipes",
        AdminSearchQuery {
            q: Some("_".into()),
            ..AdminSearchQuery::default()
        },
    )
    .await?;
    assert_eq!(wildcard.meta.as_ref().and_then(|m| m.total), Some(0));

    let unknown = admin_service::search(&state, &admin, "audit_logs", AdminSearchQuery::default()).await;
    assert!(matches!(unknown, Err(AppError::NotFound)));

    let (audit_rows,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM audit_logs WHERE user_id = $1")
        .bind(reader.user_id)
        .fetch_one(&state.pool)
        .await?;
    assert!(audit_rows > 0);

    tokio::fs::remove_dir_all(&state.config.media_root).await.ok();
    Ok(())
}
