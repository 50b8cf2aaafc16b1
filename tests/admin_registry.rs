use recipe_book_api::{
    admin::AdminRegistry,
    services::admin_service::{project_row, search_sql},
};
use serde_json::json;

#[test]
fn registry_covers_every_entity() {
    let registry = AdminRegistry::standard();
    for name in [
        "users",
        "subscriptions",
        "recipes",
        "ingredients",
        "tags",
        "recipe_ingredients",
        "recipe_tags",
        "favourites",
        "shopping_carts",
    ] {
        assert!(registry.get(name).is_some(), "missing admin entry for {name}");
    }
    assert!(registry.get("audit_logs").is_none());
}

#[test]
fn entity_settings_match_back_office() {
    let registry = AdminRegistry::standard();

    let users = registry.get("users").expect("users");
    assert_eq!(users.search_fields, vec!["email", "username"]);
    assert_eq!(users.empty_value_display, "-empty-");

    let subscriptions = registry.get("subscriptions").expect("subscriptions");
    assert_eq!(subscriptions.empty_value_display, "---");

    let recipes = registry.get("recipes").expect("recipes");
    assert_eq!(recipes.search_fields, vec!["author_username", "name"]);
    assert_eq!(recipes.list_filter, vec!["tag_slugs"]);
    assert!(recipes.list_display.contains(&"favourite_count".to_string()));
}

#[test]
fn search_sql_binds_term_before_paging() {
    let registry = AdminRegistry::standard();
    let tags = registry.get("tags").expect("tags");

    let (rows, count) = search_sql(tags, true, &[]);
    assert!(rows.contains("WHERE (t.name::text ILIKE $1)"));
    assert!(rows.ends_with("LIMIT $2 OFFSET $3"));
    assert!(count.starts_with("SELECT COUNT(*)"));

    let (rows, count) = search_sql(tags, false, &[]);
    assert!(!rows.contains("WHERE"));
    assert!(rows.ends_with("LIMIT $1 OFFSET $2"));
    assert!(!count.contains("$1"));
}

#[test]
fn list_filters_follow_the_search_term() {
    let registry = AdminRegistry::standard();
    let recipes = registry.get("recipes").expect("recipes");

    let (rows, count) = search_sql(recipes, true, &["tag_slugs"]);
    assert!(rows.contains("ILIKE $1) AND $2 = ANY(t.tag_slugs)"));
    assert!(rows.ends_with("LIMIT $3 OFFSET $4"));
    assert!(count.ends_with("$2 = ANY(t.tag_slugs)"));

    let (rows, _) = search_sql(recipes, false, &["tag_slugs"]);
    assert!(rows.contains(" WHERE $1 = ANY(t.tag_slugs) "));
    assert!(rows.ends_with("LIMIT $2 OFFSET $3"));
}

#[test]
fn rows_are_projected_to_list_columns() {
    let registry = AdminRegistry::standard();
    let users = registry.get("users").expect("users");

    let row = json!({
        "id": 9,
        "email": "cook@example.com",
        "username": "cook",
        "first_name": null,
        "last_name": "Doe",
        "recipe_count": 2,
        "subscriber_count": 0,
        "password_hash": "secret"
    });
    let projected = project_row(users, row);

    assert_eq!(projected["id"], 9);
    assert_eq!(projected["first_name"], "-empty-");
    assert_eq!(projected["recipe_count"], 2);
    assert!(projected.get("password_hash").is_none());
}

#[test]
fn serialized_registry_hides_row_sources() {
    let value = serde_json::to_value(AdminRegistry::standard()).expect("serialize");
    let first = &value["entities"][0];
    assert_eq!(first["entity"], "users");
    assert!(first.get("source").is_none());
}

#[test]
fn listed_and_searched_fields_come_from_the_row_source() {
    let registry = AdminRegistry::standard();
    for config in &registry.entities {
        for field in config
            .list_display
            .iter()
            .chain(&config.search_fields)
            .chain(&config.list_filter)
        {
            assert!(
                config.source.contains(field.as_str()),
                "{}: {field} is not selected by its row source",
                config.entity
            );
        }
    }
}
