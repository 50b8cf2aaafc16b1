//! Back-office configuration: which columns each entity lists, searches and
//! filters on. Built once at startup and carried in [`crate::state::AppState`].

use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EntityAdmin {
    pub entity: String,
    pub list_display: Vec<String>,
    pub search_fields: Vec<String>,
    /// Array columns of `source`; `?<field>=<value>` keeps rows whose array holds `value`.
    pub list_filter: Vec<String>,
    pub empty_value_display: String,
    /// Row source; every listed or searched field is a column of this select.
    #[serde(skip)]
    pub source: String,
}

impl EntityAdmin {
    fn new(entity: &str, source: &str) -> Self {
        Self {
            entity: entity.to_string(),
            list_display: Vec::new(),
            search_fields: Vec::new(),
            list_filter: Vec::new(),
            empty_value_display: "-".to_string(),
            source: source.to_string(),
        }
    }

    fn list_display(mut self, fields: &[&str]) -> Self {
        self.list_display = fields.iter().map(|f| f.to_string()).collect();
        self
    }

    fn search_fields(mut self, fields: &[&str]) -> Self {
        self.search_fields = fields.iter().map(|f| f.to_string()).collect();
        self
    }

    fn list_filter(mut self, fields: &[&str]) -> Self {
        self.list_filter = fields.iter().map(|f| f.to_string()).collect();
        self
    }

    fn empty_value_display(mut self, value: &str) -> Self {
        self.empty_value_display = value.to_string();
        self
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AdminRegistry {
    pub entities: Vec<EntityAdmin>,
}

impl AdminRegistry {
    pub fn standard() -> Self {
        let entities = vec![
            EntityAdmin::new(
                "users",
                "SELECT u.id, u.email, u.username, u.first_name, u.last_name, \
                 (SELECT COUNT(*) FROM recipes r WHERE r.author_id = u.id) AS recipe_count, \
                 (SELECT COUNT(*) FROM subscriptions s WHERE s.subscribing_id = u.id) AS subscriber_count \
                 FROM users u",
            )
            .list_display(&[
                "email",
                "username",
                "first_name",
                "last_name",
                "recipe_count",
                "subscriber_count",
            ])
            .search_fields(&["email", "username"])
            .empty_value_display("-empty-"),
            EntityAdmin::new(
                "subscriptions",
                "SELECT s.id, u.username AS user_username, t.username AS subscribing_username \
                 FROM subscriptions s \
                 JOIN users u ON u.id = s.user_id \
                 JOIN users t ON t.id = s.subscribing_id",
            )
            .list_display(&["user_username", "subscribing_username"])
            .search_fields(&["user_username", "subscribing_username"])
            .empty_value_display("---"),
            EntityAdmin::new(
                "recipes",
                "SELECT r.id, r.name, u.username AS author_username, \
                 (SELECT string_agg(i.name, ', ' ORDER BY i.name) FROM recipe_ingredients ri \
                  JOIN ingredients i ON i.id = ri.ingredient_id WHERE ri.recipe_id = r.id) AS ingredient_names, \
                 (SELECT string_agg(t.name, ', ' ORDER BY t.name) FROM recipe_tags rt \
                  JOIN tags t ON t.id = rt.tag_id WHERE rt.recipe_id = r.id) AS tag_names, \
                 ARRAY(SELECT t.slug FROM recipe_tags rt \
                  JOIN tags t ON t.id = rt.tag_id WHERE rt.recipe_id = r.id ORDER BY t.slug) AS tag_slugs, \
                 (SELECT COUNT(*) FROM favourites f WHERE f.recipe_id = r.id) AS favourite_count \
                 FROM recipes r JOIN users u ON u.id = r.author_id",
            )
            .list_display(&[
                "name",
                "author_username",
                "ingredient_names",
                "tag_names",
                "favourite_count",
            ])
            .search_fields(&["author_username", "name"])
            .list_filter(&["tag_slugs"])
            .empty_value_display("-none-"),
            EntityAdmin::new(
                "ingredients",
                "SELECT id, name, measurement_unit FROM ingredients",
            )
            .list_display(&["name", "measurement_unit"])
            .search_fields(&["name"])
            .empty_value_display("-none-"),
            EntityAdmin::new("tags", "SELECT id, name, slug FROM tags")
                .list_display(&["name", "slug"])
                .search_fields(&["name"])
                .empty_value_display("-none-"),
            EntityAdmin::new(
                "recipe_ingredients",
                "SELECT ri.id, r.name AS recipe_name, i.name AS ingredient_name, ri.amount \
                 FROM recipe_ingredients ri \
                 JOIN recipes r ON r.id = ri.recipe_id \
                 JOIN ingredients i ON i.id = ri.ingredient_id",
            )
            .list_display(&["recipe_name", "ingredient_name", "amount"])
            .search_fields(&["recipe_name", "ingredient_name"])
            .empty_value_display("-none-"),
            EntityAdmin::new(
                "recipe_tags",
                "SELECT rt.id, r.name AS recipe_name, t.name AS tag_name \
                 FROM recipe_tags rt \
                 JOIN recipes r ON r.id = rt.recipe_id \
                 JOIN tags t ON t.id = rt.tag_id",
            )
            .list_display(&["recipe_name", "tag_name"])
            .search_fields(&["recipe_name", "tag_name"])
            .empty_value_display("-none-"),
            EntityAdmin::new(
                "favourites",
                "SELECT f.id, u.username AS user_username, r.name AS recipe_name \
                 FROM favourites f \
                 JOIN users u ON u.id = f.user_id \
                 JOIN recipes r ON r.id = f.recipe_id",
            )
            .list_display(&["user_username", "recipe_name"])
            .search_fields(&["user_username", "recipe_name"])
            .empty_value_display("-none-"),
            EntityAdmin::new(
                "shopping_carts",
                "SELECT c.id, u.username AS user_username, r.name AS recipe_name \
                 FROM shopping_carts c \
                 JOIN users u ON u.id = c.user_id \
                 JOIN recipes r ON r.id = c.recipe_id",
            )
            .list_display(&["user_username", "recipe_name"])
            .search_fields(&["user_username", "recipe_name"])
            .empty_value_display("-none-"),
        ];

        Self { entities }
    }

    pub fn get(&self, entity: &str) -> Option<&EntityAdmin> {
        self.entities.iter().find(|e| e.entity == entity)
    }
}
