use serde::Deserialize;
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct Pagination {
    pub page: Option<i64>,
    #[serde(alias = "limit")]
    pub per_page: Option<i64>,
}

impl Pagination {
    pub fn normalize(&self) -> (i64, i64, i64) {
        let page = self.page.unwrap_or(1).max(1);
        let per_page = self.per_page.unwrap_or(6).clamp(1, 100);
        let offset = (page - 1).saturating_mul(per_page);
        (page, per_page, offset)
    }
}

/// Recipe list filters. `tags` may repeat (`?tags=a&tags=b`), so the query is
/// read as raw pairs and folded here.
#[derive(Debug, Default)]
pub struct RecipeQuery {
    pub pagination: Pagination,
    pub tags: Vec<String>,
    pub author: Option<i64>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
}

impl RecipeQuery {
    pub fn from_pairs(pairs: Vec<(String, String)>) -> AppResult<Self> {
        let mut query = RecipeQuery::default();
        for (key, value) in pairs {
            match key.as_str() {
                "page" => query.pagination.page = Some(parse_number(&key, &value)?),
                "limit" | "per_page" => {
                    query.pagination.per_page = Some(parse_number(&key, &value)?)
                }
                "tags" => query.tags.extend(
                    value
                        .split(',')
                        .map(str::trim)
                        .filter(|slug| !slug.is_empty())
                        .map(str::to_string),
                ),
                "author" => query.author = Some(parse_number(&key, &value)?),
                "is_favorited" => query.is_favorited = parse_flag(&key, &value)?,
                "is_in_shopping_cart" => query.is_in_shopping_cart = parse_flag(&key, &value)?,
                _ => {}
            }
        }
        Ok(query)
    }
}

fn parse_number(key: &str, value: &str) -> AppResult<i64> {
    value
        .trim()
        .parse::<i64>()
        .map_err(|_| AppError::bad_request(format!("{key} must be an integer")))
}

fn parse_flag(key: &str, value: &str) -> AppResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" => Ok(true),
        "0" | "false" | "" => Ok(false),
        _ => Err(AppError::bad_request(format!("{key} must be a boolean"))),
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct IngredientQuery {
    pub name: Option<String>,
}

// Query strings carry numbers as text, which `#[serde(flatten)]` cannot
// coerce, so paging fields are repeated on each query type.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct SubscriptionQuery {
    pub page: Option<i64>,
    #[serde(alias = "limit")]
    pub per_page: Option<i64>,
    pub recipes_limit: Option<u64>,
}

impl SubscriptionQuery {
    pub fn pagination(&self) -> Pagination {
        Pagination {
            page: self.page,
            per_page: self.per_page,
        }
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ShoppingListFormat {
    #[default]
    Txt,
    Json,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ShoppingListQuery {
    pub format: Option<ShoppingListFormat>,
}

/// Admin search input. Keys other than `q` and paging are list filters,
/// checked against the entity's `list_filter` by the service.
#[derive(Debug, Default)]
pub struct AdminSearchQuery {
    pub pagination: Pagination,
    pub q: Option<String>,
    pub filters: Vec<(String, String)>,
}

impl AdminSearchQuery {
    pub fn from_pairs(pairs: Vec<(String, String)>) -> AppResult<Self> {
        let mut query = AdminSearchQuery::default();
        for (key, value) in pairs {
            match key.as_str() {
                "page" => query.pagination.page = Some(parse_number(&key, &value)?),
                "limit" | "per_page" => {
                    query.pagination.per_page = Some(parse_number(&key, &value)?)
                }
                "q" => query.q = Some(value),
                _ => query.filters.push((key, value)),
            }
        }
        Ok(query)
    }
}
