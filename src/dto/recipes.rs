use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    constants::RECIPE_NAME_LENGTH,
    entity::recipes,
    error::AppResult,
    models::{Tag, UserProfile, media_url},
    shopping::ShoppingListItem,
    validation::{IngredientAmount, ensure_in_range, ensure_not_blank, validate_associations},
};

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct IngredientAmountRequest {
    pub id: i64,
    pub amount: i32,
}

/// Body of recipe create and update.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RecipeWriteRequest {
    pub name: String,
    pub text: String,
    pub cooking_time: i32,
    /// Base64 data URL. Required on create; kept unchanged on update when absent.
    pub image: Option<String>,
    pub ingredients: Vec<IngredientAmountRequest>,
    pub tags: Vec<i64>,
}

/// Validated association sets, applied to a recipe as one unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeAssociations {
    pub tags: Vec<i64>,
    pub ingredients: Vec<IngredientAmount>,
}

impl RecipeWriteRequest {
    pub fn validate(&self) -> AppResult<RecipeAssociations> {
        ensure_not_blank("name", &self.name, RECIPE_NAME_LENGTH)?;
        ensure_not_blank("text", &self.text, usize::MAX)?;
        ensure_in_range("cooking_time", self.cooking_time)?;

        let associations = RecipeAssociations {
            tags: self.tags.clone(),
            ingredients: self
                .ingredients
                .iter()
                .map(|item| IngredientAmount {
                    ingredient_id: item.id,
                    amount: item.amount,
                })
                .collect(),
        };
        validate_associations(&associations.tags, &associations.ingredients)?;
        Ok(associations)
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecipeIngredientRead {
    pub id: i64,
    pub name: String,
    pub measurement_unit: String,
    pub amount: i32,
}

/// Recipe as returned to clients, with flags relative to the requester.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecipeRead {
    pub id: i64,
    pub tags: Vec<Tag>,
    pub author: UserProfile,
    pub ingredients: Vec<RecipeIngredientRead>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
    pub name: String,
    pub image: Option<String>,
    pub text: String,
    pub cooking_time: i32,
}

/// Requester-relative flags for a single recipe.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecipeFlags {
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
}

impl RecipeRead {
    pub fn assemble(
        model: recipes::Model,
        author: UserProfile,
        tags: Vec<Tag>,
        ingredients: Vec<RecipeIngredientRead>,
        flags: RecipeFlags,
    ) -> Self {
        Self {
            id: model.id,
            tags,
            author,
            ingredients,
            is_favorited: flags.is_favorited,
            is_in_shopping_cart: flags.is_in_shopping_cart,
            name: model.name,
            image: model.image.map(|path| media_url(&path)),
            text: model.text,
            cooking_time: model.cooking_time,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct RecipeList {
    #[schema(value_type = Vec<RecipeRead>)]
    pub items: Vec<RecipeRead>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ShortLinkResponse {
    #[serde(rename = "short-link")]
    pub short_link: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct ShoppingList {
    #[schema(value_type = Vec<ShoppingListItem>)]
    pub items: Vec<ShoppingListItem>,
}
