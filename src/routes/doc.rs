use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    admin::{AdminRegistry, EntityAdmin},
    dto::{
        admin::AdminRows,
        auth::{LoginRequest, LoginResponse, RegisterRequest, SetPasswordRequest},
        catalog::{IngredientList, TagList},
        recipes::{
            IngredientAmountRequest, RecipeIngredientRead, RecipeList, RecipeRead,
            RecipeWriteRequest, ShoppingList, ShortLinkResponse,
        },
        users::{AvatarRequest, AvatarResponse, SubscriptionList, SubscriptionView, UserList},
    },
    models::{Ingredient, RecipeShort, Tag, UserProfile},
    response::{Ack, ApiResponse, Meta},
    routes::{admin, auth, catalog, health, params, recipes, short_links, users},
    shopping::ShoppingListItem,
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        health::readiness,
        auth::login,
        auth::register,
        users::list_users,
        users::get_user,
        users::me,
        users::set_avatar,
        users::delete_avatar,
        users::set_password,
        users::list_subscriptions,
        users::subscribe,
        users::unsubscribe,
        catalog::list_tags,
        catalog::get_tag,
        catalog::list_ingredients,
        catalog::get_ingredient,
        recipes::list_recipes,
        recipes::get_recipe,
        recipes::create_recipe,
        recipes::update_recipe,
        recipes::delete_recipe,
        recipes::get_link,
        recipes::add_favorite,
        recipes::remove_favorite,
        recipes::add_to_cart,
        recipes::remove_from_cart,
        recipes::download_shopping_cart,
        short_links::follow_short_link,
        admin::registry,
        admin::search_entity
    ),
    components(
        schemas(
            UserProfile,
            Tag,
            Ingredient,
            RecipeShort,
            RegisterRequest,
            LoginRequest,
            LoginResponse,
            SetPasswordRequest,
            AvatarRequest,
            AvatarResponse,
            UserList,
            SubscriptionView,
            SubscriptionList,
            TagList,
            IngredientList,
            IngredientAmountRequest,
            RecipeWriteRequest,
            RecipeIngredientRead,
            RecipeRead,
            RecipeList,
            ShortLinkResponse,
            ShoppingListItem,
            ShoppingList,
            AdminRegistry,
            EntityAdmin,
            AdminRows,
            Ack,
            params::Pagination,
            params::IngredientQuery,
            params::SubscriptionQuery,
            Meta,
            ApiResponse<RecipeRead>,
            ApiResponse<RecipeList>,
            ApiResponse<UserProfile>,
            ApiResponse<SubscriptionView>
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Registration and token endpoints"),
        (name = "Users", description = "User profile endpoints"),
        (name = "Subscriptions", description = "Author subscription endpoints"),
        (name = "Tags", description = "Tag catalog"),
        (name = "Ingredients", description = "Ingredient catalog"),
        (name = "Recipes", description = "Recipe endpoints"),
        (name = "Favorites", description = "Favorite endpoints"),
        (name = "Cart", description = "Shopping cart endpoints"),
        (name = "Admin", description = "Admin endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
