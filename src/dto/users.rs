use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{RecipeShort, UserProfile};

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct UserList {
    #[schema(value_type = Vec<UserProfile>)]
    pub items: Vec<UserProfile>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AvatarRequest {
    /// Base64 data URL, e.g. `data:image/png;base64,...`.
    pub avatar: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AvatarResponse {
    pub avatar: String,
}

/// An author as seen from a subscriber: profile, recipe preview and total.
#[derive(Debug, Serialize, ToSchema)]
pub struct SubscriptionView {
    #[serde(flatten)]
    pub user: UserProfile,
    pub recipes: Vec<RecipeShort>,
    pub recipes_count: i64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct SubscriptionList {
    #[schema(value_type = Vec<SubscriptionView>)]
    pub items: Vec<SubscriptionView>,
}
