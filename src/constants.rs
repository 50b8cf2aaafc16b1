//! Field bounds shared by validation and the schema in `migrations/`.

pub const MIN_VALUE: i32 = 1;
pub const MAX_VALUE: i32 = 10_000;

pub const NAME_LENGTH: usize = 150;
pub const EMAIL_LENGTH: usize = 254;
pub const RECIPE_NAME_LENGTH: usize = 256;

/// Recipes embedded in a subscription card unless `recipes_limit` says otherwise.
pub const SUBSCRIPTION_RECIPES_PREVIEW: u64 = 3;

pub const ROLE_USER: &str = "user";
pub const ROLE_ADMIN: &str = "admin";
