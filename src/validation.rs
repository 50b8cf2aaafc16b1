//! Input checks for the write-side view models.

use std::collections::HashSet;

use crate::{
    constants::{MAX_VALUE, MIN_VALUE},
    error::{AppError, AppResult},
};

/// One requested `(ingredient, amount)` pair of a recipe submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngredientAmount {
    pub ingredient_id: i64,
    pub amount: i32,
}

pub fn ensure_in_range(field: &str, value: i32) -> AppResult<()> {
    if !(MIN_VALUE..=MAX_VALUE).contains(&value) {
        return Err(AppError::bad_request(format!(
            "{field} must be between {MIN_VALUE} and {MAX_VALUE}"
        )));
    }
    Ok(())
}

pub fn ensure_not_blank(field: &str, value: &str, max_len: usize) -> AppResult<()> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::bad_request(format!("{field} is required")));
    }
    if trimmed.chars().count() > max_len {
        return Err(AppError::bad_request(format!(
            "{field} must be at most {max_len} characters"
        )));
    }
    Ok(())
}

/// Tags and ingredients of a recipe: both present, no repeats, amounts in range.
///
/// Ingredients are keyed on the ingredient id alone, so the same ingredient
/// listed twice with different amounts is a duplicate.
pub fn validate_associations(tags: &[i64], ingredients: &[IngredientAmount]) -> AppResult<()> {
    if tags.is_empty() {
        return Err(AppError::bad_request("tags required"));
    }
    if ingredients.is_empty() {
        return Err(AppError::bad_request("ingredients required"));
    }

    let mut seen_tags = HashSet::with_capacity(tags.len());
    for tag in tags {
        if !seen_tags.insert(*tag) {
            return Err(AppError::bad_request(format!("duplicate tag {tag}")));
        }
    }

    let mut seen_ingredients = HashSet::with_capacity(ingredients.len());
    for item in ingredients {
        ensure_in_range("amount", item.amount)?;
        if !seen_ingredients.insert(item.ingredient_id) {
            return Err(AppError::bad_request(format!(
                "duplicate ingredient {}",
                item.ingredient_id
            )));
        }
    }

    Ok(())
}

pub fn ensure_not_self(user_id: i64, target_id: i64) -> AppResult<()> {
    if user_id == target_id {
        return Err(AppError::bad_request("cannot subscribe to self"));
    }
    Ok(())
}

/// Loose sanity check; the unique index is the real guard.
pub fn ensure_email(value: &str) -> AppResult<()> {
    ensure_not_blank("email", value, crate::constants::EMAIL_LENGTH)?;
    let valid = value
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
    if !valid {
        return Err(AppError::bad_request("email is invalid"));
    }
    Ok(())
}

/// Usernames follow the `[\w.@+-]` rule of the account model.
pub fn ensure_username(value: &str) -> AppResult<()> {
    ensure_not_blank("username", value, crate::constants::NAME_LENGTH)?;
    let allowed = value
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '_' | '.' | '@' | '+' | '-'));
    if !allowed || value == "me" {
        return Err(AppError::bad_request("username is invalid"));
    }
    Ok(())
}
