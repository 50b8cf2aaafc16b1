use recipe_book_api::{
    dto::recipes::{IngredientAmountRequest, RecipeWriteRequest},
    error::AppError,
    validation::{
        IngredientAmount, ensure_email, ensure_in_range, ensure_not_self, ensure_username,
        validate_associations,
    },
};

fn amount(ingredient_id: i64, amount: i32) -> IngredientAmount {
    IngredientAmount {
        ingredient_id,
        amount,
    }
}

fn message(err: AppError) -> String {
    match err {
        AppError::BadRequest(msg) => msg,
        other => panic!("expected bad request, got {other:?}"),
    }
}

fn recipe_request() -> RecipeWriteRequest {
    RecipeWriteRequest {
        name: "Pancakes".into(),
        text: "Mix and fry.".into(),
        cooking_time: 20,
        image: None,
        ingredients: vec![
            IngredientAmountRequest { id: 1, amount: 200 },
            IngredientAmountRequest { id: 2, amount: 2 },
        ],
        tags: vec![1],
    }
}

#[test]
fn range_bounds_are_inclusive() {
    assert!(ensure_in_range("cooking_time", 1).is_ok());
    assert!(ensure_in_range("cooking_time", 10_000).is_ok());
    assert!(ensure_in_range("cooking_time", 0).is_err());
    assert!(ensure_in_range("cooking_time", 10_001).is_err());
}

#[test]
fn associations_require_tags_and_ingredients() {
    let err = validate_associations(&[], &[amount(1, 5)]).unwrap_err();
    assert_eq!(message(err), "tags required");

    let err = validate_associations(&[1], &[]).unwrap_err();
    assert_eq!(message(err), "ingredients required");
}

#[test]
fn duplicate_tag_is_rejected() {
    let err = validate_associations(&[3, 4, 3], &[amount(1, 5)]).unwrap_err();
    assert_eq!(message(err), "duplicate tag 3");
}

#[test]
fn same_ingredient_with_different_amounts_is_a_duplicate() {
    let err = validate_associations(&[1], &[amount(7, 5), amount(7, 10)]).unwrap_err();
    assert_eq!(message(err), "duplicate ingredient 7");
}

#[test]
fn out_of_range_amount_is_rejected() {
    let err = validate_associations(&[1], &[amount(1, 0)]).unwrap_err();
    assert_eq!(message(err), "amount must be between 1 and 10000");
}

#[test]
fn valid_associations_pass() {
    assert!(validate_associations(&[1, 2], &[amount(1, 1), amount(2, 10_000)]).is_ok());
}

#[test]
fn recipe_request_validation_collects_associations() {
    let associations = recipe_request().validate().expect("valid request");
    assert_eq!(associations.tags, vec![1]);
    assert_eq!(associations.ingredients, vec![amount(1, 200), amount(2, 2)]);
}

#[test]
fn recipe_request_rejects_blank_name_and_bad_cooking_time() {
    let mut request = recipe_request();
    request.name = "   ".into();
    assert_eq!(message(request.validate().unwrap_err()), "name is required");

    let mut request = recipe_request();
    request.cooking_time = 0;
    assert_eq!(
        message(request.validate().unwrap_err()),
        "cooking_time must be between 1 and 10000"
    );
}

#[test]
fn self_subscription_is_rejected() {
    assert!(ensure_not_self(4, 4).is_err());
    assert!(ensure_not_self(4, 5).is_ok());
}

#[test]
fn usernames_and_emails_are_checked() {
    assert!(ensure_username("chef.anna+1").is_ok());
    assert!(ensure_username("me").is_err());
    assert!(ensure_username("bad name").is_err());

    assert!(ensure_email("cook@example.com").is_ok());
    assert!(ensure_email("cook.example.com").is_err());
    assert!(ensure_email("cook@localhost").is_err());
}
