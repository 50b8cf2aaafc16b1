use recipe_book_api::{
    db::like_contains,
    error::AppError,
    routes::params::{AdminSearchQuery, Pagination, RecipeQuery},
};

fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
    raw.iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn pagination_defaults_and_clamps() {
    assert_eq!(Pagination::default().normalize(), (1, 6, 0));

    let pagination = Pagination {
        page: Some(3),
        per_page: Some(500),
    };
    assert_eq!(pagination.normalize(), (3, 100, 200));

    let pagination = Pagination {
        page: Some(0),
        per_page: Some(0),
    };
    assert_eq!(pagination.normalize(), (1, 1, 0));
}

#[test]
fn repeated_tags_accumulate() {
    let query = RecipeQuery::from_pairs(pairs(&[
        ("tags", "breakfast"),
        ("tags", "lunch,dinner"),
        ("limit", "10"),
        ("author", "4"),
        ("is_favorited", "1"),
    ]))
    .expect("valid query");

    assert_eq!(query.tags, vec!["breakfast", "lunch", "dinner"]);
    assert_eq!(query.pagination.per_page, Some(10));
    assert_eq!(query.author, Some(4));
    assert!(query.is_favorited);
    assert!(!query.is_in_shopping_cart);
}

#[test]
fn malformed_filters_are_rejected() {
    assert!(RecipeQuery::from_pairs(pairs(&[("author", "abc")])).is_err());
    assert!(RecipeQuery::from_pairs(pairs(&[("is_in_shopping_cart", "maybe")])).is_err());
}

#[test]
fn unknown_keys_are_ignored() {
    let query = RecipeQuery::from_pairs(pairs(&[("utm_source", "mail")])).expect("valid");
    assert!(query.tags.is_empty());
    assert_eq!(query.author, None);
}

#[test]
fn huge_page_numbers_saturate_instead_of_overflowing() {
    let query = RecipeQuery::from_pairs(pairs(&[
        ("page", "9223372036854775807"),
        ("limit", "100"),
    ]))
    .expect("valid query");
    let (page, per_page, offset) = query.pagination.normalize();

    assert_eq!(page, i64::MAX);
    assert_eq!(per_page, 100);
    assert!(offset >= 0);
    assert_eq!(offset, i64::MAX);
}

#[test]
fn admin_query_splits_paging_search_and_filters() {
    let query = AdminSearchQuery::from_pairs(pairs(&[
        ("q", "chef"),
        ("page", "2"),
        ("limit", "10"),
        ("tag_slugs", "lunch"),
    ]))
    .expect("valid query");

    assert_eq!(query.q.as_deref(), Some("chef"));
    assert_eq!(query.pagination.normalize(), (2, 10, 10));
    assert_eq!(query.filters, vec![("tag_slugs".to_string(), "lunch".to_string())]);

    let err = AdminSearchQuery::from_pairs(pairs(&[("page", "two")])).unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));
}

#[test]
fn search_patterns_treat_wildcards_literally() {
    assert_eq!(like_contains("salt"), "%salt%");
    assert_eq!(like_contains("%"), "%\\%%");
    assert_eq!(like_contains("a_b"), "%a\\_b%");
    assert_eq!(like_contains("c:\\tmp"), "%c:\\\\tmp%");
}
