use serde_json::Value;

use crate::{
    admin::{AdminRegistry, EntityAdmin},
    db::like_contains,
    dto::admin::AdminRows,
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    response::{ApiResponse, Meta},
    routes::params::AdminSearchQuery,
    state::AppState,
};

pub async fn registry(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<AdminRegistry>> {
    ensure_admin(user)?;
    Ok(ApiResponse::success(
        "Admin registry",
        state.admin.as_ref().clone(),
        Some(Meta::empty()),
    ))
}

/// SQL for one page of `config`'s rows. The search term, when present, is
/// bound as `$1`, followed by one value per entry of `filters`, then limit and
/// offset. Field names come from the static registry, never from input.
pub fn search_sql(config: &EntityAdmin, with_search: bool, filters: &[&str]) -> (String, String) {
    let mut clauses = Vec::new();
    let mut next_param = 1;
    if with_search && !config.search_fields.is_empty() {
        let matches: Vec<String> = config
            .search_fields
            .iter()
            .map(|field| format!("t.{field}::text ILIKE $1"))
            .collect();
        clauses.push(format!("({})", matches.join(" OR ")));
        next_param += 1;
    }
    for field in filters {
        clauses.push(format!("${next_param} = ANY(t.{field})"));
        next_param += 1;
    }
    let filter = if clauses.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", clauses.join(" AND "))
    };

    let rows = format!(
        "SELECT to_jsonb(t) AS data FROM ({}) t{filter} ORDER BY t.id LIMIT ${} OFFSET ${}",
        config.source,
        next_param,
        next_param + 1
    );
    let count = format!("SELECT COUNT(*) FROM ({}) t{filter}", config.source);
    (rows, count)
}

/// Keep `id` plus the configured list columns; nulls render as the entity's placeholder.
pub fn project_row(config: &EntityAdmin, row: Value) -> Value {
    let Value::Object(mut source) = row else {
        return row;
    };
    let mut out = serde_json::Map::new();
    if let Some(id) = source.remove("id") {
        out.insert("id".to_string(), id);
    }
    for field in &config.list_display {
        let value = match source.remove(field) {
            Some(Value::Null) | None => Value::String(config.empty_value_display.clone()),
            Some(value) => value,
        };
        out.insert(field.clone(), value);
    }
    Value::Object(out)
}

pub async fn search(
    state: &AppState,
    user: &AuthUser,
    entity: &str,
    query: AdminSearchQuery,
) -> AppResult<ApiResponse<AdminRows>> {
    ensure_admin(user)?;
    let config = state.admin.get(entity).ok_or(AppError::NotFound)?;
    let (page, limit, offset) = query.pagination.normalize();
    let term = query
        .q
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty() && !config.search_fields.is_empty())
        .map(like_contains);

    let mut fields = Vec::with_capacity(query.filters.len());
    let mut values = Vec::with_capacity(query.filters.len());
    for (key, value) in &query.filters {
        let field = config
            .list_filter
            .iter()
            .find(|f| *f == key)
            .ok_or_else(|| AppError::bad_request(format!("unknown filter {key}")))?;
        fields.push(field.as_str());
        values.push(value.as_str());
    }

    let (rows_sql, count_sql) = search_sql(config, term.is_some(), &fields);
    let mut rows_query = sqlx::query_as::<_, (Value,)>(&rows_sql);
    let mut count_query = sqlx::query_as::<_, (i64,)>(&count_sql);
    if let Some(term) = &term {
        rows_query = rows_query.bind(term);
        count_query = count_query.bind(term);
    }
    for value in &values {
        rows_query = rows_query.bind(*value);
        count_query = count_query.bind(*value);
    }

    let rows = rows_query
        .bind(limit)
        .bind(offset)
        .fetch_all(&state.pool)
        .await?;
    let (total,) = count_query.fetch_one(&state.pool).await?;

    let items = rows
        .into_iter()
        .map(|(row,)| project_row(config, row))
        .collect();
    Ok(ApiResponse::success(
        entity.to_string(),
        AdminRows { items },
        Some(Meta::new(page, limit, total)),
    ))
}
