use axum::{
    Router,
    extract::{Path, State},
    response::Redirect,
    routing::get,
};

use crate::{error::AppResult, services::recipe_service, state::AppState};

pub fn router() -> Router<AppState> {
    Router::new().route("/{code}", get(follow_short_link))
}

#[utoipa::path(
    get,
    path = "/s/{code}",
    params(("code" = String, Path, description = "Short code issued by get-link")),
    responses(
        (status = 307, description = "Redirect to the recipe page"),
        (status = 404, description = "Unknown code")
    ),
    tag = "Recipes"
)]
pub async fn follow_short_link(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> AppResult<Redirect> {
    let id = recipe_service::resolve_short_link(&state, &code).await?;
    Ok(Redirect::temporary(&format!("/recipes/{id}")))
}
