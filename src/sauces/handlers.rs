use axum::{
    extract::{DefaultBodyLimit, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tracing::instrument;

use crate::{
    auth::jwt::AuthUser,
    error::AppError,
    extract::JsonBody,
    sauces::{
        dto::SauceResponse,
        guard::{OwnedSauce, SauceId},
        payload::SauceForm,
        reaction::parse_reaction,
        services,
    },
    state::AppState,
};

pub fn sauce_routes(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/sauces", get(list_sauces).post(create_sauce))
        .route(
            "/sauces/:id",
            get(get_sauce).put(update_sauce).delete(delete_sauce),
        )
        .route("/sauces/:id/like", post(like_sauce))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
}

fn message(text: &str) -> Json<Value> {
    Json(json!({ "message": text }))
}

#[instrument(skip(state))]
pub async fn list_sauces(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
) -> Result<Json<Vec<SauceResponse>>, AppError> {
    let sauces = services::list_sauces(&state).await?;
    let items = sauces
        .into_iter()
        .map(|s| SauceResponse::new(s, state.storage.as_ref()))
        .collect();
    Ok(Json(items))
}

#[instrument(skip(state))]
pub async fn get_sauce(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    SauceId(id): SauceId,
) -> Result<Json<SauceResponse>, AppError> {
    let sauce = services::get_sauce(&state, id).await?;
    Ok(Json(SauceResponse::new(sauce, state.storage.as_ref())))
}

#[instrument(skip(state, form))]
pub async fn create_sauce(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    form: SauceForm,
) -> Result<(StatusCode, Json<Value>), AppError> {
    services::create_sauce(&state, user_id, &form.sauce, form.image).await?;
    Ok((StatusCode::CREATED, message("Sauce saved")))
}

#[instrument(skip(state, owned, form), fields(sauce_id = %owned.sauce.id, user_id = %owned.user_id))]
pub async fn update_sauce(
    State(state): State<AppState>,
    owned: OwnedSauce,
    form: SauceForm,
) -> Result<Json<Value>, AppError> {
    services::update_sauce(&state, owned.sauce, &form.sauce, form.image).await?;
    Ok(message("Sauce updated"))
}

#[instrument(skip(state, owned), fields(sauce_id = %owned.sauce.id, user_id = %owned.user_id))]
pub async fn delete_sauce(
    State(state): State<AppState>,
    owned: OwnedSauce,
) -> Result<Json<Value>, AppError> {
    services::delete_sauce(&state, owned.sauce).await?;
    Ok(message("Sauce deleted"))
}

#[instrument(skip(state, body))]
pub async fn like_sauce(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    SauceId(id): SauceId,
    JsonBody(body): JsonBody<Value>,
) -> Result<Json<Value>, AppError> {
    let reaction = parse_reaction(&body).map_err(AppError::Validation)?;
    services::react(&state, user_id, id, reaction).await?;
    Ok(message("Reaction saved"))
}
