use axum::{
    async_trait,
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use tracing::warn;
use uuid::Uuid;

use crate::{auth::jwt::AuthUser, error::AppError, sauces::repo::Sauce, state::AppState};

/// `:id` from the route. Anything that is not a UUID is a 400, never a 404.
#[derive(Debug, Clone, Copy)]
pub struct SauceId(pub Uuid);

pub fn parse_sauce_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::bad_request(format!("Malformed sauce id {raw:?}")))
}

#[async_trait]
impl<S> FromRequestParts<S> for SauceId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError::bad_request(rejection.body_text()))?;
        parse_sauce_id(&raw).map(SauceId)
    }
}

pub async fn load_sauce(st: &AppState, id: Uuid) -> Result<Sauce, AppError> {
    st.sauces
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found("The resource you're requesting doesn't exist"))
}

pub fn ensure_owner(sauce: &Sauce, user_id: Uuid) -> Result<(), AppError> {
    if sauce.user_id != user_id {
        warn!(sauce_id = %sauce.id, %user_id, "ownership check failed");
        return Err(AppError::forbidden(
            "Invalid request, you don't have the right to access this resource",
        ));
    }
    Ok(())
}

/// A sauce the caller owns. Extraction runs authentication, id parsing,
/// lookup and the owner comparison, in that order.
#[derive(Debug)]
pub struct OwnedSauce {
    pub user_id: Uuid,
    pub sauce: Sauce,
}

#[async_trait]
impl FromRequestParts<AppState> for OwnedSauce {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let AuthUser(user_id) = AuthUser::from_request_parts(parts, state).await?;
        let SauceId(id) = SauceId::from_request_parts(parts, state).await?;
        let sauce = load_sauce(state, id).await?;
        ensure_owner(&sauce, user_id)?;
        Ok(Self { user_id, sauce })
    }
}
