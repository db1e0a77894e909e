use axum::{
    async_trait,
    extract::{FromRequest, Multipart, Request},
    http::header::CONTENT_TYPE,
    Json,
};
use bytes::Bytes;
use serde_json::{Map, Value};

use crate::error::AppError;

pub struct UploadItem {
    pub body: Bytes,
    pub content_type: String,
}

/// Body of a sauce create/update: either plain JSON, or multipart with a
/// `sauce` field holding JSON text and an optional `image` file.
pub struct SauceForm {
    pub sauce: Value,
    pub image: Option<UploadItem>,
}

fn is_multipart(req: &Request) -> bool {
    req.headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("multipart/form-data"))
}

#[async_trait]
impl<S> FromRequest<S> for SauceForm
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if !is_multipart(&req) {
            let Json(sauce) = Json::<Value>::from_request(req, state)
                .await
                .map_err(|rejection| AppError::bad_request(rejection.body_text()))?;
            return Ok(Self { sauce, image: None });
        }

        let mut mp = Multipart::from_request(req, state)
            .await
            .map_err(|rejection| AppError::bad_request(rejection.body_text()))?;

        let mut sauce = None;
        let mut image = None;
        while let Some(field) = mp
            .next_field()
            .await
            .map_err(|e| AppError::bad_request(e.body_text()))?
        {
            let name = field.name().map(|s| s.to_string());
            match name.as_deref() {
                Some("sauce") => {
                    let text = field
                        .text()
                        .await
                        .map_err(|e| AppError::bad_request(e.body_text()))?;
                    let value = serde_json::from_str::<Value>(&text).map_err(|e| {
                        AppError::bad_request(format!("sauce field is not valid JSON: {e}"))
                    })?;
                    sauce = Some(value);
                }
                Some("image") => {
                    let content_type = field
                        .content_type()
                        .map(|s| s.to_string())
                        .unwrap_or_else(|| "application/octet-stream".into());
                    let body = field
                        .bytes()
                        .await
                        .map_err(|e| AppError::bad_request(e.body_text()))?;
                    if !body.is_empty() {
                        image = Some(UploadItem { body, content_type });
                    }
                }
                _ => {}
            }
        }

        Ok(Self {
            sauce: sauce.unwrap_or_else(|| Value::Object(Map::new())),
            image,
        })
    }
}
