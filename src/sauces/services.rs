use anyhow::Context;
use serde_json::Value;
use time::OffsetDateTime;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    error::{AppError, FieldError},
    sauces::{
        guard::load_sauce,
        payload::UploadItem,
        reaction::{apply_reaction, Reaction},
        repo::Sauce,
        validation::{validate_changes, validate_new},
    },
    state::AppState,
    storage::ext_from_mime,
};

fn image_error(message: &str) -> AppError {
    AppError::Validation(vec![FieldError::new("image", message)])
}

/// Uploads the image and returns its storage key.
pub async fn store_image(st: &AppState, owner: Uuid, image: UploadItem) -> Result<String, AppError> {
    let ext = ext_from_mime(&image.content_type)
        .ok_or_else(|| image_error("image must be a JPEG, PNG, WebP or HEIC file"))?;
    let key = format!("sauces/{}/{}.{}", owner, Uuid::new_v4(), ext);
    st.storage
        .put_object(&key, image.body, &image.content_type)
        .await
        .with_context(|| format!("put_object {}", key))?;
    Ok(key)
}

async fn discard_image(st: &AppState, key: &str) {
    if let Err(e) = st.storage.delete_object(key).await {
        warn!(error = ?e, key, "failed to discard image");
    }
}

pub async fn create_sauce(
    st: &AppState,
    owner: Uuid,
    body: &Value,
    image: Option<UploadItem>,
) -> Result<Sauce, AppError> {
    let new = validate_new(body).map_err(AppError::Validation)?;
    let image = image.ok_or_else(|| image_error("image is required"))?;
    let image_key = store_image(st, owner, image).await?;

    let now = OffsetDateTime::now_utc();
    let sauce = Sauce {
        id: Uuid::new_v4(),
        user_id: owner,
        name: new.name,
        manufacturer: new.manufacturer,
        description: new.description,
        main_pepper: new.main_pepper,
        heat: new.heat,
        image_key,
        likes: 0,
        dislikes: 0,
        users_liked: Vec::new(),
        users_disliked: Vec::new(),
        created_at: now,
        updated_at: now,
    };

    if let Err(e) = st.sauces.insert(&sauce).await {
        discard_image(st, &sauce.image_key).await;
        return Err(e.into());
    }

    info!(sauce_id = %sauce.id, user_id = %owner, "sauce created");
    Ok(sauce)
}

pub async fn list_sauces(st: &AppState) -> Result<Vec<Sauce>, AppError> {
    Ok(st.sauces.list().await?)
}

pub async fn get_sauce(st: &AppState, id: Uuid) -> Result<Sauce, AppError> {
    load_sauce(st, id).await
}

/// `sauce` must already have passed the ownership guard.
pub async fn update_sauce(
    st: &AppState,
    mut sauce: Sauce,
    body: &Value,
    image: Option<UploadItem>,
) -> Result<Sauce, AppError> {
    let changes = validate_changes(body).map_err(AppError::Validation)?;

    let new_key = match image {
        Some(image) => Some(store_image(st, sauce.user_id, image).await?),
        None => None,
    };

    if let Some(name) = changes.name {
        sauce.name = name;
    }
    if let Some(heat) = changes.heat {
        sauce.heat = heat;
    }
    if let Some(description) = changes.description {
        sauce.description = description;
    }
    if let Some(manufacturer) = changes.manufacturer {
        sauce.manufacturer = manufacturer;
    }
    if let Some(main_pepper) = changes.main_pepper {
        sauce.main_pepper = main_pepper;
    }
    let old_key = new_key
        .clone()
        .map(|key| std::mem::replace(&mut sauce.image_key, key));
    sauce.updated_at = OffsetDateTime::now_utc();

    if let Err(e) = st.sauces.update_details(&sauce).await {
        if let Some(key) = &new_key {
            discard_image(st, key).await;
        }
        return Err(e.into());
    }

    // The row is committed; a stale object is only logged.
    if let Some(old_key) = old_key {
        discard_image(st, &old_key).await;
    }

    info!(sauce_id = %sauce.id, image_replaced = new_key.is_some(), "sauce updated");
    Ok(sauce)
}

/// `sauce` must already have passed the ownership guard.
pub async fn delete_sauce(st: &AppState, sauce: Sauce) -> Result<(), AppError> {
    st.sauces.delete(sauce.id).await?;
    discard_image(st, &sauce.image_key).await;
    info!(sauce_id = %sauce.id, "sauce deleted");
    Ok(())
}

pub async fn react(
    st: &AppState,
    user_id: Uuid,
    sauce_id: Uuid,
    reaction: Reaction,
) -> Result<Sauce, AppError> {
    let mut sauce = load_sauce(st, sauce_id).await?;
    let t = apply_reaction(&mut sauce, user_id, reaction);
    st.sauces.update_reactions(&sauce).await?;
    info!(
        %sauce_id,
        %user_id,
        ?reaction,
        likes_delta = t.likes_delta,
        dislikes_delta = t.dislikes_delta,
        "reaction recorded"
    );
    Ok(sauce)
}
