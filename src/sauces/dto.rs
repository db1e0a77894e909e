use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{sauces::repo::Sauce, storage::StorageClient};

/// A sauce as clients see it.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SauceResponse {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub manufacturer: String,
    pub description: String,
    pub main_pepper: String,
    pub heat: i32,
    pub image_url: String,
    pub likes: i32,
    pub dislikes: i32,
    pub users_liked: Vec<Uuid>,
    pub users_disliked: Vec<Uuid>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl SauceResponse {
    pub fn new(sauce: Sauce, storage: &dyn StorageClient) -> Self {
        Self {
            image_url: storage.public_url(&sauce.image_key),
            id: sauce.id,
            user_id: sauce.user_id,
            name: sauce.name,
            manufacturer: sauce.manufacturer,
            description: sauce.description,
            main_pepper: sauce.main_pepper,
            heat: sauce.heat,
            likes: sauce.likes,
            dislikes: sauce.dislikes,
            users_liked: sauce.users_liked,
            users_disliked: sauce.users_disliked,
            created_at: sauce.created_at,
            updated_at: sauce.updated_at,
        }
    }
}
