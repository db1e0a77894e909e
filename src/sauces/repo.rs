use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::RepoError;

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Sauce {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub manufacturer: String,
    pub description: String,
    pub main_pepper: String,
    pub heat: i32,
    pub image_key: String,
    pub likes: i32,
    pub dislikes: i32,
    pub users_liked: Vec<Uuid>,
    pub users_disliked: Vec<Uuid>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[async_trait]
pub trait SauceRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Sauce>, RepoError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Sauce>, RepoError>;
    async fn insert(&self, sauce: &Sauce) -> Result<(), RepoError>;
    /// Writes the editable columns and the image key. Reactions are untouched.
    async fn update_details(&self, sauce: &Sauce) -> Result<(), RepoError>;
    /// Writes the reaction columns only.
    async fn update_reactions(&self, sauce: &Sauce) -> Result<(), RepoError>;
    async fn delete(&self, id: Uuid) -> Result<(), RepoError>;
}

const SAUCE_COLUMNS: &str = "id, user_id, name, manufacturer, description, main_pepper, heat, \
     image_key, likes, dislikes, users_liked, users_disliked, created_at, updated_at";

#[derive(Clone)]
pub struct PgSauceRepository {
    db: PgPool,
}

impl PgSauceRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

fn expect_one_row(rows_affected: u64) -> Result<(), RepoError> {
    if rows_affected == 0 {
        Err(RepoError::NotFound)
    } else {
        Ok(())
    }
}

#[async_trait]
impl SauceRepository for PgSauceRepository {
    async fn list(&self) -> Result<Vec<Sauce>, RepoError> {
        let rows = sqlx::query_as::<_, Sauce>(&format!(
            "SELECT {SAUCE_COLUMNS} FROM sauces ORDER BY created_at DESC"
        ))
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Sauce>, RepoError> {
        let row = sqlx::query_as::<_, Sauce>(&format!(
            "SELECT {SAUCE_COLUMNS} FROM sauces WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn insert(&self, sauce: &Sauce) -> Result<(), RepoError> {
        sqlx::query(
            r#"
            INSERT INTO sauces (id, user_id, name, manufacturer, description, main_pepper,
                                heat, image_key, likes, dislikes, users_liked, users_disliked,
                                created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            "#,
        )
        .bind(sauce.id)
        .bind(sauce.user_id)
        .bind(&sauce.name)
        .bind(&sauce.manufacturer)
        .bind(&sauce.description)
        .bind(&sauce.main_pepper)
        .bind(sauce.heat)
        .bind(&sauce.image_key)
        .bind(sauce.likes)
        .bind(sauce.dislikes)
        .bind(&sauce.users_liked)
        .bind(&sauce.users_disliked)
        .bind(sauce.created_at)
        .bind(sauce.updated_at)
        .execute(&self.db)
        .await?;
        Ok(())
    }

    async fn update_details(&self, sauce: &Sauce) -> Result<(), RepoError> {
        let res = sqlx::query(
            r#"
            UPDATE sauces
               SET name = $2, manufacturer = $3, description = $4, main_pepper = $5,
                   heat = $6, image_key = $7, updated_at = $8
             WHERE id = $1
            "#,
        )
        .bind(sauce.id)
        .bind(&sauce.name)
        .bind(&sauce.manufacturer)
        .bind(&sauce.description)
        .bind(&sauce.main_pepper)
        .bind(sauce.heat)
        .bind(&sauce.image_key)
        .bind(sauce.updated_at)
        .execute(&self.db)
        .await?;
        expect_one_row(res.rows_affected())
    }

    async fn update_reactions(&self, sauce: &Sauce) -> Result<(), RepoError> {
        let res = sqlx::query(
            r#"
            UPDATE sauces
               SET likes = $2, dislikes = $3, users_liked = $4, users_disliked = $5
             WHERE id = $1
            "#,
        )
        .bind(sauce.id)
        .bind(sauce.likes)
        .bind(sauce.dislikes)
        .bind(&sauce.users_liked)
        .bind(&sauce.users_disliked)
        .execute(&self.db)
        .await?;
        expect_one_row(res.rows_affected())
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let res = sqlx::query("DELETE FROM sauces WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;
        expect_one_row(res.rows_affected())
    }
}
