use async_trait::async_trait;
use sqlx::PgPool;

use super::models::{NewTag, Tag};
use super::StoreError;

/// Data access for tags.
#[async_trait]
pub trait TagStore: Send + Sync {
    async fn find_all(&self) -> Result<Vec<Tag>, StoreError>;
    async fn get(&self, id: i32) -> Result<Option<Tag>, StoreError>;
    async fn create(&self, tag: NewTag) -> Result<Tag, StoreError>;
    async fn delete(&self, id: i32) -> Result<(), StoreError>;
}

pub struct PgTagStore {
    pool: PgPool,
}

impl PgTagStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TagStore for PgTagStore {
    async fn find_all(&self) -> Result<Vec<Tag>, StoreError> {
        let tags = sqlx::query_as::<_, Tag>("SELECT id, name, data FROM tag")
            .fetch_all(&self.pool)
            .await?;
        Ok(tags)
    }

    async fn get(&self, id: i32) -> Result<Option<Tag>, StoreError> {
        let tag = sqlx::query_as::<_, Tag>("SELECT id, name, data FROM tag WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(tag)
    }

    async fn create(&self, tag: NewTag) -> Result<Tag, StoreError> {
        sqlx::query_as::<_, Tag>(
            "INSERT INTO tag (name, data) VALUES ($1, $2) RETURNING id, name, data",
        )
        .bind(&tag.name)
        .bind(&tag.data)
        .fetch_one(&self.pool)
        .await
        .map_err(StoreError::from_write)
    }

    async fn delete(&self, id: i32) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM tag WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(format!("No tag by id {}", id)));
        }
        Ok(())
    }
}
