use async_trait::async_trait;
use sqlx::PgPool;

use super::models::{Author, NewAuthor};
use super::StoreError;

/// Data access for authors.
#[async_trait]
pub trait AuthorStore: Send + Sync {
    async fn find_all(&self) -> Result<Vec<Author>, StoreError>;
    async fn find_by_name(&self, name: &str) -> Result<Vec<Author>, StoreError>;
    async fn get(&self, id: i32) -> Result<Option<Author>, StoreError>;
    async fn create(&self, author: NewAuthor) -> Result<Author, StoreError>;
    async fn delete(&self, id: i32) -> Result<(), StoreError>;
}

pub struct PgAuthorStore {
    pool: PgPool,
}

impl PgAuthorStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const SELECT: &str = "SELECT id, name, birth_date, ol_key, image_small, image_medium, \
                      image_large, subjects FROM author";

#[async_trait]
impl AuthorStore for PgAuthorStore {
    async fn find_all(&self) -> Result<Vec<Author>, StoreError> {
        let authors = sqlx::query_as::<_, Author>(SELECT)
            .fetch_all(&self.pool)
            .await?;
        Ok(authors)
    }

    async fn find_by_name(&self, name: &str) -> Result<Vec<Author>, StoreError> {
        let pattern = format!("%{}%", name);
        let authors = sqlx::query_as::<_, Author>(&format!("{} WHERE name ILIKE $1", SELECT))
            .bind(pattern)
            .fetch_all(&self.pool)
            .await?;
        Ok(authors)
    }

    async fn get(&self, id: i32) -> Result<Option<Author>, StoreError> {
        let author = sqlx::query_as::<_, Author>(&format!("{} WHERE id = $1", SELECT))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(author)
    }

    async fn create(&self, author: NewAuthor) -> Result<Author, StoreError> {
        sqlx::query_as::<_, Author>(
            "INSERT INTO author (name, birth_date, ol_key, image_small, image_medium, \
             image_large, subjects) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING id, name, birth_date, ol_key, image_small, image_medium, \
             image_large, subjects",
        )
        .bind(&author.name)
        .bind(&author.birth_date)
        .bind(&author.ol_key)
        .bind(&author.image_small)
        .bind(&author.image_medium)
        .bind(&author.image_large)
        .bind(&author.subjects)
        .fetch_one(&self.pool)
        .await
        .map_err(StoreError::from_write)
    }

    async fn delete(&self, id: i32) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM author WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(format!("No author by id {}", id)));
        }
        Ok(())
    }
}
