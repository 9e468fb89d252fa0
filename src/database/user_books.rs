use async_trait::async_trait;
use sqlx::PgPool;

use super::models::{NewUserBook, UserBook};
use super::StoreError;

/// Data access for per-user reading lists.
#[async_trait]
pub trait UserBookStore: Send + Sync {
    async fn list_for_user(&self, user_id: i32) -> Result<Vec<UserBook>, StoreError>;
    async fn get(&self, user_id: i32, id: i32) -> Result<Option<UserBook>, StoreError>;
    async fn create(&self, user_id: i32, entry: NewUserBook) -> Result<UserBook, StoreError>;
    async fn delete(&self, user_id: i32, id: i32) -> Result<(), StoreError>;
}

pub struct PgUserBookStore {
    pool: PgPool,
}

impl PgUserBookStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const SELECT: &str = "SELECT id, user_id, book_id, rating, tags, date_added FROM user_book";

#[async_trait]
impl UserBookStore for PgUserBookStore {
    async fn list_for_user(&self, user_id: i32) -> Result<Vec<UserBook>, StoreError> {
        let entries = sqlx::query_as::<_, UserBook>(&format!("{} WHERE user_id = $1", SELECT))
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(entries)
    }

    async fn get(&self, user_id: i32, id: i32) -> Result<Option<UserBook>, StoreError> {
        let entry =
            sqlx::query_as::<_, UserBook>(&format!("{} WHERE user_id = $1 AND id = $2", SELECT))
                .bind(user_id)
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(entry)
    }

    async fn create(&self, user_id: i32, entry: NewUserBook) -> Result<UserBook, StoreError> {
        sqlx::query_as::<_, UserBook>(
            "INSERT INTO user_book (user_id, book_id, rating, tags, date_added) \
             VALUES ($1, $2, $3, $4, NOW()) \
             RETURNING id, user_id, book_id, rating, tags, date_added",
        )
        .bind(user_id)
        .bind(entry.book_id)
        .bind(entry.rating)
        .bind(&entry.tags)
        .fetch_one(&self.pool)
        .await
        .map_err(StoreError::from_write)
    }

    async fn delete(&self, user_id: i32, id: i32) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM user_book WHERE user_id = $1 AND id = $2")
            .bind(user_id)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(format!(
                "No user book by id {} for user {}",
                id, user_id
            )));
        }
        Ok(())
    }
}
