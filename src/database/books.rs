use async_trait::async_trait;
use sqlx::PgPool;

use super::models::{Book, NewBook};
use super::StoreError;
use crate::query::PredicateSource;

/// Data access for books. The predicate lookups back the list-endpoint
/// aggregation; the rest is single-record CRUD.
#[async_trait]
pub trait BookStore: PredicateSource<Book> {
    async fn get(&self, id: i32) -> Result<Option<Book>, StoreError>;
    async fn create(&self, book: NewBook) -> Result<Book, StoreError>;
    async fn delete(&self, id: i32) -> Result<(), StoreError>;
}

pub struct PgBookStore {
    pool: PgPool,
}

impl PgBookStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const SELECT: &str = "SELECT id, author_id, title, year, isbns, subjects, ol_works FROM book";

#[async_trait]
impl PredicateSource<Book> for PgBookStore {
    async fn text_match(&self, query: &str) -> Result<Vec<Book>, StoreError> {
        let pattern = format!("%{}%", query);
        let books = sqlx::query_as::<_, Book>(&format!("{} WHERE title ILIKE $1", SELECT))
            .bind(pattern)
            .fetch_all(&self.pool)
            .await?;
        Ok(books)
    }

    async fn id_set(&self, ids: &[i32]) -> Result<Vec<Book>, StoreError> {
        let books = sqlx::query_as::<_, Book>(&format!("{} WHERE id = ANY($1)", SELECT))
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;
        Ok(books)
    }

    async fn foreign_keys(&self, ids: &[i32]) -> Result<Vec<Book>, StoreError> {
        let books = sqlx::query_as::<_, Book>(&format!("{} WHERE author_id = ANY($1)", SELECT))
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;
        Ok(books)
    }

    async fn all(&self) -> Result<Vec<Book>, StoreError> {
        let books = sqlx::query_as::<_, Book>(SELECT)
            .fetch_all(&self.pool)
            .await?;
        Ok(books)
    }
}

#[async_trait]
impl BookStore for PgBookStore {
    async fn get(&self, id: i32) -> Result<Option<Book>, StoreError> {
        let book = sqlx::query_as::<_, Book>(&format!("{} WHERE id = $1", SELECT))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(book)
    }

    async fn create(&self, book: NewBook) -> Result<Book, StoreError> {
        sqlx::query_as::<_, Book>(
            "INSERT INTO book (author_id, title, year, isbns, subjects, ol_works) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING id, author_id, title, year, isbns, subjects, ol_works",
        )
        .bind(book.author_id)
        .bind(&book.title)
        .bind(book.first_published_year)
        .bind(&book.isbns)
        .bind(&book.subjects)
        .bind(&book.openlibrary_work_url)
        .fetch_one(&self.pool)
        .await
        .map_err(StoreError::from_write)
    }

    async fn delete(&self, id: i32) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM book WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(format!("No book by id {}", id)));
        }
        Ok(())
    }
}
