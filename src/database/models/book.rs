use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::query::Keyed;

/// A book row.
///
/// `id` leads the field list so the derived order is by id first; id is also
/// the identity used when list queries union overlapping filters.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, FromRow)]
pub struct Book {
    pub id: i32,
    pub author_id: i32,
    pub title: String,
    pub year: Option<i32>,
    pub isbns: Vec<String>,
    pub subjects: Vec<String>,
    pub ol_works: Option<String>,
}

impl Keyed for Book {
    fn key(&self) -> i32 {
        self.id
    }
}

/// Transport form of a book. Adds the author display name, denormalized from
/// the author web service; empty when resolution failed.
#[derive(Debug, Clone, Serialize)]
pub struct BookResult {
    pub id: i32,
    pub author_id: i32,
    pub author_name: String,
    pub title: String,
    pub first_published_year: Option<i32>,
    pub isbns: Vec<String>,
    pub subjects: Vec<String>,
    pub openlibrary_work_url: Option<String>,
}

impl BookResult {
    pub fn from_entity(book: Book, author_name: String) -> Self {
        Self {
            id: book.id,
            author_id: book.author_id,
            author_name,
            title: book.title,
            first_published_year: book.year,
            isbns: book.isbns,
            subjects: book.subjects,
            openlibrary_work_url: book.ol_works,
        }
    }
}

/// Payload for creating a book. The id is assigned by the database.
#[derive(Debug, Clone, Deserialize)]
pub struct NewBook {
    pub author_id: i32,
    pub title: String,
    pub first_published_year: Option<i32>,
    #[serde(default)]
    pub isbns: Vec<String>,
    #[serde(default)]
    pub subjects: Vec<String>,
    pub openlibrary_work_url: Option<String>,
}
