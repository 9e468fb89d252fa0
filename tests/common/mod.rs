#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use mybooks_api::database::authors::AuthorStore;
use mybooks_api::database::books::BookStore;
use mybooks_api::database::models::{
    Author, Book, NewAuthor, NewBook, NewTag, NewUserBook, Tag, UserBook,
};
use mybooks_api::database::tags::TagStore;
use mybooks_api::database::user_books::UserBookStore;
use mybooks_api::database::{HealthProbe, StoreError};
use mybooks_api::enrich::AuthorDirectory;
use mybooks_api::openlibrary::OpenLibraryClient;
use mybooks_api::query::PredicateSource;
use mybooks_api::routes;
use mybooks_api::session::SessionStore;
use mybooks_api::state::AppState;

pub const ADMIN_TOKEN: &str = "admin-token";
pub const USER_TOKEN: &str = "user-token";

/// In-memory backend seeding for one test. Every test builds its own app, so
/// state never leaks between tests.
pub struct TestBackend {
    pub sessions: HashMap<String, (String, String)>,
    pub authors: Vec<Author>,
    pub books: Vec<Book>,
    pub tags: Vec<Tag>,
    pub user_books: Vec<UserBook>,
    /// Author names the (fake) author service knows. Missing ids simulate an
    /// unreachable sibling service.
    pub author_names: HashMap<i32, String>,
}

impl TestBackend {
    pub fn seeded() -> Self {
        let mut sessions = HashMap::new();
        sessions.insert(
            ADMIN_TOKEN.to_string(),
            ("admin".to_string(), "admin".to_string()),
        );
        sessions.insert(
            USER_TOKEN.to_string(),
            ("alice".to_string(), "user".to_string()),
        );

        let mut author_names = HashMap::new();
        author_names.insert(1, "Frank Herbert".to_string());
        author_names.insert(2, "Jane Austen".to_string());
        // author 3 is unknown to the author service on purpose

        Self {
            sessions,
            authors: vec![author(1, "Frank Herbert"), author(2, "Jane Austen")],
            books: vec![
                book(3, 2, "Emma"),
                book(5, 3, "Dracula"),
                book(7, 1, "Dune"),
                book(9, 1, "Dune Messiah"),
            ],
            tags: vec![tag(1, "fiction"), tag(2, "sci-fi")],
            user_books: vec![UserBook {
                id: 1,
                user_id: 42,
                book_id: 7,
                rating: Some(true),
                tags: vec!["sci-fi".to_string()],
                date_added: None,
            }],
            author_names,
        }
    }

    pub fn into_app(self) -> Router {
        let state = AppState {
            sessions: Arc::new(FakeSessions {
                records: self.sessions,
            }),
            authors: Arc::new(FakeAuthors {
                rows: Mutex::new(self.authors),
            }),
            books: Arc::new(FakeBooks {
                rows: Mutex::new(self.books),
            }),
            tags: Arc::new(FakeTags {
                rows: Mutex::new(self.tags),
            }),
            user_books: Arc::new(FakeUserBooks {
                rows: Mutex::new(self.user_books),
            }),
            health: Arc::new(OkHealth),
            author_directory: Arc::new(FakeAuthorDirectory {
                names: self.author_names,
            }),
            openlibrary: Arc::new(OpenLibraryClient::from_config().expect("openlibrary client")),
        };
        routes::app(state)
    }
}

pub fn author(id: i32, name: &str) -> Author {
    Author {
        id,
        name: name.to_string(),
        birth_date: None,
        ol_key: None,
        image_small: None,
        image_medium: None,
        image_large: None,
        subjects: vec![],
    }
}

pub fn book(id: i32, author_id: i32, title: &str) -> Book {
    Book {
        id,
        author_id,
        title: title.to_string(),
        year: None,
        isbns: vec![],
        subjects: vec![],
        ol_works: None,
    }
}

pub fn tag(id: i32, name: &str) -> Tag {
    Tag {
        id,
        name: name.to_string(),
        data: None,
    }
}

fn duplicate(constraint: &str) -> StoreError {
    StoreError::Duplicate(format!(
        "duplicate key value violates unique constraint \"{}\"",
        constraint
    ))
}

fn next_id(used: impl Iterator<Item = i32>) -> i32 {
    used.max().unwrap_or(0) + 1
}

// ---------------------------------------------------------------------------
// Fakes

struct FakeSessions {
    records: HashMap<String, (String, String)>,
}

#[async_trait]
impl SessionStore for FakeSessions {
    async fn field(&self, key: &str, field: &str) -> anyhow::Result<Option<String>> {
        let token = key.strip_prefix("user:").unwrap_or(key);
        Ok(self.records.get(token).map(|(name, group)| match field {
            "name" => name.clone(),
            _ => group.clone(),
        }))
    }
}

struct FakeAuthors {
    rows: Mutex<Vec<Author>>,
}

#[async_trait]
impl AuthorStore for FakeAuthors {
    async fn find_all(&self) -> Result<Vec<Author>, StoreError> {
        Ok(self.rows.lock().unwrap().clone())
    }

    async fn find_by_name(&self, name: &str) -> Result<Vec<Author>, StoreError> {
        let needle = name.to_lowercase();
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|a| a.name.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }

    async fn get(&self, id: i32) -> Result<Option<Author>, StoreError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.id == id)
            .cloned())
    }

    async fn create(&self, author: NewAuthor) -> Result<Author, StoreError> {
        let mut rows = self.rows.lock().unwrap();
        if rows.iter().any(|a| a.name == author.name) {
            return Err(duplicate("author_name_key"));
        }
        let created = Author {
            id: next_id(rows.iter().map(|a| a.id)),
            name: author.name,
            birth_date: author.birth_date,
            ol_key: author.ol_key,
            image_small: author.image_small,
            image_medium: author.image_medium,
            image_large: author.image_large,
            subjects: author.subjects,
        };
        rows.push(created.clone());
        Ok(created)
    }

    async fn delete(&self, id: i32) -> Result<(), StoreError> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|a| a.id != id);
        if rows.len() == before {
            return Err(StoreError::NotFound(format!("No author by id {}", id)));
        }
        Ok(())
    }
}

struct FakeBooks {
    rows: Mutex<Vec<Book>>,
}

#[async_trait]
impl PredicateSource<Book> for FakeBooks {
    async fn text_match(&self, query: &str) -> Result<Vec<Book>, StoreError> {
        let needle = query.to_lowercase();
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|b| b.title.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }

    async fn id_set(&self, ids: &[i32]) -> Result<Vec<Book>, StoreError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|b| ids.contains(&b.id))
            .cloned()
            .collect())
    }

    async fn foreign_keys(&self, ids: &[i32]) -> Result<Vec<Book>, StoreError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|b| ids.contains(&b.author_id))
            .cloned()
            .collect())
    }

    async fn all(&self) -> Result<Vec<Book>, StoreError> {
        Ok(self.rows.lock().unwrap().clone())
    }
}

#[async_trait]
impl BookStore for FakeBooks {
    async fn get(&self, id: i32) -> Result<Option<Book>, StoreError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|b| b.id == id)
            .cloned())
    }

    async fn create(&self, book: NewBook) -> Result<Book, StoreError> {
        let mut rows = self.rows.lock().unwrap();
        if rows.iter().any(|b| b.title == book.title) {
            return Err(duplicate("book_title_key"));
        }
        let created = Book {
            id: next_id(rows.iter().map(|b| b.id)),
            author_id: book.author_id,
            title: book.title,
            year: book.first_published_year,
            isbns: book.isbns,
            subjects: book.subjects,
            ol_works: book.openlibrary_work_url,
        };
        rows.push(created.clone());
        Ok(created)
    }

    async fn delete(&self, id: i32) -> Result<(), StoreError> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|b| b.id != id);
        if rows.len() == before {
            return Err(StoreError::NotFound(format!("No book by id {}", id)));
        }
        Ok(())
    }
}

struct FakeTags {
    rows: Mutex<Vec<Tag>>,
}

#[async_trait]
impl TagStore for FakeTags {
    async fn find_all(&self) -> Result<Vec<Tag>, StoreError> {
        Ok(self.rows.lock().unwrap().clone())
    }

    async fn get(&self, id: i32) -> Result<Option<Tag>, StoreError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.id == id)
            .cloned())
    }

    async fn create(&self, tag: NewTag) -> Result<Tag, StoreError> {
        let mut rows = self.rows.lock().unwrap();
        if rows.iter().any(|t| t.name == tag.name) {
            return Err(duplicate("tag_name_key"));
        }
        let created = Tag {
            id: next_id(rows.iter().map(|t| t.id)),
            name: tag.name,
            data: tag.data,
        };
        rows.push(created.clone());
        Ok(created)
    }

    async fn delete(&self, id: i32) -> Result<(), StoreError> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|t| t.id != id);
        if rows.len() == before {
            return Err(StoreError::NotFound(format!("No tag by id {}", id)));
        }
        Ok(())
    }
}

struct FakeUserBooks {
    rows: Mutex<Vec<UserBook>>,
}

#[async_trait]
impl UserBookStore for FakeUserBooks {
    async fn list_for_user(&self, user_id: i32) -> Result<Vec<UserBook>, StoreError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|ub| ub.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn get(&self, user_id: i32, id: i32) -> Result<Option<UserBook>, StoreError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|ub| ub.user_id == user_id && ub.id == id)
            .cloned())
    }

    async fn create(&self, user_id: i32, entry: NewUserBook) -> Result<UserBook, StoreError> {
        let mut rows = self.rows.lock().unwrap();
        let created = UserBook {
            id: next_id(rows.iter().map(|ub| ub.id)),
            user_id,
            book_id: entry.book_id,
            rating: entry.rating,
            tags: entry.tags,
            date_added: None,
        };
        rows.push(created.clone());
        Ok(created)
    }

    async fn delete(&self, user_id: i32, id: i32) -> Result<(), StoreError> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|ub| !(ub.user_id == user_id && ub.id == id));
        if rows.len() == before {
            return Err(StoreError::NotFound(format!(
                "No user book by id {} for user {}",
                id, user_id
            )));
        }
        Ok(())
    }
}

struct OkHealth;

#[async_trait]
impl HealthProbe for OkHealth {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

struct FakeAuthorDirectory {
    names: HashMap<i32, String>,
}

#[async_trait]
impl AuthorDirectory for FakeAuthorDirectory {
    async fn author_name(&self, author_id: i32, bearer: &str) -> anyhow::Result<String> {
        // The gate always forwards the caller's own header
        assert!(
            bearer.starts_with("Bearer "),
            "bearer not forwarded: {}",
            bearer
        );
        self.names
            .get(&author_id)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("author service unreachable for id {}", author_id))
    }
}

// ---------------------------------------------------------------------------
// Request helpers

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn authed_get(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

pub fn authed_delete(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

pub fn authed_post(uri: &str, token: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn send(app: &Router, request: Request<Body>) -> Response {
    app.clone().oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap_or(Value::Null)
}

pub async fn expect_status(app: &Router, request: Request<Body>, status: StatusCode) -> Value {
    let response = send(app, request).await;
    assert_eq!(response.status(), status, "unexpected status");
    body_json(response).await
}
