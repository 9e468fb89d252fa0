//! Cross-service enrichment of book results.
//!
//! A book row only stores the author id; the display name lives in the
//! author web service. Each book in a response gets one synchronous lookup,
//! forwarding the caller's own bearer token. Resolution is best effort: any
//! failure leaves the name empty and the response proceeds, partial data
//! beats a failed page.

use async_trait::async_trait;
use futures::future::join_all;
use serde::Deserialize;
use std::time::Duration;

use crate::config;
use crate::database::models::{Book, BookResult};

/// Lookup of author display names, acting as the calling user.
#[async_trait]
pub trait AuthorDirectory: Send + Sync {
    async fn author_name(&self, author_id: i32, bearer: &str) -> anyhow::Result<String>;
}

#[derive(Debug, Deserialize)]
struct AuthorDoc {
    name: String,
}

/// HTTP client against the author web service.
pub struct HttpAuthorDirectory {
    client: reqwest::Client,
    base_url: String,
}

impl HttpAuthorDirectory {
    pub fn from_config() -> anyhow::Result<Self> {
        let cfg = &config::config().enrich;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(cfg.timeout_ms))
            .build()?;
        Ok(Self {
            client,
            base_url: cfg.author_base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl AuthorDirectory for HttpAuthorDirectory {
    async fn author_name(&self, author_id: i32, bearer: &str) -> anyhow::Result<String> {
        let url = format!("{}/author/{}", self.base_url, author_id);

        let response = self
            .client
            .get(&url)
            .header(reqwest::header::AUTHORIZATION, bearer)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("author service returned {} for {}", status, url);
        }

        let doc: AuthorDoc = response.json().await?;
        Ok(doc.name)
    }
}

/// Resolve one author name, degrading to an empty string on any failure.
pub async fn resolve_author_name(
    directory: &dyn AuthorDirectory,
    author_id: i32,
    bearer: &str,
) -> String {
    match directory.author_name(author_id, bearer).await {
        Ok(name) => name,
        Err(e) => {
            tracing::warn!("unable to resolve name for author {}: {}", author_id, e);
            String::new()
        }
    }
}

/// Enrich a batch of books with author names, preserving order.
///
/// Lookups for different books run concurrently; a failed lookup never drops
/// its book from the result.
pub async fn enrich_books(
    directory: &dyn AuthorDirectory,
    books: Vec<Book>,
    bearer: &str,
) -> Vec<BookResult> {
    join_all(books.into_iter().map(|book| async move {
        let author_name = resolve_author_name(directory, book.author_id, bearer).await;
        BookResult::from_entity(book, author_name)
    }))
    .await
}
