//! Client for the openlibrary.org search API, backing the /query endpoints.

use serde::Deserialize;
use std::time::Duration;

use crate::config;

const COVERS_BASE: &str = "https://covers.openlibrary.org";

/// One author document from the author search endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthorDoc {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub name: String,
    pub birth_date: Option<String>,
    #[serde(default)]
    pub top_subjects: Vec<String>,
}

/// One title document from the book search endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TitleDoc {
    pub key: Option<String>,
    pub title: Option<String>,
    pub title_suggest: Option<String>,
    #[serde(default)]
    pub author_key: Vec<String>,
    #[serde(default)]
    pub author_name: Vec<String>,
    pub first_publish_year: Option<i32>,
    #[serde(default)]
    pub isbn: Vec<String>,
    #[serde(default)]
    pub edition_key: Vec<String>,
    #[serde(default)]
    pub subject: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse<D> {
    #[serde(default)]
    docs: Vec<D>,
}

pub struct OpenLibraryClient {
    client: reqwest::Client,
    base_url: String,
}

impl OpenLibraryClient {
    pub fn from_config() -> anyhow::Result<Self> {
        let cfg = &config::config().openlibrary;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(cfg.timeout_ms))
            .build()?;
        Ok(Self {
            client,
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Search authors by name or partial name.
    pub async fn search_authors(&self, query: &str) -> anyhow::Result<Vec<AuthorDoc>> {
        let url = format!("{}/search/authors.json", self.base_url);
        let response: SearchResponse<AuthorDoc> = self
            .client
            .get(&url)
            .query(&[("q", query)])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(response.docs)
    }

    /// Search book titles by any combination of author, title and isbn.
    pub async fn search_titles(
        &self,
        author: Option<&str>,
        title: Option<&str>,
        isbn: Option<&str>,
    ) -> anyhow::Result<Vec<TitleDoc>> {
        let url = format!("{}/search.json", self.base_url);

        let mut request = self.client.get(&url);
        if let Some(author) = author {
            request = request.query(&[("author", author)]);
        }
        if let Some(title) = title {
            request = request.query(&[("title", title)]);
        }
        if let Some(isbn) = isbn {
            request = request.query(&[("isbn", isbn)]);
        }

        let response: SearchResponse<TitleDoc> =
            request.send().await?.error_for_status()?.json().await?;
        Ok(response.docs)
    }
}

#[derive(Debug, Clone, Copy)]
pub enum ImageSize {
    Small,
    Medium,
    Large,
}

impl ImageSize {
    fn suffix(self) -> char {
        match self {
            ImageSize::Small => 'S',
            ImageSize::Medium => 'M',
            ImageSize::Large => 'L',
        }
    }
}

/// Cover image URL for an author, given its openlibrary key
/// (either `OL12345A` or the `/authors/OL12345A` path form).
pub fn author_image_url(ol_key: &str, size: ImageSize) -> String {
    let key = ol_key.rsplit('/').next().unwrap_or(ol_key);
    format!("{}/a/olid/{}-{}.jpg", COVERS_BASE, key, size.suffix())
}

/// Cover image URL for a title, preferring an isbn over an edition key.
/// None when the document carries neither.
pub fn cover_image_url(doc: &TitleDoc, size: ImageSize) -> Option<String> {
    if let Some(isbn) = doc.isbn.first() {
        return Some(format!("{}/b/isbn/{}-{}.jpg", COVERS_BASE, isbn, size.suffix()));
    }
    doc.edition_key
        .first()
        .map(|key| format!("{}/b/olid/{}-{}.jpg", COVERS_BASE, key, size.suffix()))
}
