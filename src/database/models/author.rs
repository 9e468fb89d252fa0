use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// An author row. Ordered by id, like the other catalog entities.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, FromRow)]
pub struct Author {
    pub id: i32,
    pub name: String,
    pub birth_date: Option<String>,
    pub ol_key: Option<String>,
    pub image_small: Option<String>,
    pub image_medium: Option<String>,
    pub image_large: Option<String>,
    pub subjects: Vec<String>,
}

/// Payload for creating an author. The id is assigned by the database.
#[derive(Debug, Clone, Deserialize)]
pub struct NewAuthor {
    pub name: String,
    pub birth_date: Option<String>,
    pub ol_key: Option<String>,
    pub image_small: Option<String>,
    pub image_medium: Option<String>,
    pub image_large: Option<String>,
    #[serde(default)]
    pub subjects: Vec<String>,
}
