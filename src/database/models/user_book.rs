use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One entry in a user's reading list: a book plus the user's rating and
/// tags for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct UserBook {
    pub id: i32,
    pub user_id: i32,
    pub book_id: i32,
    pub rating: Option<bool>,
    pub tags: Vec<String>,
    pub date_added: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewUserBook {
    pub book_id: i32,
    pub rating: Option<bool>,
    #[serde(default)]
    pub tags: Vec<String>,
}
