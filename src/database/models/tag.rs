use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A tag usable on user book lists. Tag names are unique.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, FromRow)]
pub struct Tag {
    pub id: i32,
    pub name: String,
    pub data: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewTag {
    pub name: String,
    pub data: Option<String>,
}
