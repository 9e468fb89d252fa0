//! Multi-predicate query aggregation for list endpoints.
//!
//! A list query may carry zero or more filter predicates. Predicates combine
//! by union: an entity matching any of them is part of the result, once.
//! Supplying no predicate at all means "everything"; supplying predicates
//! that match nothing means an empty result, not a fallback to everything.

use std::collections::BTreeMap;

use async_trait::async_trait;
use futures::future::try_join_all;

use crate::database::StoreError;

/// One filter criterion of a list query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// Substring match on the entity's text field (e.g. book title).
    TextMatch(String),
    /// Match by entity id.
    IdSet(Vec<i32>),
    /// Match by foreign-key id (e.g. books by author ids).
    ForeignKeys(Vec<i32>),
}

/// Identity key used to deduplicate entities across predicates.
pub trait Keyed {
    fn key(&self) -> i32;
}

/// Read-only lookups a data source must offer to be aggregated over.
#[async_trait]
pub trait PredicateSource<T>: Send + Sync {
    async fn text_match(&self, query: &str) -> Result<Vec<T>, StoreError>;
    async fn id_set(&self, ids: &[i32]) -> Result<Vec<T>, StoreError>;
    async fn foreign_keys(&self, ids: &[i32]) -> Result<Vec<T>, StoreError>;
    async fn all(&self) -> Result<Vec<T>, StoreError>;
}

/// Merge the results of all supplied predicates into one deduplicated,
/// naturally ordered result set.
///
/// Predicate lookups are independent reads and run concurrently; the union
/// and sort wait for all of them. A failing lookup fails the whole
/// aggregation, it represents a broken data source rather than a bad query.
pub async fn aggregate<T, S>(source: &S, predicates: &[Predicate]) -> Result<Vec<T>, StoreError>
where
    T: Keyed + Ord + Send,
    S: PredicateSource<T> + ?Sized,
{
    let batches = if predicates.is_empty() {
        // No filter means everything
        vec![source.all().await?]
    } else {
        try_join_all(predicates.iter().map(|p| lookup(source, p))).await?
    };

    let mut by_key = BTreeMap::new();
    for item in batches.into_iter().flatten() {
        by_key.entry(item.key()).or_insert(item);
    }

    let mut merged: Vec<T> = by_key.into_values().collect();
    merged.sort();
    Ok(merged)
}

async fn lookup<T, S>(source: &S, predicate: &Predicate) -> Result<Vec<T>, StoreError>
where
    S: PredicateSource<T> + ?Sized,
{
    match predicate {
        Predicate::TextMatch(query) => source.text_match(query).await,
        Predicate::IdSet(ids) => source.id_set(ids).await,
        Predicate::ForeignKeys(ids) => source.foreign_keys(ids).await,
    }
}
