//! In-memory search index for tests, demos and docs-free local runs.
//!
//! Evaluates query descriptors against JSON documents kept in insertion order:
//! term filters on dotted paths, single-key sorting, and a small fuzzy matcher
//! that approximates Elasticsearch's `fuzziness: AUTO` edit distances. Scoring is
//! deliberately simple; it only has to respect field weights.

use super::SearchIndex;
use crate::entity::CatalogEntity;
use crate::error::Result;
use crate::query::{FreeText, QueryDescriptor, SortOrder, SortSpec, TermFilter};
use dashmap::DashMap;
use serde_json::Value;
use std::cmp::Ordering;
use std::sync::Arc;

/// Thread-safe in-memory search index. Clones share the same documents.
#[derive(Clone, Default)]
pub struct InMemoryIndex {
    indices: Arc<DashMap<String, Vec<(String, Value)>>>,
}

impl InMemoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a document. Replacing keeps the original position.
    pub fn insert(&self, index: &str, id: &str, document: Value) {
        let mut docs = self.indices.entry(index.to_string()).or_default();
        match docs.iter().position(|(doc_id, _)| doc_id == id) {
            Some(pos) => docs[pos].1 = document,
            None => docs.push((id.to_string(), document)),
        }
    }

    /// Insert a typed record into its kind's index.
    ///
    /// # Errors
    /// Returns `Err` if the record cannot be represented as JSON.
    pub fn insert_entity<E: CatalogEntity>(&self, entity: &E) -> Result<()> {
        let document = serde_json::to_value(entity)?;
        self.insert(E::descriptor().index, entity.id(), document);
        Ok(())
    }

    /// Number of documents in an index.
    pub fn len(&self, index: &str) -> usize {
        self.indices.get(index).map_or(0, |docs| docs.len())
    }

    pub fn is_empty(&self, index: &str) -> bool {
        self.len(index) == 0
    }
}

impl SearchIndex for InMemoryIndex {
    async fn get(&self, index: &str, id: &str) -> Result<Option<Value>> {
        let document = self.indices.get(index).and_then(|docs| {
            docs.iter()
                .find(|(doc_id, _)| doc_id == id)
                .map(|(_, doc)| doc.clone())
        });
        debug!(
            "✓ InMemory index GET {}/{} -> {}",
            index,
            id,
            if document.is_some() { "FOUND" } else { "ABSENT" }
        );
        Ok(document)
    }

    async fn search(&self, index: &str, query: &QueryDescriptor) -> Result<Vec<Value>> {
        let docs: Vec<Value> = self
            .indices
            .get(index)
            .map(|docs| docs.iter().map(|(_, doc)| doc.clone()).collect())
            .unwrap_or_default();

        let mut scored: Vec<(f32, Value)> = docs
            .into_iter()
            .filter(|doc| query.filters.iter().all(|term| matches_term(doc, term)))
            .filter_map(|doc| match &query.text {
                Some(text) => {
                    let score = relevance(&doc, text);
                    (score > 0.0).then_some((score, doc))
                }
                None => Some((0.0, doc)),
            })
            .collect();

        if query.text.is_some() {
            scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));
        }
        if let Some(sort) = &query.sort {
            scored.sort_by(|a, b| compare_by(&a.1, &b.1, sort));
        }

        let hits: Vec<Value> = scored
            .into_iter()
            .skip(query.offset)
            .take(query.limit)
            .map(|(_, doc)| doc)
            .collect();

        debug!("✓ InMemory index SEARCH {} -> {} hits", index, hits.len());
        Ok(hits)
    }
}

/// Leaf values at a dotted path, descending through arrays.
fn values_at<'a>(doc: &'a Value, path: &str) -> Vec<&'a Value> {
    let mut current = vec![doc];
    for segment in path.split('.') {
        let mut next = Vec::new();
        for value in current {
            match value.get(segment) {
                Some(Value::Array(items)) => next.extend(items.iter()),
                Some(found) => next.push(found),
                // `name.keyword` addresses the same value as `name`
                None if segment == "keyword" => next.push(value),
                None => {}
            }
        }
        current = next;
    }
    current
        .into_iter()
        .flat_map(|v| match v {
            Value::Array(items) => items.iter().collect(),
            other => vec![other],
        })
        .collect()
}

fn matches_term(doc: &Value, term: &TermFilter) -> bool {
    values_at(doc, &term.field).into_iter().any(|v| match v {
        Value::String(s) => *s == term.value,
        Value::Number(n) => n.to_string() == term.value,
        Value::Bool(b) => b.to_string() == term.value,
        _ => false,
    })
}

fn relevance(doc: &Value, text: &FreeText) -> f32 {
    let query_tokens = tokenize(&text.query);
    if query_tokens.is_empty() {
        return 0.0;
    }

    text.fields
        .iter()
        .map(|weighted| {
            let words: Vec<String> = values_at(doc, weighted.field)
                .into_iter()
                .filter_map(Value::as_str)
                .flat_map(tokenize)
                .collect();
            let matched = query_tokens
                .iter()
                .filter(|token| words.iter().any(|word| fuzzy_eq(token, word)))
                .count();
            weighted.boost * matched as f32
        })
        .sum()
}

fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Edit distance allowed by Elasticsearch `AUTO` fuzziness.
fn allowed_edits(term: &str) -> usize {
    match term.chars().count() {
        0..=2 => 0,
        3..=5 => 1,
        _ => 2,
    }
}

/// Transpositions count as one edit, as in Elasticsearch.
fn fuzzy_eq(term: &str, word: &str) -> bool {
    strsim::osa_distance(term, word) <= allowed_edits(term)
}

/// Compare two documents on a sort key. Documents without the field sort last.
fn compare_by(a: &Value, b: &Value, sort: &SortSpec) -> Ordering {
    let left = values_at(a, &sort.field).into_iter().find(|v| !v.is_null());
    let right = values_at(b, &sort.field).into_iter().find(|v| !v.is_null());
    match (left, right) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(l), Some(r)) => {
            let ordering = compare_values(l, r);
            match sort.order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        }
    }
}

fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        _ => match (a.as_str(), b.as_str()) {
            (Some(x), Some(y)) => x.cmp(y),
            _ => Ordering::Equal,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{Page, WeightedField};
    use serde_json::json;

    fn film(id: &str, title: &str, rating: Option<f64>, genre: &str) -> Value {
        json!({
            "id": id,
            "title": title,
            "imdb_rating": rating,
            "genres": [{ "id": format!("g-{}", genre), "name": genre }],
            "actors": [],
        })
    }

    fn index() -> InMemoryIndex {
        let index = InMemoryIndex::new();
        index.insert("movies", "1", film("1", "Star Wars", Some(8.6), "Sci-Fi"));
        index.insert("movies", "2", film("2", "Star Trek", Some(7.9), "Sci-Fi"));
        index.insert("movies", "3", film("3", "Heat", Some(8.3), "Action"));
        index.insert("movies", "4", film("4", "Unrated", None, "Action"));
        index
    }

    fn ids(hits: &[Value]) -> Vec<&str> {
        hits.iter().filter_map(|h| h["id"].as_str()).collect()
    }

    fn list(filters: Vec<TermFilter>, sort: Option<SortSpec>, page: Page) -> QueryDescriptor {
        QueryDescriptor {
            filters,
            sort,
            text: None,
            offset: page.offset(),
            limit: page.limit(),
        }
    }

    #[tokio::test]
    async fn test_get_present_and_absent() {
        let index = index();
        assert!(index.get("movies", "1").await.unwrap().is_some());
        assert!(index.get("movies", "404").await.unwrap().is_none());
        assert!(index.get("nope", "1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_match_all_keeps_insertion_order() {
        let hits = index()
            .search("movies", &list(vec![], None, Page::new(10, 1)))
            .await
            .unwrap();
        assert_eq!(ids(&hits), vec!["1", "2", "3", "4"]);
    }

    #[tokio::test]
    async fn test_sort_desc_missing_last_and_paginated() {
        let sort = Some(SortSpec::new("imdb_rating", SortOrder::Desc));
        let index = index();

        let first = index
            .search("movies", &list(vec![], sort.clone(), Page::new(2, 1)))
            .await
            .unwrap();
        let second = index
            .search("movies", &list(vec![], sort, Page::new(2, 2)))
            .await
            .unwrap();

        assert_eq!(ids(&first), vec!["1", "3"]);
        assert_eq!(ids(&second), vec!["2", "4"]);
    }

    #[tokio::test]
    async fn test_keyword_suffix_sorts_on_base_field() {
        let sort = Some(SortSpec::new("title.keyword", SortOrder::Asc));
        let hits = index()
            .search("movies", &list(vec![], sort, Page::new(10, 1)))
            .await
            .unwrap();
        assert_eq!(ids(&hits), vec!["3", "2", "1", "4"]);
    }

    #[tokio::test]
    async fn test_term_filter_on_nested_array() {
        let filter = TermFilter {
            field: "genres.name".to_string(),
            value: "Action".to_string(),
        };
        let hits = index()
            .search("movies", &list(vec![filter], None, Page::new(10, 1)))
            .await
            .unwrap();
        assert_eq!(ids(&hits), vec!["3", "4"]);
    }

    #[tokio::test]
    async fn test_fuzzy_search_tolerates_typos_and_respects_weights() {
        let index = InMemoryIndex::new();
        index.insert(
            "movies",
            "a",
            json!({ "id": "a", "title": "Documentary", "description": "About star wars fans" }),
        );
        index.insert(
            "movies",
            "b",
            json!({ "id": "b", "title": "Star Wars", "description": "Space opera" }),
        );

        let query = QueryDescriptor {
            filters: vec![],
            sort: None,
            text: Some(FreeText {
                query: "Star Warz".to_string(),
                fields: vec![
                    WeightedField::boosted("title", 3.0),
                    WeightedField::new("description"),
                ],
            }),
            offset: 0,
            limit: 10,
        };

        let hits = index.search("movies", &query).await.unwrap();
        assert_eq!(ids(&hits), vec!["b", "a"]);
    }

    #[test]
    fn test_fuzzy_eq_auto_distances() {
        assert!(fuzzy_eq("warz", "wars"));
        assert!(fuzzy_eq("lucsa", "lucas"));
        assert!(fuzzy_eq("drama", "drama"));
        assert!(!fuzzy_eq("drm", "drama"));
        assert!(fuzzy_eq("drma", "drama"));
        assert!(!fuzzy_eq("to", "tv"));
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let index = index();
        index.insert("movies", "1", film("1", "A New Hope", Some(8.6), "Sci-Fi"));
        assert_eq!(index.len("movies"), 4);
        assert!(index.is_empty("genres"));
    }
}
