//! Rendering of query descriptors into the Elasticsearch query DSL.

use super::{QueryDescriptor, SortSpec, TermFilter};
use serde_json::{json, Map, Value};

/// Request body for `POST /<index>/_search`.
pub fn search_body(query: &QueryDescriptor) -> Value {
    let mut body = Map::new();
    body.insert("query".to_string(), query_clause(query));
    body.insert("from".to_string(), json!(query.offset));
    body.insert("size".to_string(), json!(query.limit));
    if let Some(sort) = &query.sort {
        body.insert("sort".to_string(), json!([sort_clause(sort)]));
    }
    Value::Object(body)
}

fn query_clause(query: &QueryDescriptor) -> Value {
    if query.is_match_all() {
        return json!({ "match_all": {} });
    }

    let must: Vec<Value> = query
        .text
        .iter()
        .map(|text| {
            let fields: Vec<String> = text.fields.iter().map(ToString::to_string).collect();
            json!({
                "multi_match": {
                    "query": text.query,
                    "fields": fields,
                    "fuzziness": "AUTO",
                }
            })
        })
        .collect();

    let filter: Vec<Value> = query.filters.iter().map(term_clause).collect();

    json!({ "bool": { "must": must, "filter": filter } })
}

fn term_clause(term: &TermFilter) -> Value {
    let mut field = Map::new();
    field.insert(term.field.clone(), Value::String(term.value.clone()));
    json!({ "term": field })
}

fn sort_clause(sort: &SortSpec) -> Value {
    let mut field = Map::new();
    field.insert(sort.field.clone(), json!({ "order": sort.order.as_str() }));
    Value::Object(field)
}
