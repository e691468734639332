//! In-memory backend used by the unit tests.
//!
//! Follows the REST conventions the real backend uses: trailing-slash paths,
//! server-assigned ids, 404 for unknown ids, merge on PUT/PATCH, equality
//! query filters and 204 on delete.

use super::transport::{Method, RawResponse, Transport};
use super::{ApiError, ApiResult};
use serde_json::{json, Map, Value};
use std::collections::{BTreeMap, VecDeque};
use std::sync::{Arc, Mutex};

/// A child collection rendered inline in each parent record.
struct Embed {
    parent: String,
    field: String,
    child: String,
    foreign_key: String,
}

#[derive(Default)]
struct State {
    collections: BTreeMap<String, BTreeMap<u64, Value>>,
    next_id: u64,
    requests: Vec<(Method, String)>,
    scripted: VecDeque<RawResponse>,
    offline: bool,
    embeds: Vec<Embed>,
}

pub struct MockBackend {
    state: Mutex<State>,
}

impl MockBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(State {
                next_id: 1,
                ..State::default()
            }),
        })
    }

    /// Inserts a record directly, bypassing the request log.
    pub fn seed(&self, collection: &str, record: Value) -> u64 {
        let mut state = self.state.lock().unwrap();
        let id = state.next_id;
        state.next_id += 1;
        let record = with_id(record, id);
        state
            .collections
            .entry(collection.to_string())
            .or_default()
            .insert(id, record);
        id
    }

    /// Stored record, without embedded children.
    pub fn record(&self, collection: &str, id: u64) -> Option<Value> {
        let state = self.state.lock().unwrap();
        state.collections.get(collection)?.get(&id).cloned()
    }

    /// Renders child records of `child` whose `foreign_key` matches the parent
    /// id as an array under `field` of every `parent` record.
    pub fn embed_children(&self, parent: &str, field: &str, child: &str, foreign_key: &str) {
        self.state.lock().unwrap().embeds.push(Embed {
            parent: parent.to_string(),
            field: field.to_string(),
            child: child.to_string(),
            foreign_key: foreign_key.to_string(),
        });
    }

    pub fn request_count(&self) -> usize {
        self.state.lock().unwrap().requests.len()
    }

    pub fn requests(&self) -> Vec<(Method, String)> {
        self.state.lock().unwrap().requests.clone()
    }

    /// The next request gets this status and body instead of being routed.
    pub fn fail_next(&self, status: u16, body: &str) {
        self.respond_next(status, body);
    }

    pub fn respond_next(&self, status: u16, body: &str) {
        self.state.lock().unwrap().scripted.push_back(RawResponse {
            status,
            body: body.to_string(),
        });
    }

    pub fn set_offline(&self, offline: bool) {
        self.state.lock().unwrap().offline = offline;
    }
}

fn with_id(record: Value, id: u64) -> Value {
    let mut map = match record {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    map.insert("id".to_string(), json!(id));
    Value::Object(map)
}

fn respond(status: u16, body: Value) -> RawResponse {
    RawResponse {
        status,
        body: body.to_string(),
    }
}

fn not_found() -> RawResponse {
    respond(404, json!({ "detail": "Not found." }))
}

fn matches_query(record: &Value, query: &[(String, String)]) -> bool {
    query.iter().all(|(key, expected)| match record.get(key) {
        Some(Value::String(s)) => s == expected,
        Some(other) => other.to_string() == *expected,
        None => false,
    })
}

/// Splits `/collection/` or `/collection/<id>/`.
fn parse_path(path: &str) -> Option<(String, Option<u64>)> {
    let segments: Vec<&str> = path.trim_matches('/').split('/').collect();
    match segments.as_slice() {
        [collection] if !collection.is_empty() => Some((collection.to_string(), None)),
        [collection, id] => Some((collection.to_string(), Some(id.parse().ok()?))),
        _ => None,
    }
}

impl State {
    fn render(&self, collection: &str, record: &Value) -> Value {
        let mut record = record.clone();
        for embed in self.embeds.iter().filter(|e| e.parent == collection) {
            let parent_id = record.get("id").cloned().unwrap_or(Value::Null);
            let children: Vec<Value> = self
                .collections
                .get(&embed.child)
                .map(|rows| {
                    rows.values()
                        .filter(|row| row.get(&embed.foreign_key) == Some(&parent_id))
                        .cloned()
                        .collect()
                })
                .unwrap_or_default();
            if let Value::Object(map) = &mut record {
                map.insert(embed.field.clone(), Value::Array(children));
            }
        }
        record
    }

    fn route(
        &mut self,
        method: Method,
        collection: &str,
        id: Option<u64>,
        query: &[(String, String)],
        body: Option<&Value>,
    ) -> RawResponse {
        match (method, id) {
            (Method::Get, None) => {
                let rows: Vec<Value> = self
                    .collections
                    .get(collection)
                    .map(|rows| {
                        rows.values()
                            .filter(|row| matches_query(row, query))
                            .map(|row| self.render(collection, row))
                            .collect()
                    })
                    .unwrap_or_default();
                respond(200, Value::Array(rows))
            }
            (Method::Get, Some(id)) => {
                match self.collections.get(collection).and_then(|rows| rows.get(&id)) {
                    Some(row) => respond(200, self.render(collection, row)),
                    None => not_found(),
                }
            }
            (Method::Post, None) => {
                let id = self.next_id;
                self.next_id += 1;
                let record = with_id(body.cloned().unwrap_or(Value::Null), id);
                self.collections
                    .entry(collection.to_string())
                    .or_default()
                    .insert(id, record.clone());
                respond(201, self.render(collection, &record))
            }
            (Method::Put | Method::Patch, Some(id)) => {
                let Some(row) = self
                    .collections
                    .get_mut(collection)
                    .and_then(|rows| rows.get_mut(&id))
                else {
                    return not_found();
                };
                if let (Value::Object(target), Some(Value::Object(changes))) = (&mut *row, body) {
                    for (key, value) in changes {
                        if key != "id" {
                            target.insert(key.clone(), value.clone());
                        }
                    }
                }
                let updated = row.clone();
                respond(200, self.render(collection, &updated))
            }
            (Method::Delete, Some(id)) => {
                let removed = self
                    .collections
                    .get_mut(collection)
                    .and_then(|rows| rows.remove(&id));
                match removed {
                    Some(_) => RawResponse {
                        status: 204,
                        body: String::new(),
                    },
                    None => not_found(),
                }
            }
            _ => respond(405, json!({ "detail": "Method not allowed." })),
        }
    }
}

impl Transport for MockBackend {
    fn execute(
        &self,
        method: Method,
        path: &str,
        query: &[(String, String)],
        body: Option<&Value>,
    ) -> ApiResult<RawResponse> {
        let mut state = self.state.lock().unwrap();
        state.requests.push((method, path.to_string()));

        if state.offline {
            return Err(ApiError::Transport("connection refused".to_string()));
        }
        if let Some(scripted) = state.scripted.pop_front() {
            return Ok(scripted);
        }

        match parse_path(path) {
            Some((collection, id)) => Ok(state.route(method, &collection, id, query, body)),
            None => Ok(not_found()),
        }
    }
}
