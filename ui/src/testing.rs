//! In-memory agent backend for unit tests
//!
//! Behaves like a minimal REST store: collections are created on first write,
//! ids are assigned sequentially and every request is recorded.

use crate::api::{Backend, KNOWLEDGE_BASES};
use crate::error::ApiError;
use crate::transport::{ApiRequest, ApiResponse, Method, Part, RequestBody, Transport};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

#[derive(Default)]
struct State {
    collections: HashMap<String, Vec<Value>>,
    requests: Vec<ApiRequest>,
    failures: Vec<Failure>,
    ask_reply: Option<Value>,
    next_id: u64,
}

struct Failure {
    method: Option<Method>,
    path: String,
    /// Only `path` itself, not the paths below it
    exact: bool,
    status: u16,
}

impl Failure {
    fn matches(&self, method: Method, path: &str) -> bool {
        self.method.map_or(true, |m| m == method)
            && (path == self.path || (!self.exact && path.starts_with(&format!("{}/", self.path))))
    }
}

#[derive(Clone, Default)]
pub struct FakeBackend {
    state: Rc<RefCell<State>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn backend(&self) -> Backend {
        Backend::new(Rc::new(self.clone()))
    }

    /// Inserts a stored record, assigning an id when it has none.
    pub fn seed(&self, collection: &str, mut record: Value) -> String {
        let mut state = self.state.borrow_mut();
        let id = match record.get("id").and_then(Value::as_str) {
            Some(id) => id.to_string(),
            None => {
                state.next_id += 1;
                let id = format!("id-{}", state.next_id);
                record["id"] = json!(id);
                id
            }
        };
        state
            .collections
            .entry(collection.to_string())
            .or_default()
            .push(record);
        id
    }

    pub fn stored(&self, collection: &str) -> Vec<Value> {
        self.state
            .borrow()
            .collections
            .get(collection)
            .cloned()
            .unwrap_or_default()
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.state.borrow().requests.clone()
    }

    pub fn set_ask_reply(&self, reply: Value) {
        self.state.borrow_mut().ask_reply = Some(reply);
    }

    /// Fails every request to `path` or below it.
    pub fn fail_path(&self, path: &str, status: u16) {
        self.fail(None, path, false, status);
    }

    /// Fails requests with the given method to `path` or below it.
    pub fn fail_method(&self, method: Method, path: &str, status: u16) {
        self.fail(Some(method), path, false, status);
    }

    /// Fails requests with the given method to `path` only.
    pub fn fail_exact(&self, method: Method, path: &str, status: u16) {
        self.fail(Some(method), path, true, status);
    }

    fn fail(&self, method: Option<Method>, path: &str, exact: bool, status: u16) {
        self.state.borrow_mut().failures.push(Failure {
            method,
            path: path.to_string(),
            exact,
            status,
        });
    }

    fn handle(&self, request: &ApiRequest) -> ApiResponse {
        let mut state = self.state.borrow_mut();
        let path = request.path.split('?').next().unwrap_or_default().to_string();

        let failure = state.failures.iter().find(|f| f.matches(request.method, &path));
        if let Some(failure) = failure {
            return respond(failure.status, json!({"detail": "injected failure"}));
        }

        if path == "/master/ask" {
            return match state.ask_reply.clone() {
                Some(reply) => respond(200, reply),
                None => respond(500, json!({"detail": "no reply configured"})),
            };
        }

        match request.method {
            Method::Get => {
                let items = state.collections.get(&path).cloned().unwrap_or_default();
                let items: Vec<Value> = if path == KNOWLEDGE_BASES {
                    items
                        .into_iter()
                        .map(|kb| json!({"knowledgebase": kb, "documents": []}))
                        .collect()
                } else {
                    items
                };
                respond(200, Value::Array(items))
            }
            Method::Post => {
                let Some(mut record) = record_from(&request.body) else {
                    return respond(422, json!({"detail": "missing body"}));
                };
                state.next_id += 1;
                record["id"] = json!(format!("id-{}", state.next_id));
                state
                    .collections
                    .entry(path)
                    .or_default()
                    .push(record.clone());
                respond(200, record)
            }
            Method::Put => {
                if let Some(target) = path.strip_suffix("/toggle-status") {
                    let Some((collection, id)) = target.rsplit_once('/') else {
                        return not_found();
                    };
                    let Some(item) = find_mut(&mut state, collection, id) else {
                        return not_found();
                    };
                    let next = if item["status"] == "inactive" { "active" } else { "inactive" };
                    item["status"] = json!(next);
                    return respond(200, item.clone());
                }

                let Some((collection, id)) = path.rsplit_once('/') else {
                    return not_found();
                };
                let Some(mut record) = record_from(&request.body) else {
                    return respond(422, json!({"detail": "missing body"}));
                };
                let Some(item) = find_mut(&mut state, collection, id) else {
                    return not_found();
                };
                record["id"] = json!(id);
                *item = record.clone();
                respond(200, record)
            }
            Method::Delete => {
                let Some((collection, id)) = path.rsplit_once('/') else {
                    return not_found();
                };
                let Some(items) = state.collections.get_mut(collection) else {
                    return not_found();
                };
                let before = items.len();
                items.retain(|item| item["id"] != json!(id));
                if items.len() == before {
                    not_found()
                } else {
                    respond(200, json!({"success": true}))
                }
            }
        }
    }
}

#[async_trait(?Send)]
impl Transport for FakeBackend {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let response = self.handle(&request);
        self.state.borrow_mut().requests.push(request);
        Ok(response)
    }
}

fn respond(status: u16, body: Value) -> ApiResponse {
    ApiResponse {
        status,
        body: body.to_string(),
    }
}

fn not_found() -> ApiResponse {
    respond(404, json!({"detail": "Not found"}))
}

fn find_mut<'a>(state: &'a mut State, collection: &str, id: &str) -> Option<&'a mut Value> {
    state
        .collections
        .get_mut(collection)?
        .iter_mut()
        .find(|item| item["id"] == json!(id))
}

fn record_from(body: &RequestBody) -> Option<Value> {
    let text = match body {
        RequestBody::Json(json) => json.as_str(),
        RequestBody::Multipart(parts) => parts.iter().find_map(|part| match part {
            Part::Text { value, .. } => Some(value.as_str()),
            _ => None,
        })?,
        RequestBody::Empty => return None,
    };
    serde_json::from_str(text).ok()
}
