use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Query, Request, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

pub const TOKEN: &str = "test-token";
pub const API_KEY: &str = "test-key";
pub const API_SECRET: &str = "test-secret";
pub const TRACE_HEADER: &str = "x-nexmo-trace-id";

/// Bytes served for every recording except `LARGE_RECORDING_ID`.
pub const RECORDING: &[u8] = b"RIFF\x24\x00\x00\x00WAVEfmt ";

/// Served as `LARGE_RECORDING_LEN` zero bytes, past ureq's default read cap.
pub const LARGE_RECORDING_ID: &str = "REC-LARGE";
pub const LARGE_RECORDING_LEN: usize = 11 * 1024 * 1024;

/// A stored conversation, member, event or user. Fields other than `id` are kept
/// exactly as the client sent them; like the real API, nothing is validated.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Record {
    fn new(prefix: &str, mut fields: Map<String, Value>) -> Self {
        fields.remove("id");
        Self {
            id: format!("{prefix}-{}", Uuid::new_v4()),
            fields,
        }
    }
}

#[derive(Default)]
pub struct Store {
    conversations: Vec<Record>,
    members: HashMap<String, Vec<Record>>,
    events: HashMap<String, Vec<Record>>,
    users: Vec<Record>,
}

pub type Db = Arc<RwLock<Store>>;

#[derive(Deserialize)]
pub struct ListQuery {
    pub order: Option<String>,
    pub page_size: Option<usize>,
}

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));

    let bearer = Router::new()
        .route("/v0.1/conversations", get(list_conversations).post(create_conversation))
        .route(
            "/v0.1/conversations/{id}",
            get(get_conversation).put(update_conversation).delete(delete_conversation),
        )
        .route("/v1/conversations/{id}/record", put(record_conversation))
        .route(
            "/v0.1/conversations/{id}/members",
            get(list_members).post(create_member),
        )
        .route(
            "/v0.1/conversations/{id}/members/{member_id}",
            get(get_member).put(update_member).delete(delete_member),
        )
        .route(
            "/v0.1/conversations/{id}/events",
            get(list_events).post(create_event),
        )
        .route(
            "/v0.1/conversations/{id}/events/{event_id}",
            get(get_event).delete(delete_event),
        )
        .route("/v0.1/users", get(list_users).post(create_user))
        .route("/v0.1/users/{id}", get(get_user).delete(delete_user))
        .route("/v1/files/{id}", get(get_file))
        .route_layer(middleware::from_fn(require_bearer));

    Router::new()
        .merge(bearer)
        .route("/account/get-balance", get(get_balance))
        .route("/status/{code}", get(echo_status))
        .layer(middleware::map_response(add_trace_id))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn require_bearer(request: Request, next: Next) -> Result<Response, StatusCode> {
    let expected = format!("Bearer {TOKEN}");
    let authorized = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value == expected);
    if !authorized {
        return Err(StatusCode::UNAUTHORIZED);
    }
    Ok(next.run(request).await)
}

async fn add_trace_id(mut response: Response) -> Response {
    if let Ok(value) = HeaderValue::from_str(&Uuid::new_v4().simple().to_string()) {
        response.headers_mut().insert(TRACE_HEADER, value);
    }
    response
}

fn page(key: &str, mut records: Vec<Record>, query: &ListQuery) -> Json<Value> {
    if query.order.as_deref() == Some("desc") {
        records.reverse();
    }
    if let Some(size) = query.page_size {
        records.truncate(size);
    }
    Json(json!({
        "page_size": records.len(),
        "_embedded": { key: records },
    }))
}

// --- conversations ---

async fn list_conversations(State(db): State<Db>, Query(query): Query<ListQuery>) -> Json<Value> {
    let store = db.read().await;
    page("conversations", store.conversations.clone(), &query)
}

async fn create_conversation(
    State(db): State<Db>,
    Json(fields): Json<Map<String, Value>>,
) -> (StatusCode, Json<Record>) {
    let record = Record::new("CON", fields);
    db.write().await.conversations.push(record.clone());
    (StatusCode::OK, Json(record))
}

async fn get_conversation(
    State(db): State<Db>,
    Path(id): Path<String>,
) -> Result<Json<Record>, StatusCode> {
    let store = db.read().await;
    find(&store.conversations, &id).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn update_conversation(
    State(db): State<Db>,
    Path(id): Path<String>,
    Json(fields): Json<Map<String, Value>>,
) -> Result<Json<Record>, StatusCode> {
    let mut store = db.write().await;
    let record = store
        .conversations
        .iter_mut()
        .find(|record| record.id == id)
        .ok_or(StatusCode::NOT_FOUND)?;
    merge(record, fields);
    Ok(Json(record.clone()))
}

async fn delete_conversation(State(db): State<Db>, Path(id): Path<String>) -> StatusCode {
    let mut store = db.write().await;
    let before = store.conversations.len();
    store.conversations.retain(|record| record.id != id);
    if store.conversations.len() == before {
        return StatusCode::NOT_FOUND;
    }
    store.members.remove(&id);
    store.events.remove(&id);
    StatusCode::NO_CONTENT
}

async fn record_conversation(
    State(db): State<Db>,
    Path(id): Path<String>,
    Json(fields): Json<Map<String, Value>>,
) -> StatusCode {
    let store = db.read().await;
    if find(&store.conversations, &id).is_none() {
        return StatusCode::NOT_FOUND;
    }
    match fields.get("action").and_then(Value::as_str) {
        Some("start" | "stop") => StatusCode::NO_CONTENT,
        _ => StatusCode::BAD_REQUEST,
    }
}

// --- members ---

async fn list_members(
    State(db): State<Db>,
    Path(id): Path<String>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Value>, StatusCode> {
    let store = db.read().await;
    if find(&store.conversations, &id).is_none() {
        return Err(StatusCode::NOT_FOUND);
    }
    let members = store.members.get(&id).cloned().unwrap_or_default();
    Ok(page("members", members, &query))
}

async fn create_member(
    State(db): State<Db>,
    Path(id): Path<String>,
    Json(fields): Json<Map<String, Value>>,
) -> Result<(StatusCode, Json<Record>), StatusCode> {
    let mut store = db.write().await;
    if find(&store.conversations, &id).is_none() {
        return Err(StatusCode::NOT_FOUND);
    }
    let record = Record::new("MEM", fields);
    store.members.entry(id).or_default().push(record.clone());
    Ok((StatusCode::CREATED, Json(record)))
}

async fn get_member(
    State(db): State<Db>,
    Path((id, member_id)): Path<(String, String)>,
) -> Result<Json<Record>, StatusCode> {
    let store = db.read().await;
    let members = store.members.get(&id).ok_or(StatusCode::NOT_FOUND)?;
    find(members, &member_id).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn update_member(
    State(db): State<Db>,
    Path((id, member_id)): Path<(String, String)>,
    Json(fields): Json<Map<String, Value>>,
) -> Result<Json<Record>, StatusCode> {
    let mut store = db.write().await;
    let record = store
        .members
        .get_mut(&id)
        .and_then(|members| members.iter_mut().find(|record| record.id == member_id))
        .ok_or(StatusCode::NOT_FOUND)?;
    merge(record, fields);
    Ok(Json(record.clone()))
}

async fn delete_member(
    State(db): State<Db>,
    Path((id, member_id)): Path<(String, String)>,
) -> StatusCode {
    let mut store = db.write().await;
    match store.members.get_mut(&id) {
        Some(members) => remove(members, &member_id),
        None => StatusCode::NOT_FOUND,
    }
}

// --- events ---

async fn list_events(
    State(db): State<Db>,
    Path(id): Path<String>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Value>, StatusCode> {
    let store = db.read().await;
    if find(&store.conversations, &id).is_none() {
        return Err(StatusCode::NOT_FOUND);
    }
    let events = store.events.get(&id).cloned().unwrap_or_default();
    Ok(page("events", events, &query))
}

async fn create_event(
    State(db): State<Db>,
    Path(id): Path<String>,
    Json(fields): Json<Map<String, Value>>,
) -> Result<(StatusCode, Json<Record>), StatusCode> {
    let mut store = db.write().await;
    if find(&store.conversations, &id).is_none() {
        return Err(StatusCode::NOT_FOUND);
    }
    let record = Record::new("EVE", fields);
    store.events.entry(id).or_default().push(record.clone());
    Ok((StatusCode::CREATED, Json(record)))
}

async fn get_event(
    State(db): State<Db>,
    Path((id, event_id)): Path<(String, String)>,
) -> Result<Json<Record>, StatusCode> {
    let store = db.read().await;
    let events = store.events.get(&id).ok_or(StatusCode::NOT_FOUND)?;
    find(events, &event_id).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn delete_event(
    State(db): State<Db>,
    Path((id, event_id)): Path<(String, String)>,
) -> StatusCode {
    let mut store = db.write().await;
    match store.events.get_mut(&id) {
        Some(events) => remove(events, &event_id),
        None => StatusCode::NOT_FOUND,
    }
}

// --- users ---

async fn list_users(State(db): State<Db>, Query(query): Query<ListQuery>) -> Json<Value> {
    let store = db.read().await;
    page("users", store.users.clone(), &query)
}

async fn create_user(
    State(db): State<Db>,
    Json(fields): Json<Map<String, Value>>,
) -> (StatusCode, Json<Record>) {
    let record = Record::new("USR", fields);
    db.write().await.users.push(record.clone());
    (StatusCode::CREATED, Json(record))
}

async fn get_user(State(db): State<Db>, Path(id): Path<String>) -> Result<Json<Record>, StatusCode> {
    let store = db.read().await;
    find(&store.users, &id).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn delete_user(State(db): State<Db>, Path(id): Path<String>) -> StatusCode {
    remove(&mut db.write().await.users, &id)
}

// --- files, account, diagnostics ---

async fn get_file(Path(id): Path<String>) -> impl IntoResponse {
    let body = if id == LARGE_RECORDING_ID {
        vec![0u8; LARGE_RECORDING_LEN]
    } else {
        RECORDING.to_vec()
    };
    ([(header::CONTENT_TYPE, "audio/wav")], body)
}

async fn get_balance(Query(params): Query<HashMap<String, String>>) -> Result<Json<Value>, StatusCode> {
    let signed = params.get("api_key").map(String::as_str) == Some(API_KEY)
        && params.get("api_secret").map(String::as_str) == Some(API_SECRET);
    if !signed {
        return Err(StatusCode::UNAUTHORIZED);
    }
    Ok(Json(json!({ "value": 10.5, "autoReload": false })))
}

/// Answer with whatever status the path names, for exercising error paths.
async fn echo_status(Path(code): Path<u16>, headers: HeaderMap) -> Response {
    let status = StatusCode::from_u16(code).unwrap_or(StatusCode::BAD_REQUEST);
    let agent = headers
        .get(header::USER_AGENT)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string();
    (status, [(header::CONTENT_TYPE, "text/plain")], agent).into_response()
}

fn find<'a>(records: &'a [Record], id: &str) -> Option<&'a Record> {
    records.iter().find(|record| record.id == id)
}

/// Overwrite `record` with `fields`; the id is never changed.
fn merge(record: &mut Record, fields: Map<String, Value>) {
    for (key, value) in fields {
        if key != "id" {
            record.fields.insert(key, value);
        }
    }
}

fn remove(records: &mut Vec<Record>, id: &str) -> StatusCode {
    let before = records.len();
    records.retain(|record| record.id != id);
    if records.len() == before {
        StatusCode::NOT_FOUND
    } else {
        StatusCode::NO_CONTENT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn record_serializes_flat() {
        let record = Record {
            id: "CON-1".to_string(),
            fields: fields(json!({"name": "support"})),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json, json!({"id": "CON-1", "name": "support"}));
    }

    #[test]
    fn record_ids_are_generated_with_prefix() {
        let record = Record::new("USR", fields(json!({"id": "spoofed", "name": "alice"})));
        assert!(record.id.starts_with("USR-"));
        assert!(!record.fields.contains_key("id"));
        assert_eq!(record.fields["name"], "alice");
    }

    #[test]
    fn record_accepts_any_field_types() {
        let record: Record =
            serde_json::from_str(r#"{"id":"CON-1","display_name":123}"#).unwrap();
        assert_eq!(record.fields["display_name"], 123);
    }

    #[test]
    fn merge_keeps_the_id() {
        let mut record = Record::new("MEM", fields(json!({"state": "INVITED"})));
        let id = record.id.clone();
        merge(&mut record, fields(json!({"id": "spoofed", "state": "JOINED"})));
        assert_eq!(record.id, id);
        assert_eq!(record.fields["state"], "JOINED");
    }

    #[test]
    fn remove_reports_missing_records() {
        let mut records = vec![Record::new("EVE", Map::new())];
        let id = records[0].id.clone();
        assert_eq!(remove(&mut records, &id), StatusCode::NO_CONTENT);
        assert_eq!(remove(&mut records, &id), StatusCode::NOT_FOUND);
    }

    #[test]
    fn page_orders_and_truncates() {
        let records = (1..=3)
            .map(|n| Record {
                id: format!("CON-{n}"),
                fields: Map::new(),
            })
            .collect();
        let query = ListQuery {
            order: Some("desc".to_string()),
            page_size: Some(2),
        };
        let Json(body) = page("conversations", records, &query);
        assert_eq!(body["page_size"], 2);
        assert_eq!(body["_embedded"]["conversations"][0]["id"], "CON-3");
    }
}
