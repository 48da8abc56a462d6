//! In-process mock of the tutoring REST gateway.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::{Multipart, Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use bktutor_client::ClientConfig;

pub const SESSION_COOKIE: &str = "sid=mock-session";

pub struct Backend {
    /// Protected routes answer 401 when false.
    pub authorized: AtomicBool,
    pub fail_register: AtomicBool,
    pub browse_hits: AtomicUsize,
    pub last_browse: Mutex<HashMap<String, String>>,
    pub registered: Mutex<Vec<String>>,
    pub sent: Mutex<Vec<String>>,
    pub profile_updates: Mutex<Vec<Value>>,
    pub avatar_bytes: AtomicUsize,
    pub reschedules: Mutex<Vec<Value>>,
}

impl Default for Backend {
    fn default() -> Self {
        Self {
            authorized: AtomicBool::new(true),
            fail_register: AtomicBool::new(false),
            browse_hits: AtomicUsize::new(0),
            last_browse: Mutex::new(HashMap::new()),
            registered: Mutex::new(Vec::new()),
            sent: Mutex::new(Vec::new()),
            profile_updates: Mutex::new(Vec::new()),
            avatar_bytes: AtomicUsize::new(0),
            reschedules: Mutex::new(Vec::new()),
        }
    }
}

type Shared = Arc<Backend>;

pub struct MockBackend {
    pub base: String,
    pub state: Shared,
}

impl MockBackend {
    pub async fn spawn() -> Self {
        let state = Shared::default();
        let app = router(state.clone());
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        Self {
            base: format!("http://{addr}"),
            state,
        }
    }

    pub fn config(&self) -> ClientConfig {
        ClientConfig {
            api_base_override: Some(self.base.clone()),
            debounce: Duration::from_millis(50),
            ..ClientConfig::default()
        }
    }

    pub fn browse_hits(&self) -> usize {
        self.state.browse_hits.load(Ordering::SeqCst)
    }

    pub fn expire_session(&self) {
        self.state.authorized.store(false, Ordering::SeqCst);
    }
}

fn router(state: Shared) -> Router {
    Router::new()
        .route("/auth/me", get(me))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/students/profile", get(students_profile).put(update_profile))
        .route("/students/profile/avatar", post(upload_avatar))
        .route("/users/student/profile", get(users_profile))
        .route("/sessions/browse", get(browse))
        .route("/students/register", post(register))
        .route("/students/session/:id", get(session_detail))
        .route("/students/session/:id/cancel", post(cancel))
        .route("/students/session/:id/reschedule", post(reschedule))
        .route("/sessions/attended", get(attended_list))
        .route("/sessions/attended/:id", get(attended_detail))
        .route("/library/resources", get(library))
        .route("/messaging/sidebar", get(sidebar))
        .route(
            "/messaging/conversations/:id/messages",
            get(messages).post(send_message),
        )
        .with_state(state)
}

fn unauthorized() -> Response {
    (StatusCode::UNAUTHORIZED, Json(json!({"error": "Unauthorized"}))).into_response()
}

fn guard(state: &Backend) -> Result<(), Response> {
    if state.authorized.load(Ordering::SeqCst) {
        Ok(())
    } else {
        Err(unauthorized())
    }
}

pub fn catalogue() -> Vec<Value> {
    vec![
        json!({"id": "sess-1", "code": "CO2003", "title": "Data Structures and Algorithms",
               "tutor": "Le Thanh Van", "mode": "Online", "dayOfWeek": "MON",
               "start": "07:00", "end": "09:00"}),
        json!({"id": "sess-2", "code": "CO2003", "title": "Data Structures and Algorithms",
               "mode": "On campus", "dayOfWeek": "WED", "start": "13:00", "end": "15:00"}),
        json!({"id": "sess-3", "code": "CO1005", "title": "Introduction to Computing",
               "tutor": "Tran Hong Tai", "mode": "On campus", "dayOfWeek": "MON",
               "start": "13:00", "end": "15:00"}),
        json!({"id": "sess-4", "code": "MT1003", "title": "Calculus 1",
               "mode": "Online", "dayOfWeek": "FRI", "start": "09:00", "end": "11:00"}),
        json!({"id": "sess-5", "code": "PH1003", "title": "General Physics",
               "mode": "Online", "dayOfWeek": "SAT", "start": "07:00", "end": "09:00"}),
    ]
}

async fn me(headers: HeaderMap) -> Response {
    let signed_in = headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|c| c.contains(SESSION_COOKIE));
    if signed_in {
        Json(json!({"ok": true})).into_response()
    } else {
        unauthorized()
    }
}

async fn login(Json(body): Json<Value>) -> Response {
    if body["password"] == "secret" && body["email"] == "an.nguyen@hcmut.edu.vn" {
        (
            [(header::SET_COOKIE, format!("{SESSION_COOKIE}; Path=/; HttpOnly"))],
            Json(json!({"ok": true})),
        )
            .into_response()
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": "Invalid email or password"})),
        )
            .into_response()
    }
}

async fn logout() -> StatusCode {
    StatusCode::NO_CONTENT
}

async fn students_profile(State(state): State<Shared>) -> Response {
    if let Err(r) = guard(&state) {
        return r;
    }
    let name = state
        .profile_updates
        .lock()
        .unwrap()
        .last()
        .map(|u| u["fullName"].clone())
        .unwrap_or_else(|| json!("Nguyen Van An"));
    Json(json!({
        "student": {"fullName": name, "phone": "", "studentId": "2213001"},
        "bookedSessions": [{"sessionId": "sess-1", "code": "CO2003", "title": "DSA"}],
        "history": {"attendance": [{"courseCode": "CO3005", "date": "2025-12-01"}]},
        "stats": {"hoursStudied": 12.5, "sessionsAttended": 5}
    }))
    .into_response()
}

async fn users_profile(State(state): State<Shared>) -> Response {
    if let Err(r) = guard(&state) {
        return r;
    }
    Json(json!({
        "me": {"fullName": "An", "phone": "0912345678", "email": "an.nguyen@hcmut.edu.vn", "id": 7}
    }))
    .into_response()
}

async fn update_profile(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    if let Err(r) = guard(&state) {
        return r;
    }
    state.profile_updates.lock().unwrap().push(body);
    Json(json!({"ok": true})).into_response()
}

async fn upload_avatar(State(state): State<Shared>, mut multipart: Multipart) -> Response {
    while let Ok(Some(field)) = multipart.next_field().await {
        if field.name() == Some("file") {
            let bytes = field.bytes().await.unwrap_or_default();
            state.avatar_bytes.store(bytes.len(), Ordering::SeqCst);
        }
    }
    Json(json!({"ok": true})).into_response()
}

async fn browse(
    State(state): State<Shared>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    if let Err(r) = guard(&state) {
        return r;
    }
    state.browse_hits.fetch_add(1, Ordering::SeqCst);
    let code = params.get("code").cloned();
    *state.last_browse.lock().unwrap() = params;

    let sessions: Vec<Value> = catalogue()
        .into_iter()
        .filter(|s| match &code {
            Some(code) => s["code"].as_str().is_some_and(|c| c.starts_with(code.as_str())),
            None => true,
        })
        .collect();
    Json(json!({ "sessions": sessions })).into_response()
}

async fn register(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    if let Err(r) = guard(&state) {
        return r;
    }
    if state.fail_register.load(Ordering::SeqCst) {
        return (StatusCode::CONFLICT, Json(json!({"error": "Session full"}))).into_response();
    }
    let ids: Vec<String> = body["sessionIds"]
        .as_array()
        .map(|ids| ids.iter().filter_map(|v| v.as_str().map(str::to_string)).collect())
        .unwrap_or_default();
    *state.registered.lock().unwrap() = ids;
    Json(json!({"ok": true})).into_response()
}

fn find_session(id: &str) -> Option<Value> {
    catalogue().into_iter().find(|s| s["id"] == id)
}

async fn session_detail(State(state): State<Shared>, Path(id): Path<String>) -> Response {
    if let Err(r) = guard(&state) {
        return r;
    }
    match find_session(&id) {
        Some(mut session) => {
            session["scheduledAt"] = json!("2026-01-12T07:00:00.000Z");
            Json(json!({ "session": session })).into_response()
        }
        None => (StatusCode::NOT_FOUND, Json(json!({"error": "Not found"}))).into_response(),
    }
}

async fn cancel(Path(id): Path<String>, Json(body): Json<Value>) -> Response {
    let ok = find_session(&id).is_some() && body["reason"] != "";
    Json(json!({ "ok": ok })).into_response()
}

async fn reschedule(
    State(state): State<Shared>,
    Path(_id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    state.reschedules.lock().unwrap().push(body.clone());
    let booking = body["newSessionId"]
        .as_str()
        .and_then(find_session)
        .unwrap_or(Value::Null);
    Json(json!({ "ok": true, "booking": booking })).into_response()
}

async fn attended_list(State(state): State<Shared>) -> Response {
    if let Err(r) = guard(&state) {
        return r;
    }
    Json(json!({
        "attended": [
            {"id": "att-1", "sessionId": "sess-3", "code": "CO1005", "title": "Introduction to Computing",
             "completedAt": "2025-12-03T16:00:00Z", "mode": "On campus"},
            {"id": 2, "code": "CO2003", "title": "DSA", "completedAt": "2025-11-20"}
        ]
    }))
    .into_response()
}

async fn attended_detail(State(state): State<Shared>, Path(id): Path<String>) -> Response {
    if let Err(r) = guard(&state) {
        return r;
    }
    if id != "att-1" {
        return (StatusCode::NOT_FOUND, Json(json!({"error": "Not found"}))).into_response();
    }
    Json(json!({
        "ok": true,
        "attended": {
            "id": "att-1", "sessionId": "sess-3", "code": "CO1005",
            "title": "Introduction to Computing", "tutor": "Tran Hong Tai",
            "mode": "On campus", "dayOfWeek": "MON", "start": "13:00", "end": "15:00",
            "completedAt": "2025-12-03T16:00:00Z",
            "resources": [{"name": "embedded-notes.pdf", "url": "/old/notes"}],
            "library": {"syllabus": [{"name": "old-syllabus.pdf", "url": "/old"}]}
        }
    }))
    .into_response()
}

async fn library(Query(params): Query<HashMap<String, String>>) -> Response {
    if params.get("sessionId").map(String::as_str) != Some("sess-3") {
        return (StatusCode::NOT_FOUND, Json(json!({"error": "Not found"}))).into_response();
    }
    Json(json!({
        "syllabus": [{"id": 1, "name": "CO1005 syllabus.pdf", "size": "220 KB",
                      "url": "/library/resources/1/download"}],
        "videos": [{"id": 2, "name": "Week 1 recording", "size": "1.1 GB", "url": "#"}]
    }))
    .into_response()
}

async fn sidebar(State(state): State<Shared>) -> Response {
    if let Err(r) = guard(&state) {
        return r;
    }
    Json(json!({
        "me": {"id": 7, "displayName": "An"},
        "groups": [{"id": "g-1", "title": "CO2003 study group", "last": "see you monday"}],
        "directs": [{"id": 42, "title": "Le Thanh Van", "last": ""}]
    }))
    .into_response()
}

async fn messages(State(state): State<Shared>, Path(id): Path<String>) -> Response {
    if id == "42" {
        tokio::time::sleep(Duration::from_millis(10)).await;
        return Json(json!({"messages": []})).into_response();
    }
    let mut list = vec![
        json!({"id": "m-1", "sender": {"id": 7, "displayName": "An"}, "content": "anyone up for revision?"}),
        json!({"id": "m-2", "sender": {"id": 9, "displayName": "Binh"}, "content": "sure"}),
    ];
    for (i, content) in state.sent.lock().unwrap().iter().enumerate() {
        list.push(json!({"id": format!("s-{i}"), "sender": {"id": 7}, "content": content}));
    }
    Json(json!({ "messages": list })).into_response()
}

async fn send_message(
    State(state): State<Shared>,
    Path(_id): Path<String>,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    let content = form.get("content").cloned().unwrap_or_default();
    state.sent.lock().unwrap().push(content.clone());
    Json(json!({
        "message": {"id": "m-new", "sender": {"id": 7, "displayName": "An"}, "content": content}
    }))
    .into_response()
}
