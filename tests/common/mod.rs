//! In-process fake of the GitHub REST API

#![allow(dead_code)]

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use base64::{engine::general_purpose, Engine as _};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// How the fake answers aggregator queries for one repository
#[derive(Clone, Copy)]
pub enum RepoBehavior {
    Counts {
        prs: u64,
        issues: u64,
        reviews: u64,
        last_page: u64,
    },
    ServerError,
    Unauthorized,
    RateLimited,
}

#[derive(Default)]
pub struct FakeGitHub {
    pub repos: HashMap<String, RepoBehavior>,
    /// path -> (content, sha)
    pub files: Mutex<HashMap<String, (String, String)>>,
    pub writes: Mutex<u32>,
}

impl FakeGitHub {
    pub fn with_repo(mut self, name: &str, behavior: RepoBehavior) -> Self {
        self.repos.insert(name.to_string(), behavior);
        self
    }

    pub fn with_file(self, path: &str, content: &str, sha: &str) -> Self {
        self.files
            .lock()
            .unwrap()
            .insert(path.to_string(), (content.to_string(), sha.to_string()));
        self
    }

    pub fn file(&self, path: &str) -> Option<(String, String)> {
        self.files.lock().unwrap().get(path).cloned()
    }
}

/// Serve the fake on an ephemeral port and return its base URL
pub async fn spawn(fake: Arc<FakeGitHub>) -> String {
    let app = Router::new()
        .route("/search/issues", get(search))
        .route("/repos/:owner/:repo/commits", get(commits))
        .route(
            "/repos/:owner/:repo/contents/*path",
            get(get_contents).put(put_contents),
        )
        .with_state(fake);
    serve(app).await
}

pub async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn repo_of(query: &str) -> Option<String> {
    query
        .split_whitespace()
        .find_map(|part| part.strip_prefix("repo:"))
        .map(String::from)
}

fn error_for(behavior: RepoBehavior) -> Option<Response> {
    match behavior {
        RepoBehavior::ServerError => {
            Some((StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response())
        }
        RepoBehavior::Unauthorized => Some(
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "message": "Bad credentials" })),
            )
                .into_response(),
        ),
        RepoBehavior::RateLimited => Some(
            (
                StatusCode::FORBIDDEN,
                [("x-ratelimit-remaining", "0")],
                Json(json!({ "message": "API rate limit exceeded" })),
            )
                .into_response(),
        ),
        RepoBehavior::Counts { .. } => None,
    }
}

async fn search(
    State(fake): State<Arc<FakeGitHub>>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let q = params.get("q").cloned().unwrap_or_default();
    let Some(behavior) = repo_of(&q).and_then(|r| fake.repos.get(&r).copied()) else {
        return Json(json!({ "total_count": 0, "items": [] })).into_response();
    };
    if let Some(error) = error_for(behavior) {
        return error;
    }
    let RepoBehavior::Counts {
        prs,
        issues,
        reviews,
        ..
    } = behavior
    else {
        unreachable!()
    };

    let repo = repo_of(&q).unwrap();
    if q.contains("reviewed-by:") {
        Json(json!({ "total_count": reviews, "items": [] })).into_response()
    } else if q.contains("is:merged") {
        let items: Vec<Value> = (1..=prs)
            .map(|n| {
                json!({
                    "title": format!("PR {}", n),
                    "number": n,
                    "created_at": format!("2024-06-{:02}T12:00:00Z", n),
                    "html_url": format!("https://github.com/{}/pull/{}", repo, n),
                })
            })
            .collect();
        Json(json!({ "total_count": prs, "items": items })).into_response()
    } else {
        Json(json!({ "total_count": issues, "items": [] })).into_response()
    }
}

async fn commits(
    State(fake): State<Arc<FakeGitHub>>,
    Path((owner, repo)): Path<(String, String)>,
) -> Response {
    let name = format!("{}/{}", owner, repo);
    let Some(behavior) = fake.repos.get(&name).copied() else {
        return (StatusCode::NOT_FOUND, "missing").into_response();
    };
    if let Some(error) = error_for(behavior) {
        return error;
    }
    let RepoBehavior::Counts { last_page, .. } = behavior else {
        unreachable!()
    };

    let link = format!(
        "<https://api.github.com/repositories/1/commits?per_page=1&page=2>; rel=\"next\", \
         <https://api.github.com/repositories/1/commits?per_page=1&page={}>; rel=\"last\"",
        last_page
    );
    let mut headers = HeaderMap::new();
    headers.insert("link", link.parse().unwrap());
    (headers, Json(json!([{ "sha": "abc" }]))).into_response()
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(|v| v.starts_with("Bearer "))
        .unwrap_or(false)
}

async fn get_contents(
    State(fake): State<Arc<FakeGitHub>>,
    Path((_owner, _repo, path)): Path<(String, String, String)>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    if !authorized(&headers) {
        return (StatusCode::UNAUTHORIZED, "no token").into_response();
    }
    if params.get("ref").map(String::as_str) != Some("main") {
        return (StatusCode::BAD_REQUEST, "expected ref=main").into_response();
    }
    match fake.file(path.trim_start_matches('/')) {
        Some((content, sha)) => {
            let encoded = general_purpose::STANDARD.encode(content);
            // GitHub wraps the payload
            let wrapped: Vec<String> = encoded
                .as_bytes()
                .chunks(60)
                .map(|c| String::from_utf8_lossy(c).into_owned())
                .collect();
            Json(json!({
                "content": wrapped.join("\n"),
                "encoding": "base64",
                "sha": sha,
            }))
            .into_response()
        }
        None => (StatusCode::NOT_FOUND, "missing").into_response(),
    }
}

async fn put_contents(
    State(fake): State<Arc<FakeGitHub>>,
    Path((_owner, _repo, path)): Path<(String, String, String)>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if !authorized(&headers) {
        return (StatusCode::UNAUTHORIZED, "no token").into_response();
    }

    let path = path.trim_start_matches('/').to_string();
    let mut files = fake.files.lock().unwrap();
    let current_sha = files.get(&path).map(|(_, sha)| sha.clone());
    if body["sha"].as_str() != current_sha.as_deref() {
        return (
            StatusCode::CONFLICT,
            Json(json!({ "message": "sha does not match" })),
        )
            .into_response();
    }

    let decoded = general_purpose::STANDARD
        .decode(body["content"].as_str().unwrap_or_default())
        .unwrap();
    let content = String::from_utf8(decoded).unwrap();

    let mut writes = fake.writes.lock().unwrap();
    *writes += 1;
    let new_sha = format!("sha-{}", *writes);
    files.insert(path, (content, new_sha.clone()));

    Json(json!({ "content": { "sha": new_sha } })).into_response()
}
