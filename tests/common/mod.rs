#![allow(dead_code)]

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{HeaderMap, Method, Request, StatusCode, header};
use boss_admin::db::{self, PlayersStorage};
use boss_admin::router::{BossState, PAGES, boss_router};
use boss_admin::templates::TemplateCache;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};
use tower::ServiceExt;

/// Throw-away SQLite file, removed on drop.
pub struct TempDb {
    pub path: PathBuf,
    pub url: String,
}

impl TempDb {
    pub fn new(tag: &str) -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before UNIX_EPOCH")
            .as_nanos();

        let mut path = std::env::temp_dir();
        path.push(format!(
            "boss-{tag}-{}-{}.sqlite",
            std::process::id(),
            nanos
        ));
        let url = format!("sqlite:{}", path.display());
        Self { path, url }
    }
}

impl Drop for TempDb {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
        for suffix in ["-wal", "-shm", "-journal"] {
            let mut p = self.path.clone().into_os_string();
            p.push(suffix);
            let _ = std::fs::remove_file(p);
        }
    }
}

pub fn ui_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("ui")
}

pub fn ui_templates() -> TemplateCache {
    TemplateCache::build(&ui_dir().join("html"))
        .and_then(|cache| cache.require(&PAGES))
        .expect("bundled templates must compile")
}

pub async fn temp_storage(tag: &str) -> (PlayersStorage, TempDb) {
    let db = TempDb::new(tag);
    let storage = db::connect(&db.url).await.expect("failed to open sqlite");
    (storage, db)
}

/// Full application over a fresh database and the bundled ui directory.
pub async fn test_app(tag: &str) -> (Router, PlayersStorage, TempDb) {
    let (storage, db) = temp_storage(tag).await;
    let app = app_with(storage.clone(), ui_templates());
    (app, storage, db)
}

pub fn app_with(storage: PlayersStorage, templates: TemplateCache) -> Router {
    let state = BossState::new(storage, templates);
    boss_router(state, &ui_dir().join("static"))
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

pub async fn send(app: &Router, method: Method, uri: &str, form: Option<&str>) -> TestResponse {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match form {
        Some(form) => {
            builder = builder.header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
            Body::from(form.to_string())
        }
        None => Body::empty(),
    };
    let resp = app
        .clone()
        .oneshot(builder.body(body).expect("failed to build request"))
        .await
        .expect("request failed");

    let status = resp.status();
    let headers = resp.headers().clone();
    let body = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    let body = String::from_utf8(body.to_vec()).expect("response body was not utf-8");
    TestResponse {
        status,
        headers,
        body,
    }
}

pub async fn get(app: &Router, uri: &str) -> TestResponse {
    send(app, Method::GET, uri, None).await
}
