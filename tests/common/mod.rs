use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    response::Response,
    Router,
};
use serde_json::Value;
use tempfile::NamedTempFile;
use tower::ServiceExt;

use po_api::{config::AppConfig, db, handlers::AppServices, AppState};

/// Helper harness for spinning up an application backed by a throwaway
/// SQLite database.
pub struct TestApp {
    router: Router,
    pub state: Arc<AppState>,
    // Holds the database file alive for the lifetime of the test.
    _db_file: NamedTempFile,
}

impl TestApp {
    /// Construct a new test application with fresh database state.
    pub async fn new() -> Self {
        let db_file = NamedTempFile::new().expect("create temp db file");
        let database_url = format!("sqlite://{}?mode=rwc", db_file.path().display());

        let mut cfg = AppConfig::new(
            database_url,
            "127.0.0.1".to_string(),
            0,
            "test".to_string(),
        );
        cfg.db_max_connections = 1;
        cfg.db_min_connections = 1;

        let pool = db::establish_connection_from_app_config(&cfg)
            .await
            .expect("connect to test database");
        db::run_migrations(&pool).await.expect("run migrations");

        let db_arc = Arc::new(pool);
        let services = AppServices::new(db_arc.clone());
        let state = Arc::new(AppState {
            db: db_arc,
            config: cfg,
            services,
        });

        let router = po_api::app_routes().with_state(state.clone());

        Self {
            router,
            state,
            _db_file: db_file,
        }
    }

    /// Issue a request against the in-process router.
    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> Response {
        let builder = Request::builder().method(method).uri(uri);

        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("build request");

        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("dispatch request")
    }

    /// Issue a request and decode the JSON body (if any) alongside the status.
    pub async fn request_json(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let response = self.request(method, uri, body).await;
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read response body");

        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("parse response body")
        };

        (status, json)
    }
}
