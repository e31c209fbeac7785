#![cfg(test)]
use crate::{
    config::DbConfig,
    data::{
        sql_store::SqliteStudentStore,
        student::{NewStudent, Student},
    },
    state::{RegistrarState, open_sqlite},
};
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode},
};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

pub async fn in_memory_store() -> SqliteStudentStore {
    let db_config = DbConfig::Sqlite {
        path: ":memory:".to_string(),
    };
    open_sqlite(&db_config, 1)
        .await
        .expect("open in-memory database")
}

pub async fn in_memory_state() -> RegistrarState {
    RegistrarState::from_store(Arc::new(in_memory_store().await))
}

pub fn mock_student() -> NewStudent {
    NewStudent {
        name: "Nome aluno teste".to_string(),
        tax_id: "12345678910".to_string(),
        national_id: "123456789".to_string(),
    }
}

pub async fn create_mock_student(state: &RegistrarState) -> Student {
    state
        .create(mock_student())
        .await
        .expect("create mock student")
}

pub async fn delete_mock_student(state: &RegistrarState, id: i64) {
    state.delete(id).await.expect("delete mock student");
}

/// Runs one request through `app` and decodes the JSON body.
pub async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.expect("infallible router");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read response body");

    (status, serde_json::from_slice(&bytes).expect("JSON body"))
}
