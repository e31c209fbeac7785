use crate::{
    routes::{
        greeting::get_greeting,
        students::{
            delete_student, get_student, get_student_by_tax_id, get_students, patch_student,
            post_student,
        },
    },
    state::RegistrarState,
};
use axum::{Router, routing::get};
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};

pub mod greeting;
pub mod students;

const MAX_BODY_BYTES: usize = 64 * 1024;

pub fn router(state: RegistrarState) -> Router {
    Router::new()
        .route("/{name}", get(get_greeting))
        .route("/alunos", get(get_students).post(post_student))
        .route("/alunos/cpf/{tax_id}", get(get_student_by_tax_id))
        .route(
            "/alunos/{id}",
            get(get_student).patch(patch_student).delete(delete_student),
        )
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
