use crate::{
    data::student::{NewStudent, Student, StudentPatch},
    error::{InvalidIdSnafu, MalformedBodySnafu, RegistrarResult},
    state::RegistrarState,
};
use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
};
use serde_json::{Value, json};
use snafu::ResultExt;

fn parse_id(raw: String) -> RegistrarResult<i64> {
    raw.parse().context(InvalidIdSnafu { original: raw })
}

pub async fn get_students(
    State(state): State<RegistrarState>,
) -> RegistrarResult<Json<Vec<Student>>> {
    state.list_all().await.map(Json)
}

pub async fn post_student(
    State(state): State<RegistrarState>,
    payload: Result<Json<NewStudent>, JsonRejection>,
) -> RegistrarResult<Json<Student>> {
    let Json(new_student) = payload.context(MalformedBodySnafu)?;
    state.create(new_student).await.map(Json)
}

pub async fn get_student_by_tax_id(
    State(state): State<RegistrarState>,
    Path(tax_id): Path<String>,
) -> RegistrarResult<Json<Student>> {
    state.find_by_tax_id(&tax_id).await.map(Json)
}

pub async fn get_student(
    State(state): State<RegistrarState>,
    Path(id): Path<String>,
) -> RegistrarResult<Json<Student>> {
    let id = parse_id(id)?;
    state.find_by_id(id).await.map(Json)
}

pub async fn patch_student(
    State(state): State<RegistrarState>,
    Path(id): Path<String>,
    payload: Result<Json<StudentPatch>, JsonRejection>,
) -> RegistrarResult<Json<Student>> {
    let id = parse_id(id)?;
    let Json(patch) = payload.context(MalformedBodySnafu)?;

    state.update(id, patch).await.map(Json)
}

pub async fn delete_student(
    State(state): State<RegistrarState>,
    Path(id): Path<String>,
) -> RegistrarResult<Json<Value>> {
    let id = parse_id(id)?;
    state.delete(id).await?;

    Ok(Json(json!({ "data": "Aluno deletado com sucesso" })))
}
