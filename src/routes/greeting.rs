use axum::{Json, extract::Path};
use serde_json::{Value, json};

pub async fn get_greeting(Path(name): Path<String>) -> Json<Value> {
    Json(json!({ "API diz": format!("E ai {name}, tudo beleza?") }))
}
