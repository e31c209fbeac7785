use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use snafu::Snafu;
use std::num::ParseIntError;

pub type RegistrarResult<T> = Result<T, RegistrarError>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum RegistrarError {
    #[snafu(display("Error opening database"))]
    OpenDatabase { source: sqlx::Error },
    #[snafu(display("Error getting db connection"))]
    GetDatabaseConnection { source: sqlx::Error },
    #[snafu(display("Error making SQL query"))]
    MakeQuery { source: sqlx::Error },
    #[snafu(display("Error commiting SQL transaction"))]
    CommitTransaction { source: sqlx::Error },
    #[snafu(display("Error migrating DB schema"))]
    MigrateError { source: sqlx::migrate::MigrateError },
    #[snafu(display("Unable to retrieve env var `{}`", name))]
    BadEnvVar {
        source: dotenvy::Error,
        name: &'static str,
    },
    #[snafu(display("Unable to parse env var `{}` as a number", name))]
    ParseNumber {
        source: ParseIntError,
        name: &'static str,
    },
    #[snafu(display("Unknown database kind {:?}, expected `postgres` or `sqlite`", kind))]
    UnknownDatabaseKind { kind: String },
    #[snafu(display("Unable to parse student id {:?}", original))]
    InvalidId {
        source: ParseIntError,
        original: String,
    },
    #[snafu(display("Unable to read request body: {}", source))]
    MalformedBody { source: JsonRejection },
    #[snafu(display("Invalid student: {}", problems.join(", ")))]
    InvalidStudent { problems: Vec<String> },
    #[snafu(display("Unable to find student with ID: {}", id))]
    MissingStudent { id: i64 },
    #[snafu(display("Unable to find student with tax ID: {}", tax_id))]
    MissingTaxId { tax_id: String },
}

impl RegistrarError {
    pub fn status_code(&self) -> StatusCode {
        const ISE: StatusCode = StatusCode::INTERNAL_SERVER_ERROR; //internal server error
        const NF: StatusCode = StatusCode::NOT_FOUND; //not found
        const BI: StatusCode = StatusCode::BAD_REQUEST; //bad input

        match self {
            Self::OpenDatabase { .. } | Self::GetDatabaseConnection { .. } => ISE,
            Self::MakeQuery { .. } | Self::CommitTransaction { .. } => ISE,
            Self::MigrateError { .. } => ISE,
            Self::BadEnvVar { .. } | Self::ParseNumber { .. } | Self::UnknownDatabaseKind { .. } => {
                ISE
            }
            Self::InvalidId { .. } | Self::InvalidStudent { .. } => BI,
            Self::MalformedBody { source } => source.status(),
            Self::MissingStudent { .. } | Self::MissingTaxId { .. } => NF,
        }
    }
}

impl IntoResponse for RegistrarError {
    fn into_response(self) -> Response {
        let status_code = self.status_code();

        if status_code.is_server_error() {
            error!(?self, "Error!");
        } else {
            debug!(?self, "Request rejected");
        }
        (status_code, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
