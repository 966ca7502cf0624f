//! Command error responses.
//!
//! Errors are returned as `{"Message": ..., "Code": ..., "Type": "error"}` so command
//! clients can tell a failed command apart from a command whose output happens to be
//! an object.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::commands::CommandError;

/// Error codes understood by command clients.
pub mod codes {
    pub const NORMAL: u8 = 0;
    pub const CLIENT: u8 = 1;
    pub const NOT_FOUND: u8 = 3;
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    #[serde(rename = "Message")]
    pub message: String,
    #[serde(rename = "Code")]
    pub code: u8,
    #[serde(rename = "Type")]
    pub kind: String,
}

impl IntoResponse for CommandError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            CommandError::NotFound(_) => (StatusCode::NOT_FOUND, codes::NOT_FOUND),
            CommandError::BadRequest(_) => (StatusCode::BAD_REQUEST, codes::CLIENT),
            CommandError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, codes::NORMAL),
        };
        let body = ErrorBody {
            message: self.to_string(),
            code,
            kind: "error".to_string(),
        };
        (status, Json(body)).into_response()
    }
}
