//! Request extractors whose rejections use the API's JSON error body.
//!
//! axum's own `Json` and `Query` reject malformed input with plain-text
//! bodies and, for JSON type mismatches, 422. These wrappers turn every
//! rejection into a 400 `{"error": "..."}` like the rest of the API.

use axum::{
    extract::{FromRequest, FromRequestParts},
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::error::AppError;

/// JSON request body or response.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct Json<T>(pub T);

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        axum::Json(self.0).into_response()
    }
}

/// Query string parameters.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct Query<T>(pub T);
