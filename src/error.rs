use axum::{
  response::{IntoResponse, Response},
  Json,
};
use reqwest::StatusCode;
use serde::Serialize;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
  #[error(transparent)]
  IO(#[from] reqwest::Error),
  #[error("invalid HTTP method: {0}")]
  InvalidMethod(String),
  #[error("not a YouTube video URL: {0}")]
  InvalidUrl(String),
  #[error("{0}")]
  Extraction(String),
  #[error(transparent)]
  Json(#[from] serde_json::Error),
}

pub const UNKNOWN_METHOD: &str = "UNKNOWN_METHOD";
pub const INVALID_ARGUMENTS: &str = "INVALID_ARGUMENTS";

/// A failed bridge call: an error code plus the upstream message verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("{code}: {message}")]
pub struct Rejection {
  pub code: &'static str,
  pub message: String,
}

impl Rejection {
  pub fn new(code: &'static str, message: impl Into<String>) -> Self {
    Self {
      code,
      message: message.into(),
    }
  }

  pub fn with_code(code: &'static str) -> impl FnOnce(Error) -> Self {
    move |err| Self::new(code, err.to_string())
  }

  fn is_client_error(&self) -> bool {
    matches!(self.code, UNKNOWN_METHOD | INVALID_ARGUMENTS)
  }
}

impl IntoResponse for Rejection {
  fn into_response(self) -> Response {
    let status = if self.is_client_error() {
      StatusCode::BAD_REQUEST
    } else {
      StatusCode::INTERNAL_SERVER_ERROR
    };

    (status, Json(self)).into_response()
  }
}
