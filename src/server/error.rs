//! HTTP error translation.

use crate::error::Error;
use rocket::http::Status;
use rocket::request::Request;
use rocket::response::{self, Responder};
use rocket::serde::json::Json;
use serde::Serialize;

/// JSON body of every error response.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<&'static str>,
    pub message: String,
}

impl ErrorBody {
    pub(crate) fn new(error: &'static str, message: impl Into<String>) -> Self {
        Self {
            error,
            field: None,
            message: message.into(),
        }
    }
}

/// A library error on its way to the client.
///
/// Validation failures answer 422 with their message and oversized bodies
/// answer 413; anything else answers 500 with a generic message while the
/// full error goes to the log.
#[derive(Debug)]
pub struct ApiError(pub Error);

impl ApiError {
    /// Status code for this error.
    pub fn status(&self) -> Status {
        match &self.0 {
            Error::PayloadTooLarge(_) => Status::PayloadTooLarge,
            err if err.is_client_error() => Status::UnprocessableEntity,
            _ => Status::InternalServerError,
        }
    }

    /// Response body for this error.
    pub fn body(&self) -> ErrorBody {
        ErrorBody {
            error: self.0.kind(),
            field: match &self.0 {
                Error::Validation { field, .. } => Some(*field),
                _ => None,
            },
            message: self.0.public_message(),
        }
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        ApiError(err)
    }
}

impl<'r> Responder<'r, 'static> for ApiError {
    fn respond_to(self, req: &'r Request<'_>) -> response::Result<'static> {
        let status = self.status();
        if self.0.is_client_error() {
            log::info!("event=request_rejected uri={} detail={:?}", req.uri(), self.0.to_string());
        } else {
            log::error!(
                "event=request_failed uri={} kind={} detail={:?}",
                req.uri(),
                self.0.kind(),
                self.0.to_string()
            );
        }
        (status, Json(self.body())).respond_to(req)
    }
}
