//! Route handlers and catchers.

use super::error::{ApiError, ErrorBody};
use super::AppState;
use crate::error::Error;
use crate::model::DeckRequest;
use rocket::request::{FromRequest, Outcome, Request};
use rocket::serde::json::{self, Json};
use rocket::{catch, get, post, State};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::io;
use std::sync::Arc;

/// Successful `POST /create_slide` response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreatedDeck {
    pub file_url: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct Health {
    ok: bool,
}

/// `scheme://host[:port]` the request was addressed to, if it named one.
pub(crate) struct RequestOrigin(Option<String>);

#[rocket::async_trait]
impl<'r> FromRequest<'r> for RequestOrigin {
    type Error = Infallible;

    async fn from_request(req: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let headers = req.headers();
        Outcome::Success(RequestOrigin(request_origin(
            headers.get_one("Host"),
            headers.get_one("X-Forwarded-Proto"),
        )))
    }
}

/// Origin from a `Host` header and an optional `X-Forwarded-Proto`.
///
/// Hosts with characters outside a hostname, IP literal and port are
/// ignored. Only `https` switches the scheme away from `http`.
pub(crate) fn request_origin(host: Option<&str>, forwarded_proto: Option<&str>) -> Option<String> {
    let host = host.map(str::trim).filter(|h| {
        !h.is_empty()
            && h.chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_' | ':' | '[' | ']'))
    })?;
    let scheme = match forwarded_proto.and_then(|p| p.split(',').next()).map(str::trim) {
        Some(proto) if proto.eq_ignore_ascii_case("https") => "https",
        _ => "http",
    };
    Some(format!("{}://{}", scheme, host))
}

fn body_error(err: json::Error<'_>) -> Error {
    match err {
        json::Error::Parse(_, e) => Error::validation("body", e.to_string()),
        // Rocket reports a body cut off at the data limit as an early EOF.
        json::Error::Io(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
            Error::PayloadTooLarge(e.to_string())
        }
        json::Error::Io(e) => Error::validation("body", format!("request body could not be read: {e}")),
    }
}

#[post("/create_slide", data = "<request>")]
pub(crate) async fn create_slide(
    request: Result<Json<DeckRequest>, json::Error<'_>>,
    origin: RequestOrigin,
    state: &State<Arc<AppState>>,
) -> Result<Json<CreatedDeck>, ApiError> {
    let Json(request) = request.map_err(body_error)?;
    log::debug!(
        "event=create_slide_received title={:?} sections={} bullets={}",
        request.title,
        request.sections.as_ref().map_or(0, |s| s.len()),
        request.bullets.as_ref().map_or(0, Vec::len)
    );

    let worker_state = Arc::clone(state.inner());
    let artifact = tokio::task::spawn_blocking(move || worker_state.generate(request))
        .await
        .map_err(|e| Error::Internal(format!("deck worker failed: {e}")))??;

    let base = state
        .base_url
        .clone()
        .or(origin.0)
        .unwrap_or_else(|| state.fallback_origin.clone());
    let file_url = artifact.url(&base);

    Ok(Json(CreatedDeck {
        message: format!("Deck ready: {}", file_url),
        file_url,
    }))
}

#[get("/health")]
pub(crate) fn health() -> Json<Health> {
    Json(Health { ok: true })
}

#[catch(404)]
pub(crate) fn not_found(req: &Request<'_>) -> Json<ErrorBody> {
    Json(ErrorBody::new(
        "not_found",
        format!("no resource at {}", req.uri().path()),
    ))
}

#[catch(422)]
pub(crate) fn unprocessable() -> Json<ErrorBody> {
    Json(ErrorBody::new("validation_error", "request could not be processed"))
}

#[catch(500)]
pub(crate) fn internal_error() -> Json<ErrorBody> {
    Json(ErrorBody::new("internal_error", "deck generation failed"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_origin_from_host() {
        assert_eq!(
            request_origin(Some("decks.example.com:8080"), None).as_deref(),
            Some("http://decks.example.com:8080")
        );
        assert_eq!(
            request_origin(Some("[::1]:8000"), Some("http")).as_deref(),
            Some("http://[::1]:8000")
        );
        assert_eq!(request_origin(None, Some("https")), None);
    }

    #[test]
    fn test_request_origin_forwarded_proto() {
        assert_eq!(
            request_origin(Some("decks.example.com"), Some("HTTPS")).as_deref(),
            Some("https://decks.example.com")
        );
        assert_eq!(
            request_origin(Some("decks.example.com"), Some("https, http")).as_deref(),
            Some("https://decks.example.com")
        );
        assert_eq!(
            request_origin(Some("decks.example.com"), Some("gopher")).as_deref(),
            Some("http://decks.example.com")
        );
    }

    #[test]
    fn test_request_origin_rejects_odd_hosts() {
        assert_eq!(request_origin(Some(""), None), None);
        assert_eq!(request_origin(Some("evil.example/x?y"), None), None);
        assert_eq!(request_origin(Some("a b"), None), None);
    }
}
