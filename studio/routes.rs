use std::io::{Cursor, Read};

use serde::Serialize;
use tiny_http::{Header, Method, Request, Response};
use tracing::{debug, warn};

use playrithm::SimError;

use crate::handlers;
use crate::state::SharedState;
use crate::util::form::FormFields;

pub type HttpResponse = Response<Cursor<Vec<u8>>>;

// ---------------------------------------------------------------------------
// Response helpers
// ---------------------------------------------------------------------------

fn with_content_type(resp: HttpResponse, content_type: &str) -> HttpResponse {
    match Header::from_bytes(&b"Content-Type"[..], content_type.as_bytes()) {
        Ok(h) => resp.with_header(h),
        Err(()) => resp,
    }
}

pub fn json_response<T: Serialize>(status: u16, body: &T) -> HttpResponse {
    match serde_json::to_string(body) {
        Ok(json) => with_content_type(
            Response::from_string(json).with_status_code(status),
            "application/json",
        ),
        Err(e) => {
            warn!(error = %e, "failed to serialize response");
            text_response(500, "500 Internal Server Error")
        }
    }
}

pub fn text_response(status: u16, body: &str) -> HttpResponse {
    with_content_type(
        Response::from_string(body).with_status_code(status),
        "text/plain; charset=utf-8",
    )
}

/// Maps a library error to a JSON `{"error": ...}` body.
pub fn error_response(err: &SimError) -> HttpResponse {
    let status = match err {
        SimError::InvalidArgument(_) | SimError::InvalidState(_) => 400,
        _ => 500,
    };
    json_response(status, &serde_json::json!({ "error": err.to_string() }))
}

pub fn not_found() -> HttpResponse {
    text_response(404, "404 Not Found")
}

fn method_not_allowed() -> HttpResponse {
    text_response(405, "405 Method Not Allowed")
}

// ---------------------------------------------------------------------------
// Request dispatcher
// ---------------------------------------------------------------------------

/// Dispatches one request.
///
/// Every handler except SSE returns a response that is sent here. The SSE
/// handler takes ownership of the request to stream on the raw socket.
pub fn dispatch(mut request: Request, state: SharedState) {
    let method = request.method().clone();
    let url = request.url().to_owned();
    let (path, query) = match url.split_once('?') {
        Some((p, q)) => (p.to_owned(), q.to_owned()),
        None => (url.clone(), String::new()),
    };
    debug!(%method, %path, "request");

    if method == Method::Get && path == "/train/events" {
        handlers::train_sse::handle(request, state);
        return;
    }

    let response = match (&method, path.as_str()) {
        (Method::Get, "/datasets") => handlers::datasets::handle_list(),
        (Method::Get, "/datasets/split") => handlers::datasets::handle_split(&FormFields::parse(&query)),
        (Method::Get, "/algorithms") => handlers::algorithms::handle_get(),
        (Method::Get, "/algorithms/catalog") => handlers::algorithms::handle_catalog(),
        (Method::Get, "/algorithms/params") => handlers::algorithms::handle_params(&FormFields::parse(&query)),
        (Method::Get, "/explain") => handlers::explain::handle(&FormFields::parse(&query)),
        (Method::Get, "/hyperparams/defaults") => handlers::params::handle_defaults(&state),
        (Method::Post, "/train") => match read_body(&mut request) {
            Ok(body) => handlers::train::handle_start(&FormFields::parse(&body), &state),
            Err(resp) => resp,
        },
        (Method::Post, "/train/stop") => handlers::train::handle_stop(&state),
        (Method::Get, "/train/history") => handlers::train::handle_history(&state),
        (_, "/datasets" | "/datasets/split" | "/algorithms" | "/algorithms/catalog"
            | "/algorithms/params" | "/explain" | "/hyperparams/defaults"
            | "/train" | "/train/stop" | "/train/history") => method_not_allowed(),
        _ => not_found(),
    };

    if let Err(e) = request.respond(response) {
        debug!(error = %e, "client went away before the response was sent");
    }
}

fn read_body(request: &mut Request) -> Result<String, HttpResponse> {
    let mut body = String::new();
    request
        .as_reader()
        .read_to_string(&mut body)
        .map_err(|e| error_response(&SimError::Io(e)))?;
    Ok(body)
}
