//! GET/POST selection by URL length

use crate::ports::{GpRequest, RequestMethod};

/// Pick the HTTP method for a full request URL.
///
/// URLs longer than `max_length` are sent as POST.
pub fn choose_transport(url: &str, max_length: usize) -> RequestMethod {
    if url.len() > max_length {
        RequestMethod::Post
    } else {
        RequestMethod::Get
    }
}

/// Build the request for a full URL (`<task url>?<query>`).
///
/// A POST splits the URL at the first `?`. The part before it becomes the
/// target and the query string becomes the body.
pub fn build_request(url: &str, max_length: usize) -> GpRequest {
    match choose_transport(url, max_length) {
        RequestMethod::Get => GpRequest::get(url),
        RequestMethod::Post => {
            let (base, query) = url.split_once('?').unwrap_or((url, ""));
            GpRequest::post(base, query)
        }
    }
}
