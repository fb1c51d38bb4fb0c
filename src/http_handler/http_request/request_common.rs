use crate::http_handler::http_response::response_common::HTTPResponseType;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum HTTPRequestMethod {
    Get,
}

pub(crate) trait HTTPRequestType {
    type Response: HTTPResponseType;
    fn endpoint(&self) -> &str;
    fn request_method(&self) -> HTTPRequestMethod;
    fn header_params(&self) -> reqwest::header::HeaderMap {
        reqwest::header::HeaderMap::default()
    }
}

/// Marker for requests that are sent without a body.
pub(crate) trait NoBodyHTTPRequestType: HTTPRequestType {}
