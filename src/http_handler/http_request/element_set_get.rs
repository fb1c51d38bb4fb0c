use super::element_set::ElementSetResponse;
use super::request_common::{HTTPRequestMethod, HTTPRequestType, NoBodyHTTPRequestType};

/// Fetches one element set source file.
#[derive(Debug)]
pub struct ElementSetRequest {
    address: String,
}

impl ElementSetRequest {
    pub fn new(address: &str) -> Self { Self { address: address.to_string() } }
}

impl NoBodyHTTPRequestType for ElementSetRequest {}

impl HTTPRequestType for ElementSetRequest {
    type Response = ElementSetResponse;
    fn endpoint(&self) -> &str { self.address.as_str() }
    fn request_method(&self) -> HTTPRequestMethod { HTTPRequestMethod::Get }
    fn header_params(&self) -> reqwest::header::HeaderMap {
        let mut headers = reqwest::header::HeaderMap::default();
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static("text/plain"),
        );
        headers
    }
}
