use super::http_request::{
    element_set_get::ElementSetRequest,
    request_common::{HTTPRequestMethod, NoBodyHTTPRequestType},
};
use super::http_response::response_common::{HTTPResponseType, ResponseError};
use super::http_handler_common::FetchError;
use crate::fleet::ElementSource;
use async_trait::async_trait;
use std::time::Duration;

/// A simple wrapper around `reqwest::Client` used to fetch element set sources
/// with a preconfigured base URL and default settings.
///
/// Addresses that are already absolute URLs bypass the base URL.
#[derive(Debug)]
pub struct HTTPClient {
    /// The underlying `reqwest::Client` used to perform HTTP requests.
    client: reqwest::Client,
    /// Base URL, prepended to all relative endpoint paths.
    base_url: String,
}

impl HTTPClient {
    /// Constructs a new `HTTPClient` with the given base URL and request timeout.
    ///
    /// # Arguments
    /// * `base_url` – The root URL for relative addresses (e.g., `"https://celestrak.org"`).
    /// * `timeout` – Timeout applied to every request.
    ///
    /// # Returns
    /// A configured `HTTPClient`, or the `reqwest` error if the TLS backend could not be set up.
    pub fn new(base_url: &str, timeout: Duration) -> Result<HTTPClient, reqwest::Error> {
        Ok(HTTPClient {
            client: reqwest::Client::builder().timeout(timeout).build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Returns the base URL that the client was initialized with.
    pub fn url(&self) -> &str { self.base_url.as_str() }

    /// Resolves an endpoint against the base URL.
    pub fn resolve(&self, endpoint: &str) -> String {
        if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
            endpoint.to_string()
        } else if endpoint.starts_with('/') {
            format!("{}{endpoint}", self.base_url)
        } else {
            format!("{}/{endpoint}", self.base_url)
        }
    }

    /// Sends a body-less request and parses its response.
    pub(crate) async fn send<T>(
        &self,
        request: &T,
    ) -> Result<<T::Response as HTTPResponseType>::ParsedResponseType, ResponseError>
    where
        T: NoBodyHTTPRequestType + Sync,
    {
        let url = self.resolve(request.endpoint());
        let builder = match request.request_method() {
            HTTPRequestMethod::Get => self.client.get(url),
        };
        let response = builder.headers(request.header_params()).send().await?;
        <T::Response as HTTPResponseType>::read_response(response).await
    }
}

#[async_trait]
impl ElementSource for HTTPClient {
    async fn fetch(&self, address: &str) -> Result<String, FetchError> {
        let request = ElementSetRequest::new(address);
        Ok(self.send(&request).await?)
    }
}
