use super::http_response::response_common::ResponseError;
use strum_macros::Display;

/// A single source could not be retrieved.
#[derive(Debug, Display, Clone, PartialEq)]
pub enum FetchError {
    /// The HTTP exchange failed or returned a non-success status.
    Response(ResponseError),
    /// The source is not known to the provider.
    Unavailable(String),
}

impl std::error::Error for FetchError {}

impl From<ResponseError> for FetchError {
    fn from(value: ResponseError) -> Self { FetchError::Response(value) }
}
