use std::future::Future;
use strum_macros::Display;

pub(crate) trait HTTPResponseType {
    type ParsedResponseType: Send;

    fn read_response(
        response: reqwest::Response,
    ) -> impl Future<Output = Result<Self::ParsedResponseType, ResponseError>> + Send;
}

/// Maps a non-success status class to the matching [`ResponseError`].
pub(crate) fn unwrap_return_code(response: reqwest::Response) -> Result<reqwest::Response, ResponseError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else if status.is_server_error() {
        Err(ResponseError::InternalServer)
    } else if status.is_client_error() {
        Err(ResponseError::BadRequest(status.as_u16()))
    } else {
        Err(ResponseError::Unknown)
    }
}

#[derive(Debug, Display, Clone, PartialEq, Eq)]
pub enum ResponseError {
    InternalServer,
    BadRequest(u16),
    NoConnection,
    Timeout,
    Unknown,
}

impl std::error::Error for ResponseError {}

impl From<reqwest::Error> for ResponseError {
    fn from(value: reqwest::Error) -> Self {
        if value.is_timeout() {
            ResponseError::Timeout
        } else if value.is_connect() {
            ResponseError::NoConnection
        } else if let Some(status) = value.status() {
            if status.is_server_error() {
                ResponseError::InternalServer
            } else {
                ResponseError::BadRequest(status.as_u16())
            }
        } else if value.is_request() || value.is_builder() {
            ResponseError::BadRequest(0)
        } else {
            ResponseError::Unknown
        }
    }
}
