use super::response_common::{HTTPResponseType, ResponseError, unwrap_return_code};

/// Newline-delimited element set text.
pub struct ElementSetResponse {}

impl HTTPResponseType for ElementSetResponse {
    type ParsedResponseType = String;

    async fn read_response(response: reqwest::Response) -> Result<Self::ParsedResponseType, ResponseError> {
        let checked = unwrap_return_code(response)?;
        Ok(checked.text().await?)
    }
}
