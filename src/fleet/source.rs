use crate::http_handler::FetchError;
use async_trait::async_trait;

/// Asynchronous provider of element set source bodies.
#[async_trait]
pub trait ElementSource: Send + Sync {
    /// Retrieves the newline-delimited element text behind `address`.
    async fn fetch(&self, address: &str) -> Result<String, FetchError>;
}
