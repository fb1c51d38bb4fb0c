use super::{FetchError, HTTPClient, ResponseError};
use crate::fleet::ElementSource;
use std::time::Duration;

#[test]
fn test_resolve_relative_and_absolute() {
    let client = HTTPClient::new("https://celestrak.org/", Duration::from_secs(1)).unwrap();
    assert_eq!(client.url(), "https://celestrak.org");
    assert_eq!(
        client.resolve("/NORAD/elements/gp.php?GROUP=stations&FORMAT=tle"),
        "https://celestrak.org/NORAD/elements/gp.php?GROUP=stations&FORMAT=tle"
    );
    assert_eq!(client.resolve("weather.txt"), "https://celestrak.org/weather.txt");
    assert_eq!(client.resolve("http://localhost:8080/x.txt"), "http://localhost:8080/x.txt");
}

#[tokio::test]
async fn test_fetch_without_server_fails_softly() {
    let client = HTTPClient::new("http://127.0.0.1:9", Duration::from_millis(500)).unwrap();
    let result = client.fetch("/elements.txt").await;
    assert!(matches!(result, Err(FetchError::Response(_))));
}

#[test]
fn test_fetch_error_from_response_error() {
    let err: FetchError = ResponseError::InternalServer.into();
    assert_eq!(err, FetchError::Response(ResponseError::InternalServer));
}
