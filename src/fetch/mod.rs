mod basic;
mod client;

pub use basic::BasicClient;
pub use client::HttpClient;

use anyhow::Result;
use bytes::Bytes;

/// Performs a GET request and returns the raw response body.
///
/// Non-2xx statuses are errors here: the caller treats any failure from this
/// function as a transport failure for the locator.
pub async fn fetch_bytes<C: HttpClient>(client: &C, url: &str) -> Result<Bytes> {
    let req = reqwest::Request::new(reqwest::Method::GET, url.parse()?);

    let resp = client.execute(req).await?.error_for_status()?;
    Ok(resp.bytes().await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_fetch_bytes_returns_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data.csv.gz"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"payload".to_vec()))
            .mount(&server)
            .await;

        let client = BasicClient::new();
        let bytes = fetch_bytes(&client, &format!("{}/data.csv.gz", server.uri()))
            .await
            .unwrap();
        assert_eq!(&bytes[..], b"payload");
    }

    #[tokio::test]
    async fn test_fetch_bytes_times_out_on_stalled_response() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/stalled.csv.gz"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(60)))
            .mount(&server)
            .await;

        let client = BasicClient::with_timeout(Duration::from_millis(250));
        let result = fetch_bytes(&client, &format!("{}/stalled.csv.gz", server.uri())).await;

        assert!(result.is_err());
    }
}
