use std::time::Duration;

use futures::future::{BoxFuture, FutureExt};
use tracing::debug;
use url::Url;

use super::api_types::ApiMoviePage;
use super::error::ClientError;
use super::types::MoviePage;

/// Fetches and decodes a single catalog page from a fully-formed URL.
///
/// Implementations make exactly one attempt per call.
pub trait RemoteCatalogClient: Send + Sync {
  fn fetch_page<'a>(&'a self, url: &'a Url) -> BoxFuture<'a, Result<MoviePage, ClientError>>;
}

/// reqwest-backed catalog client
#[derive(Clone)]
pub struct HttpCatalogClient {
  http: reqwest::Client,
}

impl HttpCatalogClient {
  pub fn new(timeout: Duration) -> Result<Self, ClientError> {
    let http = reqwest::Client::builder()
      .timeout(timeout)
      .user_agent(concat!("marquee/", env!("CARGO_PKG_VERSION")))
      .build()?;

    Ok(Self { http })
  }
}

impl RemoteCatalogClient for HttpCatalogClient {
  fn fetch_page<'a>(&'a self, url: &'a Url) -> BoxFuture<'a, Result<MoviePage, ClientError>> {
    async move {
      // reqwest errors carry the request URL, and ours holds the API key
      let response = self
        .http
        .get(url.clone())
        .send()
        .await
        .and_then(|r| r.error_for_status())
        .map_err(|e| ClientError::Transport(e.without_url()))?;

      let body = response
        .bytes()
        .await
        .map_err(|e| ClientError::Transport(e.without_url()))?;
      debug!(bytes = body.len(), "received catalog page");

      decode_page(&body)
    }
    .boxed()
  }
}

/// Decode a popular-movies response body.
pub fn decode_page(body: &[u8]) -> Result<MoviePage, ClientError> {
  let api: ApiMoviePage = serde_json::from_slice(body)?;
  Ok(api.into())
}

/// Serve one canned HTTP response on a random local port and return the
/// catalog base URL (`http://127.0.0.1:<port>/3`).
#[cfg(test)]
pub(crate) async fn serve_once(status_line: &'static str, body: &'static str) -> String {
  use tokio::io::{AsyncReadExt, AsyncWriteExt};
  use tokio::net::TcpListener;

  let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
  let addr = listener.local_addr().unwrap();

  tokio::spawn(async move {
    let (mut socket, _) = listener.accept().await.unwrap();
    let mut buf = [0u8; 4096];
    let _ = socket.read(&mut buf).await;
    let response = format!(
      "HTTP/1.1 {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
      status_line,
      body.len(),
      body
    );
    socket.write_all(response.as_bytes()).await.unwrap();
    let _ = socket.shutdown().await;
  });

  format!("http://{}/3", addr)
}
