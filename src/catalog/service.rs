use std::time::Duration;

use futures::future::{BoxFuture, FutureExt};
use tracing::debug;
use url::Url;

use crate::config::TmdbConfig;

use super::client::{HttpCatalogClient, RemoteCatalogClient};
use super::error::ServiceError;
use super::types::MoviePage;

/// Domain-level access to the movie catalog.
pub trait CatalogService: Send + Sync {
  /// Fetch one page of popular movies. Pages start at 1.
  fn fetch_popular_movies(&self, page: u32) -> BoxFuture<'_, Result<MoviePage, ServiceError>>;
}

/// TMDB catalog service.
///
/// Builds the request URL and translates client failures into
/// [`ServiceError`]. No retries, no caching.
pub struct TmdbService<C = HttpCatalogClient> {
  client: C,
  base_url: String,
  language: String,
  api_key: String,
}

impl TmdbService<HttpCatalogClient> {
  pub fn from_config(config: &TmdbConfig, api_key: String) -> color_eyre::Result<Self> {
    let client = HttpCatalogClient::new(Duration::from_secs(config.timeout_secs))
      .map_err(|e| color_eyre::eyre::eyre!("Failed to create HTTP client: {}", e))?;

    Ok(Self::new(
      client,
      config.base_url.clone(),
      config.language.clone(),
      api_key,
    ))
  }
}

impl<C: RemoteCatalogClient> TmdbService<C> {
  pub fn new(client: C, base_url: String, language: String, api_key: String) -> Self {
    Self {
      client,
      base_url,
      language,
      api_key,
    }
  }

  /// URL for one page of the popular movies listing.
  pub fn popular_url(&self, page: u32) -> Result<Url, ServiceError> {
    let endpoint = format!("{}/movie/popular", self.base_url.trim_end_matches('/'));
    let mut url = Url::parse(&endpoint).map_err(ServiceError::InvalidUrl)?;

    url
      .query_pairs_mut()
      .append_pair("api_key", &self.api_key)
      .append_pair("language", &self.language)
      .append_pair("page", &page.to_string());

    Ok(url)
  }
}

impl<C: RemoteCatalogClient> CatalogService for TmdbService<C> {
  fn fetch_popular_movies(&self, page: u32) -> BoxFuture<'_, Result<MoviePage, ServiceError>> {
    async move {
      let url = self.popular_url(page)?;
      debug!(url = %redact_api_key(&url), "fetching popular movies");

      let page = self.client.fetch_page(&url).await?;
      Ok(page)
    }
    .boxed()
  }
}

/// Copy of `url` with the api_key query value masked, for logging.
pub fn redact_api_key(url: &Url) -> Url {
  let mut redacted = url.clone();
  let pairs: Vec<(String, String)> = url
    .query_pairs()
    .map(|(k, v)| {
      let v = if k == "api_key" {
        "***".to_string()
      } else {
        v.into_owned()
      };
      (k.into_owned(), v)
    })
    .collect();

  redacted.query_pairs_mut().clear().extend_pairs(pairs);
  redacted
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::catalog::client::serve_once;
  use crate::catalog::error::ClientError;
  use std::sync::Mutex;

  enum Behavior {
    Page(MoviePage),
    DecodeFailure,
    TransportFailure,
  }

  struct ScriptedClient {
    behavior: Behavior,
    requested: Mutex<Vec<Url>>,
  }

  impl ScriptedClient {
    fn new(behavior: Behavior) -> Self {
      Self {
        behavior,
        requested: Mutex::new(Vec::new()),
      }
    }
  }

  impl RemoteCatalogClient for ScriptedClient {
    fn fetch_page<'a>(&'a self, url: &'a Url) -> BoxFuture<'a, Result<MoviePage, ClientError>> {
      self.requested.lock().unwrap().push(url.clone());
      let result = match &self.behavior {
        Behavior::Page(page) => Ok(page.clone()),
        Behavior::DecodeFailure => Err(ClientError::Decode(
          serde_json::from_str::<u32>("{}").unwrap_err(),
        )),
        Behavior::TransportFailure => Err(ClientError::Transport(
          reqwest::Client::new().get("not a url").build().unwrap_err(),
        )),
      };
      async move { result }.boxed()
    }
  }

  fn service(behavior: Behavior) -> TmdbService<ScriptedClient> {
    TmdbService::new(
      ScriptedClient::new(behavior),
      "https://api.themoviedb.org/3/".to_string(),
      "en-US".to_string(),
      "secret".to_string(),
    )
  }

  fn empty_page() -> MoviePage {
    MoviePage {
      page: 1,
      results: Vec::new(),
      total_pages: 1,
      total_results: 0,
    }
  }

  #[test]
  fn test_popular_url_query() {
    let url = service(Behavior::Page(empty_page())).popular_url(3).unwrap();

    assert_eq!(url.path(), "/3/movie/popular");
    let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
    assert_eq!(
      pairs,
      vec![
        ("api_key".to_string(), "secret".to_string()),
        ("language".to_string(), "en-US".to_string()),
        ("page".to_string(), "3".to_string()),
      ]
    );
  }

  #[test]
  fn test_bad_base_url_is_invalid_url() {
    let svc = TmdbService::new(
      ScriptedClient::new(Behavior::Page(empty_page())),
      "not a base".to_string(),
      "en-US".to_string(),
      "k".to_string(),
    );
    assert!(matches!(svc.popular_url(1), Err(ServiceError::InvalidUrl(_))));
  }

  #[tokio::test]
  async fn test_fetch_success_requests_page() {
    let svc = service(Behavior::Page(empty_page()));

    let page = svc.fetch_popular_movies(2).await.unwrap();

    assert_eq!(page, empty_page());
    let requested = svc.client.requested.lock().unwrap();
    assert_eq!(requested.len(), 1);
    assert!(requested[0].query().unwrap().ends_with("page=2"));
  }

  #[tokio::test]
  async fn test_decode_failure_is_decoding_error() {
    let err = service(Behavior::DecodeFailure)
      .fetch_popular_movies(1)
      .await
      .unwrap_err();
    assert!(matches!(err, ServiceError::Decoding(_)));
  }

  #[tokio::test]
  async fn test_transport_failure_is_network_error() {
    let err = service(Behavior::TransportFailure)
      .fetch_popular_movies(1)
      .await
      .unwrap_err();
    assert!(matches!(err, ServiceError::Network(_)));
    assert!(err.to_string().starts_with("Network error: "));
  }

  fn http_service(base_url: String) -> TmdbService {
    TmdbService::new(
      HttpCatalogClient::new(Duration::from_secs(5)).unwrap(),
      base_url,
      "en-US".to_string(),
      "SUPERSECRETKEY".to_string(),
    )
  }

  #[tokio::test]
  async fn test_http_unauthorized_is_network_error_without_key() {
    let base = serve_once("401 Unauthorized", r#"{"status_message":"Invalid API key"}"#).await;

    let err = http_service(base).fetch_popular_movies(1).await.unwrap_err();
    let message = err.to_string();

    assert!(matches!(err, ServiceError::Network(_)));
    assert!(message.starts_with("Network error: "));
    assert!(message.contains("401"));
    assert!(!message.contains("SUPERSECRETKEY"));
  }

  #[tokio::test]
  async fn test_http_schema_mismatch_is_decoding_error() {
    let base = serve_once("200 OK", r#"{"page":1,"results":"nope"}"#).await;

    let err = http_service(base).fetch_popular_movies(1).await.unwrap_err();

    assert!(matches!(err, ServiceError::Decoding(_)));
    assert!(err.to_string().starts_with("Decoding error: "));
    assert!(!err.to_string().contains("SUPERSECRETKEY"));
  }

  #[tokio::test]
  async fn test_http_success_decodes_page() {
    let base = serve_once(
      "200 OK",
      r#"{"page":1,"results":[{"id":3,"title":"Alien","overview":"","poster_path":"/a.jpg"}],"total_pages":4,"total_results":80}"#,
    )
    .await;

    let page = http_service(base).fetch_popular_movies(1).await.unwrap();

    assert_eq!(page.total_pages, 4);
    assert_eq!(page.results[0].poster_path.as_deref(), Some("/a.jpg"));
  }

  #[test]
  fn test_redact_api_key() {
    let url = service(Behavior::Page(empty_page())).popular_url(1).unwrap();
    let redacted = redact_api_key(&url);
    assert!(!redacted.as_str().contains("secret"));
    assert!(redacted.as_str().contains("api_key=***"));
  }
}
