//! Error taxonomy for catalog fetching.

use thiserror::Error;

/// Boxed cause carried by domain errors.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Failures of a single HTTP round trip.
#[derive(Debug, Error)]
pub enum ClientError {
  /// Timeout, connection failure or non-success status
  #[error("transport: {0}")]
  Transport(#[from] reqwest::Error),
  /// Response body did not match the expected schema
  #[error("decode: {0}")]
  Decode(#[from] serde_json::Error),
}

/// Errors surfaced by the catalog service. The display strings are shown
/// to the user as-is.
#[derive(Debug, Error)]
pub enum ServiceError {
  #[error("Invalid URL.")]
  InvalidUrl(#[source] url::ParseError),
  #[error("Network error: {0}")]
  Network(#[source] BoxError),
  #[error("Decoding error: {0}")]
  Decoding(#[source] BoxError),
  #[error("An unknown error occurred.")]
  Unknown,
}

impl From<ClientError> for ServiceError {
  fn from(err: ClientError) -> Self {
    match err {
      ClientError::Decode(e) => ServiceError::Decoding(Box::new(e)),
      ClientError::Transport(e) => ServiceError::Network(Box::new(e)),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_client_error_names_failure_kind() {
    let err = ClientError::from(serde_json::from_str::<u32>("{}").unwrap_err());
    assert!(err.to_string().starts_with("decode: "));
  }

  #[test]
  fn test_decode_maps_to_decoding_without_prefix() {
    let err = ServiceError::from(ClientError::from(
      serde_json::from_str::<u32>("{}").unwrap_err(),
    ));
    assert!(matches!(err, ServiceError::Decoding(_)));
    assert!(!err.to_string().contains("decode: "));
  }

  #[test]
  fn test_invalid_url_message() {
    let err = ServiceError::InvalidUrl(url::ParseError::EmptyHost);
    assert_eq!(err.to_string(), "Invalid URL.");
  }

  #[test]
  fn test_network_error_message() {
    let err = ServiceError::Network("Network failed".into());
    assert_eq!(err.to_string(), "Network error: Network failed");
  }

  #[test]
  fn test_decoding_error_message() {
    let err = ServiceError::Decoding("Decoding failed".into());
    assert_eq!(err.to_string(), "Decoding error: Decoding failed");
  }

  #[test]
  fn test_unknown_error_message() {
    assert_eq!(
      ServiceError::Unknown.to_string(),
      "An unknown error occurred."
    );
  }

  #[test]
  fn test_decode_failure_maps_to_decoding() {
    let json_err = serde_json::from_str::<u32>("\"nope\"").unwrap_err();
    let err = ServiceError::from(ClientError::Decode(json_err));
    assert!(matches!(err, ServiceError::Decoding(_)));
    assert!(err.to_string().starts_with("Decoding error: "));
  }
}
