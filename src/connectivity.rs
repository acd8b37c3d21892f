//! Network reachability, polled by the UI to show an offline banner.

use std::time::Duration;
use tokio::net::TcpStream;
use tokio::sync::watch;
use tracing::info;
use url::Url;

/// Something that can tell whether the catalog is reachable.
pub trait Connectivity: Send + Sync {
  fn is_connected(&self) -> bool;
}

/// Fixed answer. Used when probing is disabled and in tests.
#[derive(Debug, Clone, Copy)]
pub struct StaticConnectivity(pub bool);

impl Connectivity for StaticConnectivity {
  fn is_connected(&self) -> bool {
    self.0
  }
}

/// Periodically opens a TCP connection to the catalog host.
///
/// The probe task stops once the monitor is dropped.
pub struct NetworkMonitor {
  status: watch::Receiver<bool>,
}

impl NetworkMonitor {
  /// Probe the host and port `base_url` points at.
  pub fn for_url(base_url: &str, interval: Duration) -> Option<Self> {
    let url = Url::parse(base_url).ok()?;
    let host = url.host_str()?.to_string();
    let port = url.port_or_known_default()?;
    Some(Self::spawn(host, port, interval))
  }

  pub fn spawn(host: String, port: u16, interval: Duration) -> Self {
    let (tx, rx) = watch::channel(true);

    tokio::spawn(async move {
      let mut ticker = tokio::time::interval(interval);
      loop {
        ticker.tick().await;
        if tx.is_closed() {
          break;
        }

        let connected = probe(&host, port, interval).await;
        tx.send_if_modified(|current| {
          if *current != connected {
            info!(host = %host, connected, "connectivity changed");
            *current = connected;
            true
          } else {
            false
          }
        });
      }
    });

    Self { status: rx }
  }
}

impl Connectivity for NetworkMonitor {
  fn is_connected(&self) -> bool {
    *self.status.borrow()
  }
}

async fn probe(host: &str, port: u16, timeout: Duration) -> bool {
  matches!(
    tokio::time::timeout(timeout, TcpStream::connect((host, port))).await,
    Ok(Ok(_))
  )
}
