//! Pagination synchronizer: fetches catalog pages one at a time, merges them
//! into the local store and publishes the cached view.
//!
//! The UI never awaits a fetch directly. It holds a [`SyncHandle`], sends load
//! requests and polls [`SyncSnapshot`]s on tick.
//!
//! # Example
//!
//! ```ignore
//! let sync = Synchronizer::new(service, store);
//! let mut handle = SyncHandle::spawn(sync);
//!
//! // First page
//! handle.load_next_if_needed(None);
//!
//! // In event loop tick
//! if let Some(snapshot) = handle.poll() {
//!     // State changed, trigger re-render
//! }
//! ```

use chrono::{DateTime, Utc};
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use crate::cache::{CacheSource, LocalStore};
use crate::catalog::{CatalogService, Movie};

/// How far from the end of the list the prefetch fires.
pub const PREFETCH_DISTANCE: usize = 5;

/// Pagination and presentation state owned by a [`Synchronizer`].
#[derive(Debug, Clone)]
pub struct SyncState {
  current_page: u32,
  total_pages: u32,
  is_loading: bool,
  last_error: Option<String>,
  /// Everything in the local store, ascending by id
  visible: Vec<Movie>,
  source: CacheSource,
  synced_at: Option<DateTime<Utc>>,
}

impl Default for SyncState {
  fn default() -> Self {
    Self {
      current_page: 1,
      total_pages: 1,
      is_loading: false,
      last_error: None,
      visible: Vec::new(),
      source: CacheSource::Empty,
      synced_at: None,
    }
  }
}

impl SyncState {
  pub fn current_page(&self) -> u32 {
    self.current_page
  }

  pub fn total_pages(&self) -> u32 {
    self.total_pages
  }

  pub fn is_loading(&self) -> bool {
    self.is_loading
  }

  pub fn has_more_pages(&self) -> bool {
    self.current_page <= self.total_pages
  }

  pub fn last_error(&self) -> Option<&str> {
    self.last_error.as_deref()
  }

  pub fn visible(&self) -> &[Movie] {
    &self.visible
  }
}

/// Immutable copy of [`SyncState`] handed to the UI.
#[derive(Debug, Clone, Default)]
pub struct SyncSnapshot {
  pub movies: Vec<Movie>,
  pub is_loading: bool,
  pub has_more_pages: bool,
  pub last_error: Option<String>,
  pub current_page: u32,
  pub total_pages: u32,
  pub source: CacheSource,
  pub synced_at: Option<DateTime<Utc>>,
}

/// What a load request ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
  /// Guard rejected the request or the prefetch threshold was not reached
  Skipped,
  /// Page fetched and merged
  Loaded { page: u32, inserted: usize },
  /// Fetch failed; cached contents were published instead
  Fallback,
}

/// Owns pagination state and merges remote pages into the local store.
///
/// All mutation goes through `&mut self`, so there is exactly one owner.
pub struct Synchronizer<S, L> {
  service: S,
  store: L,
  state: SyncState,
  publisher: Option<watch::Sender<SyncSnapshot>>,
}

impl<S: CatalogService, L: LocalStore> Synchronizer<S, L> {
  pub fn new(service: S, store: L) -> Self {
    Self {
      service,
      store,
      state: SyncState::default(),
      publisher: None,
    }
  }

  pub fn state(&self) -> &SyncState {
    &self.state
  }

  pub fn store(&self) -> &L {
    &self.store
  }

  pub fn snapshot(&self) -> SyncSnapshot {
    SyncSnapshot {
      movies: self.state.visible.clone(),
      is_loading: self.state.is_loading,
      has_more_pages: self.state.has_more_pages(),
      last_error: self.state.last_error.clone(),
      current_page: self.state.current_page,
      total_pages: self.state.total_pages,
      source: self.state.source,
      synced_at: self.state.synced_at,
    }
  }

  /// Receive a snapshot every time the state changes.
  pub fn subscribe(&mut self) -> watch::Receiver<SyncSnapshot> {
    match &self.publisher {
      Some(tx) => tx.subscribe(),
      None => {
        let (tx, rx) = watch::channel(self.snapshot());
        self.publisher = Some(tx);
        rx
      }
    }
  }

  fn publish(&self) {
    if let Some(tx) = &self.publisher {
      tx.send_replace(self.snapshot());
    }
  }

  /// Load the next page.
  ///
  /// No-op while a load is in flight or once every page has been fetched.
  /// Failures never escape: they leave pagination untouched, publish the
  /// cached contents and set `last_error`.
  pub async fn load_next(&mut self) -> LoadOutcome {
    if self.state.is_loading || !self.state.has_more_pages() {
      debug!(
        is_loading = self.state.is_loading,
        current_page = self.state.current_page,
        total_pages = self.state.total_pages,
        "load skipped"
      );
      return LoadOutcome::Skipped;
    }

    self.state.is_loading = true;
    self.publish();

    let outcome = self.fetch_and_merge().await;

    self.state.is_loading = false;
    self.publish();

    outcome
  }

  /// Prefetch trigger for scrolling lists.
  ///
  /// With no reference item this always loads. Otherwise it loads only when
  /// the reference sits `PREFETCH_DISTANCE` items from the end of the list.
  pub async fn load_next_if_needed(&mut self, reference: Option<&Movie>) -> LoadOutcome {
    let Some(reference) = reference else {
      return self.load_next().await;
    };

    let threshold = self.state.visible.len().saturating_sub(PREFETCH_DISTANCE);
    let position = self.state.visible.iter().position(|m| m.id == reference.id);

    if position == Some(threshold) {
      self.load_next().await
    } else {
      LoadOutcome::Skipped
    }
  }

  async fn fetch_and_merge(&mut self) -> LoadOutcome {
    let page = self.state.current_page;

    let result = self.service.fetch_popular_movies(page).await;

    match result {
      Ok(response) => {
        self.state.total_pages = response.total_pages;
        self.state.current_page += 1;

        let inserted = self.merge(&response.results);
        self.reload_visible();

        self.state.last_error = None;
        self.state.source = CacheSource::Network;
        self.state.synced_at = Some(Utc::now());

        info!(
          page,
          inserted,
          total_pages = self.state.total_pages,
          cached = self.state.visible.len(),
          "page loaded"
        );
        LoadOutcome::Loaded { page, inserted }
      }
      Err(e) => {
        self.reload_visible();

        warn!(page, error = %e, cached = self.state.visible.len(), "fetch failed, serving cache");
        self.state.last_error = Some(e.to_string());
        self.state.source = CacheSource::Offline;
        LoadOutcome::Fallback
      }
    }
  }

  /// Insert movies not yet cached, in server order. Best effort: a failed
  /// write leaves that movie uncached for this round.
  fn merge(&self, movies: &[Movie]) -> usize {
    let mut inserted = 0;

    for movie in movies {
      match self.store.exists::<Movie>(movie.id) {
        Ok(true) => continue,
        Ok(false) => {}
        Err(e) => {
          warn!(id = movie.id, error = %e, "cache lookup failed, skipping movie");
          continue;
        }
      }

      match self.store.insert_if_absent(movie) {
        Ok(true) => inserted += 1,
        Ok(false) => {}
        Err(e) => warn!(id = movie.id, error = %e, "cache write failed, skipping movie"),
      }
    }

    inserted
  }

  /// Replace the visible list with the store contents. A read failure
  /// degrades to an empty list.
  fn reload_visible(&mut self) {
    self.state.visible = match self.store.all_sorted_by_id::<Movie>() {
      Ok(movies) => movies,
      Err(e) => {
        warn!(error = %e, "cache read failed, showing empty list");
        Vec::new()
      }
    };
  }
}

/// Requests accepted by the synchronizer task.
#[derive(Debug)]
enum SyncCommand {
  LoadNext,
  LoadNextIfNeeded(Option<Movie>),
}

/// Handle to a [`Synchronizer`] running on its own task.
///
/// Requests that arrive while a load is in flight are dropped, not queued.
#[derive(Clone)]
pub struct SyncHandle {
  commands: mpsc::UnboundedSender<SyncCommand>,
  snapshots: watch::Receiver<SyncSnapshot>,
}

impl SyncHandle {
  /// Move `sync` onto a new task. The task exits once every handle is dropped.
  pub fn spawn<S, L>(mut sync: Synchronizer<S, L>) -> Self
  where
    S: CatalogService + 'static,
    L: LocalStore + 'static,
  {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let snapshots = sync.subscribe();

    tokio::spawn(async move {
      while let Some(command) = rx.recv().await {
        let outcome = match command {
          SyncCommand::LoadNext => sync.load_next().await,
          SyncCommand::LoadNextIfNeeded(reference) => {
            sync.load_next_if_needed(reference.as_ref()).await
          }
        };

        if outcome != LoadOutcome::Skipped {
          while let Ok(dropped) = rx.try_recv() {
            debug!(?dropped, "ignoring request received while loading");
          }
        }
      }
    });

    Self {
      commands: tx,
      snapshots,
    }
  }

  pub fn load_next(&self) {
    // Ignore send errors - the task only stops when all handles are gone
    let _ = self.commands.send(SyncCommand::LoadNext);
  }

  pub fn load_next_if_needed(&self, reference: Option<Movie>) {
    let _ = self.commands.send(SyncCommand::LoadNextIfNeeded(reference));
  }

  /// Latest published state.
  pub fn snapshot(&self) -> SyncSnapshot {
    self.snapshots.borrow().clone()
  }

  /// Returns the new snapshot if the state changed since the last poll.
  /// Call this in your event loop tick handler.
  pub fn poll(&mut self) -> Option<SyncSnapshot> {
    match self.snapshots.has_changed() {
      Ok(true) => Some(self.snapshots.borrow_and_update().clone()),
      _ => None,
    }
  }
}
