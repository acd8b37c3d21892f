use crate::event::{Event, EventHandler};
use crate::ui;
use crate::ui::renderfns::header::extract_domain;
use crate::ui::view::{View, ViewAction};
use crate::ui::views::MovieListView;
use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{
  disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use marquee::config::Config;
use marquee::connectivity::Connectivity;
use marquee::sync::{SyncHandle, SyncSnapshot};
use ratatui::prelude::*;
use std::io::stdout;
use std::time::Duration;
use tracing::info;

/// Main application state
pub struct App {
  /// Navigation stack - root is always at index 0
  view_stack: Vec<Box<dyn View>>,

  /// Handle for footer status; views hold their own clones
  sync: SyncHandle,

  /// Latest synchronizer state, refreshed on tick
  status: SyncSnapshot,

  /// Reachability of the catalog host
  connectivity: Box<dyn Connectivity>,

  /// Header label
  title: String,

  /// Whether to quit
  should_quit: bool,
}

impl App {
  pub fn new(config: &Config, sync: SyncHandle, connectivity: Box<dyn Connectivity>) -> Self {
    let title = config
      .title
      .clone()
      .unwrap_or_else(|| extract_domain(&config.tmdb.base_url).to_string());

    let root = MovieListView::new(sync.clone(), config.tmdb.image_base_url.clone());

    Self {
      view_stack: vec![Box::new(root)],
      status: sync.snapshot(),
      sync,
      connectivity,
      title,
      should_quit: false,
    }
  }

  pub async fn run(&mut self) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;

    let result = self.event_loop().await;

    // Cleanup terminal, even if the loop failed
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
  }

  async fn event_loop(&mut self) -> Result<()> {
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
    let mut events = EventHandler::new(Duration::from_millis(250));

    while !self.should_quit {
      terminal.draw(|frame| ui::draw(frame, self))?;

      match events.next().await {
        Some(event) => self.handle_event(event),
        None => break,
      }
    }

    info!("shutting down");
    Ok(())
  }

  fn handle_event(&mut self, event: Event) {
    match event {
      Event::Key(key) => self.handle_key(key),
      Event::Resize => {} // Redrawn on the next loop iteration
      Event::Tick => self.tick(),
    }
  }

  fn tick(&mut self) {
    if let Some(status) = self.sync.poll() {
      self.status = status;
    }
    for view in &mut self.view_stack {
      view.tick();
    }
  }

  fn handle_key(&mut self, key: KeyEvent) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
      self.should_quit = true;
      return;
    }

    let action = match self.view_stack.last_mut() {
      Some(view) => view.handle_key(key),
      None => ViewAction::Pop,
    };

    match action {
      ViewAction::None => {}
      ViewAction::Push(view) => self.view_stack.push(view),
      ViewAction::Pop => {
        if self.view_stack.len() > 1 {
          self.view_stack.pop();
        } else {
          self.should_quit = true;
        }
      }
    }
  }

  pub fn current_view(&self) -> Option<&dyn View> {
    self.view_stack.last().map(|view| view.as_ref())
  }

  pub fn current_view_mut(&mut self) -> Option<&mut Box<dyn View>> {
    self.view_stack.last_mut()
  }

  pub fn breadcrumb(&self) -> Vec<String> {
    self
      .view_stack
      .iter()
      .map(|view| view.breadcrumb_label())
      .collect()
  }

  pub fn status(&self) -> &SyncSnapshot {
    &self.status
  }

  pub fn title(&self) -> &str {
    &self.title
  }

  pub fn is_connected(&self) -> bool {
    self.connectivity.is_connected()
  }
}
