use crate::ui::ensure_valid_selection;
use crate::ui::renderfns::truncate;
use crate::ui::view::{Shortcut, View, ViewAction};
use crate::ui::views::MovieDetailView;
use crossterm::event::{KeyCode, KeyEvent};
use marquee::catalog::Movie;
use marquee::sync::{SyncHandle, SyncSnapshot};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};

/// Infinite-scrolling list of popular movies
pub struct MovieListView {
  sync: SyncHandle,
  snapshot: SyncSnapshot,
  list_state: ListState,
  image_base_url: String,
}

impl MovieListView {
  pub fn new(sync: SyncHandle, image_base_url: String) -> Self {
    // First page
    sync.load_next_if_needed(None);

    Self {
      snapshot: sync.snapshot(),
      sync,
      list_state: ListState::default(),
      image_base_url,
    }
  }

  fn movies(&self) -> &[Movie] {
    &self.snapshot.movies
  }

  fn selected_movie(&self) -> Option<&Movie> {
    self.list_state.selected().and_then(|i| self.movies().get(i))
  }

  /// Tell the synchronizer which row is focused so it can prefetch.
  fn selection_changed(&mut self) {
    let len = self.snapshot.movies.len();
    ensure_valid_selection(&mut self.list_state, len);
    if let Some(movie) = self.selected_movie() {
      self.sync.load_next_if_needed(Some(movie.clone()));
    }
  }

  fn title(&self) -> String {
    let count = self.movies().len();
    if self.snapshot.is_loading {
      format!(" Popular Movies ({}) (loading...) ", count)
    } else if self.snapshot.has_more_pages {
      format!(
        " Popular Movies ({}) page {}/{} ",
        count,
        self.snapshot.current_page.saturating_sub(1),
        self.snapshot.total_pages
      )
    } else {
      format!(" Popular Movies ({}) all pages ", count)
    }
  }

  fn render_list(&mut self, frame: &mut Frame, area: Rect) {
    let len = self.movies().len();
    ensure_valid_selection(&mut self.list_state, len);

    let block = Block::default()
      .title(self.title())
      .title_alignment(Alignment::Center)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Blue));

    if self.movies().is_empty() {
      let content = if self.snapshot.is_loading {
        "Loading movies..."
      } else if self.snapshot.last_error.is_some() {
        "Failed to load movies. Press 'r' to retry."
      } else {
        "No movies found."
      };
      let paragraph = Paragraph::new(content)
        .block(block)
        .style(Style::default().fg(Color::DarkGray));
      frame.render_widget(paragraph, area);
      return;
    }

    let title_width = area.width.saturating_sub(14) as usize;
    let items: Vec<ListItem> = self
      .movies()
      .iter()
      .map(|movie| {
        let line = Line::from(vec![
          Span::styled(
            format!("{:>8}", movie.id),
            Style::default().fg(Color::DarkGray),
          ),
          Span::raw("  "),
          Span::raw(truncate(&movie.title, title_width)),
        ]);
        ListItem::new(line)
      })
      .collect();

    let list = List::new(items)
      .block(block)
      .highlight_style(
        Style::default()
          .bg(Color::DarkGray)
          .add_modifier(Modifier::BOLD),
      )
      .highlight_symbol("> ");

    frame.render_stateful_widget(list, area, &mut self.list_state);
  }
}

impl View for MovieListView {
  fn handle_key(&mut self, key: KeyEvent) -> ViewAction {
    match key.code {
      KeyCode::Char('j') | KeyCode::Down => {
        self.list_state.select_next();
        self.selection_changed();
      }
      KeyCode::Char('k') | KeyCode::Up => {
        self.list_state.select_previous();
        self.selection_changed();
      }
      KeyCode::Char('g') | KeyCode::Home => {
        self.list_state.select_first();
        self.selection_changed();
      }
      KeyCode::Char('G') | KeyCode::End => {
        self.list_state.select_last();
        let len = self.snapshot.movies.len();
        ensure_valid_selection(&mut self.list_state, len);
        // Prefetch only fires on the threshold row, and is dropped if a
        // load is in flight. G and r are the manual way to ask for more.
        self.sync.load_next();
      }
      KeyCode::Char('r') => {
        self.sync.load_next();
      }
      KeyCode::Enter => {
        if let Some(movie) = self.selected_movie() {
          return ViewAction::Push(Box::new(MovieDetailView::new(
            movie.clone(),
            self.image_base_url.clone(),
          )));
        }
      }
      KeyCode::Char('q') | KeyCode::Esc => return ViewAction::Pop,
      _ => {}
    }
    ViewAction::None
  }

  fn render(&mut self, frame: &mut Frame, area: Rect) {
    self.render_list(frame, area);
  }

  fn breadcrumb_label(&self) -> String {
    "Popular".to_string()
  }

  fn tick(&mut self) {
    if let Some(snapshot) = self.sync.poll() {
      self.snapshot = snapshot;
    }
  }

  fn shortcuts(&self) -> Vec<Shortcut> {
    vec![
      Shortcut::new("j/k", "nav"),
      Shortcut::new("enter", "details"),
      Shortcut::new("r", "load more"),
      Shortcut::new("q", "quit"),
    ]
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crossterm::event::KeyModifiers;
  use marquee::cache::SqliteStore;
  use marquee::catalog::{HttpCatalogClient, TmdbService};
  use marquee::sync::Synchronizer;
  use std::time::Duration;

  fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
  }

  fn movie(id: i64) -> Movie {
    Movie {
      id,
      title: format!("Movie {}", id),
      overview: String::new(),
      poster_path: None,
    }
  }

  fn view_with(ids: &[i64]) -> MovieListView {
    let service = TmdbService::new(
      HttpCatalogClient::new(Duration::from_secs(1)).unwrap(),
      "http://127.0.0.1:9/3".to_string(),
      "en-US".to_string(),
      "k".to_string(),
    );
    let sync = SyncHandle::spawn(Synchronizer::new(service, SqliteStore::open_in_memory().unwrap()));

    let mut view = MovieListView::new(sync, "https://img".to_string());
    view.snapshot = SyncSnapshot {
      movies: ids.iter().copied().map(movie).collect(),
      has_more_pages: true,
      ..SyncSnapshot::default()
    };
    view
  }

  #[tokio::test]
  async fn test_navigation_keeps_selection_in_bounds() {
    let mut view = view_with(&[1, 2, 3]);

    view.handle_key(key(KeyCode::Char('j')));
    assert_eq!(view.list_state.selected(), Some(0));

    view.handle_key(key(KeyCode::Char('G')));
    assert_eq!(view.list_state.selected(), Some(2));

    view.handle_key(key(KeyCode::Char('j')));
    assert_eq!(view.list_state.selected(), Some(2));
  }

  #[tokio::test]
  async fn test_enter_opens_detail_and_q_pops() {
    let mut view = view_with(&[7]);
    view.handle_key(key(KeyCode::Char('g')));

    assert!(matches!(view.handle_key(key(KeyCode::Enter)), ViewAction::Push(_)));
    assert!(matches!(view.handle_key(key(KeyCode::Char('q'))), ViewAction::Pop));
  }

  #[tokio::test]
  async fn test_empty_list_has_no_selection() {
    let mut view = view_with(&[]);

    view.handle_key(key(KeyCode::Char('G')));

    assert_eq!(view.list_state.selected(), None);
    assert!(matches!(view.handle_key(key(KeyCode::Enter)), ViewAction::None));
  }
}
