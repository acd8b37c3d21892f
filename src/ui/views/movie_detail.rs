use crate::ui::view::{Shortcut, View, ViewAction};
use crossterm::event::{KeyCode, KeyEvent};
use marquee::catalog::Movie;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

/// View for displaying a single cached movie
pub struct MovieDetailView {
  movie: Movie,
  image_base_url: String,
}

impl MovieDetailView {
  pub fn new(movie: Movie, image_base_url: String) -> Self {
    Self {
      movie,
      image_base_url,
    }
  }

  fn render_detail(&self, frame: &mut Frame, area: Rect) {
    let block = Block::default()
      .title(format!(" {} ", self.movie.title))
      .title_alignment(Alignment::Center)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Blue));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
      .direction(Direction::Vertical)
      .constraints([
        Constraint::Length(2), // Id and poster
        Constraint::Length(1), // Separator
        Constraint::Min(1),    // Overview
      ])
      .split(inner);

    let poster = self.movie.poster_url_in(&self.image_base_url);
    let header = vec![
      Line::from(vec![
        Span::styled("Id: ", Style::default().fg(Color::DarkGray)),
        Span::raw(self.movie.id.to_string()),
      ]),
      Line::from(vec![
        Span::styled("Poster: ", Style::default().fg(Color::DarkGray)),
        match poster {
          Some(url) => Span::styled(url, Style::default().fg(Color::Cyan).underlined()),
          None => Span::styled("No poster", Style::default().fg(Color::DarkGray)),
        },
      ]),
    ];
    frame.render_widget(Paragraph::new(header), chunks[0]);

    let sep = Paragraph::new("─".repeat(chunks[1].width as usize))
      .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(sep, chunks[1]);

    let overview = if self.movie.overview.is_empty() {
      "No overview"
    } else {
      self.movie.overview.as_str()
    };
    let overview_para = Paragraph::new(overview).wrap(Wrap { trim: true });
    frame.render_widget(overview_para, chunks[2]);
  }
}

impl View for MovieDetailView {
  fn handle_key(&mut self, key: KeyEvent) -> ViewAction {
    match key.code {
      KeyCode::Char('q') | KeyCode::Esc | KeyCode::Backspace => ViewAction::Pop,
      _ => ViewAction::None,
    }
  }

  fn render(&mut self, frame: &mut Frame, area: Rect) {
    self.render_detail(frame, area);
  }

  fn breadcrumb_label(&self) -> String {
    self.movie.title.clone()
  }

  fn shortcuts(&self) -> Vec<Shortcut> {
    vec![Shortcut::new("q", "back")]
  }
}
