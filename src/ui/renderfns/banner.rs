use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

/// Draw the full-width "no connection" banner
pub fn draw_offline_banner(frame: &mut Frame, area: Rect) {
  let paragraph = Paragraph::new("No internet connection - showing cached movies")
    .alignment(Alignment::Center)
    .style(Style::default().fg(Color::White).bg(Color::Red).bold());

  frame.render_widget(paragraph, area);
}
