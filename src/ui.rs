use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Span,
    widgets::{Block, Borders, Paragraph, Widget},
};

use crate::{
    app::{App, AppState, Outcome},
    hit::is_hit,
    motion::BarGeometry,
};

const HORIZONTAL_MARGIN: u16 = 5;
const CURSOR_SYMBOL: &str = "▲";
const NEEDLE_SYMBOL: &str = "┃";

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let dim_style = Style::default().add_modifier(Modifier::DIM);
        let italic_style = Style::default().add_modifier(Modifier::ITALIC);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .constraints([
                Constraint::Min(0),
                Constraint::Length(1), // title
                Constraint::Length(3), // bar
                Constraint::Length(1), // cursor marker
                Constraint::Length(1),
                Constraint::Length(1), // status
                Constraint::Length(1), // legend
                Constraint::Min(0),
            ])
            .split(area);

        let title = Paragraph::new(Span::styled(
            format!(
                "{}  ·  attempt {}",
                self.difficulty.as_str().to_uppercase(),
                self.attempts
            ),
            bold_style,
        ))
        .alignment(Alignment::Center);
        title.render(chunks[1], buf);

        let bar = Block::default().borders(Borders::ALL).border_style(dim_style);
        let inner = bar.inner(chunks[2]);
        bar.render(chunks[2], buf);

        render_gauge(self, inner, buf);
        render_cursor(self, inner, chunks[3], buf);

        let (status, status_style) = match self.state {
            AppState::Playing => (
                format!(
                    "sweet spot {}  ·  speed {}",
                    self.settings.sweet_spot_width, self.settings.cursor_speed
                ),
                dim_style,
            ),
            AppState::Finished(Outcome::Succeeded) => (
                String::from("Success!"),
                bold_style.fg(Color::Green),
            ),
            AppState::Finished(Outcome::Failed) => {
                (String::from("Failed"), bold_style.fg(Color::Red))
            }
            AppState::Finished(Outcome::Cancelled) => {
                (String::from("Cancelled"), bold_style.fg(Color::Yellow))
            }
        };
        Paragraph::new(Span::styled(status, status_style))
            .alignment(Alignment::Center)
            .render(chunks[5], buf);

        let legend = match self.state {
            AppState::Playing => "(space/enter) stop / (esc) cancel / (q)uit",
            AppState::Finished(_) => "(r)etry / (esc) / (q)uit",
        };
        Paragraph::new(Span::styled(legend, italic_style))
            .alignment(Alignment::Center)
            .render(chunks[6], buf);
    }
}

/// Paint the sweet spot as a gradient, inner color at the center
fn render_gauge(app: &App, inner: Rect, buf: &mut Buffer) {
    if inner.width == 0 {
        return;
    }
    let half = (app.settings.sweet_spot_width / 2).max(1) as f64;

    for col in 0..inner.width {
        let offset = offset_for_column(col, &app.geometry, inner.width);
        if !is_hit(offset, app.settings.sweet_spot_width) {
            continue;
        }
        let t = offset.unsigned_abs() as f64 / half;
        let color = blend(app.gauge_inner_color, app.gauge_outer_color, t);
        for row in inner.top()..inner.bottom() {
            if let Some(cell) = buf.cell_mut((inner.x + col, row)) {
                cell.set_symbol(" ").set_bg(color);
            }
        }
    }
}

fn render_cursor(app: &App, inner: Rect, marker_row: Rect, buf: &mut Buffer) {
    if inner.width == 0 {
        return;
    }
    let col = column_for(app.session().position(), &app.geometry, inner.width);
    let x = inner.x + col;
    let cursor_style = match app.state {
        AppState::Playing => Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        AppState::Finished(Outcome::Succeeded) => Style::default().fg(Color::Green),
        AppState::Finished(_) => Style::default().fg(Color::Red),
    };

    for row in inner.top()..inner.bottom() {
        if let Some(cell) = buf.cell_mut((x, row)) {
            cell.set_symbol(NEEDLE_SYMBOL).set_fg(cursor_style.fg.unwrap_or(Color::White));
        }
    }
    if let Some(cell) = buf.cell_mut((x, marker_row.y)) {
        cell.set_symbol(CURSOR_SYMBOL).set_style(cursor_style);
    }
}

/// Column of the cell containing a bar offset, clamped to the bar
pub fn column_for(offset: i32, geometry: &BarGeometry, cells: u16) -> u16 {
    if cells == 0 || geometry.total_width == 0 {
        return 0;
    }
    let from_left = offset as i64 + geometry.half_width() as i64;
    let col = from_left * cells as i64 / geometry.total_width as i64;
    col.clamp(0, cells as i64 - 1) as u16
}

/// Bar offset at the center of a column
pub fn offset_for_column(col: u16, geometry: &BarGeometry, cells: u16) -> i32 {
    if cells == 0 {
        return 0;
    }
    let center = (2 * col as i64 + 1) * geometry.total_width as i64 / (2 * cells as i64);
    (center - geometry.half_width() as i64) as i32
}

/// Linear mix from `from` (t = 0) to `to` (t = 1)
pub fn blend(from: [u8; 3], to: [u8; 3], t: f64) -> Color {
    let t = t.clamp(0.0, 1.0);
    let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
    Color::Rgb(mix(from[0], to[0]), mix(from[1], to[1]), mix(from[2], to[2]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{app::AppParams, config::Config};

    fn app() -> App {
        let mut diags = Vec::new();
        App::new(
            &Config::default(),
            AppParams {
                difficulty: "normal".into(),
                recipient: "A".to_string(),
                seed: Some(9),
            },
            &mut diags,
        )
    }

    #[test]
    fn columns_cover_the_bar() {
        let geometry = BarGeometry::default();
        assert_eq!(column_for(-120, &geometry, 60), 0);
        assert_eq!(column_for(0, &geometry, 60), 30);
        assert_eq!(column_for(119, &geometry, 60), 59);
        assert_eq!(column_for(500, &geometry, 60), 59);
        assert_eq!(column_for(-500, &geometry, 60), 0);
    }

    #[test]
    fn column_centers_map_back_inside_their_column() {
        let geometry = BarGeometry::default();
        for col in 0..60 {
            let offset = offset_for_column(col, &geometry, 60);
            assert_eq!(column_for(offset, &geometry, 60), col);
        }
    }

    #[test]
    fn widest_bar_maps_columns_without_wrapping() {
        let geometry = BarGeometry::new(u32::MAX, 10);
        assert!(offset_for_column(0, &geometry, 60) < 0);
        assert!(offset_for_column(59, &geometry, 60) > 0);
        assert_eq!(column_for(i32::MAX, &geometry, 60), 59);
        assert_eq!(column_for(-i32::MAX, &geometry, 60), 0);
    }

    #[test]
    fn blend_endpoints() {
        assert_eq!(blend([0, 0, 0], [200, 100, 50], 0.0), Color::Rgb(0, 0, 0));
        assert_eq!(blend([0, 0, 0], [200, 100, 50], 1.0), Color::Rgb(200, 100, 50));
        assert_eq!(blend([0, 0, 0], [200, 100, 50], 0.5), Color::Rgb(100, 50, 25));
    }

    #[test]
    fn renders_cursor_and_gauge() {
        let app = app();
        let area = Rect::new(0, 0, 80, 12);
        let mut buf = Buffer::empty(area);
        (&app).render(area, &mut buf);

        let symbols: Vec<&str> = buf.content().iter().map(|c| c.symbol()).collect();
        assert!(symbols.contains(&CURSOR_SYMBOL));
        assert!(buf
            .content()
            .iter()
            .any(|c| matches!(c.bg, Color::Rgb(_, _, _))));
    }

    #[test]
    fn tiny_area_does_not_panic() {
        let app = app();
        let area = Rect::new(0, 0, 4, 2);
        let mut buf = Buffer::empty(area);
        (&app).render(area, &mut buf);
    }
}
