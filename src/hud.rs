//! Terminal HUD for the head-pose controller
//!
//! Draws the pointer lane with the saturation bands, the pressure gauge,
//! the notification feed and the help bar. Pure rendering: everything
//! shown comes in through [`HudView`], so tests drive it with a
//! `TestBackend` and no live tracker.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
};

use crate::notification::{Notification, NotificationLevel};
use crate::theme::{self, Base16Palette};
use crate::tracker::{OverlayPlacement, OverlayUpdate, Viewport};

/// Everything the HUD needs for one frame.
pub struct HudView<'a> {
    pub source: String,
    pub paused: bool,
    pub title: Option<String>,
    pub page_label: String,
    pub viewport: Viewport,
    pub overlay: OverlayUpdate,
    pub repeat_count: u32,
    pub notifications: &'a [Notification],
}

impl HudView<'_> {
    /// Accumulator fill as a fraction of the commit threshold. The effect
    /// band is accumulator-proportional by construction, so the ratio
    /// falls out of the overlay geometry.
    pub fn pressure_ratio(&self) -> f64 {
        if self.viewport.width <= 0.0 {
            return 0.0;
        }
        (self.overlay.effect_width / self.viewport.width).clamp(0.0, 1.0)
    }
}

pub fn draw(frame: &mut Frame, view: &HudView) {
    let palette = theme::current_theme();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(frame.area());

    draw_title(frame, chunks[0], view, palette);
    draw_lane(frame, chunks[1], view, palette);
    draw_gauge(frame, chunks[2], view, palette);
    draw_feed(frame, chunks[3], view, palette);
    draw_help(frame, chunks[4], palette);
}

fn draw_title(frame: &mut Frame, area: Rect, view: &HudView, palette: &Base16Palette) {
    let mut left = vec![
        Span::styled(
            " gazeflip ",
            Style::default()
                .fg(palette.base_06)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(view.source.clone(), Style::default().fg(palette.base_04)),
    ];
    if view.paused {
        left.push(Span::styled(
            "  [paused]",
            Style::default().fg(palette.base_0a),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(left)), area);

    let title = view.title.as_deref().unwrap_or("no document");
    let right = Line::from(vec![
        Span::styled(format!("{title} "), Style::default().fg(palette.base_05)),
        Span::styled(
            format!("{} ", view.page_label),
            Style::default()
                .fg(palette.base_06)
                .add_modifier(Modifier::BOLD),
        ),
    ]);
    frame.render_widget(Paragraph::new(right).alignment(Alignment::Right), area);
}

fn draw_lane(frame: &mut Frame, area: Rect, view: &HudView, palette: &Base16Palette) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.base_03))
        .title("pointer");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.width == 0 || inner.height == 0 {
        return;
    }
    let line = lane_line(view, inner.width as usize, palette);
    frame.render_widget(Paragraph::new(line), inner);
}

/// One row of lane cells: the dead-zone track, the saturation bands
/// anchored to whichever edge is active, and the pointer marker on top.
fn lane_line(view: &HudView, width: usize, palette: &Base16Palette) -> Line<'static> {
    let track = Style::default().fg(palette.base_02);
    let mut cells: Vec<(char, Style)> = vec![('─', track); width];

    let shadow_cols = scale_px(view.overlay.overflow_width, view.viewport.width, width);
    let pressure_cols = scale_px(view.overlay.effect_width, view.viewport.width, width);
    let shadow = Style::default().fg(palette.base_03);
    let pressure = Style::default().fg(palette.pressure_color(view.pressure_ratio()));

    match view.overlay.placement {
        OverlayPlacement::Hidden => {}
        OverlayPlacement::Left => {
            for cell in cells.iter_mut().take(shadow_cols) {
                *cell = ('░', shadow);
            }
            for cell in cells.iter_mut().take(pressure_cols) {
                *cell = ('▓', pressure);
            }
        }
        OverlayPlacement::Right => {
            for cell in cells.iter_mut().rev().take(shadow_cols) {
                *cell = ('░', shadow);
            }
            for cell in cells.iter_mut().rev().take(pressure_cols) {
                *cell = ('▓', pressure);
            }
        }
    }

    let marker = marker_column(view.overlay.cursor_x, view.viewport.width, width);
    cells[marker] = (
        '█',
        Style::default()
            .fg(palette.base_07)
            .add_modifier(Modifier::BOLD),
    );

    Line::from(
        cells
            .into_iter()
            .map(|(symbol, style)| Span::styled(symbol.to_string(), style))
            .collect::<Vec<_>>(),
    )
}

fn scale_px(px: f64, viewport_width: f64, cells: usize) -> usize {
    if viewport_width <= 0.0 {
        return 0;
    }
    let scaled = (px / viewport_width * cells as f64).round();
    (scaled.max(0.0) as usize).min(cells)
}

fn marker_column(cursor_x: f64, viewport_width: f64, cells: usize) -> usize {
    if viewport_width <= 0.0 || cells == 0 {
        return 0;
    }
    let col = (cursor_x / viewport_width * (cells - 1) as f64).round();
    (col.max(0.0) as usize).min(cells - 1)
}

fn draw_gauge(frame: &mut Frame, area: Rect, view: &HudView, palette: &Base16Palette) {
    let ratio = view.pressure_ratio();
    let direction = match view.overlay.placement {
        OverlayPlacement::Right => " →",
        OverlayPlacement::Left => " ←",
        OverlayPlacement::Hidden => "",
    };
    let mut label = format!("{:3.0}%{direction}", ratio * 100.0);
    if view.repeat_count > 0 {
        label.push_str(&format!("  ×{}", view.repeat_count));
    }

    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(palette.base_03))
                .title("pressure"),
        )
        .gauge_style(Style::default().fg(palette.pressure_color(ratio)))
        .ratio(ratio)
        .label(label);
    frame.render_widget(gauge, area);
}

fn draw_feed(frame: &mut Frame, area: Rect, view: &HudView, palette: &Base16Palette) {
    let lines: Vec<Line> = view
        .notifications
        .iter()
        .take(area.height as usize)
        .map(|n| feed_line(n, palette))
        .collect();
    frame.render_widget(Paragraph::new(lines), area);
}

fn feed_line(notification: &Notification, palette: &Base16Palette) -> Line<'static> {
    let color = match notification.level {
        NotificationLevel::Info => palette.base_05,
        NotificationLevel::Warning => palette.base_0a,
        NotificationLevel::Error => palette.base_08,
    };
    Line::from(Span::styled(
        format!(" {}", notification.message),
        Style::default().fg(color),
    ))
}

fn draw_help(frame: &mut Frame, area: Rect, palette: &Base16Palette) {
    let help = Paragraph::new(" q quit   h/l turn page   r reset   c recenter   p pause   t theme")
        .style(Style::default().fg(palette.base_03));
    frame.render_widget(help, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::test_helpers::{capture_terminal_state, create_test_terminal};

    fn view_with_overlay(overlay: OverlayUpdate) -> HudView<'static> {
        HudView {
            source: "scripted".to_string(),
            paused: false,
            title: Some("manual.pdf".to_string()),
            page_label: "3/12".to_string(),
            viewport: Viewport::new(1000.0),
            overlay,
            repeat_count: 0,
            notifications: &[],
        }
    }

    fn centered_view() -> HudView<'static> {
        view_with_overlay(OverlayUpdate {
            placement: OverlayPlacement::Hidden,
            effect_width: 0.0,
            overflow_width: 0.0,
            cursor_x: 500.0,
        })
    }

    #[test]
    fn centered_pointer_lands_mid_lane() {
        let mut terminal = create_test_terminal(40, 10);
        let view = centered_view();
        terminal.draw(|f| draw(f, &view)).unwrap();

        let captured = capture_terminal_state(&terminal);
        let lane_row = captured.lines().nth(2).unwrap();
        // Lane interior spans columns 1..39; center of 38 cells is index 19.
        assert_eq!(lane_row.chars().nth(1 + 19), Some('█'));
    }

    #[test]
    fn title_row_shows_page_label_and_source() {
        let mut terminal = create_test_terminal(40, 10);
        let view = centered_view();
        terminal.draw(|f| draw(f, &view)).unwrap();

        let captured = capture_terminal_state(&terminal);
        let title_row = captured.lines().next().unwrap();
        assert!(title_row.contains("gazeflip"));
        assert!(title_row.contains("scripted"));
        assert!(title_row.contains("3/12"));
    }

    #[test]
    fn right_saturation_draws_bands_at_right_edge() {
        let mut terminal = create_test_terminal(40, 10);
        let view = view_with_overlay(OverlayUpdate {
            placement: OverlayPlacement::Right,
            effect_width: 500.0,
            overflow_width: 250.0,
            cursor_x: 1000.0,
        });
        terminal.draw(|f| draw(f, &view)).unwrap();

        let captured = capture_terminal_state(&terminal);
        let lane_row = captured.lines().nth(2).unwrap();
        assert!(lane_row.contains('▓'), "pressure band visible: {lane_row}");
        // Marker sits on the right edge of the lane interior.
        assert_eq!(lane_row.chars().nth(1 + 37), Some('█'));
    }

    #[test]
    fn gauge_reports_pressure_percentage() {
        let mut terminal = create_test_terminal(40, 10);
        let view = view_with_overlay(OverlayUpdate {
            placement: OverlayPlacement::Right,
            effect_width: 500.0,
            overflow_width: 0.0,
            cursor_x: 1000.0,
        });
        assert_eq!(view.pressure_ratio(), 0.5);
        terminal.draw(|f| draw(f, &view)).unwrap();

        let captured = capture_terminal_state(&terminal);
        assert!(captured.contains("50%"), "gauge label missing: {captured}");
    }

    #[test]
    fn paused_marker_appears_in_title() {
        let mut terminal = create_test_terminal(40, 10);
        let mut view = centered_view();
        view.paused = true;
        terminal.draw(|f| draw(f, &view)).unwrap();

        let captured = capture_terminal_state(&terminal);
        assert!(captured.lines().next().unwrap().contains("[paused]"));
    }

    #[test]
    fn notification_feed_renders_newest_messages() {
        let notifications = vec![
            Notification::new(
                "At document edge",
                NotificationLevel::Warning,
                std::time::Duration::from_secs(5),
            ),
            Notification::new(
                "Page 4/12",
                NotificationLevel::Info,
                std::time::Duration::from_secs(5),
            ),
        ];
        let mut view = centered_view();
        view.notifications = &notifications;

        let mut terminal = create_test_terminal(40, 12);
        terminal.draw(|f| draw(f, &view)).unwrap();

        let captured = capture_terminal_state(&terminal);
        assert!(captured.contains("At document edge"));
        assert!(captured.contains("Page 4/12"));
    }

    #[test]
    fn band_scaling_clamps_to_lane_width() {
        assert_eq!(scale_px(250.0, 1000.0, 38), 10);
        assert_eq!(scale_px(5000.0, 1000.0, 38), 38);
        assert_eq!(scale_px(0.0, 1000.0, 38), 0);
        assert_eq!(marker_column(0.0, 1000.0, 38), 0);
        assert_eq!(marker_column(1000.0, 1000.0, 38), 37);
    }
}
