//! Terminal UI rendering.
//!
//! All drawing logic lives here, separated from application state ([`App`])
//! and input handling ([`crate::input`]).
//!
//! ## For contributors
//!
//! * The layout is a three-row split: tab bar, the active screen, and a
//!   one-line status bar.
//! * A feed list ends with a footer row (loading / exhausted / error) that
//!   is rendered but never selectable.
//! * Colours and styles are defined inline.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Tabs, Wrap},
    Frame,
};

use crate::app::{App, Tab};
use crate::loader::{FeedView, PageRequester};
use crate::source::{truncate, FeedItem};

/// Descriptions in list rows are cut to this many characters.
const DESCRIPTION_PREVIEW: usize = 85;

/// Draw the complete UI for one frame.
pub fn draw<R: PageRequester + Clone>(app: &mut App<R>, frame: &mut Frame) {
    let [tabs_area, main_area, status_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(1),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    draw_tabs(app.tab, frame, tabs_area);

    if let Some(item) = &app.detail {
        draw_detail(item, frame, main_area);
    } else if app.tab == Tab::Contact {
        draw_contact(app, frame, main_area);
    } else {
        draw_feed(app, frame, main_area);
    }

    draw_status_bar(app, frame, status_area);
}

fn draw_tabs(current: Tab, frame: &mut Frame, area: Rect) {
    let titles = Tab::ALL
        .iter()
        .enumerate()
        .map(|(i, t)| format!(" {} {} ", i + 1, t.title()));

    let tabs = Tabs::new(titles)
        .select(current.index())
        .style(Style::default().fg(Color::Gray))
        .highlight_style(
            Style::default()
                .fg(Color::LightCyan)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_widget(tabs, area);
}

/// Footer row text and colour for the state of a feed.
fn footer(view: &FeedView<'_>, noun: &str) -> Option<(String, Color)> {
    if view.is_loading {
        Some(("Loading…".to_string(), Color::Blue))
    } else if let Some(e) = view.last_error {
        Some((format!("{e} (scroll to retry)"), Color::Red))
    } else if !view.has_more {
        Some((format!("No more {noun} available"), Color::DarkGray))
    } else {
        None
    }
}

fn item_row(item: &FeedItem) -> ListItem<'_> {
    let date_str = item
        .published
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default();

    let mut lines = vec![Line::from(vec![
        Span::styled(format!("{date_str:<11}"), Style::default().fg(Color::DarkGray)),
        Span::styled(item.title.as_str(), Style::default().fg(Color::White)),
    ])];
    if let Some(description) = &item.description {
        lines.push(Line::from(Span::styled(
            format!("{:<11}{}", "", truncate(description, DESCRIPTION_PREVIEW, "...")),
            Style::default().fg(Color::Gray),
        )));
    }
    ListItem::new(lines)
}

/// Render the scrollable feed of the active tab.
fn draw_feed<R: PageRequester + Clone>(app: &mut App<R>, frame: &mut Frame, area: Rect) {
    let tab = app.tab;
    let Some(pane) = app.pane_mut(tab) else {
        return;
    };
    let (view, list_state) = pane.parts();

    let mut rows: Vec<ListItem> = Vec::new();
    if let Some(view) = view {
        rows.extend(view.items.iter().map(item_row));
        if let Some((text, color)) = footer(&view, tab.noun()) {
            rows.push(ListItem::new(Line::from(Span::styled(
                text,
                Style::default().fg(color).add_modifier(Modifier::ITALIC),
            ))));
        }
    }

    let list = List::new(rows)
        .block(
            Block::default()
                .title(format!(" {} ", tab.title()))
                .borders(Borders::ALL),
        )
        .highlight_style(
            Style::default()
                .add_modifier(Modifier::BOLD)
                .bg(Color::DarkGray),
        )
        .highlight_symbol("▸ ");

    frame.render_stateful_widget(list, area, list_state);
}

/// Full article view.
fn draw_detail(item: &FeedItem, frame: &mut Frame, area: Rect) {
    let mut lines = vec![
        Line::from(Span::styled(
            item.title.as_str(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::raw(""),
    ];
    if let Some(description) = &item.description {
        lines.push(Line::from(Span::styled(
            description.as_str(),
            Style::default().add_modifier(Modifier::ITALIC),
        )));
        lines.push(Line::raw(""));
    }
    if let Some(body) = &item.body {
        lines.extend(body.lines().map(Line::raw));
    }
    if let Some(admin) = &item.admin {
        lines.push(Line::raw(""));
        lines.push(Line::from(Span::styled(
            format!("— {admin}"),
            Style::default().fg(Color::Cyan),
        )));
    }

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .title(" Article (Esc: back) ")
                .borders(Borders::ALL),
        )
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

/// Static clinic details.
fn draw_contact<R>(app: &App<R>, frame: &mut Frame, area: Rect) {
    let clinic = &app.clinic;
    let heading = Style::default()
        .fg(Color::LightCyan)
        .add_modifier(Modifier::BOLD);

    let mut lines = vec![
        Line::from(Span::styled(clinic.name.as_str(), heading)),
        Line::raw(""),
        Line::from(vec![Span::raw("Address:      "), Span::raw(clinic.address.as_str())]),
        Line::from(vec![Span::raw("Phone:        "), Span::raw(clinic.phone.as_str())]),
        Line::from(vec![
            Span::raw("Appointments: "),
            Span::styled(clinic.appointment_url.as_str(), Style::default().fg(Color::Blue)),
        ]),
        Line::raw(""),
        Line::from(Span::styled("Hours of Operation", heading)),
    ];
    lines.extend(clinic.hours.iter().map(|h| Line::raw(h.as_str())));
    lines.push(Line::raw(""));
    lines.push(Line::raw(clinic.about.as_str()));
    lines.push(Line::raw(""));
    lines.push(Line::from(Span::styled("Our Mission", heading)));
    lines.push(Line::raw(clinic.mission.as_str()));

    let paragraph = Paragraph::new(lines)
        .block(Block::default().title(" Contact ").borders(Borders::ALL))
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

/// Render the bottom status bar.
fn draw_status_bar<R: PageRequester + Clone>(app: &App<R>, frame: &mut Frame, area: Rect) {
    let count = app
        .pane(app.tab)
        .and_then(|p| p.view())
        .map(|v| format!("{} {}", v.items.len(), app.tab.noun()))
        .unwrap_or_default();

    let status = Paragraph::new(Line::from(vec![
        Span::styled(" ", Style::default()),
        Span::styled(app.status.as_str(), Style::default().fg(Color::Yellow)),
        Span::raw("  "),
        Span::styled(count, Style::default().fg(Color::Green)),
        Span::raw("  q: quit  Tab: switch  ↑/↓: scroll  Enter: open  r: refresh"),
    ]));
    frame.render_widget(status, area);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
