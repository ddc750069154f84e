use super::app_logic::{TRIGGER_LABEL, TuiApp, trigger_area};
use super::app_state::Modal;
use filepicker::listing::FileKind;
use filepicker::picker::{PickerConfig, RowKind, VisibleRow};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
};
use std::time::Instant;

/// Parses a CSS hex colour (`#rgb` or `#rrggbb`).
pub(super) fn parse_color(css: &str) -> Option<Color> {
    let hex = css.strip_prefix('#')?;
    let expanded: String = match hex.len() {
        3 => hex.chars().flat_map(|c| [c, c]).collect(),
        6 => hex.to_string(),
        _ => return None,
    };
    let channel = |i: usize| u8::from_str_radix(&expanded[i..i + 2], 16).ok();
    Some(Color::Rgb(channel(0)?, channel(2)?, channel(4)?))
}

fn draw_help_line(f: &mut Frame, app: &TuiApp, area: Rect) {
    let help = if app.is_open() {
        "Arrows/jk: Move | Enter/Space: Open folder or select | Esc: Close | q: Quit"
    } else {
        "Enter/o: Browse | q/Esc: Quit"
    };
    f.render_widget(Paragraph::new(help).style(Style::default().fg(Color::DarkGray)), area);
}

fn draw_status_line(f: &mut Frame, app: &TuiApp, area: Rect) {
    let mut spans = vec![Span::raw(app.status.clone())];
    if let Some(selected) = &app.selected {
        spans.push(Span::styled(
            format!("  [{selected}]"),
            Style::default().fg(Color::Green),
        ));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_trigger(f: &mut Frame, app: &TuiApp, area: Rect) {
    let style = if app.is_open() {
        Style::default().add_modifier(Modifier::BOLD).fg(Color::Cyan)
    } else {
        Style::default()
    };
    let button = Paragraph::new(TRIGGER_LABEL)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).border_style(style));
    f.render_widget(button, area);
}

fn row_line(row: &VisibleRow, config: &PickerConfig, rule_color: Color) -> Line<'static> {
    let rule = |depth: usize| -> Vec<Span<'static>> {
        if config.nest_depth == 0 {
            return Vec::new();
        }
        let segment = format!("│{}", " ".repeat(config.nest_depth as usize - 1));
        (0..depth)
            .map(|_| Span::styled(segment.clone(), Style::default().fg(rule_color)))
            .collect()
    };

    match row {
        VisibleRow::Root { label } => Line::from(Span::styled(
            if label.is_empty() { "/".to_string() } else { label.clone() },
            Style::default().add_modifier(Modifier::BOLD).fg(Color::Blue),
        )),
        VisibleRow::Item { depth, name, kind, expanded, loading, .. } => {
            let mut spans = rule(depth - 1);
            let (icon, style) = match kind {
                RowKind::Directory => (
                    if *loading {
                        "… "
                    } else if *expanded {
                        "▾ "
                    } else {
                        "▸ "
                    },
                    Style::default().fg(Color::Blue),
                ),
                RowKind::File(FileKind::Image) => ("  ", Style::default().fg(Color::Magenta)),
                RowKind::File(_) => ("  ", Style::default()),
            };
            spans.push(Span::styled(format!("{icon}{name}"), style));
            Line::from(spans)
        }
        VisibleRow::Placeholder { depth } => {
            let mut spans = rule(depth - 1);
            spans.push(Span::styled(
                filepicker::picker::NO_CONTENTS,
                Style::default().add_modifier(Modifier::ITALIC).fg(Color::DarkGray),
            ));
            Line::from(spans)
        }
    }
}

fn draw_popup(f: &mut Frame, app: &mut TuiApp, screen: Rect) {
    let Some(picker) = app.picker() else { return };
    let Some(popup) = picker.popup() else {
        app.areas.popup = None;
        app.areas.rows = None;
        return;
    };
    let config = picker.config().clone();
    let placement = *popup.placement();
    let loading = popup.is_loading();

    let left = placement.left_edge(i32::from(screen.width)).clamp(0, i32::from(u16::MAX));
    let top = placement.top.clamp(0, i32::from(u16::MAX));
    let area = Rect::new(
        left as u16,
        top as u16,
        u16::try_from(placement.width).unwrap_or(u16::MAX),
        u16::try_from(placement.height).unwrap_or(u16::MAX),
    )
    .intersection(screen);

    let border_style = if app.is_fading_in(Instant::now()) || app.is_fading_out() {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default()
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(" Files ");
    let inner = block.inner(area);
    f.render_widget(Clear, area);
    f.render_widget(block, area);

    app.areas.popup = Some(area);
    app.areas.rows = Some(inner);
    app.list_viewport_height = inner.height as usize;

    if loading {
        let offset = (placement.preloader_padding() as u16).min(inner.height.saturating_sub(1));
        let line = Rect::new(inner.x, inner.y + offset, inner.width, 1.min(inner.height));
        f.render_widget(Paragraph::new("Loading...").alignment(Alignment::Center), line);
        return;
    }

    app.ensure_cursor_visible();
    let rule_color = parse_color(&config.nested_folder_padding_color).unwrap_or(Color::DarkGray);
    let rows = app.rows();
    let end = (app.scroll_offset + app.list_viewport_height).min(rows.len());
    let items: Vec<ListItem> = rows
        .get(app.scroll_offset..end)
        .unwrap_or(&[])
        .iter()
        .map(|row| ListItem::new(row_line(row, &config, rule_color)))
        .collect();

    let list = List::new(items).highlight_style(
        Style::default()
            .add_modifier(Modifier::BOLD)
            .bg(Color::DarkGray),
    );
    let mut state = ListState::default();
    if app.cursor >= app.scroll_offset && app.cursor < end {
        state.select(Some(app.cursor - app.scroll_offset));
    }
    f.render_stateful_widget(list, inner, &mut state);
}

fn draw_modal(f: &mut Frame, modal: &Modal, screen: Rect) {
    let (title, text, hint) = match modal {
        Modal::Alert(message) => (" Error ", message.as_str(), "press any key"),
        Modal::Confirm(question) => (" Confirm ", question.as_str(), "y: yes | n: no"),
    };
    let width = (text.chars().count() as u16 + 4).max(24).min(screen.width);
    let height = 4u16.min(screen.height);
    let area = Rect::new(
        screen.x + screen.width.saturating_sub(width) / 2,
        screen.y + screen.height.saturating_sub(height) / 2,
        width,
        height,
    )
    .intersection(screen);

    let body = Paragraph::new(vec![
        Line::from(text.to_string()),
        Line::from(Span::styled(hint, Style::default().fg(Color::DarkGray))),
    ])
    .wrap(Wrap { trim: false })
    .block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(Clear, area);
    f.render_widget(body, area);
}

pub(super) fn ui_frame(frame: &mut Frame, app: &mut TuiApp) {
    let screen = frame.area();
    app.areas.screen = screen;
    app.areas.trigger = trigger_area(screen);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1), Constraint::Length(1)])
        .split(screen);

    draw_trigger(frame, app, app.areas.trigger);
    draw_help_line(frame, app, chunks[1]);
    draw_status_line(frame, app, chunks[2]);
    draw_popup(frame, app, screen);
    if let Some(modal) = app.modal.clone() {
        draw_modal(frame, &modal, screen);
    }
}
