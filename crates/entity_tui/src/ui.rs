use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Cell, Paragraph, Row, Table, Wrap},
    Frame,
};
use voxel_api_core::Transport;

use crate::app::{App, Details};
use crate::edit::{format_number, EditSession, Field};

const HELP: &str =
    "↑/↓ select  f filter  r refresh  n new entity  p add positionable  m add model  → edit  ← back  q quit";

/// Border plus the table header row.
const LIST_CHROME_ROWS: u16 = 3;

pub fn render<T: Transport>(frame: &mut Frame, app: &mut App<T>) {
    let [header, body, footer] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(5),
        Constraint::Length(3),
    ])
    .areas(frame.area());
    let [entities, details] =
        Layout::horizontal([Constraint::Ratio(2, 5), Constraint::Ratio(3, 5)]).areas(body);

    app.set_visible_rows(entities.height.saturating_sub(LIST_CHROME_ROWS) as usize);

    render_header(frame, header, app);
    render_entities(frame, entities, app);
    render_details(frame, details, app);
    frame.render_widget(
        Paragraph::new(HELP).block(Block::bordered()).dark_gray(),
        footer,
    );
}

fn render_header<T: Transport>(frame: &mut Frame, area: Rect, app: &App<T>) {
    let line = Line::from(vec![
        Span::from("Entity Editor").bold(),
        Span::from("  |  Filter: "),
        Span::from(app.filter().label()).cyan(),
    ]);
    frame.render_widget(Paragraph::new(line).block(Block::bordered()), area);
}

fn render_entities<T: Transport>(frame: &mut Frame, area: Rect, app: &App<T>) {
    let list = app.list();
    let rows = list.visible().map(|(index, entity)| {
        let row = Row::new([
            Cell::from(Line::from(entity.entity_id.to_string()).alignment(Alignment::Right)),
            Cell::from(entity.describe_components()),
        ]);
        if index == list.selected_index() {
            row.style(Style::new().reversed())
        } else {
            row
        }
    });

    let table = Table::new(rows, [Constraint::Length(10), Constraint::Fill(1)])
        .header(Row::new(["Entity ID", "Components"]).style(Style::new().bold().cyan()))
        .column_spacing(2)
        .block(Block::bordered().title(list.title()));
    frame.render_widget(table, area);
}

fn render_details<T: Transport>(frame: &mut Frame, area: Rect, app: &App<T>) {
    let mut lines = Vec::new();

    match (app.session(), app.details()) {
        (Some(session), _) => {
            lines.push(Line::from(format!("Entity ID: {}", session.entity_id)).bold());
            lines.push(Line::default());
            session_lines(session, &mut lines);
            lines.push(Line::default());
            lines.push(Line::from("Editing (type to change; Enter or arrows commit; Esc cancels)").dim());
        }
        (None, Some(details)) => details_lines(details, &mut lines),
        (None, None) => lines.push(Line::from("No entity selected.")),
    }

    if !app.status().is_empty() {
        lines.push(Line::default());
        lines.push(Line::from(app.status().to_string()).cyan());
    }

    let paragraph = Paragraph::new(lines)
        .block(Block::bordered().title("Details"))
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn details_lines(details: &Details, lines: &mut Vec<Line<'static>>) {
    lines.push(Line::from(format!("Entity ID: {}", details.entity_id)).bold());
    lines.push(Line::default());

    match &details.positionable {
        Some(p) => {
            lines.push(Line::from("Positionable").underlined());
            lines.push(Line::from(format!("  Position: {}", vector(p.position))));
            lines.push(Line::from(format!("  Rotation: {}", vector(p.rotation))));
            lines.push(Line::from(format!("  Origin:   {}", vector(p.origin))));
            lines.push(Line::from(format!("  Scale:    {}", format_number(p.scale))));
        }
        None => lines.push(Line::from("Positionable: not present").dim()),
    }
    lines.push(Line::default());
    match &details.model {
        Some(m) => {
            lines.push(Line::from("Model").underlined());
            lines.push(Line::from(format!("  Path: {}", m.path)));
        }
        None => lines.push(Line::from("Model: not present").dim()),
    }
}

fn session_lines(session: &EditSession, lines: &mut Vec<Line<'static>>) {
    let mut section = None;
    for (index, field) in session.fields().iter().enumerate() {
        let kind = field.key().component();
        if section != Some(kind) {
            if section.is_some() {
                lines.push(Line::default());
            }
            let suffix = if session.has(kind) { "" } else { " (new)" };
            lines.push(Line::from(format!("{}{}", kind.label(), suffix)).underlined());
            section = Some(kind);
        }

        let mut spans = vec![Span::from(format!("  {:<9}", format!("{}:", field.key().label())))];
        match field {
            Field::Vector3 { .. } => {
                spans.push(Span::from("("));
                for slot in 0..3 {
                    if slot > 0 {
                        spans.push(Span::from(", "));
                    }
                    spans.push(slot_span(session, index, slot));
                }
                spans.push(Span::from(")"));
            }
            Field::Scalar { .. } | Field::Text { .. } => spans.push(slot_span(session, index, 0)),
        }
        lines.push(Line::from(spans));
    }
}

fn slot_span(session: &EditSession, index: usize, slot: usize) -> Span<'static> {
    let text = session.display_value(index, slot).to_string();
    if session.is_active(index, slot) {
        // Keep an empty slot visible under the cursor.
        let text = if text.is_empty() { " ".to_string() } else { text };
        Span::from(text).reversed()
    } else {
        Span::from(text)
    }
}

fn vector(v: [f32; 3]) -> String {
    format!(
        "({}, {}, {})",
        format_number(v[0]),
        format_number(v[1]),
        format_number(v[2])
    )
}
