use ratatui::{
    Frame,
    layout::{Constraint, Layout},
    style::Stylize,
    text::Line,
    widgets::Paragraph,
};

use crate::app::App;

pub const STATUS_LINE_HEIGHT: usize = 1;

pub fn draw(app: &App, frame: &mut Frame) {
    let [table_area, status_area] = Layout::vertical([
        Constraint::Min(0),
        Constraint::Length(STATUS_LINE_HEIGHT as u16),
    ])
    .areas(frame.area());

    frame.render_widget(Paragraph::new(app.table().view()), table_area);
    frame.render_widget(Paragraph::new(status_line(app)), status_area);
}

fn status_line(app: &App) -> Line<'static> {
    let table = app.table();
    let mut spans = vec![
        format!(" {} ", app.name()).bold().reversed(),
        format!(
            " row {}/{} ",
            (table.row_cursor_index() + 1).min(table.visible_row_count()),
            table.visible_row_count()
        )
        .into(),
    ];
    if table.is_selectable() {
        spans.push(format!(" {} selected ", table.selected_rows().len()).yellow());
    }
    if !app.status_message().is_empty() {
        spans.push(format!(" {}", app.status_message()).italic());
    }
    spans.push(" q quit, / filter, y copy row".dark_gray());
    Line::from(spans)
}
