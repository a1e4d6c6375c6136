use crate::app::{App, InputMode};
use crate::form::Field;
use crate::models::{Priority, Status};
use crossterm::event::{self, Event as CEvent, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
    Frame, Terminal,
};
use std::io;
use std::time::Duration;

fn centered_rect_absolute(width: u16, height: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length((r.height.saturating_sub(height)) / 2),
                Constraint::Length(height),
                Constraint::Length((r.height.saturating_sub(height) + 1) / 2),
            ]
            .as_ref(),
        )
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints(
            [
                Constraint::Length((r.width.saturating_sub(width)) / 2),
                Constraint::Length(width),
                Constraint::Length((r.width.saturating_sub(width) + 1) / 2),
            ]
            .as_ref(),
        )
        .split(popup_layout[1])[1]
}

fn key_hint(key: &'static str, label: &'static str) -> [Span<'static>; 2] {
    [
        Span::styled(key, Style::default().fg(Color::Red)),
        Span::raw(label),
    ]
}

fn get_legend(input_mode: InputMode) -> Text<'static> {
    let hints: Vec<[Span<'static>; 2]> = match input_mode {
        InputMode::Normal => vec![
            key_hint(" q ", ": Quit "),
            key_hint(" j/k ", ": Down/Up "),
            key_hint(" f ", ": Filter "),
            key_hint(" / ", ": Search "),
            key_hint(" a ", ": Add Task "),
            key_hint(" t ", ": Toggle "),
            key_hint(" d ", ": Delete "),
            key_hint(" r ", ": Refresh "),
        ],
        InputMode::Search => vec![
            key_hint(" Enter ", ": Done "),
            key_hint(" Esc ", ": Done "),
        ],
        InputMode::Editing => vec![
            key_hint(" i ", ": Insert "),
            key_hint(" Tab ", ": Next Field "),
            key_hint(" ←/→ ", ": Priority "),
            key_hint(" Enter ", ": Submit "),
            key_hint(" Esc ", ": Cancel "),
        ],
        InputMode::Insert => vec![key_hint(" Esc ", ": Stop Editing ")],
    };
    Text::from(Line::from(hints.into_iter().flatten().collect::<Vec<_>>()))
}

fn priority_style(priority: Priority) -> Style {
    let color = match priority {
        Priority::High => Color::Red,
        Priority::Medium => Color::Yellow,
        Priority::Low => Color::Blue,
    };
    Style::default().bg(color).fg(Color::Black)
}

fn status_style(status: Status) -> Style {
    match status {
        Status::Pending => Style::default().fg(Color::Red),
        Status::Completed => Style::default().fg(Color::Green),
    }
}

fn render_stats(f: &mut Frame, app: &App, area: Rect) {
    let stats = app.stats();
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let line = Line::from(vec![
        Span::styled("Total: ", bold),
        Span::raw(format!("{}    ", stats.total)),
        Span::styled("Completed: ", bold.fg(Color::Green)),
        Span::styled(
            format!("{}    ", stats.completed),
            Style::default().fg(Color::Green),
        ),
        Span::styled("Pending: ", bold.fg(Color::Red)),
        Span::styled(stats.pending.to_string(), Style::default().fg(Color::Red)),
    ]);
    let paragraph = Paragraph::new(line)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Task Tracker"));
    f.render_widget(paragraph, area);
}

fn render_search(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(16)].as_ref())
        .split(area);

    let search_style = if app.input_mode == InputMode::Search {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let search = if app.search.is_empty() && app.input_mode != InputMode::Search {
        Paragraph::new(Span::styled(
            "Search task title...",
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        Paragraph::new(app.search.as_str())
    };
    f.render_widget(
        search.block(
            Block::default()
                .borders(Borders::ALL)
                .title("Search")
                .border_style(search_style),
        ),
        chunks[0],
    );

    let filter = Paragraph::new(app.filter.to_string())
        .block(Block::default().borders(Borders::ALL).title("Filter"));
    f.render_widget(filter, chunks[1]);
}

fn render_tasks(f: &mut Frame, app: &mut App, area: Rect) {
    let items: Vec<ListItem<'static>> = app
        .visible_tasks()
        .into_iter()
        .map(|task| {
            ListItem::new(Line::from(vec![
                Span::raw(task.title.clone()),
                Span::raw(" "),
                Span::styled(format!(" {} ", task.priority), priority_style(task.priority)),
                Span::raw(" "),
                Span::styled(task.status.to_string(), status_style(task.status)),
                Span::styled(
                    format!("  due {}", task.due_date),
                    Style::default().fg(Color::DarkGray),
                ),
            ]))
        })
        .collect();

    let block = Block::default().borders(Borders::ALL).title("Tasks");
    let tasks_widget = if items.is_empty() {
        List::new(vec![ListItem::new("No tasks available")]).block(block)
    } else {
        List::new(items)
            .block(block)
            .highlight_style(
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol(">> ")
    };

    f.render_stateful_widget(tasks_widget, area, &mut app.state);
}

fn render_form(f: &mut Frame, app: &App, area: Rect) {
    let form = &app.form;
    let bold = Style::default().add_modifier(Modifier::BOLD);

    let field_line = |field: Field, label: &'static str, value: String| {
        let marker = if app.active_input == field {
            if app.input_mode == InputMode::Insert {
                Span::styled("✎ ", Style::default().fg(Color::Yellow))
            } else {
                Span::styled("> ", Style::default().fg(Color::Green))
            }
        } else {
            Span::raw("  ")
        };
        Line::from(vec![marker, Span::styled(label, bold), Span::raw(value)])
    };

    let mut lines = vec![
        field_line(Field::Title, "Title: ", form.title.clone()),
        field_line(Field::Description, "Description: ", form.description.clone()),
        field_line(Field::Priority, "Priority: ", format!("< {} >", form.priority)),
        field_line(Field::DueDate, "Due Date (YYYY-MM-DD): ", form.due_date.clone()),
        Line::from(""),
    ];

    for message in form.errors.values() {
        lines.push(Line::from(Span::styled(
            *message,
            Style::default().fg(Color::Red),
        )));
    }

    let submit = if form.can_submit() {
        Span::styled("[ Add Task ]", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD))
    } else {
        Span::styled("[ Add Task ]", Style::default().fg(Color::DarkGray))
    };
    lines.push(Line::from(submit));

    let popup_width = ((u32::from(area.width) * 60 / 100) as u16)
        .max(40)
        .min(area.width);
    let popup_height = (lines.len() as u16 + 2).min(area.height);
    let popup_area = centered_rect_absolute(popup_width, popup_height, area);

    let popup_block = Block::default()
        .title("New Task")
        .borders(Borders::ALL)
        .style(Style::default().fg(Color::Green));

    let paragraph = Paragraph::new(lines)
        .style(Style::default().fg(Color::White))
        .block(popup_block)
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, popup_area);
    f.render_widget(paragraph, popup_area);
}

pub fn draw(f: &mut Frame, app: &mut App) {
    let size = f.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(0)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(2),
            ]
            .as_ref(),
        )
        .split(size);

    render_stats(f, app, chunks[0]);
    render_search(f, app, chunks[1]);
    render_tasks(f, app, chunks[2]);

    if matches!(app.input_mode, InputMode::Editing | InputMode::Insert) {
        render_form(f, app, chunks[2]);
    }

    // Footer: last error, otherwise the key legend
    let footer = match &app.message {
        Some(message) => Paragraph::new(Span::styled(
            format!("Error: {}", message),
            Style::default().fg(Color::Red),
        )),
        None => Paragraph::new(get_legend(app.input_mode)).style(Style::default().fg(Color::White)),
    };
    f.render_widget(
        footer.alignment(Alignment::Left).wrap(Wrap { trim: true }),
        chunks[3],
    );
}

pub async fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    mut app: App,
    base_url: &str,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| draw(f, &mut app))?;

        // Handle input
        if event::poll(Duration::from_millis(100))? {
            if let CEvent::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                let should_quit = app.handle_input(key, base_url).await;
                if should_quit {
                    return Ok(());
                }
            }
        }
    }
}
