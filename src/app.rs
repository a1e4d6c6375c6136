use crate::api::{self, ApiError};
use crate::form::{Field, TaskForm};
use crate::models::{NewTask, Status, Task};
use crate::view::{filter_tasks, StatusFilter, TaskStats};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::widgets::ListState;
use tracing::{info, warn};
use uuid::Uuid;

pub struct App {
    pub tasks: Vec<Task>,
    pub state: ListState,
    pub filter: StatusFilter,
    pub search: String,
    pub form: TaskForm,
    pub input_mode: InputMode,
    pub active_input: Field,
    pub message: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Search,
    Editing,
    Insert,
}

/// Network work requested by a key press.
#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    Quit,
    Refresh,
    Create(NewTask),
    Toggle(Uuid, Status),
    Delete(Uuid),
}

impl App {
    pub fn new(tasks: Vec<Task>) -> App {
        let mut app = App {
            tasks,
            state: ListState::default(),
            filter: StatusFilter::All,
            search: String::new(),
            form: TaskForm::new(),
            input_mode: InputMode::Normal,
            active_input: Field::Title,
            message: None,
        };
        app.clamp_selection();
        app
    }

    pub fn visible_tasks(&self) -> Vec<&Task> {
        filter_tasks(&self.tasks, self.filter, &self.search)
    }

    pub fn stats(&self) -> TaskStats {
        TaskStats::from_tasks(&self.tasks)
    }

    pub fn selected_task(&self) -> Option<&Task> {
        let selected = self.state.selected()?;
        self.visible_tasks().get(selected).copied()
    }

    fn clamp_selection(&mut self) {
        let len = self.visible_tasks().len();
        let selected = match self.state.selected() {
            _ if len == 0 => None,
            Some(i) if i >= len => Some(len - 1),
            Some(i) => Some(i),
            None => Some(0),
        };
        self.state.select(selected);
    }

    pub fn set_tasks(&mut self, tasks: Vec<Task>) {
        self.tasks = tasks;
        self.clamp_selection();
    }

    pub async fn refresh_tasks(&mut self, base_url: &str) -> Result<(), ApiError> {
        let tasks = api::fetch_tasks(base_url).await?;
        self.set_tasks(tasks);
        Ok(())
    }

    pub fn next(&mut self) {
        let len = self.visible_tasks().len();
        if len == 0 {
            self.state.select(None);
            return;
        }
        let i = match self.state.selected() {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        self.state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.visible_tasks().len();
        if len == 0 {
            self.state.select(None);
            return;
        }
        let i = match self.state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.state.select(Some(i));
    }

    /// Applies a key to the local state and returns the network work it asks for.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Action> {
        match self.input_mode {
            InputMode::Normal => match key.code {
                KeyCode::Char('q') => return Some(Action::Quit),
                KeyCode::Char('j') | KeyCode::Down => self.next(),
                KeyCode::Char('k') | KeyCode::Up => self.previous(),
                KeyCode::Char('f') => {
                    self.filter = self.filter.next();
                    self.clamp_selection();
                }
                KeyCode::Char('/') => self.input_mode = InputMode::Search,
                KeyCode::Char('r') => return Some(Action::Refresh),
                KeyCode::Char('a') => {
                    self.input_mode = InputMode::Editing;
                    self.form.reset();
                    self.active_input = Field::Title;
                }
                KeyCode::Char(' ') | KeyCode::Char('t') => {
                    if let Some(task) = self.selected_task() {
                        return Some(Action::Toggle(task.id, task.status.toggled()));
                    }
                }
                KeyCode::Char('d') => {
                    if let Some(task) = self.selected_task() {
                        return Some(Action::Delete(task.id));
                    }
                }
                _ => {}
            },

            InputMode::Search => {
                match key.code {
                    KeyCode::Char(c) => self.search.push(c),
                    KeyCode::Backspace => {
                        self.search.pop();
                    }
                    KeyCode::Enter | KeyCode::Esc => self.input_mode = InputMode::Normal,
                    _ => {}
                }
                self.clamp_selection();
            }

            InputMode::Editing => match key.code {
                KeyCode::Char('i') if self.active_input != Field::Priority => {
                    self.input_mode = InputMode::Insert;
                }
                KeyCode::Tab => {
                    self.active_input = self.active_input.next();
                }
                KeyCode::Left | KeyCode::Char('h') if self.active_input == Field::Priority => {
                    self.form.priority = self.form.priority.previous();
                }
                KeyCode::Right | KeyCode::Char('l') if self.active_input == Field::Priority => {
                    self.form.priority = self.form.priority.next();
                }
                KeyCode::Enter => {
                    self.form.apply_quick_add();
                    if let Some(task) = self.form.submit() {
                        return Some(Action::Create(task));
                    }
                }
                KeyCode::Esc => {
                    self.form.reset();
                    self.input_mode = InputMode::Normal;
                }
                _ => {}
            },

            InputMode::Insert => match key.code {
                KeyCode::Char(c) => {
                    if let Some(value) = self.form.field_mut(self.active_input) {
                        value.push(c);
                    }
                }
                KeyCode::Backspace => {
                    if let Some(value) = self.form.field_mut(self.active_input) {
                        value.pop();
                    }
                }
                KeyCode::Esc | KeyCode::Enter => {
                    if self.active_input == Field::Title {
                        self.form.apply_quick_add();
                    }
                    self.input_mode = InputMode::Editing;
                }
                _ => {}
            },
        }
        None
    }

    /// Runs `action` against the backend, then re-fetches the whole list.
    /// Returns `Ok(true)` when the app should quit.
    pub async fn perform(&mut self, action: Action, base_url: &str) -> Result<bool, ApiError> {
        match action {
            Action::Quit => return Ok(true),
            Action::Refresh => {}
            Action::Create(task) => {
                let created = api::create_task(base_url, &task).await?;
                info!(id = %created.id, "task created");
                self.form.reset();
                self.input_mode = InputMode::Normal;
            }
            Action::Toggle(id, status) => {
                api::update_status(base_url, id, status).await?;
                info!(%id, %status, "task status updated");
            }
            Action::Delete(id) => {
                api::delete_task(base_url, id).await?;
                info!(%id, "task deleted");
            }
        }
        self.refresh_tasks(base_url).await?;
        Ok(false)
    }

    pub async fn handle_input(&mut self, key: KeyEvent, base_url: &str) -> bool {
        let Some(action) = self.handle_key(key) else {
            return false;
        };
        match self.perform(action, base_url).await {
            Ok(should_quit) => {
                self.message = None;
                should_quit
            }
            Err(err) => {
                warn!(error = %err, "request failed");
                self.message = Some(err.to_string());
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Priority;
    use chrono::NaiveDate;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            assert_eq!(app.handle_key(key(KeyCode::Char(c))), None);
        }
    }

    fn task(title: &str, status: Status) -> Task {
        Task {
            id: Uuid::now_v7(),
            title: title.to_string(),
            description: String::new(),
            priority: Priority::Low,
            due_date: NaiveDate::from_ymd_opt(2026, 10, 25).unwrap(),
            status,
        }
    }

    fn sample_app() -> App {
        App::new(vec![
            task("Foo report", Status::Completed),
            task("Laundry", Status::Pending),
            task("foo taxes", Status::Pending),
        ])
    }

    #[test]
    fn test_new_app_selects_first_task() {
        assert_eq!(sample_app().state.selected(), Some(0));
        assert_eq!(App::new(Vec::new()).state.selected(), None);
    }

    #[test]
    fn test_navigation_wraps_and_survives_empty_list() {
        let mut app = sample_app();
        app.previous();
        assert_eq!(app.state.selected(), Some(2));
        app.next();
        assert_eq!(app.state.selected(), Some(0));

        let mut empty = App::new(Vec::new());
        empty.next();
        empty.previous();
        assert_eq!(empty.state.selected(), None);
    }

    #[test]
    fn test_quit_key() {
        let mut app = sample_app();
        assert_eq!(app.handle_key(key(KeyCode::Char('q'))), Some(Action::Quit));
    }

    #[test]
    fn test_toggle_requests_the_opposite_status() {
        let mut app = sample_app();
        let first = app.tasks[0].id;
        assert_eq!(
            app.handle_key(key(KeyCode::Char(' '))),
            Some(Action::Toggle(first, Status::Pending))
        );

        app.handle_key(key(KeyCode::Char('j')));
        let second = app.tasks[1].id;
        assert_eq!(
            app.handle_key(key(KeyCode::Char('t'))),
            Some(Action::Toggle(second, Status::Completed))
        );
    }

    #[test]
    fn test_delete_targets_selected_visible_task() {
        let mut app = sample_app();
        app.handle_key(key(KeyCode::Char('f')));
        assert_eq!(app.filter, StatusFilter::Pending);

        let laundry = app.tasks[1].id;
        assert_eq!(
            app.handle_key(key(KeyCode::Char('d'))),
            Some(Action::Delete(laundry))
        );
    }

    #[test]
    fn test_search_and_filter_narrow_the_list() {
        let mut app = sample_app();
        app.handle_key(key(KeyCode::Char('/')));
        assert_eq!(app.input_mode, InputMode::Search);
        type_text(&mut app, "FOO");
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.visible_tasks().len(), 2);

        app.handle_key(key(KeyCode::Char('f')));
        app.handle_key(key(KeyCode::Char('f')));
        assert_eq!(app.filter, StatusFilter::Completed);
        let titles: Vec<&str> = app.visible_tasks().iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["Foo report"]);
        assert_eq!(app.state.selected(), Some(0));

        type_text(&mut app, "");
        app.handle_key(key(KeyCode::Char('/')));
        type_text(&mut app, "zzz");
        assert!(app.visible_tasks().is_empty());
        assert_eq!(app.state.selected(), None);
        assert_eq!(app.selected_task(), None);
    }

    #[test]
    fn test_stats_ignore_the_filter() {
        let mut app = sample_app();
        app.filter = StatusFilter::Completed;
        let stats = app.stats();
        assert_eq!((stats.total, stats.completed, stats.pending), (3, 1, 2));
    }

    #[test]
    fn test_invalid_form_sends_nothing() {
        let mut app = sample_app();
        app.handle_key(key(KeyCode::Char('a')));
        assert_eq!(app.input_mode, InputMode::Editing);

        assert_eq!(app.handle_key(key(KeyCode::Enter)), None);
        assert_eq!(app.form.errors.len(), 2);
        assert_eq!(app.input_mode, InputMode::Editing);
    }

    #[test]
    fn test_form_entry_produces_create_action() {
        let mut app = sample_app();
        app.handle_key(key(KeyCode::Char('a')));
        app.handle_key(key(KeyCode::Char('i')));
        type_text(&mut app, "Book flights !high");
        app.handle_key(key(KeyCode::Esc));
        assert_eq!(app.form.title, "Book flights");
        assert_eq!(app.form.priority, Priority::High);

        // description, priority, due date
        app.handle_key(key(KeyCode::Tab));
        app.handle_key(key(KeyCode::Tab));
        app.handle_key(key(KeyCode::Left));
        assert_eq!(app.form.priority, Priority::Medium);
        app.handle_key(key(KeyCode::Tab));
        app.handle_key(key(KeyCode::Char('i')));
        type_text(&mut app, "2026-11-15");
        app.handle_key(key(KeyCode::Esc));

        let action = app.handle_key(key(KeyCode::Enter));
        assert_eq!(
            action,
            Some(Action::Create(NewTask {
                title: "Book flights".to_string(),
                description: String::new(),
                priority: Priority::Medium,
                due_date: NaiveDate::from_ymd_opt(2026, 11, 15).unwrap(),
                status: Status::Pending,
            }))
        );
    }

    #[test]
    fn test_escape_discards_the_draft() {
        let mut app = sample_app();
        app.handle_key(key(KeyCode::Char('a')));
        app.handle_key(key(KeyCode::Char('i')));
        type_text(&mut app, "half typed");
        app.handle_key(key(KeyCode::Esc));
        app.handle_key(key(KeyCode::Esc));

        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.form, TaskForm::new());
    }
}
