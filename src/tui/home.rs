//! Home view - the task list, the new-task input and their key handling

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use ratatui::prelude::*;
use ratatui::widgets::*;
use tracing::debug;
use tui_input::backend::crossterm::EventHandler;
use tui_input::Input;

use super::app::Action;
use super::components::{render_text_field, HelpOverlay};
use super::dialogs::{ConfirmDialog, DialogResult};
use super::styles::Theme;
use super::sync_worker::{SyncOutcome, SyncReply, SyncRequest, SyncWorker};
use crate::store::{Task, TaskId};
use crate::sync::{TaskList, WriteOp};

const INPUT_PLACEHOLDER: &str = "Add a new task... (press n)";

pub struct HomeView {
    worker: SyncWorker,

    // Last snapshot from the worker
    tasks: TaskList,
    loading: bool,
    load_failed: bool,

    // UI state
    cursor: usize,
    selected: Option<TaskId>,
    input: Input,
    input_active: bool,
    submitting: bool,
    last_error: Option<String>,

    // Dialogs
    show_help: bool,
    confirm_dialog: Option<ConfirmDialog<TaskId>>,
}

impl HomeView {
    /// Starts the initial load right away.
    pub fn new(mut worker: SyncWorker) -> Self {
        worker.request(SyncRequest::Load);
        Self {
            worker,
            tasks: TaskList::new(),
            loading: true,
            load_failed: false,
            cursor: 0,
            selected: None,
            input: Input::default(),
            input_active: false,
            submitting: false,
            last_error: None,
            show_help: false,
            confirm_dialog: None,
        }
    }

    /// Anything that captures plain keys, so global shortcuts stay off.
    pub fn has_dialog(&self) -> bool {
        self.show_help || self.confirm_dialog.is_some() || self.input_active
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn request_reload(&mut self) {
        self.worker.request(SyncRequest::Load);
    }

    /// Drain worker replies into the view. Returns true when anything changed.
    pub fn apply_sync_updates(&mut self) -> bool {
        let mut changed = false;
        while let Some(reply) = self.worker.try_recv() {
            self.apply_reply(reply);
            changed = true;
        }
        changed
    }

    fn apply_reply(&mut self, reply: SyncReply) {
        self.tasks = reply.tasks;
        self.loading = reply.loading;
        self.load_failed = reply.load_failed;

        match reply.result {
            Ok(SyncOutcome::Created(created)) => {
                self.submitting = false;
                if let Some(task) = created {
                    self.input.reset();
                    self.selected = Some(task.id);
                }
                self.last_error = None;
            }
            Ok(outcome) => {
                debug!("Sync request done: {:?}", outcome);
                self.last_error = None;
            }
            Err(e) => {
                if e.write_op() == Some(WriteOp::Create) {
                    self.submitting = false;
                }
                self.last_error = Some(e.to_string());
            }
        }

        self.restore_selection();
    }

    /// Keep the cursor on the same task across snapshots when it still exists.
    fn restore_selection(&mut self) {
        if let Some(pos) = self.selected.as_ref().and_then(|id| self.tasks.position(id)) {
            self.cursor = pos;
        } else if self.cursor >= self.tasks.len() {
            self.cursor = self.tasks.len().saturating_sub(1);
        }
        self.update_selected();
    }

    fn update_selected(&mut self) {
        self.selected = self
            .tasks
            .as_slice()
            .get(self.cursor)
            .map(|t| t.id.clone());
    }

    fn selected_task(&self) -> Option<&Task> {
        self.selected.as_ref().and_then(|id| self.tasks.get(id))
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Action> {
        if self.show_help {
            if matches!(
                key.code,
                KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')
            ) {
                self.show_help = false;
            }
            return None;
        }

        if let Some(dialog) = &mut self.confirm_dialog {
            match dialog.handle_key(key) {
                DialogResult::Continue => {}
                DialogResult::Cancel => self.confirm_dialog = None,
                DialogResult::Submit(id) => {
                    self.confirm_dialog = None;
                    self.worker.request(SyncRequest::Delete { id });
                }
            }
            return None;
        }

        if self.input_active {
            self.handle_input_key(key);
            return None;
        }

        match key.code {
            KeyCode::Char('q') => return Some(Action::Quit),
            KeyCode::Char('?') => self.show_help = true,
            _ if self.loading => {}
            KeyCode::Char('n') | KeyCode::Char('a') | KeyCode::Char('i') => {
                self.input_active = true;
            }
            KeyCode::Char('r') | KeyCode::F(5) => self.request_reload(),
            KeyCode::Char(' ') | KeyCode::Char('x') | KeyCode::Enter => {
                if let Some(id) = self.selected.clone() {
                    self.worker.request(SyncRequest::Toggle { id });
                }
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                let dialog = self.selected_task().map(|task| {
                    let message = format!("Delete '{}'?", task.title);
                    ConfirmDialog::new("Delete Task", &message, task.id.clone())
                });
                if dialog.is_some() {
                    self.confirm_dialog = dialog;
                }
            }
            KeyCode::Up | KeyCode::Char('k') => self.move_cursor(-1),
            KeyCode::Down | KeyCode::Char('j') => self.move_cursor(1),
            KeyCode::PageUp => self.move_cursor(-10),
            KeyCode::PageDown => self.move_cursor(10),
            KeyCode::Home | KeyCode::Char('g') if key.modifiers == KeyModifiers::NONE => {
                self.cursor = 0;
                self.update_selected();
            }
            KeyCode::End | KeyCode::Char('G') => {
                self.cursor = self.tasks.len().saturating_sub(1);
                self.update_selected();
            }
            _ => {}
        }

        None
    }

    fn handle_input_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.input_active = false,
            KeyCode::Enter => {
                // Blank input never reaches the store; a pending create
                // holds the input until it resolves.
                if self.submitting || self.input.value().trim().is_empty() {
                    return;
                }
                self.submitting = true;
                self.worker.request(SyncRequest::Create {
                    title: self.input.value().to_string(),
                });
            }
            _ => {
                if !self.submitting {
                    self.input.handle_event(&Event::Key(key));
                }
            }
        }
    }

    fn move_cursor(&mut self, delta: i32) {
        let len = self.tasks.len();
        if len == 0 {
            return;
        }

        self.cursor = if delta < 0 {
            self.cursor.saturating_sub(delta.unsigned_abs() as usize)
        } else {
            (self.cursor + delta as usize).min(len - 1)
        };
        self.update_selected();
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        frame.render_widget(
            Block::default().style(Style::default().bg(theme.background)),
            area,
        );

        if self.loading {
            let loading = Paragraph::new("Loading...")
                .style(Style::default().fg(theme.text))
                .alignment(Alignment::Center);
            let middle = Rect {
                y: area.y + area.height / 2,
                height: 1.min(area.height),
                ..area
            };
            frame.render_widget(loading, middle);
            return;
        }

        let [header, input, list, status] = Layout::vertical([
            Constraint::Length(4),
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .areas(area);

        self.render_header(frame, header, theme);
        self.render_input(frame, input, theme);
        self.render_list(frame, list, theme);
        self.render_status_bar(frame, status, theme);

        if self.show_help {
            HelpOverlay::render(frame, area, theme);
        }

        if let Some(dialog) = &self.confirm_dialog {
            dialog.render(frame, area, theme);
        }
    }

    fn render_header(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.border));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let lines = vec![
            Line::from(Span::styled(
                " My Tasks",
                Style::default().fg(theme.title).bold(),
            )),
            Line::from(Span::styled(
                format!(" {}", self.tasks.summary()),
                Style::default().fg(theme.subtitle),
            )),
        ];
        frame.render_widget(Paragraph::new(lines), inner);
    }

    fn render_input(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let border = if self.input_active {
            theme.accent
        } else {
            theme.border
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let prompt = if self.submitting { "…" } else { "+" };
        render_text_field(
            frame,
            inner,
            prompt,
            &self.input,
            self.input_active,
            INPUT_PLACEHOLDER,
            theme,
        );
    }

    fn render_list(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.border));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if self.tasks.is_empty() {
            let empty_text = vec![
                Line::from(""),
                Line::from("No tasks yet").style(Style::default().fg(theme.dimmed)),
                Line::from("Add your first task to get started")
                    .style(Style::default().fg(theme.hint)),
            ];
            frame.render_widget(
                Paragraph::new(empty_text).alignment(Alignment::Center),
                inner,
            );
            return;
        }

        let items: Vec<ListItem> = self
            .tasks
            .iter()
            .enumerate()
            .map(|(idx, task)| render_item(task, idx == self.cursor, theme))
            .collect();

        let mut state = ListState::default().with_selected(Some(self.cursor));
        frame.render_stateful_widget(List::new(items), inner, &mut state);
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let line = if let Some(err) = &self.last_error {
            Line::from(Span::styled(
                format!(" ✕ {}", err),
                Style::default().fg(theme.error),
            ))
        } else if self.load_failed {
            Line::from(Span::styled(
                " ✕ Could not load tasks (press r to retry)",
                Style::default().fg(theme.error),
            ))
        } else if self.worker.is_pending() {
            Line::from(Span::styled(" Syncing...", Style::default().fg(theme.dimmed)))
        } else {
            key_hints(theme)
        };

        frame.render_widget(
            Paragraph::new(line).style(Style::default().bg(theme.selection)),
            area,
        );
    }
}

fn render_item<'a>(task: &'a Task, is_selected: bool, theme: &Theme) -> ListItem<'a> {
    let (icon, style) = if task.completed {
        (
            "●",
            Style::default()
                .fg(theme.done)
                .add_modifier(Modifier::CROSSED_OUT),
        )
    } else {
        ("○", Style::default().fg(theme.text))
    };
    let icon_color = if task.completed { theme.done } else { theme.open };

    let line = Line::from(vec![
        Span::styled(format!(" {} ", icon), Style::default().fg(icon_color)),
        Span::styled(
            task.title.as_str(),
            if is_selected { style.bold() } else { style },
        ),
    ]);

    if is_selected {
        ListItem::new(line).style(Style::default().bg(theme.selection))
    } else {
        ListItem::new(line)
    }
}

fn key_hints(theme: &Theme) -> Line<'static> {
    let key_style = Style::default().fg(theme.accent).bold();
    let desc_style = Style::default().fg(theme.dimmed);
    let sep_style = Style::default().fg(theme.border);

    let mut spans = Vec::new();
    for (i, (key, desc)) in [
        ("j/k", "Navigate"),
        ("n", "New"),
        ("Space", "Toggle"),
        ("d", "Delete"),
        ("?", "Help"),
        ("q", "Quit"),
    ]
    .into_iter()
    .enumerate()
    {
        if i > 0 {
            spans.push(Span::styled("│", sep_style));
        }
        spans.push(Span::styled(format!(" {}", key), key_style));
        spans.push(Span::styled(format!(" {} ", desc), desc_style));
    }
    Line::from(spans)
}
