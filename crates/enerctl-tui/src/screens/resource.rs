//! Generic list + editor screen, shared by users and devices.
//!
//! Rendering follows the state the data bridge forwards; editor and
//! network operations go straight to the controller, whose state change
//! then comes back around as an action.

use std::future::Future;
use std::sync::Arc;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Cell, Clear, Paragraph, Row, Table, TableState};
use throbber_widgets_tui::{Throbber, ThrobberState};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, warn};

use enerctl_core::{Outcome, Resource, ResourceController, ResourceState, StatusMessage};

use crate::action::{Action, ConfirmDelete};
use crate::component::Component;
use crate::screen::ScreenId;
use crate::theme;

/// How a [`Resource`] appears on screen.
pub trait ScreenResource: Resource {
    const SCREEN: ScreenId;

    /// Table header labels.
    fn columns() -> &'static [&'static str];

    /// Column widths, one per header.
    fn widths() -> Vec<Constraint>;

    /// One table row, aligned with [`columns`](Self::columns).
    fn row(&self) -> Vec<String>;

    /// How the record is named in confirmations.
    fn display_name(&self) -> String;

    /// This resource's state, if `action` carries it.
    fn state_from(action: &Action) -> Option<&Arc<ResourceState<Self>>>;
}

pub struct ResourceScreen<T: ScreenResource> {
    controller: ResourceController<T>,
    state: Arc<ResourceState<T>>,
    table_state: TableState,
    /// Focused form field while the editor is open.
    field_idx: usize,
    focused: bool,
    throbber_state: ThrobberState,
    action_tx: Option<UnboundedSender<Action>>,
}

impl<T: ScreenResource> ResourceScreen<T> {
    pub fn new(controller: ResourceController<T>) -> Self {
        let state = controller.snapshot();
        let mut screen = Self {
            controller,
            state,
            table_state: TableState::default(),
            field_idx: 0,
            focused: false,
            throbber_state: ThrobberState::default(),
            action_tx: None,
        };
        screen.clamp_selection();
        screen
    }

    fn selected_index(&self) -> usize {
        self.table_state.selected().unwrap_or(0)
    }

    fn selected_item(&self) -> Option<&T> {
        self.state.items.get(self.selected_index())
    }

    fn clamp_selection(&mut self) {
        let len = self.state.items.len();
        if len == 0 {
            self.table_state.select(None);
        } else {
            self.table_state.select(Some(self.selected_index().min(len - 1)));
        }
    }

    fn move_selection(&mut self, delta: isize) {
        let len = self.state.items.len();
        if len == 0 {
            return;
        }
        let next = self.selected_index().saturating_add_signed(delta).min(len - 1);
        self.table_state.select(Some(next));
    }

    fn focused_field(&self) -> Option<T::Field> {
        T::fields().get(self.field_idx).copied()
    }

    /// Run a controller operation in the background. A request turned
    /// away because another is in flight gets a toast.
    fn spawn<F, Fut>(&self, op: F)
    where
        F: FnOnce(ResourceController<T>) -> Fut + Send + 'static,
        Fut: Future<Output = Outcome> + Send + 'static,
    {
        let controller = self.controller.clone();
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            let outcome = op(controller).await;
            debug!(resource = T::PLURAL, ?outcome, "operation finished");
            if outcome == Outcome::Busy {
                if let Some(tx) = tx {
                    let _ = tx.send(Action::Notify(format!(
                        "Still busy with the previous {} request",
                        T::SINGULAR
                    )));
                }
            }
        });
    }

    // ── Editor input ────────────────────────────────────────────

    fn open_editor(&mut self, item: Option<&T>) {
        self.field_idx = 0;
        match item {
            Some(item) => self.controller.open_edit_editor(item),
            None => self.controller.open_create_editor(),
        }
    }

    fn write_field(&self, field: T::Field, value: &str) {
        if let Err(e) = self.controller.update_draft_field(field, value) {
            warn!(resource = T::SINGULAR, %field, error = %e, "draft update rejected");
        }
    }

    /// Step an enumerated field through its choices. A blank field lands
    /// on the first choice going forward and the last going back.
    fn cycle_choice(&self, field: T::Field, forward: bool) {
        let choices = T::field_choices(field);
        if choices.is_empty() {
            return;
        }
        let current = self.controller.snapshot().draft.field_value(field);
        let pos = choices.iter().position(|c| c.eq_ignore_ascii_case(&current));
        let next = match (pos, forward) {
            (None, true) => 0,
            (None, false) => choices.len() - 1,
            (Some(i), true) => (i + 1) % choices.len(),
            (Some(i), false) => (i + choices.len() - 1) % choices.len(),
        };
        self.write_field(field, choices[next]);
    }

    fn handle_editor_key(&mut self, key: KeyEvent) {
        let field_count = T::fields().len();
        let Some(field) = self.focused_field() else {
            return;
        };
        let is_choice = !T::field_choices(field).is_empty();

        match key.code {
            KeyCode::Esc => {
                self.controller.close_editor();
                self.field_idx = 0;
            }
            KeyCode::Enter => {
                if !self.controller.snapshot().loading {
                    self.spawn(|c| async move { c.submit().await });
                }
            }
            KeyCode::Tab | KeyCode::Down => {
                self.field_idx = (self.field_idx + 1) % field_count;
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.field_idx = (self.field_idx + field_count - 1) % field_count;
            }
            KeyCode::Right | KeyCode::Char(' ') if is_choice => self.cycle_choice(field, true),
            KeyCode::Left if is_choice => self.cycle_choice(field, false),
            KeyCode::Char(ch) if !is_choice => {
                // Read the live draft so fast typing never races the
                // bridged copy.
                let mut value = self.controller.snapshot().draft.field_value(field);
                value.push(ch);
                self.write_field(field, &value);
            }
            KeyCode::Backspace if !is_choice => {
                let mut value = self.controller.snapshot().draft.field_value(field);
                value.pop();
                self.write_field(field, &value);
            }
            _ => {}
        }
    }

    // ── Rendering ───────────────────────────────────────────────

    fn render_banner(&self, frame: &mut Frame, area: Rect) {
        let [status_area, spinner_area] =
            Layout::horizontal([Constraint::Min(1), Constraint::Length(14)]).areas(area);

        if let Some(ref status) = self.state.status {
            let icon = if status.is_error() { "✗" } else { "✓" };
            let line = Line::from(vec![
                Span::styled(
                    format!(" {icon} {}", status.text),
                    theme::status_banner(status.is_error()),
                ),
                Span::styled("  x ", theme::key_hint_key()),
                Span::styled("dismiss", theme::key_hint()),
            ]);
            frame.render_widget(Paragraph::new(line), status_area);
        }

        if self.state.loading {
            let throbber = Throbber::default()
                .label("Loading…")
                .style(Style::default().fg(theme::NEON_CYAN))
                .throbber_style(Style::default().fg(theme::ELECTRIC_PURPLE));
            frame.render_stateful_widget(throbber, spinner_area, &mut self.throbber_state.clone());
        }
    }

    fn render_table(&self, frame: &mut Frame, area: Rect) {
        let header = Row::new(
            T::columns()
                .iter()
                .map(|c| Cell::from(*c).style(theme::table_header())),
        );

        let rows: Vec<Row> = if self.state.items.is_empty() {
            let placeholder = Cell::from(format!("No {} found.", T::PLURAL));
            vec![Row::new([placeholder]).style(theme::key_hint())]
        } else {
            let selected = self.selected_index();
            self.state
                .items
                .iter()
                .enumerate()
                .map(|(i, item)| {
                    let style = if i == selected {
                        theme::table_selected()
                    } else {
                        theme::table_row()
                    };
                    Row::new(item.row()).style(style)
                })
                .collect()
        };

        let mut widths = T::widths();
        if self.state.items.is_empty() {
            // Let the placeholder span the whole width.
            widths = vec![Constraint::Fill(1)];
        }

        let table = Table::new(rows, widths)
            .header(header)
            .row_highlight_style(theme::table_selected());

        let mut state = self.table_state;
        frame.render_stateful_widget(table, area, &mut state);
    }

    fn render_editor(&self, frame: &mut Frame, area: Rect) {
        let fields = T::fields();
        let show_error = self.state.status.as_ref().is_some_and(StatusMessage::is_error);

        #[allow(clippy::cast_possible_truncation, clippy::as_conversions)]
        let field_rows = fields.len() as u16;
        let overlay_w = 56u16.min(area.width.saturating_sub(4));
        let overlay_h = (field_rows + 5 + u16::from(show_error)).min(area.height.saturating_sub(2));
        let x = area.x + (area.width.saturating_sub(overlay_w)) / 2;
        let y = area.y + (area.height.saturating_sub(overlay_h)) / 2;
        let overlay = Rect::new(x, y, overlay_w, overlay_h);

        frame.render_widget(Clear, overlay);

        let title = match self.state.editing_id {
            Some(ref id) => format!(" Edit {} #{id} ", T::SINGULAR),
            None => format!(" New {} ", T::SINGULAR),
        };
        let block = Block::default()
            .title(title)
            .title_style(Style::default().fg(theme::ELECTRIC_YELLOW).add_modifier(Modifier::BOLD))
            .borders(Borders::ALL)
            .border_type(BorderType::Double)
            .border_style(Style::default().fg(theme::ELECTRIC_PURPLE));
        let inner = block.inner(overlay);
        frame.render_widget(block, overlay);

        let label_style = Style::default().fg(theme::DIM_WHITE);
        let focused_label = Style::default()
            .fg(theme::ELECTRIC_YELLOW)
            .add_modifier(Modifier::BOLD);
        let value_style = Style::default().fg(theme::NEON_CYAN);

        let mut lines = Vec::with_capacity(fields.len() + 4);
        for (idx, field) in fields.iter().copied().enumerate() {
            let is_focused = idx == self.field_idx;
            let lbl = if is_focused { focused_label } else { label_style };
            let marker = if is_focused { "▸ " } else { "  " };
            let required = if T::required_fields().contains(&field) { "*" } else { " " };
            let value = self.state.draft.field_value(field);

            let mut spans = vec![
                Span::styled(marker, lbl),
                Span::styled(format!("{:<18}{required} ", T::field_label(field)), lbl),
            ];
            if T::field_choices(field).is_empty() {
                spans.push(Span::styled(value, value_style));
                if is_focused {
                    spans.push(Span::styled("▎", Style::default().fg(theme::ELECTRIC_YELLOW)));
                }
            } else {
                let shown = if value.is_empty() { "(choose)".to_owned() } else { value };
                spans.push(Span::styled(format!("◂ {shown} ▸"), value_style));
            }
            lines.push(Line::from(spans));
        }

        if let Some(status) = self.state.status.as_ref().filter(|s| s.is_error()) {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                format!(" {}", status.text),
                theme::status_banner(true),
            )));
        }

        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled(" Tab", theme::key_hint_key()),
            Span::styled(" next  ", theme::key_hint()),
            Span::styled("←/→", theme::key_hint_key()),
            Span::styled(" choose  ", theme::key_hint()),
            Span::styled("Enter", theme::key_hint_key()),
            Span::styled(" save  ", theme::key_hint()),
            Span::styled("Esc", theme::key_hint_key()),
            Span::styled(" cancel", theme::key_hint()),
        ]));

        frame.render_widget(Paragraph::new(lines), inner);
    }
}

impl<T: ScreenResource> Component for ResourceScreen<T> {
    fn init(&mut self, action_tx: UnboundedSender<Action>) -> Result<()> {
        self.action_tx = Some(action_tx);
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.controller.snapshot().editor_open {
            self.handle_editor_key(key);
            return Ok(None);
        }

        let action = match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                self.move_selection(1);
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.move_selection(-1);
                None
            }
            KeyCode::Char('g') => {
                self.clamp_selection();
                if !self.state.items.is_empty() {
                    self.table_state.select(Some(0));
                }
                None
            }
            KeyCode::Char('G') => {
                if !self.state.items.is_empty() {
                    self.table_state.select(Some(self.state.items.len() - 1));
                }
                None
            }
            KeyCode::Char('a') => {
                self.open_editor(None);
                None
            }
            KeyCode::Char('e') | KeyCode::Enter => {
                if let Some(item) = self.selected_item().cloned() {
                    self.open_editor(Some(&item));
                }
                None
            }
            KeyCode::Char('d') => self.selected_item().and_then(|item| {
                item.id().map(|id| {
                    Action::ShowConfirm(ConfirmDelete {
                        screen: T::SCREEN,
                        id: id.clone(),
                        noun: T::SINGULAR,
                        name: item.display_name(),
                    })
                })
            }),
            KeyCode::Char('r') => {
                self.spawn(|c| async move { c.refresh().await });
                None
            }
            KeyCode::Char('x') => {
                self.controller.dismiss_status();
                None
            }
            _ => None,
        };
        Ok(action)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        if let Some(state) = T::state_from(action) {
            self.state = Arc::clone(state);
            if !self.state.editor_open {
                self.field_idx = 0;
            }
            self.clamp_selection();
            return Ok(None);
        }

        match action {
            Action::DeleteConfirmed { screen, id } if *screen == T::SCREEN => {
                let id = id.clone();
                self.spawn(move |c| async move { c.remove(&id).await });
            }
            Action::Tick if self.state.loading => self.throbber_state.calc_next(),
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let title = format!(" {} ({}) ", T::SCREEN.label(), self.state.items.len());
        let block = Block::default()
            .title(title)
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if self.focused {
                theme::border_focused()
            } else {
                theme::border_default()
            });
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [banner_area, table_area, hints_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .areas(inner);

        self.render_banner(frame, banner_area);
        self.render_table(frame, table_area);

        let hints = Line::from(vec![
            Span::styled("  j/k ", theme::key_hint_key()),
            Span::styled("navigate  ", theme::key_hint()),
            Span::styled("a ", theme::key_hint_key()),
            Span::styled("add  ", theme::key_hint()),
            Span::styled("e ", theme::key_hint_key()),
            Span::styled("edit  ", theme::key_hint()),
            Span::styled("d ", theme::key_hint_key()),
            Span::styled("delete  ", theme::key_hint()),
            Span::styled("r ", theme::key_hint_key()),
            Span::styled("refresh", theme::key_hint()),
        ]);
        frame.render_widget(Paragraph::new(hints), hints_area);

        if self.state.editor_open {
            self.render_editor(frame, area);
        }
    }

    fn captures_input(&self) -> bool {
        self.controller.snapshot().editor_open
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }
}
