//! Application core: event loop, screen management, action dispatch.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Tabs},
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use enerctl_core::Console;

use crate::action::{Action, ConfirmDelete};
use crate::component::Component;
use crate::event::{Event, EventReader};
use crate::screen::ScreenId;
use crate::screens::create_screens;
use crate::theme;
use crate::tui::Tui;

const NOTIFICATION_TTL: Duration = Duration::from_secs(3);

/// Top-level application state and event loop.
pub struct App {
    active_screen: ScreenId,
    screens: HashMap<ScreenId, Box<dyn Component>>,
    running: bool,
    help_visible: bool,
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,
    console: Console,
    /// Stops the data bridge.
    data_cancel: CancellationToken,
    /// Blocks all other input while set.
    pending_confirm: Option<ConfirmDelete>,
    notification: Option<(String, Instant)>,
}

impl App {
    pub fn new(console: Console) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let screens = create_screens(&console).into_iter().collect();

        Self {
            active_screen: ScreenId::default(),
            screens,
            running: true,
            help_visible: false,
            action_tx,
            action_rx,
            console,
            data_cancel: CancellationToken::new(),
            pending_confirm: None,
            notification: None,
        }
    }

    fn init_screens(&mut self) -> Result<()> {
        for screen in self.screens.values_mut() {
            screen.init(self.action_tx.clone())?;
        }
        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            screen.set_focused(true);
        }
        Ok(())
    }

    /// Run until the operator quits.
    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new()?;
        tui.enter()?;
        self.init_screens()?;

        tokio::spawn(crate::data_bridge::spawn_data_bridge(
            self.console.clone(),
            self.action_tx.clone(),
            self.data_cancel.clone(),
        ));

        let mut events = EventReader::new(
            Duration::from_millis(250), // 4 Hz tick
            Duration::from_millis(33),  // ~30 FPS render
        );

        info!("TUI event loop started");

        while self.running {
            let Some(event) = events.next().await else {
                break;
            };

            match event {
                Event::Key(key) => {
                    if let Some(action) = self.handle_key_event(key)? {
                        self.action_tx.send(action)?;
                    }
                }
                Event::Resize(w, h) => {
                    debug!(w, h, "terminal resized");
                    self.action_tx.send(Action::Render)?;
                }
                Event::Tick => self.action_tx.send(Action::Tick)?,
                Event::Render => self.action_tx.send(Action::Render)?,
            }

            while let Ok(action) = self.action_rx.try_recv() {
                self.process_action(&action)?;

                if let Action::Render = action {
                    tui.draw(|frame| self.render(frame))?;
                }
            }
        }

        self.data_cancel.cancel();
        self.console.shutdown();
        events.stop();
        info!("TUI event loop ended");
        Ok(())
    }

    /// Global keys first, then the active screen.
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if key.modifiers == KeyModifiers::CONTROL && key.code == KeyCode::Char('c') {
            return Ok(Some(Action::Quit));
        }

        if self.pending_confirm.is_some() {
            return Ok(match key.code {
                KeyCode::Char('y' | 'Y') => Some(Action::ConfirmYes),
                KeyCode::Char('n' | 'N') | KeyCode::Esc => Some(Action::ConfirmNo),
                _ => None,
            });
        }

        if self.help_visible {
            return Ok(match key.code {
                KeyCode::Esc | KeyCode::Char('?') => Some(Action::ToggleHelp),
                _ => None,
            });
        }

        let Some(screen) = self.screens.get_mut(&self.active_screen) else {
            return Ok(None);
        };

        // An open form owns the keyboard.
        if screen.captures_input() {
            return screen.handle_key_event(key);
        }

        match (key.modifiers, key.code) {
            (KeyModifiers::NONE, KeyCode::Char('q')) => return Ok(Some(Action::Quit)),
            (KeyModifiers::NONE, KeyCode::Char('?')) => return Ok(Some(Action::ToggleHelp)),
            (KeyModifiers::NONE, KeyCode::Char(c @ '1'..='9')) => {
                let n = u8::try_from(c).unwrap_or(0).saturating_sub(b'0');
                if let Some(target) = ScreenId::from_number(n) {
                    return Ok(Some(Action::SwitchScreen(target)));
                }
            }
            (KeyModifiers::NONE, KeyCode::Tab) => {
                return Ok(Some(Action::SwitchScreen(self.active_screen.next())));
            }
            (KeyModifiers::SHIFT, KeyCode::BackTab) => {
                return Ok(Some(Action::SwitchScreen(self.active_screen.prev())));
            }
            _ => {}
        }

        screen.handle_key_event(key)
    }

    fn process_action(&mut self, action: &Action) -> Result<()> {
        match action {
            Action::Quit => self.running = false,

            Action::SwitchScreen(target) => {
                if *target != self.active_screen {
                    debug!("switching screen: {} → {}", self.active_screen, target);
                    if let Some(screen) = self.screens.get_mut(&self.active_screen) {
                        screen.set_focused(false);
                    }
                    self.active_screen = *target;
                    if let Some(screen) = self.screens.get_mut(&self.active_screen) {
                        screen.set_focused(true);
                    }
                }
            }

            Action::ToggleHelp => self.help_visible = !self.help_visible,

            Action::ShowConfirm(confirm) => self.pending_confirm = Some(confirm.clone()),

            Action::ConfirmYes => {
                if let Some(confirm) = self.pending_confirm.take() {
                    self.action_tx.send(Action::DeleteConfirmed {
                        screen: confirm.screen,
                        id: confirm.id,
                    })?;
                }
            }

            Action::ConfirmNo => self.pending_confirm = None,

            Action::DeleteConfirmed { screen, .. } => {
                if let Some(target) = self.screens.get_mut(screen) {
                    if let Some(follow_up) = target.update(action)? {
                        self.action_tx.send(follow_up)?;
                    }
                }
            }

            Action::Notify(message) => {
                self.notification = Some((message.clone(), Instant::now()));
            }

            Action::Tick => {
                if self
                    .notification
                    .as_ref()
                    .is_some_and(|(_, shown)| shown.elapsed() > NOTIFICATION_TTL)
                {
                    self.notification = None;
                }
                self.broadcast(action)?;
            }

            // Data updates go to every screen so hidden tabs stay current.
            Action::UsersUpdated(_) | Action::DevicesUpdated(_) => self.broadcast(action)?,

            Action::Render => {}
        }

        Ok(())
    }

    fn broadcast(&mut self, action: &Action) -> Result<()> {
        for screen in self.screens.values_mut() {
            if let Some(follow_up) = screen.update(action)? {
                self.action_tx.send(follow_up)?;
            }
        }
        Ok(())
    }

    // ── Rendering ────────────────────────────────────────────────

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        let [content_area, tab_area, status_area] = Layout::vertical([
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(area);

        if let Some(screen) = self.screens.get(&self.active_screen) {
            screen.render(frame, content_area);
        }
        self.render_tab_bar(frame, tab_area);
        self.render_status_bar(frame, status_area);

        // Overlays, last drawn is topmost.
        if let Some((ref message, _)) = self.notification {
            render_notification(frame, area, message);
        }
        if let Some(ref confirm) = self.pending_confirm {
            render_confirm_dialog(frame, area, confirm);
        }
        if self.help_visible {
            render_help_overlay(frame, area);
        }
    }

    fn render_tab_bar(&self, frame: &mut Frame, area: Rect) {
        let titles: Vec<Line> = ScreenId::ALL
            .iter()
            .map(|&id| {
                let style = if id == self.active_screen {
                    theme::tab_active()
                } else {
                    theme::tab_inactive()
                };
                Line::from(Span::styled(format!(" {} {} ", id.number(), id.label()), style))
            })
            .collect();

        let selected = ScreenId::ALL
            .iter()
            .position(|&s| s == self.active_screen)
            .unwrap_or(0);

        let tabs = Tabs::new(titles)
            .divider(Span::styled(" ", theme::key_hint()))
            .select(selected);
        frame.render_widget(tabs, area);
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let line = Line::from(vec![
            Span::raw(" "),
            Span::styled("● ", Style::default().fg(theme::SUCCESS_GREEN)),
            Span::styled(
                self.console.config().base_url.to_string(),
                Style::default().fg(theme::DIM_WHITE),
            ),
            Span::styled(" │ ? help  Tab next  q quit", theme::key_hint()),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width.saturating_sub(4));
    let height = height.min(area.height.saturating_sub(2));
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width, height)
}

fn render_confirm_dialog(frame: &mut Frame, area: Rect, confirm: &ConfirmDelete) {
    let dialog = centered(area, 50, 5);
    frame.render_widget(Clear, dialog);

    let block = Block::default()
        .title(" Confirm ")
        .title_style(theme::title_style())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme::ELECTRIC_YELLOW));
    let inner = block.inner(dialog);
    frame.render_widget(block, dialog);

    let text = vec![
        Line::from(Span::styled(
            format!("  {confirm}"),
            Style::default().fg(theme::DIM_WHITE),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("  y ", theme::key_hint_key()),
            Span::styled("confirm    ", theme::key_hint()),
            Span::styled("n ", theme::key_hint_key()),
            Span::styled("cancel", theme::key_hint()),
        ]),
    ];
    frame.render_widget(Paragraph::new(text), inner);
}

/// Toast in the bottom-right corner, above the status bar.
fn render_notification(frame: &mut Frame, area: Rect, message: &str) {
    let msg_len = u16::try_from(message.chars().count()).unwrap_or(u16::MAX);
    let width = msg_len.saturating_add(6).clamp(20, 60).min(area.width);
    let height = 3u16;
    let x = area.width.saturating_sub(width + 1);
    let y = area.height.saturating_sub(height + 2);
    let toast = Rect::new(area.x + x, area.y + y, width, height.min(area.height));

    frame.render_widget(Clear, toast);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme::ELECTRIC_YELLOW));
    let inner = block.inner(toast);
    frame.render_widget(block, toast);

    let line = Line::from(vec![
        Span::styled(" ! ", Style::default().fg(theme::ELECTRIC_YELLOW)),
        Span::styled(message.to_owned(), Style::default().fg(theme::DIM_WHITE)),
    ]);
    frame.render_widget(Paragraph::new(line), inner);
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let help = centered(area, 52, 17);
    frame.render_widget(Clear, help);

    let block = Block::default()
        .title(" Keyboard Shortcuts ")
        .title_style(theme::title_style())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border_focused());
    let inner = block.inner(help);
    frame.render_widget(block, help);

    let entry = |key: &'static str, what: &'static str| {
        Line::from(vec![
            Span::styled(format!("  {key:<10}"), theme::key_hint_key()),
            Span::styled(what, theme::key_hint()),
        ])
    };
    let heading = |title: &'static str| {
        Line::from(Span::styled(format!("  {title}"), Style::default().fg(theme::NEON_CYAN)))
    };

    let lines = vec![
        heading("Navigation"),
        entry("1-3", "Jump to screen"),
        entry("Tab", "Next screen"),
        entry("j/k ↑/↓", "Move up/down"),
        Line::from(""),
        heading("Users & Devices"),
        entry("a", "Add"),
        entry("e Enter", "Edit selected"),
        entry("d", "Delete selected"),
        entry("r", "Refresh"),
        entry("x", "Dismiss message"),
        Line::from(""),
        entry("?", "This help"),
        entry("q", "Quit"),
    ];
    frame.render_widget(Paragraph::new(lines), inner);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use enerctl_core::{ConsoleConfig, EntityId};
    use pretty_assertions::assert_eq;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use super::*;

    fn app() -> App {
        let config = ConsoleConfig::new("http://127.0.0.1:1".parse().unwrap());
        App::new(Console::new(config).unwrap())
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    /// Handle a key and apply whatever action it maps to.
    fn press(app: &mut App, code: KeyCode) {
        if let Some(action) = app.handle_key_event(key(code)).unwrap() {
            app.process_action(&action).unwrap();
        }
    }

    fn render(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 24)).unwrap();
        terminal.draw(|frame| app.render(frame)).unwrap();
        let buffer = terminal.backend().buffer();
        let mut out = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                out.push_str(buffer[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    #[tokio::test]
    async fn number_keys_and_tab_switch_screens() {
        let mut app = app();
        assert_eq!(app.active_screen, ScreenId::Users);

        press(&mut app, KeyCode::Char('3'));
        assert_eq!(app.active_screen, ScreenId::Reports);

        press(&mut app, KeyCode::Tab);
        assert_eq!(app.active_screen, ScreenId::Users);

        let back = app
            .handle_key_event(KeyEvent::new(KeyCode::BackTab, KeyModifiers::SHIFT))
            .unwrap();
        app.process_action(&back.unwrap()).unwrap();
        assert_eq!(app.active_screen, ScreenId::Reports);
    }

    #[tokio::test]
    async fn confirmed_delete_is_routed_to_the_asking_screen() {
        let mut app = app();
        app.process_action(&Action::ShowConfirm(ConfirmDelete {
            screen: ScreenId::Devices,
            id: EntityId::Numeric(4),
            noun: "device",
            name: "TV".into(),
        }))
        .unwrap();

        // Global keys are blocked while the dialog is up.
        assert!(app.handle_key_event(key(KeyCode::Char('2'))).unwrap().is_none());

        let out = render(&app);
        assert!(out.contains("Delete device 'TV'?"), "{out}");

        press(&mut app, KeyCode::Char('y'));
        assert!(app.pending_confirm.is_none());
        let Ok(Action::DeleteConfirmed { screen, id }) = app.action_rx.try_recv() else {
            panic!("expected a confirmed delete");
        };
        assert_eq!(screen, ScreenId::Devices);
        assert_eq!(id, EntityId::Numeric(4));
    }

    #[tokio::test]
    async fn declining_drops_the_pending_delete() {
        let mut app = app();
        app.process_action(&Action::ShowConfirm(ConfirmDelete {
            screen: ScreenId::Users,
            id: EntityId::Numeric(1),
            noun: "user",
            name: "Ana".into(),
        }))
        .unwrap();

        press(&mut app, KeyCode::Esc);
        assert!(app.pending_confirm.is_none());
        assert!(app.action_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn open_editor_swallows_global_shortcuts() {
        let mut app = app();
        press(&mut app, KeyCode::Char('a'));
        press(&mut app, KeyCode::Char('q'));
        press(&mut app, KeyCode::Char('2'));

        assert!(app.running);
        assert_eq!(app.active_screen, ScreenId::Users);
        assert_eq!(app.console.users().snapshot().draft.name, "q2");
    }

    #[tokio::test]
    async fn q_quits_from_the_list() {
        let mut app = app();
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.running);
    }

    #[tokio::test]
    async fn frame_shows_tabs_status_and_help() {
        let mut app = app();
        let out = render(&app);
        assert!(out.contains("1 Users"));
        assert!(out.contains("2 Devices"));
        assert!(out.contains("3 Reports"));
        assert!(out.contains("http://127.0.0.1:1/"));

        press(&mut app, KeyCode::Char('?'));
        let out = render(&app);
        assert!(out.contains("Keyboard Shortcuts"));
    }

    #[tokio::test]
    async fn notifications_expire_on_tick() {
        let mut app = app();
        app.process_action(&Action::Notify("Still busy".into())).unwrap();
        assert!(render(&app).contains("Still busy"));

        let stale = Instant::now().checked_sub(Duration::from_secs(10)).unwrap();
        app.notification = Some(("Still busy".into(), stale));
        app.process_action(&Action::Tick).unwrap();
        assert!(app.notification.is_none());
    }
}
