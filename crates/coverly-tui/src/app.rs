//! Application core: event loop, action dispatch, screen management.
//!
//! Terminal events, push-channel events, and finished network calls all
//! end up as [`Intent`]s for one [`Panel`]. Effects the panel returns are
//! handed to the [`EffectRunner`], whose results come back on the intent
//! queue, so every state change happens on this loop.

use std::collections::HashMap;
use std::time::Duration;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Tabs};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use coverly_core::{
    ChannelEvent, CommandClient, EffectRunner, Intent, LinkState, Panel, PanelConfig,
};

use crate::action::Action;
use crate::component::Component;
use crate::event::{self, Event};
use crate::screen::ScreenId;
use crate::screens::create_screens;
use crate::theme;
use crate::tui::Tui;
use crate::widgets::{dialog::DialogView, log_panel};

/// Redraw period, about 30 frames a second.
const FRAME: Duration = Duration::from_millis(33);

/// Rows given to the operator log, borders included.
const LOG_HEIGHT: u16 = 9;

/// What woke the loop up.
enum Wake {
    Terminal(Option<Event>),
    Intent(Option<Intent>),
}

pub struct App {
    config: PanelConfig,
    client: CommandClient,
    panel: Panel,
    runner: EffectRunner,
    intent_tx: mpsc::UnboundedSender<Intent>,
    intent_rx: mpsc::UnboundedReceiver<Intent>,
    cancel: CancellationToken,
    screens: HashMap<ScreenId, Box<dyn Component>>,
    active_screen: ScreenId,
    dialog: DialogView,
    running: bool,
}

impl App {
    pub fn new(config: PanelConfig) -> Result<Self> {
        let client = CommandClient::from_config(&config)?;
        let (intent_tx, intent_rx) = mpsc::unbounded_channel();
        let runner = EffectRunner::new(client.clone(), intent_tx.clone());

        let mut screens: HashMap<ScreenId, Box<dyn Component>> =
            create_screens().into_iter().collect();
        let active_screen = ScreenId::default();
        if let Some(screen) = screens.get_mut(&active_screen) {
            screen.set_focused(true);
        }

        Ok(Self {
            panel: Panel::new(&config),
            config,
            client,
            runner,
            intent_tx,
            intent_rx,
            cancel: CancellationToken::new(),
            screens,
            active_screen,
            dialog: DialogView::new(),
            running: true,
        })
    }

    /// Main event loop. Runs until quit.
    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::enter()?;

        if let Err(e) = coverly_core::spawn_channel(
            &self.client,
            &self.config,
            self.intent_tx.clone(),
            self.cancel.child_token(),
        ) {
            warn!(error = %e, "push channel unavailable");
            self.apply(Intent::Channel(ChannelEvent::Disconnected {
                reason: Some(e.to_string()),
            }));
        }
        self.apply(Intent::Startup);

        let mut events = event::spawn(FRAME, self.cancel.child_token());
        info!(url = %self.config.url, "panel loop started");

        while self.running {
            let wake = tokio::select! {
                event = events.recv() => Wake::Terminal(event),
                intent = self.intent_rx.recv() => Wake::Intent(intent),
            };
            match wake {
                Wake::Terminal(None) | Wake::Intent(None) => break,
                Wake::Intent(Some(intent)) => self.apply(intent),
                Wake::Terminal(Some(Event::Key(key))) => {
                    if let Some(action) = self.handle_key_event(key)? {
                        self.process_action(action);
                    }
                }
                Wake::Terminal(Some(Event::Resize(cols, rows))) => {
                    debug!(cols, rows, "terminal resized");
                    tui.draw(|frame| self.render(frame))?;
                }
                Wake::Terminal(Some(Event::Frame)) => tui.draw(|frame| self.render(frame))?,
            }
        }

        self.cancel.cancel();
        info!("panel loop ended");
        Ok(())
    }

    /// Run one intent through the panel and start its effects.
    fn apply(&mut self, intent: Intent) {
        let effects = self.panel.update(intent);
        self.dialog.sync(self.panel.dialog().current());
        if !effects.is_empty() {
            debug!(count = effects.len(), "spawning effects");
        }
        self.runner.spawn_all(effects);
    }

    /// Map a key event to an action. Global keys are handled here;
    /// screen-specific keys are delegated to the active screen, and an
    /// open dialog takes everything except Ctrl+C.
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if key.modifiers == KeyModifiers::CONTROL && key.code == KeyCode::Char('c') {
            return Ok(Some(Action::Quit));
        }

        if let Some(session) = self.panel.dialog().current() {
            return Ok(self.dialog.handle_key(key, session).map(Action::Panel));
        }

        match key.code {
            KeyCode::Tab => return Ok(Some(Action::NextScreen)),
            KeyCode::BackTab => return Ok(Some(Action::PrevScreen)),
            _ => {}
        }

        let capturing = self
            .screens
            .get(&self.active_screen)
            .is_some_and(|s| s.capturing_input());
        if !capturing {
            match key.code {
                KeyCode::Char('q') => return Ok(Some(Action::Quit)),
                KeyCode::Char(c @ '1'..='9') => {
                    let n = c.to_digit(10).and_then(|d| u8::try_from(d).ok());
                    return Ok(n.and_then(ScreenId::from_number).map(Action::SwitchScreen));
                }
                _ => {}
            }
        }

        match self.screens.get_mut(&self.active_screen) {
            Some(screen) => screen.handle_key_event(key, &self.panel),
            None => Ok(None),
        }
    }

    fn process_action(&mut self, action: Action) {
        match action {
            Action::Quit => {
                self.running = false;
                self.cancel.cancel();
            }
            Action::SwitchScreen(id) => self.switch_screen(id),
            Action::NextScreen => self.switch_screen(self.active_screen.next()),
            Action::PrevScreen => self.switch_screen(self.active_screen.prev()),
            Action::Panel(intent) => self.apply(intent),
        }
    }

    fn switch_screen(&mut self, id: ScreenId) {
        if id == self.active_screen {
            return;
        }
        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            screen.set_focused(false);
        }
        self.active_screen = id;
        if let Some(screen) = self.screens.get_mut(&id) {
            screen.set_focused(true);
        }
    }

    // ── Rendering ───────────────────────────────────────────────────

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        let layout = Layout::vertical([
            Constraint::Length(1),          // tab bar
            Constraint::Min(5),             // screen
            Constraint::Length(LOG_HEIGHT), // operator log
            Constraint::Length(1),          // status bar
        ])
        .split(area);

        self.render_tab_bar(frame, layout[0]);
        if let Some(screen) = self.screens.get(&self.active_screen) {
            screen.render(frame, layout[1], &self.panel);
        }
        log_panel::render(frame, layout[2], self.panel.log());
        self.render_status_bar(frame, layout[3]);

        if let Some(session) = self.panel.dialog().current() {
            self.dialog.render(frame, area, session);
        }
    }

    fn render_tab_bar(&self, frame: &mut Frame, area: Rect) {
        let titles: Vec<Line> = ScreenId::ALL
            .iter()
            .map(|&id| {
                Line::from(Span::styled(
                    format!(" {} {} ", id.number(), id.label()),
                    theme::tab(id == self.active_screen),
                ))
            })
            .collect();

        let tabs = Tabs::new(titles)
            .divider(Span::styled(" ", theme::hint()))
            .select(
                ScreenId::ALL
                    .iter()
                    .position(|&s| s == self.active_screen)
                    .unwrap_or(0),
            );

        frame.render_widget(tabs, area);
    }

    /// Render the bottom status bar with link state, last remote and hints.
    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let link = link_indicator(self.panel.link_state());

        let mut spans = vec![Span::raw(" "), link];
        let last = self.panel.registry().last_address();
        if !last.is_empty() {
            spans.push(Span::styled(" │ last remote ", theme::hint()));
            spans.push(Span::styled(last, Style::default().fg(theme::ROSE)));
        }
        spans.push(Span::styled(
            format!(" │ {} │ 1-3 screens  q quit", self.config.url),
            theme::hint(),
        ));

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}

fn link_indicator(state: &LinkState) -> Span<'static> {
    match state {
        LinkState::Connected => Span::styled("● live", Style::default().fg(theme::OK_GREEN)),
        LinkState::Connecting => Span::styled(
            "◐ connecting",
            Style::default().fg(theme::WARN_YELLOW),
        ),
        LinkState::Retrying { attempt } => Span::styled(
            format!("◐ reconnecting ({attempt})"),
            Style::default().fg(theme::WARN_YELLOW),
        ),
        LinkState::Offline => Span::styled("○ offline", Style::default().fg(theme::FAULT_RED)),
    }
}
