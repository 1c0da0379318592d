//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! and translates keyboard and mouse events into `core::Action` values.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Event Loop
//!
//! ```text
//! ┌──► effects.tick(now) + drain render events
//! │    draw (if anything changed)
//! │    poll terminal events ──► update(app, action) ──► perform(effect)
//! │    drain background actions (exchange replies, status check)
//! └────┘
//! ```
//!
//! ## Redraw Strategy
//!
//! - **Animating** (effects running, typing, pending scroll): draws every
//!   ~50ms so the gradient and particles move smoothly.
//! - **Idle** (effects off, nothing in flight): sleeps up to 500ms and only
//!   redraws on events.

mod component;
mod components;
mod event;
mod ui;

use log::{debug, info, warn};
use std::io::stdout;
use std::sync::{Arc, mpsc};
use std::time::{Duration, Instant};

use crossterm::cursor::{Hide, SetCursorStyle, Show};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;

use crate::core::action::{Action, Effect, update};
use crate::core::composer::random_suggestion;
use crate::core::config::ResolvedConfig;
use crate::core::state::App;
use crate::effects::Effects;
use crate::exchange::{ExchangeClient, HttpBackend};
use crate::tui::component::EventHandler;
use crate::tui::components::input_box::send_control_area;
use crate::tui::components::{
    InputBoxState, InputEvent, MessageListState, SettingsEvent, SettingsState,
};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

const ANIMATION_FRAME: Duration = Duration::from_millis(50);
const IDLE_POLL: Duration = Duration::from_millis(500);

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    pub message_list: MessageListState,
    pub input_box: InputBoxState,
    pub settings: SettingsState,
    /// Frames drawn so far, drives the typing dots
    pub frame_count: usize,
    /// Pointer currently over the send control
    pub send_hovered: bool,
}

impl Default for TuiState {
    fn default() -> Self {
        Self::new()
    }
}

impl TuiState {
    pub fn new() -> Self {
        Self {
            message_list: MessageListState::new(),
            input_box: InputBoxState::default(),
            settings: SettingsState::default(),
            frame_count: 0,
            send_hovered: false,
        }
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        // Kitty keyboard protocol lets Shift+Enter be told apart; terminals
        // without it ignore the request
        execute!(
            stdout(),
            EnableMouseCapture,
            EnableBracketedPaste,
            Show,
            SetCursorStyle::SteadyBlock,
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
            )
        )?;
        info!("Terminal modes enabled (mouse, bracketed paste, keyboard enhancement)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(
            stdout(),
            PopKeyboardEnhancementFlags,
            DisableMouseCapture,
            DisableBracketedPaste,
            Hide
        );
    }
}

/// Everything an effect may touch, bundled so `perform` stays readable.
struct Adapter<'a> {
    tui: &'a mut TuiState,
    effects: &'a mut Effects,
    tx: &'a mpsc::Sender<Action>,
}

impl Adapter<'_> {
    /// Runs `action` through the reducer and performs its effect.
    /// Returns true when the app should quit.
    fn dispatch(&mut self, app: &mut App, action: Action, now: Instant) -> bool {
        debug!("Dispatching {:?}", action);
        let effect = update(app, action);
        self.perform(app, effect, now)
    }

    fn perform(&mut self, app: &App, effect: Effect, now: Instant) -> bool {
        match effect {
            Effect::None => {}
            Effect::SpawnExchange { prompt, generation } => {
                spawn_exchange(app.exchange.clone(), prompt, generation, self.tx.clone());
            }
            Effect::ReplyHearts => self.effects.reply_hearts(now),
            Effect::ResetView => {
                self.tui.message_list.reset();
                self.tui.settings.close();
            }
            Effect::Celebrate => self.effects.celebrate(now),
            Effect::Quit => return true,
        }
        false
    }
}

pub fn run(config: ResolvedConfig) -> std::io::Result<()> {
    let backend = Arc::new(HttpBackend::new(config.endpoint.clone()));
    let mut app = App::from_config(backend, &config);
    let mut tui = TuiState::new();
    let mut effects = Effects::new(config.effects_enabled);
    let mut rng = rand::thread_rng();

    // Channel for actions from background tasks
    let (tx, rx) = mpsc::channel();

    update(&mut app, Action::LoadHistory);
    spawn_status_check(app.exchange.clone(), tx.clone());

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new()?;

    effects.start(Instant::now());
    let mut needs_redraw = true; // Force first frame

    loop {
        let now = Instant::now();
        effects.tick(now);
        for event in app.take_render_events() {
            effects.on_render_event(event, now);
            tui.message_list.request_scroll(now);
        }

        let animating =
            effects.is_running() || app.is_typing || tui.message_list.scroll_due.is_some();
        if animating {
            needs_redraw = true;
        }

        if needs_redraw {
            terminal.draw(|f| ui::draw_ui(f, &app, &mut tui, &effects, now))?;
            tui.frame_count = tui.frame_count.wrapping_add(1);
            needs_redraw = false;
        }

        let timeout = if animating { ANIMATION_FRAME } else { IDLE_POLL };
        let first_event = poll_event_timeout(timeout);
        if first_event.is_some() {
            needs_redraw = true;
        }

        let mut should_quit = false;
        let mut adapter = Adapter {
            tui: &mut tui,
            effects: &mut effects,
            tx: &tx,
        };

        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            let now = Instant::now();
            match event {
                TuiEvent::Resize => {}
                // Ctrl+C always quits, even with the menu open
                TuiEvent::ForceQuit => {
                    should_quit |= adapter.dispatch(&mut app, Action::Quit, now);
                }
                _ if adapter.tui.settings.is_open() => {
                    let action = match adapter.tui.settings.handle_event(&event) {
                        Some(SettingsEvent::ClearHistory) => Some(Action::ClearHistory),
                        Some(SettingsEvent::ThemeRequested) => Some(Action::ThemeRequested),
                        Some(SettingsEvent::Dismissed) | None => None,
                    };
                    if let Some(action) = action {
                        should_quit |= adapter.dispatch(&mut app, action, now);
                    }
                }
                TuiEvent::OpenSettings => adapter.tui.settings.open(),
                TuiEvent::Quit => {
                    should_quit |= adapter.dispatch(&mut app, Action::Quit, now);
                }
                TuiEvent::Celebrate => {
                    should_quit |= adapter.dispatch(&mut app, Action::Celebrate, now);
                }
                TuiEvent::MouseMove(col, row) => {
                    let area = terminal.get_frame().area();
                    on_mouse_move(&app, &mut adapter, area, col, row, now);
                }
                TuiEvent::ScrollUp
                | TuiEvent::ScrollDown
                | TuiEvent::ScrollPageUp
                | TuiEvent::ScrollPageDown
                | TuiEvent::ScrollToBottom => {
                    adapter.tui.message_list.handle_event(&event);
                }
                _ => match app.composer.handle_event(&event) {
                    Some(InputEvent::Submit) => {
                        should_quit |= adapter.dispatch(&mut app, Action::Submit, now);
                    }
                    Some(InputEvent::InsertEmoji) => {
                        let emoji = random_suggestion(&mut rng).to_string();
                        should_quit |=
                            adapter.dispatch(&mut app, Action::InsertSuggestion(emoji), now);
                    }
                    Some(InputEvent::ContentChanged) | None => {}
                },
            }
        }

        // Background task actions (exchange replies, status check)
        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            should_quit |= adapter.dispatch(&mut app, action, Instant::now());
        }

        if should_quit {
            break;
        }
    }

    effects.stop();
    info!("heartchat shutting down");
    ratatui::restore();
    Ok(())
}

/// Hover feedback: highlight the bubble under the pointer and sparkle the
/// send control when the pointer first enters it.
fn on_mouse_move(
    app: &App,
    adapter: &mut Adapter<'_>,
    area: ratatui::layout::Rect,
    col: u16,
    row: u16,
    now: Instant,
) {
    let screen = ui::layout_for(app, area);
    let hovered = ui::hit_test_message(row, screen.messages, adapter.tui);
    adapter.tui.message_list.hovered_index = hovered;

    let send = send_control_area(screen.input);
    let over_send = ui::contains(send, col, row);
    if over_send && !adapter.tui.send_hovered {
        adapter.effects.sparkles(now, ui::to_region(send, area));
    }
    adapter.tui.send_hovered = over_send;
}

fn spawn_exchange(
    client: ExchangeClient,
    prompt: String,
    generation: u64,
    tx: mpsc::Sender<Action>,
) {
    info!("Spawning exchange ({} chars)", prompt.chars().count());
    tokio::spawn(async move {
        let reply = client.exchange(&prompt).await;
        let resolved = Action::ExchangeResolved {
            generation,
            prompt,
            reply,
        };
        if tx.send(resolved).is_err() {
            warn!("Failed to deliver exchange reply: receiver dropped");
        }
    });
}

fn spawn_status_check(client: ExchangeClient, tx: mpsc::Sender<Action>) {
    tokio::spawn(async move {
        let status = client.status().await;
        info!("Backend status: {:?}", status);
        if tx.send(Action::StatusChecked(status)).is_err() {
            warn!("Failed to deliver status check: receiver dropped");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_app;

    #[test]
    fn test_perform_reply_hearts_and_celebrate() {
        let mut app = test_app();
        let mut tui = TuiState::new();
        let mut effects = Effects::seeded(true, 7);
        let (tx, _rx) = mpsc::channel();
        let t0 = Instant::now();
        effects.start(t0);

        let mut adapter = Adapter {
            tui: &mut tui,
            effects: &mut effects,
            tx: &tx,
        };
        assert!(!adapter.perform(&app, Effect::ReplyHearts, t0));
        assert!(!adapter.dispatch(&mut app, Action::Celebrate, t0));
        // 3 hearts + 20 confetti, plus the two repeating tasks
        assert_eq!(effects.pending_tasks(), 2 + 3 + 20);
    }

    #[test]
    fn test_clear_history_resets_view() {
        let mut app = test_app();
        app.append(crate::core::conversation::Message::user("hi"));
        let mut tui = TuiState::new();
        tui.message_list.stick_to_bottom = false;
        tui.settings.open();
        let mut effects = Effects::seeded(false, 0);
        let (tx, _rx) = mpsc::channel();

        let mut adapter = Adapter {
            tui: &mut tui,
            effects: &mut effects,
            tx: &tx,
        };
        assert!(!adapter.dispatch(&mut app, Action::ClearHistory, Instant::now()));
        assert!(app.conversation.is_empty());
        assert!(tui.message_list.stick_to_bottom);
        assert!(!tui.settings.is_open());
    }

    #[test]
    fn test_quit_effect_stops_loop() {
        let mut app = test_app();
        let mut tui = TuiState::new();
        let mut effects = Effects::seeded(false, 0);
        let (tx, _rx) = mpsc::channel();
        let mut adapter = Adapter {
            tui: &mut tui,
            effects: &mut effects,
            tx: &tx,
        };
        assert!(adapter.dispatch(&mut app, Action::Quit, Instant::now()));
    }

    #[tokio::test]
    async fn test_spawned_exchange_reports_back() {
        let app = test_app();
        let (tx, rx) = mpsc::channel();
        spawn_exchange(app.exchange.clone(), "hello".into(), 3, tx);

        let action = tokio::task::spawn_blocking(move || rx.recv_timeout(Duration::from_secs(5)))
            .await
            .unwrap()
            .unwrap();
        match action {
            Action::ExchangeResolved {
                generation,
                prompt,
                reply,
            } => {
                assert_eq!(generation, 3);
                assert_eq!(prompt, "hello");
                assert_eq!(reply.content, "stub reply");
                assert!(!reply.is_error);
            }
            other => panic!("expected ExchangeResolved, got {other:?}"),
        }
    }

    #[test]
    fn test_hover_sparkles_once_per_entry() {
        let app = test_app();
        let mut tui = TuiState::new();
        let mut effects = Effects::seeded(true, 1);
        let (tx, _rx) = mpsc::channel();
        let t0 = Instant::now();
        effects.start(t0);
        let area = ratatui::layout::Rect::new(0, 0, 80, 24);
        let send = send_control_area(ui::layout_for(&app, area).input);

        let mut adapter = Adapter {
            tui: &mut tui,
            effects: &mut effects,
            tx: &tx,
        };
        on_mouse_move(&app, &mut adapter, area, send.x, send.y, t0);
        on_mouse_move(&app, &mut adapter, area, send.x + 1, send.y, t0);
        assert!(adapter.tui.send_hovered);
        assert_eq!(adapter.effects.pending_tasks(), 2 + 3, "one burst of 3 sparkles");

        on_mouse_move(&app, &mut adapter, area, 0, 0, t0);
        assert!(!adapter.tui.send_hovered);
    }
}
