use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use log::{debug, info, warn};
use ratatui::{prelude::*, widgets::*};

use crate::config::{Config, Source};
use crate::input::Key;
use crate::remote::{Authority, Completion, HttpAuthority, LoopbackAuthority, RemoteSyncClient};
use crate::render::{Board, Workers};
use crate::scheduler::{Beat, Scheduler};
use crate::session::{GameSession, Mode, Status};

/// Longest the loop sleeps waiting for input once every timer is gone.
const IDLE_WAIT: Duration = Duration::from_millis(250);
const SIDEBAR_WIDTH: u16 = 44;

/// Owns one game session and everything that drives it.
pub struct App {
    session: GameSession,
    scheduler: Scheduler,
    sync: Option<RemoteSyncClient>,
    join_pending: bool,
    dirty: bool,
    exit: bool,
}

impl App {
    pub fn new(config: &Config, now: Instant) -> Self {
        let authority: Option<Arc<dyn Authority>> = match &config.source {
            Source::Local => None,
            Source::Http(url) => Some(Arc::new(HttpAuthority::new(url))),
            Source::Loopback => Some(Arc::new(LoopbackAuthority::new(config.size))),
        };
        info!(
            "Starting {} session on a {}x{} grid",
            config.source, config.size.width, config.size.height
        );
        Self::with_authority(config, authority, now)
    }

    pub fn with_authority(
        config: &Config,
        authority: Option<Arc<dyn Authority>>,
        now: Instant,
    ) -> Self {
        let scheduler = Scheduler::new(now).every(Beat::Tick, config.tick);

        let mut app = match authority {
            None => App {
                session: GameSession::local(config.size),
                scheduler,
                sync: None,
                join_pending: false,
                dirty: true,
                exit: false,
            },
            Some(authority) => App {
                session: GameSession::remote(config.size),
                scheduler: scheduler
                    .every(Beat::Poll, config.poll)
                    .every(Beat::Telemetry, config.telemetry),
                sync: Some(RemoteSyncClient::new(authority)),
                join_pending: false,
                dirty: true,
                exit: false,
            },
        };
        app.request_join();
        app
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn should_exit(&self) -> bool {
        self.exit
    }

    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    fn request_join(&mut self) {
        if self.join_pending || self.session.game_id().is_some() {
            return;
        }
        if let Some(sync) = &self.sync {
            sync.join();
            self.join_pending = true;
        }
    }

    pub fn handle_key(&mut self, code: KeyCode) {
        if matches!(code, KeyCode::Esc | KeyCode::Char('q')) {
            self.exit = true;
            return;
        }

        let key = Key::from(code);
        let Some(direction) = self.session.handle_key(key) else {
            return;
        };
        self.dirty = true;

        if let Some(sync) = &self.sync {
            match self.session.game_id() {
                Some(game_id) => sync.send_move(game_id.clone(), direction),
                None => debug!("Not joined yet, {:?} stays local", direction),
            }
        }
    }

    pub fn on_beat(&mut self, beat: Beat) {
        match beat {
            Beat::Tick => {
                self.session.tick();
                self.dirty = true;
            }
            Beat::Poll => {
                if self.session.game_id().is_none() {
                    self.request_join();
                    return;
                }
                if let (Some(sync), Some(game_id)) = (&mut self.sync, self.session.poll_target()) {
                    sync.poll(game_id.clone());
                }
            }
            Beat::Telemetry => {
                if let Some(sync) = &self.sync {
                    sync.fetch_workers();
                }
            }
        }
    }

    pub fn pump(&mut self, now: Instant) {
        for beat in self.scheduler.due(now) {
            self.on_beat(beat);
        }
    }

    pub fn drain_completions(&mut self) {
        loop {
            let Some(completion) = self.sync.as_ref().and_then(RemoteSyncClient::try_recv) else {
                break;
            };
            self.apply(completion);
        }
    }

    pub fn apply(&mut self, completion: Completion) {
        match completion {
            Completion::Joined(Ok(joined)) => {
                self.join_pending = false;
                self.session.apply_join(joined);
                self.dirty = true;
            }
            Completion::Joined(Err(e)) => {
                self.join_pending = false;
                warn!("Join failed: {}", e);
            }
            Completion::Polled {
                seq,
                game_id,
                result: Ok(state),
            } => {
                if self.session.apply_poll(seq, &game_id, state) {
                    self.dirty = true;
                }
            }
            Completion::Polled {
                seq,
                result: Err(e),
                ..
            } => warn!("Poll #{} failed: {}", seq, e),
            Completion::Workers(workers) => {
                self.session.set_workers(workers);
                self.dirty = true;
            }
        }
    }

    /// Stops every timer and lets go of the authority. Exchanges still in
    /// flight finish into a closed channel.
    pub fn teardown(&mut self) {
        self.scheduler.teardown();
        if self.sync.take().is_some() {
            info!("Disconnected from authority");
        }
        self.exit = true;
    }

    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        while !self.exit {
            if self.take_dirty() {
                terminal.draw(|f| self.render(f))?;
            }

            let wait = self
                .scheduler
                .until_next(Instant::now())
                .unwrap_or(IDLE_WAIT);
            if event::poll(wait)? {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key.code),
                    Event::Resize(..) => self.dirty = true,
                    _ => {}
                }
            }

            self.drain_completions();
            self.pump(Instant::now());
        }

        self.teardown();
        Ok(())
    }

    fn title(&self) -> String {
        let mode = match self.session.mode() {
            Mode::Local => "local".to_owned(),
            Mode::Remote { game_id: Some(id) } => format!("game {id}"),
            Mode::Remote { game_id: None } => "joining...".to_owned(),
        };
        let key = self.session.last_key().map_or("-", |key| key.label());
        format!(
            "SNEK    {}    Status: {}    Last key: {}",
            mode,
            self.session.status(),
            key
        )
    }

    fn render(&self, frame: &mut Frame) {
        let layout = Layout::default()
            .direction(layout::Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Title + status
                Constraint::Min(0),    // Board and telemetry
            ])
            .split(frame.area());

        frame.render_widget(
            Paragraph::new(self.title())
                .alignment(Alignment::Left)
                .block(Block::default().borders(Borders::ALL)),
            layout[0],
        );

        let (board_width, board_height) = Board::footprint(self.session.size());
        let mut columns = vec![Constraint::Length(board_width + 2)];
        if self.session.is_remote() {
            columns.push(Constraint::Length(SIDEBAR_WIDTH));
        }
        let body = Layout::default()
            .direction(layout::Direction::Horizontal)
            .constraints(columns)
            .split(layout[1]);

        let board_area = Rect {
            height: body[0].height.min(board_height + 2),
            ..body[0]
        };
        let title = match self.session.status() {
            Status::Idle => "Press an arrow key to start",
            Status::Playing => "Playing",
        };
        let block = Block::default().title(title).borders(Borders::ALL);
        let inner_area = block.inner(board_area);
        frame.render_widget(block, board_area);
        frame.render_widget(Board::of(&self.session), inner_area);

        if let Some(sidebar) = body.get(1) {
            let block = Block::default().title("Workers").borders(Borders::ALL);
            let inner_area = block.inner(*sidebar);
            frame.render_widget(block, *sidebar);
            frame.render_widget(Workers(self.session.workers()), inner_area);
        }
    }
}
