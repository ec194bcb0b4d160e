use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use log::{error, warn};

use super::{Authority, BoardState, GameId, JoinResponse, MoveRequest, NodeStatus, SyncError};
use crate::grid::Direction;

/// Result of a finished exchange, waiting to be applied on the UI thread.
#[derive(Debug)]
pub enum Completion {
    Joined(Result<JoinResponse, SyncError>),
    Polled {
        seq: u64,
        game_id: GameId,
        result: Result<BoardState, SyncError>,
    },
    Workers(Vec<NodeStatus>),
}

/// Runs exchanges with the authority off the UI thread.
///
/// Join, poll and telemetry each get their own thread. Moves share one
/// worker so they reach the authority in the order they were pressed.
/// Nothing here touches game state; finished exchanges queue up as
/// [`Completion`]s and late ones are discarded once the client is dropped.
pub struct RemoteSyncClient {
    authority: Arc<dyn Authority>,
    tx: Sender<Completion>,
    rx: Receiver<Completion>,
    moves: Option<Sender<MoveRequest>>,
    next_poll_seq: u64,
}

fn spawn_move_worker(authority: Arc<dyn Authority>) -> Option<Sender<MoveRequest>> {
    let (tx, rx) = mpsc::channel::<MoveRequest>();
    let spawned = thread::Builder::new()
        .name("sync-moves".to_owned())
        .spawn(move || {
            // Ends when the client drops its sender
            for request in rx {
                if let Err(e) = authority.send_move(&request) {
                    warn!(
                        "Move {:?} for game {} was not delivered: {}",
                        request.direction, request.game_id, e
                    );
                }
            }
        });

    match spawned {
        Ok(_) => Some(tx),
        Err(e) => {
            error!("Could not start move worker: {}", e);
            None
        }
    }
}

impl RemoteSyncClient {
    pub fn new(authority: Arc<dyn Authority>) -> Self {
        let (tx, rx) = mpsc::channel();
        RemoteSyncClient {
            moves: spawn_move_worker(Arc::clone(&authority)),
            authority,
            tx,
            rx,
            next_poll_seq: 0,
        }
    }

    fn spawn_exchange<F>(&self, name: &str, exchange: F)
    where
        F: FnOnce(&dyn Authority) -> Option<Completion> + Send + 'static,
    {
        let authority = Arc::clone(&self.authority);
        let tx = self.tx.clone();
        let spawned = thread::Builder::new()
            .name(format!("sync-{name}"))
            .spawn(move || {
                if let Some(completion) = exchange(authority.as_ref()) {
                    // The receiver is gone after teardown
                    let _ = tx.send(completion);
                }
            });

        if let Err(e) = spawned {
            error!("Could not start {} exchange: {}", name, e);
        }
    }

    pub fn join(&self) {
        self.spawn_exchange("join", |authority| {
            Some(Completion::Joined(authority.join()))
        });
    }

    /// Fire-and-forget. Failures are logged and never reported back.
    pub fn send_move(&self, game_id: GameId, direction: Direction) {
        let request = MoveRequest { game_id, direction };
        let queued = self
            .moves
            .as_ref()
            .is_some_and(|moves| moves.send(request).is_ok());
        if !queued {
            warn!("Move worker is gone, {:?} not sent", direction);
        }
    }

    /// Starts a state poll and returns its sequence number. Later polls
    /// always get larger numbers.
    pub fn poll(&mut self, game_id: GameId) -> u64 {
        self.next_poll_seq += 1;
        let seq = self.next_poll_seq;
        self.spawn_exchange("poll", move |authority| {
            let result = authority.fetch_state(&game_id);
            Some(Completion::Polled {
                seq,
                game_id,
                result,
            })
        });
        seq
    }

    pub fn fetch_workers(&self) {
        self.spawn_exchange("workers", |authority| {
            let workers = authority.fetch_workers().unwrap_or_else(|e| {
                warn!("Worker status unavailable: {}", e);
                Vec::new()
            });
            Some(Completion::Workers(workers))
        });
    }

    pub fn try_recv(&self) -> Option<Completion> {
        self.rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<Completion> {
        match self.rx.recv_timeout(timeout) {
            Ok(completion) => Some(completion),
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => None,
        }
    }
}
