//! Talking to a remote authority that owns the simulation.
//!
//! The [`Authority`] trait is the seam: [`HttpAuthority`] speaks to a real
//! coordinator, [`LoopbackAuthority`] plays one in-process. The
//! [`RemoteSyncClient`] runs each exchange off the UI thread and hands the
//! results back as [`Completion`]s.

mod client;
mod http;
mod loopback;
mod wire;

use std::io;

use thiserror::Error;

pub use client::{Completion, RemoteSyncClient};
pub use http::HttpAuthority;
pub use loopback::LoopbackAuthority;
pub use wire::{BoardState, GameId, JoinResponse, MoveRequest, NodeStatus};

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: Box<ureq::Error>,
    },
    #[error("could not read response from {url}: {source}")]
    Read {
        url: String,
        #[source]
        source: io::Error,
    },
    #[error("malformed response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("game {0} is not known to the authority")]
    UnknownGame(GameId),
}

/// Something that can run games on our behalf.
///
/// Every call is a single blocking request/response exchange.
pub trait Authority: Send + Sync {
    fn join(&self) -> Result<JoinResponse, SyncError>;

    /// Advisory; the reply carries nothing the client uses.
    fn send_move(&self, request: &MoveRequest) -> Result<(), SyncError>;

    fn fetch_state(&self, game_id: &GameId) -> Result<BoardState, SyncError>;

    fn fetch_workers(&self) -> Result<Vec<NodeStatus>, SyncError>;
}
