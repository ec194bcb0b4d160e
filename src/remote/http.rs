use std::time::Duration;

use log::debug;
use serde::de::DeserializeOwned;

use super::{Authority, BoardState, GameId, JoinResponse, MoveRequest, NodeStatus, SyncError};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Coordinator reached over plain HTTP/JSON.
pub struct HttpAuthority {
    agent: ureq::Agent,
    base_url: String,
}

impl HttpAuthority {
    pub fn new(base_url: &str) -> Self {
        HttpAuthority {
            agent: ureq::AgentBuilder::new().timeout(REQUEST_TIMEOUT).build(),
            base_url: base_url.trim_end_matches('/').to_owned(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn failed(url: &str, source: ureq::Error) -> SyncError {
        SyncError::Request {
            url: url.to_owned(),
            source: Box::new(source),
        }
    }

    fn read<T: DeserializeOwned>(url: &str, response: ureq::Response) -> Result<T, SyncError> {
        let body = response.into_string().map_err(|source| SyncError::Read {
            url: url.to_owned(),
            source,
        })?;
        serde_json::from_str(&body).map_err(|source| SyncError::Decode {
            url: url.to_owned(),
            source,
        })
    }
}

impl Authority for HttpAuthority {
    fn join(&self) -> Result<JoinResponse, SyncError> {
        let url = self.url("/join");
        let response = self
            .agent
            .post(&url)
            .call()
            .map_err(|e| Self::failed(&url, e))?;
        Self::read(&url, response)
    }

    fn send_move(&self, request: &MoveRequest) -> Result<(), SyncError> {
        let url = self.url("/move");
        let response = self
            .agent
            .post(&url)
            .send_json(request)
            .map_err(|e| Self::failed(&url, e))?;
        debug!("Move acknowledged with status {}", response.status());
        Ok(())
    }

    fn fetch_state(&self, game_id: &GameId) -> Result<BoardState, SyncError> {
        let url = self.url(&format!("/state/{game_id}"));
        let response = self
            .agent
            .get(&url)
            .call()
            .map_err(|e| Self::failed(&url, e))?;
        Self::read(&url, response)
    }

    fn fetch_workers(&self) -> Result<Vec<NodeStatus>, SyncError> {
        let url = self.url("/workers");
        let response = self
            .agent
            .get(&url)
            .call()
            .map_err(|e| Self::failed(&url, e))?;
        Self::read(&url, response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Pos;

    #[test]
    fn test_trailing_slash_trimmed() {
        let authority = HttpAuthority::new("http://127.0.0.1:8000/");
        assert_eq!(authority.url("/join"), "http://127.0.0.1:8000/join");
    }

    #[test]
    fn test_read_state_body() {
        let response = ureq::Response::new(
            200,
            "OK",
            r#"{"snake": [{"x": 3, "y": 4}], "food": {"x": 0, "y": 0}}"#,
        )
        .unwrap();
        let state: BoardState = HttpAuthority::read("http://test/state/g1", response).unwrap();
        assert_eq!(state.snake.head(), Some(Pos { x: 3, y: 4 }));
    }

    #[test]
    fn test_read_garbage_is_decode_error() {
        let response = ureq::Response::new(200, "OK", "<html>nope</html>").unwrap();
        let result: Result<BoardState, _> = HttpAuthority::read("http://test/state/g1", response);
        assert!(matches!(result, Err(SyncError::Decode { .. })));
    }

    #[test]
    fn test_unreachable_host_is_request_error() {
        // Port 9 on loopback is discard; nothing should be listening there.
        let authority = HttpAuthority::new("http://127.0.0.1:9");
        assert!(matches!(
            authority.fetch_workers(),
            Err(SyncError::Request { .. })
        ));
    }
}
