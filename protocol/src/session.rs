//! One request/response exchange, bytes in and bytes out
//!
//! [`handle_one`] is the entry point the connection layer calls for every
//! message it reads. It has no memory: the same input always produces the
//! same output. [`Session`] wraps it for a single connection and keeps the
//! last exchange around for inspection and logging.

use crate::document::{self, Document};
use crate::player::PlayerRecord;
use crate::response::Response;
use crate::router;
use crate::schema;
use log::{debug, info};
use std::sync::Arc;

/// Runs parse, validate, route and serialize on one inbound message
pub fn handle_one(inbound: &[u8], player: &PlayerRecord) -> Vec<u8> {
    let (state, _) = exchange(inbound, player);
    document::serialize(&state.response)
}

/// Full record of a single exchange
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    /// Last request document, `None` when the bytes did not parse
    pub request: Option<Document>,
    /// Last response document sent back
    pub response: Document,
    /// Whether the last request passed the schema checks
    pub valid: bool,
}

fn exchange(inbound: &[u8], player: &PlayerRecord) -> (SessionState, Response) {
    let request = match document::parse(strip_terminators(inbound)) {
        Ok(request) => Some(request),
        Err(err) => {
            debug!("Request is not well-formed XML: {}", err);
            None
        }
    };

    let valid = match &request {
        Some(request) => match schema::check(request) {
            Ok(_) => true,
            Err(violation) => {
                debug!("Request failed schema check: {}", violation);
                false
            }
        },
        None => false,
    };

    let empty = Document::new();
    let response = router::respond(request.as_ref().unwrap_or(&empty), valid, player);

    let state = SessionState {
        request,
        response: response.to_document(),
        valid,
    };
    (state, response)
}

/// Legacy clients send C strings, so trailing NULs are not part of the message
fn strip_terminators(bytes: &[u8]) -> &[u8] {
    let end = bytes
        .iter()
        .rposition(|&byte| byte != 0)
        .map_or(0, |last| last + 1);
    &bytes[..end]
}

/// Per-connection protocol state
#[derive(Debug)]
pub struct Session {
    player: Arc<PlayerRecord>,
    state: SessionState,
    exchanges: u64,
}

impl Session {
    pub fn new(player: Arc<PlayerRecord>) -> Self {
        Self {
            player,
            state: SessionState::default(),
            exchanges: 0,
        }
    }

    /// Handles one message and records it as the session's latest exchange
    pub fn handle(&mut self, inbound: &[u8]) -> Vec<u8> {
        let (state, response) = exchange(inbound, &self.player);
        self.state = state;
        self.exchanges += 1;

        let outbound = document::serialize(&self.state.response);
        debug!("Request: {}", String::from_utf8_lossy(inbound));
        debug!("Response: {}", String::from_utf8_lossy(&outbound));

        info!(
            "Exchange {}: command={} status={}{}",
            self.exchanges,
            response.command,
            response.status.as_str(),
            response
                .error_message()
                .map(|message| format!(" error=\"{}\"", message))
                .unwrap_or_default()
        );

        outbound
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Number of messages handled so far
    pub fn exchanges(&self) -> u64 {
        self.exchanges
    }
}
