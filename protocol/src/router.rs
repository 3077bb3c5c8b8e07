//! Turns a checked request document into a response document

use crate::command::{Command, KnownCommand};
use crate::document::Document;
use crate::error::ProtocolError;
use crate::handler;
use crate::player::PlayerRecord;
use crate::request::Request;
use crate::response::Response;

/// Builds the response document for a request.
///
/// When `valid` is false the request is never inspected.
pub fn route(request: &Document, valid: bool, player: &PlayerRecord) -> Document {
    respond(request, valid, player).to_document()
}

/// Same as [`route`], stopping before the response is turned into a document
pub fn respond(request: &Document, valid: bool, player: &PlayerRecord) -> Response {
    if !valid {
        return Response::request_not_valid();
    }

    Request::from_document(request)
        .map_err(ProtocolError::from)
        .and_then(|request| dispatch(&request, player))
        .unwrap_or_else(|err| Response::from_error(&err))
}

/// Runs the handler registered for the request's command
pub fn dispatch(request: &Request, player: &PlayerRecord) -> Result<Response, ProtocolError> {
    match Command::resolve(&request.command) {
        Command::Known(KnownCommand::GetPlayerInfo) => handler::get_player_info(request, player),
        Command::Unknown(name) => Err(ProtocolError::UnsupportedCommand(name)),
    }
}
