//! Command handlers

use crate::error::ProtocolError;
use crate::player::PlayerRecord;
use crate::request::Request;
use crate::response::Response;

/// Looks the player up by card number and PIN.
///
/// A wrong card number is reported even when the PIN is also wrong.
pub fn get_player_info(request: &Request, player: &PlayerRecord) -> Result<Response, ProtocolError> {
    let player = player.authenticate(&request.card_number, &request.pin)?;
    Ok(Response::player_info(player))
}
