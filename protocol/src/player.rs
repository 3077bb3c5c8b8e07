//! Player record lookup store
//!
//! There is no database: the handler is given a single read-only record. The
//! default record is the built-in test fixture; the server can substitute one
//! loaded from JSON.

use crate::document::is_xml_char;
use crate::error::LookupMismatch;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reasons a JSON player record is refused
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("invalid player record JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("field {field} contains {ch:?}, which cannot appear in XML")]
    InvalidCharacter { field: &'static str, ch: char },
}

/// A player's card credentials and contact details
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub card_number: String,
    pub pin: String,
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
}

impl Default for PlayerRecord {
    fn default() -> Self {
        Self {
            card_number: "123456789".to_string(),
            pin: "1234".to_string(),
            first_name: "Dayton".to_string(),
            last_name: "Flores".to_string(),
            address: "123 Las Vegas Blvd".to_string(),
            city: "Las Vegas".to_string(),
            state: "NV".to_string(),
            zip_code: "55555".to_string(),
        }
    }
}

impl PlayerRecord {
    /// Reads a record from a JSON object with snake_case field names.
    ///
    /// Every field ends up in a response row, so values XML cannot carry are refused.
    pub fn from_json(json: &str) -> Result<Self, RecordError> {
        let player: Self = serde_json::from_str(json)?;
        for (field, value) in player.fields() {
            if let Some(ch) = value.chars().find(|&c| !is_xml_char(c)) {
                return Err(RecordError::InvalidCharacter { field, ch });
            }
        }
        Ok(player)
    }

    fn fields(&self) -> [(&'static str, &str); 8] {
        [
            ("card_number", self.card_number.as_str()),
            ("pin", self.pin.as_str()),
            ("first_name", self.first_name.as_str()),
            ("last_name", self.last_name.as_str()),
            ("address", self.address.as_str()),
            ("city", self.city.as_str()),
            ("state", self.state.as_str()),
            ("zip_code", self.zip_code.as_str()),
        ]
    }

    /// Checks the card number first, then the PIN
    pub fn authenticate(&self, card_number: &str, pin: &str) -> Result<&Self, LookupMismatch> {
        if card_number != self.card_number {
            return Err(LookupMismatch::CardNumber);
        }
        if pin != self.pin {
            return Err(LookupMismatch::Pin);
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_fixture() {
        let player = PlayerRecord::default();
        assert_eq!(player.card_number, "123456789");
        assert_eq!(player.pin, "1234");
        assert_eq!(player.first_name, "Dayton");
        assert_eq!(player.zip_code, "55555");
    }

    #[test]
    fn test_authenticate_success() {
        let player = PlayerRecord::default();
        assert_eq!(player.authenticate("123456789", "1234"), Ok(&player));
    }

    #[test]
    fn test_card_checked_before_pin() {
        let player = PlayerRecord::default();
        assert_eq!(
            player.authenticate("000000000", "9999"),
            Err(LookupMismatch::CardNumber)
        );
        assert_eq!(
            player.authenticate("000000000", "1234"),
            Err(LookupMismatch::CardNumber)
        );
        assert_eq!(
            player.authenticate("123456789", "9999"),
            Err(LookupMismatch::Pin)
        );
    }

    #[test]
    fn test_match_is_exact() {
        let player = PlayerRecord::default();
        assert!(player.authenticate(" 123456789", "1234").is_err());
        assert!(player.authenticate("123456789", "1234 ").is_err());
    }

    #[test]
    fn test_from_json() {
        let json = r#"{
            "card_number": "42",
            "pin": "0000",
            "first_name": "Ada",
            "last_name": "Lovelace",
            "address": "1 Analytical Way",
            "city": "London",
            "state": "LDN",
            "zip_code": "10101"
        }"#;

        let player = PlayerRecord::from_json(json).unwrap();
        assert_eq!(player.card_number, "42");
        assert_eq!(player.city, "London");
        assert!(PlayerRecord::from_json("{\"card_number\": \"42\"}").is_err());
    }

    #[test]
    fn test_from_json_rejects_control_characters() {
        let json = r#"{
            "card_number": "123456789",
            "pin": "1234",
            "first_name": "Dayton",
            "last_name": "Flores",
            "address": "Unit\u00014",
            "city": "Las Vegas",
            "state": "NV",
            "zip_code": "55555"
        }"#;

        assert!(matches!(
            PlayerRecord::from_json(json),
            Err(RecordError::InvalidCharacter {
                field: "address",
                ch: '\u{1}'
            })
        ));
        assert!(matches!(
            PlayerRecord::from_json("not json"),
            Err(RecordError::Json(_))
        ));
    }
}
