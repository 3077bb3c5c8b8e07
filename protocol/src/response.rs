//! Response documents
//!
//! Every outcome, successful or not, produces the same shape:
//!
//! ```text
//! Response
//!   Command   echoed command name, or "Unknown"
//!   Status    "Success" | "Fail"
//!   Data      zero or more Row[Type=...] elements
//! ```

use crate::command::KnownCommand;
use crate::document::{Document, Element, Node};
use crate::error::ProtocolError;
use crate::player::PlayerRecord;
use crate::schema::{COMMAND, DATA, ROW, TYPE};

pub const RESPONSE: &str = "Response";
pub const STATUS: &str = "Status";
pub const ERROR_MESSAGE: &str = "ErrorMessage";
pub const UNKNOWN_COMMAND: &str = "Unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    Fail,
}

impl Status {
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Success => "Success",
            Status::Fail => "Fail",
        }
    }

    fn from_wire(text: &str) -> Option<Self> {
        match text {
            "Success" => Some(Status::Success),
            "Fail" => Some(Status::Fail),
            _ => None,
        }
    }
}

/// One `Row[Type=kind]` entry of the response data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub kind: String,
    pub value: String,
}

impl Row {
    pub fn new(kind: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub command: String,
    pub status: Status,
    pub rows: Vec<Row>,
}

impl Response {
    /// Full player details, rows in wire order
    pub fn player_info(player: &PlayerRecord) -> Self {
        Self {
            command: KnownCommand::GetPlayerInfo.name().to_string(),
            status: Status::Success,
            rows: vec![
                Row::new("CardNumber", player.card_number.as_str()),
                Row::new("FirstName", player.first_name.as_str()),
                Row::new("LastName", player.last_name.as_str()),
                Row::new("Address", player.address.as_str()),
                Row::new("City", player.city.as_str()),
                Row::new("State", player.state.as_str()),
                Row::new("ZipCode", player.zip_code.as_str()),
            ],
        }
    }

    /// A `Fail` response with a single error row
    pub fn failure(command: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            status: Status::Fail,
            rows: vec![Row::new(ERROR_MESSAGE, message)],
        }
    }

    pub fn request_not_valid() -> Self {
        Self::failure(UNKNOWN_COMMAND, "Invalid Request Format")
    }

    pub fn unknown_command() -> Self {
        Self::failure(UNKNOWN_COMMAND, "Invalid Command")
    }

    /// Maps a protocol failure onto its response.
    ///
    /// Lookup failures belong to `GetPlayerInfo`; everything else is reported
    /// against the `Unknown` command.
    pub fn from_error(err: &ProtocolError) -> Self {
        let command = match err {
            ProtocolError::LookupMismatch(_) => KnownCommand::GetPlayerInfo.name(),
            _ => UNKNOWN_COMMAND,
        };
        Self::failure(command, err.to_string())
    }

    pub fn is_success(&self) -> bool {
        self.status == Status::Success
    }

    /// Value of the first row with the given type
    pub fn row(&self, kind: &str) -> Option<&str> {
        self.rows
            .iter()
            .find(|row| row.kind == kind)
            .map(|row| row.value.as_str())
    }

    pub fn error_message(&self) -> Option<&str> {
        self.row(ERROR_MESSAGE)
    }

    pub fn to_document(&self) -> Document {
        let mut data = Element::new(DATA);
        for row in &self.rows {
            data.push_child(Node::Element(
                Element::new(ROW)
                    .with_attribute(TYPE, row.kind.as_str())
                    .with_text(row.value.as_str()),
            ));
        }

        Document::with_root(
            Element::new(RESPONSE)
                .with_child(Element::new(COMMAND).with_text(self.command.as_str()))
                .with_child(Element::new(STATUS).with_text(self.status.as_str()))
                .with_child(data),
        )
    }

    /// Reads a response document back, for clients and tests.
    ///
    /// Returns `None` when the document does not have the response shape.
    pub fn from_document(document: &Document) -> Option<Self> {
        let root = document.child(RESPONSE)?;
        let command = root.child(COMMAND)?.text().unwrap_or_default().to_string();
        let status = Status::from_wire(root.child(STATUS)?.text()?)?;

        let rows = match root.child(DATA) {
            Some(data) => data
                .children_named(ROW)
                .map(|row| {
                    Some(Row::new(
                        row.attribute(TYPE)?,
                        row.text().unwrap_or_default(),
                    ))
                })
                .collect::<Option<Vec<_>>>()?,
            None => Vec::new(),
        };

        Some(Self {
            command,
            status,
            rows,
        })
    }
}
