//! # Player Info Protocol
//!
//! The protocol engine behind the player info server. Clients send a small XML
//! request naming a command and a card number / PIN pair; the server answers
//! with an XML response carrying either the player's details or an error
//! message.
//!
//! ```text
//! bytes ──parse──▶ Document ──validate──▶ bool ──route──▶ Response ──serialize──▶ bytes
//! ```
//!
//! Nothing in this crate performs I/O. Sockets, framing and logging setup live
//! in the `server` crate, which calls [`handle_one`] (or a [`Session`]) once per
//! message it receives.
//!
//! ## Module Organization
//!
//! - `document`: XML tree, parser and canonical serializer
//! - `schema`: the nine structural checks a request must pass
//! - `request`: typed request extracted after validation
//! - `command`: command-name table
//! - `handler`: `GetPlayerInfo`
//! - `router`: validation verdict plus command to response
//! - `response`: response model and builders
//! - `player`: the player record the handler authenticates against
//! - `error`: failure taxonomy and wire error messages
//! - `session`: one exchange, bytes to bytes
//!
//! ## Example
//!
//! ```rust
//! use protocol::{handle_one, PlayerRecord, Request};
//!
//! let request = Request::new("GetPlayerInfo", "123456789", "1234");
//! let response = handle_one(&request.to_bytes(), &PlayerRecord::default());
//! assert!(String::from_utf8(response).unwrap().contains("<Status>Success</Status>"));
//! ```

pub mod command;
pub mod document;
pub mod error;
pub mod handler;
pub mod player;
pub mod request;
pub mod response;
pub mod router;
pub mod schema;
pub mod session;

pub use command::{Command, KnownCommand};
pub use document::{parse, serialize, Document, Element, Node, ParseError};
pub use error::{LookupMismatch, ProtocolError};
pub use player::{PlayerRecord, RecordError};
pub use request::Request;
pub use response::{Response, Row, Status};
pub use router::route;
pub use schema::{validate, SchemaViolation};
pub use session::{handle_one, Session, SessionState};
