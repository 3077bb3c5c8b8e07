//! Protocol outcomes that end in a `Fail` response
//!
//! None of these are fatal: each maps onto a complete response whose error
//! row carries the `Display` text of the error.

use crate::document::ParseError;
use crate::schema::SchemaViolation;
use thiserror::Error;

/// Credentials that do not match the player record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LookupMismatch {
    #[error("Invalid Card Number")]
    CardNumber,

    #[error("Invalid PIN")]
    Pin,
}

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("Invalid Request Format")]
    MalformedDocument(#[source] ParseError),

    #[error("Invalid Request Format")]
    SchemaViolation(#[source] SchemaViolation),

    #[error("Invalid Command")]
    UnsupportedCommand(String),

    #[error(transparent)]
    LookupMismatch(#[from] LookupMismatch),
}

impl From<ParseError> for ProtocolError {
    fn from(err: ParseError) -> Self {
        ProtocolError::MalformedDocument(err)
    }
}

impl From<SchemaViolation> for ProtocolError {
    fn from(err: SchemaViolation) -> Self {
        ProtocolError::SchemaViolation(err)
    }
}
