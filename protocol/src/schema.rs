//! Structural validation of inbound request documents
//!
//! A request is accepted only when it has exactly this shape:
//!
//! ```text
//! Request
//!   Command                 one text node
//!   Data
//!     Row[Type=CardNumber]  one text node
//!     Row[Type=PIN]         one text node
//! ```
//!
//! The checks run in a fixed order and stop at the first failure. Later
//! checks rely on nodes located by earlier ones.

use crate::document::{Document, Element, Node};
use thiserror::Error;

pub const REQUEST: &str = "Request";
pub const COMMAND: &str = "Command";
pub const DATA: &str = "Data";
pub const ROW: &str = "Row";
pub const TYPE: &str = "Type";
pub const CARD_NUMBER: &str = "CardNumber";
pub const PIN: &str = "PIN";

/// The first structural check a request failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SchemaViolation {
    #[error("no top-level <Request> element")]
    MissingRequest,

    #[error("<Request> has no <{0}> child")]
    MissingSection(&'static str),

    #[error("<Data> has no Row with Type={0}")]
    MissingRow(&'static str),

    #[error("document has nodes besides <Request>")]
    StrayTopLevelNode,

    #[error("<Request> may only contain <Command> and <Data>")]
    UnexpectedRequestChild,

    #[error("<Command> must hold exactly one text node")]
    CommandNotText,

    #[error("<Data> must hold exactly two Row elements")]
    MalformedData,

    #[error("Row Type={0} must hold exactly one text node")]
    RowNotText(&'static str),
}

/// Text fields of a request that passed every check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestFields<'a> {
    pub command: &'a str,
    pub card_number: &'a str,
    pub pin: &'a str,
}

/// Returns `true` when the document is a well-formed protocol request
pub fn validate(document: &Document) -> bool {
    check(document).is_ok()
}

/// Runs the structural checks in order, returning the request fields on success
pub fn check(document: &Document) -> Result<RequestFields<'_>, SchemaViolation> {
    let request = document
        .child(REQUEST)
        .ok_or(SchemaViolation::MissingRequest)?;

    let command = request
        .child(COMMAND)
        .ok_or(SchemaViolation::MissingSection(COMMAND))?;
    let data = request
        .child(DATA)
        .ok_or(SchemaViolation::MissingSection(DATA))?;

    let card_row = data
        .find_child_with_attribute(ROW, TYPE, CARD_NUMBER)
        .ok_or(SchemaViolation::MissingRow(CARD_NUMBER))?;
    let pin_row = data
        .find_child_with_attribute(ROW, TYPE, PIN)
        .ok_or(SchemaViolation::MissingRow(PIN))?;

    if document.nodes().len() != 1 {
        return Err(SchemaViolation::StrayTopLevelNode);
    }

    let sections_only = request
        .children()
        .iter()
        .all(|child| matches!(child.name(), Some(COMMAND) | Some(DATA)));
    if !sections_only || request.children().len() != 2 {
        return Err(SchemaViolation::UnexpectedRequestChild);
    }

    let command = sole_text(command).ok_or(SchemaViolation::CommandNotText)?;

    if data.children().len() != 2 || data.children().iter().any(Node::is_text) {
        return Err(SchemaViolation::MalformedData);
    }

    let card_number = sole_text(card_row).ok_or(SchemaViolation::RowNotText(CARD_NUMBER))?;
    let pin = sole_text(pin_row).ok_or(SchemaViolation::RowNotText(PIN))?;

    Ok(RequestFields {
        command,
        card_number,
        pin,
    })
}

fn sole_text(element: &Element) -> Option<&str> {
    match element.children() {
        [Node::Text(text)] => Some(text),
        _ => None,
    }
}
