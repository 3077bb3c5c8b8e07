//! Typed form of a validated request
//!
//! Once a document passes the schema checks its three text fields are copied
//! into a [`Request`], and nothing downstream looks at the tree again.

use crate::document::{Document, Element};
use crate::schema::{self, RequestFields, SchemaViolation};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub command: String,
    pub card_number: String,
    pub pin: String,
}

impl Request {
    pub fn new(
        command: impl Into<String>,
        card_number: impl Into<String>,
        pin: impl Into<String>,
    ) -> Self {
        Self {
            command: command.into(),
            card_number: card_number.into(),
            pin: pin.into(),
        }
    }

    /// Validates the document and extracts its fields
    pub fn from_document(document: &Document) -> Result<Self, SchemaViolation> {
        schema::check(document).map(Request::from)
    }

    /// Builds the wire document for this request
    pub fn to_document(&self) -> Document {
        Document::with_root(
            Element::new(schema::REQUEST)
                .with_child(Element::new(schema::COMMAND).with_text(self.command.as_str()))
                .with_child(
                    Element::new(schema::DATA)
                        .with_child(row(schema::CARD_NUMBER, &self.card_number))
                        .with_child(row(schema::PIN, &self.pin)),
                ),
        )
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        crate::document::serialize(&self.to_document())
    }
}

impl From<RequestFields<'_>> for Request {
    fn from(fields: RequestFields<'_>) -> Self {
        Request::new(fields.command, fields.card_number, fields.pin)
    }
}

fn row(kind: &str, value: &str) -> Element {
    Element::new(schema::ROW)
        .with_attribute(schema::TYPE, kind)
        .with_text(value)
}
