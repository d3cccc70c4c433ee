//! Wire message types and JSON framing.
//!
//! The protocol has exactly two frame shapes, both JSON text: the string
//! `"clear"` and an entity update object. Decoding happens once at the
//! connection boundary into a tagged [`WireMessage`]; anything else is a
//! protocol error rather than a parse exception propagating out of the
//! receive loop.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::Attributes;
use crate::error::ProtocolError;

/// The bare clear token. Historical clients send it as a raw unquoted
/// frame; the canonical outbound form is the JSON string `"clear"`.
pub const CLEAR_TOKEN: &str = "clear";

/// Wholesale replacement of one entity's attribute map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityUpdate {
    /// Entity key, unique within the world.
    pub entity: String,
    /// The entity's full new attribute map.
    pub data: Attributes,
}

/// One decoded wire frame, in either direction.
#[derive(Debug, Clone, PartialEq)]
pub enum WireMessage {
    /// Wipe every entity from the world.
    Clear,
    /// Replace one entity's attributes wholesale.
    Entity(EntityUpdate),
}

impl WireMessage {
    /// Decodes one inbound text frame.
    ///
    /// Accepts the raw frame `clear`, the JSON string `"clear"`, and an
    /// object with `entity` (string) and `data` (object) fields. Unknown
    /// top-level fields on an update object are ignored and not re-encoded.
    ///
    /// # Errors
    ///
    /// Returns a [`ProtocolError`] for invalid JSON, an update object with
    /// missing or mistyped fields, or any other JSON shape.
    pub fn decode(text: &str) -> Result<Self, ProtocolError> {
        if text == CLEAR_TOKEN {
            return Ok(Self::Clear);
        }
        let value: Value = serde_json::from_str(text)?;
        match value {
            Value::String(s) if s == CLEAR_TOKEN => Ok(Self::Clear),
            value @ Value::Object(_) => {
                let update: EntityUpdate =
                    serde_json::from_value(value).map_err(ProtocolError::InvalidUpdate)?;
                Ok(Self::Entity(update))
            }
            _ => Err(ProtocolError::UnsupportedShape),
        }
    }

    /// Encodes this message as one outbound JSON text frame.
    #[must_use]
    pub fn encode(&self) -> String {
        match self {
            Self::Clear => format!("\"{CLEAR_TOKEN}\""),
            Self::Entity(update) => serde_json::to_string(update).unwrap_or_default(),
        }
    }
}
