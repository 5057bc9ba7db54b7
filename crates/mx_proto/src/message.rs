//! `m.room.message` events.

use mime::Mime;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use tracing::{debug, warn};

use crate::content::{required_str, EventContent};
use crate::error::ProtoError;
use crate::JsonObject;

const MSGTYPE_KEY: &str = "msgtype";
const BODY_KEY: &str = "body";
const TYPE_KEY: &str = "type";
const CONTENT_KEY: &str = "content";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MsgType {
    Text,
    Emote,
    Notice,
    Image,
    File,
    Location,
    Video,
    Audio,
    Unknown,
}

const MSG_TYPES: &[(MsgType, &str)] = &[
    (MsgType::Text, "m.text"),
    (MsgType::Emote, "m.emote"),
    (MsgType::Notice, "m.notice"),
    (MsgType::Image, "m.image"),
    (MsgType::File, "m.file"),
    (MsgType::Location, "m.location"),
    (MsgType::Video, "m.video"),
    (MsgType::Audio, "m.audio"),
];

impl MsgType {
    /// Map a wire msgtype; anything unrecognised is `Unknown`.
    pub fn from_wire(raw: &str) -> Self {
        MSG_TYPES
            .iter()
            .find(|(_, wire)| *wire == raw)
            .map(|(msgtype, _)| *msgtype)
            .unwrap_or(MsgType::Unknown)
    }

    /// The wire string; empty for `Unknown`.
    pub fn as_wire(self) -> &'static str {
        MSG_TYPES
            .iter()
            .find(|(msgtype, _)| *msgtype == self)
            .map(|(_, wire)| *wire)
            .unwrap_or("")
    }
}

/// A room message: msgtype, plain-text body, and optional typed content.
///
/// Immutable once built. The raw msgtype string is kept as received so
/// that unknown types survive re-serialisation.
#[derive(Debug, Clone, PartialEq)]
pub struct RoomMessageEvent {
    msgtype: String,
    plain_body: String,
    content: Option<EventContent>,
}

impl RoomMessageEvent {
    pub const TYPE_ID: &'static str = "m.room.message";

    /// Build an outgoing event.
    ///
    /// Plain-text `TextContent` is dropped: on the wire it is only the
    /// `body`, which `plain_body` already supplies.
    pub fn new(
        plain_body: impl Into<String>,
        raw_msgtype: impl Into<String>,
        content: Option<EventContent>,
    ) -> Self {
        let content = content.filter(|content| match content {
            EventContent::Text(text) => text.is_html(),
            _ => true,
        });
        Self {
            msgtype: raw_msgtype.into(),
            plain_body: plain_body.into(),
            content,
        }
    }

    pub fn with_type(
        plain_body: impl Into<String>,
        msgtype: MsgType,
        content: Option<EventContent>,
    ) -> Self {
        Self::new(plain_body, msgtype.as_wire(), content)
    }

    /// Parse an event content object.
    ///
    /// `msgtype` and `body` are mandatory. Typed content that fails to parse
    /// is dropped with a warning; the event itself still loads.
    pub fn from_json(json: &JsonObject) -> Result<Self, ProtoError> {
        let msgtype = required_str(json, MSGTYPE_KEY)?;
        let plain_body = required_str(json, BODY_KEY)?;

        let kind = MsgType::from_wire(&msgtype);
        if kind == MsgType::Unknown {
            debug!(%msgtype, "unrecognised msgtype, loading body only");
        }
        let content = match EventContent::from_json(kind, json) {
            None => None,
            Some(Ok(content)) => Some(content),
            Some(Err(err)) => {
                warn!(%msgtype, error = %err, "couldn't load message content, dropping it");
                None
            }
        };

        Ok(Self {
            msgtype,
            plain_body,
            content,
        })
    }

    /// Parse an event content object from raw JSON text.
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, ProtoError> {
        let json: JsonObject = serde_json::from_slice(bytes)?;
        Self::from_json(&json)
    }

    /// Parse a whole event: `{"type": "m.room.message", "content": {...}}`.
    pub fn from_event_json(event: &JsonObject) -> Result<Self, ProtoError> {
        let event_type = required_str(event, TYPE_KEY)?;
        if event_type != Self::TYPE_ID {
            return Err(ProtoError::WrongEventType {
                expected: Self::TYPE_ID,
                found: event_type,
            });
        }
        match event.get(CONTENT_KEY) {
            Some(Value::Object(content)) => Self::from_json(content),
            Some(_) => Err(ProtoError::NotAnObject(CONTENT_KEY)),
            None => Err(ProtoError::MissingField(CONTENT_KEY)),
        }
    }

    pub fn msgtype(&self) -> MsgType {
        MsgType::from_wire(&self.msgtype)
    }

    pub fn raw_msgtype(&self) -> &str {
        &self.msgtype
    }

    pub fn plain_body(&self) -> &str {
        &self.plain_body
    }

    pub fn content(&self) -> Option<&EventContent> {
        self.content.as_ref()
    }

    pub fn mime_type(&self) -> Mime {
        self.content
            .as_ref()
            .map(EventContent::mime_type)
            .unwrap_or(mime::TEXT_PLAIN)
    }

    pub fn has_file_content(&self) -> bool {
        self.content.as_ref().is_some_and(EventContent::is_file)
    }

    /// The content object: typed content keys at the top level, then
    /// `msgtype` and `body`.
    pub fn to_json(&self) -> JsonObject {
        let mut json = self
            .content
            .as_ref()
            .map(EventContent::to_json)
            .unwrap_or_default();
        json.insert(MSGTYPE_KEY.into(), self.msgtype.clone().into());
        json.insert(BODY_KEY.into(), self.plain_body.clone().into());
        json
    }

    pub fn to_event_json(&self) -> JsonObject {
        let mut event = JsonObject::new();
        event.insert(TYPE_KEY.into(), Self::TYPE_ID.into());
        event.insert(CONTENT_KEY.into(), Value::Object(self.to_json()));
        event
    }
}

impl Serialize for RoomMessageEvent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for RoomMessageEvent {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let json = JsonObject::deserialize(deserializer)?;
        Self::from_json(&json).map_err(D::Error::custom)
    }
}
