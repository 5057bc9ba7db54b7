//! Typed content of `m.room.message` events.
//!
//! Each variant owns a set of keys in the event's content object: some at
//! the top level, the rest under `info`. [`EventContent`] is the closed set
//! of variants the message event dispatches to by msgtype.

mod location;
mod playable;
mod text;
mod url_based;

use mime::Mime;
use serde_json::Value;

use crate::error::ProtoError;
use crate::message::MsgType;
use crate::JsonObject;

pub use location::LocationContent;
pub use playable::{AudioContent, Playable, VideoContent};
pub use text::{TextContent, HTML_FORMAT};
pub use url_based::{FileContent, ImageContent, UrlBasedContent, UrlWithThumbnailContent};

pub const INFO_KEY: &str = "info";

/// A content shape with its own JSON encoding.
pub trait TypedContent: Sized {
    /// Parse from the event's content object. Fails only when a mandatory
    /// top-level key is missing or mistyped.
    fn from_json(json: &JsonObject) -> Result<Self, ProtoError>;

    fn mime_type(&self) -> Mime;

    /// Write this content's keys into `json`, merging into an `info`
    /// object that may already be there.
    fn fill_json(&self, json: &mut JsonObject);

    fn to_json(&self) -> JsonObject {
        let mut json = JsonObject::new();
        self.fill_json(&mut json);
        json
    }
}

/// Content that keeps metadata in an `info` subtree, and so can be
/// wrapped by [`Playable`].
pub trait InfoContent: TypedContent {}

#[derive(Debug, Clone, PartialEq)]
pub enum EventContent {
    Text(TextContent),
    Image(ImageContent),
    File(FileContent),
    Location(LocationContent),
    Video(VideoContent),
    Audio(AudioContent),
}

impl EventContent {
    /// Parse the variant that belongs to `msgtype`.
    ///
    /// `None` when the msgtype carries no typed content: unknown types, and
    /// text/emote/notice bodies that are not rich text.
    pub fn from_json(msgtype: MsgType, json: &JsonObject) -> Option<Result<Self, ProtoError>> {
        let parsed = match msgtype {
            MsgType::Text | MsgType::Emote | MsgType::Notice => {
                if !TextContent::is_rich(json) {
                    return None;
                }
                TextContent::from_json(json).map(Self::Text)
            }
            MsgType::Image => ImageContent::from_json(json).map(Self::Image),
            MsgType::File => FileContent::from_json(json).map(Self::File),
            MsgType::Location => LocationContent::from_json(json).map(Self::Location),
            MsgType::Video => VideoContent::from_json(json).map(Self::Video),
            MsgType::Audio => AudioContent::from_json(json).map(Self::Audio),
            MsgType::Unknown => return None,
        };
        Some(parsed)
    }

    pub fn mime_type(&self) -> Mime {
        match self {
            Self::Text(c) => c.mime_type(),
            Self::Image(c) => c.mime_type(),
            Self::File(c) => c.mime_type(),
            Self::Location(c) => c.mime_type(),
            Self::Video(c) => c.mime_type(),
            Self::Audio(c) => c.mime_type(),
        }
    }

    pub fn fill_json(&self, json: &mut JsonObject) {
        match self {
            Self::Text(c) => c.fill_json(json),
            Self::Image(c) => c.fill_json(json),
            Self::File(c) => c.fill_json(json),
            Self::Location(c) => c.fill_json(json),
            Self::Video(c) => c.fill_json(json),
            Self::Audio(c) => c.fill_json(json),
        }
    }

    pub fn to_json(&self) -> JsonObject {
        let mut json = JsonObject::new();
        self.fill_json(&mut json);
        json
    }

    /// Whether there is a downloadable payload behind a URL.
    pub fn is_file(&self) -> bool {
        matches!(
            self,
            Self::Image(_) | Self::File(_) | Self::Video(_) | Self::Audio(_)
        )
    }
}

pub(crate) fn required_str(json: &JsonObject, key: &'static str) -> Result<String, ProtoError> {
    match json.get(key) {
        None | Some(Value::Null) => Err(ProtoError::MissingField(key)),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(ProtoError::InvalidField {
            key,
            expected: "string",
        }),
    }
}

pub(crate) fn optional_str(json: &JsonObject, key: &str) -> Option<String> {
    json.get(key).and_then(Value::as_str).map(str::to_string)
}

/// A copy of `json[key]` if it is an object, otherwise an empty one.
pub(crate) fn object_or_empty(json: &JsonObject, key: &str) -> JsonObject {
    json.get(key)
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default()
}

/// Remove `json[key]` for editing, treating anything but an object as empty.
pub(crate) fn take_object(json: &mut JsonObject, key: &str) -> JsonObject {
    match json.remove(key) {
        Some(Value::Object(object)) => object,
        _ => JsonObject::new(),
    }
}
