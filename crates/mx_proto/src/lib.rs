//! mx_proto — Matrix message event content and its JSON wire format
//!
//! # Modules
//! - `message` — `m.room.message` events and the msgtype table
//! - `content` — typed content variants (text, location, image, file,
//!   audio, video) and the `Playable` duration wrapper
//! - `info`    — `info` subtree schemas shared by file-like content
//! - `error`   — parse errors
//!
//! Key names and nesting follow the Matrix client-server API exactly.

pub mod content;
pub mod error;
pub mod info;
pub mod message;

/// A JSON object, as found at every level of event content.
pub type JsonObject = serde_json::Map<String, serde_json::Value>;

pub use content::{
    AudioContent, EventContent, FileContent, ImageContent, LocationContent, Playable,
    TextContent, TypedContent, VideoContent,
};
pub use error::ProtoError;
pub use info::{FileInfo, ImageInfo, InfoSchema, Thumbnail};
pub use message::{MsgType, RoomMessageEvent};
