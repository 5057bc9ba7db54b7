use mime::Mime;
use serde_json::Value;

use super::{take_object, InfoContent, TypedContent, UrlBasedContent, UrlWithThumbnailContent, INFO_KEY};
use crate::error::ProtoError;
use crate::info::{FileInfo, ImageInfo};
use crate::JsonObject;

const DURATION_KEY: &str = "duration";

/// Adds `info.duration` (milliseconds) to any content with an info subtree.
#[derive(Debug, Clone, PartialEq)]
pub struct Playable<B> {
    pub base: B,
    pub duration: u64,
}

impl<B: InfoContent> Playable<B> {
    pub fn new(base: B, duration: u64) -> Self {
        Self { base, duration }
    }
}

impl<B: InfoContent> TypedContent for Playable<B> {
    fn from_json(json: &JsonObject) -> Result<Self, ProtoError> {
        let base = B::from_json(json)?;
        let duration = json
            .get(INFO_KEY)
            .and_then(|info| info.get(DURATION_KEY))
            .and_then(Value::as_u64)
            .unwrap_or(0);
        Ok(Self { base, duration })
    }

    fn mime_type(&self) -> Mime {
        self.base.mime_type()
    }

    fn fill_json(&self, json: &mut JsonObject) {
        self.base.fill_json(json);
        let mut info = take_object(json, INFO_KEY);
        info.insert(DURATION_KEY.into(), self.duration.into());
        json.insert(INFO_KEY.into(), Value::Object(info));
    }
}

/// m.video
pub type VideoContent = Playable<UrlWithThumbnailContent<ImageInfo>>;

/// m.audio
pub type AudioContent = Playable<UrlBasedContent<FileInfo>>;
