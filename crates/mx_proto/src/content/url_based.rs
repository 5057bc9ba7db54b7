use mime::Mime;
use serde_json::Value;

use super::{object_or_empty, optional_str, required_str, take_object, InfoContent, TypedContent, INFO_KEY};
use crate::error::ProtoError;
use crate::info::{FileInfo, ImageInfo, InfoSchema, Thumbnail};
use crate::JsonObject;

const URL_KEY: &str = "url";
const FILENAME_KEY: &str = "filename";

/// Content that points at an uploaded payload: top-level `url` and
/// `filename`, with `I` describing the `info` subtree.
#[derive(Debug, Clone, PartialEq)]
pub struct UrlBasedContent<I> {
    pub url: String,
    pub filename: Option<String>,
    pub info: I,
}

impl<I: InfoSchema> UrlBasedContent<I> {
    pub fn new(url: impl Into<String>, filename: Option<String>, info: I) -> Self {
        Self {
            url: url.into(),
            filename,
            info,
        }
    }
}

impl<I: InfoSchema> TypedContent for UrlBasedContent<I> {
    fn from_json(json: &JsonObject) -> Result<Self, ProtoError> {
        let url = required_str(json, URL_KEY)?;
        Ok(Self {
            url,
            filename: optional_str(json, FILENAME_KEY),
            info: I::from_info_json(&object_or_empty(json, INFO_KEY)),
        })
    }

    fn mime_type(&self) -> Mime {
        self.info.mime_type()
    }

    fn fill_json(&self, json: &mut JsonObject) {
        json.insert(URL_KEY.into(), self.url.clone().into());
        if let Some(filename) = &self.filename {
            json.insert(FILENAME_KEY.into(), filename.clone().into());
        }
        let mut info = take_object(json, INFO_KEY);
        self.info.fill_info_json(&mut info);
        json.insert(INFO_KEY.into(), Value::Object(info));
    }
}

impl<I: InfoSchema> InfoContent for UrlBasedContent<I> {}

/// [`UrlBasedContent`] with an optional thumbnail in its info subtree.
#[derive(Debug, Clone, PartialEq)]
pub struct UrlWithThumbnailContent<I> {
    pub base: UrlBasedContent<I>,
    pub thumbnail: Option<Thumbnail>,
}

impl<I: InfoSchema> UrlWithThumbnailContent<I> {
    pub fn new(base: UrlBasedContent<I>, thumbnail: Option<Thumbnail>) -> Self {
        Self { base, thumbnail }
    }
}

impl<I: InfoSchema> TypedContent for UrlWithThumbnailContent<I> {
    fn from_json(json: &JsonObject) -> Result<Self, ProtoError> {
        let base = UrlBasedContent::from_json(json)?;
        let thumbnail = Thumbnail::from_info_json(&object_or_empty(json, INFO_KEY));
        Ok(Self { base, thumbnail })
    }

    fn mime_type(&self) -> Mime {
        self.base.mime_type()
    }

    fn fill_json(&self, json: &mut JsonObject) {
        self.base.fill_json(json);
        if let Some(thumbnail) = &self.thumbnail {
            let mut info = take_object(json, INFO_KEY);
            thumbnail.fill_info_json(&mut info);
            json.insert(INFO_KEY.into(), Value::Object(info));
        }
    }
}

impl<I: InfoSchema> InfoContent for UrlWithThumbnailContent<I> {}

/// m.image
pub type ImageContent = UrlWithThumbnailContent<ImageInfo>;

/// m.file
pub type FileContent = UrlWithThumbnailContent<FileInfo>;
