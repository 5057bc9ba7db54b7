//! Schemas of the `info` subtree carried by file-like content.
//!
//! Info is metadata many servers and clients omit, so readers here never
//! fail: absent or mistyped keys come back as `None`, and `None` is not
//! written back out.

use std::fmt::Debug;

use mime::Mime;
use serde_json::Value;

use crate::JsonObject;

pub const SIZE_KEY: &str = "size";
pub const MIMETYPE_KEY: &str = "mimetype";
pub const WIDTH_KEY: &str = "w";
pub const HEIGHT_KEY: &str = "h";
pub const THUMBNAIL_URL_KEY: &str = "thumbnail_url";
pub const THUMBNAIL_INFO_KEY: &str = "thumbnail_info";

/// Something that reads itself from, and writes itself into, an info object.
pub trait InfoSchema: Clone + Debug + Default + PartialEq {
    fn from_info_json(info: &JsonObject) -> Self;

    /// Insert this schema's keys, leaving every other key in `info` alone.
    fn fill_info_json(&self, info: &mut JsonObject);

    /// The declared `mimetype`, or `application/octet-stream`.
    fn mime_type(&self) -> Mime;

    fn to_info_json(&self) -> JsonObject {
        let mut info = JsonObject::new();
        self.fill_info_json(&mut info);
        info
    }
}

/// `size` and `mimetype`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileInfo {
    pub mime_type: Option<String>,
    pub payload_size: Option<u64>,
}

impl FileInfo {
    pub fn new(mime_type: impl Into<String>, payload_size: u64) -> Self {
        Self {
            mime_type: Some(mime_type.into()),
            payload_size: Some(payload_size),
        }
    }
}

impl InfoSchema for FileInfo {
    fn from_info_json(info: &JsonObject) -> Self {
        Self {
            mime_type: info
                .get(MIMETYPE_KEY)
                .and_then(Value::as_str)
                .map(str::to_string),
            payload_size: info.get(SIZE_KEY).and_then(Value::as_u64),
        }
    }

    fn fill_info_json(&self, info: &mut JsonObject) {
        if let Some(size) = self.payload_size {
            info.insert(SIZE_KEY.into(), size.into());
        }
        if let Some(mime_type) = &self.mime_type {
            info.insert(MIMETYPE_KEY.into(), mime_type.clone().into());
        }
    }

    fn mime_type(&self) -> Mime {
        self.mime_type
            .as_deref()
            .and_then(|m| m.parse().ok())
            .unwrap_or(mime::APPLICATION_OCTET_STREAM)
    }
}

/// [`FileInfo`] plus pixel dimensions `w` and `h`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageInfo {
    pub file: FileInfo,
    pub width: Option<u64>,
    pub height: Option<u64>,
}

impl ImageInfo {
    pub fn new(mime_type: impl Into<String>, payload_size: u64, width: u64, height: u64) -> Self {
        Self {
            file: FileInfo::new(mime_type, payload_size),
            width: Some(width),
            height: Some(height),
        }
    }

    pub fn image_size(&self) -> Option<(u64, u64)> {
        Some((self.width?, self.height?))
    }
}

impl InfoSchema for ImageInfo {
    fn from_info_json(info: &JsonObject) -> Self {
        Self {
            file: FileInfo::from_info_json(info),
            width: info.get(WIDTH_KEY).and_then(Value::as_u64),
            height: info.get(HEIGHT_KEY).and_then(Value::as_u64),
        }
    }

    fn fill_info_json(&self, info: &mut JsonObject) {
        self.file.fill_info_json(info);
        if let Some(w) = self.width {
            info.insert(WIDTH_KEY.into(), w.into());
        }
        if let Some(h) = self.height {
            info.insert(HEIGHT_KEY.into(), h.into());
        }
    }

    fn mime_type(&self) -> Mime {
        self.file.mime_type()
    }
}

/// A preview image: `thumbnail_url` plus the `thumbnail_info` object,
/// both living inside the parent's info subtree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Thumbnail {
    pub url: String,
    pub info: ImageInfo,
}

impl Thumbnail {
    pub fn new(url: impl Into<String>, info: ImageInfo) -> Self {
        Self {
            url: url.into(),
            info,
        }
    }

    /// `None` unless the parent info mentions a thumbnail at all.
    pub fn from_info_json(info: &JsonObject) -> Option<Self> {
        let url = info.get(THUMBNAIL_URL_KEY).and_then(Value::as_str);
        let thumbnail_info = info.get(THUMBNAIL_INFO_KEY).and_then(Value::as_object);
        if url.is_none() && thumbnail_info.is_none() {
            return None;
        }
        Some(Self {
            url: url.unwrap_or_default().to_string(),
            info: thumbnail_info
                .map(ImageInfo::from_info_json)
                .unwrap_or_default(),
        })
    }

    pub fn fill_info_json(&self, info: &mut JsonObject) {
        if !self.url.is_empty() {
            info.insert(THUMBNAIL_URL_KEY.into(), self.url.clone().into());
        }
        info.insert(
            THUMBNAIL_INFO_KEY.into(),
            Value::Object(self.info.to_info_json()),
        );
    }
}
