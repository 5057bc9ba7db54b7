use mime::Mime;
use serde_json::Value;

use super::{object_or_empty, required_str, take_object, TypedContent, INFO_KEY};
use crate::error::ProtoError;
use crate::info::Thumbnail;
use crate::JsonObject;

const GEO_URI_KEY: &str = "geo_uri";

/// m.location: a `geo_uri` and an optional preview image described by
/// `info.thumbnail_url` and `info.thumbnail_info`.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationContent {
    pub geo_uri: String,
    pub thumbnail: Option<Thumbnail>,
}

impl LocationContent {
    pub fn new(geo_uri: impl Into<String>, thumbnail: Option<Thumbnail>) -> Self {
        Self {
            geo_uri: geo_uri.into(),
            thumbnail,
        }
    }
}

impl TypedContent for LocationContent {
    fn from_json(json: &JsonObject) -> Result<Self, ProtoError> {
        let geo_uri = required_str(json, GEO_URI_KEY)?;
        let info = object_or_empty(json, INFO_KEY);
        Ok(Self {
            geo_uri,
            thumbnail: Thumbnail::from_info_json(&info),
        })
    }

    fn mime_type(&self) -> Mime {
        mime::TEXT_PLAIN
    }

    fn fill_json(&self, json: &mut JsonObject) {
        json.insert(GEO_URI_KEY.into(), self.geo_uri.clone().into());
        if let Some(thumbnail) = &self.thumbnail {
            let mut info = take_object(json, INFO_KEY);
            thumbnail.fill_info_json(&mut info);
            json.insert(INFO_KEY.into(), Value::Object(info));
        }
    }
}
