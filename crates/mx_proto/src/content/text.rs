use mime::Mime;
use serde_json::Value;

use super::{optional_str, TypedContent};
use crate::error::ProtoError;
use crate::JsonObject;

/// The `format` value Matrix clients use for HTML bodies.
pub const HTML_FORMAT: &str = "org.matrix.custom.html";

const BODY_KEY: &str = "body";
const FORMAT_KEY: &str = "format";
const FORMATTED_BODY_KEY: &str = "formatted_body";

/// Body text for m.text, m.emote and m.notice; HTML or plain depending on
/// `mime_type`.
///
/// The wire format only tells HTML from plain text, so `mime_type` is
/// always `text/html` or `text/plain` once built through [`TextContent::new`].
#[derive(Debug, Clone, PartialEq)]
pub struct TextContent {
    pub mime_type: Mime,
    pub body: String,
}

impl TextContent {
    /// Parameters such as `charset` are dropped, and any non-HTML type
    /// becomes `text/plain`.
    pub fn new(body: impl Into<String>, mime_type: Mime) -> Self {
        let mime_type = if mime_type.essence_str() == mime::TEXT_HTML.essence_str() {
            mime::TEXT_HTML
        } else {
            mime::TEXT_PLAIN
        };
        Self {
            mime_type,
            body: body.into(),
        }
    }

    pub fn html(body: impl Into<String>) -> Self {
        Self::new(body, mime::TEXT_HTML)
    }

    pub fn is_html(&self) -> bool {
        self.mime_type.essence_str() == mime::TEXT_HTML.essence_str()
    }

    /// Whether a content object carries an HTML rendition.
    pub(crate) fn is_rich(json: &JsonObject) -> bool {
        json.get(FORMAT_KEY).and_then(Value::as_str) == Some(HTML_FORMAT)
    }
}

impl TypedContent for TextContent {
    fn from_json(json: &JsonObject) -> Result<Self, ProtoError> {
        if Self::is_rich(json) {
            Ok(Self::html(
                optional_str(json, FORMATTED_BODY_KEY).unwrap_or_default(),
            ))
        } else {
            Ok(Self::new(
                optional_str(json, BODY_KEY).unwrap_or_default(),
                mime::TEXT_PLAIN,
            ))
        }
    }

    fn mime_type(&self) -> Mime {
        self.mime_type.clone()
    }

    fn fill_json(&self, json: &mut JsonObject) {
        if self.is_html() {
            json.insert(FORMAT_KEY.into(), HTML_FORMAT.into());
            json.insert(FORMATTED_BODY_KEY.into(), self.body.clone().into());
        } else {
            json.insert(BODY_KEY.into(), self.body.clone().into());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn html_is_read_from_formatted_body() {
        let json = json!({
            "body": "hello *world*",
            "format": "org.matrix.custom.html",
            "formatted_body": "hello <em>world</em>",
        });
        let content = TextContent::from_json(json.as_object().unwrap()).unwrap();
        assert!(content.is_html());
        assert_eq!(content.body, "hello <em>world</em>");
    }

    #[test]
    fn unknown_format_is_plain_text() {
        let json = json!({ "body": "plain", "format": "text/markdown" });
        let content = TextContent::from_json(json.as_object().unwrap()).unwrap();
        assert_eq!(content.mime_type, mime::TEXT_PLAIN);
        assert_eq!(content.body, "plain");
    }

    #[test]
    fn html_writes_format_keys_only() {
        let content = TextContent::html("<b>hi</b>");
        assert_eq!(
            serde_json::Value::Object(content.to_json()),
            json!({ "format": HTML_FORMAT, "formatted_body": "<b>hi</b>" })
        );
    }

    #[test]
    fn round_trips() {
        for content in [TextContent::html("<p>x</p>"), TextContent::new("x", mime::TEXT_PLAIN)] {
            assert_eq!(TextContent::from_json(&content.to_json()).unwrap(), content);
        }
    }

    #[test]
    fn new_keeps_only_what_the_wire_can_carry() {
        let html: Mime = "text/html; charset=utf-8".parse().unwrap();
        let content = TextContent::new("<i>x</i>", html);
        assert_eq!(content.mime_type, mime::TEXT_HTML);
        assert_eq!(TextContent::from_json(&content.to_json()).unwrap(), content);

        let markdown: Mime = "text/markdown".parse().unwrap();
        let content = TextContent::new("*x*", markdown);
        assert_eq!(content.mime_type, mime::TEXT_PLAIN);
        assert_eq!(TextContent::from_json(&content.to_json()).unwrap(), content);
    }
}
