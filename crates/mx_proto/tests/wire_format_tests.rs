//! Wire-format tests for `m.room.message` content.
//!
//! Fixtures follow the shapes in the Matrix client-server API. Every parse
//! is checked against re-serialisation so that key names and nesting stay
//! exactly as other clients expect them.

use mx_proto::content::{UrlBasedContent, UrlWithThumbnailContent};
use mx_proto::{
    AudioContent, EventContent, FileContent, FileInfo, ImageContent, ImageInfo, JsonObject,
    LocationContent, MsgType, ProtoError, RoomMessageEvent, TextContent, Thumbnail, TypedContent,
    VideoContent,
};
use proptest::prelude::*;
use serde_json::{json, Value};

fn object(value: Value) -> JsonObject {
    value.as_object().cloned().unwrap()
}

fn parse(value: Value) -> RoomMessageEvent {
    RoomMessageEvent::from_json(&object(value)).unwrap()
}

// ─── Dispatch by msgtype ────────────────────────────────────────────────────

#[test]
fn bare_text_has_no_content() {
    for msgtype in ["m.text", "m.emote", "m.notice"] {
        let event = parse(json!({ "msgtype": msgtype, "body": "hello" }));
        assert_eq!(event.msgtype().as_wire(), msgtype);
        assert!(event.content().is_none());
        assert_eq!(event.mime_type(), mime::TEXT_PLAIN);
        assert!(!event.has_file_content());
    }
}

#[test]
fn html_text_has_text_content() {
    let event = parse(json!({
        "msgtype": "m.notice",
        "body": "build *passed*",
        "format": "org.matrix.custom.html",
        "formatted_body": "build <b>passed</b>",
    }));
    assert_eq!(event.msgtype(), MsgType::Notice);
    assert_eq!(event.plain_body(), "build *passed*");
    match event.content() {
        Some(EventContent::Text(text)) => assert_eq!(text.body, "build <b>passed</b>"),
        other => panic!("expected text content, got {other:?}"),
    }
    assert_eq!(event.mime_type(), mime::TEXT_HTML);
    assert!(!event.has_file_content());
}

#[test]
fn image_event() {
    let wire = json!({
        "msgtype": "m.image",
        "body": "cat.jpg",
        "url": "mxc://example.org/JWEIFJgwEIhweiWJE",
        "info": { "size": 31037, "mimetype": "image/jpeg", "w": 394, "h": 398 }
    });
    let event = parse(wire.clone());
    assert!(event.has_file_content());
    assert_eq!(event.mime_type().essence_str(), "image/jpeg");
    match event.content() {
        Some(EventContent::Image(image)) => {
            assert_eq!(image.base.info.image_size(), Some((394, 398)));
            assert!(image.thumbnail.is_none());
        }
        other => panic!("expected image content, got {other:?}"),
    }
    assert_eq!(Value::Object(event.to_json()), wire);
}

#[test]
fn file_event_keeps_filename() {
    let wire = json!({
        "msgtype": "m.file",
        "body": "minutes",
        "filename": "minutes-2024-03.pdf",
        "url": "mxc://example.org/FHyPlCeYUSFFxlgbQYZmoEoe",
        "info": { "size": 46144, "mimetype": "application/pdf" }
    });
    let event = parse(wire.clone());
    assert!(event.has_file_content());
    assert_eq!(event.mime_type().essence_str(), "application/pdf");
    assert_eq!(Value::Object(event.to_json()), wire);
}

#[test]
fn location_event_without_thumbnail() {
    let wire = json!({
        "msgtype": "m.location",
        "body": "Big Ben, London, UK",
        "geo_uri": "geo:51.5008,0.1247",
    });
    let event = parse(wire.clone());
    assert!(!event.has_file_content());
    assert_eq!(event.mime_type(), mime::TEXT_PLAIN);
    match event.content() {
        Some(EventContent::Location(location)) => assert!(location.thumbnail.is_none()),
        other => panic!("expected location content, got {other:?}"),
    }
    // No zero-valued thumbnail and no empty info object appear on the way out.
    assert_eq!(Value::Object(event.to_json()), wire);
}

#[test]
fn audio_event_duration_stays_inside_info() {
    let wire = json!({
        "msgtype": "m.audio",
        "body": "Bee Gees - Stayin' Alive",
        "url": "mxc://example.org/ffed755USFFxlgbQYZGtryd",
        "info": { "duration": 5000, "mimetype": "audio/mpeg", "size": 1563685 }
    });
    let event = parse(wire.clone());
    match event.content() {
        Some(EventContent::Audio(audio)) => assert_eq!(audio.duration, 5000),
        other => panic!("expected audio content, got {other:?}"),
    }
    let out = event.to_json();
    assert!(!out.contains_key("duration"));
    assert_eq!(out["info"]["duration"], 5000);
    assert_eq!(out["info"]["mimetype"], "audio/mpeg");
    assert_eq!(Value::Object(out), wire);
}

#[test]
fn video_event_duration_and_thumbnail() {
    let wire = json!({
        "msgtype": "m.video",
        "body": "Gangnam Style",
        "url": "mxc://example.org/a526eYUSFFxlgbQYZmo442",
        "info": {
            "duration": 5000,
            "h": 320,
            "w": 480,
            "mimetype": "video/mp4",
            "size": 1563685,
            "thumbnail_url": "mxc://example.org/FHyPlCeYUSFFxlgbQYZmoEoe",
            "thumbnail_info": { "h": 300, "w": 310, "mimetype": "image/jpeg", "size": 46144 }
        }
    });
    let event = parse(wire.clone());
    assert!(event.has_file_content());
    match event.content() {
        Some(EventContent::Video(video)) => {
            assert_eq!(video.duration, 5000);
            assert_eq!(video.base.base.info.image_size(), Some((480, 320)));
            let thumbnail = video.base.thumbnail.as_ref().unwrap();
            assert_eq!(thumbnail.info.file.payload_size, Some(46144));
        }
        other => panic!("expected video content, got {other:?}"),
    }
    assert_eq!(Value::Object(event.to_json()), wire);
}

#[test]
fn unparseable_content_keeps_body_and_msgtype() {
    let event = parse(json!({
        "msgtype": "m.video",
        "body": "clip",
        "url": 42,
        "info": { "duration": 10 }
    }));
    assert_eq!(event.msgtype(), MsgType::Video);
    assert_eq!(event.plain_body(), "clip");
    assert!(event.content().is_none());
    assert!(!event.has_file_content());
}

#[test]
fn non_object_info_is_tolerated() {
    let event = parse(json!({
        "msgtype": "m.file",
        "body": "f",
        "url": "mxc://example.org/f",
        "info": "garbage"
    }));
    match event.content() {
        Some(EventContent::File(file)) => assert_eq!(file.base.info, FileInfo::default()),
        other => panic!("expected file content, got {other:?}"),
    }
}

// ─── Outgoing events ────────────────────────────────────────────────────────

#[test]
fn outgoing_event_flattens_content() {
    let audio = AudioContent::new(
        UrlBasedContent::new(
            "mxc://example.org/voice",
            Some("voice.ogg".into()),
            FileInfo::new("audio/ogg", 2048),
        ),
        1500,
    );
    let event = RoomMessageEvent::with_type("voice message", MsgType::Audio, Some(EventContent::Audio(audio)));
    assert_eq!(event.raw_msgtype(), "m.audio");
    assert_eq!(
        Value::Object(event.to_json()),
        json!({
            "msgtype": "m.audio",
            "body": "voice message",
            "url": "mxc://example.org/voice",
            "filename": "voice.ogg",
            "info": { "size": 2048, "mimetype": "audio/ogg", "duration": 1500 }
        })
    );
}

#[test]
fn event_body_wins_over_plain_text_content() {
    let event = RoomMessageEvent::new(
        "fallback",
        "m.text",
        Some(EventContent::Text(TextContent::new("ignored", mime::TEXT_PLAIN))),
    );
    assert_eq!(event.to_json()["body"], "fallback");
}

#[test]
fn plain_text_content_folds_into_the_body() {
    let event = RoomMessageEvent::new(
        "just words",
        "m.text",
        Some(EventContent::Text(TextContent::new("just words", mime::TEXT_PLAIN))),
    );
    assert!(event.content().is_none());
    assert_eq!(event.mime_type(), mime::TEXT_PLAIN);
    assert_eq!(RoomMessageEvent::from_json(&event.to_json()).unwrap(), event);

    let html = RoomMessageEvent::new(
        "words",
        "m.text",
        Some(EventContent::Text(TextContent::html("<b>words</b>"))),
    );
    assert!(html.content().is_some());
    assert_eq!(RoomMessageEvent::from_json(&html.to_json()).unwrap(), html);
}

#[test]
fn full_event_envelope_round_trips() {
    let event = RoomMessageEvent::with_type(
        "here",
        MsgType::Location,
        Some(EventContent::Location(LocationContent::new("geo:0,0", None))),
    );
    let wire = event.to_event_json();
    assert_eq!(wire["type"], RoomMessageEvent::TYPE_ID);
    assert_eq!(wire["content"]["geo_uri"], "geo:0,0");
    assert_eq!(RoomMessageEvent::from_event_json(&wire).unwrap(), event);
}

#[test]
fn envelope_without_content_object_fails() {
    let err = RoomMessageEvent::from_event_json(&object(json!({
        "type": "m.room.message",
        "content": "nope"
    })))
    .unwrap_err();
    assert!(matches!(err, ProtoError::NotAnObject("content")));
}

#[test]
fn serde_goes_through_the_wire_format() {
    let text = r#"{"msgtype":"m.new.unknown.type","body":"hi"}"#;
    let event: RoomMessageEvent = serde_json::from_str(text).unwrap();
    assert_eq!(event.msgtype(), MsgType::Unknown);
    assert_eq!(event.plain_body(), "hi");
    assert!(event.content().is_none());
    assert_eq!(
        serde_json::to_value(&event).unwrap(),
        json!({ "msgtype": "m.new.unknown.type", "body": "hi" })
    );

    let bad: Result<RoomMessageEvent, _> = serde_json::from_str(r#"{"body":"hi"}"#);
    assert!(bad.is_err());
}

// ─── Round-trip laws ────────────────────────────────────────────────────────

fn arb_file_info() -> impl Strategy<Value = FileInfo> {
    (
        proptest::option::of("(audio|image|video|application)/[a-z]{1,8}"),
        proptest::option::of(any::<u32>().prop_map(u64::from)),
    )
        .prop_map(|(mime_type, payload_size)| FileInfo {
            mime_type,
            payload_size,
        })
}

fn arb_image_info() -> impl Strategy<Value = ImageInfo> {
    (
        arb_file_info(),
        proptest::option::of(0u64..10_000),
        proptest::option::of(0u64..10_000),
    )
        .prop_map(|(file, width, height)| ImageInfo {
            file,
            width,
            height,
        })
}

fn arb_thumbnail() -> impl Strategy<Value = Option<Thumbnail>> {
    proptest::option::of(
        ("(mxc://[a-z]{1,8}/[A-Za-z]{1,12})?", arb_image_info())
            .prop_map(|(url, info)| Thumbnail::new(url, info)),
    )
}

fn arb_url_based<I: std::fmt::Debug>(
    info: impl Strategy<Value = I>,
) -> impl Strategy<Value = UrlBasedContent<I>>
where
    I: mx_proto::InfoSchema,
{
    (
        "mxc://[a-z]{1,8}/[A-Za-z]{1,12}",
        proptest::option::of("[a-z]{1,8}\\.[a-z]{2,3}"),
        info,
    )
        .prop_map(|(url, filename, info)| UrlBasedContent::new(url, filename, info))
}

proptest! {
    #[test]
    fn location_round_trips(geo in "geo:[0-9]{1,2}\\.[0-9]{1,4},[0-9]{1,3}", thumbnail in arb_thumbnail()) {
        let content = LocationContent::new(geo, thumbnail);
        prop_assert_eq!(LocationContent::from_json(&content.to_json()).unwrap(), content);
    }

    #[test]
    fn image_round_trips(base in arb_url_based(arb_image_info()), thumbnail in arb_thumbnail()) {
        let content: ImageContent = UrlWithThumbnailContent::new(base, thumbnail);
        prop_assert_eq!(ImageContent::from_json(&content.to_json()).unwrap(), content);
    }

    #[test]
    fn file_round_trips(base in arb_url_based(arb_file_info()), thumbnail in arb_thumbnail()) {
        let content: FileContent = UrlWithThumbnailContent::new(base, thumbnail);
        prop_assert_eq!(FileContent::from_json(&content.to_json()).unwrap(), content);
    }

    #[test]
    fn audio_round_trips(base in arb_url_based(arb_file_info()), duration in any::<u32>()) {
        let content = AudioContent::new(base, u64::from(duration));
        let json = content.to_json();
        prop_assert!(!json.contains_key("duration"));
        prop_assert_eq!(AudioContent::from_json(&json).unwrap(), content);
    }

    #[test]
    fn video_round_trips(
        base in arb_url_based(arb_image_info()),
        thumbnail in arb_thumbnail(),
        duration in any::<u32>(),
    ) {
        let content = VideoContent::new(UrlWithThumbnailContent::new(base, thumbnail), u64::from(duration));
        prop_assert_eq!(VideoContent::from_json(&content.to_json()).unwrap(), content);
    }

    #[test]
    fn html_text_event_round_trips(body in "\\PC{0,32}", html in "\\PC{0,32}") {
        let event = RoomMessageEvent::with_type(
            body,
            MsgType::Text,
            Some(EventContent::Text(TextContent::html(html))),
        );
        prop_assert_eq!(RoomMessageEvent::from_json(&event.to_json()).unwrap(), event);
    }

    #[test]
    fn any_msgtype_string_parses(msgtype in "\\PC{0,24}", body in "\\PC{0,24}") {
        let event = RoomMessageEvent::from_json(&object(json!({ "msgtype": msgtype, "body": body })));
        prop_assert!(event.is_ok());
    }
}
