//! Tests for #[derive(Param)] custom decoders

#![allow(clippy::unwrap_used)]

use formbind_core::{BindError, DecodeParam, ErrorKind, ParamError, bind_form, bind_path};
use formbind_macros::{Bind, Param};
use formbind_testing::{BindTest, assertions::assert_bind_error, source};
use std::error::Error as _;

#[derive(Param, Debug, Default, Clone, Copy, PartialEq)]
struct HexInt(i64);

impl DecodeParam for HexInt {
    fn decode_param(&mut self, param: &str) -> Result<(), ParamError> {
        self.0 = i64::from_str_radix(param, 16)?;
        Ok(())
    }
}

#[derive(Bind, Debug, Default)]
struct Masks {
    #[bind(form = "mask")]
    pub mask: HexInt,
    #[bind(form = "fallback,default=ff")]
    pub fallback: HexInt,
    #[bind(form = "masks")]
    pub masks: Vec<HexInt>,
    #[bind(form = "pair")]
    pub pair: [HexInt; 2],
    #[bind(form = "maybe")]
    pub maybe: Option<HexInt>,
}

#[test]
fn test_custom_decoder_replaces_generic_rule() {
    BindTest::<Masks>::form()
        .when_source(source! {
            "mask" => ["1f", "ignored"],
            "masks" => ["a", "b"],
            "pair" => ["10", "20"],
            "maybe" => ["7fffffffffffffff"],
        })
        .then_record(|record| {
            assert_eq!(record.mask, HexInt(31));
            assert_eq!(record.fallback, HexInt(255));
            assert_eq!(record.masks, [HexInt(10), HexInt(11)]);
            assert_eq!(record.pair, [HexInt(16), HexInt(32)]);
            assert_eq!(record.maybe, Some(HexInt(i64::MAX)));
        })
        .run();
}

#[test]
fn test_custom_decoder_skipped_for_empty_list() {
    BindTest::<Masks>::form()
        .given_record(Masks {
            mask: HexInt(3),
            ..Masks::default()
        })
        .when_source(source! { "mask" => [] })
        .then_record(|record| assert_eq!(record.mask, HexInt(3)))
        .run();
}

#[test]
fn test_optional_decoder_not_allocated_for_empty_list() {
    BindTest::<Masks>::form()
        .when_source(source! { "maybe" => [] })
        .then_record(|record| assert_eq!(record.maybe, None))
        .run();

    BindTest::<Locations>::form()
        .when_source(source! { "pointer" => [] })
        .then_record(|record| assert!(record.pointer.is_none()))
        .run();
}

#[test]
fn test_custom_decoder_error_is_preserved() {
    let mut record = Masks::default();
    let err = bind_form(&mut record, &source! { "mask" => ["xyz"] }).unwrap_err();

    assert_bind_error(&err, ErrorKind::CustomDecode, "mask");
    let source = err.source().unwrap();
    assert!(source.downcast_ref::<std::num::ParseIntError>().is_some());
    assert_eq!(err.to_string(), format!("field `mask`: {source}"));
}

#[derive(Param, Debug, Default, PartialEq)]
struct FileLocation {
    path: String,
    mood: String,
}

impl DecodeParam for FileLocation {
    fn decode_param(&mut self, param: &str) -> Result<(), ParamError> {
        let rest = param
            .strip_prefix("file:")
            .ok_or_else(|| format!("expected a file: location, got {param:?}"))?;
        let (path, mood) = rest
            .split_once(':')
            .ok_or("missing mood after path")?;
        self.path = path.to_string();
        self.mood = mood.to_string();
        Ok(())
    }
}

#[derive(Bind, Debug, Default)]
struct Locations {
    #[bind(form = "location")]
    pub location: FileLocation,
    #[bind(form = "pointer")]
    pub pointer: Option<Box<FileLocation>>,
}

#[test]
fn test_struct_with_custom_decoder() {
    BindTest::<Locations>::form()
        .when_source(source! {
            "location" => ["file:/foo:happiness"],
            "pointer" => ["file:/bar:calm"],
        })
        .then_record(|record| {
            assert_eq!(record.location.path, "/foo");
            assert_eq!(record.location.mood, "happiness");
            let pointer = record.pointer.as_deref().unwrap();
            assert_eq!(pointer.path, "/bar");
            assert_eq!(pointer.mood, "calm");
        })
        .run();
}

#[test]
fn test_struct_decoder_message_is_kept() {
    BindTest::<Locations>::form()
        .when_source(source! { "pointer" => ["http://example.com"] })
        .then_error(|err| {
            assert_bind_error(err, ErrorKind::CustomDecode, "pointer");
            assert!(err.to_string().contains("expected a file: location"));
        })
        .run();
}

#[derive(Param, Debug, Default, PartialEq)]
struct SegmentPath(Vec<String>);

impl DecodeParam for SegmentPath {
    fn decode_param(&mut self, param: &str) -> Result<(), ParamError> {
        self.0 = param
            .split('/')
            .filter(|segment| !segment.is_empty())
            .map(str::to_string)
            .collect();
        Ok(())
    }
}

#[derive(Bind, Debug, Default)]
struct Route {
    #[bind(uri = "path")]
    pub path: SegmentPath,
    #[bind(uri = "id")]
    pub id: u32,
}

#[test]
fn test_custom_sequence_decoder_on_path() {
    let mut route = Route::default();
    bind_path(&mut route, &source! { "path" => ["/docs/guide/intro"], "id" => ["7"] }).unwrap();

    assert_eq!(route.path, SegmentPath(vec!["docs".into(), "guide".into(), "intro".into()]));
    assert_eq!(route.id, 7);
}

#[derive(Param, Debug, Default, PartialEq, Eq)]
struct ObjectId([u8; 12]);

impl DecodeParam for ObjectId {
    fn decode_param(&mut self, param: &str) -> Result<(), ParamError> {
        hex::decode_to_slice(param, &mut self.0)?;
        Ok(())
    }
}

#[derive(Bind, Debug, Default)]
struct Document {
    #[bind(uri = "id")]
    pub id: ObjectId,
    #[bind(form = "refs", collection_format = "csv")]
    pub refs: Vec<ObjectId>,
}

#[test]
fn test_fixed_array_newtype_decoder() {
    let mut document = Document::default();
    bind_path(&mut document, &source! { "id" => ["5d6f8c1a2b3c4d5e6f708192"] }).unwrap();
    assert_eq!(
        document.id,
        ObjectId([0x5d, 0x6f, 0x8c, 0x1a, 0x2b, 0x3c, 0x4d, 0x5e, 0x6f, 0x70, 0x81, 0x92])
    );
}

#[test]
fn test_decoder_inside_split_collection() {
    BindTest::<Document>::form()
        .when_source(source! { "refs" => ["000000000000000000000001,000000000000000000000002"] })
        .then_record(|document| {
            assert_eq!(document.refs.len(), 2);
            assert_eq!(document.refs[0].0[11], 1);
            assert_eq!(document.refs[1].0[11], 2);
        })
        .run();
}

#[test]
fn test_hex_decoder_error() {
    let mut document = Document::default();
    let err = bind_path(&mut document, &source! { "id" => ["not-hex"] }).unwrap_err();

    assert_bind_error(&err, ErrorKind::CustomDecode, "id");
    assert!(matches!(err, BindError::CustomDecode { ref source, .. }
        if source.downcast_ref::<hex::FromHexError>().is_some()));
}
