//! Integration test: parsed shapes through to the client JSON.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::collections::BTreeMap;

use cartosvg_export::{LayerExport, ShapeRecord, js_listing, to_json};
use cartosvg_pipeline::{
    Geometry, ImageInfo, Multipolygon, ParsedShape, Point, ShapeStyle, Subpolygon,
};
use serde_json::{Value, json};

fn region() -> ParsedShape {
    ParsedShape {
        id: "path42".to_string(),
        label: "Hall A".to_string(),
        layer: "regions".to_string(),
        geometry: Geometry::Polygon(Multipolygon::new(vec![
            Subpolygon::new(vec![
                Point::new(0.0, 0.0),
                Point::new(1.0, 0.0),
                Point::new(1.0, 1.0),
            ]),
            Subpolygon::new(vec![Point::new(2.0, 2.0), Point::new(3.0, 2.0)]),
        ])),
        style: ShapeStyle {
            fill_color: Some("#aa00ff".to_string()),
            fill_opacity: Some(0.5),
            ..ShapeStyle::default()
        },
        title: Some("Hall &amp; Lobby".to_string()),
        desc: None,
        interactive: BTreeMap::from([("onclick".to_string(), "go(42)".to_string())]),
        valid: true,
    }
}

fn poi() -> ParsedShape {
    ParsedShape {
        id: "circle7".to_string(),
        label: "circle7".to_string(),
        layer: "regions".to_string(),
        geometry: Geometry::Circle {
            center: Point::new(85.0, 5.0),
            radius: 2.5,
        },
        style: ShapeStyle::default(),
        title: None,
        desc: None,
        interactive: BTreeMap::new(),
        valid: true,
    }
}

#[test]
fn record_uses_camel_case_and_omits_absent_fields() {
    let record = ShapeRecord::from_parsed(&region());
    let value = serde_json::to_value(&record).unwrap();

    assert_eq!(value["kind"], json!("polygon"));
    assert_eq!(value["fillColor"], json!("#aa00ff"));
    assert_eq!(value["fillOpacity"], json!(0.5));
    assert_eq!(value["js"], json!("[ [ [0,0], [1,0], [1,1] ], [ [2,2], [3,2] ] ]"));
    assert_eq!(value["interactive"]["onclick"], json!("go(42)"));

    let object = value.as_object().unwrap();
    for absent in ["fillRule", "desc", "radius", "borderColor", "borderWidth"] {
        assert!(!object.contains_key(absent), "{absent} should be omitted");
    }
}

#[test]
fn circle_record_carries_radius() {
    let record = ShapeRecord::from_parsed(&poi());
    assert_eq!(record.kind, "circle");
    assert_eq!(record.radius, Some(2.5));
    assert_eq!(record.js, "[85,5]");
}

#[test]
fn layer_export_round_trips_through_json() {
    let image = ImageInfo {
        width: 1024.0,
        height: 768.0,
        ox: 0.0,
        oy: -10.0,
        href: "plan.png".to_string(),
        is_present: true,
    };
    let export = LayerExport::new("regions", &[region(), poi()], &[image]);

    let compact = to_json(&export, false).unwrap();
    assert!(!compact.contains('\n'));
    let pretty = to_json(&export, true).unwrap();
    assert!(pretty.contains('\n'));

    let value: Value = serde_json::from_str(&compact).unwrap();
    assert_eq!(value["layer"], json!("regions"));
    assert_eq!(value["shapes"].as_array().unwrap().len(), 2);
    assert_eq!(value["images"][0]["isPresent"], json!(true));
    assert_eq!(value["images"][0]["oy"], json!(-10.0));
}

#[test]
fn js_listing_is_tab_separated() {
    let export = LayerExport::new("regions", &[poi()], &[]);
    assert_eq!(js_listing(&export), "circle7\t[85,5]\n");
}
