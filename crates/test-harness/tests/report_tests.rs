//! Tests for the report module.

use carcass_types::{Dimensions, PieceType};
use test_harness::{CabinetBuilder, Preset};

#[test]
fn empty_carcass_report() {
    let c = CabinetBuilder::new("Empty", Dimensions::new(800.0, 2100.0, 600.0)).unwrap();
    let text = c.report().unwrap().to_text();
    assert!(text.contains("=== Carcass Report: Empty ==="));
    assert!(text.contains("Dimensions: 800.0 x 2100.0 x 600.0"));
    assert!(text.contains("Space Tree (1 spaces, 1 active)"), "{}", text);
    assert!(text.contains("Cut List: empty"));
}

#[test]
fn kitchen_report_lists_panels() {
    let c = CabinetBuilder::preset(Preset::KitchenCabinet).unwrap();
    let text = c.report().unwrap().to_text();
    assert!(text.contains("Cut List (9 panels)"), "{}", text);
    assert!(text.contains("[0] \"left\" (lateral_left) 2100.0 x 600.0, t=18.0\n"), "{}", text);
    assert!(text.contains("\"back\" (lateral_back) 2100.0 x 764.0, t=18.0"), "{}", text);
    assert!(text.contains("\"shelf1\" (shelf) 764.0 x 582.0, t=18.0"), "{}", text);
    assert!(text.contains("Oracle Results (7/7 passed)"), "{}", text);
    assert!(!text.contains("[FAIL]"));
}

#[test]
fn report_marks_thinned_pieces() {
    let mut c = CabinetBuilder::new("Thin", Dimensions::new(800.0, 2100.0, 600.0)).unwrap();
    c.piece("left", PieceType::LateralLeft, 400.0).unwrap();
    c.piece("right", PieceType::LateralRight, 450.0).unwrap();
    let text = c.report().unwrap().to_text();
    assert!(text.contains("t=398.0 [REDUCED from 450.0]"), "{}", text);
}

#[test]
fn report_tree_is_indented_by_depth() {
    let c = CabinetBuilder::preset(Preset::BathroomModule).unwrap();
    let report = c.report().unwrap();
    let text = report.to_text();
    assert!(text.contains("Space Tree (3 spaces, 2 active)"), "{}", text);
    assert!(text.contains("\n  \"Bathroom Module\" 564.0 x 764.0 x 432.0"), "{}", text);
    assert!(
        text.contains("\n    \"Bathroom Module / Lower\" 564.0 x 373.0 x 432.0"),
        "{}",
        text
    );
    assert!(text.contains("[ACTIVE]"));
    assert_eq!(report.space_entries[1].depth, 1);
}

#[test]
fn display_matches_to_text() {
    let c = CabinetBuilder::preset(Preset::Bookcase).unwrap();
    let report = c.report().unwrap();
    assert_eq!(format!("{}", report), report.to_text());
}

#[test]
fn tree_entries_carry_id_prefix() {
    let c = CabinetBuilder::new("Ids", Dimensions::new(600.0, 600.0, 600.0)).unwrap();
    let report = c.report().unwrap();
    let root = c.engine().unwrap().carcass().root_id.simple().to_string();
    assert_eq!(report.space_entries[0].id_prefix, root[..8]);
    assert!(report.to_text().contains(&format!("[{}]", &root[..8])));
}
