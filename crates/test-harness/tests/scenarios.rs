//! End-to-end carcass scenarios driven through the bridge.

use carcass_engine::ErrorKind;
use carcass_types::{Dimensions, PieceType, PlacementStrategy, Position};
use test_harness::assertions::*;
use test_harness::{CabinetBuilder, Preset};

const TOL: f64 = 1e-9;

fn kitchen() -> CabinetBuilder {
    CabinetBuilder::new("Kitchen", Dimensions::new(800.0, 2100.0, 600.0)).unwrap()
}

// ── Presets ─────────────────────────────────────────────────────────────────

#[test]
fn every_preset_builds_and_passes_oracles() {
    for preset in Preset::ALL {
        let c = CabinetBuilder::preset(preset).unwrap();
        c.assert_piece_count(preset.steps().len())
            .unwrap()
            .assert_invariants()
            .unwrap();
    }
}

#[test]
fn kitchen_cabinet_preset_layout() {
    let mut c = CabinetBuilder::preset(Preset::KitchenCabinet).unwrap();
    c.assert_leaf_count(5).unwrap();
    c.name_split("shelf1", "low1", "high1").unwrap();
    c.name_split("shelf2", "low2", "high2").unwrap();
    c.name_split("shelf3", "low3", "high3").unwrap();
    c.name_split("divider", "left_bay", "right_bay").unwrap();

    c.assert_space_dims("root", Dimensions::new(764.0, 2064.0, 582.0), TOL)
        .unwrap()
        .assert_space_dims("high1", Dimensions::new(764.0, 1023.0, 582.0), TOL)
        .unwrap()
        .assert_space_dims("high2", Dimensions::new(764.0, 502.5, 582.0), TOL)
        .unwrap()
        .assert_space_dims("high3", Dimensions::new(764.0, 242.25, 582.0), TOL)
        .unwrap()
        .assert_space_dims("left_bay", Dimensions::new(373.0, 242.25, 582.0), TOL)
        .unwrap();

    assert_position_eq(
        &c.get_space("high1").unwrap().position,
        &Position::new(0.0, 520.5, 9.0),
        TOL,
        "upper compartment",
    )
    .unwrap();
    assert_position_eq(
        &c.get_space("left_bay").unwrap().position,
        &Position::new(-195.5, -910.875, 9.0),
        TOL,
        "bottom left bay",
    )
    .unwrap();
    assert_leaf(c.get_space("right_bay").unwrap(), "bottom right bay").unwrap();
}

#[test]
fn bookcase_preset_uses_thin_back() {
    let mut c = CabinetBuilder::preset(Preset::Bookcase).unwrap();
    c.assert_leaf_count(5).unwrap();
    c.name_split("shelf4", "bottom_cubby", "cubby_above").unwrap();

    c.assert_space_dims("root", Dimensions::new(1164.0, 1764.0, 285.0), TOL)
        .unwrap()
        .assert_space_dims("bottom_cubby", Dimensions::new(1164.0, 93.375, 285.0), TOL)
        .unwrap();
    assert_eq!(c.get_space("root").unwrap().position.z, 7.5);
    assert_eq!(c.get_piece("back").unwrap().thickness, 15.0);
}

#[test]
fn bathroom_module_has_two_compartments() {
    let mut c = CabinetBuilder::preset(Preset::BathroomModule).unwrap();
    c.name_split("shelf", "lower", "upper").unwrap();
    c.assert_leaf_count(2)
        .unwrap()
        .assert_space_dims("lower", Dimensions::new(564.0, 373.0, 432.0), TOL)
        .unwrap()
        .assert_space_dims("upper", Dimensions::new(564.0, 373.0, 432.0), TOL)
        .unwrap();
}

// ── Worked Examples ─────────────────────────────────────────────────────────

#[test]
fn left_side_cut() {
    let mut c = kitchen();
    c.piece("left", PieceType::LateralLeft, 18.0).unwrap();

    let root = c.get_space("root").unwrap();
    assert_eq!(root.current_dimensions.width, 782.0);
    assert_eq!(root.position.x, 9.0);
    assert_eq!(c.get_piece("left").unwrap().position().unwrap().x, -391.0);
}

#[test]
fn shelf_splits_in_half() {
    let mut c = kitchen();
    c.piece("shelf", PieceType::Shelf, 18.0).unwrap();
    c.name_split("shelf", "lower", "upper").unwrap();

    c.assert_space_dims("lower", Dimensions::new(800.0, 1041.0, 600.0), TOL)
        .unwrap();
    assert_eq!(c.get_space("lower").unwrap().position.y, -529.5);
    assert_eq!(c.get_space("upper").unwrap().position.y, 529.5);

    let shelf = c.get_piece("shelf").unwrap();
    assert_eq!(shelf.position().unwrap().y, 0.0);
    assert_eq!(shelf.dimensions().unwrap().height, 18.0);
}

#[test]
fn opposing_conflict_is_thinned() {
    let mut c = kitchen();
    c.piece("left", PieceType::LateralLeft, 400.0).unwrap();
    c.piece("right", PieceType::LateralRight, 450.0).unwrap();

    let right = c.get_piece("right").unwrap();
    assert_eq!(right.thickness, 398.0);
    assert_strategy(
        right,
        PlacementStrategy::ReducedThickness { requested: 450.0 },
        "right side",
    )
    .unwrap();
    assert_eq!(c.get_space("root").unwrap().current_dimensions.width, 2.0);
    c.assert_invariants().unwrap();
}

#[test]
fn oversize_panel_is_rejected() {
    let mut c = CabinetBuilder::new("Tall", Dimensions::new(800.0, 2800.0, 500.0)).unwrap();
    let result = c.piece("left", PieceType::LateralLeft, 18.0);
    assert_rejected(&result, ErrorKind::PanelTooLarge, "2800 tall side").unwrap();
    c.assert_piece_count(0).unwrap();
    assert!(c.piece_id("left").is_err());
}

#[test]
fn removing_shelf_restores_single_leaf() {
    let mut c = kitchen();
    c.piece("left", PieceType::LateralLeft, 18.0).unwrap();
    c.piece("right", PieceType::LateralRight, 18.0).unwrap();
    c.piece("shelf", PieceType::Shelf, 18.0).unwrap();
    c.assert_leaf_count(2).unwrap();

    let removed = c.remove("shelf").unwrap();
    assert_eq!(removed, vec!["shelf".to_string()]);

    let root = c.get_space("root").unwrap();
    assert!(root.sub_spaces.is_none());
    assert_leaf(root, "root after removal").unwrap();
    c.assert_space_dims("root", Dimensions::new(764.0, 2100.0, 600.0), TOL)
        .unwrap()
        .assert_invariants()
        .unwrap();
}

// ── Targeted Design ─────────────────────────────────────────────────────────

#[test]
fn divider_in_upper_compartment() {
    let mut c = CabinetBuilder::preset(Preset::BathroomModule)
        .unwrap()
        .with_auto_check();
    c.name_split("shelf", "lower", "upper").unwrap();
    c.piece_in("upper", "divider", PieceType::DividerVertical, 18.0)
        .unwrap();
    c.name_split("divider", "upper_left", "upper_right").unwrap();

    c.assert_leaf_count(3)
        .unwrap()
        .assert_space_dims("upper_left", Dimensions::new(273.0, 373.0, 432.0), TOL)
        .unwrap();
    assert_leaf(c.get_space("lower").unwrap(), "lower untouched").unwrap();
    assert_eq!(
        c.get_piece("divider").unwrap().parent_space_id,
        c.space_id("upper").unwrap()
    );
}

#[test]
fn removing_shelf_cascades_to_divider_above() {
    let mut c = CabinetBuilder::preset(Preset::BathroomModule).unwrap();
    c.name_split("shelf", "lower", "upper").unwrap();
    c.piece_in("upper", "divider", PieceType::DividerVertical, 18.0)
        .unwrap();

    let removed = c.remove("shelf").unwrap();
    assert_eq!(removed, vec!["divider".to_string(), "shelf".to_string()]);
    c.assert_piece_count(5).unwrap().assert_leaf_count(1).unwrap();
    assert!(c.space_id("upper").is_err());
    assert!(c.space_id("root").is_ok());
}

#[test]
fn structural_pieces_inside_a_compartment() {
    let mut c = kitchen();
    c.piece("shelf", PieceType::Shelf, 18.0).unwrap();
    c.name_split("shelf", "lower", "upper").unwrap();
    c.piece_in("lower", "plinth", PieceType::Bottom, 100.0)
        .unwrap();

    c.assert_space_dims("lower", Dimensions::new(800.0, 941.0, 600.0), TOL)
        .unwrap()
        .assert_invariants()
        .unwrap();
    assert_eq!(c.get_space("lower").unwrap().position.y, -479.5);
}
