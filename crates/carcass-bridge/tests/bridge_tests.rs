use carcass_bridge::messages::*;
use carcass_bridge::*;
use carcass_engine::ErrorKind;
use carcass_types::{Dimensions, PieceType, Space};
use uuid::Uuid;

// ── Helper functions ─────────────────────────────────────────────────────

fn kitchen_state() -> EngineState {
    let mut state = EngineState::new();
    let resp = dispatch(
        &mut state,
        UiToEngine::CreateCarcass {
            name: "Kitchen".to_string(),
            dimensions: Dimensions::new(800.0, 2100.0, 600.0),
        },
    );
    assert!(matches!(resp, EngineToUi::ModelUpdated { .. }));
    state
}

fn insert(state: &mut EngineState, piece_type: PieceType) -> EngineToUi {
    dispatch(
        state,
        UiToEngine::InsertPiece {
            piece_type,
            thickness: None,
            cut_thickness: None,
            name: None,
        },
    )
}

fn tree_of(resp: &EngineToUi) -> &Space {
    match resp {
        EngineToUi::ModelUpdated { tree, .. } => tree,
        other => panic!("expected ModelUpdated, got {:?}", other),
    }
}

fn error_kind(resp: &EngineToUi) -> ErrorKind {
    match resp {
        EngineToUi::Error { kind, .. } => *kind,
        other => panic!("expected Error, got {:?}", other),
    }
}

// ── Carcass lifecycle ────────────────────────────────────────────────────

#[test]
fn requests_before_create_report_missing_carcass() {
    let mut state = EngineState::new();
    let resp = insert(&mut state, PieceType::Shelf);
    assert_eq!(error_kind(&resp), ErrorKind::NotFound);
}

#[test]
fn create_then_insert_uses_default_thickness() {
    let mut state = kitchen_state();
    let resp = insert(&mut state, PieceType::LateralLeft);
    let tree = tree_of(&resp);
    assert_eq!(tree.current_dimensions.width, 782.0);

    match resp {
        EngineToUi::ModelUpdated { pieces, .. } => {
            assert_eq!(pieces.len(), 1);
            assert_eq!(pieces[0].thickness, 18.0);
        }
        _ => unreachable!(),
    }
}

#[test]
fn default_thickness_setting_applies_to_next_insert() {
    let mut state = kitchen_state();
    let resp = dispatch(&mut state, UiToEngine::SetDefaultThickness { thickness: 25.0 });
    assert!(matches!(
        resp,
        EngineToUi::SettingsChanged { default_thickness } if default_thickness == 25.0
    ));
    let resp = insert(&mut state, PieceType::Bottom);
    assert_eq!(tree_of(&resp).current_dimensions.height, 2075.0);

    let bad = dispatch(&mut state, UiToEngine::SetDefaultThickness { thickness: -1.0 });
    assert_eq!(error_kind(&bad), ErrorKind::InvalidParameter);
    assert_eq!(state.default_thickness, 25.0);
}

#[test]
fn resize_discards_pieces_and_selection() {
    let mut state = kitchen_state();
    insert(&mut state, PieceType::Shelf);
    let resp = dispatch(
        &mut state,
        UiToEngine::SetDimensions {
            dimensions: Dimensions::new(600.0, 800.0, 450.0),
        },
    );
    match resp {
        EngineToUi::ModelUpdated {
            tree,
            pieces,
            selected_space_id,
        } => {
            assert!(pieces.is_empty());
            assert!(tree.is_leaf());
            assert_eq!(tree.current_dimensions.depth, 450.0);
            assert!(selected_space_id.is_none());
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn invalid_dimensions_are_reported() {
    let mut state = EngineState::new();
    let resp = dispatch(
        &mut state,
        UiToEngine::CreateCarcass {
            name: "Flat".to_string(),
            dimensions: Dimensions::new(800.0, 0.0, 600.0),
        },
    );
    assert_eq!(error_kind(&resp), ErrorKind::InvalidParameter);
    assert!(state.engine.is_none());
}

// ── Selection ────────────────────────────────────────────────────────────

#[test]
fn selected_space_receives_insertions() {
    let mut state = kitchen_state();
    let resp = insert(&mut state, PieceType::Shelf);
    let upper = tree_of(&resp).children()[1].id;

    let resp = dispatch(&mut state, UiToEngine::SelectSpace { space_id: Some(upper) });
    assert!(matches!(resp, EngineToUi::SelectionChanged { space_id: Some(id) } if id == upper));

    let resp = insert(&mut state, PieceType::Top);
    let tree = tree_of(&resp);
    let upper_node = tree.find(upper).unwrap();
    assert_eq!(upper_node.pieces.len(), 1);
    assert_eq!(upper_node.current_dimensions.height, 1023.0);
    assert!(tree.children()[0].pieces.is_empty());
}

#[test]
fn selection_is_dropped_when_space_is_split() {
    let mut state = kitchen_state();
    let root = state.engine().unwrap().tree().id;
    dispatch(&mut state, UiToEngine::SelectSpace { space_id: Some(root) });
    let resp = insert(&mut state, PieceType::DividerVertical);
    assert!(matches!(
        resp,
        EngineToUi::ModelUpdated {
            selected_space_id: None,
            ..
        }
    ));
}

#[test]
fn selecting_unknown_space_is_rejected() {
    let mut state = kitchen_state();
    let resp = dispatch(
        &mut state,
        UiToEngine::SelectSpace {
            space_id: Some(Uuid::new_v4()),
        },
    );
    assert_eq!(error_kind(&resp), ErrorKind::NotFound);
    assert!(state.selected_space_id.is_none());
}

// ── Errors ───────────────────────────────────────────────────────────────

#[test]
fn conflict_error_names_the_piece() {
    let mut state = kitchen_state();
    dispatch(
        &mut state,
        UiToEngine::InsertPiece {
            piece_type: PieceType::LateralLeft,
            thickness: Some(799.0),
            cut_thickness: None,
            name: None,
        },
    );
    let resp = insert(&mut state, PieceType::LateralRight);
    match resp {
        EngineToUi::Error {
            kind,
            message,
            piece_id,
        } => {
            assert_eq!(kind, ErrorKind::NoValidPlacement);
            assert!(message.contains("lateral_right"), "message: {}", message);
            assert!(piece_id.is_some());
        }
        other => panic!("expected Error, got {:?}", other),
    }
    assert_eq!(state.engine().unwrap().pieces().len(), 1);
}

#[test]
fn removing_unknown_piece_is_not_found() {
    let mut state = kitchen_state();
    let id = Uuid::new_v4();
    let resp = dispatch(&mut state, UiToEngine::RemovePiece { piece_id: id });
    assert!(matches!(
        resp,
        EngineToUi::Error {
            kind: ErrorKind::NotFound,
            piece_id: Some(p),
            ..
        } if p == id
    ));
}

// ── Panel validation ─────────────────────────────────────────────────────

#[test]
fn validate_panel_reports_envelope() {
    let mut state = EngineState::new();
    let ok = dispatch(
        &mut state,
        UiToEngine::ValidatePanel {
            piece_type: PieceType::Shelf,
            dimensions: Dimensions::new(1200.0, 18.0, 600.0),
        },
    );
    assert!(matches!(ok, EngineToUi::PanelChecked { valid: true, message: None }));

    let too_long = dispatch(
        &mut state,
        UiToEngine::ValidatePanel {
            piece_type: PieceType::Shelf,
            dimensions: Dimensions::new(2800.0, 18.0, 500.0),
        },
    );
    match too_long {
        EngineToUi::PanelChecked { valid, message } => {
            assert!(!valid);
            assert!(message.unwrap().contains("2800"));
        }
        other => panic!("unexpected {:?}", other),
    }
}

// ── History ──────────────────────────────────────────────────────────────

#[test]
fn undo_redo_round_trip_through_dispatch() {
    let mut state = kitchen_state();
    insert(&mut state, PieceType::LateralLeft);
    let after_shelf = insert(&mut state, PieceType::Shelf);

    let undone = dispatch(&mut state, UiToEngine::Undo);
    assert!(tree_of(&undone).is_leaf());

    let redone = dispatch(&mut state, UiToEngine::Redo);
    assert_eq!(tree_of(&redone), tree_of(&after_shelf));
}

#[test]
fn clear_pieces_empties_list() {
    let mut state = kitchen_state();
    insert(&mut state, PieceType::Shelf);
    insert(&mut state, PieceType::Top);
    let resp = dispatch(&mut state, UiToEngine::ClearPieces);
    match resp {
        EngineToUi::ModelUpdated { tree, pieces, .. } => {
            assert!(pieces.is_empty());
            assert!(tree.is_leaf());
        }
        other => panic!("unexpected {:?}", other),
    }
}

// ── JSON protocol ────────────────────────────────────────────────────────

#[test]
fn json_messages_round_trip() {
    let mut state = EngineState::new();
    let out = process_json(
        &mut state,
        r#"{"type":"CreateCarcass","name":"Bathroom","dimensions":{"width":600,"height":800,"depth":450}}"#,
    );
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(value["type"], "ModelUpdated");
    assert_eq!(value["tree"]["name"], "Bathroom");

    let out = process_json(&mut state, r#"{"type":"InsertPiece","piece_type":"shelf"}"#);
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(value["type"], "ModelUpdated");
    assert_eq!(value["pieces"][0]["type"], "shelf");
    assert_eq!(value["pieces"][0]["placement"]["strategy"]["type"], "Nominal");
    assert_eq!(value["tree"]["sub_spaces"].as_array().unwrap().len(), 2);
}

#[test]
fn malformed_json_becomes_error_response() {
    let mut state = EngineState::new();
    let out = process_json(&mut state, r#"{"type":"InsertPiece","piece_type":"drawer"}"#);
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(value["type"], "Error");
    assert_eq!(value["kind"], "InvalidParameter");
    assert!(value["piece_id"].is_null());
}

#[test]
fn every_request_variant_deserializes() {
    let messages = [
        r#"{"type":"SetDimensions","dimensions":{"width":1,"height":2,"depth":3}}"#,
        r#"{"type":"RemovePiece","piece_id":"67e55044-10b1-426f-9247-bb680e5fe0c8"}"#,
        r#"{"type":"ClearPieces"}"#,
        r#"{"type":"SelectSpace"}"#,
        r#"{"type":"SetDefaultThickness","thickness":15}"#,
        r#"{"type":"ValidatePanel","piece_type":"lateral_back","dimensions":{"width":1,"height":2,"depth":3}}"#,
        r#"{"type":"Undo"}"#,
        r#"{"type":"Redo"}"#,
    ];
    for json in messages {
        let parsed: Result<UiToEngine, _> = serde_json::from_str(json);
        assert!(parsed.is_ok(), "failed to parse {}", json);
    }
}
