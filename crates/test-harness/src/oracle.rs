//! Verification oracles: pure functions returning pass/fail verdicts.
//!
//! Each oracle returns an `OracleVerdict` with diagnostic detail instead of
//! panicking, so a caller can collect every failure in one pass.

use std::collections::HashSet;

use carcass_engine::{rebuild_carcass, Carcass, Engine};
use carcass_types::{Axis, Piece, Space};
use partition_ops::{validate_panel_size, PanelEnvelope, PlacementConfig};

/// Tolerance used when comparing extents (mm).
pub const EXTENT_TOLERANCE: f64 = 1e-6;

/// The result of a single oracle check.
#[derive(Debug, Clone)]
pub struct OracleVerdict {
    pub oracle_name: String,
    pub passed: bool,
    pub detail: String,
    pub value: Option<f64>,
}

impl OracleVerdict {
    fn pass(name: &str, detail: String) -> Self {
        Self {
            oracle_name: name.to_string(),
            passed: true,
            detail,
            value: None,
        }
    }

    fn pass_val(name: &str, detail: String, value: f64) -> Self {
        Self {
            oracle_name: name.to_string(),
            passed: true,
            detail,
            value: Some(value),
        }
    }

    fn fail(name: &str, detail: String) -> Self {
        Self {
            oracle_name: name.to_string(),
            passed: false,
            detail,
            value: None,
        }
    }

    fn fail_val(name: &str, detail: String, value: f64) -> Self {
        Self {
            oracle_name: name.to_string(),
            passed: false,
            detail,
            value: Some(value),
        }
    }
}

// ── Tree Shape Oracles ──────────────────────────────────────────────────────

/// Every node has zero or two children, and only leaves are active.
pub fn check_split_arity(tree: &Space) -> OracleVerdict {
    let mut problems = Vec::new();
    for node in tree.descendants() {
        let n = node.children().len();
        if n != 0 && n != 2 {
            problems.push(format!("'{}' has {} children", node.name, n));
        }
        if node.is_active != node.is_leaf() {
            problems.push(format!(
                "'{}' is_active={} but leaf={}",
                node.name,
                node.is_active,
                node.is_leaf()
            ));
        }
        for child in node.children() {
            if child.parent_space_id != Some(node.id) {
                problems.push(format!("'{}' does not point back to its parent", child.name));
            }
        }
    }

    if problems.is_empty() {
        OracleVerdict::pass(
            "split_arity",
            format!("{} nodes, {} leaves", tree.descendants().len(), tree.leaves().len()),
        )
    } else {
        OracleVerdict::fail("split_arity", problems.join("; "))
    }
}

/// No two nodes share an id.
pub fn check_unique_ids(tree: &Space) -> OracleVerdict {
    let mut seen = HashSet::new();
    let mut duplicates = Vec::new();
    for node in tree.descendants() {
        if !seen.insert(node.id) {
            duplicates.push(node.id.to_string());
        }
    }
    if duplicates.is_empty() {
        OracleVerdict::pass("unique_ids", format!("{} distinct ids", seen.len()))
    } else {
        OracleVerdict::fail("unique_ids", format!("duplicated: {}", duplicates.join(", ")))
    }
}

// ── Geometry Oracles ────────────────────────────────────────────────────────

/// No space or placed piece has a negative extent.
pub fn check_non_negative(tree: &Space) -> OracleVerdict {
    let mut problems = Vec::new();
    for node in tree.descendants() {
        if !node.current_dimensions.is_non_negative() {
            problems.push(format!("space '{}': {:?}", node.name, node.current_dimensions));
        }
        for piece in &node.pieces {
            if let Some(dims) = piece.dimensions() {
                if !dims.is_non_negative() {
                    problems.push(format!("piece '{}': {:?}", piece.name, dims));
                }
            }
        }
    }
    if problems.is_empty() {
        OracleVerdict::pass("non_negative", "all extents >= 0".to_string())
    } else {
        OracleVerdict::fail("non_negative", problems.join("; "))
    }
}

/// For every split node, the two children plus the splitting cut add up to
/// the parent's extent along the split axis, and match it on the others.
/// Children are compared by their creation box, before their own cuts.
pub fn check_extent_conservation(tree: &Space) -> OracleVerdict {
    let mut worst: f64 = 0.0;
    let mut problems = Vec::new();

    for node in tree.descendants() {
        let [a, b] = match node.children() {
            [a, b] => [a, b],
            _ => continue,
        };
        let Some(splitter) = node.splitting_piece() else {
            problems.push(format!("'{}' is split but has no splitting piece", node.name));
            continue;
        };
        let split_axis = splitter.piece_type.axis();
        let parent = node.current_dimensions;

        for axis in Axis::ALL {
            let (expected, actual) = if axis == split_axis {
                (
                    parent.along(axis),
                    a.original_dimensions.along(axis)
                        + b.original_dimensions.along(axis)
                        + splitter.cut_depth(),
                )
            } else {
                (parent.along(axis), a.original_dimensions.along(axis))
            };
            let mut delta = (expected - actual).abs();
            if axis != split_axis {
                delta = delta.max((expected - b.original_dimensions.along(axis)).abs());
            }
            worst = worst.max(delta);
            if delta > EXTENT_TOLERANCE {
                problems.push(format!(
                    "'{}' {}: expected {:.6}, got {:.6}",
                    node.name,
                    axis.dimension_name(),
                    expected,
                    actual
                ));
            }
        }
    }

    if problems.is_empty() {
        OracleVerdict::pass_val(
            "extent_conservation",
            format!("max deviation {:.2e}", worst),
            worst,
        )
    } else {
        OracleVerdict::fail_val("extent_conservation", problems.join("; "), worst)
    }
}

/// Pieces that share a root-to-leaf path never overlap beyond `epsilon`.
pub fn check_no_overlap(tree: &Space, epsilon: f64) -> OracleVerdict {
    let mut problems = Vec::new();
    let mut paths = 0usize;

    let mut stack: Vec<(&Space, Vec<&Piece>)> = vec![(tree, Vec::new())];
    while let Some((node, mut inherited)) = stack.pop() {
        inherited.extend(node.pieces.iter());
        if node.is_leaf() {
            paths += 1;
            for (i, p) in inherited.iter().enumerate() {
                for q in &inherited[i + 1..] {
                    if let (Some(pb), Some(qb)) = (p.bounds(), q.bounds()) {
                        if pb.overlaps(&qb, epsilon) {
                            problems.push(format!("'{}' overlaps '{}'", p.name, q.name));
                        }
                    }
                }
            }
        } else {
            for child in node.children() {
                stack.push((child, inherited.clone()));
            }
        }
    }

    problems.sort();
    problems.dedup();
    if problems.is_empty() {
        OracleVerdict::pass("no_overlap", format!("{} leaf paths checked", paths))
    } else {
        OracleVerdict::fail("no_overlap", problems.join("; "))
    }
}

/// Every placed piece fits the raw-panel envelope.
pub fn check_panel_envelope(pieces: &[Piece], envelope: &PanelEnvelope) -> OracleVerdict {
    let mut problems = Vec::new();
    for piece in pieces {
        let Some(dims) = piece.dimensions() else {
            problems.push(format!("'{}' has no placement", piece.name));
            continue;
        };
        if let Err(e) = validate_panel_size(piece.piece_type, &dims, envelope) {
            problems.push(format!("'{}': {}", piece.name, e));
        }
    }
    if problems.is_empty() {
        OracleVerdict::pass("panel_envelope", format!("{} pieces within envelope", pieces.len()))
    } else {
        OracleVerdict::fail("panel_envelope", problems.join("; "))
    }
}

// ── Replay Oracles ──────────────────────────────────────────────────────────

/// Replaying the carcass twice yields identical trees, ids included, and
/// both match `current` when given.
pub fn check_determinism(
    carcass: &Carcass,
    config: &PlacementConfig,
    current: Option<&Space>,
) -> OracleVerdict {
    let first = match rebuild_carcass(carcass, config) {
        Ok(r) => r,
        Err(e) => return OracleVerdict::fail("determinism", format!("replay failed: {}", e)),
    };
    let second = match rebuild_carcass(carcass, config) {
        Ok(r) => r,
        Err(e) => {
            return OracleVerdict::fail("determinism", format!("second replay failed: {}", e))
        }
    };

    if first != second {
        return OracleVerdict::fail("determinism", "two replays differ".to_string());
    }
    if let Some(tree) = current {
        if &first.tree != tree {
            return OracleVerdict::fail(
                "determinism",
                "replay differs from the current tree".to_string(),
            );
        }
    }
    OracleVerdict::pass(
        "determinism",
        format!("{} pieces replayed identically", carcass.pieces.len()),
    )
}

// ── Run All ─────────────────────────────────────────────────────────────────

/// Run every oracle against the engine's current state.
pub fn run_all(engine: &Engine) -> Vec<OracleVerdict> {
    let tree = engine.tree();
    let config = engine.config();
    vec![
        check_split_arity(tree),
        check_unique_ids(tree),
        check_non_negative(tree),
        check_extent_conservation(tree),
        check_no_overlap(tree, config.overlap_epsilon),
        check_panel_envelope(engine.pieces(), &config.panel),
        check_determinism(engine.carcass(), config, Some(tree)),
    ]
}
