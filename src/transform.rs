//! Document-to-cell transform
//!
//! Walks the request document and the loaded mapping in lock-step, emitting
//! one cell assignment per matched leaf. Keys the mapping does not know are
//! ignored; keys it does know must agree in shape on both sides.

use std::collections::HashMap;

use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{PlantillaError, PlantillaResult};
use crate::types::{CellAssignments, CellMapping, MappingNode};

/// Field whose value is looked up as a key in the current mapping level
pub const STATUS_KEY: &str = "status";
/// Marker written to the cell a recognized status literal resolves to
pub const STATUS_MARK: &str = "X";
/// The three recognized status literals
pub const STATUS_LITERALS: [&str; 3] = ["complies", "does_not_comply", "not_applicable"];

/// Transform a request document into a flat set of cell assignments.
///
/// Descends document and mapping together. An object value recurses into the
/// matching branch; a non-object value lands on the matching coordinate. The
/// `status` convention applies only where the current mapping level has no
/// entry literally named `status`: the field's *value* is then used as the
/// lookup key and the matched cell receives [`STATUS_MARK`]. Values outside
/// the three literals are ignored.
pub fn transform_document(
    document: &Map<String, Value>,
    mapping: &CellMapping,
) -> PlantillaResult<CellAssignments> {
    let mut cells = CellAssignments::new();
    let mut path = Vec::new();
    walk_level(document, &mapping.root, &mut path, &mut cells)?;
    debug!("Transform produced {} cell assignments", cells.len());
    Ok(cells)
}

fn walk_level<'a>(
    document: &'a Map<String, Value>,
    level: &HashMap<String, MappingNode>,
    path: &mut Vec<&'a str>,
    cells: &mut CellAssignments,
) -> PlantillaResult<()> {
    for (key, value) in document {
        if let Some(node) = level.get(key) {
            // A mapping entry named `status` shadows the status convention
            path.push(key.as_str());
            let matched = match_node(value, node, path, cells);
            path.pop();
            matched?;
        } else if key == STATUS_KEY {
            apply_status(value, level, path, cells)?;
        }
        // Keys absent from the mapping are ignored
    }
    Ok(())
}

fn match_node<'a>(
    value: &'a Value,
    node: &MappingNode,
    path: &mut Vec<&'a str>,
    cells: &mut CellAssignments,
) -> PlantillaResult<()> {
    match (node, value) {
        (MappingNode::Branch(inner), Value::Object(sub)) => walk_level(sub, inner, path, cells),
        (MappingNode::Branch(_), _) => Err(PlantillaError::Transform(format!(
            "Field '{}' maps to a nested section but its value is not an object",
            dotted(path)
        ))),
        (MappingNode::Coordinate(_), Value::Object(_)) => Err(PlantillaError::Transform(format!(
            "Field '{}' maps to a single cell but its value is an object",
            dotted(path)
        ))),
        (MappingNode::Coordinate(cell), _) => {
            cells.insert(*cell, value.clone());
            Ok(())
        }
        (MappingNode::Opaque(_), _) => Err(PlantillaError::Transform(format!(
            "Field '{}' is not mapped to a cell coordinate",
            dotted(path)
        ))),
    }
}

/// Resolve a `status` value against the current mapping level
fn apply_status(
    value: &Value,
    level: &HashMap<String, MappingNode>,
    path: &[&str],
    cells: &mut CellAssignments,
) -> PlantillaResult<()> {
    let literal = match value.as_str() {
        Some(s) if STATUS_LITERALS.contains(&s) => s,
        // Unrecognized status values produce no assignment and no error
        _ => return Ok(()),
    };

    match level.get(literal) {
        Some(MappingNode::Coordinate(cell)) => {
            cells.insert(*cell, Value::String(STATUS_MARK.to_string()));
            Ok(())
        }
        Some(_) => Err(PlantillaError::Transform(format!(
            "Status literal '{literal}' is not mapped to a cell coordinate at {}",
            level_name(path)
        ))),
        None => Err(PlantillaError::Transform(format!(
            "Status literal '{literal}' has no mapping entry at {}",
            level_name(path)
        ))),
    }
}

fn dotted(path: &[&str]) -> String {
    path.join(".")
}

/// Name of the current mapping level for diagnostics
fn level_name(path: &[&str]) -> String {
    if path.is_empty() {
        "the mapping root".to_string()
    } else {
        format!("'{}'", path.join("."))
    }
}
