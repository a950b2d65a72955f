//! Cell mapping loading
//!
//! The mapping file is a JSON object whose leaves are `[row, column]` pairs.
//! It is read once at startup, normalized into a typed tree, and shared
//! read-only for the process lifetime. There is no hot reload.

use std::path::Path;

use serde_json::Value;
use tracing::debug;

use crate::error::{PlantillaError, PlantillaResult};
use crate::types::{CellMapping, MappingNode};

/// Load and normalize the cell mapping file.
///
/// Fails with a configuration error if the file is missing, is not valid
/// JSON, or its root is not a JSON object. Two-element integer arrays become
/// cell coordinates; every other leaf is kept opaque (see
/// [`MappingNode::from_value`]).
///
/// # Example
/// ```no_run
/// use plantilla::mapping::load_cell_mapping;
/// use std::path::Path;
///
/// let mapping = load_cell_mapping(Path::new("config/cell_mapping.json"))?;
/// println!("Sections: {}", mapping.len());
/// # Ok::<(), plantilla::error::PlantillaError>(())
/// ```
pub fn load_cell_mapping(path: &Path) -> PlantillaResult<CellMapping> {
    if !path.exists() {
        return Err(PlantillaError::Config(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let content = std::fs::read_to_string(path)?;
    let raw: Value = serde_json::from_str(&content)
        .map_err(|e| PlantillaError::Config(format!("Invalid JSON in configuration file: {e}")))?;

    let mapping = mapping_from_value(raw)?;
    debug!(
        "Loaded cell mapping: {} top-level sections, {} coordinates",
        mapping.len(),
        mapping.coordinate_count()
    );
    Ok(mapping)
}

/// Normalize an in-memory JSON value into a [`CellMapping`]
///
/// The root must be a JSON object; each value under it becomes a
/// [`MappingNode`].
pub fn mapping_from_value(value: Value) -> PlantillaResult<CellMapping> {
    match value {
        Value::Object(map) => Ok(CellMapping::new(
            map.into_iter()
                .map(|(key, val)| (key, MappingNode::from_value(val)))
                .collect(),
        )),
        _ => Err(PlantillaError::Config(
            "Cell mapping root must be a JSON object".to_string(),
        )),
    }
}
