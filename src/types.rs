use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

//==============================================================================
// Cell Coordinates
//==============================================================================

/// A 1-based (row, column) cell coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellRef {
    pub row: i64,
    pub col: i64,
}

impl CellRef {
    pub fn new(row: i64, col: i64) -> Self {
        Self { row, col }
    }

    /// Whether the coordinate addresses a real cell; non-positive rows or
    /// columns are skipped at fill time
    pub fn is_writable(self) -> bool {
        self.row > 0 && self.col > 0
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

//==============================================================================
// Mapping Tree
//==============================================================================

/// One node of the loaded cell mapping
#[derive(Debug, Clone, PartialEq)]
pub enum MappingNode {
    /// Interior level keyed by field name
    Branch(HashMap<String, MappingNode>),
    /// Leaf naming the target cell for a field
    Coordinate(CellRef),
    /// Any other leaf value from the mapping file, preserved untouched
    Opaque(Value),
}

impl MappingNode {
    /// Normalize a raw mapping value into a tree node
    ///
    /// A two-element array of integers becomes a `Coordinate`; an object
    /// becomes a `Branch` with its values normalized recursively; everything
    /// else stays `Opaque`. Arrays are never descended into, so a coordinate
    /// nested inside a longer array is not recognized.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(map) => MappingNode::Branch(
                map.into_iter()
                    .map(|(key, val)| (key, MappingNode::from_value(val)))
                    .collect(),
            ),
            Value::Array(items) => {
                if items.len() == 2 {
                    // Both elements must be integers; pairs like [1.5, 2] stay opaque
                    if let (Some(row), Some(col)) = (items[0].as_i64(), items[1].as_i64()) {
                        return MappingNode::Coordinate(CellRef::new(row, col));
                    }
                }
                MappingNode::Opaque(Value::Array(items))
            }
            other => MappingNode::Opaque(other),
        }
    }

    pub fn as_branch(&self) -> Option<&HashMap<String, MappingNode>> {
        match self {
            MappingNode::Branch(level) => Some(level),
            _ => None,
        }
    }

    pub fn as_coordinate(&self) -> Option<CellRef> {
        match self {
            MappingNode::Coordinate(cell) => Some(*cell),
            _ => None,
        }
    }
}

/// The complete mapping loaded from `cell_mapping.json`
///
/// Immutable after startup; shared read-only across requests.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CellMapping {
    pub root: HashMap<String, MappingNode>,
}

impl CellMapping {
    pub fn new(root: HashMap<String, MappingNode>) -> Self {
        Self { root }
    }

    pub fn get(&self, key: &str) -> Option<&MappingNode> {
        self.root.get(key)
    }

    /// Number of top-level sections
    pub fn len(&self) -> usize {
        self.root.len()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Total number of coordinate leaves anywhere in the tree
    pub fn coordinate_count(&self) -> usize {
        count_coordinates(&self.root)
    }
}

fn count_coordinates(level: &HashMap<String, MappingNode>) -> usize {
    level
        .values()
        .map(|node| match node {
            MappingNode::Branch(inner) => count_coordinates(inner),
            MappingNode::Coordinate(_) => 1,
            MappingNode::Opaque(_) => 0,
        })
        .sum()
}

//==============================================================================
// Cell Assignments
//==============================================================================

/// Flat set of cell writes produced by the transform
///
/// Keys deduplicate implicitly; a later write to the same cell replaces the
/// earlier one.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CellAssignments {
    pub cells: HashMap<CellRef, Value>,
}

impl CellAssignments {
    pub fn new() -> Self {
        Self {
            cells: HashMap::new(),
        }
    }

    pub fn insert(&mut self, cell: CellRef, value: Value) {
        self.cells.insert(cell, value);
    }

    pub fn get(&self, cell: &CellRef) -> Option<&Value> {
        self.cells.get(cell)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CellRef, &Value)> {
        self.cells.iter()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}
