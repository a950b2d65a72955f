//! Plantilla - Excel template filling from nested JSON
//!
//! This library maps the fields of a nested JSON document onto fixed cell
//! coordinates of a template workbook, using a static mapping file, and
//! produces a filled copy of the template.
//!
//! # Features
//!
//! - Nested key → (row, column) cell mapping loaded from JSON
//! - Tri-state `status` convention (complies / does_not_comply / not_applicable)
//! - Template re-render preserving sheets, values, and formulas
//! - HTTP API (`POST /fill-template`) returning the filled copy as a download
//! - Offline CLI fill for batch use
//!
//! # Example
//!
//! ```no_run
//! use plantilla::excel::TemplateFiller;
//! use plantilla::mapping::load_cell_mapping;
//! use plantilla::transform::transform_document;
//! use std::path::Path;
//!
//! let mapping = load_cell_mapping(Path::new("config/cell_mapping.json"))?;
//!
//! let document = serde_json::json!({
//!     "client": {"name": "Acme"},
//!     "status": "complies"
//! });
//! let assignments = transform_document(document.as_object().unwrap(), &mapping)?;
//!
//! let filler = TemplateFiller::new("config/template.xlsx", "Hoja1");
//! filler.fill_into(&assignments, Path::new("filled.xlsx"))?;
//! # Ok::<(), plantilla::error::PlantillaError>(())
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod excel;
pub mod mapping;
pub mod transform;
pub mod types;

// Re-export commonly used types
pub use config::{AppEnv, Settings};
pub use error::{PlantillaError, PlantillaResult};
pub use types::{CellAssignments, CellMapping, CellRef, MappingNode};
