//! Excel template handling
//!
//! Reading goes through calamine, writing through rust_xlsxwriter: the
//! template is snapshotted sheet by sheet and re-rendered with the cell
//! assignments applied. Cell values, formulas, and sheet names/order are
//! preserved; cell styling is not.

mod filler;
mod template;

pub use filler::{FilledTemplate, TemplateFiller};
pub use template::validate_template;
