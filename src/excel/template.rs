//! Template validation

use std::path::Path;

use calamine::{open_workbook, Reader, Xlsx};

use crate::error::{PlantillaError, PlantillaResult};

/// Check that the template workbook exists and contains the expected sheet.
///
/// Run once at startup; the server refuses to start if this fails.
pub fn validate_template(path: &Path, sheet_name: &str) -> PlantillaResult<()> {
    if !path.exists() {
        return Err(PlantillaError::Template(format!(
            "Template file not found: {}",
            path.display()
        )));
    }

    let workbook: Xlsx<_> = open_workbook(path)
        .map_err(|e| PlantillaError::Template(format!("Error validating template file: {e}")))?;

    if !workbook
        .sheet_names()
        .iter()
        .any(|name| name.as_str() == sheet_name)
    {
        return Err(PlantillaError::Template(format!(
            "Template file does not contain sheet: {sheet_name}"
        )));
    }

    Ok(())
}
