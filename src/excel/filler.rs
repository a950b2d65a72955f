//! Template filling

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use calamine::{open_workbook, Data, Range, Reader, Xlsx};
use chrono::Local;
use rust_xlsxwriter::{Formula, Workbook, Worksheet};
use serde_json::Value;
use tempfile::TempDir;
use tracing::{debug, warn};

use crate::error::{PlantillaError, PlantillaResult};
use crate::types::CellAssignments;

/// xlsx worksheet limits, 1-based
const XLSX_MAX_ROW: i64 = 1_048_576;
const XLSX_MAX_COL: i64 = 16_384;

/// One template sheet captured for re-rendering
struct SheetSnapshot {
    name: String,
    cells: Range<Data>,
    formulas: Option<Range<String>>,
}

/// Fills copies of a template workbook with cell assignments
///
/// The template file itself is never mutated; it is re-read for every fill,
/// so template corruption after startup surfaces as a per-request error
/// rather than a crash.
pub struct TemplateFiller {
    template_path: PathBuf,
    sheet_name: String,
}

impl TemplateFiller {
    pub fn new<P: AsRef<Path>>(template_path: P, sheet_name: &str) -> Self {
        Self {
            template_path: template_path.as_ref().to_path_buf(),
            sheet_name: sheet_name.to_string(),
        }
    }

    /// Fill a fresh copy of the template into a new temporary directory.
    ///
    /// The returned handle owns the directory; call
    /// [`FilledTemplate::cleanup`] once the file has been consumed. If the
    /// fill fails the directory is already removed.
    pub fn fill(&self, assignments: &CellAssignments) -> PlantillaResult<FilledTemplate> {
        let sheets = self.snapshot_sheets()?;
        let dir = TempDir::new()?;
        let file_name = format!(
            "filled_template_{}.xlsx",
            Local::now().format("%Y%m%d_%H%M%S")
        );
        let path = dir.path().join(&file_name);

        if let Err(e) = self.render(&sheets, assignments, &path) {
            if let Err(close_err) = dir.close() {
                warn!("Error cleaning temporary directory: {close_err}");
            }
            return Err(e);
        }

        Ok(FilledTemplate {
            file_name,
            path,
            dir,
        })
    }

    /// Fill a fresh copy of the template into a caller-chosen file.
    pub fn fill_into(&self, assignments: &CellAssignments, output: &Path) -> PlantillaResult<()> {
        let sheets = self.snapshot_sheets()?;
        self.render(&sheets, assignments, output)
    }

    /// Read every sheet of the template: values plus formulas
    fn snapshot_sheets(&self) -> PlantillaResult<Vec<SheetSnapshot>> {
        let mut workbook: Xlsx<_> = open_workbook(&self.template_path)
            .map_err(|e| PlantillaError::Fill(format!("Failed to open template file: {e}")))?;

        let sheet_names = workbook.sheet_names().to_vec();
        let mut sheets = Vec::with_capacity(sheet_names.len());
        for name in sheet_names {
            let cells = workbook.worksheet_range(&name).map_err(|e| {
                PlantillaError::Fill(format!("Failed to read template sheet '{name}': {e}"))
            })?;
            let formulas = workbook.worksheet_formula(&name).ok();
            sheets.push(SheetSnapshot {
                name,
                cells,
                formulas,
            });
        }
        Ok(sheets)
    }

    /// Re-render all sheets, overlaying the assignments onto the target sheet
    fn render(
        &self,
        sheets: &[SheetSnapshot],
        assignments: &CellAssignments,
        output: &Path,
    ) -> PlantillaResult<()> {
        let overlay = build_overlay(assignments)?;
        let mut workbook = Workbook::new();
        let mut sheet_found = false;

        for snapshot in sheets {
            let worksheet = workbook.add_worksheet();
            worksheet.set_name(&snapshot.name).map_err(|e| {
                PlantillaError::Fill(format!(
                    "Failed to name worksheet '{}': {e}",
                    snapshot.name
                ))
            })?;

            let sheet_overlay = if snapshot.name == self.sheet_name {
                sheet_found = true;
                Some(&overlay)
            } else {
                None
            };
            write_sheet(worksheet, snapshot, sheet_overlay)?;
        }

        if !sheet_found {
            return Err(PlantillaError::Fill(format!(
                "Template file does not contain sheet: {}",
                self.sheet_name
            )));
        }

        workbook
            .save(output)
            .map_err(|e| PlantillaError::Fill(format!("Failed to save filled workbook: {e}")))?;
        Ok(())
    }
}

/// A filled workbook living in its own temporary directory
#[derive(Debug)]
pub struct FilledTemplate {
    file_name: String,
    path: PathBuf,
    dir: TempDir,
}

impl FilledTemplate {
    /// Timestamped download filename
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the finished workbook into memory
    pub fn read_bytes(&self) -> PlantillaResult<Vec<u8>> {
        Ok(std::fs::read(&self.path)?)
    }

    /// Remove the temporary directory; failures are logged, never propagated
    pub fn cleanup(self) {
        if let Err(e) = self.dir.close() {
            warn!("Error cleaning temporary directory: {e}");
        }
    }
}

/// Index the writable assignments by 0-based output position
///
/// Non-writable coordinates (row or column < 1) are skipped; coordinates
/// beyond the xlsx sheet limits are errors. Null values stay in the overlay
/// so they can clear template cells.
fn build_overlay(assignments: &CellAssignments) -> PlantillaResult<HashMap<(u32, u16), &Value>> {
    let mut overlay = HashMap::new();
    for (cell, value) in assignments.iter() {
        if !cell.is_writable() {
            debug!("Skipping non-writable cell coordinate {cell}");
            continue;
        }
        if cell.row > XLSX_MAX_ROW || cell.col > XLSX_MAX_COL {
            return Err(PlantillaError::Fill(format!(
                "Cell coordinate {cell} is outside worksheet bounds"
            )));
        }
        overlay.insert(((cell.row - 1) as u32, (cell.col - 1) as u16), value);
    }
    Ok(overlay)
}

fn write_sheet(
    worksheet: &mut Worksheet,
    snapshot: &SheetSnapshot,
    overlay: Option<&HashMap<(u32, u16), &Value>>,
) -> PlantillaResult<()> {
    // Template cells, with formulas taking precedence over cached values
    if let Some((start_row, start_col)) = snapshot.cells.start() {
        for (row, col, data) in snapshot.cells.used_cells() {
            let row = start_row + row as u32;
            let col_abs = start_col + col as u32;
            let col = checked_col(row, col_abs)?;
            if overlay.is_some_and(|o| o.contains_key(&(row, col))) {
                continue;
            }
            if let Some(formula) = sheet_formula(snapshot, row, col_abs) {
                worksheet
                    .write_formula(row, col, Formula::new(formula))
                    .map_err(|e| {
                        PlantillaError::Fill(format!("Failed to write formula: {e}"))
                    })?;
            } else {
                write_template_data(worksheet, row, col, data)?;
            }
        }
    }

    // Formula cells without a cached value never show up in the value range
    if let Some(formulas) = &snapshot.formulas {
        if let Some((start_row, start_col)) = formulas.start() {
            for (row, col, formula) in formulas.used_cells() {
                if formula.is_empty() {
                    continue;
                }
                let row = start_row + row as u32;
                let col_abs = start_col + col as u32;
                if has_value(&snapshot.cells, row, col_abs) {
                    continue;
                }
                let col = checked_col(row, col_abs)?;
                if overlay.is_some_and(|o| o.contains_key(&(row, col))) {
                    continue;
                }
                worksheet
                    .write_formula(row, col, Formula::new(formula.as_str()))
                    .map_err(|e| {
                        PlantillaError::Fill(format!("Failed to write formula: {e}"))
                    })?;
            }
        }
    }

    if let Some(overlay) = overlay {
        for (&(row, col), &value) in overlay {
            write_assignment(worksheet, row, col, value)?;
        }
    }

    Ok(())
}

fn checked_col(row: u32, col_abs: u32) -> PlantillaResult<u16> {
    u16::try_from(col_abs).map_err(|_| {
        PlantillaError::Fill(format!(
            "Template cell ({}, {}) is outside worksheet bounds",
            row + 1,
            col_abs + 1
        ))
    })
}

/// Formula text at an absolute position, if any
fn sheet_formula(snapshot: &SheetSnapshot, row: u32, col: u32) -> Option<&str> {
    let range = snapshot.formulas.as_ref()?;
    match range.get_value((row, col)) {
        Some(f) if !f.is_empty() => Some(f.as_str()),
        _ => None,
    }
}

fn has_value(cells: &Range<Data>, row: u32, col: u32) -> bool {
    cells
        .get_value((row, col))
        .is_some_and(|data| !matches!(data, Data::Empty))
}

fn write_template_data(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    data: &Data,
) -> PlantillaResult<()> {
    let written = match data {
        // Error cells cannot be re-rendered; leave them blank
        Data::Empty | Data::Error(_) => return Ok(()),
        Data::String(s) => worksheet.write_string(row, col, s),
        Data::Float(f) => worksheet.write_number(row, col, *f),
        Data::Int(i) => worksheet.write_number(row, col, *i as f64),
        Data::Bool(b) => worksheet.write_boolean(row, col, *b),
        Data::DateTime(dt) => worksheet.write_number(row, col, dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => worksheet.write_string(row, col, s),
    };
    written.map_err(|e| PlantillaError::Fill(format!("Failed to write template cell: {e}")))?;
    Ok(())
}

fn write_assignment(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    value: &Value,
) -> PlantillaResult<()> {
    let written = match value {
        // An explicit null clears the template cell; nothing is written
        Value::Null => return Ok(()),
        Value::String(s) => worksheet.write_string(row, col, s),
        Value::Bool(b) => worksheet.write_boolean(row, col, *b),
        Value::Number(n) => {
            let number = n.as_f64().ok_or_else(|| {
                PlantillaError::Fill(format!(
                    "Numeric value for cell ({}, {}) cannot be represented",
                    row + 1,
                    col + 1
                ))
            })?;
            worksheet.write_number(row, col, number)
        }
        Value::Array(_) | Value::Object(_) => {
            return Err(PlantillaError::Fill(format!(
                "Value for cell ({}, {}) is not a scalar",
                row + 1,
                col + 1
            )))
        }
    };
    written.map_err(|e| {
        PlantillaError::Fill(format!("Failed to write cell ({}, {}): {e}", row + 1, col + 1))
    })?;
    Ok(())
}
