//! Excel template validation and fill tests

use std::fs;
use std::path::Path;

use calamine::{open_workbook, Data, Range, Reader, Xlsx};
use plantilla::excel::{validate_template, TemplateFiller};
use plantilla::mapping::mapping_from_value;
use plantilla::transform::transform_document;
use plantilla::types::{CellAssignments, CellRef};
use pretty_assertions::assert_eq;
use rust_xlsxwriter::Workbook;
use serde_json::json;
use tempfile::TempDir;

fn write_template(path: &Path, sheet: &str) {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet).unwrap();
    worksheet.write_string(0, 0, "Informe de inspección").unwrap();
    worksheet.write_string(1, 1, "Fecha:").unwrap();
    worksheet.write_number(1, 2, 2024.0).unwrap();
    workbook.save(path).unwrap();
}

fn read_sheet(path: &Path, sheet: &str) -> Range<Data> {
    let mut workbook: Xlsx<_> = open_workbook(path).unwrap();
    workbook.worksheet_range(sheet).unwrap()
}

// ═══════════════════════════════════════════════════════════════════════════
// TEMPLATE VALIDATION
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_validate_template_ok() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("template.xlsx");
    write_template(&path, "Hoja1");

    assert!(validate_template(&path, "Hoja1").is_ok());
}

#[test]
fn test_validate_template_missing_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("template.xlsx");

    let err = validate_template(&path, "Hoja1").unwrap_err();

    assert!(err.to_string().contains("Template file not found"));
}

#[test]
fn test_validate_template_missing_sheet() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("template.xlsx");
    write_template(&path, "Datos");

    let err = validate_template(&path, "Hoja1").unwrap_err();

    assert!(err
        .to_string()
        .contains("does not contain sheet: Hoja1"));
}

#[test]
fn test_validate_template_corrupt_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("template.xlsx");
    fs::write(&path, b"this is not a zip archive").unwrap();

    let err = validate_template(&path, "Hoja1").unwrap_err();

    assert!(err.to_string().contains("Error validating template file"));
}

// ═══════════════════════════════════════════════════════════════════════════
// FILL ROUND TRIPS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_fill_round_trip_from_document() {
    let dir = TempDir::new().unwrap();
    let template = dir.path().join("template.xlsx");
    let output = dir.path().join("filled.xlsx");
    write_template(&template, "Hoja1");

    let mapping = mapping_from_value(json!({
        "inspector": [3, 3],
        "sections": {
            "safety": {"complies": [9, 4], "observations": [9, 7]}
        },
        "score": [14, 3]
    }))
    .unwrap();
    let document = json!({
        "inspector": "M. Rojas",
        "sections": {"safety": {"status": "complies", "observations": "ok"}},
        "score": 87.5
    });

    let cells = transform_document(document.as_object().unwrap(), &mapping).unwrap();
    let filler = TemplateFiller::new(&template, "Hoja1");
    filler.fill_into(&cells, &output).unwrap();

    let sheet = read_sheet(&output, "Hoja1");
    assert_eq!(
        sheet.get_value((2, 2)),
        Some(&Data::String("M. Rojas".to_string()))
    );
    assert_eq!(sheet.get_value((8, 3)), Some(&Data::String("X".to_string())));
    assert_eq!(sheet.get_value((8, 6)), Some(&Data::String("ok".to_string())));
    assert_eq!(sheet.get_value((13, 2)), Some(&Data::Float(87.5)));
    // Template content survives untouched
    assert_eq!(
        sheet.get_value((0, 0)),
        Some(&Data::String("Informe de inspección".to_string()))
    );
}

#[test]
fn test_fill_number_kinds() {
    let dir = TempDir::new().unwrap();
    let template = dir.path().join("template.xlsx");
    let output = dir.path().join("filled.xlsx");
    write_template(&template, "Hoja1");

    let mut cells = CellAssignments::new();
    cells.insert(CellRef::new(5, 1), json!(42));
    cells.insert(CellRef::new(6, 1), json!(3.25));
    cells.insert(CellRef::new(7, 1), json!(true));

    let filler = TemplateFiller::new(&template, "Hoja1");
    filler.fill_into(&cells, &output).unwrap();

    let sheet = read_sheet(&output, "Hoja1");
    assert_eq!(sheet.get_value((4, 0)), Some(&Data::Float(42.0)));
    assert_eq!(sheet.get_value((5, 0)), Some(&Data::Float(3.25)));
    assert_eq!(sheet.get_value((6, 0)), Some(&Data::Bool(true)));
}

#[test]
fn test_fill_overwrites_template_cell() {
    let dir = TempDir::new().unwrap();
    let template = dir.path().join("template.xlsx");
    let output = dir.path().join("filled.xlsx");
    write_template(&template, "Hoja1");

    // (2, 3) holds 2024.0 in the template
    let mut cells = CellAssignments::new();
    cells.insert(CellRef::new(2, 3), json!(2031));

    let filler = TemplateFiller::new(&template, "Hoja1");
    filler.fill_into(&cells, &output).unwrap();

    let sheet = read_sheet(&output, "Hoja1");
    assert_eq!(sheet.get_value((1, 2)), Some(&Data::Float(2031.0)));
}

#[test]
fn test_fill_produces_valid_xlsx_bytes() {
    let dir = TempDir::new().unwrap();
    let template = dir.path().join("template.xlsx");
    write_template(&template, "Hoja1");

    let mut cells = CellAssignments::new();
    cells.insert(CellRef::new(4, 2), json!("value"));

    let filler = TemplateFiller::new(&template, "Hoja1");
    let filled = filler.fill(&cells).unwrap();
    let bytes = filled.read_bytes().unwrap();

    // xlsx files are zip archives
    assert!(bytes.len() > 4);
    assert_eq!(&bytes[0..2], b"PK");
    assert!(filled.file_name().starts_with("filled_template_"));
    assert!(filled.file_name().ends_with(".xlsx"));

    filled.cleanup();
}

#[test]
fn test_fill_out_of_bounds_coordinate_is_error() {
    let dir = TempDir::new().unwrap();
    let template = dir.path().join("template.xlsx");
    let output = dir.path().join("filled.xlsx");
    write_template(&template, "Hoja1");

    let mut cells = CellAssignments::new();
    cells.insert(CellRef::new(1_048_577, 1), json!("too far"));

    let filler = TemplateFiller::new(&template, "Hoja1");
    let err = filler.fill_into(&cells, &output).unwrap_err();

    assert!(err.to_string().contains("outside worksheet bounds"));
}

#[test]
fn test_fill_object_value_is_error() {
    let dir = TempDir::new().unwrap();
    let template = dir.path().join("template.xlsx");
    let output = dir.path().join("filled.xlsx");
    write_template(&template, "Hoja1");

    let mut cells = CellAssignments::new();
    cells.insert(CellRef::new(2, 2), json!({"nested": 1}));

    let filler = TemplateFiller::new(&template, "Hoja1");
    let err = filler.fill_into(&cells, &output).unwrap_err();

    assert!(err.to_string().contains("is not a scalar"));
}
