//! Error type tests

use std::io;

use plantilla::error::{PlantillaError, PlantillaResult};

// ═══════════════════════════════════════════════════════════════════════════
// DISPLAY FORMATS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_io_error_display() {
    let err = PlantillaError::from(io::Error::new(io::ErrorKind::NotFound, "gone"));
    assert_eq!(err.to_string(), "IO error: gone");
}

#[test]
fn test_config_error_display() {
    let err = PlantillaError::Config("Configuration file not found: config/cell_mapping.json".to_string());
    assert_eq!(
        err.to_string(),
        "Configuration error: Configuration file not found: config/cell_mapping.json"
    );
}

#[test]
fn test_template_error_display() {
    let err = PlantillaError::Template("Template file does not contain sheet: Hoja1".to_string());
    assert_eq!(
        err.to_string(),
        "Template error: Template file does not contain sheet: Hoja1"
    );
}

#[test]
fn test_input_error_display() {
    let err = PlantillaError::Input("Input file is not valid JSON: trailing data".to_string());
    assert_eq!(
        err.to_string(),
        "Invalid input: Input file is not valid JSON: trailing data"
    );
}

#[test]
fn test_transform_error_display() {
    let err = PlantillaError::Transform("Field 'client' maps to a nested section".to_string());
    assert_eq!(
        err.to_string(),
        "Transform error: Field 'client' maps to a nested section"
    );
}

#[test]
fn test_fill_error_display() {
    let err = PlantillaError::Fill("Failed to save filled workbook: disk full".to_string());
    assert_eq!(
        err.to_string(),
        "Fill error: Failed to save filled workbook: disk full"
    );
}

// ═══════════════════════════════════════════════════════════════════════════
// CONVERSIONS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_io_error_converts_with_question_mark() {
    fn read_missing() -> PlantillaResult<String> {
        let content = std::fs::read_to_string("/nonexistent/plantilla-test-path")?;
        Ok(content)
    }

    let err = read_missing().unwrap_err();
    assert!(matches!(err, PlantillaError::Io(_)));
    assert!(err.to_string().starts_with("IO error: "));
}

#[test]
fn test_error_is_debug_printable() {
    let err = PlantillaError::Config("bad".to_string());
    let debug = format!("{err:?}");
    assert!(debug.contains("Config"));
}
