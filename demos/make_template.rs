//! Generates a starter template workbook matching config/cell_mapping.json.
//!
//! Usage: cargo run --example make_template [output.xlsx]

use rust_xlsxwriter::{Workbook, XlsxError};

fn main() -> Result<(), XlsxError> {
    let output = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config/template.xlsx".to_string());

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name("Hoja1")?;

    sheet.write_string(0, 1, "Informe de inspección")?;

    // Header block: labels sit one column left of the mapped cells
    sheet.write_string(1, 1, "Fecha:")?;
    sheet.write_string(2, 1, "Inspector:")?;
    sheet.write_string(3, 1, "Sitio:")?;
    sheet.write_string(4, 1, "Dirección:")?;

    // Checklist header row above the section rows
    sheet.write_string(7, 1, "Sección")?;
    sheet.write_string(7, 3, "Cumple")?;
    sheet.write_string(7, 4, "No cumple")?;
    sheet.write_string(7, 5, "N/A")?;
    sheet.write_string(7, 6, "Observaciones")?;

    sheet.write_string(8, 1, "Seguridad")?;
    sheet.write_string(9, 1, "Higiene")?;
    sheet.write_string(10, 1, "Señalización")?;

    // Summary block
    sheet.write_string(13, 1, "Puntaje:")?;
    sheet.write_string(14, 1, "Aprobado:")?;
    sheet.write_string(15, 1, "Notas:")?;

    workbook.save(&output)?;
    println!("Template written to {output}");
    Ok(())
}
