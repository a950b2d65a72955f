use crate::api::server::ApiConfig;
use crate::config::Settings;
use crate::error::{PlantillaError, PlantillaResult};
use crate::excel::{validate_template, TemplateFiller};
use crate::mapping::load_cell_mapping;
use crate::transform::transform_document;
use colored::Colorize;
use serde_json::Value;
use std::fs;
use std::path::PathBuf;

/// Execute the serve command
pub async fn serve(host: String, port: u16, config_dir: PathBuf) -> anyhow::Result<()> {
    let settings = Settings::from_env(config_dir)?;
    let config = ApiConfig { host, port };
    crate::api::run_api_server(config, settings).await
}

/// Execute the check command
pub fn check(config_dir: PathBuf) -> PlantillaResult<()> {
    println!("{}", "📄 Plantilla - Checking configuration".bold().green());
    println!("   Config dir: {}\n", config_dir.display());

    let settings = Settings::from_env(config_dir)?;
    println!("   Environment: {}", settings.env.to_string().cyan());
    println!("   Sheet name:  {}", settings.sheet_name.cyan());
    println!();

    let mapping = load_cell_mapping(&settings.mapping_path())?;
    println!(
        "   ✅ Cell mapping: {} top-level sections, {} cell coordinates",
        mapping.len(),
        mapping.coordinate_count()
    );

    validate_template(&settings.template_path(), &settings.sheet_name)?;
    println!("   ✅ Template sheet '{}' found", settings.sheet_name);

    println!("\n{}", "✅ Configuration is valid!".bold().green());
    Ok(())
}

/// Execute the fill command
pub fn fill(
    input: PathBuf,
    output: PathBuf,
    config_dir: PathBuf,
    verbose: bool,
) -> PlantillaResult<()> {
    println!("{}", "📄 Plantilla - Filling template".bold().green());
    println!("   Input:  {}", input.display());
    println!("   Output: {}\n", output.display());

    let settings = Settings::from_env(config_dir)?;
    let mapping = load_cell_mapping(&settings.mapping_path())?;
    validate_template(&settings.template_path(), &settings.sheet_name)?;

    if verbose {
        println!("{}", "📖 Reading input document...".cyan());
    }

    let content = fs::read_to_string(&input)?;
    let document: Value = serde_json::from_str(&content)
        .map_err(|e| PlantillaError::Input(format!("Input file is not valid JSON: {e}")))?;
    let document = match document {
        Value::Object(map) if !map.is_empty() => map,
        _ => {
            return Err(PlantillaError::Input(
                "Input file must contain a non-empty JSON object".to_string(),
            ))
        }
    };

    let assignments = transform_document(&document, &mapping)?;

    if verbose {
        println!("   {} cell assignments", assignments.len());
        for (cell, value) in assignments.iter() {
            println!("      {} = {}", cell.to_string().cyan(), value);
        }
        println!();
    }

    let filler = TemplateFiller::new(settings.template_path(), &settings.sheet_name);
    filler.fill_into(&assignments, &output)?;

    println!("{}", "✅ Fill Complete!".bold().green());
    println!("   Excel file: {}\n", output.display());

    Ok(())
}
