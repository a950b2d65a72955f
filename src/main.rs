use clap::{Parser, Subcommand};
use plantilla::cli;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "plantilla")]
#[command(about = "Fill an Excel template from nested JSON documents")]
#[command(long_about = "Plantilla - Excel template filling service

Maps nested JSON fields onto fixed cell coordinates of a template workbook
using a static mapping file, then produces a filled copy.

COMMANDS:
  serve - Run the HTTP API (POST /fill-template)
  check - Validate the mapping file and template without serving
  fill  - Fill the template from a JSON document on disk

CONFIGURATION:
  PLANTILLA_ENV          development | production | testing (default: production)
  PLANTILLA_SHEET_NAME   Target sheet in the template (default: Hoja1)
  PLANTILLA_SECRET_KEY   Session secret (deployment parity; unused by the pipeline)
  PLANTILLA_CONFIG_DIR   Directory with cell_mapping.json and template.xlsx
  PLANTILLA_HOST / PLANTILLA_PORT
                         Bind address for serve (default: 127.0.0.1:5000)

EXAMPLES:
  plantilla check
  plantilla serve --host 0.0.0.0 --port 5000
  plantilla fill request.json filled.xlsx --verbose")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API server
    #[command(long_about = "Run the HTTP API server.

Loads the cell mapping and validates the template at startup; either
failing aborts startup. Requests are served until SIGINT/SIGTERM.

ENDPOINTS:
  POST /fill-template - Fill the template from a JSON body, download the copy
  GET  /health        - Health check
  GET  /              - Service info

EXAMPLE:
  plantilla serve --host 0.0.0.0 --port 5000 --config-dir /srv/plantilla/config

  curl -X POST http://localhost:5000/fill-template \\
    -d '{\"client\": {\"name\": \"Acme\"}, \"status\": \"complies\"}' \\
    -o filled.xlsx")]
    Serve {
        /// Host address to bind to (use 0.0.0.0 for all interfaces)
        #[arg(short = 'H', long, default_value = "127.0.0.1", env = "PLANTILLA_HOST")]
        host: String,

        /// Port to listen on
        #[arg(short, long, default_value = "5000", env = "PLANTILLA_PORT")]
        port: u16,

        /// Directory containing cell_mapping.json and template.xlsx
        #[arg(short, long, default_value = "config", env = "PLANTILLA_CONFIG_DIR")]
        config_dir: PathBuf,
    },

    /// Check the mapping file and template without serving
    Check {
        /// Directory containing cell_mapping.json and template.xlsx
        #[arg(short, long, default_value = "config", env = "PLANTILLA_CONFIG_DIR")]
        config_dir: PathBuf,
    },

    /// Fill the template from a JSON document on disk
    #[command(long_about = "Fill the template from a JSON document on disk.

Runs the same transform and fill pipeline as the HTTP endpoint, writing
the result to a caller-chosen path instead of a temporary download.

EXAMPLE:
  plantilla fill request.json filled.xlsx --verbose")]
    Fill {
        /// Path to the JSON input document
        input: PathBuf,

        /// Output Excel file path (.xlsx)
        output: PathBuf,

        /// Directory containing cell_mapping.json and template.xlsx
        #[arg(short, long, default_value = "config", env = "PLANTILLA_CONFIG_DIR")]
        config_dir: PathBuf,

        /// Show each cell assignment
        #[arg(short, long)]
        verbose: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            host,
            port,
            config_dir,
        } => cli::serve(host, port, config_dir).await,

        Commands::Check { config_dir } => Ok(cli::check(config_dir)?),

        Commands::Fill {
            input,
            output,
            config_dir,
            verbose,
        } => Ok(cli::fill(input, output, config_dir, verbose)?),
    }
}
