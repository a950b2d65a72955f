//! Runtime configuration
//!
//! Settings are assembled once at startup from environment variables and the
//! config directory, then passed by handle into the request handlers. Nothing
//! here is re-read after startup.

use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::{PlantillaError, PlantillaResult};

/// Environment variable selecting the deployment mode
pub const ENV_VAR: &str = "PLANTILLA_ENV";
/// Environment variable overriding the target sheet name
pub const SHEET_NAME_VAR: &str = "PLANTILLA_SHEET_NAME";
/// Environment variable for the session secret key
pub const SECRET_KEY_VAR: &str = "PLANTILLA_SECRET_KEY";

pub const DEFAULT_SHEET_NAME: &str = "Hoja1";
pub const DEFAULT_SECRET_KEY: &str = "your-secret-key-here";

/// Cell mapping file name inside the config directory
pub const CELL_MAPPING_FILE: &str = "cell_mapping.json";
/// Template workbook file name inside the config directory
pub const TEMPLATE_FILE: &str = "template.xlsx";

//==============================================================================
// Deployment Environment
//==============================================================================

/// Deployment mode, selected via `PLANTILLA_ENV`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppEnv {
    Development,
    #[default]
    Production,
    Testing,
}

impl AppEnv {
    /// Whether debug-level defaults apply (development only)
    pub fn is_debug(self) -> bool {
        matches!(self, AppEnv::Development)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AppEnv::Development => "development",
            AppEnv::Production => "production",
            AppEnv::Testing => "testing",
        }
    }
}

impl fmt::Display for AppEnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppEnv {
    type Err = PlantillaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "development" => Ok(AppEnv::Development),
            "production" => Ok(AppEnv::Production),
            "testing" => Ok(AppEnv::Testing),
            other => Err(PlantillaError::Config(format!(
                "Unknown deployment environment: {other}"
            ))),
        }
    }
}

//==============================================================================
// Settings
//==============================================================================

/// Immutable startup configuration shared across requests
#[derive(Debug, Clone)]
pub struct Settings {
    pub env: AppEnv,
    /// Sheet that receives the cell assignments
    pub sheet_name: String,
    /// Kept for deployment parity; unused by the fill pipeline
    pub secret_key: String,
    /// Directory holding `cell_mapping.json` and `template.xlsx`
    pub config_dir: PathBuf,
}

impl Settings {
    /// Build settings from `PLANTILLA_*` environment variables
    ///
    /// An unset variable falls back to its default; an unknown
    /// `PLANTILLA_ENV` value is a configuration error.
    pub fn from_env(config_dir: PathBuf) -> PlantillaResult<Self> {
        let env = match env::var(ENV_VAR) {
            Ok(value) => value.parse()?,
            Err(_) => AppEnv::default(),
        };
        let sheet_name =
            env::var(SHEET_NAME_VAR).unwrap_or_else(|_| DEFAULT_SHEET_NAME.to_string());
        let secret_key =
            env::var(SECRET_KEY_VAR).unwrap_or_else(|_| DEFAULT_SECRET_KEY.to_string());

        Ok(Self {
            env,
            sheet_name,
            secret_key,
            config_dir,
        })
    }

    /// Path of the cell mapping file
    pub fn mapping_path(&self) -> PathBuf {
        self.config_dir.join(CELL_MAPPING_FILE)
    }

    /// Path of the template workbook
    pub fn template_path(&self) -> PathBuf {
        self.config_dir.join(TEMPLATE_FILE)
    }
}
