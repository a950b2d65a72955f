use thiserror::Error;

pub type PlantillaResult<T> = Result<T, PlantillaError>;

#[derive(Error, Debug)]
pub enum PlantillaError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Template error: {0}")]
    Template(String),

    #[error("Invalid input: {0}")]
    Input(String),

    #[error("Transform error: {0}")]
    Transform(String),

    #[error("Fill error: {0}")]
    Fill(String),
}
