use thiserror::Error;

pub type BoardResult<T> = Result<T, BoardError>;

/// Errors raised by the board core.
///
/// Bad condition text never ends up here: parsing, classification and merging
/// degrade silently. These variants cover broken collaborators (a measurement
/// backend returning garbage) and invalid configuration.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BoardError {
    #[error("Invalid fit config '{field}': {reason}")]
    InvalidFitConfig { field: String, reason: String },

    #[error("Invalid grid config '{field}': {reason}")]
    InvalidGridConfig { field: String, reason: String },

    #[error("Measurement backend returned an invalid box ({width} x {height})")]
    InvalidMeasurement { width: f64, height: f64 },

    #[error("Invalid container size ({width} x {height}): must be finite and non-negative")]
    InvalidContainer { width: f64, height: f64 },

    #[error("Condition at column {start} spanning {span} exceeds the board's {total} columns")]
    ColumnOutOfRange { start: usize, span: usize, total: usize },

    #[error("Invalid span {span}: must be between {min} and {max} hours")]
    InvalidSpan { span: usize, min: usize, max: usize },

    #[error("Row {index} not found")]
    RowNotFound { index: usize },

    #[error("Invalid hazard keyword '{keyword}': must be non-empty")]
    InvalidKeyword { keyword: String },

    #[error("YAML error: {0}")]
    YamlError(String),

    #[error("I/O error: {0}")]
    Io(String),
}

impl From<serde_yaml::Error> for BoardError {
    fn from(err: serde_yaml::Error) -> Self {
        BoardError::YamlError(err.to_string())
    }
}

impl From<std::io::Error> for BoardError {
    fn from(err: std::io::Error) -> Self {
        BoardError::Io(err.to_string())
    }
}
