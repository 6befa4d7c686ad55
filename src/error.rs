use thiserror::Error;

/// A failure confined to one field. Fill and ScanRow collect these and keep going.
#[derive(Error, Debug)]
pub enum FieldError {
    #[error("provided value ({value}) type not match field '{field}' of shape {expected}")]
    Mismatch {
        field: String,
        value: String,
        expected: String,
    },
    #[error("cannot set field '{field}' in object")]
    Unsettable { field: String },
    #[error("time conversion of field '{field}': {source}")]
    Temporal {
        field: String,
        #[source]
        source: chrono::ParseError,
    },
    #[error("capability failure on field '{field}': {message}")]
    Capability { field: String, message: String },
}

impl FieldError {
    /// Path of the offending field, dotted for nested records.
    pub fn field(&self) -> &str {
        match self {
            FieldError::Mismatch { field, .. }
            | FieldError::Unsettable { field }
            | FieldError::Temporal { field, .. }
            | FieldError::Capability { field, .. } => field,
        }
    }
}

#[derive(Error, Debug)]
pub enum MappingError {
    #[error("{}", join(.0))]
    Fields(Vec<FieldError>),
    #[error("Row read failed: {0}")]
    Row(String),
    #[error("Config error: {0}")]
    Config(String),
}

impl MappingError {
    /// Per-field failures carried by this error, empty for fatal kinds.
    pub fn failures(&self) -> &[FieldError] {
        match self {
            MappingError::Fields(failures) => failures,
            _ => &[],
        }
    }
}

pub type Result<T> = std::result::Result<T, MappingError>;

fn join(failures: &[FieldError]) -> String {
    failures
        .iter()
        .map(|failure| failure.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

// Helper conversions
impl From<rusqlite::Error> for MappingError {
    fn from(e: rusqlite::Error) -> Self {
        Self::Row(e.to_string())
    }
}
impl From<rusqlite::types::FromSqlError> for MappingError {
    fn from(e: rusqlite::types::FromSqlError) -> Self {
        Self::Row(e.to_string())
    }
}
impl From<config::ConfigError> for MappingError {
    fn from(e: config::ConfigError) -> Self {
        Self::Config(e.to_string())
    }
}
