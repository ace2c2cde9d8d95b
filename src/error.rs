use thiserror::Error;

#[derive(Error, Debug)]
pub enum StatsError {
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    #[error("No day columns found after the identity columns")]
    NoDayColumns,

    #[error("Table has no participant rows")]
    EmptyTable,

    #[error("Invalid count value {value:?} in column {column:?}")]
    InvalidCount { column: String, value: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Excel error: {0}")]
    Excel(#[from] rust_xlsxwriter::XlsxError),
}

pub type Result<T> = std::result::Result<T, StatsError>;
