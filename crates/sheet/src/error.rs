use thiserror::Error;

/// Errors that can occur while reading tabular input
#[derive(Error, Debug)]
pub enum SheetError {
    #[error("Workbook error: {0}")]
    Workbook(String),

    #[error("Workbook has no worksheets")]
    NoWorksheets,

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, SheetError>;
