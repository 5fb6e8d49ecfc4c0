use thiserror::Error;

#[derive(Error, Debug)]
pub enum SheetError {
    #[error("sheet not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error in {path}: {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },

    #[error("workbook manifest error: {0}")]
    Manifest(#[from] serde_yaml::Error),
}
