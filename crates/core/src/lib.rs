pub mod config;
pub mod error;
pub mod sheet;
pub mod workbook;

pub use config::Config;
pub use error::*;
pub use sheet::{MemorySheets, Sheet, SheetSource};
pub use workbook::CsvWorkbook;
