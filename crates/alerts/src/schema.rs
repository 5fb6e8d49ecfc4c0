//! Required column resolution.
//!
//! The header row is matched once per run against the five required
//! column names. Matching is exact and takes the first equal cell. The
//! result is a [`RowAccessor`] holding the resolved indices, or a
//! [`SchemaError`] naming every missing column.

use crate::row::{parse_flag, parse_number, RowView};

/// The columns an alert run reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Name,
    StockMonths1y,
    StockMonths3y,
    ShippedWithin4y,
    ImportExcluded,
}

impl Column {
    pub const ALL: [Column; 5] = [
        Column::Name,
        Column::StockMonths1y,
        Column::StockMonths3y,
        Column::ShippedWithin4y,
        Column::ImportExcluded,
    ];

    /// Exact header text of the column in the inventory sheet.
    pub fn header(self) -> &'static str {
        match self {
            Column::Name => "商品名",
            Column::StockMonths1y => "入荷後の直近1年在庫月数",
            Column::StockMonths3y => "入荷後の直近3年度在庫月数",
            Column::ShippedWithin4y => "4年以内に出荷があったか",
            Column::ImportExcluded => "輸入対象外",
        }
    }

    /// All required headers, comma separated.
    pub fn required_list() -> String {
        join_headers(&Self::ALL)
    }
}

impl std::fmt::Display for Column {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.header())
    }
}

fn join_headers(cols: &[Column]) -> String {
    cols.iter()
        .map(|c| c.header())
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error(
        "required columns missing: {} (required: {})",
        join_headers(.missing),
        Column::required_list()
    )]
    MissingColumns { missing: Vec<Column> },
}

/// Resolved column indices for one sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowAccessor {
    name: usize,
    stock_1y: usize,
    stock_3y: usize,
    shipped_4y: usize,
    import_excluded: usize,
}

impl RowAccessor {
    /// Resolve every required column from the header row.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::MissingColumns`] listing all absent columns
    /// in [`Column::ALL`] order.
    pub fn resolve(header: &[String]) -> Result<Self, SchemaError> {
        let find = |col: Column| header.iter().position(|h| h == col.header());

        let mut missing = Vec::new();
        let mut index = |col: Column| {
            find(col).unwrap_or_else(|| {
                missing.push(col);
                usize::MAX
            })
        };

        let accessor = Self {
            name: index(Column::Name),
            stock_1y: index(Column::StockMonths1y),
            stock_3y: index(Column::StockMonths3y),
            shipped_4y: index(Column::ShippedWithin4y),
            import_excluded: index(Column::ImportExcluded),
        };

        if missing.is_empty() {
            Ok(accessor)
        } else {
            Err(SchemaError::MissingColumns { missing })
        }
    }

    /// Index of a column in the row.
    pub fn index_of(&self, col: Column) -> usize {
        match col {
            Column::Name => self.name,
            Column::StockMonths1y => self.stock_1y,
            Column::StockMonths3y => self.stock_3y,
            Column::ShippedWithin4y => self.shipped_4y,
            Column::ImportExcluded => self.import_excluded,
        }
    }

    /// Build the typed view of a data row. Cells past the end of a short
    /// row read as empty.
    pub fn view<'a>(&self, row_number: usize, cells: &'a [String]) -> RowView<'a> {
        let cell = |ix: usize| cells.get(ix).map(String::as_str).unwrap_or("");

        RowView {
            row_number,
            name: cell(self.name),
            stock_months_1y: parse_number(cell(self.stock_1y)),
            stock_months_3y: parse_number(cell(self.stock_3y)),
            shipped_within_4y: parse_flag(cell(self.shipped_4y)),
            import_excluded: parse_flag(cell(self.import_excluded)),
        }
    }
}
