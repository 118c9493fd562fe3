//! HTML constituent-table extraction.
//!
//! Best effort against pages we don't control: the table is located by a
//! structural marker (id or class), rows parsed positionally via a per-index
//! column map. Any structural surprise is a `ResponseFormatChanged` error,
//! which the resolver downgrades to the fallback directory.

use super::{normalize_symbol, TickerRecord};
use crate::data::DataError;
use scraper::{Html, Selector};

/// How to find the constituents table in the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableLocator {
    /// `<table id="...">`
    ById(&'static str),
    /// `<table class="...">` (space-separated class list)
    ByClass(&'static str),
}

impl TableLocator {
    fn css_selector(&self) -> String {
        match self {
            TableLocator::ById(id) => format!("table#{id}"),
            TableLocator::ByClass(classes) => {
                let dotted = classes.split_whitespace().collect::<Vec<_>>().join(".");
                format!("table.{dotted}")
            }
        }
    }
}

/// Positional column layout of one index's table.
#[derive(Debug, Clone, Copy)]
pub struct ColumnMap {
    pub company: usize,
    pub symbol: usize,
    pub sector: usize,
    pub sub_industry: usize,
}

impl ColumnMap {
    fn max_index(&self) -> usize {
        self.company
            .max(self.symbol)
            .max(self.sector)
            .max(self.sub_industry)
    }
}

/// Parse the constituents table out of a page.
///
/// Rows with too few `<td>` cells (header rows, spanning notes) are skipped.
/// Zero data rows is a parse failure, not an empty directory.
pub fn parse_constituents(
    html: &str,
    locator: TableLocator,
    columns: ColumnMap,
) -> Result<Vec<TickerRecord>, DataError> {
    let document = Html::parse_document(html);

    let table_sel = Selector::parse(&locator.css_selector())
        .map_err(|e| DataError::ResponseFormatChanged(format!("bad table selector: {e}")))?;
    let row_sel = Selector::parse("tr")
        .map_err(|e| DataError::ResponseFormatChanged(format!("bad row selector: {e}")))?;
    let cell_sel = Selector::parse("td")
        .map_err(|e| DataError::ResponseFormatChanged(format!("bad cell selector: {e}")))?;

    let table = document.select(&table_sel).next().ok_or_else(|| {
        DataError::ResponseFormatChanged(format!(
            "constituents table not found via {:?}",
            locator
        ))
    })?;

    let min_cells = columns.max_index() + 1;
    let mut records = Vec::new();

    for row in table.select(&row_sel) {
        let cells: Vec<String> = row
            .select(&cell_sel)
            .map(|cell| cell.text().collect::<String>().trim().to_string())
            .collect();

        if cells.len() < min_cells {
            continue;
        }

        let symbol = normalize_symbol(&cells[columns.symbol]);
        if symbol.is_empty() {
            continue;
        }

        records.push(TickerRecord {
            company: cells[columns.company].clone(),
            symbol,
            sector: cells[columns.sector].clone(),
            sub_industry: cells[columns.sub_industry].clone(),
        });
    }

    if records.is_empty() {
        return Err(DataError::ResponseFormatChanged(
            "constituents table contained no data rows".into(),
        ));
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::IndexKind;

    const SP500_STYLE: &str = r#"
        <html><body>
        <table id="constituents" class="wikitable sortable">
          <tr><th>Symbol</th><th>Security</th><th>GICS Sector</th><th>GICS Sub-Industry</th></tr>
          <tr><td>MMM</td><td>3M</td><td>Industrials</td><td>Industrial Conglomerates</td></tr>
          <tr><td>BRK.B</td><td>Berkshire Hathaway</td><td>Financials</td><td>Multi-Sector Holdings</td></tr>
        </table>
        </body></html>
    "#;

    const NASDAQ_STYLE: &str = r#"
        <html><body>
        <table class="wikitable sortable">
          <tr><th>Company</th><th>Ticker</th><th>GICS Sector</th><th>GICS Sub-Industry</th></tr>
          <tr><td>Adobe Inc.</td><td>ADBE</td><td>Information Technology</td><td>Application Software</td></tr>
          <tr><td>Airbnb</td><td>ABNB</td><td>Consumer Discretionary</td><td>Hotels, Resorts</td></tr>
        </table>
        </body></html>
    "#;

    #[test]
    fn parses_id_located_table() {
        let index = IndexKind::Sp500;
        let records =
            parse_constituents(SP500_STYLE, index.table_locator(), index.column_map()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].symbol, "MMM");
        assert_eq!(records[0].company, "3M");
        // Dots normalized at parse time.
        assert_eq!(records[1].symbol, "BRK-B");
    }

    #[test]
    fn parses_class_located_table() {
        let index = IndexKind::Nasdaq100;
        let records =
            parse_constituents(NASDAQ_STYLE, index.table_locator(), index.column_map()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].company, "Adobe Inc.");
        assert_eq!(records[0].symbol, "ADBE");
        assert_eq!(records[1].sector, "Consumer Discretionary");
    }

    #[test]
    fn missing_table_is_parse_failure() {
        let err = parse_constituents(
            "<html><body><p>moved</p></body></html>",
            TableLocator::ById("constituents"),
            IndexKind::Sp500.column_map(),
        )
        .unwrap_err();
        assert!(matches!(err, DataError::ResponseFormatChanged(_)));
    }

    #[test]
    fn header_only_table_is_parse_failure() {
        let html = r#"<table id="constituents"><tr><th>Symbol</th></tr></table>"#;
        let err = parse_constituents(
            html,
            TableLocator::ById("constituents"),
            IndexKind::Sp500.column_map(),
        )
        .unwrap_err();
        assert!(matches!(err, DataError::ResponseFormatChanged(_)));
    }

    #[test]
    fn row_order_is_preserved() {
        let index = IndexKind::Sp500;
        let records =
            parse_constituents(SP500_STYLE, index.table_locator(), index.column_map()).unwrap();
        assert_eq!(records[0].symbol, "MMM");
        assert_eq!(records[1].symbol, "BRK-B");
    }
}
