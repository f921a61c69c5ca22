//! Scrapes the navcen GPS constellation page for PRN / block type pairs.
//! The table is identified structurally by its class attribute; rows are
//! read in document order and the output is sorted by numeric PRN.

use scraper::{ElementRef, Html, Selector};

use crate::error::ParseError;
use crate::model::record::BlockTypeRow;

/// Class list of the constellation table on the navcen page. Held
/// verbatim; the page layout is the contract.
const TABLE_SELECTOR: &str =
    "table.table.table-striped.views-table.views-view-table.cols-10";

const PRN_COLUMN: usize = 3;
const BLOCK_TYPE_COLUMN: usize = 4;

pub fn parse_block_table(html: &str) -> Result<Vec<BlockTypeRow>, ParseError> {
    let document = Html::parse_document(html);
    let table_selector = Selector::parse(TABLE_SELECTOR).expect("static selector");
    let row_selector = Selector::parse("tbody > tr").expect("static selector");
    let cell_selector = Selector::parse("td").expect("static selector");

    let table = document
        .select(&table_selector)
        .next()
        .ok_or(ParseError::MissingTable)?;

    let mut rows = Vec::new();
    for row in table.select(&row_selector) {
        let cells: Vec<ElementRef> = row.select(&cell_selector).collect();
        if cells.len() <= BLOCK_TYPE_COLUMN {
            return Err(ParseError::MalformedRow(cell_text_joined(&row)));
        }

        let prn = cell_text(&cells[PRN_COLUMN]);
        let block_type = cell_text(&cells[BLOCK_TYPE_COLUMN]);
        let sort_key: u32 = prn.parse().map_err(|_| ParseError::Numeric {
            field: "prn",
            value: prn.clone(),
        })?;

        rows.push((sort_key, BlockTypeRow { prn, block_type }));
    }

    rows.sort_by_key(|(prn, _)| *prn);
    Ok(rows.into_iter().map(|(_, row)| row).collect())
}

fn cell_text(cell: &ElementRef) -> String {
    cell.text().collect::<String>().trim().to_string()
}

fn cell_text_joined(row: &ElementRef) -> String {
    row.text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" | ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(rows: &str) -> String {
        format!(
            r#"<html><body>
            <table class="table table-striped views-table views-view-table cols-10">
            <thead><tr><th>SVN</th><th>Launch</th><th>Plane</th><th>PRN</th><th>Block</th></tr></thead>
            <tbody>{rows}</tbody>
            </table></body></html>"#
        )
    }

    fn row(prn: &str, block: &str) -> String {
        format!("<tr><td>62</td><td>2010</td><td>B</td><td>{prn}</td><td>{block}</td></tr>")
    }

    #[test]
    fn test_rows_sorted_by_numeric_prn() {
        let html = page(&format!("{}{}{}", row("25", "IIF"), row("3", "III"), row("11", "IIR-M")));
        let rows = parse_block_table(&html).unwrap();
        let prns: Vec<&str> = rows.iter().map(|r| r.prn.as_str()).collect();
        assert_eq!(prns, vec!["3", "11", "25"]);
        assert_eq!(rows[0].block_type, "III");
    }

    #[test]
    fn test_missing_table_is_parse_error() {
        let html = r#"<html><body><table class="other"><tbody>
            <tr><td>a</td><td>b</td><td>c</td><td>1</td><td>IIF</td></tr>
            </tbody></table></body></html>"#;
        assert!(matches!(
            parse_block_table(html),
            Err(ParseError::MissingTable)
        ));
    }

    #[test]
    fn test_short_row_is_parse_error() {
        let html = page("<tr><td>only</td><td>four</td><td>cells</td><td>9</td></tr>");
        assert!(matches!(
            parse_block_table(&html),
            Err(ParseError::MalformedRow(_))
        ));
    }

    #[test]
    fn test_non_numeric_prn_is_parse_error() {
        let html = page(&row("PRN-9", "IIF"));
        assert!(matches!(
            parse_block_table(&html),
            Err(ParseError::Numeric { field: "prn", .. })
        ));
    }

    #[test]
    fn test_cell_text_is_trimmed() {
        let html = page(&row(" 14 ", " IIR \n"));
        let rows = parse_block_table(&html).unwrap();
        assert_eq!(rows[0].prn, "14");
        assert_eq!(rows[0].block_type, "IIR");
    }
}
