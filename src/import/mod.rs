//! CSV reading for the benchmark resources.
//!
//! The format is deliberately minimal: one record per line, fields split on
//! commas and trimmed. Quoted fields are not interpreted, so a quoted comma
//! still splits the field. Blank lines are skipped.
//!
//! ## Example
//!
//! ```
//! use marker_viz::import::CsvTable;
//!
//! let table = CsvTable::parse("dataset, model\nDA2k, m1\n\n").unwrap();
//! assert_eq!(table.headers, vec!["dataset", "model"]);
//! assert_eq!(table.rows, vec![vec!["DA2k", "m1"]]);
//! ```

pub mod source;

pub use source::{DataSource, DirSource};

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A parsed CSV resource: a header row plus the data rows in file order.
///
/// Rows are kept exactly as split; they are not padded or truncated to the
/// header width.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsvTable {
    /// Header fields in column order.
    pub headers: Vec<String>,
    /// Data rows in file order.
    pub rows: Vec<Vec<String>>,
}

impl CsvTable {
    /// Parse CSV text into a header row and data rows.
    pub fn parse(text: &str) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .quoting(false)
            .trim(csv::Trim::All)
            .from_reader(text.as_bytes());

        let mut lines = Vec::new();
        for record in reader.records() {
            let record = record?;
            // Whitespace-only lines come through as a single empty field.
            if record.len() == 1 && record[0].is_empty() {
                continue;
            }
            lines.push(record.iter().map(String::from).collect::<Vec<_>>());
        }

        let mut lines = lines.into_iter();
        let headers = lines.next().unwrap_or_default();
        Ok(Self {
            headers,
            rows: lines.collect(),
        })
    }

    /// Rows with at least as many fields as there are headers.
    ///
    /// Shorter rows are skipped without notice.
    pub fn usable_rows(&self) -> impl Iterator<Item = &[String]> {
        let width = self.headers.len();
        self.rows
            .iter()
            .filter(move |row| row.len() >= width)
            .map(Vec::as_slice)
    }

    /// Find a column index by header name (case-insensitive).
    #[must_use]
    pub fn find_column(&self, name: &str) -> Option<usize> {
        find_header_index(&self.headers, name)
    }
}

/// Find a header index by name (case-insensitive).
fn find_header_index(headers: &[String], name: &str) -> Option<usize> {
    let name_lower = name.to_lowercase();
    headers.iter().position(|h| h.to_lowercase() == name_lower)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trims_and_skips_blank_lines() {
        let text = "  a , b ,c\n\n1, 2 ,3\n   \n4,5,6\n";
        let table = CsvTable::parse(text).unwrap();

        assert_eq!(table.headers, vec!["a", "b", "c"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0], vec!["1", "2", "3"]);
        assert_eq!(table.rows[1], vec!["4", "5", "6"]);
    }

    #[test]
    fn test_row_length_independent_of_headers() {
        let text = "a,b,c\n1,2\n1,2,3,4\n";
        let table = CsvTable::parse(text).unwrap();

        assert_eq!(table.headers.len(), 3);
        assert_eq!(table.rows[0].len(), 2);
        assert_eq!(table.rows[1].len(), 4);
    }

    #[test]
    fn test_usable_rows_drops_short_rows() {
        let text = "a,b,c\n1,2\n1,2,3\n1,2,3,4\n";
        let table = CsvTable::parse(text).unwrap();

        let usable: Vec<_> = table.usable_rows().collect();
        assert_eq!(usable.len(), 2);
        assert_eq!(usable[0], ["1", "2", "3"]);
    }

    #[test]
    fn test_quotes_are_not_interpreted() {
        let text = "name,value\n\"x, y\",1\n";
        let table = CsvTable::parse(text).unwrap();

        assert_eq!(table.rows[0], vec!["\"x", "y\"", "1"]);
    }

    #[test]
    fn test_crlf_line_endings() {
        let table = CsvTable::parse("a,b\r\n1,2\r\n").unwrap();
        assert_eq!(table.headers, vec!["a", "b"]);
        assert_eq!(table.rows, vec![vec!["1", "2"]]);
    }

    #[test]
    fn test_empty_input() {
        let table = CsvTable::parse("").unwrap();
        assert!(table.headers.is_empty());
        assert!(table.rows.is_empty());
    }

    #[test]
    fn test_find_column() {
        let table = CsvTable::parse("Dataset,Model,Rank\n").unwrap();
        assert_eq!(table.find_column("dataset"), Some(0));
        assert_eq!(table.find_column("RANK"), Some(2));
        assert_eq!(table.find_column("accuracy"), None);
    }
}
