//! # CSV Workbook Renderer
//!
//! The default export collaborator: a header row from the column spec, one
//! line per record, RFC 4180 quoting. Spreadsheet cell formatting is out of
//! scope for the registry.

use crate::domain::entities::ColumnSpec;
use crate::domain::errors::WorkbookError;
use crate::ports::outbound::WorkbookRenderer;

/// Renders workbooks as CSV bytes.
#[derive(Default)]
pub struct CsvWorkbookRenderer;

impl CsvWorkbookRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl WorkbookRenderer for CsvWorkbookRenderer {
    fn render_workbook(
        &self,
        columns: &[ColumnSpec],
        rows: &[Vec<String>],
    ) -> Result<Vec<u8>, WorkbookError> {
        let mut out = String::new();

        let header: Vec<String> = columns.iter().map(|c| escape_cell(c.header)).collect();
        out.push_str(&header.join(","));
        out.push_str("\r\n");

        for (index, row) in rows.iter().enumerate() {
            if row.len() != columns.len() {
                return Err(WorkbookError::ShapeMismatch {
                    row: index,
                    cells: row.len(),
                    columns: columns.len(),
                });
            }
            let cells: Vec<String> = row.iter().map(|c| escape_cell(c)).collect();
            out.push_str(&cells.join(","));
            out.push_str("\r\n");
        }

        Ok(out.into_bytes())
    }
}

fn escape_cell(cell: &str) -> String {
    if cell.contains(',') || cell.contains('"') || cell.contains('\n') || cell.contains('\r') {
        format!("\"{}\"", cell.replace('"', "\"\""))
    } else {
        cell.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns() -> Vec<ColumnSpec> {
        vec![ColumnSpec::new("Name"), ColumnSpec::new("District")]
    }

    #[test]
    fn test_renders_header_and_rows() {
        let renderer = CsvWorkbookRenderer::new();
        let rows = vec![
            vec!["Ladang Satu".to_string(), "Kuantan".to_string()],
            vec!["Ladang Dua".to_string(), "Pekan".to_string()],
        ];

        let bytes = renderer.render_workbook(&columns(), &rows).unwrap();
        let text = String::from_utf8(bytes).unwrap();

        assert_eq!(
            text,
            "Name,District\r\nLadang Satu,Kuantan\r\nLadang Dua,Pekan\r\n"
        );
    }

    #[test]
    fn test_quotes_cells_with_delimiters() {
        let renderer = CsvWorkbookRenderer::new();
        let rows = vec![vec![
            "Ladang \"Besar\", Fasa 2".to_string(),
            "Kuantan".to_string(),
        ]];

        let bytes = renderer.render_workbook(&columns(), &rows).unwrap();
        let text = String::from_utf8(bytes).unwrap();

        assert!(text.contains("\"Ladang \"\"Besar\"\", Fasa 2\""));
    }

    #[test]
    fn test_shape_mismatch_rejected() {
        let renderer = CsvWorkbookRenderer::new();
        let rows = vec![vec!["only-one-cell".to_string()]];

        let result = renderer.render_workbook(&columns(), &rows);
        assert!(matches!(result, Err(WorkbookError::ShapeMismatch { .. })));
    }
}
