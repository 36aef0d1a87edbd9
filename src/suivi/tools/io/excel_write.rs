use std::path::Path;

use rust_xlsxwriter::{Format, Table, TableColumn, Workbook};

use crate::suivi::tools::error::Result;
use crate::suivi::tools::model::WorkbookData;

/// Writes the provided workbook data to the given path, one sheet per table
/// in order. Sheets with data rows are wrapped in an Excel table with an
/// autofilter; empty sheets keep only their header row.
pub fn write_workbook(path: &Path, workbook: &WorkbookData) -> Result<()> {
    let mut workbook_writer = Workbook::new();
    let header_format = Format::new().set_bold();

    for table in &workbook.tables {
        let worksheet = workbook_writer.add_worksheet();
        worksheet.set_name(&table.sheet_name)?;

        for (col_idx, header) in table.columns.iter().enumerate() {
            worksheet.write_string_with_format(0, col_idx as u16, header, &header_format)?;
        }

        for (row_idx, row) in table.rows.iter().enumerate() {
            for (col_idx, cell) in row.iter().enumerate() {
                worksheet.write_string((row_idx + 1) as u32, col_idx as u16, cell)?;
            }
        }

        if !table.rows.is_empty() && !table.columns.is_empty() {
            let columns: Vec<TableColumn> = table
                .columns
                .iter()
                .map(|header| TableColumn::new().set_header(header))
                .collect();
            let mut excel_table = Table::new();
            excel_table.set_autofilter(true).set_columns(&columns);

            let col_end = (table.columns.len() as u16).saturating_sub(1);
            let row_end = table.rows.len() as u32;
            worksheet.add_table(0, 0, row_end, col_end, &excel_table)?;
        }

        worksheet.set_freeze_panes(1, 0)?;
        worksheet.autofit();
    }

    workbook_writer.save(path)?;
    Ok(())
}
