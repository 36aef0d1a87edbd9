use std::path::Path;

use calamine::{DataType, Reader, Xlsx, open_workbook};
use tracing::debug;

use crate::suivi::tools::error::{Result, ToolError};
use crate::suivi::tools::model::{Cell, SheetRows, SourceWorkbook};

/// Loads every worksheet of the tracking workbook onto absolute
/// coordinates, so that column `B` is always index 1 even when column `A`
/// is empty throughout the sheet.
pub fn read_workbook(path: &Path) -> Result<SourceWorkbook> {
    let mut workbook: Xlsx<_> = open_workbook(path)?;
    let mut source = SourceWorkbook::new();

    for name in workbook.sheet_names().to_vec() {
        let range = read_sheet(&mut workbook, &name)?;
        let rows = range_to_rows(&range);
        debug!(sheet = %name, rows = rows.len(), "sheet loaded");
        source.insert(name, rows);
    }

    Ok(source)
}

fn read_sheet<R: std::io::Read + std::io::Seek>(
    workbook: &mut Xlsx<R>,
    name: &str,
) -> Result<calamine::Range<DataType>> {
    let range_result = workbook
        .worksheet_range(name)
        .ok_or_else(|| ToolError::InvalidWorkbook(format!("missing sheet '{name}'")))?;
    let range = range_result.map_err(ToolError::from)?;
    Ok(range)
}

fn range_to_rows(range: &calamine::Range<DataType>) -> SheetRows {
    let Some((last_row, last_col)) = range.end() else {
        return SheetRows::default();
    };

    let rows = (0..=last_row)
        .map(|row| {
            (0..=last_col)
                .map(|col| range.get_value((row, col)).map(to_cell).unwrap_or_default())
                .collect()
        })
        .collect();

    SheetRows::new(rows)
}

fn to_cell(value: &DataType) -> Cell {
    match value {
        DataType::Empty => Cell::Empty,
        DataType::String(text) => Cell::Text(text.clone()),
        DataType::Float(number) => Cell::Number(*number),
        DataType::Int(number) => Cell::Number(*number as f64),
        DataType::Bool(flag) => Cell::Bool(*flag),
        DataType::DateTime(serial) => Cell::Date(*serial),
        DataType::DateTimeIso(text) => Cell::Text(iso_date_prefix(text).to_string()),
        other => Cell::Text(other.to_string()),
    }
}

/// `2024-03-05T10:00:00` → `2024-03-05`, so the date parser sees the ISO
/// form it understands.
fn iso_date_prefix(text: &str) -> &str {
    text.split_once('T').map_or(text, |(date, _)| date)
}
