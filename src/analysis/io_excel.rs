// Primitives for reading Excel workbooks.

use calamine::{open_workbook, DataType, Reader, Xlsx};

use crate::analysis::io_common::Table;
use crate::analysis::*;

fn cell_to_string(cell: &DataType) -> String {
    match cell {
        DataType::String(s) => s.clone(),
        DataType::Float(f) if f.fract() == 0.0 => format!("{}", *f as i64),
        DataType::Float(f) => f.to_string(),
        DataType::Int(i) => i.to_string(),
        DataType::Bool(b) => b.to_string(),
        DataType::Empty => "".to_string(),
        x => {
            debug!("cell_to_string: unexpected cell {:?}, using it as empty", x);
            "".to_string()
        }
    }
}

fn get_range(path: &str, worksheet_name_o: Option<&str>) -> AnalysisResult<calamine::Range<DataType>> {
    debug!(
        "get_range: path: {:?} worksheet: {:?}",
        path, worksheet_name_o
    );
    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu { path })?;

    // A worksheet name was provided, use it.
    if let Some(worksheet_name) = worksheet_name_o {
        let wrange = workbook
            .worksheet_range(worksheet_name)
            .context(EmptyExcelSnafu { path })?
            .context(OpeningExcelSnafu { path })?;
        Ok(wrange)
    } else {
        let wrange = workbook
            .worksheet_range_at(0)
            .context(EmptyExcelSnafu { path })?
            .context(OpeningExcelSnafu { path })?;
        Ok(wrange)
    }
}

pub fn read_excel_table(path: &str, worksheet_name: Option<&str>) -> AnalysisResult<Table> {
    if !Path::new(path).exists() {
        return MissingInputFileSnafu { path }.fail();
    }
    let wrange = get_range(path, worksheet_name)?;
    let mut iter = wrange.rows();
    let header: Vec<String> = iter
        .next()
        .context(EmptyExcelSnafu { path })?
        .iter()
        .map(|c| cell_to_string(c).trim().to_string())
        .collect();
    debug!("read_excel_table: {:?}: header: {:?}", path, header);
    let rows: Vec<Vec<String>> = iter
        .map(|row| row.iter().map(cell_to_string).collect())
        .collect();
    info!("read_excel_table: {:?}: {} rows", path, rows.len());
    Ok(Table {
        path: path.to_string(),
        header,
        rows,
    })
}
