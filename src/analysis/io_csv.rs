// Primitives for reading CSV files.

use crate::analysis::io_common::Table;
use crate::analysis::*;

pub fn read_csv_table(path: &str) -> AnalysisResult<Table> {
    if !Path::new(path).exists() {
        return MissingInputFileSnafu { path }.fail();
    }
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_path(path)
        .context(CsvOpenSnafu { path })?;
    let header: Vec<String> = rdr
        .headers()
        .context(CsvLineParseSnafu { path })?
        .iter()
        .map(|s| s.to_string())
        .collect();
    debug!("read_csv_table: {:?}: header: {:?}", path, header);

    let mut rows: Vec<Vec<String>> = Vec::new();
    for line_r in rdr.records() {
        let line = line_r.context(CsvLineParseSnafu { path })?;
        rows.push(line.iter().map(|s| s.to_string()).collect());
    }
    info!("read_csv_table: {:?}: {} rows", path, rows.len());
    Ok(Table {
        path: path.to_string(),
        header,
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_read_csv_table() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(
            f,
            "Conference, Year,Title,Predominant Continent\nnsdi,2020,\"A, paper\",NA\nosdi,2021,B,\n"
        )
        .unwrap();
        let path = f.path().display().to_string();
        let t = read_csv_table(&path).unwrap();
        assert_eq!(t.header[1], "Year");
        assert_eq!(t.rows.len(), 2);
        assert_eq!(t.rows[0][2], "A, paper");
        assert_eq!(t.rows[1][3], "");
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            read_csv_table("/no/such/file.csv"),
            Err(AnalysisError::MissingInputFile { .. })
        ));
    }
}
