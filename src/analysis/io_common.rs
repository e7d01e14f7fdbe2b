// Tables as read from the input files, before any interpretation.

use std::path::{Path, PathBuf};

use crate::analysis::*;

/// A rectangular table of strings with a header row.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Table {
    pub path: String,
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn column_index(&self, name: &str) -> AnalysisResult<usize> {
        self.header
            .iter()
            .position(|h| h.trim() == name)
            .context(MissingColumnSnafu {
                path: self.path.clone(),
                column: name.to_string(),
            })
    }

    pub fn optional_column_index(&self, name: Option<&str>) -> AnalysisResult<Option<usize>> {
        match name {
            Some(n) => Ok(Some(self.column_index(n)?)),
            None => Ok(None),
        }
    }
}

/// Column positions for one kind of record, resolved against a header.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ColumnLayout {
    pub conference: usize,
    pub year: Option<usize>,
    pub continent: usize,
    pub weight: Option<usize>,
}

impl ColumnLayout {
    pub fn resolve(kind: RecordKind, table: &Table) -> AnalysisResult<ColumnLayout> {
        let layout = ColumnLayout {
            conference: table.column_index(kind.conference_column())?,
            year: table.optional_column_index(kind.year_column())?,
            continent: table.column_index(kind.continent_column())?,
            weight: table.optional_column_index(kind.weight_column())?,
        };
        debug!(
            "ColumnLayout::resolve: {}: {:?}: {:?}",
            kind.name(),
            table.path,
            layout
        );
        Ok(layout)
    }
}

/// Resolves `file_path` against the directory of the configuration.
pub fn resolve_path(root: &Path, file_path: &str) -> String {
    let p: PathBuf = if Path::new(file_path).is_absolute() {
        PathBuf::from(file_path)
    } else {
        root.join(file_path)
    };
    p.as_path().display().to_string()
}

fn cell<'a>(table: &Table, row: &'a [String], idx: usize, lineno: usize) -> AnalysisResult<&'a str> {
    row.get(idx)
        .map(|s| s.as_str())
        .context(LineTooShortSnafu {
            path: table.path.clone(),
            lineno,
        })
}

/// Years are written as integers, sometimes with a trailing `.0` when they
/// come from a spreadsheet.
pub fn parse_year(s: &str) -> Option<i32> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    s.parse::<i32>()
        .ok()
        .or_else(|| s.parse::<f64>().ok().filter(|f| f.fract() == 0.0).map(|f| f as i32))
}

/// Only finite numbers are accepted: `NaN` and `inf` are not.
pub fn parse_number(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|x| x.is_finite())
}

/// A count of observations: finite and not negative.
pub fn parse_weight(s: &str) -> Option<f64> {
    parse_number(s).filter(|w| *w >= 0.0)
}

/// Reads the records of one dataset. Bad years are logged and treated as
/// missing, bad weights (unreadable, infinite or negative) are an error.
pub fn read_raw_records(kind: RecordKind, table: &Table) -> AnalysisResult<Vec<RawRecord>> {
    let layout = ColumnLayout::resolve(kind, table)?;
    let mut res: Vec<RawRecord> = Vec::new();
    for (idx, row) in table.rows.iter().enumerate() {
        // The header is line 1.
        let lineno = idx + 2;
        let conference = cell(table, row, layout.conference, lineno)?;
        let year = match layout.year {
            Some(y_idx) => {
                let s = cell(table, row, y_idx, lineno)?;
                let y = parse_year(s);
                if y.is_none() && !s.trim().is_empty() {
                    warn!(
                        "read_raw_records: {:?} line {}: could not read year {:?}",
                        table.path, lineno, s
                    );
                }
                y
            }
            None => None,
        };
        let continent = cell(table, row, layout.continent, lineno)?;
        let count_weight = match layout.weight {
            Some(w_idx) => {
                let s = cell(table, row, w_idx, lineno)?;
                parse_weight(s).context(BadNumberSnafu {
                    path: table.path.clone(),
                    lineno,
                    content: s.to_string(),
                })?
            }
            None => 1.0,
        };
        res.push(RawRecord {
            conference: conference.to_string(),
            year,
            continent_code: Some(continent.to_string()),
            count_weight,
        });
    }
    debug!(
        "read_raw_records: {}: {:?}: {} rows",
        kind.name(),
        table.path,
        res.len()
    );
    Ok(res)
}

/// Reads the wide affiliation table. Rows of unknown conferences are skipped.
pub fn read_affiliation_rows(vocab: &Vocabulary, table: &Table) -> AnalysisResult<Vec<AffiliationRow>> {
    let conf_idx = table.column_index("Conference")?;
    let year_idx = table.optional_column_index(Some("Year")).ok().flatten();
    let mut share_idx: Vec<(Affiliation, usize)> = Vec::new();
    for a in Affiliation::ALL {
        share_idx.push((a, table.column_index(a.column())?));
    }
    let mut res: Vec<AffiliationRow> = Vec::new();
    for (idx, row) in table.rows.iter().enumerate() {
        let lineno = idx + 2;
        let name = cell(table, row, conf_idx, lineno)?;
        let conference = match normalize_conference(vocab, name) {
            Some(c) => c,
            None => {
                warn!(
                    "read_affiliation_rows: {:?} line {}: skipping conference {:?}",
                    table.path, lineno, name
                );
                continue;
            }
        };
        let year = match year_idx {
            Some(y_idx) => parse_year(cell(table, row, y_idx, lineno)?),
            None => None,
        };
        let mut shares = [0.0; 3];
        for (i, (_, col)) in share_idx.iter().enumerate() {
            let s = cell(table, row, *col, lineno)?;
            shares[i] = parse_number(s).context(BadNumberSnafu {
                path: table.path.clone(),
                lineno,
                content: s.to_string(),
            })?;
        }
        res.push(AffiliationRow {
            conference,
            year,
            pct_has_big: shares[0],
            pct_no_big: shares[1],
            pct_all_none: shares[2],
        });
    }
    Ok(res)
}

/// Reads the long table of big tech shares by continent: `Conference`,
/// `Year`, `level_2` (the `pct_big_*` label) and `X0` (the percentage).
/// Rows of unknown conferences are skipped.
pub fn read_continent_affiliation_rows(
    vocab: &Vocabulary,
    table: &Table,
) -> AnalysisResult<Vec<ContinentAffiliationRow>> {
    let conf_idx = table.column_index("Conference")?;
    let year_idx = table.optional_column_index(Some("Year")).ok().flatten();
    let label_idx = table.column_index("level_2")?;
    let value_idx = table.column_index("X0")?;
    let mut res: Vec<ContinentAffiliationRow> = Vec::new();
    for (idx, row) in table.rows.iter().enumerate() {
        let lineno = idx + 2;
        let name = cell(table, row, conf_idx, lineno)?;
        let conference = match normalize_conference(vocab, name) {
            Some(c) => c,
            None => {
                warn!(
                    "read_continent_affiliation_rows: {:?} line {}: skipping conference {:?}",
                    table.path, lineno, name
                );
                continue;
            }
        };
        let year = match year_idx {
            Some(y_idx) => parse_year(cell(table, row, y_idx, lineno)?),
            None => None,
        };
        let s = cell(table, row, value_idx, lineno)?;
        let percentage = parse_number(s).context(BadNumberSnafu {
            path: table.path.clone(),
            lineno,
            content: s.to_string(),
        })?;
        res.push(ContinentAffiliationRow {
            conference,
            year,
            label: cell(table, row, label_idx, lineno)?.to_string(),
            percentage,
        });
    }
    Ok(res)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(header: &[&str], rows: &[&[&str]]) -> Table {
        Table {
            path: "test.csv".to_string(),
            header: header.iter().map(|s| s.to_string()).collect(),
            rows: rows
                .iter()
                .map(|r| r.iter().map(|s| s.to_string()).collect())
                .collect(),
        }
    }

    #[test]
    fn test_parse_year() {
        assert_eq!(parse_year("2020"), Some(2020));
        assert_eq!(parse_year(" 2021.0 "), Some(2021));
        assert_eq!(parse_year("2021.5"), None);
        assert_eq!(parse_year(""), None);
    }

    #[test]
    fn test_layout_by_kind() {
        let t = table(
            &["Conference", "Year", "Title", "Predominant Continent"],
            &[],
        );
        let layout = ColumnLayout::resolve(RecordKind::Accepted, &t).unwrap();
        assert_eq!(
            layout,
            ColumnLayout {
                conference: 0,
                year: Some(1),
                continent: 3,
                weight: None
            }
        );
        assert!(matches!(
            ColumnLayout::resolve(RecordKind::Committee, &t),
            Err(AnalysisError::MissingColumn { .. })
        ));
    }

    #[test]
    fn test_read_cited() {
        let t = table(
            &["Conference", "Continent", "Num_Papers"],
            &[&["nsdi", "NA", "12"], &["nsdi", "AS", "4.0"]],
        );
        let raws = read_raw_records(RecordKind::Cited, &t).unwrap();
        assert_eq!(raws.len(), 2);
        assert_eq!(raws[0].year, None);
        assert_eq!(raws[0].count_weight, 12.0);
        assert_eq!(raws[1].continent_code, Some("AS".to_string()));

        let bad = table(&["Conference", "Continent", "Num_Papers"], &[&["nsdi", "NA", "many"]]);
        assert!(matches!(
            read_raw_records(RecordKind::Cited, &bad),
            Err(AnalysisError::BadNumber { lineno: 2, .. })
        ));
    }

    #[test]
    fn test_invalid_weights() {
        assert_eq!(parse_weight("0"), Some(0.0));
        assert_eq!(parse_weight(" 4.5 "), Some(4.5));
        assert_eq!(parse_weight("NaN"), None);
        assert_eq!(parse_weight("inf"), None);
        assert_eq!(parse_weight("-6"), None);
        assert_eq!(parse_number("-6"), Some(-6.0));

        let header = ["Conference", "Continent", "Num_Papers"];
        let nan = table(&header, &[&["nsdi", "NA", "NaN"], &["nsdi", "EU", "4"]]);
        assert!(matches!(
            read_raw_records(RecordKind::Cited, &nan),
            Err(AnalysisError::BadNumber { lineno: 2, .. })
        ));
        let negative = table(&header, &[&["osdi", "NA", "10"], &["osdi", "EU", "-6"]]);
        assert!(matches!(
            read_raw_records(RecordKind::Cited, &negative),
            Err(AnalysisError::BadNumber { lineno: 3, .. })
        ));
    }

    #[test]
    fn test_short_line() {
        let t = table(&["Conference", "Year", "Continent"], &[&["osdi", "2020"]]);
        assert!(matches!(
            read_raw_records(RecordKind::Committee, &t),
            Err(AnalysisError::LineTooShort { lineno: 2, .. })
        ));
    }

    #[test]
    fn test_read_affiliations() {
        let t = table(
            &["Conference", "Year", "pct_has_big", "pct_no_big", "pct_all_none"],
            &[
                &["nsdi", "2020", "30", "65", "5"],
                &["vldb", "2020", "10", "90", "0"],
            ],
        );
        let rows = read_affiliation_rows(&Vocabulary::standard(), &t).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].conference, Conference::Nsdi);
        assert_eq!(rows[0].year, Some(2020));
        assert_eq!(rows[0].pct_all_none, 5.0);
    }

    #[test]
    fn test_read_continent_affiliations() {
        let t = table(
            &["Conference", "Year", "level_2", "X0"],
            &[
                &["nsdi", "2020", "pct_big_na", "12.5"],
                &["nsdi", "2020", "pct_big_eu", "2"],
                &["vldb", "2020", "pct_big_na", "40"],
            ],
        );
        let rows = read_continent_affiliation_rows(&Vocabulary::standard(), &t).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].conference, Conference::Nsdi);
        assert_eq!(rows[0].label, "pct_big_na");
        assert_eq!(rows[0].percentage, 12.5);
        assert_eq!(rows[1].year, Some(2020));

        let bad = table(&["Conference", "level_2", "X0"], &[&["nsdi", "pct_big_as", "NaN"]]);
        assert!(matches!(
            read_continent_affiliation_rows(&Vocabulary::standard(), &bad),
            Err(AnalysisError::BadNumber { lineno: 2, .. })
        ));
        let missing = table(&["Conference", "Year", "X0"], &[]);
        assert!(matches!(
            read_continent_affiliation_rows(&Vocabulary::standard(), &missing),
            Err(AnalysisError::MissingColumn { .. })
        ));
    }
}
