// Writers for the output tables.

use std::path::PathBuf;

use serde::Serialize;

use crate::analysis::*;

#[derive(PartialEq, Debug, Clone, Serialize)]
struct DistributionLine {
    #[serde(rename = "Conference")]
    conference: String,
    #[serde(rename = "Year")]
    year: Option<i32>,
    #[serde(rename = "Continent")]
    continent: String,
    #[serde(rename = "Percentage")]
    percentage: f64,
}

#[derive(PartialEq, Debug, Clone, Serialize)]
struct DiversityLine {
    #[serde(rename = "Conference")]
    conference: String,
    #[serde(rename = "DiversityIndex")]
    index: f64,
}

#[derive(PartialEq, Debug, Clone, Serialize)]
struct GapLine {
    #[serde(rename = "Conference")]
    conference: String,
    #[serde(rename = "Continent")]
    continent: String,
    #[serde(rename = "ValueA")]
    value_a: Option<f64>,
    #[serde(rename = "ValueB")]
    value_b: Option<f64>,
    #[serde(rename = "Gap")]
    gap: Option<f64>,
}

#[derive(PartialEq, Debug, Clone, Serialize)]
struct AffiliationLine {
    #[serde(rename = "Conference")]
    conference: String,
    #[serde(rename = "Year")]
    year: Option<i32>,
    #[serde(rename = "Affiliation")]
    affiliation: String,
    #[serde(rename = "Percentage")]
    percentage: f64,
}

#[derive(PartialEq, Debug, Clone, Serialize)]
struct ContinentShareLine {
    #[serde(rename = "Conference")]
    conference: String,
    #[serde(rename = "Continent")]
    continent: String,
    #[serde(rename = "Percentage")]
    percentage: f64,
}

#[derive(PartialEq, Debug, Clone, Serialize)]
struct TrendLine {
    #[serde(rename = "Year")]
    year: i32,
    #[serde(rename = "Percentage")]
    percentage: f64,
}

/// Where the tables of a run are written.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct OutputDir {
    pub root: PathBuf,
}

impl OutputDir {
    pub fn create(root: PathBuf) -> AnalysisResult<OutputDir> {
        let path = root.display().to_string();
        fs::create_dir_all(&root).context(WritingOutputSnafu { path })?;
        Ok(OutputDir { root })
    }

    fn write_lines<T: Serialize>(&self, file_name: &str, lines: &[T]) -> AnalysisResult<PathBuf> {
        let p = self.root.join(file_name);
        let path = p.display().to_string();
        let mut wtr = csv::Writer::from_path(&p).context(CsvWriteSnafu { path: path.clone() })?;
        for l in lines.iter() {
            wtr.serialize(l).context(CsvWriteSnafu { path: path.clone() })?;
        }
        wtr.flush().context(WritingOutputSnafu { path: path.clone() })?;
        info!("write_lines: {:?}: {} lines", path, lines.len());
        Ok(p)
    }

    pub fn write_distribution(&self, kind: RecordKind, dist: &Distribution) -> AnalysisResult<PathBuf> {
        let lines: Vec<DistributionLine> = dist
            .rows
            .iter()
            .map(|r| DistributionLine {
                conference: r.group.conference.to_string(),
                year: r.group.year,
                continent: r.continent.to_string(),
                percentage: r.percentage,
            })
            .collect();
        self.write_lines(&format!("{}_distribution.csv", kind.name()), &lines)
    }

    pub fn write_diversity(&self, kind: RecordKind, scores: &[DiversityScore]) -> AnalysisResult<PathBuf> {
        let lines: Vec<DiversityLine> = scores
            .iter()
            .map(|s| DiversityLine {
                conference: s.conference.to_string(),
                index: s.index,
            })
            .collect();
        self.write_lines(&format!("{}_diversity.csv", kind.name()), &lines)
    }

    pub fn write_gaps(&self, file_name: &str, gaps: &[GapRecord]) -> AnalysisResult<PathBuf> {
        let lines: Vec<GapLine> = gaps
            .iter()
            .map(|g| GapLine {
                conference: g.conference.to_string(),
                continent: g.continent.to_string(),
                value_a: g.value_a,
                value_b: g.value_b,
                gap: g.gap,
            })
            .collect();
        self.write_lines(file_name, &lines)
    }

    pub fn write_affiliations(&self, shares: &[AffiliationShare]) -> AnalysisResult<PathBuf> {
        let lines: Vec<AffiliationLine> = shares
            .iter()
            .map(|s| AffiliationLine {
                conference: s.conference.to_string(),
                year: s.year,
                affiliation: s.affiliation.to_string(),
                percentage: s.percentage,
            })
            .collect();
        self.write_lines("affiliation_long.csv", &lines)
    }

    pub fn write_big_tech_by_continent(
        &self,
        cells: &[(Conference, ComparisonContinent, f64)],
    ) -> AnalysisResult<PathBuf> {
        let lines: Vec<ContinentShareLine> = cells
            .iter()
            .map(|(c, cc, p)| ContinentShareLine {
                conference: c.to_string(),
                continent: cc.to_string(),
                percentage: *p,
            })
            .collect();
        self.write_lines("big_tech_by_continent.csv", &lines)
    }

    pub fn write_trend(&self, continent: Continent, trend: &[(i32, f64)]) -> AnalysisResult<PathBuf> {
        let lines: Vec<TrendLine> = trend
            .iter()
            .map(|(year, percentage)| TrendLine {
                year: *year,
                percentage: *percentage,
            })
            .collect();
        let file_name = format!(
            "{}_trend.csv",
            continent.display_name().to_lowercase().replace(' ', "_")
        );
        self.write_lines(&file_name, &lines)
    }
}

/// Writes the summary to a file, or to the standard output for `stdout`.
pub fn write_summary(out: Option<&str>, pretty_js: &str) -> AnalysisResult<()> {
    match out {
        None | Some("stdout") => {
            println!("{}", pretty_js);
        }
        Some(path) => {
            fs::write(path, pretty_js).context(WritingOutputSnafu { path })?;
            info!("write_summary: summary written to {:?}", path);
        }
    }
    Ok(())
}
