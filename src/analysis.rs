use log::{debug, info, warn};

use geo_diversity::builder::Builder;
use geo_diversity::*;
use snafu::{prelude::*, ErrorCompat, Snafu};

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::json;
use serde_json::Map as JSMap;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::analysis::config_reader::*;
use crate::analysis::io_common::{
    read_affiliation_rows, read_continent_affiliation_rows, read_raw_records, resolve_path, Table,
};
use crate::analysis::output::{write_summary, OutputDir};
use crate::args::Args;

pub mod config_reader;
mod io_common;
mod io_csv;
mod io_excel;
mod output;

#[derive(Debug, Snafu)]
pub enum AnalysisError {
    #[snafu(display("Input file not found: {path}"))]
    MissingInputFile { path: String },
    #[snafu(display("Error opening file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("Error opening file {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("Empty workbook or missing worksheet in {path}"))]
    EmptyExcel { path: String },
    #[snafu(display("Error opening file {path}"))]
    CsvOpen { source: csv::Error, path: String },
    #[snafu(display("Error reading a line of {path}"))]
    CsvLineParse { source: csv::Error, path: String },
    #[snafu(display("Error writing {path}"))]
    CsvWrite { source: csv::Error, path: String },
    #[snafu(display("Missing column {column:?} in {path}"))]
    MissingColumn { path: String, column: String },
    #[snafu(display("Line {lineno} of {path} is too short"))]
    LineTooShort { path: String, lineno: usize },
    #[snafu(display("Line {lineno} of {path}: expected a number, found {content:?}"))]
    BadNumber {
        path: String,
        lineno: usize,
        content: String,
    },
    #[snafu(display("Invalid conference aliases"))]
    InvalidVocabulary { source: GeoErrors },
    #[snafu(display("Error writing {path}"))]
    WritingOutput {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Could not find the directory of the configuration file"))]
    MissingParentDir {},

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type AnalysisResult<T> = Result<T, AnalysisError>;

/// The normalized records of one kind, all sources merged.
#[derive(PartialEq, Debug, Clone)]
pub struct Dataset {
    pub kind: RecordKind,
    pub records: Vec<Record>,
    /// Rows of conferences outside the vocabulary.
    pub dropped: usize,
}

#[derive(PartialEq, Debug, Clone, Default)]
pub struct AnalysisInput {
    pub datasets: Vec<Dataset>,
    pub affiliations: Option<Vec<AffiliationRow>>,
    pub continent_affiliations: Option<Vec<ContinentAffiliationRow>>,
}

impl AnalysisInput {
    pub fn dataset(&self, kind: RecordKind) -> Option<&Dataset> {
        self.datasets.iter().find(|d| d.kind == kind)
    }
}

/// Everything computed for one kind of record.
#[derive(PartialEq, Debug, Clone)]
pub struct KindOutcome {
    pub kind: RecordKind,
    pub num_records: usize,
    pub dropped: usize,
    /// The distribution written out, grouped as requested.
    pub distribution: Distribution,
    /// The distribution by conference, used for diversity and comparisons.
    pub conference_distribution: Distribution,
    pub diversity: Vec<DiversityScore>,
    pub coverage: Vec<Coverage>,
}

#[derive(PartialEq, Debug, Clone)]
pub struct AffiliationOutcome {
    pub shares: Vec<AffiliationShare>,
    pub big_tech_means: Vec<(Conference, f64)>,
}

#[derive(PartialEq, Debug, Clone)]
pub struct AnalysisOutcome {
    /// The display order of the conferences.
    pub order: Vec<Conference>,
    pub kinds: Vec<KindOutcome>,
    /// Gap tables, by output file name.
    pub gaps: Vec<(String, Vec<GapRecord>)>,
    pub affiliation: Option<AffiliationOutcome>,
    /// Mean big tech share per conference and comparison continent.
    pub big_tech_by_continent: Option<Vec<(Conference, ComparisonContinent, f64)>>,
    pub trend: Vec<(i32, f64)>,
}

fn read_table(root: &Path, source: &FileSource) -> AnalysisResult<Table> {
    let path = resolve_path(root, &source.file_path);
    info!("Attempting to read file {:?}", path);
    match source.provider()? {
        Provider::Csv => io_csv::read_csv_table(&path),
        Provider::Xlsx => io_excel::read_excel_table(&path, source.excel_worksheet_name.as_deref()),
    }
}

/// Reads and normalizes all the inputs of a configuration.
pub fn load_input(config: &AnalysisConfig, root: &Path, vocab: &Vocabulary) -> AnalysisResult<AnalysisInput> {
    if config.input_sources.is_empty() {
        whatever!("No input source in the configuration");
    }
    // Checked before any file is opened.
    let mut sources: Vec<(RecordKind, &InputSource)> = Vec::new();
    for src in config.input_sources.iter() {
        sources.push((src.record_kind()?, src));
    }

    let mut datasets: Vec<Dataset> = Vec::new();
    for kind in RecordKind::ALL {
        let kind_sources: Vec<&InputSource> = sources
            .iter()
            .filter(|(k, _)| *k == kind)
            .map(|(_, s)| *s)
            .collect();
        if kind_sources.is_empty() {
            debug!("load_input: no source for {}", kind.name());
            continue;
        }
        let mut builder = Builder::new(vocab, kind);
        for src in kind_sources {
            let table = read_table(root, &src.source)?;
            for raw in read_raw_records(kind, &table)?.iter() {
                builder.add_raw(raw);
            }
        }
        if builder.dropped() > 0 {
            warn!(
                "load_input: {}: dropped {} rows of unrecognized conferences",
                kind.name(),
                builder.dropped()
            );
        }
        let dropped = builder.dropped();
        datasets.push(Dataset {
            kind,
            records: builder.build(),
            dropped,
        });
    }

    let affiliations = match &config.affiliation_source {
        Some(src) => {
            let table = read_table(root, src)?;
            Some(read_affiliation_rows(vocab, &table)?)
        }
        None => None,
    };
    let continent_affiliations = match &config.affiliation_continent_source {
        Some(src) => {
            let table = read_table(root, src)?;
            Some(read_continent_affiliation_rows(vocab, &table)?)
        }
        None => None,
    };
    Ok(AnalysisInput {
        datasets,
        affiliations,
        continent_affiliations,
    })
}

/// Computes all the statistics of a run. No input or output happens here.
pub fn analyze(input: &AnalysisInput, rules: &ValidatedRules) -> AnalysisResult<AnalysisOutcome> {
    let conference_options = AggregateOptions {
        grouping: Grouping::Conference,
        decimal_places: rules.aggregate_options.decimal_places,
    };
    let placement = rules.keyless_placement;

    let accepted = match input.dataset(RecordKind::Accepted) {
        Some(d) => d,
        None => whatever!("An input of accepted papers is required"),
    };
    let accepted_dist = aggregate(&accepted.records, &conference_options);
    let ranked = rank(&accepted_dist, rules.ranking_continent);

    // Every conference seen in any dataset takes part in the display order.
    let mut present: Vec<Conference> = Vec::new();
    for d in input.datasets.iter() {
        present.extend(d.records.iter().map(|r| r.conference));
    }
    let order = complete_order(&ranked, &present, placement);
    info!("analyze: display order: {:?}", order);

    let mut kinds: Vec<KindOutcome> = Vec::new();
    for d in input.datasets.iter() {
        let conference_distribution = aggregate(&d.records, &conference_options);
        let distribution = match rules.aggregate_options.grouping {
            Grouping::Conference => conference_distribution.clone(),
            Grouping::ConferenceYear if d.kind.year_column().is_some() => {
                aggregate(&d.records, &rules.aggregate_options)
            }
            Grouping::ConferenceYear => {
                debug!("analyze: {} has no year, grouping by conference", d.kind.name());
                conference_distribution.clone()
            }
        };
        let diversity = diversity(&conference_distribution);
        kinds.push(KindOutcome {
            kind: d.kind,
            num_records: d.records.len(),
            dropped: d.dropped,
            distribution: order_distribution(&distribution, &ranked, placement),
            diversity: apply_order(&ranked, &diversity, |s| s.conference, placement),
            coverage: apply_order(&ranked, &coverage(&d.records), |c| c.conference, placement),
            conference_distribution,
        });
    }

    let mut gaps: Vec<(String, Vec<GapRecord>)> = Vec::new();
    let papers = accepted_dist.to_comparison();
    for (other_kind, file_name) in [
        (RecordKind::Committee, "committee_vs_accepted_gap.csv"),
        (RecordKind::Cited, "cited_vs_accepted_gap.csv"),
    ] {
        if let Some(k) = kinds.iter().find(|k| k.kind == other_kind) {
            let other = k.conference_distribution.to_comparison();
            let mut grid_confs = accepted_dist.conferences();
            grid_confs.extend(k.conference_distribution.conferences());
            let grid = complete_order(&ranked, &grid_confs, placement);
            gaps.push((file_name.to_string(), compare(&papers, &other, &grid)));
        }
    }

    let affiliation = input.affiliations.as_ref().map(|rows| {
        let big_tech_means = mean_share(rows, Affiliation::BigTech);
        let big_tech_order = rank_values(&big_tech_means);
        AffiliationOutcome {
            shares: apply_order(&big_tech_order, &to_long(rows), |s| s.conference, placement),
            big_tech_means: apply_order(&big_tech_order, &big_tech_means, |m| m.0, placement),
        }
    });

    let big_tech_by_continent = input.continent_affiliations.as_ref().map(|rows| {
        let mut cells = mean_share_by_continent(rows).rows;
        cells.sort_by_key(|(_, cc, _)| *cc);
        apply_order(&ranked, &cells, |r| r.0, placement)
    });

    let trend = yearly_share(&accepted.records, rules.trend_continent);

    Ok(AnalysisOutcome {
        order,
        kinds,
        gaps,
        affiliation,
        big_tech_by_continent,
        trend,
    })
}

pub fn write_tables(out: &OutputDir, outcome: &AnalysisOutcome, rules: &ValidatedRules) -> AnalysisResult<Vec<PathBuf>> {
    let mut written: Vec<PathBuf> = Vec::new();
    for k in outcome.kinds.iter() {
        written.push(out.write_distribution(k.kind, &k.distribution)?);
        written.push(out.write_diversity(k.kind, &k.diversity)?);
    }
    for (file_name, gaps) in outcome.gaps.iter() {
        written.push(out.write_gaps(file_name, gaps)?);
    }
    if let Some(aff) = &outcome.affiliation {
        written.push(out.write_affiliations(&aff.shares)?);
    }
    if let Some(cells) = &outcome.big_tech_by_continent {
        written.push(out.write_big_tech_by_continent(cells)?);
    }
    written.push(out.write_trend(rules.trend_continent, &outcome.trend)?);
    Ok(written)
}

fn file_names(written: &[PathBuf]) -> Vec<String> {
    written
        .iter()
        .filter_map(|p| p.file_name())
        .map(|s| s.to_string_lossy().to_string())
        .collect()
}

pub fn build_summary_js(
    config: &AnalysisConfig,
    rules: &ValidatedRules,
    vocab: &Vocabulary,
    outcome: &AnalysisOutcome,
    written: &[PathBuf],
) -> JSValue {
    let mut datasets: Vec<JSValue> = Vec::new();
    for k in outcome.kinds.iter() {
        let coverage: Vec<JSValue> = k
            .coverage
            .iter()
            .map(|c| {
                json!({
                    "conference": c.conference.to_string(),
                    "total": c.total,
                    "located": c.located,
                    "locatedPercentage": c.located_percentage(),
                })
            })
            .collect();
        let mut diversity: JSMap<String, JSValue> = JSMap::new();
        for s in k.diversity.iter() {
            diversity.insert(s.conference.to_string(), json!(s.index));
        }
        datasets.push(json!({
            "kind": k.kind.name(),
            "records": k.num_records,
            "dropped": k.dropped,
            "coverage": coverage,
            "diversity": diversity,
        }));
    }

    let mut palette: JSMap<String, JSValue> = JSMap::new();
    for c in Continent::ALL {
        if let Some(color) = vocab.color(c) {
            palette.insert(c.to_string(), json!(color));
        }
    }

    let big_tech: Option<Vec<JSValue>> = outcome.affiliation.as_ref().map(|aff| {
        aff.big_tech_means
            .iter()
            .map(|(c, m)| json!({"conference": c.to_string(), "meanPercentage": m}))
            .collect()
    });

    let big_tech_by_continent: Option<Vec<JSValue>> = outcome.big_tech_by_continent.as_ref().map(|cells| {
        cells
            .iter()
            .map(|(c, cc, m)| {
                json!({"conference": c.to_string(), "continent": cc.to_string(), "meanPercentage": m})
            })
            .collect()
    });

    let trend: Vec<JSValue> = outcome
        .trend
        .iter()
        .map(|(y, p)| json!({"year": y, "percentage": p}))
        .collect();

    json!({
        "config": {
            "analysisName": config.output_settings.analysis_name,
            "rankingContinent": rules.ranking_continent.code(),
            "groupByYear": rules.aggregate_options.grouping == Grouping::ConferenceYear,
            "decimalPlaces": rules.aggregate_options.decimal_places,
        },
        "order": outcome.order.iter().map(|c| c.to_string()).collect::<Vec<String>>(),
        "datasets": datasets,
        "bigTechRanking": big_tech,
        "bigTechByContinent": big_tech_by_continent,
        "trend": {"continent": rules.trend_continent.to_string(), "values": trend},
        "palette": palette,
        "outputs": file_names(written),
    })
}

/// Runs a complete analysis. `root` is the directory against which the
/// relative paths of the configuration are resolved.
pub fn run_analysis(
    config: &AnalysisConfig,
    root: &Path,
    out_path: Option<&str>,
    check_summary_path: Option<&str>,
) -> AnalysisResult<JSValue> {
    info!("config: {:?}", config);
    let rules = validate_rules(config)?;
    let vocab = build_vocabulary(config)?;

    let input = load_input(config, root, &vocab)?;
    let outcome = analyze(&input, &rules)?;

    let out_dir = resolve_path(
        root,
        config.output_settings.output_directory.as_deref().unwrap_or("out"),
    );
    let out = OutputDir::create(PathBuf::from(out_dir))?;
    let written = write_tables(&out, &outcome, &rules)?;

    let result_js = build_summary_js(config, &rules, &vocab, &outcome, &written);
    let pretty_js_stats = serde_json::to_string_pretty(&result_js).context(ParsingJsonSnafu {})?;
    write_summary(out_path, &pretty_js_stats)?;

    // The reference summary, if provided for comparison
    if let Some(summary_p) = check_summary_path {
        let summary_ref = read_summary(summary_p)?;
        let pretty_js_summary_ref =
            serde_json::to_string_pretty(&summary_ref).context(ParsingJsonSnafu {})?;
        if pretty_js_summary_ref != pretty_js_stats {
            warn!("Found differences with the reference summary");
            print_diff(
                pretty_js_summary_ref.as_str(),
                pretty_js_stats.as_ref(),
                "\n",
            );
            whatever!("Difference detected between calculated summary and reference summary")
        }
        info!("The summary matches the reference {:?}", summary_p);
    }

    Ok(result_js)
}

/// Builds a configuration from the input flags of the command line.
fn config_from_args(args: &Args) -> AnalysisResult<AnalysisConfig> {
    let source = |kind: RecordKind, path: &str| InputSource {
        kind: kind.name().to_string(),
        source: FileSource {
            provider: args.input_type.clone(),
            file_path: path.to_string(),
            excel_worksheet_name: args.excel_worksheet_name.clone(),
        },
    };
    let mut input_sources: Vec<InputSource> = Vec::new();
    if let Some(p) = &args.papers {
        input_sources.push(source(RecordKind::Accepted, p));
    }
    if let Some(p) = &args.committee {
        input_sources.push(source(RecordKind::Committee, p));
    }
    if let Some(p) = &args.citations {
        input_sources.push(source(RecordKind::Cited, p));
    }
    if input_sources.is_empty() {
        whatever!("Either --config or --papers must be provided");
    }
    Ok(AnalysisConfig {
        output_settings: OutputSettings {
            analysis_name: "confgeo".to_string(),
            output_directory: args.out_dir.clone(),
            decimal_places: None,
        },
        input_sources,
        affiliation_source: args.affiliations.as_ref().map(|p| FileSource {
            provider: args.input_type.clone(),
            file_path: p.clone(),
            excel_worksheet_name: args.excel_worksheet_name.clone(),
        }),
        affiliation_continent_source: args.affiliations_by_continent.as_ref().map(|p| FileSource {
            provider: args.input_type.clone(),
            file_path: p.clone(),
            excel_worksheet_name: args.excel_worksheet_name.clone(),
        }),
        rules: Some(AnalysisRules {
            ranking_continent: args.ranking_continent.clone(),
            ..Default::default()
        }),
        conference_aliases: None,
    })
}

/// Entry point of the command line.
pub fn run_from_args(args: &Args) -> AnalysisResult<()> {
    let (mut config, root) = match &args.config {
        Some(config_path) => {
            if args.papers.is_some() || args.committee.is_some() || args.citations.is_some() {
                whatever!("The input files must be given either in the configuration or on the command line, not both");
            }
            let config = read_config(config_path)?;
            let root = Path::new(config_path)
                .parent()
                .context(MissingParentDirSnafu {})?
                .to_path_buf();
            (config, root)
        }
        None => (config_from_args(args)?, PathBuf::from(".")),
    };
    // The flags take precedence over the configuration file.
    if args.out_dir.is_some() {
        config.output_settings.output_directory = args.out_dir.clone();
    }
    if args.ranking_continent.is_some() {
        let mut rules = config.rules.clone().unwrap_or_default();
        rules.ranking_continent = args.ranking_continent.clone();
        config.rules = Some(rules);
    }
    run_analysis(
        &config,
        &root,
        args.out.as_deref(),
        args.reference.as_deref(),
    )?;
    Ok(())
}

pub fn print_error(e: &AnalysisError) {
    eprintln!("An error occured: {}", e);
    let mut source = std::error::Error::source(e);
    while let Some(s) = source {
        eprintln!("  caused by: {}", s);
        source = std::error::Error::source(s);
    }
    if let Some(bt) = ErrorCompat::backtrace(e) {
        eprintln!("trace: {}", bt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAPERS: &str = "Conference,Year,Title,Predominant Continent
nsdi,2020,P1,NA
nsdi,2020,P2,NA
nsdi,2020,P3,EU
nsdi,2020,P4,
osdi,2021,P5,EU
osdi,2021,P6,AS
vldb,2021,P7,NA
";

    const COMMITTEE: &str = "Conference,Year,Name,Institution,Continent
nsdi,2020,A,U1,NA
nsdi,2020,B,U2,EU;NA
osdi,2021,C,U3,AS
cloud,2021,D,U4,OC
";

    const AFFILIATIONS: &str = "Conference,Year,pct_has_big,pct_no_big,pct_all_none
nsdi,2020,10,85,5
osdi,2020,40,60,0
osdi,2021,20,80,0
";

    const AFFILIATIONS_BY_CONTINENT: &str = "Conference,Year,level_2,X0
osdi,2020,pct_big_na,30
osdi,2021,pct_big_na,10
osdi,2020,pct_big_eu,6
nsdi,2020,pct_big_as,4
nsdi,2020,pct_big_na,6
";

    const CONFIG: &str = r#"{
        "outputSettings": {"analysisName": "fixture", "outputDirectory": "out"},
        "inputSources": [
            {"kind": "accepted", "filePath": "papers.csv"},
            {"kind": "committee", "provider": "csv", "filePath": "committee.csv"}
        ],
        "affiliationSource": {"filePath": "affiliations.csv"},
        "affiliationContinentSource": {"filePath": "affiliations_by_continent.csv"}
    }"#;

    fn fixture() -> (tempfile::TempDir, AnalysisConfig) {
        let _ = env_logger::builder().is_test(true).try_init();
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("papers.csv"), PAPERS).unwrap();
        fs::write(dir.path().join("committee.csv"), COMMITTEE).unwrap();
        fs::write(dir.path().join("affiliations.csv"), AFFILIATIONS).unwrap();
        fs::write(
            dir.path().join("affiliations_by_continent.csv"),
            AFFILIATIONS_BY_CONTINENT,
        )
        .unwrap();
        let config: AnalysisConfig = serde_json::from_str(CONFIG).unwrap();
        (dir, config)
    }

    fn gap_of(gaps: &[GapRecord], c: Conference, cc: ComparisonContinent) -> Option<f64> {
        gaps.iter()
            .find(|g| g.conference == c && g.continent == cc)
            .and_then(|g| g.gap)
    }

    #[test]
    fn test_analyze_fixture() {
        let (dir, config) = fixture();
        let rules = validate_rules(&config).unwrap();
        let input = load_input(&config, dir.path(), &Vocabulary::standard()).unwrap();
        assert_eq!(input.dataset(RecordKind::Accepted).unwrap().dropped, 1);
        assert!(input.dataset(RecordKind::Cited).is_none());

        let outcome = analyze(&input, &rules).unwrap();
        // Only NSDI has North American papers, the others are appended.
        assert_eq!(
            outcome.order,
            vec![Conference::Nsdi, Conference::Socc, Conference::Osdi]
        );

        let accepted = &outcome.kinds[0];
        assert_eq!(accepted.kind, RecordKind::Accepted);
        let nsdi = GroupKey {
            conference: Conference::Nsdi,
            year: None,
        };
        assert_eq!(accepted.distribution.get(&nsdi, Continent::NorthAmerica), Some(50.0));
        assert_eq!(accepted.distribution.get(&nsdi, Continent::Unknown), Some(25.0));
        assert!((accepted.diversity[0].index - 4.0 / 9.0).abs() < 1e-9);
        assert_eq!(accepted.diversity[1].conference, Conference::Osdi);
        assert_eq!(accepted.diversity[1].index, 0.5);

        let (name, gaps) = &outcome.gaps[0];
        assert_eq!(name, "committee_vs_accepted_gap.csv");
        assert_eq!(gaps.len(), 12);
        assert_eq!(gaps[0].conference, Conference::Nsdi);
        assert_eq!(gap_of(gaps, Conference::Nsdi, ComparisonContinent::NorthAmerica), Some(0.0));
        assert_eq!(gap_of(gaps, Conference::Nsdi, ComparisonContinent::Europe), Some(25.0));
        assert_eq!(gap_of(gaps, Conference::Nsdi, ComparisonContinent::Asia), None);
        assert_eq!(gap_of(gaps, Conference::Nsdi, ComparisonContinent::Other), Some(-25.0));
        assert_eq!(gap_of(gaps, Conference::Socc, ComparisonContinent::Other), Some(100.0));

        let aff = outcome.affiliation.unwrap();
        assert_eq!(
            aff.big_tech_means,
            vec![(Conference::Osdi, 30.0), (Conference::Nsdi, 10.0)]
        );
        assert_eq!(aff.shares.len(), 9);
        assert_eq!(aff.shares[0].conference, Conference::Osdi);

        // Display order, then continent order.
        assert_eq!(
            outcome.big_tech_by_continent.unwrap(),
            vec![
                (Conference::Nsdi, ComparisonContinent::NorthAmerica, 6.0),
                (Conference::Nsdi, ComparisonContinent::Asia, 4.0),
                (Conference::Osdi, ComparisonContinent::NorthAmerica, 20.0),
                (Conference::Osdi, ComparisonContinent::Europe, 6.0),
            ]
        );

        assert_eq!(outcome.trend, vec![(2020, 0.0), (2021, 50.0)]);
    }

    #[test]
    fn test_run_writes_tables() {
        let (dir, config) = fixture();
        let out_file = dir.path().join("summary.json").display().to_string();
        let js = run_analysis(&config, dir.path(), Some(&out_file), None).unwrap();
        assert_eq!(js["order"][0], json!("NSDI"));
        assert_eq!(js["datasets"][0]["dropped"], json!(1));
        assert_eq!(js["config"]["rankingContinent"], json!("NA"));
        assert!(Path::new(&out_file).exists());
        assert_eq!(js["bigTechByContinent"][0]["continent"], json!("North America"));
        assert_eq!(js["bigTechByContinent"][2]["meanPercentage"], json!(20.0));

        let out = dir.path().join("out");
        let dist = fs::read_to_string(out.join("accepted_distribution.csv")).unwrap();
        assert_eq!(
            dist,
            "Conference,Year,Continent,Percentage
NSDI,,North America,50.0
NSDI,,Europe,25.0
NSDI,,Unknown,25.0
OSDI,,Europe,50.0
OSDI,,Asia,50.0
OSDI,,Unknown,0.0
"
        );
        for f in [
            "committee_distribution.csv",
            "accepted_diversity.csv",
            "committee_diversity.csv",
            "committee_vs_accepted_gap.csv",
            "affiliation_long.csv",
            "big_tech_by_continent.csv",
            "asia_trend.csv",
        ] {
            assert!(out.join(f).exists(), "missing {}", f);
        }
        assert!(!out.join("cited_vs_accepted_gap.csv").exists());
    }

    #[test]
    fn test_reference_summary() {
        let (dir, config) = fixture();
        let out_file = dir.path().join("summary.json").display().to_string();
        run_analysis(&config, dir.path(), Some(&out_file), None).unwrap();
        // Same inputs, same summary.
        assert!(run_analysis(&config, dir.path(), Some("stdout"), Some(&out_file)).is_ok());

        let bad_ref = dir.path().join("bad.json");
        fs::write(&bad_ref, "{\"order\": []}").unwrap();
        let res = run_analysis(
            &config,
            dir.path(),
            Some("stdout"),
            Some(&bad_ref.display().to_string()),
        );
        assert!(matches!(res, Err(AnalysisError::Whatever { .. })));
    }

    #[test]
    fn test_group_by_year() {
        let (dir, mut config) = fixture();
        config.rules = Some(AnalysisRules {
            group_by_year: Some(true),
            keyless_placement: Some("omit".to_string()),
            ..Default::default()
        });
        let rules = validate_rules(&config).unwrap();
        let input = load_input(&config, dir.path(), &Vocabulary::standard()).unwrap();
        let outcome = analyze(&input, &rules).unwrap();
        assert_eq!(outcome.order, vec![Conference::Nsdi]);
        let accepted = &outcome.kinds[0];
        assert_eq!(
            accepted.distribution.groups(),
            vec![GroupKey {
                conference: Conference::Nsdi,
                year: Some(2020)
            }]
        );
        // Diversity is still computed per conference.
        assert_eq!(accepted.diversity.len(), 1);
    }

    #[test]
    fn test_missing_accepted() {
        let (dir, mut config) = fixture();
        config.input_sources.remove(0);
        let rules = validate_rules(&config).unwrap();
        let input = load_input(&config, dir.path(), &Vocabulary::standard()).unwrap();
        assert!(analyze(&input, &rules).is_err());
    }

    #[test]
    fn test_missing_input_file() {
        let (dir, mut config) = fixture();
        config.input_sources[1].source.file_path = "nope.csv".to_string();
        let res = run_analysis(&config, dir.path(), Some("stdout"), None);
        assert!(matches!(res, Err(AnalysisError::MissingInputFile { .. })));
    }
}
