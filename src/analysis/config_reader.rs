use crate::analysis::*;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value as JSValue;

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(rename = "analysisName")]
    pub analysis_name: String,
    #[serde(rename = "outputDirectory")]
    pub output_directory: Option<String>,
    #[serde(rename = "decimalPlaces")]
    pub decimal_places: Option<u32>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct FileSource {
    /// `csv` (default) or `xlsx`
    pub provider: Option<String>,
    #[serde(rename = "filePath")]
    pub file_path: String,
    #[serde(rename = "excelWorksheetName")]
    pub excel_worksheet_name: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum Provider {
    Csv,
    Xlsx,
}

impl FileSource {
    pub fn provider(&self) -> AnalysisResult<Provider> {
        match self.provider.as_deref().map(|s| s.to_lowercase()).as_deref() {
            None | Some("csv") => Ok(Provider::Csv),
            Some("xlsx") | Some("excel") => Ok(Provider::Xlsx),
            Some(x) => whatever!("Provider not implemented: {:?}", x),
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct InputSource {
    /// `accepted`, `committee` or `cited`
    pub kind: String,
    #[serde(flatten)]
    pub source: FileSource,
}

impl InputSource {
    pub fn record_kind(&self) -> AnalysisResult<RecordKind> {
        match RecordKind::ALL
            .iter()
            .find(|k| k.name().eq_ignore_ascii_case(self.kind.trim()))
        {
            Some(k) => Ok(*k),
            None => whatever!(
                "Unknown input kind {:?} for {:?} (expected accepted, committee or cited)",
                self.kind,
                self.source.file_path
            ),
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize, Default)]
pub struct AnalysisRules {
    #[serde(rename = "rankingContinent")]
    pub ranking_continent: Option<String>,
    #[serde(rename = "keylessPlacement")]
    pub keyless_placement: Option<String>,
    #[serde(rename = "groupByYear")]
    pub group_by_year: Option<bool>,
    #[serde(rename = "trendContinent")]
    pub trend_continent: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    #[serde(rename = "outputSettings")]
    pub output_settings: OutputSettings,
    #[serde(rename = "inputSources")]
    pub input_sources: Vec<InputSource>,
    #[serde(rename = "affiliationSource")]
    pub affiliation_source: Option<FileSource>,
    #[serde(rename = "affiliationContinentSource")]
    pub affiliation_continent_source: Option<FileSource>,
    pub rules: Option<AnalysisRules>,
    #[serde(rename = "conferenceAliases")]
    pub conference_aliases: Option<BTreeMap<String, String>>,
}

/// The rules of a run, once checked.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ValidatedRules {
    pub ranking_continent: Continent,
    pub keyless_placement: KeylessPlacement,
    pub aggregate_options: AggregateOptions,
    pub trend_continent: Continent,
}

fn read_continent_option(name: &str, value: &Option<String>, default: Continent) -> AnalysisResult<Continent> {
    match value {
        None => Ok(default),
        Some(s) => match Continent::from_code(s) {
            Some(c) => Ok(c),
            None => whatever!(
                "Failed to understand {} option: {:?} (expected NA, EU, AS, Others or Unknown)",
                name,
                s
            ),
        },
    }
}

/// More decimals than an f64 percentage can hold.
pub const MAX_DECIMAL_PLACES: u32 = 15;

pub fn validate_rules(config: &AnalysisConfig) -> AnalysisResult<ValidatedRules> {
    let rules = config.rules.clone().unwrap_or_default();
    if let Some(dp) = config.output_settings.decimal_places {
        if dp > MAX_DECIMAL_PLACES {
            whatever!(
                "Failed to understand decimalPlaces option: {} (at most {})",
                dp,
                MAX_DECIMAL_PLACES
            );
        }
    }
    let res = ValidatedRules {
        ranking_continent: read_continent_option(
            "rankingContinent",
            &rules.ranking_continent,
            Continent::NorthAmerica,
        )?,
        keyless_placement: match rules.keyless_placement.as_deref() {
            None | Some("append") => KeylessPlacement::Append,
            Some("omit") => KeylessPlacement::Omit,
            Some(x) => {
                whatever!(
                    "Failed to understand keylessPlacement option: {:?} (expected append or omit)",
                    x
                )
            }
        },
        aggregate_options: AggregateOptions {
            grouping: if rules.group_by_year.unwrap_or(false) {
                Grouping::ConferenceYear
            } else {
                Grouping::Conference
            },
            decimal_places: config.output_settings.decimal_places,
        },
        trend_continent: read_continent_option(
            "trendContinent",
            &rules.trend_continent,
            Continent::Asia,
        )?,
    };
    Ok(res)
}

/// The standard vocabulary, extended with the aliases of the configuration.
pub fn build_vocabulary(config: &AnalysisConfig) -> AnalysisResult<Vocabulary> {
    let mut vocab = Vocabulary::standard();
    if let Some(aliases) = &config.conference_aliases {
        for (alias, canonical) in aliases.iter() {
            debug!("build_vocabulary: alias {:?} -> {:?}", alias, canonical);
            vocab = vocab
                .with_alias(alias, canonical)
                .context(InvalidVocabularySnafu {})?;
        }
    }
    Ok(vocab)
}

pub fn read_config(path: &str) -> AnalysisResult<AnalysisConfig> {
    if !Path::new(path).exists() {
        return MissingInputFileSnafu { path }.fail();
    }
    let config_str = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let config: AnalysisConfig = serde_json::from_str(&config_str).context(ParsingJsonSnafu {})?;
    Ok(config)
}

/// Reads a summary written by a previous run, for comparison.
pub fn read_summary(path: &str) -> AnalysisResult<JSValue> {
    if !Path::new(path).exists() {
        return MissingInputFileSnafu { path }.fail();
    }
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    Ok(js)
}
