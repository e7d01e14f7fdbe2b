// ********* Input data structures ***********

use std::collections::HashMap;
use std::error::Error;
use std::fmt::Display;

/// The conferences covered by the analysis.
///
/// The declaration order is the default display order of the charts.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
pub enum Conference {
    Nsdi,
    Asplos,
    Sigcomm,
    Socc,
    Osdi,
    EuroSys,
    Atc,
    Ic2e,
    Icdcs,
    Middleware,
    IeeeCloud,
    Ccgrid,
    EuroPar,
}

impl Conference {
    pub const ALL: [Conference; 13] = [
        Conference::Nsdi,
        Conference::Asplos,
        Conference::Sigcomm,
        Conference::Socc,
        Conference::Osdi,
        Conference::EuroSys,
        Conference::Atc,
        Conference::Ic2e,
        Conference::Icdcs,
        Conference::Middleware,
        Conference::IeeeCloud,
        Conference::Ccgrid,
        Conference::EuroPar,
    ];

    /// The name used in all the output tables.
    pub fn display_name(&self) -> &'static str {
        match self {
            Conference::Nsdi => "NSDI",
            Conference::Asplos => "ASPLOS",
            Conference::Sigcomm => "SIGCOMM",
            Conference::Socc => "SoCC",
            Conference::Osdi => "OSDI",
            Conference::EuroSys => "EuroSys",
            Conference::Atc => "ATC",
            Conference::Ic2e => "IC2E",
            Conference::Icdcs => "ICDCS",
            Conference::Middleware => "Middleware",
            Conference::IeeeCloud => "IEEE Cloud",
            Conference::Ccgrid => "CCGRID",
            Conference::EuroPar => "Euro-Par",
        }
    }

    /// Exact (case-insensitive) lookup of a display name.
    pub fn from_display_name(name: &str) -> Option<Conference> {
        let name = name.trim();
        Conference::ALL
            .iter()
            .find(|c| c.display_name().eq_ignore_ascii_case(name))
            .cloned()
    }
}

impl Display for Conference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// The continent categories used for distributions, diversity and ranking.
///
/// The smaller continents are grouped under `Others`. Missing or unreadable
/// locations end up in `Unknown`.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
pub enum Continent {
    NorthAmerica,
    Europe,
    Asia,
    Others,
    Unknown,
}

impl Continent {
    /// All the categories, in the order of the rows of a distribution.
    pub const ALL: [Continent; 5] = [
        Continent::NorthAmerica,
        Continent::Europe,
        Continent::Asia,
        Continent::Others,
        Continent::Unknown,
    ];

    pub const KNOWN: [Continent; 4] = [
        Continent::NorthAmerica,
        Continent::Europe,
        Continent::Asia,
        Continent::Others,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Continent::NorthAmerica => "NA",
            Continent::Europe => "EU",
            Continent::Asia => "AS",
            Continent::Others => "Others",
            Continent::Unknown => "Unknown",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Continent::NorthAmerica => "North America",
            Continent::Europe => "Europe",
            Continent::Asia => "Asia",
            Continent::Others => "Others",
            Continent::Unknown => "Unknown",
        }
    }

    /// Parses the code of a category (as produced by `code`), ignoring case.
    pub fn from_code(code: &str) -> Option<Continent> {
        let code = code.trim();
        Continent::ALL
            .iter()
            .find(|c| c.code().eq_ignore_ascii_case(code))
            .cloned()
    }
}

impl Display for Continent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// The coarser continent set used when two distributions are compared.
///
/// `Other` absorbs both the small continents and the unknown locations.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
pub enum ComparisonContinent {
    NorthAmerica,
    Europe,
    Asia,
    Other,
}

impl ComparisonContinent {
    pub const ALL: [ComparisonContinent; 4] = [
        ComparisonContinent::NorthAmerica,
        ComparisonContinent::Europe,
        ComparisonContinent::Asia,
        ComparisonContinent::Other,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            ComparisonContinent::NorthAmerica => "North America",
            ComparisonContinent::Europe => "Europe",
            ComparisonContinent::Asia => "Asia",
            ComparisonContinent::Other => "Other",
        }
    }
}

impl From<Continent> for ComparisonContinent {
    fn from(c: Continent) -> Self {
        match c {
            Continent::NorthAmerica => ComparisonContinent::NorthAmerica,
            Continent::Europe => ComparisonContinent::Europe,
            Continent::Asia => ComparisonContinent::Asia,
            Continent::Others | Continent::Unknown => ComparisonContinent::Other,
        }
    }
}

impl Display for ComparisonContinent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// The kind of dataset a record comes from.
///
/// Each kind stores its location and its weight in different columns. The
/// column names are resolved once, when a reader looks at the header.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum RecordKind {
    /// One row per accepted paper.
    Accepted,
    /// One row per (conference, continent), already counted.
    Cited,
    /// One row per program-committee member.
    Committee,
}

impl RecordKind {
    pub const ALL: [RecordKind; 3] = [RecordKind::Accepted, RecordKind::Cited, RecordKind::Committee];

    pub fn name(&self) -> &'static str {
        match self {
            RecordKind::Accepted => "accepted",
            RecordKind::Cited => "cited",
            RecordKind::Committee => "committee",
        }
    }

    pub fn conference_column(&self) -> &'static str {
        "Conference"
    }

    /// Citation counts are not broken down by year.
    pub fn year_column(&self) -> Option<&'static str> {
        match self {
            RecordKind::Cited => None,
            _ => Some("Year"),
        }
    }

    pub fn continent_column(&self) -> &'static str {
        match self {
            RecordKind::Accepted => "Predominant Continent",
            RecordKind::Cited | RecordKind::Committee => "Continent",
        }
    }

    pub fn weight_column(&self) -> Option<&'static str> {
        match self {
            RecordKind::Cited => Some("Num_Papers"),
            _ => None,
        }
    }
}

/// A row as read from a file, before normalization.
#[derive(PartialEq, Debug, Clone)]
pub struct RawRecord {
    pub conference: String,
    pub year: Option<i32>,
    pub continent_code: Option<String>,
    pub count_weight: f64,
}

impl RawRecord {
    pub fn new(conference: &str, year: Option<i32>, continent_code: Option<&str>) -> RawRecord {
        RawRecord {
            conference: conference.to_string(),
            year,
            continent_code: continent_code.map(|s| s.to_string()),
            count_weight: 1.0,
        }
    }
}

/// A normalized observation. Only records of a known conference exist.
#[derive(PartialEq, Debug, Clone)]
pub struct Record {
    pub kind: RecordKind,
    pub conference: Conference,
    pub year: Option<i32>,
    pub continent: Continent,
    pub count_weight: f64,
}

// ******** Output data structures *********

/// The key of a group in a distribution.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
pub struct GroupKey {
    pub conference: Conference,
    pub year: Option<i32>,
}

#[derive(PartialEq, Debug, Clone)]
pub struct DistributionRow {
    pub group: GroupKey,
    pub continent: Continent,
    pub percentage: f64,
}

/// Percentages of each continent, per group.
///
/// The rows of a group are contiguous and follow the order of `Continent::ALL`.
/// The `Unknown` row is always present.
#[derive(PartialEq, Debug, Clone, Default)]
pub struct Distribution {
    pub rows: Vec<DistributionRow>,
}

impl Distribution {
    /// The groups, in order of first appearance.
    pub fn groups(&self) -> Vec<GroupKey> {
        let mut res: Vec<GroupKey> = Vec::new();
        for r in self.rows.iter() {
            if !res.contains(&r.group) {
                res.push(r.group);
            }
        }
        res
    }

    pub fn conferences(&self) -> Vec<Conference> {
        let mut res: Vec<Conference> = Vec::new();
        for g in self.groups() {
            if !res.contains(&g.conference) {
                res.push(g.conference);
            }
        }
        res
    }

    pub fn get(&self, group: &GroupKey, continent: Continent) -> Option<f64> {
        self.rows
            .iter()
            .find(|r| r.group == *group && r.continent == continent)
            .map(|r| r.percentage)
    }

    pub fn rows_for<'a>(&'a self, group: &'a GroupKey) -> impl Iterator<Item = &'a DistributionRow> {
        self.rows.iter().filter(move |r| r.group == *group)
    }
}

#[derive(PartialEq, Debug, Clone)]
pub struct DiversityScore {
    pub conference: Conference,
    pub index: f64,
}

/// One cell of a comparison between two distributions.
#[derive(PartialEq, Debug, Clone)]
pub struct GapRecord {
    pub conference: Conference,
    pub continent: ComparisonContinent,
    pub value_a: Option<f64>,
    pub value_b: Option<f64>,
    /// `value_b - value_a`, with a missing side counted as 0.
    /// None if neither side has data for this cell.
    pub gap: Option<f64>,
}

/// How much of the input of a conference could be located.
#[derive(PartialEq, Debug, Clone)]
pub struct Coverage {
    pub conference: Conference,
    pub total: f64,
    pub located: f64,
}

impl Coverage {
    pub fn located_percentage(&self) -> f64 {
        if self.total > 0.0 {
            100.0 * self.located / self.total
        } else {
            0.0
        }
    }
}

/// Errors raised when the vocabulary or the options are not consistent.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum GeoErrors {
    UnknownConference(String),
    UnknownContinent(String),
    EmptyAlias,
}

impl Error for GeoErrors {}

impl Display for GeoErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GeoErrors::UnknownConference(s) => write!(f, "unknown conference name: {:?}", s),
            GeoErrors::UnknownContinent(s) => write!(f, "unknown continent code: {:?}", s),
            GeoErrors::EmptyAlias => write!(f, "conference aliases may not be empty"),
        }
    }
}

// ********* Configuration **********

/// The mapping tables shared by all the stages.
///
/// They are plain values, handed to each stage that needs them.
#[derive(PartialEq, Debug, Clone)]
pub struct Vocabulary {
    /// lowercase raw name -> conference
    pub conference_aliases: HashMap<String, Conference>,
    /// uppercase raw code -> continent category
    pub continent_groups: HashMap<String, Continent>,
    /// Colors handed to the renderer, by continent category.
    pub continent_colors: Vec<(Continent, &'static str)>,
}

impl Vocabulary {
    pub fn standard() -> Vocabulary {
        let aliases: [(&str, Conference); 14] = [
            ("nsdi", Conference::Nsdi),
            ("sigcomm", Conference::Sigcomm),
            ("cloud", Conference::Socc),
            ("socc", Conference::Socc),
            ("eurosys", Conference::EuroSys),
            ("ic2e", Conference::Ic2e),
            ("icdcs", Conference::Icdcs),
            ("middleware", Conference::Middleware),
            ("ieeecloud", Conference::IeeeCloud),
            ("ccgrid", Conference::Ccgrid),
            ("europar", Conference::EuroPar),
            ("asplos", Conference::Asplos),
            ("atc", Conference::Atc),
            ("osdi", Conference::Osdi),
        ];
        let mut conference_aliases: HashMap<String, Conference> = aliases
            .iter()
            .map(|(s, c)| (s.to_string(), *c))
            .collect();
        // The display names are valid spellings too.
        for c in Conference::ALL {
            conference_aliases.insert(c.display_name().to_lowercase(), c);
        }

        let continent_groups: HashMap<String, Continent> = [
            ("NA", Continent::NorthAmerica),
            ("EU", Continent::Europe),
            ("AS", Continent::Asia),
            ("SA", Continent::Others),
            ("OC", Continent::Others),
            ("AF", Continent::Others),
        ]
        .iter()
        .map(|(s, c)| (s.to_string(), *c))
        .collect();

        Vocabulary {
            conference_aliases,
            continent_groups,
            continent_colors: vec![
                (Continent::NorthAmerica, "#1f3b6f"),
                (Continent::Europe, "#1681c5"),
                (Continent::Asia, "#7d7d7d"),
                (Continent::Others, "#c5c5c5"),
                (Continent::Unknown, "#FFFFFF"),
            ],
        }
    }

    /// Returns a vocabulary that also recognizes `alias` as the conference
    /// with the display name `canonical`.
    pub fn with_alias(mut self, alias: &str, canonical: &str) -> Result<Vocabulary, GeoErrors> {
        let key = alias.trim().to_lowercase();
        if key.is_empty() {
            return Err(GeoErrors::EmptyAlias);
        }
        let conf = Conference::from_display_name(canonical)
            .ok_or_else(|| GeoErrors::UnknownConference(canonical.to_string()))?;
        self.conference_aliases.insert(key, conf);
        Ok(self)
    }

    pub fn color(&self, continent: Continent) -> Option<&'static str> {
        self.continent_colors
            .iter()
            .find(|(c, _)| *c == continent)
            .map(|(_, col)| *col)
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        Vocabulary::standard()
    }
}

/// How the records are grouped before the percentages are computed.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum Grouping {
    Conference,
    ConferenceYear,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct AggregateOptions {
    pub grouping: Grouping,
    /// If set, each known percentage is rounded to this many decimals before
    /// the unknown remainder is computed. Values above 15 act as 15.
    pub decimal_places: Option<u32>,
}

impl AggregateOptions {
    pub const DEFAULT_OPTIONS: AggregateOptions = AggregateOptions {
        grouping: Grouping::Conference,
        decimal_places: None,
    };
}

/// What happens to the conferences that have no value for the ranking key.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum KeylessPlacement {
    Omit,
    /// Added after the ranked conferences, in their default order.
    Append,
}
