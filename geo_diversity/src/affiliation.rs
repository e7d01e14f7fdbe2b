//! Company affiliation shares.
//!
//! The classification of the papers (big tech company, academia, no data) is
//! done upstream. This module only reshapes the resulting percentages.

use std::fmt::Display;

use log::debug;

use crate::compare::ComparisonTable;
use crate::config::*;

#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum Affiliation {
    /// At least one author from a big tech company.
    BigTech,
    NoBigTech,
    /// No institution data for any author.
    NoData,
}

impl Affiliation {
    pub const ALL: [Affiliation; 3] = [Affiliation::BigTech, Affiliation::NoBigTech, Affiliation::NoData];

    /// The column holding this share in the wide table.
    pub fn column(&self) -> &'static str {
        match self {
            Affiliation::BigTech => "pct_has_big",
            Affiliation::NoBigTech => "pct_no_big",
            Affiliation::NoData => "pct_all_none",
        }
    }

    pub fn from_column(column: &str) -> Option<Affiliation> {
        let column = column.trim();
        Affiliation::ALL.iter().find(|a| a.column() == column).cloned()
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Affiliation::BigTech => "Big Tech",
            Affiliation::NoBigTech => "No Big Tech",
            Affiliation::NoData => "No Data",
        }
    }
}

impl Display for Affiliation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// One row of the wide affiliation table.
#[derive(PartialEq, Debug, Clone)]
pub struct AffiliationRow {
    pub conference: Conference,
    pub year: Option<i32>,
    pub pct_has_big: f64,
    pub pct_no_big: f64,
    pub pct_all_none: f64,
}

impl AffiliationRow {
    pub fn share(&self, affiliation: Affiliation) -> f64 {
        match affiliation {
            Affiliation::BigTech => self.pct_has_big,
            Affiliation::NoBigTech => self.pct_no_big,
            Affiliation::NoData => self.pct_all_none,
        }
    }
}

/// One row of the long affiliation table.
#[derive(PartialEq, Debug, Clone)]
pub struct AffiliationShare {
    pub conference: Conference,
    pub year: Option<i32>,
    pub affiliation: Affiliation,
    pub percentage: f64,
}

/// Turns each wide row into one row per affiliation category.
pub fn to_long(rows: &[AffiliationRow]) -> Vec<AffiliationShare> {
    rows.iter()
        .flat_map(|r| {
            Affiliation::ALL.iter().map(move |a| AffiliationShare {
                conference: r.conference,
                year: r.year,
                affiliation: *a,
                percentage: r.share(*a),
            })
        })
        .collect()
}

/// Mean share of one category across the years of each conference.
///
/// Conferences are listed in order of first appearance.
pub fn mean_share(rows: &[AffiliationRow], affiliation: Affiliation) -> Vec<(Conference, f64)> {
    let mut acc: Vec<(Conference, f64, u32)> = Vec::new();
    for r in rows.iter() {
        match acc.iter_mut().find(|(c, _, _)| *c == r.conference) {
            Some(entry) => {
                entry.1 += r.share(affiliation);
                entry.2 += 1;
            }
            None => acc.push((r.conference, r.share(affiliation), 1)),
        }
    }
    acc.into_iter()
        .map(|(c, total, n)| (c, total / n as f64))
        .collect()
}

/// The prefix of the labels of the shares by continent: `pct_big_na`,
/// `pct_big_eu`, `pct_big_as`, `pct_big_other`.
pub const CONTINENT_LABEL_PREFIX: &str = "pct_big_";

/// One row of the long table of big tech shares by continent.
///
/// `percentage` is the share of all the papers of the conference that year
/// which have a big tech author and come from this continent.
#[derive(PartialEq, Debug, Clone)]
pub struct ContinentAffiliationRow {
    pub conference: Conference,
    pub year: Option<i32>,
    pub label: String,
    pub percentage: f64,
}

/// Mean big tech share per conference and continent, across the years.
///
/// Rows whose label does not start with [`CONTINENT_LABEL_PREFIX`] are
/// skipped.
///
/// ```
/// use geo_diversity::*;
///
/// let row = |year, label: &str, percentage| ContinentAffiliationRow {
///     conference: Conference::Nsdi,
///     year: Some(year),
///     label: label.to_string(),
///     percentage,
/// };
/// let table = mean_share_by_continent(&[
///     row(2020, "pct_big_na", 10.0),
///     row(2021, "pct_big_na", 20.0),
///     row(2020, "pct_big_as", 5.0),
/// ]);
/// assert_eq!(table.get(Conference::Nsdi, ComparisonContinent::NorthAmerica), Some(15.0));
/// assert_eq!(table.get(Conference::Nsdi, ComparisonContinent::Asia), Some(5.0));
/// ```
pub fn mean_share_by_continent(rows: &[ContinentAffiliationRow]) -> ComparisonTable {
    let mut acc: Vec<(Conference, String, f64, u32)> = Vec::new();
    for r in rows.iter() {
        let label = r.label.trim().to_lowercase();
        let continent = match label.strip_prefix(CONTINENT_LABEL_PREFIX) {
            Some(c) => c.to_string(),
            None => {
                debug!("mean_share_by_continent: skipping label {:?}", r.label);
                continue;
            }
        };
        match acc
            .iter_mut()
            .find(|(c, l, _, _)| *c == r.conference && *l == continent)
        {
            Some(entry) => {
                entry.2 += r.percentage;
                entry.3 += 1;
            }
            None => acc.push((r.conference, continent, r.percentage, 1)),
        }
    }
    let means: Vec<(Conference, String, f64)> = acc
        .into_iter()
        .map(|(c, l, total, n)| (c, l, total / n as f64))
        .collect();
    ComparisonTable::from_labels(&means)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rank_values;

    fn row(c: Conference, year: i32, big: f64, no_big: f64) -> AffiliationRow {
        AffiliationRow {
            conference: c,
            year: Some(year),
            pct_has_big: big,
            pct_no_big: no_big,
            pct_all_none: 100.0 - big - no_big,
        }
    }

    #[test]
    fn test_to_long() {
        let long = to_long(&[row(Conference::Osdi, 2020, 30.0, 60.0)]);
        assert_eq!(long.len(), 3);
        assert_eq!(long[0].affiliation, Affiliation::BigTech);
        assert_eq!(long[0].percentage, 30.0);
        assert_eq!(long[2].affiliation, Affiliation::NoData);
        assert_eq!(long[2].percentage, 10.0);
    }

    #[test]
    fn test_columns() {
        assert_eq!(Affiliation::from_column("pct_has_big"), Some(Affiliation::BigTech));
        assert_eq!(Affiliation::from_column("pct_all_none"), Some(Affiliation::NoData));
        assert_eq!(Affiliation::from_column("X0"), None);
    }

    #[test]
    fn test_mean_and_rank() {
        let rows = vec![
            row(Conference::Osdi, 2020, 30.0, 60.0),
            row(Conference::Nsdi, 2020, 20.0, 80.0),
            row(Conference::Osdi, 2021, 10.0, 80.0),
            row(Conference::Icdcs, 2021, 5.0, 95.0),
        ];
        let means = mean_share(&rows, Affiliation::BigTech);
        assert_eq!(
            means,
            vec![
                (Conference::Osdi, 20.0),
                (Conference::Nsdi, 20.0),
                (Conference::Icdcs, 5.0)
            ]
        );
        assert_eq!(
            rank_values(&means),
            vec![Conference::Osdi, Conference::Nsdi, Conference::Icdcs]
        );
    }

    #[test]
    fn test_shares_by_continent() {
        let row = |c: Conference, year: i32, label: &str, percentage: f64| ContinentAffiliationRow {
            conference: c,
            year: Some(year),
            label: label.to_string(),
            percentage,
        };
        let table = mean_share_by_continent(&[
            row(Conference::Osdi, 2020, "pct_big_na", 30.0),
            row(Conference::Osdi, 2021, "pct_big_na", 10.0),
            row(Conference::Osdi, 2020, "pct_big_other", 2.0),
            row(Conference::Osdi, 2020, "PCT_BIG_EU", 4.0),
            row(Conference::Nsdi, 2020, "pct_big_as", 8.0),
            row(Conference::Nsdi, 2020, "X0", 99.0),
        ]);
        assert_eq!(table.rows.len(), 4);
        assert_eq!(table.get(Conference::Osdi, ComparisonContinent::NorthAmerica), Some(20.0));
        assert_eq!(table.get(Conference::Osdi, ComparisonContinent::Other), Some(2.0));
        assert_eq!(table.get(Conference::Osdi, ComparisonContinent::Europe), Some(4.0));
        assert_eq!(table.get(Conference::Nsdi, ComparisonContinent::Asia), Some(8.0));
        assert_eq!(table.get(Conference::Nsdi, ComparisonContinent::Other), None);
    }
}
