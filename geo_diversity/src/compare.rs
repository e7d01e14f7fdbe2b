use std::collections::HashMap;

use log::debug;

use crate::config::*;
use crate::normalize::normalize_comparison_continent;

/// A long table of values, keyed by conference and comparison continent.
#[derive(PartialEq, Debug, Clone, Default)]
pub struct ComparisonTable {
    pub rows: Vec<(Conference, ComparisonContinent, f64)>,
}

impl ComparisonTable {
    /// Builds a table from continent labels in any vocabulary (codes or names).
    pub fn from_labels(rows: &[(Conference, String, f64)]) -> ComparisonTable {
        let mut res = ComparisonTable::default();
        for (c, label, v) in rows.iter() {
            res.push(*c, normalize_comparison_continent(label), *v);
        }
        res
    }

    /// Adds a value, summing it with any previous value of the same cell.
    pub fn push(&mut self, conference: Conference, continent: ComparisonContinent, value: f64) {
        if let Some(cell) = self
            .rows
            .iter_mut()
            .find(|(c, cc, _)| *c == conference && *cc == continent)
        {
            cell.2 += value;
        } else {
            self.rows.push((conference, continent, value));
        }
    }

    pub fn get(&self, conference: Conference, continent: ComparisonContinent) -> Option<f64> {
        self.rows
            .iter()
            .find(|(c, cc, _)| *c == conference && *cc == continent)
            .map(|(_, _, v)| *v)
    }
}

impl Distribution {
    /// Converts the conference-level rows to the comparison categories.
    ///
    /// `Others` and `Unknown` are both counted as `Other`. Rows grouped by year
    /// are ignored.
    pub fn to_comparison(&self) -> ComparisonTable {
        let mut res = ComparisonTable::default();
        for r in self.rows.iter().filter(|r| r.group.year.is_none()) {
            res.push(
                r.group.conference,
                ComparisonContinent::from(r.continent),
                r.percentage,
            );
        }
        res
    }
}

/// Aligns two tables and computes `b - a` for each cell.
///
/// The result holds one record per (conference, continent) of the grid formed
/// by `conferences` and all the comparison continents, in this order. A value
/// missing on one side counts as 0. A cell missing on both sides has no gap.
///
/// ```
/// use geo_diversity::*;
///
/// let papers = ComparisonTable {
///     rows: vec![(Conference::Nsdi, ComparisonContinent::NorthAmerica, 60.0)],
/// };
/// let committee = ComparisonTable {
///     rows: vec![(Conference::Nsdi, ComparisonContinent::NorthAmerica, 75.0),
///                (Conference::Nsdi, ComparisonContinent::Europe, 25.0)],
/// };
/// let gaps = compare(&papers, &committee, &[Conference::Nsdi]);
/// assert_eq!(gaps.len(), 4);
/// assert_eq!(gaps[0].gap, Some(15.0));
/// assert_eq!(gaps[1].gap, Some(25.0));
/// assert_eq!(gaps[2].gap, None);
/// ```
pub fn compare(a: &ComparisonTable, b: &ComparisonTable, conferences: &[Conference]) -> Vec<GapRecord> {
    let index_a: HashMap<(Conference, ComparisonContinent), f64> =
        a.rows.iter().map(|(c, cc, v)| ((*c, *cc), *v)).collect();
    let index_b: HashMap<(Conference, ComparisonContinent), f64> =
        b.rows.iter().map(|(c, cc, v)| ((*c, *cc), *v)).collect();

    let mut res: Vec<GapRecord> = Vec::new();
    for conference in conferences.iter() {
        for continent in ComparisonContinent::ALL {
            let key = (*conference, continent);
            let value_a = index_a.get(&key).cloned();
            let value_b = index_b.get(&key).cloned();
            let gap = match (value_a, value_b) {
                (None, None) => None,
                (va, vb) => Some(vb.unwrap_or(0.0) - va.unwrap_or(0.0)),
            };
            res.push(GapRecord {
                conference: *conference,
                continent,
                value_a,
                value_b,
                gap,
            });
        }
    }
    for (c, cc) in index_a.keys().chain(index_b.keys()) {
        if !conferences.contains(c) {
            debug!("compare: {:?} / {:?} is outside the grid, ignored", c, cc);
        }
    }
    res
}
