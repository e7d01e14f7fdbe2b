mod affiliation;
pub mod builder;
mod compare;
mod config;
mod diversity;
pub mod manual;
mod normalize;
mod rank;

use log::{debug, info};

use std::{
    collections::{BTreeMap, HashMap},
    ops::AddAssign,
};

pub use crate::affiliation::*;
pub use crate::compare::*;
pub use crate::config::*;
pub use crate::diversity::*;
pub use crate::normalize::*;
pub use crate::rank::*;

// **** Private structures ****

#[derive(PartialEq, Debug, Clone, Copy, PartialOrd)]
struct Weight(f64);

impl Weight {
    const EMPTY: Weight = Weight(0.0);
}

impl std::iter::Sum for Weight {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        Weight(iter.map(|w| w.0).sum())
    }
}

impl AddAssign for Weight {
    fn add_assign(&mut self, rhs: Weight) {
        self.0 += rhs.0;
    }
}

// The weights seen for one group.
#[derive(PartialEq, Debug, Clone)]
struct GroupTally {
    // Every record of the group, located or not.
    total: Weight,
    known: HashMap<Continent, Weight>,
}

impl GroupTally {
    fn new() -> GroupTally {
        GroupTally {
            total: Weight::EMPTY,
            known: HashMap::new(),
        }
    }

    // Weights that are not finite or are negative cannot be counted.
    fn add(&mut self, continent: Continent, w: Weight) {
        if !w.0.is_finite() || w.0 < 0.0 {
            debug!("GroupTally::add: ignoring weight {:?} for {:?}", w.0, continent);
            return;
        }
        self.total += w;
        if continent != Continent::Unknown {
            *self.known.entry(continent).or_insert(Weight::EMPTY) += w;
        }
    }

    fn located(&self) -> Weight {
        self.known.values().cloned().sum()
    }
}

fn group_key(r: &Record, grouping: Grouping) -> GroupKey {
    match grouping {
        Grouping::Conference => GroupKey {
            conference: r.conference,
            year: None,
        },
        Grouping::ConferenceYear => GroupKey {
            conference: r.conference,
            year: r.year,
        },
    }
}

// Groups in order of first appearance, with their tallies.
fn tally_groups(records: &[Record], grouping: Grouping) -> Vec<(GroupKey, GroupTally)> {
    let mut order: Vec<GroupKey> = Vec::new();
    let mut tallies: HashMap<GroupKey, GroupTally> = HashMap::new();
    for r in records.iter() {
        let key = group_key(r, grouping);
        let tally = tallies.entry(key).or_insert_with(|| {
            order.push(key);
            GroupTally::new()
        });
        tally.add(r.continent, Weight(r.count_weight));
    }
    order
        .into_iter()
        .filter_map(|k| tallies.remove(&k).map(|t| (k, t)))
        .collect()
}

// Past 15 decimals, rounding an f64 percentage is a no-op.
const MAX_DECIMAL_PLACES: u32 = 15;

fn round_to(x: f64, decimal_places: Option<u32>) -> f64 {
    match decimal_places {
        Some(dp) => {
            let factor = 10f64.powi(dp.min(MAX_DECIMAL_PLACES) as i32);
            (x * factor).round() / factor
        }
        None => x,
    }
}

/// Computes the continent percentages of each group of records.
///
/// The percentage of a continent is its weight divided by the total weight of
/// the group, unlocated records included. The `Unknown` share is not counted:
/// it is whatever remains to reach 100, clamped at 0. As a consequence, each
/// group sums to 100, except when rounded percentages overshoot.
///
/// Groups without any weight are left out. Weights that are negative or not
/// finite are ignored.
///
/// ```
/// use geo_diversity::*;
/// use geo_diversity::builder::Builder;
///
/// let mut builder = Builder::new(&Vocabulary::standard(), RecordKind::Accepted);
/// builder.add_row("NSDI", Some(2020), Some("NA"));
/// builder.add_row("NSDI", Some(2020), Some("NA"));
/// builder.add_row("NSDI", Some(2020), Some("EU"));
/// builder.add_row("NSDI", Some(2020), Some(""));
///
/// let dist = aggregate(builder.records(), &AggregateOptions::DEFAULT_OPTIONS);
/// let nsdi = GroupKey { conference: Conference::Nsdi, year: None };
/// assert_eq!(dist.get(&nsdi, Continent::NorthAmerica), Some(50.0));
/// assert_eq!(dist.get(&nsdi, Continent::Europe), Some(25.0));
/// assert_eq!(dist.get(&nsdi, Continent::Unknown), Some(25.0));
/// assert_eq!(dist.get(&nsdi, Continent::Asia), None);
/// ```
pub fn aggregate(records: &[Record], options: &AggregateOptions) -> Distribution {
    info!(
        "aggregate: processing {:?} records, options: {:?}",
        records.len(),
        options
    );
    let mut rows: Vec<DistributionRow> = Vec::new();
    for (group, tally) in tally_groups(records, options.grouping) {
        if tally.total <= Weight::EMPTY || !tally.total.0.is_finite() {
            debug!("aggregate: skipping empty group {:?}", group);
            continue;
        }
        let mut known_sum: f64 = 0.0;
        for continent in Continent::KNOWN {
            let w = tally.known.get(&continent).cloned().unwrap_or(Weight::EMPTY);
            if w <= Weight::EMPTY {
                continue;
            }
            let percentage = round_to(100.0 * w.0 / tally.total.0, options.decimal_places);
            known_sum += percentage;
            rows.push(DistributionRow {
                group,
                continent,
                percentage,
            });
        }
        let remainder = 100.0 - known_sum;
        if remainder < 0.0 {
            debug!(
                "aggregate: {:?}: known percentages overshoot by {:?}, clamping unknown to 0",
                group, -remainder
            );
        }
        rows.push(DistributionRow {
            group,
            continent: Continent::Unknown,
            percentage: remainder.max(0.0),
        });
    }
    debug!("aggregate: {:?} rows", rows.len());
    Distribution { rows }
}

/// Total weight and located weight of each conference.
pub fn coverage(records: &[Record]) -> Vec<Coverage> {
    tally_groups(records, Grouping::Conference)
        .into_iter()
        .map(|(group, tally)| Coverage {
            conference: group.conference,
            total: tally.total.0,
            located: tally.located().0,
        })
        .collect()
}

/// The share of one continent per year, all conferences pooled together.
///
/// Unlocated records count in the denominator. Records without a year are
/// ignored. Years are returned in increasing order.
pub fn yearly_share(records: &[Record], continent: Continent) -> Vec<(i32, f64)> {
    let mut by_year: BTreeMap<i32, GroupTally> = BTreeMap::new();
    for r in records.iter() {
        if let Some(year) = r.year {
            by_year
                .entry(year)
                .or_insert_with(GroupTally::new)
                .add(r.continent, Weight(r.count_weight));
        }
    }
    by_year
        .into_iter()
        .filter(|(_, t)| t.total > Weight::EMPTY)
        .map(|(year, t)| {
            let w = if continent == Continent::Unknown {
                t.total.0 - t.located().0
            } else {
                t.known.get(&continent).map(|w| w.0).unwrap_or(0.0)
            };
            (year, 100.0 * w / t.total.0)
        })
        .collect()
}
